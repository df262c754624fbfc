// Handler tests for the School API
// End-to-end requests through the full router against the in-memory store

use super::*;
use crate::auth::{models::NewUser, password::PasswordService};
use crate::classrooms::models::NewClassroom;
use crate::store::MemoryStore;
use axum::http::{HeaderName, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};
use uuid::Uuid;

// ============================================================================
// Test Helpers
// ============================================================================

const SECRET: &str = "test_secret_key_for_testing_purposes";

struct TestApp {
    server: TestServer,
    state: AppState,
    store: Arc<MemoryStore>,
}

fn create_test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(
        store.clone(),
        TokenService::new(SECRET),
        None,
        StorageBackend::Memory,
    );
    let server = TestServer::new(create_router(state.clone())).unwrap();

    TestApp { server, state, store }
}

fn auth_header(token: &str) -> (HeaderName, HeaderValue) {
    (
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    )
}

impl TestApp {
    /// Store a user directly and return a token for it
    async fn login_as(&self, role: Role, school_id: Option<Uuid>) -> (HeaderName, HeaderValue) {
        let digest = PasswordService::hash_password("password123").unwrap();
        let email = format!("{}@school.org", Uuid::new_v4());
        let user = self
            .store
            .create_user(NewUser::new("Test Admin", &email, digest, role, school_id))
            .await
            .unwrap();

        let token = self.state.tokens.generate_access_token(user.id, role).unwrap();
        auth_header(&token)
    }

    async fn seed_school(&self, name: &str) -> School {
        self.store
            .create_school(CreateSchool {
                name: name.to_string(),
                location: "Springfield".into(),
                principal: "Seymour Skinner".into(),
                admin: "Gary Chalmers".into(),
                address: "19 Plympton Street".into(),
            })
            .await
            .unwrap()
    }

    async fn seed_classroom(&self, school_id: Uuid) -> Classroom {
        self.store
            .create_classroom(NewClassroom {
                name: "Room 1".into(),
                capacity: 30,
                school_id,
            })
            .await
            .unwrap()
    }
}

fn school_payload(name: &str) -> Value {
    json!({
        "name": name,
        "location": "Springfield",
        "principal": "Seymour Skinner",
        "admin": "Gary Chalmers",
        "address": "19 Plympton Street"
    })
}

// ============================================================================
// Platform Routes
// ============================================================================

#[tokio::test]
async fn test_root_banner() {
    let app = create_test_app();

    let response = app.server.get("/").await;

    response.assert_status(StatusCode::OK);
    assert_eq!(response.text(), "School Management API is running");
}

#[tokio::test]
async fn test_health_reports_storage_and_cache() {
    let app = create_test_app();

    let response = app.server.get("/health").await;

    response.assert_status(StatusCode::OK);
    response.assert_json(&json!({
        "status": "ok",
        "storage": "memory",
        "cache": "disabled"
    }));
}

#[tokio::test]
async fn test_security_headers_are_set() {
    let app = create_test_app();

    let response = app.server.get("/health").await;

    let headers = response.headers();
    assert_eq!(headers.get(header::X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
    assert_eq!(headers.get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = create_test_app();

    let response = app.server.get("/api-docs/openapi.json").await;

    response.assert_status(StatusCode::OK);
    let doc: Value = response.json();
    assert!(doc["paths"]["/api/classrooms/{id}"].is_object());
    assert!(doc["components"]["securitySchemes"]["bearer_auth"].is_object());
}

// ============================================================================
// Auth Routes (POST /api/auth/*)
// ============================================================================

#[tokio::test]
async fn test_register_schooladmin_without_school_id() {
    let app = create_test_app();

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Edna Krabappel",
            "email": "edna@school.org",
            "password": "password123",
            "role": "schooladmin"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"error": "School ID is required for school administrators"}));
}

#[tokio::test]
async fn test_register_rejects_unknown_role() {
    let app = create_test_app();

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Groundskeeper Willie",
            "email": "willie@school.org",
            "password": "password123",
            "role": "janitor"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"error": "Invalid role. Must be one of: superadmin, schooladmin"}));
}

#[tokio::test]
async fn test_register_rejects_missing_field() {
    let app = create_test_app();

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "name": "No Password",
            "email": "nopass@school.org",
            "role": "superadmin"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"error": "password is required"}));
}

#[tokio::test]
async fn test_register_then_login() {
    let app = create_test_app();
    let school = app.seed_school("Springfield Elementary").await;

    let registered = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Edna Krabappel",
            "email": "Edna@School.org",
            "password": "password123",
            "role": "schooladmin",
            "schoolId": school.id
        }))
        .await;

    registered.assert_status(StatusCode::CREATED);
    let body: Value = registered.json();
    assert_eq!(body["message"], "User registered successfully");
    let user_id: Uuid = body["userId"].as_str().unwrap().parse().unwrap();

    let login = app
        .server
        .post("/api/auth/login")
        .json(&json!({"email": "edna@school.org", "password": "password123"}))
        .await;

    login.assert_status(StatusCode::OK);
    let body: Value = login.json();
    assert_eq!(body["message"], "Login successful");
    let claims = app
        .state
        .tokens
        .validate_access_token(body["token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.role, Role::SchoolAdmin);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = create_test_app();
    let payload = json!({
        "name": "Root",
        "email": "root@school.org",
        "password": "password123",
        "role": "superadmin"
    });

    app.server
        .post("/api/auth/register")
        .json(&payload)
        .await
        .assert_status(StatusCode::CREATED);
    let response = app.server.post("/api/auth/register").json(&payload).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"error": "Email is already registered"}));
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = create_test_app();
    app.server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Root",
            "email": "root@school.org",
            "password": "password123",
            "role": "superadmin"
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({"email": "root@school.org", "password": "not-the-password"}))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    response.assert_json(&json!({"error": "Invalid credentials"}));
}

#[tokio::test]
async fn test_login_unknown_email() {
    let app = create_test_app();

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({"email": "ghost@school.org", "password": "password123"}))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    response.assert_json(&json!({"error": "Invalid credentials"}));
}

// ============================================================================
// Authentication Gate
// ============================================================================

#[tokio::test]
async fn test_protected_route_without_token() {
    let app = create_test_app();

    let response = app.server.get("/api/classrooms").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    response.assert_json(&json!({"error": "Unauthorized: No token provided or invalid format"}));
}

#[tokio::test]
async fn test_protected_route_with_invalid_token() {
    let app = create_test_app();
    let (name, value) = auth_header("not.a.token");

    let response = app.server.get("/api/students").add_header(name, value).await;

    response.assert_status(StatusCode::FORBIDDEN);
    response.assert_json(&json!({"error": "Forbidden: Invalid or expired token"}));
}

#[tokio::test]
async fn test_token_signed_with_other_secret() {
    let app = create_test_app();
    let forged = TokenService::new("some-other-secret")
        .generate_access_token(Uuid::new_v4(), Role::SuperAdmin)
        .unwrap();
    let (name, value) = auth_header(&forged);

    let response = app.server.get("/api/schools").add_header(name, value).await;

    response.assert_status(StatusCode::FORBIDDEN);
}

// ============================================================================
// Schools (superadmin only)
// ============================================================================

#[tokio::test]
async fn test_create_school_as_schooladmin_is_forbidden() {
    let app = create_test_app();
    let school = app.seed_school("Springfield Elementary").await;
    let (name, value) = app.login_as(Role::SchoolAdmin, Some(school.id)).await;

    let response = app
        .server
        .post("/api/schools")
        .add_header(name, value)
        .json(&school_payload("Shelbyville Elementary"))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    response.assert_json(&json!({"error": "Forbidden: Access denied"}));
}

#[tokio::test]
async fn test_school_crud_as_superadmin() {
    let app = create_test_app();
    let (name, value) = app.login_as(Role::SuperAdmin, None).await;

    let created = app
        .server
        .post("/api/schools")
        .add_header(name.clone(), value.clone())
        .json(&school_payload("Springfield Elementary"))
        .await;
    created.assert_status(StatusCode::CREATED);
    let school: Value = created.json();
    let id = school["id"].as_str().unwrap().to_string();
    assert_eq!(school["name"], "Springfield Elementary");
    assert!(school["createdAt"].is_string());

    let listed = app
        .server
        .get("/api/schools")
        .add_header(name.clone(), value.clone())
        .await;
    listed.assert_status(StatusCode::OK);
    assert_eq!(listed.json::<Vec<Value>>().len(), 1);

    let updated = app
        .server
        .put(&format!("/api/schools/{}", id))
        .add_header(name.clone(), value.clone())
        .json(&json!({"principal": "Principal Skinner"}))
        .await;
    updated.assert_status(StatusCode::OK);
    let body: Value = updated.json();
    assert_eq!(body["principal"], "Principal Skinner");
    assert_eq!(body["name"], "Springfield Elementary");

    let deleted = app
        .server
        .delete(&format!("/api/schools/{}", id))
        .add_header(name.clone(), value.clone())
        .await;
    deleted.assert_status(StatusCode::OK);
    deleted.assert_json(&json!({"message": "School deleted successfully"}));

    let missing = app
        .server
        .get(&format!("/api/schools/{}", id))
        .add_header(name, value)
        .await;
    missing.assert_status(StatusCode::NOT_FOUND);
    missing.assert_json(&json!({"error": "School not found"}));
}

#[tokio::test]
async fn test_create_school_with_empty_field() {
    let app = create_test_app();
    let (name, value) = app.login_as(Role::SuperAdmin, None).await;
    let mut payload = school_payload("Springfield Elementary");
    payload["address"] = json!("");

    let response = app
        .server
        .post("/api/schools")
        .add_header(name, value)
        .json(&payload)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({
        "error": "All fields (name, location, principal, admin, address) are required"
    }));
}

#[tokio::test]
async fn test_malformed_school_id() {
    let app = create_test_app();
    let (name, value) = app.login_as(Role::SuperAdmin, None).await;

    let response = app
        .server
        .get("/api/schools/12345")
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"error": "Invalid school ID format"}));
}

#[tokio::test]
async fn test_whitespace_only_school_fields_are_rejected() {
    let app = create_test_app();
    let (name, value) = app.login_as(Role::SuperAdmin, None).await;
    let mut payload = school_payload("Springfield Elementary");
    payload["principal"] = json!("   ");

    let created = app
        .server
        .post("/api/schools")
        .add_header(name.clone(), value.clone())
        .json(&payload)
        .await;
    created.assert_status(StatusCode::BAD_REQUEST);
    created.assert_json(&json!({
        "error": "All fields (name, location, principal, admin, address) are required"
    }));
    assert!(app.store.list_schools().await.unwrap().is_empty());

    let school = app.seed_school("Springfield Elementary").await;
    let updated = app
        .server
        .put(&format!("/api/schools/{}", school.id))
        .add_header(name, value)
        .json(&json!({"address": " \t "}))
        .await;
    updated.assert_status(StatusCode::BAD_REQUEST);
    updated.assert_json(&json!({"error": "address must not be empty"}));
}

// ============================================================================
// Classrooms
// ============================================================================

#[tokio::test]
async fn test_create_classroom_for_other_school_is_forbidden() {
    let app = create_test_app();
    let own = app.seed_school("Springfield Elementary").await;
    let other = app.seed_school("Shelbyville Elementary").await;
    let (name, value) = app.login_as(Role::SchoolAdmin, Some(own.id)).await;

    let response = app
        .server
        .post("/api/classrooms")
        .add_header(name, value)
        .json(&json!({"name": "Math 101", "capacity": 30, "school": other.id}))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert!(app.store.list_classrooms(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_schooladmin_creates_classroom_in_own_school() {
    let app = create_test_app();
    let own = app.seed_school("Springfield Elementary").await;
    let (name, value) = app.login_as(Role::SchoolAdmin, Some(own.id)).await;

    let response = app
        .server
        .post("/api/classrooms")
        .add_header(name, value)
        .json(&json!({"name": "Math 101", "capacity": 30}))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["school"], own.id.to_string());
    assert_eq!(body["capacity"], 30);
}

#[tokio::test]
async fn test_superadmin_classroom_requires_school() {
    let app = create_test_app();
    let (name, value) = app.login_as(Role::SuperAdmin, None).await;

    let response = app
        .server
        .post("/api/classrooms")
        .add_header(name, value)
        .json(&json!({"name": "Math 101", "capacity": 30}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"error": "School ID is required"}));
}

#[tokio::test]
async fn test_classroom_capacity_must_be_positive() {
    let app = create_test_app();
    let own = app.seed_school("Springfield Elementary").await;
    let (name, value) = app.login_as(Role::SchoolAdmin, Some(own.id)).await;

    let response = app
        .server
        .post("/api/classrooms")
        .add_header(name, value)
        .json(&json!({"name": "Math 101", "capacity": 0}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"error": "Capacity must be a positive number"}));
}

#[tokio::test]
async fn test_whitespace_only_classroom_name_is_rejected() {
    let app = create_test_app();
    let own = app.seed_school("Springfield Elementary").await;
    let room = app.seed_classroom(own.id).await;
    let (name, value) = app.login_as(Role::SchoolAdmin, Some(own.id)).await;

    let created = app
        .server
        .post("/api/classrooms")
        .add_header(name.clone(), value.clone())
        .json(&json!({"name": "  ", "capacity": 3}))
        .await;
    created.assert_status(StatusCode::BAD_REQUEST);
    created.assert_json(&json!({"error": "All fields (name, capacity) are required"}));

    let updated = app
        .server
        .put(&format!("/api/classrooms/{}", room.id))
        .add_header(name, value)
        .json(&json!({"name": "   "}))
        .await;
    updated.assert_status(StatusCode::BAD_REQUEST);
    updated.assert_json(&json!({"error": "name must not be empty"}));

    let stored = app.store.list_classrooms(None).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Room 1");
}

#[tokio::test]
async fn test_classroom_list_is_tenancy_scoped() {
    let app = create_test_app();
    let own = app.seed_school("Springfield Elementary").await;
    let other = app.seed_school("Shelbyville Elementary").await;
    let mine = app.seed_classroom(own.id).await;
    app.seed_classroom(other.id).await;
    let (name, value) = app.login_as(Role::SchoolAdmin, Some(own.id)).await;

    let response = app.server.get("/api/classrooms").add_header(name, value).await;

    response.assert_status(StatusCode::OK);
    let rooms: Vec<Value> = response.json();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0]["id"], mine.id.to_string());
}

#[tokio::test]
async fn test_cross_school_classroom_access_is_forbidden() {
    let app = create_test_app();
    let own = app.seed_school("Springfield Elementary").await;
    let other = app.seed_school("Shelbyville Elementary").await;
    let theirs = app.seed_classroom(other.id).await;
    let (name, value) = app.login_as(Role::SchoolAdmin, Some(own.id)).await;

    let read = app
        .server
        .get(&format!("/api/classrooms/{}", theirs.id))
        .add_header(name.clone(), value.clone())
        .await;
    read.assert_status(StatusCode::FORBIDDEN);

    let delete = app
        .server
        .delete(&format!("/api/classrooms/{}", theirs.id))
        .add_header(name, value)
        .await;
    delete.assert_status(StatusCode::FORBIDDEN);
    assert!(app.store.find_classroom(theirs.id).await.unwrap().is_some());
}

// ============================================================================
// Students
// ============================================================================

#[tokio::test]
async fn test_delete_nonexistent_student() {
    let app = create_test_app();
    let (name, value) = app.login_as(Role::SuperAdmin, None).await;

    let response = app
        .server
        .delete(&format!("/api/students/{}", Uuid::new_v4()))
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({"error": "Student not found"}));
}

#[tokio::test]
async fn test_student_lifecycle_in_own_school() {
    let app = create_test_app();
    let own = app.seed_school("Springfield Elementary").await;
    let room = app.seed_classroom(own.id).await;
    let (name, value) = app.login_as(Role::SchoolAdmin, Some(own.id)).await;

    let created = app
        .server
        .post("/api/students")
        .add_header(name.clone(), value.clone())
        .json(&json!({"name": "Bart Simpson", "age": 10, "grade": "4th", "classroom": room.id}))
        .await;
    created.assert_status(StatusCode::CREATED);
    let student: Value = created.json();
    let id = student["id"].as_str().unwrap().to_string();
    assert_eq!(student["classroom"], room.id.to_string());

    let updated = app
        .server
        .put(&format!("/api/students/{}", id))
        .add_header(name.clone(), value.clone())
        .json(&json!({"grade": "5th"}))
        .await;
    updated.assert_status(StatusCode::OK);
    let body: Value = updated.json();
    assert_eq!(body["grade"], "5th");
    assert_eq!(body["age"], 10);

    let deleted = app
        .server
        .delete(&format!("/api/students/{}", id))
        .add_header(name, value)
        .await;
    deleted.assert_status(StatusCode::OK);
    deleted.assert_json(&json!({"message": "Student deleted successfully"}));
}

#[tokio::test]
async fn test_whitespace_only_student_fields_are_rejected() {
    let app = create_test_app();
    let own = app.seed_school("Springfield Elementary").await;
    let room = app.seed_classroom(own.id).await;
    let (name, value) = app.login_as(Role::SchoolAdmin, Some(own.id)).await;

    for body in [
        json!({"name": "   ", "age": 10, "grade": "4th", "classroom": room.id}),
        json!({"name": "Bart Simpson", "age": 10, "grade": "   ", "classroom": room.id}),
    ] {
        let response = app
            .server
            .post("/api/students")
            .add_header(name.clone(), value.clone())
            .json(&body)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({"error": "Name, age, grade, and classroom ID are required"}));
    }
    assert!(app.store.list_students(None).await.unwrap().is_empty());

    let created = app
        .server
        .post("/api/students")
        .add_header(name.clone(), value.clone())
        .json(&json!({"name": "Bart Simpson", "age": 10, "grade": "4th", "classroom": room.id}))
        .await;
    created.assert_status(StatusCode::CREATED);
    let id = created.json::<Value>()["id"].as_str().unwrap().to_string();

    let updated = app
        .server
        .put(&format!("/api/students/{}", id))
        .add_header(name, value)
        .json(&json!({"grade": "  "}))
        .await;
    updated.assert_status(StatusCode::BAD_REQUEST);
    updated.assert_json(&json!({"error": "grade must not be empty"}));
}

#[tokio::test]
async fn test_create_student_with_unknown_classroom() {
    let app = create_test_app();
    let (name, value) = app.login_as(Role::SuperAdmin, None).await;

    let response = app
        .server
        .post("/api/students")
        .add_header(name, value)
        .json(&json!({"name": "Milhouse", "age": 10, "grade": "4th", "classroom": Uuid::new_v4()}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"error": "Invalid classroom ID"}));
}

#[tokio::test]
async fn test_cross_school_student_is_forbidden() {
    let app = create_test_app();
    let own = app.seed_school("Springfield Elementary").await;
    let other = app.seed_school("Shelbyville Elementary").await;
    let theirs = app.seed_classroom(other.id).await;
    let (root_name, root_value) = app.login_as(Role::SuperAdmin, None).await;
    let (name, value) = app.login_as(Role::SchoolAdmin, Some(own.id)).await;

    let created = app
        .server
        .post("/api/students")
        .add_header(root_name, root_value)
        .json(&json!({"name": "Nelson", "age": 11, "grade": "5th", "classroom": theirs.id}))
        .await;
    created.assert_status(StatusCode::CREATED);
    let id = created.json::<Value>()["id"].as_str().unwrap().to_string();

    let response = app
        .server
        .get(&format!("/api/students/{}", id))
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let listed = app.server.get("/api/students").add_header(name, value).await;
    listed.assert_status(StatusCode::OK);
    assert!(listed.json::<Vec<Value>>().is_empty());
}

#[tokio::test]
async fn test_deleted_user_token_is_rejected() {
    let app = create_test_app();
    let token = app
        .state
        .tokens
        .generate_access_token(Uuid::new_v4(), Role::SuperAdmin)
        .unwrap();
    let (name, value) = auth_header(&token);

    let response = app.server.get("/api/schools").add_header(name, value).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    response.assert_json(&json!({"error": "Unauthorized: User not found"}));
}
