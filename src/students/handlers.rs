// HTTP handlers for student endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::middleware::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::MessageResponse;
use crate::students::models::{CreateStudentRequest, Student, UpdateStudentRequest};
use crate::validation::{parse_id, ValidatedJson};
use crate::AppState;

/// Handler for GET /api/students
#[utoipa::path(
    get,
    path = "/api/students",
    responses(
        (status = 200, description = "Students visible to the caller", body = Vec<Student>),
        (status = 401, description = "Missing bearer token", body = String),
        (status = 403, description = "Invalid token or role", body = String)
    ),
    security(("bearer_auth" = [])),
    tag = "students"
)]
pub async fn list_students_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Student>>, ApiError> {
    let students = state.student_service.list(&user).await?;
    Ok(Json(students))
}

/// Handler for GET /api/students/{id}
#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(("id" = String, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student found", body = Student),
        (status = 400, description = "Malformed ID", body = String, example = json!({"error": "Invalid student ID format"})),
        (status = 403, description = "Student belongs to another school", body = String),
        (status = 404, description = "Student not found", body = String, example = json!({"error": "Student not found"}))
    ),
    security(("bearer_auth" = [])),
    tag = "students"
)]
pub async fn get_student_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Student>, ApiError> {
    let id = parse_id(&id, "student")?;
    let student = state.student_service.get(&user, id).await?;
    Ok(Json(student))
}

/// Handler for POST /api/students
#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Invalid input or unknown classroom", body = String, example = json!({"error": "Invalid classroom ID"})),
        (status = 403, description = "Classroom outside the caller's tenancy", body = String)
    ),
    security(("bearer_auth" = [])),
    tag = "students"
)]
pub async fn create_student_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateStudentRequest>,
) -> Result<(StatusCode, Json<Student>), ApiError> {
    let student = state.student_service.create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

/// Handler for PUT /api/students/{id}
#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(("id" = String, Path, description = "Student ID")),
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 400, description = "Invalid input", body = String),
        (status = 403, description = "Student or destination classroom outside the caller's tenancy", body = String),
        (status = 404, description = "Student not found", body = String)
    ),
    security(("bearer_auth" = [])),
    tag = "students"
)]
pub async fn update_student_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateStudentRequest>,
) -> Result<Json<Student>, ApiError> {
    let id = parse_id(&id, "student")?;
    let student = state.student_service.update(&user, id, request).await?;
    Ok(Json(student))
}

/// Handler for DELETE /api/students/{id}
#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(("id" = String, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted", body = MessageResponse),
        (status = 403, description = "Student belongs to another school", body = String),
        (status = 404, description = "Student not found", body = String)
    ),
    security(("bearer_auth" = [])),
    tag = "students"
)]
pub async fn delete_student_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "student")?;
    state.student_service.delete(&user, id).await?;
    Ok(Json(MessageResponse::new("Student deleted successfully")))
}
