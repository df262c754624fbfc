pub mod auth;
pub mod cache;
pub mod classrooms;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod schools;
pub mod store;
pub mod students;
pub mod validation;

use axum::{
    extract::State,
    http::{header, HeaderValue},
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use auth::{
    models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, Role},
    require_school_staff, require_superadmin,
    token::TokenService,
    AuthService,
};
use cache::CacheClient;
use classrooms::{Classroom, ClassroomService, CreateClassroomRequest, UpdateClassroomRequest};
use config::StorageBackend;
use models::{HealthResponse, MessageResponse};
use schools::{CreateSchool, School, UpdateSchool};
use store::{ClassroomStore, SchoolStore, StudentStore, UserStore};
use students::{CreateStudentRequest, Student, StudentService, UpdateStudentRequest};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::register_handler,
        auth::handlers::login_handler,
        schools::handlers::create_school_handler,
        schools::handlers::list_schools_handler,
        schools::handlers::get_school_handler,
        schools::handlers::update_school_handler,
        schools::handlers::delete_school_handler,
        classrooms::handlers::list_classrooms_handler,
        classrooms::handlers::get_classroom_handler,
        classrooms::handlers::create_classroom_handler,
        classrooms::handlers::update_classroom_handler,
        classrooms::handlers::delete_classroom_handler,
        students::handlers::list_students_handler,
        students::handlers::get_student_handler,
        students::handlers::create_student_handler,
        students::handlers::update_student_handler,
        students::handlers::delete_student_handler,
        health_handler,
    ),
    components(
        schemas(
            Role, RegisterRequest, RegisterResponse, LoginRequest, LoginResponse,
            School, CreateSchool, UpdateSchool,
            Classroom, CreateClassroomRequest, UpdateClassroomRequest,
            Student, CreateStudentRequest, UpdateStudentRequest,
            MessageResponse, HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "schools", description = "School management (superadmin only)"),
        (name = "classrooms", description = "Classroom management within a school"),
        (name = "students", description = "Student management within a school"),
        (name = "health", description = "Service health")
    ),
    info(
        title = "School Management API",
        version = "1.0.0",
        description = "Role-gated REST API for schools, classrooms and students"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub schools: Arc<dyn SchoolStore>,
    pub tokens: Arc<TokenService>,
    pub auth: Arc<AuthService>,
    pub classroom_service: Arc<ClassroomService>,
    pub student_service: Arc<StudentService>,
    pub cache: Option<CacheClient>,
    pub storage: StorageBackend,
}

impl AppState {
    /// Wire every service to one store implementation
    pub fn new<S>(
        store: Arc<S>,
        tokens: TokenService,
        cache: Option<CacheClient>,
        storage: StorageBackend,
    ) -> Self
    where
        S: UserStore + SchoolStore + ClassroomStore + StudentStore + 'static,
    {
        let users: Arc<dyn UserStore> = store.clone();
        let schools: Arc<dyn SchoolStore> = store.clone();
        let classrooms: Arc<dyn ClassroomStore> = store.clone();
        let students: Arc<dyn StudentStore> = store;
        let tokens = Arc::new(tokens);

        Self {
            auth: Arc::new(AuthService::new(users.clone(), schools.clone(), tokens.clone())),
            classroom_service: Arc::new(ClassroomService::new(classrooms.clone(), schools.clone())),
            student_service: Arc::new(StudentService::new(students, classrooms)),
            users,
            schools,
            tokens,
            cache,
            storage,
        }
    }
}

/// Handler for GET /
async fn root_handler() -> &'static str {
    "School Management API is running"
}

/// Handler for GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "health"
)]
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache = match &state.cache {
        None => "disabled",
        Some(client) => {
            if client.ping().await {
                "up"
            } else {
                "down"
            }
        }
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        storage: state.storage.as_str().to_string(),
        cache: cache.to_string(),
    })
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers, gates them by role and adds
/// tracing, CORS and security headers
pub fn create_router(state: AppState) -> Router {
    let school_routes = Router::new()
        .route(
            "/",
            get(schools::list_schools_handler).post(schools::create_school_handler),
        )
        .route(
            "/:id",
            get(schools::get_school_handler)
                .put(schools::update_school_handler)
                .delete(schools::delete_school_handler),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_superadmin));

    let classroom_routes = Router::new()
        .route(
            "/",
            get(classrooms::list_classrooms_handler).post(classrooms::create_classroom_handler),
        )
        .route(
            "/:id",
            get(classrooms::get_classroom_handler)
                .put(classrooms::update_classroom_handler)
                .delete(classrooms::delete_classroom_handler),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_school_staff));

    let student_routes = Router::new()
        .route(
            "/",
            get(students::list_students_handler).post(students::create_student_handler),
        )
        .route(
            "/:id",
            get(students::get_student_handler)
                .put(students::update_student_handler)
                .delete(students::delete_student_handler),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_school_staff));

    let api = Router::new()
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .nest("/schools", school_routes)
        .nest("/classrooms", classroom_routes)
        .nest("/students", student_routes);

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest("/api", api)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests;
