// HTTP handlers for classroom endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::middleware::AuthenticatedUser;
use crate::classrooms::models::{Classroom, CreateClassroomRequest, UpdateClassroomRequest};
use crate::error::ApiError;
use crate::models::MessageResponse;
use crate::validation::{parse_id, ValidatedJson};
use crate::AppState;

/// Handler for GET /api/classrooms
#[utoipa::path(
    get,
    path = "/api/classrooms",
    responses(
        (status = 200, description = "Classrooms visible to the caller", body = Vec<Classroom>),
        (status = 401, description = "Missing bearer token", body = String),
        (status = 403, description = "Invalid token or role", body = String)
    ),
    security(("bearer_auth" = [])),
    tag = "classrooms"
)]
pub async fn list_classrooms_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Classroom>>, ApiError> {
    let classrooms = state.classroom_service.list(&user).await?;
    Ok(Json(classrooms))
}

/// Handler for GET /api/classrooms/{id}
#[utoipa::path(
    get,
    path = "/api/classrooms/{id}",
    params(("id" = String, Path, description = "Classroom ID")),
    responses(
        (status = 200, description = "Classroom found", body = Classroom),
        (status = 400, description = "Malformed ID", body = String, example = json!({"error": "Invalid classroom ID format"})),
        (status = 403, description = "Classroom belongs to another school", body = String),
        (status = 404, description = "Classroom not found", body = String, example = json!({"error": "Classroom not found"}))
    ),
    security(("bearer_auth" = [])),
    tag = "classrooms"
)]
pub async fn get_classroom_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Classroom>, ApiError> {
    let id = parse_id(&id, "classroom")?;
    let classroom = state.classroom_service.get(&user, id).await?;
    Ok(Json(classroom))
}

/// Handler for POST /api/classrooms
#[utoipa::path(
    post,
    path = "/api/classrooms",
    request_body = CreateClassroomRequest,
    responses(
        (status = 201, description = "Classroom created", body = Classroom),
        (status = 400, description = "Invalid input or unknown school", body = String, example = json!({"error": "School ID is required"})),
        (status = 403, description = "School outside the caller's tenancy", body = String)
    ),
    security(("bearer_auth" = [])),
    tag = "classrooms"
)]
pub async fn create_classroom_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateClassroomRequest>,
) -> Result<(StatusCode, Json<Classroom>), ApiError> {
    let classroom = state.classroom_service.create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(classroom)))
}

/// Handler for PUT /api/classrooms/{id}
#[utoipa::path(
    put,
    path = "/api/classrooms/{id}",
    params(("id" = String, Path, description = "Classroom ID")),
    request_body = UpdateClassroomRequest,
    responses(
        (status = 200, description = "Classroom updated", body = Classroom),
        (status = 400, description = "Invalid input", body = String),
        (status = 403, description = "Classroom or destination school outside the caller's tenancy", body = String),
        (status = 404, description = "Classroom not found", body = String)
    ),
    security(("bearer_auth" = [])),
    tag = "classrooms"
)]
pub async fn update_classroom_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateClassroomRequest>,
) -> Result<Json<Classroom>, ApiError> {
    let id = parse_id(&id, "classroom")?;
    let classroom = state.classroom_service.update(&user, id, request).await?;
    Ok(Json(classroom))
}

/// Handler for DELETE /api/classrooms/{id}
#[utoipa::path(
    delete,
    path = "/api/classrooms/{id}",
    params(("id" = String, Path, description = "Classroom ID")),
    responses(
        (status = 200, description = "Classroom deleted", body = MessageResponse),
        (status = 403, description = "Classroom belongs to another school", body = String),
        (status = 404, description = "Classroom not found", body = String)
    ),
    security(("bearer_auth" = [])),
    tag = "classrooms"
)]
pub async fn delete_classroom_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "classroom")?;
    state.classroom_service.delete(&user, id).await?;
    Ok(Json(MessageResponse::new("Classroom deleted successfully")))
}
