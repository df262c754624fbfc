// HTTP handlers for school endpoints
// Every route here sits behind the superadmin gate

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::ApiError;
use crate::models::MessageResponse;
use crate::schools::models::{CreateSchool, School, UpdateSchool};
use crate::validation::{parse_id, ValidatedJson};
use crate::AppState;

/// Handler for POST /api/schools
#[utoipa::path(
    post,
    path = "/api/schools",
    request_body = CreateSchool,
    responses(
        (status = 201, description = "School created", body = School),
        (status = 400, description = "Missing fields", body = String, example = json!({"error": "All fields (name, location, principal, admin, address) are required"})),
        (status = 403, description = "Caller is not a superadmin", body = String, example = json!({"error": "Forbidden: Access denied"}))
    ),
    security(("bearer_auth" = [])),
    tag = "schools"
)]
pub async fn create_school_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateSchool>,
) -> Result<(StatusCode, Json<School>), ApiError> {
    let school = state.schools.create_school(payload).await?;

    tracing::info!("Successfully created school with id: {}", school.id);
    Ok((StatusCode::CREATED, Json(school)))
}

/// Handler for GET /api/schools
#[utoipa::path(
    get,
    path = "/api/schools",
    responses(
        (status = 200, description = "All schools", body = Vec<School>),
        (status = 403, description = "Caller is not a superadmin", body = String)
    ),
    security(("bearer_auth" = [])),
    tag = "schools"
)]
pub async fn list_schools_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<School>>, ApiError> {
    let schools = state.schools.list_schools().await?;

    tracing::debug!("Retrieved {} schools", schools.len());
    Ok(Json(schools))
}

/// Handler for GET /api/schools/{id}
#[utoipa::path(
    get,
    path = "/api/schools/{id}",
    params(("id" = String, Path, description = "School ID")),
    responses(
        (status = 200, description = "School found", body = School),
        (status = 400, description = "Malformed ID", body = String, example = json!({"error": "Invalid school ID format"})),
        (status = 404, description = "School not found", body = String, example = json!({"error": "School not found"}))
    ),
    security(("bearer_auth" = [])),
    tag = "schools"
)]
pub async fn get_school_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<School>, ApiError> {
    let id = parse_id(&id, "school")?;

    let school = state
        .schools
        .find_school(id)
        .await?
        .ok_or_else(|| ApiError::not_found("School"))?;

    Ok(Json(school))
}

/// Handler for PUT /api/schools/{id}
#[utoipa::path(
    put,
    path = "/api/schools/{id}",
    params(("id" = String, Path, description = "School ID")),
    request_body = UpdateSchool,
    responses(
        (status = 200, description = "School updated", body = School),
        (status = 400, description = "Invalid input", body = String),
        (status = 404, description = "School not found", body = String)
    ),
    security(("bearer_auth" = [])),
    tag = "schools"
)]
pub async fn update_school_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateSchool>,
) -> Result<Json<School>, ApiError> {
    let id = parse_id(&id, "school")?;

    let school = state
        .schools
        .update_school(id, payload)
        .await?
        .ok_or_else(|| ApiError::not_found("School"))?;

    tracing::info!("Successfully updated school with id: {}", id);
    Ok(Json(school))
}

/// Handler for DELETE /api/schools/{id}
#[utoipa::path(
    delete,
    path = "/api/schools/{id}",
    params(("id" = String, Path, description = "School ID")),
    responses(
        (status = 200, description = "School deleted", body = MessageResponse),
        (status = 404, description = "School not found", body = String)
    ),
    security(("bearer_auth" = [])),
    tag = "schools"
)]
pub async fn delete_school_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "school")?;

    if !state.schools.delete_school(id).await? {
        return Err(ApiError::not_found("School"));
    }

    tracing::info!("Successfully deleted school with id: {}", id);
    Ok(Json(MessageResponse::new("School deleted successfully")))
}
