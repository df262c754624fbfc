use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::validate_not_blank;

/// A school record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub id: Uuid,
    #[schema(example = "Springfield Elementary")]
    pub name: String,
    #[schema(example = "Springfield")]
    pub location: String,
    #[schema(example = "Seymour Skinner")]
    pub principal: String,
    pub admin: String,
    #[schema(example = "19 Plympton Street")]
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to create a school. All fields are required.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSchool {
    #[validate(custom(function = "validate_not_blank", message = "All fields (name, location, principal, admin, address) are required"))]
    pub name: String,
    #[validate(custom(function = "validate_not_blank", message = "All fields (name, location, principal, admin, address) are required"))]
    pub location: String,
    #[validate(custom(function = "validate_not_blank", message = "All fields (name, location, principal, admin, address) are required"))]
    pub principal: String,
    #[validate(custom(function = "validate_not_blank", message = "All fields (name, location, principal, admin, address) are required"))]
    pub admin: String,
    #[validate(custom(function = "validate_not_blank", message = "All fields (name, location, principal, admin, address) are required"))]
    pub address: String,
}

/// Partial update for a school; omitted fields keep their value
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSchool {
    #[validate(custom(function = "validate_not_blank", message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_not_blank", message = "location must not be empty"))]
    pub location: Option<String>,
    #[validate(custom(function = "validate_not_blank", message = "principal must not be empty"))]
    pub principal: Option<String>,
    #[validate(custom(function = "validate_not_blank", message = "admin must not be empty"))]
    pub admin: Option<String>,
    #[validate(custom(function = "validate_not_blank", message = "address must not be empty"))]
    pub address: Option<String>,
}
