use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::validate_not_blank;

/// A classroom record; always owned by exactly one school
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Classroom {
    pub id: Uuid,
    #[schema(example = "Math 101")]
    pub name: String,
    #[schema(example = 30, minimum = 1)]
    pub capacity: i32,
    #[serde(rename = "school")]
    pub school_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for POST /api/classrooms
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateClassroomRequest {
    #[validate(custom(function = "validate_not_blank", message = "All fields (name, capacity) are required"))]
    pub name: String,
    #[validate(range(min = 1, message = "Capacity must be a positive number"))]
    pub capacity: i32,
    /// Target school. Superadmins must supply it; school administrators
    /// may only repeat their own school.
    pub school: Option<String>,
}

/// Request body for PUT /api/classrooms/{id}
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateClassroomRequest {
    #[validate(custom(function = "validate_not_blank", message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(range(min = 1, message = "Capacity must be a positive number"))]
    pub capacity: Option<i32>,
    /// Move the classroom to another school
    pub school: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewClassroom {
    pub name: String,
    pub capacity: i32,
    pub school_id: Uuid,
}

/// Resolved changes for an existing classroom
#[derive(Debug, Clone, Default)]
pub struct ClassroomChanges {
    pub name: Option<String>,
    pub capacity: Option<i32>,
    pub school_id: Option<Uuid>,
}
