use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::validate_not_blank;

/// A student record; always enrolled in exactly one classroom
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: Uuid,
    #[schema(example = "Bart Simpson")]
    pub name: String,
    #[schema(example = 10, minimum = 1)]
    pub age: i32,
    #[schema(example = "4th")]
    pub grade: String,
    #[serde(rename = "classroom")]
    pub classroom_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for POST /api/students
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStudentRequest {
    #[validate(custom(function = "validate_not_blank", message = "Name, age, grade, and classroom ID are required"))]
    pub name: String,
    #[validate(range(min = 1, message = "Age must be a positive number"))]
    pub age: i32,
    #[validate(custom(function = "validate_not_blank", message = "Name, age, grade, and classroom ID are required"))]
    pub grade: String,
    #[validate(custom(function = "validate_not_blank", message = "Name, age, grade, and classroom ID are required"))]
    pub classroom: String,
}

/// Request body for PUT /api/students/{id}
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentRequest {
    #[validate(custom(function = "validate_not_blank", message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(range(min = 1, message = "Age must be a positive number"))]
    pub age: Option<i32>,
    #[validate(custom(function = "validate_not_blank", message = "grade must not be empty"))]
    pub grade: Option<String>,
    /// Transfer the student to another classroom
    pub classroom: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewStudent {
    pub name: String,
    pub age: i32,
    pub grade: String,
    pub classroom_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct StudentChanges {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub grade: Option<String>,
    pub classroom_id: Option<Uuid>,
}
