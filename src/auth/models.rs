// Authentication data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{error::AuthError, password::PasswordDigest};
use crate::validation::{validate_not_blank, validate_role};

/// Role carried by every user account and every access token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Unrestricted cross-school access
    SuperAdmin,
    /// Scoped to exactly one school
    SchoolAdmin,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::SuperAdmin, Role::SchoolAdmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "superadmin",
            Role::SchoolAdmin => "schooladmin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "superadmin" => Ok(Role::SuperAdmin),
            "schooladmin" => Ok(Role::SchoolAdmin),
            other => Err(AuthError::InvalidRole(other.to_string())),
        }
    }
}

/// Stored user identity record
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub school_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// A user about to be inserted. The password is always a digest.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: PasswordDigest,
    pub role: Role,
    pub school_id: Option<Uuid>,
}

impl NewUser {
    /// Build a user record. Email is normalised to lower case and the school
    /// affiliation is only kept for school administrators.
    pub fn new(
        name: &str,
        email: &str,
        password_hash: PasswordDigest,
        role: Role,
        school_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            email: normalize_email(email),
            password_hash,
            role,
            school_id: match role {
                Role::SchoolAdmin => school_id,
                Role::SuperAdmin => None,
            },
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Registration request DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(custom(
        function = "validate_not_blank",
        message = "All fields (name, email, password, role) are required"
    ))]
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[validate(email(message = "Email must be a valid email address"))]
    #[schema(example = "jane@school.org")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(custom = "validate_role")]
    #[schema(example = "schooladmin")]
    pub role: String,
    /// Required when role is `schooladmin`
    #[serde(rename = "schoolId")]
    pub school_id: Option<String>,
}

/// Login request DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email and password are required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Email and password are required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}
