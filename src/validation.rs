// Validation utilities module
// Request body extraction with field validation, plus domain-specific rules

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::auth::models::Role;
use crate::error::ApiError;

/// Validates that a role is one of the accepted values
/// Valid values: "superadmin", "schooladmin"
pub fn validate_role(role: &str) -> Result<(), ValidationError> {
    if role.parse::<Role>().is_ok() {
        Ok(())
    } else {
        let mut err = ValidationError::new("invalid_role");
        err.message = Some("Invalid role. Must be one of: superadmin, schooladmin".into());
        Err(err)
    }
}

/// Rejects values that are empty once surrounding whitespace is removed
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Parse a path identifier, reporting `Invalid <resource> ID format` on failure
pub fn parse_id(raw: &str, resource: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ApiError::validation(format!("Invalid {} ID format", resource)))
}

/// First validation message, looking at fields in name order
fn first_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    fields
        .into_iter()
        .find_map(|(field, errors)| {
            errors.first().map(|error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .unwrap_or_else(|| "Invalid request body".to_string())
}

fn rejection_message(rejection: &JsonRejection) -> String {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return "Missing 'Content-Type: application/json' header".to_string();
    }

    let text = rejection.body_text();
    if let Some(rest) = text.split("missing field `").nth(1) {
        let field = rest.split('`').next().unwrap_or("unknown");
        return format!("{} is required", field);
    }
    if text.contains("invalid type") {
        return "Invalid field type in request".to_string();
    }

    "Invalid request body".to_string()
}

/// JSON body extractor that runs `validator` rules before the handler sees
/// the value. Every failure is a 400 with a single message.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::validation(rejection_message(&rejection)))?;

        value
            .validate()
            .map_err(|errors| ApiError::validation(first_message(&errors)))?;

        Ok(ValidatedJson(value))
    }
}
