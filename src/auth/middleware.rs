// Authentication middleware for protected routes

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::{
    models::Role,
    policy::{self, AccessContext, Decision, SCHOOL_STAFF, SUPERADMIN_ONLY},
};
use crate::error::ApiError;
use crate::AppState;

const NO_TOKEN: &str = "Unauthorized: No token provided or invalid format";
const USER_NOT_FOUND: &str = "Unauthorized: User not found";

/// The caller behind a verified bearer token, as currently stored
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub school_id: Option<Uuid>,
}

impl AuthenticatedUser {
    /// Evaluate the access policy for this caller against a resource owned
    /// by `resource_school` (or a plain role gate when `None`)
    pub fn authorize(&self, allowed_roles: &[Role], resource_school: Option<Uuid>) -> Decision {
        policy::authorize(&AccessContext {
            caller_role: self.role,
            caller_school: self.school_id,
            allowed_roles,
            resource_school,
        })
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Unauthenticated(NO_TOKEN.to_string()))
}

/// Verify the bearer token and load its user
async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthenticatedUser, ApiError> {
    let token = bearer_token(headers)?;
    let claims = state.tokens.validate_access_token(token)?;

    let user = state
        .users
        .find_user_by_id(claims.sub)
        .await?
        .ok_or_else(|| {
            warn!("Token presented for unknown user: {}", claims.sub);
            ApiError::Unauthenticated(USER_NOT_FOUND.to_string())
        })?;

    Ok(AuthenticatedUser {
        user_id: user.id,
        email: user.email,
        role: user.role,
        school_id: user.school_id,
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Already resolved by a role gate
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(user.clone());
        }

        let state = AppState::from_ref(state);
        authenticate(&state, &parts.headers).await
    }
}

async fn gate(
    state: &AppState,
    mut request: Request,
    next: Next,
    allowed_roles: &[Role],
) -> Result<Response, ApiError> {
    let endpoint = request.uri().path().to_string();
    let user = authenticate(state, request.headers()).await?;

    if !user.authorize(allowed_roles, None).is_allowed() {
        warn!(
            "Authorization failed: user_id={}, role={}, endpoint={}",
            user.user_id, user.role, endpoint
        );
        return Err(ApiError::forbidden(policy::ACCESS_DENIED));
    }

    debug!(
        "Authorization successful: user_id={}, role={}, endpoint={}",
        user.user_id, user.role, endpoint
    );
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Route layer admitting superadmins only
pub async fn require_superadmin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    gate(&state, request, next, SUPERADMIN_ONLY).await
}

/// Route layer admitting both administrator roles; tenancy is checked per
/// resource by the services
pub async fn require_school_staff(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    gate(&state, request, next, SCHOOL_STAFF).await
}
