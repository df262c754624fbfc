// Authentication service - business logic layer

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::{
    error::AuthError,
    models::{normalize_email, LoginRequest, NewUser, RegisterRequest, Role, User},
    password::{PasswordDigest, PasswordService},
    token::TokenService,
};
use crate::error::ApiError;
use crate::store::{SchoolStore, StoreError, UserStore};

/// Authentication service coordinating registration, login and password changes
pub struct AuthService {
    users: Arc<dyn UserStore>,
    schools: Arc<dyn SchoolStore>,
    tokens: Arc<TokenService>,
}

/// Argon2 is CPU-bound; keep it off the async workers
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::internal(format!("password task failed: {}", e)))?
        .map_err(ApiError::from)
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        schools: Arc<dyn SchoolStore>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            schools,
            tokens,
        }
    }

    /// Register a new administrator account.
    ///
    /// School administrators must reference an existing school. A school
    /// supplied for a superadmin is ignored.
    pub async fn register(&self, request: RegisterRequest) -> Result<Uuid, ApiError> {
        let role: Role = request.role.parse()?;

        let school_id = match role {
            Role::SuperAdmin => None,
            Role::SchoolAdmin => Some(self.resolve_school(request.school_id.as_deref()).await?),
        };

        let email = normalize_email(&request.email);
        if self.users.find_user_by_email(&email).await?.is_some() {
            warn!("Registration attempted with existing email");
            return Err(StoreError::DuplicateEmail.into());
        }

        let password = request.password;
        let digest = blocking(move || PasswordService::hash_password(&password)).await?;

        let user = self
            .users
            .create_user(NewUser::new(&request.name, &email, digest, role, school_id))
            .await?;

        info!("Registered user {} with role {}", user.id, user.role);
        Ok(user.id)
    }

    async fn resolve_school(&self, supplied: Option<&str>) -> Result<Uuid, ApiError> {
        let raw = supplied
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ApiError::validation("School ID is required for school administrators"))?;

        let id = Uuid::parse_str(raw).map_err(|_| ApiError::validation("Invalid school ID"))?;

        match self.schools.find_school(id).await? {
            Some(school) => Ok(school.id),
            None => Err(ApiError::validation("Invalid school ID")),
        }
    }

    /// Check credentials and issue an access token.
    ///
    /// Unknown emails and wrong passwords fail identically.
    pub async fn login(&self, request: LoginRequest) -> Result<String, ApiError> {
        let email = normalize_email(&request.email);

        let Some(user) = self.users.find_user_by_email(&email).await? else {
            debug!("Login for unknown email");
            return Err(ApiError::InvalidCredentials);
        };

        let password = request.password;
        let digest = user.password_hash.clone();
        let matches = blocking(move || PasswordService::verify_password(&password, &digest)).await?;

        if !matches {
            return Err(ApiError::InvalidCredentials);
        }

        let token = self.tokens.generate_access_token(user.id, user.role)?;
        info!("User {} logged in", user.id);
        Ok(token)
    }

    /// Replace a user's password. A value that is already a digest is
    /// stored as-is; plaintext is hashed first.
    pub async fn update_password(&self, user_id: Uuid, incoming: String) -> Result<User, ApiError> {
        let digest: PasswordDigest = blocking(move || PasswordService::prepare(&incoming)).await?;

        self.users
            .update_password(user_id, &digest)
            .await?
            .ok_or_else(|| ApiError::not_found("User"))
    }
}
