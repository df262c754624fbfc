// Authentication module
// JWT-based authentication, password hashing and the role/tenancy access policy

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod policy;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::{login_handler, register_handler};
pub use middleware::{require_school_staff, require_superadmin, AuthenticatedUser};
pub use models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, Role, User};
pub use service::AuthService;
