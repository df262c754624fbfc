// Access policy
// Role and tenancy authorization as a pure function of an AccessContext.
// Callers load the existing resource first and pass its school, never one
// taken from the request body.

use uuid::Uuid;

use crate::auth::models::Role;
use crate::error::ApiError;

/// Routes restricted to platform administrators
pub const SUPERADMIN_ONLY: &[Role] = &[Role::SuperAdmin];

/// Routes open to both administrator roles, subject to tenancy
pub const SCHOOL_STAFF: &[Role] = &[Role::SuperAdmin, Role::SchoolAdmin];

pub const ACCESS_DENIED: &str = "Forbidden: Access denied";

#[derive(Debug, Clone, Copy)]
pub struct AccessContext<'a> {
    pub caller_role: Role,
    pub caller_school: Option<Uuid>,
    pub allowed_roles: &'a [Role],
    /// Owning school of the target resource; `None` for a route-level check
    pub resource_school: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// The caller's role is not admitted by the route
    RoleNotAllowed,
    /// The resource belongs to a school other than the caller's
    OutsideTenancy,
}

pub fn authorize(ctx: &AccessContext<'_>) -> Decision {
    if !ctx.allowed_roles.contains(&ctx.caller_role) {
        return Decision::Deny(Denial::RoleNotAllowed);
    }

    match (ctx.caller_role, ctx.resource_school) {
        (Role::SuperAdmin, _) => Decision::Allow,
        (Role::SchoolAdmin, None) => Decision::Allow,
        (Role::SchoolAdmin, Some(resource_school)) => {
            if ctx.caller_school == Some(resource_school) {
                Decision::Allow
            } else {
                Decision::Deny(Denial::OutsideTenancy)
            }
        }
    }
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Turn the decision into a result; `tenancy_message` is reported for
    /// cross-school denials.
    pub fn require(self, tenancy_message: &str) -> Result<(), ApiError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(Denial::RoleNotAllowed) => Err(ApiError::forbidden(ACCESS_DENIED)),
            Decision::Deny(Denial::OutsideTenancy) => Err(ApiError::forbidden(tenancy_message)),
        }
    }
}

/// Decide which school a new classroom belongs to.
///
/// Superadmins must name a well-formed school id. School administrators
/// always get their own school; naming any other school is forbidden.
pub fn resolve_classroom_school(
    caller_role: Role,
    caller_school: Option<Uuid>,
    supplied: Option<&str>,
) -> Result<Uuid, ApiError> {
    let supplied = supplied.map(str::trim).filter(|s| !s.is_empty());

    match caller_role {
        Role::SuperAdmin => {
            let raw = supplied.ok_or_else(|| ApiError::validation("School ID is required"))?;
            Uuid::parse_str(raw).map_err(|_| ApiError::validation("Invalid school ID format"))
        }
        Role::SchoolAdmin => {
            let own = caller_school.ok_or_else(|| ApiError::forbidden(ACCESS_DENIED))?;
            match supplied {
                None => Ok(own),
                Some(raw) if Uuid::parse_str(raw).ok() == Some(own) => Ok(own),
                Some(_) => Err(ApiError::forbidden(
                    "Forbidden: You can only create classrooms for your assigned school",
                )),
            }
        }
    }
}
