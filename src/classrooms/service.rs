use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::{
    middleware::AuthenticatedUser,
    models::Role,
    policy::{resolve_classroom_school, ACCESS_DENIED, SCHOOL_STAFF},
};
use crate::classrooms::models::{
    Classroom, ClassroomChanges, CreateClassroomRequest, NewClassroom, UpdateClassroomRequest,
};
use crate::error::ApiError;
use crate::store::{ClassroomStore, SchoolStore};

pub const CLASSROOM_TENANCY: &str =
    "Forbidden: You can only access classrooms within your assigned school";

/// Classroom operations, scoped by the caller's school
pub struct ClassroomService {
    classrooms: Arc<dyn ClassroomStore>,
    schools: Arc<dyn SchoolStore>,
}

impl ClassroomService {
    pub fn new(classrooms: Arc<dyn ClassroomStore>, schools: Arc<dyn SchoolStore>) -> Self {
        Self { classrooms, schools }
    }

    /// Superadmins see every classroom; school administrators see their own school's
    pub async fn list(&self, caller: &AuthenticatedUser) -> Result<Vec<Classroom>, ApiError> {
        let scope = match caller.role {
            Role::SuperAdmin => None,
            Role::SchoolAdmin => Some(caller.school_id.ok_or_else(|| ApiError::forbidden(ACCESS_DENIED))?),
        };

        let classrooms = self.classrooms.list_classrooms(scope).await?;
        debug!("Listed {} classrooms for user {}", classrooms.len(), caller.user_id);
        Ok(classrooms)
    }

    /// Fetch a classroom the caller may access
    pub async fn get(&self, caller: &AuthenticatedUser, id: Uuid) -> Result<Classroom, ApiError> {
        let classroom = self
            .classrooms
            .find_classroom(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Classroom"))?;

        caller
            .authorize(SCHOOL_STAFF, Some(classroom.school_id))
            .require(CLASSROOM_TENANCY)?;

        Ok(classroom)
    }

    pub async fn create(
        &self,
        caller: &AuthenticatedUser,
        request: CreateClassroomRequest,
    ) -> Result<Classroom, ApiError> {
        let school_id =
            resolve_classroom_school(caller.role, caller.school_id, request.school.as_deref())?;
        self.ensure_school_exists(school_id).await?;

        let classroom = self
            .classrooms
            .create_classroom(NewClassroom {
                name: request.name.trim().to_string(),
                capacity: request.capacity,
                school_id,
            })
            .await?;

        info!("Created classroom {} in school {}", classroom.id, school_id);
        Ok(classroom)
    }

    /// Partial update. Moving to another school re-checks tenancy against
    /// the destination.
    pub async fn update(
        &self,
        caller: &AuthenticatedUser,
        id: Uuid,
        request: UpdateClassroomRequest,
    ) -> Result<Classroom, ApiError> {
        self.get(caller, id).await?;

        let school_id = match request.school.as_deref() {
            None => None,
            Some(raw) => {
                let destination = Uuid::parse_str(raw.trim())
                    .map_err(|_| ApiError::validation("Invalid school ID format"))?;
                caller
                    .authorize(SCHOOL_STAFF, Some(destination))
                    .require(CLASSROOM_TENANCY)?;
                self.ensure_school_exists(destination).await?;
                Some(destination)
            }
        };

        let changes = ClassroomChanges {
            name: request.name.map(|n| n.trim().to_string()),
            capacity: request.capacity,
            school_id,
        };

        let classroom = self
            .classrooms
            .update_classroom(id, changes)
            .await?
            .ok_or_else(|| ApiError::not_found("Classroom"))?;

        info!("Updated classroom {}", id);
        Ok(classroom)
    }

    pub async fn delete(&self, caller: &AuthenticatedUser, id: Uuid) -> Result<(), ApiError> {
        self.get(caller, id).await?;

        if !self.classrooms.delete_classroom(id).await? {
            return Err(ApiError::not_found("Classroom"));
        }

        info!("Deleted classroom {}", id);
        Ok(())
    }

    async fn ensure_school_exists(&self, school_id: Uuid) -> Result<(), ApiError> {
        match self.schools.find_school(school_id).await? {
            Some(_) => Ok(()),
            None => Err(ApiError::validation("School not found")),
        }
    }
}
