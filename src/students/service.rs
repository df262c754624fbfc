use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::{
    middleware::AuthenticatedUser,
    models::Role,
    policy::{ACCESS_DENIED, SCHOOL_STAFF},
};
use crate::classrooms::models::Classroom;
use crate::error::ApiError;
use crate::store::{ClassroomStore, StudentStore};
use crate::students::models::{
    CreateStudentRequest, NewStudent, Student, StudentChanges, UpdateStudentRequest,
};

pub const STUDENT_TENANCY: &str =
    "Forbidden: You can only manage students within your assigned school";

/// Student operations. A student's school is the school of its classroom.
pub struct StudentService {
    students: Arc<dyn StudentStore>,
    classrooms: Arc<dyn ClassroomStore>,
}

impl StudentService {
    pub fn new(students: Arc<dyn StudentStore>, classrooms: Arc<dyn ClassroomStore>) -> Self {
        Self {
            students,
            classrooms,
        }
    }

    pub async fn list(&self, caller: &AuthenticatedUser) -> Result<Vec<Student>, ApiError> {
        let scope = match caller.role {
            Role::SuperAdmin => None,
            Role::SchoolAdmin => Some(caller.school_id.ok_or_else(|| ApiError::forbidden(ACCESS_DENIED))?),
        };

        let students = self.students.list_students(scope).await?;
        debug!("Listed {} students for user {}", students.len(), caller.user_id);
        Ok(students)
    }

    pub async fn get(&self, caller: &AuthenticatedUser, id: Uuid) -> Result<Student, ApiError> {
        let student = self
            .students
            .find_student(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Student"))?;

        let classroom = self.classrooms.find_classroom(student.classroom_id).await?;
        self.check_access(caller, classroom.as_ref())?;

        Ok(student)
    }

    pub async fn create(
        &self,
        caller: &AuthenticatedUser,
        request: CreateStudentRequest,
    ) -> Result<Student, ApiError> {
        let classroom = self.destination(caller, &request.classroom).await?;

        let student = self
            .students
            .create_student(NewStudent {
                name: request.name.trim().to_string(),
                age: request.age,
                grade: request.grade.trim().to_string(),
                classroom_id: classroom.id,
            })
            .await?;

        info!("Created student {} in classroom {}", student.id, classroom.id);
        Ok(student)
    }

    /// Partial update. A transfer re-checks tenancy against the destination
    /// classroom's school.
    pub async fn update(
        &self,
        caller: &AuthenticatedUser,
        id: Uuid,
        request: UpdateStudentRequest,
    ) -> Result<Student, ApiError> {
        self.get(caller, id).await?;

        let classroom_id = match request.classroom.as_deref() {
            None => None,
            Some(raw) => Some(self.destination(caller, raw).await?.id),
        };

        let changes = StudentChanges {
            name: request.name.map(|n| n.trim().to_string()),
            age: request.age,
            grade: request.grade.map(|g| g.trim().to_string()),
            classroom_id,
        };

        let student = self
            .students
            .update_student(id, changes)
            .await?
            .ok_or_else(|| ApiError::not_found("Student"))?;

        info!("Updated student {}", id);
        Ok(student)
    }

    pub async fn delete(&self, caller: &AuthenticatedUser, id: Uuid) -> Result<(), ApiError> {
        self.get(caller, id).await?;

        if !self.students.delete_student(id).await? {
            return Err(ApiError::not_found("Student"));
        }

        info!("Deleted student {}", id);
        Ok(())
    }

    /// Resolve the classroom a student is placed in and check the caller may use it
    async fn destination(&self, caller: &AuthenticatedUser, raw: &str) -> Result<Classroom, ApiError> {
        let invalid = || ApiError::validation("Invalid classroom ID");

        let id = Uuid::parse_str(raw.trim()).map_err(|_| invalid())?;
        let classroom = self.classrooms.find_classroom(id).await?.ok_or_else(invalid)?;

        self.check_access(caller, Some(&classroom))?;
        Ok(classroom)
    }

    fn check_access(
        &self,
        caller: &AuthenticatedUser,
        classroom: Option<&Classroom>,
    ) -> Result<(), ApiError> {
        match classroom {
            Some(classroom) => caller
                .authorize(SCHOOL_STAFF, Some(classroom.school_id))
                .require(STUDENT_TENANCY),
            // Orphaned student: only superadmins can reach it
            None if caller.role == Role::SuperAdmin => Ok(()),
            None => {
                warn!("User {} denied access to a student without a classroom", caller.user_id);
                Err(ApiError::forbidden(STUDENT_TENANCY))
            }
        }
    }
}
