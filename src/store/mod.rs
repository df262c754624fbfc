// Storage module
// One async trait per entity, backed by PostgreSQL (PgStore) or process
// memory (MemoryStore). References are checked by the services before
// writing, not here.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::{
    models::{NewUser, User},
    password::PasswordDigest,
};
use crate::classrooms::models::{Classroom, ClassroomChanges, NewClassroom};
use crate::error::ApiError;
use crate::schools::models::{CreateSchool, School, UpdateSchool};
use crate::students::models::{NewStudent, Student, StudentChanges};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Email is already registered")]
    DuplicateEmail,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => ApiError::validation(err.to_string()),
            StoreError::Database(_) | StoreError::Corrupt(_) => ApiError::internal(err.to_string()),
        }
    }
}

/// Credential store
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;
    /// Case-insensitive lookup
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn update_password(
        &self,
        id: Uuid,
        digest: &PasswordDigest,
    ) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait SchoolStore: Send + Sync {
    async fn list_schools(&self) -> Result<Vec<School>, StoreError>;
    async fn find_school(&self, id: Uuid) -> Result<Option<School>, StoreError>;
    async fn create_school(&self, school: CreateSchool) -> Result<School, StoreError>;
    async fn update_school(
        &self,
        id: Uuid,
        changes: UpdateSchool,
    ) -> Result<Option<School>, StoreError>;
    /// Returns false when nothing was deleted
    async fn delete_school(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait ClassroomStore: Send + Sync {
    /// All classrooms, or only those of `school` when given
    async fn list_classrooms(&self, school: Option<Uuid>) -> Result<Vec<Classroom>, StoreError>;
    async fn find_classroom(&self, id: Uuid) -> Result<Option<Classroom>, StoreError>;
    async fn create_classroom(&self, classroom: NewClassroom) -> Result<Classroom, StoreError>;
    async fn update_classroom(
        &self,
        id: Uuid,
        changes: ClassroomChanges,
    ) -> Result<Option<Classroom>, StoreError>;
    async fn delete_classroom(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait StudentStore: Send + Sync {
    /// All students, or only those enrolled in classrooms of `school`
    async fn list_students(&self, school: Option<Uuid>) -> Result<Vec<Student>, StoreError>;
    async fn find_student(&self, id: Uuid) -> Result<Option<Student>, StoreError>;
    async fn create_student(&self, student: NewStudent) -> Result<Student, StoreError>;
    async fn update_student(
        &self,
        id: Uuid,
        changes: StudentChanges,
    ) -> Result<Option<Student>, StoreError>;
    async fn delete_student(&self, id: Uuid) -> Result<bool, StoreError>;
}
