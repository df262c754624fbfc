// PostgreSQL-backed repositories

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::auth::{
    models::{NewUser, Role, User},
    password::PasswordDigest,
};
use crate::classrooms::models::{Classroom, ClassroomChanges, NewClassroom};
use crate::schools::models::{CreateSchool, School, UpdateSchool};
use crate::store::{ClassroomStore, SchoolStore, StoreError, StudentStore, UserStore};
use crate::students::models::{NewStudent, Student, StudentChanges};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, school_id, created_at";
const SCHOOL_COLUMNS: &str = "id, name, location, principal, admin, address, created_at, updated_at";
const CLASSROOM_COLUMNS: &str = "id, name, capacity, school_id, created_at, updated_at";
const STUDENT_COLUMNS: &str = "id, name, age, grade, classroom_id, created_at, updated_at";

/// Repository over a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Users row as stored; the role column is plain text
#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    school_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|_| StoreError::Corrupt(format!("user {} has role '{}'", row.id, row.role)))?;

        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            school_id: row.school_id,
            created_at: row.created_at,
        })
    }
}

fn into_user(row: Option<UserRow>) -> Result<Option<User>, StoreError> {
    row.map(User::try_from).transpose()
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (id, name, email, password_hash, role, school_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.password_hash.as_str())
        .bind(user.role.as_str())
        .bind(user.school_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Check for unique constraint violation
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return StoreError::DuplicateEmail;
                }
            }
            StoreError::from(e)
        })?;

        row.try_into()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        into_user(row)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        into_user(row)
    }

    async fn update_password(
        &self,
        id: Uuid,
        digest: &PasswordDigest,
    ) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET password_hash = $2 WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(digest.as_str())
        .fetch_optional(&self.pool)
        .await?;

        into_user(row)
    }
}

#[async_trait]
impl SchoolStore for PgStore {
    async fn list_schools(&self) -> Result<Vec<School>, StoreError> {
        let schools = sqlx::query_as::<_, School>(&format!(
            "SELECT {SCHOOL_COLUMNS} FROM schools ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(schools)
    }

    async fn find_school(&self, id: Uuid) -> Result<Option<School>, StoreError> {
        let school = sqlx::query_as::<_, School>(&format!(
            "SELECT {SCHOOL_COLUMNS} FROM schools WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(school)
    }

    async fn create_school(&self, school: CreateSchool) -> Result<School, StoreError> {
        let school = sqlx::query_as::<_, School>(&format!(
            "INSERT INTO schools (id, name, location, principal, admin, address) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {SCHOOL_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(school.name)
        .bind(school.location)
        .bind(school.principal)
        .bind(school.admin)
        .bind(school.address)
        .fetch_one(&self.pool)
        .await?;

        Ok(school)
    }

    async fn update_school(
        &self,
        id: Uuid,
        changes: UpdateSchool,
    ) -> Result<Option<School>, StoreError> {
        // Omitted fields keep their current value
        let school = sqlx::query_as::<_, School>(&format!(
            r#"
            UPDATE schools
            SET name = COALESCE($2, name),
                location = COALESCE($3, location),
                principal = COALESCE($4, principal),
                admin = COALESCE($5, admin),
                address = COALESCE($6, address),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SCHOOL_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.location)
        .bind(changes.principal)
        .bind(changes.admin)
        .bind(changes.address)
        .fetch_optional(&self.pool)
        .await?;

        Ok(school)
    }

    async fn delete_school(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM schools WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ClassroomStore for PgStore {
    async fn list_classrooms(&self, school: Option<Uuid>) -> Result<Vec<Classroom>, StoreError> {
        let classrooms = sqlx::query_as::<_, Classroom>(&format!(
            "SELECT {CLASSROOM_COLUMNS} FROM classrooms \
             WHERE ($1::uuid IS NULL OR school_id = $1) ORDER BY created_at, id"
        ))
        .bind(school)
        .fetch_all(&self.pool)
        .await?;

        Ok(classrooms)
    }

    async fn find_classroom(&self, id: Uuid) -> Result<Option<Classroom>, StoreError> {
        let classroom = sqlx::query_as::<_, Classroom>(&format!(
            "SELECT {CLASSROOM_COLUMNS} FROM classrooms WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(classroom)
    }

    async fn create_classroom(&self, classroom: NewClassroom) -> Result<Classroom, StoreError> {
        let classroom = sqlx::query_as::<_, Classroom>(&format!(
            "INSERT INTO classrooms (id, name, capacity, school_id) \
             VALUES ($1, $2, $3, $4) RETURNING {CLASSROOM_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(classroom.name)
        .bind(classroom.capacity)
        .bind(classroom.school_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(classroom)
    }

    async fn update_classroom(
        &self,
        id: Uuid,
        changes: ClassroomChanges,
    ) -> Result<Option<Classroom>, StoreError> {
        let classroom = sqlx::query_as::<_, Classroom>(&format!(
            r#"
            UPDATE classrooms
            SET name = COALESCE($2, name),
                capacity = COALESCE($3, capacity),
                school_id = COALESCE($4, school_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {CLASSROOM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.capacity)
        .bind(changes.school_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(classroom)
    }

    async fn delete_classroom(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM classrooms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl StudentStore for PgStore {
    async fn list_students(&self, school: Option<Uuid>) -> Result<Vec<Student>, StoreError> {
        let students = sqlx::query_as::<_, Student>(
            r#"
            SELECT s.id, s.name, s.age, s.grade, s.classroom_id, s.created_at, s.updated_at
            FROM students s
            LEFT JOIN classrooms c ON c.id = s.classroom_id
            WHERE ($1::uuid IS NULL OR c.school_id = $1)
            ORDER BY s.created_at, s.id
            "#,
        )
        .bind(school)
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    async fn find_student(&self, id: Uuid) -> Result<Option<Student>, StoreError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    async fn create_student(&self, student: NewStudent) -> Result<Student, StoreError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "INSERT INTO students (id, name, age, grade, classroom_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(student.name)
        .bind(student.age)
        .bind(student.grade)
        .bind(student.classroom_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(student)
    }

    async fn update_student(
        &self,
        id: Uuid,
        changes: StudentChanges,
    ) -> Result<Option<Student>, StoreError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            r#"
            UPDATE students
            SET name = COALESCE($2, name),
                age = COALESCE($3, age),
                grade = COALESCE($4, grade),
                classroom_id = COALESCE($5, classroom_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {STUDENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.age)
        .bind(changes.grade)
        .bind(changes.classroom_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    async fn delete_student(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
