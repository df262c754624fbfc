// In-process repositories used for local runs and the test suite

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::{
    models::{NewUser, User},
    password::PasswordDigest,
};
use crate::classrooms::models::{Classroom, ClassroomChanges, NewClassroom};
use crate::schools::models::{CreateSchool, School, UpdateSchool};
use crate::store::{ClassroomStore, SchoolStore, StoreError, StudentStore, UserStore};
use crate::students::models::{NewStudent, Student, StudentChanges};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    schools: HashMap<Uuid, School>,
    classrooms: HashMap<Uuid, Classroom>,
    students: HashMap<Uuid, Student>,
}

/// Every table behind a single lock; each call is atomic on its own
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Insertion order, as the SQL store returns it
fn sorted<T>(
    rows: impl Iterator<Item = T>,
    key: impl Fn(&T) -> (chrono::DateTime<Utc>, Uuid),
) -> Vec<T> {
    let mut rows: Vec<T> = rows.collect();
    rows.sort_by_key(key);
    rows
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(StoreError::DuplicateEmail);
        }

        let stored = User {
            id: user.id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash.into_string(),
            role: user.role,
            school_id: user.school_id,
            created_at: Utc::now(),
        };
        tables.users.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn update_password(
        &self,
        id: Uuid,
        digest: &PasswordDigest,
    ) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(&id).map(|user| {
            user.password_hash = digest.as_str().to_string();
            user.clone()
        }))
    }
}

#[async_trait]
impl SchoolStore for MemoryStore {
    async fn list_schools(&self) -> Result<Vec<School>, StoreError> {
        let tables = self.tables.read().await;
        Ok(sorted(tables.schools.values().cloned(), |s| (s.created_at, s.id)))
    }

    async fn find_school(&self, id: Uuid) -> Result<Option<School>, StoreError> {
        Ok(self.tables.read().await.schools.get(&id).cloned())
    }

    async fn create_school(&self, school: CreateSchool) -> Result<School, StoreError> {
        let now = Utc::now();
        let stored = School {
            id: Uuid::new_v4(),
            name: school.name,
            location: school.location,
            principal: school.principal,
            admin: school.admin,
            address: school.address,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.schools.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_school(
        &self,
        id: Uuid,
        changes: UpdateSchool,
    ) -> Result<Option<School>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(school) = tables.schools.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            school.name = name;
        }
        if let Some(location) = changes.location {
            school.location = location;
        }
        if let Some(principal) = changes.principal {
            school.principal = principal;
        }
        if let Some(admin) = changes.admin {
            school.admin = admin;
        }
        if let Some(address) = changes.address {
            school.address = address;
        }
        school.updated_at = Utc::now();

        Ok(Some(school.clone()))
    }

    async fn delete_school(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.schools.remove(&id).is_some())
    }
}

#[async_trait]
impl ClassroomStore for MemoryStore {
    async fn list_classrooms(&self, school: Option<Uuid>) -> Result<Vec<Classroom>, StoreError> {
        let tables = self.tables.read().await;
        let rows = tables
            .classrooms
            .values()
            .filter(|c| school.map_or(true, |s| c.school_id == s))
            .cloned();
        Ok(sorted(rows, |c| (c.created_at, c.id)))
    }

    async fn find_classroom(&self, id: Uuid) -> Result<Option<Classroom>, StoreError> {
        Ok(self.tables.read().await.classrooms.get(&id).cloned())
    }

    async fn create_classroom(&self, classroom: NewClassroom) -> Result<Classroom, StoreError> {
        let now = Utc::now();
        let stored = Classroom {
            id: Uuid::new_v4(),
            name: classroom.name,
            capacity: classroom.capacity,
            school_id: classroom.school_id,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.classrooms.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_classroom(
        &self,
        id: Uuid,
        changes: ClassroomChanges,
    ) -> Result<Option<Classroom>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(classroom) = tables.classrooms.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            classroom.name = name;
        }
        if let Some(capacity) = changes.capacity {
            classroom.capacity = capacity;
        }
        if let Some(school_id) = changes.school_id {
            classroom.school_id = school_id;
        }
        classroom.updated_at = Utc::now();

        Ok(Some(classroom.clone()))
    }

    async fn delete_classroom(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.classrooms.remove(&id).is_some())
    }
}

#[async_trait]
impl StudentStore for MemoryStore {
    async fn list_students(&self, school: Option<Uuid>) -> Result<Vec<Student>, StoreError> {
        let tables = self.tables.read().await;
        let rows = tables
            .students
            .values()
            .filter(|s| match school {
                None => true,
                Some(school) => tables
                    .classrooms
                    .get(&s.classroom_id)
                    .is_some_and(|c| c.school_id == school),
            })
            .cloned();
        Ok(sorted(rows, |s| (s.created_at, s.id)))
    }

    async fn find_student(&self, id: Uuid) -> Result<Option<Student>, StoreError> {
        Ok(self.tables.read().await.students.get(&id).cloned())
    }

    async fn create_student(&self, student: NewStudent) -> Result<Student, StoreError> {
        let now = Utc::now();
        let stored = Student {
            id: Uuid::new_v4(),
            name: student.name,
            age: student.age,
            grade: student.grade,
            classroom_id: student.classroom_id,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.students.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_student(
        &self,
        id: Uuid,
        changes: StudentChanges,
    ) -> Result<Option<Student>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(student) = tables.students.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            student.name = name;
        }
        if let Some(age) = changes.age {
            student.age = age;
        }
        if let Some(grade) = changes.grade {
            student.grade = grade;
        }
        if let Some(classroom_id) = changes.classroom_id {
            student.classroom_id = classroom_id;
        }
        student.updated_at = Utc::now();

        Ok(Some(student.clone()))
    }

    async fn delete_student(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.students.remove(&id).is_some())
    }
}
