// Students module
// Student CRUD; tenancy follows the student's classroom

pub mod handlers;
pub mod models;
pub mod service;

pub use handlers::{
    create_student_handler, delete_student_handler, get_student_handler, list_students_handler,
    update_student_handler,
};
pub use models::{CreateStudentRequest, Student, UpdateStudentRequest};
pub use service::StudentService;
