// Classrooms module
// Classroom CRUD restricted to the caller's school

pub mod handlers;
pub mod models;
pub mod service;

pub use handlers::{
    create_classroom_handler, delete_classroom_handler, get_classroom_handler,
    list_classrooms_handler, update_classroom_handler,
};
pub use models::{Classroom, CreateClassroomRequest, UpdateClassroomRequest};
pub use service::ClassroomService;
