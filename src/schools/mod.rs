// Schools module
// School CRUD for superadmins

pub mod handlers;
pub mod models;

pub use handlers::{
    create_school_handler, delete_school_handler, get_school_handler, list_schools_handler,
    update_school_handler,
};
pub use models::{CreateSchool, School, UpdateSchool};
