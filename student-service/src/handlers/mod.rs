pub mod health;
pub mod students;

pub use health::{greeting, health_check, metrics_endpoint, readiness_check};
pub use students::{delete_student, get_student, list_students, register_student, update_student};
