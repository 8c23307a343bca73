//! student-service: HTTP CRUD gateway over a MongoDB collection of student
//! records.
pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

pub use startup::{build_router, AppState, Application};
