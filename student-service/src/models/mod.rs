mod student;

pub use student::{DeleteOutcome, InsertOutcome, Student, UpdateOutcome};
