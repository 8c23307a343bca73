//! Storage gateway for student records.
//!
//! Handlers reach the document store only through [`StudentStore`]. Every
//! data operation is a single store call bounded by its own deadline.

use crate::models::{DeleteOutcome, InsertOutcome, Student, UpdateOutcome};
use async_trait::async_trait;
use service_core::error::AppError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("student not found")]
    NotFound,

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::NotFound => "not_found",
            StoreError::Timeout { .. } => "timeout",
            StoreError::Database(_) => "database",
            StoreError::Unavailable(_) => "unavailable",
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound(anyhow::anyhow!("Student not found")),
            other => AppError::DatabaseError(anyhow::Error::new(other)),
        }
    }
}

#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Store a new record verbatim. No uniqueness check on `emailId`.
    async fn insert(&self, student: &Student) -> Result<InsertOutcome, StoreError>;

    /// First record whose `emailId` equals `email_id`, or `StoreError::NotFound`.
    async fn find_one(&self, email_id: &str) -> Result<Student, StoreError>;

    /// Every record, in natural storage order.
    async fn find_all(&self) -> Result<Vec<Student>, StoreError>;

    /// Overwrite all fields of the first record matching `email_id`,
    /// including `emailId` itself. Zero matches is a successful no-op.
    async fn update_one(
        &self,
        email_id: &str,
        student: &Student,
    ) -> Result<UpdateOutcome, StoreError>;

    /// Remove the first record matching `email_id`. Zero matches is a
    /// successful no-op.
    async fn delete_one(&self, email_id: &str) -> Result<DeleteOutcome, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn not_found_maps_to_404() {
        let err: AppError = StoreError::NotFound.into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn failures_map_to_500() {
        let timeout: AppError = StoreError::Timeout {
            operation: "find_one",
            after: Duration::from_secs(5),
        }
        .into();
        assert_eq!(timeout.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let unavailable: AppError = StoreError::Unavailable("down".to_string()).into();
        assert_eq!(unavailable.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn timeout_message_names_operation() {
        let err = StoreError::Timeout {
            operation: "insert",
            after: Duration::from_secs(5),
        };
        assert_eq!(err.to_string(), "insert timed out after 5s");
        assert_eq!(err.kind(), "timeout");
    }
}
