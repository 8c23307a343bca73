use crate::models::Student;
use crate::startup::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

/// Decodes a student from the raw body. The `Content-Type` header is not
/// consulted; only the JSON shape decides.
fn student_body(body: &Bytes) -> Result<Student, AppError> {
    serde_json::from_slice::<Student>(body).map_err(|e| {
        tracing::warn!(error = %e, "Rejected student payload");
        AppError::BadRequest(e.into())
    })
}

pub async fn register_student(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let student = student_body(&body)?;

    let outcome = state.store.insert(&student).await?;

    tracing::info!(
        email_id = %student.email_id,
        inserted_id = %outcome.inserted_id,
        "Student registered"
    );

    Ok(Json(outcome))
}

pub async fn get_student(
    State(state): State<AppState>,
    Path(email_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let student = state.store.find_one(&email_id).await?;
    Ok(Json(student))
}

pub async fn list_students(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let students = state.store.find_all().await?;
    Ok(Json(students))
}

/// Overwrites the record matched by the path key with the body. A body
/// `emailId` different from the path re-keys the record.
pub async fn update_student(
    State(state): State<AppState>,
    Path(email_id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let student = student_body(&body)?;

    let outcome = state.store.update_one(&email_id, &student).await?;

    if outcome.matched_count > 0 && student.email_id != email_id {
        tracing::info!(
            from = %email_id,
            to = %student.email_id,
            "Student record re-keyed"
        );
    }
    tracing::info!(
        email_id = %email_id,
        matched = outcome.matched_count,
        modified = outcome.modified_count,
        "Student update applied"
    );

    Ok(Json(outcome))
}

pub async fn delete_student(
    State(state): State<AppState>,
    Path(email_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state.store.delete_one(&email_id).await?;

    tracing::info!(
        email_id = %email_id,
        deleted = outcome.deleted_count,
        "Student delete applied"
    );

    Ok(Json(outcome))
}
