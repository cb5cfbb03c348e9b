// src/handlers/database.rs

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{error::AppError, models::question::NewQuestion, store::SharedStore};

pub const SUBMIT_ACCEPTED: &str = "Trivia question has been successfully sent over!";

/// Accepts a trivia question and saves it.
///
/// * Any body that does not decode into a question (bad JSON, wrong field
///   type, wrong content type) is rejected with 400.
/// * Missing or `null` fields are stored as empty strings, a `null` body
///   saves an all-empty question.
/// * Any store failure is reported as 424.
pub async fn submit_question(
    State(store): State<SharedStore>,
    payload: Result<Json<Option<NewQuestion>>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(question) = payload.map_err(|rejection| {
        tracing::warn!("Invalid JSON received by the API: {}", rejection.body_text());
        AppError::InvalidJson(rejection.body_text())
    })?;
    let question = question.unwrap_or_default();

    tracing::info!("Received Question: {:?}", question);

    let created = store.create(question).await.map_err(|e| {
        tracing::error!("Error while saving to database: {}", e);
        AppError::from(e)
    })?;

    tracing::info!(
        id = created.id,
        "The question has been successfully added to the database"
    );

    Ok((StatusCode::ACCEPTED, SUBMIT_ACCEPTED))
}
