//! Question answering handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{AppError, AppState, MAX_QUESTION_CHARS};
use salesdesk_core::AssistantReply;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// POST /api/ask - Answer a free-text question
///
/// Classified failures (AI service down, unreadable intent) still return 200;
/// the reply's `error` field says what went wrong.
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AssistantReply>, AppError> {
    let question = request.question.trim();
    if question.is_empty() {
        return Err(AppError::bad_request("Question must not be empty"));
    }
    if question.chars().count() > MAX_QUESTION_CHARS {
        return Err(AppError::bad_request(&format!(
            "Question too long (max {} characters)",
            MAX_QUESTION_CHARS
        )));
    }

    Ok(Json(state.assistant.ask(question).await))
}
