//! Health, dataset and backend status handlers

use std::sync::Arc;

use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::Serialize;

use crate::{AppError, AppState};
use salesdesk_core::{AIBackend, DatasetStats};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ai_backend: &'static str,
    pub model: String,
    pub data_source: &'static str,
}

/// GET /api/health - Liveness plus configured backend/source
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let assistant = &state.assistant;
    Json(HealthResponse {
        status: "ok",
        ai_backend: assistant.ai().kind().as_str(),
        model: assistant.ai().model().to_string(),
        data_source: assistant.source().kind().as_str(),
    })
}

/// GET /api/dataset - Statistics for the synthetic dataset
pub async fn dataset_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DatasetStats>, AppError> {
    let store = state
        .assistant
        .source()
        .sales_store()
        .ok_or_else(|| AppError::not_found("The mock data source has no dataset"))?;
    Ok(Json(store.get().stats()))
}

/// GET /api/dataset/csv - Full dataset as a CSV download
pub async fn dataset_csv(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let store = state
        .assistant
        .source()
        .sales_store()
        .ok_or_else(|| AppError::not_found("The mock data source has no dataset"))?;

    let mut body = Vec::new();
    store.get().write_csv(&mut body)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"sales.csv\""),
        ],
        body,
    ))
}

#[derive(Debug, Serialize)]
pub struct AiStatusResponse {
    pub available: bool,
    pub backend: String,
    pub model: String,
    pub host: String,
}

/// GET /api/ai/status - Live completion backend health check
pub async fn ai_status(State(state): State<Arc<AppState>>) -> Json<AiStatusResponse> {
    let client = state.assistant.ai();
    let info = client.info();
    Json(AiStatusResponse {
        available: client.health_check().await,
        backend: info.backend,
        model: info.model,
        host: info.host,
    })
}
