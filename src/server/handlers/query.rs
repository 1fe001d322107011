use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: String,
}

/// Answers one chat question. When startup configuration failed the
/// pipeline is absent and every call reports the stored reason instead
/// of crashing the process.
pub async fn answer(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let pipeline = state.pipeline.as_ref().map_err(|reason| {
        tracing::error!("query refused, service is degraded: {}", reason);
        ApiError::Internal(reason.clone())
    })?;
    let answer = pipeline.answer(&request.query).await?;
    Ok(Json(json!({ "answer": answer })))
}

/// Plain OPTIONS probe used by the widget; real CORS preflights are
/// answered by the CORS layer before reaching this handler.
pub async fn preflight() -> &'static str {
    "ok"
}
