use super::load_page;
use crate::{
    error::Error,
    models::{ConfigOverrides, RenderModel},
    render::{PreviewFragment, RenderAdapter},
    AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub overrides: ConfigOverrides,
    /// Monotonically increasing per edit session; echoed back unchanged so
    /// the client can discard out-of-order responses (last edit wins).
    #[serde(default)]
    pub edit_sequence: u64,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub html: String,
    pub model: RenderModel,
    pub edit_sequence: u64,
}

/// POST /p/:id/preview
///
/// Server round-trip of the live-preview channel: resolve persisted config
/// with the posted overrides (nothing is written anywhere) and return the
/// rendered fragment plus the resolved model. Each request is computed
/// independently from its own payload; ordering is the client's concern via
/// the echoed sequence number.
pub async fn preview(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, Error> {
    let config = load_page(&state, id).await?;
    let model = crate::resolve::resolve(&config, &request.overrides, Utc::now());
    let html = PreviewFragment.render(&model)?;

    Ok(Json(PreviewResponse {
        html,
        model,
        edit_sequence: request.edit_sequence,
    }))
}
