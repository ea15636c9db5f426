use crate::{
    error::Error,
    models::LinkPageConfig,
    og, store, AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct GetConfigQuery {
    /// Owner to attach when the page is created on first visit.
    pub artist_id: Option<i64>,
}

/// GET /p/:id/config
///
/// Returns the persisted config; on the first management visit the page is
/// created with built-in defaults and persisted before returning. This also
/// feeds the client-local preview mirror.
pub async fn get_config(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(query): Query<GetConfigQuery>,
) -> Result<Json<LinkPageConfig>, Error> {
    if let Some(config) = state.cache.get(id) {
        return Ok(Json(config));
    }
    if let Some(config) = store::load_config(&state.store, id).await? {
        state.cache.set(config.clone());
        return Ok(Json(config));
    }

    let config = LinkPageConfig::new(id, query.artist_id.unwrap_or(0));
    store::save_config(&state.store, &config).await?;
    state.cache.set(config.clone());
    Ok(Json(config))
}

#[derive(Serialize)]
pub struct SaveResponse {
    pub ok: bool,
}

/// PUT /p/:id/config
///
/// The save pipeline: persist every section field, refresh the cache, and —
/// when a featured URL is set without an uploaded thumbnail — spawn the
/// Open Graph backfill for the remote preview image. A store failure blocks
/// the save and surfaces as an error; it never affects rendering of the
/// last-loaded config.
pub async fn save_config(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(mut config): Json<LinkPageConfig>,
) -> Result<Json<SaveResponse>, Error> {
    // The path is authoritative for identity.
    config.id = id;

    store::save_config(&state.store, &config).await?;
    state.cache.set(config.clone());

    if wants_preview_backfill(&config) {
        let url = config
            .advanced
            .featured_link_url
            .clone()
            .unwrap_or_default();
        let state = state.clone();
        tokio::spawn(async move {
            let Some(image) = og::preview_image(&url, &state.og_cache).await else {
                return;
            };
            let mut updated = config;
            updated.advanced.featured_remote_preview_url = Some(image);
            match store::save_config(&state.store, &updated).await {
                Ok(()) => state.cache.set(updated),
                Err(e) => {
                    tracing::warn!("og backfill save failed for page {}: {:?}", updated.id, e)
                }
            }
        });
    }

    Ok(Json(SaveResponse { ok: true }))
}

fn wants_preview_backfill(config: &LinkPageConfig) -> bool {
    let advanced = &config.advanced;
    advanced.featured_link_enabled
        && advanced.featured_link_url.as_deref().is_some_and(|u| !u.is_empty())
        && advanced.featured_thumbnail_url.is_none()
        && advanced.featured_remote_preview_url.is_none()
}
