use crate::{
    analytics::{self, DayStat, TopLink},
    error::Error,
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

fn default_days() -> u32 {
    7
}

fn default_limit() -> u32 {
    20
}

#[derive(Deserialize)]
pub struct RangeQuery {
    #[serde(default = "default_days")]
    pub days: u32,
}

#[derive(Serialize)]
pub struct RangeResponse {
    pub page_id: i64,
    pub days: u32,
    pub series: Vec<DayStat>,
}

/// GET /p/:id/analytics?days=N
///
/// Dense zero-filled per-day views/clicks series over the trailing window,
/// ascending by date. `days` is clamped to 1..=90 by the aggregator.
pub async fn range(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<RangeResponse>, Error> {
    let today = Utc::now().date_naive();
    let series = analytics::query_range(&state.db, id, today, query.days).await?;

    Ok(Json(RangeResponse {
        page_id: id,
        days: series.len() as u32,
        series,
    }))
}

#[derive(Deserialize)]
pub struct TopQuery {
    #[serde(default = "default_days")]
    pub days: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Serialize)]
pub struct TopResponse {
    pub page_id: i64,
    pub links: Vec<TopLink>,
}

/// GET /p/:id/analytics/top?days=N&limit=K
pub async fn top(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(query): Query<TopQuery>,
) -> Result<Json<TopResponse>, Error> {
    let today = Utc::now().date_naive();
    let links = analytics::top_links(&state.db, id, today, query.days, query.limit).await?;

    Ok(Json(TopResponse { page_id: id, links }))
}
