use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod analytics;
pub mod cache;
pub mod config;
pub mod error;
pub mod featured;
pub mod handlers;
pub mod models;
pub mod og;
pub mod preview;
pub mod render;
pub mod resolve;
pub mod store;
pub mod styles;

use cache::ConfigCache;
use og::OgCache;
use store::SqliteFieldStore;

// ── Shared application state ───────────────────────────────────────────────

pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub config: config::AppConfig,
    pub store: SqliteFieldStore,
    pub cache: ConfigCache,
    /// In-memory cache for featured-URL → og:image lookups so the same page
    /// is never fetched more than once per server lifetime.
    pub og_cache: OgCache,
}

impl AppState {
    pub fn new(db: sqlx::SqlitePool, config: config::AppConfig) -> Self {
        Self {
            store: SqliteFieldStore::new(db.clone()),
            db,
            config,
            cache: ConfigCache::new(),
            og_cache: OgCache::new(),
        }
    }
}

// ── Router ─────────────────────────────────────────────────────────────────

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(|| async { axum::http::StatusCode::OK }))
        // Public page + click-through redirect
        .route("/p/:id", get(handlers::pages::view_page))
        .route("/p/:id/go", get(handlers::pages::click_through))
        // Live-preview round-trip
        .route("/p/:id/preview", post(handlers::preview::preview))
        // Rolling-window analytics
        .route("/p/:id/analytics", get(handlers::analytics::range))
        .route("/p/:id/analytics/top", get(handlers::analytics::top))
        // Management surface
        .route(
            "/p/:id/config",
            get(handlers::manage::get_config).put(handlers::manage::save_config),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
