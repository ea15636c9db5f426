pub mod analytics;
pub mod manage;
pub mod pages;
pub mod preview;

use crate::{error::Error, models::LinkPageConfig, store, AppState};

/// Resolve a page's config: in-memory cache first, field store on a miss
/// (backfilling the cache for next time).
pub(crate) async fn load_page(state: &AppState, page_id: i64) -> Result<LinkPageConfig, Error> {
    if let Some(config) = state.cache.get(page_id) {
        return Ok(config);
    }
    match store::load_config(&state.store, page_id).await? {
        Some(config) => {
            state.cache.set(config.clone());
            Ok(config)
        }
        None => Err(Error::NotFound(page_id)),
    }
}
