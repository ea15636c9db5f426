use super::load_page;
use crate::{
    analytics,
    error::Error,
    featured::normalize_url,
    models::{ConfigOverrides, LinkPageConfig},
    render::{PublicPage, RenderAdapter},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

/// GET /p/:id
///
/// 1. Resolve the config (cache fast path, store on a miss).
/// 2. Spawn a background task to count the view so the analytics write
///    never blocks the page.
/// 3. If the page-level redirect is enabled, 302 to its target; otherwise
///    render the public adapter.
pub async fn view_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, Error> {
    let config = load_page(&state, id).await?;
    let model = crate::resolve::resolve(&config, &ConfigOverrides::default(), Utc::now());

    let db = state.db.clone();
    tokio::spawn(async move {
        if let Err(e) = analytics::record_view(&db, id, Utc::now().date_naive()).await {
            tracing::warn!("view count write failed for page {}: {:?}", id, e);
        }
    });

    if let Some(target) = &model.redirect_url {
        return Ok(Redirect::to(target).into_response());
    }

    let html = PublicPage.render(&model)?;
    Ok(Html(html).into_response())
}

#[derive(Deserialize)]
pub struct ClickQuery {
    pub to: String,
}

/// GET /p/:id/go?to=<url>
///
/// Click-through: count the click in the background (keyed by the
/// normalized URL) and redirect. The visitor is never held up by the
/// counter write.
///
/// The target must be a link the page actually carries (generic list,
/// featured URL, or a social icon), compared after normalization. Anything
/// else is rejected, so this endpoint can neither redirect off-page nor
/// seed the counters with URLs the page never showed.
pub async fn click_through(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(query): Query<ClickQuery>,
) -> Result<Response, Error> {
    let target = query.to.trim().to_owned();
    if !target.starts_with("http://") && !target.starts_with("https://") {
        return Err(Error::Validation(
            "click target must be an absolute http(s) URL".into(),
        ));
    }

    let config = load_page(&state, id).await?;
    if !is_page_link(&config, &normalize_url(&target)) {
        return Err(Error::Validation(
            "click target is not a link on this page".into(),
        ));
    }

    let db = state.db.clone();
    let url = target.clone();
    tokio::spawn(async move {
        if let Err(e) = analytics::record_click(&db, id, Utc::now().date_naive(), &url).await {
            tracing::warn!("click count write failed for page {}: {:?}", id, e);
        }
    });

    Ok(Redirect::to(&target).into_response())
}

fn is_page_link(config: &LinkPageConfig, normalized: &str) -> bool {
    config
        .link_sections
        .iter()
        .flat_map(|s| s.links.iter())
        .any(|l| normalize_url(&l.url) == normalized)
        || config
            .socials
            .iter()
            .any(|s| normalize_url(&s.url) == normalized)
        || config
            .advanced
            .featured_link_url
            .as_deref()
            .map(normalize_url)
            .as_deref()
            == Some(normalized)
}
