use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;

/// Thread-safe in-memory cache: featured URL → Option<og:image URL>.
/// `None` means we already tried and the page had no usable preview image.
#[derive(Clone, Debug)]
pub struct OgCache {
    inner: Arc<DashMap<String, Option<String>>>,
}

impl OgCache {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }
}

impl Default for OgCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetch the Open Graph image URL for `url`, using `cache` to avoid repeated
/// network requests for the same address.
///
/// Returns `None` for:
/// - non-http(s) targets
/// - failed or slow responses
/// - pages that previously yielded no `og:image`
///
/// The request runs with a 3-second timeout so a save's background backfill
/// can never stall for long. Only called off the render hot path.
pub async fn preview_image(url: &str, cache: &OgCache) -> Option<String> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return None;
    }

    // Cache first (covers both successful hits and known misses).
    if let Some(entry) = cache.inner.get(url) {
        return entry.clone();
    }

    let result = fetch_og_image(url).await;
    cache.inner.insert(url.to_owned(), result.clone());
    result
}

async fn fetch_og_image(url: &str) -> Option<String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .ok()?;

    let body = client
        .get(url)
        .send()
        .await
        .map_err(|e| tracing::debug!("og fetch network error for {}: {}", url, e))
        .ok()?
        .text()
        .await
        .map_err(|e| tracing::debug!("og fetch body error for {}: {}", url, e))
        .ok()?;

    find_og_image(&body)
}

/// Scan the document head for `<meta property="og:image" content="...">`.
/// Attribute order is not guaranteed, so each meta tag is checked for the
/// property before its content attribute is pulled out.
fn find_og_image(html: &str) -> Option<String> {
    let mut rest = html;
    while let Some(start) = rest.find("<meta") {
        let tag_rest = &rest[start..];
        let end = tag_rest.find('>')?;
        let tag = &tag_rest[..end];

        if tag.contains("property=\"og:image\"") || tag.contains("property='og:image'") {
            if let Some(content) = attr_value(tag, "content") {
                if !content.is_empty() {
                    return Some(content);
                }
            }
        }
        rest = &tag_rest[end..];
    }
    None
}

fn attr_value(tag: &str, name: &str) -> Option<String> {
    for quote in ['"', '\''] {
        let needle = format!("{name}={quote}");
        if let Some(at) = tag.find(&needle) {
            let after = &tag[at + needle.len()..];
            if let Some(close) = after.find(quote) {
                return Some(after[..close].to_owned());
            }
        }
    }
    None
}
