pub mod client;
pub mod preview;
pub mod public;

pub use client::ClientPreview;
pub use preview::PreviewFragment;
pub use public::PublicPage;

use crate::models::RenderModel;
use percent_encoding::{percent_encode, NON_ALPHANUMERIC};

/// The shared rendering contract. Three adapters implement it — the public
/// page, the iframe preview fragment, and the client-local preview — all
/// against the same `RenderModel`. For a fixed model they must agree on
/// visible text, link set and order, featured-link exclusion, and CSS
/// variable values; only wrapper structure may differ.
pub trait RenderAdapter {
    fn render(&self, model: &RenderModel) -> Result<String, askama::Error>;
}

/// The `:root{...}` custom-property block. One implementation on purpose:
/// every adapter inlines this exact string, so variable values can never
/// drift between renderers.
pub fn style_block(model: &RenderModel) -> String {
    let mut out = String::from(":root{");
    for (key, value) in &model.css_variables {
        out.push_str(key);
        out.push(':');
        out.push_str(value);
        out.push(';');
    }
    out.push('}');
    out
}

/// Click-through href that routes through the analytics recorder.
pub fn click_href(page_id: i64, url: &str) -> String {
    format!(
        "/p/{}/go?to={}",
        page_id,
        percent_encode(url.as_bytes(), NON_ALPHANUMERIC)
    )
}
