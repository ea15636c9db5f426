use super::{click_href, style_block, RenderAdapter};
use crate::models::{BackgroundType, ProfileShape, RenderModel, SocialPosition, SubscribeMode};
use std::fmt::Write;

/// The client-local realization of the preview channel: a renderer that
/// recomputes markup from the `RenderModel` with no network round-trip. It
/// mirrors what the browser-side preview component paints, and must stay
/// semantically equivalent to the askama adapters — same visible text, link
/// order, featured exclusion, and CSS variable values.
pub struct ClientPreview;

impl RenderAdapter for ClientPreview {
    fn render(&self, model: &RenderModel) -> Result<String, askama::Error> {
        Ok(render_client(model))
    }
}

fn render_client(model: &RenderModel) -> String {
    let mut out = String::with_capacity(2048);

    let background_class = match model.background_type {
        BackgroundType::Color => "bg-color",
        BackgroundType::Gradient => "bg-gradient",
        BackgroundType::Image => "bg-image",
    };

    let _ = write!(
        out,
        "<div class=\"client-preview {}\" data-page-id=\"{}\">",
        background_class, model.page_id
    );
    let _ = write!(
        out,
        "<style>{}{}</style>",
        style_block(model),
        model.fonts.local_font_css
    );
    if let Some(url) = &model.fonts.google_css_url {
        let _ = write!(out, "<link rel=\"stylesheet\" href=\"{}\">", escape(url));
    }
    if model.background_type == BackgroundType::Image && model.background_overlay {
        out.push_str("<div class=\"bg-overlay\"></div>");
    }

    // Header.
    out.push_str("<header class=\"lp-header\">");
    if let Some(img) = &model.profile_image_url {
        let shape_class = match model.profile_image_shape {
            ProfileShape::Circle => "shape-circle",
            ProfileShape::Square => "shape-square",
            ProfileShape::Rectangle => "shape-rectangle",
        };
        let _ = write!(
            out,
            "<img class=\"lp-avatar {}\" src=\"{}\" alt=\"{}\">",
            shape_class,
            escape(img),
            escape(&model.title)
        );
    }
    let _ = write!(out, "<h1 class=\"lp-title\">{}</h1>", escape(&model.title));
    if !model.bio.is_empty() {
        let _ = write!(out, "<p class=\"lp-bio\">{}</p>", escape(&model.bio));
    }
    out.push_str("</header>");

    if model.social_position == SocialPosition::Above {
        push_socials(&mut out, model);
    }

    if let Some(featured) = &model.featured {
        let _ = write!(
            out,
            "<a class=\"lp-featured\" href=\"{}\" data-url=\"{}\">",
            click_href(model.page_id, &featured.url),
            escape(&featured.url)
        );
        if let Some(thumb) = &featured.thumbnail_url {
            let _ = write!(
                out,
                "<img class=\"lp-featured-thumb\" src=\"{}\" alt=\"\">",
                escape(thumb)
            );
        }
        let _ = write!(
            out,
            "<span class=\"lp-featured-text\">{}</span>",
            escape(&featured.text)
        );
        if let Some(desc) = &featured.description {
            let _ = write!(
                out,
                "<span class=\"lp-featured-desc\">{}</span>",
                escape(desc)
            );
        }
        out.push_str("</a>");
    }

    // Generic link list, skipping the first normalized match of skip_url.
    let mut skipped = false;
    for section in &model.sections {
        out.push_str("<section class=\"lp-section\">");
        if !section.title.is_empty() {
            let _ = write!(
                out,
                "<h2 class=\"lp-section-title\">{}</h2>",
                escape(&section.title)
            );
        }
        for link in &section.links {
            if !skipped && Some(link.normalized_url.as_str()) == model.skip_url.as_deref() {
                skipped = true;
                continue;
            }
            let _ = write!(
                out,
                "<a class=\"lp-link\" href=\"{}\" data-url=\"{}\">{}</a>",
                click_href(model.page_id, &link.url),
                escape(&link.url),
                escape(&link.text)
            );
        }
        out.push_str("</section>");
    }

    match model.subscribe_mode {
        SubscribeMode::InlineForm => {
            let _ = write!(
                out,
                "<form class=\"lp-subscribe-form\" action=\"#\"><p class=\"lp-subscribe-desc\">{}</p>\
                 <input type=\"email\" name=\"email\" placeholder=\"you@example.com\" required>\
                 <button type=\"submit\">Subscribe</button></form>",
                escape(&model.subscribe_description)
            );
        }
        SubscribeMode::IconModal => {
            let _ = write!(
                out,
                "<button class=\"lp-subscribe-trigger\" aria-haspopup=\"dialog\">&#9993;</button>\
                 <div class=\"lp-subscribe-modal\" hidden><p class=\"lp-subscribe-desc\">{}</p>\
                 <input type=\"email\" name=\"email\" placeholder=\"you@example.com\" required>\
                 <button type=\"submit\">Subscribe</button></div>",
                escape(&model.subscribe_description)
            );
        }
        SubscribeMode::Disabled => {}
    }

    if model.social_position == SocialPosition::Below {
        push_socials(&mut out, model);
    }

    out.push_str("<footer class=\"lp-footer\">Powered by Linkfolio</footer>");
    out.push_str("</div>");
    out
}

fn push_socials(out: &mut String, model: &RenderModel) {
    if model.socials.is_empty() {
        return;
    }
    out.push_str("<nav class=\"lp-socials\">");
    for social in &model.socials {
        let _ = write!(
            out,
            "<a class=\"lp-social\" href=\"{}\" data-platform=\"{}\">{}</a>",
            escape(&social.url),
            escape(&social.platform),
            escape(&social.platform)
        );
    }
    out.push_str("</nav>");
}

/// Matches askama's HTML escaper so text nodes compare equal across
/// adapters.
fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
