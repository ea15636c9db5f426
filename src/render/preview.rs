use super::{click_href, style_block, RenderAdapter};
use crate::models::{BackgroundType, ProfileShape, RenderModel, SocialPosition, SubscribeMode};
use askama::Template;

/// Renders the server-round-trip preview: the same page content inside an
/// iframe-sizing wrapper instead of a full document.
pub struct PreviewFragment;

#[derive(Template)]
#[template(path = "preview.html")]
struct PreviewTemplate {
    page_id: i64,
    title: String,
    bio: String,
    profile_image_url: String,
    shape_class: &'static str,
    background_class: &'static str,
    overlay: bool,
    style_block: String,
    font_link: String,
    local_font_css: String,
    socials_above: bool,
    socials: Vec<SocialView>,
    has_featured: bool,
    featured_href: String,
    featured_url: String,
    featured_text: String,
    featured_description: String,
    featured_thumbnail: String,
    sections: Vec<SectionView>,
    subscribe_icon_modal: bool,
    subscribe_inline: bool,
    subscribe_description: String,
}

struct SocialView {
    platform: String,
    url: String,
}

struct SectionView {
    title: String,
    links: Vec<LinkView>,
}

struct LinkView {
    href: String,
    url: String,
    text: String,
}

impl RenderAdapter for PreviewFragment {
    fn render(&self, model: &RenderModel) -> Result<String, askama::Error> {
        build_template(model).render()
    }
}

fn build_template(model: &RenderModel) -> PreviewTemplate {
    // Same first-match exclusion rule as the public page; kept independent
    // here and pinned by the conformance suite.
    let mut skipped = false;
    let sections = model
        .sections
        .iter()
        .map(|section| SectionView {
            title: section.title.clone(),
            links: section
                .links
                .iter()
                .filter(|link| {
                    if !skipped && Some(link.normalized_url.as_str()) == model.skip_url.as_deref() {
                        skipped = true;
                        return false;
                    }
                    true
                })
                .map(|link| LinkView {
                    href: click_href(model.page_id, &link.url),
                    url: link.url.clone(),
                    text: link.text.clone(),
                })
                .collect(),
        })
        .collect();

    let featured = model.featured.as_ref();

    PreviewTemplate {
        page_id: model.page_id,
        title: model.title.clone(),
        bio: model.bio.clone(),
        profile_image_url: model.profile_image_url.clone().unwrap_or_default(),
        shape_class: match model.profile_image_shape {
            ProfileShape::Circle => "shape-circle",
            ProfileShape::Square => "shape-square",
            ProfileShape::Rectangle => "shape-rectangle",
        },
        background_class: match model.background_type {
            BackgroundType::Color => "bg-color",
            BackgroundType::Gradient => "bg-gradient",
            BackgroundType::Image => "bg-image",
        },
        overlay: model.background_type == BackgroundType::Image && model.background_overlay,
        style_block: style_block(model),
        font_link: model.fonts.google_css_url.clone().unwrap_or_default(),
        local_font_css: model.fonts.local_font_css.clone(),
        socials_above: model.social_position == SocialPosition::Above,
        socials: model
            .socials
            .iter()
            .map(|s| SocialView {
                platform: s.platform.clone(),
                url: s.url.clone(),
            })
            .collect(),
        has_featured: featured.is_some(),
        featured_href: featured
            .map(|f| click_href(model.page_id, &f.url))
            .unwrap_or_default(),
        featured_url: featured.map(|f| f.url.clone()).unwrap_or_default(),
        featured_text: featured.map(|f| f.text.clone()).unwrap_or_default(),
        featured_description: featured
            .and_then(|f| f.description.clone())
            .unwrap_or_default(),
        featured_thumbnail: featured
            .and_then(|f| f.thumbnail_url.clone())
            .unwrap_or_default(),
        sections,
        subscribe_icon_modal: model.subscribe_mode == SubscribeMode::IconModal,
        subscribe_inline: model.subscribe_mode == SubscribeMode::InlineForm,
        subscribe_description: model.subscribe_description.clone(),
    }
}
