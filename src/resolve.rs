use crate::{
    featured::{normalize_url, resolve_featured},
    models::{
        defaults, ConfigOverrides, LinkPageConfig, LinkSection, RenderModel, ResolvedLink,
        ResolvedSection,
    },
    styles::compile_styles,
};
use chrono::{DateTime, Utc};

/// Resolve persisted config plus an optional transient override set into the
/// canonical `RenderModel` every render adapter consumes.
///
/// Merge precedence, field by field: overrides > config > built-in defaults.
/// Overrides are never persisted here; they exist only so unsaved edits can
/// be previewed. `now` is explicit so the function is pure — two calls with
/// identical `(config, overrides, now)` produce identical models.
pub fn resolve(
    config: &LinkPageConfig,
    overrides: &ConfigOverrides,
    now: DateTime<Utc>,
) -> RenderModel {
    let merged = merge(config, overrides);

    let sections = filter_sections(
        &merged.link_sections,
        merged.advanced.link_expiration_enabled,
        now,
    );

    let (featured, skip_url) = resolve_featured(&merged.advanced, &sections);

    let sheet = compile_styles(
        &merged.display,
        &merged.background,
        &merged.colors,
        &merged.typography,
        &merged.layout,
    );

    let redirect_url = if merged.advanced.redirect_enabled {
        merged
            .advanced
            .redirect_url
            .clone()
            .filter(|u| u.starts_with("http://") || u.starts_with("https://"))
    } else {
        None
    };

    RenderModel {
        page_id: merged.id,
        title: merged
            .display
            .title
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| defaults::PAGE_TITLE.into()),
        bio: merged.display.bio.clone().unwrap_or_default(),
        profile_image_url: merged
            .display
            .profile_image_url
            .clone()
            .filter(|s| !s.is_empty()),
        profile_image_shape: merged.display.profile_image_shape,
        background_type: merged.background.background_type,
        background_image_url: merged
            .background
            .image_url
            .clone()
            .filter(|s| !s.is_empty()),
        background_overlay: merged.background.overlay,
        css_variables: sheet.css_variables,
        fonts: sheet.fonts,
        featured,
        skip_url,
        socials: merged.socials.clone(),
        social_position: merged.layout.social_position,
        sections,
        subscribe_mode: merged.subscribe.mode,
        subscribe_description: merged.subscribe.description.clone(),
        redirect_url,
        tracking_pixels: merged.advanced.tracking_pixels.clone(),
    }
}

/// Fold overrides into a copy of the config, field by field. Lists replace
/// wholesale; scalar `None`s leave the persisted value untouched.
fn merge(config: &LinkPageConfig, overrides: &ConfigOverrides) -> LinkPageConfig {
    let mut merged = config.clone();

    if let Some(o) = &overrides.display {
        let d = &mut merged.display;
        apply(&mut d.title, o.title.clone().map(Some));
        apply(&mut d.bio, o.bio.clone().map(Some));
        apply(&mut d.profile_image_url, o.profile_image_url.clone().map(Some));
        apply(&mut d.profile_image_shape, o.profile_image_shape);
        apply(&mut d.profile_image_size_percent, o.profile_image_size_percent);
    }
    if let Some(o) = &overrides.background {
        let b = &mut merged.background;
        apply(&mut b.background_type, o.background_type);
        apply(&mut b.color, o.color.clone());
        apply(&mut b.gradient_start, o.gradient_start.clone());
        apply(&mut b.gradient_end, o.gradient_end.clone());
        apply(&mut b.gradient_direction, o.gradient_direction.clone());
        apply(&mut b.image_url, o.image_url.clone().map(Some));
        apply(&mut b.overlay, o.overlay);
    }
    if let Some(o) = &overrides.colors {
        let c = &mut merged.colors;
        apply(&mut c.button_bg, o.button_bg.clone());
        apply(&mut c.button_hover, o.button_hover.clone());
        apply(&mut c.button_border, o.button_border.clone());
        apply(&mut c.text, o.text.clone());
        apply(&mut c.link_text, o.link_text.clone());
    }
    if let Some(o) = &overrides.typography {
        let t = &mut merged.typography;
        apply(&mut t.title_font, o.title_font.clone());
        apply(&mut t.title_font_size_percent, o.title_font_size_percent);
        apply(&mut t.body_font, o.body_font.clone());
    }
    if let Some(o) = &overrides.layout {
        let l = &mut merged.layout;
        apply(&mut l.button_radius_percent, o.button_radius_percent);
        apply(&mut l.social_position, o.social_position);
    }
    if let Some(o) = &overrides.subscribe {
        let s = &mut merged.subscribe;
        apply(&mut s.mode, o.mode);
        apply(&mut s.description, o.description.clone());
    }
    if let Some(o) = &overrides.advanced {
        let a = &mut merged.advanced;
        apply(&mut a.featured_link_enabled, o.featured_link_enabled);
        apply(&mut a.featured_link_url, o.featured_link_url.clone().map(Some));
        apply(
            &mut a.featured_link_description,
            o.featured_link_description.clone().map(Some),
        );
        apply(
            &mut a.featured_thumbnail_url,
            o.featured_thumbnail_url.clone().map(Some),
        );
        apply(&mut a.link_expiration_enabled, o.link_expiration_enabled);
        apply(&mut a.redirect_enabled, o.redirect_enabled);
        apply(&mut a.redirect_url, o.redirect_url.clone().map(Some));
        apply(&mut a.tracking_pixels, o.tracking_pixels.clone());
    }
    if let Some(socials) = &overrides.socials {
        merged.socials = socials.clone();
    }
    if let Some(sections) = &overrides.link_sections {
        merged.link_sections = sections.clone();
    }

    merged
}

fn apply<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

/// Drop inactive links, and expired ones when expiration is enabled. Section
/// order and link order within sections are preserved; empty sections stay
/// (their title may still render).
fn filter_sections(
    sections: &[LinkSection],
    expiration_enabled: bool,
    now: DateTime<Utc>,
) -> Vec<ResolvedSection> {
    sections
        .iter()
        .map(|section| ResolvedSection {
            title: section.title.clone(),
            links: section
                .links
                .iter()
                .filter(|l| l.active && !l.url.trim().is_empty())
                .filter(|l| {
                    !expiration_enabled || l.expires_at.map_or(true, |at| at > now)
                })
                .map(|l| ResolvedLink {
                    url: l.url.clone(),
                    text: l.text.clone(),
                    normalized_url: normalize_url(&l.url),
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 29, 12, 0, 0).unwrap()
    }

    fn config_with_links(links: &[(&str, &str)]) -> LinkPageConfig {
        let mut config = LinkPageConfig::new(1, 7);
        config.link_sections = vec![LinkSection {
            title: "Links".into(),
            links: links
                .iter()
                .map(|(url, text)| LinkItem {
                    url: (*url).into(),
                    text: (*text).into(),
                    ..Default::default()
                })
                .collect(),
        }];
        config
    }

    #[test]
    fn resolve_is_deterministic() {
        let mut config = config_with_links(&[("https://a.com", "A"), ("https://b.com", "B")]);
        config.display.title = Some("My Page".into());
        let overrides = ConfigOverrides {
            colors: Some(ColorOverrides {
                button_bg: Some("#123456".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let a = resolve(&config, &overrides, now());
        let b = resolve(&config, &overrides, now());
        assert_eq!(a, b);
    }

    #[test]
    fn override_beats_config_beats_default() {
        let mut config = LinkPageConfig::new(1, 7);
        config.colors.button_bg = "#111111".into();
        let overrides = ConfigOverrides {
            colors: Some(ColorOverrides {
                button_bg: Some("#2222ff".into()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let with_override = resolve(&config, &overrides, now());
        assert_eq!(with_override.css_variables["--button-bg-color"], "#2222ff");

        let without = resolve(&config, &ConfigOverrides::default(), now());
        assert_eq!(without.css_variables["--button-bg-color"], "#111111");

        // Hover was never customized anywhere: the built-in default shows.
        assert_eq!(
            without.css_variables["--button-hover-color"],
            defaults::BUTTON_HOVER
        );
    }

    #[test]
    fn overrides_are_not_persisted_into_the_config() {
        let config = config_with_links(&[("https://a.com", "A")]);
        let snapshot = config.clone();
        let overrides = ConfigOverrides {
            display: Some(DisplayOverrides {
                title: Some("Edited".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let model = resolve(&config, &overrides, now());
        assert_eq!(model.title, "Edited");
        assert_eq!(config, snapshot);
    }

    #[test]
    fn malformed_override_color_degrades_to_default_not_error() {
        let config = LinkPageConfig::new(1, 7);
        let overrides = ConfigOverrides {
            colors: Some(ColorOverrides {
                text: Some("blurple".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let model = resolve(&config, &overrides, now());
        assert_eq!(model.css_variables["--text-color"], defaults::TEXT_COLOR);
    }

    #[test]
    fn link_order_is_preserved() {
        let config = config_with_links(&[
            ("https://1.com", "1"),
            ("https://2.com", "2"),
            ("https://3.com", "3"),
        ]);
        let model = resolve(&config, &ConfigOverrides::default(), now());
        let urls: Vec<&str> = model.sections[0]
            .links
            .iter()
            .map(|l| l.url.as_str())
            .collect();
        assert_eq!(urls, ["https://1.com", "https://2.com", "https://3.com"]);
    }

    #[test]
    fn inactive_links_are_dropped() {
        let mut config = config_with_links(&[("https://a.com", "A"), ("https://b.com", "B")]);
        config.link_sections[0].links[1].active = false;
        let model = resolve(&config, &ConfigOverrides::default(), now());
        assert_eq!(model.sections[0].links.len(), 1);
        assert_eq!(model.sections[0].links[0].text, "A");
    }

    #[test]
    fn expired_links_drop_only_when_expiration_enabled() {
        let mut config = config_with_links(&[("https://a.com", "A")]);
        config.link_sections[0].links[0].expires_at =
            Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());

        let model = resolve(&config, &ConfigOverrides::default(), now());
        assert_eq!(model.sections[0].links.len(), 1);

        config.advanced.link_expiration_enabled = true;
        let model = resolve(&config, &ConfigOverrides::default(), now());
        assert!(model.sections[0].links.is_empty());
    }

    #[test]
    fn expired_links_cannot_be_featured() {
        let mut config = config_with_links(&[("https://a.com", "A")]);
        config.advanced.link_expiration_enabled = true;
        config.advanced.featured_link_enabled = true;
        config.advanced.featured_link_url = Some("https://a.com".into());
        config.link_sections[0].links[0].expires_at =
            Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());

        let model = resolve(&config, &ConfigOverrides::default(), now());
        assert!(model.featured.is_none());
        assert!(model.skip_url.is_none());
    }

    #[test]
    fn redirect_requires_flag_and_valid_target() {
        let mut config = LinkPageConfig::new(1, 7);
        config.advanced.redirect_url = Some("https://shop.example".into());
        let model = resolve(&config, &ConfigOverrides::default(), now());
        assert!(model.redirect_url.is_none());

        config.advanced.redirect_enabled = true;
        let model = resolve(&config, &ConfigOverrides::default(), now());
        assert_eq!(model.redirect_url.as_deref(), Some("https://shop.example"));

        config.advanced.redirect_url = Some("javascript:alert(1)".into());
        let model = resolve(&config, &ConfigOverrides::default(), now());
        assert!(model.redirect_url.is_none());
    }

    #[test]
    fn unknown_override_keys_are_dropped_by_deserialization() {
        let overrides: ConfigOverrides = serde_json::from_str(
            r##"{"colors":{"button_bg":"#abcdef","nonsense":true},"bogus_section":{"x":1}}"##,
        )
        .unwrap();
        let model = resolve(&LinkPageConfig::new(1, 7), &overrides, now());
        assert_eq!(model.css_variables["--button-bg-color"], "#abcdef");
    }

    #[test]
    fn featured_link_folds_into_the_model() {
        let mut config = config_with_links(&[("https://a.com/", "A"), ("https://b.com", "B")]);
        config.advanced.featured_link_enabled = true;
        config.advanced.featured_link_url = Some("https://a.com".into());
        let model = resolve(&config, &ConfigOverrides::default(), now());
        assert_eq!(model.featured.as_ref().unwrap().text, "A");
        assert_eq!(model.skip_url.as_deref(), Some("https://a.com"));
    }
}
