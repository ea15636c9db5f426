use crate::models::{
    defaults, BackgroundSettings, ColorSettings, DisplaySettings, FontLoadPlan, LayoutSettings,
    ProfileShape, TypographySettings,
};
use std::collections::BTreeMap;

// ── CSS variables ──────────────────────────────────────────────────────────

/// Every variable the renderers may reference. The compiler always emits all
/// of them; inactive background variables hold their defaults so no adapter
/// ever sees a missing key.
pub const CSS_VARIABLE_KEYS: [&str; 16] = [
    "--background-color",
    "--background-gradient",
    "--background-image",
    "--background-overlay",
    "--button-bg-color",
    "--button-hover-color",
    "--button-border-color",
    "--text-color",
    "--link-text-color",
    "--title-font-family",
    "--body-font-family",
    "--title-font-size",
    "--button-radius",
    "--profile-img-size",
    "--profile-img-radius",
    "--subscribe-accent-color",
];

#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheet {
    pub css_variables: BTreeMap<String, String>,
    pub fonts: FontLoadPlan,
}

/// Map the stored style fields to the CSS variable set and the font plan.
///
/// This is the single point of unit conversion: percent inputs are stored as
/// raw numbers and turned into em/px here, nowhere else. Malformed colors
/// fall back to their documented defaults rather than producing invalid CSS.
pub fn compile_styles(
    display: &DisplaySettings,
    background: &BackgroundSettings,
    colors: &ColorSettings,
    typography: &TypographySettings,
    layout: &LayoutSettings,
) -> StyleSheet {
    let mut vars = BTreeMap::new();

    // Background. All three variants are always present; the model's
    // background_type discriminant picks which block the renderer shows.
    vars.insert(
        "--background-color".into(),
        css_color(&background.color, defaults::BACKGROUND_COLOR),
    );
    vars.insert(
        "--background-gradient".into(),
        format!(
            "linear-gradient({}, {}, {})",
            gradient_direction(&background.gradient_direction),
            css_color(&background.gradient_start, defaults::GRADIENT_START),
            css_color(&background.gradient_end, defaults::GRADIENT_END),
        ),
    );
    vars.insert(
        "--background-image".into(),
        match background.image_url.as_deref().filter(|s| !s.is_empty()) {
            Some(url) => format!("url('{}')", url.replace('\'', "%27")),
            None => "none".into(),
        },
    );
    vars.insert(
        "--background-overlay".into(),
        if background.overlay {
            "rgba(0, 0, 0, 0.35)".into()
        } else {
            "none".into()
        },
    );

    // Buttons and text.
    vars.insert(
        "--button-bg-color".into(),
        css_color(&colors.button_bg, defaults::BUTTON_BG),
    );
    vars.insert(
        "--button-hover-color".into(),
        css_color(&colors.button_hover, defaults::BUTTON_HOVER),
    );
    vars.insert(
        "--button-border-color".into(),
        css_color(&colors.button_border, defaults::BUTTON_BORDER),
    );
    vars.insert(
        "--text-color".into(),
        css_color(&colors.text, defaults::TEXT_COLOR),
    );
    vars.insert(
        "--link-text-color".into(),
        css_color(&colors.link_text, defaults::LINK_TEXT_COLOR),
    );
    vars.insert(
        "--subscribe-accent-color".into(),
        defaults::SUBSCRIBE_ACCENT.into(),
    );

    // Typography.
    let title_font = font_or_default(&typography.title_font);
    let body_font = font_or_default(&typography.body_font);
    vars.insert("--title-font-family".into(), title_font.stack.into());
    vars.insert("--body-font-family".into(), body_font.stack.into());
    vars.insert(
        "--title-font-size".into(),
        title_font_size_em(typography.title_font_size_percent),
    );

    // Layout.
    vars.insert(
        "--button-radius".into(),
        button_radius_px(layout.button_radius_percent),
    );
    vars.insert(
        "--profile-img-size".into(),
        profile_img_size_px(display.profile_image_size_percent),
    );
    vars.insert(
        "--profile-img-radius".into(),
        match display.profile_image_shape {
            ProfileShape::Circle => "50%".into(),
            ProfileShape::Square | ProfileShape::Rectangle => "4px".into(),
        },
    );

    debug_assert_eq!(vars.len(), CSS_VARIABLE_KEYS.len());

    StyleSheet {
        css_variables: vars,
        fonts: font_plan(&typography.title_font, &typography.body_font),
    }
}

// ── Unit conversions (integer-only for byte-stable output) ─────────────────

/// `110` → `"1.10em"`. Clamped to 50..=200.
fn title_font_size_em(percent: u32) -> String {
    let p = percent.clamp(50, 200);
    format!("{}.{:02}em", p / 100, p % 100)
}

/// Percent of a 25px maximum radius: `50` → `"12px"`. Clamped to 0..=100.
fn button_radius_px(percent: u32) -> String {
    let p = percent.min(100);
    format!("{}px", p * 25 / 100)
}

/// Percent of a 200px base: `50` → `"100px"`. Clamped to 10..=100.
fn profile_img_size_px(percent: u32) -> String {
    let p = percent.clamp(10, 100);
    format!("{}px", p * 2)
}

// ── Color validation ───────────────────────────────────────────────────────

/// Accept `#rgb` / `#rrggbb` hex; anything else degrades to `default`.
fn css_color(value: &str, default: &str) -> String {
    let v = value.trim();
    if is_hex_color(v) {
        v.to_ascii_lowercase()
    } else {
        default.into()
    }
}

fn is_hex_color(v: &str) -> bool {
    match v.strip_prefix('#') {
        Some(digits) => {
            (digits.len() == 3 || digits.len() == 6)
                && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Allow-list gradient directions: the four keywords plus `<n>deg`.
fn gradient_direction(value: &str) -> String {
    let v = value.trim();
    match v {
        "to top" | "to bottom" | "to left" | "to right" => return v.into(),
        _ => {}
    }
    if let Some(n) = v.strip_suffix("deg") {
        if !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()) {
            return v.into();
        }
    }
    defaults::GRADIENT_DIRECTION.into()
}

// ── Font catalog ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSource {
    /// Hosted on Google Fonts; `query` is the css2 family parameter.
    Hosted { query: &'static str },
    /// Bundled with the plugin and served from `/fonts/`; `css` is the
    /// inline-able @font-face rule.
    Local { css: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontDef {
    pub key: &'static str,
    pub stack: &'static str,
    pub source: FontSource,
}

const FONT_CATALOG: [FontDef; 7] = [
    FontDef {
        key: "inter",
        stack: "'Inter', sans-serif",
        source: FontSource::Hosted {
            query: "Inter:wght@400;600;700",
        },
    },
    FontDef {
        key: "roboto",
        stack: "'Roboto', sans-serif",
        source: FontSource::Hosted {
            query: "Roboto:wght@400;700",
        },
    },
    FontDef {
        key: "montserrat",
        stack: "'Montserrat', sans-serif",
        source: FontSource::Hosted {
            query: "Montserrat:wght@400;600;700",
        },
    },
    FontDef {
        key: "playfair-display",
        stack: "'Playfair Display', serif",
        source: FontSource::Hosted {
            query: "Playfair+Display:wght@400;700",
        },
    },
    FontDef {
        key: "lobster",
        stack: "'Lobster', cursive",
        source: FontSource::Hosted { query: "Lobster" },
    },
    FontDef {
        key: "wilco-loft-sans",
        stack: "'Wilco Loft Sans', sans-serif",
        source: FontSource::Local {
            css: "@font-face{font-family:'Wilco Loft Sans';src:url('/fonts/wilco-loft-sans.woff2') format('woff2');font-weight:400 700;font-display:swap;}",
        },
    },
    FontDef {
        key: "archivo-local",
        stack: "'Archivo', sans-serif",
        source: FontSource::Local {
            css: "@font-face{font-family:'Archivo';src:url('/fonts/archivo.woff2') format('woff2');font-weight:400 700;font-display:swap;}",
        },
    },
];

pub fn font_catalog() -> &'static [FontDef] {
    &FONT_CATALOG
}

fn font_or_default(key: &str) -> &'static FontDef {
    FONT_CATALOG
        .iter()
        .find(|f| f.key == key)
        .unwrap_or_else(|| {
            FONT_CATALOG
                .iter()
                .find(|f| f.key == defaults::FONT_KEY)
                .expect("default font present in catalog")
        })
}

/// Build the font-loading plan for exactly the fonts in use: one batched
/// Google Fonts URL (title first, deduplicated) and concatenated @font-face
/// CSS for local fonts. Fonts not referenced by the config are never
/// requested.
fn font_plan(title_key: &str, body_key: &str) -> FontLoadPlan {
    let title = font_or_default(title_key);
    let body = font_or_default(body_key);

    let mut hosted: Vec<&'static str> = Vec::new();
    let mut local_css = String::new();

    for font in [title, body] {
        match font.source {
            FontSource::Hosted { query } => {
                if !hosted.contains(&query) {
                    hosted.push(query);
                }
            }
            FontSource::Local { css } => {
                if !local_css.contains(css) {
                    local_css.push_str(css);
                }
            }
        }
    }

    let google_css_url = if hosted.is_empty() {
        None
    } else {
        let families: Vec<String> = hosted.iter().map(|q| format!("family={q}")).collect();
        Some(format!(
            "https://fonts.googleapis.com/css2?{}&display=swap",
            families.join("&")
        ))
    };

    FontLoadPlan {
        google_css_url,
        local_font_css: local_css,
    }
}
