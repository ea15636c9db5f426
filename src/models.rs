use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Enums ──────────────────────────────────────────────────────────────────

/// Shape applied to the profile image on the rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProfileShape {
    #[default]
    Circle,
    Square,
    Rectangle,
}

/// Which background block the renderer shows. Mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundType {
    #[default]
    Color,
    Gradient,
    Image,
}

/// Social icons render either right after the header or right before the
/// powered-by footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SocialPosition {
    #[default]
    Above,
    Below,
}

/// Subscribe affordance. Exactly one of these states holds at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubscribeMode {
    #[default]
    IconModal,
    InlineForm,
    Disabled,
}

// ── Config sections ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub title: Option<String>,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub profile_image_shape: ProfileShape,
    /// Percent of the 200px base size, clamped to 10..=100 at compile time.
    pub profile_image_size_percent: u32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            title: None,
            bio: None,
            profile_image_url: None,
            profile_image_shape: ProfileShape::Circle,
            profile_image_size_percent: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundSettings {
    pub background_type: BackgroundType,
    pub color: String,
    pub gradient_start: String,
    pub gradient_end: String,
    pub gradient_direction: String,
    pub image_url: Option<String>,
    /// Darkening overlay over image backgrounds so text stays readable.
    pub overlay: bool,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            background_type: BackgroundType::Color,
            color: defaults::BACKGROUND_COLOR.into(),
            gradient_start: defaults::GRADIENT_START.into(),
            gradient_end: defaults::GRADIENT_END.into(),
            gradient_direction: defaults::GRADIENT_DIRECTION.into(),
            image_url: None,
            overlay: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSettings {
    pub button_bg: String,
    pub button_hover: String,
    pub button_border: String,
    pub text: String,
    pub link_text: String,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            button_bg: defaults::BUTTON_BG.into(),
            button_hover: defaults::BUTTON_HOVER.into(),
            button_border: defaults::BUTTON_BORDER.into(),
            text: defaults::TEXT_COLOR.into(),
            link_text: defaults::LINK_TEXT_COLOR.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypographySettings {
    /// Key into the font catalog (`styles::font_catalog`), not a family name.
    pub title_font: String,
    /// Percent, clamped to 50..=200 at compile time.
    pub title_font_size_percent: u32,
    pub body_font: String,
}

impl Default for TypographySettings {
    fn default() -> Self {
        Self {
            title_font: defaults::FONT_KEY.into(),
            title_font_size_percent: 100,
            body_font: defaults::FONT_KEY.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Percent of the 25px maximum radius, clamped to 0..=100.
    pub button_radius_percent: u32,
    pub social_position: SocialPosition,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            button_radius_percent: 50,
            social_position: SocialPosition::Above,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscribeSettings {
    pub mode: SubscribeMode,
    pub description: String,
}

impl Default for SubscribeSettings {
    fn default() -> Self {
        Self {
            mode: SubscribeMode::IconModal,
            description: defaults::SUBSCRIBE_DESCRIPTION.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AdvancedSettings {
    pub featured_link_enabled: bool,
    pub featured_link_url: Option<String>,
    pub featured_link_description: Option<String>,
    /// Explicitly uploaded thumbnail. Always wins over the remote preview.
    pub featured_thumbnail_url: Option<String>,
    /// Open Graph image fetched for the featured URL on save.
    pub featured_remote_preview_url: Option<String>,
    pub link_expiration_enabled: bool,
    pub redirect_enabled: bool,
    pub redirect_url: Option<String>,
    pub tracking_pixels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkItem {
    pub url: String,
    pub text: String,
    pub active: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Default for LinkItem {
    fn default() -> Self {
        Self {
            url: String::new(),
            text: String::new(),
            active: true,
            expires_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LinkSection {
    pub title: String,
    pub links: Vec<LinkItem>,
}

/// The persisted link-page configuration. Section ordering inside
/// `link_sections` is significant and preserved end-to-end; a link's `url`
/// is its stable identity within the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkPageConfig {
    pub id: i64,
    pub artist_id: i64,
    pub display: DisplaySettings,
    pub background: BackgroundSettings,
    pub colors: ColorSettings,
    pub typography: TypographySettings,
    pub layout: LayoutSettings,
    pub subscribe: SubscribeSettings,
    pub advanced: AdvancedSettings,
    pub socials: Vec<SocialLink>,
    pub link_sections: Vec<LinkSection>,
}

impl Default for LinkPageConfig {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl LinkPageConfig {
    pub fn new(id: i64, artist_id: i64) -> Self {
        Self {
            id,
            artist_id,
            display: DisplaySettings::default(),
            background: BackgroundSettings::default(),
            colors: ColorSettings::default(),
            typography: TypographySettings::default(),
            layout: LayoutSettings::default(),
            subscribe: SubscribeSettings::default(),
            advanced: AdvancedSettings::default(),
            socials: Vec::new(),
            link_sections: Vec::new(),
        }
    }
}

// ── Overrides ──────────────────────────────────────────────────────────────
//
// Transient, unpersisted edits used only to preview in-progress changes.
// Every field is optional; serde drops unknown keys, which is the allow-list
// behavior the preview endpoint relies on. Lists replace wholesale.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DisplayOverrides {
    pub title: Option<String>,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub profile_image_shape: Option<ProfileShape>,
    pub profile_image_size_percent: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BackgroundOverrides {
    pub background_type: Option<BackgroundType>,
    pub color: Option<String>,
    pub gradient_start: Option<String>,
    pub gradient_end: Option<String>,
    pub gradient_direction: Option<String>,
    pub image_url: Option<String>,
    pub overlay: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ColorOverrides {
    pub button_bg: Option<String>,
    pub button_hover: Option<String>,
    pub button_border: Option<String>,
    pub text: Option<String>,
    pub link_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TypographyOverrides {
    pub title_font: Option<String>,
    pub title_font_size_percent: Option<u32>,
    pub body_font: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LayoutOverrides {
    pub button_radius_percent: Option<u32>,
    pub social_position: Option<SocialPosition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SubscribeOverrides {
    pub mode: Option<SubscribeMode>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AdvancedOverrides {
    pub featured_link_enabled: Option<bool>,
    pub featured_link_url: Option<String>,
    pub featured_link_description: Option<String>,
    pub featured_thumbnail_url: Option<String>,
    pub link_expiration_enabled: Option<bool>,
    pub redirect_enabled: Option<bool>,
    pub redirect_url: Option<String>,
    pub tracking_pixels: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConfigOverrides {
    pub display: Option<DisplayOverrides>,
    pub background: Option<BackgroundOverrides>,
    pub colors: Option<ColorOverrides>,
    pub typography: Option<TypographyOverrides>,
    pub layout: Option<LayoutOverrides>,
    pub subscribe: Option<SubscribeOverrides>,
    pub advanced: Option<AdvancedOverrides>,
    pub socials: Option<Vec<SocialLink>>,
    pub link_sections: Option<Vec<LinkSection>>,
}

impl ConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

// ── Render model ───────────────────────────────────────────────────────────

/// A link that survived active/expiry filtering, with its normalized URL
/// precomputed so adapters can compare against `skip_url` directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedLink {
    pub url: String,
    pub text: String,
    pub normalized_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSection {
    pub title: String,
    pub links: Vec<ResolvedLink>,
}

/// The single designated link rendered in the featured slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeaturedLink {
    pub url: String,
    pub text: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// Font-loading plan: one batched request URL for every hosted font in use,
/// plus inline-able CSS for any bundled local fonts in use.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct FontLoadPlan {
    pub google_css_url: Option<String>,
    pub local_font_css: String,
}

/// The fully-resolved, ready-to-render snapshot. Derived, never persisted;
/// recomputed per request/edit. All three render adapters consume exactly
/// this shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderModel {
    pub page_id: i64,
    pub title: String,
    pub bio: String,
    pub profile_image_url: Option<String>,
    pub profile_image_shape: ProfileShape,
    pub background_type: BackgroundType,
    pub background_image_url: Option<String>,
    pub background_overlay: bool,
    pub css_variables: BTreeMap<String, String>,
    pub fonts: FontLoadPlan,
    pub featured: Option<FeaturedLink>,
    /// Normalized URL adapters must skip (first match only) in the generic
    /// link list.
    pub skip_url: Option<String>,
    pub socials: Vec<SocialLink>,
    pub social_position: SocialPosition,
    pub sections: Vec<ResolvedSection>,
    pub subscribe_mode: SubscribeMode,
    pub subscribe_description: String,
    pub redirect_url: Option<String>,
    pub tracking_pixels: Vec<String>,
}

// ── Built-in defaults ──────────────────────────────────────────────────────

pub mod defaults {
    pub const BACKGROUND_COLOR: &str = "#1a1a2e";
    pub const GRADIENT_START: &str = "#0b132b";
    pub const GRADIENT_END: &str = "#1c2541";
    pub const GRADIENT_DIRECTION: &str = "to bottom";
    pub const BUTTON_BG: &str = "#222222";
    pub const BUTTON_HOVER: &str = "#333333";
    pub const BUTTON_BORDER: &str = "#444444";
    pub const TEXT_COLOR: &str = "#ffffff";
    pub const LINK_TEXT_COLOR: &str = "#ffffff";
    pub const SUBSCRIBE_ACCENT: &str = "#53a8b6";
    pub const SUBSCRIBE_DESCRIPTION: &str = "Get updates straight to your inbox.";
    pub const FONT_KEY: &str = "inter";
    pub const PAGE_TITLE: &str = "Untitled Page";
}
