use crate::models::{AdvancedSettings, FeaturedLink, ResolvedSection};

/// Strip trailing slashes so `https://x.com/a` and `https://x.com/a/` count
/// as the same link. This is the identity rule for featured-link matching
/// and click aggregation; use it everywhere a URL is compared or keyed.
pub fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_owned()
}

/// Pick the featured link, if any.
///
/// The feature is active only when the flag is set AND the chosen URL still
/// matches (normalized, exact) a link in the filtered sections. A stale URL
/// means the feature is silently off for this render — never an error.
///
/// Returns the featured slot plus the normalized `skip_url` adapters use to
/// suppress the link from the generic list. Only the first normalized match
/// is the featured source; later duplicates that normalize to the same key
/// stay in the generic list.
pub fn resolve_featured(
    advanced: &AdvancedSettings,
    sections: &[ResolvedSection],
) -> (Option<FeaturedLink>, Option<String>) {
    if !advanced.featured_link_enabled {
        return (None, None);
    }
    let chosen = match advanced.featured_link_url.as_deref() {
        Some(u) if !u.trim().is_empty() => normalize_url(u),
        _ => return (None, None),
    };

    let source = sections
        .iter()
        .flat_map(|s| s.links.iter())
        .find(|l| l.normalized_url == chosen);

    match source {
        Some(link) => {
            // Thumbnail policy: explicit upload wins over the fetched remote
            // preview; neither is required.
            let thumbnail_url = advanced
                .featured_thumbnail_url
                .clone()
                .filter(|s| !s.is_empty())
                .or_else(|| {
                    advanced
                        .featured_remote_preview_url
                        .clone()
                        .filter(|s| !s.is_empty())
                });

            let featured = FeaturedLink {
                url: link.url.clone(),
                text: link.text.clone(),
                description: advanced
                    .featured_link_description
                    .clone()
                    .filter(|s| !s.is_empty()),
                thumbnail_url,
            };
            (Some(featured), Some(chosen))
        }
        None => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResolvedLink;

    fn sections(urls: &[(&str, &str)]) -> Vec<ResolvedSection> {
        vec![ResolvedSection {
            title: "Links".into(),
            links: urls
                .iter()
                .map(|(url, text)| ResolvedLink {
                    url: (*url).into(),
                    text: (*text).into(),
                    normalized_url: normalize_url(url),
                })
                .collect(),
        }]
    }

    #[test]
    fn normalization_strips_trailing_slashes() {
        assert_eq!(normalize_url("https://x.com/a/"), "https://x.com/a");
        assert_eq!(normalize_url("https://x.com/a"), "https://x.com/a");
        assert_eq!(normalize_url(" https://x.com/a// "), "https://x.com/a");
    }

    #[test]
    fn disabled_flag_yields_nothing() {
        let advanced = AdvancedSettings {
            featured_link_enabled: false,
            featured_link_url: Some("https://a.com".into()),
            ..Default::default()
        };
        let (featured, skip) = resolve_featured(&advanced, &sections(&[("https://a.com", "A")]));
        assert!(featured.is_none());
        assert!(skip.is_none());
    }

    #[test]
    fn stale_url_disables_feature_for_this_render() {
        let advanced = AdvancedSettings {
            featured_link_enabled: true,
            featured_link_url: Some("https://gone.com".into()),
            ..Default::default()
        };
        let (featured, skip) = resolve_featured(&advanced, &sections(&[("https://a.com", "A")]));
        assert!(featured.is_none());
        assert!(skip.is_none());
    }

    #[test]
    fn matches_across_trailing_slash_difference() {
        let advanced = AdvancedSettings {
            featured_link_enabled: true,
            featured_link_url: Some("https://a.com".into()),
            ..Default::default()
        };
        let (featured, skip) = resolve_featured(&advanced, &sections(&[("https://a.com/", "A")]));
        let featured = featured.unwrap();
        // The slot carries the link's own (unnormalized) URL and text.
        assert_eq!(featured.url, "https://a.com/");
        assert_eq!(featured.text, "A");
        assert_eq!(skip.as_deref(), Some("https://a.com"));
    }

    #[test]
    fn first_normalized_match_is_the_source() {
        let advanced = AdvancedSettings {
            featured_link_enabled: true,
            featured_link_url: Some("https://a.com".into()),
            ..Default::default()
        };
        let secs = sections(&[("https://a.com/", "A"), ("https://a.com", "A-dup")]);
        let (featured, _) = resolve_featured(&advanced, &secs);
        assert_eq!(featured.unwrap().text, "A");
    }

    #[test]
    fn uploaded_thumbnail_beats_remote_preview() {
        let advanced = AdvancedSettings {
            featured_link_enabled: true,
            featured_link_url: Some("https://a.com".into()),
            featured_thumbnail_url: Some("https://cdn/upload.png".into()),
            featured_remote_preview_url: Some("https://cdn/og.png".into()),
            ..Default::default()
        };
        let (featured, _) = resolve_featured(&advanced, &sections(&[("https://a.com", "A")]));
        assert_eq!(
            featured.unwrap().thumbnail_url.as_deref(),
            Some("https://cdn/upload.png")
        );
    }

    #[test]
    fn remote_preview_used_when_no_upload() {
        let advanced = AdvancedSettings {
            featured_link_enabled: true,
            featured_link_url: Some("https://a.com".into()),
            featured_remote_preview_url: Some("https://cdn/og.png".into()),
            ..Default::default()
        };
        let (featured, _) = resolve_featured(&advanced, &sections(&[("https://a.com", "A")]));
        assert_eq!(
            featured.unwrap().thumbnail_url.as_deref(),
            Some("https://cdn/og.png")
        );
    }
}
