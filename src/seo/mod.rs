//! SEO metadata synchronization.
//!
//! [`apply_seo_metadata`] turns one page's [`SeoMetadata`] into managed head
//! elements: canonical link, one alternate link per language plus
//! `x-default`, Open Graph and Twitter card meta tags, and JSON-LD blocks.
//! Applying a second record replaces everything the first one wrote.

pub mod head;
pub mod schema;
pub mod sitemap;

pub use head::{escape_html, HeadDocument, HeadElement, MetaAttr, MANAGED_ATTR, MANAGED_VALUE};

use crate::config::SiteConfig;
use crate::i18n::{
    detect_locale_in_path, localized_path, split_path_suffix, strip_locale_prefix, Language,
    LanguageRegistry,
};
use serde_json::Value;

pub const JSON_LD: &str = "application/ld+json";

/// Per-page SEO record.
#[derive(Debug, Clone, PartialEq)]
pub struct SeoMetadata {
    pub title: String,
    pub description: String,
    /// Page path, with or without locale prefix; the request path when absent
    pub path: Option<String>,
    /// Absolute canonical URL overriding the derived one
    pub canonical_url: Option<String>,
    /// Open Graph type (`website`, `article`, `product`, ...)
    pub page_type: String,
    pub image: Option<String>,
    pub keywords: Vec<String>,
    pub noindex: bool,
    pub structured_data: Vec<Value>,
}

impl SeoMetadata {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            path: None,
            canonical_url: None,
            page_type: "website".to_string(),
            image: None,
            keywords: Vec::new(),
            noindex: false,
            structured_data: Vec::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_canonical_url(mut self, url: impl Into<String>) -> Self {
        self.canonical_url = Some(url.into());
        self
    }

    pub fn with_type(mut self, page_type: impl Into<String>) -> Self {
        self.page_type = page_type.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_noindex(mut self, noindex: bool) -> Self {
        self.noindex = noindex;
        self
    }

    pub fn with_structured_data(mut self, data: Value) -> Self {
        self.structured_data.push(data);
        self
    }
}

/// Absolute URL for a path, leaving `http(s):` URLs as they are.
pub fn normalize_url(site: &SiteConfig, url_or_path: &str) -> String {
    if url_or_path.is_empty() {
        return site.site_url.clone();
    }

    let lower = url_or_path.to_ascii_lowercase();
    if lower.starts_with("http:") || lower.starts_with("https:") {
        return url_or_path.to_string();
    }

    site.absolute_url(url_or_path)
}

/// `(hreflang, absolute href)` for every enabled language, then `x-default`.
pub fn alternate_links(site: &SiteConfig, clean_path: &str) -> Vec<(String, String)> {
    let mut links: Vec<(String, String)> = LanguageRegistry::get()
        .list_enabled()
        .into_iter()
        .filter_map(|config| Language::parse(config.code))
        .map(|language| {
            (
                language.code().to_string(),
                normalize_url(site, &localized_path(language, clean_path)),
            )
        })
        .collect();

    links.push((
        "x-default".to_string(),
        normalize_url(
            site,
            &localized_path(Language::default_language(), clean_path),
        ),
    ));
    links
}

/// Write `record` into `head` for a request to `location`.
///
/// The active language is the one in `location`'s prefix, else the one in
/// `record.path`, else the default.
pub fn apply_seo_metadata(
    head: &mut HeadDocument,
    record: &SeoMetadata,
    location: &str,
    site: &SiteConfig,
) {
    head.remove_managed();

    let raw_path = record.path.as_deref().unwrap_or(location);
    let (path_only, _) = split_path_suffix(raw_path);
    let clean_path = strip_locale_prefix(path_only);
    let active = detect_locale_in_path(location)
        .or_else(|| detect_locale_in_path(raw_path))
        .unwrap_or_else(Language::default_language);

    head.lang = active.code().to_string();
    head.dir = active.direction().to_string();
    head.title = record.title.clone();

    head.set_meta(MetaAttr::Name, "description", &record.description);
    head.set_meta(
        MetaAttr::Name,
        "robots",
        if record.noindex {
            "noindex, nofollow"
        } else {
            "index, follow"
        },
    );

    let canonical = match record.canonical_url.as_deref() {
        Some(url) => normalize_url(site, url),
        None => normalize_url(site, &localized_path(active, &clean_path)),
    };
    head.push(HeadElement::Link {
        rel: "canonical".to_string(),
        href: canonical.clone(),
        hreflang: None,
        managed: true,
    });

    for (hreflang, href) in alternate_links(site, &clean_path) {
        head.push(HeadElement::Link {
            rel: "alternate".to_string(),
            href,
            hreflang: Some(hreflang),
            managed: true,
        });
    }

    let image = record
        .image
        .as_deref()
        .filter(|image| !image.is_empty())
        .map(|image| normalize_url(site, image))
        .unwrap_or_else(|| site.default_social_image.clone());

    head.set_meta(MetaAttr::Property, "og:title", &record.title);
    head.set_meta(MetaAttr::Property, "og:description", &record.description);
    head.set_meta(MetaAttr::Property, "og:type", &record.page_type);
    head.set_meta(MetaAttr::Property, "og:url", &canonical);
    head.set_meta(MetaAttr::Property, "og:site_name", &site.site_name);
    head.set_meta(MetaAttr::Property, "og:image", &image);

    head.set_meta(MetaAttr::Name, "twitter:card", "summary_large_image");
    head.set_meta(MetaAttr::Name, "twitter:title", &record.title);
    head.set_meta(MetaAttr::Name, "twitter:description", &record.description);
    head.set_meta(MetaAttr::Name, "twitter:image", &image);

    if !record.keywords.is_empty() {
        head.set_meta(MetaAttr::Name, "keywords", &record.keywords.join(", "));
    }

    for data in &record.structured_data {
        let Value::Object(map) = data else {
            continue;
        };
        if map.is_empty() {
            continue;
        }
        head.push(HeadElement::Script {
            kind: JSON_LD.to_string(),
            body: data.to_string(),
            managed: true,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn site() -> SiteConfig {
        SiteConfig::default()
    }

    fn applied(record: &SeoMetadata, location: &str) -> HeadDocument {
        let mut head = HeadDocument::new();
        apply_seo_metadata(&mut head, record, location, &site());
        head
    }

    // ==================== Link Tests ====================

    #[test]
    fn test_alternates_for_every_language_plus_x_default() {
        let head = applied(&SeoMetadata::new("Pricing", "Plans"), "/de/pricing");
        let alternates = head.links("alternate");

        assert_eq!(alternates.len(), 15);
        assert_eq!(alternates[0], (Some("en"), "https://asyncz.com/en/pricing"));
        assert!(alternates.contains(&(Some("de"), "https://asyncz.com/de/pricing")));
        assert!(alternates.contains(&(Some("uk"), "https://asyncz.com/uk/pricing")));
        assert_eq!(
            alternates[14],
            (Some("x-default"), "https://asyncz.com/en/pricing")
        );
    }

    #[test]
    fn test_canonical_uses_active_language() {
        let head = applied(
            &SeoMetadata::new("Pricing", "Plans").with_path("/pricing"),
            "/de/pricing?utm=x",
        );

        assert_eq!(
            head.links("canonical"),
            vec![(None, "https://asyncz.com/de/pricing")]
        );
        assert_eq!(head.meta("og:url"), Some("https://asyncz.com/de/pricing"));
        assert_eq!(head.lang, "de");
    }

    #[test]
    fn test_canonical_override_wins() {
        let head = applied(
            &SeoMetadata::new("A", "B").with_canonical_url("https://example.com/x"),
            "/en/faq",
        );
        assert_eq!(head.links("canonical"), vec![(None, "https://example.com/x")]);
    }

    #[test]
    fn test_root_path_alternates() {
        let head = applied(&SeoMetadata::new("Home", "Welcome"), "/ja");
        let alternates = head.links("alternate");

        assert!(alternates.contains(&(Some("ja"), "https://asyncz.com/ja")));
        assert_eq!(head.links("canonical"), vec![(None, "https://asyncz.com/ja")]);
    }

    #[test]
    fn test_applying_twice_leaves_no_duplicates() {
        let mut head = HeadDocument::new();
        let first = SeoMetadata::new("FAQ", "Questions")
            .with_keywords(["faq"])
            .with_structured_data(json!({ "@type": "FAQPage" }));
        let second = SeoMetadata::new("Pricing", "Plans");

        apply_seo_metadata(&mut head, &first, "/en/faq", &site());
        apply_seo_metadata(&mut head, &second, "/en/pricing", &site());

        assert_eq!(head.links("canonical").len(), 1);
        assert_eq!(head.links("alternate").len(), 15);
        assert_eq!(head.links("canonical")[0].1, "https://asyncz.com/en/pricing");
        assert_eq!(head.meta("keywords"), None);
        assert!(head.scripts(JSON_LD).is_empty());
        assert_eq!(head.title, "Pricing");
        assert_eq!(head.meta("viewport"), Some("width=device-width, initial-scale=1"));
    }

    // ==================== Meta Tests ====================

    #[test]
    fn test_social_meta_and_default_image() {
        let head = applied(&SeoMetadata::new("About", "Team"), "/en/about-us");

        assert_eq!(head.meta("og:type"), Some("website"));
        assert_eq!(head.meta("og:site_name"), Some("asyncz"));
        assert_eq!(head.meta("og:image"), Some("https://asyncz.com/favicon/icon.png"));
        assert_eq!(head.meta("twitter:card"), Some("summary_large_image"));
        assert_eq!(head.meta("twitter:image"), head.meta("og:image"));
        assert_eq!(head.meta("robots"), Some("index, follow"));
    }

    #[test]
    fn test_relative_image_is_made_absolute() {
        let head = applied(
            &SeoMetadata::new("A", "B").with_image("/images/hero.png"),
            "/en",
        );
        assert_eq!(head.meta("og:image"), Some("https://asyncz.com/images/hero.png"));
    }

    #[test]
    fn test_noindex_and_keywords() {
        let head = applied(
            &SeoMetadata::new("Missing", "Gone")
                .with_noindex(true)
                .with_keywords(["a", "b"]),
            "/en/nope",
        );
        assert_eq!(head.meta("robots"), Some("noindex, nofollow"));
        assert_eq!(head.meta("keywords"), Some("a, b"));
    }

    #[test]
    fn test_empty_description_is_skipped() {
        let head = applied(&SeoMetadata::new("Title", ""), "/en");
        assert_eq!(head.meta("description"), None);
        assert_eq!(head.meta("og:title"), Some("Title"));
    }

    #[test]
    fn test_rtl_language_sets_direction() {
        let head = applied(&SeoMetadata::new("A", "B"), "/ar/contact");
        assert_eq!(head.lang, "ar");
        assert_eq!(head.dir, "rtl");
    }

    // ==================== Structured Data Tests ====================

    #[test]
    fn test_empty_structured_data_is_filtered() {
        let head = applied(
            &SeoMetadata::new("A", "B")
                .with_structured_data(json!({}))
                .with_structured_data(json!({ "@type": "Organization" }))
                .with_structured_data(Value::Null),
            "/en",
        );

        assert_eq!(head.scripts(JSON_LD), vec![r#"{"@type":"Organization"}"#]);
    }

    #[test]
    fn test_normalize_url() {
        let site = site();
        assert_eq!(normalize_url(&site, ""), "https://asyncz.com");
        assert_eq!(normalize_url(&site, "HTTPS://cdn.example.com/a.png"), "HTTPS://cdn.example.com/a.png");
        assert_eq!(normalize_url(&site, "en/faq"), "https://asyncz.com/en/faq");
    }
}
