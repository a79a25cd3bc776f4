//! Locale prefixes on URL paths.
//!
//! All functions here are pure. Paths are treated as opaque strings of the
//! form `/<segment>/<segment>...` optionally followed by a `?query` and/or
//! `#fragment` suffix, which is carried through untouched.

use crate::i18n::Language;
use regex::Regex;
use std::sync::OnceLock;

static EXTERNAL_LINK_REGEX: OnceLock<Regex> = OnceLock::new();

/// Strip leading and trailing slashes.
pub fn trim_slashes(path: &str) -> &str {
    path.trim_matches('/')
}

/// Split a path into its non-empty segments.
///
/// Repeated slashes collapse, so `//pricing///faq/` yields `["pricing", "faq"]`.
pub fn split_path_segments(path: &str) -> Vec<&str> {
    trim_slashes(path)
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Split a path at the first `?` or `#` into `(pathname, suffix)`.
pub fn split_path_suffix(path: &str) -> (&str, &str) {
    match path.find(['?', '#']) {
        Some(index) => path.split_at(index),
        None => (path, ""),
    }
}

/// Links that must never receive a locale prefix.
pub fn is_external_link(target: &str) -> bool {
    let regex = EXTERNAL_LINK_REGEX
        .get_or_init(|| Regex::new(r"(?i)^(https?:|mailto:|tel:)").unwrap());
    regex.is_match(target) || target.starts_with('#')
}

/// Return the locale named by the first path segment, if it is supported.
pub fn detect_locale_in_path(path: &str) -> Option<Language> {
    let (pathname, _) = split_path_suffix(path);
    split_path_segments(pathname)
        .first()
        .and_then(|segment| Language::parse(segment))
}

/// Remove any leading locale segments from a path.
///
/// A path with no locale prefix comes back unchanged apart from gaining a
/// leading slash. All leading locale segments are removed, so the result
/// never starts with a locale and stripping twice equals stripping once.
pub fn strip_locale_prefix(path: &str) -> String {
    let normalized = ensure_leading_slash(path);
    let (pathname, suffix) = split_path_suffix(&normalized);
    let segments = split_path_segments(pathname);

    let locale_count = segments
        .iter()
        .take_while(|segment| Language::parse(segment).is_some())
        .count();

    if locale_count == 0 {
        if segments.is_empty() {
            return format!("/{}", suffix);
        }
        return normalized;
    }

    let rest = segments[locale_count..].join("/");
    format!("/{}{}", rest, suffix)
}

/// Build the form of `target` that lives under `language`.
///
/// Any existing locale prefix is replaced. The query/fragment suffix is
/// preserved. External links and same-page anchors are returned unchanged.
pub fn localized_path(language: Language, target: &str) -> String {
    if target.is_empty() {
        return format!("/{}", language.code());
    }

    if is_external_link(target) {
        return target.to_string();
    }

    let normalized = ensure_leading_slash(target);
    let (pathname, suffix) = split_path_suffix(&normalized);
    let stripped = strip_locale_prefix(pathname);
    let rest = trim_slashes(&stripped);

    if rest.is_empty() {
        format!("/{}{}", language.code(), suffix)
    } else {
        format!("/{}/{}{}", language.code(), rest, suffix)
    }
}

fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lang(code: &str) -> Language {
        Language::parse(code).unwrap()
    }

    // ==================== Segment Tests ====================

    #[test]
    fn test_split_path_segments_collapses_slashes() {
        assert_eq!(split_path_segments("//pricing///faq/"), vec!["pricing", "faq"]);
        assert!(split_path_segments("/").is_empty());
        assert!(split_path_segments("").is_empty());
    }

    #[test]
    fn test_split_path_suffix() {
        assert_eq!(
            split_path_suffix("/en/blog/my-post?utm=x#comments"),
            ("/en/blog/my-post", "?utm=x#comments")
        );
        assert_eq!(split_path_suffix("/faq#billing"), ("/faq", "#billing"));
        assert_eq!(split_path_suffix("/faq"), ("/faq", ""));
    }

    // ==================== Detection Tests ====================

    #[test]
    fn test_detect_locale_in_path() {
        assert_eq!(detect_locale_in_path("/de/pricing"), Some(lang("de")));
        assert_eq!(detect_locale_in_path("/ja"), Some(lang("ja")));
        assert_eq!(detect_locale_in_path("/ja?ref=x"), Some(lang("ja")));
        assert_eq!(detect_locale_in_path("/pricing"), None);
        assert_eq!(detect_locale_in_path("/"), None);
        assert_eq!(detect_locale_in_path("/xx/pricing"), None);
        assert_eq!(detect_locale_in_path("/EN/pricing"), None);
    }

    // ==================== Strip Tests ====================

    #[test]
    fn test_strip_locale_prefix() {
        assert_eq!(strip_locale_prefix("/en/pricing"), "/pricing");
        assert_eq!(strip_locale_prefix("/en"), "/");
        assert_eq!(strip_locale_prefix("/en/"), "/");
        assert_eq!(strip_locale_prefix(""), "/");
        assert_eq!(strip_locale_prefix("pricing"), "/pricing");
        assert_eq!(strip_locale_prefix("/pricing"), "/pricing");
        assert_eq!(strip_locale_prefix("/xx/pricing"), "/xx/pricing");
    }

    #[test]
    fn test_strip_keeps_suffix() {
        assert_eq!(strip_locale_prefix("/de/blog/a?x=1#top"), "/blog/a?x=1#top");
        assert_eq!(strip_locale_prefix("/de?x=1"), "/?x=1");
    }

    #[test]
    fn test_strip_removes_stacked_prefixes() {
        assert_eq!(strip_locale_prefix("/en/de/faq"), "/faq");
    }

    // ==================== Localize Tests ====================

    #[test]
    fn test_localized_path_empty_and_root() {
        assert_eq!(localized_path(lang("ja"), ""), "/ja");
        assert_eq!(localized_path(lang("ja"), "/"), "/ja");
        assert_eq!(localized_path(lang("ja"), "/ja/"), "/ja");
    }

    #[test]
    fn test_localized_path_replaces_existing_prefix() {
        assert_eq!(localized_path(lang("tr"), "/en/pricing"), "/tr/pricing");
        assert_eq!(localized_path(lang("en"), "/en/pricing"), "/en/pricing");
    }

    #[test]
    fn test_localized_path_relative_target() {
        assert_eq!(localized_path(lang("fr"), "contact"), "/fr/contact");
    }

    #[test]
    fn test_localized_path_preserves_suffix() {
        assert_eq!(
            localized_path(lang("de"), "/en/blog/my-post?utm=x#comments"),
            "/de/blog/my-post?utm=x#comments"
        );
    }

    #[test]
    fn test_suffix_is_preserved_separately() {
        let (pathname, suffix) = split_path_suffix("/en/blog/my-post?utm=x#comments");
        let clean = strip_locale_prefix(pathname);

        assert_eq!(localized_path(lang("de"), &clean), "/de/blog/my-post");
        assert_eq!(suffix, "?utm=x#comments");
    }

    #[test]
    fn test_localized_path_leaves_external_links() {
        for target in [
            "mailto:a@b.com",
            "https://x.com",
            "HTTP://x.com/en",
            "tel:+123",
            "#section",
        ] {
            assert_eq!(localized_path(lang("ko"), target), target);
        }
    }

    // ==================== Properties ====================

    fn clean_path() -> impl Strategy<Value = String> {
        prop::collection::vec("[a-z0-9-]{1,12}", 0..4)
            .prop_filter("must not start with a locale", |segments| {
                segments
                    .first()
                    .map(|first| Language::parse(first).is_none())
                    .unwrap_or(true)
            })
            .prop_map(|segments| format!("/{}", segments.join("/")))
    }

    fn any_language() -> impl Strategy<Value = Language> {
        prop::sample::select(Language::all())
    }

    proptest! {
        #[test]
        fn prop_strip_inverts_localize(language in any_language(), path in clean_path()) {
            prop_assert_eq!(strip_locale_prefix(&localized_path(language, &path)), path);
        }

        #[test]
        fn prop_strip_is_idempotent(path in "[/a-z?#=]{0,24}") {
            let once = strip_locale_prefix(&path);
            prop_assert_eq!(strip_locale_prefix(&once), once);
        }

        #[test]
        fn prop_strip_is_idempotent_on_prefixed(language in any_language(), path in clean_path()) {
            let prefixed = format!("/{}{}", language.code(), path);
            let once = strip_locale_prefix(&prefixed);
            prop_assert_eq!(strip_locale_prefix(&once), once.clone());
            prop_assert!(detect_locale_in_path(&once).is_none());
        }

        #[test]
        fn prop_external_links_untouched(language in any_language(), rest in "[a-z@.]{0,16}") {
            for scheme in ["mailto:", "https://", "http://", "tel:", "#"] {
                let target = format!("{}{}", scheme, rest);
                prop_assert_eq!(localized_path(language, &target), target);
            }
        }

        #[test]
        fn prop_localized_path_has_no_trailing_slash(language in any_language(), path in clean_path()) {
            let localized = localized_path(language, &path);
            prop_assert!(!localized.ends_with('/'));
            prop_assert_eq!(detect_locale_in_path(&localized), Some(language));
        }
    }
}
