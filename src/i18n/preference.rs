//! Preferred-language resolution.
//!
//! Precedence: stored choice, then browser language, then the default.

use crate::i18n::{Language, LanguageRegistry};
use crate::storage::{PreferenceStore, LANGUAGE_KEY};
use std::cmp::Ordering;

/// Resolve the visitor's preferred language. Always returns a supported language.
///
/// `browser_tags` are the browser's reported language tags in preference
/// order (e.g. `["fr-FR", "en"]`). An empty slice means the browser language
/// is unknown and that step is skipped.
pub fn resolve_preferred_language(storage: &PreferenceStore, browser_tags: &[String]) -> Language {
    if let Some(stored) = storage.get(LANGUAGE_KEY).and_then(|code| Language::parse(&code)) {
        return stored;
    }

    browser_tags
        .iter()
        .find_map(|tag| match_browser_tag(tag))
        .unwrap_or_else(Language::default_language)
}

/// Match one browser tag against the registry.
///
/// A tag matches a code when it equals it or starts with `<code>-`, so
/// `en-US` matches `en` but `english` does not.
pub fn match_browser_tag(tag: &str) -> Option<Language> {
    let tag = tag.trim().to_lowercase();
    if tag.is_empty() {
        return None;
    }

    LanguageRegistry::get()
        .list_enabled()
        .into_iter()
        .find(|config| {
            tag == config.code
                || tag
                    .strip_prefix(config.code)
                    .is_some_and(|rest| rest.starts_with('-'))
        })
        .and_then(|config| Language::parse(config.code))
}

/// Parse an `Accept-Language` header into tags ordered by descending quality.
///
/// Ties keep header order. Wildcards and `q=0` entries are dropped.
pub fn parse_accept_language(header: &str) -> Vec<String> {
    let mut entries: Vec<(&str, f64)> = Vec::new();

    for part in header.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let mut segments = part.split(';');
        let tag = segments.next().unwrap_or("").trim();
        let mut quality = 1.0_f64;
        for segment in segments {
            if let Some(value) = segment.trim().strip_prefix("q=") {
                if let Ok(parsed) = value.trim().parse::<f64>() {
                    // NaN sorts nowhere, so it is treated as q=0
                    quality = if parsed.is_nan() {
                        0.0
                    } else {
                        parsed.clamp(0.0, 1.0)
                    };
                }
            }
        }

        if tag.is_empty() || tag == "*" || quality <= 0.0 {
            continue;
        }
        entries.push((tag, quality));
    }

    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    entries.into_iter().map(|(tag, _)| tag.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn lang(code: &str) -> Language {
        Language::parse(code).unwrap()
    }

    // ==================== Precedence Tests ====================

    #[test]
    fn test_stored_beats_browser() {
        let storage = PreferenceStore::in_memory();
        storage.set(LANGUAGE_KEY, "de");

        assert_eq!(
            resolve_preferred_language(&storage, &tags(&["fr-FR"])),
            lang("de")
        );
    }

    #[test]
    fn test_browser_region_tag_matches_base_code() {
        let storage = PreferenceStore::in_memory();
        assert_eq!(
            resolve_preferred_language(&storage, &tags(&["fr-FR"])),
            lang("fr")
        );
    }

    #[test]
    fn test_unsupported_browser_tag_falls_back_to_default() {
        let storage = PreferenceStore::in_memory();
        assert_eq!(
            resolve_preferred_language(&storage, &tags(&["xx-XX"])),
            Language::default_language()
        );
    }

    #[test]
    fn test_invalid_stored_value_is_ignored() {
        let storage = PreferenceStore::in_memory();
        storage.set(LANGUAGE_KEY, "klingon");
        assert_eq!(
            resolve_preferred_language(&storage, &tags(&["ja"])),
            lang("ja")
        );
    }

    #[test]
    fn test_unavailable_storage_and_browser() {
        let storage = PreferenceStore::unavailable();
        assert_eq!(
            resolve_preferred_language(&storage, &[]),
            Language::default_language()
        );
    }

    #[test]
    fn test_first_matching_browser_tag_wins() {
        let storage = PreferenceStore::unavailable();
        assert_eq!(
            resolve_preferred_language(&storage, &tags(&["xx", "pt-BR", "de"])),
            lang("pt")
        );
    }

    // ==================== Tag Matching Tests ====================

    #[test]
    fn test_match_browser_tag() {
        assert_eq!(match_browser_tag("en-US"), Some(lang("en")));
        assert_eq!(match_browser_tag("ZH-cn"), Some(lang("zh")));
        assert_eq!(match_browser_tag("uk"), Some(lang("uk")));
        assert_eq!(match_browser_tag("english"), None);
        assert_eq!(match_browser_tag(""), None);
    }

    // ==================== Accept-Language Tests ====================

    #[test]
    fn test_parse_accept_language_orders_by_quality() {
        assert_eq!(
            parse_accept_language("en;q=0.5, de-DE, fr;q=0.9"),
            tags(&["de-DE", "fr", "en"])
        );
    }

    #[test]
    fn test_parse_accept_language_drops_wildcard_and_zero() {
        assert_eq!(parse_accept_language("*, ja;q=0, ko"), tags(&["ko"]));
    }

    #[test]
    fn test_parse_accept_language_drops_nan_quality() {
        assert_eq!(parse_accept_language("de;q=NaN, fr;q=0.5"), tags(&["fr"]));
        assert_eq!(parse_accept_language("es;q=-1, it"), tags(&["it"]));
    }

    #[test]
    fn test_parse_accept_language_clamps_quality() {
        assert_eq!(parse_accept_language("fr, de;q=inf"), tags(&["fr", "de"]));
        assert_eq!(parse_accept_language("fr, de;q=7"), tags(&["fr", "de"]));
        assert_eq!(
            resolve_preferred_language(
                &PreferenceStore::in_memory(),
                &parse_accept_language("en, ja;q=inf")
            ),
            lang("en")
        );
    }

    #[test]
    fn test_parse_accept_language_empty() {
        assert!(parse_accept_language("").is_empty());
        assert!(parse_accept_language(" , ").is_empty());
    }
}
