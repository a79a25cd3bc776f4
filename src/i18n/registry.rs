//! Language registry: Single source of truth for all supported languages.
//!
//! The registry is a fixed, ordered list. Order matters: it is the order in
//! which alternate links, sitemap entries and the language selector are
//! emitted, and the order in which browser language tags are matched.

use std::sync::OnceLock;

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// Short locale code used as the URL prefix (e.g., "en", "de", "zh")
    pub code: &'static str,

    /// English name of the language (e.g., "German")
    pub name: &'static str,

    /// Native name of the language, as shown in the language selector
    pub native_name: &'static str,

    /// Whether this is the default language (exactly one must be true)
    pub is_canonical: bool,

    /// Whether the language is written right-to-left
    pub rtl: bool,

    /// Whether this language is enabled for use
    pub enabled: bool,
}

/// Global language registry singleton.
///
/// Initialized once on first access and immutable thereafter.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    ///
    /// Matching is exact: "EN" and "en-US" are not registry codes.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get all enabled languages, in registry order.
    pub fn list_enabled(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().filter(|lang| lang.enabled).collect()
    }

    /// Get the default language configuration.
    ///
    /// # Panics
    /// Panics if the registry does not contain exactly one canonical language.
    /// The registry is static data, so this can only happen after a bad edit
    /// to `default_languages`, and the tests below catch it.
    pub fn canonical(&self) -> &LanguageConfig {
        let canonical_langs: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_canonical)
            .collect();

        match canonical_langs.len() {
            0 => panic!("No canonical language found in registry"),
            1 => canonical_langs[0],
            _ => panic!("Multiple canonical languages found in registry"),
        }
    }

    /// Check if a language code is supported and enabled.
    pub fn is_enabled(&self, code: &str) -> bool {
        self.get_by_code(code)
            .map(|lang| lang.enabled)
            .unwrap_or(false)
    }
}

const fn language(
    code: &'static str,
    name: &'static str,
    native_name: &'static str,
) -> LanguageConfig {
    LanguageConfig {
        code,
        name,
        native_name,
        is_canonical: false,
        rtl: false,
        enabled: true,
    }
}

/// The fourteen site languages. English is the default.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            is_canonical: true,
            ..language("en", "English", "English")
        },
        language("az", "Azerbaijani", "Azərbaycan"),
        language("tr", "Turkish", "Türkçe"),
        language("de", "German", "Deutsch"),
        language("fr", "French", "Français"),
        language("es", "Spanish", "Español"),
        language("pt", "Portuguese", "Português"),
        language("ru", "Russian", "Русский"),
        language("zh", "Chinese (Simplified)", "中文 (简体)"),
        language("ja", "Japanese", "日本語"),
        language("ko", "Korean", "한국어"),
        LanguageConfig {
            rtl: true,
            ..language("ar", "Arabic", "العربية")
        },
        language("cs", "Czech", "Čeština"),
        language("uk", "Ukrainian", "Українська"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = LanguageRegistry::get();
        let registry2 = LanguageRegistry::get();

        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_registry_has_fourteen_languages_in_order() {
        let codes: Vec<_> = LanguageRegistry::get()
            .list_enabled()
            .iter()
            .map(|lang| lang.code)
            .collect();

        assert_eq!(
            codes,
            vec!["en", "az", "tr", "de", "fr", "es", "pt", "ru", "zh", "ja", "ko", "ar", "cs", "uk"]
        );
    }

    #[test]
    fn test_get_by_code_german() {
        let config = LanguageRegistry::get().get_by_code("de").unwrap();

        assert_eq!(config.code, "de");
        assert_eq!(config.name, "German");
        assert_eq!(config.native_name, "Deutsch");
        assert!(!config.is_canonical);
        assert!(!config.rtl);
        assert!(config.enabled);
    }

    #[test]
    fn test_get_by_code_is_exact() {
        let registry = LanguageRegistry::get();
        assert!(registry.get_by_code("EN").is_none());
        assert!(registry.get_by_code("en-US").is_none());
        assert!(registry.get_by_code("").is_none());
    }

    #[test]
    fn test_canonical_returns_english() {
        let canonical = LanguageRegistry::get().canonical();

        assert_eq!(canonical.code, "en");
        assert!(canonical.is_canonical);
    }

    #[test]
    fn test_exactly_one_canonical() {
        let count = LanguageRegistry::get()
            .list_enabled()
            .iter()
            .filter(|lang| lang.is_canonical)
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_arabic_is_rtl() {
        let registry = LanguageRegistry::get();
        assert!(registry.get_by_code("ar").unwrap().rtl);
        assert!(
            registry
                .list_enabled()
                .iter()
                .filter(|lang| lang.rtl)
                .count()
                == 1
        );
    }

    #[test]
    fn test_is_enabled() {
        let registry = LanguageRegistry::get();
        assert!(registry.is_enabled("en"));
        assert!(registry.is_enabled("uk"));
        assert!(!registry.is_enabled("xx"));
        assert!(!registry.is_enabled("pricing"));
    }
}
