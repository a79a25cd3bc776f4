//! Translation bundle validation.
//!
//! Every bundle is checked against the default-language bundle, which is the
//! source all others are translated from:
//! - keys present in the default bundle but missing elsewhere (warning; the
//!   lookup falls back, so the page still renders)
//! - values whose shape differs, e.g. a list where the default has text
//!   (error; callers expecting a list get nothing)
//! - `{placeholder}` names that differ from the default text (warning)

use crate::i18n::catalog::{Catalog, TranslationValue};
use crate::i18n::Language;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that break rendering of the affected keys
    pub errors: Vec<String>,

    /// Problems that degrade to the default language
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for catalog completeness.
pub struct CatalogValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl CatalogValidator {
    /// Validate every non-default bundle against the default bundle.
    pub fn validate(catalog: &Catalog) -> ValidationReport {
        let mut report = ValidationReport::new();
        let default = Language::default_language();
        let reference = catalog.tree(default);

        for language in Language::all() {
            if language == default {
                continue;
            }

            let tree = catalog.tree(language);
            if tree.as_tree().map(|map| map.is_empty()).unwrap_or(true) {
                report.warnings.push(format!(
                    "{}: no translations, every key falls back to {}",
                    language.code(),
                    default.code()
                ));
                continue;
            }

            Self::compare(language, "", reference, tree, &mut report);
        }

        report
    }

    fn compare(
        language: Language,
        key: &str,
        reference: &TranslationValue,
        candidate: &TranslationValue,
        report: &mut ValidationReport,
    ) {
        match (reference, candidate) {
            (TranslationValue::Tree(expected), TranslationValue::Tree(actual)) => {
                for (child_key, expected_child) in expected {
                    let path = if key.is_empty() {
                        child_key.clone()
                    } else {
                        format!("{}.{}", key, child_key)
                    };
                    match actual.get(child_key) {
                        Some(actual_child) => {
                            Self::compare(language, &path, expected_child, actual_child, report)
                        }
                        None => report
                            .warnings
                            .push(format!("{}: missing key {}", language.code(), path)),
                    }
                }
            }
            (TranslationValue::Text(expected), TranslationValue::Text(actual)) => {
                let expected_names = Self::extract_placeholders(expected);
                let actual_names = Self::extract_placeholders(actual);
                if expected_names != actual_names {
                    report.warnings.push(format!(
                        "{}: placeholder mismatch at {}: expected {:?}, found {:?}",
                        language.code(),
                        key,
                        expected_names,
                        actual_names
                    ));
                }
            }
            // List lengths legitimately differ (e.g. localized blog posts)
            (TranslationValue::List(_), TranslationValue::List(_)) => {}
            _ => report.errors.push(format!(
                "{}: {} is {} but {} has {}",
                language.code(),
                key,
                Self::shape(candidate),
                Language::default_language().code(),
                Self::shape(reference)
            )),
        }
    }

    fn shape(value: &TranslationValue) -> &'static str {
        match value {
            TranslationValue::Text(_) => "text",
            TranslationValue::List(_) => "a list",
            TranslationValue::Tree(_) => "a tree",
        }
    }

    /// Extract all `{name}` placeholders from text
    fn extract_placeholders(text: &str) -> BTreeSet<String> {
        let regex =
            PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{([a-zA-Z0-9_]+)\}").unwrap());

        regex
            .captures_iter(text)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }
}
