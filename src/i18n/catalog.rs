//! Translation catalog and key lookup.
//!
//! Each language has one translation tree, loaded from `<code>.json` at
//! startup and never mutated. Keys are dotted paths into the tree
//! (`faq.categories.0.title`). Lookup falls back from the active language to
//! the default language and finally to the key itself.

use crate::i18n::metrics::LookupMetrics;
use crate::i18n::Language;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{info, warn};

/// A node in a translation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TranslationValue {
    Text(String),
    List(Vec<TranslationValue>),
    Tree(BTreeMap<String, TranslationValue>),
}

impl TranslationValue {
    /// An empty tree.
    pub fn empty() -> Self {
        TranslationValue::Tree(BTreeMap::new())
    }

    /// Convert parsed JSON. `null` becomes `None` and is dropped from
    /// containing objects and arrays; numbers and booleans become text.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(TranslationValue::Text(b.to_string())),
            Value::Number(n) => Some(TranslationValue::Text(n.to_string())),
            Value::String(s) => Some(TranslationValue::Text(s)),
            Value::Array(items) => Some(TranslationValue::List(
                items.into_iter().filter_map(Self::from_json).collect(),
            )),
            Value::Object(map) => Some(TranslationValue::Tree(
                map.into_iter()
                    .filter_map(|(key, value)| Self::from_json(value).map(|v| (key, v)))
                    .collect(),
            )),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            TranslationValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[TranslationValue]> {
        match self {
            TranslationValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&BTreeMap<String, TranslationValue>> {
        match self {
            TranslationValue::Tree(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a direct child by key (tree) or index (list).
    pub fn child(&self, segment: &str) -> Option<&TranslationValue> {
        match self {
            TranslationValue::Tree(map) => map.get(segment),
            TranslationValue::List(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            TranslationValue::Text(_) => None,
        }
    }

    /// Text of a direct child, for list items shaped like `{title, description}`.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.child(key).and_then(TranslationValue::as_text)
    }
}

/// Walk `key` (dot-separated) down `tree`.
pub fn lookup<'a>(tree: &'a TranslationValue, key: &str) -> Option<&'a TranslationValue> {
    match key.split_once('.') {
        None => tree.child(key),
        Some((head, rest)) => tree.child(head).and_then(|child| lookup(child, rest)),
    }
}

/// All translation trees, keyed by language.
#[derive(Debug)]
pub struct Catalog {
    trees: HashMap<Language, TranslationValue>,
    metrics: LookupMetrics,
}

impl Catalog {
    /// Build a catalog from already-parsed trees. Languages without a tree
    /// get an empty one.
    pub fn from_trees(mut trees: HashMap<Language, TranslationValue>) -> Self {
        for language in Language::all() {
            trees.entry(language).or_insert_with(TranslationValue::empty);
        }
        Self {
            trees,
            metrics: LookupMetrics::default(),
        }
    }

    /// Load `<code>.json` for every language from `dir`.
    ///
    /// The default language's bundle is required. Other bundles are optional:
    /// a missing one is logged and every lookup for it falls back.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut trees = HashMap::new();

        for language in Language::all() {
            let path = dir.join(format!("{}.json", language.code()));
            if !path.exists() {
                if language.is_default() {
                    anyhow::bail!(
                        "Default translation bundle not found: {}",
                        path.display()
                    );
                }
                warn!(
                    "No translation bundle for {} ({}), falling back to {}",
                    language.name(),
                    language.code(),
                    Language::default_language().code()
                );
                continue;
            }

            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let json: Value = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            let tree = TranslationValue::from_json(json).unwrap_or_else(TranslationValue::empty);
            if tree.as_tree().is_none() {
                anyhow::bail!("Translation bundle {} must be a JSON object", path.display());
            }
            trees.insert(language, tree);
        }

        info!("Loaded {} translation bundles from {}", trees.len(), dir.display());
        Ok(Self::from_trees(trees))
    }

    pub fn tree(&self, language: Language) -> &TranslationValue {
        // from_trees fills every language
        &self.trees[&language]
    }

    /// Resolve `key` for `language`, falling back to the default language.
    pub fn resolve(&self, language: Language, key: &str) -> Option<&TranslationValue> {
        if let Some(value) = lookup(self.tree(language), key) {
            self.metrics.record_hit();
            return Some(value);
        }

        let default = Language::default_language();
        if language != default {
            if let Some(value) = lookup(self.tree(default), key) {
                self.metrics.record_fallback();
                return Some(value);
            }
        }

        self.metrics.record_missing();
        None
    }

    pub fn metrics(&self) -> &LookupMetrics {
        &self.metrics
    }

    /// A lookup handle bound to `language`.
    pub fn translator(&self, language: Language) -> Translator<'_> {
        Translator {
            catalog: self,
            language,
        }
    }
}

/// Translation lookups for one active language.
#[derive(Clone, Copy)]
pub struct Translator<'a> {
    catalog: &'a Catalog,
    language: Language,
}

impl<'a> Translator<'a> {
    pub fn language(&self) -> Language {
        self.language
    }

    /// Resolve `key` for optional content; absence is not logged.
    pub fn get(&self, key: &str) -> Option<&'a TranslationValue> {
        self.catalog.resolve(self.language, key)
    }

    /// Resolve `key`; the key itself comes back as text when nothing is found.
    pub fn t(&self, key: &str) -> Cow<'a, TranslationValue> {
        match self.catalog.resolve(self.language, key) {
            Some(value) => Cow::Borrowed(value),
            None => {
                warn!("Translation missing for key: {}", key);
                Cow::Owned(TranslationValue::Text(key.to_string()))
            }
        }
    }

    /// Resolve `key` as text. Non-text values yield the key.
    pub fn text(&self, key: &str) -> Cow<'a, str> {
        match self.t(key) {
            Cow::Borrowed(TranslationValue::Text(s)) => Cow::Borrowed(s.as_str()),
            Cow::Owned(TranslationValue::Text(s)) => Cow::Owned(s),
            _ => {
                warn!("Translation for key {} is not text", key);
                Cow::Owned(key.to_string())
            }
        }
    }

    /// Resolve `key` as a list. Missing or non-list values yield an empty slice.
    pub fn list(&self, key: &str) -> &'a [TranslationValue] {
        self.catalog
            .resolve(self.language, key)
            .and_then(TranslationValue::as_list)
            .unwrap_or(&[])
    }

    /// Resolve `key` as text and substitute `{name}` placeholders.
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        interpolate(&self.text(key), args)
    }
}

/// Replace `{name}` placeholders. Unknown placeholders are left as they are.
pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (name, value) in args {
        result = result.replace(&format!("{{{}}}", name), value);
    }
    result
}
