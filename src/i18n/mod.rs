//! Internationalization (i18n) module for the fourteen site languages.
//!
//! All locale logic lives here and is synchronous: nothing in this module
//! performs I/O apart from [`Catalog::load_dir`] at startup.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for supported languages and their metadata
//! - `language`: Validated `Language` handle, only constructible for registry members
//! - `path`: Locale prefix codec for URL paths
//! - `preference`: Stored choice, then browser language, then default
//! - `controller`: Route guard and per-session locale state
//! - `catalog`: Translation trees and key lookup with default-language fallback
//! - `validator`: Bundle completeness checks against the default bundle
//! - `metrics`: Lookup hit/fallback/missing counters
//!
//! # Example
//!
//! ```rust,ignore
//! use asyncz_site::i18n::{localized_path, strip_locale_prefix, Language};
//!
//! let german = Language::from_code("de")?;
//! assert_eq!(localized_path(german, "/en/pricing?x=1"), "/de/pricing?x=1");
//! assert_eq!(strip_locale_prefix("/de/pricing"), "/pricing");
//! ```

mod catalog;
mod controller;
mod language;
mod metrics;
mod path;
mod preference;
mod registry;
mod validator;

pub use catalog::{interpolate, lookup, Catalog, TranslationValue, Translator};
pub use controller::{
    route_guard, LocaleController, Navigation, NavigationMode, RouteDecision, Settled,
};
pub use language::Language;
pub use metrics::{LookupMetrics, MetricsReport};
pub use path::{
    detect_locale_in_path, is_external_link, localized_path, split_path_segments,
    split_path_suffix, strip_locale_prefix, trim_slashes,
};
pub use preference::{match_browser_tag, parse_accept_language, resolve_preferred_language};
pub use registry::{LanguageConfig, LanguageRegistry};
pub use validator::{CatalogValidator, ValidationReport};
