//! asyncz marketing site.
//!
//! Fourteen languages under `/<code>/...` URL prefixes, a locale guard that
//! redirects unprefixed paths to the visitor's preferred language, catalog
//! backed page copy, and per-page SEO metadata.

pub mod analytics;
pub mod api;
pub mod config;
pub mod i18n;
pub mod pages;
pub mod render;
pub mod retry;
pub mod seo;
pub mod server;
pub mod storage;
