use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Public identity of the site, used for absolute URLs and metadata.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Absolute origin without trailing slash, e.g. `https://asyncz.com`
    pub site_url: String,
    pub site_name: String,
    pub default_social_image: String,
    pub contact_email: String,
}

impl SiteConfig {
    /// Absolute URL for a site-relative path.
    pub fn absolute_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.site_url, path)
        } else {
            format!("{}/{}", self.site_url, path)
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        let site_url = "https://asyncz.com".to_string();
        Self {
            default_social_image: format!("{}/favicon/icon.png", site_url),
            site_url,
            site_name: "asyncz".to_string(),
            contact_email: "info@asyncz.com".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Site identity
    pub site: SiteConfig,

    // Backend API
    pub api_base_url: String,
    pub api_timeout: Duration,

    // Content
    pub locales_dir: PathBuf,
    pub static_dir: PathBuf,

    // Referral analytics throttle window
    pub analytics_window: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            site: SiteConfig::default(),
            api_base_url: "http://localhost:5000/api".to_string(),
            api_timeout: Duration::from_secs(10),
            locales_dir: PathBuf::from("locales"),
            static_dir: PathBuf::from("public"),
            analytics_window: Duration::from_millis(3000),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup (environment, tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let site_url = var("SITE_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or(defaults.site.site_url);
        let default_social_image = var("DEFAULT_SOCIAL_IMAGE")
            .unwrap_or_else(|| format!("{}/favicon/icon.png", site_url));

        Ok(Self {
            port: match var("PORT") {
                Some(v) => v.parse().with_context(|| format!("Invalid PORT: {}", v))?,
                None => defaults.port,
            },

            site: SiteConfig {
                site_url,
                site_name: var("SITE_NAME").unwrap_or(defaults.site.site_name),
                default_social_image,
                contact_email: var("CONTACT_EMAIL").unwrap_or(defaults.site.contact_email),
            },

            api_base_url: var("API_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            api_timeout: match var("API_TIMEOUT_SECS") {
                Some(v) => Duration::from_secs(
                    v.parse()
                        .with_context(|| format!("Invalid API_TIMEOUT_SECS: {}", v))?,
                ),
                None => defaults.api_timeout,
            },

            locales_dir: var("LOCALES_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.locales_dir),
            static_dir: var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),

            analytics_window: match var("ANALYTICS_WINDOW_MS") {
                Some(v) => Duration::from_millis(
                    v.parse()
                        .with_context(|| format!("Invalid ANALYTICS_WINDOW_MS: {}", v))?,
                ),
                None => defaults.analytics_window,
            },
        })
    }
}
