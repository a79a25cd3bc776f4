//! Thin client for the backend REST API.
//!
//! The site only needs two calls: legal policy text for the legal pages and
//! the referral analytics log. Everything else the backend offers belongs to
//! the product, not the marketing site.

use crate::i18n::Language;
use crate::retry::{with_retry_if, RetryConfig};
use anyhow::Context;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const FALLBACK_ERROR_MESSAGE: &str = "An error occurred";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("{message} (HTTP {status})")]
    Status {
        status: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ApiError {
    /// Rate limiting, server errors and transport failures are transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Status { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || *status >= 500
            }
            ApiError::Network(_) => true,
            ApiError::Decode(_) => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Kinds of legal documents the backend serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegalAgreementType {
    PrivacyPolicy,
    CookiePolicy,
    TermsConditions,
}

impl LegalAgreementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LegalAgreementType::PrivacyPolicy => "privacy-policy",
            LegalAgreementType::CookiePolicy => "cookie-policy",
            LegalAgreementType::TermsConditions => "terms-conditions",
        }
    }
}

/// Response of `GET /legal/policy`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LegalPolicy {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
struct AnalyticsLogRequest<'a> {
    source: &'a str,
    language: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Backend API client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    retry: RetryConfig,
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. `https://api.asyncz.com/api`).
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryConfig::page_fetch(),
        })
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch the legal document of `kind` in `language`.
    pub async fn get_legal_policy(
        &self,
        kind: LegalAgreementType,
        language: Language,
    ) -> Result<LegalPolicy, ApiError> {
        let url = self.url("/legal/policy");
        let url = url.as_str();
        let client = &self.client;

        with_retry_if(
            &self.retry,
            "legal_policy",
            || async move {
                let response = client
                    .get(url)
                    .query(&[("type", kind.as_str()), ("language", language.code())])
                    .send()
                    .await
                    .map_err(ApiError::Network)?;

                let response = check_status(response).await?;
                response.json::<LegalPolicy>().await.map_err(ApiError::Decode)
            },
            ApiError::is_retryable,
        )
        .await
    }

    /// Record a visit that arrived with a `ref` query parameter.
    ///
    /// Sent once: the caller owns throttling and retry decisions.
    pub async fn create_analytics_log(
        &self,
        source: &str,
        language: Language,
    ) -> Result<(), ApiError> {
        let body = AnalyticsLogRequest {
            source,
            language: language.code(),
        };

        let response = self
            .client
            .post(self.url("/analytics/log"))
            .json(&body)
            .send()
            .await
            .map_err(ApiError::Network)?;

        check_status(response).await?;
        debug!("Analytics log recorded for source {}", source);
        Ok(())
    }
}

/// Turn a non-success response into [`ApiError::Status`], taking the message
/// from the body's `message` field when there is one.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let details = serde_json::from_str::<serde_json::Value>(&body).ok();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());

    Err(ApiError::Status {
        status: status.as_u16(),
        message,
        details,
    })
}
