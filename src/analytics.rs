//! Referral visit logging.
//!
//! A visit arriving with `?ref=<source>` is reported to the backend, at most
//! once per throttle window per visitor. The timestamp is written to the
//! preference store *before* the request goes out so that a burst of page
//! loads does not fan out into a burst of log calls. On failure the
//! timestamp is removed again so the next visit can retry.
//!
//! The throttle is best-effort: it lives in visitor-controlled storage and is
//! not a server-side rate limit.

use crate::api::{ApiClient, ApiError};
use crate::i18n::Language;
use crate::storage::{PreferenceStore, ANALYTICS_TIMESTAMP_KEY};
use std::time::Duration;
use tracing::{debug, info, warn};

/// What happened to a referral visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferralOutcome {
    /// No `ref` parameter.
    NoReferral,
    /// A log was sent within the window.
    Throttled,
    Sent,
    /// The backend call failed and the timestamp was rolled back.
    Failed,
}

/// Permission to send one referral log, issued after the timestamp is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralPermit {
    source: String,
    timestamp_ms: i64,
}

impl ReferralPermit {
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Remove the stored timestamp, unless a later visit replaced it.
    pub fn rollback(&self, storage: &PreferenceStore) {
        let current = storage.get(ANALYTICS_TIMESTAMP_KEY);
        if current.as_deref() == Some(self.timestamp_ms.to_string().as_str()) {
            storage.remove(ANALYTICS_TIMESTAMP_KEY);
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReferralTracker {
    window: Duration,
}

impl ReferralTracker {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    /// Check the throttle for a visit with `source` at the current time.
    pub fn begin(&self, storage: &PreferenceStore, source: Option<&str>) -> Option<ReferralPermit> {
        self.begin_at(storage, source, chrono::Utc::now().timestamp_millis())
    }

    /// Check the throttle at `now_ms` (milliseconds since the epoch).
    ///
    /// # Returns
    /// A permit when the log should be sent. The timestamp is already stored.
    pub fn begin_at(
        &self,
        storage: &PreferenceStore,
        source: Option<&str>,
        now_ms: i64,
    ) -> Option<ReferralPermit> {
        let source = source.map(str::trim).filter(|s| !s.is_empty())?;

        if let Some(last) = storage
            .get(ANALYTICS_TIMESTAMP_KEY)
            .and_then(|v| v.parse::<i64>().ok())
        {
            let elapsed = now_ms.saturating_sub(last);
            if elapsed >= 0 && (elapsed as u128) < self.window.as_millis() {
                debug!("Referral log skipped, last request {}ms ago", elapsed);
                return None;
            }
        }

        storage.set(ANALYTICS_TIMESTAMP_KEY, &now_ms.to_string());
        Some(ReferralPermit {
            source: source.to_string(),
            timestamp_ms: now_ms,
        })
    }

    /// Throttle, send, and roll back on failure.
    pub async fn track(
        &self,
        api: &ApiClient,
        storage: &PreferenceStore,
        source: Option<&str>,
        language: Language,
    ) -> ReferralOutcome {
        if source.map(str::trim).filter(|s| !s.is_empty()).is_none() {
            return ReferralOutcome::NoReferral;
        }

        let Some(permit) = self.begin(storage, source) else {
            return ReferralOutcome::Throttled;
        };

        match send(api, &permit, language).await {
            Ok(()) => ReferralOutcome::Sent,
            Err(_) => {
                permit.rollback(storage);
                ReferralOutcome::Failed
            }
        }
    }
}

/// Send the log for an issued permit.
pub async fn send(api: &ApiClient, permit: &ReferralPermit, language: Language) -> Result<(), ApiError> {
    match api.create_analytics_log(permit.source(), language).await {
        Ok(()) => {
            info!("Referral logged: {} ({})", permit.source(), language);
            Ok(())
        }
        Err(e) => {
            warn!("Failed to log referral {}: {}", permit.source(), e);
            Err(e)
        }
    }
}
