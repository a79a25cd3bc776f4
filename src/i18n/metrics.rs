//! Translation lookup metrics.
//!
//! Counts how lookups resolve: directly in the active language, through the
//! default-language fallback, or not at all. A rising fallback or missing
//! count is the first sign that a bundle has drifted from English.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Lookup counters owned by a catalog.
#[derive(Debug, Default)]
pub struct LookupMetrics {
    /// Keys found in the active language
    hits: AtomicUsize,

    /// Keys found only in the default language
    fallbacks: AtomicUsize,

    /// Keys found nowhere (rendered as the raw key)
    missing: AtomicUsize,
}

impl LookupMetrics {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_missing(&self) {
        self.missing.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    pub fn missing(&self) -> usize {
        self.missing.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.hits();
        let fallbacks = self.fallbacks();
        let missing = self.missing();
        let total = hits + fallbacks + missing;

        let rate = |count: usize| {
            if total > 0 {
                (count as f64 / total as f64) * 100.0
            } else {
                0.0
            }
        };

        MetricsReport {
            lookups: total,
            hits,
            fallbacks,
            missing,
            hit_rate: rate(hits),
            fallback_rate: rate(fallbacks),
            missing_rate: rate(missing),
        }
    }
}

/// Snapshot of lookup statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Total number of lookups
    pub lookups: usize,

    pub hits: usize,
    pub fallbacks: usize,
    pub missing: usize,

    /// Percentages of all lookups (0-100)
    pub hit_rate: f64,
    pub fallback_rate: f64,
    pub missing_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let metrics = LookupMetrics::default();
        assert_eq!(metrics.hits(), 0);
        assert_eq!(metrics.fallbacks(), 0);
        assert_eq!(metrics.missing(), 0);
    }

    #[test]
    fn test_report_empty() {
        let report = LookupMetrics::default().report();

        assert_eq!(report.lookups, 0);
        assert_eq!(report.hit_rate, 0.0);
        assert_eq!(report.fallback_rate, 0.0);
        assert_eq!(report.missing_rate, 0.0);
    }

    #[test]
    fn test_report_rates() {
        let metrics = LookupMetrics::default();

        // 2 hits, 1 fallback, 1 missing
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_fallback();
        metrics.record_missing();

        let report = metrics.report();
        assert_eq!(report.lookups, 4);
        assert_eq!(report.hit_rate, 50.0);
        assert_eq!(report.fallback_rate, 25.0);
        assert_eq!(report.missing_rate, 25.0);
    }

    #[test]
    fn test_report_serializes() {
        let metrics = LookupMetrics::default();
        metrics.record_missing();

        let json = serde_json::to_value(metrics.report()).unwrap();
        assert_eq!(json["missing"], 1);
        assert_eq!(json["missing_rate"], 100.0);
    }
}
