//! Metrics service for collecting application metrics

use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics service for collecting application metrics
pub struct MetricsService {
    total_requests: AtomicU64,
    successful_requests: AtomicU64,
    failed_requests: AtomicU64,
    rate_limited_requests: AtomicU64,
    webhooks_received: AtomicU64,
    payments_confirmed: AtomicU64,
    idempotent_replays: AtomicU64,
    split_payments: AtomicU64,
    converted_donations: AtomicU64,
    start_time: std::time::Instant,
}

impl MetricsService {
    /// Create a new metrics service
    pub fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            successful_requests: AtomicU64::new(0),
            failed_requests: AtomicU64::new(0),
            rate_limited_requests: AtomicU64::new(0),
            webhooks_received: AtomicU64::new(0),
            payments_confirmed: AtomicU64::new(0),
            idempotent_replays: AtomicU64::new(0),
            split_payments: AtomicU64::new(0),
            converted_donations: AtomicU64::new(0),
            start_time: std::time::Instant::now(),
        }
    }

    /// Record a request
    pub fn record_request(&self, success: bool) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);

        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a rate limited request
    pub fn record_rate_limited_request(&self) {
        self.rate_limited_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an inbound webhook delivery
    pub fn record_webhook_received(&self) {
        self.webhooks_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a reconciliation outcome
    pub fn record_reconciliation(&self, outcome: &crate::application::services::ReconcileOutcome) {
        if outcome.already_processed {
            self.idempotent_replays.fetch_add(1, Ordering::Relaxed);
            return;
        }
        self.payments_confirmed.fetch_add(1, Ordering::Relaxed);
        if outcome.split_payment {
            self.split_payments.fetch_add(1, Ordering::Relaxed);
        }
        if outcome.converted_to_donate {
            self.converted_donations.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get current metrics
    pub fn get_metrics(&self) -> Value {
        serde_json::json!({
            "total_requests": self.total_requests.load(Ordering::Relaxed),
            "successful_requests": self.successful_requests.load(Ordering::Relaxed),
            "failed_requests": self.failed_requests.load(Ordering::Relaxed),
            "rate_limited_requests": self.rate_limited_requests.load(Ordering::Relaxed),
            "webhooks_received": self.webhooks_received.load(Ordering::Relaxed),
            "payments_confirmed": self.payments_confirmed.load(Ordering::Relaxed),
            "idempotent_replays": self.idempotent_replays.load(Ordering::Relaxed),
            "split_payments": self.split_payments.load(Ordering::Relaxed),
            "converted_donations": self.converted_donations.load(Ordering::Relaxed),
            "uptime_seconds": self.start_time.elapsed().as_secs(),
        })
    }
}

impl Default for MetricsService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::ReconcileOutcome;

    fn outcome(already: bool, split: bool, converted: bool) -> ReconcileOutcome {
        ReconcileOutcome {
            order_id: "1700000001".to_string(),
            already_processed: already,
            amount_mismatch: split || converted,
            split_payment: split,
            converted_to_donate: converted,
        }
    }

    #[test]
    fn test_reconciliation_counters() {
        let metrics = MetricsService::new();
        metrics.record_reconciliation(&outcome(false, true, false));
        metrics.record_reconciliation(&outcome(false, false, true));
        metrics.record_reconciliation(&outcome(true, false, false));

        let snapshot = metrics.get_metrics();
        assert_eq!(snapshot["payments_confirmed"], 2);
        assert_eq!(snapshot["split_payments"], 1);
        assert_eq!(snapshot["converted_donations"], 1);
        assert_eq!(snapshot["idempotent_replays"], 1);
    }

    #[test]
    fn test_request_counters() {
        let metrics = MetricsService::new();
        metrics.record_request(true);
        metrics.record_request(false);
        metrics.record_rate_limited_request();

        let snapshot = metrics.get_metrics();
        assert_eq!(snapshot["total_requests"], 2);
        assert_eq!(snapshot["successful_requests"], 1);
        assert_eq!(snapshot["failed_requests"], 1);
        assert_eq!(snapshot["rate_limited_requests"], 1);
    }
}
