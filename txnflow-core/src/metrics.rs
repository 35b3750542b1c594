//! Exchange metrics.

use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Metric recorder labeled by client id and topic.
///
/// Emits through the `metrics` facade; wiring an exporter is left to the
/// embedding process.
pub struct ExchangeMetrics {
    client_id: String,
    topic: String,
}

impl ExchangeMetrics {
    pub fn new(client_id: &str, topic: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            topic: topic.to_string(),
        }
    }

    pub fn record_sent(&self) {
        counter!(
            "txnflow_messages_sent_total",
            "client_id" => self.client_id.clone(),
            "topic" => self.topic.clone()
        )
        .increment(1);
    }

    pub fn record_received(&self) {
        counter!(
            "txnflow_messages_received_total",
            "client_id" => self.client_id.clone(),
            "topic" => self.topic.clone()
        )
        .increment(1);
    }

    pub fn record_error(&self, kind: &str) {
        counter!(
            "txnflow_errors_total",
            "client_id" => self.client_id.clone(),
            "topic" => self.topic.clone(),
            "kind" => kind.to_string()
        )
        .increment(1);
    }

    pub fn record_delivery_time(&self, duration: Duration) {
        histogram!(
            "txnflow_delivery_seconds",
            "client_id" => self.client_id.clone(),
            "topic" => self.topic.clone()
        )
        .record(duration.as_secs_f64());
    }

    pub fn set_health(&self, up: bool) {
        gauge!(
            "txnflow_client_up",
            "client_id" => self.client_id.clone(),
            "topic" => self.topic.clone()
        )
        .set(if up { 1.0 } else { 0.0 });
    }
}
