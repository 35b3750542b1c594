//! Producer runtime: bounded, fail-fast publish with one bounded flush.

use crate::config::ClientSettings;
use crate::error::{ClientError, ClientResult};
use crate::exchange::run_send_loop;
use crate::metrics::ExchangeMetrics;
use crate::policy::TransportProfile;
use crate::traits::RecordSource;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use std::time::Instant;
use tracing::{info, warn};

/// Outcome of a completed send run.
#[derive(Debug)]
pub struct SendReport {
    /// Messages accepted by the enqueue.
    pub sent: usize,
    /// Delivery failures observed after the flush. Observed only, never
    /// retried.
    pub delivery_failures: usize,
}

/// Runtime for the send variant of the exchange loop.
pub struct ProducerRuntime {
    producer: FutureProducer,
    settings: ClientSettings,
    metrics: ExchangeMetrics,
}

impl ProducerRuntime {
    /// Build the producer from the resolved transport profile.
    pub fn connect(settings: ClientSettings, profile: &TransportProfile) -> ClientResult<Self> {
        let producer: FutureProducer = profile
            .client_config(&settings.bootstrap_servers)
            .create()
            .map_err(|e| ClientError::config(format!("failed to create producer: {}", e)))?;

        let metrics = ExchangeMetrics::new(&profile.client_id, &settings.topic);
        metrics.set_health(true);

        Ok(Self {
            producer,
            settings,
            metrics,
        })
    }

    /// Publish `message_count` records from the source.
    ///
    /// Each record is enqueued without blocking; the first enqueue failure
    /// aborts the run with no flush and no partial-send recovery. After the
    /// loop, one flush bounded by `flush_timeout_ms` awaits delivery
    /// confirmations before returning.
    pub async fn run<S: RecordSource>(&mut self, source: &mut S) -> ClientResult<SendReport> {
        info!("Producing to topic '{}'", self.settings.topic);

        let count = self.settings.message_count;
        let topic = self.settings.topic.clone();
        let producer = &self.producer;
        let metrics = &self.metrics;
        let mut deliveries = Vec::with_capacity(count);

        let sent = run_send_loop(
            source,
            |seq, record| {
                let delivery = producer
                    .send_result(
                        FutureRecord::to(&topic)
                            .key(&record.key)
                            .payload(&record.payload),
                    )
                    .map_err(|(e, _)| {
                        ClientError::enqueue_with_source("failed to enqueue message", e)
                    })?;

                metrics.record_sent();
                info!(
                    "Produced message {}/{}: {}",
                    seq,
                    count,
                    String::from_utf8_lossy(&record.payload)
                );
                deliveries.push(delivery);
                Ok(())
            },
            count,
        )?;

        // One bounded wait for outstanding deliveries; the process exits
        // regardless of what is still in flight afterwards.
        let flush_start = Instant::now();
        let flushed = match producer.flush(self.settings.flush_timeout()) {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    "Flush did not complete within {}ms: {}",
                    self.settings.flush_timeout_ms, e
                );
                self.metrics.record_error("flush");
                false
            }
        };

        let mut delivery_failures = 0;
        if flushed {
            for delivery in deliveries {
                match delivery.await {
                    Ok(Ok(_)) => {}
                    Ok(Err((e, _))) => {
                        warn!("ERROR: Message failed delivery: {}", e);
                        self.metrics.record_error("delivery");
                        delivery_failures += 1;
                    }
                    Err(_) => {
                        warn!("Delivery status unavailable");
                        delivery_failures += 1;
                    }
                }
            }
            self.metrics.record_delivery_time(flush_start.elapsed());
        }

        self.metrics.set_health(false);

        Ok(SendReport {
            sent,
            delivery_failures,
        })
    }
}
