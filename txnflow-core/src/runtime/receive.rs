//! Consumer runtime: cooperative bounded receive loop.

use crate::config::ClientSettings;
use crate::error::{ClientError, ClientResult};
use crate::exchange::{run_receive_loop, PollEvent, ReceiveProgress, ReceiveReport};
use crate::metrics::ExchangeMetrics;
use crate::policy::TransportProfile;
use crate::traits::RecordSink;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::error::KafkaError;
use rdkafka::types::RDKafkaErrorCode;
use rdkafka::Message;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};

/// Runtime for the receive variant of the exchange loop.
pub struct ConsumerRuntime {
    consumer: StreamConsumer,
    settings: ClientSettings,
    metrics: ExchangeMetrics,
    shutdown: Arc<AtomicBool>,
}

impl ConsumerRuntime {
    /// Build the consumer from the resolved transport profile.
    pub fn connect(settings: ClientSettings, profile: &TransportProfile) -> ClientResult<Self> {
        let consumer: StreamConsumer = profile
            .consumer_config(&settings.bootstrap_servers, &settings.group_id)
            .create()
            .map_err(|e| ClientError::config(format!("failed to create consumer: {}", e)))?;

        let metrics = ExchangeMetrics::new(&profile.client_id, &settings.topic);
        metrics.set_health(true);

        Ok(Self {
            consumer,
            settings,
            metrics,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn subscribe(&self) -> ClientResult<()> {
        self.consumer
            .subscribe(&[self.settings.topic.as_str()])
            .map_err(|e| {
                ClientError::config(format!(
                    "failed to subscribe to topic {}: {}",
                    self.settings.topic, e
                ))
            })?;
        info!("Listening on topic: {}", self.settings.topic);
        Ok(())
    }

    /// Install interrupt/terminate handlers that flip the stop flag. The
    /// loop observes the flag within one poll interval.
    pub fn install_signal_handler(&self) {
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            wait_for_signal().await;
            info!("Received shutdown signal");
            shutdown.store(true, Ordering::Relaxed);
        });
    }

    /// Consume up to `message_count` messages, handing each payload to the
    /// sink. Stops early on a termination signal or a broker-fatal error;
    /// the latter is reported in the returned summary rather than as a
    /// process failure.
    pub async fn run<S: RecordSink>(&mut self, sink: &mut S) -> ClientResult<ReceiveReport> {
        let progress = ReceiveProgress::new(self.settings.message_count, self.settings.count_policy);
        let poll_interval = self.settings.poll_interval();
        let consumer = &self.consumer;
        let metrics = &self.metrics;

        let poll = move || {
            let consumer = consumer;
            let metrics = metrics;
            async move {
                match tokio::time::timeout(poll_interval, consumer.recv()).await {
                    // Quiet interval; lets the loop re-check the stop flag.
                    Err(_) => PollEvent::Idle,
                    Ok(Ok(message)) => {
                        metrics.record_received();
                        PollEvent::Message(
                            message.payload().map(|p| p.to_vec()).unwrap_or_default(),
                        )
                    }
                    Ok(Err(KafkaError::MessageConsumption(RDKafkaErrorCode::AllBrokersDown))) => {
                        PollEvent::Fatal(ClientError::BrokerFatal("all brokers down".to_string()))
                    }
                    Ok(Err(e)) => PollEvent::RecoverableError(ClientError::unreachable_with_source(
                        "poll error",
                        e,
                    )),
                }
            }
        };

        let report = run_receive_loop(poll, sink, progress, &self.shutdown).await;

        if let Some(fatal) = &report.fatal {
            error!("Receive loop stopped by broker error: {}", fatal);
            self.metrics.record_error("broker_fatal");
        }
        self.metrics.set_health(false);

        Ok(report)
    }
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate =
        signal(SignalKind::terminate()).expect("Failed to install terminate handler");
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = terminate.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for ctrl-c");
}
