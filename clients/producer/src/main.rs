//! Transaction producer for txnflow
//!
//! Publishes a bounded number of synthetic financial transactions to a Kafka
//! topic, verifying broker reachability and topic existence first.

mod generator;

use generator::TransactionGenerator;
use txnflow_core::{
    init_tracing, ClientResult, ClientSettings, KafkaAdmin, ProducerRuntime, SetupVerifier,
    TransportProfile,
};

#[tokio::main]
async fn main() -> ClientResult<()> {
    let settings = ClientSettings::load()?;
    init_tracing(&settings.log_level);

    tracing::info!("Starting txnflow producer");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Broker: {}", settings.bootstrap_servers);
    tracing::info!("Topic: {}", settings.topic);

    let profile = TransportProfile::resolve(&settings.bootstrap_servers, &settings.credentials);

    let verifier = SetupVerifier::new(
        KafkaAdmin::new(&profile, &settings.bootstrap_servers),
        settings.metadata_timeout(),
    );
    verifier
        .verify(&profile, &settings.bootstrap_servers, &settings.topic)
        .await
        .map_err(|e| {
            tracing::error!("Kafka configuration error - Exiting: {}", e);
            e
        })?;
    tracing::info!("Connected to Kafka ({})", settings.bootstrap_servers);
    tracing::info!("Using plain JSON serialization (no Schema Registry)");

    let mut source = TransactionGenerator::new();
    let topic = settings.topic.clone();
    let mut runtime = ProducerRuntime::connect(settings, &profile)?;
    let report = runtime.run(&mut source).await?;

    tracing::info!(
        "Successfully produced {} messages to topic {}",
        report.sent,
        topic
    );
    if report.delivery_failures > 0 {
        tracing::warn!(
            "{} message(s) reported delivery failures",
            report.delivery_failures
        );
    }

    Ok(())
}
