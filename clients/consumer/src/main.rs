//! Transaction consumer for txnflow
//!
//! Consumes a bounded number of transaction records from a Kafka topic,
//! printing each one. Stops early on an interrupt/terminate signal.

mod printer;

use printer::TransactionPrinter;
use txnflow_core::{
    init_tracing, ClientResult, ClientSettings, ConsumerRuntime, KafkaAdmin, SetupVerifier,
    TransportProfile,
};

#[tokio::main]
async fn main() -> ClientResult<()> {
    let settings = ClientSettings::load()?;
    init_tracing(&settings.log_level);

    tracing::info!("Starting txnflow consumer");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Broker: {}", settings.bootstrap_servers);
    tracing::info!("Topic: {}", settings.topic);
    tracing::info!("Group: {}", settings.group_id);

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
    tracing::info!("Using plain JSON deserialization (no Schema Registry)");

    let mut sink = TransactionPrinter::new(settings.message_count);
    let topic = settings.topic.clone();
    let mut runtime = ConsumerRuntime::connect(settings, &profile)?;
    runtime.subscribe()?;
    runtime.install_signal_handler();

    let report = runtime.run(&mut sink).await?;

    tracing::info!("Consumed {} messages from {}", report.counted, topic);
    if report.parse_failures > 0 {
        tracing::warn!("{} message(s) could not be parsed", report.parse_failures);
    }
    tracing::info!("Consumer closed");

    Ok(())
}
