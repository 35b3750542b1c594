//! Runtimes binding the exchange drivers to the Kafka transport.
//!
//! The runtimes own client construction and the transport-facing half of
//! each loop; the loop logic itself lives in [`crate::exchange`].

mod receive;
mod send;

pub use receive::ConsumerRuntime;
pub use send::{ProducerRuntime, SendReport};

/// Initialize tracing/logging. Safe to call more than once: later calls are
/// no-ops.
pub fn init_tracing(default_filter: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .ok();
}
