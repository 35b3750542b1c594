//! # Txnflow Core
//!
//! Shared library for the txnflow exchange clients.
//!
//! Two thin binaries (a transaction producer and a transaction consumer)
//! exchange synthetic financial transactions through a Kafka broker. This
//! crate owns everything the two share: the connection policy that decides
//! transport security from the endpoint address, the setup verification that
//! confirms reachability and topic existence before any exchange begins, the
//! bounded exchange-loop drivers, the payload schema, and the configuration
//! loading.
//!
//! ## Overview
//!
//! A run proceeds in three steps:
//! 1. **Resolve**: classify the bootstrap address as local or remote and
//!    derive the transport profile (no network I/O).
//! 2. **Verify**: for remote endpoints, open a short-lived administrative
//!    session, fetch cluster metadata with a bounded timeout, and check the
//!    topic exists. Local/dev brokers skip this entirely.
//! 3. **Exchange**: run the bounded send or receive loop with the verified
//!    profile.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use txnflow_core::{ClientSettings, KafkaAdmin, SetupVerifier, TransportProfile};
//!
//! # async fn run() -> txnflow_core::ClientResult<()> {
//! let settings = ClientSettings::load()?;
//! let profile = TransportProfile::resolve(&settings.bootstrap_servers, &settings.credentials);
//!
//! let verifier = SetupVerifier::new(
//!     KafkaAdmin::new(&profile, &settings.bootstrap_servers),
//!     settings.metadata_timeout(),
//! );
//! verifier
//!     .verify(&profile, &settings.bootstrap_servers, &settings.topic)
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Design notes
//!
//! - No retries anywhere: enqueue failures abort the producer, broker-fatal
//!   errors stop the consumer, malformed payloads are skipped. This is a
//!   deliberate simplicity choice.
//! - The verification is advisory: the topic can disappear between the check
//!   and the exchange, so the loops handle their own failures.

mod config;
mod error;
mod exchange;
mod metrics;
mod policy;
mod record;
mod runtime;
mod traits;
mod verify;

// Re-export public API
pub use config::{ClientSettings, CountPolicy, Credentials};
pub use error::{ClientError, ClientResult};
pub use exchange::{
    run_receive_loop, run_send_loop, LoopState, PollEvent, ReceiveProgress, ReceiveReport,
};
pub use metrics::ExchangeMetrics;
pub use policy::{
    is_local_endpoint, SecurityMode, TransportProfile, DEFAULT_CLIENT_ID, LOCAL_ENDPOINT_MARKERS,
};
pub use record::{Transaction, TransactionStatus, TransactionType};
pub use runtime::{init_tracing, ConsumerRuntime, ProducerRuntime, SendReport};
pub use traits::{KeyedPayload, RecordSink, RecordSource};
pub use verify::{AdminConnect, AdminSession, ClusterMetadata, KafkaAdmin, SetupVerifier};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
