//! Broker setup verification.
//!
//! Before any exchange begins, the Verifier confirms the broker is reachable
//! and the topic exists. Local/dev brokers are exempt: they are assumed
//! reachable and self-provisioning, and no network I/O happens for them.
//!
//! The check is advisory, not transactional: nothing prevents the topic from
//! disappearing between verification and use, so the exchange loops handle
//! their own per-operation failures.

use crate::error::{ClientError, ClientResult};
use crate::policy::TransportProfile;
use async_trait::async_trait;
use rdkafka::consumer::{BaseConsumer, Consumer};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Topic-level view of the cluster metadata.
#[derive(Debug, Clone, Default)]
pub struct ClusterMetadata {
    topics: Vec<String>,
}

impl ClusterMetadata {
    pub fn from_topics(topics: impl IntoIterator<Item = String>) -> Self {
        Self {
            topics: topics.into_iter().collect(),
        }
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t == topic)
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }
}

/// A short-lived administrative session, distinct from the data-path client.
/// Released when dropped; the Verifier scopes it to a single call.
#[async_trait]
pub trait AdminSession: Send {
    async fn fetch_metadata(&self, topic: &str, timeout: Duration) -> ClientResult<ClusterMetadata>;
}

/// Opens administrative sessions against the broker.
#[async_trait]
pub trait AdminConnect: Send + Sync {
    type Session: AdminSession;

    async fn connect(&self) -> ClientResult<Self::Session>;
}

/// Verifies broker reachability and topic existence before exchange begins.
pub struct SetupVerifier<C: AdminConnect> {
    admin: C,
    metadata_timeout: Duration,
}

impl<C: AdminConnect> SetupVerifier<C> {
    pub fn new(admin: C, metadata_timeout: Duration) -> Self {
        Self {
            admin,
            metadata_timeout,
        }
    }

    /// Run the setup checks for the given transport profile.
    ///
    /// Local profiles succeed immediately without any network interaction.
    /// Remote profiles must carry a complete credential pair and a non-empty
    /// endpoint and topic; then the broker metadata is fetched with a
    /// bounded timeout and the topic checked for existence. The
    /// administrative session is released on every exit path.
    pub async fn verify(
        &self,
        profile: &TransportProfile,
        bootstrap_servers: &str,
        topic: &str,
    ) -> ClientResult<()> {
        if profile.is_local() {
            info!("Broker connection assumed available for local environment");
            return Ok(());
        }

        if bootstrap_servers.is_empty() {
            return Err(ClientError::config("bootstrap servers not configured"));
        }
        if topic.is_empty() {
            return Err(ClientError::config("no topic specified"));
        }
        if !profile.has_credentials() {
            return Err(ClientError::config(
                "remote broker requires a non-empty API key and secret",
            ));
        }

        let session = self.admin.connect().await?;
        let result = match session.fetch_metadata(topic, self.metadata_timeout).await {
            Ok(metadata) => {
                debug!("Cluster metadata lists {} topic(s)", metadata.topics().len());
                if metadata.contains(topic) {
                    Ok(())
                } else {
                    Err(ClientError::TopicNotFound(topic.to_string()))
                }
            }
            Err(e) => Err(e),
        };
        drop(session);

        result
    }
}

/// Kafka-backed implementation of the admin seam.
pub struct KafkaAdmin {
    config: rdkafka::ClientConfig,
}

impl KafkaAdmin {
    pub fn new(profile: &TransportProfile, bootstrap_servers: &str) -> Self {
        Self {
            config: profile.client_config(bootstrap_servers),
        }
    }
}

pub struct KafkaAdminSession {
    consumer: Arc<BaseConsumer>,
}

#[async_trait]
impl AdminConnect for KafkaAdmin {
    type Session = KafkaAdminSession;

    async fn connect(&self) -> ClientResult<Self::Session> {
        let consumer: BaseConsumer = self
            .config
            .create()
            .map_err(|e| ClientError::config(format!("failed to open admin session: {}", e)))?;

        Ok(KafkaAdminSession {
            consumer: Arc::new(consumer),
        })
    }
}

#[async_trait]
impl AdminSession for KafkaAdminSession {
    async fn fetch_metadata(&self, topic: &str, timeout: Duration) -> ClientResult<ClusterMetadata> {
        let consumer = Arc::clone(&self.consumer);
        let topic = topic.to_string();

        // fetch_metadata blocks, so it runs off the async executor.
        let metadata = tokio::task::spawn_blocking(move || {
            consumer.fetch_metadata(Some(&topic), timeout)
        })
        .await
        .map_err(|e| ClientError::unreachable_with_source("metadata task failed", e))?
        .map_err(|e| ClientError::unreachable_with_source("failed to fetch cluster metadata", e))?;

        Ok(ClusterMetadata::from_topics(
            metadata
                .topics()
                .iter()
                .filter(|t| t.error().is_none())
                .map(|t| t.name().to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn remote_profile() -> TransportProfile {
        TransportProfile::resolve(
            "pkc-xyz.confluent.cloud:9092",
            &Credentials {
                api_key: Some("key1".to_string()),
                api_secret: Some("secret1".to_string()),
                client_id: None,
            },
        )
    }

    struct MockSession {
        topics: Vec<String>,
        unreachable: bool,
        alive: Arc<AtomicUsize>,
    }

    impl Drop for MockSession {
        fn drop(&mut self) {
            self.alive.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl AdminSession for MockSession {
        async fn fetch_metadata(
            &self,
            _topic: &str,
            _timeout: Duration,
        ) -> ClientResult<ClusterMetadata> {
            if self.unreachable {
                return Err(ClientError::unreachable("connection timed out"));
            }
            Ok(ClusterMetadata::from_topics(self.topics.clone()))
        }
    }

    #[derive(Default)]
    struct MockAdmin {
        topics: Vec<String>,
        unreachable: bool,
        connects: Arc<AtomicUsize>,
        alive: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl AdminConnect for MockAdmin {
        type Session = MockSession;

        async fn connect(&self) -> ClientResult<MockSession> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            self.alive.fetch_add(1, Ordering::SeqCst);
            Ok(MockSession {
                topics: self.topics.clone(),
                unreachable: self.unreachable,
                alive: self.alive.clone(),
            })
        }
    }

    fn verifier(admin: MockAdmin) -> SetupVerifier<MockAdmin> {
        SetupVerifier::new(admin, Duration::from_millis(5000))
    }

    #[tokio::test]
    async fn test_local_profile_short_circuits() {
        let connects = Arc::new(AtomicUsize::new(0));
        let admin = MockAdmin {
            connects: connects.clone(),
            ..MockAdmin::default()
        };
        let profile = TransportProfile::resolve("localhost:9092", &Credentials::default());

        // Succeeds regardless of topic contents, with zero network I/O.
        let verifier = verifier(admin);
        assert!(verifier.verify(&profile, "localhost:9092", "demo").await.is_ok());
        assert!(verifier.verify(&profile, "localhost:9092", "").await.is_ok());
        assert_eq!(connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remote_topic_present() {
        let alive = Arc::new(AtomicUsize::new(0));
        let admin = MockAdmin {
            topics: vec!["demo".to_string(), "other".to_string()],
            alive: alive.clone(),
            ..MockAdmin::default()
        };

        let result = verifier(admin)
            .verify(&remote_profile(), "pkc-xyz.confluent.cloud:9092", "demo")
            .await;

        assert!(result.is_ok());
        assert_eq!(alive.load(Ordering::SeqCst), 0, "session must be released");
    }

    #[tokio::test]
    async fn test_remote_topic_missing() {
        let alive = Arc::new(AtomicUsize::new(0));
        let admin = MockAdmin {
            topics: vec!["other".to_string()],
            alive: alive.clone(),
            ..MockAdmin::default()
        };

        let result = verifier(admin)
            .verify(&remote_profile(), "pkc-xyz.confluent.cloud:9092", "demo")
            .await;

        assert!(matches!(result, Err(ClientError::TopicNotFound(t)) if t == "demo"));
        assert_eq!(alive.load(Ordering::SeqCst), 0, "session must be released");
    }

    #[tokio::test]
    async fn test_remote_unreachable() {
        let alive = Arc::new(AtomicUsize::new(0));
        let admin = MockAdmin {
            unreachable: true,
            alive: alive.clone(),
            ..MockAdmin::default()
        };

        let result = verifier(admin)
            .verify(&remote_profile(), "pkc-xyz.confluent.cloud:9092", "demo")
            .await;

        assert!(matches!(result, Err(ClientError::Unreachable { .. })));
        assert_eq!(alive.load(Ordering::SeqCst), 0, "session must be released");
    }

    #[tokio::test]
    async fn test_remote_missing_credentials() {
        let connects = Arc::new(AtomicUsize::new(0));
        let admin = MockAdmin {
            connects: connects.clone(),
            ..MockAdmin::default()
        };
        let profile =
            TransportProfile::resolve("pkc-xyz.confluent.cloud:9092", &Credentials::default());

        let result = verifier(admin)
            .verify(&profile, "pkc-xyz.confluent.cloud:9092", "demo")
            .await;

        assert!(matches!(result, Err(ClientError::ConfigurationInvalid(_))));
        assert_eq!(connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remote_empty_endpoint_and_topic() {
        let admin = MockAdmin::default();
        let profile = remote_profile();
        let verifier = verifier(admin);

        let result = verifier.verify(&profile, "", "demo").await;
        assert!(matches!(result, Err(ClientError::ConfigurationInvalid(_))));

        let result = verifier
            .verify(&profile, "pkc-xyz.confluent.cloud:9092", "")
            .await;
        assert!(matches!(result, Err(ClientError::ConfigurationInvalid(_))));
    }
}
