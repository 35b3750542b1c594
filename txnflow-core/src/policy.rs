//! Broker connection policy.
//!
//! Classifies a bootstrap address as a local/dev broker or a remote cluster
//! and derives the transport security settings from that classification.
//! Classification is a pure function of the address string: no network call
//! is made here.

use crate::config::Credentials;
use rdkafka::ClientConfig;
use tracing::info;

/// Substrings marking a development broker: the loopback literal, the
/// `localhost` hostname, or the in-cluster `kafka:` service prefix used by
/// container setups. Matching is case-sensitive containment.
pub const LOCAL_ENDPOINT_MARKERS: [&str; 3] = ["localhost", "127.0.0.1", "kafka:"];

/// Client identifier used when none is supplied.
pub const DEFAULT_CLIENT_ID: &str = "txnflow-client";

/// True if the bootstrap address names a local/dev broker.
pub fn is_local_endpoint(bootstrap_servers: &str) -> bool {
    LOCAL_ENDPOINT_MARKERS
        .iter()
        .any(|marker| bootstrap_servers.contains(marker))
}

/// Transport security mode selected by the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityMode {
    /// Unauthenticated, unencrypted transport for local/dev brokers.
    Plaintext,
    /// SASL/PLAIN over TLS for remote clusters. Credentials are carried
    /// verbatim from the bundle; the Verifier rejects empty pairs.
    SaslSsl { username: String, password: String },
}

/// Transport configuration derived from the endpoint classification.
///
/// Computed once at startup and handed unchanged to the Verifier and the
/// exchange runtimes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportProfile {
    pub security: SecurityMode,
    pub client_id: String,
    local: bool,
}

impl TransportProfile {
    /// Derive the transport profile for an endpoint. Pure, aside from a log
    /// line announcing the chosen mode.
    pub fn resolve(bootstrap_servers: &str, credentials: &Credentials) -> Self {
        let local = is_local_endpoint(bootstrap_servers);

        let client_id = credentials
            .client_id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| DEFAULT_CLIENT_ID.to_string());

        let security = if local {
            info!("Using PLAINTEXT protocol for local broker");
            SecurityMode::Plaintext
        } else {
            info!("Using SASL_SSL protocol for cloud broker");
            SecurityMode::SaslSsl {
                username: credentials.api_key.clone().unwrap_or_default(),
                password: credentials.api_secret.clone().unwrap_or_default(),
            }
        };

        Self {
            security,
            client_id,
            local,
        }
    }

    pub fn is_local(&self) -> bool {
        self.local
    }

    /// True if the profile carries a usable credential pair. Always false
    /// for local profiles, which hold no credentials at all.
    pub fn has_credentials(&self) -> bool {
        match &self.security {
            SecurityMode::Plaintext => false,
            SecurityMode::SaslSsl { username, password } => {
                !username.is_empty() && !password.is_empty()
            }
        }
    }

    /// Render the profile into the Kafka client option map.
    pub fn client_config(&self, bootstrap_servers: &str) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", bootstrap_servers)
            .set("client.id", &self.client_id);

        match &self.security {
            SecurityMode::Plaintext => {
                config.set("security.protocol", "plaintext");
            }
            SecurityMode::SaslSsl { username, password } => {
                config
                    .set("security.protocol", "sasl_ssl")
                    .set("sasl.mechanisms", "PLAIN")
                    .set("sasl.username", username)
                    .set("sasl.password", password);
            }
        }

        config
    }

    /// Consumer variant of the option map: adds the group id and starts
    /// from the earliest offset.
    pub fn consumer_config(&self, bootstrap_servers: &str, group_id: &str) -> ClientConfig {
        let mut config = self.client_config(bootstrap_servers);
        config
            .set("group.id", group_id)
            .set("auto.offset.reset", "earliest");
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(key: &str, secret: &str) -> Credentials {
        Credentials {
            api_key: Some(key.to_string()),
            api_secret: Some(secret.to_string()),
            client_id: None,
        }
    }

    #[test]
    fn test_local_endpoint_classification() {
        assert!(is_local_endpoint("localhost:9092"));
        assert!(is_local_endpoint("127.0.0.1:9092"));
        assert!(is_local_endpoint("kafka:29092"));
        assert!(is_local_endpoint("broker-a:9092,localhost:9093"));

        assert!(!is_local_endpoint("pkc-xyz.confluent.cloud:9092"));
        assert!(!is_local_endpoint("broker.internal:9092"));
        assert!(!is_local_endpoint("kafka-prod.example.com:9092"));
        assert!(!is_local_endpoint(""));
    }

    #[test]
    fn test_local_profile_has_no_credentials() {
        let profile = TransportProfile::resolve("localhost:9092", &credentials("key1", "secret1"));

        assert!(profile.is_local());
        assert_eq!(profile.security, SecurityMode::Plaintext);
        assert!(!profile.has_credentials());
    }

    #[test]
    fn test_remote_profile_carries_credentials_verbatim() {
        let profile = TransportProfile::resolve(
            "pkc-xyz.confluent.cloud:9092",
            &credentials("key1", "secret1"),
        );

        assert!(!profile.is_local());
        assert!(profile.has_credentials());
        assert_eq!(
            profile.security,
            SecurityMode::SaslSsl {
                username: "key1".to_string(),
                password: "secret1".to_string(),
            }
        );
    }

    #[test]
    fn test_client_id_defaults_to_fixed_literal() {
        let profile = TransportProfile::resolve("localhost:9092", &Credentials::default());
        assert_eq!(profile.client_id, DEFAULT_CLIENT_ID);

        let bundle = Credentials {
            client_id: Some("custom-client".to_string()),
            ..Credentials::default()
        };
        let profile = TransportProfile::resolve("localhost:9092", &bundle);
        assert_eq!(profile.client_id, "custom-client");
    }

    #[test]
    fn test_local_option_map() {
        let profile = TransportProfile::resolve("localhost:9092", &Credentials::default());
        let config = profile.client_config("localhost:9092");

        assert_eq!(config.get("bootstrap.servers"), Some("localhost:9092"));
        assert_eq!(config.get("security.protocol"), Some("plaintext"));
        assert_eq!(config.get("client.id"), Some(DEFAULT_CLIENT_ID));
        assert_eq!(config.get("sasl.username"), None);
        assert_eq!(config.get("sasl.password"), None);
    }

    #[test]
    fn test_remote_option_map() {
        let profile = TransportProfile::resolve(
            "pkc-xyz.confluent.cloud:9092",
            &credentials("key1", "secret1"),
        );
        let config = profile.client_config("pkc-xyz.confluent.cloud:9092");

        assert_eq!(config.get("security.protocol"), Some("sasl_ssl"));
        assert_eq!(config.get("sasl.mechanisms"), Some("PLAIN"));
        assert_eq!(config.get("sasl.username"), Some("key1"));
        assert_eq!(config.get("sasl.password"), Some("secret1"));
    }

    #[test]
    fn test_consumer_option_map() {
        let profile = TransportProfile::resolve("localhost:9092", &Credentials::default());
        let config = profile.consumer_config("localhost:9092", "txnflow-consumer");

        assert_eq!(config.get("group.id"), Some("txnflow-consumer"));
        assert_eq!(config.get("auto.offset.reset"), Some("earliest"));
    }

    #[test]
    fn test_remote_profile_with_missing_credentials() {
        let profile =
            TransportProfile::resolve("pkc-xyz.confluent.cloud:9092", &Credentials::default());

        assert!(!profile.is_local());
        assert!(!profile.has_credentials());
    }

    #[test]
    fn test_empty_endpoint_classifies_as_remote() {
        // Misconfiguration is reported by the Verifier, not here.
        let profile = TransportProfile::resolve("", &Credentials::default());
        assert!(!profile.is_local());
    }
}
