//! Error types for the exchange clients.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type ClientResult<T> = Result<T, ClientError>;

/// Error taxonomy for the exchange clients.
///
/// Structural errors (`ConfigurationInvalid`, `Unreachable`, `TopicNotFound`,
/// `EnqueueFailed`, `BrokerFatal`) terminate the affected phase. Content
/// errors (`DeserializationFailed`) are isolated to a single record and never
/// abort the receive loop.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Malformed or missing transport settings.
    #[error("invalid configuration: {0}")]
    ConfigurationInvalid(String),

    /// Network or timeout failure talking to the broker.
    #[error("broker unreachable: {message}")]
    Unreachable {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Topic absent from the cluster metadata.
    #[error("topic '{0}' not found on broker")]
    TopicNotFound(String),

    /// Non-blocking enqueue rejected a message. Fatal for the send loop.
    #[error("failed to enqueue message: {message}")]
    EnqueueFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// All brokers are down. Stops the receive loop.
    #[error("broker failure: {0}")]
    BrokerFatal(String),

    /// A single payload could not be parsed. Skip and continue.
    #[error("failed to deserialize payload: {0}")]
    DeserializationFailed(String),

    /// A record could not be serialized for sending.
    #[error("failed to serialize record: {0}")]
    Serialization(String),
}

impl ClientError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigurationInvalid(message.into())
    }

    /// Create an unreachable error without an underlying cause.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable {
            message: message.into(),
            source: None,
        }
    }

    /// Create an unreachable error wrapping an underlying cause.
    pub fn unreachable_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Unreachable {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an enqueue error wrapping an underlying cause.
    pub fn enqueue_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::EnqueueFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// True for per-record content errors that must not stop the loop.
    pub fn is_content_error(&self) -> bool {
        matches!(self, Self::DeserializationFailed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_error_classification() {
        assert!(ClientError::DeserializationFailed("bad json".into()).is_content_error());
        assert!(!ClientError::config("missing topic").is_content_error());
        assert!(!ClientError::BrokerFatal("all brokers down".into()).is_content_error());
    }

    #[test]
    fn test_display_formats() {
        let err = ClientError::TopicNotFound("transactions".into());
        assert_eq!(err.to_string(), "topic 'transactions' not found on broker");

        let err = ClientError::config("bootstrap servers not configured");
        assert_eq!(
            err.to_string(),
            "invalid configuration: bootstrap servers not configured"
        );
    }
}
