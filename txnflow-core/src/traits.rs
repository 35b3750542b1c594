//! Collaborator seams for the exchange loops.

use crate::ClientResult;
use async_trait::async_trait;

/// A keyed payload handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedPayload {
    pub key: String,
    pub payload: Vec<u8>,
}

/// Supplies one payload per send-loop iteration.
///
/// The loop treats the payload as opaque bytes; `seq` is the 1-based
/// iteration number.
pub trait RecordSource {
    fn next_record(&mut self, seq: usize) -> ClientResult<KeyedPayload>;
}

/// Receives each polled payload on the consume side.
///
/// A `DeserializationFailed` return is a content error: the receive loop
/// reports it, skips the record, and continues.
#[async_trait]
pub trait RecordSink {
    async fn deliver(&mut self, seq: usize, payload: &[u8]) -> ClientResult<()>;
}
