//! Transaction display sink.

use async_trait::async_trait;
use tracing::{info, warn};
use txnflow_core::{ClientError, ClientResult, RecordSink, Transaction};

/// Parses each payload as a transaction and prints it on one line.
pub struct TransactionPrinter {
    target: usize,
}

impl TransactionPrinter {
    pub fn new(target: usize) -> Self {
        Self { target }
    }
}

#[async_trait]
impl RecordSink for TransactionPrinter {
    async fn deliver(&mut self, seq: usize, payload: &[u8]) -> ClientResult<()> {
        let transaction = match Transaction::from_bytes(payload) {
            Ok(transaction) => transaction,
            Err(e) => {
                warn!("Binary message, size: {} bytes", payload.len());
                return Err(e);
            }
        };

        let json = serde_json::to_string(&transaction)
            .map_err(|e| ClientError::Serialization(e.to_string()))?;
        info!("Consumed message {}/{}: {}", seq, self.target, json);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_printer_accepts_valid_transaction() {
        let mut printer = TransactionPrinter::new(10);
        let payload = Transaction::synthetic().to_bytes().unwrap();

        assert!(printer.deliver(1, &payload).await.is_ok());
    }

    #[tokio::test]
    async fn test_printer_rejects_garbage_as_content_error() {
        let mut printer = TransactionPrinter::new(10);

        let err = printer.deliver(1, b"\x00\x01\x02").await.unwrap_err();
        assert!(err.is_content_error());
    }
}
