//! Synthetic transaction source.

use txnflow_core::{ClientResult, KeyedPayload, RecordSource, Transaction};

/// Generates one synthetic transaction per send-loop iteration, keyed by the
/// transaction identifier.
pub struct TransactionGenerator;

impl TransactionGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl RecordSource for TransactionGenerator {
    fn next_record(&mut self, _seq: usize) -> ClientResult<KeyedPayload> {
        let transaction = Transaction::synthetic();
        let payload = transaction.to_bytes()?;

        Ok(KeyedPayload {
            key: transaction.transaction_id,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_emits_keyed_json() {
        let mut generator = TransactionGenerator::new();
        let record = generator.next_record(1).unwrap();

        let transaction = Transaction::from_bytes(&record.payload).unwrap();
        assert_eq!(record.key, transaction.transaction_id);
    }
}
