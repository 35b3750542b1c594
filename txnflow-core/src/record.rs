//! Transaction payload model and synthesis.
//!
//! The exchange loops treat payloads as opaque bytes; this module is the
//! typed view used by the generator on the produce side and the printer on
//! the consume side.

use crate::{ClientError, ClientResult};
use chrono::{SecondsFormat, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Transaction category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Transfer,
    Payment,
}

const TRANSACTION_TYPES: [TransactionType; 4] = [
    TransactionType::Deposit,
    TransactionType::Withdrawal,
    TransactionType::Transfer,
    TransactionType::Payment,
];

/// Transaction settlement status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

const TRANSACTION_STATUSES: [TransactionStatus; 3] = [
    TransactionStatus::Pending,
    TransactionStatus::Completed,
    TransactionStatus::Failed,
];

/// A synthetic financial transaction.
///
/// Serialized with the wire field names the downstream tooling expects
/// (`TransactionId`, `AccountNumber`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transaction {
    pub transaction_id: String,
    pub account_number: String,
    pub amount: f64,
    pub currency: String,
    pub timestamp: String,
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
}

impl Transaction {
    /// Generate a synthetic transaction: hex uuid id, random 12-digit
    /// account number, cent-rounded USD amount, current RFC 3339 timestamp.
    pub fn synthetic() -> Self {
        let mut rng = rand::rng();

        let amount =
            ((rng.random_range(0..10_000) as f64) + rng.random::<f64>() * 100.0).round() / 100.0;

        Self {
            transaction_id: Uuid::new_v4().simple().to_string(),
            account_number: format!("{:012}", rng.random_range(0..1_000_000_000_000u64)),
            amount,
            currency: "USD".to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            transaction_type: TRANSACTION_TYPES[rng.random_range(0..TRANSACTION_TYPES.len())],
            status: TRANSACTION_STATUSES[rng.random_range(0..TRANSACTION_STATUSES.len())],
        }
    }

    /// The message key: the transaction identifier.
    pub fn key(&self) -> &str {
        &self.transaction_id
    }

    /// Serialize to JSON bytes.
    pub fn to_bytes(&self) -> ClientResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| ClientError::Serialization(e.to_string()))
    }

    /// Deserialize from JSON bytes.
    pub fn from_bytes(payload: &[u8]) -> ClientResult<Self> {
        serde_json::from_slice(payload)
            .map_err(|e| ClientError::DeserializationFailed(e.to_string()))
    }
}
