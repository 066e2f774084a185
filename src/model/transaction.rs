use std::collections::HashSet;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// One input or output of a transaction. `address` is absent for
/// non-standard scripts and never matches a queried address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxEntry {
    #[serde(default)]
    pub address: Option<String>,
    pub value: u64,
}

impl TxEntry {
    pub fn new(
        address: impl Into<String>,
        value: u64,
    ) -> Self {
        Self {
            address: Some(address.into()),
            value,
        }
    }

    pub fn unaddressed(value: u64) -> Self {
        Self { address: None, value }
    }

    pub fn is_address(
        &self,
        address: &str,
    ) -> bool {
        self.address.as_deref() == Some(address)
    }
}

/// Normalized view of a raw transaction as delivered by a transaction source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub inputs: Vec<TxEntry>,
    pub outputs: Vec<TxEntry>,
    /// Confirmation time; `None` while unconfirmed
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Fee reported by the source, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<u64>,
}

impl TransactionRecord {
    pub fn new(
        id: impl Into<String>,
        inputs: Vec<TxEntry>,
        outputs: Vec<TxEntry>,
    ) -> Self {
        Self {
            id: id.into(),
            inputs,
            outputs,
            timestamp: None,
            fee: None,
        }
    }

    pub fn with_timestamp(
        mut self,
        timestamp: DateTime<Utc>,
    ) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_fee(
        mut self,
        fee: u64,
    ) -> Self {
        self.fee = Some(fee);
        self
    }

    /// `None` when the values overflow, which marks the record as malformed
    pub fn total_input_value(&self) -> Option<u64> {
        checked_total(&self.inputs)
    }

    pub fn total_output_value(&self) -> Option<u64> {
        checked_total(&self.outputs)
    }

    /// Source-reported fee, or inputs minus outputs saturating at zero
    pub fn fee(&self) -> u64 {
        self.fee.unwrap_or_else(|| {
            let inputs = self.total_input_value().unwrap_or(u64::MAX);
            let outputs = self.total_output_value().unwrap_or(u64::MAX);
            inputs.saturating_sub(outputs)
        })
    }

    pub fn is_confirmed(&self) -> bool {
        self.timestamp.is_some()
    }

    pub fn input_addresses(&self) -> HashSet<&str> {
        addresses(&self.inputs)
    }

    pub fn output_addresses(&self) -> HashSet<&str> {
        addresses(&self.outputs)
    }

    /// Whether `address` appears on either side
    pub fn involves(
        &self,
        address: &str,
    ) -> bool {
        self.inputs.iter().chain(self.outputs.iter()).any(|entry| entry.is_address(address))
    }
}

fn checked_total(entries: &[TxEntry]) -> Option<u64> {
    entries.iter().try_fold(0u64, |acc, entry| acc.checked_add(entry.value))
}

fn addresses(entries: &[TxEntry]) -> HashSet<&str> {
    entries.iter().filter_map(|entry| entry.address.as_deref()).collect()
}
