use serde::de::DeserializeOwned;
use serde_json::Value;

use super::transaction::TransactionRecord;

/// Batch element that failed to decode into a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    /// Id read from the raw element, or `#<position>` when it has none
    pub transaction_id: String,
    pub reason: String,
}

/// Records decoded one element at a time. A bad element is rejected on its
/// own and never fails the rest of the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBatch<T> {
    pub records: Vec<T>,
    pub rejected: Vec<RejectedRecord>,
}

impl<T> DecodedBatch<T> {
    pub fn new(
        records: Vec<T>,
        rejected: Vec<RejectedRecord>,
    ) -> Self {
        Self { records, rejected }
    }
}

/// Decode every element of a JSON array on its own, reading ids from `id_field`
pub fn decode_each<T: DeserializeOwned>(
    values: Vec<Value>,
    id_field: &str,
) -> DecodedBatch<T> {
    let mut records = Vec::with_capacity(values.len());
    let mut rejected = Vec::new();

    for (position, value) in values.into_iter().enumerate() {
        let transaction_id = value
            .get(id_field)
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", position));

        match serde_json::from_value::<T>(value) {
            Ok(record) => records.push(record),
            Err(e) => rejected.push(RejectedRecord {
                transaction_id,
                reason: e.to_string(),
            }),
        }
    }

    DecodedBatch { records, rejected }
}

/// Decode a JSON array of [`TransactionRecord`]s. Only a document that is not
/// an array at all is an error.
pub fn decode_transaction_records(raw: &str) -> Result<DecodedBatch<TransactionRecord>, serde_json::Error> {
    let values: Vec<Value> = serde_json::from_str(raw)?;
    Ok(decode_each(values, "id"))
}
