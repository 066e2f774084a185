use chrono::TimeZone;
use chrono::Utc;

use crate::model::TransactionRecord;
use crate::model::TxEntry;

fn entries(side: &[(&str, u64)]) -> Vec<TxEntry> {
    side.iter().map(|(address, value)| TxEntry::new(*address, *value)).collect()
}

/// Unconfirmed transaction from `(address, satoshis)` pairs
pub fn tx(
    id: &str,
    inputs: &[(&str, u64)],
    outputs: &[(&str, u64)],
) -> TransactionRecord {
    TransactionRecord::new(id, entries(inputs), entries(outputs))
}

/// Mark a transaction as confirmed at a fixed point in time
pub fn confirmed(tx: TransactionRecord) -> TransactionRecord {
    tx.with_timestamp(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
}

/// One input from `payer` paying `value` to each of `count` distinct addresses
pub fn fan_out(
    payer: &str,
    count: usize,
    value: u64,
) -> TransactionRecord {
    let outputs = (0..count).map(|i| TxEntry::new(format!("out{i}"), value)).collect();
    TransactionRecord::new(
        format!("fan_out_{count}"),
        vec![TxEntry::new(payer, value * count as u64 + 500)],
        outputs,
    )
}
