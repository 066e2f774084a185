use chrono::DateTime;
use chrono::TimeZone;
use chrono::Utc;
use mizan::model::TransactionRecord;
use mizan::model::TxEntry;

pub fn entries(side: &[(&str, u64)]) -> Vec<TxEntry> {
    side.iter().map(|(address, value)| TxEntry::new(*address, *value)).collect()
}

pub fn tx(
    id: &str,
    inputs: &[(&str, u64)],
    outputs: &[(&str, u64)],
) -> TransactionRecord {
    TransactionRecord::new(id, entries(inputs), entries(outputs))
}

pub fn as_of() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}
