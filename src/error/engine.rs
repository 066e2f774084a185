use thiserror::Error;

/// Per-transaction anomalies. The engine recovers from these locally by
/// dropping the offending transaction; they never abort a query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("Malformed transaction {txid}: {reason}")]
    MalformedTransaction { txid: String, reason: String },

    #[error("No resolvable counterparty for transaction {txid}")]
    NoResolvableCounterparty { txid: String },
}
