pub mod cache;
pub mod esplora;
pub mod rate_limit;

use async_trait::async_trait;

pub use esplora::EsploraClient;

use crate::error::FetchError;
use crate::model::AddressSummary;
use crate::model::TransactionRecord;

/// Supplies the raw transaction set for an address. Implementations own
/// retries and rate limiting; any error they return aborts the query.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Up to `limit` most recent transactions touching `address`.
    /// An empty vector means the address has no activity.
    async fn fetch_transactions(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, FetchError>;

    async fn fetch_address_summary(
        &self,
        address: &str,
    ) -> Result<AddressSummary, FetchError>;
}

/// Source over an already loaded transaction set, e.g. a JSON export
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    transactions: Vec<TransactionRecord>,
}

impl StaticSource {
    pub fn new(transactions: Vec<TransactionRecord>) -> Self {
        Self { transactions }
    }
}

#[async_trait]
impl TransactionSource for StaticSource {
    async fn fetch_transactions(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, FetchError> {
        Ok(self.transactions.iter().filter(|tx| tx.involves(address)).take(limit).cloned().collect())
    }

    async fn fetch_address_summary(
        &self,
        address: &str,
    ) -> Result<AddressSummary, FetchError> {
        let mut summary = AddressSummary {
            address: address.to_string(),
            funded_txo_sum: 0,
            spent_txo_sum: 0,
            tx_count: 0,
        };
        for tx in self.transactions.iter().filter(|tx| tx.involves(address)) {
            summary.tx_count += 1;
            for output in tx.outputs.iter().filter(|entry| entry.is_address(address)) {
                summary.funded_txo_sum = summary.funded_txo_sum.saturating_add(output.value);
            }
            for input in tx.inputs.iter().filter(|entry| entry.is_address(address)) {
                summary.spent_txo_sum = summary.spent_txo_sum.saturating_add(input.value);
            }
        }
        Ok(summary)
    }
}
