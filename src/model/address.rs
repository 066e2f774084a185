use serde::Deserialize;
use serde::Serialize;

/// On-chain totals for an address as reported by the transaction source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressSummary {
    pub address: String,
    pub funded_txo_sum: u64,
    pub spent_txo_sum: u64,
    pub tx_count: u64,
}

impl AddressSummary {
    pub fn balance_satoshis(&self) -> i64 {
        let balance = self.funded_txo_sum as i128 - self.spent_txo_sum as i128;
        balance.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }
}
