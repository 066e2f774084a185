use serde::Deserialize;
use serde::Serialize;

/// Coarse shape of a transaction, derived from its input/output layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionCategory {
    SimplePayment,
    ExchangeBatch,
    Consolidation,
    MixingSuspicious,
    Standard,
}

impl std::fmt::Display for TransactionCategory {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let name = match self {
            TransactionCategory::SimplePayment => "simple_payment",
            TransactionCategory::ExchangeBatch => "exchange_batch",
            TransactionCategory::Consolidation => "consolidation",
            TransactionCategory::MixingSuspicious => "mixing_suspicious",
            TransactionCategory::Standard => "standard",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionProfile {
    pub category: TransactionCategory,
    /// 0..=5
    pub risk_score: u8,
    pub fee_satoshis: u64,
}
