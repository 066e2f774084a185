//! Wire types for the Esplora REST API (`/address/:addr`, `/address/:addr/txs`)

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;

use crate::model::AddressSummary;
use crate::model::TransactionRecord;
use crate::model::TxEntry;

#[derive(Debug, Clone, Deserialize)]
pub struct EsploraTransaction {
    pub txid: String,
    #[serde(default)]
    pub vin: Vec<EsploraInput>,
    #[serde(default)]
    pub vout: Vec<EsploraOutput>,
    #[serde(default)]
    pub fee: Option<u64>,
    #[serde(default)]
    pub status: EsploraStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EsploraInput {
    /// Absent for coinbase inputs
    #[serde(default)]
    pub prevout: Option<EsploraOutput>,
    #[serde(default)]
    pub is_coinbase: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EsploraOutput {
    #[serde(default)]
    pub scriptpubkey_address: Option<String>,
    #[serde(default)]
    pub scriptpubkey_type: Option<String>,
    pub value: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EsploraStatus {
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub block_height: Option<u64>,
    #[serde(default)]
    pub block_time: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EsploraStats {
    #[serde(default)]
    pub funded_txo_sum: u64,
    #[serde(default)]
    pub spent_txo_sum: u64,
    #[serde(default)]
    pub tx_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EsploraAddress {
    pub address: String,
    #[serde(default)]
    pub chain_stats: EsploraStats,
    #[serde(default)]
    pub mempool_stats: EsploraStats,
}

impl EsploraTransaction {
    pub fn confirmation_time(&self) -> Option<DateTime<Utc>> {
        if !self.status.confirmed {
            return None;
        }
        self.status.block_time.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

impl From<EsploraOutput> for TxEntry {
    fn from(output: EsploraOutput) -> Self {
        TxEntry {
            address: output.scriptpubkey_address,
            value: output.value,
        }
    }
}

impl From<EsploraTransaction> for TransactionRecord {
    fn from(tx: EsploraTransaction) -> Self {
        let timestamp = tx.confirmation_time();
        // coinbase inputs carry no prevout and fund nobody
        let inputs = tx.vin.into_iter().filter_map(|vin| vin.prevout).map(TxEntry::from).collect();
        let outputs = tx.vout.into_iter().map(TxEntry::from).collect();

        TransactionRecord {
            id: tx.txid,
            inputs,
            outputs,
            timestamp,
            fee: tx.fee,
        }
    }
}

impl From<EsploraAddress> for AddressSummary {
    fn from(address: EsploraAddress) -> Self {
        AddressSummary {
            address: address.address,
            funded_txo_sum: address.chain_stats.funded_txo_sum.saturating_add(address.mempool_stats.funded_txo_sum),
            spent_txo_sum: address.chain_stats.spent_txo_sum.saturating_add(address.mempool_stats.spent_txo_sum),
            tx_count: address.chain_stats.tx_count.saturating_add(address.mempool_stats.tx_count),
        }
    }
}
