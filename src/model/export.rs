use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::address::AddressSummary;
use super::category::TransactionCategory;
use super::flow::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Center,
    /// Only sends to the center
    Source,
    /// Only receives from the center
    Destination,
    /// Both sends and receives
    Mixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportNode {
    pub address: String,
    pub label: String,
    pub kind: NodeKind,
    pub balance_satoshis: i64,
    pub balance_btc: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportEdge {
    pub source: String,
    pub target: String,
    pub direction: Direction,
    pub amount_satoshis: u64,
    pub amount_btc: f64,
    pub transaction_count: usize,
    pub risk_level: u8,
    pub categories: Vec<TransactionCategory>,
    #[serde(with = "chrono::serde::ts_seconds_option")]
    pub latest_timestamp: Option<DateTime<Utc>>,
    pub transaction_ids: Vec<String>,
}

/// Node/edge lists handed to a rendering layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphExport {
    pub center: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_summary: Option<AddressSummary>,
    /// Center first, then counterparties in edge order
    pub nodes: Vec<ExportNode>,
    pub edges: Vec<ExportEdge>,
}

impl GraphExport {
    /// True when nothing but the center node is present
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn node(
        &self,
        address: &str,
    ) -> Option<&ExportNode> {
        self.nodes.iter().find(|node| node.address == address)
    }
}
