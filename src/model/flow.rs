use std::collections::BTreeSet;
use std::collections::HashMap;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::category::TransactionCategory;

/// Signed satoshi delta a single transaction causes to the queried address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetEffect {
    pub transaction_id: String,
    pub net_satoshis: i64,
}

impl NetEffect {
    /// `None` for a zero effect
    pub fn direction(&self) -> Option<Direction> {
        match self.net_satoshis {
            n if n > 0 => Some(Direction::Incoming),
            n if n < 0 => Some(Direction::Outgoing),
            _ => None,
        }
    }

    pub fn magnitude(&self) -> u64 {
        self.net_satoshis.unsigned_abs()
    }
}

/// Edge direction relative to the queried address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// counterparty -> queried address
    Incoming,
    /// queried address -> counterparty
    Outgoing,
}

impl Direction {
    pub fn sign(self) -> i64 {
        match self {
            Direction::Incoming => 1,
            Direction::Outgoing => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateRole {
    Input,
    Output,
}

/// An eligible other side of a transaction, with its values summed across entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterpartyCandidate {
    pub address: String,
    pub value: u64,
    pub role: CandidateRole,
}

/// A significant transaction resolved to its primary counterparty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowContribution {
    pub transaction_id: String,
    pub counterparty: String,
    pub direction: Direction,
    /// `|net effect|`, never the counterparty's own volume
    pub amount_satoshis: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub counterparty: String,
    pub direction: Direction,
}

impl EdgeKey {
    pub fn new(
        counterparty: impl Into<String>,
        direction: Direction,
    ) -> Self {
        Self {
            counterparty: counterparty.into(),
            direction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub counterparty_address: String,
    pub direction: Direction,
    pub aggregate_amount_satoshis: u64,
    pub contributing_transaction_ids: BTreeSet<String>,
    /// Highest risk score among contributing transactions
    pub risk_level: u8,
    pub categories: BTreeSet<TransactionCategory>,
    /// Most recent confirmation time among contributing transactions
    pub latest_timestamp: Option<DateTime<Utc>>,
}

impl FlowEdge {
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.counterparty_address.clone(), self.direction)
    }

    pub fn transaction_count(&self) -> usize {
        self.contributing_transaction_ids.len()
    }

    /// Amount with the sign of the direction
    pub fn signed_amount(&self) -> i64 {
        let amount = i64::try_from(self.aggregate_amount_satoshis).unwrap_or(i64::MAX);
        amount.saturating_mul(self.direction.sign())
    }
}

/// Aggregated net flows around one queried address. Built by
/// [`crate::engine::aggregator::FlowAggregator`] and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowGraph {
    pub(crate) center: String,
    /// Edges in order of first occurrence
    pub(crate) edges: Vec<FlowEdge>,
    #[serde(skip)]
    pub(crate) edge_indices: HashMap<EdgeKey, usize>,
    pub(crate) node_balances: HashMap<String, i64>,
}

impl FlowGraph {
    pub fn center(&self) -> &str {
        &self.center
    }

    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    pub fn edge(
        &self,
        counterparty: &str,
        direction: Direction,
    ) -> Option<&FlowEdge> {
        self.edge_indices
            .get(&EdgeKey::new(counterparty, direction))
            .map(|&idx| &self.edges[idx])
    }

    pub fn get_edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn node_balance(
        &self,
        address: &str,
    ) -> Option<i64> {
        self.node_balances.get(address).copied()
    }

    pub fn node_balances(&self) -> &HashMap<String, i64> {
        &self.node_balances
    }

    /// Distinct counterparties in order of first occurrence
    pub fn counterparties(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.edges
            .iter()
            .map(|edge| edge.counterparty_address.as_str())
            .filter(|address| seen.insert(*address))
            .collect()
    }

    /// Whether any edge lists `txid` among its contributions
    pub fn contains_transaction(
        &self,
        txid: &str,
    ) -> bool {
        self.edges.iter().any(|edge| edge.contributing_transaction_ids.contains(txid))
    }
}
