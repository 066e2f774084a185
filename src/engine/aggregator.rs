use std::collections::BTreeSet;
use std::collections::HashMap;

use chrono::DateTime;
use chrono::Utc;

use crate::model::EdgeKey;
use crate::model::FlowContribution;
use crate::model::FlowEdge;
use crate::model::FlowGraph;
use crate::model::TransactionProfile;

/// Merges resolved contributions into one edge per (counterparty, direction).
///
/// Merging is commutative per edge key; only the edge order depends on the
/// order contributions arrive in.
#[derive(Debug, Clone)]
pub struct FlowAggregator {
    center: String,
    edges: Vec<FlowEdge>,
    edge_indices: HashMap<EdgeKey, usize>,
}

impl FlowAggregator {
    pub fn new(center: impl Into<String>) -> Self {
        Self {
            center: center.into(),
            edges: Vec::new(),
            edge_indices: HashMap::new(),
        }
    }

    pub fn add(
        &mut self,
        contribution: FlowContribution,
        profile: Option<&TransactionProfile>,
        timestamp: Option<DateTime<Utc>>,
    ) {
        // zero-weight edges never exist
        if contribution.amount_satoshis == 0 {
            return;
        }

        let key = EdgeKey::new(contribution.counterparty.clone(), contribution.direction);
        let idx = match self.edge_indices.get(&key) {
            Some(&idx) => idx,
            None => {
                let idx = self.edges.len();
                self.edges.push(FlowEdge {
                    counterparty_address: contribution.counterparty,
                    direction: contribution.direction,
                    aggregate_amount_satoshis: 0,
                    contributing_transaction_ids: BTreeSet::new(),
                    risk_level: 0,
                    categories: BTreeSet::new(),
                    latest_timestamp: None,
                });
                self.edge_indices.insert(key, idx);
                idx
            },
        };

        let edge = &mut self.edges[idx];
        // a transaction counts once per edge
        if !edge.contributing_transaction_ids.insert(contribution.transaction_id) {
            return;
        }
        edge.aggregate_amount_satoshis = edge.aggregate_amount_satoshis.saturating_add(contribution.amount_satoshis);
        if let Some(profile) = profile {
            edge.risk_level = edge.risk_level.max(profile.risk_score);
            edge.categories.insert(profile.category);
        }
        edge.latest_timestamp = edge.latest_timestamp.max(timestamp);
    }

    /// Merges another aggregator for the same center built from a disjoint
    /// set of transactions
    pub fn merge(
        &mut self,
        other: FlowAggregator,
    ) {
        for edge in other.edges {
            let key = edge.key();
            match self.edge_indices.get(&key) {
                Some(&idx) => {
                    let existing = &mut self.edges[idx];
                    for txid in edge.contributing_transaction_ids {
                        existing.contributing_transaction_ids.insert(txid);
                    }
                    existing.aggregate_amount_satoshis =
                        existing.aggregate_amount_satoshis.saturating_add(edge.aggregate_amount_satoshis);
                    existing.risk_level = existing.risk_level.max(edge.risk_level);
                    existing.categories.extend(edge.categories);
                    existing.latest_timestamp = existing.latest_timestamp.max(edge.latest_timestamp);
                },
                None => {
                    self.edge_indices.insert(key, self.edges.len());
                    self.edges.push(edge);
                },
            }
        }
    }

    pub fn get_edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Freeze into a graph, computing node balances from the queried
    /// address's perspective: incoming edges add, outgoing edges subtract.
    pub fn finish(self) -> FlowGraph {
        let mut node_balances: HashMap<String, i64> = HashMap::new();
        let mut center_balance = 0i64;
        node_balances.insert(self.center.clone(), 0);

        for edge in &self.edges {
            let signed = edge.signed_amount();
            let balance = node_balances.entry(edge.counterparty_address.clone()).or_insert(0);
            *balance = balance.saturating_add(signed);
            center_balance = center_balance.saturating_add(signed);
        }
        node_balances.insert(self.center.clone(), center_balance);

        FlowGraph {
            center: self.center,
            edges: self.edges,
            edge_indices: self.edge_indices,
            node_balances,
        }
    }
}
