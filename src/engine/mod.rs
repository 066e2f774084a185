pub mod aggregator;
pub mod change;
pub mod classifier;
pub mod counterparty;
pub mod dust;
pub mod export;
pub mod net_effect;

use std::collections::HashSet;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Serialize;
use tracing::debug;
use tracing::warn;

use self::aggregator::FlowAggregator;
use self::counterparty::resolve_primary_counterparty;
use self::dust::DustFilter;
use self::net_effect::compute_net_effect;
use crate::config::FlowEngineConfig;
use crate::error::FlowError;
use crate::model::DecodedBatch;
use crate::model::FlowGraph;
use crate::model::TransactionRecord;

/// Why a transaction contributed no edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Malformed,
    OutsideWindow,
    /// Queried address appears on neither side
    NonParticipant,
    /// Queried address appears but its inputs and outputs cancel out
    ZeroEffect,
    Dust,
    NoResolvableCounterparty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedTransaction {
    pub transaction_id: String,
    pub reason: SkipReason,
}

/// Result of one query: the graph plus per-transaction skip diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowAnalysis {
    pub graph: FlowGraph,
    pub skipped: Vec<SkippedTransaction>,
}

impl FlowAnalysis {
    pub fn skipped_for(
        &self,
        reason: SkipReason,
    ) -> impl Iterator<Item = &str> {
        self.skipped
            .iter()
            .filter(move |skip| skip.reason == reason)
            .map(|skip| skip.transaction_id.as_str())
    }
}

/// Stateless net-flow engine. Every call owns its derived data, so one
/// engine can serve concurrent queries for different addresses.
#[derive(Debug, Clone, Default)]
pub struct NetFlowEngine {
    config: FlowEngineConfig,
}

impl NetFlowEngine {
    pub fn new(config: FlowEngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FlowEngineConfig {
        &self.config
    }

    /// Analyze with the time window anchored at the current time
    pub fn analyze(
        &self,
        address: &str,
        transactions: &[TransactionRecord],
    ) -> FlowAnalysis {
        self.analyze_at(address, transactions, Utc::now())
    }

    /// Pure form of [`Self::analyze`]: the result depends only on the arguments
    pub fn analyze_at(
        &self,
        address: &str,
        transactions: &[TransactionRecord],
        as_of: DateTime<Utc>,
    ) -> FlowAnalysis {
        let dust_filter = DustFilter::new(self.config.dust_threshold_satoshis);
        let cutoff = self
            .config
            .time_window_days
            .map(|days| as_of - Duration::days(i64::from(days)));

        let mut aggregator = FlowAggregator::new(address);
        let mut skipped = Vec::new();
        let mut seen_ids: HashSet<&str> = HashSet::new();

        let mut skip = |txid: &str, reason: SkipReason| {
            skipped.push(SkippedTransaction {
                transaction_id: txid.to_string(),
                reason,
            });
        };

        for tx in transactions {
            if let Err(e) = validate_record(tx, &mut seen_ids) {
                warn!("malformed_transaction_rejected::{}", e);
                skip(&tx.id, SkipReason::Malformed);
                continue;
            }

            if let (Some(cutoff), Some(timestamp)) = (cutoff, tx.timestamp) {
                if timestamp < cutoff {
                    debug!("outside_window_skipped::txid::{}::timestamp::{}", tx.id, timestamp);
                    skip(&tx.id, SkipReason::OutsideWindow);
                    continue;
                }
            }

            let effect = match compute_net_effect(tx, address) {
                Ok(effect) => effect,
                Err(e) => {
                    warn!("malformed_transaction_rejected::{}", e);
                    skip(&tx.id, SkipReason::Malformed);
                    continue;
                },
            };

            if effect.net_satoshis == 0 {
                if tx.involves(address) {
                    debug!("zero_effect_skipped::txid::{}", tx.id);
                    skip(&tx.id, SkipReason::ZeroEffect);
                } else {
                    debug!("non_participant_skipped::txid::{}", tx.id);
                    skip(&tx.id, SkipReason::NonParticipant);
                }
                continue;
            }

            if !dust_filter.is_significant(&effect) {
                debug!(
                    "dust_skipped::txid::{}::net::{}::threshold::{}",
                    tx.id,
                    effect.net_satoshis,
                    dust_filter.threshold()
                );
                skip(&tx.id, SkipReason::Dust);
                continue;
            }

            match resolve_primary_counterparty(tx, &effect, address) {
                Ok(contribution) => {
                    debug!(
                        "flow_resolved::txid::{}::counterparty::{}::direction::{:?}::amount::{}",
                        tx.id, contribution.counterparty, contribution.direction, contribution.amount_satoshis
                    );
                    let profile = classifier::profile(tx);
                    aggregator.add(contribution, Some(&profile), tx.timestamp);
                },
                Err(e) => {
                    debug!("no_counterparty_skipped::{}", e);
                    skip(&tx.id, SkipReason::NoResolvableCounterparty);
                },
            }
        }

        let graph = aggregator.finish();
        debug!(
            "flow_graph_built::center::{}::transactions::{}::edges::{}::skipped::{}",
            address,
            transactions.len(),
            graph.get_edge_count(),
            skipped.len()
        );

        FlowAnalysis { graph, skipped }
    }

    /// Analyze a leniently decoded batch. Elements rejected while decoding
    /// are listed first as [`SkipReason::Malformed`].
    pub fn analyze_decoded(
        &self,
        address: &str,
        batch: &DecodedBatch<TransactionRecord>,
        as_of: DateTime<Utc>,
    ) -> FlowAnalysis {
        let mut analysis = self.analyze_at(address, &batch.records, as_of);
        let mut skipped: Vec<SkippedTransaction> = batch
            .rejected
            .iter()
            .map(|rejected| {
                warn!(
                    "malformed_transaction_rejected::txid::{}::reason::{}",
                    rejected.transaction_id, rejected.reason
                );
                SkippedTransaction {
                    transaction_id: rejected.transaction_id.clone(),
                    reason: SkipReason::Malformed,
                }
            })
            .collect();
        skipped.append(&mut analysis.skipped);
        analysis.skipped = skipped;
        analysis
    }
}

/// Graph-only convenience over [`NetFlowEngine::analyze_at`]
pub fn build_flow_graph(
    address: &str,
    transactions: &[TransactionRecord],
    config: &FlowEngineConfig,
    as_of: DateTime<Utc>,
) -> FlowGraph {
    NetFlowEngine::new(config.clone()).analyze_at(address, transactions, as_of).graph
}

fn validate_record<'a>(
    tx: &'a TransactionRecord,
    seen_ids: &mut HashSet<&'a str>,
) -> Result<(), FlowError> {
    let malformed = |reason: &str| FlowError::MalformedTransaction {
        txid: tx.id.clone(),
        reason: reason.to_string(),
    };

    if tx.id.trim().is_empty() {
        return Err(malformed("empty transaction id"));
    }
    if tx.total_input_value().is_none() {
        return Err(malformed("input values overflow"));
    }
    if tx.total_output_value().is_none() {
        return Err(malformed("output values overflow"));
    }
    if !seen_ids.insert(tx.id.as_str()) {
        return Err(malformed("duplicate transaction id in batch"));
    }
    Ok(())
}
