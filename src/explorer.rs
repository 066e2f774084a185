use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use tracing::info;
use tracing::instrument;

use crate::Result;
use crate::engine::FlowAnalysis;
use crate::engine::NetFlowEngine;
use crate::engine::export::export_graph;
use crate::err_with_loc;
use crate::model::GraphExport;
use crate::source::TransactionSource;

/// Fetches an address's recent transactions and turns them into a
/// renderable net-flow graph
#[derive(Debug, Clone)]
pub struct Explorer<S> {
    source: Arc<S>,
    engine: NetFlowEngine,
    max_transactions_per_query: usize,
}

impl<S: TransactionSource> Explorer<S> {
    pub fn new(
        source: Arc<S>,
        engine: NetFlowEngine,
        max_transactions_per_query: usize,
    ) -> Self {
        Self {
            source,
            engine,
            max_transactions_per_query,
        }
    }

    /// Fetch and analyze. A fetch failure aborts the query; it is never
    /// reported as an empty graph.
    #[instrument(level = "debug", skip(self))]
    pub async fn analyze(
        &self,
        address: &str,
        as_of: DateTime<Utc>,
    ) -> Result<FlowAnalysis> {
        let transactions = self
            .source
            .fetch_transactions(address, self.max_transactions_per_query)
            .await
            .map_err(|e| err_with_loc!(e))?;

        let analysis = self.engine.analyze_at(address, &transactions, as_of);
        info!(
            "explore_analyzed::address::{}::transactions::{}::edges::{}::skipped::{}",
            address,
            transactions.len(),
            analysis.graph.get_edge_count(),
            analysis.skipped.len()
        );
        Ok(analysis)
    }

    /// [`Self::analyze`] followed by export, with the center's on-chain summary attached
    pub async fn explore(
        &self,
        address: &str,
    ) -> Result<GraphExport> {
        let analysis = self.analyze(address, Utc::now()).await?;
        let summary = self
            .source
            .fetch_address_summary(address)
            .await
            .map_err(|e| err_with_loc!(e))?;

        Ok(export_graph(&analysis.graph, Some(summary)))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::FetchError;
    use crate::model::AddressSummary;
    use crate::model::TransactionRecord;
    use crate::source::StaticSource;
    use crate::test_utils::fixtures::tx;

    struct FailingSource;

    #[async_trait]
    impl TransactionSource for FailingSource {
        async fn fetch_transactions(
            &self,
            _address: &str,
            _limit: usize,
        ) -> std::result::Result<Vec<TransactionRecord>, FetchError> {
            Err(FetchError::Status {
                status: 503,
                url: "http://esplora/address/Q/txs".to_string(),
            })
        }

        async fn fetch_address_summary(
            &self,
            _address: &str,
        ) -> std::result::Result<AddressSummary, FetchError> {
            unreachable!("summary is not requested after a failed fetch")
        }
    }

    #[tokio::test]
    async fn fetch_failure_propagates_untouched() {
        let explorer = Explorer::new(Arc::new(FailingSource), NetFlowEngine::default(), 10);

        let err = explorer.explore("Q").await.unwrap_err();
        assert!(matches!(err.downcast_ref::<FetchError>(), Some(FetchError::Status { status: 503, .. })));
    }

    #[tokio::test]
    async fn no_activity_is_a_valid_empty_graph() {
        let explorer = Explorer::new(Arc::new(StaticSource::default()), NetFlowEngine::default(), 10);

        let export = explorer.explore("Q").await.unwrap();
        assert!(export.is_empty());
        assert_eq!(export.nodes.len(), 1);
        assert_eq!(export.center_summary.unwrap().tx_count, 0);
    }

    #[tokio::test]
    async fn respects_query_limit() {
        let source = StaticSource::new(vec![
            tx("a", &[("A", 10_000)], &[("Q", 9_000)]),
            tx("b", &[("B", 10_000)], &[("Q", 9_000)]),
        ]);
        let explorer = Explorer::new(Arc::new(source), NetFlowEngine::default(), 1);

        let analysis = explorer.analyze("Q", Utc::now()).await.unwrap();
        assert_eq!(analysis.graph.counterparties(), vec!["A"]);
    }
}
