mod common;

use common::as_of;
use common::tx;
use mizan::NetFlowEngine;
use mizan::build_flow_graph;
use mizan::config::FlowEngineConfig;
use mizan::engine::net_effect::compute_net_effect;
use mizan::model::TransactionRecord;
use proptest::prelude::*;

const POOL: [&str; 6] = ["Q", "A", "B", "C", "D", "E"];

fn side() -> impl Strategy<Value = Vec<(usize, u64)>> {
    prop::collection::vec((0..POOL.len(), 1u64..5_000_000), 1..6)
}

fn record() -> impl Strategy<Value = TransactionRecord> {
    (side(), side()).prop_map(|(inputs, outputs)| {
        let inputs: Vec<(&str, u64)> = inputs.into_iter().map(|(i, v)| (POOL[i], v)).collect();
        let outputs: Vec<(&str, u64)> = outputs.into_iter().map(|(i, v)| (POOL[i], v)).collect();
        tx("pending", &inputs, &outputs)
    })
}

fn history() -> impl Strategy<Value = Vec<TransactionRecord>> {
    prop::collection::vec(record(), 0..20).prop_map(|mut records| {
        for (i, record) in records.iter_mut().enumerate() {
            record.id = format!("tx{i}");
        }
        records
    })
}

fn config(dust: u64) -> FlowEngineConfig {
    FlowEngineConfig {
        dust_threshold_satoshis: dust,
        time_window_days: None,
    }
}

proptest! {
    #[test]
    fn absent_address_has_zero_effect(record in record()) {
        let effect = compute_net_effect(&record, "Z").unwrap();
        prop_assert_eq!(effect.net_satoshis, 0);
    }

    #[test]
    fn each_transaction_lands_on_at_most_one_edge(records in history(), dust in 0u64..10_000) {
        let graph = build_flow_graph("Q", &records, &config(dust), as_of());
        for record in &records {
            let holders = graph
                .edges()
                .iter()
                .filter(|edge| edge.contributing_transaction_ids.contains(&record.id))
                .count();
            prop_assert!(holders <= 1);
        }
    }

    #[test]
    fn edge_totals_bounded_by_net_effects(records in history()) {
        let graph = build_flow_graph("Q", &records, &config(0), as_of());
        for edge in graph.edges() {
            for id in &edge.contributing_transaction_ids {
                let record = records.iter().find(|r| &r.id == id).unwrap();
                let volume = record.total_input_value().unwrap() + record.total_output_value().unwrap();
                prop_assert!(compute_net_effect(record, "Q").unwrap().magnitude() <= volume);
            }

            let bound: u64 = edge
                .contributing_transaction_ids
                .iter()
                .filter_map(|id| records.iter().find(|r| &r.id == id))
                .map(|r| compute_net_effect(r, "Q").unwrap().magnitude())
                .sum();
            prop_assert!(edge.aggregate_amount_satoshis <= bound);
            prop_assert!(edge.aggregate_amount_satoshis > 0);
            prop_assert!(edge.counterparty_address != "Q");
        }
    }

    #[test]
    fn analysis_is_idempotent(records in history(), dust in 0u64..10_000) {
        let engine = NetFlowEngine::new(config(dust));
        let first = engine.analyze_at("Q", &records, as_of());
        let second = engine.analyze_at("Q", &records, as_of());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn every_transaction_is_accounted_for(records in history()) {
        let analysis = NetFlowEngine::new(config(546)).analyze_at("Q", &records, as_of());
        for record in &records {
            let kept = analysis.graph.contains_transaction(&record.id);
            let skipped = analysis.skipped.iter().any(|s| s.transaction_id == record.id);
            prop_assert!(kept != skipped);
        }
    }
}
