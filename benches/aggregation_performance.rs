use std::hint::black_box;

use chrono::TimeZone;
use chrono::Utc;
use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use mizan::NetFlowEngine;
use mizan::config::FlowEngineConfig;
use mizan::engine::export::export_graph;
use mizan::model::TransactionRecord;
use mizan::model::TxEntry;

const CENTER: &str = "bc1qcenter";

/// Alternating receipts and payments spread over `counterparties` peers.
/// Receipts send change to a fresh address, payments back to the center.
fn history(
    transactions: usize,
    counterparties: usize,
) -> Vec<TransactionRecord> {
    (0..transactions)
        .map(|i| {
            let peer = format!("bc1qpeer{}", i % counterparties);
            let amount = 10_000 + (i as u64 * 37) % 90_000;
            if i % 2 == 0 {
                TransactionRecord::new(
                    format!("tx{i}"),
                    vec![TxEntry::new(peer, amount + 5_000)],
                    vec![TxEntry::new(CENTER, amount), TxEntry::new(format!("bc1qchange{i}"), 4_000)],
                )
            } else {
                TransactionRecord::new(
                    format!("tx{i}"),
                    vec![TxEntry::new(CENTER, amount + 5_000)],
                    vec![TxEntry::new(peer, amount), TxEntry::new(CENTER, 4_000)],
                )
            }
        })
        .collect()
}

fn bench_analyze(c: &mut Criterion) {
    let engine = NetFlowEngine::new(FlowEngineConfig::default());
    let as_of = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let mut group = c.benchmark_group("analyze");

    for size in [10usize, 100, 1_000, 10_000] {
        let transactions = history(size, 50);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &transactions, |b, transactions| {
            b.iter(|| engine.analyze_at(black_box(CENTER), black_box(transactions), as_of))
        });
    }
    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let engine = NetFlowEngine::new(FlowEngineConfig::default());
    let as_of = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let graph = engine.analyze_at(CENTER, &history(5_000, 500), as_of).graph;

    c.bench_function("export_graph_500_peers", |b| b.iter(|| export_graph(black_box(&graph), None)));
}

criterion_group!(benches, bench_analyze, bench_export);
criterion_main!(benches);
