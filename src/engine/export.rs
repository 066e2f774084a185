use crate::model::AddressSummary;
use crate::model::Direction;
use crate::model::ExportEdge;
use crate::model::ExportNode;
use crate::model::FlowGraph;
use crate::model::GraphExport;
use crate::model::NodeKind;
use crate::utils::sats_to_btc;
use crate::utils::short_label;
use crate::utils::signed_sats_to_btc;

/// Convert a flow graph into the node/edge lists a renderer consumes.
/// Output order is the center followed by counterparties in edge order.
pub fn export_graph(
    graph: &FlowGraph,
    center_summary: Option<AddressSummary>,
) -> GraphExport {
    let center = graph.center().to_string();

    let mut nodes = Vec::with_capacity(graph.get_edge_count() + 1);
    nodes.push(node(graph, &center, NodeKind::Center));
    for counterparty in graph.counterparties() {
        let sends = graph.edge(counterparty, Direction::Incoming).is_some();
        let receives = graph.edge(counterparty, Direction::Outgoing).is_some();
        let kind = match (sends, receives) {
            (true, true) => NodeKind::Mixed,
            (true, false) => NodeKind::Source,
            _ => NodeKind::Destination,
        };
        nodes.push(node(graph, counterparty, kind));
    }

    let edges = graph
        .edges()
        .iter()
        .map(|edge| {
            let (source, target) = match edge.direction {
                Direction::Incoming => (edge.counterparty_address.clone(), center.clone()),
                Direction::Outgoing => (center.clone(), edge.counterparty_address.clone()),
            };
            ExportEdge {
                source,
                target,
                direction: edge.direction,
                amount_satoshis: edge.aggregate_amount_satoshis,
                amount_btc: sats_to_btc(edge.aggregate_amount_satoshis),
                transaction_count: edge.transaction_count(),
                risk_level: edge.risk_level,
                categories: edge.categories.iter().copied().collect(),
                latest_timestamp: edge.latest_timestamp,
                transaction_ids: edge.contributing_transaction_ids.iter().cloned().collect(),
            }
        })
        .collect();

    GraphExport {
        center,
        center_summary,
        nodes,
        edges,
    }
}

fn node(
    graph: &FlowGraph,
    address: &str,
    kind: NodeKind,
) -> ExportNode {
    let balance = graph.node_balance(address).unwrap_or(0);
    ExportNode {
        address: address.to_string(),
        label: short_label(address),
        kind,
        balance_satoshis: balance,
        balance_btc: signed_sats_to_btc(balance),
    }
}
