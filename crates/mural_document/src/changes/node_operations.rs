// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection-topology snapshot/restore and detach helpers.
//!
//! Every node-removing change detaches through here before calling the
//! structural remove; skipping the detach would leave edges referencing a
//! node the graph no longer owns.

use crate::change_info::ChangeInfo;
use mural_graph::{Connection, ConversionTable, NodeGraph, NodeId};

/// The internal input name a pass-through node forwards when not
/// otherwise consumed
pub const BACKGROUND_INPUT: &str = "background";

/// Snapshot of every edge touching one node
#[derive(Debug, Clone, Default)]
pub struct ConnectionsData {
    /// Edges feeding this node's inputs
    pub inbound: Vec<Connection>,
    /// Edges from this node's outputs to other nodes' inputs
    pub outbound: Vec<Connection>,
}

impl ConnectionsData {
    /// True when the node had no edges at capture time
    pub fn is_empty(&self) -> bool {
        self.inbound.is_empty() && self.outbound.is_empty()
    }
}

/// Capture the full connection topology around a node
pub fn capture_connections(graph: &NodeGraph, node: NodeId) -> ConnectionsData {
    let mut data = ConnectionsData::default();
    for connection in graph.connections_for_node(node) {
        if connection.input.node == node {
            data.inbound.push(connection.clone());
        } else {
            data.outbound.push(connection.clone());
        }
    }
    data
}

/// Detach every edge touching a node, optionally bridging its background
/// feed to its consumers
///
/// With `reroute_background`, the single upstream edge into the node's
/// background input is reconnected directly to each input the node used
/// to feed, so deleting a pass-through layer keeps the chain intact.
/// Returns the ordered infos describing the disconnects and reroutes.
pub fn detach_node(
    graph: &mut NodeGraph,
    node: NodeId,
    reroute_background: bool,
) -> Vec<ChangeInfo> {
    let data = capture_connections(graph, node);
    let mut infos = Vec::new();

    let background_source = data
        .inbound
        .iter()
        .find(|c| c.input.property == BACKGROUND_INPUT)
        .map(|c| c.output.clone());

    for connection in &data.inbound {
        graph.disconnect(&connection.input);
        infos.push(ChangeInfo::PropertyDisconnected {
            input: connection.input.clone(),
        });
    }
    for connection in &data.outbound {
        graph.disconnect(&connection.input);
        infos.push(ChangeInfo::PropertyDisconnected {
            input: connection.input.clone(),
        });
    }

    if reroute_background {
        if let Some(source) = background_source {
            let table = ConversionTable::builtin();
            for connection in &data.outbound {
                if let Ok(_replaced) =
                    graph.connect(source.clone(), connection.input.clone(), table)
                {
                    infos.push(ChangeInfo::PropertiesConnected {
                        output: source.clone(),
                        input: connection.input.clone(),
                    });
                }
            }
        }
    }

    infos
}

/// Replay a captured topology exactly
///
/// Edges occupying a restored input (e.g. a reroute bridge) are replaced;
/// their removal is reported before the reconnection so observers process
/// the stream in order.
pub fn restore_connections(graph: &mut NodeGraph, data: &ConnectionsData) -> Vec<ChangeInfo> {
    let mut infos = Vec::new();
    for connection in data.inbound.iter().chain(data.outbound.iter()) {
        if let Some(replaced) = graph.restore_connection(connection.clone()) {
            if replaced != *connection {
                infos.push(ChangeInfo::PropertyDisconnected {
                    input: replaced.input,
                });
            }
        }
        infos.push(ChangeInfo::PropertiesConnected {
            output: connection.output.clone(),
            input: connection.input.clone(),
        });
    }
    infos
}

#[cfg(test)]
mod tests {
    use super::*;
    use mural_graph::{NodeTypeRegistry, PropertyHandle};

    fn chain() -> (NodeGraph, NodeId, NodeId, NodeId) {
        let registry = NodeTypeRegistry::builtin();
        let mut graph = NodeGraph::new();
        let a = graph.add_node(registry.create_node("merge", NodeId::new()));
        let b = graph.add_node(registry.create_node("blur", NodeId::new()));
        let c = graph.add_node(registry.create_node("output", NodeId::new()));
        let table = ConversionTable::builtin();
        graph
            .connect(
                PropertyHandle::new(a, "output"),
                PropertyHandle::new(b, "background"),
                table,
            )
            .unwrap();
        graph
            .connect(
                PropertyHandle::new(b, "output"),
                PropertyHandle::new(c, "background"),
                table,
            )
            .unwrap();
        (graph, a, b, c)
    }

    #[test]
    fn detach_with_reroute_bridges_the_chain() {
        let (mut graph, a, b, c) = chain();
        detach_node(&mut graph, b, true);

        let into_c = graph
            .connection_to(&PropertyHandle::new(c, "background"))
            .expect("chain stays connected");
        assert_eq!(into_c.output.node, a);
        assert!(graph.connections_for_node(b).next().is_none());
    }

    #[test]
    fn detach_without_reroute_leaves_consumer_unconnected() {
        let (mut graph, _a, b, c) = chain();
        detach_node(&mut graph, b, false);
        assert!(graph
            .connection_to(&PropertyHandle::new(c, "background"))
            .is_none());
    }

    #[test]
    fn capture_and_restore_round_trips_topology() {
        let (mut graph, _a, b, _c) = chain();
        let data = capture_connections(&graph, b);
        assert_eq!(data.inbound.len(), 1);
        assert_eq!(data.outbound.len(), 1);

        let before: Vec<_> = graph.connections().cloned().collect();
        detach_node(&mut graph, b, true);
        restore_connections(&mut graph, &data);
        let after: Vec<_> = graph.connections().cloned().collect();

        assert_eq!(before.len(), after.len());
        for edge in &before {
            assert!(after.contains(edge));
        }
    }
}
