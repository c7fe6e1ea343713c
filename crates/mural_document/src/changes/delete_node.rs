// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node deletion with exact topology restoration.

use crate::change::{Applied, Change, ChangeResult};
use crate::change_info::ChangeInfo;
use crate::changes::node_operations::{self, ConnectionsData};
use crate::document::Document;
use mural_graph::{Node, NodeId};
use std::any::Any;

/// Delete a node, detaching its edges first
///
/// Validation snapshots the full connection topology and a deep clone of
/// the node. Apply detaches everything — bridging a background
/// pass-through feed to the node's consumers so the chain survives — then
/// removes the node. Revert re-inserts the clone under the original ID
/// and replays the snapshot exactly.
#[derive(Debug)]
pub struct DeleteNodeChange {
    id: NodeId,
    reroute_background: bool,
    cloned: Option<Node>,
    topology: Option<ConnectionsData>,
}

impl DeleteNodeChange {
    /// Delete with pass-through rerouting enabled
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            reroute_background: true,
            cloned: None,
            topology: None,
        }
    }

    /// Control whether a background feed is bridged to the consumers
    pub fn with_reroute(mut self, reroute_background: bool) -> Self {
        self.reroute_background = reroute_background;
        self
    }
}

impl Change for DeleteNodeChange {
    fn description(&self) -> &str {
        "Delete node"
    }

    fn initialize_and_validate(&mut self, target: &Document) -> bool {
        let Some(node) = target.find_node(self.id) else {
            return false;
        };
        self.cloned = Some(node.clone_with_id(self.id));
        self.topology = Some(node_operations::capture_connections(target.graph(), self.id));
        true
    }

    fn apply(&mut self, target: &mut Document, _first_apply: bool) -> Applied {
        let graph = target.graph_mut();
        let mut infos = node_operations::detach_node(graph, self.id, self.reroute_background);
        graph.remove_node(self.id);
        infos.push(ChangeInfo::NodeDeleted { id: self.id });
        Applied::undoable(ChangeResult::from_vec(infos))
    }

    fn revert(&mut self, target: &mut Document) -> ChangeResult {
        let (Some(cloned), Some(topology)) = (&self.cloned, &self.topology) else {
            panic!("revert of a delete that was never validated");
        };
        let graph = target.graph_mut();
        // Keep our copy: the entry may be reverted again after a redo
        let restored = cloned.clone();
        let mut infos = vec![ChangeInfo::node_created(&restored)];
        graph.add_node(restored);
        infos.extend(node_operations::restore_connections(graph, topology));
        ChangeResult::from_vec(infos)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mural_graph::{ConversionTable, NodeTypeRegistry, PropertyHandle, Value};

    /// A -> blur -> output chain where A feeds blur's background input
    fn document_with_chain() -> (Document, NodeId, NodeId, NodeId) {
        let mut document = Document::new();
        let registry = NodeTypeRegistry::builtin();
        let a = registry.create_node("merge", NodeId::new());
        let b = registry.create_node("blur", NodeId::new());
        let c = registry.create_node("output", NodeId::new());
        let (a_id, b_id, c_id) = (a.id(), b.id(), c.id());
        let graph = document.graph_mut();
        graph.add_node(a);
        graph.add_node(b);
        graph.add_node(c);
        let table = ConversionTable::builtin();
        graph
            .connect(
                PropertyHandle::new(a_id, "output"),
                PropertyHandle::new(b_id, "background"),
                table,
            )
            .unwrap();
        graph
            .connect(
                PropertyHandle::new(b_id, "output"),
                PropertyHandle::new(c_id, "background"),
                table,
            )
            .unwrap();
        (document, a_id, b_id, c_id)
    }

    #[test]
    fn delete_pass_through_bridges_chain_and_undo_restores_it() {
        let (mut document, a, b, c) = document_with_chain();
        let mut change = DeleteNodeChange::new(b);
        assert!(change.initialize_and_validate(&document));

        change.apply(&mut document, true);
        assert!(!document.has_node(b));
        let bridged = document
            .graph()
            .connection_to(&PropertyHandle::new(c, "background"))
            .expect("chain bridged past the deleted node");
        assert_eq!(bridged.output.node, a);

        change.revert(&mut document);
        assert!(document.has_node(b));
        let into_b = document
            .graph()
            .connection_to(&PropertyHandle::new(b, "background"))
            .expect("original inbound edge restored");
        assert_eq!(into_b.output.node, a);
        let into_c = document
            .graph()
            .connection_to(&PropertyHandle::new(c, "background"))
            .expect("original outbound edge restored");
        assert_eq!(into_c.output.node, b);
        assert_eq!(document.graph().connection_count(), 2);
    }

    #[test]
    fn revert_preserves_property_values() {
        let (mut document, _a, b, _c) = document_with_chain();
        document
            .graph_mut()
            .node_mut(b)
            .unwrap()
            .input_mut("radius")
            .unwrap()
            .non_overriden_value = Value::Float(7.5);

        let mut change = DeleteNodeChange::new(b);
        assert!(change.initialize_and_validate(&document));
        change.apply(&mut document, true);
        change.revert(&mut document);

        let restored = document.find_node(b).unwrap();
        assert_eq!(
            restored.input("radius").unwrap().non_overriden_value,
            Value::Float(7.5)
        );
    }

    #[test]
    fn delete_missing_node_fails_validation() {
        let document = Document::new();
        let mut change = DeleteNodeChange::new(NodeId::new());
        assert!(!change.initialize_and_validate(&document));
    }

    #[test]
    fn redo_then_undo_still_restores() {
        let (mut document, a, b, _c) = document_with_chain();
        let mut change = DeleteNodeChange::new(b);
        assert!(change.initialize_and_validate(&document));

        change.apply(&mut document, true);
        change.revert(&mut document);
        change.apply(&mut document, false);
        assert!(!document.has_node(b));
        change.revert(&mut document);

        assert!(document.has_node(b));
        assert_eq!(
            document
                .graph()
                .connection_to(&PropertyHandle::new(b, "background"))
                .unwrap()
                .output
                .node,
            a
        );
    }
}
