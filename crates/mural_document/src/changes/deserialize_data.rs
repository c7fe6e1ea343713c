// SPDX-License-Identifier: MIT OR Apache-2.0
//! Applying node-kind-specific deserialization data.

use crate::change::{Applied, Change, ChangeResult};
use crate::document::Document;
use mural_graph::NodeId;
use std::any::Any;

/// Apply extra deserialized state to a node after generic property load
///
/// Non-undoable by contract: it only ever runs during document
/// reconstruction, outside the undo stack. Reverting it is a contract
/// violation and aborts.
#[derive(Debug)]
pub struct ApplyDeserializedDataChange {
    node_id: NodeId,
    data: serde_json::Value,
}

impl ApplyDeserializedDataChange {
    /// Apply `data` to `node_id` through its kind's hook
    pub fn new(node_id: NodeId, data: serde_json::Value) -> Self {
        Self { node_id, data }
    }
}

impl Change for ApplyDeserializedDataChange {
    fn description(&self) -> &str {
        "Apply deserialized node data"
    }

    fn initialize_and_validate(&mut self, target: &Document) -> bool {
        target.has_node(self.node_id)
    }

    fn apply(&mut self, target: &mut Document, _first_apply: bool) -> Applied {
        if let Err(err) = target.apply_additional_data(self.node_id, &self.data) {
            panic!("validated node rejected additional data: {err}");
        }
        Applied::ignored(ChangeResult::None)
    }

    fn revert(&mut self, _target: &mut Document) -> ChangeResult {
        panic!("revert called on a non-undoable deserialization change");
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
    use mural_graph::NodeTypeRegistry;

    #[test]
    fn applies_through_the_registered_hook() {
        let mut document = Document::new();
        let registry = NodeTypeRegistry::builtin();
        let id = document
            .graph_mut()
            .add_node(registry.create_node("constant", NodeId::new()));

        let mut change =
            ApplyDeserializedDataChange::new(id, serde_json::json!({ "constant": "exposure" }));
        assert!(change.initialize_and_validate(&document));
        let applied = change.apply(&mut document, true);
        assert!(applied.ignore_in_undo);
        assert_eq!(
            document.find_node(id).unwrap().data["constant"],
            serde_json::json!("exposure")
        );
    }

    #[test]
    #[should_panic(expected = "non-undoable")]
    fn revert_is_a_contract_violation() {
        let mut document = Document::new();
        let registry = NodeTypeRegistry::builtin();
        let id = document
            .graph_mut()
            .add_node(registry.create_node("constant", NodeId::new()));
        let mut change = ApplyDeserializedDataChange::new(id, serde_json::json!({}));
        change.revert(&mut document);
    }
}
