// SPDX-License-Identifier: MIT OR Apache-2.0
//! Removing the edge at an input slot.

use crate::change::{Applied, Change, ChangeResult};
use crate::change_info::ChangeInfo;
use crate::document::Document;
use mural_graph::{Connection, PropertyHandle};
use std::any::Any;

/// Disconnect whatever feeds an input slot
#[derive(Debug)]
pub struct DisconnectPropertyChange {
    input: PropertyHandle,
    original: Option<Connection>,
}

impl DisconnectPropertyChange {
    /// Disconnect the edge at `input`
    pub fn new(input: PropertyHandle) -> Self {
        Self {
            input,
            original: None,
        }
    }
}

impl Change for DisconnectPropertyChange {
    fn description(&self) -> &str {
        "Disconnect property"
    }

    fn initialize_and_validate(&mut self, target: &Document) -> bool {
        match target.graph().connection_to(&self.input) {
            Some(connection) => {
                self.original = Some(connection.clone());
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, target: &mut Document, _first_apply: bool) -> Applied {
        target.graph_mut().disconnect(&self.input);
        Applied::undoable(ChangeResult::One(ChangeInfo::PropertyDisconnected {
            input: self.input.clone(),
        }))
    }

    fn revert(&mut self, target: &mut Document) -> ChangeResult {
        let Some(original) = &self.original else {
            panic!("revert of a disconnect that was never validated");
        };
        target.graph_mut().restore_connection(original.clone());
        ChangeResult::One(ChangeInfo::PropertiesConnected {
            output: original.output.clone(),
            input: original.input.clone(),
        })
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
    use mural_graph::{ConversionTable, NodeId, NodeTypeRegistry};

    #[test]
    fn disconnect_then_revert_restores_edge() {
        let mut document = Document::new();
        let registry = NodeTypeRegistry::builtin();
        let a = document
            .graph_mut()
            .add_node(registry.create_node("merge", NodeId::new()));
        let b = document
            .graph_mut()
            .add_node(registry.create_node("output", NodeId::new()));
        let input = PropertyHandle::new(b, "background");
        document
            .graph_mut()
            .connect(
                PropertyHandle::new(a, "output"),
                input.clone(),
                ConversionTable::builtin(),
            )
            .unwrap();

        let mut change = DisconnectPropertyChange::new(input.clone());
        assert!(change.initialize_and_validate(&document));
        change.apply(&mut document, true);
        assert!(document.graph().connection_to(&input).is_none());

        change.revert(&mut document);
        assert_eq!(
            document.graph().connection_to(&input).unwrap().output.node,
            a
        );
    }

    #[test]
    fn unconnected_input_fails_validation() {
        let mut document = Document::new();
        let registry = NodeTypeRegistry::builtin();
        let b = document
            .graph_mut()
            .add_node(registry.create_node("output", NodeId::new()));
        let mut change = DisconnectPropertyChange::new(PropertyHandle::new(b, "background"));
        assert!(!change.initialize_and_validate(&document));
    }
}
