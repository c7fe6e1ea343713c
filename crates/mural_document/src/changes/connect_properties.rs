// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connecting and disconnecting property slots.

use crate::change::{Applied, Change, ChangeResult};
use crate::change_info::ChangeInfo;
use crate::document::Document;
use mural_graph::{Connection, ConversionTable, PropertyHandle};
use std::any::Any;

/// Connect an output slot to an input slot
///
/// Validation checks both endpoints exist, the types are compatible or
/// convertible, and the edge would not close a loop. A prior edge at the
/// input is replaced; revert restores it, which may reconnect a third
/// node's output.
#[derive(Debug)]
pub struct ConnectPropertiesChange {
    output: PropertyHandle,
    input: PropertyHandle,
    original_at_input: Option<Connection>,
}

impl ConnectPropertiesChange {
    /// Connect `output` into `input`
    pub fn new(output: PropertyHandle, input: PropertyHandle) -> Self {
        Self {
            output,
            input,
            original_at_input: None,
        }
    }
}

impl Change for ConnectPropertiesChange {
    fn description(&self) -> &str {
        "Connect properties"
    }

    fn initialize_and_validate(&mut self, target: &Document) -> bool {
        let graph = target.graph();
        let Some(output_node) = graph.node(self.output.node) else {
            return false;
        };
        let Some(input_node) = graph.node(self.input.node) else {
            return false;
        };
        let Some(output_prop) = output_node.output(&self.output.property) else {
            return false;
        };
        let Some(input_prop) = input_node.input(&self.input.property) else {
            return false;
        };
        if graph.would_form_cycle(self.output.node, self.input.node) {
            return false;
        }
        if !ConversionTable::builtin().can_convert(output_prop.value_type, input_prop.value_type) {
            return false;
        }

        self.original_at_input = graph.connection_to(&self.input).cloned();
        true
    }

    fn apply(&mut self, target: &mut Document, _first_apply: bool) -> Applied {
        let replaced = target
            .graph_mut()
            .connect(
                self.output.clone(),
                self.input.clone(),
                ConversionTable::builtin(),
            )
            .unwrap_or_else(|err| panic!("validated connect failed: {err}"));

        let mut infos = Vec::new();
        if replaced.is_some() {
            infos.push(ChangeInfo::PropertyDisconnected {
                input: self.input.clone(),
            });
        }
        infos.push(ChangeInfo::PropertiesConnected {
            output: self.output.clone(),
            input: self.input.clone(),
        });
        Applied::undoable(ChangeResult::from_vec(infos))
    }

    fn revert(&mut self, target: &mut Document) -> ChangeResult {
        let graph = target.graph_mut();
        graph.disconnect(&self.input);
        let mut infos = vec![ChangeInfo::PropertyDisconnected {
            input: self.input.clone(),
        }];

        if let Some(original) = &self.original_at_input {
            graph.restore_connection(original.clone());
            infos.push(ChangeInfo::PropertiesConnected {
                output: original.output.clone(),
                input: original.input.clone(),
            });
        }
        ChangeResult::from_vec(infos)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
