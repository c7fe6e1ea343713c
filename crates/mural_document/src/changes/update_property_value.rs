// SPDX-License-Identifier: MIT OR Apache-2.0
//! Updating the unconnected constant of an input slot.

use crate::change::{Applied, Change, ChangeResult, UpdateableChange};
use crate::change_info::ChangeInfo;
use crate::document::Document;
use mural_graph::{ConversionTable, FuncExpression, NodeId, Value, ValueType};
use std::any::Any;

/// Set an input slot's unconnected constant
///
/// Func-typed slots go through their own setter path: a plain value is
/// lifted into a constant expression instead of overwriting the slot
/// kind. As an updateable change, dragging a slider applies temporarily
/// each frame and merges into a single undo entry per gesture window.
#[derive(Debug)]
pub struct UpdatePropertyValueChange {
    node_id: NodeId,
    property: String,
    value: Value,
    previous: Option<Value>,
}

impl UpdatePropertyValueChange {
    /// Set `property` on `node_id` to `value`
    pub fn new(node_id: NodeId, property: impl Into<String>, value: Value) -> Self {
        Self {
            node_id,
            property: property.into(),
            value,
            previous: None,
        }
    }

    /// Replace the pending value during a gesture
    pub fn update_value(&mut self, value: Value) {
        self.value = value;
    }

    fn set_value(&self, target: &mut Document) -> Value {
        let node = target
            .graph_mut()
            .node_mut(self.node_id)
            .unwrap_or_else(|| panic!("validated node disappeared: {:?}", self.node_id));
        let input = node
            .input_mut(&self.property)
            .unwrap_or_else(|| panic!("validated property disappeared: {}", self.property));

        let stored = if input.value_type == ValueType::Func {
            // Func-input setter path: lift plain constants into expression
            // position, keep expressions as they are
            match &self.value {
                Value::Func(_) => self.value.clone(),
                other => Value::Func(FuncExpression::Constant(Box::new(other.clone()))),
            }
        } else if self.value.value_type() == input.value_type {
            self.value.clone()
        } else {
            ConversionTable::builtin()
                .try_convert(&self.value, input.value_type)
                .unwrap_or_else(|| panic!("validated value stopped converting: {}", self.property))
        };
        input.non_overriden_value = stored.clone();
        stored
    }
}

impl Change for UpdatePropertyValueChange {
    fn description(&self) -> &str {
        "Update property value"
    }

    fn initialize_and_validate(&mut self, target: &Document) -> bool {
        let Some(node) = target.find_node(self.node_id) else {
            return false;
        };
        let Some(input) = node.input(&self.property) else {
            return false;
        };
        if input.value_type != ValueType::Func
            && !ConversionTable::builtin().can_convert(self.value.value_type(), input.value_type)
        {
            return false;
        }
        self.previous = Some(input.non_overriden_value.clone());
        true
    }

    fn apply(&mut self, target: &mut Document, _first_apply: bool) -> Applied {
        let stored = self.set_value(target);
        Applied::undoable(ChangeResult::One(ChangeInfo::PropertyValueUpdated {
            node: self.node_id,
            property: self.property.clone(),
            value: stored,
        }))
    }

    fn revert(&mut self, target: &mut Document) -> ChangeResult {
        let Some(previous) = self.previous.clone() else {
            panic!("revert of an update that was never validated");
        };
        let node = target
            .graph_mut()
            .node_mut(self.node_id)
            .unwrap_or_else(|| panic!("validated node disappeared: {:?}", self.node_id));
        let input = node
            .input_mut(&self.property)
            .unwrap_or_else(|| panic!("validated property disappeared: {}", self.property));
        input.non_overriden_value = previous.clone();
        ChangeResult::One(ChangeInfo::PropertyValueUpdated {
            node: self.node_id,
            property: self.property.clone(),
            value: previous,
        })
    }

    fn is_mergeable_with(&self, other: &dyn Change) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| other.node_id == self.node_id && other.property == self.property)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl UpdateableChange for UpdatePropertyValueChange {
    fn apply_temporarily(&mut self, target: &mut Document) -> ChangeResult {
        let stored = self.set_value(target);
        ChangeResult::One(ChangeInfo::PropertyValueUpdated {
            node: self.node_id,
            property: self.property.clone(),
            value: stored,
        })
    }
}
