// SPDX-License-Identifier: MIT OR Apache-2.0
//! Updating a graph constant's value.

use crate::change::{Applied, Change, ChangeResult};
use crate::change_info::ChangeInfo;
use crate::document::Document;
use mural_graph::Value;
use std::any::Any;

/// Set a graph constant to a new value
#[derive(Debug)]
pub struct UpdateConstantChange {
    name: String,
    value: Value,
    previous: Option<Value>,
}

impl UpdateConstantChange {
    /// Set constant `name` to `value`
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
            previous: None,
        }
    }

    fn set(&self, target: &mut Document, value: &Value) -> ChangeInfo {
        let constant = target
            .graph_mut()
            .constant_mut(&self.name)
            .unwrap_or_else(|| panic!("validated constant disappeared: {}", self.name));
        constant.value = value.clone();
        ChangeInfo::ConstantUpdated {
            name: self.name.clone(),
            value: value.clone(),
        }
    }
}

impl Change for UpdateConstantChange {
    fn description(&self) -> &str {
        "Update constant"
    }

    fn initialize_and_validate(&mut self, target: &Document) -> bool {
        match target.graph().constant(&self.name) {
            Some(constant) => {
                self.previous = Some(constant.value.clone());
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, target: &mut Document, _first_apply: bool) -> Applied {
        let value = self.value.clone();
        Applied::undoable(ChangeResult::One(self.set(target, &value)))
    }

    fn revert(&mut self, target: &mut Document) -> ChangeResult {
        let Some(previous) = self.previous.clone() else {
            panic!("revert of a constant update that was never validated");
        };
        ChangeResult::One(self.set(target, &previous))
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
    use mural_graph::GraphConstant;

    #[test]
    fn update_then_revert_restores_value() {
        let mut document = Document::new();
        document
            .graph_mut()
            .add_constant(GraphConstant::new("exposure", Value::Float(1.0)));

        let mut change = UpdateConstantChange::new("exposure", Value::Float(0.5));
        assert!(change.initialize_and_validate(&document));
        change.apply(&mut document, true);
        assert_eq!(
            document.graph().constant("exposure").unwrap().value,
            Value::Float(0.5)
        );

        change.revert(&mut document);
        assert_eq!(
            document.graph().constant("exposure").unwrap().value,
            Value::Float(1.0)
        );
    }

    #[test]
    fn missing_constant_fails_validation() {
        let document = Document::new();
        let mut change = UpdateConstantChange::new("missing", Value::Float(0.5));
        assert!(!change.initialize_and_validate(&document));
    }
}
