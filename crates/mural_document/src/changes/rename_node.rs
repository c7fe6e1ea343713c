// SPDX-License-Identifier: MIT OR Apache-2.0
//! Renaming a node.

use crate::change::{Applied, Change, ChangeResult};
use crate::change_info::ChangeInfo;
use crate::document::Document;
use mural_graph::NodeId;
use std::any::Any;

/// Change a node's display name
#[derive(Debug)]
pub struct RenameNodeChange {
    node_id: NodeId,
    name: String,
    original: Option<String>,
}

impl RenameNodeChange {
    /// Rename `node_id` to `name`
    pub fn new(node_id: NodeId, name: impl Into<String>) -> Self {
        Self {
            node_id,
            name: name.into(),
            original: None,
        }
    }

    fn rename(&self, target: &mut Document, name: &str) -> ChangeInfo {
        let node = target
            .graph_mut()
            .node_mut(self.node_id)
            .unwrap_or_else(|| panic!("validated node disappeared: {:?}", self.node_id));
        node.display_name = name.to_string();
        ChangeInfo::NodeRenamed {
            node: self.node_id,
            display_name: name.to_string(),
        }
    }
}

impl Change for RenameNodeChange {
    fn description(&self) -> &str {
        "Rename node"
    }

    fn initialize_and_validate(&mut self, target: &Document) -> bool {
        match target.find_node(self.node_id) {
            Some(node) => {
                self.original = Some(node.display_name.clone());
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, target: &mut Document, _first_apply: bool) -> Applied {
        let name = self.name.clone();
        Applied::undoable(ChangeResult::One(self.rename(target, &name)))
    }

    fn revert(&mut self, target: &mut Document) -> ChangeResult {
        let Some(original) = self.original.clone() else {
            panic!("revert of a rename that was never validated");
        };
        ChangeResult::One(self.rename(target, &original))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
