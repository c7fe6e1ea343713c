// SPDX-License-Identifier: MIT OR Apache-2.0
//! Moving a node on the graph surface.

use crate::change::{Applied, Change, ChangeResult, UpdateableChange};
use crate::change_info::ChangeInfo;
use crate::document::Document;
use mural_graph::NodeId;
use std::any::Any;

/// Move a node, merging consecutive moves into one undo entry
///
/// During a drag the host applies this temporarily each frame; the final
/// apply commits once. A second move of the same node shortly after
/// merges into the existing entry, so one revert restores the position
/// from before the first move.
#[derive(Debug)]
pub struct NodePositionChange {
    node_id: NodeId,
    to: [f32; 2],
    original: Option<[f32; 2]>,
}

impl NodePositionChange {
    /// Move `node_id` to `to`
    pub fn new(node_id: NodeId, to: [f32; 2]) -> Self {
        Self {
            node_id,
            to,
            original: None,
        }
    }

    /// Update the target position during a drag
    pub fn update_position(&mut self, to: [f32; 2]) {
        self.to = to;
    }

    fn move_node(&self, target: &mut Document, position: [f32; 2]) -> ChangeInfo {
        let node = target
            .graph_mut()
            .node_mut(self.node_id)
            .unwrap_or_else(|| panic!("validated node disappeared: {:?}", self.node_id));
        node.position = position;
        ChangeInfo::NodePositionMoved {
            node: self.node_id,
            position,
        }
    }
}

impl Change for NodePositionChange {
    fn description(&self) -> &str {
        "Move node"
    }

    fn initialize_and_validate(&mut self, target: &Document) -> bool {
        match target.find_node(self.node_id) {
            Some(node) => {
                self.original = Some(node.position);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, target: &mut Document, _first_apply: bool) -> Applied {
        Applied::undoable(ChangeResult::One(self.move_node(target, self.to)))
    }

    fn revert(&mut self, target: &mut Document) -> ChangeResult {
        let Some(original) = self.original else {
            panic!("revert of a move that was never validated");
        };
        ChangeResult::One(self.move_node(target, original))
    }

    fn is_mergeable_with(&self, other: &dyn Change) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| other.node_id == self.node_id)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl UpdateableChange for NodePositionChange {
    fn apply_temporarily(&mut self, target: &mut Document) -> ChangeResult {
        ChangeResult::One(self.move_node(target, self.to))
    }
}
