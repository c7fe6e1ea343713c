// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) definitions for the graph.

use crate::node::NodeId;
use crate::property::PropertyHandle;
use serde::{Deserialize, Serialize};

/// A directed edge from an output slot to an input slot
///
/// At most one connection exists per input; outputs fan out freely. The
/// graph stores these centrally, keyed by the input handle, so a node
/// never holds references into another node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Source output slot
    pub output: PropertyHandle,
    /// Target input slot
    pub input: PropertyHandle,
}

impl Connection {
    /// Create a new connection
    pub fn new(output: PropertyHandle, input: PropertyHandle) -> Self {
        Self { output, input }
    }

    /// Check if this connection touches a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.output.node == node_id || self.input.node == node_id
    }
}
