// SPDX-License-Identifier: MIT OR Apache-2.0
//! Structured notifications describing observable change effects.

use mural_graph::{NodeId, PropertyHandle, Value};
use serde::{Deserialize, Serialize};

/// One observable effect of an applied or reverted change
///
/// Infos arrive in order; a later entry may reference an entity created
/// by an earlier entry of the same list and must be processed in order.
/// Creation infos carry enough data for observers to render the node
/// without re-querying the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChangeInfo {
    /// A node was inserted into the graph
    NodeCreated {
        /// The new node's ID
        id: NodeId,
        /// Type tag it was constructed from
        type_tag: String,
        /// Display name at creation
        display_name: String,
        /// Position on the graph surface
        position: [f32; 2],
        /// Internal names of the input slots, in order
        inputs: Vec<String>,
        /// Internal names of the output slots, in order
        outputs: Vec<String>,
    },
    /// A node was removed from the graph
    NodeDeleted {
        /// The removed node's ID
        id: NodeId,
    },
    /// An output slot was connected to an input slot
    PropertiesConnected {
        /// Source output slot
        output: PropertyHandle,
        /// Target input slot
        input: PropertyHandle,
    },
    /// An input slot lost its connection
    PropertyDisconnected {
        /// The disconnected input slot
        input: PropertyHandle,
    },
    /// An input slot's unconnected constant changed
    PropertyValueUpdated {
        /// The owning node
        node: NodeId,
        /// Internal property name
        property: String,
        /// The new value
        value: Value,
    },
    /// A node moved on the graph surface
    NodePositionMoved {
        /// The moved node
        node: NodeId,
        /// New position
        position: [f32; 2],
    },
    /// A node's display name changed
    NodeRenamed {
        /// The renamed node
        node: NodeId,
        /// New display name
        display_name: String,
    },
    /// A graph constant was created
    ConstantCreated {
        /// Constant name
        name: String,
        /// Initial value
        value: Value,
    },
    /// A graph constant's value changed
    ConstantUpdated {
        /// Constant name
        name: String,
        /// New value
        value: Value,
    },
    /// A graph constant was removed
    ConstantDeleted {
        /// Constant name
        name: String,
    },
}

impl ChangeInfo {
    /// Build a creation info from a live node
    pub fn node_created(node: &mural_graph::Node) -> Self {
        Self::NodeCreated {
            id: node.id(),
            type_tag: node.type_tag.clone(),
            display_name: node.display_name.clone(),
            position: node.position,
            inputs: node
                .inputs()
                .iter()
                .map(|p| p.internal_name.clone())
                .collect(),
            outputs: node
                .outputs()
                .iter()
                .map(|p| p.internal_name.clone())
                .collect(),
        }
    }
}
