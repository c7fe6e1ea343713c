// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions and the explicit node-type registry.

use crate::keyframe::KeyFrameTrack;
use crate::property::{InputProperty, OutputProperty};
use crate::value::ValueType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// A node instance in the graph
///
/// The ID is fixed at construction; everything else the user sees
/// (display name, position) is mutable through changes. Input and output
/// slots keep their declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    /// Stable type tag this node was constructed from
    pub type_tag: String,
    /// Display name (can be customized)
    pub display_name: String,
    /// Position in the graph surface
    pub position: [f32; 2],
    inputs: Vec<InputProperty>,
    outputs: Vec<OutputProperty>,
    /// Sparse per-frame-range data keyed by element name
    pub keyframes: IndexMap<String, KeyFrameTrack>,
    /// Node-kind-specific extra state, restored by the deserialization hook
    pub data: serde_json::Value,
}

impl Node {
    /// Create a node with the given slots
    pub fn new(
        id: NodeId,
        type_tag: impl Into<String>,
        display_name: impl Into<String>,
        inputs: Vec<InputProperty>,
        outputs: Vec<OutputProperty>,
    ) -> Self {
        Self {
            id,
            type_tag: type_tag.into(),
            display_name: display_name.into(),
            position: [0.0, 0.0],
            inputs,
            outputs,
            keyframes: IndexMap::new(),
            data: serde_json::Value::Null,
        }
    }

    /// The immutable node ID
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Ordered input slots
    pub fn inputs(&self) -> &[InputProperty] {
        &self.inputs
    }

    /// Ordered output slots
    pub fn outputs(&self) -> &[OutputProperty] {
        &self.outputs
    }

    /// Get an input slot by internal name
    pub fn input(&self, internal_name: &str) -> Option<&InputProperty> {
        self.inputs.iter().find(|p| p.internal_name == internal_name)
    }

    /// Get a mutable input slot by internal name
    pub fn input_mut(&mut self, internal_name: &str) -> Option<&mut InputProperty> {
        self.inputs.iter_mut().find(|p| p.internal_name == internal_name)
    }

    /// Get an output slot by internal name
    pub fn output(&self, internal_name: &str) -> Option<&OutputProperty> {
        self.outputs.iter().find(|p| p.internal_name == internal_name)
    }

    /// Structurally independent copy under a caller-assigned ID
    ///
    /// Property types, values, keyframes, and extra data are copied; the
    /// copy has zero connections since edges live on the graph, not here.
    pub fn clone_with_id(&self, id: NodeId) -> Self {
        let mut copy = self.clone();
        copy.id = id;
        copy
    }
}

/// A registered node type: its slot layout and late-bound hooks
#[derive(Clone)]
pub struct NodeType {
    /// Stable type tag
    pub tag: String,
    /// Default display name
    pub name: String,
    /// Factory producing the slot layout
    pub factory: fn() -> (Vec<InputProperty>, Vec<OutputProperty>),
    /// Hook restoring node-kind-specific extra state after generic
    /// property load; never invoked inside an undoable change
    pub deserialize_additional_data: Option<fn(&mut Node, &serde_json::Value)>,
}

/// Registry of available node types
///
/// Built by explicit registration; there is no runtime type discovery. An
/// unregistered tag default-constructs a bare node with no slots.
pub struct NodeTypeRegistry {
    types: IndexMap<String, NodeType>,
}

impl NodeTypeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            types: IndexMap::new(),
        }
    }

    /// A registry with the built-in node kinds registered
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(NodeType {
            tag: "output".into(),
            name: "Output".into(),
            factory: || {
                (
                    vec![InputProperty::new("background", "Background", ValueType::Color)],
                    vec![OutputProperty::new("output", "Output", ValueType::Color)],
                )
            },
            deserialize_additional_data: None,
        });
        registry.register(NodeType {
            tag: "merge".into(),
            name: "Merge".into(),
            factory: || {
                (
                    vec![
                        InputProperty::new("background", "Background", ValueType::Color),
                        InputProperty::new("foreground", "Foreground", ValueType::Color),
                    ],
                    vec![OutputProperty::new("output", "Output", ValueType::Color)],
                )
            },
            deserialize_additional_data: None,
        });
        registry.register(NodeType {
            tag: "blur".into(),
            name: "Blur".into(),
            factory: || {
                (
                    vec![
                        InputProperty::new("background", "Background", ValueType::Color),
                        InputProperty::new("radius", "Radius", ValueType::Float),
                    ],
                    vec![OutputProperty::new("output", "Output", ValueType::Color)],
                )
            },
            deserialize_additional_data: None,
        });
        registry.register(NodeType {
            tag: "constant".into(),
            name: "Constant".into(),
            factory: || (Vec::new(), vec![OutputProperty::new("value", "Value", ValueType::Float)]),
            // Reader nodes keep the referenced constant name in `data`
            deserialize_additional_data: Some(|node, data| {
                node.data = data.clone();
            }),
        });
        registry.register(NodeType {
            tag: "zone_start".into(),
            name: "Zone Start".into(),
            factory: || (Vec::new(), vec![OutputProperty::new("output", "Output", ValueType::Color)]),
            deserialize_additional_data: None,
        });
        registry.register(NodeType {
            tag: "zone_end".into(),
            name: "Zone End".into(),
            factory: || {
                (
                    vec![InputProperty::new("background", "Background", ValueType::Color)],
                    vec![OutputProperty::new("output", "Output", ValueType::Color)],
                )
            },
            deserialize_additional_data: None,
        });
        registry
    }

    /// Register a node type
    pub fn register(&mut self, node_type: NodeType) {
        self.types.insert(node_type.tag.clone(), node_type);
    }

    /// Get a node type by tag
    pub fn get(&self, tag: &str) -> Option<&NodeType> {
        self.types.get(tag)
    }

    /// Get all registered types
    pub fn types(&self) -> impl Iterator<Item = &NodeType> {
        self.types.values()
    }

    /// Construct a node for a tag under a caller-assigned ID
    ///
    /// Unregistered tags yield a bare node with no slots.
    pub fn create_node(&self, tag: &str, id: NodeId) -> Node {
        match self.get(tag) {
            Some(node_type) => {
                let (inputs, outputs) = (node_type.factory)();
                Node::new(id, tag, node_type.name.clone(), inputs, outputs)
            }
            None => Node::new(id, tag, tag.to_string(), Vec::new(), Vec::new()),
        }
    }
}

impl Default for NodeTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn registry_constructs_registered_layout() {
        let registry = NodeTypeRegistry::builtin();
        let node = registry.create_node("blur", NodeId::new());
        assert_eq!(node.inputs().len(), 2);
        assert_eq!(node.outputs().len(), 1);
        assert!(node.input("radius").is_some());
    }

    #[test]
    fn unregistered_tag_default_constructs() {
        let registry = NodeTypeRegistry::builtin();
        let node = registry.create_node("does_not_exist", NodeId::new());
        assert!(node.inputs().is_empty());
        assert!(node.outputs().is_empty());
        assert_eq!(node.type_tag, "does_not_exist");
    }

    #[test]
    fn clone_with_id_is_independent() {
        let registry = NodeTypeRegistry::builtin();
        let mut node = registry.create_node("blur", NodeId::new());
        node.input_mut("radius").unwrap().non_overriden_value = Value::Float(4.0);

        let copy_id = NodeId::new();
        let copy = node.clone_with_id(copy_id);
        assert_eq!(copy.id(), copy_id);
        assert_ne!(copy.id(), node.id());
        assert_eq!(
            copy.input("radius").unwrap().non_overriden_value,
            Value::Float(4.0)
        );
    }
}
