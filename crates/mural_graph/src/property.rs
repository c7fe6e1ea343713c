// SPDX-License-Identifier: MIT OR Apache-2.0
//! Property slot definitions for node inputs/outputs.

use crate::node::NodeId;
use crate::value::{Value, ValueType};
use serde::{Deserialize, Serialize};

/// Stable address of a property slot on a node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyHandle {
    /// The owning node
    pub node: NodeId,
    /// Internal property name, unique within its direction on the node
    pub property: String,
}

impl PropertyHandle {
    /// Create a handle for a property on a node
    pub fn new(node: NodeId, property: impl Into<String>) -> Self {
        Self {
            node,
            property: property.into(),
        }
    }
}

/// An input slot on a node
///
/// Holds the constant used while unconnected; the inbound edge itself
/// lives in the graph's adjacency map, keyed by this slot's handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputProperty {
    /// Internal name, stable across renames
    pub internal_name: String,
    /// Display name shown to the user
    pub display_name: String,
    /// Fixed type of this slot
    pub value_type: ValueType,
    /// Constant used when no connection overrides it
    pub non_overriden_value: Value,
}

impl InputProperty {
    /// Create an input slot with the type's default constant
    pub fn new(internal_name: impl Into<String>, display_name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            internal_name: internal_name.into(),
            display_name: display_name.into(),
            value_type,
            non_overriden_value: Value::default_for(value_type),
        }
    }

    /// Set the unconnected constant
    pub fn with_value(mut self, value: Value) -> Self {
        self.non_overriden_value = value;
        self
    }
}

/// An output slot on a node
///
/// Outputs fan out to any number of inputs; the edges live in the graph's
/// adjacency map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputProperty {
    /// Internal name, stable across renames
    pub internal_name: String,
    /// Display name shown to the user
    pub display_name: String,
    /// Fixed type of this slot
    pub value_type: ValueType,
}

impl OutputProperty {
    /// Create an output slot
    pub fn new(internal_name: impl Into<String>, display_name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            internal_name: internal_name.into(),
            display_name: display_name.into(),
            value_type,
        }
    }
}
