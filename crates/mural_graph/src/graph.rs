// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure: node set, constants, connection adjacency, and
//! execution ordering.
//!
//! All operations here are structural. Validated, undoable mutation is
//! layered on top by the document crate; in particular [`NodeGraph::remove_node`]
//! never detaches connections on its own — node-removing changes must
//! detach first, or other edges would reference an absent node.

use crate::connection::Connection;
use crate::convert::ConversionTable;
use crate::node::{Node, NodeId};
use crate::property::PropertyHandle;
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A named, typed, graph-scoped mutable value
///
/// Read by dedicated constant-reader nodes that record the constant name
/// in their extra data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConstant {
    /// Name the readers reference
    pub name: String,
    /// Current value
    pub value: Value,
}

impl GraphConstant {
    /// Create a constant
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A node graph
///
/// Node iteration order is stable insertion order and carries no
/// execution meaning; scheduling comes from [`NodeGraph::execution_queue`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeGraph {
    nodes: IndexMap<NodeId, Node>,
    /// Edges keyed by input handle; one entry per connected input
    connections: IndexMap<PropertyHandle, Connection>,
    constants: IndexMap<String, GraphConstant>,
    output_node: Option<NodeId>,
}

impl NodeGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id();
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node, structural only
    ///
    /// Connections are untouched; callers detach first.
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        self.nodes.shift_remove(&node_id)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Check whether a node exists
    pub fn has_node(&self, node_id: NodeId) -> bool {
        self.nodes.contains_key(&node_id)
    }

    /// Get all nodes in stable insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The distinguished terminal node, if set
    pub fn output_node(&self) -> Option<NodeId> {
        self.output_node
    }

    /// Set or clear the terminal node
    pub fn set_output_node(&mut self, node_id: Option<NodeId>) {
        self.output_node = node_id;
    }

    /// Get a constant by name
    pub fn constant(&self, name: &str) -> Option<&GraphConstant> {
        self.constants.get(name)
    }

    /// Get a mutable constant by name
    pub fn constant_mut(&mut self, name: &str) -> Option<&mut GraphConstant> {
        self.constants.get_mut(name)
    }

    /// Insert a constant, returning any previous one under the same name
    pub fn add_constant(&mut self, constant: GraphConstant) -> Option<GraphConstant> {
        self.constants.insert(constant.name.clone(), constant)
    }

    /// Remove a constant by name
    pub fn remove_constant(&mut self, name: &str) -> Option<GraphConstant> {
        self.constants.shift_remove(name)
    }

    /// Get all constants
    pub fn constants(&self) -> impl Iterator<Item = &GraphConstant> {
        self.constants.values()
    }

    /// Connect an output slot to an input slot
    ///
    /// Validates existence, direction, and type compatibility. A prior
    /// edge at the input is replaced and returned; fan-in is impossible
    /// by construction. Cycles are *not* rejected here — change
    /// validation probes [`NodeGraph::would_form_cycle`] and
    /// [`NodeGraph::execution_queue`] reports cycles as a backstop.
    pub fn connect(
        &mut self,
        output: PropertyHandle,
        input: PropertyHandle,
        table: &ConversionTable,
    ) -> Result<Option<Connection>, ConnectionError> {
        let output_node = self
            .nodes
            .get(&output.node)
            .ok_or(ConnectionError::NodeNotFound(output.node))?;
        let input_node = self
            .nodes
            .get(&input.node)
            .ok_or(ConnectionError::NodeNotFound(input.node))?;

        let output_prop = output_node
            .output(&output.property)
            .ok_or_else(|| ConnectionError::PropertyNotFound(output.clone()))?;
        let input_prop = input_node
            .input(&input.property)
            .ok_or_else(|| ConnectionError::PropertyNotFound(input.clone()))?;

        if !table.can_convert(output_prop.value_type, input_prop.value_type) {
            return Err(ConnectionError::IncompatibleTypes {
                output: output.clone(),
                input: input.clone(),
            });
        }

        let replaced = self
            .connections
            .insert(input.clone(), Connection::new(output, input));
        Ok(replaced)
    }

    /// Remove the edge at an input slot
    pub fn disconnect(&mut self, input: &PropertyHandle) -> Option<Connection> {
        self.connections.shift_remove(input)
    }

    /// Re-insert a previously captured edge without re-validation
    ///
    /// Used by snapshot replay during revert, where the edge is known to
    /// have been valid when captured. Returns any edge it replaced.
    pub fn restore_connection(&mut self, connection: Connection) -> Option<Connection> {
        self.connections
            .insert(connection.input.clone(), connection)
    }

    /// The edge feeding an input slot, if any
    pub fn connection_to(&self, input: &PropertyHandle) -> Option<&Connection> {
        self.connections.get(input)
    }

    /// Edges fanning out from an output slot
    pub fn connections_from<'a>(
        &'a self,
        output: &'a PropertyHandle,
    ) -> impl Iterator<Item = &'a Connection> {
        self.connections.values().filter(move |c| c.output == *output)
    }

    /// Edges touching a node on either side
    pub fn connections_for_node(&self, node_id: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections
            .values()
            .filter(move |c| c.involves_node(node_id))
    }

    /// All edges
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Get the number of edges
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Check whether connecting `output_node` into `input_node` would
    /// close a loop
    ///
    /// True when they are the same node or `output_node` is reachable by
    /// walking forwards (downstream) from `input_node`.
    pub fn would_form_cycle(&self, output_node: NodeId, input_node: NodeId) -> bool {
        if output_node == input_node {
            return true;
        }
        let mut visited = HashSet::new();
        let mut stack = vec![input_node];
        while let Some(current) = stack.pop() {
            if current == output_node {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            for connection in self.connections.values() {
                if connection.output.node == current {
                    stack.push(connection.input.node);
                }
            }
        }
        false
    }

    /// Ordered node sequence needed to evaluate `end`
    ///
    /// Reverse topological order over `end`'s transitive input
    /// dependencies: every node appears only after all nodes whose output
    /// it consumes.
    pub fn execution_queue(&self, end: NodeId) -> Result<Vec<NodeId>, CycleError> {
        if !self.nodes.contains_key(&end) {
            return Ok(Vec::new());
        }
        let mut visited = HashSet::new();
        let mut in_progress = HashSet::new();
        let mut order = Vec::new();
        self.visit(end, &mut visited, &mut in_progress, &mut order)?;
        Ok(order)
    }

    fn visit(
        &self,
        node_id: NodeId,
        visited: &mut HashSet<NodeId>,
        in_progress: &mut HashSet<NodeId>,
        order: &mut Vec<NodeId>,
    ) -> Result<(), CycleError> {
        if visited.contains(&node_id) {
            return Ok(());
        }
        if !in_progress.insert(node_id) {
            return Err(CycleError);
        }

        let Some(node) = self.nodes.get(&node_id) else {
            // Dangling edge; skip rather than schedule a missing node
            in_progress.remove(&node_id);
            return Ok(());
        };
        for input in node.inputs() {
            let handle = PropertyHandle::new(node_id, input.internal_name.clone());
            if let Some(connection) = self.connections.get(&handle) {
                self.visit(connection.output.node, visited, in_progress, order)?;
            }
        }

        in_progress.remove(&node_id);
        visited.insert(node_id);
        order.push(node_id);
        Ok(())
    }
}

/// Error when creating a connection
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// Node not found
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Property not found on its node
    #[error("property not found: {0:?}")]
    PropertyNotFound(PropertyHandle),

    /// No conversion path between the slot types
    #[error("incompatible types between {output:?} and {input:?}")]
    IncompatibleTypes {
        /// The offending output slot
        output: PropertyHandle,
        /// The offending input slot
        input: PropertyHandle,
    },
}

/// Error when the dependency walk hits a cycle
#[derive(Debug, thiserror::Error)]
#[error("graph contains a cycle")]
pub struct CycleError;
