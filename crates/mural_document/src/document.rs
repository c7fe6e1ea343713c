// SPDX-License-Identifier: MIT OR Apache-2.0
//! Document: the sole owner of one node graph.

use mural_graph::{Node, NodeGraph, NodeId, NodeTypeRegistry};

/// Error from document lookups
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Node not found
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Node kind has no deserialization hook
    #[error("node {0:?} has no additional-data hook")]
    NoAdditionalDataHook(NodeId),
}

/// A document owning one node graph and the registry its nodes are
/// constructed from
///
/// Direct field writes are not exposed; changes in this crate are the
/// sanctioned mutation entry points.
pub struct Document {
    graph: NodeGraph,
    registry: NodeTypeRegistry,
}

impl Document {
    /// Create an empty document backed by the built-in node registry
    pub fn new() -> Self {
        Self::with_registry(NodeTypeRegistry::builtin())
    }

    /// Create an empty document with a custom node registry
    pub fn with_registry(registry: NodeTypeRegistry) -> Self {
        Self {
            graph: NodeGraph::new(),
            registry,
        }
    }

    /// Read access to the graph
    pub fn graph(&self) -> &NodeGraph {
        &self.graph
    }

    /// Mutable graph access, restricted to the change implementations
    pub(crate) fn graph_mut(&mut self) -> &mut NodeGraph {
        &mut self.graph
    }

    /// The node type registry
    pub fn registry(&self) -> &NodeTypeRegistry {
        &self.registry
    }

    /// Find a node, `None` when absent
    pub fn find_node(&self, id: NodeId) -> Option<&Node> {
        self.graph.node(id)
    }

    /// Find a node or report it missing
    pub fn find_node_or_err(&self, id: NodeId) -> Result<&Node, DocumentError> {
        self.graph.node(id).ok_or(DocumentError::NodeNotFound(id))
    }

    /// Check whether a node exists
    pub fn has_node(&self, id: NodeId) -> bool {
        self.graph.has_node(id)
    }

    /// Number of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Late-bound hook restoring node-kind-specific extra state after
    /// generic property load
    ///
    /// Never part of an undoable change and has no revert. Kinds without
    /// a registered hook keep the raw data on the node.
    pub fn apply_additional_data(
        &mut self,
        id: NodeId,
        data: &serde_json::Value,
    ) -> Result<(), DocumentError> {
        let hook = self
            .graph
            .node(id)
            .ok_or(DocumentError::NodeNotFound(id))
            .map(|node| {
                self.registry
                    .get(&node.type_tag)
                    .and_then(|t| t.deserialize_additional_data)
            })?;
        let node = self
            .graph
            .node_mut(id)
            .ok_or(DocumentError::NodeNotFound(id))?;
        match hook {
            Some(hook) => hook(node, data),
            None => node.data = data.clone(),
        }
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
