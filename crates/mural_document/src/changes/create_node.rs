// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node and constant creation changes.

use crate::change::{Applied, Change, ChangeResult};
use crate::change_info::ChangeInfo;
use crate::document::Document;
use mural_graph::{ConversionTable, GraphConstant, NodeId, PropertyHandle, Value};
use std::any::Any;

/// Create one node from a registered (or unregistered) type tag
#[derive(Debug)]
pub struct CreateNodeChange {
    id: NodeId,
    type_tag: String,
    position: [f32; 2],
    description: String,
}

impl CreateNodeChange {
    /// Create with a freshly allocated ID
    pub fn new(type_tag: impl Into<String>, position: [f32; 2]) -> Self {
        Self::with_id(NodeId::new(), type_tag, position)
    }

    /// Create accepting a caller-assigned ID (e.g. cross-document import)
    pub fn with_id(id: NodeId, type_tag: impl Into<String>, position: [f32; 2]) -> Self {
        let type_tag = type_tag.into();
        Self {
            id,
            description: format!("Create {type_tag} node"),
            type_tag,
            position,
        }
    }

    /// The ID the node will be created under
    pub fn node_id(&self) -> NodeId {
        self.id
    }
}

impl Change for CreateNodeChange {
    fn description(&self) -> &str {
        &self.description
    }

    fn initialize_and_validate(&mut self, target: &Document) -> bool {
        !target.has_node(self.id)
    }

    fn apply(&mut self, target: &mut Document, _first_apply: bool) -> Applied {
        let mut node = target.registry().create_node(&self.type_tag, self.id);
        node.position = self.position;
        let info = ChangeInfo::node_created(&node);
        target.graph_mut().add_node(node);
        Applied::undoable(ChangeResult::One(info))
    }

    fn revert(&mut self, target: &mut Document) -> ChangeResult {
        // Safe without detaching: a freshly created node only gains edges
        // through later changes, which revert before this one
        target.graph_mut().remove_node(self.id);
        ChangeResult::One(ChangeInfo::NodeDeleted { id: self.id })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Create a linked zone start/end pair in one undo entry
///
/// The second creation info references the first through the connection
/// info that follows both; observers process the list in order.
#[derive(Debug)]
pub struct CreateNodePairChange {
    start_id: NodeId,
    end_id: NodeId,
    position: [f32; 2],
}

impl CreateNodePairChange {
    /// Create with freshly allocated IDs
    pub fn new(position: [f32; 2]) -> Self {
        Self {
            start_id: NodeId::new(),
            end_id: NodeId::new(),
            position,
        }
    }

    /// The IDs the pair will be created under, start then end
    pub fn node_ids(&self) -> (NodeId, NodeId) {
        (self.start_id, self.end_id)
    }
}

impl Change for CreateNodePairChange {
    fn description(&self) -> &str {
        "Create zone pair"
    }

    fn initialize_and_validate(&mut self, target: &Document) -> bool {
        !target.has_node(self.start_id) && !target.has_node(self.end_id)
    }

    fn apply(&mut self, target: &mut Document, _first_apply: bool) -> Applied {
        let registry = target.registry();
        let mut start = registry.create_node("zone_start", self.start_id);
        let mut end = registry.create_node("zone_end", self.end_id);
        start.position = self.position;
        end.position = [self.position[0] + 200.0, self.position[1]];

        let mut infos = vec![ChangeInfo::node_created(&start), ChangeInfo::node_created(&end)];

        let graph = target.graph_mut();
        graph.add_node(start);
        graph.add_node(end);

        let output = PropertyHandle::new(self.start_id, "output");
        let input = PropertyHandle::new(self.end_id, "background");
        if graph
            .connect(output.clone(), input.clone(), ConversionTable::builtin())
            .is_ok()
        {
            infos.push(ChangeInfo::PropertiesConnected { output, input });
        }

        Applied::undoable(ChangeResult::Many(infos))
    }

    fn revert(&mut self, target: &mut Document) -> ChangeResult {
        let graph = target.graph_mut();
        let input = PropertyHandle::new(self.end_id, "background");
        let mut infos = Vec::new();
        if graph.disconnect(&input).is_some() {
            infos.push(ChangeInfo::PropertyDisconnected { input });
        }
        graph.remove_node(self.end_id);
        infos.push(ChangeInfo::NodeDeleted { id: self.end_id });
        graph.remove_node(self.start_id);
        infos.push(ChangeInfo::NodeDeleted { id: self.start_id });
        ChangeResult::Many(infos)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Create a graph constant together with a reader node for it
#[derive(Debug)]
pub struct CreateConstantChange {
    name: String,
    value: Value,
    node_id: NodeId,
    position: [f32; 2],
    description: String,
}

impl CreateConstantChange {
    /// Create a constant plus reader at a position
    pub fn new(name: impl Into<String>, value: Value, position: [f32; 2]) -> Self {
        let name = name.into();
        Self {
            description: format!("Create constant '{name}'"),
            name,
            value,
            node_id: NodeId::new(),
            position,
        }
    }

    /// The ID the reader node will be created under
    pub fn node_id(&self) -> NodeId {
        self.node_id
    }
}

impl Change for CreateConstantChange {
    fn description(&self) -> &str {
        &self.description
    }

    fn initialize_and_validate(&mut self, target: &Document) -> bool {
        target.graph().constant(&self.name).is_none() && !target.has_node(self.node_id)
    }

    fn apply(&mut self, target: &mut Document, _first_apply: bool) -> Applied {
        let mut reader = target.registry().create_node("constant", self.node_id);
        reader.position = self.position;
        reader.display_name = self.name.clone();
        reader.data = serde_json::json!({ "constant": self.name });

        let mut infos = vec![ChangeInfo::ConstantCreated {
            name: self.name.clone(),
            value: self.value.clone(),
        }];
        infos.push(ChangeInfo::node_created(&reader));

        let graph = target.graph_mut();
        graph.add_constant(GraphConstant::new(self.name.clone(), self.value.clone()));
        graph.add_node(reader);

        Applied::undoable(ChangeResult::Many(infos))
    }

    fn revert(&mut self, target: &mut Document) -> ChangeResult {
        let graph = target.graph_mut();
        graph.remove_node(self.node_id);
        graph.remove_constant(&self.name);
        ChangeResult::Many(vec![
            ChangeInfo::NodeDeleted { id: self.node_id },
            ChangeInfo::ConstantDeleted {
                name: self.name.clone(),
            },
        ])
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

    #[test]
    fn create_then_revert_restores_node_count() {
        let mut document = Document::new();
        let mut change = CreateNodeChange::new("blur", [10.0, 20.0]);
        let id = change.node_id();

        assert!(change.initialize_and_validate(&document));
        let applied = change.apply(&mut document, true);
        assert!(!applied.ignore_in_undo);
        assert!(document.has_node(id));
        assert_eq!(document.node_count(), 1);

        change.revert(&mut document);
        assert!(!document.has_node(id));
        assert_eq!(document.node_count(), 0);
    }

    #[test]
    fn duplicate_id_fails_validation() {
        let mut document = Document::new();
        let mut first = CreateNodeChange::new("blur", [0.0, 0.0]);
        assert!(first.initialize_and_validate(&document));
        first.apply(&mut document, true);

        let mut second = CreateNodeChange::with_id(first.node_id(), "merge", [0.0, 0.0]);
        assert!(!second.initialize_and_validate(&document));
    }

    #[test]
    fn pair_creates_connected_nodes_and_reverts_both() {
        let mut document = Document::new();
        let mut change = CreateNodePairChange::new([0.0, 0.0]);
        let (start, end) = change.node_ids();

        assert!(change.initialize_and_validate(&document));
        let applied = change.apply(&mut document, true);
        let infos = applied.info.into_infos();
        assert_eq!(infos.len(), 3);
        assert!(matches!(infos[2], ChangeInfo::PropertiesConnected { .. }));
        assert!(document
            .graph()
            .connection_to(&PropertyHandle::new(end, "background"))
            .is_some());

        change.revert(&mut document);
        assert!(!document.has_node(start));
        assert!(!document.has_node(end));
        assert_eq!(document.graph().connection_count(), 0);
    }

    #[test]
    fn constant_and_reader_created_in_order() {
        let mut document = Document::new();
        let mut change = CreateConstantChange::new("exposure", Value::Float(1.0), [0.0, 0.0]);
        assert!(change.initialize_and_validate(&document));

        let infos = change.apply(&mut document, true).info.into_infos();
        assert!(matches!(infos[0], ChangeInfo::ConstantCreated { .. }));
        assert!(matches!(infos[1], ChangeInfo::NodeCreated { .. }));
        assert!(document.graph().constant("exposure").is_some());

        change.revert(&mut document);
        assert!(document.graph().constant("exposure").is_none());
        assert_eq!(document.node_count(), 0);
    }
}
