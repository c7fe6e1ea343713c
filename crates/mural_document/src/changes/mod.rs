// SPDX-License-Identifier: MIT OR Apache-2.0
//! The concrete change catalogue.
//!
//! These are the sole sanctioned mutation entry points for a document;
//! callers construct a change, hand it to the tracker, and consume the
//! resulting [`crate::ChangeInfo`] stream.

pub mod connect_properties;
pub mod create_node;
pub mod delete_node;
pub mod deserialize_data;
pub mod disconnect_property;
pub mod evaluate_graph;
pub mod node_operations;
pub mod node_position;
pub mod rename_node;
pub mod update_constant;
pub mod update_property_value;

pub use connect_properties::ConnectPropertiesChange;
pub use create_node::{CreateConstantChange, CreateNodeChange, CreateNodePairChange};
pub use delete_node::DeleteNodeChange;
pub use deserialize_data::ApplyDeserializedDataChange;
pub use disconnect_property::DisconnectPropertyChange;
pub use evaluate_graph::EvaluateGraphChange;
pub use node_operations::ConnectionsData;
pub use node_position::NodePositionChange;
pub use rename_node::RenameNodeChange;
pub use update_constant::UpdateConstantChange;
pub use update_property_value::UpdatePropertyValueChange;
