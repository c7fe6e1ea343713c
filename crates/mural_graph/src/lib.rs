// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node graph data model for Mural.
//!
//! This crate provides the graph side of the document engine:
//! - Typed values and a directional, best-effort conversion table
//! - Input/output property slots with connection rules
//! - Nodes with ordered properties and sparse keyframe tracks
//! - The [`NodeGraph`] itself: node set, graph constants, connection
//!   adjacency, and execution ordering
//! - Pull evaluation over the execution queue
//!
//! Mutation of a live document never goes through this crate directly;
//! the `mural_document` crate wraps every mutation in an undoable change.

pub mod connection;
pub mod convert;
pub mod evaluation;
pub mod expression;
pub mod graph;
pub mod keyframe;
pub mod node;
pub mod property;
pub mod value;

pub use connection::Connection;
pub use convert::ConversionTable;
pub use expression::{FuncContext, FuncExpression};
pub use graph::{ConnectionError, CycleError, GraphConstant, NodeGraph};
pub use node::{Node, NodeId, NodeType, NodeTypeRegistry};
pub use property::{InputProperty, OutputProperty, PropertyHandle};
pub use value::{Value, ValueType};
