// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pull evaluation over the execution queue.

use crate::convert::ConversionTable;
use crate::expression::FuncContext;
use crate::graph::{CycleError, NodeGraph};
use crate::node::{Node, NodeId};
use crate::property::PropertyHandle;
use crate::value::Value;
use std::collections::HashMap;

/// Opaque render context passed into node execution
///
/// This subsystem does not interpret it beyond deriving a [`FuncContext`]
/// for expression-valued inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
    /// Frame time in seconds
    pub frame_time: f32,
    /// Evaluation resolution
    pub resolution: [f32; 2],
    /// Target surface size in pixels
    pub target_size: [u32; 2],
}

impl RenderContext {
    /// The expression context for this render pass
    pub fn func_context(&self) -> FuncContext {
        FuncContext {
            frame_time: self.frame_time,
            resolution: self.resolution,
        }
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            frame_time: 0.0,
            resolution: [1.0, 1.0],
            target_size: [1, 1],
        }
    }
}

/// Output values of one node, keyed by output slot name
pub type NodeOutputs = HashMap<String, Value>;

/// Trait for executing individual nodes
pub trait NodeEvaluator {
    /// Produce a node's outputs from its resolved input values
    fn evaluate(
        &self,
        graph: &NodeGraph,
        node: &Node,
        inputs: &NodeOutputs,
        ctx: &RenderContext,
    ) -> Result<NodeOutputs, EvaluationError>;
}

/// Table-free evaluator covering the built-in node kinds
///
/// Pass-through kinds forward their background input; constant readers
/// resolve the graph constant named in their extra data. Unknown kinds
/// produce no outputs.
#[derive(Debug, Default)]
pub struct BasicEvaluator;

impl NodeEvaluator for BasicEvaluator {
    fn evaluate(
        &self,
        graph: &NodeGraph,
        node: &Node,
        inputs: &NodeOutputs,
        ctx: &RenderContext,
    ) -> Result<NodeOutputs, EvaluationError> {
        let mut outputs = NodeOutputs::new();
        match node.type_tag.as_str() {
            "constant" => {
                let name = node
                    .data
                    .get("constant")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| EvaluationError::MissingConstant(node.id()))?;
                let constant = graph
                    .constant(name)
                    .ok_or_else(|| EvaluationError::MissingConstant(node.id()))?;
                outputs.insert("value".to_string(), constant.value.clone());
            }
            "output" | "merge" | "blur" | "zone_end" => {
                if let Some(background) = inputs.get("background") {
                    let resolved = match background {
                        Value::Func(expr) => expr.evaluate(&ctx.func_context()),
                        other => other.clone(),
                    };
                    outputs.insert("output".to_string(), resolved);
                }
            }
            _ => {}
        }
        Ok(outputs)
    }
}

/// Evaluate the graph up to `end`, returning that node's outputs
///
/// Each node in the execution queue receives its connected upstream
/// values, falling back to each input's unconnected constant. The
/// document is untouched; results are materialized into the returned map.
pub fn evaluate_graph(
    graph: &NodeGraph,
    end: NodeId,
    evaluator: &dyn NodeEvaluator,
    ctx: &RenderContext,
) -> Result<NodeOutputs, EvaluationError> {
    let queue = graph.execution_queue(end)?;
    let mut cache: HashMap<NodeId, NodeOutputs> = HashMap::new();
    let table = ConversionTable::builtin();

    for node_id in &queue {
        let node = graph
            .node(*node_id)
            .ok_or(EvaluationError::NodeNotFound(*node_id))?;

        let mut inputs = NodeOutputs::new();
        for input in node.inputs() {
            let handle = PropertyHandle::new(*node_id, input.internal_name.clone());
            let value = match graph.connection_to(&handle) {
                Some(connection) => cache
                    .get(&connection.output.node)
                    .and_then(|outputs| outputs.get(&connection.output.property))
                    .and_then(|v| table.try_convert(v, input.value_type))
                    .unwrap_or_else(|| input.non_overriden_value.clone()),
                None => input.non_overriden_value.clone(),
            };
            inputs.insert(input.internal_name.clone(), value);
        }

        let outputs = evaluator.evaluate(graph, node, &inputs, ctx)?;
        cache.insert(*node_id, outputs);
    }

    Ok(cache.remove(&end).unwrap_or_default())
}

/// Error during evaluation
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    /// Graph contains a cycle
    #[error(transparent)]
    Cycle(#[from] CycleError),

    /// Node not found
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Constant reader without a resolvable constant
    #[error("constant reader {0:?} references a missing constant")]
    MissingConstant(NodeId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphConstant;
    use crate::node::NodeTypeRegistry;

    #[test]
    fn constant_feeds_passthrough_chain() {
        let registry = NodeTypeRegistry::builtin();
        let mut graph = NodeGraph::new();
        graph.add_constant(GraphConstant::new("exposure", Value::Float(0.8)));

        let mut reader = registry.create_node("constant", NodeId::new());
        reader.data = serde_json::json!({ "constant": "exposure" });
        let reader_id = graph.add_node(reader);

        let blur_id = graph.add_node(registry.create_node("blur", NodeId::new()));
        let out_id = graph.add_node(registry.create_node("output", NodeId::new()));
        let table = ConversionTable::builtin();

        // Float constant into the blur radius, color chain into the output
        graph
            .connect(
                PropertyHandle::new(reader_id, "value"),
                PropertyHandle::new(blur_id, "radius"),
                table,
            )
            .unwrap();
        graph
            .connect(
                PropertyHandle::new(blur_id, "output"),
                PropertyHandle::new(out_id, "background"),
                table,
            )
            .unwrap();

        let outputs =
            evaluate_graph(&graph, out_id, &BasicEvaluator, &RenderContext::default()).unwrap();
        // The default background color flows through blur into output
        assert_eq!(
            outputs.get("output"),
            Some(&Value::Color([0.0, 0.0, 0.0, 1.0]))
        );
    }

    #[test]
    fn unconnected_inputs_use_their_constant() {
        let registry = NodeTypeRegistry::builtin();
        let mut graph = NodeGraph::new();
        let mut node = registry.create_node("output", NodeId::new());
        if let Some(input) = node.input_mut("background") {
            input.non_overriden_value = Value::Color([1.0, 0.0, 0.0, 1.0]);
        }
        let id = graph.add_node(node);

        let outputs =
            evaluate_graph(&graph, id, &BasicEvaluator, &RenderContext::default()).unwrap();
        assert_eq!(outputs.get("output"), Some(&Value::Color([1.0, 0.0, 0.0, 1.0])));
    }

    #[test]
    fn func_input_resolves_through_render_context() {
        let registry = NodeTypeRegistry::builtin();
        let mut graph = NodeGraph::new();
        let mut node = registry.create_node("output", NodeId::new());
        if let Some(input) = node.input_mut("background") {
            input.non_overriden_value =
                Value::Func(crate::expression::FuncExpression::Constant(Box::new(
                    Value::Color([0.0, 1.0, 0.0, 1.0]),
                )));
        }
        let id = graph.add_node(node);

        let outputs =
            evaluate_graph(&graph, id, &BasicEvaluator, &RenderContext::default()).unwrap();
        assert_eq!(outputs.get("output"), Some(&Value::Color([0.0, 1.0, 0.0, 1.0])));
    }
}
