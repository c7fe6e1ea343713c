// SPDX-License-Identifier: MIT OR Apache-2.0
//! Forcing a synchronous pull evaluation.

use crate::change::{Applied, Change, ChangeResult};
use crate::document::Document;
use mural_graph::evaluation::{self, BasicEvaluator, NodeEvaluator, NodeOutputs, RenderContext};
use mural_graph::NodeId;
use std::any::Any;
use tracing::warn;

/// Evaluate the graph up to a node for immediate materialized results
///
/// Never enters the undo stack (`ignore_in_undo`) and does not alter
/// document state; the end node's outputs are stashed on the change for
/// the caller to take.
pub struct EvaluateGraphChange {
    end: Option<NodeId>,
    ctx: RenderContext,
    evaluator: Box<dyn NodeEvaluator>,
    resolved_end: Option<NodeId>,
    outputs: Option<NodeOutputs>,
}

impl EvaluateGraphChange {
    /// Evaluate up to `end`, or the graph's terminal output node when
    /// `None`
    pub fn new(end: Option<NodeId>, ctx: RenderContext) -> Self {
        Self::with_evaluator(end, ctx, Box::new(BasicEvaluator))
    }

    /// Evaluate with a caller-provided node executor
    pub fn with_evaluator(
        end: Option<NodeId>,
        ctx: RenderContext,
        evaluator: Box<dyn NodeEvaluator>,
    ) -> Self {
        Self {
            end,
            ctx,
            evaluator,
            resolved_end: None,
            outputs: None,
        }
    }

    /// Take the materialized outputs of the end node
    pub fn take_outputs(&mut self) -> Option<NodeOutputs> {
        self.outputs.take()
    }
}

impl Change for EvaluateGraphChange {
    fn description(&self) -> &str {
        "Evaluate graph"
    }

    fn initialize_and_validate(&mut self, target: &Document) -> bool {
        let Some(end) = self.end.or_else(|| target.graph().output_node()) else {
            return false;
        };
        if !target.has_node(end) {
            return false;
        }
        if target.graph().execution_queue(end).is_err() {
            return false;
        }
        self.resolved_end = Some(end);
        true
    }

    fn apply(&mut self, target: &mut Document, _first_apply: bool) -> Applied {
        let Some(end) = self.resolved_end else {
            panic!("apply of an evaluation that was never validated");
        };
        match evaluation::evaluate_graph(target.graph(), end, self.evaluator.as_ref(), &self.ctx)
        {
            Ok(outputs) => self.outputs = Some(outputs),
            Err(err) => {
                // Stale constant references and the like; the document is
                // untouched either way
                warn!(node = ?end, error = %err, "graph evaluation failed");
                self.outputs = None;
            }
        }
        Applied::ignored(ChangeResult::None)
    }

    fn revert(&mut self, _target: &mut Document) -> ChangeResult {
        panic!("revert called on a non-undoable evaluation change");
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
