// SPDX-License-Identifier: MIT OR Apache-2.0
//! Deferred "func" expressions and the context they evaluate through.
//!
//! Func-typed property slots hold a computation instead of a plain value.
//! The computation is an explicit tagged expression rather than an opaque
//! closure, so changes can capture and restore it like any other value.

use crate::value::Value;
use serde::{Deserialize, Serialize};

/// A deferred computation stored in a func-typed slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FuncExpression {
    /// A constant lifted into expression position
    Constant(Box<Value>),
    /// The frame time of the evaluation context
    FrameTime,
    /// The resolution of the evaluation context as a 2D vector
    Resolution,
}

impl FuncExpression {
    /// Evaluate the expression against a context
    pub fn evaluate(&self, ctx: &FuncContext) -> Value {
        match self {
            Self::Constant(value) => (**value).clone(),
            Self::FrameTime => Value::Float(ctx.frame_time),
            Self::Resolution => Value::Vec2(ctx.resolution),
        }
    }

    /// The constant behind this expression, if it wraps one
    pub fn constant(&self) -> Option<&Value> {
        match self {
            Self::Constant(value) => Some(value),
            _ => None,
        }
    }
}

/// Context a [`FuncExpression`] evaluates against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuncContext {
    /// Frame time in seconds
    pub frame_time: f32,
    /// Evaluation resolution
    pub resolution: [f32; 2],
}

impl FuncContext {
    /// A neutral context for callers that only need the constant part of
    /// an expression (e.g. value conversion)
    pub fn neutral() -> Self {
        Self {
            frame_time: 0.0,
            resolution: [1.0, 1.0],
        }
    }
}

impl Default for FuncContext {
    fn default() -> Self {
        Self::neutral()
    }
}
