// SPDX-License-Identifier: MIT OR Apache-2.0
//! Typed values flowing through node properties.

use crate::expression::FuncExpression;
use serde::{Deserialize, Serialize};

/// Data type of a property slot or value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    /// Boolean value
    Bool,
    /// Integer value
    Int,
    /// Floating point value
    Float,
    /// 2D vector
    Vec2,
    /// Color (RGBA)
    Color,
    /// String value
    Text,
    /// Deferred computation evaluated through a [`crate::FuncContext`]
    Func,
}

/// Value stored in a property or graph constant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i32),
    /// Float
    Float(f32),
    /// 2D vector
    Vec2([f32; 2]),
    /// Color (RGBA)
    Color([f32; 4]),
    /// String
    Text(String),
    /// Deferred computation ("cross expression")
    Func(FuncExpression),
}

impl Value {
    /// Get the type of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Bool(_) => ValueType::Bool,
            Self::Int(_) => ValueType::Int,
            Self::Float(_) => ValueType::Float,
            Self::Vec2(_) => ValueType::Vec2,
            Self::Color(_) => ValueType::Color,
            Self::Text(_) => ValueType::Text,
            Self::Func(_) => ValueType::Func,
        }
    }

    /// A zero/empty default for a type, used for freshly created slots
    pub fn default_for(value_type: ValueType) -> Self {
        match value_type {
            ValueType::Bool => Self::Bool(false),
            ValueType::Int => Self::Int(0),
            ValueType::Float => Self::Float(0.0),
            ValueType::Vec2 => Self::Vec2([0.0, 0.0]),
            ValueType::Color => Self::Color([0.0, 0.0, 0.0, 1.0]),
            ValueType::Text => Self::Text(String::new()),
            ValueType::Func => Self::Func(FuncExpression::Constant(Box::new(Self::Float(0.0)))),
        }
    }
}
