// SPDX-License-Identifier: MIT OR Apache-2.0
//! Best-effort value conversion between heterogeneous property types.
//!
//! Conversions are registered one direction at a time and are deliberately
//! lossy: a color collapses to its red channel, a vector to its x
//! component. The reverse direction is only available where it is
//! registered. Callers must not assume round-trip fidelity.

use crate::expression::FuncContext;
use crate::value::{Value, ValueType};
use indexmap::IndexMap;
use std::sync::OnceLock;

/// Converter from one concrete value to another
type Converter = fn(&Value) -> Option<Value>;

/// Directional registry of value conversions
pub struct ConversionTable {
    entries: IndexMap<(ValueType, ValueType), Converter>,
}

impl ConversionTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// The process-wide table with all built-in conversions registered
    pub fn builtin() -> &'static Self {
        static TABLE: OnceLock<ConversionTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            let mut table = Self::new();
            table.register(ValueType::Int, ValueType::Float, |v| match v {
                Value::Int(i) => Some(Value::Float(*i as f32)),
                _ => None,
            });
            table.register(ValueType::Float, ValueType::Int, |v| match v {
                Value::Float(f) => Some(Value::Int(*f as i32)),
                _ => None,
            });
            table.register(ValueType::Int, ValueType::Bool, |v| match v {
                Value::Int(i) => Some(Value::Bool(*i != 0)),
                _ => None,
            });
            table.register(ValueType::Bool, ValueType::Int, |v| match v {
                Value::Bool(b) => Some(Value::Int(i32::from(*b))),
                _ => None,
            });
            // Lossy by design: keeps the red channel, reverse is unregistered
            table.register(ValueType::Color, ValueType::Float, |v| match v {
                Value::Color(c) => Some(Value::Float(c[0])),
                _ => None,
            });
            table.register(ValueType::Float, ValueType::Vec2, |v| match v {
                Value::Float(f) => Some(Value::Vec2([*f, *f])),
                _ => None,
            });
            table.register(ValueType::Vec2, ValueType::Float, |v| match v {
                Value::Vec2(xy) => Some(Value::Float(xy[0])),
                _ => None,
            });
            table
        })
    }

    /// Register a directional conversion
    pub fn register(&mut self, from: ValueType, to: ValueType, converter: Converter) {
        self.entries.insert((from, to), converter);
    }

    /// Check whether a value of `from` can feed a slot of `to`
    ///
    /// True for identical types, for registered conversions, and for
    /// func-typed targets, which accept any source without eager
    /// conversion.
    pub fn can_convert(&self, from: ValueType, to: ValueType) -> bool {
        if from == to || to == ValueType::Func {
            return true;
        }
        self.entries.contains_key(&(from, to))
    }

    /// Convert `value` to `target`, returning `None` on mismatch
    ///
    /// A func expression feeding a non-func target is first evaluated with
    /// a neutral context, then conversion is retried on the result.
    pub fn try_convert(&self, value: &Value, target: ValueType) -> Option<Value> {
        if let Value::Func(expr) = value {
            if target != ValueType::Func {
                let evaluated = expr.evaluate(&FuncContext::neutral());
                if evaluated.value_type() == ValueType::Func {
                    return None;
                }
                return self.try_convert(&evaluated, target);
            }
        }

        let from = value.value_type();
        if from == target {
            return Some(value.clone());
        }
        if target == ValueType::Func {
            // Lift the constant into expression position, evaluated lazily
            return Some(Value::Func(crate::expression::FuncExpression::Constant(
                Box::new(value.clone()),
            )));
        }
        self.entries.get(&(from, target)).and_then(|conv| conv(value))
    }
}

impl Default for ConversionTable {
    fn default() -> Self {
        Self::new()
    }
}
