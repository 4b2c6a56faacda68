//! The attribute operator algebra.
//!
//! Directives modify attributes through three operators. `merge_values`
//! implements the full current-value × incoming-value table; entities layer
//! their per-field validation on top of it.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CoreError, CoreResult};
use crate::value::Value;

/// An attribute operator.
///
/// The textual forms fold: `=` is `Assign`, `+=` and `+` are `AddMerge`,
/// `-=` and `-` are `SubRemove`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    /// Replace the current value.
    Assign,
    /// Add numbers, concatenate strings, append to lists, update maps.
    AddMerge,
    /// Subtract numbers, remove list elements, delete map keys.
    SubRemove,
}

impl Op {
    /// Parse an operator token from directive text.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "=" => Some(Self::Assign),
            "+=" | "+" => Some(Self::AddMerge),
            "-=" | "-" => Some(Self::SubRemove),
            _ => None,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assign => f.write_str("="),
            Self::AddMerge => f.write_str("+="),
            Self::SubRemove => f.write_str("-="),
        }
    }
}

/// Apply `op` to `current` with `incoming`, returning the replacement
/// value, or `None` when the attribute should stay untouched.
///
/// A stored `Null` counts as missing. `key` is only used in diagnostics.
pub fn merge_values(
    key: &str,
    current: Option<&Value>,
    op: Op,
    incoming: &Value,
) -> CoreResult<Option<Value>> {
    let current = current.filter(|v| !v.is_null());
    match op {
        Op::Assign => Ok(Some(incoming.clone())),
        Op::AddMerge => add_merge(key, current, incoming),
        Op::SubRemove => sub_remove(key, current, incoming),
    }
}

fn unsupported(key: &str, op: Op, current: Option<&Value>, incoming: &Value) -> CoreError {
    CoreError::UnsupportedOp {
        key: key.to_string(),
        op,
        current: current.map_or("nothing", Value::type_name),
        incoming: incoming.type_name(),
    }
}

fn add_merge(key: &str, current: Option<&Value>, incoming: &Value) -> CoreResult<Option<Value>> {
    let Some(current) = current else {
        // First write through `+=`: lists and strings start as themselves,
        // anything else starts a singleton list.
        let seeded = match incoming {
            Value::List(_) | Value::Str(_) => incoming.clone(),
            other => Value::List(vec![other.clone()]),
        };
        return Ok(Some(seeded));
    };

    match (current, incoming) {
        (Value::Int(a), Value::Int(b)) => Ok(Some(Value::Int(a + b))),
        (Value::Int(a), Value::Float(b)) => Ok(Some(Value::Float(*a as f64 + b))),
        (Value::Float(a), Value::Int(b)) => Ok(Some(Value::Float(a + *b as f64))),
        (Value::Float(a), Value::Float(b)) => Ok(Some(Value::Float(a + b))),
        (Value::Str(a), Value::Str(b)) => Ok(Some(Value::Str(format!("{a}{b}")))),
        (Value::List(items), _) => {
            let mut merged = items.clone();
            let mut changed = false;
            for element in incoming_elements(incoming) {
                if !merged.contains(element) {
                    merged.push(element.clone());
                    changed = true;
                }
            }
            Ok(changed.then_some(Value::List(merged)))
        }
        (Value::Map(entries), Value::Map(updates)) => {
            let mut merged = entries.clone();
            let mut changed = false;
            for (k, v) in updates {
                if merged.get(k) != Some(v) {
                    merged.insert(k.clone(), v.clone());
                    changed = true;
                }
            }
            Ok(changed.then_some(Value::Map(merged)))
        }
        _ => Err(unsupported(key, Op::AddMerge, Some(current), incoming)),
    }
}

fn sub_remove(key: &str, current: Option<&Value>, incoming: &Value) -> CoreResult<Option<Value>> {
    let Some(current) = current else {
        warn!(key, "ignoring {} on a missing attribute", Op::SubRemove);
        return Ok(None);
    };

    match (current, incoming) {
        (Value::Int(a), Value::Int(b)) => Ok(Some(Value::Int(a - b))),
        (Value::Int(a), Value::Float(b)) => Ok(Some(Value::Float(*a as f64 - b))),
        (Value::Float(a), Value::Int(b)) => Ok(Some(Value::Float(a - *b as f64))),
        (Value::Float(a), Value::Float(b)) => Ok(Some(Value::Float(a - b))),
        (Value::List(items), _) => {
            let mut remaining = items.clone();
            let mut changed = false;
            for element in incoming_elements(incoming) {
                if let Some(pos) = remaining.iter().position(|v| v == element) {
                    remaining.remove(pos);
                    changed = true;
                }
            }
            Ok(changed.then_some(Value::List(remaining)))
        }
        (Value::Map(entries), _) => {
            let keys = removal_keys(key, incoming)?;
            let mut pruned = entries.clone();
            let mut changed = false;
            for k in keys {
                if pruned.remove(k).is_some() {
                    changed = true;
                }
            }
            Ok(changed.then_some(Value::Map(pruned)))
        }
        _ => Err(unsupported(key, Op::SubRemove, Some(current), incoming)),
    }
}

/// A list operand applies element-wise; anything else applies as a single
/// element.
fn incoming_elements(incoming: &Value) -> impl Iterator<Item = &Value> {
    match incoming {
        Value::List(items) => items.iter(),
        single => std::slice::from_ref(single).iter(),
    }
}

/// Map removal takes a key name or a list of key names.
fn removal_keys<'a>(key: &str, incoming: &'a Value) -> CoreResult<Vec<&'a str>> {
    match incoming {
        Value::Str(s) => Ok(vec![s.as_str()]),
        Value::List(items) => items
            .iter()
            .map(|v| match v {
                Value::Str(s) => Ok(s.as_str()),
                other => Err(CoreError::WrongShape {
                    key: key.to_string(),
                    expected: "a key name or list of key names",
                    found: other.type_name(),
                }),
            })
            .collect(),
        other => Err(CoreError::WrongShape {
            key: key.to_string(),
            expected: "a key name or list of key names",
            found: other.type_name(),
        }),
    }
}
