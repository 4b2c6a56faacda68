use std::fmt;

use serde::{Deserialize, Serialize};

use weave_core::{Params, TypedID};

/// How an atomic operation touches the graph. The discriminant order is
/// the execution priority: creations land before patches so placeholders
/// exist when referenced, and containment cleanups land before deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OpMethod {
    /// Insert (or resurrect) an entity.
    Create,
    /// Apply attribute operations to a live entity.
    Patch,
    /// Soft-delete an entity.
    Delete,
}

impl OpMethod {
    /// Execution priority; lower runs earlier.
    pub fn priority(self) -> u8 {
        match self {
            Self::Create => 0,
            Self::Patch => 1,
            Self::Delete => 2,
        }
    }
}

impl fmt::Display for OpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("Create"),
            Self::Patch => f.write_str("Patch"),
            Self::Delete => f.write_str("Delete"),
        }
    }
}

/// One atomic mutation of the entity graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomicOp {
    /// What to do.
    pub method: OpMethod,
    /// The entity to do it to.
    pub target: TypedID,
    /// Ordered attribute operations; `None` for attribute-less ops.
    pub attrs: Option<Params>,
}

impl AtomicOp {
    /// A Create op carrying initial attributes (omitted when empty).
    pub fn create(target: TypedID, attrs: Params) -> Self {
        Self {
            method: OpMethod::Create,
            target,
            attrs: if attrs.is_empty() { None } else { Some(attrs) },
        }
    }

    /// A Patch op.
    pub fn patch(target: TypedID, attrs: Params) -> Self {
        Self {
            method: OpMethod::Patch,
            target,
            attrs: Some(attrs),
        }
    }

    /// A Delete op.
    pub fn delete(target: TypedID) -> Self {
        Self {
            method: OpMethod::Delete,
            target,
            attrs: None,
        }
    }
}

impl fmt::Display for AtomicOp {
    /// Spells the op the way a host log wants to read it, e.g.
    /// `Patch Place:start (contents+=Character:hero)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.target)?;
        if let Some(attrs) = &self.attrs {
            let parts: Vec<String> = attrs
                .iter()
                .map(|(key, (op, value))| format!("{key}{op}{value}"))
                .collect();
            write!(f, " ({})", parts.join(", "))?;
        }
        Ok(())
    }
}

/// Stable-sort ops by method priority; ties keep insertion order.
pub fn sort_for_execution(ops: &mut [AtomicOp]) {
    ops.sort_by_key(|op| op.method.priority());
}
