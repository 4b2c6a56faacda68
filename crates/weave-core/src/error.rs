use crate::id::{EntityType, TypedID};
use crate::ops::Op;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the data model: malformed identifiers and
/// per-field validation failures.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity id contains characters outside `[\w\-]`.
    #[error("invalid entity id: {0:?}")]
    InvalidId(String),

    /// A `"Type:id"` reference string could not be parsed.
    #[error("invalid entity reference: {0:?}")]
    InvalidRef(String),

    /// A built-in attribute cannot be written through the attribute API.
    #[error("attribute {0:?} is read-only")]
    ReadOnly(String),

    /// A built-in attribute only accepts plain assignment.
    #[error("attribute {key:?} only supports assignment, not {op:?}")]
    AssignOnly {
        /// The attribute key.
        key: String,
        /// The rejected operator.
        op: Op,
    },

    /// A reference-typed field received a reference of the wrong kind.
    #[error("attribute {key:?} cannot reference a {found}, expected {expected}")]
    WrongRefType {
        /// The attribute key.
        key: String,
        /// Entity kinds the field accepts.
        expected: &'static str,
        /// Entity kind that was supplied.
        found: EntityType,
    },

    /// A field expected a reference (or list/map of references).
    #[error("attribute {key:?} expects {expected}, got {found}")]
    WrongShape {
        /// The attribute key.
        key: String,
        /// Description of the accepted value shape.
        expected: &'static str,
        /// Type name of the rejected value.
        found: &'static str,
    },

    /// Item quantity must stay a non-negative integer.
    #[error("quantity must be a non-negative integer, got {0}")]
    InvalidQuantity(i64),

    /// The operator algebra has no rule for this current/incoming pair.
    #[error("attribute {key:?}: {op:?} is not supported between {current} and {incoming}")]
    UnsupportedOp {
        /// The attribute key.
        key: String,
        /// The operator that was applied.
        op: Op,
        /// Type name of the current value.
        current: &'static str,
        /// Type name of the incoming value.
        incoming: &'static str,
    },

    /// A lookup required an entity that is missing or destroyed.
    #[error("entity not found: {0}")]
    EntityNotFound(TypedID),
}
