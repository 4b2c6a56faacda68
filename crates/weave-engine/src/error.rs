use thiserror::Error;

use weave_core::{CoreError, TypedID};
use weave_directive::ParseError;

/// Result type for translation and execution.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised while translating or executing a command batch.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The addressed entity is missing or destroyed.
    #[error("{action} failed: entity {target} is missing or destroyed")]
    MissingEntity {
        /// What was being attempted.
        action: &'static str,
        /// The entity that could not be resolved.
        target: TypedID,
    },

    /// A Transfer command lacks a plain-assigned `target` reference.
    #[error("transfer of {0} requires an assigned `target` reference parameter")]
    MissingTarget(TypedID),

    /// Places cannot be transferred anywhere.
    #[error("{0} cannot be transferred")]
    NotTransferable(TypedID),

    /// The mover cannot go into that kind of container.
    #[error("cannot move {mover} into {container}")]
    ContainerMismatch {
        /// The entity being moved.
        mover: TypedID,
        /// The incompatible destination.
        container: TypedID,
    },

    /// A location-bearing field was modified with something other than
    /// plain assignment.
    #[error("attribute {key:?} of {target} only changes through assignment")]
    LocationAssignOnly {
        /// The entity whose location was modified.
        target: TypedID,
        /// The location-bearing key.
        key: &'static str,
    },

    /// A data-model validation failure while applying an operation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A directive parse failure, surfaced by the full pipeline.
    #[error(transparent)]
    Parse(#[from] ParseError),
}
