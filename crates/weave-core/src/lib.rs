//! Core types for Weave: entity ids, attribute values, the operator
//! algebra, and the world graph.
//!
//! This crate defines the data model that narrative directives mutate. It
//! is independent of the directive text format — you can construct an
//! [`EntityGraph`] programmatically or deserialize one from JSON.

/// Parsed directives: verbs and ordered parameters.
pub mod command;
/// The typed entity union and its attribute API.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// The entity graph that owns all world state.
pub mod graph;
/// Entity kinds and typed references.
pub mod id;
/// The attribute operator algebra.
pub mod ops;
/// The attribute value union.
pub mod value;

pub use command::{Command, Params, Verb};
pub use entity::{Character, Entity, Item, Place};
pub use error::{CoreError, CoreResult};
pub use graph::EntityGraph;
pub use id::{EntityType, TypedID};
pub use ops::{Op, merge_values};
pub use value::Value;
