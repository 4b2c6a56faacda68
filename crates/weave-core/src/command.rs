use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::id::{EntityType, TypedID};
use crate::ops::Op;
use crate::value::Value;

/// The four directive verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verb {
    /// Create an entity (or resurrect / overwrite one).
    Create,
    /// Modify attributes of an existing entity.
    Modify,
    /// Soft-delete an entity.
    Destroy,
    /// Move an item or character into a new container.
    Transfer,
}

impl Verb {
    /// Parse a verb from directive text, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Some(Self::Create),
            "modify" => Some(Self::Modify),
            "destroy" => Some(Self::Destroy),
            "transfer" => Some(Self::Transfer),
            _ => None,
        }
    }

    /// The canonical capitalized name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Modify => "Modify",
            Self::Destroy => "Destroy",
            Self::Transfer => "Transfer",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered directive parameters: key → (operator, value). Application
/// order is part of the contract, hence the index map.
pub type Params = IndexMap<String, (Op, Value)>;

/// One parsed directive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// What to do.
    pub verb: Verb,
    /// Kind of the entity the directive addresses.
    pub entity_type: EntityType,
    /// Id of the entity the directive addresses.
    pub entity_id: String,
    /// Ordered `(op, value)` parameters.
    pub params: Params,
}

impl Command {
    /// A parameterless command.
    pub fn new(verb: Verb, entity_type: EntityType, entity_id: impl Into<String>) -> Self {
        Self {
            verb,
            entity_type,
            entity_id: entity_id.into(),
            params: Params::new(),
        }
    }

    /// The `(kind, id)` reference of the addressed entity.
    pub fn typed_id(&self) -> TypedID {
        TypedID {
            entity_type: self.entity_type,
            id: self.entity_id.clone(),
        }
    }

    /// The Transfer destination: the `target` parameter, when present as
    /// a plain-assigned entity reference.
    pub fn target(&self) -> Option<&TypedID> {
        match self.params.get("target") {
            Some((Op::Assign, Value::Ref(id))) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{} {} {}", self.verb, self.entity_type, self.entity_id)?;
        if self.params.is_empty() {
            return Ok(());
        }
        let parts: Vec<String> = self
            .params
            .iter()
            .map(|(key, (op, value))| format!("{key}{op}{value}"))
            .collect();
        write!(f, " ({})", parts.join(", "))
    }
}
