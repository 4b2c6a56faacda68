use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// The kind of a game entity. Exactly three kinds exist; narrative
/// directives may not introduce new ones.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum EntityType {
    /// A physical object that sits somewhere and can be carried.
    Item,
    /// A person or creature that occupies a place and holds items.
    Character,
    /// A location that contains items and characters.
    Place,
}

impl EntityType {
    /// Parse a kind from a string, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "item" => Some(Self::Item),
            "character" => Some(Self::Character),
            "place" => Some(Self::Place),
            _ => None,
        }
    }

    /// The canonical capitalized name, as it appears in directive text.
    pub fn name(self) -> &'static str {
        match self {
            Self::Item => "Item",
            Self::Character => "Character",
            Self::Place => "Place",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns true if `id` is a valid entity id: non-empty, word characters
/// and hyphens only.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

/// The universal entity reference: a `(kind, id)` pair.
///
/// Equality and hashing are structural, so a `TypedID` works as a map key
/// and as a list element under the operator algebra. The string form is
/// `"Type:id"`; the serialized form is `{"type": ..., "id": ...}`.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TypedID {
    /// The referenced entity's kind.
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    /// The referenced entity's id.
    pub id: String,
}

impl TypedID {
    /// Build a reference, validating the id charset.
    pub fn new(entity_type: EntityType, id: impl Into<String>) -> CoreResult<Self> {
        let id = id.into();
        if !is_valid_id(&id) {
            return Err(CoreError::InvalidId(id));
        }
        Ok(Self { entity_type, id })
    }
}

impl fmt::Display for TypedID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity_type, self.id)
    }
}

impl FromStr for TypedID {
    type Err = CoreError;

    /// Parse `"Type:id"`. The type is case-insensitive and capitalized on
    /// output; anything that is not one of the three kinds fails.
    fn from_str(s: &str) -> CoreResult<Self> {
        let (kind, id) = s
            .split_once(':')
            .ok_or_else(|| CoreError::InvalidRef(s.to_string()))?;
        let entity_type =
            EntityType::parse(kind).ok_or_else(|| CoreError::InvalidRef(s.to_string()))?;
        if !is_valid_id(id) {
            return Err(CoreError::InvalidRef(s.to_string()));
        }
        Ok(Self {
            entity_type,
            id: id.to_string(),
        })
    }
}
