use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::TypedID;

/// An attribute value: the union stored in entity attribute maps and
/// carried by directive parameters.
///
/// `PartialEq` is structural throughout; in particular `Ref` equality is
/// `(type, id)` equality, which the list operators rely on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// The absent value (`none` in directive text).
    Null,
    /// A boolean literal.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit float.
    Float(f64),
    /// An entity reference.
    Ref(TypedID),
    /// A text value.
    Str(String),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A string-keyed map of values.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// A short type name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Ref(_) => "reference",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// The referenced id, if this value is a `Ref`.
    pub fn as_ref_id(&self) -> Option<&TypedID> {
        match self {
            Self::Ref(id) => Some(id),
            _ => None,
        }
    }

    /// Returns true for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Visit every reference in this value, depth-first, including refs
    /// buried inside lists and map values. Map keys are never references.
    pub fn walk_refs<'a>(&'a self, f: &mut impl FnMut(&'a TypedID)) {
        match self {
            Self::Ref(id) => f(id),
            Self::List(items) => {
                for item in items {
                    item.walk_refs(f);
                }
            }
            Self::Map(entries) => {
                for value in entries.values() {
                    value.walk_refs(f);
                }
            }
            _ => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "none"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Ref(id) => write!(f, "{id}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Self::Map(entries) => {
                let parts: Vec<String> =
                    entries.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<TypedID> for Value {
    fn from(id: TypedID) -> Self {
        Self::Ref(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::EntityType;

    fn sword() -> TypedID {
        TypedID::new(EntityType::Item, "sword-1").unwrap()
    }

    #[test]
    fn ref_equality_is_structural() {
        let a = Value::Ref(sword());
        let b = Value::Ref(TypedID::new(EntityType::Item, "sword-1").unwrap());
        let c = Value::Ref(TypedID::new(EntityType::Place, "sword-1").unwrap());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn walk_refs_descends_into_lists_and_maps() {
        let nested = Value::List(vec![
            Value::Ref(sword()),
            Value::Map(BTreeMap::from([(
                "prize".to_string(),
                Value::Ref(TypedID::new(EntityType::Place, "vault").unwrap()),
            )])),
            Value::Int(3),
        ]);
        let mut seen = Vec::new();
        nested.walk_refs(&mut |id| seen.push(id.to_string()));
        assert_eq!(seen, vec!["Item:sword-1", "Place:vault"]);
    }

    #[test]
    fn display_forms() {
        assert_eq!(Value::Null.to_string(), "none");
        assert_eq!(Value::Ref(sword()).to_string(), "Item:sword-1");
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::Str("two".into())]).to_string(),
            "[1, two]"
        );
    }

    #[test]
    fn untagged_serde_keeps_refs_distinct_from_maps() {
        let value = Value::Ref(sword());
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"type":"Item","id":"sword-1"}"#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);

        let plain: Value = serde_json::from_str(r#"{"hp": 10}"#).unwrap();
        assert!(matches!(plain, Value::Map(_)));
    }
}
