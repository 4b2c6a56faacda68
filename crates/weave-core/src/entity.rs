//! Typed game entities.
//!
//! Every entity is one of three kinds. Each kind carries a handful of
//! strongly-typed core fields (validated on every write) next to an open
//! attribute map for everything the narrative invents on the fly. Both
//! live behind one keyspace: `get_attribute("quantity")` reads the typed
//! field, `get_attribute("mood")` reads the open map.
//!
//! Entity mutators never touch other entities. Moving an item updates the
//! item's `location` only; the translator issues the matching container
//! updates as separate operations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::id::{EntityType, TypedID};
use crate::ops::{Op, merge_values};
use crate::value::Value;

/// A physical object. Sits in a place or a character's hands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Unique id within the item store.
    pub entity_id: String,
    /// Soft-delete flag.
    #[serde(default)]
    pub is_destroyed: bool,
    /// Stack size; never negative.
    #[serde(default = "default_quantity")]
    pub quantity: u64,
    /// Where the item is: a place or the character carrying it.
    #[serde(default)]
    pub location: Option<TypedID>,
    /// Open narrative attributes.
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
}

/// A person or creature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    /// Unique id within the character store.
    pub entity_id: String,
    /// Soft-delete flag.
    #[serde(default)]
    pub is_destroyed: bool,
    /// The place the character currently occupies.
    #[serde(default)]
    pub current_place: Option<TypedID>,
    /// Items the character carries.
    #[serde(default)]
    pub has_items: Vec<TypedID>,
    /// Open narrative attributes.
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
}

/// A location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    /// Unique id within the place store.
    pub entity_id: String,
    /// Soft-delete flag.
    #[serde(default)]
    pub is_destroyed: bool,
    /// Items and characters inside this place.
    #[serde(default)]
    pub contents: Vec<TypedID>,
    /// Named exits to other places.
    #[serde(default)]
    pub exits: BTreeMap<String, TypedID>,
    /// Open narrative attributes.
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
}

fn default_quantity() -> u64 {
    1
}

impl Item {
    /// A fresh item with default quantity 1 and no location.
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            is_destroyed: false,
            quantity: 1,
            location: None,
            attributes: BTreeMap::new(),
        }
    }
}

impl Character {
    /// A fresh character with no place and empty hands.
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            is_destroyed: false,
            current_place: None,
            has_items: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }
}

impl Place {
    /// A fresh, empty place.
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            is_destroyed: false,
            contents: Vec::new(),
            exits: BTreeMap::new(),
            attributes: BTreeMap::new(),
        }
    }
}

/// A game entity of any kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "entity_type")]
pub enum Entity {
    /// An item.
    Item(Item),
    /// A character.
    Character(Character),
    /// A place.
    Place(Place),
}

impl Entity {
    /// A fresh entity of the given kind.
    pub fn new(entity_type: EntityType, entity_id: impl Into<String>) -> Self {
        match entity_type {
            EntityType::Item => Self::Item(Item::new(entity_id)),
            EntityType::Character => Self::Character(Character::new(entity_id)),
            EntityType::Place => Self::Place(Place::new(entity_id)),
        }
    }

    /// This entity's kind.
    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::Item(_) => EntityType::Item,
            Self::Character(_) => EntityType::Character,
            Self::Place(_) => EntityType::Place,
        }
    }

    /// This entity's id.
    pub fn entity_id(&self) -> &str {
        match self {
            Self::Item(e) => &e.entity_id,
            Self::Character(e) => &e.entity_id,
            Self::Place(e) => &e.entity_id,
        }
    }

    /// This entity's `(kind, id)` reference.
    pub fn typed_id(&self) -> TypedID {
        TypedID {
            entity_type: self.entity_type(),
            id: self.entity_id().to_string(),
        }
    }

    /// Whether the entity has been soft-deleted.
    pub fn is_destroyed(&self) -> bool {
        match self {
            Self::Item(e) => e.is_destroyed,
            Self::Character(e) => e.is_destroyed,
            Self::Place(e) => e.is_destroyed,
        }
    }

    /// Flip the soft-delete flag.
    pub fn set_destroyed(&mut self, destroyed: bool) {
        match self {
            Self::Item(e) => e.is_destroyed = destroyed,
            Self::Character(e) => e.is_destroyed = destroyed,
            Self::Place(e) => e.is_destroyed = destroyed,
        }
    }

    /// The open attribute map.
    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        match self {
            Self::Item(e) => &e.attributes,
            Self::Character(e) => &e.attributes,
            Self::Place(e) => &e.attributes,
        }
    }

    /// Display name: the `name` attribute when it is a string, otherwise
    /// the `<Type:id>` fallback.
    pub fn name(&self) -> String {
        match self.attributes().get("name") {
            Some(Value::Str(s)) => s.clone(),
            _ => format!("<{}>", self.typed_id()),
        }
    }

    /// The location-bearing key of this kind, if it has one.
    pub fn location_key(&self) -> Option<&'static str> {
        match self {
            Self::Item(_) => Some("location"),
            Self::Character(_) => Some("current_place"),
            Self::Place(_) => None,
        }
    }

    /// The current location reference, for kinds that have one.
    pub fn location_ref(&self) -> Option<&TypedID> {
        match self {
            Self::Item(e) => e.location.as_ref(),
            Self::Character(e) => e.current_place.as_ref(),
            Self::Place(_) => None,
        }
    }

    /// The key of the content list a kind maintains as a container, if it
    /// is a container at all.
    pub fn content_key(entity_type: EntityType) -> Option<&'static str> {
        match entity_type {
            EntityType::Character => Some("has_items"),
            EntityType::Place => Some("contents"),
            EntityType::Item => None,
        }
    }

    /// True if `key` names a core field of this kind (or one of the
    /// identity fields shared by all kinds).
    pub fn is_core_key(&self, key: &str) -> bool {
        if matches!(key, "entity_id" | "entity_type" | "is_destroyed") {
            return true;
        }
        match self {
            Self::Item(_) => matches!(key, "quantity" | "location"),
            Self::Character(_) => matches!(key, "current_place" | "has_items"),
            Self::Place(_) => matches!(key, "contents" | "exits"),
        }
    }

    /// Read an attribute through the unified keyspace. Core fields
    /// synthesize a [`Value`]; open attributes clone out of the map.
    pub fn get_attribute(&self, key: &str) -> Option<Value> {
        match (self, key) {
            (_, "entity_id") => Some(Value::Str(self.entity_id().to_string())),
            (_, "entity_type") => Some(Value::Str(self.entity_type().name().to_string())),
            (_, "is_destroyed") => Some(Value::Bool(self.is_destroyed())),
            (Self::Item(e), "quantity") => Some(Value::Int(e.quantity as i64)),
            (Self::Item(e), "location") => Some(opt_ref_value(e.location.as_ref())),
            (Self::Character(e), "current_place") => {
                Some(opt_ref_value(e.current_place.as_ref()))
            }
            (Self::Character(e), "has_items") => Some(ref_list_value(&e.has_items)),
            (Self::Place(e), "contents") => Some(ref_list_value(&e.contents)),
            (Self::Place(e), "exits") => Some(ref_map_value(&e.exits)),
            _ => self.attributes().get(key).cloned(),
        }
    }

    /// Read an attribute, falling back to `default` when absent.
    pub fn get_attribute_or(&self, key: &str, default: Value) -> Value {
        self.get_attribute(key).unwrap_or(default)
    }

    /// True if the key names a core field or a present open attribute.
    pub fn has_attribute(&self, key: &str) -> bool {
        self.is_core_key(key) || self.attributes().contains_key(key)
    }

    /// Remove an open attribute. Core fields cannot be deleted; returns
    /// whether anything was removed.
    pub fn delete_attribute(&mut self, key: &str) -> bool {
        if self.is_core_key(key) {
            return false;
        }
        match self {
            Self::Item(e) => e.attributes.remove(key).is_some(),
            Self::Character(e) => e.attributes.remove(key).is_some(),
            Self::Place(e) => e.attributes.remove(key).is_some(),
        }
    }

    /// A full key→value view merging core fields and open attributes.
    pub fn attribute_snapshot(&self) -> BTreeMap<String, Value> {
        let mut snapshot = self.attributes().clone();
        let core_keys: &[&str] = match self {
            Self::Item(_) => &["entity_id", "entity_type", "is_destroyed", "quantity", "location"],
            Self::Character(_) => &[
                "entity_id",
                "entity_type",
                "is_destroyed",
                "current_place",
                "has_items",
            ],
            Self::Place(_) => &["entity_id", "entity_type", "is_destroyed", "contents", "exits"],
        };
        for key in core_keys {
            if let Some(value) = self.get_attribute(key) {
                snapshot.insert((*key).to_string(), value);
            }
        }
        snapshot
    }

    /// Assign an attribute. Core fields validate per kind; open
    /// attributes store the value verbatim.
    pub fn set_attribute(&mut self, key: &str, value: Value) -> CoreResult<()> {
        if matches!(key, "entity_id" | "entity_type" | "is_destroyed") {
            return Err(CoreError::ReadOnly(key.to_string()));
        }
        match self {
            Self::Item(e) => match key {
                "quantity" => {
                    e.quantity = validate_quantity(key, &value)?;
                    Ok(())
                }
                "location" => {
                    e.location = validate_opt_ref(
                        key,
                        &value,
                        &[EntityType::Place, EntityType::Character],
                    )?;
                    Ok(())
                }
                _ => {
                    e.attributes.insert(key.to_string(), value);
                    Ok(())
                }
            },
            Self::Character(e) => match key {
                "current_place" => {
                    e.current_place = validate_opt_ref(key, &value, &[EntityType::Place])?;
                    Ok(())
                }
                "has_items" => {
                    e.has_items = validate_ref_list(key, &value, &[EntityType::Item])?;
                    Ok(())
                }
                _ => {
                    e.attributes.insert(key.to_string(), value);
                    Ok(())
                }
            },
            Self::Place(e) => match key {
                "contents" => {
                    e.contents = validate_ref_list(
                        key,
                        &value,
                        &[EntityType::Item, EntityType::Character],
                    )?;
                    Ok(())
                }
                "exits" => {
                    e.exits = validate_ref_map(key, &value, &[EntityType::Place])?;
                    Ok(())
                }
                _ => {
                    e.attributes.insert(key.to_string(), value);
                    Ok(())
                }
            },
        }
    }

    /// Apply an operator to an attribute.
    ///
    /// Core fields restrict the algebra: location-bearing fields accept
    /// assignment only, `quantity` supports the numeric ops with a ≥ 0
    /// check on the result, and the container lists / exit map run the
    /// generic algebra followed by element revalidation. Open attributes
    /// run the algebra unrestricted.
    pub fn modify_attribute(&mut self, key: &str, op: Op, value: &Value) -> CoreResult<()> {
        if matches!(key, "entity_id" | "entity_type" | "is_destroyed") {
            return Err(CoreError::ReadOnly(key.to_string()));
        }
        match self {
            Self::Item(e) => match key {
                "quantity" => {
                    e.quantity = match op {
                        Op::Assign => validate_quantity(key, value)?,
                        Op::AddMerge | Op::SubRemove => {
                            let Value::Int(delta) = value else {
                                return Err(CoreError::WrongShape {
                                    key: key.to_string(),
                                    expected: "an integer amount",
                                    found: value.type_name(),
                                });
                            };
                            let current = e.quantity as i64;
                            let next = if op == Op::AddMerge {
                                current + delta
                            } else {
                                current - delta
                            };
                            validate_quantity(key, &Value::Int(next))?
                        }
                    };
                    Ok(())
                }
                "location" => {
                    if op != Op::Assign {
                        return Err(CoreError::AssignOnly {
                            key: key.to_string(),
                            op,
                        });
                    }
                    e.location = validate_opt_ref(
                        key,
                        value,
                        &[EntityType::Place, EntityType::Character],
                    )?;
                    Ok(())
                }
                _ => merge_open(&mut e.attributes, key, op, value),
            },
            Self::Character(e) => match key {
                "current_place" => {
                    if op != Op::Assign {
                        return Err(CoreError::AssignOnly {
                            key: key.to_string(),
                            op,
                        });
                    }
                    e.current_place = validate_opt_ref(key, value, &[EntityType::Place])?;
                    Ok(())
                }
                "has_items" => {
                    let merged =
                        merge_values(key, Some(&ref_list_value(&e.has_items)), op, value)?;
                    if let Some(next) = merged {
                        e.has_items = validate_ref_list(key, &next, &[EntityType::Item])?;
                    }
                    Ok(())
                }
                _ => merge_open(&mut e.attributes, key, op, value),
            },
            Self::Place(e) => match key {
                "contents" => {
                    let merged =
                        merge_values(key, Some(&ref_list_value(&e.contents)), op, value)?;
                    if let Some(next) = merged {
                        e.contents = validate_ref_list(
                            key,
                            &next,
                            &[EntityType::Item, EntityType::Character],
                        )?;
                    }
                    Ok(())
                }
                "exits" => {
                    let merged = merge_values(key, Some(&ref_map_value(&e.exits)), op, value)?;
                    if let Some(next) = merged {
                        e.exits = validate_ref_map(key, &next, &[EntityType::Place])?;
                    }
                    Ok(())
                }
                _ => merge_open(&mut e.attributes, key, op, value),
            },
        }
    }
}

fn merge_open(
    attributes: &mut BTreeMap<String, Value>,
    key: &str,
    op: Op,
    value: &Value,
) -> CoreResult<()> {
    if let Some(next) = merge_values(key, attributes.get(key), op, value)? {
        attributes.insert(key.to_string(), next);
    }
    Ok(())
}

fn opt_ref_value(id: Option<&TypedID>) -> Value {
    match id {
        Some(id) => Value::Ref(id.clone()),
        None => Value::Null,
    }
}

fn ref_list_value(ids: &[TypedID]) -> Value {
    Value::List(ids.iter().map(|id| Value::Ref(id.clone())).collect())
}

fn ref_map_value(entries: &BTreeMap<String, TypedID>) -> Value {
    Value::Map(
        entries
            .iter()
            .map(|(k, v)| (k.clone(), Value::Ref(v.clone())))
            .collect(),
    )
}

fn validate_quantity(key: &str, value: &Value) -> CoreResult<u64> {
    match value {
        Value::Int(n) if *n >= 0 => Ok(*n as u64),
        Value::Int(n) => Err(CoreError::InvalidQuantity(*n)),
        other => Err(CoreError::WrongShape {
            key: key.to_string(),
            expected: "a non-negative integer",
            found: other.type_name(),
        }),
    }
}

fn expect_ref(key: &str, value: &Value, allowed: &[EntityType]) -> CoreResult<TypedID> {
    match value {
        Value::Ref(id) if allowed.contains(&id.entity_type) => Ok(id.clone()),
        Value::Ref(id) => Err(CoreError::WrongRefType {
            key: key.to_string(),
            expected: allowed_names(allowed),
            found: id.entity_type,
        }),
        other => Err(CoreError::WrongShape {
            key: key.to_string(),
            expected: "an entity reference",
            found: other.type_name(),
        }),
    }
}

fn validate_opt_ref(
    key: &str,
    value: &Value,
    allowed: &[EntityType],
) -> CoreResult<Option<TypedID>> {
    match value {
        Value::Null => Ok(None),
        other => expect_ref(key, other, allowed).map(Some),
    }
}

fn validate_ref_list(key: &str, value: &Value, allowed: &[EntityType]) -> CoreResult<Vec<TypedID>> {
    let Value::List(items) = value else {
        return Err(CoreError::WrongShape {
            key: key.to_string(),
            expected: "a list of entity references",
            found: value.type_name(),
        });
    };
    items.iter().map(|v| expect_ref(key, v, allowed)).collect()
}

fn validate_ref_map(
    key: &str,
    value: &Value,
    allowed: &[EntityType],
) -> CoreResult<BTreeMap<String, TypedID>> {
    let Value::Map(entries) = value else {
        return Err(CoreError::WrongShape {
            key: key.to_string(),
            expected: "a map of entity references",
            found: value.type_name(),
        });
    };
    entries
        .iter()
        .map(|(k, v)| Ok((k.clone(), expect_ref(key, v, allowed)?)))
        .collect()
}

fn allowed_names(allowed: &[EntityType]) -> &'static str {
    match allowed {
        [EntityType::Place] => "Place",
        [EntityType::Item] => "Item",
        [EntityType::Place, EntityType::Character] => "Place or Character",
        [EntityType::Item, EntityType::Character] => "Item or Character",
        _ => "a compatible entity kind",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place_ref(id: &str) -> TypedID {
        TypedID::new(EntityType::Place, id).unwrap()
    }

    fn item_ref(id: &str) -> TypedID {
        TypedID::new(EntityType::Item, id).unwrap()
    }

    #[test]
    fn new_item_defaults() {
        let item = Entity::new(EntityType::Item, "sword-1");
        assert_eq!(item.get_attribute("quantity"), Some(Value::Int(1)));
        assert_eq!(item.get_attribute("location"), Some(Value::Null));
        assert!(!item.is_destroyed());
    }

    #[test]
    fn quantity_validation() {
        let mut item = Entity::new(EntityType::Item, "coin");
        item.set_attribute("quantity", Value::Int(30)).unwrap();
        assert_eq!(item.get_attribute("quantity"), Some(Value::Int(30)));

        assert!(item.set_attribute("quantity", Value::Int(-1)).is_err());
        assert!(
            item.set_attribute("quantity", Value::Str("many".into()))
                .is_err()
        );

        item.modify_attribute("quantity", Op::SubRemove, &Value::Int(10))
            .unwrap();
        assert_eq!(item.get_attribute("quantity"), Some(Value::Int(20)));

        // Going below zero fails validation and leaves the field alone.
        assert!(
            item.modify_attribute("quantity", Op::SubRemove, &Value::Int(100))
                .is_err()
        );
        assert_eq!(item.get_attribute("quantity"), Some(Value::Int(20)));
    }

    #[test]
    fn location_accepts_place_or_character_only() {
        let mut item = Entity::new(EntityType::Item, "sword-1");
        item.set_attribute("location", Value::Ref(place_ref("armory")))
            .unwrap();
        assert_eq!(item.location_ref(), Some(&place_ref("armory")));

        let err = item.set_attribute("location", Value::Ref(item_ref("bag")));
        assert!(err.is_err());

        item.set_attribute("location", Value::Null).unwrap();
        assert_eq!(item.location_ref(), None);
    }

    #[test]
    fn location_is_assign_only() {
        let mut item = Entity::new(EntityType::Item, "sword-1");
        let err =
            item.modify_attribute("location", Op::AddMerge, &Value::Ref(place_ref("armory")));
        assert!(matches!(err, Err(CoreError::AssignOnly { .. })));
    }

    #[test]
    fn current_place_must_be_a_place() {
        let mut hero = Entity::new(EntityType::Character, "hero");
        assert!(
            hero.set_attribute("current_place", Value::Ref(item_ref("sword-1")))
                .is_err()
        );
        hero.set_attribute("current_place", Value::Ref(place_ref("start")))
            .unwrap();
        assert_eq!(hero.location_key(), Some("current_place"));
    }

    #[test]
    fn has_items_algebra_revalidates_elements() {
        let mut hero = Entity::new(EntityType::Character, "hero");
        hero.modify_attribute("has_items", Op::AddMerge, &Value::Ref(item_ref("sword-1")))
            .unwrap();
        hero.modify_attribute("has_items", Op::AddMerge, &Value::Ref(item_ref("rope")))
            .unwrap();
        // Duplicates are skipped.
        hero.modify_attribute("has_items", Op::AddMerge, &Value::Ref(item_ref("sword-1")))
            .unwrap();
        assert_eq!(
            hero.get_attribute("has_items"),
            Some(Value::List(vec![
                Value::Ref(item_ref("sword-1")),
                Value::Ref(item_ref("rope")),
            ]))
        );

        // A place is not an item.
        assert!(
            hero.modify_attribute("has_items", Op::AddMerge, &Value::Ref(place_ref("inn")))
                .is_err()
        );

        hero.modify_attribute("has_items", Op::SubRemove, &Value::Ref(item_ref("sword-1")))
            .unwrap();
        assert_eq!(
            hero.get_attribute("has_items"),
            Some(Value::List(vec![Value::Ref(item_ref("rope"))]))
        );

        // Removing an absent element is a no-op.
        hero.modify_attribute("has_items", Op::SubRemove, &Value::Ref(item_ref("ghost")))
            .unwrap();
        assert_eq!(
            hero.get_attribute("has_items"),
            Some(Value::List(vec![Value::Ref(item_ref("rope"))]))
        );
    }

    #[test]
    fn exits_validate_place_targets() {
        let mut inn = Entity::new(EntityType::Place, "inn");
        let exits = Value::Map(BTreeMap::from([(
            "north".to_string(),
            Value::Ref(place_ref("square")),
        )]));
        inn.set_attribute("exits", exits).unwrap();

        let bad = Value::Map(BTreeMap::from([(
            "down".to_string(),
            Value::Ref(item_ref("trapdoor")),
        )]));
        assert!(inn.set_attribute("exits", bad.clone()).is_err());
        assert!(inn.modify_attribute("exits", Op::AddMerge, &bad).is_err());

        inn.modify_attribute("exits", Op::SubRemove, &Value::Str("north".into()))
            .unwrap();
        assert_eq!(inn.get_attribute("exits"), Some(Value::Map(BTreeMap::new())));
    }

    #[test]
    fn open_attributes_run_the_algebra() {
        let mut hero = Entity::new(EntityType::Character, "hero");
        hero.set_attribute("hp", Value::Int(10)).unwrap();
        hero.modify_attribute("hp", Op::AddMerge, &Value::Int(5))
            .unwrap();
        assert_eq!(hero.get_attribute("hp"), Some(Value::Int(15)));

        hero.modify_attribute("titles", Op::AddMerge, &Value::Str("Knight".into()))
            .unwrap();
        assert_eq!(hero.get_attribute("titles"), Some(Value::Str("Knight".into())));
    }

    #[test]
    fn identity_fields_are_read_only() {
        let mut item = Entity::new(EntityType::Item, "sword-1");
        assert!(
            item.set_attribute("entity_id", Value::Str("other".into()))
                .is_err()
        );
        assert!(
            item.modify_attribute("is_destroyed", Op::Assign, &Value::Bool(true))
                .is_err()
        );
    }

    #[test]
    fn name_falls_back_to_reference_form() {
        let mut item = Entity::new(EntityType::Item, "sword-1");
        assert_eq!(item.name(), "<Item:sword-1>");
        item.set_attribute("name", Value::Str("Excalibur".into()))
            .unwrap();
        assert_eq!(item.name(), "Excalibur");
    }

    #[test]
    fn snapshot_merges_core_and_open_keys() {
        let mut hero = Entity::new(EntityType::Character, "hero");
        hero.set_attribute("hp", Value::Int(10)).unwrap();
        let snapshot = hero.attribute_snapshot();
        assert_eq!(snapshot.get("hp"), Some(&Value::Int(10)));
        assert_eq!(snapshot.get("entity_id"), Some(&Value::Str("hero".into())));
        assert!(snapshot.contains_key("has_items"));
    }

    #[test]
    fn delete_attribute_spares_core_fields() {
        let mut item = Entity::new(EntityType::Item, "sword-1");
        item.set_attribute("mood", Value::Str("gleaming".into()))
            .unwrap();
        assert!(item.delete_attribute("mood"));
        assert!(!item.delete_attribute("quantity"));
        assert!(item.has_attribute("quantity"));
    }

    #[test]
    fn tagged_serde_round_trip() {
        let mut item = Entity::new(EntityType::Item, "sword-1");
        item.set_attribute("location", Value::Ref(place_ref("armory")))
            .unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["entity_type"], "Item");
        let back: Entity = serde_json::from_value(json).unwrap();
        assert_eq!(back.typed_id(), item.typed_id());
        assert_eq!(back.location_ref(), item.location_ref());
    }
}
