//! The entity graph: one store per entity kind, keyed by id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::entity::Entity;
use crate::id::{EntityType, TypedID};
use crate::value::Value;

/// The world graph. Owns every entity, live or destroyed.
///
/// Ids are unique per kind among non-destroyed entities; inserting over a
/// live entity overwrites it (with a warning), because conflict handling
/// is a per-command decision made upstream by the translator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityGraph {
    items: BTreeMap<String, Entity>,
    characters: BTreeMap<String, Entity>,
    places: BTreeMap<String, Entity>,
}

impl EntityGraph {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self, entity_type: EntityType) -> &BTreeMap<String, Entity> {
        match entity_type {
            EntityType::Item => &self.items,
            EntityType::Character => &self.characters,
            EntityType::Place => &self.places,
        }
    }

    fn store_mut(&mut self, entity_type: EntityType) -> &mut BTreeMap<String, Entity> {
        match entity_type {
            EntityType::Item => &mut self.items,
            EntityType::Character => &mut self.characters,
            EntityType::Place => &mut self.places,
        }
    }

    /// Look up an entity by reference. Destroyed entities are only
    /// returned when `include_destroyed` is set.
    pub fn find(&self, target: &TypedID, include_destroyed: bool) -> Option<&Entity> {
        self.store(target.entity_type)
            .get(&target.id)
            .filter(|e| include_destroyed || !e.is_destroyed())
    }

    /// Mutable twin of [`find`](Self::find).
    pub fn find_mut(&mut self, target: &TypedID, include_destroyed: bool) -> Option<&mut Entity> {
        self.store_mut(target.entity_type)
            .get_mut(&target.id)
            .filter(|e| include_destroyed || !e.is_destroyed())
    }

    /// True if the reference resolves to a live entity.
    pub fn contains_live(&self, target: &TypedID) -> bool {
        self.find(target, false).is_some()
    }

    /// Insert an entity, overwriting any previous entry under the same
    /// `(kind, id)` key. Overwriting a live entity is legal but warned.
    pub fn insert(&mut self, entity: Entity) {
        let id = entity.typed_id();
        let store = self.store_mut(id.entity_type);
        if let Some(existing) = store.get(&id.id) {
            if existing.is_destroyed() {
                debug!(%id, "replacing destroyed entity");
            } else {
                warn!(%id, "overwriting live entity");
            }
        }
        store.insert(id.id, entity);
    }

    /// Find a live entity by its `name` attribute, optionally restricted
    /// to one kind. Linear scan; intended for host-side convenience, not
    /// hot paths.
    pub fn find_by_name(&self, name: &str, entity_type: Option<EntityType>) -> Option<&Entity> {
        let kinds = match entity_type {
            Some(kind) => vec![kind],
            None => vec![EntityType::Item, EntityType::Character, EntityType::Place],
        };
        kinds.into_iter().find_map(|kind| {
            self.store(kind).values().find(|e| {
                !e.is_destroyed()
                    && matches!(e.attributes().get("name"), Some(Value::Str(s)) if s == name)
            })
        })
    }

    /// Iterate every entity of one kind, destroyed included.
    pub fn entities_of(&self, entity_type: EntityType) -> impl Iterator<Item = &Entity> {
        self.store(entity_type).values()
    }

    /// Iterate every entity in the graph, destroyed included.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.items
            .values()
            .chain(self.characters.values())
            .chain(self.places.values())
    }

    /// Total number of entities, destroyed included.
    pub fn len(&self) -> usize {
        self.items.len() + self.characters.len() + self.places.len()
    }

    /// True if the graph holds no entities at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entities of one kind, destroyed included.
    pub fn count_of(&self, entity_type: EntityType) -> usize {
        self.store(entity_type).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn sword_id() -> TypedID {
        TypedID::new(EntityType::Item, "sword-1").unwrap()
    }

    #[test]
    fn insert_and_find() {
        let mut graph = EntityGraph::new();
        graph.insert(Entity::new(EntityType::Item, "sword-1"));
        assert!(graph.find(&sword_id(), false).is_some());
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn destroyed_entities_need_the_flag() {
        let mut graph = EntityGraph::new();
        let mut sword = Entity::new(EntityType::Item, "sword-1");
        sword.set_destroyed(true);
        graph.insert(sword);

        assert!(graph.find(&sword_id(), false).is_none());
        assert!(graph.find(&sword_id(), true).is_some());
        assert!(!graph.contains_live(&sword_id()));
    }

    #[test]
    fn same_id_in_different_stores_does_not_collide() {
        let mut graph = EntityGraph::new();
        graph.insert(Entity::new(EntityType::Item, "well"));
        graph.insert(Entity::new(EntityType::Place, "well"));
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.count_of(EntityType::Item), 1);
        assert_eq!(graph.count_of(EntityType::Place), 1);
    }

    #[test]
    fn insert_overwrites_same_key() {
        let mut graph = EntityGraph::new();
        let mut first = Entity::new(EntityType::Item, "sword-1");
        first
            .set_attribute("name", Value::Str("Rusty Sword".into()))
            .unwrap();
        graph.insert(first);
        graph.insert(Entity::new(EntityType::Item, "sword-1"));

        let found = graph.find(&sword_id(), false).unwrap();
        assert_eq!(found.name(), "<Item:sword-1>");
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn find_by_name_skips_destroyed() {
        let mut graph = EntityGraph::new();
        let mut hero = Entity::new(EntityType::Character, "hero");
        hero.set_attribute("name", Value::Str("Kael".into())).unwrap();
        graph.insert(hero);

        assert!(graph.find_by_name("Kael", None).is_some());
        assert!(
            graph
                .find_by_name("Kael", Some(EntityType::Item))
                .is_none()
        );

        let hero_id = TypedID::new(EntityType::Character, "hero").unwrap();
        graph.find_mut(&hero_id, false).unwrap().set_destroyed(true);
        assert!(graph.find_by_name("Kael", None).is_none());
    }
}
