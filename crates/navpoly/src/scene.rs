//! A minimal scene of rectangular bodies, used as the obstacle source for [`NavMesh`](crate::NavMesh) builds.

use glam::Vec2;
use slotmap::{SlotMap, new_key_type};

use crate::Transform2d;

new_key_type! {
    /// A key for an [`Entity`] in a [`Scene`]. Keys of despawned entities are never reused.
    pub struct EntityKey;
}

/// A rectangular body in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    /// Where the body is and how large it is.
    pub transform: Transform2d,
    /// Whether the body blocks navigation.
    pub solid: bool,
}

impl Entity {
    /// Creates a solid entity.
    #[inline]
    pub fn solid(transform: Transform2d) -> Self {
        Self {
            transform,
            solid: true,
        }
    }
}

/// A collection of entities addressed by generational [`EntityKey`]s.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Scene {
    entities: SlotMap<EntityKey, Entity>,
}

impl Scene {
    /// Adds a solid entity with the given transform.
    pub fn spawn(&mut self, transform: Transform2d) -> EntityKey {
        self.insert(Entity::solid(transform))
    }

    /// Adds an entity.
    pub fn insert(&mut self, entity: Entity) -> EntityKey {
        self.entities.insert(entity)
    }

    /// Removes an entity. Returns `None` if the key is stale.
    pub fn despawn(&mut self, key: EntityKey) -> Option<Entity> {
        self.entities.remove(key)
    }

    /// Returns the entity, or `None` if the key is stale.
    #[inline]
    pub fn get(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    /// Returns the entity mutably, or `None` if the key is stale.
    #[inline]
    pub fn get_mut(&mut self, key: EntityKey) -> Option<&mut Entity> {
        self.entities.get_mut(key)
    }

    /// The number of entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the scene has no entities.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterates over all entities.
    pub fn iter(&self) -> impl Iterator<Item = (EntityKey, &Entity)> + '_ {
        self.entities.iter()
    }

    /// The transforms of all solid entities, i.e. the obstacles of a nav mesh.
    pub fn solid_transforms(&self) -> impl Iterator<Item = Transform2d> + '_ {
        self.entities
            .values()
            .filter(|entity| entity.solid)
            .map(|entity| entity.transform)
    }

    /// Finds the entity under `point`. When several overlap, the one iterated last wins.
    pub fn pick(&self, point: Vec2) -> Option<EntityKey> {
        self.entities
            .iter()
            .filter(|(_, entity)| entity.transform.contains_point(point))
            .map(|(key, _)| key)
            .last()
    }
}
