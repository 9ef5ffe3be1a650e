use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::{
    entity::{Entity, EntityId},
    identity::EntityAllocator,
};

/// Directory of the entities belonging to a world.
pub struct Entities {
    allocator: Arc<EntityAllocator>,
    entities: FxHashMap<EntityId, Entity>,
}

impl Default for Entities {
    fn default() -> Self {
        Self::new(Arc::default())
    }
}

impl Entities {
    pub(crate) fn new(allocator: Arc<EntityAllocator>) -> Self {
        Self {
            allocator,
            entities: FxHashMap::default(),
        }
    }

    /// Allocator the world takes entity ids from.
    #[inline]
    pub fn allocator(&self) -> &Arc<EntityAllocator> {
        &self.allocator
    }

    /// Allocates an id and inserts an entity with no components.
    pub(crate) fn create(&mut self) -> EntityId {
        let id = self.allocator.allocate();
        self.entities.insert(id, Entity::new(id));
        id
    }

    #[inline]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    #[inline]
    pub(crate) fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    #[inline]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.entities.clear();
    }
}
