use std::num::NonZeroUsize;

use crate::{
    component::{
        pool::{AnyPool, Pool},
        AnyComponent, Component,
    },
    identity::{ComponentTypeId, EntityId},
    sparse_set::SparseSet,
};

/// Everything a world knows about one component type: the pool its instances come from and the
/// set of entities that currently hold one.
///
/// An entity is in `entities()` exactly when its container holds an instance of this type. The
/// world keeps the two in step; nothing outside the crate can attach or detach directly.
pub struct ComponentInfo {
    name: &'static str,
    component_type: ComponentTypeId,
    entities: SparseSet<EntityId>,
    pool: Box<dyn AnyPool>,
}

impl ComponentInfo {
    pub(crate) fn new<C: Component>(component_type: ComponentTypeId, page_size: NonZeroUsize) -> Self {
        Self {
            name: C::NAME,
            component_type,
            entities: SparseSet::with_page_size(page_size),
            pool: Box::new(Pool::<C>::new(component_type)),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn component_type(&self) -> ComponentTypeId {
        self.component_type
    }

    /// Entities holding this component.
    #[inline]
    pub fn entities(&self) -> &SparseSet<EntityId> {
        &self.entities
    }

    #[inline]
    pub fn density(&self) -> &[EntityId] {
        self.entities.density()
    }

    #[inline]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.entities.contains(entity)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Typed access to the pool. `None` if `C` is not this info's type.
    #[inline]
    pub fn pool<C: Component>(&self) -> Option<&Pool<C>> {
        self.pool.as_any().downcast_ref()
    }

    #[inline]
    pub fn pool_mut<C: Component>(&mut self) -> Option<&mut Pool<C>> {
        self.pool.as_any_mut().downcast_mut()
    }

    /// Number of instances created and not yet destroyed.
    #[inline]
    pub fn active_len(&self) -> usize {
        self.pool.active_len()
    }

    /// Number of destroyed instances available for reuse.
    #[inline]
    pub fn free_len(&self) -> usize {
        self.pool.free_len()
    }

    #[inline]
    pub(crate) fn add_entity(&mut self, entity: EntityId) -> bool {
        self.entities.add(entity)
    }

    #[inline]
    pub(crate) fn remove_entity(&mut self, entity: EntityId) -> bool {
        self.entities.remove(entity)
    }

    #[inline]
    pub(crate) fn destroy_component(&mut self, component: Box<dyn AnyComponent>) -> bool {
        self.pool.destroy_dyn(component)
    }
}
