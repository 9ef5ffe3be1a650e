use std::any::Any;

use crate::{
    component::{AnyComponent, Component, Pooled},
    identity::{ComponentTypeId, InstanceId, PoolId},
    sparse_set::SparseSet,
};

/// Creates and recycles the instances of a single component type.
///
/// A pool tracks allocation, not attachment. An instance is active from `create` until it is
/// handed back through `destroy`, whether or not it was ever attached to an entity.
pub struct Pool<C: Component> {
    id: PoolId,
    component_type: ComponentTypeId,
    /// Instances handed out and not yet destroyed.
    active: SparseSet<InstanceId>,
    /// Destroyed instances waiting to be reused.
    free: Vec<Pooled<C>>,
    last_instance: u64,
}

/// Interface for destroying components without knowing their type.
pub(crate) trait AnyPool: Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// # Panics
    /// Panics if the component is not of the pool's type.
    fn destroy_dyn(&mut self, component: Box<dyn AnyComponent>) -> bool;

    fn active_len(&self) -> usize;

    fn free_len(&self) -> usize;
}

impl<C: Component> Pool<C> {
    pub fn new(component_type: ComponentTypeId) -> Self {
        Self {
            id: PoolId::next(),
            component_type,
            active: SparseSet::default(),
            free: Vec::default(),
            last_instance: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> PoolId {
        self.id
    }

    #[inline]
    pub fn component_type(&self) -> ComponentTypeId {
        self.component_type
    }

    /// Checks if the instance was created by this pool.
    #[inline]
    pub fn owns(&self, pooled: &Pooled<C>) -> bool {
        pooled.pool() == self.id && pooled.component_type() == self.component_type
    }

    /// Hands out a recycled instance if there is one, otherwise a new default one.
    ///
    /// # Note
    /// Recycled instances are not reset. Their fields hold whatever they held when destroyed.
    pub fn create(&mut self) -> Pooled<C> {
        let pooled = match self.free.pop() {
            Some(pooled) => pooled,
            None => {
                self.last_instance += 1;
                Pooled::new(
                    InstanceId::from_raw(self.last_instance),
                    self.id,
                    self.component_type,
                    C::default(),
                )
            }
        };

        self.active.add(pooled.instance());
        pooled
    }

    /// Returns an instance to the pool, running its destroy hook. Returns `false`, and drops the
    /// instance, if it was created by another pool or is not active in this one.
    pub fn destroy(&mut self, mut pooled: Pooled<C>) -> bool {
        if !self.owns(&pooled) || !self.active.remove(pooled.instance()) {
            return false;
        }

        pooled.on_destroy();
        self.free.push(pooled);
        true
    }

    #[inline]
    pub fn is_active(&self, instance: InstanceId) -> bool {
        self.active.contains(instance)
    }

    #[inline]
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    #[inline]
    pub fn free_len(&self) -> usize {
        self.free.len()
    }
}

impl<C: Component> AnyPool for Pool<C> {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    #[inline]
    fn destroy_dyn(&mut self, component: Box<dyn AnyComponent>) -> bool {
        self.destroy(Pooled::from_boxed(component))
    }

    #[inline]
    fn active_len(&self) -> usize {
        self.active.len()
    }

    #[inline]
    fn free_len(&self) -> usize {
        self.free.len()
    }
}
