pub mod info;
pub mod pool;
pub mod set;

use std::{
    any::Any,
    fmt,
    ops::{Deref, DerefMut},
};

pub use tessera_ecs_derive::Component;

use crate::identity::{ComponentTypeId, InstanceId, PoolId};

/// A component represents a unique piece of data in an ECS. Components are associated with a
/// particular entity within a world.
///
/// New instances start out as `Default::default()`. Recycled instances keep whatever state they
/// had when they were destroyed, so anything that must not leak across reuse belongs in
/// `on_destroy`.
pub trait Component: Default + Send + Sync + 'static {
    const NAME: &'static str;

    /// Called by the owning pool each time the instance is destroyed.
    fn on_destroy(&mut self) {}
}

/// A component instance handed out by a pool.
///
/// The instance lives in its own allocation which moves, without being reallocated, between the
/// pool's free list and the container of the entity it is attached to.
pub struct Pooled<C: Component> {
    slot: Box<Slot<C>>,
}

pub(crate) struct Slot<C> {
    pub instance: InstanceId,
    pub pool: PoolId,
    pub component_type: ComponentTypeId,
    pub value: C,
}

/// Type erased component instance, as stored in an entity's container.
pub(crate) trait AnyComponent: Send + Sync {
    fn component_type(&self) -> ComponentTypeId;

    fn name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<C: Component> Pooled<C> {
    pub(crate) fn new(
        instance: InstanceId,
        pool: PoolId,
        component_type: ComponentTypeId,
        value: C,
    ) -> Self {
        Self {
            slot: Box::new(Slot {
                instance,
                pool,
                component_type,
                value,
            }),
        }
    }

    #[inline]
    pub fn instance(&self) -> InstanceId {
        self.slot.instance
    }

    /// Pool the instance was created by.
    #[inline]
    pub fn pool(&self) -> PoolId {
        self.slot.pool
    }

    #[inline]
    pub fn component_type(&self) -> ComponentTypeId {
        self.slot.component_type
    }

    /// Overwrites the component data, keeping the instance identity.
    #[inline]
    pub fn set(&mut self, value: C) {
        self.slot.value = value;
    }

    #[inline]
    pub(crate) fn into_boxed(self) -> Box<dyn AnyComponent> {
        self.slot
    }

    /// # Panics
    /// Panics if the component is not a `C`.
    pub(crate) fn from_boxed(component: Box<dyn AnyComponent>) -> Self {
        let slot = component
            .into_any()
            .downcast::<Slot<C>>()
            .expect("component container holds the wrong type");
        Self { slot }
    }
}

impl<C: Component> Deref for Pooled<C> {
    type Target = C;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.slot.value
    }
}

impl<C: Component> DerefMut for Pooled<C> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.slot.value
    }
}

impl<C: Component + fmt::Debug> fmt::Debug for Pooled<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pooled")
            .field("instance", &self.slot.instance)
            .field("pool", &self.slot.pool)
            .field("component_type", &self.slot.component_type)
            .field("value", &self.slot.value)
            .finish()
    }
}

impl<C: Component> AnyComponent for Slot<C> {
    #[inline]
    fn component_type(&self) -> ComponentTypeId {
        self.component_type
    }

    #[inline]
    fn name(&self) -> &'static str {
        C::NAME
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl dyn AnyComponent {
    #[inline]
    pub(crate) fn downcast_ref<C: Component>(&self) -> Option<&C> {
        self.as_any()
            .downcast_ref::<Slot<C>>()
            .map(|slot| &slot.value)
    }

    #[inline]
    pub(crate) fn downcast_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.as_any_mut()
            .downcast_mut::<Slot<C>>()
            .map(|slot| &mut slot.value)
    }
}
