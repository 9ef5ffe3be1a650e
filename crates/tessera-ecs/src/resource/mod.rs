use std::any::Any;

use rustc_hash::FxHashMap;
pub use tessera_ecs_derive::Resource;
use tessera_log::debug;

use crate::identity::{ResourceTypeId, TypeRegistry};

/// A resource is a piece of data that can be shared between systems. Global state of a game, for
/// example, could be held in a resource. There is at most one resource of each type.
pub trait Resource: Send + Sync + 'static {
    const NAME: &'static str;

    /// Called when the resource is stored in a world.
    fn on_create(&mut self) {}

    /// Called when the resource is removed from a world, replaced, or the world shuts down.
    fn on_destroy(&mut self) {}
}

type BoxedResource = Box<dyn Any + Send + Sync>;

type Hook = fn(&mut (dyn Any + Send + Sync + 'static));

/// Holds the single instance of one resource type along with that type's lifecycle hooks.
pub struct ResourceSlot {
    name: &'static str,
    resource: Option<BoxedResource>,
    on_create: Hook,
    on_destroy: Hook,
}

/// Container of resources.
#[derive(Default)]
pub struct Resources {
    registry: TypeRegistry<ResourceTypeId>,
    slots: FxHashMap<ResourceTypeId, ResourceSlot>,
}

impl ResourceSlot {
    fn new<R: Resource>() -> Self {
        Self {
            name: R::NAME,
            resource: None,
            on_create: |resource| {
                if let Some(resource) = resource.downcast_mut::<R>() {
                    resource.on_create();
                }
            },
            on_destroy: |resource| {
                if let Some(resource) = resource.downcast_mut::<R>() {
                    resource.on_destroy();
                }
            },
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.resource.is_some()
    }

    /// Stores a resource, destroying the previous one if there was one.
    fn assign(&mut self, mut resource: BoxedResource) {
        self.release();
        (self.on_create)(&mut *resource);
        self.resource = Some(resource);
    }

    /// Takes the resource out of the slot, running its destroy hook.
    fn release(&mut self) -> Option<BoxedResource> {
        let mut resource = self.resource.take()?;
        (self.on_destroy)(&mut *resource);
        Some(resource)
    }
}

impl Resources {
    pub fn new() -> Resources {
        Resources::default()
    }

    /// Stores a resource. If a resource of the same type was already stored, it is destroyed and
    /// replaced by the new one.
    pub fn add<R: Resource>(&mut self, resource: R) -> ResourceTypeId {
        let id = self.registry.get_id::<R>();
        self.slots
            .entry(id)
            .or_insert_with(|| {
                debug!("registered resource `{}` as {}", R::NAME, id);
                ResourceSlot::new::<R>()
            })
            .assign(Box::new(resource));
        id
    }

    /// Removes a resource, running its destroy hook. Returns the removed resource.
    pub fn remove<R: Resource>(&mut self) -> Option<R> {
        let id = self.registry.lookup::<R>()?;
        let resource = self.slots.remove(&id)?.release()?;
        resource.downcast::<R>().ok().map(|resource| *resource)
    }

    /// Checks that a resource exists in the container.
    pub fn contains<R: Resource>(&self) -> bool {
        self.slot::<R>().map_or(false, ResourceSlot::is_occupied)
    }

    pub fn get<R: Resource>(&self) -> Option<&R> {
        self.slot::<R>()?.resource.as_ref()?.downcast_ref()
    }

    pub fn get_mut<R: Resource>(&mut self) -> Option<&mut R> {
        let id = self.registry.lookup::<R>()?;
        self.slots.get_mut(&id)?.resource.as_mut()?.downcast_mut()
    }

    /// Id of `R` if it has ever been stored.
    #[inline]
    pub fn resource_type<R: Resource>(&self) -> Option<ResourceTypeId> {
        self.registry.lookup::<R>()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Removes every resource, running destroy hooks.
    pub fn clear(&mut self) {
        for (_, mut slot) in self.slots.drain() {
            slot.release();
        }
    }

    fn slot<R: Resource>(&self) -> Option<&ResourceSlot> {
        self.slots.get(&self.registry.lookup::<R>()?)
    }
}
