use rustc_hash::FxHashMap;

pub use crate::identity::EntityId;
use crate::{
    component::{AnyComponent, Component},
    identity::ComponentTypeId,
};

/// An entity is an identifier that is associated with a set of components in a world. It owns
/// at most one component of each type.
///
/// The container is the authoritative record of which components an entity holds. Each
/// component type's sparse set is an index kept in step with it.
pub struct Entity {
    id: EntityId,
    components: FxHashMap<ComponentTypeId, Box<dyn AnyComponent>>,
}

impl Entity {
    #[inline]
    pub(crate) fn new(id: EntityId) -> Entity {
        Entity {
            id,
            components: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Number of components held.
    #[inline]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    #[inline]
    pub fn has(&self, component_type: ComponentTypeId) -> bool {
        self.components.contains_key(&component_type)
    }

    pub fn component_types(&self) -> impl Iterator<Item = ComponentTypeId> + '_ {
        self.components.keys().copied()
    }

    /// Gets a component by type id. `None` if the entity has no such component or it isn't a
    /// `C`.
    #[inline]
    pub fn get<C: Component>(&self, component_type: ComponentTypeId) -> Option<&C> {
        self.components.get(&component_type)?.downcast_ref()
    }

    #[inline]
    pub fn get_mut<C: Component>(&mut self, component_type: ComponentTypeId) -> Option<&mut C> {
        self.components.get_mut(&component_type)?.downcast_mut()
    }

    #[inline]
    pub(crate) fn insert(&mut self, component: Box<dyn AnyComponent>) {
        self.components.insert(component.component_type(), component);
    }

    #[inline]
    pub(crate) fn remove(&mut self, component_type: ComponentTypeId) -> Option<Box<dyn AnyComponent>> {
        self.components.remove(&component_type)
    }

    #[inline]
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = (ComponentTypeId, Box<dyn AnyComponent>)> + '_ {
        self.components.drain()
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field(
                "components",
                &self.components.values().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
