use smallvec::SmallVec;

use crate::{
    component::{info::ComponentInfo, set::ComponentSet, Component},
    entity::{Entity, EntityId},
    identity::ComponentTypeId,
    world::World,
};

/// Read only view of a world used to find entities by the components they hold.
#[derive(Clone, Copy)]
pub struct Query<'w> {
    world: &'w World,
}

impl<'w> Query<'w> {
    #[inline]
    pub(crate) fn new(world: &'w World) -> Self {
        Self { world }
    }

    /// Entities holding every component type in `S`.
    pub fn query<S: ComponentSet>(&self) -> Vec<EntityId> {
        let mut ids = SmallVec::<[ComponentTypeId; 8]>::new();
        for type_id in S::type_ids() {
            match self.world.component_types().lookup_type_id(type_id) {
                Some(id) => ids.push(id),
                None => return Vec::default(),
            }
        }
        self.query_ids(&ids)
    }

    /// Entities holding every listed component type. An empty list, or a type that was never
    /// registered, gives an empty result.
    ///
    /// The type held by the fewest entities drives the search. Every entity it holds is then
    /// tested against the containers of the remaining types.
    pub fn query_ids(&self, component_types: &[ComponentTypeId]) -> Vec<EntityId> {
        let mut infos = SmallVec::<[&ComponentInfo; 8]>::new();
        for component_type in component_types {
            match self.world.component_info(*component_type) {
                Some(info) => infos.push(info),
                None => return Vec::default(),
            }
        }

        let smallest = match infos.iter().min_by_key(|info| info.len()) {
            Some(info) => *info,
            None => return Vec::default(),
        };

        smallest
            .density()
            .iter()
            .copied()
            .filter(|entity| match self.world.entity(*entity) {
                Some(container) => component_types.iter().all(|ty| container.has(*ty)),
                None => false,
            })
            .collect()
    }

    #[inline]
    pub fn entity(&self, entity: EntityId) -> Option<&'w Entity> {
        self.world.entity(entity)
    }

    /// Does the entity hold a `C`?
    #[inline]
    pub fn has<C: Component>(&self, entity: EntityId) -> bool {
        match self.world.component_type::<C>() {
            Some(component_type) => self.has_id(entity, component_type),
            None => false,
        }
    }

    #[inline]
    pub fn has_id(&self, entity: EntityId, component_type: ComponentTypeId) -> bool {
        self.world
            .entity(entity)
            .map_or(false, |container| container.has(component_type))
    }

    #[inline]
    pub fn get<C: Component>(&self, entity: EntityId) -> Option<&'w C> {
        self.world.get_component(entity)
    }

    /// Does the entity hold every component type in `S`? Vacuously `true` for the empty set as
    /// long as the entity exists.
    pub fn contains_all<S: ComponentSet>(&self, entity: EntityId) -> bool {
        let container = match self.world.entity(entity) {
            Some(container) => container,
            None => return false,
        };

        S::type_ids().into_iter().all(|type_id| {
            self.world
                .component_types()
                .lookup_type_id(type_id)
                .map_or(false, |component_type| container.has(component_type))
        })
    }
}
