pub mod entities;

use std::{num::NonZeroUsize, sync::Arc};

use rustc_hash::FxHashMap;
use tessera_log::{debug, trace, warn};

use crate::{
    commands::{Command, CommandQueue, Commands},
    component::{
        info::ComponentInfo,
        pool::Pool,
        set::{Bundle, ComponentSet},
        Component, Pooled,
    },
    entity::{Entity, EntityId},
    error::EcsError,
    event::{Event, EventReader, EventSlot, EventWriter, Events},
    identity::{ComponentTypeId, EntityAllocator, TypeRegistry},
    query::Query,
    resource::{Resource, Resources},
    settings::EcsSettings,
    system::System,
    world::entities::Entities,
};

/// A world contains the data of the ECS. It is used to create entities and add and remove
/// components from those entities. It also owns the resources, event mailboxes and systems.
///
/// # Lifecycle
/// `startup` runs once, `update` runs once per tick and `shutdown` tears everything down.
/// Component types are registered lazily the first time they are used.
pub struct World {
    settings: EcsSettings,
    page_size: NonZeroUsize,
    component_types: TypeRegistry<ComponentTypeId>,
    /// Pool and entity set of every registered component type.
    components: FxHashMap<ComponentTypeId, ComponentInfo>,
    resources: Resources,
    entities: Entities,
    commands: CommandQueue,
    events: Events,
    startup_systems: Vec<Box<dyn System>>,
    update_systems: Vec<Box<dyn System>>,
}

impl Default for World {
    fn default() -> Self {
        Self::build(EcsSettings::default(), Arc::default())
    }
}

impl World {
    pub fn new() -> World {
        World::default()
    }

    pub fn with_settings(settings: EcsSettings) -> Result<World, EcsError> {
        settings.validate()?;
        Ok(Self::build(settings, Arc::default()))
    }

    /// Creates a world that takes its entity ids from a shared allocator.
    pub fn with_allocator(
        settings: EcsSettings,
        allocator: Arc<EntityAllocator>,
    ) -> Result<World, EcsError> {
        settings.validate()?;
        Ok(Self::build(settings, allocator))
    }

    fn build(settings: EcsSettings, allocator: Arc<EntityAllocator>) -> World {
        World {
            page_size: settings
                .page_size()
                .unwrap_or(crate::sparse_set::DEFAULT_PAGE_SIZE),
            settings,
            component_types: TypeRegistry::default(),
            components: FxHashMap::default(),
            resources: Resources::default(),
            entities: Entities::new(allocator),
            commands: CommandQueue::default(),
            events: Events::default(),
            startup_systems: Vec::default(),
            update_systems: Vec::default(),
        }
    }

    #[inline]
    pub fn settings(&self) -> &EcsSettings {
        &self.settings
    }

    #[inline]
    pub fn entities(&self) -> &Entities {
        &self.entities
    }

    #[inline]
    pub fn component_types(&self) -> &TypeRegistry<ComponentTypeId> {
        &self.component_types
    }

    /// Id of `C` if it has been registered.
    #[inline]
    pub fn component_type<C: Component>(&self) -> Option<ComponentTypeId> {
        self.component_types.lookup::<C>()
    }

    /// Registers `C` if needed and returns its id.
    #[inline]
    pub fn register_component<C: Component>(&mut self) -> ComponentTypeId {
        self.get_or_create_component_info::<C>().component_type()
    }

    /// Gets the pool and entity set of `C`, creating them on first use.
    pub fn get_or_create_component_info<C: Component>(&mut self) -> &mut ComponentInfo {
        let component_type = self.component_types.get_id::<C>();
        let page_size = self.page_size;
        self.components.entry(component_type).or_insert_with(|| {
            debug!("registered component `{}` as {}", C::NAME, component_type);
            ComponentInfo::new::<C>(component_type, page_size)
        })
    }

    #[inline]
    pub fn component_info(&self, component_type: ComponentTypeId) -> Option<&ComponentInfo> {
        self.components.get(&component_type)
    }

    pub fn component_infos(&self) -> impl Iterator<Item = &ComponentInfo> {
        self.components.values()
    }

    #[inline]
    pub fn pool<C: Component>(&self) -> Option<&Pool<C>> {
        self.component_info(self.component_type::<C>()?)?.pool()
    }

    /// Takes an instance of `C` from its pool. The instance is not attached to anything until it
    /// is spawned or added to an entity.
    pub fn create_component<C: Component>(&mut self) -> Pooled<C> {
        self.get_or_create_component_info::<C>()
            .pool_mut::<C>()
            .expect("component info holds the pool of another type")
            .create()
    }

    /// Takes an instance of `C` from its pool and overwrites it with `value`.
    pub fn create_with<C: Component>(&mut self, value: C) -> Pooled<C> {
        let mut component = self.create_component::<C>();
        component.set(value);
        component
    }

    /// Hands an instance that was never attached back to its pool.
    pub fn destroy_component<C: Component>(&mut self, component: Pooled<C>) -> bool {
        self.get_or_create_component_info::<C>()
            .pool_mut::<C>()
            .expect("component info holds the pool of another type")
            .destroy(component)
    }

    /// Creates an entity holding the components of `bundle`. An empty bundle, or one whose
    /// components were all rejected, creates nothing and returns `None`.
    pub fn spawn<B: Bundle>(&mut self, bundle: B) -> Option<EntityId> {
        if B::LEN == 0 {
            return None;
        }

        let entity = self.entities.create();
        bundle.attach_to(self, entity);

        let attached = self.entities.get(entity).map_or(0, Entity::len);
        if attached == 0 {
            self.entities.remove(entity);
            return None;
        }

        trace!("spawned {} with {} components", entity, attached);
        Some(entity)
    }

    /// Attaches the components of `bundle` to an existing entity. A component replaces, and
    /// destroys, any component of the same type the entity already holds.
    ///
    /// Returns `false` if the entity does not exist, in which case the components go back to
    /// their pools.
    pub fn add_components<B: Bundle>(&mut self, entity: EntityId, bundle: B) -> bool {
        let exists = self.entities.contains(entity);
        bundle.attach_to(self, entity);
        exists
    }

    /// Detaches and destroys the components of the types in `S`. Types the entity doesn't hold
    /// are skipped. Returns `false` if the entity does not exist.
    pub fn remove_components<S: ComponentSet>(&mut self, entity: EntityId) -> bool {
        if !self.entities.contains(entity) {
            return false;
        }

        for type_id in S::type_ids() {
            if let Some(component_type) = self.component_types.lookup_type_id(type_id) {
                self.detach(entity, component_type);
            }
        }
        true
    }

    /// Detaches and destroys one component. Returns `false` if the entity didn't hold it.
    pub fn remove_component<C: Component>(&mut self, entity: EntityId) -> bool {
        match self.component_type::<C>() {
            Some(component_type) => self.detach(entity, component_type),
            None => false,
        }
    }

    /// Destroys an entity and all of its components right away.
    ///
    /// # Note
    /// Prefer `Commands::destroy` from within systems. Destroying entities directly while another
    /// system iterates over a query result that contains them is the caller's problem.
    pub fn destroy_entity(&mut self, id: EntityId) -> bool {
        let mut entity = match self.entities.remove(id) {
            Some(entity) => entity,
            None => return false,
        };

        for (component_type, component) in entity.drain() {
            if let Some(info) = self.components.get_mut(&component_type) {
                info.destroy_component(component);
                info.remove_entity(id);
            }
        }

        trace!("destroyed {}", id);
        true
    }

    #[inline]
    pub fn contains_entity(&self, id: EntityId) -> bool {
        self.entities.contains(id)
    }

    #[inline]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    #[inline]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn get_component<C: Component>(&self, entity: EntityId) -> Option<&C> {
        self.entities
            .get(entity)?
            .get(self.component_type::<C>()?)
    }

    pub fn get_component_mut<C: Component>(&mut self, entity: EntityId) -> Option<&mut C> {
        let component_type = self.component_type::<C>()?;
        self.entities.get_mut(entity)?.get_mut(component_type)
    }

    /// Read access for finding entities and their components.
    #[inline]
    pub fn query(&self) -> Query<'_> {
        Query::new(self)
    }

    /// Command buffer of this world. Clone it to keep a handle.
    #[inline]
    pub fn commands(&self) -> &Commands {
        self.commands.commands()
    }

    /// Number of commands waiting to be applied.
    #[inline]
    pub fn pending_commands(&self) -> usize {
        self.commands.pending()
    }

    /// Applies every queued command. Returns how many were applied.
    pub fn apply_commands(&mut self) -> usize {
        let mut applied = 0;
        while let Some(command) = self.commands.next() {
            match command {
                Command::Destroy(entity) => {
                    if !self.destroy_entity(entity) {
                        debug!("skipped deferred destruction of missing {}", entity);
                    }
                }
            }
            applied += 1;
        }
        applied
    }

    #[inline]
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Stores a resource right away, replacing the one of the same type if there is one.
    #[inline]
    pub fn set_resource<R: Resource>(&mut self, resource: R) {
        self.resources.add(resource);
    }

    /// Removes a resource right away, running its destroy hook.
    #[inline]
    pub fn remove_resource<R: Resource>(&mut self) -> Option<R> {
        self.resources.remove::<R>()
    }

    #[inline]
    pub fn has_resource<R: Resource>(&self) -> bool {
        self.resources.contains::<R>()
    }

    #[inline]
    pub fn get_resource<R: Resource>(&self) -> Option<&R> {
        self.resources.get::<R>()
    }

    #[inline]
    pub fn get_resource_mut<R: Resource>(&mut self) -> Option<&mut R> {
        self.resources.get_mut::<R>()
    }

    /// Mailbox of `E`. `None` if nothing has ever been sent.
    #[inline]
    pub fn events<E: Event>(&self) -> Option<&EventSlot<E>> {
        self.events.slot::<E>()
    }

    #[inline]
    pub fn event_reader<E: Event>(&self) -> EventReader<'_, E> {
        EventReader::new(self.events.slot::<E>())
    }

    #[inline]
    pub fn event_writer<E: Event>(&mut self) -> EventWriter<'_, E> {
        EventWriter::new(self.events.slot_mut::<E>())
    }

    /// Mailbox of `E`, created on first use.
    #[inline]
    pub fn events_mut<E: Event>(&mut self) -> &mut EventSlot<E> {
        self.events.slot_mut::<E>()
    }

    /// Adds a system that runs once during `startup`.
    pub fn add_startup_system(&mut self, system: impl System) -> &mut Self {
        self.startup_systems.push(Box::new(system));
        self
    }

    /// Adds a system that runs on every `update`. Systems run in the order they were added.
    pub fn add_update_system(&mut self, system: impl System) -> &mut Self {
        self.update_systems.push(Box::new(system));
        self
    }

    /// Runs every startup system once, then applies queued commands.
    pub fn startup(&mut self) {
        let mut systems = std::mem::take(&mut self.startup_systems);
        for system in &mut systems {
            trace!("starting up `{}`", system.name());
            system.startup(self);
        }
        self.restore_systems(systems, false);
        self.apply_commands();
    }

    /// Runs every update system once, then applies queued commands.
    pub fn update(&mut self) {
        let mut systems = std::mem::take(&mut self.update_systems);
        for system in &mut systems {
            trace!("updating `{}`", system.name());
            system.update(self);
        }
        self.restore_systems(systems, true);
        self.apply_commands();
    }

    /// Destroys every entity and resource, running their destroy hooks, and drops all component
    /// pools, event mailboxes, systems and pending commands. Calling it again does nothing.
    pub fn shutdown(&mut self) {
        let ids: Vec<_> = self.entities.ids().collect();
        for id in ids {
            self.destroy_entity(id);
        }

        self.resources.clear();
        self.components.clear();
        self.entities.clear();
        self.events.clear();
        self.commands.clear();
        self.startup_systems.clear();
        self.update_systems.clear();
        debug!("world shut down");
    }

    /// Puts systems taken out for a run back in front of any added during it.
    fn restore_systems(&mut self, mut systems: Vec<Box<dyn System>>, update: bool) {
        let list = if update {
            &mut self.update_systems
        } else {
            &mut self.startup_systems
        };
        systems.append(list);
        *list = systems;
    }

    /// Attaches a component to an entity, destroying the component of the same type it replaces.
    /// If the entity doesn't exist the component goes back to its pool.
    pub(crate) fn attach<C: Component>(&mut self, entity: EntityId, component: Pooled<C>) {
        let component_type = self.register_component::<C>();
        let info = self
            .components
            .get_mut(&component_type)
            .expect("component info registered above");

        let owned = info
            .pool::<C>()
            .map_or(false, |pool| pool.owns(&component));
        if !owned {
            warn!(
                "dropped `{}` created by another world while attaching to {}",
                C::NAME,
                entity
            );
            return;
        }

        let container = match self.entities.get_mut(entity) {
            Some(container) => container,
            None => {
                warn!("attached `{}` to missing {}", C::NAME, entity);
                info.destroy_component(component.into_boxed());
                return;
            }
        };

        if let Some(old) = container.remove(component_type) {
            info.destroy_component(old);
            info.remove_entity(entity);
        }

        container.insert(component.into_boxed());
        info.add_entity(entity);
    }

    /// Detaches and destroys a component. Returns `false` if there was nothing to detach.
    fn detach(&mut self, entity: EntityId, component_type: ComponentTypeId) -> bool {
        let component = match self
            .entities
            .get_mut(entity)
            .and_then(|container| container.remove(component_type))
        {
            Some(component) => component,
            None => return false,
        };

        if let Some(info) = self.components.get_mut(&component_type) {
            info.destroy_component(component);
            info.remove_entity(entity);
        }
        true
    }
}
