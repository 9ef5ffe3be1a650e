use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{prelude::*, sparse_set::MAX_PAGED_ID};

#[derive(Component, Debug, Default, Clone, PartialEq, Eq)]
struct Name(String);

#[derive(Component, Debug, Default, Copy, Clone, PartialEq, Eq)]
struct Id(u32);

#[derive(Component, Debug, Default, Copy, Clone, PartialEq, Eq)]
struct Velocity {
    x: i32,
    y: i32,
}

#[derive(Resource, Debug, Default, Copy, Clone, PartialEq, Eq)]
struct Counter(u32);

#[derive(Event, Debug, Clone, PartialEq, Eq)]
struct Ping(u32);

static TRACKED_DESTROYS: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Default)]
struct Tracked(u32);

impl Component for Tracked {
    const NAME: &'static str = "Tracked";

    fn on_destroy(&mut self) {
        TRACKED_DESTROYS.fetch_add(1, Ordering::SeqCst);
    }
}

static DOOMED_DESTROYS: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Default)]
struct Doomed;

impl Component for Doomed {
    const NAME: &'static str = "Doomed";

    fn on_destroy(&mut self) {
        DOOMED_DESTROYS.fetch_add(1, Ordering::SeqCst);
    }
}

static SHARED_DESTROYS: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Default, PartialEq, Eq)]
struct Shared(u32);

impl Component for Shared {
    const NAME: &'static str = "Shared";

    fn on_destroy(&mut self) {
        SHARED_DESTROYS.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct Hooks {
    created: Arc<AtomicUsize>,
    destroyed: Arc<AtomicUsize>,
}

impl Resource for Hooks {
    const NAME: &'static str = "Hooks";

    fn on_create(&mut self) {
        self.created.fetch_add(1, Ordering::SeqCst);
    }

    fn on_destroy(&mut self) {
        self.destroyed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Every entity set entry has a matching component in the entity container and vice versa.
fn assert_consistent(world: &World) {
    for info in world.component_infos() {
        for entity in info.entities() {
            let container = world.entity(entity).expect("entity set holds a dead entity");
            assert!(container.has(info.component_type()), "{} missing {}", entity, info.name());
        }
    }

    for container in world.entities().iter() {
        for component_type in container.component_types() {
            let info = world.component_info(component_type).unwrap();
            assert!(info.contains(container.id()));
        }
    }
}

#[test]
fn sparse_set_matches_hash_set() {
    let mut rng = StdRng::seed_from_u64(0x7e55e7a);
    let mut set = SparseSet::<u64>::try_with_page_size(8).unwrap();
    let mut model = HashSet::new();

    for _ in 0..10_000 {
        let id = rng.gen_range(0..256);
        if rng.gen_bool(0.6) {
            assert_eq!(set.add(id), model.insert(id));
        } else {
            assert_eq!(set.remove(id), model.remove(&id));
        }
        assert_eq!(set.len(), model.len());
    }

    for id in 0..256 {
        assert_eq!(set.contains(id), model.contains(&id));
    }

    for (i, id) in set.iter().enumerate() {
        assert_eq!(set.index_of(id), Some(i));
    }
}

#[test]
fn sparse_set_swap_remove() {
    let mut set = SparseSet::<u32>::new();
    for id in [5, 9, 2, 7] {
        assert!(set.add(id));
    }

    assert!(set.remove(9));
    assert_eq!(set.density(), &[5, 7, 2]);
    assert_eq!(set.index_of(7), Some(1));
    assert!(!set.contains(9));

    // Removing the last member moves nothing
    assert!(set.remove(2));
    assert_eq!(set.density(), &[5, 7]);
}

#[test]
fn sparse_set_idempotent() {
    let mut set = SparseSet::<u32>::new();
    assert!(set.add(3));
    assert!(!set.add(3));
    assert_eq!(set.len(), 1);

    assert!(set.remove(3));
    assert!(!set.remove(3));
    assert!(!set.remove(1_000));
    assert!(set.is_empty());
}

#[test]
fn sparse_set_lazy_pages() {
    let mut set = SparseSet::<u32>::try_with_page_size(4).unwrap();
    assert_eq!(set.allocated_pages(), 0);

    set.add(17);
    assert_eq!(set.allocated_pages(), 1);
    assert!(!set.contains(16));
    assert!(!set.contains(1));

    set.clear();
    assert!(set.is_empty());
    assert_eq!(set.allocated_pages(), 0);
    assert!(!set.contains(17));
}

#[test]
fn sparse_set_overflow_ids() {
    let mut set = SparseSet::<u64>::new();
    let big = MAX_PAGED_ID + 1;

    assert!(set.add(big));
    assert!(set.add(u64::MAX));
    assert!(set.add(1));
    assert_eq!(set.allocated_pages(), 1);

    assert!(set.remove(big));
    assert_eq!(set.index_of(u64::MAX), Some(1));
    assert_eq!(set.index_of(1), Some(0));
    assert!(!set.contains(big));
}

#[test]
fn zero_page_size_rejected() {
    assert!(matches!(
        SparseSet::<u32>::try_with_page_size(0),
        Err(EcsError::ZeroPageSize)
    ));
    assert!(matches!(
        World::with_settings(EcsSettings { page_size: 0 }),
        Err(EcsError::ZeroPageSize)
    ));
}

#[test]
fn settings_from_ron() {
    let settings = EcsSettings::from_ron("(page_size: 64)").unwrap();
    assert_eq!(settings.page_size, 64);

    let settings = EcsSettings::from_ron("()").unwrap();
    assert_eq!(settings, EcsSettings::default());

    assert!(matches!(
        EcsSettings::from_ron("(page_size: 0)"),
        Err(EcsError::ZeroPageSize)
    ));
    assert!(matches!(
        EcsSettings::from_ron("(page_size: "),
        Err(EcsError::Settings(_))
    ));

    let world = World::with_settings(EcsSettings::from_ron("(page_size: 4)").unwrap()).unwrap();
    assert_eq!(world.settings().page_size, 4);
}

#[test]
fn type_ids_are_sequential() {
    let mut world = World::new();
    let name = world.register_component::<Name>();
    let id = world.register_component::<Id>();

    assert_eq!(name.raw(), 1);
    assert_eq!(id.raw(), 2);
    assert_eq!(world.register_component::<Name>(), name);
    assert_eq!(world.component_type::<Velocity>(), None);
    assert_eq!(world.component_types().len(), 2);
}

#[test]
fn entity_ids_are_unique() {
    let allocator = Arc::new(EntityAllocator::new());
    let mut a = World::with_allocator(EcsSettings::default(), allocator.clone()).unwrap();
    let mut b = World::with_allocator(EcsSettings::default(), allocator.clone()).unwrap();

    let c1 = a.create_component::<Id>();
    let e1 = a.spawn((c1,)).unwrap();
    let c2 = b.create_component::<Id>();
    let e2 = b.spawn((c2,)).unwrap();

    assert_ne!(e1, e2);
    assert!(!e1.is_null());
    assert_eq!(allocator.allocated(), 2);
}

#[test]
fn pool_reuses_instances() {
    let mut world = World::new();

    let component = world.create_with(Id(1));
    let instance = component.instance();
    let entity = world.spawn((component,)).unwrap();
    assert_eq!(world.pool::<Id>().unwrap().active_len(), 1);

    assert!(world.destroy_entity(entity));
    let pool = world.pool::<Id>().unwrap();
    assert_eq!(pool.active_len(), 0);
    assert_eq!(pool.free_len(), 1);

    let component = world.create_component::<Id>();
    assert_eq!(component.instance(), instance);
    // Recycled instances keep their old state
    assert_eq!(*component, Id(1));
    world.spawn((component,)).unwrap();

    let pool = world.pool::<Id>().unwrap();
    assert_eq!(pool.active_len(), 1);
    assert_eq!(pool.free_len(), 0);
}

#[test]
fn unattached_component() {
    let mut world = World::new();
    let component = world.create_component::<Velocity>();
    let component_type = world.component_type::<Velocity>().unwrap();

    let info = world.component_info(component_type).unwrap();
    assert_eq!(info.active_len(), 1);
    assert!(info.is_empty());
    assert!(world.query().query::<(Velocity,)>().is_empty());

    assert!(world.destroy_component(component));
    let info = world.component_info(component_type).unwrap();
    assert_eq!(info.active_len(), 0);
    assert_eq!(info.free_len(), 1);
}

#[test]
fn component_hooks_run_on_destroy() {
    let mut world = World::new();
    let before = TRACKED_DESTROYS.load(Ordering::SeqCst);

    let first = world.create_with(Tracked(1));
    let entity = world.spawn((first,)).unwrap();

    // Replacing a component destroys the old one
    let second = world.create_with(Tracked(2));
    assert!(world.add_components(entity, (second,)));
    assert_eq!(TRACKED_DESTROYS.load(Ordering::SeqCst), before + 1);
    assert_eq!(world.get_component::<Tracked>(entity).unwrap().0, 2);

    assert!(world.remove_component::<Tracked>(entity));
    assert_eq!(TRACKED_DESTROYS.load(Ordering::SeqCst), before + 2);
    assert!(!world.remove_component::<Tracked>(entity));
    assert_eq!(TRACKED_DESTROYS.load(Ordering::SeqCst), before + 2);
}

#[test]
fn structural_operations_keep_index_in_step() {
    let mut world = World::new();

    let name = world.create_with(Name("a".into()));
    let id = world.create_with(Id(1));
    let a = world.spawn((name, id)).unwrap();
    assert_consistent(&world);

    let id = world.create_with(Id(2));
    let b = world.spawn((id,)).unwrap();
    assert_consistent(&world);

    let velocity = world.create_with(Velocity { x: 1, y: 2 });
    assert!(world.add_components(b, (velocity,)));
    assert_consistent(&world);

    assert!(world.remove_components::<(Id, Velocity)>(b));
    assert_consistent(&world);
    assert!(world.entity(b).unwrap().is_empty());
    assert!(world.contains_entity(b));

    // Unregistered and missing types are skipped
    assert!(world.remove_components::<(Name, Tracked)>(a));
    assert_consistent(&world);
    assert!(world.query().has::<Id>(a));
    assert!(!world.query().has::<Name>(a));

    assert!(world.destroy_entity(a));
    assert!(!world.destroy_entity(a));
    assert_consistent(&world);
    assert_eq!(world.entity_count(), 1);
}

#[test]
fn attach_to_missing_entity() {
    let mut world = World::new();
    let id = world.create_component::<Id>();
    let entity = world.spawn((id,)).unwrap();
    world.destroy_entity(entity);

    let id = world.create_component::<Id>();
    assert!(!world.add_components(entity, (id,)));
    assert!(!world.remove_components::<(Id,)>(entity));
    assert_consistent(&world);

    let pool = world.pool::<Id>().unwrap();
    assert_eq!(pool.active_len(), 0);
    assert_eq!(pool.free_len(), 1);
}

#[test]
fn spawn_empty_bundle() {
    let mut world = World::new();
    assert_eq!(world.spawn(()), None);
    assert_eq!(world.entity_count(), 0);
}

#[test]
fn component_access() {
    let mut world = World::new();
    let velocity = world.create_with(Velocity { x: 1, y: 1 });
    let entity = world.spawn((velocity,)).unwrap();

    world.get_component_mut::<Velocity>(entity).unwrap().x = 10;
    assert_eq!(
        world.query().get::<Velocity>(entity),
        Some(&Velocity { x: 10, y: 1 })
    );
    assert_eq!(world.get_component::<Name>(entity), None);
}

#[test]
fn query_intersection() {
    let mut world = World::new();

    let name = world.create_with(Name("a".into()));
    let a = world.spawn((name,)).unwrap();

    let name = world.create_with(Name("b".into()));
    let id = world.create_with(Id(2));
    let b = world.spawn((name, id)).unwrap();

    let id = world.create_with(Id(3));
    let c = world.spawn((id,)).unwrap();

    let query = world.query();

    let mut names = query.query::<(Name,)>();
    names.sort();
    assert_eq!(names, vec![a, b]);

    let mut ids = query.query::<(Id,)>();
    ids.sort();
    assert_eq!(ids, vec![b, c]);

    assert_eq!(query.query::<(Name, Id)>(), vec![b]);
    assert_eq!(query.query::<(Id, Name)>(), vec![b]);
    assert!(query.query::<(Name, Velocity)>().is_empty());
    assert!(query.query::<()>().is_empty());
    assert!(query.query_ids(&[]).is_empty());

    assert!(query.contains_all::<(Name, Id)>(b));
    assert!(!query.contains_all::<(Name, Id)>(a));
    assert!(query.contains_all::<()>(c));
    assert!(!query.contains_all::<()>(EntityId::NULL));
}

#[test]
fn deferred_destruction() {
    let mut world = World::new();
    let name = world.create_with(Name("x".into()));
    let id = world.create_with(Id(1));
    let entity = world.spawn((name, id)).unwrap();

    let commands = world.commands().clone();
    commands.destroy(entity);
    commands.destroy(EntityId::NULL);

    // Nothing happens until the queue is applied
    assert!(world.contains_entity(entity));
    assert_eq!(world.query().query::<(Name,)>(), vec![entity]);
    assert_eq!(world.pending_commands(), 2);

    assert_eq!(world.apply_commands(), 2);
    assert!(!world.contains_entity(entity));
    assert!(world.query().query::<(Name,)>().is_empty());
    assert_eq!(world.pool::<Name>().unwrap().free_len(), 1);
    assert_eq!(world.pool::<Id>().unwrap().free_len(), 1);
    assert_consistent(&world);
}

#[test]
fn resources_are_singletons() {
    let mut world = World::new();
    assert!(!world.has_resource::<Counter>());

    world.set_resource(Counter(1));
    world.set_resource(Counter(2));
    assert_eq!(world.get_resource::<Counter>(), Some(&Counter(2)));
    assert_eq!(world.resources().len(), 1);

    world.get_resource_mut::<Counter>().unwrap().0 += 1;
    assert_eq!(world.remove_resource::<Counter>(), Some(Counter(3)));
    assert_eq!(world.remove_resource::<Counter>(), None);
    assert!(!world.has_resource::<Counter>());
}

#[test]
fn resource_hooks() {
    let created = Arc::new(AtomicUsize::new(0));
    let destroyed = Arc::new(AtomicUsize::new(0));
    let hooks = || Hooks {
        created: created.clone(),
        destroyed: destroyed.clone(),
    };

    let mut world = World::new();
    world.set_resource(hooks());
    assert_eq!(created.load(Ordering::SeqCst), 1);

    // Replacing destroys the old resource first
    world.set_resource(hooks());
    assert_eq!(created.load(Ordering::SeqCst), 2);
    assert_eq!(destroyed.load(Ordering::SeqCst), 1);

    assert!(world.remove_resource::<Hooks>().is_some());
    assert_eq!(destroyed.load(Ordering::SeqCst), 2);

    world.set_resource(hooks());
    world.shutdown();
    world.shutdown();
    assert_eq!(created.load(Ordering::SeqCst), 3);
    assert_eq!(destroyed.load(Ordering::SeqCst), 3);
}

#[test]
fn event_slots() {
    let mut world = World::new();
    assert!(world.events::<Ping>().is_none());
    assert!(!world.event_reader::<Ping>().has());

    world.event_writer::<Ping>().send(Ping(1));
    world.event_writer::<Ping>().send(Ping(2));
    assert_eq!(world.event_reader::<Ping>().get(), Some(&Ping(2)));

    assert_eq!(world.events_mut::<Ping>().take(), Some(Ping(2)));
    assert!(!world.events::<Ping>().unwrap().has());

    world.events_mut::<Ping>().set(Ping(3));
    world.events_mut::<Ping>().clear();
    assert_eq!(world.event_reader::<Ping>().get(), None);
}

struct Movement;

impl EntitySystem for Movement {
    type Query = (Velocity, Id);

    fn update_entity(&mut self, world: &mut World, entity: EntityId) {
        let velocity = *world.get_component::<Velocity>(entity).unwrap();
        world.get_component_mut::<Id>(entity).unwrap().0 += velocity.x as u32;
    }
}

#[derive(Default)]
struct Reaper {
    ticks: u32,
}

impl System for Reaper {
    fn startup(&mut self, world: &mut World) {
        world.set_resource(Counter(0));
    }

    fn update(&mut self, world: &mut World) {
        self.ticks += 1;
        world.get_resource_mut::<Counter>().unwrap().0 = self.ticks;

        let query = world.query();
        for entity in query.query::<(Id,)>() {
            if query.get::<Id>(entity).unwrap().0 >= 3 {
                world.commands().destroy(entity);
            }
        }
    }
}

#[test]
fn systems_run_in_order() {
    let mut world = World::new();
    world
        .add_startup_system(Reaper::default())
        .add_update_system(ForEach(Movement))
        .add_update_system(Reaper::default());

    let velocity = world.create_with(Velocity { x: 1, y: 0 });
    let id = world.create_with(Id(0));
    let moving = world.spawn((velocity, id)).unwrap();

    let id = world.create_with(Id(0));
    let still = world.spawn((id,)).unwrap();

    world.startup();
    assert_eq!(world.get_resource::<Counter>(), Some(&Counter(0)));

    world.update();
    world.update();
    assert_eq!(world.get_component::<Id>(moving), Some(&Id(2)));
    assert_eq!(world.get_resource::<Counter>(), Some(&Counter(2)));

    // Movement runs before the reaper, which queues the destruction
    world.update();
    assert!(!world.contains_entity(moving));
    assert!(world.contains_entity(still));
    assert_eq!(world.get_resource::<Counter>(), Some(&Counter(3)));
    assert_consistent(&world);
}

#[test]
fn shutdown_is_idempotent() {
    let mut world = World::new();

    for _ in 0..4 {
        let doomed = world.create_component::<Doomed>();
        world.spawn((doomed,));
    }
    world.set_resource(Counter(1));
    world.event_writer::<Ping>().send(Ping(1));

    world.shutdown();
    assert_eq!(world.entity_count(), 0);
    assert!(world.resources().is_empty());
    assert!(world.events::<Ping>().is_none());
    assert!(world.component_infos().next().is_none());
    assert_eq!(DOOMED_DESTROYS.load(Ordering::SeqCst), 4);

    world.shutdown();
    assert_eq!(world.entity_count(), 0);
    assert_eq!(DOOMED_DESTROYS.load(Ordering::SeqCst), 4);
}

#[test]
fn duplicate_type_in_bundle() {
    let mut world = World::new();
    let first = world.create_with(Id(1));
    let second = world.create_with(Id(2));
    let entity = world.spawn((first, second)).unwrap();

    assert_eq!(world.get_component::<Id>(entity), Some(&Id(2)));
    assert_eq!(world.entity(entity).unwrap().len(), 1);

    let pool = world.pool::<Id>().unwrap();
    assert_eq!(pool.active_len(), 1);
    assert_eq!(pool.free_len(), 1);
    assert_consistent(&world);
}

#[test]
fn instances_stay_in_their_world() {
    let mut a = World::new();
    let mut b = World::new();

    // Same registration order gives both worlds the same type id and instance ids
    let ours = b.create_with(Shared(1));
    let theirs = a.create_with(Shared(2));
    assert_eq!(ours.component_type(), theirs.component_type());
    assert_eq!(ours.instance(), theirs.instance());
    assert_ne!(ours.pool(), theirs.pool());

    let entity = b.spawn((ours,)).unwrap();

    // A bundle made only of foreign instances creates nothing
    assert_eq!(b.spawn((theirs,)), None);
    assert_eq!(b.entity_count(), 1);

    let theirs = a.create_with(Shared(3));
    assert!(b.add_components(entity, (theirs,)));
    assert_eq!(b.get_component::<Shared>(entity), Some(&Shared(1)));
    assert_consistent(&b);

    assert!(b.destroy_entity(entity));
    assert_eq!(SHARED_DESTROYS.load(Ordering::SeqCst), 1);

    let pool = b.pool::<Shared>().unwrap();
    assert_eq!(pool.active_len(), 0);
    assert_eq!(pool.free_len(), 1);
    assert_eq!(*b.create_component::<Shared>(), Shared(1));

    // A foreign instance can't be handed back to another world's pool either
    let theirs = a.create_component::<Shared>();
    assert!(!b.destroy_component(theirs));
    assert_eq!(SHARED_DESTROYS.load(Ordering::SeqCst), 1);
    assert_eq!(b.pool::<Shared>().unwrap().free_len(), 0);
}

#[test]
fn spawn_rejected_bundle() {
    let mut a = World::new();
    let mut b = World::new();

    let id = a.create_with(Id(1));
    let name = a.create_with(Name("a".into()));
    assert_eq!(b.spawn((id, name)), None);
    assert_eq!(b.entity_count(), 0);
    assert!(b.query().query::<(Id,)>().is_empty());
    assert_consistent(&b);
}
