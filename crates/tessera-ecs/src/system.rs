use crate::{component::set::ComponentSet, entity::EntityId, world::World};

/// A system is the logical component of the ECS. Systems are owned by a world and run in the
/// order they were added.
pub trait System: 'static {
    /// Name of the system, used for debugging purposes.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Runs once when the world starts up.
    fn startup(&mut self, _: &mut World) {}

    /// Runs once per tick.
    fn update(&mut self, _: &mut World) {}
}

/// A system that operates on each entity holding the components in `Query`. Wrap it in
/// `ForEach` to add it to a world.
pub trait EntitySystem: 'static {
    type Query: ComponentSet;

    fn startup(&mut self, _: &mut World) {}

    fn update_entity(&mut self, world: &mut World, entity: EntityId);
}

/// Runs an `EntitySystem` over every match of its query.
///
/// # Note
/// The matches are collected before the first call, so entities spawned during the run are not
/// visited and entities destroyed directly during the run are skipped.
pub struct ForEach<S>(pub S);

impl<S: EntitySystem> System for ForEach<S> {
    fn name(&self) -> &'static str {
        std::any::type_name::<S>()
    }

    fn startup(&mut self, world: &mut World) {
        self.0.startup(world);
    }

    fn update(&mut self, world: &mut World) {
        let matches = world.query().query::<S::Query>();
        for entity in matches {
            if world.contains_entity(entity) {
                self.0.update_entity(world, entity);
            }
        }
    }
}
