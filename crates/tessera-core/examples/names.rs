use tessera_core::prelude::*;
use tessera_ecs::prelude::*;
use tessera_log::LevelFilter;

#[derive(Debug, Default, Component)]
struct Name(String);

#[derive(Debug, Default, Component)]
struct Id(String);

/// Prints the name of every named entity.
struct NameSystem;

impl System for NameSystem {
    fn update(&mut self, world: &mut World) {
        let query = world.query();
        for entity in query.query::<(Name,)>() {
            if let Some(name) = query.get::<Name>(entity) {
                println!("{}", name.0);
            }
        }
    }
}

/// Prints the id of every entity that has one.
struct IdSystem;

impl System for IdSystem {
    fn update(&mut self, world: &mut World) {
        let query = world.query();
        for entity in query.query::<(Id,)>() {
            if let Some(id) = query.get::<Id>(entity) {
                println!("{}", id.0);
            }
        }
    }
}

/// Destroys the entity stored in `Doomed` on the first tick after it was spawned.
#[derive(Resource)]
struct Doomed(EntityId);

struct Reaper {
    ticks: usize,
}

impl System for Reaper {
    fn update(&mut self, world: &mut World) {
        self.ticks += 1;
        if self.ticks == 1 {
            println!("================================");
            if let Some(doomed) = world.get_resource::<Doomed>() {
                world.commands().destroy(doomed.0);
            }
        }
    }
}

fn main() -> Result<(), CoreError> {
    let mut app = AppBuilder::new(LevelFilter::Info)?;
    app.add_system(NameSystem)
        .add_system(IdSystem)
        .add_system(Reaper { ticks: 0 })
        .with_ticks(2);

    let world = app.world_mut();
    for spawned in 0..3 {
        let name = world.create_with(Name("TestNameComponent".into()));
        let entity = if spawned == 0 {
            let id = world.create_with(Id("TestIDComponent".into()));
            world.spawn((name, id))
        } else {
            world.spawn((name,))
        };

        if let Some(entity) = entity {
            world.set_resource(Doomed(entity));
        }
    }

    app.run();
    Ok(())
}
