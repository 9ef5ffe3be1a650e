use tessera_ecs::prelude::*;
use tessera_log::{info, LevelFilter};

use crate::{error::CoreError, plugin::Plugin};

/// Signals to the default runner that ticks should stop being run. Checked after every tick.
#[derive(Debug, Event, Copy, Clone)]
pub struct Stop;

pub struct App {
    pub world: World,
    /// Number of ticks to run. `None` runs until `Stop` is sent.
    ticks: Option<usize>,
    runner: fn(App),
}

pub struct AppBuilder {
    app: App,
}

impl Default for App {
    fn default() -> Self {
        Self::new(World::default())
    }
}

impl App {
    fn new(world: World) -> Self {
        Self {
            world,
            ticks: None,
            runner: default_runner,
        }
    }

    #[inline]
    pub fn builder(log_filter: LevelFilter) -> Result<AppBuilder, CoreError> {
        AppBuilder::new(log_filter)
    }

    /// Number of ticks the default runner will run, if limited.
    #[inline]
    pub fn ticks(&self) -> Option<usize> {
        self.ticks
    }

    /// Checks if a system has asked the app to stop.
    #[inline]
    pub fn stop_requested(&self) -> bool {
        self.world.event_reader::<Stop>().has()
    }

    pub fn run(&mut self) {
        let app = std::mem::take(self);
        let runner = app.runner;
        runner(app);
    }
}

/// Starts the world, ticks until the tick count is reached or `Stop` is sent, then shuts the
/// world down.
fn default_runner(mut app: App) {
    app.world.startup();

    let mut ticks = 0;
    while app.ticks.map_or(true, |limit| ticks < limit) && !app.stop_requested() {
        app.world.update();
        ticks += 1;
    }

    info!("stopping after {} ticks", ticks);
    app.world.shutdown();
}

impl AppBuilder {
    /// Initializes logging and creates an app with a default world.
    pub fn new(log_filter: LevelFilter) -> Result<Self, CoreError> {
        Self::with_settings(log_filter, EcsSettings::default())
    }

    /// Initializes logging and creates an app whose world uses the provided settings.
    pub fn with_settings(log_filter: LevelFilter, settings: EcsSettings) -> Result<Self, CoreError> {
        tessera_log::init(log_filter)?;
        Ok(AppBuilder {
            app: App::new(World::with_settings(settings)?),
        })
    }

    #[inline]
    pub fn app(&self) -> &App {
        &self.app
    }

    #[inline]
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.app.world
    }

    pub fn add_resource(&mut self, resource: impl Resource) -> &mut Self {
        self.app.world.set_resource(resource);
        self
    }

    /// Adds a system that runs once before the first tick.
    pub fn add_startup_system(&mut self, system: impl System) -> &mut Self {
        self.app.world.add_startup_system(system);
        self
    }

    pub fn add_system(&mut self, system: impl System) -> &mut Self {
        self.app.world.add_update_system(system);
        self
    }

    pub fn add_plugin(&mut self, mut plugin: impl Plugin) -> &mut Self {
        plugin.build(self);
        self
    }

    /// Limits the default runner to a number of ticks.
    pub fn with_ticks(&mut self, ticks: usize) -> &mut Self {
        self.app.ticks = Some(ticks);
        self
    }

    /// A runner is the function that is used when running your app.
    pub fn with_runner(&mut self, runner: fn(App)) -> &mut Self {
        self.app.runner = runner;
        self
    }

    /// Takes the configured app out of the builder, leaving a default one behind.
    pub fn build(&mut self) -> App {
        std::mem::take(&mut self.app)
    }

    pub fn run(&mut self) {
        self.app.run();
    }
}
