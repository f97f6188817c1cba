//! Core engine implementation
//!
//! The engine wires the default system pipeline, owns the world and the
//! callback scheduler, and drives the main loop. Bootstrap is the one
//! place where failure is fatal: if the default systems cannot be wired
//! the constructor returns an error, releases what it built, and the
//! process exits through `main`.

use std::time::Duration;

use thiserror::Error;

use crate::application::Application;
use crate::core::config::{ConfigError, EngineConfig, EngineFeatures};
use crate::ecs::systems::{LifetimeSystem, MotionSystem, RenderSystem};
use crate::ecs::{EngineRoot, Phase, World};
use crate::foundation::time::Timer;
use crate::scheduler::Scheduler;

/// Main engine struct
///
/// The engine coordinates the world, the scheduler, and frame timing.
pub struct Engine {
    world: World,
    scheduler: Scheduler,
    timer: Timer,
    config: EngineConfig,
    running: bool,
}

impl Engine {
    /// Create a new engine instance
    ///
    /// Wires the default systems selected by the configuration. This is
    /// the fatal setup path: a failed default registration aborts
    /// construction instead of being absorbed.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        log::info!("initializing engine for {}", config.app_name);

        let mut world = World::new();
        Self::install_default_systems(&mut world, &config.features)?;
        let scheduler = Scheduler::new(Duration::from_millis(config.scheduler_warn_ms));

        Ok(Self {
            world,
            scheduler,
            timer: Timer::new(),
            config,
            running: true,
        })
    }

    /// Seed the pipeline with the configured default systems
    fn install_default_systems(
        world: &mut World,
        features: &EngineFeatures,
    ) -> Result<(), EngineError> {
        if features.motion && !world.register_after::<EngineRoot, MotionSystem>(None) {
            return Err(EngineError::SetupFailed("motion system registration".to_string()));
        }
        if features.lifetime {
            let registered = if features.motion {
                world.register_after::<MotionSystem, LifetimeSystem>(None)
            } else {
                world.register_after::<EngineRoot, LifetimeSystem>(None)
            };
            if !registered {
                return Err(EngineError::SetupFailed("lifetime system registration".to_string()));
            }
        }
        if features.render && !world.register_after::<EngineRoot, RenderSystem>(Some(Phase::Render))
        {
            return Err(EngineError::SetupFailed("render system registration".to_string()));
        }
        Ok(())
    }

    /// Run the engine main loop with the given application
    pub fn run<T: Application>(config: EngineConfig, app: &mut T) -> Result<(), EngineError> {
        let mut engine = Self::new(config)?;

        app.initialize(&mut engine)
            .map_err(|e| EngineError::ApplicationError(format!("initialization: {e}")))?;

        log::info!("starting main loop");

        while engine.running {
            engine.timer.update();
            let delta_time = engine.timer.delta_time();
            app.update(&mut engine, delta_time)
                .map_err(|e| EngineError::ApplicationError(format!("update: {e}")))?;
            engine.world.process_systems();
            engine.scheduler.update();
        }

        app.cleanup(&mut engine);
        log::info!("engine shutdown complete");
        Ok(())
    }

    /// Advance one frame without an application driver
    ///
    /// Useful for headless runs and tests.
    pub fn tick(&mut self) {
        self.timer.update();
        self.world.process_systems();
        self.scheduler.update();
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("engine shutdown requested");
        self.running = false;
    }

    /// Whether the main loop should keep running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Get the ECS world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get mutable access to the ECS world
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Get mutable access to the callback scheduler
    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    /// Get the engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the current frame delta time
    pub fn delta_time(&self) -> f32 {
        self.timer.delta_time()
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Irrecoverable bootstrap failure
    #[error("engine setup failed: {0}")]
    SetupFailed(String),

    /// Configuration error
    #[error(transparent)]
    ConfigError(#[from] ConfigError),

    /// Application error
    #[error("application error: {0}")]
    ApplicationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pipeline_wiring() {
        let engine = Engine::new(EngineConfig::default()).expect("engine");
        let nodes = engine.world().pipeline_nodes();
        let names: Vec<&str> = nodes
            .iter()
            .map(|(name, _)| name.rsplit("::").next().unwrap())
            .collect();
        assert_eq!(names, vec!["MotionSystem", "LifetimeSystem", "RenderSystem"]);
        assert_eq!(nodes[2].1, Some(Phase::Render));
    }

    #[test]
    fn test_features_disable_default_systems() {
        let mut config = EngineConfig::default();
        config.features.motion = false;
        config.features.render = false;

        let engine = Engine::new(config).expect("engine");
        assert_eq!(engine.world().pipeline_nodes().len(), 1);
    }

    #[test]
    fn test_tick_advances_frame() {
        let mut engine = Engine::new(EngineConfig::default()).expect("engine");
        engine.tick();
        engine.tick();
        assert!(engine.is_running());
    }

    #[test]
    fn test_quit_stops_loop() {
        struct OneFrame;
        impl Application for OneFrame {
            fn initialize(&mut self, _engine: &mut Engine) -> Result<(), crate::AppError> {
                Ok(())
            }
            fn update(&mut self, engine: &mut Engine, _delta: f32) -> Result<(), crate::AppError> {
                engine.quit();
                Ok(())
            }
        }

        let mut app = OneFrame;
        Engine::run(EngineConfig::default(), &mut app).expect("clean run");
    }
}
