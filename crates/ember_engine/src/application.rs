//! Application trait and lifecycle management

use thiserror::Error;

use crate::engine::Engine;

/// Application lifecycle trait
///
/// Implement this trait to create a game or simulation using the engine.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once after the engine is initialized. Use this to register
    /// systems, set up factory blueprints, and activate the initial scene.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Update the application
    ///
    /// Called every frame before the world processes its systems.
    ///
    /// # Arguments
    /// * `engine` - Mutable reference to the engine
    /// * `delta_time` - Time since last frame in seconds
    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError>;

    /// Cleanup the application
    ///
    /// Called once when the engine is shutting down.
    fn cleanup(&mut self, _engine: &mut Engine) {}
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Initialization error
    #[error("application initialization failed: {0}")]
    InitializationFailed(String),

    /// Per-frame update error
    #[error("application update failed: {0}")]
    UpdateFailed(String),

    /// Application-specific error
    #[error("{0}")]
    Custom(String),
}
