//! # Ember Engine
//!
//! A modular game engine runtime built around an ordered system pipeline.
//!
//! ## Features
//!
//! - **Ordered System Pipeline**: systems spliced before/after arbitrary
//!   anchors, with optional phase arguments per node
//! - **Component Routing**: components fan out to the systems that
//!   declared interest in them
//! - **Handler Dispatch**: per-system dispatch tables keyed by component
//!   type and phase arity
//! - **Entity Factory**: registered builders with component injection and
//!   positional argument resolution
//! - **Resilient Dispatch**: rejected attaches, dropped registrations, and
//!   faulting handlers are logged and absorbed, never fatal
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ember_engine::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         // Register systems and activate the initial scene
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
//!         // Per-frame application logic
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default();
//!     let mut app = MyApp;
//!     Engine::run(config, &mut app)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;

pub mod audio;
pub mod ecs;
pub mod foundation;
pub mod render;
pub mod scene;
pub mod scheduler;

mod application;
mod engine;

pub use application::{AppError, Application};
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        application::{AppError, Application},
        audio::{AudioBackend, PlaybackRequest},
        core::config::{EngineConfig, EngineFeatures},
        ecs::{
            components::{Drawable, Lifetime, MaterialId, MeshId, Motion, Transform},
            handle, handle_with_phase, Args, Component, ComponentType, EngineRoot, Entity,
            EntityId, HandlerSpec, Phase, System, World,
        },
        engine::{Engine, EngineError},
        foundation::{
            math::{Mat4, Quat, Vec2, Vec3},
            time::{Stopwatch, Timer},
        },
        render::{DrawCommand, DrawQueue, RenderBackend},
        scene::{Scene, SceneId},
        scheduler::{Scheduler, TaskId},
    };
}
