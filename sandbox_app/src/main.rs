//! Headless sandbox exercising the engine runtime
//!
//! Registers a factory blueprint for drifting debris entities, activates a
//! scene full of them, schedules a delayed ambient sound, and runs a fixed
//! number of frames before shutting down cleanly.

use std::path::Path;
use std::time::Duration;

use ember_engine::audio::{play_in, SharedAudioBackend};
use ember_engine::ecs::systems::RenderSystem;
use ember_engine::prelude::*;

/// Factory kind for drifting debris
struct Debris;

/// Render backend that just reports batch sizes
struct ConsoleRenderer;

impl RenderBackend for ConsoleRenderer {
    fn present(&mut self, commands: &[DrawCommand]) {
        log::debug!("presenting {} draw commands", commands.len());
    }
}

/// Audio backend that reports playback requests
struct ConsoleAudio;

impl AudioBackend for ConsoleAudio {
    fn play(&mut self, request: &PlaybackRequest) {
        log::info!("playing {} (volume {:.2})", request.sound, request.volume);
    }
}

struct SandboxApp {
    scene: Scene,
    audio: SharedAudioBackend,
    frames_left: u32,
}

impl SandboxApp {
    fn new(frames: u32) -> Self {
        Self {
            scene: Scene::new("debris-field"),
            audio: std::rc::Rc::new(std::cell::RefCell::new(ConsoleAudio)),
            frames_left: frames,
        }
    }
}

impl Application for SandboxApp {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        engine
            .world()
            .with_system_mut::<RenderSystem, _>(|render| {
                render.set_backend(Box::new(ConsoleRenderer));
            })
            .ok_or_else(|| AppError::InitializationFailed("render system missing".to_string()))?;

        // Debris: a transform (positional or default), a drifting motion
        // with speed from the argument list, and a supplied drawable.
        engine.world_mut().factory_mut().add_builder::<Debris>(|ctx| {
            ctx.component_arg_or_default::<Transform>();
            let speed: f32 = ctx.arg_or(0.5);
            ctx.provide(Motion::with_velocity(Vec3::new(0.0, 0.0, -speed)));
            ctx.provide(Drawable::new(MeshId(1), MaterialId(1)));
            Ok(Entity::new())
        });

        for index in 0..8 {
            let position = Vec3::new(index as f32 * 2.0 - 8.0, 0.0, -10.0);
            let args = Args::new()
                .with(Transform::from_position(position))
                .with(0.5 + index as f32 * 0.1);
            let Some(entity) = engine.world().try_create::<Debris>(args) else {
                continue;
            };
            entity.add_component(Lifetime::new(2.0 + index as f32));
            self.scene.spawn(engine.world_mut(), entity);
        }
        self.scene.activate(engine.world_mut());
        log::info!("spawned {} debris entities", self.scene.entity_count());

        play_in(
            engine.scheduler_mut(),
            &self.audio,
            Duration::from_millis(250),
            PlaybackRequest::new("ambient-hum").with_volume(0.4).looped(),
        );

        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
        self.frames_left = self.frames_left.saturating_sub(1);
        if self.frames_left == 0 {
            log::info!(
                "sandbox finished with {} active entities",
                engine.world().entity_count()
            );
            engine.quit();
        }
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        self.scene.deactivate(engine.world_mut());
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config_path = Path::new("sandbox.toml");
    let config = if config_path.exists() {
        EngineConfig::from_file(config_path)?
    } else {
        EngineConfig::default()
    };

    let mut app = SandboxApp::new(240);
    Engine::run(config, &mut app)?;
    Ok(())
}
