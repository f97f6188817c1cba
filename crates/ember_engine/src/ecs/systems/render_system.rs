//! Render collection system
//!
//! Collects visible `Drawable` components into a frame-local draw queue:
//! the pre-pass clears the queue, dispatch submits one command per visible
//! drawable, and the post-pass sorts the batch and hands it to the
//! configured backend. Exposes both a phase-free and a phase-taking
//! handler so it can sit in the pipeline with or without a phase argument.

use crate::ecs::components::{Drawable, Transform};
use crate::ecs::handler::{handle, handle_with_phase, HandlerSpec};
use crate::ecs::phase::Phase;
use crate::ecs::{Entity, System};
use crate::render::{DrawCommand, DrawQueue, RenderBackend};

/// System collecting drawables and submitting them to the backend
#[derive(Default)]
pub struct RenderSystem {
    queue: DrawQueue,
    backend: Option<Box<dyn RenderBackend>>,
}

impl System for RenderSystem {
    fn handlers(&self) -> Vec<HandlerSpec> {
        vec![handle(Self::collect), handle_with_phase(Self::collect_phased)]
    }

    fn step(&mut self, _phase: Option<Phase>) {
        self.queue.clear();
    }

    fn after_step(&mut self, _phase: Option<Phase>) {
        self.queue.sort();
        if let Some(backend) = self.backend.as_deref_mut() {
            backend.present(self.queue.commands());
        }
    }
}

impl RenderSystem {
    /// Install the backend that receives each frame's batch
    pub fn set_backend(&mut self, backend: Box<dyn RenderBackend>) {
        self.backend = Some(backend);
    }

    /// Number of commands collected in the current pass
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    fn collect(&mut self, entity: &Entity, drawable: &mut Drawable) {
        self.submit(entity, drawable);
    }

    fn collect_phased(&mut self, entity: &Entity, drawable: &mut Drawable, phase: Phase) {
        // Only the render phase produces commands; other phases of the same
        // node are collection no-ops.
        if phase == Phase::Render {
            self.submit(entity, drawable);
        }
    }

    fn submit(&mut self, entity: &Entity, drawable: &Drawable) {
        if !drawable.should_render() {
            return;
        }
        let Some((matrix, depth)) =
            entity.with::<Transform, _>(|transform| (transform.matrix(), transform.position.z))
        else {
            log::debug!("{} is drawable but has no accessible transform", entity.id());
            return;
        };
        self.queue.submit(
            DrawCommand::new(drawable.mesh, drawable.material, matrix)
                .with_layer(drawable.render_layer)
                .with_depth(depth),
        );
    }
}
