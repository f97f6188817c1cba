//! Rendering interface boundary
//!
//! The engine core does not create windows or issue draw calls; it only
//! produces [`DrawCommand`] batches. A concrete backend implements
//! [`RenderBackend`] and consumes the batch once per frame. Backends are
//! pure data consumers and take no part in pipeline ordering.

use crate::ecs::components::{MaterialId, MeshId};
use crate::foundation::math::Mat4;

/// One draw request produced by the render system
#[derive(Debug, Clone)]
pub struct DrawCommand {
    /// Mesh to draw
    pub mesh: MeshId,

    /// World matrix for the draw
    pub transform: Mat4,

    /// Material to bind
    pub material: MaterialId,

    /// Rendering layer (higher values render later)
    pub layer: u8,

    /// View depth used for sorting
    pub depth: f32,
}

impl DrawCommand {
    /// Create a draw command
    pub fn new(mesh: MeshId, material: MaterialId, transform: Mat4) -> Self {
        Self {
            mesh,
            transform,
            material,
            layer: 0,
            depth: 0.0,
        }
    }

    /// Set the rendering layer
    pub fn with_layer(mut self, layer: u8) -> Self {
        self.layer = layer;
        self
    }

    /// Set the sorting depth
    pub fn with_depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }
}

/// Frame-local queue of draw commands
///
/// Cleared at the start of a render pass, filled during component
/// dispatch, sorted and handed to the backend at the end.
#[derive(Default)]
pub struct DrawQueue {
    commands: Vec<DrawCommand>,
}

impl DrawQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all queued commands
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Append a draw command
    pub fn submit(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Sort by layer, then front-to-back within a layer
    pub fn sort(&mut self) {
        self.commands
            .sort_by(|a, b| a.layer.cmp(&b.layer).then(a.depth.total_cmp(&b.depth)));
    }

    /// The queued commands in submission (or sorted) order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of queued commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Backend consuming a frame's draw commands
pub trait RenderBackend {
    /// Present one frame's worth of commands
    fn present(&mut self, commands: &[DrawCommand]);
}
