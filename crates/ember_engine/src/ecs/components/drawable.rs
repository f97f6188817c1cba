//! Drawable component for entities that can be rendered
//!
//! Marks an entity as renderable and carries the data the render system
//! needs to submit it as a draw command. Requires a `Transform` on the
//! same entity for the world matrix.

use crate::ecs::component::{Component, ComponentType};
use crate::foundation::math::Transform;

/// Handle referencing a material owned by the rendering backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

/// Handle referencing a mesh owned by the rendering backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub u32);

/// Component for entities that can be rendered
#[derive(Debug, Clone)]
pub struct Drawable {
    /// Mesh to draw
    pub mesh: MeshId,

    /// Material to use for rendering
    pub material: MaterialId,

    /// Whether this object is visible
    pub visible: bool,

    /// Rendering layer for sorting (higher values render later)
    pub render_layer: u8,
}

impl Drawable {
    /// Create a new visible drawable
    pub fn new(mesh: MeshId, material: MaterialId) -> Self {
        Self {
            mesh,
            material,
            visible: true,
            render_layer: 0,
        }
    }

    /// Create a drawable on a specific render layer
    pub fn with_layer(mesh: MeshId, material: MaterialId, render_layer: u8) -> Self {
        Self {
            mesh,
            material,
            visible: true,
            render_layer,
        }
    }

    /// Set visibility
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Check if this component should be rendered
    pub fn should_render(&self) -> bool {
        self.visible
    }
}

impl Component for Drawable {
    fn requires(&self) -> Vec<ComponentType> {
        vec![ComponentType::of::<Transform>()]
    }
}
