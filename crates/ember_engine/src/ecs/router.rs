//! Component routing
//!
//! Records which system types declared interest in which component types.
//! Edges are derived from the handler specs a system presents at
//! registration time; at entity registration the world consults this table
//! to fan components out to the interested systems' working lists.

use std::any::TypeId;
use std::collections::HashMap;

use super::component::ComponentType;

/// Component type → interested system types, deduplicated
#[derive(Default)]
pub struct ComponentRouter {
    routes: HashMap<TypeId, Vec<TypeId>>,
}

impl ComponentRouter {
    /// Create an empty router
    pub fn new() -> Self {
        Self::default()
    }

    /// Record routing edges for a system
    ///
    /// Re-registering the same system for a component type is a no-op, so
    /// a system appearing in the pipeline under several phases still
    /// receives each component once.
    pub fn register(&mut self, system: TypeId, components: &[ComponentType]) {
        for component in components {
            let systems = self.routes.entry(component.id).or_default();
            if !systems.contains(&system) {
                systems.push(system);
            }
        }
    }

    /// System types interested in the given component type
    pub fn systems_for(&self, component: TypeId) -> &[TypeId] {
        self.routes.get(&component).map_or(&[], Vec::as_slice)
    }

    /// Number of component types with at least one interested system
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Drop every routing edge
    pub fn clear(&mut self) {
        self.routes.clear();
    }
}
