//! Scene management
//!
//! A scene owns a set of entities and controls their membership in the
//! world's active registration set: activating a scene registers its
//! entities with the component router, deactivating removes them, and
//! switching scenes purges every system's working list first.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::ecs::{Entity, World};

static NEXT_SCENE_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque scene identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneId(u64);

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scene#{}", self.0)
    }
}

/// A named collection of entities
pub struct Scene {
    id: SceneId,
    name: String,
    entities: Vec<Entity>,
    active: bool,
}

impl Scene {
    /// Create a new inactive scene
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SceneId(NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed)),
            name: name.into(),
            entities: Vec::new(),
            active: false,
        }
    }

    /// The scene identifier
    pub fn id(&self) -> SceneId {
        self.id
    }

    /// The scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this scene's entities are registered with the world
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Number of entities owned by this scene
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Add an entity to this scene
    ///
    /// Sets the entity's scene back-reference; if the scene is active the
    /// entity is registered with the world immediately.
    pub fn spawn(&mut self, world: &mut World, entity: Entity) {
        entity.set_scene(Some(self.id));
        if self.active {
            world.register_entity(&entity);
        }
        self.entities.push(entity);
    }

    /// Remove an entity from this scene
    ///
    /// Returns `false` if the entity was not part of the scene.
    pub fn despawn(&mut self, world: &mut World, entity: &Entity) -> bool {
        let Some(position) = self.entities.iter().position(|owned| owned == entity) else {
            return false;
        };
        self.entities.remove(position);
        entity.set_scene(None);
        if self.active {
            world.remove_entity(entity);
        }
        true
    }

    /// Register every owned entity with the world
    pub fn activate(&mut self, world: &mut World) {
        if self.active {
            return;
        }
        log::info!("activating scene {} ({})", self.name, self.id);
        self.active = true;
        for entity in &self.entities {
            world.register_entity(entity);
        }
    }

    /// Remove every owned entity from the world
    pub fn deactivate(&mut self, world: &mut World) {
        if !self.active {
            return;
        }
        log::info!("deactivating scene {} ({})", self.name, self.id);
        self.active = false;
        for entity in &self.entities {
            world.remove_entity(entity);
        }
    }

    /// Make this the world's only active content
    ///
    /// Purges every system's working list, then activates this scene.
    pub fn switch_to(&mut self, world: &mut World) {
        world.purge_components();
        self.active = false;
        self.activate(world);
    }
}
