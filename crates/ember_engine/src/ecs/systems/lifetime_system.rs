//! Lifetime countdown system
//!
//! Counts each routed `Lifetime` down with the frame delta and requests
//! removal of the owning entity through the command queue once it expires.
//! Removal takes effect between frames; the expired entity's components
//! are already excluded from dispatch for the rest of the current frame.

use crate::ecs::command::CommandQueue;
use crate::ecs::components::Lifetime;
use crate::ecs::handler::{handle, HandlerSpec};
use crate::ecs::{Entity, System};

/// System despawning entities whose lifetime has run out
#[derive(Default)]
pub struct LifetimeSystem {
    delta_time: f32,
    commands: CommandQueue,
    expired_total: u64,
}

impl System for LifetimeSystem {
    fn handlers(&self) -> Vec<HandlerSpec> {
        vec![handle(Self::age)]
    }

    fn connect(&mut self, commands: CommandQueue) {
        self.commands = commands;
    }

    fn tick_delta(&mut self, delta: f32) {
        self.delta_time = delta;
    }
}

impl LifetimeSystem {
    /// Total number of entities this system has expired
    pub fn expired_total(&self) -> u64 {
        self.expired_total
    }

    fn age(&mut self, entity: &Entity, lifetime: &mut Lifetime) {
        if lifetime.tick(self.delta_time) {
            log::debug!("{} expired, requesting removal", entity.id());
            self.expired_total += 1;
            self.commands.remove_entity(entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::pipeline::EngineRoot;
    use crate::ecs::World;

    #[test]
    fn test_expired_entity_is_despawned() {
        let mut world = World::new();
        assert!(world.register_after::<EngineRoot, LifetimeSystem>(None));

        let entity = Entity::new();
        entity.add_component(Lifetime::new(f32::MIN_POSITIVE));
        world.register_entity(&entity);
        assert_eq!(world.entity_count(), 1);

        // First frame has a zero delta; the second frame's delta, however
        // small, drives the near-zero lifetime over the edge.
        world.process_systems();
        world.process_systems();

        assert_eq!(world.entity_count(), 0);
        assert_eq!(world.working_count::<LifetimeSystem>(), 0);
        assert_eq!(world.with_system::<LifetimeSystem, _>(LifetimeSystem::expired_total), Some(1));
    }

    #[test]
    fn test_infinite_lifetime_survives() {
        let mut world = World::new();
        assert!(world.register_after::<EngineRoot, LifetimeSystem>(None));

        let entity = Entity::new();
        entity.add_component(Lifetime::infinite());
        world.register_entity(&entity);

        world.process_systems();
        world.process_systems();

        assert_eq!(world.entity_count(), 1);
    }
}
