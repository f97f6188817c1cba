//! Deferred world commands
//!
//! Handlers run while the world is mid-dispatch, so they cannot mutate
//! working lists directly. Systems that need to remove entities or
//! components push commands onto this queue instead; the world drains it
//! after each pipeline node, flagging the targets for removal so later
//! systems in the same tick already skip them.

use std::any::TypeId;
use std::cell::RefCell;
use std::rc::Rc;

use super::component::Component;
use super::entity::Entity;

/// A deferred mutation request
pub(crate) enum Command {
    /// Remove one component from an entity
    RemoveComponent {
        /// Target entity
        entity: Entity,
        /// Concrete type of the component to remove
        component: TypeId,
    },
    /// Remove an entity and all of its components
    RemoveEntity {
        /// Target entity
        entity: Entity,
    },
}

/// Handle to the world's command queue
///
/// Cloning is cheap; every clone pushes into the same queue. Systems
/// receive a handle through [`crate::ecs::System::connect`].
#[derive(Clone, Default)]
pub struct CommandQueue {
    queue: Rc<RefCell<Vec<Command>>>,
}

impl CommandQueue {
    /// Create a new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Request removal of the entity's component of type `C`
    pub fn remove_component<C: Component>(&self, entity: &Entity) {
        self.queue.borrow_mut().push(Command::RemoveComponent {
            entity: entity.clone(),
            component: TypeId::of::<C>(),
        });
    }

    /// Request removal of the entity and all of its components
    pub fn remove_entity(&self, entity: &Entity) {
        self.queue
            .borrow_mut()
            .push(Command::RemoveEntity { entity: entity.clone() });
    }

    /// Whether any commands are pending
    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Take all pending commands
    pub(crate) fn drain(&self) -> Vec<Command> {
        self.queue.borrow_mut().drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Marker;
    impl Component for Marker {}

    #[test]
    fn test_clones_share_the_queue() {
        let queue = CommandQueue::new();
        let clone = queue.clone();
        let entity = Entity::new();
        clone.remove_entity(&entity);
        assert!(!queue.is_empty());
        assert_eq!(queue.drain().len(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_drain_preserves_order() {
        let queue = CommandQueue::new();
        let entity = Entity::new();
        queue.remove_component::<Marker>(&entity);
        queue.remove_entity(&entity);
        let commands = queue.drain();
        assert_eq!(commands.len(), 2);
        assert!(matches!(commands[0], Command::RemoveComponent { .. }));
        assert!(matches!(commands[1], Command::RemoveEntity { .. }));
    }
}
