//! Entity implementation
//!
//! An entity is an identity plus an ordered list of components. Entities
//! have reference semantics: the handle is a cheap clone, so working lists
//! and handlers can reach an entity's sibling components without holding a
//! back-pointer inside each component.

use std::any::TypeId;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::component::{component_ref, runtime_type, Component, ComponentRef, ComponentType};
use super::error::EcsError;
use crate::scene::SceneId;

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

struct ComponentEntry {
    ty: ComponentType,
    component: ComponentRef,
}

struct EntityInner {
    id: EntityId,
    components: Vec<ComponentEntry>,
    scene: Option<SceneId>,
}

/// Handle to an entity
///
/// Cloning the handle does not clone the entity; both handles refer to the
/// same identity and component list.
#[derive(Clone)]
pub struct Entity {
    inner: Rc<RefCell<EntityInner>>,
}

impl Entity {
    /// Create a new empty entity with a fresh identity
    pub fn new() -> Self {
        let id = EntityId(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed));
        Self {
            inner: Rc::new(RefCell::new(EntityInner {
                id,
                components: Vec::new(),
                scene: None,
            })),
        }
    }

    /// Get the entity identifier
    pub fn id(&self) -> EntityId {
        self.inner.borrow().id
    }

    /// The scene this entity currently belongs to, if any
    pub fn scene(&self) -> Option<SceneId> {
        self.inner.borrow().scene
    }

    /// Record the owning scene (cleared with `None` on despawn)
    pub fn set_scene(&self, scene: Option<SceneId>) {
        self.inner.borrow_mut().scene = scene;
    }

    /// Attach a component value to this entity
    ///
    /// Fails without mutating the entity if the entity already holds an
    /// instance of the same concrete type, or if any type named by the
    /// component's `requires` declaration is absent. Failures are reported
    /// through the logging collaborator; the return value tells the caller
    /// whether the attach happened.
    pub fn add_component<C: Component>(&self, component: C) -> bool {
        let ty = ComponentType::of::<C>();
        if self.has_type(ty.id) {
            log::error!("{}: {}", self.id(), EcsError::DuplicateComponent { component: ty.name });
            return false;
        }
        if !self.check_requirements(&component.requires(), ty.name) {
            return false;
        }
        self.push_entry(ty, component_ref(component));
        true
    }

    /// Attach an already-shared component handle
    ///
    /// This is the untyped attach path used by the entity factory's
    /// auto-attach step; it performs the `requires` check but not the
    /// one-instance-per-type check. The handle must reference a freshly
    /// built instance that no other entity owns.
    pub fn add_shared(&self, component: ComponentRef) -> bool {
        let ty = runtime_type(&component);
        let requirements = component.borrow().requires();
        if !self.check_requirements(&requirements, ty.name) {
            return false;
        }
        self.push_entry(ty, component);
        true
    }

    fn check_requirements(&self, requirements: &[ComponentType], component: &'static str) -> bool {
        for required in requirements {
            if !self.has_type(required.id) {
                log::error!(
                    "{}: {}",
                    self.id(),
                    EcsError::MissingRequirement {
                        component,
                        required: required.name,
                    }
                );
                return false;
            }
        }
        true
    }

    fn push_entry(&self, ty: ComponentType, component: ComponentRef) {
        self.inner.borrow_mut().components.push(ComponentEntry { ty, component });
    }

    /// Whether the entity holds a component of type `C`
    pub fn has<C: Component>(&self) -> bool {
        self.has_type(TypeId::of::<C>())
    }

    /// Whether the entity holds a component of the given type id
    pub fn has_type(&self, id: TypeId) -> bool {
        self.inner.borrow().components.iter().any(|entry| entry.ty.id == id)
    }

    /// Shared handle to the first component of type `C`, if any
    pub fn find<C: Component>(&self) -> Option<ComponentRef> {
        self.find_type(TypeId::of::<C>())
    }

    /// Shared handle to the first component with the given type id, if any
    pub fn find_type(&self, id: TypeId) -> Option<ComponentRef> {
        self.inner
            .borrow()
            .components
            .iter()
            .find(|entry| entry.ty.id == id)
            .map(|entry| entry.component.clone())
    }

    /// Read the first component of type `C`
    ///
    /// Returns `None` if the entity has no such component or it is
    /// currently mutably borrowed (e.g. it is the component being handled).
    pub fn with<C: Component, R>(&self, f: impl FnOnce(&C) -> R) -> Option<R> {
        let component = self.find::<C>()?;
        let guard = component.try_borrow().ok()?;
        let concrete = guard.as_any().downcast_ref::<C>()?;
        Some(f(concrete))
    }

    /// Mutate the first component of type `C`
    ///
    /// Returns `None` under the same conditions as [`Entity::with`].
    pub fn with_mut<C: Component, R>(&self, f: impl FnOnce(&mut C) -> R) -> Option<R> {
        let component = self.find::<C>()?;
        let mut guard = component.try_borrow_mut().ok()?;
        let concrete = guard.as_any_mut().downcast_mut::<C>()?;
        Some(f(concrete))
    }

    /// Number of components currently attached
    pub fn component_count(&self) -> usize {
        self.inner.borrow().components.len()
    }

    /// Snapshot of the attached components in insertion order
    pub fn components(&self) -> Vec<(ComponentType, ComponentRef)> {
        self.inner
            .borrow()
            .components
            .iter()
            .map(|entry| (entry.ty, entry.component.clone()))
            .collect()
    }

    /// Detach and return the first component with the given type id
    pub(crate) fn remove_type(&self, id: TypeId) -> Option<ComponentRef> {
        let mut inner = self.inner.borrow_mut();
        let position = inner.components.iter().position(|entry| entry.ty.id == id)?;
        Some(inner.components.remove(position).component)
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Entity {}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id())
            .field("components", &self.component_count())
            .finish()
    }
}
