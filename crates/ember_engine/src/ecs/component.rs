//! Component trait and shared component references
//!
//! Components are typed data bags owned by entities. The runtime works with
//! them through [`ComponentRef`] trait objects; concrete access goes through
//! `Any` downcasting.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::rc::Rc;

/// Support downcasting trait objects to concrete types.
pub trait AsAny: Any {
    /// Borrow self as `Any`
    fn as_any(&self) -> &dyn Any;

    /// Mutably borrow self as `Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Identifies a concrete component type, carrying its display name alongside
/// the `TypeId` so rejections and dispatch misses can be logged usefully.
#[derive(Debug, Clone, Copy, Eq)]
pub struct ComponentType {
    /// The concrete type's id
    pub id: TypeId,
    /// The concrete type's name, for diagnostics
    pub name: &'static str,
}

impl ComponentType {
    /// Describe the component type `C`
    pub fn of<C: Component>() -> Self {
        Self {
            id: TypeId::of::<C>(),
            name: std::any::type_name::<C>(),
        }
    }
}

impl PartialEq for ComponentType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl std::hash::Hash for ComponentType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Trait for component data attached to entities
///
/// `requires` declares the component types that must already be present on
/// an entity before an instance of this type may be attached; attaches that
/// violate a requirement are rejected and logged, leaving the entity
/// unchanged.
pub trait Component: AsAny {
    /// Component types this type depends on
    fn requires(&self) -> Vec<ComponentType> {
        Vec::new()
    }

    /// The concrete type's name, for diagnostics
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Shared handle to a component instance
///
/// Single-threaded reference counting: an entity holds the primary handle
/// and each interested system's working list holds a clone.
pub type ComponentRef = Rc<RefCell<dyn Component>>;

/// Wrap a component value into a shared handle
pub fn component_ref<C: Component>(component: C) -> ComponentRef {
    Rc::new(RefCell::new(component))
}

/// Identity of a component instance, independent of its type
///
/// Used to key pending-removal sets: two handles to the same instance
/// compare equal, two instances of the same type do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentKey(*const ());

impl ComponentKey {
    /// The identity of the instance behind `component`
    pub fn of(component: &ComponentRef) -> Self {
        Self(Rc::as_ptr(component).cast::<()>())
    }
}

/// Describe the concrete type behind a shared component handle
///
/// Borrows the component briefly; not for use while the instance is
/// mutably borrowed.
pub fn runtime_type(component: &ComponentRef) -> ComponentType {
    let component = component.borrow();
    ComponentType {
        id: (*component).type_id(),
        name: component.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Health(f32);
    impl Component for Health {}

    #[derive(Debug, Default)]
    struct Armor;
    impl Component for Armor {
        fn requires(&self) -> Vec<ComponentType> {
            vec![ComponentType::of::<Health>()]
        }
    }

    #[test]
    fn test_component_type_equality_ignores_name() {
        assert_eq!(ComponentType::of::<Health>(), ComponentType::of::<Health>());
        assert_ne!(ComponentType::of::<Health>(), ComponentType::of::<Armor>());
    }

    #[test]
    fn test_runtime_type_matches_static_type() {
        let component = component_ref(Health(10.0));
        assert_eq!(runtime_type(&component), ComponentType::of::<Health>());
    }

    #[test]
    fn test_component_key_is_instance_identity() {
        let a = component_ref(Health(1.0));
        let b = component_ref(Health(1.0));
        assert_eq!(ComponentKey::of(&a), ComponentKey::of(&a.clone()));
        assert_ne!(ComponentKey::of(&a), ComponentKey::of(&b));
    }

    #[test]
    fn test_requires_metadata() {
        let armor = Armor;
        assert_eq!(armor.requires(), vec![ComponentType::of::<Health>()]);
    }
}
