//! Handler registration and per-system dispatch tables
//!
//! A system declares which component types it processes by returning
//! [`HandlerSpec`] entries from [`crate::ecs::System::handlers`]. The specs
//! are read once at registration time and materialized into a
//! [`DispatchTable`] keyed by (component type, has-phase-argument); the
//! same entries double as the routing edges recorded by the
//! [`crate::ecs::ComponentRouter`].

use std::any::TypeId;
use std::collections::HashMap;
use std::rc::Rc;

use super::component::{Component, ComponentRef, ComponentType};
use super::entity::Entity;
use super::error::EcsError;
use super::phase::Phase;
use super::system::System;

/// Type-erased handler invocation
///
/// Downcasts the system and the component back to their concrete types and
/// calls the registered function. Failures are reported as values so the
/// dispatch loop can log and continue.
pub(crate) type HandlerFn =
    Rc<dyn Fn(&mut dyn System, &Entity, &ComponentRef, Option<Phase>) -> Result<(), EcsError>>;

/// One handler entry declared by a system
pub struct HandlerSpec {
    pub(crate) component: ComponentType,
    pub(crate) takes_phase: bool,
    pub(crate) invoke: HandlerFn,
}

/// Declare a handler for components of type `C` without a phase argument
///
/// The handler receives the owning entity handle alongside the component so
/// it can reach sibling components.
pub fn handle<S: System, C: Component>(f: fn(&mut S, &Entity, &mut C)) -> HandlerSpec {
    let component = ComponentType::of::<C>();
    HandlerSpec {
        component,
        takes_phase: false,
        invoke: Rc::new(move |system, entity, target, _phase| {
            let (system, mut guard) = prepare::<S>(system, target, component)?;
            let concrete = guard
                .as_any_mut()
                .downcast_mut::<C>()
                .ok_or(EcsError::HandlerFault {
                    system: std::any::type_name::<S>(),
                    component: component.name,
                    reason: "component type mismatch",
                })?;
            f(system, entity, concrete);
            Ok(())
        }),
    }
}

/// Declare a handler for components of type `C` that takes the node's phase
pub fn handle_with_phase<S: System, C: Component>(
    f: fn(&mut S, &Entity, &mut C, Phase),
) -> HandlerSpec {
    let component = ComponentType::of::<C>();
    HandlerSpec {
        component,
        takes_phase: true,
        invoke: Rc::new(move |system, entity, target, phase| {
            let phase = phase.ok_or(EcsError::HandlerFault {
                system: std::any::type_name::<S>(),
                component: component.name,
                reason: "phase argument missing",
            })?;
            let (system, mut guard) = prepare::<S>(system, target, component)?;
            let concrete = guard
                .as_any_mut()
                .downcast_mut::<C>()
                .ok_or(EcsError::HandlerFault {
                    system: std::any::type_name::<S>(),
                    component: component.name,
                    reason: "component type mismatch",
                })?;
            f(system, entity, concrete, phase);
            Ok(())
        }),
    }
}

/// Downcast the system and borrow the target component for a handler call
fn prepare<'a, S: System>(
    system: &'a mut dyn System,
    target: &'a ComponentRef,
    component: ComponentType,
) -> Result<(&'a mut S, std::cell::RefMut<'a, dyn Component>), EcsError> {
    let system = system
        .as_any_mut()
        .downcast_mut::<S>()
        .ok_or(EcsError::HandlerFault {
            system: std::any::type_name::<S>(),
            component: component.name,
            reason: "system type mismatch",
        })?;
    let guard = target.try_borrow_mut().map_err(|_| EcsError::HandlerFault {
        system: std::any::type_name::<S>(),
        component: component.name,
        reason: "component already borrowed",
    })?;
    Ok((system, guard))
}

/// Per-system handler table, built once at registration time
///
/// Lookup is keyed by the component's concrete type and whether the
/// pipeline node carries a phase argument, so a system may expose both a
/// phase-taking and a phase-free handler for the same component type.
pub struct DispatchTable {
    entries: HashMap<(TypeId, bool), HandlerSpec>,
    routed: Vec<ComponentType>,
}

impl DispatchTable {
    /// Build a table from the specs a system declared
    ///
    /// Duplicate (component, phase-arity) entries keep the first
    /// declaration; later ones are dropped with a warning.
    pub fn from_specs(specs: Vec<HandlerSpec>, system: &'static str) -> Self {
        let mut entries: HashMap<(TypeId, bool), HandlerSpec> = HashMap::new();
        let mut routed: Vec<ComponentType> = Vec::new();
        for spec in specs {
            if !routed.contains(&spec.component) {
                routed.push(spec.component);
            }
            let key = (spec.component.id, spec.takes_phase);
            if entries.contains_key(&key) {
                log::warn!(
                    "{} declared more than one handler for {} (phase argument: {}); keeping the first",
                    system,
                    spec.component.name,
                    spec.takes_phase
                );
                continue;
            }
            entries.insert(key, spec);
        }
        Self { entries, routed }
    }

    /// Resolve the handler for a component type and phase arity
    pub(crate) fn resolve(&self, component: TypeId, with_phase: bool) -> Option<&HandlerSpec> {
        self.entries.get(&(component, with_phase))
    }

    /// Component types this table handles, in declaration order, deduplicated
    pub fn routed(&self) -> &[ComponentType] {
        &self.routed
    }

    /// Number of handler entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
