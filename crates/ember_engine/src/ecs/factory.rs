//! Entity factory
//!
//! Builds entities for registered *kinds*. A kind carries an ordered list
//! of builder candidates (constructor equivalents) plus an optional
//! zero-argument fallback. Each candidate draws its inputs from a
//! [`BuildContext`], which resolves them in priority order: injected fresh
//! components, then caller-supplied positional arguments, then declared
//! defaults. Component-typed inputs are auto-attached to the built entity.
//!
//! Construction failure is never signalled by a panic or an error crossing
//! the factory boundary: candidates are tried in order, failures are
//! logged, and `try_create` returns `None` when everything is exhausted.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::rc::Rc;

use super::component::{component_ref, Component, ComponentRef};
use super::entity::Entity;
use super::error::EcsError;

/// Positional arguments passed to [`EntityFactory::try_create`]
#[derive(Default)]
pub struct Args {
    values: Vec<Box<dyn Any>>,
}

impl Args {
    /// No arguments
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    pub fn with<T: 'static>(mut self, value: T) -> Self {
        self.values.push(Box::new(value));
        self
    }

    /// Number of arguments supplied
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no arguments were supplied
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Input resolver handed to each builder candidate
///
/// Positional arguments are cloned out rather than moved, and an argument
/// is only marked consumed for the candidate using it, so a failed
/// candidate leaves the full argument set for the next one.
pub struct BuildContext<'a> {
    args: &'a Args,
    used: Vec<usize>,
    attach: Vec<ComponentRef>,
}

impl<'a> BuildContext<'a> {
    fn new(args: &'a Args) -> Self {
        Self {
            args,
            used: Vec::new(),
            attach: Vec::new(),
        }
    }

    /// Synthesize a fresh default instance of component `C`
    ///
    /// The instance is marked for auto-attach; the returned handle lets the
    /// builder configure it before the entity is assembled.
    pub fn inject<C: Component + Default>(&mut self) -> ComponentRef {
        let component = component_ref(C::default());
        self.attach.push(component.clone());
        component
    }

    /// Mark a builder-constructed component for auto-attach
    pub fn provide<C: Component>(&mut self, component: C) -> ComponentRef {
        let component = component_ref(component);
        self.attach.push(component.clone());
        component
    }

    /// Consume the next unused positional argument of component type `C`
    ///
    /// The component is marked for auto-attach.
    pub fn component_arg<C: Component + Clone>(&mut self) -> Result<ComponentRef, EcsError> {
        let value: C = self.take()?;
        let component = component_ref(value);
        self.attach.push(component.clone());
        Ok(component)
    }

    /// Like [`BuildContext::component_arg`], falling back to `C::default()`
    /// when no matching argument was supplied
    pub fn component_arg_or_default<C: Component + Clone + Default>(&mut self) -> ComponentRef {
        match self.take::<C>() {
            Ok(value) => {
                let component = component_ref(value);
                self.attach.push(component.clone());
                component
            }
            Err(_) => self.inject::<C>(),
        }
    }

    /// Consume the next unused positional argument of type `T`
    pub fn arg<T: Clone + 'static>(&mut self) -> Result<T, EcsError> {
        self.take()
    }

    /// Like [`BuildContext::arg`], falling back to the given default
    pub fn arg_or<T: Clone + 'static>(&mut self, default: T) -> T {
        self.take().unwrap_or(default)
    }

    fn take<T: Clone + 'static>(&mut self) -> Result<T, EcsError> {
        for (index, value) in self.args.values.iter().enumerate() {
            if self.used.contains(&index) {
                continue;
            }
            if let Some(value) = value.downcast_ref::<T>() {
                self.used.push(index);
                return Ok(value.clone());
            }
        }
        Err(EcsError::MissingArgument {
            expected: std::any::type_name::<T>(),
        })
    }

    /// Attach every component this context produced to the built entity
    fn attach_to(&self, entity: &Entity) {
        for component in &self.attach {
            // Rejections (failed requires checks) are logged by the entity.
            entity.add_shared(component.clone());
        }
    }
}

type BuilderFn = Rc<dyn Fn(&mut BuildContext<'_>) -> Result<Entity, EcsError>>;
type FallbackFn = Rc<dyn Fn() -> Entity>;

struct Blueprint {
    name: &'static str,
    builders: Vec<BuilderFn>,
    fallback: Option<FallbackFn>,
}

/// Factory resolving registered builders per entity kind
#[derive(Default)]
pub struct EntityFactory {
    blueprints: HashMap<TypeId, Blueprint>,
}

impl EntityFactory {
    /// Create an empty factory
    pub fn new() -> Self {
        Self::default()
    }

    fn blueprint_mut<K: 'static>(&mut self) -> &mut Blueprint {
        self.blueprints
            .entry(TypeId::of::<K>())
            .or_insert_with(|| Blueprint {
                name: std::any::type_name::<K>(),
                builders: Vec::new(),
                fallback: None,
            })
    }

    /// Append a builder candidate for kind `K`
    ///
    /// Candidates are tried in registration order.
    pub fn add_builder<K: 'static>(
        &mut self,
        builder: impl Fn(&mut BuildContext<'_>) -> Result<Entity, EcsError> + 'static,
    ) {
        self.blueprint_mut::<K>().builders.push(Rc::new(builder));
    }

    /// Register the zero-argument fallback for kind `K`
    ///
    /// Tried only after every builder candidate has failed.
    pub fn set_fallback<K: 'static>(&mut self, fallback: impl Fn() -> Entity + 'static) {
        self.blueprint_mut::<K>().fallback = Some(Rc::new(fallback));
    }

    /// Whether a blueprint exists for kind `K`
    pub fn has_kind<K: 'static>(&self) -> bool {
        self.blueprints.contains_key(&TypeId::of::<K>())
    }

    /// Build an entity of kind `K`
    ///
    /// Tries each builder candidate in order with a fresh [`BuildContext`];
    /// the first success has its component inputs auto-attached and is
    /// returned. Candidate failures are logged and absorbed. Returns `None`
    /// after the fallback (if any) has also been exhausted.
    pub fn try_create<K: 'static>(&self, args: Args) -> Option<Entity> {
        let Some(blueprint) = self.blueprints.get(&TypeId::of::<K>()) else {
            log::error!("no blueprint registered for kind {}", std::any::type_name::<K>());
            return None;
        };

        for (index, builder) in blueprint.builders.iter().enumerate() {
            let mut context = BuildContext::new(&args);
            match builder(&mut context) {
                Ok(entity) => {
                    context.attach_to(&entity);
                    return Some(entity);
                }
                Err(error) => {
                    log::debug!("builder {index} for {} failed: {error}", blueprint.name);
                }
            }
        }

        if let Some(fallback) = &blueprint.fallback {
            log::debug!("falling back to zero-argument construction for {}", blueprint.name);
            return Some(fallback());
        }

        log::error!("{}", EcsError::ConstructionFailed { kind: blueprint.name });
        None
    }
}
