//! ECS World implementation
//!
//! The world owns the system pipeline, the component router, the per-system
//! working lists and pending-removal sets, and the active entity set. It is
//! an explicit value owned by the caller, so several independent worlds can
//! coexist and tests get deterministic setup and teardown.
//!
//! Scheduling is single-threaded and frame-driven: registration APIs run
//! during setup, [`World::process_systems`] walks the pipeline once per
//! frame, and per-frame component churn funnels through the
//! snapshot/pending-removal mechanism.

use std::any::TypeId;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;
use std::time::Instant;

use crate::foundation::time::MAX_DELTA_SECONDS;

use super::command::{Command, CommandQueue};
use super::component::{Component, ComponentKey, ComponentRef, ComponentType};
use super::entity::Entity;
use super::error::EcsError;
use super::factory::{Args, EntityFactory};
use super::handler::DispatchTable;
use super::phase::Phase;
use super::pipeline::{EngineRoot, Pipeline, SystemNode};
use super::router::ComponentRouter;
use super::system::System;

/// A component delivered to a system's working list, together with the
/// entity that owns it.
#[derive(Clone)]
struct RoutedComponent {
    entity: Entity,
    ty: ComponentType,
    component: ComponentRef,
}

/// Singleton state for one system type: the instance, its dispatch table,
/// and its working list.
struct SystemEntry {
    system: Rc<RefCell<dyn System>>,
    name: &'static str,
    table: DispatchTable,
    working: Vec<RoutedComponent>,
    pending_removal: HashSet<ComponentKey>,
    last_tick: Option<Instant>,
    last_frame: u64,
}

impl SystemEntry {
    /// Run one pipeline node: pre-pass, snapshot walk, post-pass.
    ///
    /// Every failure inside the walk is recovered locally: a missing
    /// handler or a fault inside one skips that component for this pass
    /// and the walk continues.
    fn dispatch(&mut self, phase: Option<Phase>) {
        self.system.borrow_mut().step(phase);

        // Snapshot so same-pass structural changes cannot corrupt iteration.
        let snapshot = self.working.clone();
        for routed in &snapshot {
            if self.pending_removal.contains(&ComponentKey::of(&routed.component)) {
                continue;
            }
            let Some(spec) = self.table.resolve(routed.ty.id, phase.is_some()) else {
                log::error!(
                    "{}",
                    EcsError::HandlerNotFound {
                        system: self.name,
                        component: routed.ty.name,
                        with_phase: phase.is_some(),
                    }
                );
                continue;
            };
            let mut system = self.system.borrow_mut();
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                (spec.invoke)(&mut *system, &routed.entity, &routed.component, phase)
            }));
            drop(system);
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(error)) => log::error!("{error}"),
                Err(_) => log::error!(
                    "{}",
                    EcsError::HandlerFault {
                        system: self.name,
                        component: routed.ty.name,
                        reason: "handler panicked",
                    }
                ),
            }
        }

        self.system.borrow_mut().after_step(phase);
    }
}

enum Placement {
    Before,
    After,
}

/// ECS world containing the pipeline, router, and active entities
pub struct World {
    pipeline: Pipeline,
    systems: HashMap<TypeId, SystemEntry>,
    router: ComponentRouter,
    entities: Vec<Entity>,
    factory: EntityFactory,
    commands: CommandQueue,
    detach_queue: Vec<(Entity, TypeId, ComponentKey)>,
    despawn_queue: Vec<Entity>,
    frame: u64,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self {
            pipeline: Pipeline::default(),
            systems: HashMap::new(),
            router: ComponentRouter::new(),
            entities: Vec::new(),
            factory: EntityFactory::new(),
            commands: CommandQueue::new(),
            detach_queue: Vec::new(),
            despawn_queue: Vec::new(),
            frame: 0,
        }
    }

    /// Register system `S` immediately after the anchor `A`
    ///
    /// `phase` is the new node's phase argument and also selects among
    /// anchor candidates: the node lands after the **last** node of type
    /// `A` whose phase equals `phase` or is absent (absence matches any).
    /// Anchoring on [`EngineRoot`] appends at the tail. Returns `false`
    /// (with an error-level log entry) if the anchor is missing or an
    /// identical (type, phase) node already exists; the world is unchanged
    /// in that case.
    pub fn register_after<A: 'static, S: System + Default>(&mut self, phase: Option<Phase>) -> bool {
        self.register_node::<A, S>(phase, Placement::After)
    }

    /// Register system `S` immediately before the anchor `A`
    ///
    /// Same contract as [`World::register_after`], except the node lands
    /// before the **first** matching anchor node.
    pub fn register_before<A: 'static, S: System + Default>(&mut self, phase: Option<Phase>) -> bool {
        self.register_node::<A, S>(phase, Placement::Before)
    }

    fn register_node<A: 'static, S: System + Default>(
        &mut self,
        phase: Option<Phase>,
        placement: Placement,
    ) -> bool {
        let system_ty = TypeId::of::<S>();
        if self.pipeline.contains(system_ty, phase) {
            log::error!("{}", EcsError::DuplicateNode { system: std::any::type_name::<S>() });
            return false;
        }

        let anchor = TypeId::of::<A>();
        let index = if anchor == TypeId::of::<EngineRoot>() {
            Some(self.pipeline.len())
        } else {
            match placement {
                Placement::Before => self.pipeline.anchor_before(anchor, phase),
                Placement::After => self.pipeline.anchor_after(anchor, phase),
            }
        };
        let Some(index) = index else {
            log::error!(
                "{}",
                EcsError::AnchorNotFound {
                    system: std::any::type_name::<S>(),
                    anchor: std::any::type_name::<A>(),
                }
            );
            return false;
        };

        let name = self.ensure_system::<S>();
        self.pipeline.insert(index, SystemNode { system: system_ty, name, phase });
        log::debug!("registered {name} at pipeline index {index} (phase {phase:?})");
        true
    }

    /// Create the singleton instance for `S` if it does not exist yet,
    /// pre-computing its dispatch table and routing edges.
    fn ensure_system<S: System + Default>(&mut self) -> &'static str {
        let ty = TypeId::of::<S>();
        if let Some(entry) = self.systems.get(&ty) {
            return entry.name;
        }
        let mut system = S::default();
        system.connect(self.commands.clone());
        let name = system.name();
        let table = DispatchTable::from_specs(system.handlers(), name);
        self.router.register(ty, table.routed());
        self.systems.insert(
            ty,
            SystemEntry {
                system: Rc::new(RefCell::new(system)),
                name,
                table,
                working: Vec::new(),
                pending_removal: HashSet::new(),
                last_tick: None,
                last_frame: 0,
            },
        );
        name
    }

    /// Walk the pipeline head-to-tail once
    ///
    /// Each system instance receives its frame delta exactly once per
    /// frame, capped at [`MAX_DELTA_SECONDS`], before its first node
    /// dispatches. Deferred commands are drained after every node so later
    /// systems in the same frame already skip flagged components; flagged
    /// removals are applied after the walk completes.
    pub fn process_systems(&mut self) {
        self.frame = self.frame.wrapping_add(1);
        let now = Instant::now();
        let nodes: Vec<(TypeId, Option<Phase>)> = self
            .pipeline
            .nodes()
            .iter()
            .map(|node| (node.system, node.phase))
            .collect();

        for (system_ty, phase) in nodes {
            if let Some(entry) = self.systems.get_mut(&system_ty) {
                if entry.last_frame != self.frame {
                    let delta = entry.last_tick.map_or(0.0, |last| {
                        now.duration_since(last).as_secs_f32().min(MAX_DELTA_SECONDS)
                    });
                    entry.last_tick = Some(now);
                    entry.last_frame = self.frame;
                    entry.system.borrow_mut().tick_delta(delta);
                }
                entry.dispatch(phase);
            }
            self.apply_commands();
        }

        self.apply_removals();
    }

    /// Register an entity's components with every interested system
    ///
    /// Called by the scene collaborator on activation. Registering an
    /// already-active entity is a no-op.
    pub fn register_entity(&mut self, entity: &Entity) {
        if self.is_registered(entity) {
            return;
        }
        self.entities.push(entity.clone());
        for (ty, component) in entity.components() {
            self.route(entity, ty, &component);
        }
    }

    /// Attach a component to an entity and, if the entity is active, route
    /// it to interested systems immediately
    pub fn add_component<C: Component>(&mut self, entity: &Entity, component: C) -> bool {
        if !entity.add_component(component) {
            return false;
        }
        if self.is_registered(entity) {
            if let Some(component) = entity.find::<C>() {
                self.route(entity, ComponentType::of::<C>(), &component);
            }
        }
        true
    }

    /// Defer the entity's component of type `C` from dispatch
    ///
    /// The flag suppresses dispatch for the remainder of the current frame
    /// and is cleared between frames; it does not remove the component. Use
    /// [`World::remove_component`] for actual removal.
    pub fn flag_removal<C: Component>(&mut self, entity: &Entity) -> bool {
        self.flag_component(entity, TypeId::of::<C>()).is_some()
    }

    fn flag_component(&mut self, entity: &Entity, ty: TypeId) -> Option<ComponentKey> {
        let component = entity.find_type(ty)?;
        let key = ComponentKey::of(&component);
        for &system_ty in self.router.systems_for(ty) {
            if let Some(entry) = self.systems.get_mut(&system_ty) {
                entry.pending_removal.insert(key);
            }
        }
        Some(key)
    }

    /// Remove the entity's component of type `C`
    ///
    /// The component is excluded from dispatch immediately and detached
    /// from the entity and all working lists between frames.
    pub fn remove_component<C: Component>(&mut self, entity: &Entity) -> bool {
        self.remove_component_by_id(entity, TypeId::of::<C>())
    }

    fn remove_component_by_id(&mut self, entity: &Entity, ty: TypeId) -> bool {
        match self.flag_component(entity, ty) {
            Some(key) => {
                self.detach_queue.push((entity.clone(), ty, key));
                true
            }
            None => false,
        }
    }

    /// Remove an entity from the active set
    ///
    /// All of its components are excluded from dispatch immediately and
    /// dropped from every working list between frames. The entity keeps its
    /// components and may be registered again later.
    pub fn remove_entity(&mut self, entity: &Entity) {
        for (ty, component) in entity.components() {
            let key = ComponentKey::of(&component);
            for &system_ty in self.router.systems_for(ty.id) {
                if let Some(entry) = self.systems.get_mut(&system_ty) {
                    entry.pending_removal.insert(key);
                }
            }
        }
        self.despawn_queue.push(entity.clone());
    }

    /// Clear every system's working list and the active entity set
    ///
    /// Called by the scene collaborator on a scene switch. Registered
    /// systems and the pipeline are untouched.
    pub fn purge_components(&mut self) {
        for entry in self.systems.values_mut() {
            entry.working.clear();
            entry.pending_removal.clear();
        }
        self.detach_queue.clear();
        self.despawn_queue.clear();
        self.entities.clear();
    }

    fn route(&mut self, entity: &Entity, ty: ComponentType, component: &ComponentRef) {
        for &system_ty in self.router.systems_for(ty.id) {
            if let Some(entry) = self.systems.get_mut(&system_ty) {
                entry.working.push(RoutedComponent {
                    entity: entity.clone(),
                    ty,
                    component: component.clone(),
                });
            }
        }
    }

    fn apply_commands(&mut self) {
        for command in self.commands.drain() {
            match command {
                Command::RemoveComponent { entity, component } => {
                    self.remove_component_by_id(&entity, component);
                }
                Command::RemoveEntity { entity } => self.remove_entity(&entity),
            }
        }
    }

    /// Apply queued detachments and despawns, then clear all pending flags.
    fn apply_removals(&mut self) {
        let mut removed: HashSet<ComponentKey> = HashSet::new();
        for (entity, ty, key) in self.detach_queue.drain(..) {
            entity.remove_type(ty);
            removed.insert(key);
        }
        let despawned: Vec<Entity> = self.despawn_queue.drain(..).collect();
        for entity in &despawned {
            for (_, component) in entity.components() {
                removed.insert(ComponentKey::of(&component));
            }
            entity.set_scene(None);
            self.entities.retain(|active| active != entity);
        }
        if !removed.is_empty() {
            for entry in self.systems.values_mut() {
                entry
                    .working
                    .retain(|routed| !removed.contains(&ComponentKey::of(&routed.component)));
            }
        }
        for entry in self.systems.values_mut() {
            entry.pending_removal.clear();
        }
    }

    fn is_registered(&self, entity: &Entity) -> bool {
        self.entities.iter().any(|active| active == entity)
    }

    /// Build an entity of the registered kind `K`
    pub fn try_create<K: 'static>(&self, args: Args) -> Option<Entity> {
        self.factory.try_create::<K>(args)
    }

    /// The entity factory
    pub fn factory(&self) -> &EntityFactory {
        &self.factory
    }

    /// Mutable access to the entity factory
    pub fn factory_mut(&mut self) -> &mut EntityFactory {
        &mut self.factory
    }

    /// Handle to the deferred command queue
    pub fn commands(&self) -> CommandQueue {
        self.commands.clone()
    }

    /// Pipeline nodes in walk order, as (system name, phase) pairs
    pub fn pipeline_nodes(&self) -> Vec<(&'static str, Option<Phase>)> {
        self.pipeline
            .nodes()
            .iter()
            .map(|node| (node.name, node.phase))
            .collect()
    }

    /// Number of distinct system instances
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Number of active entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of components currently routed to system `S`
    pub fn working_count<S: System>(&self) -> usize {
        self.systems
            .get(&TypeId::of::<S>())
            .map_or(0, |entry| entry.working.len())
    }

    /// Inspect the singleton instance of system `S`
    pub fn with_system<S: System, R>(&self, f: impl FnOnce(&S) -> R) -> Option<R> {
        let entry = self.systems.get(&TypeId::of::<S>())?;
        let guard = entry.system.try_borrow().ok()?;
        let concrete = guard.as_any().downcast_ref::<S>()?;
        Some(f(concrete))
    }

    /// Mutate the singleton instance of system `S`
    ///
    /// Intended for setup-time wiring (e.g. installing a backend) before
    /// the first frame.
    pub fn with_system_mut<S: System, R>(&self, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        let entry = self.systems.get(&TypeId::of::<S>())?;
        let mut guard = entry.system.try_borrow_mut().ok()?;
        let concrete = guard.as_any_mut().downcast_mut::<S>()?;
        Some(f(concrete))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
