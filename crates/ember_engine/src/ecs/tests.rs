//! End-to-end tests for the ECS runtime
//!
//! These exercise the full registration → routing → dispatch path through
//! the public `World` API with small purpose-built systems and components.

use std::cell::RefCell;
use std::rc::Rc;

use super::components::{Motion, Transform};
use super::handler::{handle, handle_with_phase, HandlerSpec};
use super::phase::Phase;
use super::pipeline::EngineRoot;
use super::{Args, Component, Entity, System, World};

#[derive(Debug, Clone, Default)]
struct Payload {
    touches: u32,
}
impl Component for Payload {}

#[derive(Default)]
struct SystemA {
    handled: u32,
}
impl System for SystemA {}

#[derive(Default)]
struct SystemB {
    handled: u32,
}
impl System for SystemB {
    fn handlers(&self) -> Vec<HandlerSpec> {
        vec![handle(SystemB::on_payload)]
    }
}
impl SystemB {
    fn on_payload(&mut self, _entity: &Entity, payload: &mut Payload) {
        payload.touches += 1;
        self.handled += 1;
    }
}

#[derive(Default)]
struct SystemC {
    handled: u32,
}
impl System for SystemC {}

fn order(world: &World) -> Vec<&'static str> {
    world
        .pipeline_nodes()
        .iter()
        .map(|(name, _)| name.rsplit("::").next().unwrap())
        .collect()
}

#[test]
fn test_register_after_then_before_yields_a_c_b() {
    let mut world = World::new();
    assert!(world.register_after::<EngineRoot, SystemA>(None));
    assert!(world.register_after::<SystemA, SystemB>(None));
    assert!(world.register_before::<SystemB, SystemC>(None));

    assert_eq!(order(&world), vec!["SystemA", "SystemC", "SystemB"]);
}

#[test]
fn test_register_after_anchors_on_last_wildcard_match() {
    // Pipeline [A(Update), A(none)]: registering B after A with phase
    // Update must land after the phase-less node, because a node without a
    // phase matches any requested phase.
    let mut world = World::new();
    assert!(world.register_after::<EngineRoot, SystemA>(Some(Phase::Update)));
    assert!(world.register_after::<EngineRoot, SystemA>(None));
    assert!(world.register_after::<SystemA, SystemB>(Some(Phase::Update)));

    assert_eq!(order(&world), vec!["SystemA", "SystemA", "SystemB"]);
    assert_eq!(world.pipeline_nodes()[2].1, Some(Phase::Update));
}

#[test]
fn test_missing_anchor_drops_registration() {
    let mut world = World::new();
    assert!(!world.register_after::<SystemA, SystemB>(None));
    assert!(world.pipeline_nodes().is_empty());
    assert_eq!(world.system_count(), 0);
}

#[test]
fn test_duplicate_node_drops_registration() {
    let mut world = World::new();
    assert!(world.register_after::<EngineRoot, SystemA>(None));
    assert!(!world.register_after::<EngineRoot, SystemA>(None));
    assert_eq!(world.pipeline_nodes().len(), 1);
}

#[test]
fn test_same_system_twice_under_different_phases_shares_instance() {
    let mut world = World::new();
    assert!(world.register_after::<EngineRoot, SystemB>(Some(Phase::PreUpdate)));
    assert!(world.register_after::<EngineRoot, SystemB>(Some(Phase::PostUpdate)));
    assert_eq!(world.pipeline_nodes().len(), 2);
    assert_eq!(world.system_count(), 1);
}

#[test]
fn test_only_interested_system_handles_component() {
    let mut world = World::new();
    assert!(world.register_after::<EngineRoot, SystemA>(None));
    assert!(world.register_after::<SystemA, SystemB>(None));
    assert!(world.register_after::<SystemB, SystemC>(None));

    let entity = Entity::new();
    entity.add_component(Payload::default());
    world.register_entity(&entity);

    world.process_systems();

    assert_eq!(world.with_system::<SystemB, _>(|s| s.handled), Some(1));
    assert_eq!(world.with_system::<SystemA, _>(|s| s.handled), Some(0));
    assert_eq!(world.with_system::<SystemC, _>(|s| s.handled), Some(0));
    assert_eq!(entity.with::<Payload, _>(|p| p.touches), Some(1));
}

#[test]
fn test_phase_arity_selects_handler() {
    #[derive(Default)]
    struct DualSystem {
        plain: u32,
        phased: Vec<Phase>,
    }
    impl System for DualSystem {
        fn handlers(&self) -> Vec<HandlerSpec> {
            vec![
                handle(DualSystem::on_plain),
                handle_with_phase(DualSystem::on_phased),
            ]
        }
    }
    impl DualSystem {
        fn on_plain(&mut self, _entity: &Entity, _payload: &mut Payload) {
            self.plain += 1;
        }
        fn on_phased(&mut self, _entity: &Entity, _payload: &mut Payload, phase: Phase) {
            self.phased.push(phase);
        }
    }

    let mut world = World::new();
    assert!(world.register_after::<EngineRoot, DualSystem>(None));
    assert!(world.register_after::<EngineRoot, DualSystem>(Some(Phase::Render)));

    let entity = Entity::new();
    entity.add_component(Payload::default());
    world.register_entity(&entity);

    world.process_systems();

    assert_eq!(world.with_system::<DualSystem, _>(|s| s.plain), Some(1));
    assert_eq!(
        world.with_system::<DualSystem, _>(|s| s.phased.clone()),
        Some(vec![Phase::Render])
    );
}

#[test]
fn test_unhandled_phase_arity_skips_component() {
    // SystemB only declares a phase-free handler; a phase-bearing node
    // logs a resolution error for each routed component and moves on.
    let mut world = World::new();
    assert!(world.register_after::<EngineRoot, SystemB>(Some(Phase::Update)));

    let entity = Entity::new();
    entity.add_component(Payload::default());
    world.register_entity(&entity);

    world.process_systems();

    assert_eq!(world.with_system::<SystemB, _>(|s| s.handled), Some(0));
}

#[test]
fn test_flagged_component_skips_one_tick_then_resumes() {
    let mut world = World::new();
    assert!(world.register_after::<EngineRoot, SystemB>(None));

    let entity = Entity::new();
    entity.add_component(Payload::default());
    world.register_entity(&entity);

    world.flag_removal::<Payload>(&entity);
    world.process_systems();
    assert_eq!(world.with_system::<SystemB, _>(|s| s.handled), Some(0));

    // The flag was cleared between ticks and nothing actually removed the
    // component, so the next tick handles it again.
    world.process_systems();
    assert_eq!(world.with_system::<SystemB, _>(|s| s.handled), Some(1));
    assert_eq!(world.working_count::<SystemB>(), 1);
}

#[test]
fn test_removed_component_leaves_working_list() {
    let mut world = World::new();
    assert!(world.register_after::<EngineRoot, SystemB>(None));

    let entity = Entity::new();
    entity.add_component(Payload::default());
    world.register_entity(&entity);

    world.remove_component::<Payload>(&entity);
    world.process_systems();

    assert_eq!(world.with_system::<SystemB, _>(|s| s.handled), Some(0));
    assert_eq!(world.working_count::<SystemB>(), 0);
    assert!(!entity.has::<Payload>());
}

#[test]
fn test_panicking_handler_is_contained() {
    #[derive(Default)]
    struct FaultySystem {
        calls: u32,
    }
    impl System for FaultySystem {
        fn handlers(&self) -> Vec<HandlerSpec> {
            vec![handle(FaultySystem::explode)]
        }
    }
    impl FaultySystem {
        fn explode(&mut self, _entity: &Entity, payload: &mut Payload) {
            self.calls += 1;
            payload.touches += 1;
            panic!("handler fault");
        }
    }

    let mut world = World::new();
    assert!(world.register_after::<EngineRoot, FaultySystem>(None));
    assert!(world.register_after::<FaultySystem, SystemB>(None));

    let first = Entity::new();
    first.add_component(Payload::default());
    let second = Entity::new();
    second.add_component(Payload::default());
    world.register_entity(&first);
    world.register_entity(&second);

    world.process_systems();

    // Both components were attempted despite the first panic, and the
    // downstream system's tick was unaffected.
    assert_eq!(world.with_system::<FaultySystem, _>(|s| s.calls), Some(2));
    assert_eq!(world.with_system::<SystemB, _>(|s| s.handled), Some(2));
}

#[test]
fn test_factory_injection_attaches_motion() {
    struct Mover;

    let mut world = World::new();
    world.factory_mut().add_builder::<Mover>(|ctx| {
        ctx.inject::<Transform>();
        ctx.inject::<Motion>();
        Ok(Entity::new())
    });

    let entity = world.try_create::<Mover>(Args::new()).expect("entity built");
    assert!(entity.has::<Motion>());
    assert!(entity.has::<Transform>());
}

#[test]
fn test_components_added_after_registration_are_routed() {
    let mut world = World::new();
    assert!(world.register_after::<EngineRoot, SystemB>(None));

    let entity = Entity::new();
    world.register_entity(&entity);
    assert_eq!(world.working_count::<SystemB>(), 0);

    assert!(world.add_component(&entity, Payload::default()));
    assert_eq!(world.working_count::<SystemB>(), 1);

    world.process_systems();
    assert_eq!(world.with_system::<SystemB, _>(|s| s.handled), Some(1));
}

#[test]
fn test_purge_clears_working_lists() {
    let mut world = World::new();
    assert!(world.register_after::<EngineRoot, SystemB>(None));

    let entity = Entity::new();
    entity.add_component(Payload::default());
    world.register_entity(&entity);
    assert_eq!(world.working_count::<SystemB>(), 1);

    world.purge_components();

    assert_eq!(world.working_count::<SystemB>(), 0);
    assert_eq!(world.entity_count(), 0);
    world.process_systems();
    assert_eq!(world.with_system::<SystemB, _>(|s| s.handled), Some(0));
}

#[test]
fn test_working_list_order_is_registration_order() {
    let touched: Rc<RefCell<Vec<u32>>> = Rc::new(RefCell::new(Vec::new()));

    #[derive(Debug, Clone)]
    struct Tagged {
        tag: u32,
        log: Rc<RefCell<Vec<u32>>>,
    }
    impl Component for Tagged {}

    #[derive(Default)]
    struct TagSystem;
    impl System for TagSystem {
        fn handlers(&self) -> Vec<HandlerSpec> {
            vec![handle(TagSystem::on_tagged)]
        }
    }
    impl TagSystem {
        fn on_tagged(&mut self, _entity: &Entity, tagged: &mut Tagged) {
            tagged.log.borrow_mut().push(tagged.tag);
        }
    }

    let mut world = World::new();
    assert!(world.register_after::<EngineRoot, TagSystem>(None));

    for tag in 0..4 {
        let entity = Entity::new();
        entity.add_component(Tagged { tag, log: touched.clone() });
        world.register_entity(&entity);
    }

    world.process_systems();

    assert_eq!(*touched.borrow(), vec![0, 1, 2, 3]);
}
