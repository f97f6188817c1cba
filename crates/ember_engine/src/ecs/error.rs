//! ECS error taxonomy
//!
//! Every variant here is recoverable: it is logged at the boundary where it
//! occurs and the simulation continues. The only fatal path in the engine is
//! bootstrap failure, which surfaces as [`crate::engine::EngineError`].

use thiserror::Error;

/// Errors produced by the ECS runtime.
///
/// These never cross the public API as `Err` values from the world's
/// operations; callers see a `bool`/`Option` result while the error itself
/// is routed through the logging collaborator.
#[derive(Error, Debug)]
pub enum EcsError {
    /// A component attach was rejected because a declared requirement is
    /// absent from the entity.
    #[error("cannot attach {component}: required component {required} missing")]
    MissingRequirement {
        /// Component that was being attached
        component: &'static str,
        /// Required component type that was not present
        required: &'static str,
    },

    /// A typed component attach was rejected because the entity already
    /// holds an instance of that type.
    #[error("cannot attach {component}: entity already holds an instance")]
    DuplicateComponent {
        /// Component that was being attached
        component: &'static str,
    },

    /// A system registration could not locate its anchor node.
    #[error("cannot register {system}: anchor {anchor} not found in pipeline")]
    AnchorNotFound {
        /// System that was being registered
        system: &'static str,
        /// Anchor type the registration named
        anchor: &'static str,
    },

    /// A system registration duplicated an existing (type, phase) node.
    #[error("cannot register {system}: identical pipeline node already present")]
    DuplicateNode {
        /// System that was being registered
        system: &'static str,
    },

    /// A routed component reached a system with no matching handler entry.
    #[error("{system} does not handle {component} (phase argument: {with_phase})")]
    HandlerNotFound {
        /// System the component was routed to
        system: &'static str,
        /// Component type that had no handler
        component: &'static str,
        /// Whether a phase argument was part of the lookup
        with_phase: bool,
    },

    /// A handler invocation failed before or during the call.
    #[error("handler for {component} in {system} failed: {reason}")]
    HandlerFault {
        /// System whose handler failed
        system: &'static str,
        /// Component being handled
        component: &'static str,
        /// What went wrong (borrow conflict, downcast mismatch, …)
        reason: &'static str,
    },

    /// Every factory strategy for an entity kind was exhausted.
    #[error("could not construct entity of kind {kind}")]
    ConstructionFailed {
        /// Entity kind the factory was asked for
        kind: &'static str,
    },

    /// A builder asked for a positional argument that was not supplied.
    #[error("no unused argument of type {expected} available")]
    MissingArgument {
        /// Type the builder expected
        expected: &'static str,
    },
}
