//! System trait
//!
//! A system is a singleton behavior unit processing the components it
//! declared interest in. Instances are created once per concrete type at
//! registration time and live for the world's lifetime; the same instance
//! may back several pipeline nodes under different phases.

use super::command::CommandQueue;
use super::component::AsAny;
use super::handler::HandlerSpec;
use super::phase::Phase;

/// Trait for pipeline systems
///
/// All methods have defaults so a system only implements the hooks it
/// needs. Registration requires `Default` for instantiation.
pub trait System: AsAny {
    /// The concrete type's name, for diagnostics
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Handler declarations, read once at registration time
    ///
    /// These populate the system's dispatch table and establish the routing
    /// edges that deliver components to its working list.
    fn handlers(&self) -> Vec<HandlerSpec> {
        Vec::new()
    }

    /// Wiring hook, called once when the system instance is created
    ///
    /// Systems that need to request entity or component removal keep the
    /// queue handle and push commands from their handlers.
    fn connect(&mut self, _commands: CommandQueue) {}

    /// Frame delta notification, called once per frame per instance
    ///
    /// Called before the instance's first dispatch of the frame, even when
    /// the instance backs several pipeline nodes.
    fn tick_delta(&mut self, _delta: f32) {}

    /// Pre-pass hook, invoked at the start of each node dispatch
    fn step(&mut self, _phase: Option<Phase>) {}

    /// Post-pass hook, invoked at the end of each node dispatch
    fn after_step(&mut self, _phase: Option<Phase>) {}
}
