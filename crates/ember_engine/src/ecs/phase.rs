//! Pipeline phase arguments
//!
//! A phase tags a pipeline node so one system instance can appear several
//! times per frame at different lifecycle stages.

use std::fmt;

/// Lifecycle phase argument carried by a pipeline node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Input processing, entity lifecycle management
    PreUpdate,
    /// Game logic, physics simulation
    Update,
    /// Animation, transform propagation
    PostUpdate,
    /// Draw-command generation
    Render,
    /// Final submission to the backend
    Present,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PreUpdate => "pre-update",
            Self::Update => "update",
            Self::PostUpdate => "post-update",
            Self::Render => "render",
            Self::Present => "present",
        };
        f.write_str(name)
    }
}
