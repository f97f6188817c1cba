//! Lifetime component
//!
//! Tracks entity lifetime for automatic despawning. The lifetime system
//! counts the remaining duration down with the frame delta and requests
//! removal of the owning entity once it expires.

use crate::ecs::component::Component;

/// Lifetime component for entities that should despawn after a duration
#[derive(Debug, Clone, Copy)]
pub struct Lifetime {
    /// Remaining time to live in seconds (<= 0 means infinite)
    pub remaining: f32,
}

impl Lifetime {
    /// Create a lifetime of the given duration in seconds
    pub fn new(duration: f32) -> Self {
        Self { remaining: duration }
    }

    /// Create an infinite lifetime
    pub fn infinite() -> Self {
        Self { remaining: 0.0 }
    }

    /// Whether this lifetime counts down at all
    pub fn is_finite(&self) -> bool {
        self.remaining > 0.0
    }

    /// Count down by the given delta, returning `true` once expired
    pub fn tick(&mut self, delta_time: f32) -> bool {
        if !self.is_finite() {
            return false;
        }
        self.remaining -= delta_time;
        self.remaining <= 0.0
    }
}

impl Component for Lifetime {}
