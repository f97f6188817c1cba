//! Motion component for entities that can move in 3D space
//!
//! Provides velocity, acceleration, and rotational movement for dynamic
//! objects. Requires a `Transform` on the same entity, which the motion
//! system advances each frame.

use crate::ecs::component::{Component, ComponentType};
use crate::foundation::math::{Transform, Vec3};

/// Component for entities that can move
#[derive(Debug, Clone)]
pub struct Motion {
    /// Linear velocity in units per second
    pub velocity: Vec3,

    /// Linear acceleration in units per second squared
    pub acceleration: Vec3,

    /// Angular velocity in radians per second
    pub angular_velocity: Vec3,

    /// Maximum speed limit (0 = no limit)
    pub max_speed: f32,

    /// Damping factor for velocity (0 = no damping, 1 = instant stop)
    pub linear_damping: f32,

    /// Whether movement is enabled
    pub enabled: bool,
}

impl Motion {
    /// Create a new motion component at rest
    pub fn new() -> Self {
        Self {
            velocity: Vec3::zeros(),
            acceleration: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
            max_speed: 0.0, // No limit by default
            linear_damping: 0.0,
            enabled: true,
        }
    }

    /// Create a motion component with initial velocity
    pub fn with_velocity(velocity: Vec3) -> Self {
        Self {
            velocity,
            ..Self::new()
        }
    }

    /// Create a motion component with rotation
    pub fn with_rotation(angular_velocity: Vec3) -> Self {
        Self {
            angular_velocity,
            ..Self::new()
        }
    }

    /// Set maximum speed
    pub fn set_max_speed(&mut self, max_speed: f32) {
        self.max_speed = max_speed.max(0.0);
    }

    /// Set linear damping
    pub fn set_linear_damping(&mut self, damping: f32) {
        self.linear_damping = damping.clamp(0.0, 1.0);
    }

    /// Apply physics integration step
    pub fn integrate(&mut self, delta_time: f32) {
        if !self.enabled {
            return;
        }

        self.velocity += self.acceleration * delta_time;

        // Apply speed limit
        if self.max_speed > 0.0 {
            let speed = self.velocity.magnitude();
            if speed > self.max_speed {
                self.velocity = self.velocity.normalize() * self.max_speed;
            }
        }

        // Apply linear damping
        if self.linear_damping > 0.0 {
            self.velocity *= (1.0 - self.linear_damping * delta_time).max(0.0);
        }
    }

    /// Get position delta for this frame
    pub fn position_delta(&self, delta_time: f32) -> Vec3 {
        if !self.enabled {
            return Vec3::zeros();
        }
        self.velocity * delta_time
    }

    /// Get rotation delta for this frame
    pub fn rotation_delta(&self, delta_time: f32) -> Vec3 {
        if !self.enabled {
            return Vec3::zeros();
        }
        self.angular_velocity * delta_time
    }

    /// Stop all movement
    pub fn stop(&mut self) {
        self.velocity = Vec3::zeros();
        self.acceleration = Vec3::zeros();
        self.angular_velocity = Vec3::zeros();
    }
}

impl Component for Motion {
    fn requires(&self) -> Vec<ComponentType> {
        vec![ComponentType::of::<Transform>()]
    }
}

impl Default for Motion {
    fn default() -> Self {
        Self::new()
    }
}
