//! Motion integration system
//!
//! Integrates each routed `Motion` component and applies the resulting
//! position and rotation deltas to the sibling `Transform`.

use crate::ecs::components::{Motion, Transform};
use crate::ecs::handler::{handle, HandlerSpec};
use crate::ecs::{Entity, System};

/// System advancing `Motion` components each frame
#[derive(Default)]
pub struct MotionSystem {
    delta_time: f32,
}

impl System for MotionSystem {
    fn handlers(&self) -> Vec<HandlerSpec> {
        vec![handle(Self::integrate)]
    }

    fn tick_delta(&mut self, delta: f32) {
        self.delta_time = delta;
    }
}

impl MotionSystem {
    fn integrate(&mut self, entity: &Entity, motion: &mut Motion) {
        motion.integrate(self.delta_time);

        let position_delta = motion.position_delta(self.delta_time);
        let rotation_delta = motion.rotation_delta(self.delta_time);
        let applied = entity.with_mut::<Transform, _>(|transform| {
            transform.translate(position_delta);
            if rotation_delta != crate::foundation::math::Vec3::zeros() {
                transform.rotate_euler(rotation_delta);
            }
        });
        if applied.is_none() {
            log::debug!("{} has motion but no accessible transform", entity.id());
        }
    }
}
