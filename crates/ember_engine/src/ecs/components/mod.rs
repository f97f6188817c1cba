//! Built-in components

pub mod drawable;
pub mod lifetime;
pub mod motion;

pub use drawable::{Drawable, MaterialId, MeshId};
pub use lifetime::Lifetime;
pub use motion::Motion;

pub use crate::foundation::math::Transform;

use super::Component;

impl Component for Transform {}
