//! Motion fields steer trail heads.
//!
//! A field maps a position and a time scalar to a direction. Callers blend
//! their current heading toward the sample rather than adopting it, so the
//! field only ever steers.

use crate::constants::FIELD_POSITION_SCALE;
use glam::Vec3;

/// Deterministic steering field.
pub trait MotionField {
    /// Unit direction at `position` and `time`, or `None` when the raw field
    /// vanishes and cannot be normalized.
    fn sample(&self, position: Vec3, time: f32) -> Option<Vec3>;
}

/// Sum of sines and cosines with cross-axis coupling and per-axis phase rates.
#[derive(Clone, Copy, Debug)]
pub struct FlowField {
    pub scale: f32,
}

impl Default for FlowField {
    fn default() -> Self {
        Self {
            scale: FIELD_POSITION_SCALE,
        }
    }
}

impl FlowField {
    pub fn new(scale: f32) -> Self {
        Self { scale }
    }

    /// Unnormalized field value.
    pub fn raw(&self, position: Vec3, t: f32) -> Vec3 {
        let p = position * self.scale;
        Vec3::new(
            (p.y + t).sin() + (p.z * 0.5 + t * 0.7).cos(),
            (p.z + t * 0.8).sin() + (p.x * 0.6 - t * 0.3).cos(),
            (p.x - t * 0.4).sin() - (p.y * 0.4 + t * 0.9).cos(),
        )
    }
}

impl MotionField for FlowField {
    fn sample(&self, position: Vec3, time: f32) -> Option<Vec3> {
        self.raw(position, time).try_normalize()
    }
}
