//! Camera, viewport and scene rotation.
//!
//! Rotation follows one of two modes. `Auto` spins the scene at a fixed rate;
//! a scroll switches to `UserDriven`, where the scene eases toward a pose
//! derived from the normalized scroll position. After an idle period without
//! scrolling the scene returns to `Auto`. No transition happens before the
//! warm-up delay has elapsed since the first frame.

use crate::constants::*;
use glam::{EulerRot, Mat4, Vec3};

/// CSS viewport size plus device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            pixel_ratio: 1.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    pub fn aspect(&self) -> f32 {
        (self.width / self.height.max(1.0)) as f32
    }

    /// Pixel ratio capped so high-density screens do not blow up fill cost.
    pub fn effective_pixel_ratio(&self) -> f64 {
        if self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0 {
            self.pixel_ratio.min(MAX_PIXEL_RATIO)
        } else {
            1.0
        }
    }

    /// Backing-store size in physical pixels, never zero.
    pub fn physical_size(&self) -> (u32, u32) {
        let ratio = self.effective_pixel_ratio();
        let w = (self.width.max(0.0) * ratio) as u32;
        let h = (self.height.max(0.0) * ratio) as u32;
        (w.max(1), h.max(1))
    }
}

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Camera on the +Z axis at `distance`, looking at the origin.
    pub fn looking_at_origin(fov_degrees: f32, distance: f32, aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, distance),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: fov_degrees.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotationMode {
    Auto,
    UserDriven,
}

/// Scroll information the loop reads each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollSample {
    /// Scroll offset divided by viewport height.
    pub normalized: f32,
    /// Timestamp of the latest scroll event, on the frame clock.
    pub last_event_ms: Option<f64>,
}

/// Rotation-mode state machine plus the current scene Euler angles.
#[derive(Clone, Debug)]
pub struct SceneRotation {
    mode: RotationMode,
    angles: Vec3,
    anchor_y: f32,
    idle_ms: f64,
    warmup_ms: f64,
    started_ms: Option<f64>,
    seen_scroll_ms: Option<f64>,
}

impl SceneRotation {
    pub fn new(idle_ms: f64, warmup_ms: f64) -> Self {
        Self {
            mode: RotationMode::Auto,
            angles: Vec3::ZERO,
            anchor_y: 0.0,
            idle_ms,
            warmup_ms,
            started_ms: None,
            seen_scroll_ms: None,
        }
    }

    pub fn mode(&self) -> RotationMode {
        self.mode
    }

    pub fn angles(&self) -> Vec3 {
        self.angles
    }

    /// Scene transform for the current angles (X, then Y, then Z).
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.angles.x, self.angles.y, self.angles.z)
    }

    /// Evaluate mode transitions, then advance the angles one frame.
    pub fn update(&mut self, now_ms: f64, scroll: ScrollSample) {
        let started = *self.started_ms.get_or_insert(now_ms);
        let fresh_scroll =
            scroll.last_event_ms.is_some() && scroll.last_event_ms != self.seen_scroll_ms;
        self.seen_scroll_ms = scroll.last_event_ms;

        if now_ms - started >= self.warmup_ms {
            match self.mode {
                RotationMode::Auto if fresh_scroll => {
                    self.anchor_y = self.angles.y - scroll.normalized * SCROLL_TURN_Y;
                    self.mode = RotationMode::UserDriven;
                    log::debug!("[rotation] user-driven");
                }
                RotationMode::UserDriven => {
                    let idle = scroll
                        .last_event_ms
                        .map_or(true, |t| now_ms - t >= self.idle_ms);
                    if idle {
                        self.mode = RotationMode::Auto;
                        log::debug!("[rotation] auto");
                    }
                }
                RotationMode::Auto => {}
            }
        }

        let tilt = scroll.normalized * SCROLL_TILT_X;
        self.angles.x += (tilt - self.angles.x) * ROTATION_EASE;
        match self.mode {
            RotationMode::Auto => self.angles.y += AUTO_ROTATE_Y,
            RotationMode::UserDriven => {
                let target = self.anchor_y + scroll.normalized * SCROLL_TURN_Y;
                self.angles.y += (target - self.angles.y) * ROTATION_EASE;
            }
        }
        self.angles.z = ((now_ms * SWAY_Z_RATE).sin() as f32) * SWAY_Z_AMPLITUDE;
    }
}
