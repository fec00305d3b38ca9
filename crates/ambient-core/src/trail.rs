//! Flow-field trail lines.
//!
//! Each line owns a fixed-length history of head positions and colors. Index 0
//! is always the newest sample; every step shifts the history one slot toward
//! the tail and writes the new head in front.

use crate::backend::Vertex;
use crate::color::{ColorCycler, Palette, Rgb};
use crate::constants::*;
use crate::field::MotionField;
use crate::sampling::random_unit_vector;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct TrailLine {
    head: Vec3,
    direction: Vec3,
    speed: f32,
    phase_offset: f32,
    smoothing: f32,
    bounds: f32,
    positions: Vec<Vec3>,
    colors: Vec<Rgb>,
    cycler: ColorCycler,
    rng: StdRng,
    dirty: bool,
}

impl TrailLine {
    /// `segments` is raised to at least 1. The start point is clamped into
    /// `[-bounds, bounds]` on every axis.
    pub fn new(start: Vec3, segments: usize, bounds: f32, palette: &Palette, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let speed = TRAIL_SPEED_MIN + rng.gen::<f32>() * TRAIL_SPEED_SPAN;
        let phase_offset = rng.gen::<f32>() * TRAIL_PHASE_SPAN;
        let cycler = ColorCycler::new(palette, &mut rng);
        let direction = random_unit_vector(&mut rng);
        let smoothing = TRAIL_SMOOTHING_MIN + rng.gen::<f32>() * TRAIL_SMOOTHING_SPAN;

        let head = start.clamp(Vec3::splat(-bounds), Vec3::splat(bounds));
        let segments = segments.max(1);
        Self {
            head,
            direction,
            speed,
            phase_offset,
            smoothing,
            bounds,
            positions: vec![head; segments],
            colors: vec![cycler.base(); segments],
            cycler,
            rng,
            dirty: true,
        }
    }

    /// Override the per-line smoothing factor (clamped to `[0, 1]`).
    pub fn with_smoothing(mut self, smoothing: f32) -> Self {
        self.smoothing = smoothing.clamp(0.0, 1.0);
        self
    }

    pub fn head(&self) -> Vec3 {
        self.head
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn phase_offset(&self) -> f32 {
        self.phase_offset
    }

    pub fn smoothing(&self) -> f32 {
        self.smoothing
    }

    pub fn bounds(&self) -> f32 {
        self.bounds
    }

    pub fn segments(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn cycler(&self) -> &ColorCycler {
        &self.cycler
    }

    /// Distance the head travels per step.
    pub fn step_size(&self) -> f32 {
        TRAIL_STEP_BASE + self.speed * TRAIL_STEP_SPEED_GAIN
    }

    /// Advance one simulation step at `time` seconds.
    pub fn step<F: MotionField + ?Sized>(&mut self, time: f32, field: &F, palette: &Palette) {
        if let Some(flow) = field.sample(self.head, time * self.speed + self.phase_offset) {
            if let Some(dir) = self.direction.lerp(flow, TRAIL_HEADING_BLEND).try_normalize() {
                self.direction = dir;
            }
        }

        self.head += self.direction * self.step_size();
        self.head = Vec3::new(
            wrap_axis(self.head.x, self.bounds),
            wrap_axis(self.head.y, self.bounds),
            wrap_axis(self.head.z, self.bounds),
        );

        shift_in(&mut self.positions, self.head);
        smooth_interior(&mut self.positions, self.smoothing);

        let head_color = self.cycler.advance(palette, &mut self.rng);
        shift_in(&mut self.colors, head_color);

        self.dirty = true;
    }

    /// Returns whether the buffers changed since the last call, clearing the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub fn fill_vertices(&self, out: &mut Vec<Vertex>) {
        out.clear();
        out.extend(
            self.positions
                .iter()
                .zip(&self.colors)
                .map(|(p, c)| Vertex::new(*p, *c)),
        );
    }
}

/// Toroidal wrap: leaving one side re-enters at the opposite bound.
pub fn wrap_axis(value: f32, bound: f32) -> f32 {
    if value > bound {
        -bound
    } else if value < -bound {
        bound
    } else {
        value
    }
}

/// Drop the oldest sample and insert `newest` at index 0.
fn shift_in<T: Copy>(history: &mut [T], newest: T) {
    let len = history.len();
    if len == 0 {
        return;
    }
    history.copy_within(0..len - 1, 1);
    history[0] = newest;
}

/// Pull each interior point toward the midpoint of its neighbours. The first
/// two and last two points are left alone. Runs in place, front to back.
fn smooth_interior(points: &mut [Vec3], factor: f32) {
    let len = points.len();
    if len < 5 {
        return;
    }
    for i in 2..len - 2 {
        let mid = (points[i - 1] + points[i + 1]) * 0.5;
        points[i] = points[i].lerp(mid, factor);
    }
}
