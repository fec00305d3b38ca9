use crate::backend::Vertex;
use crate::color::Rgb;
use crate::constants::*;
use crate::sampling::random_point_in_sphere;
use glam::Vec3;
use rand::Rng;

/// Static point cloud whose only animated property is its opacity.
pub struct DustField {
    points: Vec<Vec3>,
    color: Rgb,
    opacity: f32,
}

impl DustField {
    pub fn new<R: Rng + ?Sized>(count: usize, radius: f32, rng: &mut R) -> Self {
        let points = (0..count)
            .map(|_| random_point_in_sphere(rng, radius))
            .collect();
        Self {
            points,
            color: Rgb::from_hex(DUST_COLOR),
            opacity: DUST_OPACITY_BASE,
        }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Recompute the opacity for the frame timestamp `now_ms`.
    pub fn update(&mut self, now_ms: f64) -> f32 {
        self.opacity = opacity_at(now_ms);
        self.opacity
    }

    pub fn fill_vertices(&self, out: &mut Vec<Vertex>) {
        out.clear();
        out.extend(self.points.iter().map(|p| Vertex::new(*p, self.color)));
    }
}

pub fn opacity_at(now_ms: f64) -> f32 {
    DUST_OPACITY_BASE + DUST_OPACITY_SWING * (now_ms * DUST_OPACITY_RATE).sin() as f32
}
