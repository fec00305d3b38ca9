//! The renderer capability consumed by the scene controller.
//!
//! A backend owns GPU-resident meshes addressed by [`MeshId`]. The controller
//! creates a mesh per entity, pushes vertex data whenever the entity moved,
//! and releases every mesh it created exactly once on teardown.

use crate::color::Rgb;
use crate::error::BackendError;
use crate::scene::Viewport;
use glam::Mat4;

/// Opaque handle to a backend-owned mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(u32);

impl MeshId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Interleaved vertex uploaded for both line strips and point sprites.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    pub fn new(position: glam::Vec3, color: Rgb) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    LineStrip,
    Points,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blend {
    Additive,
    Alpha,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub opacity: f32,
    pub blend: Blend,
    /// World-space sprite size; ignored for line strips.
    pub point_size: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshDesc {
    pub label: &'static str,
    pub primitive: Primitive,
    /// Maximum number of vertices the mesh will ever hold.
    pub capacity: usize,
    pub material: Material,
}

/// Exponential-squared distance fog.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fog {
    pub color: Rgb,
    pub density: f32,
}

/// Everything a backend needs to draw one frame besides mesh contents.
#[derive(Clone, Copy, Debug)]
pub struct SceneFrame {
    pub projection: Mat4,
    pub view: Mat4,
    pub model: Mat4,
    pub fog: Fog,
}

pub trait RenderBackend {
    fn create_mesh(&mut self, desc: &MeshDesc) -> Result<MeshId, BackendError>;

    /// Replace the mesh contents. Vertices beyond the mesh capacity are dropped.
    fn update_mesh(&mut self, mesh: MeshId, vertices: &[Vertex]) -> Result<(), BackendError>;

    fn set_opacity(&mut self, mesh: MeshId, opacity: f32) -> Result<(), BackendError>;

    fn resize(&mut self, viewport: Viewport);

    /// Draw every live mesh with the given camera and scene transform.
    fn draw(&mut self, frame: &SceneFrame) -> Result<(), BackendError>;

    /// Free the mesh's buffers. Unknown ids are ignored.
    fn release_mesh(&mut self, mesh: MeshId);

    /// Tear down the renderer itself after all meshes were released.
    fn shutdown(&mut self);
}
