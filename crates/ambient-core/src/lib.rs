//! Generative animation engine behind the ambient page background.
//!
//! Platform-free: rendering, frame scheduling and input events are injected
//! through the traits in [`backend`] and [`schedule`], so the whole simulation
//! runs (and is tested) on the host.

pub mod background;
pub mod backend;
pub mod branch;
pub mod color;
pub mod config;
pub mod constants;
pub mod controller;
pub mod dust;
pub mod error;
pub mod field;
pub mod sampling;
pub mod scene;
pub mod schedule;
pub mod trail;

pub use background::Background;
pub use backend::{
    Blend, Fog, Material, MeshDesc, MeshId, Primitive, RenderBackend, SceneFrame, Vertex,
};
pub use branch::{BranchForest, BranchSpawn, GrowthBranch};
pub use color::{ColorCycler, ColorSpec, Palette, Rgb};
pub use config::{BackgroundConfig, BackgroundOptions, Mode};
pub use controller::SceneController;
pub use dust::DustField;
pub use error::{BackendError, BackgroundError, ConfigError};
pub use field::{FlowField, MotionField};
pub use scene::{Camera, RotationMode, SceneRotation, ScrollSample, Viewport};
pub use schedule::{
    CancelToken, FrameCallback, FrameScheduler, InputSource, InputState, SharedInput,
};
pub use trail::TrailLine;
