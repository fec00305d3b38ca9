//! Scene controller: owns the camera, the entity population, the dust layer
//! and every backend mesh created for them.
//!
//! One `tick` advances the simulation a single frame and submits one draw.
//! `dispose` releases each mesh exactly once and shuts the backend down.

use crate::backend::{
    Blend, Fog, Material, MeshDesc, MeshId, Primitive, RenderBackend, SceneFrame, Vertex,
};
use crate::branch::BranchForest;
use crate::color::{Palette, Rgb};
use crate::config::{BackgroundConfig, Mode};
use crate::constants::*;
use crate::dust::DustField;
use crate::error::{BackendError, BackgroundError};
use crate::field::FlowField;
use crate::sampling::{derive_seed, random_point_in_sphere};
use crate::scene::{Camera, RotationMode, SceneRotation, ScrollSample, Viewport};
use crate::trail::TrailLine;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

enum Population {
    Trails {
        lines: Vec<TrailLine>,
        meshes: Vec<MeshId>,
    },
    Branches {
        forest: BranchForest,
        meshes: Vec<Option<MeshId>>,
    },
}

pub struct SceneController<B: RenderBackend> {
    backend: B,
    config: BackgroundConfig,
    camera: Camera,
    viewport: Viewport,
    rotation: SceneRotation,
    field: FlowField,
    population: Population,
    dust: DustField,
    dust_mesh: Option<MeshId>,
    rng: StdRng,
    base_seed: u64,
    next_entity: u64,
    // per-instance vertex scratch reused for every upload
    scratch: Vec<Vertex>,
    last_spawn_ms: Option<f64>,
    frames: u64,
    draw_failing: bool,
    disposed: bool,
}

impl<B: RenderBackend> SceneController<B> {
    /// Build the scene and its initial population. Any backend failure while
    /// populating releases what was already created and is returned.
    pub fn new(
        backend: B,
        config: BackgroundConfig,
        viewport: Viewport,
    ) -> Result<Self, BackgroundError> {
        config.validate()?;
        let base_seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(base_seed);
        let camera =
            Camera::looking_at_origin(config.fov_degrees, config.camera_z, viewport.aspect());
        let rotation = SceneRotation::new(config.rotation_idle_ms, config.warmup_ms);
        let dust_radius = config.bounds * DUST_RADIUS_FRACTION;
        let dust = DustField::new(config.dust_count, dust_radius, &mut rng);
        let population = match config.mode {
            Mode::Trails => Population::Trails {
                lines: Vec::with_capacity(config.line_count),
                meshes: Vec::with_capacity(config.line_count),
            },
            Mode::Branches => Population::Branches {
                forest: BranchForest::new(
                    config.max_branches,
                    derive_seed(base_seed ^ FOREST_SEED_SALT, 0),
                ),
                meshes: Vec::with_capacity(config.max_branches),
            },
        };

        let mut controller = Self {
            backend,
            config,
            camera,
            viewport,
            rotation,
            field: FlowField::default(),
            population,
            dust,
            dust_mesh: None,
            rng,
            base_seed,
            next_entity: 0,
            scratch: Vec::new(),
            last_spawn_ms: None,
            frames: 0,
            draw_failing: false,
            disposed: false,
        };
        if let Err(e) = controller.populate() {
            controller.dispose();
            return Err(e.into());
        }
        log::info!(
            "[background] mode={:?} entities={} dust={} seed={}",
            controller.config.mode,
            controller.entity_count(),
            controller.dust.len(),
            base_seed
        );
        Ok(controller)
    }

    fn populate(&mut self) -> Result<(), BackendError> {
        self.backend.resize(self.viewport);

        if !self.dust.is_empty() {
            let mesh = self.backend.create_mesh(&dust_desc(self.dust.len()))?;
            self.dust_mesh = Some(mesh);
            self.dust.fill_vertices(&mut self.scratch);
            self.backend.update_mesh(mesh, &self.scratch)?;
            self.backend.set_opacity(mesh, self.dust.opacity())?;
        }

        match self.config.mode {
            Mode::Trails => {
                for _ in 0..self.config.initial_lines {
                    self.add_trail()?;
                }
            }
            Mode::Branches => {
                for _ in 0..self.config.branch_count {
                    self.add_new_branch()?;
                }
            }
        }
        Ok(())
    }

    /// Add one trail line at a random start point. Returns `false` when the
    /// configured line count is already reached.
    pub fn add_trail(&mut self) -> Result<bool, BackendError> {
        let Population::Trails { lines, meshes } = &mut self.population else {
            return Ok(false);
        };
        if lines.len() >= self.config.line_count {
            return Ok(false);
        }
        let bounds = self.config.bounds;
        let start = random_point_in_sphere(&mut self.rng, bounds * TRAIL_START_RADIUS_FRACTION)
            + Vec3::new(0.0, TRAIL_START_Y_SHIFT, 0.0);
        let seed = derive_seed(self.base_seed, self.next_entity);
        self.next_entity += 1;
        let palette = &self.config.palette;
        let mut line = TrailLine::new(start, self.config.segments, bounds, palette, seed);

        let mesh = self.backend.create_mesh(&trail_desc(line.segments()))?;
        line.take_dirty();
        line.fill_vertices(&mut self.scratch);
        if let Err(e) = self.backend.update_mesh(mesh, &self.scratch) {
            self.backend.release_mesh(mesh);
            return Err(e);
        }
        lines.push(line);
        meshes.push(mesh);
        Ok(true)
    }

    /// Add one root branch near the origin. Returns `false` when the forest is
    /// at its cap (or the scene is in trail mode).
    pub fn add_new_branch(&mut self) -> Result<bool, BackendError> {
        let Population::Branches { forest, meshes } = &mut self.population else {
            return Ok(false);
        };
        let Some(index) = forest.add_new_branch(&self.config.palette) else {
            return Ok(false);
        };
        let capacity = forest.branches()[index].max_points();
        // keep `meshes` index-aligned with the forest even when creation fails
        match self.backend.create_mesh(&branch_desc(capacity)) {
            Ok(mesh) => {
                meshes.push(Some(mesh));
                Ok(true)
            }
            Err(e) => {
                meshes.push(None);
                Err(e)
            }
        }
    }

    /// Advance one frame at `now_ms` and submit it.
    pub fn tick(&mut self, now_ms: f64, scroll: ScrollSample, viewport: Viewport) {
        if self.disposed {
            return;
        }
        if viewport != self.viewport {
            self.viewport = viewport;
            self.camera.aspect = viewport.aspect();
            self.backend.resize(viewport);
        }

        let last_spawn = *self.last_spawn_ms.get_or_insert(now_ms);
        let spawn_due = now_ms - last_spawn >= self.config.spawn_interval_ms;
        match self.config.mode {
            Mode::Trails => self.step_trails(now_ms, spawn_due),
            Mode::Branches => self.step_branches(now_ms, spawn_due),
        }

        if let Some(mesh) = self.dust_mesh {
            let opacity = self.dust.update(now_ms);
            if let Err(e) = self.backend.set_opacity(mesh, opacity) {
                log::warn!("[dust] opacity update failed: {e}");
            }
        }

        self.rotation.update(now_ms, scroll);

        let frame = SceneFrame {
            projection: self.camera.projection_matrix(),
            view: self.camera.view_matrix(),
            model: self.rotation.model_matrix(),
            fog: Fog {
                color: Rgb::from_hex(FOG_COLOR),
                density: self.config.fog_density,
            },
        };
        match self.backend.draw(&frame) {
            Ok(()) => self.draw_failing = false,
            Err(e) => {
                if !self.draw_failing {
                    log::error!("[background] draw failed, skipping frame: {e}");
                }
                self.draw_failing = true;
            }
        }
        self.frames += 1;
    }

    fn step_trails(&mut self, now_ms: f64, spawn_due: bool) {
        if let Population::Trails { lines, meshes } = &mut self.population {
            let time = (now_ms / 1000.0) as f32;
            for (line, mesh) in lines.iter_mut().zip(meshes.iter()) {
                line.step(time, &self.field, &self.config.palette);
                if line.take_dirty() {
                    line.fill_vertices(&mut self.scratch);
                    upload(&mut self.backend, *mesh, &self.scratch);
                }
            }
            if !spawn_due || lines.len() >= self.config.line_count {
                return;
            }
        } else {
            return;
        }
        self.last_spawn_ms = Some(now_ms);
        if let Err(e) = self.add_trail() {
            log::warn!("[spawn] trail skipped: {e}");
        }
    }

    fn step_branches(&mut self, now_ms: f64, spawn_due: bool) {
        let Population::Branches { forest, meshes } = &mut self.population else {
            return;
        };
        let added = forest.grow_all();
        for index in added {
            let capacity = forest.branches()[index].max_points();
            meshes.push(create_or_warn(&mut self.backend, &branch_desc(capacity)));
        }
        if spawn_due && !forest.is_full() {
            self.last_spawn_ms = Some(now_ms);
            if let Some(index) = forest.add_new_branch(&self.config.palette) {
                let capacity = forest.branches()[index].max_points();
                meshes.push(create_or_warn(&mut self.backend, &branch_desc(capacity)));
            }
            if forest.is_full() {
                log::debug!("[spawn] branch cap {} reached", forest.max_branches());
            }
        }
        for (branch, mesh) in forest.branches_mut().iter_mut().zip(meshes.iter()) {
            if let Some(mesh) = mesh {
                if branch.take_dirty() {
                    branch.fill_vertices(&mut self.scratch);
                    upload(&mut self.backend, *mesh, &self.scratch);
                }
            }
        }
    }

    /// Release every mesh and shut the backend down. Later calls do nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        let mut released = 0usize;
        match &mut self.population {
            Population::Trails { lines, meshes } => {
                for mesh in meshes.drain(..) {
                    self.backend.release_mesh(mesh);
                    released += 1;
                }
                lines.clear();
            }
            Population::Branches { meshes, .. } => {
                for mesh in meshes.drain(..).flatten() {
                    self.backend.release_mesh(mesh);
                    released += 1;
                }
            }
        }
        if let Some(mesh) = self.dust_mesh.take() {
            self.backend.release_mesh(mesh);
            released += 1;
        }
        self.backend.shutdown();
        log::info!(
            "[background] disposed after {} frames, released {released} meshes",
            self.frames
        );
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    pub fn config(&self) -> &BackgroundConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.config.palette
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn rotation(&self) -> &SceneRotation {
        &self.rotation
    }

    pub fn rotation_mode(&self) -> RotationMode {
        self.rotation.mode()
    }

    pub fn dust(&self) -> &DustField {
        &self.dust
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn trails(&self) -> &[TrailLine] {
        match &self.population {
            Population::Trails { lines, .. } => lines.as_slice(),
            Population::Branches { .. } => &[],
        }
    }

    pub fn forest(&self) -> Option<&BranchForest> {
        match &self.population {
            Population::Branches { forest, .. } => Some(forest),
            Population::Trails { .. } => None,
        }
    }

    pub fn entity_count(&self) -> usize {
        match &self.population {
            Population::Trails { lines, .. } => lines.len(),
            Population::Branches { forest, .. } => forest.len(),
        }
    }

    /// Meshes currently held (entities plus dust).
    pub fn live_mesh_count(&self) -> usize {
        let entities = match &self.population {
            Population::Trails { meshes, .. } => meshes.len(),
            Population::Branches { meshes, .. } => meshes.iter().flatten().count(),
        };
        entities + usize::from(self.dust_mesh.is_some())
    }
}

fn upload<B: RenderBackend>(backend: &mut B, mesh: MeshId, vertices: &[Vertex]) {
    if let Err(e) = backend.update_mesh(mesh, vertices) {
        log::warn!("[background] mesh upload failed: {e}");
    }
}

fn create_or_warn<B: RenderBackend>(backend: &mut B, desc: &MeshDesc) -> Option<MeshId> {
    match backend.create_mesh(desc) {
        Ok(mesh) => Some(mesh),
        Err(e) => {
            log::warn!("[spawn] {} mesh not created, entity will not render: {e}", desc.label);
            None
        }
    }
}

fn trail_desc(segments: usize) -> MeshDesc {
    MeshDesc {
        label: "trail",
        primitive: Primitive::LineStrip,
        capacity: segments,
        material: Material {
            opacity: TRAIL_OPACITY,
            blend: Blend::Additive,
            point_size: 0.0,
        },
    }
}

fn branch_desc(max_points: usize) -> MeshDesc {
    MeshDesc {
        label: "branch",
        primitive: Primitive::LineStrip,
        capacity: max_points,
        material: Material {
            opacity: BRANCH_OPACITY,
            blend: Blend::Additive,
            point_size: 0.0,
        },
    }
}

fn dust_desc(count: usize) -> MeshDesc {
    MeshDesc {
        label: "dust",
        primitive: Primitive::Points,
        capacity: count,
        material: Material {
            opacity: DUST_OPACITY_BASE,
            blend: Blend::Alpha,
            point_size: DUST_POINT_SIZE,
        },
    }
}
