// Host-side doubles for the injected capabilities: a backend that records every
// call, a scheduler advanced by hand and an input source the test writes to.

#![allow(dead_code)]

use ambient_core::*;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

#[derive(Default)]
pub struct BackendLog {
    pub created: Vec<(MeshId, MeshDesc)>,
    pub released: Vec<MeshId>,
    pub contents: BTreeMap<MeshId, Vec<Vertex>>,
    pub opacity: BTreeMap<MeshId, f32>,
    pub updates: usize,
    pub draws: usize,
    pub last_frame: Option<SceneFrame>,
    pub resizes: Vec<Viewport>,
    pub shutdowns: usize,
}

impl BackendLog {
    pub fn live(&self) -> usize {
        self.created.len() - self.released.len()
    }

    pub fn release_count(&self, mesh: MeshId) -> usize {
        self.released.iter().filter(|m| **m == mesh).count()
    }
}

pub struct RecordingBackend {
    pub log: Rc<RefCell<BackendLog>>,
    next_id: u32,
    /// Fail `create_mesh` once this many meshes exist.
    pub fail_create_after: Option<usize>,
    pub fail_draw: bool,
}

impl RecordingBackend {
    pub fn new() -> (Self, Rc<RefCell<BackendLog>>) {
        let log = Rc::new(RefCell::new(BackendLog::default()));
        let backend = Self {
            log: log.clone(),
            next_id: 0,
            fail_create_after: None,
            fail_draw: false,
        };
        (backend, log)
    }

    pub fn failing_after(count: usize) -> (Self, Rc<RefCell<BackendLog>>) {
        let (mut backend, log) = Self::new();
        backend.fail_create_after = Some(count);
        (backend, log)
    }
}

impl RenderBackend for RecordingBackend {
    fn create_mesh(&mut self, desc: &MeshDesc) -> Result<MeshId, BackendError> {
        let mut log = self.log.borrow_mut();
        if let Some(limit) = self.fail_create_after {
            if log.created.len() >= limit {
                return Err(BackendError::ResourceCreation("out of memory".into()));
            }
        }
        let id = MeshId::new(self.next_id);
        self.next_id += 1;
        log.created.push((id, *desc));
        log.contents.insert(id, Vec::new());
        log.opacity.insert(id, desc.material.opacity);
        Ok(id)
    }

    fn update_mesh(&mut self, mesh: MeshId, vertices: &[Vertex]) -> Result<(), BackendError> {
        let mut log = self.log.borrow_mut();
        log.updates += 1;
        let capacity = log
            .created
            .iter()
            .find(|(id, _)| *id == mesh)
            .map(|(_, d)| d.capacity)
            .ok_or(BackendError::UnknownMesh(mesh))?;
        let slot = log.contents.get_mut(&mesh).ok_or(BackendError::UnknownMesh(mesh))?;
        slot.clear();
        slot.extend_from_slice(&vertices[..vertices.len().min(capacity)]);
        Ok(())
    }

    fn set_opacity(&mut self, mesh: MeshId, opacity: f32) -> Result<(), BackendError> {
        let mut log = self.log.borrow_mut();
        let slot = log.opacity.get_mut(&mesh).ok_or(BackendError::UnknownMesh(mesh))?;
        *slot = opacity;
        Ok(())
    }

    fn resize(&mut self, viewport: Viewport) {
        self.log.borrow_mut().resizes.push(viewport);
    }

    fn draw(&mut self, frame: &SceneFrame) -> Result<(), BackendError> {
        if self.fail_draw {
            return Err(BackendError::Draw("surface lost".into()));
        }
        let mut log = self.log.borrow_mut();
        log.draws += 1;
        log.last_frame = Some(*frame);
        Ok(())
    }

    fn release_mesh(&mut self, mesh: MeshId) {
        let mut log = self.log.borrow_mut();
        log.contents.remove(&mesh);
        log.opacity.remove(&mesh);
        log.released.push(mesh);
    }

    fn shutdown(&mut self) {
        self.log.borrow_mut().shutdowns += 1;
    }
}

#[derive(Default)]
pub struct ManualScheduler {
    next: Cell<i64>,
    pending: RefCell<Vec<(CancelToken, FrameCallback)>>,
    pub cancelled: RefCell<Vec<CancelToken>>,
}

impl ManualScheduler {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Fire every callback scheduled before this call.
    pub fn run_frame(&self, now_ms: f64) -> usize {
        let due: Vec<_> = self.pending.borrow_mut().drain(..).collect();
        let count = due.len();
        for (_, callback) in due {
            callback(now_ms);
        }
        count
    }

    /// Run frames at a fixed cadence starting at `start_ms`.
    pub fn run_frames(&self, start_ms: f64, step_ms: f64, frames: usize) {
        for i in 0..frames {
            self.run_frame(start_ms + step_ms * i as f64);
        }
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule_frame(&self, callback: FrameCallback) -> CancelToken {
        let token = CancelToken::new(self.next.get());
        self.next.set(self.next.get() + 1);
        self.pending.borrow_mut().push((token, callback));
        token
    }

    fn cancel_frame(&self, token: CancelToken) {
        self.cancelled.borrow_mut().push(token);
        self.pending.borrow_mut().retain(|(t, _)| *t != token);
    }
}

#[derive(Default)]
pub struct InputLog {
    pub connects: usize,
    pub disconnects: usize,
    pub input: Option<SharedInput>,
}

impl InputLog {
    pub fn listening(&self) -> bool {
        self.connects > self.disconnects
    }
}

pub struct ManualInput {
    log: Rc<RefCell<InputLog>>,
}

impl ManualInput {
    pub fn new() -> (Box<Self>, Rc<RefCell<InputLog>>) {
        let log = Rc::new(RefCell::new(InputLog::default()));
        (Box::new(Self { log: log.clone() }), log)
    }
}

impl InputSource for ManualInput {
    fn connect(&mut self, input: SharedInput) {
        let mut log = self.log.borrow_mut();
        log.connects += 1;
        log.input = Some(input);
    }

    fn disconnect(&mut self) {
        let mut log = self.log.borrow_mut();
        log.disconnects += 1;
        log.input = None;
    }
}

/// Emit a scroll event through the connected input, if any.
pub fn scroll(log: &Rc<RefCell<InputLog>>, scroll_px: f64, now_ms: f64) {
    if let Some(input) = &log.borrow().input {
        input.borrow_mut().record_scroll(scroll_px, now_ms);
    }
}

pub fn resize(log: &Rc<RefCell<InputLog>>, viewport: Viewport) {
    if let Some(input) = &log.borrow().input {
        input.borrow_mut().record_resize(viewport);
    }
}

pub fn viewport() -> Viewport {
    Viewport::new(1280.0, 720.0, 1.0)
}

pub fn seeded_config(mode: Mode) -> BackgroundConfig {
    BackgroundConfig {
        mode,
        seed: Some(7),
        line_count: 12,
        initial_lines: 12,
        segments: 40,
        dust_count: 50,
        branch_count: 4,
        max_branches: 10,
        ..BackgroundConfig::default()
    }
}
