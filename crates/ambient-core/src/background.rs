//! The running background: scene controller, frame loop and input wiring
//! behind a handle whose only operation is `dispose`.

use crate::backend::RenderBackend;
use crate::config::BackgroundConfig;
use crate::controller::SceneController;
use crate::error::BackgroundError;
use crate::scene::Viewport;
use crate::schedule::{CancelToken, FrameScheduler, InputSource, InputState, SharedInput};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

struct LoopInner<B: RenderBackend> {
    controller: RefCell<SceneController<B>>,
    scheduler: Rc<dyn FrameScheduler>,
    input_source: RefCell<Box<dyn InputSource>>,
    input: SharedInput,
    pending: Cell<Option<CancelToken>>,
    running: Cell<bool>,
}

pub struct Background<B: RenderBackend + 'static> {
    inner: Rc<LoopInner<B>>,
}

impl<B: RenderBackend + 'static> Background<B> {
    /// Build the scene, connect input and schedule the first frame.
    ///
    /// On error nothing is left running: no frame is scheduled, no listener
    /// registered, and every mesh created so far has been released.
    pub fn start(
        backend: B,
        config: BackgroundConfig,
        viewport: Viewport,
        scheduler: Rc<dyn FrameScheduler>,
        mut input_source: Box<dyn InputSource>,
    ) -> Result<Self, BackgroundError> {
        let controller = SceneController::new(backend, config, viewport)?;
        let input = InputState::shared(viewport);
        input_source.connect(input.clone());

        let inner = Rc::new(LoopInner {
            controller: RefCell::new(controller),
            scheduler,
            input_source: RefCell::new(input_source),
            input,
            pending: Cell::new(None),
            running: Cell::new(true),
        });
        schedule_next(&inner);
        log::info!("[background] started");
        Ok(Self { inner })
    }

    /// Stop the loop, remove listeners and release all GPU resources.
    /// Safe to call any number of times.
    pub fn dispose(&self) {
        if !self.inner.running.replace(false) {
            return;
        }
        if let Some(token) = self.inner.pending.take() {
            self.inner.scheduler.cancel_frame(token);
        }
        self.inner.input_source.borrow_mut().disconnect();
        self.inner.controller.borrow_mut().dispose();
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    pub fn input(&self) -> SharedInput {
        self.inner.input.clone()
    }

    pub fn with_controller<R>(&self, f: impl FnOnce(&SceneController<B>) -> R) -> R {
        f(&self.inner.controller.borrow())
    }

    pub fn with_controller_mut<R>(&self, f: impl FnOnce(&mut SceneController<B>) -> R) -> R {
        f(&mut self.inner.controller.borrow_mut())
    }
}

impl<B: RenderBackend + 'static> Drop for Background<B> {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn schedule_next<B: RenderBackend + 'static>(inner: &Rc<LoopInner<B>>) {
    let weak: Weak<LoopInner<B>> = Rc::downgrade(inner);
    let token = inner.scheduler.schedule_frame(Box::new(move |now_ms| {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        if !inner.running.get() {
            return;
        }
        inner.pending.set(None);
        let (scroll, viewport) = {
            let input = inner.input.borrow();
            (input.scroll(), input.viewport())
        };
        inner.controller.borrow_mut().tick(now_ms, scroll, viewport);
        if inner.running.get() {
            schedule_next(&inner);
        }
    }));
    inner.pending.set(Some(token));
}
