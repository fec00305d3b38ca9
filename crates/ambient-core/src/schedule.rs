//! Host capabilities injected into the animation loop: a frame scheduler and
//! an input-event source. Browsers back these with `requestAnimationFrame` and
//! DOM listeners; tests drive them by hand.

use crate::scene::{ScrollSample, Viewport};
use std::cell::RefCell;
use std::rc::Rc;

/// Invoked once with the frame timestamp in milliseconds.
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Identifies a scheduled frame so it can be cancelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CancelToken(i64);

impl CancelToken {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> i64 {
        self.0
    }
}

pub trait FrameScheduler {
    fn schedule_frame(&self, callback: FrameCallback) -> CancelToken;

    /// Cancelling an already-fired or unknown token is a no-op.
    fn cancel_frame(&self, token: CancelToken);
}

/// Latest scroll and viewport values written by input handlers and read by
/// the loop. Each field is overwritten wholesale.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    scroll: ScrollSample,
    viewport: Viewport,
}

pub type SharedInput = Rc<RefCell<InputState>>;

impl InputState {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            scroll: ScrollSample::default(),
            viewport,
        }
    }

    pub fn shared(viewport: Viewport) -> SharedInput {
        Rc::new(RefCell::new(Self::new(viewport)))
    }

    /// `scroll_px` is the page scroll offset; it is stored normalized by the
    /// current viewport height.
    pub fn record_scroll(&mut self, scroll_px: f64, now_ms: f64) {
        let normalized = scroll_px / self.viewport.height.max(1.0);
        self.scroll = ScrollSample {
            normalized: normalized as f32,
            last_event_ms: Some(now_ms),
        };
    }

    pub fn record_resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn scroll(&self) -> ScrollSample {
        self.scroll
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

/// Source of scroll and resize events.
pub trait InputSource {
    /// Start writing events into `input`.
    fn connect(&mut self, input: SharedInput);

    /// Remove every listener registered by `connect`.
    fn disconnect(&mut self);
}
