use ambient_core::{CancelToken, FrameCallback, FrameScheduler};
use std::cell::RefCell;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// `requestAnimationFrame` scheduler.
///
/// The closure for the pending frame is owned here. When the next frame is
/// requested from inside a running callback, that callback's closure moves to
/// `retired` instead of being dropped while it is still on the stack.
pub struct RafScheduler {
    window: web::Window,
    current: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    retired: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl RafScheduler {
    pub fn new(window: web::Window) -> Self {
        Self {
            window,
            current: RefCell::new(None),
            retired: RefCell::new(None),
        }
    }

    fn retire_current(&self) {
        let previous = self.current.borrow_mut().take();
        *self.retired.borrow_mut() = previous;
    }
}

impl FrameScheduler for RafScheduler {
    fn schedule_frame(&self, callback: FrameCallback) -> CancelToken {
        let closure: Closure<dyn FnMut(f64)> =
            Closure::once(move |timestamp: f64| callback(timestamp));
        let id = match self
            .window
            .request_animation_frame(closure.as_ref().unchecked_ref())
        {
            Ok(id) => id,
            Err(e) => {
                log::error!("[frame] requestAnimationFrame failed: {:?}", e);
                return CancelToken::new(-1);
            }
        };
        self.retire_current();
        *self.current.borrow_mut() = Some(closure);
        CancelToken::new(i64::from(id))
    }

    fn cancel_frame(&self, token: CancelToken) {
        let Ok(id) = i32::try_from(token.raw()) else {
            return;
        };
        if id < 0 {
            return;
        }
        let _ = self.window.cancel_animation_frame(id);
        self.retire_current();
    }
}
