#![cfg(target_arch = "wasm32")]
//! Browser entry point: `initBackground` attaches the animated background to
//! a page canvas and hands back a handle whose `dispose` tears it all down.

use ambient_core::{
    Background, BackgroundConfig, BackgroundError, BackgroundOptions, ConfigError, RenderBackend,
    Viewport,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod dom;
mod events;
mod frame;
mod render;

use events::DomInput;
use frame::RafScheduler;
use render::GpuBackend;

const DEFAULT_TARGET_ID: &str = "three-canvas";

enum HandleState {
    /// GPU bring-up still in flight.
    Pending,
    Running(Background<GpuBackend>),
    Disposed,
    /// Bring-up failed; the handle is inert.
    Failed,
}

#[wasm_bindgen]
pub struct BackgroundHandle {
    state: Rc<RefCell<HandleState>>,
}

#[wasm_bindgen]
impl BackgroundHandle {
    /// Stop the animation, remove listeners and free GPU resources.
    /// Calling it again does nothing.
    pub fn dispose(&self) {
        let previous = std::mem::replace(&mut *self.state.borrow_mut(), HandleState::Disposed);
        match previous {
            HandleState::Running(background) => background.dispose(),
            HandleState::Pending => log::info!("[background] disposed before GPU was ready"),
            HandleState::Disposed | HandleState::Failed => {}
        }
    }
}

struct Target {
    window: web::Window,
    canvas: web::HtmlCanvasElement,
    config: BackgroundConfig,
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("ambient-web loaded");
    Ok(())
}

/// Attach the background to the canvas with id `target_id` (default
/// `three-canvas`). Returns a `BackgroundHandle`, or `null` when the page
/// cannot host it.
#[wasm_bindgen(js_name = initBackground)]
pub fn init_background(target_id: Option<String>, options: JsValue) -> JsValue {
    let id = target_id.as_deref().unwrap_or(DEFAULT_TARGET_ID);
    let target = match resolve_target(id, &options) {
        Ok(target) => target,
        Err(e) if e.is_environment_missing() => {
            log::warn!("[background] not started: {e}");
            return JsValue::NULL;
        }
        Err(e) => {
            log::error!("[background] invalid options: {e}");
            return JsValue::NULL;
        }
    };

    let state = Rc::new(RefCell::new(HandleState::Pending));
    let bring_up_state = state.clone();
    spawn_local(async move {
        bring_up(target, bring_up_state).await;
    });
    BackgroundHandle { state }.into()
}

fn parse_options(options: &JsValue) -> Result<BackgroundConfig, ConfigError> {
    if options.is_undefined() || options.is_null() {
        return Ok(BackgroundConfig::default());
    }
    #[allow(deprecated)]
    let opts: BackgroundOptions = options
        .into_serde()
        .map_err(|e| ConfigError::Malformed(e.to_string()))?;
    BackgroundConfig::try_from(opts)
}

fn resolve_target(id: &str, options: &JsValue) -> Result<Target, BackgroundError> {
    let config = parse_options(options)?;
    let (window, document) = dom::window_document()
        .ok_or_else(|| BackgroundError::BackendUnavailable("no window or document".into()))?;
    let canvas =
        dom::find_canvas(&document, id).ok_or_else(|| BackgroundError::SurfaceMissing(id.into()))?;
    if !dom::has_webgpu(&window) {
        return Err(BackgroundError::BackendUnavailable("navigator.gpu is missing".into()));
    }
    Ok(Target {
        window,
        canvas,
        config,
    })
}

async fn bring_up(target: Target, state: Rc<RefCell<HandleState>>) {
    let Target {
        window,
        canvas,
        config,
    } = target;
    let viewport: Viewport = dom::viewport_of(&window, &canvas);

    let mut backend = match GpuBackend::new(canvas.clone(), viewport).await {
        Ok(backend) => backend,
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            let mut s = state.borrow_mut();
            if matches!(*s, HandleState::Pending) {
                *s = HandleState::Failed;
            }
            return;
        }
    };

    if !matches!(*state.borrow(), HandleState::Pending) {
        backend.shutdown();
        return;
    }

    let scheduler = Rc::new(RafScheduler::new(window.clone()));
    let input = Box::new(DomInput::new(window, canvas));
    match Background::start(backend, config, viewport, scheduler, input) {
        Ok(background) => *state.borrow_mut() = HandleState::Running(background),
        Err(e) => {
            log::error!("[background] start failed: {e}");
            *state.borrow_mut() = HandleState::Failed;
        }
    }
}
