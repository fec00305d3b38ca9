use ambient_core::{InputSource, SharedInput};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::dom;

/// Window scroll and resize listeners feeding the shared input state.
pub struct DomInput {
    window: web::Window,
    canvas: web::HtmlCanvasElement,
    scroll: Option<Closure<dyn FnMut()>>,
    resize: Option<Closure<dyn FnMut()>>,
}

impl DomInput {
    pub fn new(window: web::Window, canvas: web::HtmlCanvasElement) -> Self {
        Self {
            window,
            canvas,
            scroll: None,
            resize: None,
        }
    }
}

impl InputSource for DomInput {
    fn connect(&mut self, input: SharedInput) {
        self.disconnect();

        let window = self.window.clone();
        let scroll_input = input.clone();
        let scroll = Closure::wrap(Box::new(move || {
            let offset = window.scroll_y().unwrap_or(0.0);
            scroll_input
                .borrow_mut()
                .record_scroll(offset, instant::now());
        }) as Box<dyn FnMut()>);
        let opts = web::AddEventListenerOptions::new();
        opts.set_passive(true);
        if let Err(e) = self
            .window
            .add_event_listener_with_callback_and_add_event_listener_options(
                "scroll",
                scroll.as_ref().unchecked_ref(),
                &opts,
            )
        {
            log::warn!("[input] scroll listener not registered: {:?}", e);
        }

        let window = self.window.clone();
        let canvas = self.canvas.clone();
        let resize = Closure::wrap(Box::new(move || {
            input
                .borrow_mut()
                .record_resize(dom::viewport_of(&window, &canvas));
        }) as Box<dyn FnMut()>);
        if let Err(e) = self
            .window
            .add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())
        {
            log::warn!("[input] resize listener not registered: {:?}", e);
        }

        self.scroll = Some(scroll);
        self.resize = Some(resize);
    }

    fn disconnect(&mut self) {
        if let Some(scroll) = self.scroll.take() {
            let _ = self
                .window
                .remove_event_listener_with_callback("scroll", scroll.as_ref().unchecked_ref());
        }
        if let Some(resize) = self.resize.take() {
            let _ = self
                .window
                .remove_event_listener_with_callback("resize", resize.as_ref().unchecked_ref());
        }
    }
}
