use ambient_core::Viewport;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<(web::Window, web::Document)> {
    let window = web::window()?;
    let document = window.document()?;
    Some((window, document))
}

/// Look up the target element and make sure it is a canvas.
pub fn find_canvas(document: &web::Document, id: &str) -> Option<web::HtmlCanvasElement> {
    document
        .get_element_by_id(id)?
        .dyn_into::<web::HtmlCanvasElement>()
        .ok()
}

#[inline]
pub fn has_webgpu(window: &web::Window) -> bool {
    js_sys::Reflect::has(&window.navigator(), &"gpu".into()).unwrap_or(false)
}

/// CSS size of the canvas plus the device pixel ratio. Falls back to the
/// window's inner size while the canvas has not been laid out yet.
pub fn viewport_of(window: &web::Window, canvas: &web::HtmlCanvasElement) -> Viewport {
    let rect = canvas.get_bounding_client_rect();
    let (mut width, mut height) = (rect.width(), rect.height());
    if width <= 0.0 || height <= 0.0 {
        width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1.0);
        height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1.0);
    }
    Viewport::new(width, height, window.device_pixel_ratio())
}

pub fn apply_backing_size(canvas: &web::HtmlCanvasElement, viewport: Viewport) {
    let (w_px, h_px) = viewport.physical_size();
    if canvas.width() != w_px {
        canvas.set_width(w_px);
    }
    if canvas.height() != h_px {
        canvas.set_height(h_px);
    }
}
