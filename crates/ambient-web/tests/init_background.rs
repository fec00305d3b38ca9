#![cfg(target_arch = "wasm32")]
// initBackground's result as page scripts see it, run in a headless browser.

use ambient_web::init_background;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn missing_canvas_yields_null() {
    let handle = init_background(Some("no-such-canvas".into()), JsValue::UNDEFINED);
    assert!(handle.is_null());
    assert!(!handle.is_undefined());
}

#[wasm_bindgen_test]
fn malformed_options_yield_null() {
    let options = js_sys::JSON::parse(r#"{"lineCount": "many"}"#).unwrap();
    let handle = init_background(None, options);
    assert!(handle.is_null());
}
