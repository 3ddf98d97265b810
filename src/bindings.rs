//! yew_rocketgate/src/bindings.rs
//!
//! Low-level wasm-bindgen bindings to the window globals the hosted
//! card-fields script installs once it has loaded.
//!
//! Both entry points are fallible from the JS side (the script may not be
//! loaded yet, or may throw while wiring its iframes), so they are bound
//! with `catch`. The mockable wrapper hosts actually use lives in
//! `bridge.rs`.

use wasm_bindgen::prelude::*;
use web_sys::HtmlFormElement;

#[wasm_bindgen]
extern "C" {
    /// `window.RocketGateLoadFields(containerId)`
    ///
    /// Injects the sensitive card-input iframes into the element with the
    /// given id.
    #[wasm_bindgen(catch, js_name = RocketGateLoadFields, js_namespace = window)]
    pub fn load_fields(container_id: &str) -> Result<(), JsValue>;

    /// `window.RocketGateSubmitFields(form)`
    ///
    /// Hands the validated payment form over to the script for
    /// tokenization.
    #[wasm_bindgen(catch, js_name = RocketGateSubmitFields, js_namespace = window)]
    pub fn submit_fields(form: &HtmlFormElement) -> Result<(), JsValue>;
}
