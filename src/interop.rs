//! interop.rs
//!
//! Custom Yew hooks that load the external scripts at runtime (no inline JS).
//!
//! # Overview
//! `use_payment_script(src)` injects a single
//! `<script id="rg-script" src={src} defer>` on first use and tracks its
//! lifecycle as a [`ScriptStatus`]. The hosted card-fields script is served
//! per merchant, so the URL is an argument rather than a constant; changing
//! it removes the old tag and injects the new one.
//!
//! `use_scrub_script(enabled)` does the same for the optional iovation
//! fraud-detection collector, keyed on a flag instead of a URL.
//!
//! # Usage
//! ```rust,ignore
//! use yew::prelude::*;
//! use yew_rocketgate::{use_payment_script, ScriptStatus};
//!
//! #[function_component(App)]
//! fn app() -> Html {
//!     let status = use_payment_script("https://secure.rocketgate.com/hostedFields/fields.js");
//!     html! {
//!         if status == ScriptStatus::Ready {
//!             <p>{"fields script loaded"}</p>
//!         } else {
//!             <p>{"loading..."}</p>
//!         }
//!     }
//! }
//! ```

use wasm_bindgen::prelude::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Reflect;
use web_sys::HtmlScriptElement;
use yew::functional::hook;
use yew::prelude::*;

use crate::config::{LOAD_FIELDS_GLOBAL, SCRIPT_ELEMENT_ID, SCRUB_SCRIPT_ID, SCRUB_SCRIPT_SRC};

/// Lifecycle of an injected script tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptStatus {
    /// Still being fetched and parsed.
    Pending,
    /// The `load` event fired (or the script was already live).
    Ready,
    /// The `error` event fired; the tag will never become ready.
    Failed,
}

/// Load the hosted card-fields script once and track its readiness.
///
/// Returns [`ScriptStatus::Ready`] immediately when the script's entry
/// point already exists on `window` (for example after a previous mount);
/// otherwise injects the tag and reports the load outcome. The injected
/// tag is removed again when `src` changes or the component unmounts.
#[hook]
pub fn use_payment_script(src: &str) -> ScriptStatus {
    let status = use_state_eq(|| {
        let installed = Reflect::has(
            &gloo_utils::window(),
            &JsValue::from_str(LOAD_FIELDS_GLOBAL),
        )
        .unwrap_or(false);

        if installed {
            ScriptStatus::Ready
        } else {
            ScriptStatus::Pending
        }
    });

    {
        let status = status.clone();
        use_effect_with(src.to_owned(), move |src| {
            let mut injected: Option<HtmlScriptElement> = None;

            // Only inject while the script is genuinely absent.
            if *status != ScriptStatus::Ready {
                let document = gloo_utils::document();

                if document.get_element_by_id(SCRIPT_ELEMENT_ID).is_none() {
                    let script: HtmlScriptElement = document
                        .create_element("script")
                        .expect("create script")
                        .dyn_into()
                        .expect("cast script");

                    script.set_id(SCRIPT_ELEMENT_ID);
                    script.set_src(src);
                    script.set_defer(true);

                    let onload = {
                        let status = status.clone();
                        Closure::wrap(Box::new(move || {
                            status.set(ScriptStatus::Ready);
                        }) as Box<dyn Fn()>)
                    };
                    script.set_onload(Some(onload.as_ref().unchecked_ref()));
                    onload.forget();

                    let onerror = {
                        let status = status.clone();
                        Closure::wrap(Box::new(move || {
                            status.set(ScriptStatus::Failed);
                        }) as Box<dyn Fn()>)
                    };
                    script.set_onerror(Some(onerror.as_ref().unchecked_ref()));
                    onerror.forget();

                    gloo_utils::body()
                        .append_child(&script)
                        .expect("append script");

                    injected = Some(script);
                }
            }

            move || {
                if let Some(script) = injected {
                    script.remove();
                }
            }
        });
    }

    *status
}

/// Inject the iovation collector script while `enabled` is true, and remove
/// it again when the flag drops or the component unmounts. The collector
/// fills the `ioBlackBox` form field on its own; there is nothing to wait
/// for, so no status is reported.
#[hook]
pub fn use_scrub_script(enabled: bool) {
    use_effect_with(enabled, move |enabled| {
        let mut injected: Option<HtmlScriptElement> = None;

        if *enabled {
            let document = gloo_utils::document();

            if document.get_element_by_id(SCRUB_SCRIPT_ID).is_none() {
                let script: HtmlScriptElement = document
                    .create_element("script")
                    .expect("create script")
                    .dyn_into()
                    .expect("cast script");

                script.set_id(SCRUB_SCRIPT_ID);
                script.set_src(SCRUB_SCRIPT_SRC);
                script.set_defer(true);

                gloo_utils::body()
                    .append_child(&script)
                    .expect("append script");

                injected = Some(script);
            }
        }

        move || {
            if let Some(script) = injected {
                script.remove();
            }
        }
    });
}
