//! yew_rocketgate/src/bridge.rs
//!
//! Mockable seam between this crate and the hosted card-fields script.
//!
//! # Overview
//! The script talks to the page through ambient window globals, which are
//! impossible to exercise outside a browser. [`CardFieldsBridge`] narrows
//! that surface to the three calls the embed actually makes, and
//! [`PaymentBridge`] is the cloneable handle components pass around.
//! Production uses [`ScriptBridge`] (the default); tests substitute their
//! own impl.
//!
//! # Usage
//! ```rust,ignore
//! use yew_rocketgate::{PaymentBridge, RocketGateFields};
//!
//! // Default script-backed bridge:
//! html! { <RocketGateFields src={fields_src}>{ children }</RocketGateFields> };
//!
//! // Or inject your own:
//! let bridge = PaymentBridge::new(MyRecordingBridge::default());
//! html! { <RocketGateFields src={fields_src} bridge={Some(bridge)}>{ children }</RocketGateFields> };
//! ```

use std::fmt;
use std::rc::Rc;

use thiserror::Error;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::JsValue;
use web_sys::js_sys::Reflect;
use web_sys::HtmlFormElement;
use yew::Callback;

use crate::bindings;
use crate::config::TOKEN_CALLBACK_GLOBAL;

/// Failures at the boundary to the hosted card-fields script.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmbedError {
    /// The script tag itself failed to load.
    #[error("card fields script failed to load")]
    ScriptLoadFailed,
    /// The script refused to inject its card-input iframes.
    #[error("could not inject card fields: {0}")]
    LoadFieldsFailed(String),
    /// The script refused the tokenization hand-off.
    #[error("could not submit card fields: {0}")]
    SubmitFailed(String),
    /// Installing the tokenization callback on `window` failed.
    #[error("could not register token callback: {0}")]
    CallbackInstallFailed(String),
}

/// The calls the embed makes against the hosted card-fields script.
pub trait CardFieldsBridge {
    /// Ask the script to inject its card-input iframes into the element
    /// with the given id.
    fn load_fields(&self, container_id: &str) -> Result<(), EmbedError>;

    /// Forward a validated payment form to the script for tokenization.
    fn submit_fields(&self, form: &HtmlFormElement) -> Result<(), EmbedError>;

    /// Register the callback the script invokes with the payment form once
    /// a token has been produced.
    fn on_token(&self, callback: Callback<HtmlFormElement>) -> Result<(), EmbedError>;
}

/// Shared, cloneable bridge handle. Equality is by identity, so a cloned
/// handle compares equal to its source and prop diffing stays cheap.
#[derive(Clone)]
pub struct PaymentBridge(Rc<dyn CardFieldsBridge>);

impl PaymentBridge {
    pub fn new(bridge: impl CardFieldsBridge + 'static) -> Self {
        Self(Rc::new(bridge))
    }
}

impl std::ops::Deref for PaymentBridge {
    type Target = dyn CardFieldsBridge;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl PartialEq for PaymentBridge {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(
            Rc::as_ptr(&self.0) as *const (),
            Rc::as_ptr(&other.0) as *const (),
        )
    }
}

impl Default for PaymentBridge {
    fn default() -> Self {
        Self::new(ScriptBridge)
    }
}

impl fmt::Debug for PaymentBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PaymentBridge")
    }
}

/// Production bridge backed by the script's window globals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptBridge;

impl CardFieldsBridge for ScriptBridge {
    fn load_fields(&self, container_id: &str) -> Result<(), EmbedError> {
        bindings::load_fields(container_id)
            .map_err(|err| EmbedError::LoadFieldsFailed(js_error_message(err)))
    }

    fn submit_fields(&self, form: &HtmlFormElement) -> Result<(), EmbedError> {
        bindings::submit_fields(form)
            .map_err(|err| EmbedError::SubmitFailed(js_error_message(err)))
    }

    fn on_token(&self, callback: Callback<HtmlFormElement>) -> Result<(), EmbedError> {
        let closure = Closure::wrap(Box::new(move |form: HtmlFormElement| {
            callback.emit(form);
        }) as Box<dyn FnMut(HtmlFormElement)>);

        Reflect::set(
            &gloo_utils::window(),
            &JsValue::from_str(TOKEN_CALLBACK_GLOBAL),
            closure.as_ref(),
        )
        .map(|_| ())
        .map_err(|err| EmbedError::CallbackInstallFailed(js_error_message(err)))?;

        // The script may invoke the callback at any point in the page's
        // lifetime, so the closure is leaked rather than dropped.
        closure.forget();

        Ok(())
    }
}

/// Best-effort message extraction from a caught JS value.
fn js_error_message(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}
