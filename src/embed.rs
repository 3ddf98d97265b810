//! embed.rs
//!
//! `RocketGateFields`, the component that hosts the external card-fields
//! script on the page: it injects the script, hands it a container for the
//! sensitive card-input iframes, wires up the tokenization callback, and
//! owns the `<form>` the rest of the crate's field components render into.

use wasm_bindgen::prelude::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Array, Reflect};
use web_sys::{
    console, HtmlFormElement, HtmlInputElement, MutationObserver, MutationObserverInit,
    MutationRecord, SubmitEvent,
};
use yew::prelude::*;

use crate::bridge::{EmbedError, PaymentBridge};
use crate::config::{
    BLACK_BOX_FIELD, CARD_FIELDS_CONTAINER_ID, CSRF_TOKEN_FIELD, PAYMENT_FORM_GLOBAL,
    PAYMENT_FORM_ID, PAYMENT_METHOD_FIELD,
};
use crate::flow::{PaymentFlowAction, PaymentFlowHandle};
use crate::form::use_payment_form;
use crate::interop::{use_payment_script, use_scrub_script, ScriptStatus};

#[derive(Properties, PartialEq)]
pub struct RocketGateFieldsProps {
    /// URL of the merchant's hosted card-fields script.
    pub src: String,
    #[prop_or_default]
    pub class: Classes,
    /// Also load the iovation fraud collector and carry its black-box
    /// field on the payment form.
    #[prop_or_default]
    pub scrub: bool,
    /// Bridge to the card-fields script. Defaults to the script-backed
    /// bridge; inject a substitute to run without the real script.
    #[prop_or_default]
    pub bridge: Option<PaymentBridge>,
    /// Bound to the payment `<form>` element. Hosts that need to submit
    /// programmatically can dispatch a bubbling `submit` event through it,
    /// which runs the same validating handler as the submit button.
    #[prop_or_default]
    pub form_ref: NodeRef,
    /// Fired once the script has populated the card-fields container and
    /// the CSRF token could be read from it.
    #[prop_or_default]
    pub on_form_ready: Callback<()>,
    /// Fired with the payment form once the script reports a token.
    #[prop_or_default]
    pub on_tokenized: Callback<HtmlFormElement>,
    /// Fired on script-load and bridge failures. These never enter the
    /// payment flow state; absence of progress is the only flow-visible
    /// symptom, so hosts that want to react must do so here.
    #[prop_or_default]
    pub on_script_error: Callback<EmbedError>,
    #[prop_or_default]
    pub children: Children,
}

/// The embed host for the card-fields script.
///
/// Must be mounted inside a [`PaymentFormProvider`](crate::PaymentFormProvider).
/// A [`PaymentFlowProvider`](crate::PaymentFlowProvider) above it is
/// optional; when present, tokenization is reported into the flow as well
/// as through `on_tokenized`.
///
/// The component renders a hidden container the script fills with its
/// card-input iframes, plus the payment `<form>` that carries the
/// non-sensitive fields. Submitting that form validates the crate-held
/// values and, only when they are clean, forwards the form to the script
/// for tokenization.
#[function_component(RocketGateFields)]
pub fn rocketgate_fields(props: &RocketGateFieldsProps) -> Html {
    let form_handle = use_payment_form();
    let flow = use_context::<PaymentFlowHandle>();

    let bridge = props.bridge.clone().unwrap_or_default();
    let script_status = use_payment_script(&props.src);
    use_scrub_script(props.scrub);

    let csrf_token = use_state(String::default);
    let container_ref = use_node_ref();
    let form_ref = props.form_ref.clone();

    // Once the script is live, hand it the container and install the
    // tokenization callback.
    {
        let bridge = bridge.clone();
        let flow = flow.clone();
        let on_tokenized = props.on_tokenized.clone();
        let on_script_error = props.on_script_error.clone();
        use_effect_with(script_status, move |status| {
            match status {
                ScriptStatus::Ready => {
                    if let Err(err) = bridge.load_fields(CARD_FIELDS_CONTAINER_ID) {
                        console::error_1(&JsValue::from_str(&err.to_string()));
                        on_script_error.emit(err);
                    }

                    let token_callback = Callback::from(move |form: HtmlFormElement| {
                        if let Some(flow) = &flow {
                            flow.apply(PaymentFlowAction::Tokenized);
                        }
                        on_tokenized.emit(form);
                    });
                    if let Err(err) = bridge.on_token(token_callback) {
                        console::error_1(&JsValue::from_str(&err.to_string()));
                        on_script_error.emit(err);
                    }
                }
                ScriptStatus::Failed => {
                    console::error_1(&JsValue::from_str("RocketGate script failed to load"));
                    on_script_error.emit(EmbedError::ScriptLoadFailed);
                }
                ScriptStatus::Pending => {}
            }
            || ()
        });
    }

    // The script gives no completion signal for the field injection, so
    // watch the container: the first inserted child means the CSRF token
    // input is readable and the form is usable.
    {
        let container_ref = container_ref.clone();
        let csrf_token = csrf_token.clone();
        let on_form_ready = props.on_form_ready.clone();
        use_effect_with((), move |_| {
            let callback = Closure::wrap(Box::new(move |mutations: Array| {
                let inserted = mutations
                    .get(0)
                    .dyn_into::<MutationRecord>()
                    .map(|record| record.added_nodes().length() > 0)
                    .unwrap_or(false);
                if !inserted {
                    return;
                }

                let field = gloo_utils::document()
                    .get_element_by_id(CSRF_TOKEN_FIELD)
                    .and_then(|element| element.dyn_into::<HtmlInputElement>().ok());
                if let Some(field) = field {
                    csrf_token.set(field.value());
                    on_form_ready.emit(());
                }
            }) as Box<dyn FnMut(Array)>);

            let observer = MutationObserver::new(callback.as_ref().unchecked_ref())
                .expect("create mutation observer");

            let options = MutationObserverInit::new();
            options.set_child_list(true);

            if let Some(container) = container_ref.get() {
                observer
                    .observe_with_options(&container, &options)
                    .expect("observe card fields container");
            }

            move || {
                observer.disconnect();
                drop(callback);
            }
        });
    }

    // Publish the form element for the script to introspect.
    {
        let form_ref = form_ref.clone();
        use_effect_with((), move |_| {
            if let Some(form) = form_ref.cast::<HtmlFormElement>() {
                if let Err(err) = Reflect::set(
                    &gloo_utils::window(),
                    &JsValue::from_str(PAYMENT_FORM_GLOBAL),
                    form.as_ref(),
                ) {
                    console::error_1(&err);
                }
            }

            || {
                let _ = Reflect::delete_property(
                    &gloo_utils::window(),
                    &JsValue::from_str(PAYMENT_FORM_GLOBAL),
                );
            }
        });
    }

    let onsubmit = {
        let form_handle = form_handle.clone();
        let bridge = bridge.clone();
        let form_ref = form_ref.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if let Some(form) = form_ref.cast::<HtmlFormElement>() {
                form_handle.submit_with(&bridge, &form);
            }
        })
    };

    html! {
        <>
            // The container is only needed until the script has filled it
            // and the CSRF token has been lifted onto the form.
            if csrf_token.is_empty() {
                <div
                    id={CARD_FIELDS_CONTAINER_ID}
                    ref={container_ref}
                    style="display: none;"
                />
            }

            <form
                class={props.class.clone()}
                id={PAYMENT_FORM_ID}
                novalidate={true}
                {onsubmit}
                ref={form_ref}
            >
                <input id={PAYMENT_METHOD_FIELD} type="hidden" value="card" />
                if !csrf_token.is_empty() {
                    <input id={CSRF_TOKEN_FIELD} type="hidden" value={(*csrf_token).clone()} />
                }
                if props.scrub {
                    <input id={BLACK_BOX_FIELD} name={BLACK_BOX_FIELD} type="hidden" />
                }

                { for props.children.iter() }
            </form>
        </>
    }
}
