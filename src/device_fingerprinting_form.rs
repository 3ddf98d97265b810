//! device_fingerprinting_form.rs
//!
//! Hidden form/iframe pair that POSTs the device-collection JWT to
//! Cardinal, plus the `message` listener that feeds the reply back into
//! the payment flow.
//!
//! While the flow sits at `Fingerprinting` the component renders a hidden
//! iframe and a same-named hidden form pointed at the collection URL,
//! submits the form once, and listens on `window` for Cardinal's
//! postMessage reply. The listener lives exactly as long as the
//! fingerprinting window: it is removed the moment the status moves on or
//! the component unmounts, so a late reply can never reach a flow that has
//! already progressed.

use serde::Deserialize;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::JsCast;
use web_sys::{console, HtmlFormElement, MessageEvent};
use yew::prelude::*;

use crate::config::{CARDINAL_ORIGIN, FINGERPRINT_IFRAME_NAME};
use crate::flow::{use_payment_flow, PaymentFlowAction, PaymentFlowError, PaymentFlowStatus};

/// The JSON document Cardinal posts back after device collection. The
/// reply also carries a `MessageType`, which we have no use for; missing
/// fields degrade to their falsy defaults the way the collection page's
/// own failure replies do.
#[derive(Debug, Deserialize)]
struct CollectionReply {
    #[serde(rename = "SessionId", default)]
    session_id: String,
    #[serde(rename = "Status", default)]
    status: bool,
}

/// Translate one `message` event into a flow action.
///
/// Messages from foreign origins produce nothing, as do empty bodies
/// (Cardinal's collection page emits an initial empty message in some
/// configurations). A body that is not a string, or not parseable JSON,
/// is a parse failure; a well-formed reply maps to `Fingerprinted` or
/// `Fail` depending on its `Status`.
pub(crate) fn collection_action(origin: &str, data: Option<String>) -> Option<PaymentFlowAction> {
    if !origin.contains(CARDINAL_ORIGIN) {
        return None;
    }

    let data = match data {
        Some(data) => data,
        None => {
            return Some(PaymentFlowAction::Fail(
                PaymentFlowError::FingerprintParseFailed,
            ))
        }
    };

    if data.is_empty() {
        return None;
    }

    match serde_json::from_str::<CollectionReply>(&data) {
        Ok(reply) if reply.status => Some(PaymentFlowAction::Fingerprinted {
            device_fingerprinting_id: reply.session_id,
        }),
        Ok(_) => Some(PaymentFlowAction::Fail(
            PaymentFlowError::FingerprintRejected,
        )),
        Err(_) => Some(PaymentFlowAction::Fail(
            PaymentFlowError::FingerprintParseFailed,
        )),
    }
}

/// Renders nothing until the flow enters `Fingerprinting`, then performs
/// the hidden device-collection POST and reports Cardinal's reply.
///
/// Must be mounted inside a `PaymentFlowProvider`.
#[function_component(DeviceFingerprintingForm)]
pub fn device_fingerprinting_form() -> Html {
    let flow = use_payment_flow();
    let form_ref = use_node_ref();

    let fingerprinting = flow.state().status == PaymentFlowStatus::Fingerprinting;

    {
        let flow = flow.clone();
        let form_ref = form_ref.clone();
        use_effect_with(fingerprinting, move |fingerprinting| {
            let mut listener: Option<Closure<dyn FnMut(MessageEvent)>> = None;

            if *fingerprinting {
                if let Some(form) = form_ref.cast::<HtmlFormElement>() {
                    // Native submit, so the page's own submit handlers
                    // never see this form.
                    if let Err(err) = form.submit() {
                        console::error_1(&err);
                    }
                }

                let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
                    let data = event.data().as_string();
                    if let Some(action) = collection_action(&event.origin(), data) {
                        flow.apply(action);
                    }
                }) as Box<dyn FnMut(MessageEvent)>);

                gloo_utils::window()
                    .add_event_listener_with_callback(
                        "message",
                        on_message.as_ref().unchecked_ref(),
                    )
                    .expect("attach message listener");

                listener = Some(on_message);
            }

            move || {
                if let Some(listener) = listener {
                    let _ = gloo_utils::window().remove_event_listener_with_callback(
                        "message",
                        listener.as_ref().unchecked_ref(),
                    );
                }
            }
        });
    }

    let collection = flow.state().device_collection.clone();
    match collection {
        Some(collection) if fingerprinting => html! {
            <>
                <iframe
                    name={FINGERPRINT_IFRAME_NAME}
                    src=""
                    style="display: none;"
                    title="3D Secure"
                />
                <form
                    ref={form_ref}
                    action={collection.url}
                    method="POST"
                    target={FINGERPRINT_IFRAME_NAME}
                    style="display: none;"
                >
                    <input type="hidden" name="JWT" value={collection.jwt} />
                </form>
            </>
        },
        _ => Html::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARDINAL: &str = "https://centinelapistag.cardinalcommerce.com";

    #[test]
    fn foreign_origins_are_ignored() {
        let action = collection_action(
            "https://evil.example",
            Some(r#"{"SessionId":"s-1","Status":true}"#.into()),
        );
        assert_eq!(action, None);
    }

    #[test]
    fn empty_bodies_are_ignored() {
        assert_eq!(collection_action(CARDINAL, Some(String::new())), None);
    }

    #[test]
    fn non_string_bodies_are_parse_failures() {
        assert_eq!(
            collection_action(CARDINAL, None),
            Some(PaymentFlowAction::Fail(
                PaymentFlowError::FingerprintParseFailed
            ))
        );
    }

    #[test]
    fn malformed_json_is_a_parse_failure() {
        assert_eq!(
            collection_action(CARDINAL, Some("{not json".into())),
            Some(PaymentFlowAction::Fail(
                PaymentFlowError::FingerprintParseFailed
            ))
        );
    }

    #[test]
    fn truthy_status_yields_the_session_id() {
        let action = collection_action(
            CARDINAL,
            Some(r#"{"MessageType":"profile.completed","SessionId":"s-1","Status":true}"#.into()),
        );
        assert_eq!(
            action,
            Some(PaymentFlowAction::Fingerprinted {
                device_fingerprinting_id: "s-1".into(),
            })
        );
    }

    #[test]
    fn falsy_status_is_a_rejection() {
        assert_eq!(
            collection_action(CARDINAL, Some(r#"{"SessionId":"s-1","Status":false}"#.into())),
            Some(PaymentFlowAction::Fail(
                PaymentFlowError::FingerprintRejected
            ))
        );
        // A reply with no Status at all counts as a rejection too.
        assert_eq!(
            collection_action(CARDINAL, Some("{}".into())),
            Some(PaymentFlowAction::Fail(
                PaymentFlowError::FingerprintRejected
            ))
        );
    }

    #[test]
    fn session_id_may_be_absent_on_success() {
        // Unusual, but the reply shape is Cardinal's to define.
        assert_eq!(
            collection_action(CARDINAL, Some(r#"{"Status":true}"#.into())),
            Some(PaymentFlowAction::Fingerprinted {
                device_fingerprinting_id: String::new(),
            })
        );
    }

    #[test]
    fn origin_match_is_by_containment() {
        let action = collection_action(
            "https://geostag.cardinalcommerce.com",
            Some(r#"{"SessionId":"s-2","Status":true}"#.into()),
        );
        assert!(matches!(
            action,
            Some(PaymentFlowAction::Fingerprinted { .. })
        ));
    }
}
