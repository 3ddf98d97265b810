//! step_up_form.rs
//!
//! Full-viewport challenge overlay for the interactive 3DS step-up, plus
//! the hidden auto-submitting form that redirects the issuing bank's page
//! into it.
//!
//! There is no completion listener here. Once the cardholder finishes the
//! challenge the bank's page navigates the top-level document itself
//! (through `TermUrl` on the legacy protocol, or the gateway's own
//! callback on the modern one), which ends this component's involvement.

use web_sys::{console, HtmlFormElement};
use yew::prelude::*;

use crate::config::STEP_UP_IFRAME_NAME;
use crate::flow::{use_payment_flow, PaymentFlowState, StepUpChallenge};

/// The outbound challenge POST, reduced to plain data: where it goes and
/// which hidden fields it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StepUpRequest {
    pub action_url: String,
    pub fields: Vec<(&'static str, String)>,
}

/// Build the challenge POST for the flow's current step-up entry, if any.
///
/// Both protocol versions serialize the flow metadata into an `MD` field
/// the gateway echoes back after authentication. The legacy variant adds
/// the payer-authentication request and the return URL; the modern variant
/// adds the signed step-up token.
pub(crate) fn step_up_request(state: &PaymentFlowState) -> Option<StepUpRequest> {
    if !state.status.is_step_up() {
        return None;
    }
    let step_up = state.step_up.as_ref()?;

    let md = serde_json::to_string(&state.metadata).expect("metadata serialization failed");
    let mut fields = vec![("MD", md)];

    let action_url = match &step_up.challenge {
        StepUpChallenge::V1 { acs_url, pa_req } => {
            fields.push(("PaReq", pa_req.clone()));
            fields.push(("TermUrl", state.redirection_url.clone()));
            acs_url.clone()
        }
        StepUpChallenge::V2 {
            step_up_url,
            step_up_jwt,
        } => {
            fields.push(("JWT", step_up_jwt.clone()));
            step_up_url.clone()
        }
    };

    Some(StepUpRequest { action_url, fields })
}

/// Renders nothing until the flow enters a step-up status, then overlays
/// the challenge iframe and submits the redirect form into it exactly once
/// per entry.
///
/// Must be mounted inside a `PaymentFlowProvider`.
#[function_component(StepUpForm)]
pub fn step_up_form() -> Html {
    let flow = use_payment_flow();
    let form_ref = use_node_ref();

    // Keyed on the status rather than a step-up flag so switching protocol
    // variants re-submits against the new destination.
    {
        let form_ref = form_ref.clone();
        use_effect_with(flow.state().status, move |status| {
            if status.is_step_up() {
                if let Some(form) = form_ref.cast::<HtmlFormElement>() {
                    if let Err(err) = form.submit() {
                        console::error_1(&err);
                    }
                }
            }
            || ()
        });
    }

    let request = match step_up_request(flow.state()) {
        Some(request) => request,
        None => return Html::default(),
    };

    html! {
        <>
            <iframe
                name={STEP_UP_IFRAME_NAME}
                sandbox="allow-scripts allow-top-navigation allow-forms allow-same-origin"
                src=""
                style="width: 100%; height: 100%; position: fixed; top: 0; left: 0; z-index: 99999; background-color: white;"
                title="3D Secure Step Up"
            />
            <form
                ref={form_ref}
                action={request.action_url.clone()}
                method="POST"
                target={STEP_UP_IFRAME_NAME}
                style="display: none;"
            >
                {
                    for request.fields.iter().map(|(name, value)| html! {
                        <input key={*name} type="hidden" name={*name} value={value.clone()} />
                    })
                }
            </form>
        </>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{PaymentFlowAction, PaymentFlowError};
    use std::collections::HashMap;
    use std::rc::Rc;

    fn flow_state_with(actions: Vec<PaymentFlowAction>) -> PaymentFlowState {
        let mut state = PaymentFlowState::new("https://merchant.example/3ds-return");
        for action in actions {
            state = (*Rc::new(state).reduce(action)).clone();
        }
        state
    }

    fn metadata() -> HashMap<String, String> {
        HashMap::from([
            ("merchantID".to_string(), "m-1".to_string()),
            ("sessionID".to_string(), "s-9".to_string()),
        ])
    }

    #[test]
    fn no_request_outside_step_up() {
        let state = flow_state_with(vec![PaymentFlowAction::Fingerprinting {
            device_collection_url: "https://collect.example".into(),
            device_collection_jwt: "jwt".into(),
        }]);
        assert_eq!(step_up_request(&state), None);
    }

    #[test]
    fn legacy_request_posts_pa_req_and_term_url_to_the_acs() {
        let state = flow_state_with(vec![
            PaymentFlowAction::SetMetadata(metadata()),
            PaymentFlowAction::StepUp {
                guid_no: "guid-1".into(),
                challenge: StepUpChallenge::V1 {
                    acs_url: "https://acs.example/auth".into(),
                    pa_req: "pa-req-blob".into(),
                },
            },
        ]);

        let request = step_up_request(&state).unwrap();
        assert_eq!(request.action_url, "https://acs.example/auth");

        let names: Vec<&str> = request.fields.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["MD", "PaReq", "TermUrl"]);
        assert_eq!(field(&request, "PaReq"), "pa-req-blob");
        assert_eq!(field(&request, "TermUrl"), "https://merchant.example/3ds-return");
    }

    #[test]
    fn modern_request_posts_the_jwt_to_the_step_up_url() {
        let state = flow_state_with(vec![
            PaymentFlowAction::SetMetadata(metadata()),
            PaymentFlowAction::StepUp {
                guid_no: "guid-2".into(),
                challenge: StepUpChallenge::V2 {
                    step_up_url: "https://stepup.example/challenge".into(),
                    step_up_jwt: "step-up-jwt".into(),
                },
            },
        ]);

        let request = step_up_request(&state).unwrap();
        assert_eq!(request.action_url, "https://stepup.example/challenge");

        let names: Vec<&str> = request.fields.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["MD", "JWT"]);
        assert_eq!(field(&request, "JWT"), "step-up-jwt");
    }

    #[test]
    fn md_round_trips_to_the_original_mapping() {
        let state = flow_state_with(vec![
            PaymentFlowAction::SetMetadata(metadata()),
            PaymentFlowAction::StepUp {
                guid_no: "guid-3".into(),
                challenge: StepUpChallenge::V2 {
                    step_up_url: "https://stepup.example/challenge".into(),
                    step_up_jwt: "step-up-jwt".into(),
                },
            },
        ]);

        let request = step_up_request(&state).unwrap();
        let parsed: HashMap<String, String> =
            serde_json::from_str(&field(&request, "MD")).unwrap();
        assert_eq!(parsed, metadata());
    }

    #[test]
    fn a_relay_error_does_not_tear_down_the_challenge() {
        let state = flow_state_with(vec![
            PaymentFlowAction::StepUp {
                guid_no: "guid-4".into(),
                challenge: StepUpChallenge::V1 {
                    acs_url: "https://acs.example/auth".into(),
                    pa_req: "pa-req-blob".into(),
                },
            },
            PaymentFlowAction::Fail(PaymentFlowError::FingerprintRejected),
        ]);
        assert!(step_up_request(&state).is_some());
    }

    fn field(request: &StepUpRequest, name: &str) -> String {
        request
            .fields
            .iter()
            .find(|(field_name, _)| *field_name == name)
            .map(|(_, value)| value.clone())
            .unwrap()
    }
}
