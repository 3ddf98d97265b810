// src/lib.rs
use std::collections::HashMap;

use gloo_net::http::Request;
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_rocketgate::{
    use_payment_flow, CardNumber, Cvv, DeviceFingerprintingForm, EmbedError, ExpiryMonth,
    ExpiryYear, PaymentFlowHandle, PaymentFlowProvider, PaymentFlowStatus, PaymentFormProvider,
    RocketGateFields, StepUpChallenge, StepUpForm, SubmitButton, Terms,
};

const BACKEND: &str = "http://127.0.0.1:2718";
const FIELDS_SRC: &str = "https://dev-secure.rocketgate.com/hostedFields/fields.js";

/// Payment-initiation reply from the mock backend: the pass-through
/// metadata plus the Cardinal device-collection endpoint.
#[derive(Deserialize)]
struct InitiateResponse {
    metadata: HashMap<String, String>,
    device_collection_url: String,
    device_collection_jwt: String,
}

/// Authentication reply. All fields optional: an enrolled card carries
/// one of the two step-up shapes, a frictionless card carries none.
#[derive(Deserialize)]
struct AuthenticateResponse {
    guid_no: Option<String>,
    acs_url: Option<String>,
    pa_req: Option<String>,
    step_up_url: Option<String>,
    step_up_jwt: Option<String>,
}

#[wasm_bindgen(start)]
pub fn start() {
    yew::Renderer::<BasicPayment>::new().render();
}

#[function_component(BasicPayment)]
fn basic_payment() -> Html {
    html! {
        <PaymentFlowProvider redirection_url={format!("{}/3ds-return", BACKEND)}>
            <PaymentFormProvider>
                <Checkout />
            </PaymentFormProvider>
        </PaymentFlowProvider>
    }
}

#[function_component(Checkout)]
fn checkout() -> Html {
    let flow = use_payment_flow();
    let error = use_state(|| None::<String>);

    // 1) Once the hosted fields are usable, ask the backend to start the
    //    payment and kick off device fingerprinting.
    let on_form_ready = {
        let flow = flow.clone();
        let error = error.clone();
        Callback::from(move |_| {
            let flow = flow.clone();
            let error = error.clone();
            spawn_local(async move {
                match initiate().await {
                    Ok(init) => {
                        flow.set_metadata(init.metadata);
                        flow.handle_device_fingerprinting(
                            init.device_collection_url,
                            init.device_collection_jwt,
                        );
                    }
                    Err(e) => error.set(Some(e)),
                }
            });
        })
    };

    // 2) After fingerprinting, ask the backend whether the issuer demands
    //    a step-up challenge.
    {
        let flow = flow.clone();
        let error = error.clone();
        use_effect_with(flow.state().status, move |status| {
            if *status == PaymentFlowStatus::Fingerprinted {
                let fingerprinting_id = flow
                    .state()
                    .device_fingerprinting_id
                    .clone()
                    .unwrap_or_default();
                spawn_local(async move {
                    match authenticate(&fingerprinting_id).await {
                        Ok(reply) => enter_step_up(&flow, reply),
                        Err(e) => error.set(Some(e)),
                    }
                });
            }
            || ()
        });
    }

    let on_script_error = {
        let error = error.clone();
        Callback::from(move |err: EmbedError| {
            error.set(Some(err.to_string()));
        })
    };

    let status = flow.state().status;
    let message = flow
        .state()
        .error
        .map(|e| e.to_string())
        .or_else(|| (*error).clone());

    html! {
        <div style="max-width: 420px; margin: 2rem auto;">
            <h1>{ "Checkout" }</h1>

            <RocketGateFields src={FIELDS_SRC} {on_form_ready} {on_script_error}>
                <CardNumber />
                <div style="display: flex; gap: 1rem;">
                    <ExpiryMonth />
                    <ExpiryYear />
                </div>
                <Cvv />
                <Terms>{ "I accept the terms of service" }</Terms>
                <SubmitButton>{ "Pay Now" }</SubmitButton>
            </RocketGateFields>

            <DeviceFingerprintingForm />
            <StepUpForm />

            <p>{ format!("status: {}", status_label(status)) }</p>
            {
                if let Some(msg) = message {
                    html! { <p style="color: red;">{ msg }</p> }
                } else {
                    Html::default()
                }
            }
        </div>
    }
}

/// Enter whichever step-up variant the backend returned; no step-up data
/// at all means frictionless completion and nothing to do.
fn enter_step_up(flow: &PaymentFlowHandle, reply: AuthenticateResponse) {
    if let (Some(guid_no), Some(step_up_url), Some(step_up_jwt)) =
        (reply.guid_no.clone(), reply.step_up_url, reply.step_up_jwt)
    {
        flow.handle_step_up_form(
            guid_no,
            StepUpChallenge::V2 {
                step_up_url,
                step_up_jwt,
            },
        );
    } else if let (Some(guid_no), Some(acs_url), Some(pa_req)) =
        (reply.guid_no, reply.acs_url, reply.pa_req)
    {
        flow.handle_step_up_form(guid_no, StepUpChallenge::V1 { acs_url, pa_req });
    }
}

async fn initiate() -> Result<InitiateResponse, String> {
    let response = Request::post(&format!("{}/payments", BACKEND))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    if !response.ok() {
        return Err(format!("Server error: {}", response.status()));
    }
    response
        .json::<InitiateResponse>()
        .await
        .map_err(|e| format!("Bad JSON: {}", e))
}

async fn authenticate(device_fingerprinting_id: &str) -> Result<AuthenticateResponse, String> {
    let body = serde_json::json!({ "deviceFingerprintingId": device_fingerprinting_id });
    let response = Request::post(&format!("{}/payments/authenticate", BACKEND))
        .json(&body)
        .map_err(|e| format!("Bad request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    if !response.ok() {
        return Err(format!("Server error: {}", response.status()));
    }
    response
        .json::<AuthenticateResponse>()
        .await
        .map_err(|e| format!("Bad JSON: {}", e))
}

fn status_label(status: PaymentFlowStatus) -> &'static str {
    match status {
        PaymentFlowStatus::Ready => "ready",
        PaymentFlowStatus::Tokenized => "tokenized",
        PaymentFlowStatus::Fingerprinting => "device fingerprinting",
        PaymentFlowStatus::Fingerprinted => "fingerprinted",
        PaymentFlowStatus::ThreeDsV1 => "3DS step-up (legacy)",
        PaymentFlowStatus::ThreeDsV2 => "3DS step-up",
    }
}
