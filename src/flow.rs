//! flow.rs
//!
//! The 3-D Secure payment flow state machine and its Yew context plumbing.
//!
//! # Overview
//! A card payment that requires 3DS walks through a fixed sequence: the
//! hosted fields tokenize the card, the gateway asks for device
//! fingerprinting, and the issuing bank may then demand an interactive
//! step-up challenge in one of two protocol versions. [`PaymentFlowState`]
//! models that sequence as a reducer over [`PaymentFlowAction`]s, and
//! [`PaymentFlowProvider`] owns one such reducer per payment attempt.
//!
//! Hosts never see the raw action channel. [`PaymentFlowHandle`] exposes
//! read access to the state plus the three commands a backend integration
//! needs (`set_metadata`, `handle_device_fingerprinting`,
//! `handle_step_up_form`); the relay components in this crate drive the
//! remaining transitions internally.
//!
//! # Usage
//! ```rust,ignore
//! use yew::prelude::*;
//! use yew_rocketgate::{use_payment_flow, PaymentFlowProvider, StepUpChallenge};
//!
//! #[function_component(Checkout)]
//! fn checkout() -> Html {
//!     let flow = use_payment_flow();
//!
//!     // After the backend's payment-initiation call:
//!     flow.set_metadata(metadata);
//!     flow.handle_device_fingerprinting(collection_url, collection_jwt);
//!
//!     // Once the backend reports an enrolled card:
//!     flow.handle_step_up_form(guid_no, StepUpChallenge::V2 {
//!         step_up_url,
//!         step_up_jwt,
//!     });
//!
//!     html! { /* ... */ }
//! }
//! ```

use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;
use yew::functional::hook;
use yew::prelude::*;

/// Where the flow currently stands. Transitions are monotonic within one
/// attempt; there is no terminal variant because completion is observed by
/// the host (or by the step-up iframe redirecting the page).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentFlowStatus {
    /// Fresh flow, nothing has happened yet.
    Ready,
    /// The hosted fields produced a payment token.
    Tokenized,
    /// The hidden device-collection form is in flight.
    Fingerprinting,
    /// Cardinal acknowledged the device-collection POST.
    Fingerprinted,
    /// Legacy (protocol 1) challenge, rendered from an ACS URL and PaReq.
    ThreeDsV1,
    /// Modern (protocol 2) challenge, rendered from a step-up URL and JWT.
    ThreeDsV2,
}

impl PaymentFlowStatus {
    /// True for either step-up variant.
    pub fn is_step_up(self) -> bool {
        matches!(self, Self::ThreeDsV1 | Self::ThreeDsV2)
    }
}

/// Failures raised by the relay components. These set
/// [`PaymentFlowState::error`] without touching the status, so a failed
/// fingerprint parse leaves the collection window open for a retry.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentFlowError {
    /// Cardinal replied with a falsy status.
    #[error("Error getting Cardinal data")]
    FingerprintRejected,
    /// The device-collection reply was not the JSON document we expect.
    #[error("Error parsing Cardinal data")]
    FingerprintParseFailed,
}

/// Endpoint and token for the hidden device-collection POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCollection {
    pub url: String,
    pub jwt: String,
}

/// The step-up destination, split by protocol version. Storing the two
/// variants as one sum keeps the legacy and modern field sets mutually
/// exclusive by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepUpChallenge {
    V1 { acs_url: String, pa_req: String },
    V2 { step_up_url: String, step_up_jwt: String },
}

/// Everything a step-up entry carries: the transaction correlation id plus
/// the variant-specific challenge data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepUpState {
    pub guid_no: String,
    pub challenge: StepUpChallenge,
}

/// State of one payment attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentFlowState {
    pub status: PaymentFlowStatus,
    /// Last relay failure, if any. Overwritten by the next failure, never
    /// cleared by ordinary transitions.
    pub error: Option<PaymentFlowError>,
    /// Opaque pass-through data the step-up POST serializes into its `MD`
    /// field. Treated as configuration: replaceable at any time, at any
    /// status.
    pub metadata: HashMap<String, String>,
    /// Where the issuing bank returns control after a legacy challenge.
    /// Fixed when the flow is created.
    pub redirection_url: String,
    pub device_collection: Option<DeviceCollection>,
    pub device_fingerprinting_id: Option<String>,
    pub step_up: Option<StepUpState>,
}

impl PaymentFlowState {
    pub fn new(redirection_url: impl Into<String>) -> Self {
        Self {
            status: PaymentFlowStatus::Ready,
            error: None,
            metadata: HashMap::new(),
            redirection_url: redirection_url.into(),
            device_collection: None,
            device_fingerprinting_id: None,
            step_up: None,
        }
    }
}

/// The closed action set of the flow reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentFlowAction {
    /// Replace `metadata` wholesale. Leaves the status alone.
    SetMetadata(HashMap<String, String>),
    /// The hosted fields produced a token.
    Tokenized,
    /// Begin device collection against the given endpoint.
    Fingerprinting {
        device_collection_url: String,
        device_collection_jwt: String,
    },
    /// Cardinal confirmed device collection under this session id.
    Fingerprinted { device_fingerprinting_id: String },
    /// Enter a step-up challenge. The status is derived from the variant
    /// carried in `challenge`.
    StepUp {
        guid_no: String,
        challenge: StepUpChallenge,
    },
    /// Record a relay failure. The status is left untouched.
    Fail(PaymentFlowError),
}

impl Reducible for PaymentFlowState {
    type Action = PaymentFlowAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();

        match action {
            PaymentFlowAction::SetMetadata(metadata) => {
                next.metadata = metadata;
            }
            PaymentFlowAction::Tokenized => {
                next.status = PaymentFlowStatus::Tokenized;
            }
            PaymentFlowAction::Fingerprinting {
                device_collection_url,
                device_collection_jwt,
            } => {
                next.status = PaymentFlowStatus::Fingerprinting;
                next.device_collection = Some(DeviceCollection {
                    url: device_collection_url,
                    jwt: device_collection_jwt,
                });
            }
            PaymentFlowAction::Fingerprinted {
                device_fingerprinting_id,
            } => {
                next.status = PaymentFlowStatus::Fingerprinted;
                next.device_fingerprinting_id = Some(device_fingerprinting_id);
            }
            PaymentFlowAction::StepUp { guid_no, challenge } => {
                next.status = match challenge {
                    StepUpChallenge::V1 { .. } => PaymentFlowStatus::ThreeDsV1,
                    StepUpChallenge::V2 { .. } => PaymentFlowStatus::ThreeDsV2,
                };
                next.step_up = Some(StepUpState { guid_no, challenge });
            }
            PaymentFlowAction::Fail(error) => {
                next.error = Some(error);
            }
        }

        Rc::new(next)
    }
}

/// Cloneable handle to the flow owned by the nearest [`PaymentFlowProvider`].
#[derive(Clone, PartialEq)]
pub struct PaymentFlowHandle {
    inner: UseReducerHandle<PaymentFlowState>,
}

impl PaymentFlowHandle {
    /// Read access to the current flow state.
    pub fn state(&self) -> &PaymentFlowState {
        &self.inner
    }

    /// Replace the step-up metadata.
    pub fn set_metadata(&self, metadata: HashMap<String, String>) {
        self.inner.dispatch(PaymentFlowAction::SetMetadata(metadata));
    }

    /// Start device fingerprinting against the collection endpoint the
    /// backend returned. `DeviceFingerprintingForm` picks this up, POSTs
    /// the JWT, and reports Cardinal's reply back into the flow.
    pub fn handle_device_fingerprinting(
        &self,
        device_collection_url: String,
        device_collection_jwt: String,
    ) {
        self.inner.dispatch(PaymentFlowAction::Fingerprinting {
            device_collection_url,
            device_collection_jwt,
        });
    }

    /// Enter the step-up challenge the backend returned. The caller picks
    /// the protocol variant explicitly through [`StepUpChallenge`];
    /// `StepUpForm` renders and submits the matching redirect form.
    pub fn handle_step_up_form(&self, guid_no: String, challenge: StepUpChallenge) {
        self.inner
            .dispatch(PaymentFlowAction::StepUp { guid_no, challenge });
    }

    /// Internal dispatch for the relay and embed components.
    pub(crate) fn apply(&self, action: PaymentFlowAction) {
        self.inner.dispatch(action);
    }
}

#[derive(Properties, PartialEq)]
pub struct PaymentFlowProviderProps {
    /// Return URL handed to the issuing bank for the legacy challenge.
    /// Read once when the provider mounts; later prop changes do not
    /// re-create the flow.
    pub redirection_url: String,
    #[prop_or_default]
    pub children: Children,
}

/// Owns one [`PaymentFlowState`] per mount and provides a
/// [`PaymentFlowHandle`] to everything beneath it.
#[function_component(PaymentFlowProvider)]
pub fn payment_flow_provider(props: &PaymentFlowProviderProps) -> Html {
    let redirection_url = props.redirection_url.clone();
    let inner = use_reducer(move || PaymentFlowState::new(redirection_url));
    let handle = PaymentFlowHandle { inner };

    html! {
        <ContextProvider<PaymentFlowHandle> context={handle}>
            { for props.children.iter() }
        </ContextProvider<PaymentFlowHandle>>
    }
}

/// The flow handle from the nearest provider.
///
/// # Panics
/// Panics when called outside a [`PaymentFlowProvider`].
#[hook]
pub fn use_payment_flow() -> PaymentFlowHandle {
    use_context::<PaymentFlowHandle>()
        .expect("use_payment_flow must be used within a PaymentFlowProvider")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reduce(state: PaymentFlowState, action: PaymentFlowAction) -> PaymentFlowState {
        (*Rc::new(state).reduce(action)).clone()
    }

    fn fingerprinting() -> PaymentFlowAction {
        PaymentFlowAction::Fingerprinting {
            device_collection_url: "https://centinelapistag.cardinalcommerce.com/V1/Cruise/Collect".into(),
            device_collection_jwt: "collection-jwt".into(),
        }
    }

    fn v2_challenge() -> StepUpChallenge {
        StepUpChallenge::V2 {
            step_up_url: "https://centinelapistag.cardinalcommerce.com/V2/Cruise/StepUp".into(),
            step_up_jwt: "step-up-jwt".into(),
        }
    }

    fn v1_challenge() -> StepUpChallenge {
        StepUpChallenge::V1 {
            acs_url: "https://acs.example/auth".into(),
            pa_req: "pa-req-blob".into(),
        }
    }

    #[test]
    fn starts_ready_with_fixed_redirection_url() {
        let state = PaymentFlowState::new("https://merchant.example/3ds-return");
        assert_eq!(state.status, PaymentFlowStatus::Ready);
        assert_eq!(state.redirection_url, "https://merchant.example/3ds-return");
        assert_eq!(state.error, None);
        assert!(state.metadata.is_empty());
    }

    #[test]
    fn fingerprinting_stores_the_collection_endpoint() {
        let state = reduce(PaymentFlowState::new("https://merchant.example"), fingerprinting());

        assert_eq!(state.status, PaymentFlowStatus::Fingerprinting);
        let collection = state.device_collection.as_ref().unwrap();
        assert_eq!(collection.jwt, "collection-jwt");
        assert!(state.step_up.is_none());
        assert!(state.device_fingerprinting_id.is_none());
    }

    #[test]
    fn step_up_v2_after_fingerprinting_never_carries_v1_data() {
        let mut state = reduce(PaymentFlowState::new("https://merchant.example"), fingerprinting());
        state = reduce(
            state,
            PaymentFlowAction::Fingerprinted {
                device_fingerprinting_id: "session-1".into(),
            },
        );
        state = reduce(
            state,
            PaymentFlowAction::StepUp {
                guid_no: "guid-1".into(),
                challenge: v2_challenge(),
            },
        );

        assert_eq!(state.status, PaymentFlowStatus::ThreeDsV2);
        let step_up = state.step_up.as_ref().unwrap();
        assert_eq!(step_up.guid_no, "guid-1");
        assert!(matches!(step_up.challenge, StepUpChallenge::V2 { .. }));
        assert_eq!(state.device_fingerprinting_id.as_deref(), Some("session-1"));
    }

    #[test]
    fn step_up_variant_is_replaced_wholesale() {
        let mut state = PaymentFlowState::new("https://merchant.example");
        state = reduce(
            state,
            PaymentFlowAction::StepUp {
                guid_no: "guid-1".into(),
                challenge: v1_challenge(),
            },
        );
        assert_eq!(state.status, PaymentFlowStatus::ThreeDsV1);

        state = reduce(
            state,
            PaymentFlowAction::StepUp {
                guid_no: "guid-2".into(),
                challenge: v2_challenge(),
            },
        );
        assert_eq!(state.status, PaymentFlowStatus::ThreeDsV2);
        assert!(matches!(
            state.step_up.as_ref().unwrap().challenge,
            StepUpChallenge::V2 { .. }
        ));
    }

    #[test]
    fn tokenized_is_a_side_branch_from_ready() {
        let state = reduce(
            PaymentFlowState::new("https://merchant.example"),
            PaymentFlowAction::Tokenized,
        );
        assert_eq!(state.status, PaymentFlowStatus::Tokenized);
        assert!(state.device_collection.is_none());
    }

    #[test]
    fn fail_sets_error_and_keeps_status() {
        let mut state = reduce(PaymentFlowState::new("https://merchant.example"), fingerprinting());
        state = reduce(
            state,
            PaymentFlowAction::Fail(PaymentFlowError::FingerprintParseFailed),
        );

        assert_eq!(state.status, PaymentFlowStatus::Fingerprinting);
        assert_eq!(state.error, Some(PaymentFlowError::FingerprintParseFailed));

        // A later failure overwrites the previous one.
        state = reduce(
            state,
            PaymentFlowAction::Fail(PaymentFlowError::FingerprintRejected),
        );
        assert_eq!(state.status, PaymentFlowStatus::Fingerprinting);
        assert_eq!(state.error, Some(PaymentFlowError::FingerprintRejected));
    }

    #[test]
    fn metadata_is_replaced_not_merged() {
        let mut state = PaymentFlowState::new("https://merchant.example");
        state = reduce(
            state,
            PaymentFlowAction::SetMetadata(HashMap::from([("merchantID".to_string(), "1".to_string())])),
        );
        state = reduce(
            state,
            PaymentFlowAction::SetMetadata(HashMap::from([("sessionID".to_string(), "2".to_string())])),
        );

        assert_eq!(state.metadata.len(), 1);
        assert_eq!(state.metadata.get("sessionID").map(String::as_str), Some("2"));
        assert_eq!(state.status, PaymentFlowStatus::Ready);
    }

    #[test]
    fn redirection_url_survives_every_transition() {
        let url = "https://merchant.example/3ds-return";
        let mut state = PaymentFlowState::new(url);
        for action in [
            PaymentFlowAction::SetMetadata(HashMap::new()),
            fingerprinting(),
            PaymentFlowAction::Fingerprinted {
                device_fingerprinting_id: "session-1".into(),
            },
            PaymentFlowAction::StepUp {
                guid_no: "guid-1".into(),
                challenge: v1_challenge(),
            },
            PaymentFlowAction::Fail(PaymentFlowError::FingerprintRejected),
        ] {
            state = reduce(state, action);
            assert_eq!(state.redirection_url, url);
        }
    }

    #[test]
    fn duplicate_fingerprinted_dispatches_are_idempotent() {
        let first = reduce(
            reduce(PaymentFlowState::new("https://merchant.example"), fingerprinting()),
            PaymentFlowAction::Fingerprinted {
                device_fingerprinting_id: "session-1".into(),
            },
        );
        let second = reduce(
            first.clone(),
            PaymentFlowAction::Fingerprinted {
                device_fingerprinting_id: "session-1".into(),
            },
        );
        assert_eq!(first, second);
    }

    #[test]
    fn relay_errors_render_their_fixed_messages() {
        assert_eq!(
            PaymentFlowError::FingerprintRejected.to_string(),
            "Error getting Cardinal data"
        );
        assert_eq!(
            PaymentFlowError::FingerprintParseFailed.to_string(),
            "Error parsing Cardinal data"
        );
    }
}
