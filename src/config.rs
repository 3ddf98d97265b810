//! Element ids, iframe names, and window globals shared with the
//! RocketGate script and the Cardinal device-collection page.
//!
//! The `rg-` prefixed ids are part of the hosted-fields contract: the
//! script looks these elements up by id, so renaming them breaks the
//! integration.

/// Container the script injects its bootstrap markup into.
pub const CARD_FIELDS_CONTAINER_ID: &str = "rg-card-fields";
/// The host-facing payment form element.
pub const PAYMENT_FORM_ID: &str = "rg-payment-form";
/// The injected hosted-fields `<script>` tag.
pub const SCRIPT_ELEMENT_ID: &str = "rg-script";

pub const CARD_NUMBER_FIELD: &str = "rg-card-number";
pub const EXPIRY_MONTH_FIELD: &str = "rg-expiry-month";
pub const EXPIRY_YEAR_FIELD: &str = "rg-expiry-year";
pub const CVV_FIELD: &str = "rg-cvv";
pub const TERMS_FIELD: &str = "rg-terms";
pub const PAYMENT_METHOD_FIELD: &str = "rg-payment-method";
/// Hidden input injected by the script once the fields are live.
pub const CSRF_TOKEN_FIELD: &str = "rg-csrf-token";

/// Hidden target iframe for the device-collection POST.
pub const FINGERPRINT_IFRAME_NAME: &str = "rg-device-fingerprinting";
/// Overlay iframe the issuing bank's challenge page renders into.
pub const STEP_UP_IFRAME_NAME: &str = "rg-3ds-step-up";

/// Substring a `message` event origin must contain to be treated as a
/// Cardinal device-collection reply.
pub const CARDINAL_ORIGIN: &str = "cardinalcommerce.com";

/// Window global the script exposes for injecting the card fields.
pub const LOAD_FIELDS_GLOBAL: &str = "RocketGateLoadFields";
/// Window global under which the script-backed bridge installs the
/// tokenization callback.
pub const TOKEN_CALLBACK_GLOBAL: &str = "RocketGateTokenCallback";
/// Window global holding a reference to the payment form element for the
/// script to introspect.
pub const PAYMENT_FORM_GLOBAL: &str = "RocketGatePaymentForm";

/// The injected iovation `<script>` tag (`scrub` mode).
pub const SCRUB_SCRIPT_ID: &str = "rg-scrub-script";
/// iovation first-party collector.
pub const SCRUB_SCRIPT_SRC: &str = "https://mpsnare.iesnare.com/snare.js";
/// Hidden field the iovation script populates with its device black box.
pub const BLACK_BOX_FIELD: &str = "ioBlackBox";
