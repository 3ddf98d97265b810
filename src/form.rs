//! form.rs
//!
//! The payment form state container: current field values, the error set
//! from the last submit, and the localization table the prebuilt field
//! components render from.
//!
//! Submission is a two-step hand-off. The embed's `<form>` calls
//! [`PaymentFormHandle::submit_with`], which validates the held values;
//! only a clean form is forwarded to the card-fields bridge for
//! tokenization, since the sensitive card data itself lives in the
//! script's iframes rather than in these values.

use std::rc::Rc;

use wasm_bindgen::JsValue;
use web_sys::{console, HtmlFormElement};
use yew::functional::hook;
use yew::prelude::*;

use crate::bridge::PaymentBridge;
use crate::localization::Localization;
use crate::schema::{validate, ExpiryCutoff, FormErrors, PaymentFormValues};

/// Cloneable handle to the form state owned by the nearest
/// [`PaymentFormProvider`].
#[derive(Clone, PartialEq)]
pub struct PaymentFormHandle {
    values: UseStateHandle<PaymentFormValues>,
    errors: UseStateHandle<Option<FormErrors>>,
    localization: Rc<Localization>,
    on_form_error: Callback<FormErrors>,
}

impl PaymentFormHandle {
    pub fn values(&self) -> &PaymentFormValues {
        &self.values
    }

    /// Errors from the most recent submit, if it failed validation.
    pub fn errors(&self) -> Option<&FormErrors> {
        (*self.errors).as_ref()
    }

    pub fn localization(&self) -> &Localization {
        &self.localization
    }

    /// Store a card number, dropping any spaces the user typed or pasted.
    pub fn set_card_number(&self, raw: &str) {
        let mut next = (*self.values).clone();
        next.card_number = strip_spaces(raw);
        self.values.set(next);
    }

    pub fn set_expiry_month(&self, value: String) {
        let mut next = (*self.values).clone();
        next.expiry_month = value;
        self.values.set(next);
    }

    pub fn set_expiry_year(&self, value: String) {
        let mut next = (*self.values).clone();
        next.expiry_year = value;
        self.values.set(next);
    }

    pub fn set_cvv(&self, raw: &str) {
        let mut next = (*self.values).clone();
        next.cvv = strip_spaces(raw);
        self.values.set(next);
    }

    pub fn set_terms(&self, accepted: bool) {
        let mut next = (*self.values).clone();
        next.terms = accepted;
        self.values.set(next);
    }

    /// Validate the held values; on success hand `form` to `bridge` for
    /// tokenization, otherwise record the failures and notify the host.
    ///
    /// A bridge refusal is logged to the console only. It carries no
    /// user-correctable information, and the flow state machine reports
    /// the asynchronous part of the hand-off on its own.
    pub(crate) fn submit_with(&self, bridge: &PaymentBridge, form: &HtmlFormElement) {
        let errors = validate(&self.values, ExpiryCutoff::now());
        if !errors.is_empty() {
            self.on_form_error.emit(errors.clone());
            self.errors.set(Some(errors));
            return;
        }
        self.errors.set(None);

        if let Err(err) = bridge.submit_fields(form) {
            console::error_1(&JsValue::from_str(&err.to_string()));
        }
    }
}

fn strip_spaces(value: &str) -> String {
    value.chars().filter(|c| *c != ' ').collect()
}

#[derive(Properties, PartialEq)]
pub struct PaymentFormProviderProps {
    #[prop_or_default]
    pub localization: Localization,
    /// Invoked with the collected failures whenever a submit does not
    /// validate.
    #[prop_or_default]
    pub on_form_error: Callback<FormErrors>,
    #[prop_or_default]
    pub children: Children,
}

/// Owns the form values and errors and provides a [`PaymentFormHandle`]
/// to everything beneath it.
#[function_component(PaymentFormProvider)]
pub fn payment_form_provider(props: &PaymentFormProviderProps) -> Html {
    let values = use_state(PaymentFormValues::default);
    let errors = use_state(|| None::<FormErrors>);

    let handle = PaymentFormHandle {
        values,
        errors,
        localization: Rc::new(props.localization.clone()),
        on_form_error: props.on_form_error.clone(),
    };

    html! {
        <ContextProvider<PaymentFormHandle> context={handle}>
            { for props.children.iter() }
        </ContextProvider<PaymentFormHandle>>
    }
}

/// The form handle from the nearest provider.
///
/// # Panics
/// Panics when called outside a [`PaymentFormProvider`].
#[hook]
pub fn use_payment_form() -> PaymentFormHandle {
    use_context::<PaymentFormHandle>()
        .expect("use_payment_form must be used within a PaymentFormProvider")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_spaces_removes_interior_and_edge_spaces() {
        assert_eq!(strip_spaces("4532 0151 1283 0366"), "4532015112830366");
        assert_eq!(strip_spaces(" 123 "), "123");
        assert_eq!(strip_spaces(""), "");
    }

    #[test]
    fn strip_spaces_keeps_everything_else() {
        // Validation rejects stray characters later; storage is verbatim.
        assert_eq!(strip_spaces("4532-0151"), "4532-0151");
    }
}
