//! Prebuilt form controls wired to the payment form container.
//!
//! Each control reads and writes its slice of the form values through
//! `use_payment_form`, renders the localized label, and shows the first
//! localized error for its field after a failed submit. Failing controls
//! are marked with `data-error` and `aria-invalid` so hosts can restyle
//! them without reimplementing the wiring.

mod card_number;
mod cvv;
mod expiry_month;
mod expiry_year;
mod submit_button;
mod terms;

pub use card_number::{CardNumber, CardNumberProps};
pub use cvv::{Cvv, CvvProps};
pub use expiry_month::{ExpiryMonth, ExpiryMonthProps};
pub use expiry_year::{ExpiryYear, ExpiryYearProps};
pub use submit_button::{SubmitButton, SubmitButtonProps};
pub use terms::{Terms, TermsProps};

use yew::Classes;

/// Class overrides for the label, input, and error elements of a field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldClasses {
    pub label: Classes,
    pub input: Classes,
    pub error: Classes,
}
