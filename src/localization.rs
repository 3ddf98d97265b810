//! localization.rs
//!
//! Display strings for the prebuilt field components. Hosts hand a
//! [`Localization`] to `PaymentFormProvider`; anything left unset falls back
//! to the built-in English copy (labels here, error messages on
//! `FieldError`'s `Display`).

use crate::schema::FieldError;

/// Labels rendered above the inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLabels {
    pub card_number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: String,
}

impl Default for FieldLabels {
    fn default() -> Self {
        Self {
            card_number: "Card Number".into(),
            expiry_month: "Expiry Month".into(),
            expiry_year: "Expiry Year".into(),
            cvv: "CVV".into(),
        }
    }
}

/// Per-field overrides for validation messages. `expiry` covers the
/// combined month/year in-the-past failure, which renders under the
/// expiry month field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorMessages {
    pub card_number: Option<String>,
    pub expiry_month: Option<String>,
    pub expiry_year: Option<String>,
    pub expiry: Option<String>,
    pub cvv: Option<String>,
    pub terms: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Localization {
    pub labels: FieldLabels,
    pub messages: ErrorMessages,
}

impl Localization {
    /// The message to display for `error`, preferring the host override.
    pub fn message_for(&self, error: &FieldError) -> String {
        let overridden = match error {
            FieldError::InvalidCardNumber => self.messages.card_number.as_ref(),
            FieldError::InvalidExpiryMonth => self.messages.expiry_month.as_ref(),
            FieldError::InvalidExpiryYear => self.messages.expiry_year.as_ref(),
            FieldError::ExpiredCard => self.messages.expiry.as_ref(),
            FieldError::InvalidCvv => self.messages.cvv.as_ref(),
            FieldError::TermsNotAccepted => self.messages.terms.as_ref(),
        };

        overridden
            .cloned()
            .unwrap_or_else(|| error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_labels_are_english() {
        let labels = FieldLabels::default();
        assert_eq!(labels.card_number, "Card Number");
        assert_eq!(labels.cvv, "CVV");
    }

    #[test]
    fn falls_back_to_the_error_display() {
        let localization = Localization::default();
        assert_eq!(
            localization.message_for(&FieldError::InvalidCvv),
            "Please enter a valid CVV"
        );
    }

    #[test]
    fn host_overrides_win() {
        let localization = Localization {
            messages: ErrorMessages {
                expiry: Some("Karte abgelaufen".into()),
                ..ErrorMessages::default()
            },
            ..Localization::default()
        };
        assert_eq!(
            localization.message_for(&FieldError::ExpiredCard),
            "Karte abgelaufen"
        );
        // Untouched fields still fall back.
        assert_eq!(
            localization.message_for(&FieldError::InvalidCardNumber),
            "Please enter a valid card number"
        );
    }
}
