//! schema.rs
//!
//! Pure validation rules for the card payment form: Luhn checksum over the
//! card number, numeric range checks for the expiry selects, a not-in-the-past
//! check for the (month, year) pair, CVV length, and the terms checkbox.
//!
//! Everything here is synchronous and free of DOM access so the rules can be
//! unit tested off-browser. The form container in `form.rs` runs
//! [`validate`] at submit time and holds on to the resulting [`FormErrors`].

use thiserror::Error;
use time::OffsetDateTime;

/// A single validation failure, tagged by rule rather than by message so
/// hosts can branch on the kind. The `Display` impl carries the default
/// English copy; `Localization` can override it per field.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("Please enter a valid card number")]
    InvalidCardNumber,
    #[error("Please select a valid expiry month")]
    InvalidExpiryMonth,
    #[error("Please select a valid expiry year")]
    InvalidExpiryYear,
    #[error("The card expiry date has passed")]
    ExpiredCard,
    #[error("Please enter a valid CVV")]
    InvalidCvv,
    #[error("Please accept the terms and conditions")]
    TermsNotAccepted,
}

/// Current values of the host-facing form controls.
///
/// The card number and CVV are stored space-stripped; the expiry selects
/// store their raw option values (`"1"`..`"12"` and two-digit years).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaymentFormValues {
    pub card_number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: String,
    pub terms: bool,
}

/// Validation failures collected per field. Every rule runs on every
/// submit, so one bad field never masks another.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormErrors {
    pub card_number: Vec<FieldError>,
    pub expiry_month: Vec<FieldError>,
    pub expiry_year: Vec<FieldError>,
    pub cvv: Vec<FieldError>,
    pub terms: Vec<FieldError>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.card_number.is_empty()
            && self.expiry_month.is_empty()
            && self.expiry_year.is_empty()
            && self.cvv.is_empty()
            && self.terms.is_empty()
    }
}

/// The month/year a card must not expire before, i.e. "now" reduced to the
/// two-digit year convention the expiry selects use.
///
/// Passed into [`validate`] explicitly so the expiry rules stay
/// deterministic under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryCutoff {
    /// 1 through 12.
    pub month: u8,
    /// Two-digit year, 0 through 99.
    pub year: u8,
}

impl ExpiryCutoff {
    /// The cutoff for the current UTC month.
    pub fn now() -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            month: u8::from(now.month()),
            year: now.year().rem_euclid(100) as u8,
        }
    }
}

/// Luhn-validate a card number. Interior spaces are tolerated (and skipped);
/// any other non-digit character fails the check outright. The digit count
/// must land in the 13 to 19 range issuers actually use.
pub fn is_valid_card_number(value: &str) -> bool {
    if value.chars().any(|c| !c.is_ascii_digit() && c != ' ') {
        return false;
    }

    let digits: Vec<u32> = value.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() < 13 || digits.len() > 19 {
        return false;
    }

    // Double every second digit counting from the rightmost, folding
    // two-digit products back into a single digit.
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(index, &digit)| {
            if index % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum();

    sum % 10 == 0
}

/// Exactly 3 or 4 ASCII digits.
pub fn is_valid_cvv(value: &str) -> bool {
    (3..=4).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())
}

/// Run every rule against `values` and collect the failures.
///
/// The combined expiry check (pair not strictly in the past) only applies
/// once both parts pass on their own, and its failure is attached to the
/// expiry month field.
pub fn validate(values: &PaymentFormValues, cutoff: ExpiryCutoff) -> FormErrors {
    let mut errors = FormErrors::default();

    if !is_valid_card_number(&values.card_number) {
        errors.card_number.push(FieldError::InvalidCardNumber);
    }

    let month = parse_month(&values.expiry_month);
    if month.is_none() {
        errors.expiry_month.push(FieldError::InvalidExpiryMonth);
    }

    let year = parse_year(&values.expiry_year).filter(|&year| year >= cutoff.year);
    if year.is_none() {
        errors.expiry_year.push(FieldError::InvalidExpiryYear);
    }

    if let (Some(month), Some(year)) = (month, year) {
        if year == cutoff.year && month < cutoff.month {
            errors.expiry_month.push(FieldError::ExpiredCard);
        }
    }

    if !is_valid_cvv(&values.cvv) {
        errors.cvv.push(FieldError::InvalidCvv);
    }

    if !values.terms {
        errors.terms.push(FieldError::TermsNotAccepted);
    }

    errors
}

/// `"1"` through `"12"`, with or without a leading zero.
fn parse_month(value: &str) -> Option<u8> {
    if value.is_empty() || value.len() > 2 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok().filter(|month| (1..=12).contains(month))
}

/// Exactly two ASCII digits.
fn parse_year(value: &str) -> Option<u8> {
    if value.len() != 2 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUTOFF: ExpiryCutoff = ExpiryCutoff { month: 6, year: 24 };

    fn valid_values() -> PaymentFormValues {
        PaymentFormValues {
            card_number: "4532015112830366".into(),
            expiry_month: "6".into(),
            expiry_year: "24".into(),
            cvv: "123".into(),
            terms: true,
        }
    }

    #[test]
    fn luhn_accepts_valid_checksum() {
        assert!(is_valid_card_number("4532015112830366"));
        // 13 and 19 digit lengths.
        assert!(is_valid_card_number("4222222222222"));
        assert!(is_valid_card_number("4111111111111111110"));
    }

    #[test]
    fn luhn_rejects_bad_checksum() {
        assert!(!is_valid_card_number("4532015112830367"));
    }

    #[test]
    fn card_number_tolerates_spaces() {
        assert!(is_valid_card_number("4532 0151 1283 0366"));
    }

    #[test]
    fn card_number_rejects_other_characters() {
        assert!(!is_valid_card_number("4532-0151-1283-0366"));
        assert!(!is_valid_card_number("4532015112830366x"));
    }

    #[test]
    fn card_number_rejects_out_of_range_lengths() {
        assert!(!is_valid_card_number("411111111111"));
        assert!(!is_valid_card_number("41111111111111111100"));
        assert!(!is_valid_card_number(""));
    }

    #[test]
    fn expiry_in_current_month_is_accepted() {
        let values = PaymentFormValues {
            expiry_month: "06".into(),
            expiry_year: "24".into(),
            ..valid_values()
        };
        assert!(validate(&values, CUTOFF).is_empty());
    }

    #[test]
    fn expiry_last_month_is_rejected() {
        let values = PaymentFormValues {
            expiry_month: "05".into(),
            expiry_year: "24".into(),
            ..valid_values()
        };
        let errors = validate(&values, CUTOFF);
        assert_eq!(errors.expiry_month, vec![FieldError::ExpiredCard]);
        assert!(errors.expiry_year.is_empty());
    }

    #[test]
    fn expiry_early_next_year_is_accepted() {
        let values = PaymentFormValues {
            expiry_month: "01".into(),
            expiry_year: "25".into(),
            ..valid_values()
        };
        assert!(validate(&values, CUTOFF).is_empty());
    }

    #[test]
    fn expiry_year_before_cutoff_fails_the_year_rule() {
        let values = PaymentFormValues {
            expiry_year: "23".into(),
            ..valid_values()
        };
        let errors = validate(&values, CUTOFF);
        assert_eq!(errors.expiry_year, vec![FieldError::InvalidExpiryYear]);
        // The pair check stays out of it when the year already failed.
        assert!(errors.expiry_month.is_empty());
    }

    #[test]
    fn expiry_year_must_be_two_digits() {
        for year in ["2025", "5", "", "2a"] {
            let values = PaymentFormValues {
                expiry_year: year.into(),
                ..valid_values()
            };
            let errors = validate(&values, CUTOFF);
            assert_eq!(errors.expiry_year, vec![FieldError::InvalidExpiryYear], "{year:?}");
        }
    }

    #[test]
    fn expiry_month_bounds() {
        for month in ["1", "01", "12", "7"] {
            assert_eq!(parse_month(month), month.parse().ok(), "{month:?}");
        }
        for month in ["0", "13", "", "1 ", "+5", "005"] {
            assert_eq!(parse_month(month), None, "{month:?}");
        }
    }

    #[test]
    fn cvv_lengths() {
        assert!(!is_valid_cvv("12"));
        assert!(is_valid_cvv("123"));
        assert!(is_valid_cvv("1234"));
        assert!(!is_valid_cvv("12345"));
        assert!(!is_valid_cvv("12a"));
    }

    #[test]
    fn terms_error_survives_other_failures() {
        let values = PaymentFormValues {
            card_number: "not a card".into(),
            expiry_month: "0".into(),
            expiry_year: "xx".into(),
            cvv: "1".into(),
            terms: false,
        };
        let errors = validate(&values, CUTOFF);
        assert_eq!(errors.terms, vec![FieldError::TermsNotAccepted]);
        assert_eq!(errors.card_number, vec![FieldError::InvalidCardNumber]);
        assert_eq!(errors.expiry_month, vec![FieldError::InvalidExpiryMonth]);
        assert_eq!(errors.expiry_year, vec![FieldError::InvalidExpiryYear]);
        assert_eq!(errors.cvv, vec![FieldError::InvalidCvv]);
    }

    #[test]
    fn fully_valid_form_has_no_errors() {
        assert!(validate(&valid_values(), CUTOFF).is_empty());
    }
}
