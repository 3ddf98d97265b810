//! reason_codes.rs
//!
//! Gateway reason codes for the 3DS leg of a transaction, and their
//! user-facing explanations.

/// The 3DS-related reason codes the gateway returns on a card submission.
///
/// Codes outside this set exist (declines, fraud scrubbing) but are not
/// part of the 3DS handshake and are left to the host to interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonCode {
    /// The card is enrolled; the 3DS sequence must be performed.
    AuthenticationRequired,
    /// The card is eligible but has not been enrolled.
    NotEnrolled,
    /// The card is not eligible to participate in 3DS.
    Ineligible,
    /// Enrollment could not be determined; the issuer rejected the attempt.
    Rejected,
    /// The transaction was processed as BIN intelligence / device
    /// fingerprinting only.
    Initiation,
    /// The cardholder failed frictionless authentication.
    FrictionlessFailedAuth,
    /// The transaction requires 3DS authentication or a valid SCA exemption.
    ScaRequired,
    /// The card category (typically prepaid) is blocked.
    BlockedCardCategory,
}

impl ReasonCode {
    /// The wire representation the gateway uses.
    pub fn code(self) -> &'static str {
        match self {
            Self::AuthenticationRequired => "202",
            Self::NotEnrolled => "203",
            Self::Ineligible => "204",
            Self::Rejected => "205",
            Self::BlockedCardCategory => "206",
            Self::Initiation => "225",
            Self::FrictionlessFailedAuth => "227",
            Self::ScaRequired => "228",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "202" => Some(Self::AuthenticationRequired),
            "203" => Some(Self::NotEnrolled),
            "204" => Some(Self::Ineligible),
            "205" => Some(Self::Rejected),
            "206" => Some(Self::BlockedCardCategory),
            "225" => Some(Self::Initiation),
            "227" => Some(Self::FrictionlessFailedAuth),
            "228" => Some(Self::ScaRequired),
            _ => None,
        }
    }
}

/// Map a gateway reason code to the message shown to the cardholder.
///
/// Codes that merely announce the next 3DS step (`202`, `225`) are not
/// cardholder-correctable, so they fall through to the generic message
/// along with everything unrecognized.
pub fn determine_error(reason_code: &str) -> &'static str {
    match ReasonCode::from_code(reason_code) {
        Some(ReasonCode::NotEnrolled) => {
            "The card is eligible to participate in 3DS but has not been enrolled. \
             Please try with another card."
        }
        Some(ReasonCode::Ineligible) => {
            "The card is not eligible to participate in 3DS. Please try with another card."
        }
        Some(ReasonCode::Rejected) => {
            "Issuing bank has rejected the 3DS transaction. Please try with another card."
        }
        Some(ReasonCode::FrictionlessFailedAuth) => {
            "3DS Authentication failed. Please try with another card."
        }
        Some(ReasonCode::ScaRequired) => "3DS Authentication failed. Please try again.",
        Some(ReasonCode::BlockedCardCategory) => {
            "Unfortunately we do not accept prepaid cards. \
             Please try adding another card to continue."
        }
        _ => "A payment error occurred, please try again.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for code in [
            ReasonCode::AuthenticationRequired,
            ReasonCode::NotEnrolled,
            ReasonCode::Ineligible,
            ReasonCode::Rejected,
            ReasonCode::Initiation,
            ReasonCode::FrictionlessFailedAuth,
            ReasonCode::ScaRequired,
            ReasonCode::BlockedCardCategory,
        ] {
            assert_eq!(ReasonCode::from_code(code.code()), Some(code));
        }
        assert_eq!(ReasonCode::from_code("201"), None);
    }

    #[test]
    fn actionable_codes_get_specific_messages() {
        assert_eq!(
            determine_error("203"),
            "The card is eligible to participate in 3DS but has not been enrolled. \
             Please try with another card."
        );
        assert_eq!(
            determine_error("206"),
            "Unfortunately we do not accept prepaid cards. \
             Please try adding another card to continue."
        );
        assert_eq!(determine_error("228"), "3DS Authentication failed. Please try again.");
    }

    #[test]
    fn flow_announcements_and_unknown_codes_fall_through() {
        let generic = "A payment error occurred, please try again.";
        assert_eq!(determine_error("202"), generic);
        assert_eq!(determine_error("225"), generic);
        assert_eq!(determine_error("999"), generic);
        assert_eq!(determine_error(""), generic);
    }
}
