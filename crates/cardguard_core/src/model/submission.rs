//! Submission model and validation pipeline.
//!
//! # Responsibility
//! - Accept the five raw form fields of a card registration.
//! - Normalize and check them, reporting the first violation only.
//!
//! # Invariants
//! - Validation is pure: no I/O, no logging, no clock access.
//! - Check order is fixed: presence, expiry shape, expiry month, card number
//!   length, CVV. Earlier failures hide later ones.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const FIELD_HOLDER_NAME: &str = "holder_name";
pub const FIELD_CARD_NUMBER: &str = "card_number";
pub const FIELD_EXPIRY: &str = "expiry";
pub const FIELD_CVV: &str = "cvv";
pub const FIELD_CARD_PASSWORD: &str = "card_password";

pub const CARD_DIGITS_MIN: usize = 13;
pub const CARD_DIGITS_MAX: usize = 19;
pub const CVV_LEN_MIN: usize = 3;
pub const CVV_LEN_MAX: usize = 4;

const EXPIRY_LEN: usize = 5;
const EXPIRY_SEPARATOR_INDEX: usize = 2;

static NON_DIGIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9]+").expect("valid non-digit regex"));

/// Raw registration form as received from the outer layer.
///
/// Missing keys are represented as empty strings, never as a separate error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionForm {
    pub holder_name: String,
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
    pub card_password: String,
}

impl SubmissionForm {
    /// Builds a form from arbitrary key/value pairs.
    ///
    /// Unknown keys are ignored. Absent keys stay empty. When a key repeats,
    /// the last value wins.
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::default();
        for (key, value) in fields {
            let slot = match key.as_ref() {
                FIELD_HOLDER_NAME => &mut form.holder_name,
                FIELD_CARD_NUMBER => &mut form.card_number,
                FIELD_EXPIRY => &mut form.expiry,
                FIELD_CVV => &mut form.cvv,
                FIELD_CARD_PASSWORD => &mut form.card_password,
                _ => continue,
            };
            *slot = value.into();
        }
        form
    }
}

/// Submission after trimming and format checks succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSubmission {
    /// Trimmed holder name.
    pub holder_name: String,
    /// Card number with every non-digit removed.
    pub number_digits: String,
    /// Expiry in `MM/YY` form.
    pub expiry: String,
    /// All-digit CVV, 3 or 4 chars.
    pub cvv: String,
    /// Trimmed card password. Must be hashed before persistence.
    pub password: String,
}

/// First validation failure found for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionValidationError {
    /// At least one field is empty after trimming.
    MissingFields,
    /// Expiry is not five chars with `/` at index 2.
    BadExpiryFormat,
    /// Expiry month is not a number in `1..=12`.
    BadExpiryMonth,
    /// Card number digit count outside `13..=19`.
    BadCardNumberLength,
    /// CVV is not 3-4 ASCII digits.
    BadCvv,
}

impl SubmissionValidationError {
    /// Stable machine-readable code used in log events.
    pub fn code(self) -> &'static str {
        match self {
            Self::MissingFields => "missing_fields",
            Self::BadExpiryFormat => "bad_expiry_format",
            Self::BadExpiryMonth => "bad_expiry_month",
            Self::BadCardNumberLength => "bad_card_number_length",
            Self::BadCvv => "bad_cvv",
        }
    }
}

impl Display for SubmissionValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields => write!(f, "Please fill in all fields."),
            Self::BadExpiryFormat => write!(f, "Expiry must use the MM/YY format."),
            Self::BadExpiryMonth => write!(f, "Invalid month in expiry."),
            Self::BadCardNumberLength => write!(
                f,
                "Invalid card number (must have between {CARD_DIGITS_MIN} and {CARD_DIGITS_MAX} digits)."
            ),
            Self::BadCvv => write!(f, "Invalid CVV."),
        }
    }
}

impl Error for SubmissionValidationError {}

/// Validates a raw form and returns its normalized payload.
pub fn validate_submission(
    form: &SubmissionForm,
) -> Result<NormalizedSubmission, SubmissionValidationError> {
    let holder_name = form.holder_name.trim();
    let card_number = form.card_number.trim();
    let expiry = form.expiry.trim();
    let cvv = form.cvv.trim();
    let password = form.card_password.trim();

    if [holder_name, card_number, expiry, cvv, password]
        .iter()
        .any(|value| value.is_empty())
    {
        return Err(SubmissionValidationError::MissingFields);
    }

    check_expiry(expiry)?;

    let number_digits = extract_card_digits(card_number);
    if !(CARD_DIGITS_MIN..=CARD_DIGITS_MAX).contains(&number_digits.len()) {
        return Err(SubmissionValidationError::BadCardNumberLength);
    }

    if !is_valid_cvv(cvv) {
        return Err(SubmissionValidationError::BadCvv);
    }

    Ok(NormalizedSubmission {
        holder_name: holder_name.to_string(),
        number_digits,
        expiry: expiry.to_string(),
        cvv: cvv.to_string(),
        password: password.to_string(),
    })
}

/// Removes every character that is not an ASCII digit.
pub fn extract_card_digits(card_number: &str) -> String {
    NON_DIGIT_RE.replace_all(card_number, "").into_owned()
}

pub(crate) fn check_expiry(expiry: &str) -> Result<(), SubmissionValidationError> {
    let chars: Vec<char> = expiry.chars().collect();
    if chars.len() != EXPIRY_LEN || chars[EXPIRY_SEPARATOR_INDEX] != '/' {
        return Err(SubmissionValidationError::BadExpiryFormat);
    }

    // Non-numeric months fold into the month-range failure. Padding around
    // the month digits is tolerated, so `1 /25` reads as month 1.
    let month_text: String = chars[..EXPIRY_SEPARATOR_INDEX].iter().collect();
    match month_text.trim().parse::<u32>() {
        Ok(month) if (1..=12).contains(&month) => Ok(()),
        _ => Err(SubmissionValidationError::BadExpiryMonth),
    }
}

fn is_valid_cvv(cvv: &str) -> bool {
    (CVV_LEN_MIN..=CVV_LEN_MAX).contains(&cvv.len()) && cvv.bytes().all(|b| b.is_ascii_digit())
}
