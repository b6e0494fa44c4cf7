//! Persisted card record model.
//!
//! # Responsibility
//! - Define the sanitized record shape written by the card store.
//! - Derive that shape from a validated submission.
//!
//! # Invariants
//! - `password_hash` is always a digest, never the raw password.
//! - `id` is assigned by storage and never reused.
//! - Records have no update or delete path.

use crate::hashing::hash_text;
use crate::model::submission::{
    check_expiry, NormalizedSubmission, CARD_DIGITS_MAX, CARD_DIGITS_MIN, CVV_LEN_MAX, CVV_LEN_MIN,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned card identifier.
pub type CardId = i64;

const MASKED_VISIBLE_DIGITS: usize = 4;

/// Invariant violation found on a record about to be written or just read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardRecordError {
    EmptyField(&'static str),
    InvalidExpiry(String),
    InvalidNumberLength(usize),
    InvalidCvv,
}

impl Display for CardRecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "card record field `{field}` is empty"),
            Self::InvalidExpiry(value) => write!(f, "card record expiry `{value}` is not MM/YY"),
            Self::InvalidNumberLength(len) => {
                write!(f, "card record number has {len} digits")
            }
            Self::InvalidCvv => write!(f, "card record cvv is not 3-4 digits"),
        }
    }
}

impl Error for CardRecordError {}

/// Sanitized record ready for insertion, without a storage id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCardRecord {
    pub holder_name: String,
    /// Full digit sequence of the card number.
    pub number_digits: String,
    pub expiry: String,
    /// Lowercase hex SHA-256 of the card password.
    pub password_hash: String,
    pub cvv: String,
    /// UTC ISO-8601 timestamp.
    pub created_at: String,
}

impl NewCardRecord {
    /// Builds a record stamped with the current UTC time.
    pub fn from_submission(submission: &NormalizedSubmission) -> Self {
        Self::from_submission_at(
            submission,
            Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        )
    }

    /// Builds a record with a caller-provided timestamp.
    pub fn from_submission_at(
        submission: &NormalizedSubmission,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            holder_name: submission.holder_name.clone(),
            number_digits: submission.number_digits.clone(),
            expiry: submission.expiry.clone(),
            password_hash: hash_text(&submission.password),
            cvv: submission.cvv.clone(),
            created_at: created_at.into(),
        }
    }

    /// Checks persisted-record invariants.
    pub fn validate(&self) -> Result<(), CardRecordError> {
        validate_fields(
            &self.holder_name,
            &self.number_digits,
            &self.expiry,
            &self.password_hash,
            &self.cvv,
            &self.created_at,
        )
    }
}

/// Card record as stored, including its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: CardId,
    pub holder_name: String,
    pub number_digits: String,
    pub expiry: String,
    pub password_hash: String,
    pub cvv: String,
    pub created_at: String,
}

impl CardRecord {
    pub fn validate(&self) -> Result<(), CardRecordError> {
        validate_fields(
            &self.holder_name,
            &self.number_digits,
            &self.expiry,
            &self.password_hash,
            &self.cvv,
            &self.created_at,
        )
    }

    /// Card number with all but the last four digits replaced by `*`.
    pub fn masked_number(&self) -> String {
        let hidden = self
            .number_digits
            .chars()
            .count()
            .saturating_sub(MASKED_VISIBLE_DIGITS);
        let mut masked = "*".repeat(hidden);
        masked.extend(self.number_digits.chars().skip(hidden));
        masked
    }
}

fn validate_fields(
    holder_name: &str,
    number_digits: &str,
    expiry: &str,
    password_hash: &str,
    cvv: &str,
    created_at: &str,
) -> Result<(), CardRecordError> {
    for (name, value) in [
        ("holder_name", holder_name),
        ("number_digits", number_digits),
        ("expiry", expiry),
        ("password_hash", password_hash),
        ("cvv", cvv),
        ("created_at", created_at),
    ] {
        if value.is_empty() {
            return Err(CardRecordError::EmptyField(name));
        }
    }

    if check_expiry(expiry).is_err() {
        return Err(CardRecordError::InvalidExpiry(expiry.to_string()));
    }

    let digit_count = number_digits.len();
    if !(CARD_DIGITS_MIN..=CARD_DIGITS_MAX).contains(&digit_count)
        || !number_digits.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(CardRecordError::InvalidNumberLength(digit_count));
    }

    if !(CVV_LEN_MIN..=CVV_LEN_MAX).contains(&cvv.len()) || !cvv.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(CardRecordError::InvalidCvv);
    }

    Ok(())
}
