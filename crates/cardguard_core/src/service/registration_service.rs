//! Card registration use-case service.
//!
//! # Responsibility
//! - Turn one raw submission into one persisted, sanitized card record.
//!
//! # Invariants
//! - Validation runs before any repository call; a rejected submission never
//!   reaches storage.
//! - The card password is hashed before the record leaves this module.
//! - Log events carry error codes and ids only, never field values.

use crate::model::card::{CardId, NewCardRecord};
use crate::model::submission::{
    validate_submission, NormalizedSubmission, SubmissionForm, SubmissionValidationError,
};
use crate::repo::card_repo::{CardRepository, RepoError, RepoResult};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure of a registration attempt.
#[derive(Debug)]
pub enum RegistrationError {
    /// User-correctable input problem.
    Validation(SubmissionValidationError),
    /// Schema or insert failure. Not correctable by the submitter.
    Storage(RepoError),
}

impl Display for RegistrationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "card storage failed: {err}"),
        }
    }
}

impl Error for RegistrationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<SubmissionValidationError> for RegistrationError {
    fn from(value: SubmissionValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for RegistrationError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

/// Registration service facade over repository implementations.
pub struct RegistrationService<R: CardRepository> {
    repo: R,
}

impl<R: CardRepository> RegistrationService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and stores one submission.
    ///
    /// # Contract
    /// - Returns the first validation failure without touching storage.
    /// - On success returns the new storage-assigned id.
    pub fn register(&self, form: &SubmissionForm) -> Result<CardId, RegistrationError> {
        let normalized = match validate_submission(form) {
            Ok(normalized) => normalized,
            Err(err) => {
                warn!(
                    "event=card_register module=service status=rejected error_code={}",
                    err.code()
                );
                return Err(err.into());
            }
        };
        Ok(self.store(&normalized)?)
    }

    /// Stores an already validated submission.
    ///
    /// Fails only with storage errors; validation is the caller's concern.
    pub fn store(&self, submission: &NormalizedSubmission) -> RepoResult<CardId> {
        let record = NewCardRecord::from_submission(submission);
        let card_id = self.repo.insert_card(&record)?;
        info!(
            "event=card_register module=service status=ok card_id={}",
            card_id
        );
        Ok(card_id)
    }

    /// Borrows the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }
}
