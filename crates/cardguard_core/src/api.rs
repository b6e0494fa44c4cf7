//! Entry-level API for outer layers (CLI, HTTP handlers).
//!
//! # Responsibility
//! - Run one registration per call against a database path.
//! - Convert every outcome into a stable response envelope.
//!
//! # Invariants
//! - Functions in this module never panic and never return `Err`.
//! - Storage and unexpected failure causes are logged, never returned.
//! - The connection opened for a call is dropped before the call returns.

use crate::db::{init_db, open_db, DbResult};
use crate::model::card::CardId;
use crate::model::submission::{validate_submission, NormalizedSubmission, SubmissionForm};
use crate::repo::card_repo::SqliteCardRepository;
use crate::service::registration_service::RegistrationService;
use log::{error, warn};
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

pub const SUCCESS_MESSAGE: &str = "Card verified successfully. No leaks found.";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal error while verifying card. Please try again.";

/// Result envelope returned to the outer layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    /// Whether the card was stored.
    pub success: bool,
    /// Human-readable message for the submitter.
    pub message: String,
    /// HTTP-equivalent status: 200, 400 or 500.
    pub status: u16,
    /// Created card id on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_id: Option<CardId>,
}

impl SubmissionResponse {
    /// Success envelope for a stored card.
    pub fn stored(card_id: CardId) -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            status: STATUS_OK,
            card_id: Some(card_id),
        }
    }

    /// 400 envelope carrying a user-correctable message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            status: STATUS_BAD_REQUEST,
            card_id: None,
        }
    }

    /// 500 envelope with the generic message. Causes belong in logs only.
    pub fn internal_error() -> Self {
        Self {
            success: false,
            message: INTERNAL_ERROR_MESSAGE.to_string(),
            status: STATUS_INTERNAL_ERROR,
            card_id: None,
        }
    }
}

/// Creates the card table at `db_path` when absent.
///
/// Startup-only; request paths use [`submit_card`].
/// Idempotent: an up-to-date database is left untouched.
pub fn ensure_schema(db_path: impl AsRef<Path>) -> DbResult<()> {
    init_db(db_path).map(drop)
}

/// Validates and stores one submission at `db_path`.
///
/// # Contract
/// - Validation failures return status 400 with the specific message, and no
///   connection is opened.
/// - Storage failures and panics return status 500 with a generic message.
/// - Success returns status 200 and the new card id.
pub fn submit_card(db_path: impl AsRef<Path>, form: &SubmissionForm) -> SubmissionResponse {
    let db_path = db_path.as_ref();
    guarded(|| {
        let normalized = match validate_or_reject(form) {
            Ok(normalized) => normalized,
            Err(response) => return response,
        };
        store_normalized(db_path, &normalized)
    })
}

/// Same contract as [`submit_card`], for one-shot processes whose startup
/// and single request coincide.
///
/// Validation still runs first; the schema is created only for a valid
/// submission, and a schema failure is reported as the generic 500.
pub fn submit_card_with_init(
    db_path: impl AsRef<Path>,
    form: &SubmissionForm,
) -> SubmissionResponse {
    let db_path = db_path.as_ref();
    guarded(|| {
        let normalized = match validate_or_reject(form) {
            Ok(normalized) => normalized,
            Err(response) => return response,
        };
        if let Err(err) = ensure_schema(db_path) {
            error!(
                "event=card_submit module=api status=error error_code=schema_init_failed error={}",
                err
            );
            return SubmissionResponse::internal_error();
        }
        store_normalized(db_path, &normalized)
    })
}

fn guarded<F>(submit: F) -> SubmissionResponse
where
    F: FnOnce() -> SubmissionResponse,
{
    match panic::catch_unwind(AssertUnwindSafe(submit)) {
        Ok(response) => response,
        Err(_) => {
            error!("event=card_submit module=api status=error error_code=unexpected_panic");
            SubmissionResponse::internal_error()
        }
    }
}

fn validate_or_reject(form: &SubmissionForm) -> Result<NormalizedSubmission, SubmissionResponse> {
    validate_submission(form).map_err(|err| {
        warn!(
            "event=card_submit module=api status=rejected error_code={}",
            err.code()
        );
        SubmissionResponse::rejected(err.to_string())
    })
}

fn store_normalized(db_path: &Path, normalized: &NormalizedSubmission) -> SubmissionResponse {
    let mut conn = match open_db(db_path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=card_submit module=api status=error error_code=db_open_failed error={}",
                err
            );
            return SubmissionResponse::internal_error();
        }
    };

    let service = RegistrationService::new(SqliteCardRepository::new(&mut conn));
    match service.store(normalized) {
        Ok(card_id) => SubmissionResponse::stored(card_id),
        Err(err) => {
            error!(
                "event=card_submit module=api status=error error_code=storage_failed error={}",
                err
            );
            SubmissionResponse::internal_error()
        }
    }
}
