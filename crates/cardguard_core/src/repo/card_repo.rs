//! Card repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Own the `cards` table: idempotent schema setup and append-only insert.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `NewCardRecord::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - A failed insert leaves no row behind.

use crate::db::migrations::{apply_migrations, current_user_version};
use crate::db::DbError;
use crate::model::card::{CardId, CardRecord, CardRecordError, NewCardRecord};
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const CARD_SELECT_SQL: &str = "SELECT
    id,
    holder_name,
    number_digits,
    expiry,
    password_hash,
    cvv,
    created_at
FROM cards";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for card persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    InvalidRecord(CardRecordError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRecord(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted card data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidRecord(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<CardRecordError> for RepoError {
    fn from(value: CardRecordError) -> Self {
        Self::InvalidRecord(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for card storage.
pub trait CardRepository {
    /// Creates the card table when absent. No-op otherwise.
    fn ensure_schema(&mut self) -> RepoResult<()>;
    /// Appends one record and returns its storage-assigned id.
    fn insert_card(&self, record: &NewCardRecord) -> RepoResult<CardId>;
    fn get_card(&self, id: CardId) -> RepoResult<Option<CardRecord>>;
    fn count_cards(&self) -> RepoResult<u64>;
}

/// SQLite-backed card repository.
pub struct SqliteCardRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteCardRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl CardRepository for SqliteCardRepository<'_> {
    fn ensure_schema(&mut self) -> RepoResult<()> {
        apply_migrations(self.conn)?;
        Ok(())
    }

    fn insert_card(&self, record: &NewCardRecord) -> RepoResult<CardId> {
        record.validate()?;

        let started_at = Instant::now();
        let result = self.conn.execute(
            "INSERT INTO cards (
                holder_name,
                number_digits,
                expiry,
                password_hash,
                cvv,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                record.holder_name.as_str(),
                record.number_digits.as_str(),
                record.expiry.as_str(),
                record.password_hash.as_str(),
                record.cvv.as_str(),
                record.created_at.as_str(),
            ],
        );

        match result {
            Ok(_) => {
                let id = self.conn.last_insert_rowid();
                debug!(
                    "event=card_insert module=repo status=ok card_id={} duration_ms={}",
                    id,
                    started_at.elapsed().as_millis()
                );
                Ok(id)
            }
            Err(err) => {
                if matches!(current_user_version(self.conn), Ok(0)) {
                    error!(
                        "event=card_insert module=repo status=error duration_ms={} error_code=schema_missing",
                        started_at.elapsed().as_millis()
                    );
                    return Err(DbError::SchemaNotInitialized.into());
                }
                error!(
                    "event=card_insert module=repo status=error duration_ms={} error_code=insert_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }

    fn get_card(&self, id: CardId) -> RepoResult<Option<CardRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CARD_SELECT_SQL} WHERE id = ?1;"))?;
        let raw = stmt.query_row([id], read_raw_card).optional()?;
        raw.map(parse_card).transpose()
    }

    fn count_cards(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cards;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative card count `{count}`")))
    }
}

fn read_raw_card(row: &Row<'_>) -> rusqlite::Result<CardRecord> {
    Ok(CardRecord {
        id: row.get("id")?,
        holder_name: row.get("holder_name")?,
        number_digits: row.get("number_digits")?,
        expiry: row.get("expiry")?,
        password_hash: row.get("password_hash")?,
        cvv: row.get("cvv")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_card(record: CardRecord) -> RepoResult<CardRecord> {
    record
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("cards.id={}: {err}", record.id)))?;
    Ok(record)
}
