//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must enforce record validation before persistence.
//! - The card table is append-only: no update or delete statement exists.

pub mod card_repo;
