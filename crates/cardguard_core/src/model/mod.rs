//! Domain model for card registration.
//!
//! # Responsibility
//! - Define the transient submission shape and its normalized form.
//! - Define the persisted card record shape shared by store and callers.
//!
//! # Invariants
//! - Raw submissions never reach storage; only validated, sanitized records do.
//! - Persisted records are immutable once assigned an id.

pub mod card;
pub mod submission;
