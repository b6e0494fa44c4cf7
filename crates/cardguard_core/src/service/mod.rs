//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, hashing and repository calls into use-case APIs.
//! - Keep outer layers decoupled from storage details.

pub mod registration_service;
