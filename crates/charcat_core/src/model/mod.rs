//! Character domain model and request/read projections.
//!
//! # Responsibility
//! - Define canonical data structures used by catalog business logic.
//! - Separate write requests, persisted records and read projections.
//!
//! # Invariants
//! - Every persisted character is identified by a storage-assigned id.
//! - Deletion is a soft-delete tombstone unless a hard delete is requested.

pub mod character;
pub mod request;
pub mod view;
