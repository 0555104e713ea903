//! Query-side building blocks: filters, predicates and pagination.
//!
//! # Responsibility
//! - Turn caller filter input into one composed, storage-independent predicate.
//! - Define the pagination and sort contract shared by list and search.
//!
//! # Invariants
//! - Every predicate built here excludes soft-deleted rows.
//! - User-provided values reach SQL only as bound parameters.

pub mod filter;
pub mod page;
pub mod predicate;

use thiserror::Error;

/// Errors raised while parsing caller query input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("unknown sort field `{0}`")]
    UnknownSortField(String),
    #[error("page size must be at least 1, got {0}")]
    InvalidPageSize(u32),
    #[error("filter `{key}` expects an integer, got `{value}`")]
    InvalidBound { key: String, value: String },
}
