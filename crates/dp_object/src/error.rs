use thiserror::Error;

use crate::ValueKind;

// -----------------------------------------------------------------------------
// Error

/// Misuse of a tree handle.
///
/// Lookups never produce this error, they return an invalid handle instead.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ObjectError {
    #[error("Expected a value of type {expected}, found {found}")]
    WrongType { expected: ValueKind, found: ValueKind },

    #[error("Operation on an invalid object handle")]
    InvalidHandle,

    #[error("Cannot insert a keyed entry into a {0} node")]
    NotAMap(ValueKind),

    #[error("Cannot append an entry to a {0} node")]
    NotAList(ValueKind),

    #[error("A map keyed by list indices cannot replace a list in a delta")]
    AmbiguousDelta,
}
