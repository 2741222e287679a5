use alloc::string::String;

use dp_object::ValueKind;
use thiserror::Error;

// -----------------------------------------------------------------------------
// LoadError

/// The input does not fit the shape being read.
///
/// Always aborts the whole read; no partial value is returned.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum LoadError {
    #[error("No matching variant")]
    NoMatchingVariant,

    #[error("Repeated variant labels")]
    RepeatedVariantLabels,

    #[error("Invalid label `{0}`")]
    InvalidLabel(String),

    #[error("Unexpected end of input")]
    UnexpectedEnd,

    #[error("Invalid binary schema")]
    InvalidSchema,

    #[error("Missing key `{0}`")]
    MissingKey(String),

    #[error("Expected {expected}, found {found}")]
    WrongType { expected: ValueKind, found: ValueKind },

    #[error("Value out of range for {0}")]
    OutOfRange(&'static str),

    #[error("String is not valid UTF-8")]
    InvalidUtf8,

    #[error("Binary of {size} bytes is not a multiple of stride {stride}")]
    InvalidBinarySize { size: usize, stride: usize },

    #[error("Value violates its constraint")]
    ConstraintViolated,

    #[error("{0} bytes left after the value")]
    TrailingBytes(usize),

    #[error("Unbalanced call to `{0}`")]
    Unbalanced(&'static str),

    #[error("Element type has no fixed size")]
    NotTrivial,
}

// -----------------------------------------------------------------------------
// DumpError

/// A value could not be written.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum DumpError {
    #[error("Element type has no fixed size")]
    NotTrivial,

    #[error("Tree does not match the schema: {0}")]
    Mismatch(#[from] LoadError),

    #[error("Unbalanced call to `{0}`")]
    Unbalanced(&'static str),

    #[error("Value out of range for {0}")]
    OutOfRange(&'static str),

    #[error("Index {index} out of range for {len} labels")]
    InvalidIndex { index: usize, len: usize },

    #[error("Cannot write into the tree: {0}")]
    Tree(#[from] dp_object::ObjectError),
}

// -----------------------------------------------------------------------------
// PackError

/// An error raised on either side of a transfer between a reader and a writer.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum PackError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Dump(#[from] DumpError),
}
