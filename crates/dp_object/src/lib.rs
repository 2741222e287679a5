#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod arena;
mod eq;
mod error;
mod merge;
mod object;
mod serde;
mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::ObjectError;
pub use merge::{diff, merge};
pub use object::{Children, ConstObject, Object, ObjectIndex};
pub use value::{Primitive, Value, ValueKind};
