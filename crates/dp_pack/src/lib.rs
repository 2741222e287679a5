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

mod constraint;
mod definer;
mod error;
mod labelled;
mod pack;
mod reader;
mod writer;

pub mod format;
pub mod impls;

#[doc(hidden)]
pub mod __macro_exports;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use constraint::{Constraint, Validate, read_validated, validate};
pub use definer::Definer;
pub use error::{DumpError, LoadError, PackError};
pub use format::{read_binary, read_object, write_binary, write_object};
pub use impls::{Bytes, Packed};
pub use labelled::{LabelledEnum, LabelledVariant};
pub use labelled::{define_enum, read_enum, write_enum};
pub use labelled::{define_variant, read_variant, write_variant};
pub use pack::Pack;
pub use reader::Reader;
pub use writer::Writer;
