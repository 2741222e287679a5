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

mod codec;
mod schema;
mod token;

#[cfg(test)]
mod fixture;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use codec::{decode, encode, tokens_end, transcode};
pub use schema::{Schema, SchemaBuilder, create_schema};
pub use token::Token;
