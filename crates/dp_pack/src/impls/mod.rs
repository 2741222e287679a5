//! [`Pack`](crate::Pack) implementations for core and `alloc` types.

mod blob;
mod container;
mod scalar;
mod tuple;

pub use blob::{Bytes, Packed};
