//! Backends of the pack protocol.

mod binary;
mod object;

pub use binary::{BinaryReader, BinaryWriter, read_binary, write_binary};
pub use object::{ObjectReader, ObjectWriter, read_object, write_object};
