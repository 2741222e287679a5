#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use dp_object as object;
pub use dp_pack as pack;
pub use dp_schema as schema;

/// The items most programs reach for.
pub mod prelude {
    pub use dp_object::{ConstObject, Object, Value};
    pub use dp_pack::{
        Bytes, Pack, Packed, labelled_enum, labelled_variant, pack_object, read_binary,
        read_object, write_binary, write_object,
    };
    pub use dp_schema::{Schema, create_schema, decode, encode};
}
