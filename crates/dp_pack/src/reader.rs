use alloc::string::String;

use crate::LoadError;

/// The input side of the protocol: yields the data of a value in walk order.
///
/// Calls mirror [`Writer`](crate::Writer). Where the writer is told a fact
/// (a list has another element, an optional has a value, which variant arm is
/// active), the reader is asked for it instead.
///
/// Implemented by [`BinaryReader`] and [`ObjectReader`].
///
/// [`BinaryReader`]: crate::format::BinaryReader
/// [`ObjectReader`]: crate::format::ObjectReader
pub trait Reader {
    fn value_i32(&mut self) -> Result<i32, LoadError>;
    fn value_i64(&mut self) -> Result<i64, LoadError>;
    fn value_u32(&mut self) -> Result<u32, LoadError>;
    fn value_u64(&mut self) -> Result<u64, LoadError>;
    fn value_f32(&mut self) -> Result<f32, LoadError>;
    fn value_f64(&mut self) -> Result<f64, LoadError>;
    fn value_string(&mut self) -> Result<String, LoadError>;
    fn value_bool(&mut self) -> Result<bool, LoadError>;

    /// Reads a labelled enum and returns its position in `labels`.
    fn enumerate(&mut self, labels: &[&str]) -> Result<usize, LoadError>;

    /// Returns `true` if an optional value follows.
    fn optional(&mut self) -> Result<bool, LoadError>;

    fn variant_begin(&mut self, labels: &[&str]) -> Result<(), LoadError>;

    /// Returns `true` if `label` is the active arm of the current variant.
    fn variant_match(&mut self, label: &str) -> Result<bool, LoadError>;
    fn variant_end(&mut self) -> Result<(), LoadError>;

    /// Returns the size in bytes of the next blob.
    ///
    /// A non-zero `stride` requires the size to be a multiple of it.
    fn binary_size(&mut self, stride: usize) -> Result<usize, LoadError>;

    /// Copies the blob announced by [`binary_size`](Reader::binary_size) into `data`.
    fn binary_data(&mut self, data: &mut [u8]) -> Result<(), LoadError>;

    fn object_begin(&mut self) -> Result<(), LoadError>;
    fn object_next(&mut self, key: &str) -> Result<(), LoadError>;
    fn object_end(&mut self) -> Result<(), LoadError>;

    fn tuple_begin(&mut self) -> Result<(), LoadError>;
    fn tuple_next(&mut self) -> Result<(), LoadError>;
    fn tuple_end(&mut self) -> Result<(), LoadError>;

    fn map_begin(&mut self) -> Result<(), LoadError>;

    /// Returns the key of the next entry, or `None` once the map is exhausted.
    fn map_next(&mut self) -> Result<Option<String>, LoadError>;
    fn map_end(&mut self) -> Result<(), LoadError>;

    fn list_begin(&mut self) -> Result<(), LoadError>;

    /// Returns `true` if another element follows.
    fn list_next(&mut self) -> Result<bool, LoadError>;
    fn list_end(&mut self) -> Result<(), LoadError>;
}
