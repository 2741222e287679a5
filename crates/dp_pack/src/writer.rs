use crate::DumpError;

/// The output side of the protocol: receives the data of a value in walk order.
///
/// Begin/end calls must balance exactly. Inside an object every field is
/// introduced by [`object_next`](Writer::object_next), inside a tuple every
/// element by [`tuple_next`](Writer::tuple_next), and so on for lists and maps.
///
/// Implemented by [`BinaryWriter`] and [`ObjectWriter`].
///
/// [`BinaryWriter`]: crate::format::BinaryWriter
/// [`ObjectWriter`]: crate::format::ObjectWriter
pub trait Writer {
    fn value_i32(&mut self, value: i32) -> Result<(), DumpError>;
    fn value_i64(&mut self, value: i64) -> Result<(), DumpError>;
    fn value_u32(&mut self, value: u32) -> Result<(), DumpError>;
    fn value_u64(&mut self, value: u64) -> Result<(), DumpError>;
    fn value_f32(&mut self, value: f32) -> Result<(), DumpError>;
    fn value_f64(&mut self, value: f64) -> Result<(), DumpError>;
    fn value_string(&mut self, value: &str) -> Result<(), DumpError>;
    fn value_bool(&mut self, value: bool) -> Result<(), DumpError>;

    /// Writes the discriminant `index` of a labelled enum with the given label table.
    fn enumerate(&mut self, index: usize, labels: &[&str]) -> Result<(), DumpError>;

    /// Announces whether an optional holds a value. If it does, the value follows.
    fn optional(&mut self, has_value: bool) -> Result<(), DumpError>;

    /// Opens a variant on its active arm `label`; the arm's value follows.
    fn variant_begin(&mut self, label: &str, labels: &[&str]) -> Result<(), DumpError>;
    fn variant_end(&mut self) -> Result<(), DumpError>;

    /// Writes an opaque blob.
    ///
    /// A non-zero `stride` marks a run of fixed-size elements of `stride` bytes each.
    fn binary(&mut self, data: &[u8], stride: usize) -> Result<(), DumpError>;

    fn object_begin(&mut self) -> Result<(), DumpError>;
    fn object_next(&mut self, key: &str) -> Result<(), DumpError>;
    fn object_end(&mut self) -> Result<(), DumpError>;

    fn tuple_begin(&mut self) -> Result<(), DumpError>;
    fn tuple_next(&mut self) -> Result<(), DumpError>;
    fn tuple_end(&mut self) -> Result<(), DumpError>;

    fn map_begin(&mut self) -> Result<(), DumpError>;
    fn map_next(&mut self, key: &str) -> Result<(), DumpError>;
    fn map_end(&mut self) -> Result<(), DumpError>;

    fn list_begin(&mut self) -> Result<(), DumpError>;
    fn list_next(&mut self) -> Result<(), DumpError>;
    fn list_end(&mut self) -> Result<(), DumpError>;
}
