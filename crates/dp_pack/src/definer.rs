/// The shape side of the protocol: describes a type without any data.
///
/// Container element shapes are described once, whatever the number of
/// elements a value may hold. Prefix calls ([`optional`](Definer::optional),
/// [`list`](Definer::list), [`map`](Definer::map)) are followed by exactly one
/// nested shape.
pub trait Definer {
    fn value_i32(&mut self);
    fn value_i64(&mut self);
    fn value_u32(&mut self);
    fn value_u64(&mut self);
    fn value_f32(&mut self);
    fn value_f64(&mut self);
    fn value_string(&mut self);
    fn value_bool(&mut self);

    fn enumerate(&mut self, labels: &[&str]);

    fn optional(&mut self);

    /// Opens a variant. Each arm is introduced by [`variant_next`](Definer::variant_next)
    /// and followed by exactly one shape.
    fn variant_begin(&mut self, labels: &[&str]);
    fn variant_next(&mut self, label: &str);
    fn variant_end(&mut self);

    /// An opaque blob.
    fn binary(&mut self);

    /// A blob holding a run of `stride`-sized elements, whose shape follows.
    fn binary_begin(&mut self, stride: usize);
    fn binary_end(&mut self);

    /// Marks a shape made only of fixed-size scalars, `size` bytes in total.
    fn trivial_begin(&mut self, size: usize);
    fn trivial_end(&mut self, size: usize);

    fn object_begin(&mut self);
    fn object_next(&mut self, key: &str);
    fn object_end(&mut self);

    fn tuple_begin(&mut self);
    fn tuple_next(&mut self);
    fn tuple_end(&mut self);

    fn map(&mut self);
    fn list(&mut self);
}
