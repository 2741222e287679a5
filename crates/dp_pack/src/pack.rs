use crate::{Definer, DumpError, LoadError, Reader, Writer};

/// A type that can be written, read and described through the pack protocol.
///
/// The three methods walk the same shape: the calls made on a [`Writer`] by
/// [`write`](Pack::write), on a [`Reader`] by [`read`](Pack::read) and on a
/// [`Definer`] by [`define`](Pack::define) must follow one sequence of
/// structural events, differing only where data is involved.
///
/// Aggregates usually implement it with [`pack_object!`], enums with
/// [`labelled_enum!`] and tagged unions with [`labelled_variant!`].
///
/// # Examples
///
/// ```
/// use dp_pack::{Pack, pack_object, read_binary, write_binary};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Pose {
///     x: f64,
///     y: f64,
/// }
///
/// pack_object!(Pose { x, y });
///
/// let pose = Pose { x: 1.0, y: 2.0 };
/// let bytes = write_binary(&pose).unwrap();
/// assert_eq!(bytes.len(), 16);
/// assert_eq!(Pose::trivial_size(), Some(16));
/// assert_eq!(read_binary::<Pose>(&bytes).unwrap(), pose);
/// ```
///
/// [`pack_object!`]: crate::pack_object
/// [`labelled_enum!`]: crate::labelled_enum
/// [`labelled_variant!`]: crate::labelled_variant
pub trait Pack {
    fn write(&self, writer: &mut dyn Writer) -> Result<(), DumpError>;

    /// Overwrites `self` with the value yielded by `reader`.
    fn read(&mut self, reader: &mut dyn Reader) -> Result<(), LoadError>;

    fn define(definer: &mut dyn Definer)
    where
        Self: Sized;

    /// The encoded size in bytes if every value of this type is made of
    /// fixed-size scalars only.
    ///
    /// Such types may be transferred in bulk, see [`Packed`](crate::Packed).
    #[inline]
    fn trivial_size() -> Option<usize>
    where
        Self: Sized,
    {
        None
    }
}

/// Implements [`Pack`] for a struct from the list of its fields.
///
/// Each field is written as an object entry keyed by the field name. The
/// struct is trivial when all of its fields are.
///
/// ```
/// use dp_pack::{Pack, pack_object};
///
/// #[derive(Default)]
/// struct Item {
///     name: String,
///     count: i32,
/// }
///
/// pack_object!(Item { name, count });
/// assert_eq!(Item::trivial_size(), None);
/// ```
#[macro_export]
macro_rules! pack_object {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::Pack for $ty {
            fn write(
                &self,
                writer: &mut dyn $crate::Writer,
            ) -> ::core::result::Result<(), $crate::DumpError> {
                writer.object_begin()?;
                $(
                    writer.object_next(::core::stringify!($field))?;
                    $crate::Pack::write(&self.$field, writer)?;
                )*
                writer.object_end()
            }

            fn read(
                &mut self,
                reader: &mut dyn $crate::Reader,
            ) -> ::core::result::Result<(), $crate::LoadError> {
                reader.object_begin()?;
                $(
                    reader.object_next(::core::stringify!($field))?;
                    $crate::Pack::read(&mut self.$field, reader)?;
                )*
                reader.object_end()
            }

            fn define(definer: &mut dyn $crate::Definer) {
                let trivial = <Self as $crate::Pack>::trivial_size();
                if let ::core::option::Option::Some(size) = trivial {
                    definer.trivial_begin(size);
                }
                definer.object_begin();
                $(
                    definer.object_next(::core::stringify!($field));
                    $crate::__macro_exports::define_field(|value: &$ty| &value.$field, definer);
                )*
                definer.object_end();
                if let ::core::option::Option::Some(size) = trivial {
                    definer.trivial_end(size);
                }
            }

            fn trivial_size() -> ::core::option::Option<usize> {
                ::core::option::Option::Some(
                    0 $(+ $crate::__macro_exports::field_trivial_size(|value: &$ty| &value.$field)?)*
                )
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use crate::{Pack, read_binary, write_binary};

    #[derive(Debug, Default, PartialEq)]
    struct Pixel {
        r: u32,
        g: u32,
        b: u32,
    }

    #[derive(Debug, Default, PartialEq)]
    struct Named {
        name: String,
        pixels: Vec<Pixel>,
    }

    pack_object!(Pixel { r, g, b });
    pack_object!(Named { name, pixels });

    #[test]
    fn trivial_size_sums_fields() {
        assert_eq!(Pixel::trivial_size(), Some(12));
        assert_eq!(Named::trivial_size(), None);
    }

    #[test]
    fn object_round_trip() {
        let value = Named {
            name: String::from("palette"),
            pixels: alloc::vec![Pixel { r: 1, g: 2, b: 3 }, Pixel { r: 4, g: 5, b: 6 }],
        };
        let bytes = write_binary(&value).unwrap();
        assert_eq!(read_binary::<Named>(&bytes).unwrap(), value);
    }
}
