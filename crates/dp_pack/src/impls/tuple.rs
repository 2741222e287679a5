//! Tuples of up to six elements and fixed-size arrays, both packed as tuples.

use crate::{Definer, DumpError, LoadError, Pack, Reader, Writer};

macro_rules! impl_pack_tuple {
    ($($index:tt: $name:ident),*) => {
        impl<$($name: Pack),*> Pack for ($($name,)*) {
            fn write(&self, writer: &mut dyn Writer) -> Result<(), DumpError> {
                writer.tuple_begin()?;
                $(
                    writer.tuple_next()?;
                    self.$index.write(writer)?;
                )*
                writer.tuple_end()
            }

            fn read(&mut self, reader: &mut dyn Reader) -> Result<(), LoadError> {
                reader.tuple_begin()?;
                $(
                    reader.tuple_next()?;
                    self.$index.read(reader)?;
                )*
                reader.tuple_end()
            }

            fn define(definer: &mut dyn Definer) {
                let trivial = Self::trivial_size();
                if let Some(size) = trivial {
                    definer.trivial_begin(size);
                }
                definer.tuple_begin();
                $(
                    definer.tuple_next();
                    $name::define(definer);
                )*
                definer.tuple_end();
                if let Some(size) = trivial {
                    definer.trivial_end(size);
                }
            }

            #[inline]
            fn trivial_size() -> Option<usize> {
                Some(0 $(+ $name::trivial_size()?)*)
            }
        }
    };
}

impl_pack_tuple!(0: P0);
impl_pack_tuple!(0: P0, 1: P1);
impl_pack_tuple!(0: P0, 1: P1, 2: P2);
impl_pack_tuple!(0: P0, 1: P1, 2: P2, 3: P3);
impl_pack_tuple!(0: P0, 1: P1, 2: P2, 3: P3, 4: P4);
impl_pack_tuple!(0: P0, 1: P1, 2: P2, 3: P3, 4: P4, 5: P5);

impl<T: Pack, const N: usize> Pack for [T; N] {
    fn write(&self, writer: &mut dyn Writer) -> Result<(), DumpError> {
        writer.tuple_begin()?;
        for element in self {
            writer.tuple_next()?;
            element.write(writer)?;
        }
        writer.tuple_end()
    }

    fn read(&mut self, reader: &mut dyn Reader) -> Result<(), LoadError> {
        reader.tuple_begin()?;
        for element in self {
            reader.tuple_next()?;
            element.read(reader)?;
        }
        reader.tuple_end()
    }

    fn define(definer: &mut dyn Definer) {
        let trivial = Self::trivial_size();
        if let Some(size) = trivial {
            definer.trivial_begin(size);
        }
        definer.tuple_begin();
        for _ in 0..N {
            definer.tuple_next();
            T::define(definer);
        }
        definer.tuple_end();
        if let Some(size) = trivial {
            definer.trivial_end(size);
        }
    }

    #[inline]
    fn trivial_size() -> Option<usize> {
        T::trivial_size()?.checked_mul(N)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use crate::{Pack, read_binary, write_binary};

    #[test]
    fn tuple_sizes() {
        assert_eq!(<(i32, f64)>::trivial_size(), Some(12));
        assert_eq!(<(i32, String)>::trivial_size(), None);
        assert_eq!(<[u32; 3]>::trivial_size(), Some(12));
        assert_eq!(<[(bool, u64); 2]>::trivial_size(), Some(18));
    }

    #[test]
    fn tuple_round_trip() {
        let value = (1_i32, String::from("x"), [2.0_f32, 3.0], (true,));
        let bytes = write_binary(&value).unwrap();
        let read = read_binary::<(i32, String, [f32; 2], (bool,))>(&bytes).unwrap();
        assert_eq!(read, value);
    }
}
