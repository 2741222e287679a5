use alloc::string::String;
use core::mem::size_of;

use crate::{Definer, DumpError, LoadError, Pack, Reader, Writer};

macro_rules! impl_pack_scalar {
    ($ty:ty, $method:ident) => {
        impl Pack for $ty {
            #[inline]
            fn write(&self, writer: &mut dyn Writer) -> Result<(), DumpError> {
                writer.$method(*self)
            }

            #[inline]
            fn read(&mut self, reader: &mut dyn Reader) -> Result<(), LoadError> {
                *self = reader.$method()?;
                Ok(())
            }

            #[inline]
            fn define(definer: &mut dyn Definer) {
                definer.$method();
            }

            #[inline]
            fn trivial_size() -> Option<usize> {
                Some(size_of::<$ty>())
            }
        }
    };
}

impl_pack_scalar!(i32, value_i32);
impl_pack_scalar!(i64, value_i64);
impl_pack_scalar!(u32, value_u32);
impl_pack_scalar!(u64, value_u64);
impl_pack_scalar!(f32, value_f32);
impl_pack_scalar!(f64, value_f64);
impl_pack_scalar!(bool, value_bool);

impl Pack for String {
    #[inline]
    fn write(&self, writer: &mut dyn Writer) -> Result<(), DumpError> {
        writer.value_string(self)
    }

    #[inline]
    fn read(&mut self, reader: &mut dyn Reader) -> Result<(), LoadError> {
        *self = reader.value_string()?;
        Ok(())
    }

    #[inline]
    fn define(definer: &mut dyn Definer) {
        definer.value_string();
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use crate::{Pack, read_binary, write_binary};

    #[test]
    fn scalar_sizes() {
        assert_eq!(i32::trivial_size(), Some(4));
        assert_eq!(u64::trivial_size(), Some(8));
        assert_eq!(f32::trivial_size(), Some(4));
        assert_eq!(bool::trivial_size(), Some(1));
        assert_eq!(String::trivial_size(), None);
    }

    #[test]
    fn scalars_are_little_endian() {
        assert_eq!(write_binary(&0x0102_0304_i32).unwrap(), [4, 3, 2, 1]);
        assert_eq!(write_binary(&true).unwrap(), [1]);
        assert_eq!(read_binary::<u32>(&[1, 0, 0, 0]).unwrap(), 1);
        assert_eq!(read_binary::<f64>(&2.5_f64.to_le_bytes()).unwrap(), 2.5);
    }

    #[test]
    fn string_round_trip() {
        let bytes = write_binary(&String::from("hello")).unwrap();
        assert_eq!(bytes.len(), 8 + 5);
        assert_eq!(read_binary::<String>(&bytes).unwrap(), "hello");
    }
}
