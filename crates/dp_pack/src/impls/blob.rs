use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Deref, DerefMut};

use crate::format::{BinaryReader, BinaryWriter};
use crate::{Definer, DumpError, LoadError, Pack, Reader, Writer};

// -----------------------------------------------------------------------------
// Bytes

/// An opaque byte blob.
///
/// Unlike `Vec<u8>`, which would be packed as a list of integers, the bytes
/// are transferred in one piece.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Bytes(pub Vec<u8>);

impl Deref for Bytes {
    type Target = Vec<u8>;

    #[inline]
    fn deref(&self) -> &Vec<u8> {
        &self.0
    }
}

impl DerefMut for Bytes {
    #[inline]
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.0
    }
}

impl Pack for Bytes {
    #[inline]
    fn write(&self, writer: &mut dyn Writer) -> Result<(), DumpError> {
        writer.binary(&self.0, 0)
    }

    fn read(&mut self, reader: &mut dyn Reader) -> Result<(), LoadError> {
        let size = reader.binary_size(0)?;
        self.0 = vec![0; size];
        reader.binary_data(&mut self.0)
    }

    #[inline]
    fn define(definer: &mut dyn Definer) {
        definer.binary();
    }
}

// -----------------------------------------------------------------------------
// Packed

/// A run of trivial elements transferred as a single blob.
///
/// Each element is laid out with the binary format, `T::trivial_size()` bytes
/// apiece, so the whole run moves in one [`Writer::binary`] call instead of one
/// call per field.
///
/// # Examples
///
/// ```
/// use dp_pack::{Packed, read_binary, write_binary};
///
/// let points = Packed(vec![(1_i32, 2_i32), (3, 4)]);
/// let bytes = write_binary(&points).unwrap();
/// // size prefix, then 8 bytes per element
/// assert_eq!(bytes.len(), 8 + 16);
/// assert_eq!(read_binary::<Packed<(i32, i32)>>(&bytes).unwrap(), points);
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Packed<T>(pub Vec<T>);

impl<T> Deref for Packed<T> {
    type Target = Vec<T>;

    #[inline]
    fn deref(&self) -> &Vec<T> {
        &self.0
    }
}

impl<T> DerefMut for Packed<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Vec<T> {
        &mut self.0
    }
}

/// Element stride of a packed run, `None` unless `T` is trivial and not empty.
#[inline]
fn stride<T: Pack>() -> Option<usize> {
    T::trivial_size().filter(|&size| size > 0)
}

impl<T: Pack + Default> Pack for Packed<T> {
    fn write(&self, writer: &mut dyn Writer) -> Result<(), DumpError> {
        let stride = stride::<T>().ok_or(DumpError::NotTrivial)?;
        let mut data = Vec::with_capacity(stride * self.0.len());
        let mut element_writer = BinaryWriter::new(&mut data);
        for element in &self.0 {
            element.write(&mut element_writer)?;
        }
        debug_assert_eq!(data.len(), stride * self.0.len());
        writer.binary(&data, stride)
    }

    fn read(&mut self, reader: &mut dyn Reader) -> Result<(), LoadError> {
        let stride = stride::<T>().ok_or(LoadError::NotTrivial)?;
        let size = reader.binary_size(stride)?;
        let mut data = vec![0; size];
        reader.binary_data(&mut data)?;

        self.0 = data
            .chunks_exact(stride)
            .map(|chunk| {
                let mut element = T::default();
                let mut element_reader = BinaryReader::new(chunk);
                element.read(&mut element_reader)?;
                element_reader.finish()?;
                Ok(element)
            })
            .collect::<Result<_, LoadError>>()?;
        Ok(())
    }

    fn define(definer: &mut dyn Definer) {
        match stride::<T>() {
            Some(stride) => {
                definer.binary_begin(stride);
                T::define(definer);
                definer.binary_end();
            }
            None => definer.binary(),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use super::{Bytes, Packed};
    use crate::{DumpError, LoadError, read_binary, write_binary};

    #[test]
    fn bytes_are_length_prefixed() {
        let bytes = write_binary(&Bytes(vec![9, 8])).unwrap();
        assert_eq!(bytes, [2, 0, 0, 0, 0, 0, 0, 0, 9, 8]);
        assert_eq!(read_binary::<Bytes>(&bytes).unwrap(), Bytes(vec![9, 8]));
    }

    #[test]
    fn packed_requires_trivial_elements() {
        let strings = Packed(vec![String::from("a")]);
        assert_eq!(write_binary(&strings).unwrap_err(), DumpError::NotTrivial);
        assert_eq!(
            read_binary::<Packed<String>>(&[0; 8]).unwrap_err(),
            LoadError::NotTrivial
        );
    }

    #[test]
    fn packed_size_must_match_stride() {
        let mut bytes = vec![3, 0, 0, 0, 0, 0, 0, 0];
        bytes.extend_from_slice(&[0, 0, 0]);
        assert_eq!(
            read_binary::<Packed<u32>>(&bytes).unwrap_err(),
            LoadError::InvalidBinarySize { size: 3, stride: 4 }
        );
    }
}
