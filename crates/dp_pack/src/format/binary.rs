//! Compact little-endian binary format.
//!
//! - Scalars are stored in their little-endian byte representation, `bool` as one byte.
//! - Strings and blobs carry a `u64` byte length before their bytes.
//! - Enums are stored as the `u32` position of their label.
//! - Optionals and the elements of lists and maps are preceded by a flag byte,
//!   `1` for a value, `0` for none or for the end of the container. Map
//!   elements carry their key after the flag.
//! - Variants store the label of the active arm before its value.
//! - Objects and tuples add no bytes: their fields follow each other in order.

use alloc::string::String;
use alloc::vec::Vec;

use crate::{DumpError, LoadError, Pack, Reader, Writer};

// -----------------------------------------------------------------------------
// BinaryWriter

/// Appends the binary form of values to a byte buffer.
pub struct BinaryWriter<'a> {
    buffer: &'a mut Vec<u8>,
}

impl<'a> BinaryWriter<'a> {
    #[inline]
    pub fn new(buffer: &'a mut Vec<u8>) -> Self {
        Self { buffer }
    }

    #[inline]
    fn bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    #[inline]
    fn flag(&mut self, flag: bool) {
        self.buffer.push(u8::from(flag));
    }

    fn size(&mut self, size: usize) -> Result<(), DumpError> {
        let size = u64::try_from(size).map_err(|_| DumpError::OutOfRange("u64"))?;
        self.bytes(&size.to_le_bytes());
        Ok(())
    }
}

impl Writer for BinaryWriter<'_> {
    fn value_i32(&mut self, value: i32) -> Result<(), DumpError> {
        self.bytes(&value.to_le_bytes());
        Ok(())
    }

    fn value_i64(&mut self, value: i64) -> Result<(), DumpError> {
        self.bytes(&value.to_le_bytes());
        Ok(())
    }

    fn value_u32(&mut self, value: u32) -> Result<(), DumpError> {
        self.bytes(&value.to_le_bytes());
        Ok(())
    }

    fn value_u64(&mut self, value: u64) -> Result<(), DumpError> {
        self.bytes(&value.to_le_bytes());
        Ok(())
    }

    fn value_f32(&mut self, value: f32) -> Result<(), DumpError> {
        self.bytes(&value.to_le_bytes());
        Ok(())
    }

    fn value_f64(&mut self, value: f64) -> Result<(), DumpError> {
        self.bytes(&value.to_le_bytes());
        Ok(())
    }

    fn value_string(&mut self, value: &str) -> Result<(), DumpError> {
        self.size(value.len())?;
        self.bytes(value.as_bytes());
        Ok(())
    }

    fn value_bool(&mut self, value: bool) -> Result<(), DumpError> {
        self.flag(value);
        Ok(())
    }

    fn enumerate(&mut self, index: usize, labels: &[&str]) -> Result<(), DumpError> {
        let invalid = DumpError::InvalidIndex {
            index,
            len: labels.len(),
        };
        if index >= labels.len() {
            return Err(invalid);
        }
        let index = u32::try_from(index).map_err(|_| invalid)?;
        self.value_u32(index)
    }

    fn optional(&mut self, has_value: bool) -> Result<(), DumpError> {
        self.flag(has_value);
        Ok(())
    }

    fn variant_begin(&mut self, label: &str, _labels: &[&str]) -> Result<(), DumpError> {
        self.value_string(label)
    }

    fn variant_end(&mut self) -> Result<(), DumpError> {
        Ok(())
    }

    fn binary(&mut self, data: &[u8], stride: usize) -> Result<(), DumpError> {
        debug_assert!(stride == 0 || data.len() % stride == 0);
        self.size(data.len())?;
        self.bytes(data);
        Ok(())
    }

    fn object_begin(&mut self) -> Result<(), DumpError> {
        Ok(())
    }

    fn object_next(&mut self, _key: &str) -> Result<(), DumpError> {
        Ok(())
    }

    fn object_end(&mut self) -> Result<(), DumpError> {
        Ok(())
    }

    fn tuple_begin(&mut self) -> Result<(), DumpError> {
        Ok(())
    }

    fn tuple_next(&mut self) -> Result<(), DumpError> {
        Ok(())
    }

    fn tuple_end(&mut self) -> Result<(), DumpError> {
        Ok(())
    }

    fn map_begin(&mut self) -> Result<(), DumpError> {
        Ok(())
    }

    fn map_next(&mut self, key: &str) -> Result<(), DumpError> {
        self.flag(true);
        self.value_string(key)
    }

    fn map_end(&mut self) -> Result<(), DumpError> {
        self.flag(false);
        Ok(())
    }

    fn list_begin(&mut self) -> Result<(), DumpError> {
        Ok(())
    }

    fn list_next(&mut self) -> Result<(), DumpError> {
        self.flag(true);
        Ok(())
    }

    fn list_end(&mut self) -> Result<(), DumpError> {
        self.flag(false);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// BinaryReader

/// Reads values back from their binary form.
pub struct BinaryReader<'a> {
    data: &'a [u8],
    pos: usize,
    /// Labels of the variants being read, innermost last.
    labels: Vec<String>,
}

impl<'a> BinaryReader<'a> {
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            labels: Vec::new(),
        }
    }

    /// Number of bytes not consumed yet.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Checks that the whole input has been consumed.
    ///
    /// # Errors
    ///
    /// Fails with [`LoadError::TrailingBytes`] otherwise.
    pub fn finish(&self) -> Result<(), LoadError> {
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(LoadError::TrailingBytes(remaining)),
        }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], LoadError> {
        if self.remaining() < len {
            return Err(LoadError::UnexpectedEnd);
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], LoadError> {
        let mut array = [0; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }

    fn flag(&mut self) -> Result<bool, LoadError> {
        match self.array::<1>()? {
            [0] => Ok(false),
            [1] => Ok(true),
            _ => Err(LoadError::OutOfRange("bool")),
        }
    }

    fn size(&mut self) -> Result<usize, LoadError> {
        let size = u64::from_le_bytes(self.array()?);
        usize::try_from(size).map_err(|_| LoadError::OutOfRange("usize"))
    }
}

impl Reader for BinaryReader<'_> {
    fn value_i32(&mut self) -> Result<i32, LoadError> {
        Ok(i32::from_le_bytes(self.array()?))
    }

    fn value_i64(&mut self) -> Result<i64, LoadError> {
        Ok(i64::from_le_bytes(self.array()?))
    }

    fn value_u32(&mut self) -> Result<u32, LoadError> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    fn value_u64(&mut self) -> Result<u64, LoadError> {
        Ok(u64::from_le_bytes(self.array()?))
    }

    fn value_f32(&mut self) -> Result<f32, LoadError> {
        Ok(f32::from_le_bytes(self.array()?))
    }

    fn value_f64(&mut self) -> Result<f64, LoadError> {
        Ok(f64::from_le_bytes(self.array()?))
    }

    fn value_string(&mut self) -> Result<String, LoadError> {
        let len = self.size()?;
        let bytes = self.take(len)?;
        let text = core::str::from_utf8(bytes).map_err(|_| LoadError::InvalidUtf8)?;
        Ok(String::from(text))
    }

    fn value_bool(&mut self) -> Result<bool, LoadError> {
        self.flag()
    }

    fn enumerate(&mut self, labels: &[&str]) -> Result<usize, LoadError> {
        let index = self.value_u32()?;
        usize::try_from(index)
            .ok()
            .filter(|&index| index < labels.len())
            .ok_or(LoadError::OutOfRange("enumerate"))
    }

    fn optional(&mut self) -> Result<bool, LoadError> {
        self.flag()
    }

    fn variant_begin(&mut self, _labels: &[&str]) -> Result<(), LoadError> {
        let label = self.value_string()?;
        self.labels.push(label);
        Ok(())
    }

    fn variant_match(&mut self, label: &str) -> Result<bool, LoadError> {
        let current = self
            .labels
            .last()
            .ok_or(LoadError::Unbalanced("variant_match"))?;
        Ok(current == label)
    }

    fn variant_end(&mut self) -> Result<(), LoadError> {
        self.labels
            .pop()
            .map(|_| ())
            .ok_or(LoadError::Unbalanced("variant_end"))
    }

    fn binary_size(&mut self, stride: usize) -> Result<usize, LoadError> {
        let size = self.size()?;
        if size > self.remaining() {
            return Err(LoadError::UnexpectedEnd);
        }
        if stride != 0 && size % stride != 0 {
            return Err(LoadError::InvalidBinarySize { size, stride });
        }
        Ok(size)
    }

    fn binary_data(&mut self, data: &mut [u8]) -> Result<(), LoadError> {
        data.copy_from_slice(self.take(data.len())?);
        Ok(())
    }

    fn object_begin(&mut self) -> Result<(), LoadError> {
        Ok(())
    }

    fn object_next(&mut self, _key: &str) -> Result<(), LoadError> {
        Ok(())
    }

    fn object_end(&mut self) -> Result<(), LoadError> {
        Ok(())
    }

    fn tuple_begin(&mut self) -> Result<(), LoadError> {
        Ok(())
    }

    fn tuple_next(&mut self) -> Result<(), LoadError> {
        Ok(())
    }

    fn tuple_end(&mut self) -> Result<(), LoadError> {
        Ok(())
    }

    fn map_begin(&mut self) -> Result<(), LoadError> {
        Ok(())
    }

    fn map_next(&mut self) -> Result<Option<String>, LoadError> {
        if self.flag()? {
            self.value_string().map(Some)
        } else {
            Ok(None)
        }
    }

    fn map_end(&mut self) -> Result<(), LoadError> {
        Ok(())
    }

    fn list_begin(&mut self) -> Result<(), LoadError> {
        Ok(())
    }

    fn list_next(&mut self) -> Result<bool, LoadError> {
        self.flag()
    }

    fn list_end(&mut self) -> Result<(), LoadError> {
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Helpers

/// Writes `value` in the binary format.
pub fn write_binary<T: Pack + ?Sized>(value: &T) -> Result<Vec<u8>, DumpError> {
    let mut buffer = Vec::new();
    value.write(&mut BinaryWriter::new(&mut buffer))?;
    Ok(buffer)
}

/// Reads a `T` from its binary form.
///
/// # Errors
///
/// Besides the errors of [`Pack::read`], fails with
/// [`LoadError::TrailingBytes`] if `data` holds more than one value.
pub fn read_binary<T: Pack + Default>(data: &[u8]) -> Result<T, LoadError> {
    let mut value = T::default();
    let mut reader = BinaryReader::new(data);
    value.read(&mut reader)?;
    reader.finish()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use super::{BinaryReader, BinaryWriter};
    use crate::{Bytes, DumpError, LoadError, Packed, Reader, Writer, read_binary};

    #[test]
    fn truncated_input() {
        assert_eq!(read_binary::<i64>(&[1, 2, 3]), Err(LoadError::UnexpectedEnd));
        assert_eq!(
            read_binary::<String>(&[9, 0, 0, 0, 0, 0, 0, 0, b'a']),
            Err(LoadError::UnexpectedEnd)
        );
    }

    #[test]
    fn oversized_blob_length() {
        let mut data = (1_u64 << 62).to_le_bytes().to_vec();
        data.push(0);
        assert_eq!(read_binary::<Bytes>(&data), Err(LoadError::UnexpectedEnd));
        assert_eq!(
            read_binary::<Packed<u32>>(&data),
            Err(LoadError::UnexpectedEnd)
        );

        let mut reader = BinaryReader::new(&data);
        assert_eq!(reader.binary_size(0), Err(LoadError::UnexpectedEnd));
    }

    #[test]
    fn trailing_bytes() {
        assert_eq!(read_binary::<bool>(&[1, 0]), Err(LoadError::TrailingBytes(1)));
    }

    #[test]
    fn invalid_flags_and_text() {
        assert_eq!(read_binary::<bool>(&[2]), Err(LoadError::OutOfRange("bool")));
        assert_eq!(
            read_binary::<String>(&[1, 0, 0, 0, 0, 0, 0, 0, 0xff]),
            Err(LoadError::InvalidUtf8)
        );
    }

    #[test]
    fn variant_labels_nest() {
        let mut buffer = vec![];
        let mut writer = BinaryWriter::new(&mut buffer);
        writer.variant_begin("outer", &["outer"]).unwrap();
        writer.variant_begin("inner", &["inner"]).unwrap();
        writer.variant_end().unwrap();
        writer.variant_end().unwrap();

        let mut reader = BinaryReader::new(&buffer);
        reader.variant_begin(&[]).unwrap();
        reader.variant_begin(&[]).unwrap();
        assert!(reader.variant_match("inner").unwrap());
        reader.variant_end().unwrap();
        assert!(!reader.variant_match("inner").unwrap());
        assert!(reader.variant_match("outer").unwrap());
        reader.variant_end().unwrap();
        assert_eq!(reader.variant_end(), Err(LoadError::Unbalanced("variant_end")));
        reader.finish().unwrap();
    }

    #[test]
    fn enum_index_is_checked() {
        let mut buffer = vec![];
        let mut writer = BinaryWriter::new(&mut buffer);
        assert_eq!(
            writer.enumerate(2, &["a", "b"]),
            Err(DumpError::InvalidIndex { index: 2, len: 2 })
        );

        let mut reader = BinaryReader::new(&[5, 0, 0, 0]);
        assert_eq!(
            reader.enumerate(&["a", "b"]),
            Err(LoadError::OutOfRange("enumerate"))
        );
    }
}
