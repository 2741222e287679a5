//! Conversion between packable values and value trees.
//!
//! | shape          | tree                               |
//! |----------------|------------------------------------|
//! | object, map    | map node                           |
//! | tuple, list    | list node                          |
//! | optional none  | null                               |
//! | enum           | label string                       |
//! | variant        | map `{ "type": label, "value": … }` |
//! | binary         | blob                               |
//!
//! Integers are stored as `i64` and floats as `f64`.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::mem;

use dp_object::{ConstObject, Object, Value, ValueKind};

use crate::{DumpError, LoadError, Pack, Reader, Writer};

const VARIANT_TYPE: &str = "type";
const VARIANT_VALUE: &str = "value";

// -----------------------------------------------------------------------------
// ObjectWriter

/// Where the next value goes.
enum Slot {
    Root,
    Key(String),
    Append,
    Taken,
}

/// Builds a value tree from the writer calls.
pub struct ObjectWriter {
    root: Object,
    /// Open containers, innermost last.
    stack: Vec<Object>,
    slot: Slot,
}

impl ObjectWriter {
    /// Creates a writer that replaces `root` with the written value.
    #[inline]
    pub fn new(root: Object) -> Self {
        Self {
            root,
            stack: Vec::new(),
            slot: Slot::Root,
        }
    }

    /// Checks that every container has been closed.
    pub fn finish(&self) -> Result<(), DumpError> {
        if self.stack.is_empty() {
            Ok(())
        } else {
            Err(DumpError::Unbalanced("finish"))
        }
    }

    /// Places a new node in the current slot.
    fn emplace(&mut self, value: Value) -> Result<Object, DumpError> {
        let slot = mem::replace(&mut self.slot, Slot::Taken);
        let node = match (slot, self.stack.last()) {
            (Slot::Root, _) => {
                self.root.set(value)?;
                self.root.clone()
            }
            (Slot::Key(key), Some(parent)) => parent.insert(&key, value)?,
            (Slot::Append, Some(parent)) => parent.append(value)?,
            _ => return Err(DumpError::Unbalanced("value")),
        };
        Ok(node)
    }

    #[inline]
    fn leaf(&mut self, value: Value) -> Result<(), DumpError> {
        self.emplace(value).map(|_| ())
    }

    fn open(&mut self, value: Value) -> Result<(), DumpError> {
        let node = self.emplace(value)?;
        self.stack.push(node);
        Ok(())
    }

    fn close(&mut self, call: &'static str) -> Result<(), DumpError> {
        self.stack.pop().ok_or(DumpError::Unbalanced(call))?;
        self.slot = Slot::Taken;
        Ok(())
    }
}

impl Writer for ObjectWriter {
    fn value_i32(&mut self, value: i32) -> Result<(), DumpError> {
        self.leaf(Value::Int(value.into()))
    }

    fn value_i64(&mut self, value: i64) -> Result<(), DumpError> {
        self.leaf(Value::Int(value))
    }

    fn value_u32(&mut self, value: u32) -> Result<(), DumpError> {
        self.leaf(Value::Int(value.into()))
    }

    fn value_u64(&mut self, value: u64) -> Result<(), DumpError> {
        let value = i64::try_from(value).map_err(|_| DumpError::OutOfRange("i64"))?;
        self.leaf(Value::Int(value))
    }

    fn value_f32(&mut self, value: f32) -> Result<(), DumpError> {
        self.leaf(Value::Float(value.into()))
    }

    fn value_f64(&mut self, value: f64) -> Result<(), DumpError> {
        self.leaf(Value::Float(value))
    }

    fn value_string(&mut self, value: &str) -> Result<(), DumpError> {
        self.leaf(Value::Str(String::from(value)))
    }

    fn value_bool(&mut self, value: bool) -> Result<(), DumpError> {
        self.leaf(Value::Bool(value))
    }

    fn enumerate(&mut self, index: usize, labels: &[&str]) -> Result<(), DumpError> {
        let label = labels.get(index).ok_or(DumpError::InvalidIndex {
            index,
            len: labels.len(),
        })?;
        self.value_string(label)
    }

    fn optional(&mut self, has_value: bool) -> Result<(), DumpError> {
        if has_value {
            Ok(())
        } else {
            self.leaf(Value::Null)
        }
    }

    fn variant_begin(&mut self, label: &str, _labels: &[&str]) -> Result<(), DumpError> {
        self.open(Value::Map)?;
        if let Some(node) = self.stack.last() {
            node.insert(VARIANT_TYPE, label)?;
        }
        self.slot = Slot::Key(String::from(VARIANT_VALUE));
        Ok(())
    }

    fn variant_end(&mut self) -> Result<(), DumpError> {
        self.close("variant_end")
    }

    fn binary(&mut self, data: &[u8], _stride: usize) -> Result<(), DumpError> {
        self.leaf(Value::Binary(Vec::from(data)))
    }

    fn object_begin(&mut self) -> Result<(), DumpError> {
        self.open(Value::Map)
    }

    fn object_next(&mut self, key: &str) -> Result<(), DumpError> {
        self.slot = Slot::Key(String::from(key));
        Ok(())
    }

    fn object_end(&mut self) -> Result<(), DumpError> {
        self.close("object_end")
    }

    fn tuple_begin(&mut self) -> Result<(), DumpError> {
        self.open(Value::List)
    }

    fn tuple_next(&mut self) -> Result<(), DumpError> {
        self.slot = Slot::Append;
        Ok(())
    }

    fn tuple_end(&mut self) -> Result<(), DumpError> {
        self.close("tuple_end")
    }

    fn map_begin(&mut self) -> Result<(), DumpError> {
        self.open(Value::Map)
    }

    fn map_next(&mut self, key: &str) -> Result<(), DumpError> {
        self.slot = Slot::Key(String::from(key));
        Ok(())
    }

    fn map_end(&mut self) -> Result<(), DumpError> {
        self.close("map_end")
    }

    fn list_begin(&mut self) -> Result<(), DumpError> {
        self.open(Value::List)
    }

    fn list_next(&mut self) -> Result<(), DumpError> {
        self.slot = Slot::Append;
        Ok(())
    }

    fn list_end(&mut self) -> Result<(), DumpError> {
        self.close("list_end")
    }
}

// -----------------------------------------------------------------------------
// ObjectReader

/// An open container of the tree being read.
struct Frame {
    node: ConstObject,
    /// Next child to visit, for tuples, lists and maps.
    cursor: ConstObject,
    position: usize,
    /// Active label, for variants.
    label: Option<String>,
}

/// Reads values from a value tree.
///
/// Absent entries and nulls both read as an empty optional.
pub struct ObjectReader {
    current: ConstObject,
    /// Key or position of `current`, for error messages.
    name: String,
    stack: Vec<Frame>,
}

impl ObjectReader {
    #[inline]
    pub fn new(root: ConstObject) -> Self {
        Self {
            current: root,
            name: String::new(),
            stack: Vec::new(),
        }
    }

    fn value(&self) -> Result<Value, LoadError> {
        if self.current.is_valid() {
            Ok(self.current.value())
        } else {
            Err(LoadError::MissingKey(self.name.clone()))
        }
    }

    fn expect(&self, expected: ValueKind) -> Result<ConstObject, LoadError> {
        let found = self.value()?.kind();
        if found == expected {
            Ok(self.current.clone())
        } else {
            Err(LoadError::WrongType { expected, found })
        }
    }

    fn open(&mut self, expected: ValueKind) -> Result<(), LoadError> {
        let node = self.expect(expected)?;
        self.stack.push(Frame {
            cursor: node.child(),
            node,
            position: 0,
            label: None,
        });
        Ok(())
    }

    fn close(&mut self, call: &'static str) -> Result<(), LoadError> {
        let frame = self.stack.pop().ok_or(LoadError::Unbalanced(call))?;
        self.current = frame.node;
        Ok(())
    }

    fn frame(&mut self, call: &'static str) -> Result<&mut Frame, LoadError> {
        self.stack.last_mut().ok_or(LoadError::Unbalanced(call))
    }

    /// Moves to the next child of the innermost container, returning `false`
    /// when there is none.
    fn advance(&mut self, call: &'static str) -> Result<bool, LoadError> {
        let frame = self.frame(call)?;
        let next = frame.cursor.next();
        let current = mem::replace(&mut frame.cursor, next);
        let position = frame.position;
        frame.position += 1;

        let valid = current.is_valid();
        self.current = current;
        self.name = position.to_string();
        Ok(valid)
    }

    fn integer<T: TryFrom<i64>>(&self, name: &'static str) -> Result<T, LoadError> {
        match self.value()? {
            Value::Int(value) => T::try_from(value).map_err(|_| LoadError::OutOfRange(name)),
            other => Err(LoadError::WrongType {
                expected: ValueKind::Int,
                found: other.kind(),
            }),
        }
    }

    fn float(&self) -> Result<f64, LoadError> {
        match self.value()? {
            Value::Float(value) => Ok(value),
            Value::Int(value) => Ok(value as f64),
            other => Err(LoadError::WrongType {
                expected: ValueKind::Float,
                found: other.kind(),
            }),
        }
    }
}

impl Reader for ObjectReader {
    fn value_i32(&mut self) -> Result<i32, LoadError> {
        self.integer("i32")
    }

    fn value_i64(&mut self) -> Result<i64, LoadError> {
        self.integer("i64")
    }

    fn value_u32(&mut self) -> Result<u32, LoadError> {
        self.integer("u32")
    }

    fn value_u64(&mut self) -> Result<u64, LoadError> {
        self.integer("u64")
    }

    fn value_f32(&mut self) -> Result<f32, LoadError> {
        Ok(self.float()? as f32)
    }

    fn value_f64(&mut self) -> Result<f64, LoadError> {
        self.float()
    }

    fn value_string(&mut self) -> Result<String, LoadError> {
        match self.value()? {
            Value::Str(value) => Ok(value),
            other => Err(LoadError::WrongType {
                expected: ValueKind::Str,
                found: other.kind(),
            }),
        }
    }

    fn value_bool(&mut self) -> Result<bool, LoadError> {
        match self.value()? {
            Value::Bool(value) => Ok(value),
            other => Err(LoadError::WrongType {
                expected: ValueKind::Bool,
                found: other.kind(),
            }),
        }
    }

    fn enumerate(&mut self, labels: &[&str]) -> Result<usize, LoadError> {
        let label = self.value_string()?;
        labels
            .iter()
            .position(|candidate| *candidate == label)
            .ok_or(LoadError::InvalidLabel(label))
    }

    fn optional(&mut self) -> Result<bool, LoadError> {
        Ok(!self.current.value().is_null())
    }

    fn variant_begin(&mut self, _labels: &[&str]) -> Result<(), LoadError> {
        self.open(ValueKind::Map)?;
        let node = self.current.clone();
        let label = match node.at(VARIANT_TYPE).value() {
            Value::Str(label) => label,
            other => {
                return Err(LoadError::WrongType {
                    expected: ValueKind::Str,
                    found: other.kind(),
                });
            }
        };
        self.frame("variant_begin")?.label = Some(label);
        self.current = node.at(VARIANT_VALUE);
        self.name = String::from(VARIANT_VALUE);
        Ok(())
    }

    fn variant_match(&mut self, label: &str) -> Result<bool, LoadError> {
        let frame = self.frame("variant_match")?;
        Ok(frame.label.as_deref() == Some(label))
    }

    fn variant_end(&mut self) -> Result<(), LoadError> {
        self.close("variant_end")
    }

    fn binary_size(&mut self, stride: usize) -> Result<usize, LoadError> {
        let size = match self.value()? {
            Value::Binary(data) => data.len(),
            other => {
                return Err(LoadError::WrongType {
                    expected: ValueKind::Binary,
                    found: other.kind(),
                });
            }
        };
        if stride != 0 && size % stride != 0 {
            return Err(LoadError::InvalidBinarySize { size, stride });
        }
        Ok(size)
    }

    fn binary_data(&mut self, data: &mut [u8]) -> Result<(), LoadError> {
        let blob = self
            .current
            .get::<Vec<u8>>()
            .map_err(|_| LoadError::UnexpectedEnd)?;
        if blob.len() != data.len() {
            return Err(LoadError::UnexpectedEnd);
        }
        data.copy_from_slice(&blob);
        Ok(())
    }

    fn object_begin(&mut self) -> Result<(), LoadError> {
        self.open(ValueKind::Map)
    }

    fn object_next(&mut self, key: &str) -> Result<(), LoadError> {
        let frame = self.frame("object_next")?;
        let child = frame.node.at(key);
        self.current = child;
        self.name = String::from(key);
        Ok(())
    }

    fn object_end(&mut self) -> Result<(), LoadError> {
        self.close("object_end")
    }

    fn tuple_begin(&mut self) -> Result<(), LoadError> {
        self.open(ValueKind::List)
    }

    fn tuple_next(&mut self) -> Result<(), LoadError> {
        self.advance("tuple_next").map(|_| ())
    }

    fn tuple_end(&mut self) -> Result<(), LoadError> {
        self.close("tuple_end")
    }

    fn map_begin(&mut self) -> Result<(), LoadError> {
        self.open(ValueKind::Map)
    }

    fn map_next(&mut self) -> Result<Option<String>, LoadError> {
        if !self.advance("map_next")? {
            return Ok(None);
        }
        let key = self.current.key().unwrap_or_default();
        self.name.clone_from(&key);
        Ok(Some(key))
    }

    fn map_end(&mut self) -> Result<(), LoadError> {
        self.close("map_end")
    }

    fn list_begin(&mut self) -> Result<(), LoadError> {
        self.open(ValueKind::List)
    }

    fn list_next(&mut self) -> Result<bool, LoadError> {
        self.advance("list_next")
    }

    fn list_end(&mut self) -> Result<(), LoadError> {
        self.close("list_end")
    }
}

// -----------------------------------------------------------------------------
// Helpers

/// Builds the value tree of `value`.
///
/// # Examples
///
/// ```
/// use dp_object::Value;
/// use dp_pack::write_object;
///
/// let tree = write_object(&(1_i32, Some(String::from("a")), None::<bool>)).unwrap();
/// assert_eq!(tree.size(), 3);
/// assert_eq!(tree.at(0).value(), Value::Int(1));
/// assert_eq!(tree.at(2).value(), Value::Null);
/// ```
pub fn write_object<T: Pack + ?Sized>(value: &T) -> Result<Object, DumpError> {
    let root = Object::default();
    let mut writer = ObjectWriter::new(root.clone());
    value.write(&mut writer)?;
    writer.finish()?;
    Ok(root)
}

/// Reads a `T` from a value tree.
pub fn read_object<T: Pack + Default>(tree: &ConstObject) -> Result<T, LoadError> {
    let mut value = T::default();
    value.read(&mut ObjectReader::new(tree.clone()))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use dp_object::{Object, Value, ValueKind};

    use super::ObjectWriter;
    use crate::{Bytes, DumpError, LoadError, Writer, pack_object, read_object, write_object};

    #[derive(Debug, Default, PartialEq)]
    struct Item {
        name: String,
        count: u32,
        tags: Vec<String>,
        extra: Option<f64>,
    }

    pack_object!(Item {
        name,
        count,
        tags,
        extra,
    });

    #[test]
    fn object_becomes_a_map() {
        let item = Item {
            name: String::from("apple"),
            count: 3,
            tags: vec![String::from("fruit")],
            extra: None,
        };
        let tree = write_object(&item).unwrap();
        assert_eq!(tree.value(), Value::Map);
        assert_eq!(tree.at("count").value(), Value::Int(3));
        assert_eq!(tree.at("tags").at(0).value(), Value::Str(String::from("fruit")));
        assert_eq!(tree.at("extra").value(), Value::Null);
        assert_eq!(read_object::<Item>(&tree).unwrap(), item);
    }

    #[test]
    fn absent_optional_reads_as_none() {
        let tree = Object::new(Value::Map);
        tree.insert("name", "pear").unwrap();
        tree.insert("count", 1_i64).unwrap();
        tree.insert("tags", Value::List).unwrap();
        let item = read_object::<Item>(&tree).unwrap();
        assert_eq!(item.extra, None);
    }

    #[test]
    fn missing_and_mistyped_fields() {
        let tree = Object::new(Value::Map);
        tree.insert("name", "pear").unwrap();
        assert_eq!(
            read_object::<Item>(&tree).unwrap_err(),
            LoadError::MissingKey(String::from("count"))
        );

        tree.insert("count", "many").unwrap();
        assert_eq!(
            read_object::<Item>(&tree).unwrap_err(),
            LoadError::WrongType {
                expected: ValueKind::Int,
                found: ValueKind::Str,
            }
        );

        tree.insert("count", -1_i64).unwrap();
        assert_eq!(
            read_object::<Item>(&tree).unwrap_err(),
            LoadError::OutOfRange("u32")
        );
    }

    #[test]
    fn maps_and_blobs() {
        let mut map = BTreeMap::new();
        map.insert(String::from("x"), Bytes(vec![1, 2]));
        let tree = write_object(&map).unwrap();
        assert_eq!(tree.at("x").value(), Value::Binary(vec![1, 2]));
        assert_eq!(read_object::<BTreeMap<String, Bytes>>(&tree).unwrap(), map);
    }

    #[test]
    fn u64_limited_to_i64() {
        let tree = write_object(&(i64::MAX as u64)).unwrap();
        assert_eq!(tree.value(), Value::Int(i64::MAX));
        assert_eq!(read_object::<u64>(&tree).unwrap(), i64::MAX as u64);

        assert_eq!(
            write_object(&u64::MAX).unwrap_err(),
            DumpError::OutOfRange("i64")
        );
    }

    #[test]
    fn integers_widen_to_floats() {
        let tree = Object::new(Value::Int(2));
        assert_eq!(read_object::<f32>(&tree).unwrap(), 2.0);
    }

    #[test]
    fn unbalanced_writes_fail() {
        let mut writer = ObjectWriter::new(Object::default());
        assert_eq!(writer.list_end(), Err(DumpError::Unbalanced("list_end")));

        writer.list_begin().unwrap();
        assert_eq!(writer.value_i32(1), Err(DumpError::Unbalanced("value")));
        assert_eq!(writer.finish(), Err(DumpError::Unbalanced("finish")));
    }
}
