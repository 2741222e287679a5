//! Bridge between value trees and `serde` data formats.
//!
//! Any self-describing serde format (JSON, RON, ...) can print and parse a tree:
//! maps become maps, lists become sequences, null becomes unit, binary becomes bytes.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde_core::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_core::ser::{Error as _, Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::{ConstObject, Object, Value};

// -----------------------------------------------------------------------------
// Serialize

impl Serialize for ConstObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value() {
            Value::Int(value) => serializer.serialize_i64(value),
            Value::Float(value) => serializer.serialize_f64(value),
            Value::Bool(value) => serializer.serialize_bool(value),
            Value::Str(value) => serializer.serialize_str(&value),
            Value::Null => serializer.serialize_unit(),
            Value::Binary(value) => serializer.serialize_bytes(&value),
            Value::Map => {
                let mut map = serializer.serialize_map(Some(self.size()))?;
                for child in self.children() {
                    let key = child
                        .key()
                        .ok_or_else(|| S::Error::custom("map entry without a key"))?;
                    map.serialize_entry(&key, &child)?;
                }
                map.end()
            }
            Value::List => {
                let mut seq = serializer.serialize_seq(Some(self.size()))?;
                for child in self.children() {
                    seq.serialize_element(&child)?;
                }
                seq.end()
            }
        }
    }
}

impl Serialize for Object {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (**self).serialize(serializer)
    }
}

// -----------------------------------------------------------------------------
// Deserialize

/// A detached subtree produced while parsing, grafted into its parent arena
/// once complete.
struct Subtree(Object);

impl<'de> Deserialize<'de> for Object {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ObjectVisitor).map(|tree| tree.0)
    }
}

impl<'de> Deserialize<'de> for Subtree {
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ObjectVisitor)
    }
}

struct ObjectVisitor;

impl ObjectVisitor {
    #[inline]
    fn leaf<E>(value: Value) -> Result<Subtree, E> {
        Ok(Subtree(Object::new(value)))
    }
}

impl<'de> Visitor<'de> for ObjectVisitor {
    type Value = Subtree;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any value tree")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Subtree, E> {
        Self::leaf(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Subtree, E> {
        Self::leaf(Value::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Subtree, E> {
        let v = i64::try_from(v).map_err(|_| E::custom("integer out of range for i64"))?;
        Self::leaf(Value::Int(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Subtree, E> {
        Self::leaf(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Subtree, E> {
        Self::leaf(Value::Str(String::from(v)))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Subtree, E> {
        Self::leaf(Value::Str(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Subtree, E> {
        Self::leaf(Value::Binary(Vec::from(v)))
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Subtree, E> {
        Self::leaf(Value::Binary(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Subtree, E> {
        Self::leaf(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Subtree, E> {
        Self::leaf(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Subtree, D::Error> {
        deserializer.deserialize_any(ObjectVisitor)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Subtree, A::Error> {
        let list = Object::new(Value::List);
        while let Some(Subtree(element)) = seq.next_element::<Subtree>()? {
            let slot = list.append(Value::Null).map_err(de::Error::custom)?;
            slot.assign(&element, false).map_err(de::Error::custom)?;
        }
        Ok(Subtree(list))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Subtree, A::Error> {
        let map = Object::new(Value::Map);
        while let Some((key, Subtree(value))) = access.next_entry::<String, Subtree>()? {
            let slot = map.insert(&key, Value::Null).map_err(de::Error::custom)?;
            slot.assign(&value, false).map_err(de::Error::custom)?;
        }
        Ok(Subtree(map))
    }
}
