use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

// -----------------------------------------------------------------------------
// Value

/// The tagged payload stored in every tree node.
///
/// [`Value::Map`] and [`Value::List`] are markers: the entries of a container
/// are the node's children, never part of the value itself.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    #[default]
    Null,
    Binary(Vec<u8>),
    Map,
    List,
}

impl Value {
    /// Returns the name of the tag, used in error messages.
    pub const fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Bool(_) => ValueKind::Bool,
            Value::Str(_) => ValueKind::Str,
            Value::Null => ValueKind::Null,
            Value::Binary(_) => ValueKind::Binary,
            Value::Map => ValueKind::Map,
            Value::List => ValueKind::List,
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for [`Value::Map`] and [`Value::List`].
    #[inline]
    pub const fn is_container(&self) -> bool {
        matches!(self, Value::Map | Value::List)
    }
}

macro_rules! impl_value_from {
    ($($ty:ty => $variant:ident $(as $cast:ty)?),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Value::$variant(value $(as $cast)?)
                }
            }
        )*
    };
}

impl_value_from! {
    i64 => Int,
    i32 => Int as i64,
    u32 => Int as i64,
    f64 => Float,
    f32 => Float as f64,
    bool => Bool,
    String => Str,
    Vec<u8> => Binary,
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Value::Str(String::from(value))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

// -----------------------------------------------------------------------------
// ValueKind

/// The tag of a [`Value`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Float,
    Bool,
    Str,
    Null,
    Binary,
    Map,
    List,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Bool => "bool",
            ValueKind::Str => "string",
            ValueKind::Null => "null",
            ValueKind::Binary => "binary",
            ValueKind::Map => "map",
            ValueKind::List => "list",
        })
    }
}

// -----------------------------------------------------------------------------
// Primitive

/// A payload type that can be borrowed out of a [`Value`].
///
/// Used by the typed getters of the tree handles, e.g.
/// [`ConstObject::get`](crate::ConstObject::get).
pub trait Primitive: 'static {
    const KIND: ValueKind;

    fn from_value(value: &Value) -> Option<&Self>;
}

macro_rules! impl_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Primitive for $ty {
                const KIND: ValueKind = ValueKind::$variant;

                #[inline]
                fn from_value(value: &Value) -> Option<&Self> {
                    match value {
                        Value::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_primitive! {
    i64 => Int,
    f64 => Float,
    bool => Bool,
    String => Str,
    Vec<u8> => Binary,
}
