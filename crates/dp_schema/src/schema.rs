use alloc::string::String;
use alloc::vec::Vec;
use core::any::type_name;

use dp_pack::{Definer, Pack, pack_object};

use crate::Token;

// -----------------------------------------------------------------------------
// Schema

/// The shape of a type as a flat token sequence.
///
/// Its length depends on the structure of the type only: container elements
/// are described once, whatever the amount of data a value holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    pub tokens: Vec<Token>,
}

pack_object!(Schema { tokens });

impl Schema {
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

// -----------------------------------------------------------------------------
// SchemaBuilder

/// A [`Definer`] recording every shape event as a [`Token`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    tokens: Vec<Token>,
}

impl SchemaBuilder {
    #[inline]
    pub const fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    #[inline]
    pub fn finish(self) -> Schema {
        Schema {
            tokens: self.tokens,
        }
    }

    #[inline]
    fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }
}

#[inline]
fn owned_labels(labels: &[&str]) -> Vec<String> {
    labels.iter().copied().map(String::from).collect()
}

impl Definer for SchemaBuilder {
    fn value_i32(&mut self) {
        self.push(Token::I32);
    }

    fn value_i64(&mut self) {
        self.push(Token::I64);
    }

    fn value_u32(&mut self) {
        self.push(Token::U32);
    }

    fn value_u64(&mut self) {
        self.push(Token::U64);
    }

    fn value_f32(&mut self) {
        self.push(Token::F32);
    }

    fn value_f64(&mut self) {
        self.push(Token::F64);
    }

    fn value_string(&mut self) {
        self.push(Token::String);
    }

    fn value_bool(&mut self) {
        self.push(Token::Bool);
    }

    fn enumerate(&mut self, labels: &[&str]) {
        self.push(Token::Enumerate {
            labels: owned_labels(labels),
        });
    }

    fn optional(&mut self) {
        self.push(Token::Optional);
    }

    fn variant_begin(&mut self, labels: &[&str]) {
        self.push(Token::VariantBegin {
            labels: owned_labels(labels),
        });
    }

    fn variant_next(&mut self, label: &str) {
        self.push(Token::VariantNext {
            label: String::from(label),
        });
    }

    fn variant_end(&mut self) {
        self.push(Token::VariantEnd);
    }

    fn binary(&mut self) {
        self.push(Token::Binary);
    }

    fn binary_begin(&mut self, stride: usize) {
        self.push(Token::BinaryBegin {
            stride: stride as u64,
        });
    }

    fn binary_end(&mut self) {
        self.push(Token::BinaryEnd);
    }

    fn trivial_begin(&mut self, size: usize) {
        self.push(Token::TrivialBegin { size: size as u64 });
    }

    fn trivial_end(&mut self, size: usize) {
        self.push(Token::TrivialEnd { size: size as u64 });
    }

    fn object_begin(&mut self) {
        self.push(Token::ObjectBegin);
    }

    fn object_next(&mut self, key: &str) {
        self.push(Token::ObjectNext {
            key: String::from(key),
        });
    }

    fn object_end(&mut self) {
        self.push(Token::ObjectEnd);
    }

    fn tuple_begin(&mut self) {
        self.push(Token::TupleBegin);
    }

    fn tuple_next(&mut self) {
        self.push(Token::TupleNext);
    }

    fn tuple_end(&mut self) {
        self.push(Token::TupleEnd);
    }

    fn map(&mut self) {
        self.push(Token::Map);
    }

    fn list(&mut self) {
        self.push(Token::List);
    }
}

/// Records the shape of `T`.
///
/// # Examples
///
/// ```
/// use dp_schema::{Token, create_schema};
///
/// let schema = create_schema::<Vec<(i32, bool)>>();
/// assert_eq!(
///     schema.tokens,
///     [
///         Token::List,
///         Token::TrivialBegin { size: 5 },
///         Token::TupleBegin,
///         Token::TupleNext,
///         Token::I32,
///         Token::TupleNext,
///         Token::Bool,
///         Token::TupleEnd,
///         Token::TrivialEnd { size: 5 },
///     ]
/// );
/// ```
pub fn create_schema<T: Pack>() -> Schema {
    let mut builder = SchemaBuilder::new();
    T::define(&mut builder);
    let schema = builder.finish();
    log::debug!(
        "created schema of `{}` with {} tokens",
        type_name::<T>(),
        schema.len()
    );
    schema
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;

    use dp_pack::{Bytes, Packed};

    use super::create_schema;
    use crate::Token;

    #[test]
    fn containers_are_prefixes() {
        let schema = create_schema::<BTreeMap<String, Option<f64>>>();
        assert_eq!(schema.tokens, [Token::Map, Token::Optional, Token::F64]);
    }

    #[test]
    fn blobs() {
        assert_eq!(create_schema::<Bytes>().tokens, [Token::Binary]);
        assert_eq!(
            create_schema::<Packed<u32>>().tokens,
            [
                Token::BinaryBegin { stride: 4 },
                Token::U32,
                Token::BinaryEnd
            ]
        );
    }

    #[test]
    fn size_is_independent_of_data() {
        let schema = create_schema::<[[u64; 2]; 3]>();
        // outer trivial run, tuple of three inner trivial runs
        assert_eq!(schema.len(), 2 + 2 + 3 * (1 + 2 + 2 + 2 * 2));
    }
}
