use alloc::string::String;
use alloc::vec::Vec;

use dp_pack::{Definer, DumpError, LabelledVariant, LoadError, Pack, Reader, Writer};

macro_rules! define_tokens {
    ($(
        $(#[$meta:meta])*
        $variant:ident $({ $field:ident: $ty:ty })? => $label:literal,
    )+) => {
        /// One structural event of a shape.
        ///
        /// Packed as a labelled variant whose arms are objects holding the
        /// token's fields, so that schemas can be stored and described like
        /// any other value.
        #[derive(Debug, Clone, PartialEq, Eq, Default)]
        pub enum Token {
            #[default]
            $(
                $(#[$meta])*
                $variant $({ $field: $ty })?,
            )+
        }

        #[allow(dead_code)]
        enum TokenIndex {
            $($variant),+
        }

        impl LabelledVariant for Token {
            const LABELS: &'static [&'static str] = &[$($label),+];

            fn index(&self) -> usize {
                match self {
                    $(Token::$variant { .. } => TokenIndex::$variant as usize),+
                }
            }

            fn from_index(index: usize) -> Option<Self> {
                $(
                    if index == TokenIndex::$variant as usize {
                        return Some(Token::$variant $({ $field: <$ty>::default() })?);
                    }
                )+
                None
            }

            fn write_arm(&self, writer: &mut dyn Writer) -> Result<(), DumpError> {
                writer.object_begin()?;
                match self {
                    $(
                        Token::$variant $({ $field })? => {
                            $(
                                writer.object_next(stringify!($field))?;
                                $field.write(writer)?;
                            )?
                        }
                    )+
                }
                writer.object_end()
            }

            fn read_arm(&mut self, reader: &mut dyn Reader) -> Result<(), LoadError> {
                reader.object_begin()?;
                match self {
                    $(
                        Token::$variant $({ $field })? => {
                            $(
                                reader.object_next(stringify!($field))?;
                                $field.read(reader)?;
                            )?
                        }
                    )+
                }
                reader.object_end()
            }

            fn define_arm(index: usize, definer: &mut dyn Definer) {
                definer.object_begin();
                $(
                    if index == TokenIndex::$variant as usize {
                        $(
                            definer.object_next(stringify!($field));
                            <$ty>::define(definer);
                        )?
                    }
                )+
                definer.object_end();
            }
        }
    };
}

define_tokens! {
    ObjectBegin => "object_begin",
    ObjectEnd => "object_end",
    ObjectNext { key: String } => "object_next",
    TupleBegin => "tuple_begin",
    TupleEnd => "tuple_end",
    TupleNext => "tuple_next",
    /// Followed by one [`VariantNext`](Token::VariantNext) and its shape per arm.
    VariantBegin { labels: Vec<String> } => "variant_begin",
    VariantNext { label: String } => "variant_next",
    VariantEnd => "variant_end",
    /// Prefix of the shape of the map values.
    Map => "map",
    /// Prefix of the shape of the list elements.
    List => "list",
    /// Prefix of the shape of the optional value.
    Optional => "optional",
    Enumerate { labels: Vec<String> } => "enumerate",
    /// An opaque blob.
    Binary => "binary",
    /// A blob of `stride`-sized elements, wrapping the element shape.
    BinaryBegin { stride: u64 } => "binary_begin",
    BinaryEnd => "binary_end",
    /// Wraps a shape made only of fixed-size scalars, `size` bytes in total.
    TrivialBegin { size: u64 } => "trivial_begin",
    TrivialEnd { size: u64 } => "trivial_end",
    I32 => "i32",
    I64 => "i64",
    U32 => "u32",
    U64 => "u64",
    F32 => "f32",
    F64 => "f64",
    String => "string",
    Bool => "bool",
}

impl Pack for Token {
    #[inline]
    fn write(&self, writer: &mut dyn Writer) -> Result<(), DumpError> {
        dp_pack::write_variant(self, writer)
    }

    #[inline]
    fn read(&mut self, reader: &mut dyn Reader) -> Result<(), LoadError> {
        dp_pack::read_variant(self, reader)
    }

    #[inline]
    fn define(definer: &mut dyn Definer) {
        dp_pack::define_variant::<Self>(definer);
    }
}

impl Token {
    /// The label of this token, as stored when a schema is packed.
    #[inline]
    pub fn label(&self) -> &'static str {
        self.to_label()
    }
}
