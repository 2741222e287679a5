//! Enums and tagged unions identified by stable string labels.
//!
//! Each type carries a static label table, one label per arm in declaration
//! order. Binary output stores the position (enums) or the label (variants),
//! tree output always stores the label.

use alloc::string::String;

use crate::{Definer, DumpError, LoadError, Reader, Writer};

// -----------------------------------------------------------------------------
// LabelledEnum

/// A fieldless enum with one label per variant.
///
/// Usually implemented with [`labelled_enum!`](crate::labelled_enum).
pub trait LabelledEnum: Sized {
    const LABELS: &'static [&'static str];

    /// Position of the variant in [`LABELS`](Self::LABELS).
    fn index(&self) -> usize;

    fn from_index(index: usize) -> Option<Self>;

    #[inline]
    fn to_label(&self) -> &'static str {
        Self::LABELS.get(self.index()).copied().unwrap_or_default()
    }

    /// # Errors
    ///
    /// Fails with [`LoadError::InvalidLabel`] for a label outside the table.
    fn from_label(label: &str) -> Result<Self, LoadError> {
        Self::LABELS
            .iter()
            .position(|candidate| *candidate == label)
            .and_then(Self::from_index)
            .ok_or_else(|| LoadError::InvalidLabel(String::from(label)))
    }
}

#[inline]
pub fn write_enum<T: LabelledEnum>(value: &T, writer: &mut dyn Writer) -> Result<(), DumpError> {
    writer.enumerate(value.index(), T::LABELS)
}

pub fn read_enum<T: LabelledEnum>(value: &mut T, reader: &mut dyn Reader) -> Result<(), LoadError> {
    let index = reader.enumerate(T::LABELS)?;
    *value = T::from_index(index).ok_or(LoadError::OutOfRange("enumerate"))?;
    Ok(())
}

#[inline]
pub fn define_enum<T: LabelledEnum>(definer: &mut dyn Definer) {
    definer.enumerate(T::LABELS);
}

/// Implements [`LabelledEnum`] and [`Pack`](crate::Pack) for a fieldless enum.
///
/// # Examples
///
/// ```
/// use dp_pack::{LabelledEnum, LoadError, labelled_enum};
///
/// #[derive(Debug, Default, Clone, Copy, PartialEq)]
/// enum Physics {
///     #[default]
///     Dynamic,
///     Kinematic,
///     Static,
/// }
///
/// labelled_enum!(Physics {
///     Dynamic => "dynamic",
///     Kinematic => "kinematic",
///     Static => "static",
/// });
///
/// assert_eq!(Physics::Static.to_label(), "static");
/// assert_eq!(Physics::from_label("kinematic").unwrap(), Physics::Kinematic);
/// assert!(matches!(Physics::from_label("frozen"), Err(LoadError::InvalidLabel(_))));
/// ```
#[macro_export]
macro_rules! labelled_enum {
    ($ty:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        const _: () = {
            #[allow(dead_code, non_camel_case_types)]
            enum __LabelIndex {
                $($variant),+
            }

            impl $crate::LabelledEnum for $ty {
                const LABELS: &'static [&'static str] = &[$($label),+];

                fn index(&self) -> usize {
                    match self {
                        $(Self::$variant => __LabelIndex::$variant as usize),+
                    }
                }

                fn from_index(index: usize) -> ::core::option::Option<Self> {
                    $(
                        if index == __LabelIndex::$variant as usize {
                            return ::core::option::Option::Some(Self::$variant);
                        }
                    )+
                    ::core::option::Option::None
                }
            }

            impl $crate::Pack for $ty {
                #[inline]
                fn write(
                    &self,
                    writer: &mut dyn $crate::Writer,
                ) -> ::core::result::Result<(), $crate::DumpError> {
                    $crate::write_enum(self, writer)
                }

                #[inline]
                fn read(
                    &mut self,
                    reader: &mut dyn $crate::Reader,
                ) -> ::core::result::Result<(), $crate::LoadError> {
                    $crate::read_enum(self, reader)
                }

                #[inline]
                fn define(definer: &mut dyn $crate::Definer) {
                    $crate::define_enum::<Self>(definer);
                }
            }
        };
    };
}

// -----------------------------------------------------------------------------
// LabelledVariant

/// A tagged union whose arms each hold one packable value.
///
/// Usually implemented with [`labelled_variant!`](crate::labelled_variant).
pub trait LabelledVariant: Sized {
    const LABELS: &'static [&'static str];

    /// Position of the active arm in [`LABELS`](Self::LABELS).
    fn index(&self) -> usize;

    /// Creates the arm at `index` holding a default value.
    fn from_index(index: usize) -> Option<Self>;

    fn write_arm(&self, writer: &mut dyn Writer) -> Result<(), DumpError>;

    fn read_arm(&mut self, reader: &mut dyn Reader) -> Result<(), LoadError>;

    fn define_arm(index: usize, definer: &mut dyn Definer);

    #[inline]
    fn to_label(&self) -> &'static str {
        Self::LABELS.get(self.index()).copied().unwrap_or_default()
    }

    /// Creates the arm labelled `label` holding a default value.
    ///
    /// # Errors
    ///
    /// Fails with [`LoadError::InvalidLabel`] for a label outside the table.
    fn from_label(label: &str) -> Result<Self, LoadError> {
        Self::LABELS
            .iter()
            .position(|candidate| *candidate == label)
            .and_then(Self::from_index)
            .ok_or_else(|| LoadError::InvalidLabel(String::from(label)))
    }
}

pub fn write_variant<T: LabelledVariant>(
    value: &T,
    writer: &mut dyn Writer,
) -> Result<(), DumpError> {
    writer.variant_begin(value.to_label(), T::LABELS)?;
    value.write_arm(writer)?;
    writer.variant_end()
}

/// Reads a variant, trying each label in declaration order.
///
/// The first label the reader matches selects the arm. The current arm is
/// reused when it is the selected one.
///
/// # Errors
///
/// Fails with [`LoadError::NoMatchingVariant`] if no label matches.
pub fn read_variant<T: LabelledVariant>(
    value: &mut T,
    reader: &mut dyn Reader,
) -> Result<(), LoadError> {
    reader.variant_begin(T::LABELS)?;

    let mut selected = None;
    for (index, label) in T::LABELS.iter().enumerate() {
        if reader.variant_match(label)? {
            selected = Some(index);
            break;
        }
    }
    let index = selected.ok_or(LoadError::NoMatchingVariant)?;

    if value.index() != index {
        *value = T::from_index(index).ok_or(LoadError::NoMatchingVariant)?;
    }
    value.read_arm(reader)?;
    reader.variant_end()
}

/// # Panics
///
/// In debug builds, if two arms share a label.
pub fn define_variant<T: LabelledVariant>(definer: &mut dyn Definer) {
    debug_assert!(
        T::LABELS
            .iter()
            .enumerate()
            .all(|(index, label)| !T::LABELS[..index].contains(label)),
        "Repeated variant labels"
    );

    definer.variant_begin(T::LABELS);
    for (index, label) in T::LABELS.iter().enumerate() {
        definer.variant_next(label);
        T::define_arm(index, definer);
    }
    definer.variant_end();
}

/// Implements [`LabelledVariant`] and [`Pack`](crate::Pack) for an enum whose
/// variants each wrap a single packable value.
///
/// # Examples
///
/// ```
/// use dp_pack::{LabelledVariant, labelled_variant, read_binary, write_binary};
///
/// #[derive(Debug, PartialEq)]
/// enum Shape {
///     Circle(f64),
///     Square(f64),
/// }
///
/// impl Default for Shape {
///     fn default() -> Self {
///         Shape::Circle(0.0)
///     }
/// }
///
/// labelled_variant!(Shape {
///     Circle(f64) => "circle",
///     Square(f64) => "square",
/// });
///
/// let shape = Shape::Square(2.0);
/// assert_eq!(shape.to_label(), "square");
///
/// let bytes = write_binary(&shape).unwrap();
/// assert_eq!(read_binary::<Shape>(&bytes).unwrap(), shape);
/// ```
#[macro_export]
macro_rules! labelled_variant {
    ($ty:ident { $($variant:ident($inner:ty) => $label:literal),+ $(,)? }) => {
        const _: () = {
            #[allow(dead_code, non_camel_case_types)]
            enum __LabelIndex {
                $($variant),+
            }

            impl $crate::LabelledVariant for $ty {
                const LABELS: &'static [&'static str] = &[$($label),+];

                fn index(&self) -> usize {
                    match self {
                        $(Self::$variant(_) => __LabelIndex::$variant as usize),+
                    }
                }

                fn from_index(index: usize) -> ::core::option::Option<Self> {
                    $(
                        if index == __LabelIndex::$variant as usize {
                            return ::core::option::Option::Some(Self::$variant(
                                <$inner as ::core::default::Default>::default(),
                            ));
                        }
                    )+
                    ::core::option::Option::None
                }

                fn write_arm(
                    &self,
                    writer: &mut dyn $crate::Writer,
                ) -> ::core::result::Result<(), $crate::DumpError> {
                    match self {
                        $(Self::$variant(value) => $crate::Pack::write(value, writer)),+
                    }
                }

                fn read_arm(
                    &mut self,
                    reader: &mut dyn $crate::Reader,
                ) -> ::core::result::Result<(), $crate::LoadError> {
                    match self {
                        $(Self::$variant(value) => $crate::Pack::read(value, reader)),+
                    }
                }

                fn define_arm(index: usize, definer: &mut dyn $crate::Definer) {
                    $(
                        if index == __LabelIndex::$variant as usize {
                            <$inner as $crate::Pack>::define(definer);
                        }
                    )+
                }
            }

            impl $crate::Pack for $ty {
                #[inline]
                fn write(
                    &self,
                    writer: &mut dyn $crate::Writer,
                ) -> ::core::result::Result<(), $crate::DumpError> {
                    $crate::write_variant(self, writer)
                }

                #[inline]
                fn read(
                    &mut self,
                    reader: &mut dyn $crate::Reader,
                ) -> ::core::result::Result<(), $crate::LoadError> {
                    $crate::read_variant(self, reader)
                }

                #[inline]
                fn define(definer: &mut dyn $crate::Definer) {
                    $crate::define_variant::<Self>(definer);
                }
            }
        };
    };
}
