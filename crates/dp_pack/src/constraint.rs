//! Value constraints checked after reading.

use alloc::string::String;
use alloc::vec::Vec;

use crate::{Bytes, LoadError, Pack, Reader};

/// A restriction on the values a field may hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// Numeric value within `lower..=upper`.
    Range { lower: f64, upper: f64 },
    /// Exactly `length` elements of `element_size` bytes each.
    ///
    /// Elements of strings and blobs are bytes, so their `element_size` is 1.
    Length { length: usize, element_size: usize },
    /// Elements in non-decreasing order.
    Ordered,
}

/// Types that can check themselves against a [`Constraint`].
///
/// A value never satisfies a constraint kind it has no notion of, such as a
/// range on a string.
pub trait Validate {
    fn validate(&self, constraint: &Constraint) -> bool;
}

/// Returns `true` if `value` satisfies `constraint`.
///
/// # Examples
///
/// ```
/// use dp_pack::{Constraint, validate};
///
/// let range = Constraint::Range { lower: 0.0, upper: 1.0 };
/// assert!(validate(&0.5_f32, &range));
/// assert!(!validate(&2_i32, &range));
/// assert!(validate(&vec![1, 2, 2, 5], &Constraint::Ordered));
/// ```
#[inline]
pub fn validate<T: Validate + ?Sized>(value: &T, constraint: &Constraint) -> bool {
    value.validate(constraint)
}

/// Reads a value and checks it against `constraint`.
///
/// # Errors
///
/// Fails with [`LoadError::ConstraintViolated`] if the value read does not
/// satisfy the constraint.
pub fn read_validated<T: Pack + Validate>(
    value: &mut T,
    reader: &mut dyn Reader,
    constraint: &Constraint,
) -> Result<(), LoadError> {
    value.read(reader)?;
    if value.validate(constraint) {
        Ok(())
    } else {
        log::debug!("value rejected by {constraint:?}");
        Err(LoadError::ConstraintViolated)
    }
}

// -----------------------------------------------------------------------------
// Implementations

macro_rules! impl_validate_number {
    ($($ty:ty),*) => {
        $(
            impl Validate for $ty {
                #[inline]
                fn validate(&self, constraint: &Constraint) -> bool {
                    match *constraint {
                        Constraint::Range { lower, upper } => {
                            let value = *self as f64;
                            lower <= value && value <= upper
                        }
                        _ => false,
                    }
                }
            }
        )*
    };
}

impl_validate_number!(i32, i64, u32, u64, f32, f64);

#[inline]
fn validate_length(len: usize, element_size: usize, constraint: &Constraint) -> bool {
    matches!(
        *constraint,
        Constraint::Length { length, element_size: size } if length == len && size == element_size
    )
}

impl Validate for str {
    #[inline]
    fn validate(&self, constraint: &Constraint) -> bool {
        validate_length(self.len(), 1, constraint)
    }
}

impl Validate for String {
    #[inline]
    fn validate(&self, constraint: &Constraint) -> bool {
        self.as_str().validate(constraint)
    }
}

impl Validate for Bytes {
    #[inline]
    fn validate(&self, constraint: &Constraint) -> bool {
        validate_length(self.len(), 1, constraint)
    }
}

impl<T: Pack + PartialOrd> Validate for [T] {
    fn validate(&self, constraint: &Constraint) -> bool {
        match *constraint {
            Constraint::Ordered => self.windows(2).all(|pair| pair[0] <= pair[1]),
            Constraint::Length {
                length,
                element_size,
            } => {
                length == self.len()
                    && T::trivial_size().is_none_or(|size| size == element_size)
            }
            Constraint::Range { .. } => false,
        }
    }
}

impl<T: Pack + PartialOrd> Validate for Vec<T> {
    #[inline]
    fn validate(&self, constraint: &Constraint) -> bool {
        self.as_slice().validate(constraint)
    }
}
