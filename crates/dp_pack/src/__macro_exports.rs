//! Items used by the exported macros. Not part of the public API.

use crate::{Definer, Pack};

/// Defines the type of the field selected by `_select`.
#[inline]
pub fn define_field<S, T: Pack>(_select: impl Fn(&S) -> &T, definer: &mut dyn Definer) {
    T::define(definer);
}

#[inline]
pub fn field_trivial_size<S, T: Pack>(_select: impl Fn(&S) -> &T) -> Option<usize> {
    T::trivial_size()
}
