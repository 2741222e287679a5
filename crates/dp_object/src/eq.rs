use crate::{ConstObject, Object, Value};

// -----------------------------------------------------------------------------
// Semantic equality

/// Structural equality with null-as-absence.
///
/// - A null value, an invalid handle and a map holding only null-like entries
///   are all equal to each other.
/// - Maps compare by key, ignoring entry order and null-like entries.
/// - Lists compare positionally; trailing null-like entries are ignored.
///
/// See [`ConstObject::identical`] for the strict comparison.
impl PartialEq for ConstObject {
    fn eq(&self, other: &Self) -> bool {
        let (lhs_null, rhs_null) = (self.is_null_like(), other.is_null_like());
        if lhs_null || rhs_null {
            return lhs_null && rhs_null;
        }

        match (self.value(), other.value()) {
            (Value::Map, Value::Map) => {
                let entries = |object: &ConstObject| {
                    object.children().filter(|child| !child.is_null_like()).count()
                };
                entries(self) == entries(other)
                    && self
                        .children()
                        .filter(|child| !child.is_null_like())
                        .all(|child| match child.key() {
                            Some(key) => child == other.at(&key),
                            None => false,
                        })
            }
            (Value::List, Value::List) => {
                let lhs = significant_len(self);
                let rhs = significant_len(other);
                lhs == rhs
                    && self
                        .children()
                        .zip(other.children())
                        .take(lhs)
                        .all(|(a, b)| a == b)
            }
            (lhs, rhs) => lhs == rhs,
        }
    }
}

impl PartialEq for Object {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl PartialEq<ConstObject> for Object {
    #[inline]
    fn eq(&self, other: &ConstObject) -> bool {
        **self == *other
    }
}

impl PartialEq<Object> for ConstObject {
    #[inline]
    fn eq(&self, other: &Object) -> bool {
        *self == **other
    }
}

/// Length of a list once trailing null-like entries are dropped.
pub(crate) fn significant_len(list: &ConstObject) -> usize {
    let mut len = 0;
    for (position, child) in list.children().enumerate() {
        if !child.is_null_like() {
            len = position + 1;
        }
    }
    len
}

impl ConstObject {
    /// Strict structural equality: same tags, same keys, same children in the
    /// same order, nulls included.
    ///
    /// # Examples
    ///
    /// ```
    /// use dp_object::{Object, Value};
    ///
    /// let a = Object::new(Value::Map);
    /// a.insert("x", 1_i64).unwrap();
    /// let b = a.clone_tree();
    /// b.insert("y", Value::Null).unwrap();
    ///
    /// assert!(a == b);
    /// assert!(!a.identical(&b));
    /// ```
    pub fn identical(&self, other: &ConstObject) -> bool {
        if self.value() != other.value() || self.key() != other.key() {
            return false;
        }
        let mut lhs = self.children();
        let mut rhs = other.children();
        loop {
            match (lhs.next(), rhs.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if a.identical(&b) => {}
                _ => return false,
            }
        }
    }
}
