//! Structural delta algebra between trees.
//!
//! - [`merge`]`(base, diff)` applies `diff` on top of `base`.
//! - [`diff`]`(base, modified)` computes the delta such that
//!   `merge(base, diff(base, modified)) == modified`, and, for a delta without
//!   redundant entries, `diff(base, merge(base, delta)) == delta`.
//!
//! A delta follows these rules:
//!
//! - A value at the same path as in the base overwrites it.
//! - A key present in the delta but not in the base is added, parent maps included.
//! - Null means "absent". In base and modified trees a null entry is the same as
//!   a missing one, and a map of nulls the same as a missing map. A null entry in
//!   the delta erases the key instead of storing a null.
//! - A list delta is a map keyed by the decimal index in the base list. Missing
//!   indices are unchanged; indices past the end append, gaps are filled with
//!   null; a null at a trailing index removes the element, a null anywhere else
//!   is stored as a positional placeholder.
//! - Erasing an element in the middle of a list is indistinguishable from
//!   shifting every following element down and dropping the last one. The delta
//!   always encodes the latter.
//! - A list replaced by a map whose keys are all decimal indices has no delta:
//!   merging it would read as a list delta. [`diff`] fails with
//!   [`ObjectError::AmbiguousDelta`] instead.

use alloc::string::ToString;
use alloc::vec::Vec;

use crate::eq::significant_len;
use crate::{ConstObject, Object, ObjectError, Value};

// -----------------------------------------------------------------------------
// Merge

/// Applies `diff` on top of `base` and returns the result in a new arena.
///
/// # Examples
///
/// ```
/// use dp_object::{Object, Value, merge};
///
/// let base = Object::new(Value::Map);
/// base.insert("a", 1_i64).unwrap();
/// base.insert("b", 2_i64).unwrap();
///
/// let diff = Object::new(Value::Map);
/// diff.insert("a", Value::Null).unwrap();
/// diff.insert("c", 3_i64).unwrap();
///
/// let merged = merge(&base, &diff).unwrap();
/// assert!(!merged.at("a").is_valid());
/// assert_eq!(merged.at("b").value(), Value::Int(2));
/// assert_eq!(merged.at("c").value(), Value::Int(3));
/// ```
pub fn merge(base: &ConstObject, diff: &ConstObject) -> Result<Object, ObjectError> {
    let result = base.clone_tree();
    merge_node(&result, diff)?;
    Ok(result)
}

fn merge_node(target: &Object, diff: &ConstObject) -> Result<(), ObjectError> {
    match diff.value() {
        Value::Map => {
            if diff.size() == 0 {
                return Ok(());
            }
            match target.value() {
                Value::Map => merge_map(target, diff),
                Value::List if is_list_delta(diff) => merge_list(target, diff),
                Value::List => {
                    log::warn!("map delta with non-index keys replaces a list");
                    target.assign(diff, true)
                }
                _ => target.assign(diff, true),
            }
        }
        Value::Null => target.set(Value::Null),
        _ => target.assign(diff, true),
    }
}

fn merge_map(target: &Object, diff: &ConstObject) -> Result<(), ObjectError> {
    for entry in diff.children() {
        let Some(key) = entry.key() else { continue };
        let existing = target.at(key.as_str());

        if entry.value().is_null() {
            if existing.is_valid() {
                existing.erase()?;
            }
        } else if existing.is_valid() {
            merge_node(&existing, &entry)?;
        } else if !entry.is_null_like() {
            let slot = target.insert(&key, Value::Null)?;
            slot.assign(&entry, true)?;
        }
    }
    Ok(())
}

fn is_list_delta(diff: &ConstObject) -> bool {
    diff.children()
        .all(|entry| entry.key().is_some_and(|key| key.parse::<usize>().is_ok()))
}

fn merge_list(target: &Object, diff: &ConstObject) -> Result<(), ObjectError> {
    let mut entries: Vec<(usize, ConstObject)> = diff
        .children()
        .filter_map(|entry| Some((entry.key()?.parse().ok()?, entry)))
        .collect();
    entries.sort_by_key(|(index, _)| *index);

    let mut removed = Vec::new();
    for (index, entry) in entries {
        if entry.value().is_null() {
            removed.push(index);
        }

        if index < target.size() {
            merge_node(&target.at(index), &entry)?;
            continue;
        }

        while target.size() < index {
            target.append(Value::Null)?;
        }
        let slot = target.append(Value::Null)?;
        slot.assign(&entry, true)?;
    }

    // Null at a trailing index means "removed".
    while let Some(last) = target.size().checked_sub(1) {
        if removed.binary_search(&last).is_err() {
            break;
        }
        target.at(last).erase()?;
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Diff

/// Computes the delta that turns `base` into `modified`.
///
/// An unchanged tree yields an empty map, which merges as a no-op.
///
/// # Errors
///
/// Fails with [`ObjectError::AmbiguousDelta`] where a list is replaced by a
/// map keyed by indices only.
///
/// # Examples
///
/// ```
/// use dp_object::{Object, Value, diff};
///
/// let base = Object::new(Value::List);
/// let modified = Object::new(Value::List);
/// for i in 1..=3_i64 {
///     base.append(i).unwrap();
/// }
/// for i in 1..=2_i64 {
///     modified.append(i).unwrap();
/// }
///
/// let delta = diff(&base, &modified).unwrap();
/// assert_eq!(delta.value(), Value::Map);
/// assert_eq!(delta.size(), 1);
/// assert_eq!(delta.at("2").value(), Value::Null);
/// ```
pub fn diff(base: &ConstObject, modified: &ConstObject) -> Result<Object, ObjectError> {
    let result = Object::new(Value::Map);
    if let Some(delta) = delta(base, modified)? {
        result.assign(&delta, false)?;
    }
    log::debug!("computed a delta with {} top-level entries", result.size());
    Ok(result)
}

/// Returns `None` if `modified` is equivalent to `base`.
fn delta(base: &ConstObject, modified: &ConstObject) -> Result<Option<Object>, ObjectError> {
    let (base_null, modified_null) = (base.is_null_like(), modified.is_null_like());
    match (base_null, modified_null) {
        (true, true) => return Ok(None),
        (false, true) => return Ok(Some(Object::new(Value::Null))),
        (true, false) => return stripped(modified).map(Some),
        (false, false) => {}
    }

    match (base.value(), modified.value()) {
        (Value::Map, Value::Map) => map_delta(base, modified),
        (Value::List, Value::List) => list_delta(base, modified),
        (Value::List, Value::Map) => {
            let replacement = stripped(modified)?;
            if is_list_delta(&replacement) {
                return Err(ObjectError::AmbiguousDelta);
            }
            Ok(Some(replacement))
        }
        (lhs, rhs) if lhs == rhs => Ok(None),
        _ => stripped(modified).map(Some),
    }
}

fn map_delta(base: &ConstObject, modified: &ConstObject) -> Result<Option<Object>, ObjectError> {
    let result = Object::new(Value::Map);

    for entry in modified.children() {
        let Some(key) = entry.key() else { continue };
        if let Some(sub) = delta(&base.at(key.as_str()), &entry)? {
            result.insert(&key, Value::Null)?.assign(&sub, false)?;
        }
    }
    for entry in base.children() {
        let Some(key) = entry.key() else { continue };
        if !entry.is_null_like() && modified.at(key.as_str()).is_null_like() {
            result.insert(&key, Value::Null)?;
        }
    }

    Ok((result.size() > 0).then_some(result))
}

fn list_delta(base: &ConstObject, modified: &ConstObject) -> Result<Option<Object>, ObjectError> {
    let result = Object::new(Value::Map);
    let base_len = significant_len(base);
    let modified_len = significant_len(modified);

    for index in 0..base_len.max(modified_len) {
        let key = index.to_string();
        if index >= modified_len {
            result.insert(&key, Value::Null)?;
            continue;
        }

        let element = modified.at(index);
        if index >= base_len {
            // Gaps are filled with null on merge.
            if !element.value().is_null() {
                let element = stripped(&element)?;
                result.insert(&key, Value::Null)?.assign(&element, false)?;
            }
            continue;
        }

        let original = base.at(index);
        let change = if element.value().is_null() {
            (!original.value().is_null()).then(|| Object::new(Value::Null))
        } else {
            delta(&original, &element)?
        };
        if let Some(change) = change {
            result.insert(&key, Value::Null)?.assign(&change, false)?;
        }
    }

    Ok((result.size() > 0).then_some(result))
}

/// Copies `object`, dropping null-like map entries.
fn stripped(object: &ConstObject) -> Result<Object, ObjectError> {
    let result = Object::new(Value::Null);
    result.assign(object, true)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::{diff, merge};
    use crate::{Object, ObjectError, Value};

    fn map(entries: &[(&str, Value)]) -> Object {
        let object = Object::new(Value::Map);
        for (key, value) in entries {
            object.insert(key, value.clone()).unwrap();
        }
        object
    }

    fn list(values: &[i64]) -> Object {
        let object = Object::new(Value::List);
        for value in values {
            object.append(*value).unwrap();
        }
        object
    }

    fn assert_laws(base: &Object, modified: &Object) {
        let delta = diff(base, modified).unwrap();
        let merged = merge(base, &delta).unwrap();
        assert_eq!(merged, *modified, "merge(base, diff) != modified, delta = {delta:?}");
        let again = diff(base, &merged).unwrap();
        assert!(again.identical(&delta), "diff(base, merge(base, diff)) != diff: {again:?}");
    }

    #[test]
    fn shorter_list() {
        let base = list(&[1, 2, 3]);
        let modified = list(&[1, 2]);
        let delta = diff(&base, &modified).unwrap();
        assert!(delta.identical(&map(&[("2", Value::Null)])));

        let merged = merge(&base, &delta).unwrap();
        assert!(merged.identical(&modified));
    }

    #[test]
    fn longer_list_fills_gaps() {
        let base = list(&[1]);
        let delta = map(&[("3", 4_i64.into())]);
        let merged = merge(&base, &delta).unwrap();

        let expected = Object::new(Value::List);
        expected.append(1_i64).unwrap();
        expected.append(Value::Null).unwrap();
        expected.append(Value::Null).unwrap();
        expected.append(4_i64).unwrap();
        assert!(merged.identical(&expected));
    }

    #[test]
    fn inner_null_in_list_is_kept() {
        let base = list(&[1, 2, 3]);
        let delta = map(&[("1", Value::Null)]);
        let merged = merge(&base, &delta).unwrap();
        assert_eq!(merged.size(), 3);
        assert_eq!(merged.at(1).value(), Value::Null);
        assert_eq!(merged.at(2).value(), Value::Int(3));
    }

    #[test]
    fn null_erases_key() {
        let base = map(&[("a", 1_i64.into()), ("b", 2_i64.into())]);
        let delta = map(&[("a", Value::Null)]);
        let merged = merge(&base, &delta).unwrap();
        assert!(!merged.at("a").is_valid());
        assert_eq!(merged.size(), 1);
    }

    #[test]
    fn new_keys_create_parents() {
        let base = map(&[("a", 1_i64.into())]);
        let delta = Object::new(Value::Map);
        let nested = delta.insert("b", Value::Map).unwrap();
        nested.insert("c", true).unwrap();
        nested.insert("d", Value::Null).unwrap();

        let merged = merge(&base, &delta).unwrap();
        assert_eq!(merged.at("b").at("c").value(), Value::Bool(true));
        assert!(!merged.at("b").at("d").is_valid());
    }

    #[test]
    fn unchanged_is_empty() {
        let base = map(&[("a", 1_i64.into()), ("b", Value::Null)]);
        let modified = map(&[("a", 1_i64.into())]);
        let delta = diff(&base, &modified).unwrap();
        assert_eq!(delta.value(), Value::Map);
        assert_eq!(delta.size(), 0);
        assert!(merge(&base, &delta).unwrap().identical(&base));
    }

    #[test]
    fn laws_hold_for_maps() {
        let base = map(&[("a", 1_i64.into()), ("b", "x".into()), ("c", 2.5_f64.into())]);
        let inner = base.insert("inner", Value::Map).unwrap();
        inner.insert("flag", false).unwrap();

        let modified = map(&[("b", "y".into()), ("c", 2.5_f64.into()), ("d", Value::Null)]);
        let inner = modified.insert("inner", Value::Map).unwrap();
        inner.insert("flag", true).unwrap();
        inner.insert("extra", 7_i64).unwrap();
        modified.insert("items", Value::List).unwrap().append(1_i64).unwrap();

        assert_laws(&base, &modified);
    }

    #[test]
    fn laws_hold_for_lists() {
        assert_laws(&list(&[1, 2, 3]), &list(&[1, 2]));
        assert_laws(&list(&[1, 2, 3]), &list(&[1, 5, 3, 4, 9]));
        assert_laws(&list(&[1, 2, 3]), &list(&[2, 3]));
        assert_laws(&list(&[]), &list(&[4]));
    }

    #[test]
    fn laws_hold_for_type_changes() {
        let base = map(&[("a", 1_i64.into())]);
        let modified = map(&[("a", "now text".into())]);
        assert_laws(&base, &modified);

        let modified = Object::new(Value::Map);
        modified.insert("a", Value::List).unwrap().append(1_i64).unwrap();
        assert_laws(&base, &modified);

        assert_laws(&base, &Object::new(5_i64));
        assert_laws(&Object::new(5_i64), &base);
    }

    #[test]
    fn list_replaced_by_map() {
        let base = list(&[1, 2]);
        assert_laws(&base, &map(&[("a", 5_i64.into())]));

        let indexed = map(&[("0", 5_i64.into())]);
        assert_eq!(diff(&base, &indexed), Err(ObjectError::AmbiguousDelta));

        let nested = Object::new(Value::Map);
        nested.insert("items", Value::List).unwrap().append(1_i64).unwrap();
        let modified = Object::new(Value::Map);
        modified.insert("items", Value::Map).unwrap().insert("1", true).unwrap();
        assert_eq!(diff(&nested, &modified), Err(ObjectError::AmbiguousDelta));
    }

    #[test]
    fn nested_lists_of_maps() {
        let base = Object::new(Value::List);
        for i in 0..3_i64 {
            base.append(Value::Map).unwrap().insert("id", i).unwrap();
        }
        let modified = base.clone_tree();
        modified.at(1).insert("name", "second").unwrap();
        modified.at(2).erase().unwrap();

        let delta = diff(&base, &modified).unwrap();
        assert_eq!(delta.at("1").at("name").value(), Value::Str("second".into()));
        assert_eq!(delta.at("2").value(), Value::Null);
        assert_laws(&base, &modified);
    }
}
