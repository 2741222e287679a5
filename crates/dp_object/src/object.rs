use alloc::rc::Rc;
use alloc::string::String;
use core::cell::{Ref, RefCell};
use core::fmt;
use core::ops::Deref;

use crate::arena::State;
use crate::{ObjectError, Primitive, Value};

// -----------------------------------------------------------------------------
// ObjectIndex

/// A lookup key for [`ConstObject::at`]: a map key or a child position.
pub trait ObjectIndex {
    #[doc(hidden)]
    fn find_in(&self, parent: &ConstObject) -> Option<usize>;
}

impl ObjectIndex for &str {
    #[inline]
    fn find_in(&self, parent: &ConstObject) -> Option<usize> {
        parent.state.borrow().find_key(parent.index?, self)
    }
}

impl ObjectIndex for &String {
    #[inline]
    fn find_in(&self, parent: &ConstObject) -> Option<usize> {
        parent.state.borrow().find_key(parent.index?, self)
    }
}

impl ObjectIndex for usize {
    #[inline]
    fn find_in(&self, parent: &ConstObject) -> Option<usize> {
        parent.state.borrow().nth_child(parent.index?, *self)
    }
}

// -----------------------------------------------------------------------------
// ConstObject

/// A read-only handle to a node of a value tree.
///
/// Handles are cheap: a reference-counted pointer to the shared arena plus a
/// node index. The arena lives as long as its longest-surviving handle.
///
/// A handle may be *invalid* (no node), which is what lookups return on a miss.
/// Reading the value of an invalid handle yields [`Value::Null`].
///
/// # Panics
///
/// Borrows returned by [`get`](Self::get) keep the arena borrowed; mutating the
/// same arena through an [`Object`] while such a borrow is alive panics.
#[derive(Clone)]
pub struct ConstObject {
    pub(crate) state: Rc<RefCell<State>>,
    pub(crate) index: Option<usize>,
}

impl ConstObject {
    #[inline]
    pub(crate) fn with_index(&self, index: Option<usize>) -> Self {
        Self {
            state: self.state.clone(),
            index,
        }
    }

    #[inline]
    fn link(&self, select: impl FnOnce(&State, usize) -> Option<usize>) -> Self {
        let index = self.index.and_then(|index| select(&self.state.borrow(), index));
        self.with_index(index)
    }

    /// Returns `false` for handles that designate no node.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.index.is_some()
    }

    /// Returns `true` if both handles point into the same arena.
    #[inline]
    pub fn same_arena(&self, other: &ConstObject) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    #[inline]
    pub fn root(&self) -> ConstObject {
        self.with_index(Some(0))
    }

    #[inline]
    pub fn parent(&self) -> ConstObject {
        self.link(|state, index| state.node(index).parent)
    }

    #[inline]
    pub fn child(&self) -> ConstObject {
        self.link(|state, index| state.node(index).child)
    }

    #[inline]
    pub fn next(&self) -> ConstObject {
        self.link(|state, index| state.node(index).next)
    }

    #[inline]
    pub fn prev(&self) -> ConstObject {
        self.link(|state, index| state.node(index).prev)
    }

    /// Looks up a child by key (maps) or by position (any container).
    ///
    /// Returns an invalid handle if there is no such child.
    ///
    /// # Examples
    ///
    /// ```
    /// use dp_object::{Object, Value};
    ///
    /// let object = Object::new(Value::Map);
    /// object.insert("a", 1_i64).unwrap();
    ///
    /// assert!(object.at("a").is_valid());
    /// assert!(!object.at("b").is_valid());
    /// assert!(object.at(0).is_valid());
    /// ```
    #[inline]
    pub fn at<I: ObjectIndex>(&self, index: I) -> ConstObject {
        self.with_index(index.find_in(self))
    }

    /// Iterates over the direct children of this node.
    #[inline]
    pub fn children(&self) -> Children {
        Children {
            cursor: self.child(),
        }
    }

    /// Returns a copy of the node's value, or null for an invalid handle.
    pub fn value(&self) -> Value {
        match self.index {
            Some(index) => self.state.borrow().node(index).value.clone(),
            None => Value::Null,
        }
    }

    pub fn key(&self) -> Option<String> {
        let index = self.index?;
        self.state.borrow().node(index).key.clone()
    }

    /// Borrows the payload of the node as `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dp_object::{Object, ObjectError, Value};
    ///
    /// let object = Object::new(Value::Int(5));
    /// assert_eq!(*object.get::<i64>().unwrap(), 5);
    /// assert!(matches!(object.get::<bool>(), Err(ObjectError::WrongType { .. })));
    /// ```
    pub fn get<T: Primitive>(&self) -> Result<Ref<'_, T>, ObjectError> {
        let index = self.index.ok_or(ObjectError::InvalidHandle)?;
        Ref::filter_map(self.state.borrow(), |state| {
            T::from_value(&state.node(index).value)
        })
        .map_err(|state| ObjectError::WrongType {
            expected: T::KIND,
            found: state.node(index).value.kind(),
        })
    }

    /// Like [`get`](Self::get), but returns `None` on a wrong type or an invalid handle.
    pub fn get_if<T: Primitive>(&self) -> Option<Ref<'_, T>> {
        self.get().ok()
    }

    /// Returns the number of children.
    pub fn size(&self) -> usize {
        match self.index {
            Some(index) => self.state.borrow().count(index),
            None => 0,
        }
    }

    /// Returns `true` for null values, invalid handles and maps with only
    /// null-like entries.
    pub fn is_null_like(&self) -> bool {
        match self.index {
            Some(index) => self.state.borrow().is_null_like(index),
            None => true,
        }
    }

    /// Deep-copies this subtree into a fresh arena.
    ///
    /// The copy is a root, so the key of this node is not carried over.
    pub fn clone_tree(&self) -> Object {
        let object = Object::new(self.value());
        if let Some(index) = self.index {
            let src = self.state.borrow();
            object.state.borrow_mut().copy_children(0, &src, index, false);
        }
        object
    }
}

impl fmt::Debug for ConstObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.value();
        match value {
            Value::Map => {
                let mut map = f.debug_map();
                for child in self.children() {
                    map.entry(&child.key().unwrap_or_default(), &child);
                }
                map.finish()
            }
            Value::List => f.debug_list().entries(self.children()).finish(),
            other => fmt::Debug::fmt(&other, f),
        }
    }
}

// -----------------------------------------------------------------------------
// Children

/// Iterator over the children of a node, see [`ConstObject::children`].
pub struct Children {
    cursor: ConstObject,
}

impl Iterator for Children {
    type Item = ConstObject;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.cursor.is_valid() {
            return None;
        }
        let next = self.cursor.next();
        Some(core::mem::replace(&mut self.cursor, next))
    }
}

// -----------------------------------------------------------------------------
// Object

/// A mutable handle to a node of a value tree.
///
/// Dereferences to [`ConstObject`] for every read-only operation; navigation
/// methods are shadowed here so that they keep returning mutable handles.
///
/// # Examples
///
/// ```
/// use dp_object::{Object, Value};
///
/// let object = Object::new(Value::Map);
/// let items = object.insert("items", Value::List).unwrap();
/// items.append(1_i64).unwrap();
/// items.append(2_i64).unwrap();
///
/// assert_eq!(object.at("items").size(), 2);
/// assert_eq!(*object.at("items").at(1).get::<i64>().unwrap(), 2);
/// ```
#[derive(Clone)]
pub struct Object(ConstObject);

impl Default for Object {
    /// Creates a new arena holding a null root.
    #[inline]
    fn default() -> Self {
        Object::new(Value::Null)
    }
}

impl Default for ConstObject {
    #[inline]
    fn default() -> Self {
        Object::default().0
    }
}

impl Deref for Object {
    type Target = ConstObject;

    #[inline]
    fn deref(&self) -> &ConstObject {
        &self.0
    }
}

impl From<Object> for ConstObject {
    #[inline]
    fn from(value: Object) -> Self {
        value.0
    }
}

impl fmt::Debug for Object {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Object {
    /// Creates a new arena whose root holds `value`.
    pub fn new(value: impl Into<Value>) -> Self {
        Self(ConstObject {
            state: Rc::new(RefCell::new(State::new(value.into()))),
            index: Some(0),
        })
    }

    #[inline]
    fn wrap(inner: ConstObject) -> Self {
        Self(inner)
    }

    /// Returns a read-only handle to the same node.
    #[inline]
    pub fn as_const(&self) -> ConstObject {
        self.0.clone()
    }

    #[inline]
    pub fn root(&self) -> Object {
        Self::wrap(self.0.root())
    }

    #[inline]
    pub fn parent(&self) -> Object {
        Self::wrap(self.0.parent())
    }

    #[inline]
    pub fn child(&self) -> Object {
        Self::wrap(self.0.child())
    }

    #[inline]
    pub fn next(&self) -> Object {
        Self::wrap(self.0.next())
    }

    #[inline]
    pub fn prev(&self) -> Object {
        Self::wrap(self.0.prev())
    }

    #[inline]
    pub fn at<I: ObjectIndex>(&self, index: I) -> Object {
        Self::wrap(self.0.at(index))
    }

    #[inline]
    pub fn children(&self) -> impl Iterator<Item = Object> + use<> {
        self.0.children().map(Self::wrap)
    }

    fn valid_index(&self) -> Result<usize, ObjectError> {
        self.0.index.ok_or(ObjectError::InvalidHandle)
    }

    /// Adds a keyed entry to a map node and returns a handle to it.
    ///
    /// If the key already exists its entry is replaced in place.
    ///
    /// # Errors
    ///
    /// Fails with [`ObjectError::NotAMap`] if this node is not a map.
    pub fn insert(&self, key: &str, value: impl Into<Value>) -> Result<Object, ObjectError> {
        let index = self.valid_index()?;
        let value = value.into();
        let mut state = self.0.state.borrow_mut();

        let kind = state.node(index).value.kind();
        if !matches!(state.node(index).value, Value::Map) {
            return Err(ObjectError::NotAMap(kind));
        }

        let child = match state.find_key(index, key) {
            Some(existing) => {
                state.clear(existing);
                state.node_mut(existing).value = value;
                existing
            }
            None => state.push_child(index, Some(String::from(key)), value),
        };
        Ok(self.with(child))
    }

    /// Adds an unkeyed entry at the end of a list node and returns a handle to it.
    ///
    /// # Errors
    ///
    /// Fails with [`ObjectError::NotAList`] if this node is not a list.
    pub fn append(&self, value: impl Into<Value>) -> Result<Object, ObjectError> {
        let index = self.valid_index()?;
        let value = value.into();
        let mut state = self.0.state.borrow_mut();

        if !matches!(state.node(index).value, Value::List) {
            return Err(ObjectError::NotAList(state.node(index).value.kind()));
        }

        let child = state.push_child(index, None, value);
        Ok(self.with(child))
    }

    #[inline]
    fn with(&self, index: usize) -> Object {
        Self::wrap(self.0.with_index(Some(index)))
    }

    /// Replaces the value of this node, dropping any children.
    pub fn set(&self, value: impl Into<Value>) -> Result<(), ObjectError> {
        let index = self.valid_index()?;
        let mut state = self.0.state.borrow_mut();
        state.clear(index);
        state.node_mut(index).value = value.into();
        Ok(())
    }

    /// Removes this node and its subtree from the tree.
    ///
    /// Erasing a root resets it to null. The handle must not be used afterwards.
    pub fn erase(&self) -> Result<(), ObjectError> {
        let index = self.valid_index()?;
        self.0.state.borrow_mut().erase(index);
        Ok(())
    }

    /// Removes every child of this node, keeping its value.
    pub fn clear(&self) -> Result<(), ObjectError> {
        let index = self.valid_index()?;
        self.0.state.borrow_mut().clear(index);
        Ok(())
    }

    /// Replaces this node with a copy of `src`.
    ///
    /// With `strip_nulls`, null-like map entries of `src` are not copied.
    pub(crate) fn assign(&self, src: &ConstObject, strip_nulls: bool) -> Result<(), ObjectError> {
        let index = self.valid_index()?;
        // `src` may live below this node, copy it out before clearing.
        let detached = self.same_arena(src).then(|| src.clone_tree());
        let src = detached.as_deref().unwrap_or(src);

        self.set(src.value())?;
        if let Some(src_index) = src.index {
            let from = src.state.borrow();
            self.0
                .state
                .borrow_mut()
                .copy_children(index, &from, src_index, strip_nulls);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::Object;
    use crate::{ObjectError, Value, ValueKind};

    #[test]
    fn lookup_miss_is_invalid() {
        let object = Object::new(Value::Map);
        object.insert("a", 1_i64).unwrap();
        let missing = object.at("b");
        assert!(!missing.is_valid());
        assert_eq!(missing.value(), Value::Null);
        assert_eq!(missing.size(), 0);
        assert!(!missing.at("c").is_valid());
        assert!(matches!(missing.get::<i64>(), Err(ObjectError::InvalidHandle)));
    }

    #[test]
    fn insert_rejects_lists() {
        let object = Object::new(Value::List);
        object.append(1_i64).unwrap();
        assert_eq!(
            object.insert("a", 2_i64).unwrap_err(),
            ObjectError::NotAMap(ValueKind::List)
        );

        let scalar = Object::new(Value::Int(1));
        assert_eq!(
            scalar.append(2_i64).unwrap_err(),
            ObjectError::NotAList(ValueKind::Int)
        );
    }

    #[test]
    fn insert_replaces_existing_key() {
        let object = Object::new(Value::Map);
        let inner = object.insert("a", Value::List).unwrap();
        inner.append(1_i64).unwrap();
        object.insert("a", "text").unwrap();
        assert_eq!(object.size(), 1);
        assert_eq!(&*object.at("a").get::<String>().unwrap(), "text");
        assert_eq!(object.at("a").size(), 0);
    }

    #[test]
    fn navigation() {
        let object = Object::new(Value::List);
        for i in 0..3_i64 {
            object.append(i).unwrap();
        }
        let first = object.child();
        assert_eq!(first.key(), None);
        assert_eq!(first.next().value(), Value::Int(1));
        assert_eq!(first.next().next().prev().value(), Value::Int(1));
        assert!(!first.prev().is_valid());
        assert!(first.parent().same_arena(&object));
        assert_eq!(first.parent().size(), 3);
        assert_eq!(first.root().size(), 3);

        let values: Vec<Value> = object.children().map(|child| child.value()).collect();
        assert_eq!(values, [Value::Int(0), Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn handles_share_the_arena() {
        let object = Object::new(Value::Map);
        let alias = object.clone();
        object.insert("a", 1_i64).unwrap();
        assert_eq!(alias.size(), 1);

        let read_only = alias.as_const();
        object.at("a").set(2_i64).unwrap();
        assert_eq!(read_only.at("a").value(), Value::Int(2));
    }

    #[test]
    fn erase_and_clear() {
        let object = Object::new(Value::Map);
        object.insert("a", 1_i64).unwrap();
        object.insert("b", 2_i64).unwrap();
        object.insert("c", 3_i64).unwrap();

        object.at("b").erase().unwrap();
        let keys: Vec<String> = object.children().filter_map(|c| c.key()).collect();
        assert_eq!(keys, ["a", "c"]);

        object.clear().unwrap();
        assert_eq!(object.size(), 0);
        assert_eq!(object.value(), Value::Map);

        object.erase().unwrap();
        assert_eq!(object.value(), Value::Null);
    }

    #[test]
    fn clone_is_deep() {
        let object = Object::new(Value::Map);
        let list = object.insert("list", Value::List).unwrap();
        list.append("x").unwrap();

        let copy = object.at("list").clone_tree();
        assert!(!copy.same_arena(&object));
        assert_eq!(copy.key(), None);
        copy.append("y").unwrap();
        assert_eq!(object.at("list").size(), 1);
        assert_eq!(copy.size(), 2);
    }

    #[test]
    fn typed_getters() {
        let object = Object::new(Value::Binary(alloc::vec![1, 2, 3]));
        assert_eq!(object.get::<Vec<u8>>().unwrap().as_slice(), &[1, 2, 3]);
        assert!(object.get_if::<f64>().is_none());
        assert_eq!(
            object.get::<f64>().unwrap_err(),
            ObjectError::WrongType {
                expected: ValueKind::Float,
                found: ValueKind::Binary,
            }
        );
    }
}
