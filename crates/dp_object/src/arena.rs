use alloc::string::String;
use alloc::vec::Vec;

use crate::Value;

// -----------------------------------------------------------------------------
// Node

/// One element of the tree.
///
/// Children of a node form a doubly linked list through `prev`/`next`,
/// from `child` to `last`. A node without `parent` is a root.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub value: Value,
    pub key: Option<String>,
    pub parent: Option<usize>,
    pub child: Option<usize>,
    pub last: Option<usize>,
    pub prev: Option<usize>,
    pub next: Option<usize>,
}

impl Node {
    #[inline]
    fn new(value: Value, key: Option<String>, parent: Option<usize>, prev: Option<usize>) -> Self {
        Self {
            value,
            key,
            parent,
            child: None,
            last: None,
            prev,
            next: None,
        }
    }
}

// -----------------------------------------------------------------------------
// State

/// Append-only node storage with a free stack for erased slots.
///
/// The root always lives at index `0`.
#[derive(Debug, Clone)]
pub(crate) struct State {
    nodes: Vec<Node>,
    free: Vec<usize>,
}

impl State {
    pub fn new(root: Value) -> Self {
        Self {
            nodes: alloc::vec![Node::new(root, None, None, None)],
            free: Vec::new(),
        }
    }

    #[inline]
    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    #[inline]
    pub fn node_mut(&mut self, index: usize) -> &mut Node {
        &mut self.nodes[index]
    }

    /// Creates a node and links it as the last child of `parent`.
    pub fn push_child(&mut self, parent: usize, key: Option<String>, value: Value) -> usize {
        let prev = self.nodes[parent].last;
        let node = Node::new(value, key, Some(parent), prev);

        let index = match self.free.pop() {
            Some(index) => {
                self.nodes[index] = node;
                index
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };

        match prev {
            Some(prev) => self.nodes[prev].next = Some(index),
            None => self.nodes[parent].child = Some(index),
        }
        self.nodes[parent].last = Some(index);
        index
    }

    pub fn find_key(&self, parent: usize, key: &str) -> Option<usize> {
        self.children(parent)
            .find(|&index| self.nodes[index].key.as_deref() == Some(key))
    }

    #[inline]
    pub fn nth_child(&self, parent: usize, n: usize) -> Option<usize> {
        self.children(parent).nth(n)
    }

    #[inline]
    pub fn count(&self, parent: usize) -> usize {
        self.children(parent).count()
    }

    pub fn children(&self, parent: usize) -> impl Iterator<Item = usize> + '_ {
        let mut cursor = self.nodes[parent].child;
        core::iter::from_fn(move || {
            let current = cursor?;
            cursor = self.nodes[current].next;
            Some(current)
        })
    }

    /// Detaches `index` from its parent and siblings, then releases its subtree.
    ///
    /// The root cannot be detached, it is reset to null instead.
    pub fn erase(&mut self, index: usize) {
        let Some(parent) = self.nodes[index].parent else {
            self.clear(index);
            self.nodes[index].value = Value::Null;
            return;
        };

        let (prev, next) = (self.nodes[index].prev, self.nodes[index].next);
        match prev {
            Some(prev) => self.nodes[prev].next = next,
            None => self.nodes[parent].child = next,
        }
        match next {
            Some(next) => self.nodes[next].prev = prev,
            None => self.nodes[parent].last = prev,
        }

        self.release(index);
    }

    /// Releases every child of `index`.
    pub fn clear(&mut self, index: usize) {
        self.nodes[index].last = None;
        let mut cursor = self.nodes[index].child.take();
        while let Some(current) = cursor {
            cursor = self.nodes[current].next;
            self.release(current);
        }
    }

    fn release(&mut self, index: usize) {
        let mut pending = alloc::vec![index];
        while let Some(current) = pending.pop() {
            let node = &mut self.nodes[current];
            let mut cursor = node.child.take();
            node.last = None;
            node.value = Value::Null;
            node.key = None;
            node.parent = None;
            node.prev = None;
            node.next = None;
            while let Some(child) = cursor {
                cursor = self.nodes[child].next;
                pending.push(child);
            }
            self.free.push(current);
        }
    }

    /// Copies the subtree at `src_index` of `src` below `parent` in `self`.
    ///
    /// With `strip_nulls`, map entries that are null-like are skipped.
    pub fn copy_children(&mut self, parent: usize, src: &State, src_index: usize, strip_nulls: bool) {
        let mut pending = alloc::vec![(parent, src_index)];
        while let Some((dst, from)) = pending.pop() {
            let is_map = matches!(src.nodes[from].value, Value::Map);
            for child in src.children(from) {
                if strip_nulls && is_map && src.is_null_like(child) {
                    continue;
                }
                let node = &src.nodes[child];
                let copy = self.push_child(dst, node.key.clone(), node.value.clone());
                if node.child.is_some() {
                    pending.push((copy, child));
                }
            }
        }
    }

    /// Returns `true` for null and for maps whose entries are all null-like.
    pub fn is_null_like(&self, index: usize) -> bool {
        match self.nodes[index].value {
            Value::Null => true,
            Value::Map => self.children(index).all(|child| self.is_null_like(child)),
            _ => false,
        }
    }
}
