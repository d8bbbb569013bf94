use std::{fmt, marker::PhantomData};

use super::node::{first, last, predecessor, successor, Link, Node};
use super::RbTree;
use crate::alloc::Allocator;

/// Read-only position in an [`RbTree`]: either an element or the end.
///
/// The end sits both after the last and before the first element, so moving
/// forward from the end goes to the first element and moving back goes to the last.
///
/// Two cursors are equal when they denote the same element, or are both at the end.
pub struct Cursor<'a, K, V> {
    current: Link<K, V>,
    root: Link<K, V>,
    _pd: PhantomData<&'a Node<K, V>>,
}

unsafe impl<K: Sync, V: Sync> Send for Cursor<'_, K, V> {}
unsafe impl<K: Sync, V: Sync> Sync for Cursor<'_, K, V> {}

impl<'a, K, V> Clone for Cursor<'a, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<'a, K, V> Copy for Cursor<'a, K, V> {}

impl<'a, K, V> PartialEq for Cursor<'a, K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}
impl<'a, K, V> Eq for Cursor<'a, K, V> {}

impl<'a, K: fmt::Debug, V: fmt::Debug> fmt::Debug for Cursor<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.key_value()).finish()
    }
}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(crate) fn new(root: Link<K, V>, current: Link<K, V>) -> Self {
        Self {
            current,
            root,
            _pd: PhantomData,
        }
    }

    /// Is the cursor at the end (no element)?
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// The current key, `None` at the end.
    pub fn key(&self) -> Option<&'a K> {
        self.current.map(|n| unsafe { &node!(n).key })
    }

    /// The current value, `None` at the end.
    pub fn value(&self) -> Option<&'a V> {
        self.current.map(|n| unsafe { &node!(n).value })
    }

    /// The current key and value, `None` at the end.
    pub fn key_value(&self) -> Option<(&'a K, &'a V)> {
        self.current.map(|n| unsafe { (&node!(n).key, &node!(n).value) })
    }

    /// Move to the in-order successor. From the last element this goes to the end,
    /// from the end to the first element.
    pub fn move_next(&mut self) {
        self.current = match self.current {
            Some(n) => unsafe { successor(n) },
            None => self.root.map(|r| unsafe { first(r) }),
        };
    }

    /// Move to the in-order predecessor. From the first element this goes to the end,
    /// from the end to the last element.
    pub fn move_prev(&mut self) {
        self.current = match self.current {
            Some(n) => unsafe { predecessor(n) },
            None => self.root.map(|r| unsafe { last(r) }),
        };
    }

    /// The element [`Cursor::move_next`] would move to.
    pub fn peek_next(&self) -> Option<(&'a K, &'a V)> {
        let mut c = *self;
        c.move_next();
        c.key_value()
    }

    /// The element [`Cursor::move_prev`] would move to.
    pub fn peek_prev(&self) -> Option<(&'a K, &'a V)> {
        let mut c = *self;
        c.move_prev();
        c.key_value()
    }
}

/// Position in an [`RbTree`] that allows values to be updated and elements removed.
///
/// Keys cannot be changed through the cursor, so the order is preserved.
pub struct CursorMut<'a, K, V, C, A: Allocator> {
    current: Link<K, V>,
    tree: &'a mut RbTree<K, V, C, A>,
}

impl<'a, K: fmt::Debug, V: fmt::Debug, C, A: Allocator> fmt::Debug for CursorMut<'a, K, V, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorMut").field(&self.key_value()).finish()
    }
}

impl<'a, K, V, C, A: Allocator> CursorMut<'a, K, V, C, A> {
    pub(crate) fn new(tree: &'a mut RbTree<K, V, C, A>, current: Link<K, V>) -> Self {
        Self { current, tree }
    }

    /// Read-only view of this position.
    pub fn as_cursor(&self) -> Cursor<'_, K, V> {
        Cursor::new(self.tree.root, self.current)
    }

    /// Is the cursor at the end (no element)?
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// The current key, `None` at the end.
    pub fn key(&self) -> Option<&K> {
        self.current.map(|n| unsafe { &node!(n).key })
    }

    /// The current key and value, `None` at the end.
    pub fn key_value(&self) -> Option<(&K, &V)> {
        self.current.map(|n| unsafe { (&node!(n).key, &node!(n).value) })
    }

    /// Mutable reference to the current value, `None` at the end.
    pub fn value_mut(&mut self) -> Option<&mut V> {
        self.current.map(|n| unsafe { &mut node!(n).value })
    }

    /// The current key and a mutable reference to its value, `None` at the end.
    pub fn key_value_mut(&mut self) -> Option<(&K, &mut V)> {
        self.current.map(|n| unsafe { (&node!(n).key, &mut node!(n).value) })
    }

    /// Convert into a mutable reference to the current value that outlives the cursor.
    pub fn into_value_mut(self) -> Option<&'a mut V> {
        self.current.map(|n| unsafe { &mut node!(n).value })
    }

    /// Move to the in-order successor, wrapping through the end like [`Cursor::move_next`].
    pub fn move_next(&mut self) {
        self.current = match self.current {
            Some(n) => unsafe { successor(n) },
            None => self.tree.root.map(|r| unsafe { first(r) }),
        };
    }

    /// Move to the in-order predecessor, wrapping through the end like [`Cursor::move_prev`].
    pub fn move_prev(&mut self) {
        self.current = match self.current {
            Some(n) => unsafe { predecessor(n) },
            None => self.tree.root.map(|r| unsafe { last(r) }),
        };
    }

    /// Remove the current element and move to its successor.
    /// Does nothing and returns `None` at the end.
    pub fn remove_current(&mut self) -> Option<(K, V)> {
        let n = self.current?;
        unsafe {
            // Removal relinks but never moves nodes, so the successor stays valid.
            self.current = successor(n);
            Some(self.tree.remove_node(n))
        }
    }
}
