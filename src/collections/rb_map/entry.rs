use std::{fmt, fmt::Debug, mem};

use crate::alloc::{AllocError, Allocator};
use crate::collections::rb_tree::{key_value, key_value_mut, NodePtr, RbTree, Slot};

/// Entry in [`RbMap`](super::RbMap), returned by [`RbMap::entry`](super::RbMap::entry).
pub enum Entry<'a, K, V, C, A: Allocator> {
    /// Vacant entry - map doesn't yet contain key.
    Vacant(VacantEntry<'a, K, V, C, A>),
    /// Occupied entry - map already contains key.
    Occupied(OccupiedEntry<'a, K, V, C, A>),
}

impl<'a, K: Debug, V: Debug, C, A: Allocator> Debug for Entry<'a, K, V, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Vacant(e) => f.debug_tuple("Entry").field(e).finish(),
            Entry::Occupied(e) => f.debug_tuple("Entry").field(e).finish(),
        }
    }
}

impl<'a, K, V, C, A: Allocator> Entry<'a, K, V, C, A> {
    /// Get reference to entry key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Vacant(e) => &e.key,
            Entry::Occupied(e) => e.key(),
        }
    }

    /// Insert default value, returning mutable reference to inserted value.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        match self {
            Entry::Vacant(e) => e.insert(Default::default()),
            Entry::Occupied(e) => e.into_mut(),
        }
    }

    /// Insert value, returning mutable reference to inserted value.
    pub fn or_insert(self, value: V) -> &'a mut V {
        match self {
            Entry::Vacant(e) => e.insert(value),
            Entry::Occupied(e) => e.into_mut(),
        }
    }

    /// Insert default value obtained from function, returning mutable reference to inserted value.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Vacant(e) => e.insert(default()),
            Entry::Occupied(e) => e.into_mut(),
        }
    }

    /// Insert default value obtained from function called with key,
    /// returning mutable reference to inserted value.
    pub fn or_insert_with_key<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce(&K) -> V,
    {
        match self {
            Entry::Vacant(e) => {
                let value = default(e.key());
                e.insert(value)
            }
            Entry::Occupied(e) => e.into_mut(),
        }
    }

    /// Modify existing value ( if entry is occupied ).
    pub fn and_modify<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        if let Entry::Occupied(e) = &mut self {
            f(e.get_mut());
        }
        self
    }
}

/// Vacant [Entry]. Remembers where the key belongs, so inserting does not search again.
pub struct VacantEntry<'a, K, V, C, A: Allocator> {
    pub(super) key: K,
    pub(super) slot: Slot<K, V>,
    pub(super) tree: &'a mut RbTree<K, V, C, A>,
}

impl<'a, K: Debug, V, C, A: Allocator> Debug for VacantEntry<'a, K, V, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VacantEntry").field(self.key()).finish()
    }
}

impl<'a, K, V, C, A: Allocator> VacantEntry<'a, K, V, C, A> {
    /// Get reference to entry key.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Get entry key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Insert value into map returning reference to inserted value.
    pub fn insert(self, value: V) -> &'a mut V {
        match self.try_insert(value) {
            Ok(v) => v,
            Err(AllocError) => std::alloc::handle_alloc_error(RbTree::<K, V>::node_layout()),
        }
    }

    /// Insert value into map returning reference to inserted value, or an error
    /// if the node cannot be allocated (the map is then unchanged).
    pub fn try_insert(self, value: V) -> Result<&'a mut V, AllocError> {
        let n = unsafe { self.tree.insert_at(self.slot, self.key, value)? };
        Ok(unsafe { key_value_mut(n).1 })
    }
}

/// Occupied [Entry].
pub struct OccupiedEntry<'a, K, V, C, A: Allocator> {
    pub(super) node: NodePtr<K, V>,
    pub(super) tree: &'a mut RbTree<K, V, C, A>,
}

impl<K: Debug, V: Debug, C, A: Allocator> Debug for OccupiedEntry<'_, K, V, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OccupiedEntry")
            .field("key", self.key())
            .field("value", self.get())
            .finish()
    }
}

impl<'a, K, V, C, A: Allocator> OccupiedEntry<'a, K, V, C, A> {
    /// Get reference to entry key.
    #[must_use]
    pub fn key(&self) -> &K {
        unsafe { key_value(self.node).0 }
    }

    /// Remove (key,value) from map, returning key and value.
    pub fn remove_entry(self) -> (K, V) {
        unsafe { self.tree.remove_node(self.node) }
    }

    /// Remove (key,value) from map, returning the value.
    pub fn remove(self) -> V {
        self.remove_entry().1
    }

    /// Get reference to the value.
    #[must_use]
    pub fn get(&self) -> &V {
        unsafe { key_value(self.node).1 }
    }

    /// Get mutable reference to the value.
    pub fn get_mut(&mut self) -> &mut V {
        unsafe { key_value_mut(self.node).1 }
    }

    /// Get mutable reference to the value, consuming the entry.
    #[must_use]
    pub fn into_mut(self) -> &'a mut V {
        unsafe { key_value_mut(self.node).1 }
    }

    /// Update the value returns the old value.
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(self.get_mut(), value)
    }
}
