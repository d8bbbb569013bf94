//! [`RbMap`], an ordered map with unique keys built on [`RbTree`].
//!
//! # Differences compared to [`std::collections::BTreeMap`]
//!
//! [`RbMap::insert`] never replaces the value of an existing key: it reports the existing
//! element instead. Use [`RbMap::insert_or_assign`] (or the [`Entry`] API) to overwrite.
//!
//! [`RbMap::at`] returns a [`KeyNotFoundError`] for a missing key, while
//! [`RbMap::get_or_default`] inserts a default value.
//!
//! Every element lives in its own node, so references into the map are only
//! invalidated by removing that element.
//!
//! # Example
//!
//! ```
//!     use rbstd::collections::RbMap;
//!     let mut mymap = RbMap::new();
//!     mymap.insert("England", "London");
//!     mymap.insert("France", "Paris");
//!     println!("The capital of France is {}", mymap["France"]);
//!     assert_eq!(mymap.at("Spain").ok(), None);
//! ```

use std::{
    borrow::Borrow,
    error::Error,
    fmt,
    fmt::Debug,
    hash::{Hash, Hasher},
    ops::{Index, RangeBounds},
};

use crate::alloc::{AllocError, Allocator, Global};
use crate::collections::compare::{Compare, Natural};
use crate::collections::rb_tree::{
    Cursor, CursorMut, IntoIter, Iter, IterMut, Keys, Range, RbTree, Values, ValuesMut,
};

mod entry;
pub use entry::{Entry, OccupiedEntry, VacantEntry};

/// Error returned by [`RbMap::at`] and [`RbMap::at_mut`] when the key is absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyNotFoundError;

impl Error for KeyNotFoundError {}

impl fmt::Display for KeyNotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("key not found in map")
    }
}

/// Ordered map with unique keys.
pub struct RbMap<K, V, C = Natural, A: Allocator = Global> {
    tree: RbTree<K, V, C, A>,
}

impl<K, V> RbMap<K, V> {
    /// Returns a new, empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tree: RbTree::new(),
        }
    }
}

impl<K, V, C> RbMap<K, V, C> {
    /// Returns a new, empty map ordered by `cmp`.
    #[must_use]
    pub const fn with_comparator(cmp: C) -> Self {
        Self {
            tree: RbTree::with_comparator(cmp),
        }
    }
}

impl<K, V, A: Allocator> RbMap<K, V, Natural, A> {
    /// Returns a new, empty map that allocates from `alloc`.
    #[must_use]
    pub const fn new_in(alloc: A) -> Self {
        Self {
            tree: RbTree::new_in(alloc),
        }
    }
}

impl<K, V, C, A: Allocator> RbMap<K, V, C, A> {
    /// Returns a new, empty map with the specified comparator and allocator.
    #[must_use]
    pub const fn with_comparator_in(cmp: C, alloc: A) -> Self {
        Self {
            tree: RbTree::with_comparator_in(cmp, alloc),
        }
    }

    /// Get number of key-value pairs in the map.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Is the map empty?
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Clear the map.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Exchange the contents of two maps.
    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }

    /// The underlying tree, for diagnostics such as [`RbTree::validate`].
    pub fn as_tree(&self) -> &RbTree<K, V, C, A> {
        &self.tree
    }

    /// Insert key-value pair into map.
    ///
    /// If the key is already present the map is unchanged and the result is a cursor at
    /// the existing element with `false`, otherwise a cursor at the new element with `true`.
    pub fn insert(&mut self, key: K, value: V) -> (Cursor<'_, K, V>, bool)
    where
        C: Compare<K>,
    {
        self.tree.insert(key, value, true)
    }

    /// Like [`RbMap::insert`], but node allocation failure is returned as an error.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(Cursor<'_, K, V>, bool), AllocError>
    where
        C: Compare<K>,
    {
        self.tree.try_insert(key, value, true)
    }

    /// Like [`RbMap::insert`], but the node is allocated before the key is looked up.
    pub fn emplace(&mut self, key: K, value: V) -> (Cursor<'_, K, V>, bool)
    where
        C: Compare<K>,
    {
        self.tree.emplace(key, value, true)
    }

    /// Insert key-value pair, replacing the value if the key is present.
    /// Returns the replaced value.
    pub fn insert_or_assign(&mut self, key: K, value: V) -> Option<V>
    where
        C: Compare<K>,
    {
        match self.entry(key) {
            Entry::Occupied(mut e) => Some(e.insert(value)),
            Entry::Vacant(e) => {
                e.insert(value);
                None
            }
        }
    }

    /// Get the [`Entry`] for the key.
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, C, A>
    where
        C: Compare<K>,
    {
        match self.tree.search_slot(&key, true) {
            Err(node) => Entry::Occupied(OccupiedEntry {
                node,
                tree: &mut self.tree,
            }),
            Ok(slot) => Entry::Vacant(VacantEntry {
                key,
                slot,
                tree: &mut self.tree,
            }),
        }
    }

    /// Mutable reference to the value for `key`, inserting `V::default()` first if absent.
    pub fn get_or_default(&mut self, key: K) -> &mut V
    where
        C: Compare<K>,
        V: Default,
    {
        self.entry(key).or_default()
    }

    /// Reference to the value for `key`, or [`KeyNotFoundError`].
    pub fn at<Q>(&self, key: &Q) -> Result<&V, KeyNotFoundError>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.get(key).ok_or(KeyNotFoundError)
    }

    /// Mutable reference to the value for `key`, or [`KeyNotFoundError`].
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V, KeyNotFoundError>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.get_mut(key).ok_or(KeyNotFoundError)
    }

    /// Cursor at the element with the key, or at the end.
    pub fn find<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.find(key)
    }

    /// Mutable cursor at the element with the key, or at the end.
    pub fn find_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V, C, A>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.find_mut(key)
    }

    /// Does the map have an entry for the specified key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.contains_key(key)
    }

    /// Get reference to the value corresponding to the key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.get(key)
    }

    /// Get a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.get_mut(key)
    }

    /// Get references to the corresponding key and value.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.get_key_value(key)
    }

    /// Remove key-value pair from map, returning just the value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.remove_entry(key).map(|(_k, v)| v)
    }

    /// Remove key-value pair from map.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.remove_entry(key)
    }

    /// Remove the entry for the key, returning how many were removed (0 or 1).
    pub fn erase<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.erase(key)
    }

    /// Get references to first key and value.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.first_key_value()
    }

    /// Get references to last key and value.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree.last_key_value()
    }

    /// Remove first key-value pair from map.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.tree.pop_first()
    }

    /// Remove last key-value pair from map.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.tree.pop_last()
    }

    /// Cursor at the first element whose key is not less than `key`.
    pub fn lower_bound<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.lower_bound(key)
    }

    /// Cursor at the first element whose key is greater than `key`.
    pub fn upper_bound<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.upper_bound(key)
    }

    /// Get iterator for range of references to key-value pairs.
    ///
    /// # Panics
    ///
    /// Panics if range `start > end`, or if range `start == end` and both bounds are `Excluded`.
    pub fn range<Q, R>(&self, range: R) -> Range<'_, K, V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
        R: RangeBounds<Q>,
    {
        self.tree.range(range)
    }

    /// Cursor at the first element.
    #[must_use]
    pub fn cursor_front(&self) -> Cursor<'_, K, V> {
        self.tree.cursor_front()
    }

    /// Cursor at the last element.
    #[must_use]
    pub fn cursor_back(&self) -> Cursor<'_, K, V> {
        self.tree.cursor_back()
    }

    /// Cursor at the end.
    #[must_use]
    pub fn cursor_end(&self) -> Cursor<'_, K, V> {
        self.tree.cursor_end()
    }

    /// Retain only the elements for which f returns true.
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.tree.retain(f);
    }

    /// Move every entry of `other` whose key is absent from `self` into `self`.
    /// Entries whose key is already present stay in `other`.
    pub fn merge<C2, A2: Allocator>(&mut self, other: &mut RbMap<K, V, C2, A2>)
    where
        C: Compare<K>,
    {
        let mut c = other.tree.cursor_front_mut();
        while let Some(k) = c.key() {
            if self.tree.contains_key(k) {
                c.move_next();
            } else if let Some((k, v)) = c.remove_current() {
                self.tree.insert(k, v, true);
            }
        }
    }

    /// Get iterator of references to key-value pairs.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.tree.iter()
    }

    /// Get iterator of mutable references to key-value pairs.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        self.tree.iter_mut()
    }

    /// Get iterator of references to keys.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        self.tree.keys()
    }

    /// Get iterator of references to values.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        self.tree.values()
    }

    /// Get iterator of mutable references to values.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        self.tree.values_mut()
    }
}

impl<K, V, C: Default, A: Allocator + Default> Default for RbMap<K, V, C, A> {
    fn default() -> Self {
        Self {
            tree: RbTree::default(),
        }
    }
}

impl<K: Clone, V: Clone, C: Clone, A: Allocator + Clone> Clone for RbMap<K, V, C, A> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<K: Debug, V: Debug, C, A: Allocator> Debug for RbMap<K, V, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq, C, A: Allocator> PartialEq for RbMap<K, V, C, A> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}
impl<K: Eq, V: Eq, C, A: Allocator> Eq for RbMap<K, V, C, A> {}

impl<K: Hash, V: Hash, C, A: Allocator> Hash for RbMap<K, V, C, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for elt in self.iter() {
            elt.hash(state);
        }
    }
}

impl<K, V, C, A: Allocator> IntoIterator for RbMap<K, V, C, A> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, C, A>;

    /// Convert RbMap to [`IntoIter`].
    fn into_iter(self) -> IntoIter<K, V, C, A> {
        self.tree.into_iter()
    }
}
impl<'a, K, V, C, A: Allocator> IntoIterator for &'a RbMap<K, V, C, A> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}
impl<'a, K, V, C, A: Allocator> IntoIterator for &'a mut RbMap<K, V, C, A> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;
    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RbMap<K, V> {
    /// Build a map; for duplicate keys the first pair wins.
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> RbMap<K, V> {
        let mut map = RbMap::new();
        map.extend(iter);
        map
    }
}

impl<K, V, C: Compare<K>, A: Allocator> Extend<(K, V)> for RbMap<K, V, C, A> {
    /// Insert every pair; pairs whose key is already present are dropped.
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K: Copy, V: Copy, C: Compare<K>, A: Allocator> Extend<(&'a K, &'a V)>
    for RbMap<K, V, C, A>
{
    fn extend<I: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: I) {
        for (&k, &v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for RbMap<K, V> {
    fn from(arr: [(K, V); N]) -> RbMap<K, V> {
        RbMap::from_iter(arr)
    }
}

impl<K, Q, V, C, A: Allocator> Index<&Q> for RbMap<K, V, C, A>
where
    K: Borrow<Q>,
    C: Compare<Q>,
    Q: ?Sized,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `RbMap`.
    #[inline]
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

#[cfg(test)]
mod mytests;
