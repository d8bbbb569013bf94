//! [`RbMultiSet`], an ordered collection that keeps every inserted value, duplicates included.
//!
//! Equal values are kept in insertion order.
//!
//! # Example
//!
//! ```
//! use rbstd::collections::RbMultiSet;
//! let mut bag = RbMultiSet::from([1, 1, 2, 2, 3, 3]);
//! assert_eq!(bag.count(&1), 2);
//! assert_eq!(bag.count(&4), 0);
//! assert_eq!(bag.len(), 6);
//! assert_eq!(bag.erase(&2), 2);
//! assert!(bag.iter().copied().eq([1, 1, 3, 3]));
//! ```

use std::{
    borrow::Borrow,
    fmt,
    fmt::Debug,
    hash::{Hash, Hasher},
    ops::RangeBounds,
};

use crate::alloc::{AllocError, Allocator, Global};
use crate::collections::compare::{Compare, Natural};
use crate::collections::rb_set::{Cursor, IntoIter, Iter, Range};
use crate::collections::rb_tree::RbTree;

/// An ordered multiset.
pub struct RbMultiSet<T, C = Natural, A: Allocator = Global> {
    tree: RbTree<T, (), C, A>,
}

impl<T> RbMultiSet<T> {
    /// Returns a new, empty multiset.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tree: RbTree::new(),
        }
    }
}

impl<T, C> RbMultiSet<T, C> {
    /// Returns a new, empty multiset ordered by `cmp`.
    #[must_use]
    pub const fn with_comparator(cmp: C) -> Self {
        Self {
            tree: RbTree::with_comparator(cmp),
        }
    }
}

impl<T, A: Allocator> RbMultiSet<T, Natural, A> {
    /// Returns new multiset with specified allocator.
    #[must_use]
    pub const fn new_in(alloc: A) -> Self {
        Self {
            tree: RbTree::new_in(alloc),
        }
    }
}

impl<T, C, A: Allocator> RbMultiSet<T, C, A> {
    /// Returns a new, empty multiset with the specified comparator and allocator.
    #[must_use]
    pub const fn with_comparator_in(cmp: C, alloc: A) -> Self {
        Self {
            tree: RbTree::with_comparator_in(cmp, alloc),
        }
    }

    /// Number of elements, duplicates counted.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the multiset contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Removes all elements.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Exchange the contents of two multisets.
    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }

    /// The underlying tree, for diagnostics such as [`RbTree::validate`].
    pub fn as_tree(&self) -> &RbTree<T, (), C, A> {
        &self.tree
    }

    /// Adds a value, after any equal values already present. Returns a cursor at it.
    pub fn insert(&mut self, value: T) -> Cursor<'_, T>
    where
        C: Compare<T>,
    {
        Cursor(self.tree.insert(value, (), false).0)
    }

    /// Like [`RbMultiSet::insert`], but node allocation failure is returned as an error.
    pub fn try_insert(&mut self, value: T) -> Result<Cursor<'_, T>, AllocError>
    where
        C: Compare<T>,
    {
        Ok(Cursor(self.tree.try_insert(value, (), false)?.0))
    }

    /// Same as [`RbMultiSet::insert`]; the node is allocated before the position is searched.
    pub fn emplace(&mut self, value: T) -> Cursor<'_, T>
    where
        C: Compare<T>,
    {
        Cursor(self.tree.emplace(value, (), false).0)
    }

    /// Number of elements equal to `value`.
    pub fn count<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.count(value)
    }

    /// Iterator over the elements equal to `value`, in insertion order.
    pub fn equal_range<Q>(&self, value: &Q) -> Range<'_, T>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        Range(self.tree.equal_range(value))
    }

    /// Returns `true` if at least one element is equal to `value`.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.contains_key(value)
    }

    /// Cursor at the first element equal to `value`, or at the end.
    pub fn find<Q>(&self, value: &Q) -> Cursor<'_, T>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let c = self.tree.lower_bound(value);
        let cmp = self.tree.comparator();
        match c.key() {
            Some(k) if cmp.compare(Borrow::<Q>::borrow(k), value).is_eq() => Cursor(c),
            _ => Cursor(self.tree.cursor_end()),
        }
    }

    /// Removes every element equal to `value`, returning how many were removed.
    pub fn erase<Q>(&mut self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let n = self.count(value);
        let mut c = self.tree.lower_bound_mut(value);
        for _ in 0..n {
            c.remove_current();
        }
        n
    }

    /// Removes one element equal to `value`, returning whether there was one.
    pub fn remove_one<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.erase(value) == 1
    }

    /// Returns a reference to the first element, if any.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.tree.first_key_value().map(|(k, _)| k)
    }

    /// Returns a reference to the last element, if any.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.tree.last_key_value().map(|(k, _)| k)
    }

    /// Removes and returns the first element, if any.
    pub fn pop_first(&mut self) -> Option<T> {
        self.tree.pop_first().map(|(k, _)| k)
    }

    /// Removes and returns the last element, if any.
    pub fn pop_last(&mut self) -> Option<T> {
        self.tree.pop_last().map(|(k, _)| k)
    }

    /// Cursor at the first element not less than `value`.
    pub fn lower_bound<Q>(&self, value: &Q) -> Cursor<'_, T>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        Cursor(self.tree.lower_bound(value))
    }

    /// Cursor at the first element greater than `value`.
    pub fn upper_bound<Q>(&self, value: &Q) -> Cursor<'_, T>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        Cursor(self.tree.upper_bound(value))
    }

    /// Iterator over a sub-range of elements.
    ///
    /// # Panics
    ///
    /// Panics if range `start > end`, or if range `start == end` and both bounds are `Excluded`.
    pub fn range<Q, R>(&self, range: R) -> Range<'_, T>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
        R: RangeBounds<Q>,
    {
        Range(self.tree.range(range))
    }

    /// Cursor at the first element.
    #[must_use]
    pub fn cursor_front(&self) -> Cursor<'_, T> {
        Cursor(self.tree.cursor_front())
    }

    /// Cursor at the last element.
    #[must_use]
    pub fn cursor_back(&self) -> Cursor<'_, T> {
        Cursor(self.tree.cursor_back())
    }

    /// Cursor at the end.
    #[must_use]
    pub fn cursor_end(&self) -> Cursor<'_, T> {
        Cursor(self.tree.cursor_end())
    }

    /// Retains only the elements specified by the predicate.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.tree.retain(|k, _| f(k));
    }

    /// Moves every element of `other` into `self`, leaving `other` empty.
    pub fn merge<C2, A2: Allocator>(&mut self, other: &mut RbMultiSet<T, C2, A2>)
    where
        C: Compare<T>,
    {
        while let Some((k, ())) = other.tree.pop_first() {
            self.tree.insert(k, (), false);
        }
    }

    /// Gets an iterator that visits the elements in ascending order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter(self.tree.keys())
    }
}

impl<T, C: Default, A: Allocator + Default> Default for RbMultiSet<T, C, A> {
    fn default() -> Self {
        Self {
            tree: RbTree::default(),
        }
    }
}

impl<T: Clone, C: Clone, A: Allocator + Clone> Clone for RbMultiSet<T, C, A> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<T: Debug, C, A: Allocator> Debug for RbMultiSet<T, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, C, A: Allocator> PartialEq for RbMultiSet<T, C, A> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}
impl<T: Eq, C, A: Allocator> Eq for RbMultiSet<T, C, A> {}

impl<T: Hash, C, A: Allocator> Hash for RbMultiSet<T, C, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for elt in self.iter() {
            elt.hash(state);
        }
    }
}

impl<T: Ord> FromIterator<T> for RbMultiSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> RbMultiSet<T> {
        let mut set = RbMultiSet::new();
        set.extend(iter);
        set
    }
}

impl<T, C: Compare<T>, A: Allocator> Extend<T> for RbMultiSet<T, C, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for elem in iter {
            self.insert(elem);
        }
    }
}

impl<'a, T: 'a + Copy, C: Compare<T>, A: Allocator> Extend<&'a T> for RbMultiSet<T, C, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        for &elem in iter {
            self.insert(elem);
        }
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for RbMultiSet<T> {
    fn from(arr: [T; N]) -> Self {
        RbMultiSet::from_iter(arr)
    }
}

impl<T, C, A: Allocator> IntoIterator for RbMultiSet<T, C, A> {
    type Item = T;
    type IntoIter = IntoIter<T, C, A>;

    fn into_iter(self) -> IntoIter<T, C, A> {
        IntoIter(self.tree.into_iter())
    }
}

impl<'a, T, C, A: Allocator> IntoIterator for &'a RbMultiSet<T, C, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

#[cfg(test)]
mod mytests;
