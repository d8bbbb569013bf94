//! [`RbSet`], an ordered set of unique values built on [`RbTree`].
//!
//! The cursor and iterator types here are shared with
//! [`RbMultiSet`](crate::collections::RbMultiSet).

use std::{
    borrow::Borrow,
    fmt,
    fmt::Debug,
    hash::{Hash, Hasher},
    iter::FusedIterator,
    ops::RangeBounds,
};

use crate::alloc::{AllocError, Allocator, Global};
use crate::collections::compare::{Compare, Natural};
use crate::collections::rb_tree::{self as tree, RbTree};

/// An ordered set of unique values.
///
/// # Guide to methods
///
/// Set Creation: [`new`], [`with_comparator`], [`new_in`]
///
/// Properties: [`len`], [`is_empty`], [`contains`],
/// [`is_subset`], [`is_superset`], [`is_disjoint`]
///
/// Insertion: [`insert`], [`try_insert`], [`emplace`]
///
/// Retrieve: [`get`], [`find`], [`first`], [`last`]
///
/// Removal: [`remove`], [`erase`], [`take`], [`pop_first`], [`pop_last`]
///
/// Bulk: [`merge`], [`retain`], [`clear`]
///
/// Iterators: [`iter`], [`range`]
///
/// Cursors: [`lower_bound`], [`upper_bound`], [`cursor_front`], [`cursor_back`], [`cursor_end`]
///
/// [`new`]: RbSet::new
/// [`with_comparator`]: RbSet::with_comparator
/// [`new_in`]: RbSet::new_in
/// [`len`]: RbSet::len
/// [`is_empty`]: RbSet::is_empty
/// [`contains`]: RbSet::contains
/// [`is_subset`]: RbSet::is_subset
/// [`is_superset`]: RbSet::is_superset
/// [`is_disjoint`]: RbSet::is_disjoint
/// [`insert`]: RbSet::insert
/// [`try_insert`]: RbSet::try_insert
/// [`emplace`]: RbSet::emplace
/// [`get`]: RbSet::get
/// [`find`]: RbSet::find
/// [`first`]: RbSet::first
/// [`last`]: RbSet::last
/// [`remove`]: RbSet::remove
/// [`erase`]: RbSet::erase
/// [`take`]: RbSet::take
/// [`pop_first`]: RbSet::pop_first
/// [`pop_last`]: RbSet::pop_last
/// [`merge`]: RbSet::merge
/// [`retain`]: RbSet::retain
/// [`clear`]: RbSet::clear
/// [`iter`]: RbSet::iter
/// [`range`]: RbSet::range
/// [`lower_bound`]: RbSet::lower_bound
/// [`upper_bound`]: RbSet::upper_bound
/// [`cursor_front`]: RbSet::cursor_front
/// [`cursor_back`]: RbSet::cursor_back
/// [`cursor_end`]: RbSet::cursor_end
///
/// # Examples
///
/// ```
/// use rbstd::collections::RbSet;
///
/// let mut books = RbSet::new();
///
/// // Add some books.
/// books.insert("A Dance With Dragons");
/// books.insert("To Kill a Mockingbird");
/// books.insert("The Odyssey");
/// books.insert("The Great Gatsby");
///
/// // A second insert of the same value is refused.
/// assert!(!books.insert("The Odyssey").1);
///
/// // Remove a book.
/// books.remove("The Odyssey");
///
/// // Iterate over everything.
/// for book in &books {
///     println!("{book}");
/// }
/// ```
pub struct RbSet<T, C = Natural, A: Allocator = Global> {
    tree: RbTree<T, (), C, A>,
}

impl<T> RbSet<T> {
    /// Returns a new, empty `RbSet`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tree: RbTree::new(),
        }
    }
}

impl<T, C> RbSet<T, C> {
    /// Returns a new, empty set ordered by `cmp`.
    #[must_use]
    pub const fn with_comparator(cmp: C) -> Self {
        Self {
            tree: RbTree::with_comparator(cmp),
        }
    }
}

impl<T, A: Allocator> RbSet<T, Natural, A> {
    /// Returns new set with specified allocator.
    #[must_use]
    pub const fn new_in(alloc: A) -> Self {
        Self {
            tree: RbTree::new_in(alloc),
        }
    }
}

impl<T, C, A: Allocator> RbSet<T, C, A> {
    /// Returns a new, empty set with the specified comparator and allocator.
    #[must_use]
    pub const fn with_comparator_in(cmp: C, alloc: A) -> Self {
        Self {
            tree: RbTree::with_comparator_in(cmp, alloc),
        }
    }

    /// Returns the number of elements in the set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Clears the set, removing all elements.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Exchange the contents of two sets.
    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }

    /// The underlying tree, for diagnostics such as [`RbTree::validate`].
    pub fn as_tree(&self) -> &RbTree<T, (), C, A> {
        &self.tree
    }

    /// Adds a value to the set.
    ///
    /// Returns a cursor at the element equal to `value` and whether `value` was newly inserted.
    /// An equal element already present is left untouched and `value` is dropped.
    pub fn insert(&mut self, value: T) -> (Cursor<'_, T>, bool)
    where
        C: Compare<T>,
    {
        let (c, inserted) = self.tree.insert(value, (), true);
        (Cursor(c), inserted)
    }

    /// Like [`RbSet::insert`], but node allocation failure is returned as an error.
    pub fn try_insert(&mut self, value: T) -> Result<(Cursor<'_, T>, bool), AllocError>
    where
        C: Compare<T>,
    {
        let (c, inserted) = self.tree.try_insert(value, (), true)?;
        Ok((Cursor(c), inserted))
    }

    /// Like [`RbSet::insert`], but the node is allocated before the value is looked up.
    pub fn emplace(&mut self, value: T) -> (Cursor<'_, T>, bool)
    where
        C: Compare<T>,
    {
        let (c, inserted) = self.tree.emplace(value, (), true);
        (Cursor(c), inserted)
    }

    /// Returns `true` if the set contains an element equal to the value.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.contains_key(value)
    }

    /// Returns a reference to the element in the set, if any, that is equal to the value.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.find(value).key()
    }

    /// Cursor at the element equal to the value, or at the end.
    pub fn find<Q>(&self, value: &Q) -> Cursor<'_, T>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        Cursor(self.tree.find(value))
    }

    /// If the set contains an element equal to the value, removes it from the
    /// set and drops it. Returns whether such an element was present.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.erase(value) == 1
    }

    /// Removes the element equal to the value, returning how many were removed (0 or 1).
    pub fn erase<Q>(&mut self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.erase(value)
    }

    /// Removes and returns the element in the set, if any, that is equal to the value.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.remove_entry(value).map(|(k, _)| k)
    }

    /// Returns a reference to the first element in the set, if any.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.tree.first_key_value().map(|(k, _)| k)
    }

    /// Returns a reference to the last element in the set, if any.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.tree.last_key_value().map(|(k, _)| k)
    }

    /// Removes the first element from the set and returns it, if any.
    pub fn pop_first(&mut self) -> Option<T> {
        self.tree.pop_first().map(|(k, _)| k)
    }

    /// Removes the last element from the set and returns it, if any.
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

    /// Constructs a double-ended iterator over a sub-range of elements in the set.
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

    /// Retains only the elements specified by the predicate, visited in ascending order.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.tree.retain(|k, _| f(k));
    }

    /// Moves every element of `other` that is not in `self` into `self`.
    /// Elements already present stay in `other`.
    pub fn merge<C2, A2: Allocator>(&mut self, other: &mut RbSet<T, C2, A2>)
    where
        C: Compare<T>,
    {
        let mut c = other.tree.cursor_front_mut();
        while let Some(k) = c.key() {
            if self.tree.contains_key(k) {
                c.move_next();
            } else if let Some((k, ())) = c.remove_current() {
                self.tree.insert(k, (), true);
            }
        }
    }

    /// Gets an iterator that visits the elements in the set in ascending order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter(self.tree.keys())
    }

    /// Returns `true` if `self` has no elements in common with `other`.
    #[must_use]
    pub fn is_disjoint<A2: Allocator>(&self, other: &RbSet<T, C, A2>) -> bool
    where
        C: Compare<T>,
    {
        if self.len() <= other.len() {
            !self.iter().any(|v| other.contains(v))
        } else {
            !other.iter().any(|v| self.contains(v))
        }
    }

    /// Returns `true` if the set is a superset of another,
    /// i.e., `self` contains at least all the elements in `other`.
    #[must_use]
    pub fn is_superset<A2: Allocator>(&self, other: &RbSet<T, C, A2>) -> bool
    where
        C: Compare<T>,
    {
        other.is_subset(self)
    }

    /// Returns `true` if the set is a subset of another,
    /// i.e., `other` contains at least all the elements in `self`.
    #[must_use]
    pub fn is_subset<A2: Allocator>(&self, other: &RbSet<T, C, A2>) -> bool
    where
        C: Compare<T>,
    {
        self.len() <= other.len() && self.iter().all(|v| other.contains(v))
    }
}

impl<T, C: Default, A: Allocator + Default> Default for RbSet<T, C, A> {
    fn default() -> Self {
        Self {
            tree: RbTree::default(),
        }
    }
}

impl<T: Clone, C: Clone, A: Allocator + Clone> Clone for RbSet<T, C, A> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<T: Debug, C, A: Allocator> Debug for RbSet<T, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, C, A: Allocator> PartialEq for RbSet<T, C, A> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}
impl<T: Eq, C, A: Allocator> Eq for RbSet<T, C, A> {}

impl<T: Hash, C, A: Allocator> Hash for RbSet<T, C, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for elt in self.iter() {
            elt.hash(state);
        }
    }
}

impl<T: Ord> FromIterator<T> for RbSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> RbSet<T> {
        let mut set = RbSet::new();
        set.extend(iter);
        set
    }
}

impl<T, C: Compare<T>, A: Allocator> Extend<T> for RbSet<T, C, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for elem in iter {
            self.insert(elem);
        }
    }
}

impl<'a, T: 'a + Copy, C: Compare<T>, A: Allocator> Extend<&'a T> for RbSet<T, C, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        for &elem in iter {
            self.insert(elem);
        }
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for RbSet<T> {
    fn from(arr: [T; N]) -> Self {
        RbSet::from_iter(arr)
    }
}

impl<T, C, A: Allocator> IntoIterator for RbSet<T, C, A> {
    type Item = T;
    type IntoIter = IntoIter<T, C, A>;

    /// Gets an iterator for moving out the `RbSet`'s contents in ascending order.
    fn into_iter(self) -> IntoIter<T, C, A> {
        IntoIter(self.tree.into_iter())
    }
}

impl<'a, T, C, A: Allocator> IntoIterator for &'a RbSet<T, C, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Read-only position in a set or multiset: an element or the end.
///
/// See [`tree::Cursor`] for how the end is reached and left.
pub struct Cursor<'a, T>(pub(crate) tree::Cursor<'a, T, ()>);

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Cursor<'_, T> {}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl<T> Eq for Cursor<'_, T> {}

impl<T: Debug> Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}

impl<'a, T> Cursor<'a, T> {
    /// Is the cursor at the end?
    pub fn is_end(&self) -> bool {
        self.0.is_end()
    }

    /// The current element, `None` at the end.
    pub fn get(&self) -> Option<&'a T> {
        self.0.key()
    }

    /// Move to the next element; from the last element to the end, from the end to the first.
    pub fn move_next(&mut self) {
        self.0.move_next();
    }

    /// Move to the previous element; from the first element to the end, from the end to the last.
    pub fn move_prev(&mut self) {
        self.0.move_prev();
    }

    /// The element [`Cursor::move_next`] would move to.
    pub fn peek_next(&self) -> Option<&'a T> {
        self.0.peek_next().map(|(k, _)| k)
    }

    /// The element [`Cursor::move_prev`] would move to.
    pub fn peek_prev(&self) -> Option<&'a T> {
        self.0.peek_prev().map(|(k, _)| k)
    }
}

/// An iterator over the items of a set or multiset, in ascending order.
pub struct Iter<'a, T>(pub(crate) tree::Keys<'a, T, ()>);

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter(tree::Keys(self.0 .0.clone()))
    }
}
impl<T: Debug> Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    fn next(&mut self) -> Option<&'a T> {
        self.0.next()
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}
impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        self.0.next_back()
    }
}
impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.0.len()
    }
}
impl<T> FusedIterator for Iter<'_, T> {}

/// An iterator over a sub-range of items of a set or multiset.
pub struct Range<'a, T>(pub(crate) tree::Range<'a, T, ()>);

impl<T> Clone for Range<'_, T> {
    fn clone(&self) -> Self {
        Range(self.0.clone())
    }
}
impl<T: Debug> Debug for Range<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
impl<'a, T> Iterator for Range<'a, T> {
    type Item = &'a T;
    fn next(&mut self) -> Option<&'a T> {
        self.0.next().map(|(k, _)| k)
    }
}
impl<'a, T> DoubleEndedIterator for Range<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        self.0.next_back().map(|(k, _)| k)
    }
}
impl<T> FusedIterator for Range<'_, T> {}

/// An owning iterator over the items of a set or multiset, in ascending order.
pub struct IntoIter<T, C = Natural, A: Allocator = Global>(pub(crate) tree::IntoIter<T, (), C, A>);

impl<T: Debug, C, A: Allocator> Debug for IntoIter<T, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.0.len()).finish()
    }
}
impl<T, C, A: Allocator> Iterator for IntoIter<T, C, A> {
    type Item = T;
    fn next(&mut self) -> Option<T> {
        self.0.next().map(|(k, _)| k)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}
impl<T, C, A: Allocator> DoubleEndedIterator for IntoIter<T, C, A> {
    fn next_back(&mut self) -> Option<T> {
        self.0.next_back().map(|(k, _)| k)
    }
}
impl<T, C, A: Allocator> ExactSizeIterator for IntoIter<T, C, A> {
    fn len(&self) -> usize {
        self.0.len()
    }
}
impl<T, C, A: Allocator> FusedIterator for IntoIter<T, C, A> {}

#[cfg(test)]
mod mytests;
