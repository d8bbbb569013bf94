//! [`RbTree`], the red-black tree engine behind [`RbMap`], [`RbSet`] and [`RbMultiSet`].
//!
//! The tree stores key-value pairs in nodes that are allocated one at a time through the
//! tree's [`Allocator`]. Each node carries a color and `left`/`right`/`parent` links; the
//! tree owns its nodes through the child links, `parent` is used only to navigate and
//! rebalance.
//!
//! After every public mutation:
//!
//! 1. the root is black,
//! 2. no red node has a red child,
//! 3. every path from a node down to an absent child passes the same number of black nodes,
//! 4. an in-order walk visits keys in non-decreasing comparator order.
//!
//! Whether keys are unique is chosen per insertion (`unique` flag). Equal keys inserted with
//! `unique == false` always descend to the right, so they are visited in insertion order.
//!
//! Nodes never move once allocated: rotations and removals only relink them, so a removal
//! frees exactly the removed element's node.
//!
//! # Example
//!
//! ```
//! use rbstd::collections::RbTree;
//! let mut t = RbTree::new();
//! for k in [20, 10, 25, 4, 16] {
//!     t.insert(k, k * 10, true);
//! }
//! assert!(t.validate(true).is_ok());
//! assert_eq!(t.get(&16), Some(&160));
//! assert_eq!(t.erase(&10), 1);
//! assert!(t.keys().copied().eq([4, 16, 20, 25]));
//! ```
//!
//! [`RbMap`]: crate::collections::RbMap
//! [`RbSet`]: crate::collections::RbSet
//! [`RbMultiSet`]: crate::collections::RbMultiSet

use std::{
    alloc::Layout,
    borrow::Borrow,
    cmp::Ordering,
    fmt,
    fmt::Debug,
    marker::PhantomData,
    mem,
    ops::{Bound, RangeBounds},
};

use log::{debug, trace};

use super::compare::{Compare, Natural};
use crate::alloc::{AllocError, Allocator, Global};

#[macro_use]
mod node;
use node::{child, dir_of, first, is_black, last, red, set_child, Color, Dir, Link, Node};
pub(crate) use node::{key_value, key_value_mut, NodePtr, Slot};

mod check;
pub use check::{InvariantError, Shape};

mod cursor;
pub use cursor::{Cursor, CursorMut};

mod iter;
pub use iter::{IntoIter, Iter, IterMut, Keys, Range, Values, ValuesMut};

/// StkVec is used for the pending-node stack of [`RbTree::clone`], length bounds tree height.
///
/// Red-black height is at most `2 * log2(n + 1)`, which stays below this for any
/// node count that fits in the address space.
type StkVec<T> = arrayvec::ArrayVec<T, 128>;

/// Red-black tree of key-value pairs ordered by a comparator `C`, allocating nodes from `A`.
///
/// Lookup, insertion and removal are `O(log n)`. The length is tracked incrementally.
///
/// The tree is not internally synchronized; share it between threads behind a lock.
pub struct RbTree<K, V, C = Natural, A: Allocator = Global> {
    root: Link<K, V>,
    len: usize,
    cmp: C,
    alloc: A,
    _pd: PhantomData<Box<Node<K, V>>>,
}

unsafe impl<K: Send, V: Send, C: Send, A: Allocator + Send> Send for RbTree<K, V, C, A> {}
unsafe impl<K: Sync, V: Sync, C: Sync, A: Allocator + Sync> Sync for RbTree<K, V, C, A> {}

impl<K, V> RbTree<K, V> {
    /// Returns a new, empty tree ordered by [`Ord`].
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator_in(Natural, Global)
    }
}

impl<K, V, C> RbTree<K, V, C> {
    /// Returns a new, empty tree ordered by `cmp`.
    #[must_use]
    pub const fn with_comparator(cmp: C) -> Self {
        Self::with_comparator_in(cmp, Global)
    }
}

impl<K, V, A: Allocator> RbTree<K, V, Natural, A> {
    /// Returns a new, empty tree ordered by [`Ord`] that allocates nodes from `alloc`.
    #[must_use]
    pub const fn new_in(alloc: A) -> Self {
        Self::with_comparator_in(Natural, alloc)
    }
}

impl<K, V, C, A: Allocator> RbTree<K, V, C, A> {
    /// Returns a new, empty tree with the specified comparator and allocator.
    #[must_use]
    pub const fn with_comparator_in(cmp: C, alloc: A) -> Self {
        Self {
            root: None,
            len: 0,
            cmp,
            alloc,
            _pd: PhantomData,
        }
    }

    /// Number of key-value pairs in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Is the tree empty?
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reference to the comparator.
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Reference to the node allocator.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Layout of one node, as passed to the allocator.
    pub(crate) fn node_layout() -> Layout {
        Node::<K, V>::layout()
    }

    /// Remove and drop every element.
    ///
    /// Nodes are freed in post-order by walking parent links, so no stack is needed.
    pub fn clear(&mut self) {
        if self.root.is_some() {
            trace!("clearing red-black tree of {} nodes", self.len);
        }
        let mut cur = self.root.take();
        self.len = 0;
        while let Some(n) = cur {
            unsafe {
                if let Some(l) = node!(n).left.take() {
                    cur = Some(l);
                } else if let Some(r) = node!(n).right.take() {
                    cur = Some(r);
                } else {
                    cur = node!(n).parent;
                    drop(Node::free_in(n, &self.alloc));
                }
            }
        }
    }

    /// Exchange the contents (nodes, comparator and allocator) of two trees.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Cursor at the node with an equal key, or at the end if there is none.
    ///
    /// With duplicate keys this is the first equal node met while descending,
    /// not necessarily the first in order.
    pub fn find<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.cursor_at(self.find_node(key))
    }

    /// Mutable cursor at the node with an equal key, or at the end if there is none.
    pub fn find_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V, C, A>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let n = self.find_node(key);
        CursorMut::new(self, n)
    }

    /// Does the tree have a node with an equal key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.find_node(key).is_some()
    }

    /// Get reference to the value corresponding to the key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.find(key).value()
    }

    /// Get a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let n = self.find_node(key)?;
        Some(unsafe { &mut node!(n).value })
    }

    /// Get references to the corresponding key and value.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.find(key).key_value()
    }

    /// Get references to first key and value.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.cursor_front().key_value()
    }

    /// Get references to last key and value.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.cursor_back().key_value()
    }

    /// Cursor at the first node whose key is not less than `key`, or at the end.
    pub fn lower_bound<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.cursor_at(self.partition(key, |o| o == Ordering::Less).1)
    }

    /// Mutable cursor at the first node whose key is not less than `key`, or at the end.
    pub fn lower_bound_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V, C, A>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let n = self.partition(key, |o| o == Ordering::Less).1;
        CursorMut::new(self, n)
    }

    /// Cursor at the first node whose key is greater than `key`, or at the end.
    pub fn upper_bound<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.cursor_at(self.partition(key, |o| o != Ordering::Greater).1)
    }

    /// Iterator over every element whose key is equal to `key`, in order.
    pub fn equal_range<Q>(&self, key: &Q) -> Range<'_, K, V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let front = self.partition(key, |o| o == Ordering::Less).1;
        let back = self.partition(key, |o| o != Ordering::Greater).0;
        self.make_range::<Q>(front, back)
    }

    /// Number of elements whose key is equal to `key`.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.equal_range(key).count()
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
        self.check_range::<Q, R>(&range);
        let front = match range.start_bound() {
            Bound::Included(s) => self.partition(s, |o| o == Ordering::Less).1,
            Bound::Excluded(s) => self.partition(s, |o| o != Ordering::Greater).1,
            Bound::Unbounded => self.root.map(|r| unsafe { first(r) }),
        };
        let back = match range.end_bound() {
            Bound::Included(e) => self.partition(e, |o| o != Ordering::Greater).0,
            Bound::Excluded(e) => self.partition(e, |o| o == Ordering::Less).0,
            Bound::Unbounded => self.root.map(|r| unsafe { last(r) }),
        };
        self.make_range::<Q>(front, back)
    }

    /// Insert a key-value pair.
    ///
    /// If `unique` and an equal key is present, nothing is allocated, `key` and `value`
    /// are dropped and the result is a cursor at the existing node with `false`.
    /// Otherwise the result is a cursor at the new node with `true`.
    ///
    /// Allocation failure is reported through [`std::alloc::handle_alloc_error`];
    /// use [`RbTree::try_insert`] to handle it.
    pub fn insert(&mut self, key: K, value: V, unique: bool) -> (Cursor<'_, K, V>, bool)
    where
        C: Compare<K>,
    {
        match self.try_insert(key, value, unique) {
            Ok(result) => result,
            Err(AllocError) => std::alloc::handle_alloc_error(Node::<K, V>::layout()),
        }
    }

    /// Like [`RbTree::insert`], but returns an error if the node cannot be allocated,
    /// in which case the tree is unchanged.
    pub fn try_insert(
        &mut self,
        key: K,
        value: V,
        unique: bool,
    ) -> Result<(Cursor<'_, K, V>, bool), AllocError>
    where
        C: Compare<K>,
    {
        match self.search_slot(&key, unique) {
            Err(existing) => Ok((self.cursor_at(Some(existing)), false)),
            Ok(slot) => {
                let n = unsafe { self.insert_at(slot, key, value)? };
                Ok((self.cursor_at(Some(n)), true))
            }
        }
    }

    /// Insert a key-value pair, allocating the node before searching.
    ///
    /// Same result as [`RbTree::insert`]; on a unique-key collision the freshly
    /// allocated node is freed again.
    pub fn emplace(&mut self, key: K, value: V, unique: bool) -> (Cursor<'_, K, V>, bool)
    where
        C: Compare<K>,
    {
        match self.try_emplace(key, value, unique) {
            Ok(result) => result,
            Err(AllocError) => std::alloc::handle_alloc_error(Node::<K, V>::layout()),
        }
    }

    /// Like [`RbTree::emplace`], but returns an error if the node cannot be allocated,
    /// in which case the tree is unchanged.
    pub fn try_emplace(
        &mut self,
        key: K,
        value: V,
        unique: bool,
    ) -> Result<(Cursor<'_, K, V>, bool), AllocError>
    where
        C: Compare<K>,
    {
        let n = self.new_node(key, value)?;
        match self.search_slot(unsafe { &node!(n).key }, unique) {
            Err(existing) => {
                drop(unsafe { Node::free_in(n, &self.alloc) });
                Ok((self.cursor_at(Some(existing)), false))
            }
            Ok(slot) => {
                unsafe { self.attach(n, slot) };
                Ok((self.cursor_at(Some(n)), true))
            }
        }
    }

    /// Remove the node with an equal key (the first one met, for duplicate keys).
    /// Returns the number of elements removed, 0 or 1.
    pub fn erase<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        usize::from(self.remove_entry(key).is_some())
    }

    /// Remove the node with an equal key, returning its key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let n = self.find_node(key)?;
        Some(unsafe { self.remove_node(n) })
    }

    /// Remove first key-value pair.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let n = unsafe { first(self.root?) };
        Some(unsafe { self.remove_node(n) })
    }

    /// Remove last key-value pair.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let n = unsafe { last(self.root?) };
        Some(unsafe { self.remove_node(n) })
    }

    /// Remove all key-value pairs, visited in ascending order, for which f returns false.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut c = self.cursor_front_mut();
        while let Some((k, v)) = c.key_value_mut() {
            if f(k, v) {
                c.move_next();
            } else {
                c.remove_current();
            }
        }
    }

    /// Cursor at the first element (the end if the tree is empty).
    #[must_use]
    pub fn cursor_front(&self) -> Cursor<'_, K, V> {
        self.cursor_at(self.root.map(|r| unsafe { first(r) }))
    }

    /// Cursor at the last element (the end if the tree is empty).
    ///
    /// Moving it with [`Cursor::move_prev`] walks the tree in descending order.
    #[must_use]
    pub fn cursor_back(&self) -> Cursor<'_, K, V> {
        self.cursor_at(self.root.map(|r| unsafe { last(r) }))
    }

    /// Cursor at the end, the position past the last (and before the first) element.
    #[must_use]
    pub fn cursor_end(&self) -> Cursor<'_, K, V> {
        self.cursor_at(None)
    }

    /// Mutable cursor at the first element.
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, K, V, C, A> {
        let n = self.root.map(|r| unsafe { first(r) });
        CursorMut::new(self, n)
    }

    /// Get iterator of references to key-value pairs, in ascending key order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.len, self.full_range())
    }

    /// Get iterator of mutable references to values, in ascending key order.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let (front, back) = match self.root {
            Some(r) => unsafe { (Some(first(r)), Some(last(r))) },
            None => (None, None),
        };
        IterMut::new(self.len, front, back)
    }

    /// Get iterator of references to keys.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    /// Get iterator of references to values.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }

    /// Get iterator of mutable references to values.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut(self.iter_mut())
    }

    // ##########################################################################
    // Private methods ##########################################################
    // ##########################################################################

    fn cursor_at(&self, n: Link<K, V>) -> Cursor<'_, K, V> {
        Cursor::new(self.root, n)
    }

    fn full_range(&self) -> Range<'_, K, V> {
        match self.root {
            Some(r) => unsafe { Range::new(Some(first(r)), Some(last(r))) },
            None => Range::default(),
        }
    }

    /// Range from `front` to `back` inclusive, empty if either is missing or out of order.
    fn make_range<Q>(&self, front: Link<K, V>, back: Link<K, V>) -> Range<'_, K, V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        match (front, back) {
            (Some(f), Some(b)) => unsafe {
                let (fk, bk): (&Q, &Q) = (node!(f).key.borrow(), node!(b).key.borrow());
                if self.cmp.compare(fk, bk) == Ordering::Greater {
                    Range::default()
                } else {
                    Range::new(front, back)
                }
            },
            _ => Range::default(),
        }
    }

    fn check_range<Q, R>(&self, range: &R)
    where
        C: Compare<Q>,
        Q: ?Sized,
        R: RangeBounds<Q>,
    {
        use Bound::{Excluded, Included};
        match (range.start_bound(), range.end_bound()) {
            (Included(s) | Excluded(s), Included(e)) | (Included(s), Excluded(e)) => {
                assert!(
                    self.cmp.compare(e, s) != Ordering::Less,
                    "range start is greater than range end in RbTree"
                );
            }
            (Excluded(s), Excluded(e)) => {
                let o = self.cmp.compare(e, s);
                assert!(
                    o != Ordering::Equal,
                    "range start and end are equal and excluded in RbTree"
                );
                assert!(
                    o != Ordering::Less,
                    "range start is greater than range end in RbTree"
                );
            }
            _ => {}
        }
    }

    fn find_node<Q>(&self, key: &Q) -> Link<K, V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let mut cur = self.root;
        while let Some(n) = cur {
            let nk: &Q = unsafe { node!(n).key.borrow() };
            cur = match self.cmp.compare(key, nk) {
                Ordering::Less => unsafe { node!(n).left },
                Ordering::Greater => unsafe { node!(n).right },
                Ordering::Equal => return Some(n),
            };
        }
        None
    }

    /// `before` classifies how a node key compares to `key` and must hold for a prefix of the
    /// in-order sequence. Returns the last node for which it holds and the first for which it
    /// does not.
    fn partition<Q, F>(&self, key: &Q, before: F) -> (Link<K, V>, Link<K, V>)
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
        F: Fn(Ordering) -> bool,
    {
        let (mut lo, mut hi) = (None, None);
        let mut cur = self.root;
        while let Some(n) = cur {
            let nk: &Q = unsafe { node!(n).key.borrow() };
            if before(self.cmp.compare(nk, key)) {
                lo = Some(n);
                cur = unsafe { node!(n).right };
            } else {
                hi = Some(n);
                cur = unsafe { node!(n).left };
            }
        }
        (lo, hi)
    }

    /// Find where `key` would be attached, or the existing node if `unique` and an equal key
    /// is present.
    /// Equal keys descend to the right.
    pub(crate) fn search_slot(&self, key: &K, unique: bool) -> Result<Slot<K, V>, NodePtr<K, V>>
    where
        C: Compare<K>,
    {
        let (mut parent, mut dir) = (None, Dir::Left);
        let mut cur = self.root;
        while let Some(n) = cur {
            parent = Some(n);
            dir = match self.cmp.compare(key, unsafe { &node!(n).key }) {
                Ordering::Less => Dir::Left,
                Ordering::Equal if unique => return Err(n),
                _ => Dir::Right,
            };
            cur = unsafe { child(n, dir) };
        }
        Ok((parent, dir))
    }

    fn new_node(&self, key: K, value: V) -> Result<NodePtr<K, V>, AllocError> {
        Node::new_in(key, value, &self.alloc).map_err(|e| {
            debug!(
                "red-black tree node allocation of {} bytes failed, tree left unchanged",
                Node::<K, V>::layout().size()
            );
            e
        })
    }

    /// Allocate a node for `key` and `value` and link it in at `slot`.
    /// # Safety
    ///
    /// `slot` must come from [`RbTree::search_slot`] with no mutation of the tree since.
    pub(crate) unsafe fn insert_at(
        &mut self,
        slot: Slot<K, V>,
        key: K,
        value: V,
    ) -> Result<NodePtr<K, V>, AllocError> {
        let n = self.new_node(key, value)?;
        self.attach(n, slot);
        Ok(n)
    }

    /// Link a detached red node in at `slot` and rebalance.
    unsafe fn attach(&mut self, n: NodePtr<K, V>, (parent, dir): Slot<K, V>) {
        node!(n).parent = parent;
        match parent {
            None => self.root = Some(n),
            Some(p) => set_child(p, dir, Some(n)),
        }
        self.len += 1;
        self.insert_fixup(n);
    }

    /// Restore the red-black properties after attaching the red node `z`.
    unsafe fn insert_fixup(&mut self, mut z: NodePtr<K, V>) {
        while let Some(mut p) = red(node!(z).parent) {
            // A red node is never the root, so the grandparent exists.
            let Some(g) = node!(p).parent else { break };
            let side = dir_of(g, p);
            if let Some(u) = red(child(g, side.opposite())) {
                node!(p).color = Color::Black;
                node!(u).color = Color::Black;
                node!(g).color = Color::Red;
                z = g;
                continue;
            }
            if dir_of(p, z) != side {
                // Inner grandchild: turn it into an outer one.
                self.rotate(p, side);
                mem::swap(&mut z, &mut p);
            }
            node!(p).color = Color::Black;
            node!(g).color = Color::Red;
            self.rotate(g, side.opposite());
        }
        if let Some(r) = self.root {
            node!(r).color = Color::Black;
        }
    }

    /// Rotation at `x`. With `dir == Dir::Left` the right child of `x` takes its place and `x`
    /// becomes that child's left child; `Dir::Right` is the mirror. Colors are not changed.
    unsafe fn rotate(&mut self, x: NodePtr<K, V>, dir: Dir) {
        let rising = child(x, dir.opposite());
        safe_assert!(rising.is_some());
        let y = rising.unwrap_unchecked();
        let inner = child(y, dir);
        set_child(x, dir.opposite(), inner);
        if let Some(b) = inner {
            node!(b).parent = Some(x);
        }
        let p = node!(x).parent;
        node!(y).parent = p;
        self.replace_child(p, x, y);
        set_child(y, dir, Some(x));
        node!(x).parent = Some(y);
    }

    /// Make `new` the child of `parent` that was `old`, or the root when there is no parent.
    unsafe fn replace_child(
        &mut self,
        parent: Link<K, V>,
        old: NodePtr<K, V>,
        new: NodePtr<K, V>,
    ) {
        match parent {
            None => self.root = Some(new),
            Some(p) => set_child(p, dir_of(p, old), Some(new)),
        }
    }

    /// Unlink `z`, rebalance, then free it and return its key and value.
    /// # Safety
    ///
    /// `z` must be a node of this tree.
    pub(crate) unsafe fn remove_node(&mut self, z: NodePtr<K, V>) -> (K, V) {
        trace!("removing red-black tree node, len {}", self.len);
        if let (Some(_), Some(r)) = (node!(z).left, node!(z).right) {
            self.swap_with_successor(z, first(r));
        }
        // `z` now has at most one child.
        match node!(z).left.or(node!(z).right) {
            Some(c) => {
                // Only a black node with a single red leaf child has exactly one child.
                debug_assert!(node!(z).color == Color::Black && node!(c).color == Color::Red);
                let parent = node!(z).parent;
                node!(c).parent = parent;
                self.replace_child(parent, z, c);
                node!(c).color = Color::Black;
            }
            None => match node!(z).parent {
                None => self.root = None,
                Some(p) => {
                    let dir = dir_of(p, z);
                    set_child(p, dir, None);
                    if node!(z).color == Color::Black {
                        self.delete_fixup(p, dir);
                    }
                }
            },
        }
        self.len -= 1;
        Node::free_in(z, &self.alloc)
    }

    /// Exchange the tree positions (links and colors) of `z` and `s`, the leftmost node of
    /// `z`'s right subtree. Afterwards `z` has no left child and `s` holds `z`'s old place.
    unsafe fn swap_with_successor(&mut self, z: NodePtr<K, V>, s: NodePtr<K, V>) {
        let (zp, zl, zr) = (node!(z).parent, node!(z).left, node!(z).right);
        let (sp, sr) = (node!(s).parent, node!(s).right);
        self.replace_child(zp, z, s);
        node!(s).parent = zp;
        node!(s).left = zl;
        if let Some(l) = zl {
            node!(l).parent = Some(s);
        }
        if zr == Some(s) {
            node!(s).right = Some(z);
            node!(z).parent = Some(s);
        } else {
            node!(s).right = zr;
            if let Some(r) = zr {
                node!(r).parent = Some(s);
            }
            if let Some(sp) = sp {
                node!(sp).left = Some(z);
            }
            node!(z).parent = sp;
        }
        node!(z).left = None;
        node!(z).right = sr;
        if let Some(r) = sr {
            node!(r).parent = Some(z);
        }
        mem::swap(&mut node!(z).color, &mut node!(s).color);
    }

    /// Restore equal black-height after a black leaf was unlinked from side `dir` of `parent`.
    ///
    /// The (possibly absent) child on side `dir` is one black short; the deficit is either
    /// absorbed locally or moved up one level per iteration.
    unsafe fn delete_fixup(&mut self, mut parent: NodePtr<K, V>, mut dir: Dir) {
        loop {
            let far = dir.opposite();
            // The short side is one black below the sibling side, so the sibling exists.
            let sibling = child(parent, far);
            safe_assert!(sibling.is_some());
            let mut w = sibling.unwrap_unchecked();

            if node!(w).color == Color::Red {
                node!(w).color = Color::Black;
                node!(parent).color = Color::Red;
                self.rotate(parent, dir);
                let sibling = child(parent, far);
                safe_assert!(sibling.is_some());
                w = sibling.unwrap_unchecked();
            }

            if is_black(child(w, dir)) && is_black(child(w, far)) {
                node!(w).color = Color::Red;
                if node!(parent).color == Color::Red {
                    node!(parent).color = Color::Black;
                    break;
                }
                match node!(parent).parent {
                    None => break,
                    Some(gp) => {
                        dir = dir_of(gp, parent);
                        parent = gp;
                    }
                }
                continue;
            }

            if is_black(child(w, far)) {
                // Near child is red: rotate it up so the red child is on the far side.
                if let Some(near) = child(w, dir) {
                    node!(near).color = Color::Black;
                }
                node!(w).color = Color::Red;
                self.rotate(w, far);
                let sibling = child(parent, far);
                safe_assert!(sibling.is_some());
                w = sibling.unwrap_unchecked();
            }

            node!(w).color = node!(parent).color;
            node!(parent).color = Color::Black;
            if let Some(f) = child(w, far) {
                node!(f).color = Color::Black;
            }
            self.rotate(parent, dir);
            break;
        }
        if let Some(r) = self.root {
            node!(r).color = Color::Black;
        }
    }
} // End impl RbTree

impl<K, V, C, A: Allocator> Drop for RbTree<K, V, C, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K, V, C: Default, A: Allocator + Default> Default for RbTree<K, V, C, A> {
    /// Creates an empty tree.
    fn default() -> Self {
        Self::with_comparator_in(C::default(), A::default())
    }
}

impl<K: Clone, V: Clone, C: Clone, A: Allocator + Clone> Clone for RbTree<K, V, C, A> {
    /// Structural copy: the result has the same shape and colors as `self`.
    ///
    /// If cloning a key or value panics, every node already copied is freed.
    fn clone(&self) -> Self {
        let mut out = Self::with_comparator_in(self.cmp.clone(), self.alloc.clone());
        if let Some(root) = self.root {
            trace!("copying red-black tree of {} nodes", self.len);
            unsafe { out.copy_from(root) };
        }
        out
    }
}

impl<K, V, C, A: Allocator> RbTree<K, V, C, A> {
    /// Pre-order copy of the subtree at `src` into this (empty) tree.
    unsafe fn copy_from(&mut self, src: NodePtr<K, V>)
    where
        K: Clone,
        V: Clone,
    {
        let mut pending: StkVec<(NodePtr<K, V>, Link<K, V>, Dir)> = StkVec::new();
        pending.push((src, None, Dir::Left));
        while let Some((s, parent, dir)) = pending.pop() {
            // Clone before allocating, so a panicking clone leaks nothing.
            let (key, value) = (node!(s).key.clone(), node!(s).value.clone());
            let d = match self.new_node(key, value) {
                Ok(d) => d,
                Err(AllocError) => std::alloc::handle_alloc_error(Node::<K, V>::layout()),
            };
            node!(d).color = node!(s).color;
            node!(d).parent = parent;
            match parent {
                None => self.root = Some(d),
                Some(p) => set_child(p, dir, Some(d)),
            }
            self.len += 1;
            if let Some(r) = node!(s).right {
                pending.push((r, Some(d), Dir::Right));
            }
            if let Some(l) = node!(s).left {
                pending.push((l, Some(d), Dir::Left));
            }
        }
    }
}

impl<K: Debug, V: Debug, C, A: Allocator> Debug for RbTree<K, V, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C, A: Allocator> IntoIterator for RbTree<K, V, C, A> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, C, A>;

    /// Convert `RbTree` to [`IntoIter`].
    fn into_iter(self) -> IntoIter<K, V, C, A> {
        IntoIter::new(self)
    }
}
impl<'a, K, V, C, A: Allocator> IntoIterator for &'a RbTree<K, V, C, A> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}
impl<'a, K, V, C, A: Allocator> IntoIterator for &'a mut RbTree<K, V, C, A> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;
    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

// Tests.

#[cfg(all(test, not(miri), feature = "cap"))]
#[global_allocator]
static ALLOCATOR: cap::Cap<std::alloc::System> =
    cap::Cap::new(std::alloc::System, usize::max_value());

#[cfg(test)]
fn print_memory() {
    #[cfg(all(test, not(miri), feature = "cap"))]
    println!("Memory allocated: {} bytes", ALLOCATOR.allocated());
}

/* mimalloc cannot be used with miri */
#[cfg(all(test, not(miri), not(feature = "cap")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;
