use std::{fmt, iter::FusedIterator, marker::PhantomData};

use super::node::{predecessor, successor, Link, Node};
use super::RbTree;
use crate::alloc::Allocator;

// Immutable reference iteration.

/// Iterator over a run of consecutive nodes.
///
/// Returned by [`RbTree::range`] and [`RbTree::equal_range`].
pub struct Range<'a, K, V> {
    /* front and back are both inclusive. When they meet the last element is
       returned and both become None. */
    front: Link<K, V>,
    back: Link<K, V>,
    _pd: PhantomData<&'a Node<K, V>>,
}

unsafe impl<K: Sync, V: Sync> Send for Range<'_, K, V> {}
unsafe impl<K: Sync, V: Sync> Sync for Range<'_, K, V> {}

impl<'a, K, V> Range<'a, K, V> {
    /// `front` must not come after `back` in order, and both must be `Some` or both `None`.
    pub(crate) fn new(front: Link<K, V>, back: Link<K, V>) -> Self {
        Self {
            front,
            back,
            _pd: PhantomData,
        }
    }
}
impl<'a, K, V> Default for Range<'a, K, V> {
    fn default() -> Self {
        Self::new(None, None)
    }
}
impl<'a, K, V> Clone for Range<'a, K, V> {
    fn clone(&self) -> Self {
        Self::new(self.front, self.back)
    }
}
impl<'a, K: fmt::Debug, V: fmt::Debug> fmt::Debug for Range<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        let n = self.front?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.front = unsafe { successor(n) };
        }
        unsafe { Some((&node!(n).key, &node!(n).value)) }
    }
}
impl<'a, K, V> DoubleEndedIterator for Range<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let n = self.back?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.back = unsafe { predecessor(n) };
        }
        unsafe { Some((&node!(n).key, &node!(n).value)) }
    }
}
impl<'a, K, V> FusedIterator for Range<'a, K, V> {}

/// Iterator returned by [`RbTree::iter`].
pub struct Iter<'a, K, V> {
    len: usize,
    inner: Range<'a, K, V>,
}
impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(len: usize, inner: Range<'a, K, V>) -> Self {
        Self { len, inner }
    }
}
impl<'a, K, V> Default for Iter<'a, K, V> {
    fn default() -> Self {
        Self::new(0, Range::default())
    }
}
impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self::new(self.len, self.inner.clone())
    }
}
impl<'a, K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            self.inner.next()
        }
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}
impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {
    fn len(&self) -> usize {
        self.len
    }
}
impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            self.inner.next_back()
        }
    }
}
impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

// Mutable reference iteration.

/// Iterator returned by [`RbTree::iter_mut`].
pub struct IterMut<'a, K, V> {
    len: usize,
    front: Link<K, V>,
    back: Link<K, V>,
    _pd: PhantomData<&'a mut Node<K, V>>,
}

unsafe impl<K: Sync, V: Send> Send for IterMut<'_, K, V> {}
unsafe impl<K: Sync, V: Sync> Sync for IterMut<'_, K, V> {}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new(len: usize, front: Link<K, V>, back: Link<K, V>) -> Self {
        Self {
            len,
            front,
            back,
            _pd: PhantomData,
        }
    }
}
impl<'a, K, V> Default for IterMut<'a, K, V> {
    fn default() -> Self {
        Self::new(0, None, None)
    }
}
impl<'a, K: fmt::Debug, V: fmt::Debug> fmt::Debug for IterMut<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("len", &self.len).finish()
    }
}
impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let n = self.front?;
        // Each node is yielded once, so the mutable references never alias.
        unsafe {
            self.front = successor(n);
            Some((&node!(n).key, &mut node!(n).value))
        }
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}
impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {
    fn len(&self) -> usize {
        self.len
    }
}
impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let n = self.back?;
        unsafe {
            self.back = predecessor(n);
            Some((&node!(n).key, &mut node!(n).value))
        }
    }
}
impl<'a, K, V> FusedIterator for IterMut<'a, K, V> {}

// Consuming iteration.

/// Consuming iterator for [`RbTree`].
pub struct IntoIter<K, V, C, A: Allocator> {
    tree: RbTree<K, V, C, A>,
}
impl<K, V, C, A: Allocator> IntoIter<K, V, C, A> {
    pub(crate) fn new(tree: RbTree<K, V, C, A>) -> Self {
        Self { tree }
    }
}
impl<K: fmt::Debug, V: fmt::Debug, C, A: Allocator> fmt::Debug for IntoIter<K, V, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.tree.iter()).finish()
    }
}
impl<K, V, C, A: Allocator> Iterator for IntoIter<K, V, C, A> {
    type Item = (K, V);
    fn next(&mut self) -> Option<Self::Item> {
        self.tree.pop_first()
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tree.len(), Some(self.tree.len()))
    }
}
impl<K, V, C, A: Allocator> DoubleEndedIterator for IntoIter<K, V, C, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.tree.pop_last()
    }
}
impl<K, V, C, A: Allocator> ExactSizeIterator for IntoIter<K, V, C, A> {
    fn len(&self) -> usize {
        self.tree.len()
    }
}
impl<K, V, C, A: Allocator> FusedIterator for IntoIter<K, V, C, A> {}

/// Iterator returned by [`RbTree::values_mut`].
#[derive(Debug, Default)]
pub struct ValuesMut<'a, K, V>(pub(crate) IterMut<'a, K, V>);
impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }
}
impl<'a, K, V> DoubleEndedIterator for ValuesMut<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, v)| v)
    }
}
impl<'a, K, V> ExactSizeIterator for ValuesMut<'a, K, V> {
    fn len(&self) -> usize {
        self.0.len()
    }
}
impl<'a, K, V> FusedIterator for ValuesMut<'a, K, V> {}

/// Iterator returned by [`RbTree::values`].
#[derive(Clone, Debug, Default)]
pub struct Values<'a, K, V>(pub(crate) Iter<'a, K, V>);
impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }
}
impl<'a, K, V> DoubleEndedIterator for Values<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, v)| v)
    }
}
impl<'a, K, V> ExactSizeIterator for Values<'a, K, V> {
    fn len(&self) -> usize {
        self.0.len()
    }
}
impl<'a, K, V> FusedIterator for Values<'a, K, V> {}

/// Iterator returned by [`RbTree::keys`].
#[derive(Clone, Debug, Default)]
pub struct Keys<'a, K, V>(pub(crate) Iter<'a, K, V>);
impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, _)| k)
    }
}
impl<'a, K, V> DoubleEndedIterator for Keys<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(k, _)| k)
    }
}
impl<'a, K, V> ExactSizeIterator for Keys<'a, K, V> {
    fn len(&self) -> usize {
        self.0.len()
    }
}
impl<'a, K, V> FusedIterator for Keys<'a, K, V> {}
