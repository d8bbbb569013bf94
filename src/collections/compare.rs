//! Key ordering for the red-black tree containers.
//!
//! Every container stores its comparator by value, so two maps with different
//! orderings can exist side by side.
//!
//! # Example
//!
//! ```
//! use rbstd::collections::{RbSet, compare::Reverse};
//! let mut set = RbSet::with_comparator(Reverse);
//! set.insert(1);
//! set.insert(3);
//! set.insert(2);
//! assert!(set.iter().copied().eq([3, 2, 1]));
//! ```

use std::cmp::Ordering;

/// A strict weak order over `Q`.
///
/// Implemented by [`Natural`], [`Reverse`] and any closure `Fn(&K, &K) -> Ordering`.
///
/// The implementation must be consistent for the life of the container: a comparator
/// that changes its answer for the same pair of keys leaves the container unordered
/// (lookups may then miss, but memory safety is not affected).
pub trait Compare<Q: ?Sized> {
    /// Compare two keys.
    fn compare(&self, a: &Q, b: &Q) -> Ordering;
}

/// Orders keys by their [`Ord`] implementation. The default comparator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Natural;

impl<Q: Ord + ?Sized> Compare<Q> for Natural {
    #[inline]
    fn compare(&self, a: &Q, b: &Q) -> Ordering {
        a.cmp(b)
    }
}

/// Orders keys by the reverse of their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Reverse;

impl<Q: Ord + ?Sized> Compare<Q> for Reverse {
    #[inline]
    fn compare(&self, a: &Q, b: &Q) -> Ordering {
        b.cmp(a)
    }
}

impl<K: ?Sized, F> Compare<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}
