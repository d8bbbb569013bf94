use std::{alloc::Layout, ptr::NonNull};

use crate::alloc::{AllocError, Allocator};

/// Raw access to the node behind a [`NodePtr`]. Must be used inside `unsafe`.
///
/// No reference produced through this macro is held across a call that may
/// restructure the tree.
macro_rules! node {
    ( $p: expr ) => {
        (*$p.as_ptr())
    };
}

/// In debug mode or feature unsafe-optim not enabled, same as assert! otherwise does nothing.
#[cfg(any(debug_assertions, not(feature = "unsafe-optim")))]
macro_rules! safe_assert {
    ( $cond: expr ) => {
        assert!($cond)
    };
}

/// In debug mode or feature unsafe-optim not enabled, same as assert! otherwise does nothing.
#[cfg(all(not(debug_assertions), feature = "unsafe-optim"))]
macro_rules! safe_assert {
    ( $cond: expr ) => {
        if !$cond {
            unsafe { std::hint::unreachable_unchecked() }
        }
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which child of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Dir {
    Left,
    Right,
}

impl Dir {
    #[inline]
    pub(crate) fn opposite(self) -> Dir {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

pub(crate) type NodePtr<K, V> = NonNull<Node<K, V>>;
pub(crate) type Link<K, V> = Option<NodePtr<K, V>>;

/// Where a new node is to be attached: the parent (`None` for an empty tree) and the side.
pub(crate) type Slot<K, V> = (Link<K, V>, Dir);

/// Tree node. Children are owned by the tree through `left`/`right`,
/// `parent` is a back link used only for navigation and rebalancing.
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) color: Color,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
    pub(crate) parent: Link<K, V>,
}

impl<K, V> Node<K, V> {
    const LAYOUT: Layout = Layout::new::<Node<K, V>>();

    pub(crate) fn layout() -> Layout {
        Self::LAYOUT
    }

    /// Allocate a detached red node.
    pub(crate) fn new_in<A: Allocator>(
        key: K,
        value: V,
        alloc: &A,
    ) -> Result<NodePtr<K, V>, AllocError> {
        let p = alloc.allocate(Self::LAYOUT)?.cast::<Node<K, V>>();
        unsafe {
            p.as_ptr().write(Node {
                key,
                value,
                color: Color::Red,
                left: None,
                right: None,
                parent: None,
            });
        }
        Ok(p)
    }

    /// Free a node, returning its key and value.
    /// # Safety
    ///
    /// `p` must have come from [`Node::new_in`] with an equivalent allocator and must
    /// no longer be reachable from any tree.
    pub(crate) unsafe fn free_in<A: Allocator>(p: NodePtr<K, V>, alloc: &A) -> (K, V) {
        let n = p.as_ptr().read();
        alloc.deallocate(p.cast(), Self::LAYOUT);
        (n.key, n.value)
    }
}

/// Key and value of a live node, with a lifetime chosen by the caller.
/// # Safety
///
/// The node must stay allocated, and its value not mutated, for `'a`.
pub(crate) unsafe fn key_value<'a, K, V>(n: NodePtr<K, V>) -> (&'a K, &'a V) {
    (&node!(n).key, &node!(n).value)
}

/// Like [`key_value`], but the value is mutable.
/// # Safety
///
/// The node must stay allocated, and its value unaliased, for `'a`.
pub(crate) unsafe fn key_value_mut<'a, K, V>(n: NodePtr<K, V>) -> (&'a K, &'a mut V) {
    (&node!(n).key, &mut node!(n).value)
}

// Navigation. All of these require `n` (and every node reachable from it) to be live.

#[inline]
pub(crate) unsafe fn child<K, V>(n: NodePtr<K, V>, dir: Dir) -> Link<K, V> {
    match dir {
        Dir::Left => node!(n).left,
        Dir::Right => node!(n).right,
    }
}

#[inline]
pub(crate) unsafe fn set_child<K, V>(n: NodePtr<K, V>, dir: Dir, c: Link<K, V>) {
    match dir {
        Dir::Left => node!(n).left = c,
        Dir::Right => node!(n).right = c,
    }
}

/// Side of `parent` on which `n` hangs.
#[inline]
pub(crate) unsafe fn dir_of<K, V>(parent: NodePtr<K, V>, n: NodePtr<K, V>) -> Dir {
    if node!(parent).left == Some(n) {
        Dir::Left
    } else {
        Dir::Right
    }
}

/// The node if it is red. Absent children are black.
#[inline]
pub(crate) unsafe fn red<K, V>(n: Link<K, V>) -> Link<K, V> {
    n.filter(|p| node!(p).color == Color::Red)
}

#[inline]
pub(crate) unsafe fn is_black<K, V>(n: Link<K, V>) -> bool {
    red(n).is_none()
}

/// Leftmost node of the subtree rooted at `n`.
pub(crate) unsafe fn first<K, V>(mut n: NodePtr<K, V>) -> NodePtr<K, V> {
    while let Some(l) = node!(n).left {
        n = l;
    }
    n
}

/// Rightmost node of the subtree rooted at `n`.
pub(crate) unsafe fn last<K, V>(mut n: NodePtr<K, V>) -> NodePtr<K, V> {
    while let Some(r) = node!(n).right {
        n = r;
    }
    n
}

/// In-order successor, `None` past the last node.
pub(crate) unsafe fn successor<K, V>(n: NodePtr<K, V>) -> Link<K, V> {
    if let Some(r) = node!(n).right {
        return Some(first(r));
    }
    let mut n = n;
    while let Some(p) = node!(n).parent {
        if node!(p).left == Some(n) {
            return Some(p);
        }
        n = p;
    }
    None
}

/// In-order predecessor, `None` before the first node.
pub(crate) unsafe fn predecessor<K, V>(n: NodePtr<K, V>) -> Link<K, V> {
    if let Some(l) = node!(n).left {
        return Some(last(l));
    }
    let mut n = n;
    while let Some(p) = node!(n).parent {
        if node!(p).right == Some(n) {
            return Some(p);
        }
        n = p;
    }
    None
}
