//! Structural checks and diagnostic rendering for [`RbTree`].

use std::{cmp::Ordering, error::Error, fmt, marker::PhantomData};

use super::node::{child, Color, Dir, Link, Node, NodePtr};
use super::RbTree;
use crate::alloc::Allocator;
use crate::collections::compare::Compare;

/// Reason an [`RbTree`] failed [`RbTree::validate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvariantError {
    /// The root node is red.
    RedRoot,
    /// A red node has a red child.
    RedViolation,
    /// Two paths from one node down to an absent child pass different numbers of black nodes.
    BlackHeightMismatch,
    /// In-order keys are decreasing, or equal where keys must be unique.
    OrderViolation,
    /// A child's parent link does not point back at its parent, or the root has a parent.
    BrokenParentLink,
    /// The stored length differs from the number of reachable nodes.
    LengthMismatch {
        /// Length recorded by the tree.
        expected: usize,
        /// Nodes actually reachable from the root.
        found: usize,
    },
}

impl Error for InvariantError {}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedRoot => f.write_str("root node is red"),
            Self::RedViolation => f.write_str("red node has a red child"),
            Self::BlackHeightMismatch => f.write_str("black heights of sibling subtrees differ"),
            Self::OrderViolation => f.write_str("keys out of order"),
            Self::BrokenParentLink => f.write_str("parent link does not match child link"),
            Self::LengthMismatch { expected, found } => {
                write!(f, "length is {expected} but {found} nodes are reachable")
            }
        }
    }
}

impl<K, V, C, A: Allocator> RbTree<K, V, C, A> {
    /// Check every red-black and ordering invariant, returning the black-height of the tree
    /// (black nodes on any root-to-leaf path, absent children not counted).
    ///
    /// With `unique` equal adjacent keys are reported as [`InvariantError::OrderViolation`].
    pub fn validate(&self, unique: bool) -> Result<usize, InvariantError>
    where
        C: Compare<K>,
    {
        let Some(root) = self.root else {
            return match self.len {
                0 => Ok(0),
                n => Err(InvariantError::LengthMismatch {
                    expected: n,
                    found: 0,
                }),
            };
        };
        let (bh, found) = unsafe {
            if node!(root).parent.is_some() {
                return Err(InvariantError::BrokenParentLink);
            }
            if node!(root).color == Color::Red {
                return Err(InvariantError::RedRoot);
            }
            check_subtree(root)?
        };
        if found != self.len {
            return Err(InvariantError::LengthMismatch {
                expected: self.len,
                found,
            });
        }
        let mut keys = self.keys();
        if let Some(mut prev) = keys.next() {
            for k in keys {
                match self.cmp.compare(prev, k) {
                    Ordering::Greater => return Err(InvariantError::OrderViolation),
                    Ordering::Equal if unique => return Err(InvariantError::OrderViolation),
                    _ => {}
                }
                prev = k;
            }
        }
        Ok(bh)
    }

    /// Same as [`RbTree::validate`] but only says whether the tree is valid.
    pub fn is_valid(&self, unique: bool) -> bool
    where
        C: Compare<K>,
    {
        self.validate(unique).is_ok()
    }

    /// Number of nodes on the longest root-to-leaf path, 0 for an empty tree.
    #[must_use]
    pub fn height(&self) -> usize {
        fn depth<K, V>(n: Link<K, V>) -> usize {
            match n {
                None => 0,
                Some(p) => unsafe { 1 + depth(node!(p).left).max(depth(node!(p).right)) },
            }
        }
        depth(self.root)
    }

    /// Black nodes on the leftmost root-to-leaf path. Equal for every path in a valid tree.
    #[must_use]
    pub fn black_height(&self) -> usize {
        let mut bh = 0;
        let mut cur = self.root;
        while let Some(n) = cur {
            unsafe {
                if node!(n).color == Color::Black {
                    bh += 1;
                }
                cur = node!(n).left;
            }
        }
        bh
    }

    /// Renders the tree shape with colors, one node per line, e.g.
    ///
    /// ```text
    /// R----2(BLACK)
    ///    L----1(RED)
    ///    R----3(RED)
    /// ```
    pub fn shape(&self) -> Shape<'_, K, V> {
        Shape {
            root: self.root,
            _pd: PhantomData,
        }
    }
}

/// Returns (black-height including `n`, node count) of the subtree at `n`.
unsafe fn check_subtree<K, V>(n: NodePtr<K, V>) -> Result<(usize, usize), InvariantError> {
    let mut heights = [0; 2];
    let mut count = 1;
    for (i, dir) in [Dir::Left, Dir::Right].into_iter().enumerate() {
        if let Some(c) = child(n, dir) {
            if node!(c).parent != Some(n) {
                return Err(InvariantError::BrokenParentLink);
            }
            if node!(n).color == Color::Red && node!(c).color == Color::Red {
                return Err(InvariantError::RedViolation);
            }
            let (h, cnt) = check_subtree(c)?;
            heights[i] = h;
            count += cnt;
        }
    }
    if heights[0] != heights[1] {
        return Err(InvariantError::BlackHeightMismatch);
    }
    Ok((heights[0] + usize::from(node!(n).color == Color::Black), count))
}

/// Display adapter returned by [`RbTree::shape`].
pub struct Shape<'a, K, V> {
    root: Link<K, V>,
    _pd: PhantomData<&'a Node<K, V>>,
}

impl<K: fmt::Debug, V> fmt::Display for Shape<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            Some(r) => unsafe { write_node(f, r, "", true) },
            None => Ok(()),
        }
    }
}

unsafe fn write_node<K: fmt::Debug, V>(
    f: &mut fmt::Formatter<'_>,
    n: NodePtr<K, V>,
    indent: &str,
    last: bool,
) -> fmt::Result {
    let color = match node!(n).color {
        Color::Red => "RED",
        Color::Black => "BLACK",
    };
    let (branch, more) = if last {
        ("R----", "   ")
    } else {
        ("L----", "|  ")
    };
    writeln!(f, "{indent}{branch}{:?}({color})", node!(n).key)?;
    let indent = format!("{indent}{more}");
    if let Some(l) = node!(n).left {
        write_node(f, l, &indent, false)?;
    }
    if let Some(r) = node!(n).right {
        write_node(f, r, &indent, true)?;
    }
    Ok(())
}
