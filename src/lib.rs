#![deny(missing_docs)]

//! Ordered containers built on a red-black tree: [`collections::RbTree`] and the adapters
//! [`collections::RbMap`], [`collections::RbSet`] and [`collections::RbMultiSet`].
//!
//! Ordering is supplied by a [`collections::compare::Compare`] value, node memory by an
//! [`alloc::Allocator`]. Allocation failure can be observed through the `try_` methods.

//!# Features
//!
//! This crate supports the following cargo features:
//! - `unsafe-optim` : Enable unsafe optimisations in release mode.
//! - `cap` : Tests run with a capped global allocator that reports memory usage.

/// Memory allocation.
pub mod alloc;

/// Containers.
pub mod collections;
