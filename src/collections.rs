pub mod compare;

pub mod rb_tree;

pub use rb_tree::RbTree;

pub mod rb_map;

pub use rb_map::RbMap;

pub mod rb_set;

pub use rb_set::RbSet;

pub mod rb_multiset;

pub use rb_multiset::RbMultiSet;
