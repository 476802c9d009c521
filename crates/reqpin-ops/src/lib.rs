pub mod index;
pub mod ops_compile;
pub mod ops_tree;
