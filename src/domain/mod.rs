//! Domain layer: the node arena, the tree, and its graph serialization
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod error;
pub mod graph;
pub mod tree;

pub use arena::{FreeSlots, Node, NodeArena, NodeId, NodeValue};
pub use error::{DomainError, DomainResult};
pub use graph::{render_dot, write_dot, NodeRole, Palette, Side};
pub use tree::{BinarySearchTree, Iter, Traversal};
