//! Graph algorithms over the bond graph.

pub mod rings;
pub mod walk;

pub use rings::{Ring, RingSet};
pub use walk::{longest_path, GraphWalker, Walk};
