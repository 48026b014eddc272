//! In-memory view of the skill hierarchy.
//!
//! Edges live in SQLite; analysis snapshots them into an adjacency map and
//! walks it explicitly instead of leaning on recursive SQL.

pub mod store;
pub mod traverse;

pub use store::SkillGraph;
pub use traverse::{ancestors_of, descendants_with_depth};
