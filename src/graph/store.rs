//! Adjacency snapshot of the skill_edges table.

use std::collections::HashMap;

use crate::error::Result;
use crate::storage::{Database, EdgeRecord};

/// Directed parent -> child adjacency over skill ids, with edge weights.
///
/// Weights describe how important a child is to its parent; they are
/// reporting metadata and never enter the frequency arithmetic.
#[derive(Debug, Default, Clone)]
pub struct SkillGraph {
    children: HashMap<i64, Vec<i64>>,
    parents: HashMap<i64, Vec<i64>>,
    weights: HashMap<(i64, i64), f64>,
}

impl SkillGraph {
    /// Snapshot the edge table.
    pub fn load(db: &Database) -> Result<Self> {
        Ok(Self::from_edges(&db.edges()?))
    }

    pub fn from_edges(edges: &[EdgeRecord]) -> Self {
        let mut graph = Self::default();
        for edge in edges {
            graph.add_edge(edge.parent_id, edge.child_id, edge.weight);
        }
        graph
    }

    pub fn add_edge(&mut self, parent: i64, child: i64, weight: f64) {
        self.children.entry(parent).or_default().push(child);
        self.parents.entry(child).or_default().push(parent);
        self.weights.insert((parent, child), weight);
    }

    pub fn children_of(&self, parent: i64) -> &[i64] {
        self.children.get(&parent).map_or(&[], Vec::as_slice)
    }

    pub fn parents_of(&self, child: i64) -> &[i64] {
        self.parents.get(&child).map_or(&[], Vec::as_slice)
    }

    pub fn weight(&self, parent: i64, child: i64) -> Option<f64> {
        self.weights.get(&(parent, child)).copied()
    }

    pub fn edge_count(&self) -> usize {
        self.weights.len()
    }
}
