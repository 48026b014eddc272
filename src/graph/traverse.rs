//! Cycle-safe traversals over the skill graph.

use std::collections::HashSet;

use tracing::trace;

use super::SkillGraph;

/// Every ancestor reachable from `start` by following parent edges, the
/// start node excluded. The visited set doubles as the cycle guard: a
/// malformed cyclic edge set stops propagating instead of recursing
/// forever, so the walk is bounded by the number of distinct skills.
pub fn ancestors_of(graph: &SkillGraph, start: i64) -> HashSet<i64> {
    let mut visited = HashSet::new();
    visited.insert(start);
    let mut stack: Vec<i64> = graph.parents_of(start).to_vec();

    while let Some(node) = stack.pop() {
        if !visited.insert(node) {
            trace!(skill_id = node, "already visited, stopping propagation");
            continue;
        }
        stack.extend_from_slice(graph.parents_of(node));
    }

    visited.remove(&start);
    visited
}

/// Downward expansion from `start` through child edges, up to `max_depth`
/// levels, yielding (skill_id, level) with the start at level 0. Each node
/// is reported once at the shallowest level it is reachable at; revisits
/// (diamonds, cycles) are skipped.
pub fn descendants_with_depth(
    graph: &SkillGraph,
    start: i64,
    max_depth: usize,
) -> Vec<(i64, usize)> {
    let mut visited = HashSet::new();
    visited.insert(start);
    let mut out = vec![(start, 0)];
    let mut frontier = vec![start];

    for level in 1..=max_depth {
        let mut next = Vec::new();
        for node in frontier {
            for &child in graph.children_of(node) {
                if visited.insert(child) {
                    out.push((child, level));
                    next.push(child);
                }
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> SkillGraph {
        // 1 -> 2 -> 4, 1 -> 3 -> 4 (4 reaches 1 via two paths)
        let mut g = SkillGraph::default();
        g.add_edge(1, 2, 1.0);
        g.add_edge(1, 3, 1.0);
        g.add_edge(2, 4, 1.0);
        g.add_edge(3, 4, 1.0);
        g
    }

    #[test]
    fn ancestors_collects_all_paths_once() {
        let g = diamond();
        let ancestors = ancestors_of(&g, 4);
        assert_eq!(ancestors, HashSet::from([1, 2, 3]));
    }

    #[test]
    fn ancestors_of_root_is_empty() {
        let g = diamond();
        assert!(ancestors_of(&g, 1).is_empty());
    }

    #[test]
    fn ancestors_terminates_on_cycle() {
        let mut g = SkillGraph::default();
        g.add_edge(1, 2, 1.0);
        g.add_edge(2, 3, 1.0);
        g.add_edge(3, 1, 1.0);

        // Walking up from 1: parents(1) = {3}, parents(3) = {2}, parents(2) = {1}.
        assert_eq!(ancestors_of(&g, 1), HashSet::from([2, 3]));
    }

    #[test]
    fn ancestors_terminates_on_self_loop() {
        let mut g = SkillGraph::default();
        g.add_edge(1, 1, 1.0);
        g.add_edge(2, 1, 1.0);
        assert_eq!(ancestors_of(&g, 1), HashSet::from([2]));
    }

    #[test]
    fn descendants_respects_depth_limit() {
        let mut g = SkillGraph::default();
        g.add_edge(1, 2, 1.0);
        g.add_edge(2, 3, 1.0);
        g.add_edge(3, 4, 1.0);

        let slice = descendants_with_depth(&g, 1, 2);
        assert_eq!(slice, vec![(1, 0), (2, 1), (3, 2)]);
    }

    #[test]
    fn descendants_reports_diamond_node_once() {
        let g = diamond();
        let slice = descendants_with_depth(&g, 1, 3);
        let count_of_4 = slice.iter().filter(|(id, _)| *id == 4).count();
        assert_eq!(count_of_4, 1);
        assert!(slice.contains(&(4, 2)));
    }

    #[test]
    fn descendants_terminates_on_cycle() {
        let mut g = SkillGraph::default();
        g.add_edge(1, 2, 1.0);
        g.add_edge(2, 1, 1.0);

        let slice = descendants_with_depth(&g, 1, 10);
        assert_eq!(slice, vec![(1, 0), (2, 1)]);
    }
}
