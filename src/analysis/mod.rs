//! Frequency analysis over the skill hierarchy.
//!
//! `counter` turns raw mention rows into per-leaf frequencies, `aggregate`
//! propagates them up the graph, `report` exposes read-only views over the
//! result.

pub mod aggregate;
pub mod counter;
pub mod report;

pub use aggregate::{run_analysis, AnalysisOutcome, HierarchicalAggregator};
pub use counter::{count_mentions, LeafFrequency};
