use crate::domain::knowledge::node::{GraphNode, NodeKind};

/// Weight of the longest prerequisite chain relative to the plain prerequisite count.
pub const DEPTH_WEIGHT: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRelationship {
    pub source: i64,
    pub target: i64,
    pub kind: String,
}

#[derive(Debug, Clone)]
pub struct PathResult {
    pub nodes: Vec<GraphNode>,
    pub relationships: Vec<PathRelationship>,
    pub description: Vec<String>,
}

impl PathResult {
    /// `nodes` are in path order and `relationships[i]` joins `nodes[i]` to `nodes[i + 1]`.
    pub fn new(nodes: Vec<GraphNode>, relationships: Vec<PathRelationship>) -> Self {
        let description = nodes
            .windows(2)
            .zip(&relationships)
            .map(|(pair, rel)| format!("{} -> ({}) -> {}", pair[0].name, rel.kind, pair[1].name))
            .collect();
        PathResult {
            nodes,
            relationships,
            description,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrerequisiteStats {
    pub prereq_count: i64,
    pub max_depth: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyReport {
    pub point_id: i64,
    pub prereq_count: i64,
    pub max_depth: i64,
    pub score: f64,
}

impl DifficultyReport {
    pub fn from_stats(point_id: i64, stats: PrerequisiteStats) -> Self {
        let score = stats.prereq_count as f64 + stats.max_depth as f64 * DEPTH_WEIGHT;
        DifficultyReport {
            point_id,
            prereq_count: stats.prereq_count,
            max_depth: stats.max_depth,
            score,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionScore {
    pub name: String,
    pub kind: NodeKind,
    pub score: f64,
}
