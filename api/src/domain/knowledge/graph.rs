use crate::domain::knowledge::node::GraphNode;

/// Edge between two nodes, addressed by graph ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphLink {
    pub source: i64,
    pub target: i64,
    pub kind: String,
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

/// Edge between two kinds, addressed by node names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationRow {
    pub source: String,
    pub target: String,
    pub kind: String,
}
