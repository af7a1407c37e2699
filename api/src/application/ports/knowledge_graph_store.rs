use async_trait::async_trait;

use crate::domain::knowledge::analysis::{ConnectionScore, PathResult, PrerequisiteStats};
use crate::domain::knowledge::graph::{Graph, RelationRow};
use crate::domain::knowledge::import::{ImportSummary, ValidatedImport};
use crate::domain::knowledge::node::{GraphNode, NewNode, NodeKind};
use crate::domain::knowledge::relation::{RelationKind, RelationRef};

#[derive(Debug, Clone, PartialEq)]
pub enum AddNodeOutcome {
    Created(GraphNode),
    Existing(GraphNode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddRelationOutcome {
    Created,
    SourceMissing,
    TargetMissing,
    AlreadyExists,
}

/// Labeled-property graph holding chapters, sections, points and their edges.
/// Every mutating call runs in its own transaction and either fully applies or not at all.
#[async_trait]
pub trait KnowledgeGraphStore: Send + Sync {
    async fn ping(&self) -> anyhow::Result<()>;

    async fn add_node(&self, node: &NewNode) -> anyhow::Result<AddNodeOutcome>;
    async fn find_node(&self, kind: NodeKind, name: &str) -> anyhow::Result<Option<GraphNode>>;
    async fn node_by_id(&self, kind: NodeKind, id: i64) -> anyhow::Result<Option<GraphNode>>;
    /// Returns false when no such node exists.
    async fn update_node_property(
        &self,
        kind: NodeKind,
        name: &str,
        property: &str,
        value: &str,
    ) -> anyhow::Result<bool>;
    /// Chapters and sections take every node reachable through `contains` with them.
    /// Returns the number of deleted nodes, or None when the node does not exist.
    async fn delete_node_cascade(&self, kind: NodeKind, name: &str) -> anyhow::Result<Option<u64>>;
    async fn search(&self, keyword: &str) -> anyhow::Result<Vec<GraphNode>>;

    async fn add_relation(&self, rel: &RelationRef) -> anyhow::Result<AddRelationOutcome>;
    /// Deletes every matching edge and returns how many went away.
    async fn delete_relations(&self, rel: &RelationRef) -> anyhow::Result<u64>;
    /// Swaps the type of an existing edge. Returns false when `old` does not exist.
    async fn replace_relation(&self, old: &RelationRef, new_kind: RelationKind)
    -> anyhow::Result<bool>;
    async fn relations_between(
        &self,
        source: NodeKind,
        target: NodeKind,
    ) -> anyhow::Result<Vec<RelationRow>>;

    /// Every node of `kind` plus the edges among them.
    async fn graph_of(&self, kind: NodeKind) -> anyhow::Result<Graph>;
    /// Children of `parent_id` one level down plus the edges among them.
    async fn children_of(&self, parent: NodeKind, parent_id: i64) -> anyhow::Result<Graph>;

    async fn shortest_path(
        &self,
        start: (NodeKind, &str),
        end: (NodeKind, &str),
    ) -> anyhow::Result<Option<PathResult>>;
    /// None when the point does not exist.
    async fn prerequisite_stats(&self, point_id: i64) -> anyhow::Result<Option<PrerequisiteStats>>;
    async fn degree_ranking(&self, limit: Option<i64>) -> anyhow::Result<Vec<ConnectionScore>>;

    /// Writes a validated document in one transaction, skipping what already exists.
    async fn import(&self, doc: &ValidatedImport) -> anyhow::Result<ImportSummary>;
}
