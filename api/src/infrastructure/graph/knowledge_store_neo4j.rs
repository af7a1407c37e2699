use async_trait::async_trait;
use neo4rs::{Graph as Neo4jGraph, Query, Row, Txn, query};

use crate::application::ports::knowledge_graph_store::{
    AddNodeOutcome, AddRelationOutcome, KnowledgeGraphStore,
};
use crate::domain::knowledge::analysis::{
    ConnectionScore, PathRelationship, PathResult, PrerequisiteStats,
};
use crate::domain::knowledge::graph::{Graph, GraphLink, RelationRow};
use crate::domain::knowledge::import::{ImportSummary, ValidatedImport};
use crate::domain::knowledge::node::{GraphNode, NewNode, NodeKind, sanitize_property};
use crate::domain::knowledge::relation::{RelationKind, RelationRef};

/// Longest path `shortest_path` will search for.
const MAX_PATH_HOPS: u32 = 15;

const KNOWLEDGE_NODE: &str = "(n:chapter OR n:section OR n:point)";

/// Labels and relationship types are spliced from enums; every value is a parameter.
pub struct Neo4jKnowledgeStore {
    graph: Neo4jGraph,
}

impl Neo4jKnowledgeStore {
    pub fn new(graph: Neo4jGraph) -> Self {
        Self { graph }
    }

    async fn fetch_all(&self, q: Query) -> anyhow::Result<Vec<Row>> {
        let mut stream = self.graph.execute(q).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    async fn links_among(&self, kind: NodeKind, ids: &[i64]) -> anyhow::Result<Vec<GraphLink>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let label = kind.label();
        let q = query(&format!(
            "MATCH (a:{label})-[r]->(b:{label}) WHERE id(a) IN $ids AND id(b) IN $ids \
             RETURN id(a) AS source, id(b) AS target, type(r) AS kind"
        ))
        .param("ids", ids.to_vec());
        self.fetch_all(q).await?.iter().map(link_from_row).collect()
    }
}

/// How a transaction body wants its work settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Finish {
    Commit,
    Rollback,
}

#[async_trait]
trait Settle: Send + Sized {
    async fn commit_txn(self) -> anyhow::Result<()>;
    async fn rollback_txn(self) -> anyhow::Result<()>;
}

#[async_trait]
impl Settle for Txn {
    async fn commit_txn(self) -> anyhow::Result<()> {
        self.commit().await?;
        Ok(())
    }

    async fn rollback_txn(self) -> anyhow::Result<()> {
        self.rollback().await?;
        Ok(())
    }
}

/// Ends `txn` according to `body`. A failed body always rolls back and keeps its own error.
async fn settle<X: Settle, T: Send>(
    txn: X,
    body: anyhow::Result<(T, Finish)>,
) -> anyhow::Result<T> {
    match body {
        Ok((value, Finish::Commit)) => {
            txn.commit_txn().await?;
            Ok(value)
        }
        Ok((value, Finish::Rollback)) => {
            txn.rollback_txn().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback_txn().await {
                tracing::warn!(error = ?rollback_err, cause = %err, "graph_txn_rollback_failed");
            }
            Err(err)
        }
    }
}

async fn fetch_all_txn(txn: &mut Txn, q: Query) -> anyhow::Result<Vec<Row>> {
    let mut stream = txn.execute(q).await?;
    let mut rows = Vec::new();
    while let Some(row) = stream.next(txn.handle()).await? {
        rows.push(row);
    }
    Ok(rows)
}

fn node_columns(var: &str) -> String {
    format!(
        "id({var}) AS id, {var}.name AS name, labels({var})[0] AS label, \
         coalesce({var}.description, '') AS description"
    )
}

fn node_from_row(row: &Row) -> anyhow::Result<GraphNode> {
    let label: String = row.get("label")?;
    let kind = NodeKind::from_label(&label)
        .ok_or_else(|| anyhow::anyhow!("unexpected node label {label}"))?;
    Ok(GraphNode {
        id: row.get("id")?,
        name: row.get("name")?,
        kind,
        description: row.get("description")?,
    })
}

fn link_from_row(row: &Row) -> anyhow::Result<GraphLink> {
    Ok(GraphLink {
        source: row.get("source")?,
        target: row.get("target")?,
        kind: row.get("kind")?,
    })
}

async fn node_id_in_txn(txn: &mut Txn, kind: NodeKind, name: &str) -> anyhow::Result<Option<i64>> {
    let q = query(&format!(
        "MATCH (n:{} {{name: $name}}) RETURN id(n) AS id LIMIT 1",
        kind.label()
    ))
    .param("name", name);
    match fetch_all_txn(txn, q).await?.first() {
        Some(row) => Ok(Some(row.get("id")?)),
        None => Ok(None),
    }
}

async fn create_node_in_txn(txn: &mut Txn, node: &NewNode) -> anyhow::Result<GraphNode> {
    let q = query(&format!(
        "CREATE (n:{} {{name: $name, description: $description}}) RETURN {}",
        node.kind.label(),
        node_columns("n")
    ))
    .param("name", node.name.as_str())
    .param("description", node.description.as_str());
    let rows = fetch_all_txn(txn, q).await?;
    let row = rows
        .first()
        .ok_or_else(|| anyhow::anyhow!("create returned no row"))?;
    node_from_row(row)
}

/// Links `rel` if both ends exist and the edge is new.
async fn add_relation_in_txn(
    txn: &mut Txn,
    rel: &RelationRef,
) -> anyhow::Result<AddRelationOutcome> {
    let Some(source) = node_id_in_txn(txn, rel.source_kind, &rel.source).await? else {
        return Ok(AddRelationOutcome::SourceMissing);
    };
    let Some(target) = node_id_in_txn(txn, rel.target_kind, &rel.target).await? else {
        return Ok(AddRelationOutcome::TargetMissing);
    };
    let kind = rel.kind.as_str();
    let existing = fetch_all_txn(
        txn,
        query(&format!(
            "MATCH (a)-[r:{kind}]->(b) WHERE id(a) = $source AND id(b) = $target \
             RETURN id(r) AS id LIMIT 1"
        ))
        .param("source", source)
        .param("target", target),
    )
    .await?;
    if !existing.is_empty() {
        return Ok(AddRelationOutcome::AlreadyExists);
    }
    txn.run(
        query(&format!(
            "MATCH (a), (b) WHERE id(a) = $source AND id(b) = $target CREATE (a)-[:{kind}]->(b)"
        ))
        .param("source", source)
        .param("target", target),
    )
    .await?;
    Ok(AddRelationOutcome::Created)
}

#[async_trait]
impl KnowledgeGraphStore for Neo4jKnowledgeStore {
    async fn ping(&self) -> anyhow::Result<()> {
        self.fetch_all(query("RETURN 1 AS ok")).await?;
        Ok(())
    }

    async fn add_node(&self, node: &NewNode) -> anyhow::Result<AddNodeOutcome> {
        let mut txn = self.graph.start_txn().await?;
        let body: anyhow::Result<(AddNodeOutcome, Finish)> = async {
            let existing = fetch_all_txn(
                &mut txn,
                query(&format!(
                    "MATCH (n:{} {{name: $name}}) RETURN {} LIMIT 1",
                    node.kind.label(),
                    node_columns("n")
                ))
                .param("name", node.name.as_str()),
            )
            .await?;
            if let Some(row) = existing.first() {
                return Ok((AddNodeOutcome::Existing(node_from_row(row)?), Finish::Rollback));
            }
            let created = create_node_in_txn(&mut txn, node).await?;
            Ok((AddNodeOutcome::Created(created), Finish::Commit))
        }
        .await;
        settle(txn, body).await
    }

    async fn find_node(&self, kind: NodeKind, name: &str) -> anyhow::Result<Option<GraphNode>> {
        let q = query(&format!(
            "MATCH (n:{} {{name: $name}}) RETURN {} LIMIT 1",
            kind.label(),
            node_columns("n")
        ))
        .param("name", name);
        self.fetch_all(q).await?.first().map(node_from_row).transpose()
    }

    async fn node_by_id(&self, kind: NodeKind, id: i64) -> anyhow::Result<Option<GraphNode>> {
        let q = query(&format!(
            "MATCH (n:{}) WHERE id(n) = $id RETURN {}",
            kind.label(),
            node_columns("n")
        ))
        .param("id", id);
        self.fetch_all(q).await?.first().map(node_from_row).transpose()
    }

    async fn update_node_property(
        &self,
        kind: NodeKind,
        name: &str,
        property: &str,
        value: &str,
    ) -> anyhow::Result<bool> {
        let property = sanitize_property(property)?;
        let q = query(&format!(
            "MATCH (n:{} {{name: $name}}) SET n.{property} = $value RETURN id(n) AS id",
            kind.label()
        ))
        .param("name", name)
        .param("value", value);
        let mut txn = self.graph.start_txn().await?;
        let body: anyhow::Result<(bool, Finish)> = async {
            let rows = fetch_all_txn(&mut txn, q).await?;
            Ok((!rows.is_empty(), Finish::Commit))
        }
        .await;
        settle(txn, body).await
    }

    async fn delete_node_cascade(&self, kind: NodeKind, name: &str) -> anyhow::Result<Option<u64>> {
        let label = kind.label();
        let stmt = if kind == NodeKind::Point {
            format!("MATCH (n:{label} {{name: $name}}) DETACH DELETE n RETURN count(*) AS deleted")
        } else {
            format!(
                "MATCH (root:{label} {{name: $name}}) \
                 OPTIONAL MATCH (root)-[:{contains}*]->(child) \
                 WITH collect(DISTINCT root) + collect(DISTINCT child) AS doomed \
                 UNWIND doomed AS n \
                 WITH DISTINCT n \
                 DETACH DELETE n \
                 RETURN count(*) AS deleted",
                contains = RelationKind::Contains.as_str()
            )
        };
        let mut txn = self.graph.start_txn().await?;
        let body: anyhow::Result<(Option<u64>, Finish)> = async {
            let rows = fetch_all_txn(&mut txn, query(&stmt).param("name", name)).await?;
            let deleted: i64 = match rows.first() {
                Some(row) => row.get("deleted")?,
                None => 0,
            };
            if deleted == 0 {
                return Ok((None, Finish::Rollback));
            }
            Ok((Some(deleted as u64), Finish::Commit))
        }
        .await;
        settle(txn, body).await
    }

    async fn search(&self, keyword: &str) -> anyhow::Result<Vec<GraphNode>> {
        let q = query(&format!(
            "MATCH (n) WHERE {KNOWLEDGE_NODE} AND n.name CONTAINS $keyword \
             RETURN {} ORDER BY n.name",
            node_columns("n")
        ))
        .param("keyword", keyword);
        self.fetch_all(q).await?.iter().map(node_from_row).collect()
    }

    async fn add_relation(&self, rel: &RelationRef) -> anyhow::Result<AddRelationOutcome> {
        let mut txn = self.graph.start_txn().await?;
        let body: anyhow::Result<(AddRelationOutcome, Finish)> = async {
            let outcome = add_relation_in_txn(&mut txn, rel).await?;
            let finish = if outcome == AddRelationOutcome::Created {
                Finish::Commit
            } else {
                Finish::Rollback
            };
            Ok((outcome, finish))
        }
        .await;
        settle(txn, body).await
    }

    async fn delete_relations(&self, rel: &RelationRef) -> anyhow::Result<u64> {
        let q = query(&format!(
            "MATCH (a:{} {{name: $source}})-[r:{}]->(b:{} {{name: $target}}) \
             DELETE r RETURN count(*) AS deleted",
            rel.source_kind.label(),
            rel.kind.as_str(),
            rel.target_kind.label()
        ))
        .param("source", rel.source.as_str())
        .param("target", rel.target.as_str());
        let mut txn = self.graph.start_txn().await?;
        let body: anyhow::Result<(u64, Finish)> = async {
            let rows = fetch_all_txn(&mut txn, q).await?;
            let deleted: i64 = match rows.first() {
                Some(row) => row.get("deleted")?,
                None => 0,
            };
            Ok((deleted as u64, Finish::Commit))
        }
        .await;
        settle(txn, body).await
    }

    async fn replace_relation(
        &self,
        old: &RelationRef,
        new_kind: RelationKind,
    ) -> anyhow::Result<bool> {
        let q = query(&format!(
            "MATCH (a:{} {{name: $source}})-[r:{}]->(b:{} {{name: $target}}) \
             DELETE r \
             WITH DISTINCT a, b \
             MERGE (a)-[:{}]->(b) \
             RETURN id(a) AS id",
            old.source_kind.label(),
            old.kind.as_str(),
            old.target_kind.label(),
            new_kind.as_str()
        ))
        .param("source", old.source.as_str())
        .param("target", old.target.as_str());
        let mut txn = self.graph.start_txn().await?;
        let body: anyhow::Result<(bool, Finish)> = async {
            let rows = fetch_all_txn(&mut txn, q).await?;
            if rows.is_empty() {
                return Ok((false, Finish::Rollback));
            }
            Ok((true, Finish::Commit))
        }
        .await;
        settle(txn, body).await
    }

    async fn relations_between(
        &self,
        source: NodeKind,
        target: NodeKind,
    ) -> anyhow::Result<Vec<RelationRow>> {
        let q = query(&format!(
            "MATCH (a:{})-[r]->(b:{}) \
             RETURN a.name AS source, b.name AS target, type(r) AS kind \
             ORDER BY source, target",
            source.label(),
            target.label()
        ));
        self.fetch_all(q)
            .await?
            .iter()
            .map(|row| {
                Ok(RelationRow {
                    source: row.get("source")?,
                    target: row.get("target")?,
                    kind: row.get("kind")?,
                })
            })
            .collect()
    }

    async fn graph_of(&self, kind: NodeKind) -> anyhow::Result<Graph> {
        let q = query(&format!(
            "MATCH (n:{}) RETURN {} ORDER BY id",
            kind.label(),
            node_columns("n")
        ));
        let nodes = self
            .fetch_all(q)
            .await?
            .iter()
            .map(node_from_row)
            .collect::<anyhow::Result<Vec<_>>>()?;
        let ids: Vec<i64> = nodes.iter().map(|n| n.id).collect();
        let links = self.links_among(kind, &ids).await?;
        Ok(Graph { nodes, links })
    }

    async fn children_of(&self, parent: NodeKind, parent_id: i64) -> anyhow::Result<Graph> {
        let Some(child) = parent.child() else {
            return Ok(Graph::default());
        };
        let q = query(&format!(
            "MATCH (p:{})-[:{}]->(n:{}) WHERE id(p) = $id RETURN DISTINCT {} ORDER BY id",
            parent.label(),
            RelationKind::Contains.as_str(),
            child.label(),
            node_columns("n")
        ))
        .param("id", parent_id);
        let nodes = self
            .fetch_all(q)
            .await?
            .iter()
            .map(node_from_row)
            .collect::<anyhow::Result<Vec<_>>>()?;
        let ids: Vec<i64> = nodes.iter().map(|n| n.id).collect();
        let links = self.links_among(child, &ids).await?;
        Ok(Graph { nodes, links })
    }

    async fn shortest_path(
        &self,
        start: (NodeKind, &str),
        end: (NodeKind, &str),
    ) -> anyhow::Result<Option<PathResult>> {
        // shortestPath refuses identical endpoints
        if start.0 == end.0 && start.1 == end.1 {
            return Ok(self
                .find_node(start.0, start.1)
                .await?
                .map(|n| PathResult::new(vec![n], Vec::new())));
        }
        let q = query(&format!(
            "MATCH (a:{} {{name: $start}}), (b:{} {{name: $end}}) \
             MATCH p = shortestPath((a)-[*..{MAX_PATH_HOPS}]->(b)) \
             RETURN [x IN nodes(p) | id(x)] AS ids, \
                    [x IN nodes(p) | x.name] AS names, \
                    [x IN nodes(p) | labels(x)[0]] AS labels, \
                    [x IN nodes(p) | coalesce(x.description, '')] AS descriptions, \
                    [r IN relationships(p) | type(r)] AS kinds \
             LIMIT 1",
            start.0.label(),
            end.0.label()
        ))
        .param("start", start.1)
        .param("end", end.1);
        let rows = self.fetch_all(q).await?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };
        let ids: Vec<i64> = row.get("ids")?;
        let names: Vec<String> = row.get("names")?;
        let labels: Vec<String> = row.get("labels")?;
        let descriptions: Vec<String> = row.get("descriptions")?;
        let kinds: Vec<String> = row.get("kinds")?;

        let mut nodes = Vec::with_capacity(ids.len());
        for (((id, name), label), description) in
            ids.iter().zip(names).zip(labels).zip(descriptions)
        {
            let kind = NodeKind::from_label(&label)
                .ok_or_else(|| anyhow::anyhow!("unexpected node label {label}"))?;
            nodes.push(GraphNode {
                id: *id,
                name,
                kind,
                description,
            });
        }
        let relationships = ids
            .windows(2)
            .zip(kinds)
            .map(|(pair, kind)| PathRelationship {
                source: pair[0],
                target: pair[1],
                kind,
            })
            .collect();
        Ok(Some(PathResult::new(nodes, relationships)))
    }

    async fn prerequisite_stats(&self, point_id: i64) -> anyhow::Result<Option<PrerequisiteStats>> {
        // the aggregation below yields a zero row even for an unknown id
        if self.node_by_id(NodeKind::Point, point_id).await?.is_none() {
            return Ok(None);
        }
        let q = query(&format!(
            "MATCH (p:{}) WHERE id(p) = $id \
             OPTIONAL MATCH path = (pre)-[:{}*]->(p) WHERE pre <> p \
             RETURN count(DISTINCT pre) AS prereq_count, \
                    coalesce(max(length(path)), 0) AS max_depth",
            NodeKind::Point.label(),
            RelationKind::Prerequisite.as_str()
        ))
        .param("id", point_id);
        let rows = self.fetch_all(q).await?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };
        Ok(Some(PrerequisiteStats {
            prereq_count: row.get("prereq_count")?,
            max_depth: row.get("max_depth")?,
        }))
    }

    async fn degree_ranking(&self, limit: Option<i64>) -> anyhow::Result<Vec<ConnectionScore>> {
        let mut stmt = format!(
            "MATCH (n) WHERE {KNOWLEDGE_NODE} \
             OPTIONAL MATCH (n)-[r]-() \
             RETURN n.name AS name, labels(n)[0] AS label, count(r) AS score \
             ORDER BY score DESC, name"
        );
        if limit.is_some() {
            stmt.push_str(" LIMIT $limit");
        }
        let mut q = query(&stmt);
        if let Some(limit) = limit {
            q = q.param("limit", limit);
        }
        self.fetch_all(q)
            .await?
            .iter()
            .map(|row| {
                let label: String = row.get("label")?;
                let score: i64 = row.get("score")?;
                Ok(ConnectionScore {
                    name: row.get("name")?,
                    kind: NodeKind::from_label(&label)
                        .ok_or_else(|| anyhow::anyhow!("unexpected node label {label}"))?,
                    score: score as f64,
                })
            })
            .collect()
    }

    async fn import(&self, doc: &ValidatedImport) -> anyhow::Result<ImportSummary> {
        let mut txn = self.graph.start_txn().await?;
        let body: anyhow::Result<(ImportSummary, Finish)> = async {
            let mut summary = ImportSummary::default();
            for node in &doc.nodes {
                if node_id_in_txn(&mut txn, node.kind, &node.name).await?.is_some() {
                    summary.nodes_existing += 1;
                } else {
                    create_node_in_txn(&mut txn, node).await?;
                    summary.nodes_created += 1;
                }
            }
            for rel in &doc.relations {
                match add_relation_in_txn(&mut txn, rel).await? {
                    AddRelationOutcome::Created => summary.relations_created += 1,
                    AddRelationOutcome::AlreadyExists => summary.relations_existing += 1,
                    AddRelationOutcome::SourceMissing | AddRelationOutcome::TargetMissing => {
                        summary.relations_unresolved += 1
                    }
                }
            }
            Ok((summary, Finish::Commit))
        }
        .await;
        let summary = settle(txn, body).await?;
        tracing::info!(
            nodes_created = summary.nodes_created,
            relations_created = summary.relations_created,
            relations_unresolved = summary.relations_unresolved,
            "graph_import_committed"
        );
        Ok(summary)
    }
}
