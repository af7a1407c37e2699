use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::knowledge_graph_store::KnowledgeGraphStore;
use crate::domain::knowledge::graph::Graph;
use crate::domain::knowledge::node::{GraphNode, NodeKind};

/// Read-only projections of the knowledge graph used by the browsing UI.
pub struct GraphViews<'a, G: KnowledgeGraphStore + ?Sized> {
    pub graph: &'a G,
}

impl<'a, G: KnowledgeGraphStore + ?Sized> GraphViews<'a, G> {
    pub async fn level(&self, kind: NodeKind) -> ServiceResult<Graph> {
        Ok(self.graph.graph_of(kind).await?)
    }

    /// Children one level below `parent_id` and the edges among them.
    pub async fn children(&self, parent: NodeKind, parent_id: i64) -> ServiceResult<Graph> {
        if parent.child().is_none() {
            return Err(ServiceError::invalid(format!("{parent} has no children")));
        }
        if self.graph.node_by_id(parent, parent_id).await?.is_none() {
            return Err(ServiceError::not_found(format!("{parent} {parent_id} not found")));
        }
        Ok(self.graph.children_of(parent, parent_id).await?)
    }

    pub async fn point(&self, id: i64) -> ServiceResult<GraphNode> {
        self.graph
            .node_by_id(NodeKind::Point, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("point {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::seeded_graph;

    #[tokio::test]
    async fn level_view_keeps_intra_level_links_only() {
        let graph = seeded_graph().await;
        let views = GraphViews { graph: &graph };
        let chapters = views.level(NodeKind::Chapter).await.unwrap();
        assert_eq!(chapters.nodes.len(), 2);
        assert_eq!(chapters.links.len(), 1);
        assert_eq!(chapters.links[0].kind, "related");
        let points = views.level(NodeKind::Point).await.unwrap();
        assert_eq!(points.links.len(), 1);
    }

    #[tokio::test]
    async fn children_of_chapter_are_its_sections() {
        let graph = seeded_graph().await;
        let views = GraphViews { graph: &graph };
        let calculus = graph
            .find_node(NodeKind::Chapter, "Calculus")
            .await
            .unwrap()
            .unwrap();
        let sections = views.children(NodeKind::Chapter, calculus.id).await.unwrap();
        let mut names: Vec<_> = sections.nodes.iter().map(|n| n.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["Derivatives", "Limits"]);
        assert!(sections.links.is_empty());
    }

    #[tokio::test]
    async fn unknown_parent_or_point_is_not_found() {
        let graph = seeded_graph().await;
        let views = GraphViews { graph: &graph };
        assert!(matches!(
            views.children(NodeKind::Section, 9_999).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            views.children(NodeKind::Point, 1).await,
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(views.point(9_999).await, Err(ServiceError::NotFound(_))));
    }
}
