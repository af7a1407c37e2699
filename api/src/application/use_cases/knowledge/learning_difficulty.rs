use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::knowledge_graph_store::KnowledgeGraphStore;
use crate::domain::knowledge::analysis::DifficultyReport;

pub struct LearningDifficulty<'a, G: KnowledgeGraphStore + ?Sized> {
    pub graph: &'a G,
}

impl<'a, G: KnowledgeGraphStore + ?Sized> LearningDifficulty<'a, G> {
    pub async fn execute(&self, point_id: i64) -> ServiceResult<DifficultyReport> {
        let stats = self
            .graph
            .prerequisite_stats(point_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("point {point_id} not found")))?;
        Ok(DifficultyReport::from_stats(point_id, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::knowledge_graph_store::KnowledgeGraphStore;
    use crate::application::use_cases::test_support::seeded_graph;
    use crate::domain::knowledge::node::{NewNode, NodeKind};
    use crate::domain::knowledge::relation::RelationRef;

    #[tokio::test]
    async fn scores_prerequisite_chain() {
        let graph = seeded_graph().await;
        graph
            .add_node(&NewNode::parse("Sets", "point", None).unwrap())
            .await
            .unwrap();
        let rel = RelationRef::parse("Sets", "point", "Epsilon", "point", "prerequisite").unwrap();
        graph.add_relation(&rel).await.unwrap();
        let chain = graph
            .find_node(NodeKind::Point, "Chain rule")
            .await
            .unwrap()
            .unwrap();
        let report = LearningDifficulty { graph: &graph }
            .execute(chain.id)
            .await
            .unwrap();
        assert_eq!(report.prereq_count, 2);
        assert_eq!(report.max_depth, 2);
        assert_eq!(report.score, 5.0);
    }

    #[tokio::test]
    async fn non_points_are_not_found() {
        let graph = seeded_graph().await;
        let chapter = graph
            .find_node(NodeKind::Chapter, "Calculus")
            .await
            .unwrap()
            .unwrap();
        let res = LearningDifficulty { graph: &graph }.execute(chapter.id).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
    }
}
