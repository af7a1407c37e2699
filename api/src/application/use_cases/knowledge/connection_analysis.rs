use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::knowledge_graph_store::KnowledgeGraphStore;
use crate::domain::knowledge::analysis::ConnectionScore;

pub struct ConnectionAnalysis<'a, G: KnowledgeGraphStore + ?Sized> {
    pub graph: &'a G,
}

impl<'a, G: KnowledgeGraphStore + ?Sized> ConnectionAnalysis<'a, G> {
    /// Degree centrality of every knowledge node, highest first.
    pub async fn execute(&self, limit: Option<i64>) -> ServiceResult<Vec<ConnectionScore>> {
        if limit.is_some_and(|l| l <= 0) {
            return Err(ServiceError::invalid("limit must be positive"));
        }
        Ok(self.graph.degree_ranking(limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::seeded_graph;

    #[tokio::test]
    async fn ranks_by_degree() {
        let graph = seeded_graph().await;
        let ranking = ConnectionAnalysis { graph: &graph }
            .execute(Some(2))
            .await
            .unwrap();
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].name, "Calculus");
        assert_eq!(ranking[0].score, 3.0);
        assert!(ranking[0].score >= ranking[1].score);
    }
}
