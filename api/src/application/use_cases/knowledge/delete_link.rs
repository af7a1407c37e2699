use crate::application::access::Caller;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::knowledge_graph_store::KnowledgeGraphStore;
use crate::application::use_cases::knowledge::add_link::LinkRequest;
use crate::domain::accounts::account::UserType;

pub struct DeleteLink<'a, G: KnowledgeGraphStore + ?Sized> {
    pub graph: &'a G,
}

impl<'a, G: KnowledgeGraphStore + ?Sized> DeleteLink<'a, G> {
    /// Removes every matching edge; at least one must exist.
    pub async fn execute(&self, caller: &Caller, req: &LinkRequest) -> ServiceResult<u64> {
        caller.require(UserType::Teacher)?;
        let rel = req.parse()?;
        let deleted = self.graph.delete_relations(&rel).await?;
        if deleted == 0 {
            return Err(ServiceError::not_found(format!(
                "no {} relation from {} to {}",
                rel.kind, rel.source, rel.target
            )));
        }
        tracing::info!(source = %rel.source, target = %rel.target, kind = %rel.kind, deleted, "knowledge_relation_deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::seeded_graph;

    fn req(kind: &str) -> LinkRequest {
        LinkRequest {
            source_name: "Epsilon".into(),
            source_type: "point".into(),
            target_name: "Chain rule".into(),
            target_type: "point".into(),
            relation_type: kind.into(),
        }
    }

    #[tokio::test]
    async fn deletes_existing_and_reports_missing() {
        let graph = seeded_graph().await;
        let teacher = Caller::new("t1", UserType::Teacher);
        let uc = DeleteLink { graph: &graph };
        assert_eq!(uc.execute(&teacher, &req("前置")).await.unwrap(), 1);
        assert!(matches!(
            uc.execute(&teacher, &req("prerequisite")).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
