use crate::application::access::Caller;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::knowledge_graph_store::{AddRelationOutcome, KnowledgeGraphStore};
use crate::domain::accounts::account::UserType;
use crate::domain::knowledge::relation::RelationRef;

pub struct AddLink<'a, G: KnowledgeGraphStore + ?Sized> {
    pub graph: &'a G,
}

#[derive(Debug, Clone)]
pub struct LinkRequest {
    pub source_name: String,
    pub source_type: String,
    pub target_name: String,
    pub target_type: String,
    pub relation_type: String,
}

impl LinkRequest {
    pub fn parse(&self) -> Result<RelationRef, crate::domain::validation::ValidationError> {
        RelationRef::parse(
            &self.source_name,
            &self.source_type,
            &self.target_name,
            &self.target_type,
            &self.relation_type,
        )
    }
}

impl<'a, G: KnowledgeGraphStore + ?Sized> AddLink<'a, G> {
    pub async fn execute(&self, caller: &Caller, req: &LinkRequest) -> ServiceResult<RelationRef> {
        caller.require(UserType::Teacher)?;
        let rel = req.parse()?;
        rel.check()?;
        match self.graph.add_relation(&rel).await? {
            AddRelationOutcome::Created => {
                tracing::info!(
                    source = %rel.source,
                    target = %rel.target,
                    kind = %rel.kind,
                    "knowledge_relation_created"
                );
                Ok(rel)
            }
            AddRelationOutcome::SourceMissing => Err(ServiceError::invalid(format!(
                "source {} {} does not exist",
                rel.source_kind, rel.source
            ))),
            AddRelationOutcome::TargetMissing => Err(ServiceError::invalid(format!(
                "target {} {} does not exist",
                rel.target_kind, rel.target
            ))),
            AddRelationOutcome::AlreadyExists => Err(ServiceError::Duplicate(format!(
                "relation {} already exists",
                rel.kind
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::seeded_graph;

    fn link(src: (&str, &str), dst: (&str, &str), kind: &str) -> LinkRequest {
        LinkRequest {
            source_name: src.0.into(),
            source_type: src.1.into(),
            target_name: dst.0.into(),
            target_type: dst.1.into(),
            relation_type: kind.into(),
        }
    }

    #[tokio::test]
    async fn creates_then_detects_duplicate() {
        let graph = seeded_graph().await;
        let teacher = Caller::new("t1", UserType::Teacher);
        let uc = AddLink { graph: &graph };
        let edges = graph.edge_count().await;
        uc.execute(
            &teacher,
            &link(("Epsilon", "point"), ("Chain rule", "point"), "related"),
        )
        .await
        .unwrap();
        assert_eq!(graph.edge_count().await, edges + 1);
        let again = uc
            .execute(
                &teacher,
                &link(("Epsilon", "point"), ("Chain rule", "point"), "相关"),
            )
            .await;
        assert!(matches!(again, Err(ServiceError::Duplicate(_))));
    }

    #[tokio::test]
    async fn missing_endpoints_are_rejected() {
        let graph = seeded_graph().await;
        let teacher = Caller::new("t1", UserType::Teacher);
        let uc = AddLink { graph: &graph };
        let res = uc
            .execute(
                &teacher,
                &link(("Ghost", "point"), ("Chain rule", "point"), "related"),
            )
            .await;
        assert!(matches!(res, Err(ServiceError::InvalidInput(m)) if m.starts_with("source")));
        let res = uc
            .execute(
                &teacher,
                &link(("Epsilon", "point"), ("Ghost", "point"), "related"),
            )
            .await;
        assert!(matches!(res, Err(ServiceError::InvalidInput(m)) if m.starts_with("target")));
    }

    #[tokio::test]
    async fn hierarchy_is_enforced_before_touching_the_store() {
        let graph = seeded_graph().await;
        let teacher = Caller::new("t1", UserType::Teacher);
        let edges = graph.edge_count().await;
        let res = AddLink { graph: &graph }
            .execute(
                &teacher,
                &link(("Calculus", "chapter"), ("Epsilon", "point"), "contains"),
            )
            .await;
        assert!(matches!(res, Err(ServiceError::InvalidInput(_))));
        assert_eq!(graph.edge_count().await, edges);
    }
}
