use crate::application::access::Caller;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::knowledge_graph_store::KnowledgeGraphStore;
use crate::application::use_cases::knowledge::add_link::LinkRequest;
use crate::domain::accounts::account::UserType;
use crate::domain::knowledge::relation::{RelationKind, RelationRef};
use crate::domain::validation::require;

pub struct UpdateLink<'a, G: KnowledgeGraphStore + ?Sized> {
    pub graph: &'a G,
}

impl<'a, G: KnowledgeGraphStore + ?Sized> UpdateLink<'a, G> {
    /// `current.relation_type` names the edge to change; `new_type` must satisfy the hierarchy rule.
    pub async fn execute(
        &self,
        caller: &Caller,
        current: &LinkRequest,
        new_type: &str,
    ) -> ServiceResult<RelationRef> {
        caller.require(UserType::Teacher)?;
        let old = current.parse()?;
        let new_kind: RelationKind = require(new_type, "new_relation_type")?.parse()?;
        let updated = old.with_kind(new_kind);
        updated.check()?;
        if new_kind == old.kind {
            return Err(ServiceError::invalid("new relation type equals the current one"));
        }
        if !self.graph.replace_relation(&old, new_kind).await? {
            return Err(ServiceError::not_found(format!(
                "no {} relation from {} to {}",
                old.kind, old.source, old.target
            )));
        }
        tracing::info!(source = %old.source, target = %old.target, from = %old.kind, to = %new_kind, "knowledge_relation_updated");
        Ok(updated)
    }
}
