use crate::application::access::Caller;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::knowledge_graph_store::KnowledgeGraphStore;
use crate::domain::accounts::account::UserType;
use crate::domain::knowledge::node::NodeKind;
use crate::domain::validation::require;

pub struct DeleteNode<'a, G: KnowledgeGraphStore + ?Sized> {
    pub graph: &'a G,
}

impl<'a, G: KnowledgeGraphStore + ?Sized> DeleteNode<'a, G> {
    /// Returns how many nodes were removed, including cascaded descendants.
    pub async fn execute(&self, caller: &Caller, name: &str, kind: &str) -> ServiceResult<u64> {
        caller.require(UserType::Teacher)?;
        let name = require(name, "name")?;
        let kind: NodeKind = require(kind, "node_type")?.parse()?;
        let deleted = self
            .graph
            .delete_node_cascade(kind, name)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("{kind} {name} not found")))?;
        tracing::info!(kind = %kind, name = %name, deleted, "knowledge_node_deleted");
        Ok(deleted)
    }
}
