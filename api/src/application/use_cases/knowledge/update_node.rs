use crate::application::access::Caller;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::knowledge_graph_store::KnowledgeGraphStore;
use crate::domain::accounts::account::UserType;
use crate::domain::knowledge::node::{NodeKind, sanitize_property};
use crate::domain::validation::require;

pub struct UpdateNode<'a, G: KnowledgeGraphStore + ?Sized> {
    pub graph: &'a G,
}

#[derive(Debug, Clone)]
pub struct UpdateNodeRequest {
    pub name: String,
    pub kind: String,
    pub property: String,
    pub value: String,
}

impl<'a, G: KnowledgeGraphStore + ?Sized> UpdateNode<'a, G> {
    pub async fn execute(&self, caller: &Caller, req: &UpdateNodeRequest) -> ServiceResult<()> {
        caller.require(UserType::Teacher)?;
        let name = require(&req.name, "name")?;
        let kind: NodeKind = require(&req.kind, "node_type")?.parse()?;
        let property = sanitize_property(&req.property)?;
        let value = require(&req.value, "new_value")?;
        if !self
            .graph
            .update_node_property(kind, name, property, value)
            .await?
        {
            return Err(ServiceError::not_found(format!("{kind} {name} not found")));
        }
        tracing::info!(kind = %kind, name = %name, property = %property, "knowledge_node_updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::MemoryGraph;
    use crate::domain::knowledge::node::NewNode;

    fn req(name: &str, property: &str, value: &str) -> UpdateNodeRequest {
        UpdateNodeRequest {
            name: name.into(),
            kind: "point".into(),
            property: property.into(),
            value: value.into(),
        }
    }

    #[tokio::test]
    async fn updates_existing_property() {
        let graph = MemoryGraph::default();
        graph
            .add_node(&NewNode::parse("Limits", "point", None).unwrap())
            .await
            .unwrap();
        let teacher = Caller::new("t1", UserType::Teacher);
        UpdateNode { graph: &graph }
            .execute(&teacher, &req("Limits", "description", "epsilon"))
            .await
            .unwrap();
        let node = graph.find_node(NodeKind::Point, "Limits").await.unwrap().unwrap();
        assert_eq!(node.description, "epsilon");
        assert_eq!(graph.property(node.id, "description").await.as_deref(), Some("epsilon"));
    }

    #[tokio::test]
    async fn refuses_name_changes_and_missing_nodes() {
        let graph = MemoryGraph::default();
        let teacher = Caller::new("t1", UserType::Teacher);
        let uc = UpdateNode { graph: &graph };
        assert!(matches!(
            uc.execute(&teacher, &req("Limits", "name", "x")).await,
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            uc.execute(&teacher, &req("Limits", "description", "")).await,
            Err(ServiceError::MissingParam(_))
        ));
        assert!(matches!(
            uc.execute(&teacher, &req("Ghost", "description", "x")).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
