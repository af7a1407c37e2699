use crate::application::access::Caller;
use crate::application::error::ServiceResult;
use crate::application::ports::knowledge_graph_store::{AddNodeOutcome, KnowledgeGraphStore};
use crate::domain::accounts::account::UserType;
use crate::domain::knowledge::node::{GraphNode, NewNode};

pub struct AddNode<'a, G: KnowledgeGraphStore + ?Sized> {
    pub graph: &'a G,
}

#[derive(Debug, Clone)]
pub struct AddNodeRequest {
    pub name: String,
    pub kind: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AddedNode {
    pub node: GraphNode,
    pub created: bool,
}

impl<'a, G: KnowledgeGraphStore + ?Sized> AddNode<'a, G> {
    /// Adding a node that already exists is not an error; the stored node is returned.
    pub async fn execute(&self, caller: &Caller, req: &AddNodeRequest) -> ServiceResult<AddedNode> {
        caller.require(UserType::Teacher)?;
        let node = NewNode::parse(&req.name, &req.kind, req.description.as_deref())?;
        let out = match self.graph.add_node(&node).await? {
            AddNodeOutcome::Created(node) => {
                tracing::info!(id = node.id, kind = %node.kind, name = %node.name, "knowledge_node_created");
                AddedNode {
                    node,
                    created: true,
                }
            }
            AddNodeOutcome::Existing(node) => AddedNode {
                node,
                created: false,
            },
        };
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error::ServiceError;
    use crate::application::use_cases::test_support::MemoryGraph;
    use crate::domain::knowledge::node::NodeKind;

    fn req(name: &str, kind: &str) -> AddNodeRequest {
        AddNodeRequest {
            name: name.into(),
            kind: kind.into(),
            description: Some("d".into()),
        }
    }

    #[tokio::test]
    async fn second_add_returns_existing_node() {
        let graph = MemoryGraph::default();
        let uc = AddNode { graph: &graph };
        let teacher = Caller::new("t1", UserType::Teacher);
        let first = uc.execute(&teacher, &req("Limits", "section")).await.unwrap();
        assert!(first.created);
        assert_eq!(first.node.kind, NodeKind::Section);
        let second = uc.execute(&teacher, &req("Limits", "section")).await.unwrap();
        assert!(!second.created);
        assert_eq!(second.node.id, first.node.id);
        assert_eq!(graph.node_count().await, 1);
    }

    #[tokio::test]
    async fn same_name_under_another_kind_is_a_new_node() {
        let graph = MemoryGraph::default();
        let uc = AddNode { graph: &graph };
        let teacher = Caller::new("t1", UserType::Teacher);
        uc.execute(&teacher, &req("Limits", "section")).await.unwrap();
        let point = uc.execute(&teacher, &req("Limits", "point")).await.unwrap();
        assert!(point.created);
    }

    #[tokio::test]
    async fn rejects_students_and_unknown_kinds() {
        let graph = MemoryGraph::default();
        let uc = AddNode { graph: &graph };
        let student = Caller::new("s1", UserType::Student);
        assert!(matches!(
            uc.execute(&student, &req("Limits", "point")).await,
            Err(ServiceError::Forbidden(_))
        ));
        let teacher = Caller::new("t1", UserType::Teacher);
        assert!(matches!(
            uc.execute(&teacher, &req("Limits", "topic")).await,
            Err(ServiceError::InvalidInput(_))
        ));
        assert_eq!(graph.node_count().await, 0);
    }
}
