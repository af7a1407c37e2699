use crate::application::error::ServiceResult;
use crate::application::ports::knowledge_graph_store::KnowledgeGraphStore;
use crate::domain::knowledge::graph::RelationRow;
use crate::domain::knowledge::node::NodeKind;
use crate::domain::validation::require;

pub struct RelationsBetween<'a, G: KnowledgeGraphStore + ?Sized> {
    pub graph: &'a G,
}

impl<'a, G: KnowledgeGraphStore + ?Sized> RelationsBetween<'a, G> {
    pub async fn execute(&self, source_type: &str, target_type: &str) -> ServiceResult<Vec<RelationRow>> {
        let source: NodeKind = require(source_type, "source_type")?.parse()?;
        let target: NodeKind = require(target_type, "target_type")?.parse()?;
        Ok(self.graph.relations_between(source, target).await?)
    }
}
