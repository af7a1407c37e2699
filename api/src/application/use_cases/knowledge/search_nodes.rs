use crate::application::error::ServiceResult;
use crate::application::ports::knowledge_graph_store::KnowledgeGraphStore;
use crate::domain::knowledge::node::GraphNode;
use crate::domain::validation::require;

pub struct SearchNodes<'a, G: KnowledgeGraphStore + ?Sized> {
    pub graph: &'a G,
}

impl<'a, G: KnowledgeGraphStore + ?Sized> SearchNodes<'a, G> {
    pub async fn execute(&self, keyword: &str) -> ServiceResult<Vec<GraphNode>> {
        let keyword = require(keyword, "keyword")?;
        Ok(self.graph.search(keyword).await?)
    }
}
