use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::knowledge_graph_store::KnowledgeGraphStore;
use crate::domain::knowledge::analysis::PathResult;
use crate::domain::knowledge::node::NodeKind;
use crate::domain::validation::require;

pub struct PathRecommend<'a, G: KnowledgeGraphStore + ?Sized> {
    pub graph: &'a G,
}

#[derive(Debug, Clone)]
pub struct PathRequest {
    pub start_name: String,
    pub start_type: String,
    pub end_name: String,
    pub end_type: String,
}

impl<'a, G: KnowledgeGraphStore + ?Sized> PathRecommend<'a, G> {
    /// Shortest directed path over any relation type.
    pub async fn execute(&self, req: &PathRequest) -> ServiceResult<PathResult> {
        let start = require(&req.start_name, "start_name")?;
        let start_kind: NodeKind = require(&req.start_type, "start_type")?.parse()?;
        let end = require(&req.end_name, "end_name")?;
        let end_kind: NodeKind = require(&req.end_type, "end_type")?.parse()?;
        self.graph
            .shortest_path((start_kind, start), (end_kind, end))
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("no path from {start} to {end}")))
    }
}
