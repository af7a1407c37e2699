use std::path::Path;

use crate::application::access::Caller;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::knowledge_graph_store::KnowledgeGraphStore;
use crate::domain::accounts::account::UserType;
use crate::domain::knowledge::import::{ImportDocument, ImportSummary};

pub struct AutoConstruct<'a, G: KnowledgeGraphStore + ?Sized> {
    pub graph: &'a G,
}

impl<'a, G: KnowledgeGraphStore + ?Sized> AutoConstruct<'a, G> {
    /// Builds graph content from an uploaded JSON document. The whole document is
    /// validated up front and written in a single transaction.
    pub async fn execute(
        &self,
        caller: &Caller,
        filename: Option<&str>,
        bytes: &[u8],
    ) -> ServiceResult<ImportSummary> {
        caller.require(UserType::Teacher)?;
        let is_json = filename
            .and_then(|f| Path::new(f).extension())
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if !is_json {
            return Err(ServiceError::invalid("only .json files are accepted"));
        }
        if bytes.is_empty() {
            return Err(ServiceError::MissingParam("file".into()));
        }
        let doc = ImportDocument::from_slice(bytes)?.validate()?;
        let summary = self.graph.import(&doc).await?;
        tracing::info!(
            nodes_created = summary.nodes_created,
            nodes_existing = summary.nodes_existing,
            relations_created = summary.relations_created,
            relations_existing = summary.relations_existing,
            relations_unresolved = summary.relations_unresolved,
            by = %caller.user_id,
            "knowledge_graph_imported"
        );
        Ok(summary)
    }
}
