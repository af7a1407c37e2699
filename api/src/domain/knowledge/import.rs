use serde::Deserialize;

use crate::domain::knowledge::node::NewNode;
use crate::domain::knowledge::relation::RelationRef;
use crate::domain::validation::ValidationError;

/// Bulk graph document accepted by auto-construct.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportDocument {
    #[serde(default)]
    pub nodes: Vec<ImportNode>,
    #[serde(default)]
    pub relations: Vec<ImportRelation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportNode {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportRelation {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub source_type: String,
    #[serde(default)]
    pub target_type: String,
    #[serde(default)]
    pub source_name: String,
    #[serde(default)]
    pub target_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidatedImport {
    pub nodes: Vec<NewNode>,
    pub relations: Vec<RelationRef>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub nodes_created: u64,
    pub nodes_existing: u64,
    pub relations_created: u64,
    pub relations_existing: u64,
    /// Relations whose source or target node was found neither in the store nor in the document.
    pub relations_unresolved: u64,
}

impl ImportDocument {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ValidationError> {
        serde_json::from_slice(bytes)
            .map_err(|e| ValidationError::invalid(format!("invalid graph document: {e}")))
    }

    /// Checks every entry and stops at the first bad one; nothing is written for a bad document.
    pub fn validate(&self) -> Result<ValidatedImport, ValidationError> {
        if self.nodes.is_empty() && self.relations.is_empty() {
            return Err(ValidationError::invalid("graph document is empty"));
        }
        let nodes = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| {
                NewNode::parse(&n.name, &n.kind, n.description.as_deref())
                    .map_err(|e| ValidationError::invalid(format!("nodes[{i}]: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let relations = self
            .relations
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let rel = RelationRef::parse(
                    &r.source_name,
                    &r.source_type,
                    &r.target_name,
                    &r.target_type,
                    &r.kind,
                )
                .and_then(|rel| rel.check().map(|_| rel));
                rel.map_err(|e| ValidationError::invalid(format!("relations[{i}]: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ValidatedImport { nodes, relations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::knowledge::node::NodeKind;
    use crate::domain::knowledge::relation::RelationKind;

    const SAMPLE: &str = r#"{
        "nodes": [
            {"name": "Calculus", "type": "chapter", "description": "intro"},
            {"name": "Limits", "type": "section"},
            {"name": "Epsilon-delta", "type": "point"}
        ],
        "relations": [
            {"type": "包含", "source_type": "chapter", "target_type": "section",
             "source_name": "Calculus", "target_name": "Limits"},
            {"type": "contains", "source_type": "section", "target_type": "point",
             "source_name": "Limits", "target_name": "Epsilon-delta"}
        ]
    }"#;

    #[test]
    fn accepts_well_formed_document() {
        let doc = ImportDocument::from_slice(SAMPLE.as_bytes()).unwrap();
        let valid = doc.validate().unwrap();
        assert_eq!(valid.nodes.len(), 3);
        assert_eq!(valid.nodes[0].kind, NodeKind::Chapter);
        assert_eq!(valid.nodes[1].description, "");
        assert_eq!(valid.relations[0].kind, RelationKind::Contains);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(ImportDocument::from_slice(b"{nodes: ").is_err());
    }

    #[test]
    fn rejects_unknown_node_type_with_position() {
        let doc = ImportDocument::from_slice(
            br#"{"nodes":[{"name":"a","type":"point"},{"name":"b","type":"topic"}]}"#,
        )
        .unwrap();
        let err = doc.validate().unwrap_err().to_string();
        assert!(err.starts_with("nodes[1]"), "{err}");
    }

    #[test]
    fn rejects_hierarchy_violation() {
        let doc = ImportDocument::from_slice(
            br#"{"relations":[{"type":"related","source_type":"chapter","target_type":"section",
                "source_name":"a","target_name":"b"}]}"#,
        )
        .unwrap();
        let err = doc.validate().unwrap_err().to_string();
        assert!(err.starts_with("relations[0]"), "{err}");
    }

    #[test]
    fn rejects_empty_document() {
        assert!(ImportDocument::default().validate().is_err());
    }
}
