use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::knowledge::node::NodeKind;
use crate::domain::validation::{ValidationError, require};

/// Directed edge type between knowledge nodes. Stored as the lowercase English word;
/// the Chinese names used by older clients are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    Contains,
    Prerequisite,
    Related,
    Extends,
}

impl RelationKind {
    pub const ALL: [RelationKind; 4] = [
        RelationKind::Contains,
        RelationKind::Prerequisite,
        RelationKind::Related,
        RelationKind::Extends,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RelationKind::Contains => "contains",
            RelationKind::Prerequisite => "prerequisite",
            RelationKind::Related => "related",
            RelationKind::Extends => "extends",
        }
    }

    fn alias(self) -> &'static str {
        match self {
            RelationKind::Contains => "包含",
            RelationKind::Prerequisite => "前置",
            RelationKind::Related => "相关",
            RelationKind::Extends => "扩展",
        }
    }

    pub fn from_type(value: &str) -> Option<RelationKind> {
        let value = value.trim();
        RelationKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(value) || k.alias() == value)
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelationKind::from_type(s)
            .ok_or_else(|| ValidationError::invalid(format!("invalid relation type: {}", s.trim())))
    }
}

/// Hierarchy rule for edges: across levels only `contains` from a parent level to the
/// level directly below it; within one level any relation kind.
pub fn check_relation(
    source: NodeKind,
    target: NodeKind,
    kind: RelationKind,
) -> Result<(), ValidationError> {
    if source == target {
        return Ok(());
    }
    if source.child() != Some(target) {
        return Err(ValidationError::invalid(format!(
            "relation from {source} to {target} violates the chapter > section > point hierarchy"
        )));
    }
    if kind != RelationKind::Contains {
        return Err(ValidationError::invalid(format!(
            "only contains is allowed from {source} to {target}, got {kind}"
        )));
    }
    Ok(())
}

/// Fully typed reference to one edge, identified by endpoint names and kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationRef {
    pub source: String,
    pub source_kind: NodeKind,
    pub target: String,
    pub target_kind: NodeKind,
    pub kind: RelationKind,
}

impl RelationRef {
    pub fn parse(
        source: &str,
        source_kind: &str,
        target: &str,
        target_kind: &str,
        kind: &str,
    ) -> Result<Self, ValidationError> {
        let source = require(source, "source_name")?.to_string();
        let target = require(target, "target_name")?.to_string();
        let source_kind = require(source_kind, "source_type")?.parse()?;
        let target_kind = require(target_kind, "target_type")?.parse()?;
        let kind = require(kind, "relation_type")?.parse()?;
        Ok(RelationRef {
            source,
            source_kind,
            target,
            target_kind,
            kind,
        })
    }

    pub fn check(&self) -> Result<(), ValidationError> {
        check_relation(self.source_kind, self.target_kind, self.kind)
    }

    pub fn with_kind(&self, kind: RelationKind) -> RelationRef {
        RelationRef {
            kind,
            ..self.clone()
        }
    }
}
