use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::validation::{ValidationError, require};

static PROPERTY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]{0,63}$").unwrap());

/// Level of a knowledge node. The variants double as graph labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Chapter,
    Section,
    Point,
}

impl NodeKind {
    pub const ALL: [NodeKind; 3] = [NodeKind::Chapter, NodeKind::Section, NodeKind::Point];

    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Chapter => "chapter",
            NodeKind::Section => "section",
            NodeKind::Point => "point",
        }
    }

    /// The kind one level below in the chapter > section > point hierarchy.
    pub fn child(self) -> Option<NodeKind> {
        match self {
            NodeKind::Chapter => Some(NodeKind::Section),
            NodeKind::Section => Some(NodeKind::Point),
            NodeKind::Point => None,
        }
    }

    pub fn from_label(label: &str) -> Option<NodeKind> {
        NodeKind::ALL
            .into_iter()
            .find(|k| k.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for NodeKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::from_label(s)
            .ok_or_else(|| ValidationError::invalid(format!("invalid node type: {}", s.trim())))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: i64,
    pub name: String,
    pub kind: NodeKind,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNode {
    pub name: String,
    pub kind: NodeKind,
    pub description: String,
}

impl NewNode {
    pub fn parse(name: &str, kind: &str, description: Option<&str>) -> Result<Self, ValidationError> {
        let name = require(name, "name")?.to_string();
        let kind = require(kind, "type")?.parse()?;
        Ok(NewNode {
            name,
            kind,
            description: description.map(str::trim).unwrap_or_default().to_string(),
        })
    }
}

/// Property names end up inside Cypher text, so only plain identifiers pass.
/// `name` is the node identity and cannot be rewritten.
pub fn sanitize_property(property: &str) -> Result<&str, ValidationError> {
    let property = require(property, "property_name")?;
    if !PROPERTY_REGEX.is_match(property) {
        return Err(ValidationError::invalid(format!(
            "invalid property name: {property}"
        )));
    }
    if property == "name" {
        return Err(ValidationError::invalid("node name cannot be modified"));
    }
    Ok(property)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_case_insensitively() {
        assert_eq!("Chapter".parse::<NodeKind>(), Ok(NodeKind::Chapter));
        assert_eq!(" point ".parse::<NodeKind>(), Ok(NodeKind::Point));
        assert!("topic".parse::<NodeKind>().is_err());
    }

    #[test]
    fn hierarchy_children() {
        assert_eq!(NodeKind::Chapter.child(), Some(NodeKind::Section));
        assert_eq!(NodeKind::Section.child(), Some(NodeKind::Point));
        assert_eq!(NodeKind::Point.child(), None);
    }

    #[test]
    fn new_node_requires_name_and_type() {
        assert_eq!(
            NewNode::parse("", "point", None),
            Err(ValidationError::Missing("name"))
        );
        assert_eq!(
            NewNode::parse("Limits", "", None),
            Err(ValidationError::Missing("type"))
        );
        let node = NewNode::parse(" Limits ", "section", Some(" intro ")).unwrap();
        assert_eq!(node.name, "Limits");
        assert_eq!(node.kind, NodeKind::Section);
        assert_eq!(node.description, "intro");
    }

    #[test]
    fn property_names_are_sanitized() {
        assert_eq!(sanitize_property("description"), Ok("description"));
        assert!(sanitize_property("name").is_err());
        assert!(sanitize_property("desc) DETACH DELETE n //").is_err());
        assert!(sanitize_property("1abc").is_err());
        assert_eq!(
            sanitize_property("  "),
            Err(ValidationError::Missing("property_name"))
        );
    }
}
