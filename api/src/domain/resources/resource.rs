use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::validation::{ValidationError, check_char_len, require};

pub const TITLE_MAX_CHARS: usize = 100;
pub const POINT_NAME_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 65_535;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Video,
    Courseware,
    Exercise,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Video => "video",
            ResourceKind::Courseware => "courseware",
            ResourceKind::Exercise => "exercise",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" => Ok(ResourceKind::Video),
            "courseware" => Ok(ResourceKind::Courseware),
            "exercise" => Ok(ResourceKind::Exercise),
            other => Err(ValidationError::invalid(format!(
                "invalid resource type: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(ValidationError::invalid(format!(
                "difficulty must be easy, medium or hard, got {other}"
            ))),
        }
    }
}

/// Logical bucket an object lands in; the concrete bucket names come from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketKind {
    Video,
    Picture,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub bucket: BucketKind,
    /// Extension including the leading dot, lowercased.
    pub extension: String,
    pub content_type: String,
}

const DOCUMENT_TYPES: &[(&str, &str)] = &[
    (".pdf", "application/pdf"),
    (".ppt", "application/vnd.ms-powerpoint"),
    (
        ".pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    (".doc", "application/msword"),
    (
        ".docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
];

pub fn cover_target() -> UploadTarget {
    UploadTarget {
        bucket: BucketKind::Picture,
        extension: ".jpg".into(),
        content_type: "image/jpeg".into(),
    }
}

/// Picks bucket, object suffix and content type for an uploaded file.
pub fn classify_upload(
    kind: ResourceKind,
    filename: Option<&str>,
) -> Result<UploadTarget, ValidationError> {
    let ext = filename
        .and_then(|f| Path::new(f).extension())
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()));
    match kind {
        ResourceKind::Video => {
            let ext = ext.unwrap_or_else(|| ".mp4".into());
            let mime = mime_guess::from_ext(ext.trim_start_matches('.'))
                .first()
                .filter(|m| m.type_() == mime_guess::mime::VIDEO)
                .ok_or_else(|| ValidationError::invalid(format!("unsupported video file type: {ext}")))?;
            Ok(UploadTarget {
                bucket: BucketKind::Video,
                extension: ext,
                content_type: mime.essence_str().to_string(),
            })
        }
        ResourceKind::Courseware | ResourceKind::Exercise => {
            let ext = ext.ok_or_else(|| ValidationError::invalid("file name has no extension"))?;
            let content_type = DOCUMENT_TYPES
                .iter()
                .find(|(e, _)| *e == ext)
                .map(|(_, ct)| ct.to_string())
                .ok_or_else(|| ValidationError::invalid(format!("unsupported document type: {ext}")))?;
            Ok(UploadTarget {
                bucket: BucketKind::File,
                extension: ext,
                content_type,
            })
        }
    }
}

/// Where the bytes of a new resource come from.
#[derive(Debug, Clone)]
pub enum ResourceSource {
    Link(String),
    File { filename: Option<String>, bytes: Vec<u8> },
}

#[derive(Debug, Clone)]
pub struct ResourceDraft {
    pub kind: ResourceKind,
    pub title: String,
    pub description: String,
    pub difficulty: Option<Difficulty>,
    pub point_name: String,
}

pub struct RawResourceForm<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub difficulty: Option<&'a str>,
    pub resource_type: &'a str,
    pub point_name: &'a str,
}

impl ResourceDraft {
    pub fn parse(form: RawResourceForm<'_>) -> Result<Self, ValidationError> {
        let title = require(form.title, "title")?;
        check_char_len(title, "title", 1, TITLE_MAX_CHARS)?;
        let point_name = require(form.point_name, "point_name")?;
        check_char_len(point_name, "point_name", 1, POINT_NAME_MAX_CHARS)?;
        let kind: ResourceKind = require(form.resource_type, "resource_type")?.parse()?;
        let description = form.description.map(str::trim).unwrap_or_default();
        check_char_len(description, "description", 0, DESCRIPTION_MAX_CHARS)?;
        let difficulty = match form.difficulty.map(str::trim).filter(|d| !d.is_empty()) {
            Some(d) => Some(d.parse::<Difficulty>()?),
            None => None,
        };
        if kind == ResourceKind::Exercise && difficulty.is_none() {
            return Err(ValidationError::Missing("difficulty"));
        }
        Ok(ResourceDraft {
            kind,
            title: title.to_string(),
            description: description.to_string(),
            difficulty,
            point_name: point_name.to_string(),
        })
    }
}

pub fn validate_link(link: &str) -> Result<String, ValidationError> {
    let link = link.trim();
    if link.starts_with("http://") || link.starts_with("https://") {
        Ok(link.to_string())
    } else {
        Err(ValidationError::invalid("resource_link must be an http(s) URL"))
    }
}

#[derive(Debug, Clone)]
pub struct Video {
    pub id: i64,
    pub title: String,
    pub play_url: String,
    pub cover_url: String,
    pub description: String,
    pub point_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Courseware {
    pub id: i64,
    pub title: String,
    pub courseware_url: String,
    pub description: String,
    pub point_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Exercise {
    pub id: i64,
    pub title: String,
    pub exercise_url: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub point_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row to insert; the url field is interpreted per resource kind.
#[derive(Debug, Clone)]
pub struct NewResource {
    pub kind: ResourceKind,
    pub title: String,
    pub url: String,
    pub cover_url: String,
    pub description: String,
    pub difficulty: Option<Difficulty>,
    pub point_id: i64,
}
