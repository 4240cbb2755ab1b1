//! # Domain Models
//!
//! These structs represent the core entities of Clipforge.
//! Field names serialize in camelCase so the persisted project list keeps
//! the layout the dashboard has always written, including the numeric
//! project ids of older builds.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Lifecycle state of a Project. Only `Completed` is produced today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Completed,
}

/// Lifecycle state of a Short. Fixed to `Ready` at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortStatus {
    Ready,
}

/// Identity of a Project.
///
/// New projects get a UUID v7. Lists written by earlier dashboard builds
/// carry the creation time in milliseconds as a bare JSON number, and both
/// forms may appear in one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProjectId {
    Uuid(Uuid),
    Timestamp(u64),
}

impl ProjectId {
    pub fn new() -> Self {
        Self::Uuid(Uuid::now_v7())
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ProjectId {
    fn from(id: Uuid) -> Self {
        Self::Uuid(id)
    }
}

impl From<u64> for ProjectId {
    fn from(millis: u64) -> Self {
        Self::Timestamp(millis)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid(id) => id.fmt(f),
            Self::Timestamp(millis) => millis.fmt(f),
        }
    }
}

impl FromStr for ProjectId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(millis) = s.parse::<u64>() {
            return Ok(Self::Timestamp(millis));
        }
        Uuid::parse_str(s)
            .map(Self::Uuid)
            .map_err(|_| AppError::Validation(format!("invalid project id {s:?}")))
    }
}

/// One processed upload and the shorts generated from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    /// Source file name as selected by the user
    pub original_video: String,
    /// Human-readable size, e.g. "12.34 MB"
    pub file_size: String,
    pub upload_date: NaiveDate,
    pub status: ProjectStatus,
    /// Owned exclusively by this project
    pub shorts: Vec<Short>,
}

impl Project {
    pub fn short(&self, short_id: u32) -> Option<&Short> {
        self.shorts.iter().find(|s| s.id == short_id)
    }
}

/// A fabricated short-form clip descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Short {
    /// Sequential, unique within the owning project
    pub id: u32,
    pub title: String,
    pub start_time: u32,
    pub duration: u32,
    /// Always `start_time + duration`
    pub end_time: u32,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub thumbnail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub status: ShortStatus,
}

impl Short {
    /// Media reference for playback. A missing URL is a data problem, not a panic.
    pub fn media_url(&self) -> Result<&str> {
        self.video_url
            .as_deref()
            .ok_or_else(|| AppError::DataIntegrity(format!("short {} has no video url", self.id)))
    }
}

/// What a caller selected. No content is ever read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoFile {
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Declared MIME type, e.g. "video/mp4"
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl VideoFile {
    pub fn new(name: impl Into<String>, size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
        }
    }

    /// Parsed `mime_type`, `None` when the declared type is malformed.
    pub fn declared_mime(&self) -> Option<mime::Mime> {
        self.mime_type.parse().ok()
    }

    /// Size in MiB as a float.
    pub fn size_mib(&self) -> f64 {
        self.size as f64 / (1024.0 * 1024.0)
    }
}

/// Human-readable outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub file_name: String,
    /// MiB with two decimals, e.g. "30.00"
    pub file_size: String,
    pub total_shorts: usize,
    pub timestamp: DateTime<Utc>,
}

/// Input to `ProjectStore::add_project`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    /// Falls back to the file name without extension
    pub title: Option<String>,
    pub file_name: String,
    /// MiB with two decimals, without unit
    pub file_size: String,
    pub shorts: Vec<Short>,
}

impl NewProject {
    pub fn from_run(summary: &RunSummary, shorts: Vec<Short>) -> Self {
        Self {
            title: Some(crate::format::display_stem(&summary.file_name).to_string()),
            file_name: summary.file_name.clone(),
            file_size: summary.file_size.clone(),
            shorts,
        }
    }
}

/// Partial update applied by `ProjectStore::update_project`.
/// Only `Some` fields are merged. Shorts cannot be edited in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub original_video: Option<String>,
    pub file_size: Option<String>,
    pub upload_date: Option<NaiveDate>,
    pub status: Option<ProjectStatus>,
}

impl ProjectPatch {
    pub fn apply(self, project: &mut Project) {
        if let Some(title) = self.title {
            project.title = title;
        }
        if let Some(original_video) = self.original_video {
            project.original_video = original_video;
        }
        if let Some(file_size) = self.file_size {
            project.file_size = file_size;
        }
        if let Some(upload_date) = self.upload_date {
            project.upload_date = upload_date;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
    }
}

/// The signed-in account as reported by the session collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}
