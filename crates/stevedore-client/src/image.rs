//! Images as reported by the daemon's listing endpoint.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use stevedore_common::types::ImageId;

/// One element of the `GET /images/json` array, in wire vocabulary.
#[derive(Debug, Deserialize)]
pub(crate) struct ImageListing {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Repository", default)]
    repository: Option<String>,
    #[serde(rename = "Tag", default)]
    tag: Option<String>,
    #[serde(rename = "RepoTags", default)]
    repo_tags: Option<Vec<String>>,
    #[serde(rename = "Created", default)]
    created: Option<i64>,
    #[serde(rename = "Size", default)]
    size: Option<i64>,
    #[serde(rename = "VirtualSize", default)]
    virtual_size: Option<i64>,
}

/// An image known to the daemon.
///
/// Holds whatever the listing reported; nothing is refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Image identifier.
    pub id: ImageId,
    /// Repository name, as reported by older daemons.
    pub repository: Option<String>,
    /// Tag within the repository, as reported by older daemons.
    pub tag: Option<String>,
    /// `repository:tag` references, as reported by newer daemons.
    pub repo_tags: Vec<String>,
    /// Creation time.
    pub created: Option<DateTime<Utc>>,
    /// Size of the image's own layers in bytes.
    pub size: Option<i64>,
    /// Size including parent layers in bytes.
    pub virtual_size: Option<i64>,
}

impl Image {
    /// Builds an image from an identifier alone.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: ImageId::new(id),
            repository: None,
            tag: None,
            repo_tags: Vec::new(),
            created: None,
            size: None,
            virtual_size: None,
        }
    }

    pub(crate) fn from_listing(entry: ImageListing) -> Self {
        Self {
            id: ImageId::new(entry.id),
            repository: entry.repository,
            tag: entry.tag,
            repo_tags: entry.repo_tags.unwrap_or_default(),
            created: entry.created.and_then(|secs| DateTime::from_timestamp(secs, 0)),
            size: entry.size,
            virtual_size: entry.virtual_size,
        }
    }

    /// Human-readable reference: `repository:tag`, else the first repo tag.
    #[must_use]
    pub fn reference(&self) -> Option<String> {
        match (&self.repository, &self.tag) {
            (Some(repo), Some(tag)) => Some(format!("{repo}:{tag}")),
            (Some(repo), None) => Some(repo.clone()),
            _ => self.repo_tags.first().cloned(),
        }
    }
}
