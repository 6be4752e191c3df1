use crate::core::geo::LatLng;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the persistence layer on insert, immutable after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of media pinned to the map. Fixed at creation, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Determines the kind from a file's declared content type: a `video/`
    /// prefix means video, everything else is treated as an image.
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.starts_with("video/") {
            Self::Video
        } else {
            Self::Image
        }
    }

    /// Wire tag stored in the `media_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

/// Canonical in-memory record for one uploaded photo or video pinned to a
/// location.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
    pub id: RecordId,
    pub position: LatLng,
    pub media_url: String,
    pub kind: MediaKind,
    pub created_at: DateTime<Utc>,
    pub location_name: Option<String>,
}

impl MediaItem {
    /// Trailing path segment of the media URL, which is the object's name
    /// in storage.
    pub fn object_name(&self) -> &str {
        self.media_url.rsplit('/').next().unwrap_or("")
    }
}
