use crate::{
    core::geo::LatLng,
    media::item::{MediaItem, MediaKind, RecordId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row shape of the `map_photos` collection.
///
/// `media_url` is the canonical URL column. Older rows carry `image_url`
/// instead and omit `media_type`; the read path folds both shapes into the
/// canonical [`MediaItem`]. The write path still fills `image_url` with the
/// same value so readers of the old schema keep working.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaKind>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub location_name: Option<String>,
}

impl MediaRecord {
    /// Builds the insert payload for a freshly uploaded file. The id is left
    /// for the persistence layer to assign.
    pub fn for_upload(
        position: LatLng,
        media_url: String,
        kind: MediaKind,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            lat: position.lat,
            lng: position.lng,
            image_url: Some(media_url.clone()),
            media_url: Some(media_url),
            media_type: Some(kind),
            created_at,
            location_name: None,
        }
    }

    /// Normalizes this row into the canonical item. `media_url` wins over
    /// the legacy `image_url`; a missing `media_type` defaults to image.
    /// Rows without an id or any usable URL yield `None` and are skipped on
    /// load.
    pub fn into_item(self) -> Option<MediaItem> {
        let id = self.id?;
        let media_url = self
            .media_url
            .or(self.image_url)
            .filter(|url| !url.is_empty())?;
        Some(MediaItem {
            id,
            position: LatLng::new(self.lat, self.lng),
            media_url,
            kind: self.media_type.unwrap_or(MediaKind::Image),
            created_at: self.created_at,
            location_name: self.location_name.filter(|name| !name.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_row_normalizes_to_image() {
        let row: MediaRecord = serde_json::from_str(
            r#"{
                "id": 7,
                "lat": 37.1773,
                "lng": -3.5986,
                "image_url": "https://example.com/storage/old/photo.jpg",
                "created_at": "2023-06-01T12:00:00Z",
                "location_name": null
            }"#,
        )
        .unwrap();

        let item = row.into_item().unwrap();
        assert_eq!(item.kind, MediaKind::Image);
        assert_eq!(item.media_url, "https://example.com/storage/old/photo.jpg");
        assert_eq!(item.id, RecordId(7));
        assert_eq!(item.location_name, None);
    }

    #[test]
    fn test_media_url_wins_over_legacy_image_url() {
        let row: MediaRecord = serde_json::from_str(
            r#"{
                "id": 8,
                "lat": 0.0,
                "lng": 0.0,
                "image_url": "https://example.com/old.jpg",
                "media_url": "https://example.com/new.mp4",
                "media_type": "video",
                "created_at": "2024-01-01T00:00:00Z"
            }"#,
        )
        .unwrap();

        let item = row.into_item().unwrap();
        assert_eq!(item.kind, MediaKind::Video);
        assert_eq!(item.media_url, "https://example.com/new.mp4");
    }

    #[test]
    fn test_row_without_url_is_skipped() {
        let row: MediaRecord = serde_json::from_str(
            r#"{"id": 9, "lat": 1.0, "lng": 2.0, "created_at": "2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(row.into_item().is_none());
    }

    #[test]
    fn test_upload_payload_fills_both_url_columns() {
        let record = MediaRecord::for_upload(
            LatLng::new(37.0, -3.0),
            "https://example.com/f.jpg".to_string(),
            MediaKind::Image,
            Utc::now(),
        );
        assert_eq!(record.media_url.as_deref(), Some("https://example.com/f.jpg"));
        assert_eq!(record.image_url.as_deref(), Some("https://example.com/f.jpg"));
        assert!(record.id.is_none());

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["media_type"], "image");
    }

    #[test]
    fn test_blank_location_name_treated_as_unset() {
        let row: MediaRecord = serde_json::from_str(
            r#"{
                "id": 10,
                "lat": 1.0,
                "lng": 2.0,
                "media_url": "https://example.com/f.jpg",
                "media_type": "image",
                "created_at": "2024-01-01T00:00:00Z",
                "location_name": "   "
            }"#,
        )
        .unwrap();
        assert_eq!(row.into_item().unwrap().location_name, None);
    }
}
