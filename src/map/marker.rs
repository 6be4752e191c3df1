use crate::{
    core::geo::LatLng,
    map::popup::PopupContent,
    media::item::{MediaItem, MediaKind, RecordId},
};

/// Pixel size of the circular marker icon.
pub const ICON_SIZE: u32 = 50;

/// Icon shown for a media marker on the map.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerIcon {
    /// Circular thumbnail of the photo itself.
    Thumbnail { url: String },
    /// Dark circle with a play badge for videos.
    PlayBadge,
}

impl MarkerIcon {
    pub fn for_item(item: &MediaItem) -> Self {
        match item.kind {
            MediaKind::Image => Self::Thumbnail {
                url: item.media_url.clone(),
            },
            MediaKind::Video => Self::PlayBadge,
        }
    }
}

/// A marker anchored to one media item, addressed by the item's record id
/// so lookups never depend on coordinate equality.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaMarker {
    pub id: RecordId,
    pub position: LatLng,
    pub icon: MarkerIcon,
    pub popup: PopupContent,
}

impl MediaMarker {
    pub fn new(item: &MediaItem, display_name: String) -> Self {
        Self {
            id: item.id,
            position: item.position,
            icon: MarkerIcon::for_item(item),
            popup: PopupContent::for_item(item, display_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(kind: MediaKind) -> MediaItem {
        MediaItem {
            id: RecordId(3),
            position: LatLng::new(37.0, -3.0),
            media_url: "https://cdn.example.com/m".to_string(),
            kind,
            created_at: Utc::now(),
            location_name: None,
        }
    }

    #[test]
    fn test_video_marker_gets_play_badge() {
        let marker = MediaMarker::new(&item(MediaKind::Video), "Granada".to_string());
        assert_eq!(marker.icon, MarkerIcon::PlayBadge);
    }

    #[test]
    fn test_image_marker_gets_thumbnail() {
        let marker = MediaMarker::new(&item(MediaKind::Image), "Granada".to_string());
        assert_eq!(
            marker.icon,
            MarkerIcon::Thumbnail {
                url: "https://cdn.example.com/m".to_string()
            }
        );
        assert_eq!(marker.position, LatLng::new(37.0, -3.0));
    }
}
