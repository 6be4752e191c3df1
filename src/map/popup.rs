use crate::media::item::{MediaItem, MediaKind, RecordId};

/// Media element shown full-size inside a popup.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaElement {
    Image { url: String },
    Video { url: String },
}

/// Content of a marker popup: the full-size media, an editable location
/// name, previous/next navigation and a delete control.
///
/// Controls are typed and bound to the item's id here, instead of data
/// attributes scraped out of generated markup by a global click listener.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    pub id: RecordId,
    pub media: MediaElement,
    pub location_name: String,
}

impl PopupContent {
    pub fn for_item(item: &MediaItem, display_name: String) -> Self {
        let media = match item.kind {
            MediaKind::Image => MediaElement::Image {
                url: item.media_url.clone(),
            },
            MediaKind::Video => MediaElement::Video {
                url: item.media_url.clone(),
            },
        };
        Self {
            id: item.id,
            media,
            location_name: display_name,
        }
    }

    /// Renders the popup body. The classed controls are what an embedding
    /// UI wires back to the manager's navigate/edit/delete operations.
    pub fn html(&self) -> String {
        let media = match &self.media {
            MediaElement::Image { url } => {
                format!(r#"<img class="popup-media" src="{url}" alt="photo"/>"#)
            }
            MediaElement::Video { url } => format!(
                r#"<video class="popup-media" controls><source src="{url}" type="video/mp4"></video>"#
            ),
        };
        format!(
            concat!(
                r#"<div class="media-popup">"#,
                "{media}",
                r#"<div class="popup-location">"#,
                r#"<input class="location-input" value="{location}"/>"#,
                r#"<button class="save-location-btn">Save</button>"#,
                "</div>",
                r#"<div class="popup-nav">"#,
                r#"<button class="nav-prev-btn">&larr; Prev</button>"#,
                r#"<button class="nav-next-btn">Next &rarr;</button>"#,
                "</div>",
                r#"<button class="delete-media-btn">Delete</button>"#,
                "</div>"
            ),
            media = media,
            location = self.location_name,
        )
    }
}
