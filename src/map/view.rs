use crate::{core::geo::LatLng, map::marker::MediaMarker, media::item::RecordId, prelude::HashMap};
use std::time::Duration;

/// View and base tile layer configuration.
#[derive(Debug, Clone)]
pub struct MapViewOptions {
    /// Slippy tile URL template for the base layer.
    pub tile_url: String,
    pub max_zoom: u8,
    /// Zoom used on initialization and when flying to a marker.
    pub default_zoom: f64,
}

impl Default for MapViewOptions {
    fn default() -> Self {
        Self {
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            max_zoom: 19,
            default_zoom: 13.0,
        }
    }
}

/// Events emitted by the view for the embedding UI (and the tests) to drain.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    ViewChanged {
        center: LatLng,
        zoom: f64,
    },
    /// Animated move; the UI animates over `duration`, the view's camera
    /// state already points at the destination.
    FlyTo {
        center: LatLng,
        zoom: f64,
        duration: Duration,
    },
    MarkerAdded {
        id: RecordId,
    },
    MarkerReplaced {
        id: RecordId,
    },
    MarkerRemoved {
        id: RecordId,
    },
    PopupOpened {
        id: RecordId,
    },
    PopupClosed,
}

/// Headless map view: the camera, the id-keyed marker registry and the open
/// popup. Tile fetching and drawing are the embedding UI's business.
pub struct MapView {
    center: LatLng,
    zoom: f64,
    options: MapViewOptions,
    markers: HashMap<RecordId, MediaMarker>,
    open_popup: Option<RecordId>,
    events: Vec<MapEvent>,
}

impl MapView {
    pub fn new(center: LatLng, zoom: f64, options: MapViewOptions) -> Self {
        Self {
            center,
            zoom,
            options,
            markers: HashMap::default(),
            open_popup: None,
            events: Vec::new(),
        }
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn options(&self) -> &MapViewOptions {
        &self.options
    }

    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.center = center;
        self.zoom = zoom;
        self.emit(MapEvent::ViewChanged { center, zoom });
    }

    pub fn fly_to(&mut self, center: LatLng, zoom: f64, duration: Duration) {
        self.center = center;
        self.zoom = zoom;
        self.emit(MapEvent::FlyTo {
            center,
            zoom,
            duration,
        });
    }

    /// Registers the marker for an item. Re-registering an id replaces the
    /// previous marker; markers never stack per id.
    pub fn upsert_marker(&mut self, marker: MediaMarker) {
        let id = marker.id;
        let replaced = self.markers.insert(id, marker).is_some();
        if replaced {
            self.emit(MapEvent::MarkerReplaced { id });
        } else {
            self.emit(MapEvent::MarkerAdded { id });
        }
    }

    /// Tears down a marker, closing its popup if open. Returns whether a
    /// marker existed.
    pub fn remove_marker(&mut self, id: RecordId) -> bool {
        if self.open_popup == Some(id) {
            self.close_popup();
        }
        if self.markers.remove(&id).is_some() {
            self.emit(MapEvent::MarkerRemoved { id });
            true
        } else {
            false
        }
    }

    pub fn marker(&self, id: RecordId) -> Option<&MediaMarker> {
        self.markers.get(&id)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Opens the popup of a registered marker, closing any other popup
    /// first. Returns false for an unknown id.
    pub fn open_popup(&mut self, id: RecordId) -> bool {
        if !self.markers.contains_key(&id) {
            return false;
        }
        if self.open_popup.is_some() && self.open_popup != Some(id) {
            self.close_popup();
        }
        self.open_popup = Some(id);
        self.emit(MapEvent::PopupOpened { id });
        true
    }

    pub fn close_popup(&mut self) {
        if self.open_popup.take().is_some() {
            self.emit(MapEvent::PopupClosed);
        }
    }

    pub fn open_popup_id(&self) -> Option<RecordId> {
        self.open_popup
    }

    /// Drains queued events for processing by the embedding UI.
    pub fn take_events(&mut self) -> Vec<MapEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: MapEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::item::{MediaItem, MediaKind};
    use chrono::Utc;

    fn marker(id: i64) -> MediaMarker {
        let item = MediaItem {
            id: RecordId(id),
            position: LatLng::new(37.0, -3.0),
            media_url: format!("memory://fotos-mapa/{id}.jpg"),
            kind: MediaKind::Image,
            created_at: Utc::now(),
            location_name: None,
        };
        MediaMarker::new(&item, "Granada".to_string())
    }

    fn view() -> MapView {
        MapView::new(LatLng::new(37.1773, -3.5986), 13.0, MapViewOptions::default())
    }

    #[test]
    fn test_upsert_replaces_instead_of_stacking() {
        let mut view = view();
        view.upsert_marker(marker(1));
        view.upsert_marker(marker(1));
        assert_eq!(view.marker_count(), 1);

        let events = view.take_events();
        assert_eq!(
            events,
            vec![
                MapEvent::MarkerAdded { id: RecordId(1) },
                MapEvent::MarkerReplaced { id: RecordId(1) },
            ]
        );
    }

    #[test]
    fn test_open_popup_requires_registered_marker() {
        let mut view = view();
        assert!(!view.open_popup(RecordId(9)));
        view.upsert_marker(marker(9));
        assert!(view.open_popup(RecordId(9)));
        assert_eq!(view.open_popup_id(), Some(RecordId(9)));
    }

    #[test]
    fn test_opening_second_popup_closes_first() {
        let mut view = view();
        view.upsert_marker(marker(1));
        view.upsert_marker(marker(2));
        view.open_popup(RecordId(1));
        view.take_events();

        view.open_popup(RecordId(2));
        assert_eq!(view.open_popup_id(), Some(RecordId(2)));
        assert_eq!(
            view.take_events(),
            vec![MapEvent::PopupClosed, MapEvent::PopupOpened { id: RecordId(2) }]
        );
    }

    #[test]
    fn test_remove_marker_closes_its_popup() {
        let mut view = view();
        view.upsert_marker(marker(1));
        view.open_popup(RecordId(1));

        assert!(view.remove_marker(RecordId(1)));
        assert_eq!(view.open_popup_id(), None);
        assert_eq!(view.marker_count(), 0);
        assert!(!view.remove_marker(RecordId(1)));
    }

    #[test]
    fn test_fly_to_moves_camera_and_records_duration() {
        let mut view = view();
        let target = LatLng::new(40.4168, -3.7038);
        view.fly_to(target, 13.0, Duration::from_secs(2));
        assert_eq!(view.center(), target);
        assert!(view
            .take_events()
            .contains(&MapEvent::FlyTo {
                center: target,
                zoom: 13.0,
                duration: Duration::from_secs(2)
            }));
    }
}
