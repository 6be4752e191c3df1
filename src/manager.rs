//! The media manager orchestrates the map view, the persistence backend and
//! the reverse geocoder: click-to-upload, marker rendering, sequential
//! navigation, location-name edits and the two-phase delete flow.

use crate::{
    core::geo::LatLng,
    geocode::{self, PlaceLookup},
    map::{
        marker::MediaMarker,
        view::{MapView, MapViewOptions},
    },
    media::{
        item::{MediaItem, MediaKind, RecordId},
        record::MediaRecord,
    },
    store::MediaStore,
    Error, Result,
};
use chrono::Utc;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// Fixed fallback center (Granada) used when nothing has been uploaded yet.
pub const FALLBACK_CENTER: LatLng = LatLng {
    lat: 37.1773,
    lng: -3.5986,
};

#[derive(Debug, Clone)]
pub struct ManagerOptions {
    pub view: MapViewOptions,
    /// Duration of the fly-to animation between markers.
    pub fly_duration: Duration,
    /// Delay between landing and opening the target popup.
    pub settle_delay: Duration,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            view: MapViewOptions::default(),
            fly_duration: Duration::from_secs(2),
            settle_delay: Duration::from_secs(2),
        }
    }
}

/// A file the user attached in the upload modal.
#[derive(Debug, Clone)]
pub struct PendingFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PendingFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Transient state for one upload interaction, from modal open to close.
#[derive(Debug, Clone)]
pub struct UploadModal {
    /// Map location the upload will be pinned to.
    pub coords: LatLng,
    /// Place name shown in the modal, already resolved (or the coordinate
    /// fallback).
    pub location_name: String,
    pub file: Option<PendingFile>,
    /// Inline message shown after a failed attempt; the user may retry or
    /// cancel.
    pub error: Option<String>,
}

/// Observable state of the upload interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    AwaitingFile,
    Uploading,
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

/// Owns the map view, the ordered media list and all flows that mutate
/// them.
///
/// Methods take `&mut self`, so interactions against one manager are
/// serialized: a flow runs to completion before the next starts, and a
/// dismissed modal can never be touched by a late response. The
/// `is_uploading`/`is_deleting` flags let an embedding UI disable the
/// corresponding controls while a flow is in flight.
pub struct MediaManager {
    store: Arc<dyn MediaStore>,
    geocoder: Arc<dyn PlaceLookup>,
    view: MapView,
    /// Ordered mirror of the backend: loaded newest-first, appended on
    /// upload, spliced on delete.
    items: Vec<MediaItem>,
    modal: Option<UploadModal>,
    uploading: bool,
    deleting: bool,
    options: ManagerOptions,
}

impl MediaManager {
    pub fn new(
        store: Arc<dyn MediaStore>,
        geocoder: Arc<dyn PlaceLookup>,
        options: ManagerOptions,
    ) -> Self {
        let view = MapView::new(FALLBACK_CENTER, options.view.default_zoom, options.view.clone());
        Self {
            store,
            geocoder,
            view,
            items: Vec::new(),
            modal: None,
            uploading: false,
            deleting: false,
            options,
        }
    }

    /// Loads all persisted media, centers the view on a randomly chosen
    /// item (or the fixed fallback when empty) and places one marker per
    /// item.
    pub async fn initialize(&mut self) -> Result<()> {
        let rows = self.store.list().await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            match row.into_item() {
                Some(item) => items.push(item),
                None => log::warn!("skipping row without a usable media url"),
            }
        }

        let center = if items.is_empty() {
            FALLBACK_CENTER
        } else {
            let index = rand::thread_rng().gen_range(0..items.len());
            items[index].position
        };
        self.view.set_view(center, self.options.view.default_zoom);

        // Resolve display names up front, concurrently and best-effort, so
        // popups never show a blank location.
        let geocoder = self.geocoder.clone();
        let names = futures::future::join_all(items.iter().map(|item| {
            let geocoder = geocoder.clone();
            async move {
                match item.location_name.clone() {
                    Some(name) => name,
                    None => geocode::display_name(geocoder.as_ref(), item.position).await,
                }
            }
        }))
        .await;

        for (item, name) in items.iter().zip(names) {
            self.view.upsert_marker(MediaMarker::new(item, name));
        }
        self.items = items;
        log::debug!("loaded {} media items", self.items.len());
        Ok(())
    }

    /// Map click: remembers the location, resolves a place name best-effort
    /// (lookup failures degrade to the coordinate label, never an error)
    /// and opens the upload modal.
    pub async fn handle_map_click(&mut self, coords: LatLng) -> Result<()> {
        if !coords.is_valid() {
            return Err(Error::InvalidCoordinates(coords.label()));
        }
        let location_name = geocode::display_name(self.geocoder.as_ref(), coords).await;
        self.modal = Some(UploadModal {
            coords,
            location_name,
            file: None,
            error: None,
        });
        Ok(())
    }

    /// Attaches a file to the open modal, clearing any previous error.
    pub fn select_file(&mut self, file: PendingFile) -> Result<()> {
        match &mut self.modal {
            Some(modal) => {
                modal.file = Some(file);
                modal.error = None;
                Ok(())
            }
            None => Err(Error::Validation("no upload in progress".to_string())),
        }
    }

    /// Closes the modal and discards its transient state.
    pub fn cancel_modal(&mut self) {
        self.modal = None;
    }

    /// Uploads the selected file and records its metadata. Either exactly
    /// one new item appears with an assigned id, or the list is unchanged
    /// and the error is shown inline in the still-open modal.
    pub async fn confirm_upload(&mut self) -> Result<RecordId> {
        if self.uploading {
            return Err(Error::Validation("an upload is already running".to_string()));
        }
        let (coords, file, location_name) = match &self.modal {
            Some(UploadModal {
                coords,
                location_name,
                file: Some(file),
                ..
            }) => (*coords, file.clone(), location_name.clone()),
            Some(_) => {
                self.set_modal_error("select a photo or video first");
                return Err(Error::Validation("no file selected".to_string()));
            }
            None => return Err(Error::Validation("no upload in progress".to_string())),
        };

        self.uploading = true;
        let result = self.perform_upload(coords, file, location_name).await;
        self.uploading = false;

        match result {
            Ok(id) => {
                self.modal = None;
                Ok(id)
            }
            Err(e) => {
                log::error!("upload failed: {e}");
                self.set_modal_error("upload failed, retry or cancel");
                Err(e)
            }
        }
    }

    async fn perform_upload(
        &mut self,
        coords: LatLng,
        file: PendingFile,
        location_name: String,
    ) -> Result<RecordId> {
        let kind = MediaKind::from_content_type(&file.content_type);
        let bucket = self.store.bucket_for(kind).to_string();
        let object_name = format!("{}_{}", Utc::now().timestamp_millis(), file.name);

        self.store
            .upload_object(&bucket, &object_name, file.bytes, &file.content_type)
            .await?;

        let media_url = self.store.public_url(&bucket, &object_name);
        let created_at = Utc::now();
        let record = MediaRecord::for_upload(coords, media_url.clone(), kind, created_at);

        let id = match self.store.insert(&record).await {
            Ok(id) => id,
            Err(e) => {
                // The file made it to storage but the row did not; remove
                // the file again so no orphan is left behind.
                if let Err(cleanup) = self.store.delete_object(&bucket, &object_name).await {
                    log::warn!("orphan cleanup failed for {bucket}/{object_name}: {cleanup}");
                }
                return Err(e);
            }
        };

        let item = MediaItem {
            id,
            position: coords,
            media_url,
            kind,
            created_at,
            location_name: None,
        };
        self.view.upsert_marker(MediaMarker::new(&item, location_name));
        self.items.push(item);
        log::debug!("uploaded {} as {}/{}", id, bucket, object_name);
        Ok(id)
    }

    /// Builds and registers the marker for an item, resolving its display
    /// name if none is stored. Re-rendering an id replaces the existing
    /// marker instead of stacking a duplicate.
    pub async fn render_marker(&mut self, item: &MediaItem) {
        let name = match item.location_name.clone() {
            Some(name) => name,
            None => geocode::display_name(self.geocoder.as_ref(), item.position).await,
        };
        self.view.upsert_marker(MediaMarker::new(item, name));
    }

    /// Moves to the previous (`-1`) or next (`+1`) item in the ordered
    /// list, wrapping circularly at both ends. Unknown ids and an empty
    /// list are no-ops. Returns the id navigated to.
    pub async fn navigate(&mut self, current: RecordId, direction: i32) -> Option<RecordId> {
        if self.items.is_empty() {
            return None;
        }
        let index = self.items.iter().position(|item| item.id == current)?;
        let len = self.items.len() as i64;
        let target_index = (index as i64 + direction as i64).rem_euclid(len) as usize;
        let (target_id, target_position) = {
            let target = &self.items[target_index];
            (target.id, target.position)
        };

        self.view.close_popup();
        self.view.fly_to(
            target_position,
            self.options.view.default_zoom,
            self.options.fly_duration,
        );
        // Let the fly animation land before the popup opens.
        tokio::time::sleep(self.options.settle_delay).await;
        self.view.open_popup(target_id);
        Some(target_id)
    }

    /// Persists a new location name for an item and patches the in-memory
    /// copy. Empty or whitespace-only input is rejected before any network
    /// call.
    pub async fn edit_location_name(&mut self, id: RecordId, name: &str) -> Result<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(Error::Validation("location name cannot be empty".to_string()));
        }

        self.store.update_location(id, trimmed).await?;

        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.location_name = Some(trimmed.to_string());
            let marker = MediaMarker::new(item, trimmed.to_string());
            self.view.upsert_marker(marker);
        }
        Ok(())
    }

    /// Deletes a media item after `confirm` approves it: the stored file
    /// first, then the metadata row. The row is never deleted while the
    /// file deletion has not succeeded. On full success the item is removed
    /// from the list and its marker torn down.
    pub async fn delete_media<F>(&mut self, id: RecordId, confirm: F) -> Result<DeleteOutcome>
    where
        F: FnOnce(&MediaItem) -> bool,
    {
        if self.deleting {
            return Err(Error::Validation("a delete is already running".to_string()));
        }
        let item = self
            .items
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or(Error::NotFound(id))?;
        if !confirm(&item) {
            return Ok(DeleteOutcome::Cancelled);
        }

        self.deleting = true;
        let result = self.perform_delete(&item).await;
        self.deleting = false;
        result
    }

    async fn perform_delete(&mut self, item: &MediaItem) -> Result<DeleteOutcome> {
        let bucket = self.store.bucket_for(item.kind).to_string();
        let object_name = item.object_name().to_string();

        // File first: a failure here leaves the record intact.
        if let Err(e) = self.store.delete_object(&bucket, &object_name).await {
            log::error!("storage delete failed for {bucket}/{object_name}: {e}");
            return Err(e);
        }

        if let Err(e) = self.store.delete_record(item.id).await {
            // The file is gone but the row survived. Surfaced distinctly so
            // the user knows a retry will finish the job.
            return Err(Error::Consistency(format!("record {}: {e}", item.id)));
        }

        self.items.retain(|existing| existing.id != item.id);
        self.view.remove_marker(item.id);
        log::debug!("deleted {} ({}/{})", item.id, bucket, object_name);
        Ok(DeleteOutcome::Deleted)
    }

    pub fn upload_state(&self) -> UploadState {
        if self.uploading {
            UploadState::Uploading
        } else if self.modal.is_some() {
            UploadState::AwaitingFile
        } else {
            UploadState::Idle
        }
    }

    pub fn modal(&self) -> Option<&UploadModal> {
        self.modal.as_ref()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    /// Ordered in-memory media list.
    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn item(&self, id: RecordId) -> Option<&MediaItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn view(&self) -> &MapView {
        &self.view
    }

    /// Mutable view access, mainly for the embedding UI to drain events.
    pub fn view_mut(&mut self) -> &mut MapView {
        &mut self.view
    }

    fn set_modal_error(&mut self, message: &str) {
        if let Some(modal) = &mut self.modal {
            modal.error = Some(message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use async_trait::async_trait;

    struct NamedLookup(&'static str);

    #[async_trait]
    impl PlaceLookup for NamedLookup {
        async fn reverse(&self, _position: LatLng) -> Result<Option<String>> {
            Ok(Some(self.0.to_string()))
        }
    }

    fn manager() -> MediaManager {
        MediaManager::new(
            Arc::new(MemoryStore::new()),
            Arc::new(NamedLookup("Granada")),
            ManagerOptions {
                fly_duration: Duration::ZERO,
                settle_delay: Duration::ZERO,
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_initialize_empty_uses_fallback_center() {
        let mut manager = manager();
        manager.initialize().await.unwrap();
        assert_eq!(manager.view().center(), FALLBACK_CENTER);
        assert!(manager.items().is_empty());
        assert_eq!(manager.upload_state(), UploadState::Idle);
    }

    #[tokio::test]
    async fn test_click_opens_modal_with_place_name() {
        let mut manager = manager();
        manager.handle_map_click(LatLng::new(37.0, -3.0)).await.unwrap();
        assert_eq!(manager.upload_state(), UploadState::AwaitingFile);
        let modal = manager.modal().unwrap();
        assert_eq!(modal.location_name, "Granada");
        assert!(modal.file.is_none());

        manager.cancel_modal();
        assert_eq!(manager.upload_state(), UploadState::Idle);
    }

    #[tokio::test]
    async fn test_click_rejects_out_of_range_coordinates() {
        let mut manager = manager();
        let err = manager
            .handle_map_click(LatLng::new(95.0, 0.0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCoordinates(_)));
        assert!(manager.modal().is_none());
    }

    #[tokio::test]
    async fn test_confirm_without_file_is_a_validation_error() {
        let mut manager = manager();
        manager.handle_map_click(LatLng::new(37.0, -3.0)).await.unwrap();

        let err = manager.confirm_upload().await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        // Modal stays open with an inline message.
        assert_eq!(manager.upload_state(), UploadState::AwaitingFile);
        assert!(manager.modal().unwrap().error.is_some());
    }

    #[tokio::test]
    async fn test_select_file_requires_open_modal() {
        let mut manager = manager();
        let err = manager
            .select_file(PendingFile::new("a.jpg", "image/jpeg", vec![1]))
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
