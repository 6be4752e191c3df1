//! Persistence and object storage for media metadata and files.
//!
//! The backend is reached through the [`MediaStore`] trait so the manager
//! never talks to a concrete service. [`rest::RestStore`] speaks to a
//! Supabase-style hosted backend; [`memory::MemoryStore`] keeps everything
//! in process for tests and demos.

pub mod memory;
pub mod rest;

use crate::{
    media::{
        item::{MediaKind, RecordId},
        record::MediaRecord,
    },
    Result,
};
use async_trait::async_trait;

/// Configuration for the hosted persistence/storage backend.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the backend, e.g. `https://xyz.supabase.co`.
    pub base_url: String,
    /// API key sent as both `apikey` and bearer token.
    pub api_key: String,
    /// Metadata table holding one row per media item.
    pub table: String,
    /// Bucket for photo files.
    pub image_bucket: String,
    /// Bucket for video files.
    pub video_bucket: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            table: "map_photos".to_string(),
            image_bucket: "fotos-mapa".to_string(),
            video_bucket: "videos-mapa".to_string(),
        }
    }
}

/// Backend operations the manager depends on. Implementations are injected
/// through the manager's constructor; there is no module-level client.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Inserts a metadata row and returns the id assigned by the backend.
    async fn insert(&self, record: &MediaRecord) -> Result<RecordId>;

    /// All rows, newest first.
    async fn list(&self) -> Result<Vec<MediaRecord>>;

    /// Updates the location name of one row.
    async fn update_location(&self, id: RecordId, name: &str) -> Result<()>;

    /// Deletes one metadata row.
    async fn delete_record(&self, id: RecordId) -> Result<()>;

    /// Uploads raw file bytes under `bucket/name`.
    async fn upload_object(
        &self,
        bucket: &str,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()>;

    /// Public URL of a stored object.
    fn public_url(&self, bucket: &str, name: &str) -> String;

    /// Deletes a stored object. Deleting an object that is already gone is
    /// not an error; the retry path after a failed record delete depends on
    /// that.
    async fn delete_object(&self, bucket: &str, name: &str) -> Result<()>;

    /// Bucket holding files of the given media kind.
    fn bucket_for(&self, kind: MediaKind) -> &str;
}
