use crate::{
    media::{
        item::{MediaKind, RecordId},
        record::MediaRecord,
    },
    store::MediaStore,
    Error, Result,
};
use async_trait::async_trait;
use fxhash::FxHashMap;
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    rows: Vec<MediaRecord>,
    objects: FxHashMap<(String, String), Vec<u8>>,
    next_id: i64,
    fail_insert: bool,
    fail_upload: bool,
    fail_delete_object: bool,
    fail_delete_record: bool,
    update_location_calls: usize,
}

/// In-process implementation of [`MediaStore`].
///
/// Besides backing demos, it supports the test suite with failure injection
/// per operation and a call counter for location updates.
pub struct MemoryStore {
    inner: Mutex<Inner>,
    image_bucket: String,
    video_bucket: String,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 1,
                ..Default::default()
            }),
            image_bucket: "fotos-mapa".to_string(),
            video_bucket: "videos-mapa".to_string(),
        }
    }

    /// Inserts a row directly, assigning an id. Used to seed state that did
    /// not go through the upload flow (e.g. legacy rows).
    pub fn seed(&self, mut record: MediaRecord) -> RecordId {
        let mut inner = self.lock();
        let id = RecordId(inner.next_id);
        inner.next_id += 1;
        record.id = Some(id);
        inner.rows.push(record);
        id
    }

    /// Places object bytes directly into a bucket.
    pub fn put_object(&self, bucket: &str, name: &str, bytes: Vec<u8>) {
        self.lock()
            .objects
            .insert((bucket.to_string(), name.to_string()), bytes);
    }

    pub fn fail_insert(&self, on: bool) {
        self.lock().fail_insert = on;
    }

    pub fn fail_upload(&self, on: bool) {
        self.lock().fail_upload = on;
    }

    pub fn fail_delete_object(&self, on: bool) {
        self.lock().fail_delete_object = on;
    }

    pub fn fail_delete_record(&self, on: bool) {
        self.lock().fail_delete_record = on;
    }

    pub fn row_count(&self) -> usize {
        self.lock().rows.len()
    }

    pub fn object_count(&self) -> usize {
        self.lock().objects.len()
    }

    pub fn has_object(&self, bucket: &str, name: &str) -> bool {
        self.lock()
            .objects
            .contains_key(&(bucket.to_string(), name.to_string()))
    }

    pub fn update_location_calls(&self) -> usize {
        self.lock().update_location_calls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaStore for MemoryStore {
    async fn insert(&self, record: &MediaRecord) -> Result<RecordId> {
        let mut inner = self.lock();
        if inner.fail_insert {
            return Err(Error::Storage("insert failed (injected)".to_string()));
        }
        let id = RecordId(inner.next_id);
        inner.next_id += 1;
        let mut stored = record.clone();
        stored.id = Some(id);
        inner.rows.push(stored);
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<MediaRecord>> {
        let mut rows = self.lock().rows.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn update_location(&self, id: RecordId, name: &str) -> Result<()> {
        let mut inner = self.lock();
        inner.update_location_calls += 1;
        let row = inner
            .rows
            .iter_mut()
            .find(|row| row.id == Some(id))
            .ok_or(Error::NotFound(id))?;
        row.location_name = Some(name.to_string());
        Ok(())
    }

    async fn delete_record(&self, id: RecordId) -> Result<()> {
        let mut inner = self.lock();
        if inner.fail_delete_record {
            return Err(Error::Storage("record delete failed (injected)".to_string()));
        }
        let before = inner.rows.len();
        inner.rows.retain(|row| row.id != Some(id));
        if inner.rows.len() == before {
            return Err(Error::NotFound(id));
        }
        Ok(())
    }

    async fn upload_object(
        &self,
        bucket: &str,
        name: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<()> {
        let mut inner = self.lock();
        if inner.fail_upload {
            return Err(Error::Storage("upload failed (injected)".to_string()));
        }
        inner
            .objects
            .insert((bucket.to_string(), name.to_string()), bytes);
        Ok(())
    }

    fn public_url(&self, bucket: &str, name: &str) -> String {
        format!("memory://{bucket}/{name}")
    }

    async fn delete_object(&self, bucket: &str, name: &str) -> Result<()> {
        let mut inner = self.lock();
        if inner.fail_delete_object {
            return Err(Error::Storage("object delete failed (injected)".to_string()));
        }
        if inner
            .objects
            .remove(&(bucket.to_string(), name.to_string()))
            .is_none()
        {
            // Idempotent, matching the hosted backend.
            log::warn!("object {}/{} was already gone", bucket, name);
        }
        Ok(())
    }

    fn bucket_for(&self, kind: MediaKind) -> &str {
        match kind {
            MediaKind::Image => &self.image_bucket,
            MediaKind::Video => &self.video_bucket,
        }
    }
}
