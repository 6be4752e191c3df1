use crate::{
    media::{
        item::{MediaKind, RecordId},
        record::MediaRecord,
    },
    store::{MediaStore, StoreConfig},
    Error, Result,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

/// Client for a Supabase-style backend: metadata rows live behind a
/// PostgREST endpoint (`/rest/v1/{table}`), files behind object storage
/// (`/storage/v1/object/{bucket}/{name}`).
///
/// The client carries a custom `User-Agent` and is built once per store so
/// TLS and connection pool setup are not repeated per request.
pub struct RestStore {
    http: reqwest::Client,
    config: StoreConfig,
}

impl RestStore {
    pub fn new(config: StoreConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| Error::Validation("api key is not a valid header value".to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| Error::Validation("api key is not a valid header value".to_string()))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .user_agent(concat!("mapmemo/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn rows_url(&self) -> String {
        format!("{}/rest/v1/{}", self.config.base_url, self.config.table)
    }

    fn object_url(&self, bucket: &str, name: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.config.base_url, bucket, name
        )
    }
}

#[async_trait]
impl MediaStore for RestStore {
    async fn insert(&self, record: &MediaRecord) -> Result<RecordId> {
        let rows: Vec<MediaRecord> = self
            .http
            .post(self.rows_url())
            .header("Prefer", "return=representation")
            .json(&[record])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        rows.into_iter()
            .find_map(|row| row.id)
            .ok_or_else(|| Error::Storage("insert returned no id".to_string()))
    }

    async fn list(&self) -> Result<Vec<MediaRecord>> {
        let rows = self
            .http
            .get(self.rows_url())
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(rows)
    }

    async fn update_location(&self, id: RecordId, name: &str) -> Result<()> {
        let response = self
            .http
            .patch(self.rows_url())
            .query(&[("id", format!("eq.{id}"))])
            .json(&serde_json::json!({ "location_name": name }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::Status(response.status().as_u16()));
        }
        Ok(())
    }

    async fn delete_record(&self, id: RecordId) -> Result<()> {
        let response = self
            .http
            .delete(self.rows_url())
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::Status(response.status().as_u16()));
        }
        Ok(())
    }

    async fn upload_object(
        &self,
        bucket: &str,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        log::debug!("uploading {}/{} ({} bytes)", bucket, name, bytes.len());
        let response = self
            .http
            .post(self.object_url(bucket, name))
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::Status(response.status().as_u16()));
        }
        Ok(())
    }

    fn public_url(&self, bucket: &str, name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.config.base_url, bucket, name
        )
    }

    async fn delete_object(&self, bucket: &str, name: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.object_url(bucket, name))
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            log::warn!("object {}/{} was already gone", bucket, name);
            return Ok(());
        }
        if !response.status().is_success() {
            return Err(Error::Status(response.status().as_u16()));
        }
        Ok(())
    }

    fn bucket_for(&self, kind: MediaKind) -> &str {
        match kind {
            MediaKind::Image => &self.config.image_bucket,
            MediaKind::Video => &self.config.video_bucket,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> RestStore {
        RestStore::new(StoreConfig {
            base_url: "https://xyz.supabase.co".to_string(),
            api_key: "anon-key".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_public_url_shape() {
        let store = test_store();
        assert_eq!(
            store.public_url("fotos-mapa", "1700000000000_pic.jpg"),
            "https://xyz.supabase.co/storage/v1/object/public/fotos-mapa/1700000000000_pic.jpg"
        );
    }

    #[test]
    fn test_bucket_selection() {
        let store = test_store();
        assert_eq!(store.bucket_for(MediaKind::Image), "fotos-mapa");
        assert_eq!(store.bucket_for(MediaKind::Video), "videos-mapa");
    }

    #[test]
    fn test_rows_url_uses_configured_table() {
        let store = test_store();
        assert_eq!(store.rows_url(), "https://xyz.supabase.co/rest/v1/map_photos");
    }
}
