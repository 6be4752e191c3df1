//! Reverse geocoding against a Nominatim-style endpoint.
//!
//! Lookups are best-effort: every failure path degrades to the formatted
//! coordinate label because a place name is decoration, not data integrity.

use crate::{core::geo::LatLng, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Resolves coordinates to a human-readable place name.
#[async_trait]
pub trait PlaceLookup: Send + Sync {
    /// Best-effort lookup. `Ok(None)` means the endpoint answered but had
    /// no usable field.
    async fn reverse(&self, position: LatLng) -> Result<Option<String>>;
}

/// Resolves a display name for `position`, falling back to the coordinate
/// label. Lookup failures are logged and swallowed; they never surface as a
/// user-facing error.
pub async fn display_name(lookup: &dyn PlaceLookup, position: LatLng) -> String {
    match lookup.reverse(position).await {
        Ok(Some(name)) => name,
        Ok(None) => position.label(),
        Err(e) => {
            log::warn!("reverse geocode failed for {}: {}", position, e);
            position.label()
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeocodeConfig {
    /// Reverse endpoint, queried with `format=json&lat=..&lon=..`.
    pub endpoint: String,
    /// Per-request timeout; on expiry the coordinate fallback is used.
    pub timeout: Duration,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://nominatim.openstreetmap.org/reverse".to_string(),
            timeout: Duration::from_secs(3),
        }
    }
}

/// Address object returned by the endpoint, reduced to the fields that can
/// serve as a display name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl Address {
    /// Display name priority: city > town > village > county > state.
    pub fn display_name(&self) -> Option<String> {
        self.city
            .clone()
            .or_else(|| self.town.clone())
            .or_else(|| self.village.clone())
            .or_else(|| self.county.clone())
            .or_else(|| self.state.clone())
            .filter(|name| !name.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Option<Address>,
}

/// Reverse geocoder talking to Nominatim over HTTP.
///
/// The client carries a custom `User-Agent` as the Nominatim usage policy
/// requires, and enforces the configured timeout.
pub struct NominatimGeocoder {
    http: reqwest::Client,
    config: GeocodeConfig,
}

impl NominatimGeocoder {
    pub fn new(config: GeocodeConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("mapmemo/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl PlaceLookup for NominatimGeocoder {
    async fn reverse(&self, position: LatLng) -> Result<Option<String>> {
        log::debug!("reverse geocode {}", position);
        let response: ReverseResponse = self
            .http
            .get(&self.config.endpoint)
            .query(&[
                ("format", "json".to_string()),
                ("lat", position.lat.to_string()),
                ("lon", position.lng.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.address.as_ref().and_then(Address::display_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_address_priority_order() {
        let address: Address = serde_json::from_str(
            r#"{"village": "Monachil", "county": "Granada", "state": "Andalusia"}"#,
        )
        .unwrap();
        assert_eq!(address.display_name().as_deref(), Some("Monachil"));

        let address: Address =
            serde_json::from_str(r#"{"city": "Granada", "town": "Armilla"}"#).unwrap();
        assert_eq!(address.display_name().as_deref(), Some("Granada"));

        let address: Address = serde_json::from_str(r#"{"state": "Andalusia"}"#).unwrap();
        assert_eq!(address.display_name().as_deref(), Some("Andalusia"));
    }

    #[test]
    fn test_empty_address_has_no_name() {
        let address = Address::default();
        assert_eq!(address.display_name(), None);

        let response: ReverseResponse = serde_json::from_str(r#"{"error": "Unable"}"#).unwrap();
        assert!(response.address.is_none());
    }

    struct FailingLookup;

    #[async_trait]
    impl PlaceLookup for FailingLookup {
        async fn reverse(&self, _position: LatLng) -> Result<Option<String>> {
            Err(Error::Status(500))
        }
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_coordinate_label() {
        let name = display_name(&FailingLookup, LatLng::new(40.0, -3.7)).await;
        assert_eq!(name, "40.0000, -3.7000");
    }

    struct EmptyLookup;

    #[async_trait]
    impl PlaceLookup for EmptyLookup {
        async fn reverse(&self, _position: LatLng) -> Result<Option<String>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_no_usable_field_falls_back_to_coordinate_label() {
        let name = display_name(&EmptyLookup, LatLng::new(37.1773, -3.5986)).await;
        assert_eq!(name, "37.1773, -3.5986");
    }
}
