use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Formatted `"lat, lng"` string, used as the display name whenever
    /// reverse geocoding fails or returns nothing usable.
    pub fn label(&self) -> String {
        format!("{:.4}, {:.4}", self.lat, self.lng)
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_creation() {
        let coord = LatLng::new(40.7128, -74.0060);
        assert_eq!(coord.lat, 40.7128);
        assert_eq!(coord.lng, -74.0060);
        assert!(coord.is_valid());
    }

    #[test]
    fn test_out_of_range_coordinates() {
        assert!(!LatLng::new(90.1, 0.0).is_valid());
        assert!(!LatLng::new(-90.1, 0.0).is_valid());
        assert!(!LatLng::new(0.0, 180.5).is_valid());
        assert!(!LatLng::new(0.0, -180.5).is_valid());
        assert!(LatLng::new(90.0, 180.0).is_valid());
        assert!(LatLng::new(-90.0, -180.0).is_valid());
    }

    #[test]
    fn test_label_format() {
        assert_eq!(LatLng::new(40.0, -3.7).label(), "40.0000, -3.7000");
        assert_eq!(LatLng::new(37.17734, -3.59863).label(), "37.1773, -3.5986");
    }
}
