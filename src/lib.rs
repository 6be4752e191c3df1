//! # mapmemo
//!
//! A headless engine for a map-anchored photo and video journal.
//!
//! The crate owns a map view keyed by geographic coordinates, a collection
//! of media markers (photo or video) anchored to those coordinates, an
//! upload flow triggered by map clicks, sequential navigation across saved
//! markers, and a delete flow that removes both the stored file and its
//! metadata record. Rendering and input belong to the embedding UI; the
//! engine is the single source of truth it reads from.

pub mod core;
pub mod geocode;
pub mod manager;
pub mod map;
pub mod media;
pub mod prelude;
pub mod store;

// Re-export public API
pub use crate::core::geo::LatLng;

pub use media::{
    item::{MediaItem, MediaKind, RecordId},
    record::MediaRecord,
};

pub use map::{
    marker::{MarkerIcon, MediaMarker},
    popup::{MediaElement, PopupContent},
    view::{MapEvent, MapView, MapViewOptions},
};

pub use store::{memory::MemoryStore, rest::RestStore, MediaStore, StoreConfig};

pub use geocode::{GeocodeConfig, NominatimGeocoder, PlaceLookup};

pub use manager::{
    DeleteOutcome, ManagerOptions, MediaManager, PendingFile, UploadModal, UploadState,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapMemoError>;

/// Common error types
///
/// Backend failures are caught at their call sites and surfaced as inline
/// messages; nothing propagates to a global handler. The one exception is
/// reverse geocoding, which degrades silently to a coordinate label and
/// never reaches the user as an error.
#[derive(Debug, thiserror::Error)]
pub enum MapMemoError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("storage error: {0}")]
    Storage(String),

    /// The stored file was removed but the metadata record survived. This
    /// must be reported distinctly so the user knows a retry will finish
    /// the job.
    #[error("file removed but record delete failed - please retry: {0}")]
    Consistency(String),

    #[error("record {0} not found")]
    NotFound(media::item::RecordId),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),
}

/// Error type alias for convenience
pub type Error = MapMemoError;
