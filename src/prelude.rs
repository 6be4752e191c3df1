//! Prelude module for common mapmemo types and traits
//!
//! Re-exports the most commonly used types for easy importing with
//! `use mapmemo::prelude::*;`

pub use crate::core::geo::LatLng;

pub use crate::media::{
    item::{MediaItem, MediaKind, RecordId},
    record::MediaRecord,
};

pub use crate::map::{
    marker::{MarkerIcon, MediaMarker},
    popup::{MediaElement, PopupContent},
    view::{MapEvent, MapView, MapViewOptions},
};

pub use crate::store::{memory::MemoryStore, rest::RestStore, MediaStore, StoreConfig};

pub use crate::geocode::{GeocodeConfig, NominatimGeocoder, PlaceLookup};

pub use crate::manager::{
    DeleteOutcome, ManagerOptions, MediaManager, PendingFile, UploadModal, UploadState,
};

pub use crate::{Error as MapMemoError, Result};

pub use std::{sync::Arc, time::Duration};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
