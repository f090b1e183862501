use serde::{Deserialize, Serialize};

/// Raw record as returned from external APIs before normalization
pub type RawRecord = serde_json::Value;

/// A system in the organization's data-flow network.
/// `size` is derived from degree counts, never read from the source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub data_type: String,
    pub owner: String,
    pub size: f64,
}

/// A directed data flow between two systems. Duplicates are allowed
/// and counted toward degree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

/// Normalized network tables handed to the renderers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkTable {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// A resolved coordinate from the geocoder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

/// A normalized, enriched follower record.
///
/// `longitude`/`latitude` stay `None` when the location string was absent
/// or the geocoder could not resolve it; they are never coerced to (0, 0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Follower {
    pub user_id: u64,
    pub screen_name: String,
    pub description: String,
    pub location: Option<String>,
    pub followers_count: u64,
    pub statuses_count: u64,
    pub favorites_count: u64,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub in_continental_us: bool,
}

impl Follower {
    pub fn coordinates(&self) -> Option<GeoPoint> {
        match (self.longitude, self.latitude) {
            (Some(longitude), Some(latitude)) => Some(GeoPoint {
                longitude,
                latitude,
            }),
            _ => None,
        }
    }
}

/// One worksheet of a published spreadsheet: header labels plus rows of
/// optional cell strings, in source order.
#[derive(Debug, Clone, Default)]
pub struct Worksheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Worksheet {
    /// Index of a named column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Best-effort coordinate resolution for free-text location strings.
/// Implementations must treat every failure mode (network error, quota,
/// empty result) as an unresolved lookup, not an error.
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, location: &str) -> Option<GeoPoint>;
}
