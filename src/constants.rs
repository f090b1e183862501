/// Pipeline and source name constants to ensure consistency across the codebase.

// Pipeline names (used in CLI and logging)
pub const NETWORK_PIPELINE: &str = "network";
pub const FOLLOWERS_PIPELINE: &str = "followers";

// Source names (used in error reporting)
pub const SHEETS_SOURCE: &str = "spreadsheet";
pub const SOCIAL_SOURCE: &str = "social";
pub const GEOCODER_SOURCE: &str = "geocoder";

// Default service endpoints; the geocoder can be overridden via
// DATALENS_GEOCODER_URL for self-hosted instances.
pub const SHEETS_BASE_URL: &str = "https://docs.google.com/spreadsheets/d";
pub const SOCIAL_BASE_URL: &str = "https://api.twitter.com/1.1";
pub const GEOCODER_BASE_URL: &str = "https://nominatim.openstreetmap.org";

// Worksheet names expected in the published spreadsheet
pub const FLOWS_WORKSHEET: &str = "Data Flows";
pub const SYSTEMS_WORKSHEET: &str = "Systems";

// Node display size is a linear transform of total degree.
pub const NODE_SIZE_BASE: f64 = 5.0;
pub const NODE_SIZE_PER_DEGREE: f64 = 3.0;

// Continental US bounding box (exclusive bounds). A coarse approximation
// that also admits slivers of Canada and Mexico; kept as-is on purpose.
pub const CONTINENTAL_US_LON_MIN: f64 = -124.7844079;
pub const CONTINENTAL_US_LON_MAX: f64 = -66.9513812;
pub const CONTINENTAL_US_LAT_MIN: f64 = 24.7433195;
pub const CONTINENTAL_US_LAT_MAX: f64 = 49.3457868;

// Word-cloud display limits
pub const MAX_CLOUD_TERMS: usize = 200;
pub const MIN_TERM_FREQUENCY: usize = 1;

/// True when a resolved coordinate falls inside the continental-US box.
/// Bounds are exclusive, so a point exactly on an edge is outside.
pub fn in_continental_us(longitude: f64, latitude: f64) -> bool {
    longitude > CONTINENTAL_US_LON_MIN
        && longitude < CONTINENTAL_US_LON_MAX
        && latitude > CONTINENTAL_US_LAT_MIN
        && latitude < CONTINENTAL_US_LAT_MAX
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kansas_is_inside_the_box() {
        assert!(in_continental_us(-100.0, 40.0));
    }

    #[test]
    fn pacific_is_outside_the_box() {
        assert!(!in_continental_us(-130.0, 40.0));
    }

    #[test]
    fn bounds_are_exclusive() {
        assert!(!in_continental_us(CONTINENTAL_US_LON_MIN, 40.0));
        assert!(!in_continental_us(-100.0, CONTINENTAL_US_LAT_MAX));
    }
}
