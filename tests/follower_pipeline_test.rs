use anyhow::Result;
use datalens::pipeline::followers::{enrich, normalize};
use datalens::pipeline::{persist_html, wordcloud};
use datalens::render;
use datalens::types::{GeoPoint, Geocoder};
use serde_json::json;
use std::time::Duration;
use tempfile::tempdir;

/// Canned geocoder: resolves two known locations, misses everything else.
struct StubGeocoder;

#[async_trait::async_trait]
impl Geocoder for StubGeocoder {
    async fn resolve(&self, location: &str) -> Option<GeoPoint> {
        match location {
            "Topeka, KS" => Some(GeoPoint {
                longitude: -95.689,
                latitude: 39.055,
            }),
            "Vancouver, BC" => Some(GeoPoint {
                longitude: -123.116,
                latitude: 49.283,
            }),
            "Reykjavik" => Some(GeoPoint {
                longitude: -21.827,
                latitude: 64.128,
            }),
            _ => None,
        }
    }
}

fn raw_users() -> Vec<serde_json::Value> {
    vec![
        json!({
            "id": 1, "screen_name": "kansan", "description": "plains data nerd",
            "location": "Topeka, KS", "followers_count": 50, "statuses_count": 200,
            "favourites_count": 10, "favorite_count": 2
        }),
        json!({
            "id": 2, "screen_name": "northerner", "description": "mountains",
            "location": "Vancouver, BC", "followers_count": 80, "statuses_count": 10,
            "favorite_count": 7
        }),
        json!({
            "id": 3, "screen_name": "viking", "description": "sagas",
            "location": "Reykjavik", "followers_count": 5, "statuses_count": 1
        }),
        json!({
            "id": 4, "screen_name": "nowhere", "description": "just vibes",
            "followers_count": 3, "statuses_count": 9
        }),
        json!({
            "id": 5, "screen_name": "cryptic", "description": "???",
            "location": "the moon", "followers_count": 1, "statuses_count": 1
        }),
    ]
}

#[tokio::test]
async fn enrichment_resolves_locations_and_applies_the_bounding_box() -> Result<()> {
    let mut followers = normalize(&raw_users());
    assert_eq!(followers.len(), 5);

    let resolved = enrich(&mut followers, &StubGeocoder, Duration::from_millis(0)).await;
    assert_eq!(resolved, 3);

    let by_name = |name: &str| followers.iter().find(|f| f.screen_name == name).unwrap();

    let kansan = by_name("kansan");
    assert_eq!(kansan.favorites_count, 12);
    assert!(kansan.in_continental_us);

    // Vancouver sits inside the coarse bounding box even though it is in
    // Canada; that approximation is intended behavior.
    assert!(by_name("northerner").in_continental_us);

    let viking = by_name("viking");
    assert!(viking.longitude.is_some());
    assert!(!viking.in_continental_us);

    // No location at all: everything stays unknown, never (0, 0).
    let nowhere = by_name("nowhere");
    assert_eq!(nowhere.longitude, None);
    assert_eq!(nowhere.latitude, None);
    assert!(!nowhere.in_continental_us);

    // Unresolvable location: same unknown sentinels.
    let cryptic = by_name("cryptic");
    assert_eq!(cryptic.longitude, None);
    assert!(!cryptic.in_continental_us);

    Ok(())
}

#[tokio::test]
async fn artifact_pages_reflect_the_enriched_table() -> Result<()> {
    let mut followers = normalize(&raw_users());
    enrich(&mut followers, &StubGeocoder, Duration::from_millis(0)).await;

    let table_page = render::table::follower_page(&followers)?;
    assert!(table_page.contains("kansan"));
    assert!(table_page.contains("just vibes"));

    let world_page = render::maps::map_page(&followers, render::maps::MapRegion::World)?;
    assert!(world_page.contains("viking"));
    assert!(!world_page.contains("nowhere"));

    let us_page = render::maps::map_page(&followers, render::maps::MapRegion::ContinentalUs)?;
    assert!(us_page.contains("kansan"));
    assert!(!us_page.contains("viking"));

    let dir = tempdir()?;
    let output_dir = dir.path().to_str().unwrap();
    let written = persist_html(&table_page, output_dir, "followers_table.html")?;
    assert_eq!(std::fs::read_to_string(written)?, table_page);

    Ok(())
}

#[test]
fn wordcloud_frequencies_are_reproducible_over_descriptions() {
    let descriptions: Vec<String> = (0..800)
        .map(|i| format!("Data analyst number {} loves charts and maps", i))
        .collect();

    let first = wordcloud::build_frequencies(&descriptions, 300, 42);
    let second = wordcloud::build_frequencies(&descriptions, 300, 42);
    assert_eq!(first, second);

    // 300 sampled rows each contribute one "charts" token.
    assert_eq!(first.get("charts"), Some(&300));
    // Stopwords never survive the cleanup passes.
    assert!(!first.contains_key("and"));
}
