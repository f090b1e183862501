//! Follower pipeline: social API → normalized follower table → geocoding
//! enrichment → chart, map, word-cloud, and table artifacts.

use crate::apis::geocode::GeocodeClient;
use crate::apis::social::SocialClient;
use crate::config::{self, Config};
use crate::constants::{self, FOLLOWERS_PIPELINE};
use crate::error::Result;
use crate::pipeline::{persist_html, persist_json, wordcloud, RunSummary};
use crate::render;
use crate::types::{Follower, Geocoder, RawRecord};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Normalize raw user objects into follower records. A record without a
/// numeric id is skipped with a warning; optional text fields propagate as
/// explicit sentinels (`None` location, empty description) rather than
/// fabricated values.
pub fn normalize(raw_users: &[RawRecord]) -> Vec<Follower> {
    let mut followers = Vec::with_capacity(raw_users.len());
    for (index, user) in raw_users.iter().enumerate() {
        let Some(user_id) = user["id"].as_u64() else {
            warn!("Skipping follower record {}: no numeric id", index);
            continue;
        };

        let location = user["location"]
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        followers.push(Follower {
            user_id,
            screen_name: user["screen_name"].as_str().unwrap_or("").to_string(),
            description: user["description"].as_str().unwrap_or("").to_string(),
            location,
            followers_count: user["followers_count"].as_u64().unwrap_or(0),
            statuses_count: user["statuses_count"].as_u64().unwrap_or(0),
            favorites_count: merged_favorites(user),
            longitude: None,
            latitude: None,
            in_continental_us: false,
        });
    }
    followers
}

/// The service reports favorites under two differently-named counters
/// depending on endpoint vintage. Sum both, treating a missing counter as
/// zero — the one documented place where missing data defaults to 0.
fn merged_favorites(user: &RawRecord) -> u64 {
    let favourites = user["favourites_count"].as_u64().unwrap_or(0);
    let favorites = user["favorite_count"].as_u64().unwrap_or(0);
    favourites + favorites
}

/// Geocode each follower's location, strictly one lookup at a time with a
/// quota delay before each call, then apply the continental-US test to
/// resolved coordinates only. Returns the number of resolved rows.
pub async fn enrich(
    followers: &mut [Follower],
    geocoder: &dyn Geocoder,
    delay: Duration,
) -> usize {
    let mut resolved = 0;
    for follower in followers.iter_mut() {
        let Some(location) = follower.location.clone() else {
            continue;
        };

        tokio::time::sleep(delay).await;
        if let Some(point) = geocoder.resolve(&location).await {
            follower.longitude = Some(point.longitude);
            follower.latitude = Some(point.latitude);
            follower.in_continental_us =
                constants::in_continental_us(point.longitude, point.latitude);
            resolved += 1;
        }
    }
    resolved
}

/// Run the complete follower pipeline: fetch, normalize, enrich, render,
/// persist.
#[instrument(skip(config))]
pub async fn run(config: &Config, handle: &str) -> Result<RunSummary> {
    let mut summary = RunSummary::new(FOLLOWERS_PIPELINE);

    info!("📡 Fetching followers for @{}", handle);
    println!("📡 Fetching followers for @{handle}...");
    let client = SocialClient::new(config::social_token()?, config.social.timeout_seconds)?;
    let raw_users = client
        .fetch_followers(handle, config.social.follower_cap)
        .await?;
    summary.records_fetched = raw_users.len();

    let mut followers = normalize(&raw_users);
    summary.records_kept = followers.len();
    info!("🔧 Normalized {} follower records", followers.len());

    let with_location = followers.iter().filter(|f| f.location.is_some()).count();
    info!(
        "🌍 Geocoding {} locations (one lookup per follower, no retries)",
        with_location
    );
    println!("🌍 Geocoding {with_location} follower locations...");
    let geocoder = GeocodeClient::new(config.geocode.timeout_seconds)?;
    let delay = Duration::from_millis(config.geocode.delay_ms);
    summary.records_geocoded = enrich(&mut followers, &geocoder, delay).await;
    info!(
        "✅ Resolved {}/{} locations",
        summary.records_geocoded, with_location
    );

    info!("🎨 Rendering follower artifacts");
    let output_dir = &config.output_dir;
    std::fs::create_dir_all(output_dir)?;

    let linear_path = format!("{}/followers_scatter_linear.png", output_dir);
    render::charts::scatter_linear(&followers, &linear_path)?;
    summary.artifacts.push(linear_path);

    let log_path = format!("{}/followers_scatter_log.png", output_dir);
    render::charts::scatter_log(&followers, &log_path)?;
    summary.artifacts.push(log_path);

    let descriptions: Vec<String> = followers.iter().map(|f| f.description.clone()).collect();
    let frequencies = wordcloud::build_frequencies(
        &descriptions,
        config.wordcloud.sample_cap,
        config.wordcloud.seed,
    );
    let cloud_path = format!("{}/wordcloud.png", output_dir);
    render::wordcloud::render(&frequencies, config.wordcloud.seed, &cloud_path)?;
    summary.artifacts.push(cloud_path);

    let world_path = format!("{}/map_world.png", output_dir);
    render::maps::world_map(&followers, &world_path)?;
    summary.artifacts.push(world_path);

    let us_path = format!("{}/map_us.png", output_dir);
    render::maps::us_map(&followers, &us_path)?;
    summary.artifacts.push(us_path);

    let world_page = render::maps::map_page(&followers, render::maps::MapRegion::World)?;
    summary
        .artifacts
        .push(persist_html(&world_page, output_dir, "map_world.html")?);

    let us_page = render::maps::map_page(&followers, render::maps::MapRegion::ContinentalUs)?;
    summary
        .artifacts
        .push(persist_html(&us_page, output_dir, "map_us.html")?);

    let table_page = render::table::follower_page(&followers)?;
    summary
        .artifacts
        .push(persist_html(&table_page, output_dir, "followers_table.html")?);

    summary
        .artifacts
        .push(persist_json(&followers, output_dir, "followers.json")?);

    info!(
        "✅ Follower pipeline complete: {} records, {} geocoded",
        summary.records_kept, summary.records_geocoded
    );
    Ok(summary.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn favorites_merge_treats_missing_as_zero() {
        let users = vec![
            json!({"id": 1, "favourites_count": null, "favorite_count": 12}),
            json!({"id": 2, "favourites_count": 5}),
            json!({"id": 3, "favourites_count": 5, "favorite_count": 7}),
            json!({"id": 4}),
        ];
        let followers = normalize(&users);
        assert_eq!(followers[0].favorites_count, 12);
        assert_eq!(followers[1].favorites_count, 5);
        assert_eq!(followers[2].favorites_count, 12);
        assert_eq!(followers[3].favorites_count, 0);
    }

    #[test]
    fn records_without_numeric_id_are_skipped() {
        let users = vec![
            json!({"screen_name": "ghost"}),
            json!({"id": "not-a-number", "screen_name": "stringy"}),
            json!({"id": 42, "screen_name": "kept"}),
        ];
        let followers = normalize(&users);
        assert_eq!(followers.len(), 1);
        assert_eq!(followers[0].screen_name, "kept");
    }

    #[test]
    fn blank_location_is_an_unknown_sentinel_not_zero() {
        let users = vec![
            json!({"id": 1, "location": ""}),
            json!({"id": 2, "location": "   "}),
            json!({"id": 3}),
            json!({"id": 4, "location": "Austin, TX"}),
        ];
        let followers = normalize(&users);
        for follower in &followers[..3] {
            assert_eq!(follower.location, None);
            assert_eq!(follower.longitude, None);
            assert_eq!(follower.latitude, None);
            assert!(!follower.in_continental_us);
        }
        assert_eq!(followers[3].location.as_deref(), Some("Austin, TX"));
    }

    #[test]
    fn missing_counts_default_to_zero() {
        let followers = normalize(&[json!({"id": 9})]);
        assert_eq!(followers[0].followers_count, 0);
        assert_eq!(followers[0].statuses_count, 0);
        assert_eq!(followers[0].description, "");
    }
}
