//! Word-cloud image renderer: top terms by frequency, font size scaled by
//! count, seeded spiral placement with rectangle collision checks.

use crate::constants::{MAX_CLOUD_TERMS, MIN_TERM_FREQUENCY};
use crate::error::{DatalensError, Result};
use crate::render::{category_color, PALETTE};
use plotters::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tracing::debug;

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 600;
const MIN_FONT: f64 = 13.0;
const MAX_FONT: f64 = 64.0;

fn render_err<E: std::fmt::Display>(e: E) -> DatalensError {
    DatalensError::Render(e.to_string())
}

#[derive(Debug, Clone, Copy)]
struct Placed {
    x: i32,
    y: i32,
    w: i32,
    h: i32,
}

impl Placed {
    fn overlaps(&self, other: &Placed) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// Terms to display: frequency threshold, then top `MAX_CLOUD_TERMS` by
/// descending count with alphabetical tie-breaks for determinism.
fn display_terms(frequencies: &BTreeMap<String, usize>) -> Vec<(&str, usize)> {
    let mut terms: Vec<(&str, usize)> = frequencies
        .iter()
        .filter(|(_, &count)| count >= MIN_TERM_FREQUENCY)
        .map(|(term, &count)| (term.as_str(), count))
        .collect();
    terms.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    terms.truncate(MAX_CLOUD_TERMS);
    terms
}

fn font_size(count: usize, max_count: usize) -> f64 {
    if max_count <= 1 {
        return MIN_FONT;
    }
    // Square-root scaling keeps mid-frequency terms legible
    let ratio = (count as f64 / max_count as f64).sqrt();
    MIN_FONT + (MAX_FONT - MIN_FONT) * ratio
}

/// Rough glyph-box estimate; good enough for collision avoidance.
fn term_box(term: &str, size: f64) -> (i32, i32) {
    ((term.len() as f64 * size * 0.58) as i32, size as i32 + 4)
}

/// Render the cloud. Placement walks an outward spiral from the canvas
/// center until the term's box stops colliding; terms that never fit are
/// dropped with a debug log.
pub fn render(frequencies: &BTreeMap<String, usize>, seed: u64, path: &str) -> Result<()> {
    let terms = display_terms(frequencies);
    let max_count = terms.first().map(|t| t.1).unwrap_or(1);

    let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut placed: Vec<Placed> = Vec::new();
    let center = (WIDTH as f64 / 2.0, HEIGHT as f64 / 2.0);

    for (term, count) in &terms {
        let size = font_size(*count, max_count);
        let (w, h) = term_box(term, size);
        let start_angle = rng.gen::<f64>() * std::f64::consts::TAU;

        let mut slot = None;
        let mut theta = 0.0f64;
        while theta < 220.0 {
            let radius = 2.2 * theta;
            let x = (center.0 + radius * (start_angle + theta).cos()) as i32 - w / 2;
            let y = (center.1 + radius * (start_angle + theta).sin()) as i32 - h / 2;
            let candidate = Placed { x, y, w, h };

            let inside = x >= 0
                && y >= 0
                && x + w < WIDTH as i32
                && y + h < HEIGHT as i32;
            if inside && !placed.iter().any(|p| p.overlaps(&candidate)) {
                slot = Some(candidate);
                break;
            }
            theta += 0.35;
        }

        let Some(spot) = slot else {
            debug!("No room for term '{}' in the cloud", term);
            continue;
        };

        let color = category_color(rng.gen_range(0..PALETTE.len()));
        root.draw(&Text::new(
            term.to_string(),
            (spot.x, spot.y),
            ("sans-serif", size).into_font().color(&color),
        ))
        .map_err(render_err)?;
        placed.push(spot);
    }

    root.present().map_err(render_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frequencies(pairs: &[(&str, usize)]) -> BTreeMap<String, usize> {
        pairs
            .iter()
            .map(|(term, count)| (term.to_string(), *count))
            .collect()
    }

    #[test]
    fn terms_are_ordered_by_count_then_alphabetically() {
        let freqs = frequencies(&[("beta", 3), ("alpha", 3), ("rare", 1), ("top", 9)]);
        let terms = display_terms(&freqs);
        assert_eq!(terms[0].0, "top");
        assert_eq!(terms[1].0, "alpha");
        assert_eq!(terms[2].0, "beta");
    }

    #[test]
    fn display_cap_is_enforced() {
        let pairs: Vec<(String, usize)> = (0..300).map(|i| (format!("term{:03}", i), i + 1)).collect();
        let freqs: BTreeMap<String, usize> = pairs.into_iter().collect();
        assert_eq!(display_terms(&freqs).len(), MAX_CLOUD_TERMS);
    }

    #[test]
    fn font_sizes_scale_with_frequency() {
        assert_eq!(font_size(10, 10), MAX_FONT);
        assert!(font_size(1, 100) < font_size(50, 100));
        assert_eq!(font_size(1, 1), MIN_FONT);
    }

    #[test]
    fn boxes_overlap_detection() {
        let a = Placed { x: 0, y: 0, w: 10, h: 10 };
        let b = Placed { x: 5, y: 5, w: 10, h: 10 };
        let c = Placed { x: 20, y: 20, w: 5, h: 5 };
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }
}
