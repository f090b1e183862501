//! Follower scatter plots: followers vs. favorites, linear and log scale.

use crate::error::{DatalensError, Result};
use crate::types::Follower;
use plotters::prelude::*;

const WIDTH: u32 = 900;
const HEIGHT: u32 = 600;
const POINT_COLOR: RGBColor = RGBColor(52, 152, 219);

fn render_err<E: std::fmt::Display>(e: E) -> DatalensError {
    DatalensError::Render(e.to_string())
}

/// Linear scatter of followers vs. favorites.
pub fn scatter_linear(followers: &[Follower], path: &str) -> Result<()> {
    let points: Vec<(f64, f64)> = followers
        .iter()
        .map(|f| (f.followers_count as f64, f.favorites_count as f64))
        .collect();

    let x_max = axis_max(points.iter().map(|p| p.0));
    let y_max = axis_max(points.iter().map(|p| p.1));

    let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Followers vs. favorites", ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(65)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc("Followers")
        .y_desc("Favorites")
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, POINT_COLOR.mix(0.6).filled())),
        )
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

/// Log-scale variant. Rows where either count is zero cannot be placed on
/// a log axis and are dropped from this plot only.
pub fn scatter_log(followers: &[Follower], path: &str) -> Result<()> {
    let points: Vec<(f64, f64)> = followers
        .iter()
        .filter(|f| f.followers_count > 0 && f.favorites_count > 0)
        .map(|f| (f.followers_count as f64, f.favorites_count as f64))
        .collect();

    let x_max = axis_max(points.iter().map(|p| p.0));
    let y_max = axis_max(points.iter().map(|p| p.1));

    let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Followers vs. favorites (log scale)", ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(65)
        .build_cartesian_2d((1.0..x_max).log_scale(), (1.0..y_max).log_scale())
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc("Followers")
        .y_desc("Favorites")
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, POINT_COLOR.mix(0.6).filled())),
        )
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

/// Padded axis maximum; keeps the chart drawable when the table is empty.
fn axis_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0f64, f64::max);
    if max <= 0.0 {
        10.0
    } else {
        max * 1.05
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_max_pads_and_handles_empty_input() {
        assert_eq!(axis_max(std::iter::empty()), 10.0);
        assert_eq!(axis_max([100.0].into_iter()), 105.0);
    }
}
