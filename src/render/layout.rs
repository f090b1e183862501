//! Seeded force-directed layout for the network diagram. A basic
//! Fruchterman–Reingold pass over unit space; the fixed seed and iteration
//! count make renders reproducible.

use crate::types::NetworkTable;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// Edges as node-index pairs, in table order. Edges referencing ids
/// missing from the node table are ignored (the transformer already
/// filtered them; this keeps the function total).
pub fn edge_indices(table: &NetworkTable) -> Vec<(usize, usize)> {
    let index: HashMap<&str, usize> = table
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    table
        .edges
        .iter()
        .filter_map(|edge| {
            let from = index.get(edge.from.as_str())?;
            let to = index.get(edge.to.as_str())?;
            Some((*from, *to))
        })
        .collect()
}

/// Compute node positions in the unit square.
pub fn force_layout(
    node_count: usize,
    edges: &[(usize, usize)],
    iterations: usize,
    seed: u64,
) -> Vec<(f64, f64)> {
    if node_count == 0 {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut positions: Vec<(f64, f64)> = (0..node_count)
        .map(|_| (rng.gen::<f64>(), rng.gen::<f64>()))
        .collect();
    if node_count == 1 {
        return vec![(0.5, 0.5)];
    }

    let k = (1.0 / node_count as f64).sqrt();
    let mut temperature = 0.1;
    let cooling = temperature / iterations.max(1) as f64;

    for _ in 0..iterations {
        let mut displacement = vec![(0.0f64, 0.0f64); node_count];

        // Repulsion between every pair
        for i in 0..node_count {
            for j in (i + 1)..node_count {
                let dx = positions[i].0 - positions[j].0;
                let dy = positions[i].1 - positions[j].1;
                let distance = (dx * dx + dy * dy).sqrt().max(1e-6);
                let force = k * k / distance;
                let (ux, uy) = (dx / distance, dy / distance);
                displacement[i].0 += ux * force;
                displacement[i].1 += uy * force;
                displacement[j].0 -= ux * force;
                displacement[j].1 -= uy * force;
            }
        }

        // Attraction along edges
        for &(a, b) in edges {
            let dx = positions[a].0 - positions[b].0;
            let dy = positions[a].1 - positions[b].1;
            let distance = (dx * dx + dy * dy).sqrt().max(1e-6);
            let force = distance * distance / k;
            let (ux, uy) = (dx / distance, dy / distance);
            displacement[a].0 -= ux * force;
            displacement[a].1 -= uy * force;
            displacement[b].0 += ux * force;
            displacement[b].1 += uy * force;
        }

        for i in 0..node_count {
            let (dx, dy) = displacement[i];
            let length = (dx * dx + dy * dy).sqrt().max(1e-6);
            let step = length.min(temperature);
            positions[i].0 = (positions[i].0 + dx / length * step).clamp(0.0, 1.0);
            positions[i].1 = (positions[i].1 + dy / length * step).clamp(0.0, 1.0);
        }

        temperature = (temperature - cooling).max(0.002);
    }

    positions
}
