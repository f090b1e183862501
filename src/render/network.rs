//! Network diagram renderers: a static PNG and an interactive HTML page.
//! Both consume the normalized table plus precomputed layout positions,
//! so the two artifacts always agree.

use crate::error::{DatalensError, Result};
use crate::render::{category_color, category_color_hex, PALETTE};
use crate::types::NetworkTable;
use plotters::prelude::*;
use std::collections::HashMap;
use tracing::warn;

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 800;
const MARGIN: i32 = 70;

fn render_err<E: std::fmt::Display>(e: E) -> DatalensError {
    DatalensError::Render(e.to_string())
}

/// Data types in first-seen order, the order that fixes palette colors.
fn data_type_order(table: &NetworkTable) -> Vec<String> {
    let mut seen = Vec::new();
    for node in &table.nodes {
        if !seen.contains(&node.data_type) {
            seen.push(node.data_type.clone());
        }
    }
    if seen.len() > PALETTE.len() {
        warn!(
            "{} data types but only {} palette colors; later types share the last color",
            seen.len(),
            PALETTE.len()
        );
    }
    seen
}

fn to_pixel(position: (f64, f64)) -> (i32, i32) {
    let usable_w = WIDTH as i32 - 2 * MARGIN;
    let usable_h = HEIGHT as i32 - 2 * MARGIN;
    (
        MARGIN + (position.0 * usable_w as f64) as i32,
        MARGIN + (position.1 * usable_h as f64) as i32,
    )
}

/// Render the static diagram: nodes colored by data type, radius from the
/// derived size, id labels, and a data-type legend.
pub fn render_diagram(
    table: &NetworkTable,
    positions: &[(f64, f64)],
    path: &str,
) -> Result<()> {
    let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    root.draw(&Text::new(
        "Data-flow network",
        (MARGIN, 20),
        ("sans-serif", 24).into_font(),
    ))
    .map_err(render_err)?;

    let types = data_type_order(table);
    let color_index: HashMap<&str, usize> = types
        .iter()
        .enumerate()
        .map(|(i, t)| (t.as_str(), i))
        .collect();

    let pixel: Vec<(i32, i32)> = positions.iter().map(|&p| to_pixel(p)).collect();

    for (from, to) in crate::render::layout::edge_indices(table) {
        root.draw(&PathElement::new(
            vec![pixel[from], pixel[to]],
            BLACK.mix(0.25),
        ))
        .map_err(render_err)?;
    }

    for (node, &(x, y)) in table.nodes.iter().zip(pixel.iter()) {
        let color = category_color(color_index[node.data_type.as_str()]);
        let radius = node.size.clamp(4.0, 22.0) as i32;
        root.draw(&Circle::new((x, y), radius, color.mix(0.85).filled()))
            .map_err(render_err)?;
        root.draw(&Circle::new((x, y), radius, color.stroke_width(2)))
            .map_err(render_err)?;
        root.draw(&Text::new(
            node.id.clone(),
            (x + radius + 3, y - 6),
            ("sans-serif", 13).into_font(),
        ))
        .map_err(render_err)?;
    }

    // Legend, one entry per data type
    let mut legend_y = 44;
    for (index, data_type) in types.iter().enumerate() {
        let color = category_color(index);
        root.draw(&Circle::new((MARGIN + 6, legend_y), 6, color.filled()))
            .map_err(render_err)?;
        root.draw(&Text::new(
            data_type.clone(),
            (MARGIN + 18, legend_y - 7),
            ("sans-serif", 14).into_font(),
        ))
        .map_err(render_err)?;
        legend_y += 20;
    }

    root.present().map_err(render_err)?;
    Ok(())
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8" />
<title>Data-flow network</title>
<style>
  body { font-family: sans-serif; margin: 20px; }
  #controls { margin-bottom: 10px; }
  #tip { position: absolute; background: #333; color: #fff; padding: 3px 7px;
         border-radius: 3px; font-size: 12px; pointer-events: none; display: none; }
  canvas { border: 1px solid #ccc; }
</style>
</head>
<body>
<h2>Data-flow network</h2>
<div id="controls">
  Owner:
  <select id="owner"><option value="">All</option></select>
</div>
<canvas id="net" width="960" height="720"></canvas>
<div id="tip"></div>
<script>
const data = __DATA__;
const canvas = document.getElementById('net');
const ctx = canvas.getContext('2d');
const tip = document.getElementById('tip');
const ownerSelect = document.getElementById('owner');
for (const owner of data.owners) {
  const option = document.createElement('option');
  option.value = owner;
  option.textContent = owner;
  ownerSelect.appendChild(option);
}
function px(node) {
  return [40 + node.x * (canvas.width - 80), 40 + node.y * (canvas.height - 80)];
}
function draw(selectedOwner) {
  ctx.clearRect(0, 0, canvas.width, canvas.height);
  ctx.strokeStyle = 'rgba(0,0,0,0.2)';
  for (const [from, to] of data.edges) {
    const [x1, y1] = px(data.nodes[from]);
    const [x2, y2] = px(data.nodes[to]);
    ctx.beginPath();
    ctx.moveTo(x1, y1);
    ctx.lineTo(x2, y2);
    ctx.stroke();
  }
  for (const node of data.nodes) {
    const [x, y] = px(node);
    const faded = selectedOwner && node.owner !== selectedOwner;
    ctx.globalAlpha = faded ? 0.15 : 0.9;
    ctx.fillStyle = node.color;
    ctx.beginPath();
    ctx.arc(x, y, Math.min(node.size, 22), 0, 2 * Math.PI);
    ctx.fill();
    ctx.globalAlpha = faded ? 0.2 : 1.0;
    ctx.fillStyle = '#222';
    ctx.font = '12px sans-serif';
    ctx.fillText(node.id, x + Math.min(node.size, 22) + 3, y + 4);
    ctx.globalAlpha = 1.0;
  }
}
ownerSelect.addEventListener('change', () => draw(ownerSelect.value));
canvas.addEventListener('mousemove', (event) => {
  const rect = canvas.getBoundingClientRect();
  const mx = event.clientX - rect.left;
  const my = event.clientY - rect.top;
  const hit = data.nodes.find((node) => {
    const [x, y] = px(node);
    const r = Math.min(node.size, 22);
    return (mx - x) ** 2 + (my - y) ** 2 <= r * r;
  });
  if (hit) {
    tip.style.display = 'block';
    tip.style.left = event.pageX + 10 + 'px';
    tip.style.top = event.pageY + 10 + 'px';
    tip.textContent = hit.id + ' — ' + hit.data_type + ' (' + hit.owner + ')';
  } else {
    tip.style.display = 'none';
  }
});
draw('');
</script>
</body>
</html>
"#;

/// Build the interactive page: embedded node/edge JSON, canvas drawing,
/// owner filter dropdown, hover tooltips. No external assets.
pub fn diagram_page(table: &NetworkTable, positions: &[(f64, f64)]) -> Result<String> {
    let types = data_type_order(table);
    let color_index: HashMap<&str, usize> = types
        .iter()
        .enumerate()
        .map(|(i, t)| (t.as_str(), i))
        .collect();

    let nodes: Vec<serde_json::Value> = table
        .nodes
        .iter()
        .zip(positions.iter())
        .map(|(node, &(x, y))| {
            serde_json::json!({
                "id": node.id,
                "data_type": node.data_type,
                "owner": node.owner,
                "size": node.size,
                "x": x,
                "y": y,
                "color": category_color_hex(color_index[node.data_type.as_str()]),
            })
        })
        .collect();

    let edges: Vec<(usize, usize)> = crate::render::layout::edge_indices(table);

    let mut owners: Vec<&str> = table.nodes.iter().map(|n| n.owner.as_str()).collect();
    owners.sort_unstable();
    owners.dedup();

    let payload = serde_json::json!({
        "nodes": nodes,
        "edges": edges,
        "owners": owners,
    });

    Ok(PAGE_TEMPLATE.replace("__DATA__", &serde_json::to_string(&payload)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Edge, Node};

    fn table() -> NetworkTable {
        let node = |id: &str, data_type: &str, owner: &str| Node {
            id: id.to_string(),
            data_type: data_type.to_string(),
            owner: owner.to_string(),
            size: 8.0,
        };
        NetworkTable {
            nodes: vec![
                node("CRM", "Customer", "Sales"),
                node("Warehouse", "Inventory", "Ops"),
            ],
            edges: vec![Edge {
                from: "CRM".to_string(),
                to: "Warehouse".to_string(),
            }],
        }
    }

    #[test]
    fn page_embeds_nodes_edges_and_owners() {
        let page = diagram_page(&table(), &[(0.2, 0.3), (0.8, 0.6)]).unwrap();
        assert!(page.contains("\"CRM\""));
        assert!(page.contains("\"owners\":[\"Ops\",\"Sales\"]"));
        assert!(page.contains("[[0,1]]"));
        assert!(!page.contains("__DATA__"));
    }

    #[test]
    fn page_is_deterministic() {
        let positions = [(0.2, 0.3), (0.8, 0.6)];
        assert_eq!(
            diagram_page(&table(), &positions).unwrap(),
            diagram_page(&table(), &positions).unwrap()
        );
    }

    #[test]
    fn data_types_keep_first_seen_order() {
        assert_eq!(data_type_order(&table()), vec!["Customer", "Inventory"]);
    }
}
