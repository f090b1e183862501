//! Network pipeline: published spreadsheet → degree-counted node table →
//! network diagram artifacts.

use crate::apis::sheets::SheetsClient;
use crate::config::Config;
use crate::constants::{
    FLOWS_WORKSHEET, NETWORK_PIPELINE, NODE_SIZE_BASE, NODE_SIZE_PER_DEGREE, SYSTEMS_WORKSHEET,
};
use crate::error::{DatalensError, Result};
use crate::pipeline::{persist_html, persist_json, RunSummary};
use crate::render;
use crate::types::{Edge, NetworkTable, Node, Worksheet};
use std::collections::{HashMap, HashSet};
use tracing::{info, instrument, warn};

/// A row of the "Systems" worksheet before degree derivation.
#[derive(Debug, Clone)]
pub struct SystemRow {
    pub id: String,
    pub data_type: String,
    pub owner: String,
}

/// Parse the "Data Flows" worksheet (`From`, `To`). Rows with either
/// endpoint missing are skipped with a warning; duplicates are kept so
/// repeated flows count toward degree.
pub fn parse_edges(sheet: &Worksheet) -> Result<Vec<Edge>> {
    let from_idx = sheet
        .column_index("From")
        .ok_or_else(|| DatalensError::MissingField("From".to_string()))?;
    let to_idx = sheet
        .column_index("To")
        .ok_or_else(|| DatalensError::MissingField("To".to_string()))?;

    let mut edges = Vec::new();
    for (row_number, row) in sheet.rows.iter().enumerate() {
        let from = row.get(from_idx).and_then(|c| c.clone());
        let to = row.get(to_idx).and_then(|c| c.clone());
        match (from, to) {
            (Some(from), Some(to)) => edges.push(Edge { from, to }),
            _ => warn!("Skipping flow row {}: missing endpoint", row_number + 1),
        }
    }
    Ok(edges)
}

/// Parse the "Systems" worksheet (`System`, `Data Type`, `Owner`). A row
/// without a system id is skipped; missing categorical cells become the
/// explicit "Unknown" sentinel so they stay visible in the legend.
pub fn parse_systems(sheet: &Worksheet) -> Result<Vec<SystemRow>> {
    let id_idx = sheet
        .column_index("System")
        .ok_or_else(|| DatalensError::MissingField("System".to_string()))?;
    let data_type_idx = sheet
        .column_index("Data Type")
        .ok_or_else(|| DatalensError::MissingField("Data Type".to_string()))?;
    let owner_idx = sheet
        .column_index("Owner")
        .ok_or_else(|| DatalensError::MissingField("Owner".to_string()))?;

    let mut systems = Vec::new();
    for (row_number, row) in sheet.rows.iter().enumerate() {
        let Some(id) = row.get(id_idx).and_then(|c| c.clone()) else {
            warn!("Skipping system row {}: missing id", row_number + 1);
            continue;
        };
        let cell = |idx: usize| {
            row.get(idx)
                .and_then(|c| c.clone())
                .unwrap_or_else(|| "Unknown".to_string())
        };
        systems.push(SystemRow {
            id,
            data_type: cell(data_type_idx),
            owner: cell(owner_idx),
        });
    }
    Ok(systems)
}

/// Derive the render tables. Per node: in-degree counts edges with
/// `to == id`, out-degree counts edges with `from == id`, both tallied only
/// over endpoints present in the system set; missing tallies default to 0.
/// Size is the linear transform `5 + 3 × total_degree`. Nodes with total
/// degree 0 are dropped before rendering — a deliberate filter, not an
/// error — and surviving edges keep only pairs whose endpoints survived.
pub fn build_network(systems: &[SystemRow], edges: &[Edge]) -> NetworkTable {
    let known: HashSet<&str> = systems.iter().map(|s| s.id.as_str()).collect();

    let mut in_degree: HashMap<&str, usize> = HashMap::new();
    let mut out_degree: HashMap<&str, usize> = HashMap::new();
    for edge in edges {
        if known.contains(edge.from.as_str()) {
            *out_degree.entry(edge.from.as_str()).or_insert(0) += 1;
        }
        if known.contains(edge.to.as_str()) {
            *in_degree.entry(edge.to.as_str()).or_insert(0) += 1;
        }
    }

    let nodes: Vec<Node> = systems
        .iter()
        .filter_map(|system| {
            let total = in_degree.get(system.id.as_str()).copied().unwrap_or(0)
                + out_degree.get(system.id.as_str()).copied().unwrap_or(0);
            if total == 0 {
                return None;
            }
            Some(Node {
                id: system.id.clone(),
                data_type: system.data_type.clone(),
                owner: system.owner.clone(),
                size: NODE_SIZE_BASE + NODE_SIZE_PER_DEGREE * total as f64,
            })
        })
        .collect();

    let surviving: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let edges: Vec<Edge> = edges
        .iter()
        .filter(|e| surviving.contains(e.from.as_str()) && surviving.contains(e.to.as_str()))
        .cloned()
        .collect();

    NetworkTable { nodes, edges }
}

/// Run the complete network pipeline: fetch both worksheets, derive the
/// tables, render the diagram artifacts, persist the normalized tables.
#[instrument(skip(config))]
pub async fn run(config: &Config, sheet_id: &str) -> Result<RunSummary> {
    let mut summary = RunSummary::new(NETWORK_PIPELINE);

    info!("📡 Fetching worksheets from spreadsheet {}", sheet_id);
    println!("📡 Fetching worksheets from spreadsheet {sheet_id}...");
    let client = SheetsClient::new();
    let flows = client.fetch_worksheet(sheet_id, FLOWS_WORKSHEET).await?;
    let systems_sheet = client.fetch_worksheet(sheet_id, SYSTEMS_WORKSHEET).await?;

    let edges = parse_edges(&flows)?;
    let systems = parse_systems(&systems_sheet)?;
    summary.records_fetched = edges.len() + systems.len();

    info!(
        "🔧 Deriving degree counts for {} systems over {} flows",
        systems.len(),
        edges.len()
    );
    let table = build_network(&systems, &edges);
    let orphans = systems.len() - table.nodes.len();
    if orphans > 0 {
        info!("Dropped {} orphan systems with no flows", orphans);
    }
    summary.records_kept = table.nodes.len();

    info!("🎨 Rendering network diagram");
    let output_dir = &config.output_dir;
    std::fs::create_dir_all(output_dir)?;

    let positions = render::layout::force_layout(
        table.nodes.len(),
        &render::layout::edge_indices(&table),
        config.layout.iterations,
        config.layout.seed,
    );

    let png_path = format!("{}/network.png", output_dir);
    render::network::render_diagram(&table, &positions, &png_path)?;
    summary.artifacts.push(png_path);

    let page = render::network::diagram_page(&table, &positions)?;
    summary
        .artifacts
        .push(persist_html(&page, output_dir, "network.html")?);

    summary
        .artifacts
        .push(persist_json(&table, output_dir, "network.json")?);

    info!(
        "✅ Network pipeline complete: {} nodes, {} edges",
        table.nodes.len(),
        table.edges.len()
    );
    Ok(summary.finish())
}
