use anyhow::Result;
use datalens::apis::sheets::parse_gviz;
use datalens::pipeline::network::{build_network, parse_edges, parse_systems};
use datalens::pipeline::persist_json;
use datalens::render;
use tempfile::tempdir;

const FLOWS_BODY: &str = concat!(
    "/*O_o*/\n",
    "google.visualization.Query.setResponse({\"status\":\"ok\",\"table\":{",
    "\"cols\":[{\"label\":\"From\"},{\"label\":\"To\"}],",
    "\"rows\":[",
    "{\"c\":[{\"v\":\"A\"},{\"v\":\"B\"}]},",
    "{\"c\":[{\"v\":\"B\"},{\"v\":\"C\"}]},",
    "{\"c\":[{\"v\":\"B\"},{\"v\":\"C\"}]}",
    "]}});"
);

const SYSTEMS_BODY: &str = concat!(
    "/*O_o*/\n",
    "google.visualization.Query.setResponse({\"status\":\"ok\",\"table\":{",
    "\"cols\":[{\"label\":\"System\"},{\"label\":\"Data Type\"},{\"label\":\"Owner\"}],",
    "\"rows\":[",
    "{\"c\":[{\"v\":\"A\"},{\"v\":\"Customer\"},{\"v\":\"Sales\"}]},",
    "{\"c\":[{\"v\":\"B\"},{\"v\":\"Orders\"},{\"v\":\"Ops\"}]},",
    "{\"c\":[{\"v\":\"C\"},{\"v\":\"Orders\"},{\"v\":\"Ops\"}]},",
    "{\"c\":[{\"v\":\"Island\"},{\"v\":\"Archive\"},{\"v\":\"IT\"}]}",
    "]}});"
);

#[test]
fn worksheet_to_render_tables_end_to_end() -> Result<()> {
    let flows = parse_gviz(FLOWS_BODY)?;
    let systems_sheet = parse_gviz(SYSTEMS_BODY)?;

    let edges = parse_edges(&flows)?;
    let systems = parse_systems(&systems_sheet)?;
    assert_eq!(edges.len(), 3);
    assert_eq!(systems.len(), 4);

    let table = build_network(&systems, &edges);

    // Degrees A:1, B:3, C:2 → sizes 8, 14, 11; the island system is dropped.
    let size_of = |id: &str| table.nodes.iter().find(|n| n.id == id).map(|n| n.size);
    assert_eq!(size_of("A"), Some(8.0));
    assert_eq!(size_of("B"), Some(14.0));
    assert_eq!(size_of("C"), Some(11.0));
    assert_eq!(size_of("Island"), None);

    // Every node satisfies the linear size transform and has degree > 0.
    for node in &table.nodes {
        let in_degree = table.edges.iter().filter(|e| e.to == node.id).count();
        let out_degree = table.edges.iter().filter(|e| e.from == node.id).count();
        assert!(in_degree + out_degree > 0);
        assert_eq!(node.size, 5.0 + 3.0 * (in_degree + out_degree) as f64);
    }

    Ok(())
}

#[test]
fn network_artifacts_are_reproducible_and_persisted() -> Result<()> {
    let flows = parse_gviz(FLOWS_BODY)?;
    let systems_sheet = parse_gviz(SYSTEMS_BODY)?;
    let table = build_network(&parse_systems(&systems_sheet)?, &parse_edges(&flows)?);

    let positions = render::layout::force_layout(
        table.nodes.len(),
        &render::layout::edge_indices(&table),
        100,
        7,
    );
    let again = render::layout::force_layout(
        table.nodes.len(),
        &render::layout::edge_indices(&table),
        100,
        7,
    );
    assert_eq!(positions, again);

    let page = render::network::diagram_page(&table, &positions)?;
    assert_eq!(page, render::network::diagram_page(&table, &positions)?);
    assert!(page.contains("\"B\""));
    assert!(!page.contains("Island"));

    let dir = tempdir()?;
    let output_dir = dir.path().to_str().unwrap();
    let json_path = persist_json(&table, output_dir, "network.json")?;
    let content = std::fs::read_to_string(&json_path)?;
    let reloaded: datalens::types::NetworkTable = serde_json::from_str(&content)?;
    assert_eq!(reloaded.nodes.len(), table.nodes.len());
    assert_eq!(reloaded.edges.len(), table.edges.len());

    Ok(())
}
