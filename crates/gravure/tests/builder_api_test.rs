//! Integration tests for the Diagram construction API
//!
//! These tests exercise the public surface end to end: scoped construction,
//! the fan-out connector contract, and the serialized DOT output.

use gravure::{
    Diagram, EdgeStyle, Link,
    config::DiagramConfig,
    options::{Direction, OutputFormat},
};

/// Collapses whitespace runs so assertions survive printer formatting.
fn normalized(dot: &str) -> String {
    dot.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[test]
fn test_fan_out_scenario_orders_edges_and_nests_children() {
    // Node A at root; cluster G with B and C; A >> [B, C].
    let mut diagram = Diagram::new("Scenario");
    let a = diagram.node("custom", "A");
    let (b, c) = diagram
        .cluster("G", |d| Ok((d.node("custom", "B"), d.node("custom", "C"))))
        .expect("cluster construction");

    diagram.connect(a, [b, c]).expect("fan-out");

    let pairs: Vec<_> = diagram
        .model()
        .edges()
        .iter()
        .map(|e| (e.from(), e.to()))
        .collect();
    assert_eq!(pairs, vec![(a, b), (a, c)]);

    let dot = normalized(&diagram.dot_source());
    let cluster_open = dot.find("subgraph cluster_g {").expect("cluster block");
    let cluster_close = dot[cluster_open..].find('}').expect("block close") + cluster_open;

    for node in ["b[", "c["] {
        let pos = dot.find(node).expect("node inside cluster");
        assert!(
            cluster_open < pos && pos < cluster_close,
            "{node} should serialize inside G's sub-graph block"
        );
    }
    for edge in ["a -> b", "a -> c"] {
        let pos = dot.find(edge).expect("edge statement");
        assert!(
            pos > cluster_close,
            "{edge} should be serialized outside any cluster block"
        );
    }
    assert!(dot.find("a -> b").unwrap() < dot.find("a -> c").unwrap());
}

#[test]
fn test_chaining_matches_sequential_connects() {
    let edges_of = |build: &dyn Fn(&mut Diagram)| {
        let mut diagram = Diagram::new("Equivalence");
        build(&mut diagram);
        diagram
            .model()
            .edges()
            .iter()
            .map(|e| (e.from().to_string(), e.to().to_string()))
            .collect::<Vec<_>>()
    };

    let chained = edges_of(&|d: &mut Diagram| {
        let a = d.node("custom", "a");
        let b = d.node("custom", "b");
        let c = d.node("custom", "c");
        let returned = d.connect(a, b).unwrap();
        d.connect(returned, c).unwrap();
    });

    let sequential = edges_of(&|d: &mut Diagram| {
        let a = d.node("custom", "a");
        let b = d.node("custom", "b");
        let c = d.node("custom", "c");
        d.connect(a, b).unwrap();
        d.connect(b, c).unwrap();
    });

    assert_eq!(chained, sequential);
}

#[test]
fn test_cross_cluster_edges_reference_identifiers() {
    let mut diagram = Diagram::new("Cross");
    let frontend = diagram
        .cluster("Frontend", |d| Ok(d.node("custom", "App")))
        .unwrap();
    let backend = diagram
        .cluster("Backend", |d| Ok(d.node("custom", "API")))
        .unwrap();
    diagram.connect(frontend, backend).unwrap();

    let dot = normalized(&diagram.dot_source());
    assert!(dot.contains("subgraph cluster_frontend {"));
    assert!(dot.contains("subgraph cluster_backend {"));
    assert!(dot.contains("app -> api"));
}

#[test]
fn test_styled_link_chain() {
    let mut diagram = Diagram::new("Styled");
    let app = diagram.node("custom", "App");
    let db = diagram.node("custom", "DB");

    let bound = diagram
        .connect(app, Link::styled(EdgeStyle::new().with_label("SQL")))
        .unwrap();
    diagram.connect(bound, db).unwrap();

    assert_eq!(diagram.model().edge_count(), 1);
    assert!(normalized(&diagram.dot_source()).contains("label=\"SQL\""));
}

#[test]
fn test_failed_cluster_leaves_root_scope_usable() {
    let mut diagram = Diagram::new("Recovery");

    let failed: Result<(), _> = diagram.cluster("Broken", |d| {
        d.node("custom", "inside");
        Err(gravure::GravureError::new_render_error("nope"))
    });
    assert!(failed.is_err());

    let after = diagram.node("custom", "after");
    assert_eq!(diagram.model().node(after).unwrap().parent(), None);
}

#[test]
fn test_render_dot_format_writes_artifact() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = dir.path().join("pipeline.dot");

    let config = DiagramConfig::new()
        .with_format(OutputFormat::Dot)
        .with_direction(Direction::TopBottom)
        .with_output(&output);
    let mut diagram = Diagram::with_config("Pipeline", config);

    let a = diagram.node("custom", "Ingest");
    let b = diagram.node("custom", "Store");
    diagram.connect(a, b).unwrap();

    let artifact = diagram.render().expect("dot rendering needs no engine");
    assert_eq!(artifact, output);

    let written = std::fs::read_to_string(&output).expect("artifact exists");
    assert!(written.starts_with("digraph"));
    assert!(normalized(&written).contains("rankdir=TB"));
    assert!(normalized(&written).contains("ingest -> store"));
}

#[test]
fn test_default_artifact_path_comes_from_title() {
    let diagram = Diagram::new("HealthMate Mobile App Architecture");
    assert_eq!(
        diagram.config().output_path(diagram.title()),
        std::path::PathBuf::from("healthmate_mobile_app_architecture.png")
    );
}
