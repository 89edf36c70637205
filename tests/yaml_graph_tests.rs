//! YAML graph documents against the builder API.

use opgraph_core::prelude::*;
use opgraph_planner::{build_graph, parse_yaml_graph, PlanError};

const EXTRACTION: &str = r#"
root:
  type: raster_value_extraction
  result: points
  name: "Elevation at stations"
  params:
    xResolution: 1024
    yResolution: 1024
  sources:
    raster:
      - type: gdal_source
        result: raster
        params: { sourcename: srtm, channel: 0 }
    points:
      - type: csv_source
        result: points
        params: { filename: "stations.csv" }
"#;

fn built_by_hand(ctx: &GraphContext) -> Operator {
    let srtm = ctx
        .build(
            Operator::builder("gdal_source", ResultType::Raster, "EPSG:4326")
                .param("sourcename", "srtm")
                .param("channel", 0),
        )
        .unwrap();
    let stations = ctx
        .build(
            Operator::builder("csv_source", ResultType::Points, "EPSG:4326")
                .param("filename", "stations.csv"),
        )
        .unwrap();
    ctx.build(
        Operator::builder("raster_value_extraction", ResultType::Points, "EPSG:4326")
            .name("Elevation at stations")
            .param("xResolution", 1024)
            .param("yResolution", 1024)
            .raster_source(srtm)
            .point_source(stations),
    )
    .unwrap()
}

#[test]
fn test_yaml_matches_builder() {
    let from_yaml = build_graph(
        &parse_yaml_graph(EXTRACTION).unwrap(),
        &GraphContext::isolated(),
    )
    .unwrap();
    let by_hand = built_by_hand(&GraphContext::isolated());

    assert_eq!(from_yaml.to_dict(), by_hand.to_dict());
    assert_eq!(from_yaml.to_operator_dict(), by_hand.to_operator_dict());
}

#[test]
fn test_document_default_projection() {
    let yaml = format!(
        "config:\n  default_projection: \"EPSG:25832\"\n{}",
        EXTRACTION.trim_start()
    );
    let root = build_graph(&parse_yaml_graph(&yaml).unwrap(), &GraphContext::isolated()).unwrap();
    assert!(root.walk().all(|op| op.projection() == "EPSG:25832"));
}

#[test]
fn test_context_default_projection() {
    let ctx = GraphContext::with_sequence(
        std::sync::Arc::new(AtomicIdSequence::new()),
        GraphConfig {
            default_projection: "EPSG:3035".into(),
            ..GraphConfig::default()
        },
    );
    let root = build_graph(&parse_yaml_graph(EXTRACTION).unwrap(), &ctx).unwrap();
    assert_eq!(root.projection(), "EPSG:3035");
}

#[test]
fn test_target_projection_wraps_root() {
    let yaml = format!("config:\n  projection: \"EPSG:3857\"\n{}", EXTRACTION.trim_start());
    let ctx = GraphContext::isolated();
    let root = build_graph(&parse_yaml_graph(&yaml).unwrap(), &ctx).unwrap();

    assert_eq!(root.operator_type(), "projection");
    assert_eq!(root.result_type(), ResultType::Points);
    assert_eq!(
        root.point_sources()[0].to_dict(),
        built_by_hand(&GraphContext::isolated()).to_dict()
    );
}

#[test]
fn test_invalid_documents() {
    assert!(matches!(parse_yaml_graph("root: ["), Err(PlanError::Yaml(_))));
    assert!(matches!(parse_yaml_graph("config: {}"), Err(PlanError::Yaml(_))));
    assert!(matches!(
        parse_yaml_graph("root: { type: a, result: hexagons }"),
        Err(PlanError::Yaml(_))
    ));

    let mismatch = parse_yaml_graph(
        "root: { type: f, result: lines, sources: { lines: [ { type: s, result: polygons } ] } }",
    )
    .unwrap();
    assert!(matches!(
        build_graph(&mismatch, &GraphContext::isolated()),
        Err(PlanError::Graph(Error::SourceTypeMismatch { .. }))
    ));
}
