//! Query dict / JSON output and workflow bodies.

use serde_json::{json, Value};

use opgraph_core::prelude::*;

/// expression(raster: [gdal, projection(gdal)]) feeding a point extraction.
fn three_levels(ctx: &GraphContext) -> Operator {
    let srtm = ctx
        .build(
            Operator::builder("gdal_source", ResultType::Raster, "EPSG:4326")
                .param("sourcename", "srtm")
                .param("channel", 0),
        )
        .unwrap();
    let landsat = ctx
        .build(
            Operator::builder("gdal_source", ResultType::Raster, "EPSG:32632")
                .param("sourcename", "landsat")
                .param("channel", 3),
        )
        .unwrap()
        .projected("EPSG:4326", ctx.ids())
        .unwrap();
    let expr = ctx
        .build(
            Operator::builder("expression", ResultType::Raster, "EPSG:4326")
                .param("expression", "A-B")
                .raster_sources([srtm, landsat]),
        )
        .unwrap();
    let stations = ctx
        .build(Operator::builder("csv_source", ResultType::Points, "EPSG:4326"))
        .unwrap();
    ctx.build(
        Operator::builder("raster_value_extraction", ResultType::Points, "EPSG:4326")
            .param("xResolution", 1024)
            .raster_source(expr)
            .point_source(stations),
    )
    .unwrap()
}

#[test]
fn test_three_level_tree_shape() {
    let ctx = GraphContext::isolated();
    let v = three_levels(&ctx).to_value().unwrap();

    assert_eq!(
        v,
        json!({
            "type": "raster_value_extraction",
            "params": {"xResolution": 1024},
            "sources": {
                "RASTER": [{
                    "type": "expression",
                    "params": {"expression": "A-B"},
                    "sources": {"RASTER": [
                        {"type": "gdal_source", "params": {"sourcename": "srtm", "channel": 0}},
                        {
                            "type": "projection",
                            "params": {"src_projection": "EPSG:32632", "dest_projection": "EPSG:4326"},
                            "sources": {"RASTER": [
                                {"type": "gdal_source", "params": {"sourcename": "landsat", "channel": 3}}
                            ]}
                        }
                    ]}
                }],
                "POINTS": [{"type": "csv_source"}]
            }
        })
    );
}

#[test]
fn test_no_empty_params_or_sources_anywhere() {
    fn check(v: &Value) {
        let obj = v.as_object().unwrap();
        assert!(obj.contains_key("type"));
        if let Some(p) = obj.get("params") {
            assert!(!p.as_object().unwrap().is_empty());
        }
        if let Some(s) = obj.get("sources") {
            let ports = s.as_object().unwrap();
            assert!(!ports.is_empty());
            for (key, children) in ports {
                assert!(["RASTER", "POINTS", "LINES", "POLYGONS"].contains(&key.as_str()));
                let children = children.as_array().unwrap();
                assert!(!children.is_empty());
                children.iter().for_each(check);
            }
        }
    }
    let ctx = GraphContext::isolated();
    check(&three_levels(&ctx).to_value().unwrap());
}

#[test]
fn test_json_round_trip_equals_dict() {
    let ctx = GraphContext::isolated();
    let op = three_levels(&ctx);
    let parsed: QueryDict = serde_json::from_str(&op.to_json().unwrap()).unwrap();
    assert_eq!(parsed, op.to_dict());
}

#[test]
fn test_param_order_is_insertion_order() {
    let ctx = GraphContext::isolated();
    let op = ctx
        .build(
            Operator::builder("gdal_source", ResultType::Raster, "EPSG:4326")
                .param("z", 1)
                .param("a", 2)
                .param("m", "3"),
        )
        .unwrap();
    assert_eq!(
        op.to_json().unwrap(),
        r#"{"type":"gdal_source","params":{"z":1,"a":2,"m":"3"}}"#
    );
}

#[test]
fn test_workflow_type_and_hash() {
    let a = three_levels(&GraphContext::isolated());
    let b = three_levels(&GraphContext::isolated());
    assert_ne!(a.id(), OperatorId::new(0));

    let wa = Workflow::from_operator(&a);
    let wb = Workflow::from_operator(&b);
    assert_eq!(wa.workflow_type, WorkflowType::Vector);
    assert_eq!(wa.content_hash().unwrap(), wb.content_hash().unwrap());

    let body: Value = serde_json::from_str(&wa.to_json().unwrap()).unwrap();
    assert_eq!(body["type"], json!("Vector"));
    assert_eq!(body["operator"]["type"], json!("raster_value_extraction"));
}
