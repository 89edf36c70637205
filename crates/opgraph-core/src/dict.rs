//! Serialized forms of an operator tree.
//!
//! - `QueryDict` is the wire format the geoprocessing backend consumes:
//!   `{ "type", "params"?, "sources"?: { "RASTER"?, "POINTS"?, "LINES"?, "POLYGONS"? } }`.
//!   Ids are not part of it.
//! - `OperatorDict` is the lossless form used to persist and restore a graph,
//!   ids and attribute schemas included.

use std::collections::hash_map::{Entry, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::id::{IdSequence, OperatorId};
use crate::operator::Operator;
use crate::params::Parameters;
use crate::result_type::ResultType;
use crate::schema::AttributeSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDict {
    #[serde(rename = "type")]
    pub operator_type: String,

    #[serde(default, skip_serializing_if = "Parameters::is_empty")]
    pub params: Parameters,

    #[serde(default, skip_serializing_if = "QuerySources::is_empty")]
    pub sources: QuerySources,
}

/// Children grouped by port; keys are the `ResultType` member names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuerySources {
    #[serde(rename = "RASTER", default, skip_serializing_if = "Vec::is_empty")]
    pub raster: Vec<QueryDict>,

    #[serde(rename = "POINTS", default, skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<QueryDict>,

    #[serde(rename = "LINES", default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<QueryDict>,

    #[serde(rename = "POLYGONS", default, skip_serializing_if = "Vec::is_empty")]
    pub polygons: Vec<QueryDict>,
}

impl QuerySources {
    pub fn is_empty(&self) -> bool {
        self.raster.is_empty()
            && self.points.is_empty()
            && self.lines.is_empty()
            && self.polygons.is_empty()
    }
}

/// Lossless, persistable form of an operator tree.
///
/// `operator_type` is the backend tag as a plain string; the typed operator
/// descriptors live in a crate layered on top of this one and are resolved
/// from the tag there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorDict {
    pub id: OperatorId,
    pub name: String,
    pub operator_type: String,
    pub result_type: ResultType,
    pub projection: String,
    #[serde(default)]
    pub params: Parameters,
    #[serde(default, skip_serializing_if = "AttributeSchema::is_empty")]
    pub schema: AttributeSchema,
    #[serde(default)]
    pub raster_sources: Vec<OperatorDict>,
    #[serde(default)]
    pub point_sources: Vec<OperatorDict>,
    #[serde(default)]
    pub line_sources: Vec<OperatorDict>,
    #[serde(default)]
    pub polygon_sources: Vec<OperatorDict>,
}

impl Operator {
    /// Backend query representation of this tree.
    pub fn to_dict(&self) -> QueryDict {
        let children = |port: &[Operator]| port.iter().map(Operator::to_dict).collect::<Vec<_>>();

        QueryDict {
            operator_type: self.operator_type().to_string(),
            params: self.parameters().clone(),
            sources: QuerySources {
                raster: children(self.raster_sources()),
                points: children(self.point_sources()),
                lines: children(self.line_sources()),
                polygons: children(self.polygon_sources()),
            },
        }
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.to_dict())?)
    }

    /// Compact JSON of `to_dict`, ready to embed in a query parameter.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_dict())?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_dict())?)
    }

    pub fn to_operator_dict(&self) -> OperatorDict {
        let children = |port: &[Operator]| {
            port.iter()
                .map(Operator::to_operator_dict)
                .collect::<Vec<_>>()
        };

        OperatorDict {
            id: self.id(),
            name: self.name().to_string(),
            operator_type: self.operator_type().to_string(),
            result_type: self.result_type(),
            projection: self.projection().to_string(),
            params: self.parameters().clone(),
            schema: self.schema().clone(),
            raster_sources: children(self.raster_sources()),
            point_sources: children(self.point_sources()),
            line_sources: children(self.line_sources()),
            polygon_sources: children(self.polygon_sources()),
        }
    }

    /// Rebuild a tree from its persisted form, keeping the stored ids.
    ///
    /// Port types are validated again. An id that appears more than once
    /// restores to a single shared node, provided every occurrence is the same
    /// subtree; otherwise the dict is rejected with `DuplicateId`. Afterwards
    /// `ids` is advanced past the largest restored id so newly built operators
    /// cannot collide with it.
    pub fn from_operator_dict(dict: &OperatorDict, ids: &dyn IdSequence) -> Result<Operator> {
        let op = rehydrate(dict, &mut HashMap::new())?;
        if let Some(max) = op.walk().map(Operator::id).max() {
            ids.advance_past(max);
        }
        Ok(op)
    }
}

/// Restored nodes by id, with the dict each was built from.
type Restored<'d> = HashMap<OperatorId, (&'d OperatorDict, Operator)>;

fn rehydrate<'d>(dict: &'d OperatorDict, restored: &mut Restored<'d>) -> Result<Operator> {
    if let Some((seen, op)) = restored.get(&dict.id) {
        return if *seen == dict {
            Ok(op.clone())
        } else {
            Err(Error::DuplicateId(dict.id))
        };
    }

    let mut builder = Operator::builder(
        dict.operator_type.as_str(),
        dict.result_type,
        dict.projection.as_str(),
    )
    .name(dict.name.as_str())
    .params(dict.params.clone())
    .schema(dict.schema.clone());

    let ports = [
        (ResultType::Raster, &dict.raster_sources),
        (ResultType::Points, &dict.point_sources),
        (ResultType::Lines, &dict.line_sources),
        (ResultType::Polygons, &dict.polygon_sources),
    ];
    for (port, children) in ports {
        for child in children {
            builder = builder.source(port, rehydrate(child, restored)?);
        }
    }

    let op = builder.build_with_id(dict.id)?;
    // A descendant may have claimed this id already.
    match restored.entry(dict.id) {
        Entry::Occupied(_) => Err(Error::DuplicateId(dict.id)),
        Entry::Vacant(slot) => Ok(slot.insert((dict, op)).1.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::AtomicIdSequence;
    use serde_json::json;

    #[test]
    fn test_leaf_omits_params_and_sources() {
        let ids = AtomicIdSequence::new();
        let op = Operator::builder("source", ResultType::Raster, "EPSG:4326")
            .build(&ids)
            .unwrap();
        assert_eq!(op.to_value().unwrap(), json!({ "type": "source" }));
    }

    #[test]
    fn test_sources_use_member_names() {
        let ids = AtomicIdSequence::new();
        let points = Operator::builder("csv", ResultType::Points, "EPSG:4326")
            .param("path", "a.csv")
            .build(&ids)
            .unwrap();
        let polygons = Operator::builder("wkt", ResultType::Polygons, "EPSG:4326")
            .build(&ids)
            .unwrap();
        let filter = Operator::builder("point_in_polygon", ResultType::Points, "EPSG:4326")
            .point_source(points)
            .polygon_source(polygons)
            .build(&ids)
            .unwrap();

        assert_eq!(
            filter.to_value().unwrap(),
            json!({
                "type": "point_in_polygon",
                "sources": {
                    "POINTS": [{ "type": "csv", "params": { "path": "a.csv" } }],
                    "POLYGONS": [{ "type": "wkt" }]
                }
            })
        );
    }

    #[test]
    fn test_rehydration_rejects_mismatched_ports() {
        let ids = AtomicIdSequence::new();
        let bad: OperatorDict = serde_json::from_value(json!({
            "id": 5,
            "name": "bad",
            "operatorType": "expression",
            "resultType": "RASTER",
            "projection": "EPSG:4326",
            "rasterSources": [{
                "id": 4,
                "name": "pts",
                "operatorType": "csv",
                "resultType": "POINTS",
                "projection": "EPSG:4326"
            }]
        }))
        .unwrap();

        let err = Operator::from_operator_dict(&bad, &ids).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::SourceTypeMismatch {
                expected: ResultType::Raster,
                actual: ResultType::Points,
                ..
            }
        ));
        assert_eq!(ids.peek(), OperatorId::new(1));
    }

    fn leaf_dict(id: u64, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "operatorType": "csv",
            "resultType": "POINTS",
            "projection": "EPSG:4326"
        })
    }

    #[test]
    fn test_rehydration_rejects_conflicting_ids() {
        let siblings: OperatorDict = serde_json::from_value(json!({
            "id": 7,
            "name": "join",
            "operatorType": "union",
            "resultType": "POINTS",
            "projection": "EPSG:4326",
            "pointSources": [leaf_dict(3, "a"), leaf_dict(3, "b")]
        }))
        .unwrap();
        let err = Operator::from_operator_dict(&siblings, &AtomicIdSequence::new()).unwrap_err();
        assert!(matches!(err, crate::error::Error::DuplicateId(id) if id == OperatorId::new(3)));

        let nested: OperatorDict = serde_json::from_value(json!({
            "id": 3,
            "name": "filter",
            "operatorType": "filter",
            "resultType": "POINTS",
            "projection": "EPSG:4326",
            "pointSources": [leaf_dict(3, "a")]
        }))
        .unwrap();
        let err = Operator::from_operator_dict(&nested, &AtomicIdSequence::new()).unwrap_err();
        assert!(matches!(err, crate::error::Error::DuplicateId(_)));
    }

    #[test]
    fn test_repeated_subtree_restores_as_one_node() {
        let dict: OperatorDict = serde_json::from_value(json!({
            "id": 7,
            "name": "join",
            "operatorType": "union",
            "resultType": "POINTS",
            "projection": "EPSG:4326",
            "pointSources": [leaf_dict(3, "a"), leaf_dict(3, "a")]
        }))
        .unwrap();
        let op = Operator::from_operator_dict(&dict, &AtomicIdSequence::new()).unwrap();
        let [a, b] = op.point_sources() else {
            panic!("expected two point sources");
        };
        assert!(Operator::ptr_eq(a, b));
    }

    #[test]
    fn test_schema_travels_in_operator_dict_only() {
        use crate::schema::{DataType, Unit};

        let ids = AtomicIdSequence::new();
        let op = Operator::builder("pangaea_source", ResultType::Points, "EPSG:4326")
            .schema(AttributeSchema::new().with_attribute(
                "salinity",
                DataType::Float64,
                Unit::new("salinity", "psu"),
            ))
            .build(&ids)
            .unwrap();

        let value = serde_json::to_value(op.to_operator_dict()).unwrap();
        assert_eq!(value["schema"]["attributes"], json!(["salinity"]));
        assert_eq!(value["schema"]["dataTypes"], json!({"salinity": "Float64"}));
        assert_eq!(op.to_value().unwrap(), json!({"type": "pangaea_source"}));

        let dict: OperatorDict = serde_json::from_value(value).unwrap();
        let back = Operator::from_operator_dict(&dict, &ids).unwrap();
        assert_eq!(back.schema(), op.schema());
    }
}
