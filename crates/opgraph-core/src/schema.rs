//! Output attribute schema of an operator: attribute names, their data types
//! and measurement units. Pure metadata; the query dict never carries it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Attribute value type, serialized by its backend code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float32,
    Float64,
    Alphanumeric,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    #[default]
    Unknown,
    Continuous,
    Discrete,
}

/// What an attribute measures, in which unit, and over which range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub measurement: String,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default)]
    pub interpolation: Interpolation,
    /// Class labels of a classified measurement.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub classes: BTreeMap<i64, String>,
}

impl Unit {
    pub fn new(measurement: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            measurement: measurement.into(),
            unit: unit.into(),
            min: None,
            max: None,
            interpolation: Interpolation::Unknown,
            classes: BTreeMap::new(),
        }
    }

    pub fn unknown() -> Self {
        Self::new("unknown", "unknown")
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AttributeSchema {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attributes: Vec<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    data_types: IndexMap<String, DataType>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    units: IndexMap<String, Unit>,
}

impl AttributeSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `name` (once) and record its type and unit.
    pub fn with_attribute(mut self, name: impl Into<String>, data_type: DataType, unit: Unit) -> Self {
        let name = name.into();
        if !self.attributes.contains(&name) {
            self.attributes.push(name.clone());
        }
        self.data_types.insert(name.clone(), data_type);
        self.units.insert(name, unit);
        self
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn data_type(&self, attribute: &str) -> Option<DataType> {
        self.data_types.get(attribute).copied()
    }

    pub fn unit(&self, attribute: &str) -> Option<&Unit> {
        self.units.get(attribute)
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.data_types.is_empty() && self.units.is_empty()
    }

    /// Types and units may only describe listed attributes; unit bounds must be
    /// finite.
    pub fn validate(&self) -> Result<()> {
        for name in self.data_types.keys().chain(self.units.keys()) {
            if !self.attributes.contains(name) {
                return Err(Error::UnknownAttribute(name.clone()));
            }
        }
        for (name, unit) in &self.units {
            for (bound, value) in [("min", unit.min), ("max", unit.max)] {
                if matches!(value, Some(v) if !v.is_finite()) {
                    return Err(Error::NonFinite(format!("{name}.{bound}")));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_camel_case_shape() {
        let schema = AttributeSchema::new().with_attribute(
            "elevation",
            DataType::Float32,
            Unit::new("elevation", "m").with_range(-500.0, 9000.0),
        );
        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({
                "attributes": ["elevation"],
                "dataTypes": {"elevation": "Float32"},
                "units": {"elevation": {
                    "measurement": "elevation", "unit": "m",
                    "min": -500.0, "max": 9000.0, "interpolation": "unknown"
                }}
            })
        );
        assert_eq!(serde_json::to_value(AttributeSchema::new()).unwrap(), json!({}));
    }

    #[test]
    fn test_re_adding_attribute_replaces_type() {
        let schema = AttributeSchema::new()
            .with_attribute("a", DataType::Int32, Unit::unknown())
            .with_attribute("a", DataType::Float64, Unit::unknown());
        assert_eq!(schema.attributes(), ["a".to_string()]);
        assert_eq!(schema.data_type("a"), Some(DataType::Float64));
    }

    #[test]
    fn test_validate_rejects_orphans_and_nan_bounds() {
        let orphan: AttributeSchema =
            serde_json::from_value(json!({"dataTypes": {"x": "Byte"}})).unwrap();
        assert!(matches!(orphan.validate(), Err(Error::UnknownAttribute(ref a)) if a == "x"));

        let nan = AttributeSchema::new().with_attribute(
            "t",
            DataType::Float32,
            Unit::new("temperature", "c").with_range(f64::NAN, 40.0),
        );
        assert!(matches!(nan.validate(), Err(Error::NonFinite(ref f)) if f == "t.min"));
    }
}
