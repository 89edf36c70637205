use serde::{Deserialize, Serialize};
use std::fmt;

use opgraph_core::params::Parameters;
use opgraph_core::ResultType;

use crate::traits::TypeDescriptor;

/// Inline geometries given as Well-Known Text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WktSourceType {
    #[serde(rename = "type")]
    pub result_type: ResultType,
    pub wkt: String,
}

impl fmt::Display for WktSourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::NAME)
    }
}

impl TypeDescriptor for WktSourceType {
    const TYPE: &'static str = "wktsource";
    const NAME: &'static str = "WKT Source";

    fn backend_params(&self) -> Parameters {
        Parameters::new()
            .with("type", self.result_type.name().to_ascii_lowercase())
            .with("wkt", self.wkt.as_str())
    }

    fn display_params(&self) -> Vec<(String, String)> {
        vec![
            ("type".into(), self.result_type.to_string()),
            ("wkt".into(), self.wkt.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::OperatorType;
    use serde_json::json;

    #[test]
    fn test_type_field_is_result_type() {
        let ty = WktSourceType {
            result_type: ResultType::Polygons,
            wkt: "POLYGON((0 0, 1 0, 1 1, 0 0))".into(),
        };
        assert_eq!(ty.parameter_value("type"), Some(json!("POLYGONS")));
        assert_eq!(
            ty.mapping_params().get("type").and_then(|v| v.as_str()),
            Some("polygons")
        );
    }
}
