use serde::{Deserialize, Serialize};
use std::fmt;

use opgraph_core::params::Parameters;

use crate::traits::{flag, TypeDescriptor};

/// Keeps features whose numeric attribute lies in `[range_min, range_max]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericAttributeFilterType {
    pub attribute_name: String,
    pub include_no_data: bool,
    pub range_min: f64,
    pub range_max: f64,
}

impl fmt::Display for NumericAttributeFilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::NAME)
    }
}

impl TypeDescriptor for NumericAttributeFilterType {
    const TYPE: &'static str = "features_filter_by_range";
    const NAME: &'static str = "Numeric Attribute Filter";

    fn backend_params(&self) -> Parameters {
        Parameters::new()
            .with("name", self.attribute_name.as_str())
            .with("includeNoData", flag(self.include_no_data))
            .with("rangeMin", self.range_min)
            .with("rangeMax", self.range_max)
    }

    fn display_params(&self) -> Vec<(String, String)> {
        vec![
            ("attributeName".into(), self.attribute_name.clone()),
            ("includeNoData".into(), self.include_no_data.to_string()),
            ("rangeMin".into(), self.range_min.to_string()),
            ("rangeMax".into(), self.range_max.to_string()),
        ]
    }
}
