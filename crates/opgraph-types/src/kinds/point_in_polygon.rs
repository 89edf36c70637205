use serde::{Deserialize, Serialize};
use std::fmt;

use opgraph_core::params::Parameters;

use crate::traits::TypeDescriptor;

/// Keeps the points that fall inside any polygon of the second input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointInPolygonFilterType {}

impl fmt::Display for PointInPolygonFilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::NAME)
    }
}

impl TypeDescriptor for PointInPolygonFilterType {
    const TYPE: &'static str = "filterpointsbygeometry";
    const NAME: &'static str = "Point in Polygon Filter";

    fn backend_params(&self) -> Parameters {
        Parameters::new()
    }

    fn display_params(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}
