use serde::{Deserialize, Serialize};
use std::fmt;

use opgraph_core::operator::{DEST_PROJECTION_PARAM, PROJECTION_OPERATOR, SRC_PROJECTION_PARAM};
use opgraph_core::params::Parameters;

use crate::traits::TypeDescriptor;

/// Reprojection between two spatial reference systems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionType {
    pub src_projection: String,
    pub dest_projection: String,
}

impl ProjectionType {
    pub fn new(src: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            src_projection: src.into(),
            dest_projection: dest.into(),
        }
    }
}

impl fmt::Display for ProjectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::NAME)
    }
}

impl TypeDescriptor for ProjectionType {
    const TYPE: &'static str = PROJECTION_OPERATOR;
    const NAME: &'static str = "Projection";

    fn backend_params(&self) -> Parameters {
        Parameters::new()
            .with(SRC_PROJECTION_PARAM, self.src_projection.as_str())
            .with(DEST_PROJECTION_PARAM, self.dest_projection.as_str())
    }

    fn display_params(&self) -> Vec<(String, String)> {
        vec![
            ("srcProjection".into(), self.src_projection.clone()),
            ("destProjection".into(), self.dest_projection.clone()),
        ]
    }
}
