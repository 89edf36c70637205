use serde::{Deserialize, Serialize};
use std::fmt;

use opgraph_core::params::Parameters;

use crate::traits::{flag, TypeDescriptor};

/// Raster channel from the backend's own raster repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterSourceType {
    pub channel: u32,
    pub sourcename: String,
    pub transform: bool,
}

impl fmt::Display for RasterSourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::NAME)
    }
}

impl TypeDescriptor for RasterSourceType {
    const TYPE: &'static str = "source";
    const NAME: &'static str = "Raster Source";

    fn backend_params(&self) -> Parameters {
        Parameters::new()
            .with("sourcename", self.sourcename.as_str())
            .with("channel", self.channel)
            .with("transform", flag(self.transform))
    }

    fn display_params(&self) -> Vec<(String, String)> {
        vec![
            ("channel".into(), self.channel.to_string()),
            ("sourcename".into(), self.sourcename.clone()),
            ("transform".into(), self.transform.to_string()),
        ]
    }
}
