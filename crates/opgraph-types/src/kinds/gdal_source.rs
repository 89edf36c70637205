//! Raster read through GDAL, one channel at a time.

use serde::{Deserialize, Serialize};
use std::fmt;

use opgraph_core::params::Parameters;

use crate::traits::{flag, TypeDescriptor};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GdalSourceType {
    pub channel_config: ChannelConfig,
    pub sourcename: String,
    pub transform: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelConfig {
    pub display_value: String,
    pub channel_number: u32,
}

impl ChannelConfig {
    /// Config for a bare channel number, labelled like older configs were.
    pub fn numbered(channel_number: u32) -> Self {
        Self {
            display_value: format!("channel number {}", channel_number),
            channel_number,
        }
    }
}

impl fmt::Display for GdalSourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::NAME)
    }
}

impl TypeDescriptor for GdalSourceType {
    const TYPE: &'static str = "gdal_source";
    const NAME: &'static str = "GDAL Source";

    fn backend_params(&self) -> Parameters {
        Parameters::new()
            .with("sourcename", self.sourcename.as_str())
            .with("channel", self.channel_config.channel_number)
            .with("transform", flag(self.transform))
    }

    fn display_params(&self) -> Vec<(String, String)> {
        vec![
            ("channelConfig".into(), self.channel_config.display_value.clone()),
            ("sourcename".into(), self.sourcename.clone()),
            ("transform".into(), self.transform.to_string()),
        ]
    }
}
