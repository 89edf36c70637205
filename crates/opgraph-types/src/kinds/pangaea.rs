//! Point data from a PANGAEA dataset link, read as delimited text.

use serde::{Deserialize, Serialize};
use std::fmt;

use opgraph_core::params::Parameters;

use crate::traits::TypeDescriptor;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PangaeaSourceType {
    pub data_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv_parameters: Option<CsvParameters>,
}

/// How the linked tab-separated file is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvParameters {
    pub geometry: String,
    pub separator: String,
    pub time: String,
    pub columns: CsvColumns,
    pub on_error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CsvColumns {
    #[serde(default)]
    pub numeric: Vec<String>,
    #[serde(default)]
    pub textual: Vec<String>,
    pub x: String,
    pub y: String,
}

impl PangaeaSourceType {
    pub fn new(data_link: impl Into<String>) -> Self {
        Self {
            data_link: data_link.into(),
            csv_parameters: None,
        }
    }

    pub fn with_csv_parameters(mut self, csv: CsvParameters) -> Self {
        self.csv_parameters = Some(csv);
        self
    }
}

impl fmt::Display for PangaeaSourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::NAME)
    }
}

impl TypeDescriptor for PangaeaSourceType {
    const TYPE: &'static str = "pangaea_source";
    const NAME: &'static str = "Pangaea Source";

    fn backend_params(&self) -> Parameters {
        let mut params = Parameters::new().with("link", self.data_link.as_str());
        if let Some(csv) = &self.csv_parameters {
            params.insert("geometry", csv.geometry.as_str());
            params.insert("separator", csv.separator.as_str());
            params.insert("time", csv.time.as_str());
            params.insert("on_error", csv.on_error.as_str());
            params.insert("columns.x", csv.columns.x.as_str());
            params.insert("columns.y", csv.columns.y.as_str());
            params.insert("columns.numeric", csv.columns.numeric.join(","));
            params.insert("columns.textual", csv.columns.textual.join(","));
        }
        params
    }

    fn display_params(&self) -> Vec<(String, String)> {
        let mut out = vec![("dataLink".to_string(), self.data_link.clone())];
        if let Some(csv) = &self.csv_parameters {
            out.push(("separator".into(), csv.separator.escape_default().to_string()));
            out.push(("geometry".into(), csv.geometry.clone()));
            out.push(("columns.numeric".into(), csv.columns.numeric.join(", ")));
            out.push(("columns.textual".into(), csv.columns.textual.join(", ")));
        }
        out
    }
}
