//! The kinds of data an operator can produce.
//!
//! A result type doubles as the discriminant of the four typed input ports.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResultType {
    #[serde(rename = "RASTER", alias = "raster", alias = "Raster")]
    Raster,
    #[serde(rename = "POINTS", alias = "points", alias = "Points")]
    Points,
    #[serde(rename = "LINES", alias = "lines", alias = "Lines")]
    Lines,
    #[serde(rename = "POLYGONS", alias = "polygons", alias = "Polygons")]
    Polygons,
    /// Never accepted as an input.
    #[serde(rename = "PLOT", alias = "plot", alias = "Plot")]
    Plot,
}

impl ResultType {
    /// Input ports, in serialization order.
    pub const PORTS: [ResultType; 4] = [
        ResultType::Raster,
        ResultType::Points,
        ResultType::Lines,
        ResultType::Polygons,
    ];

    /// Enum member name as used on the wire (`"RASTER"`, `"POINTS"`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            ResultType::Raster => "RASTER",
            ResultType::Points => "POINTS",
            ResultType::Lines => "LINES",
            ResultType::Polygons => "POLYGONS",
            ResultType::Plot => "PLOT",
        }
    }

    /// Name of the port that accepts this type.
    pub fn port_name(self) -> Result<&'static str, Error> {
        match self {
            ResultType::Raster => Ok("raster"),
            ResultType::Points => Ok("point"),
            ResultType::Lines => Ok("line"),
            ResultType::Polygons => Ok("polygon"),
            ResultType::Plot => Err(Error::InvalidResultType(self.name().to_string())),
        }
    }

    pub const fn is_port(self) -> bool {
        !matches!(self, ResultType::Plot)
    }

    pub const fn is_vector(self) -> bool {
        matches!(
            self,
            ResultType::Points | ResultType::Lines | ResultType::Polygons
        )
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResultType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RASTER" => Ok(ResultType::Raster),
            "POINTS" => Ok(ResultType::Points),
            "LINES" => Ok(ResultType::Lines),
            "POLYGONS" => Ok(ResultType::Polygons),
            "PLOT" => Ok(ResultType::Plot),
            _ => Err(Error::InvalidResultType(s.to_string())),
        }
    }
}
