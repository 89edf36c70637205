//! Concrete operator types.

pub mod attribute_filter;
pub mod gdal_source;
pub mod pangaea;
pub mod point_in_polygon;
pub mod projection;
pub mod raster_source;
pub mod wkt_source;

pub use attribute_filter::NumericAttributeFilterType;
pub use gdal_source::{ChannelConfig, GdalSourceType};
pub use pangaea::{CsvColumns, CsvParameters, PangaeaSourceType};
pub use point_in_polygon::PointInPolygonFilterType;
pub use projection::ProjectionType;
pub use raster_source::RasterSourceType;
pub use wkt_source::WktSourceType;
