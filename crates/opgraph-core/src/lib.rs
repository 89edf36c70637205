#![forbid(unsafe_code)]
//! opgraph-core: typed operator graphs for a geoprocessing backend.
//!
//! - `Operator` nodes with four typed input ports (raster/points/lines/polygons)
//! - id allocation through an injectable `IdSequence`
//! - projection rewriting (`Operator::projected`)
//! - an output attribute schema per operator (`AttributeSchema`)
//! - the backend query dict/JSON, a lossless persistent dict and `Workflow`s
//!
//! No I/O happens here.

pub mod config;
pub mod context;
pub mod dict;
pub mod error;
pub mod hash;
pub mod id;
pub mod operator;
pub mod params;
pub mod prelude;
pub mod result_type;
pub mod schema;
pub mod workflow;

pub use context::GraphContext;
pub use error::{Error, Result};
pub use operator::{Operator, OperatorBuilder};
pub use result_type::ResultType;

/// Crate version, stamped into diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
