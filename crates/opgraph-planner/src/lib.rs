#![forbid(unsafe_code)]
//! opgraph-planner: YAML graph documents → `Operator` trees, plus the
//! rewrites applied on the way (source alignment, root reprojection).
//!
//! The document names operators by their backend type and parameters; it
//! does not go through `opgraph-types`.

pub mod dsl;
pub mod error;
pub mod rules;

pub use dsl::yaml::{build_graph, parse_yaml_graph, DocumentConfig, NodeSpec, ParsedGraph};
pub use error::{PlanError, Result};
