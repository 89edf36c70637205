#![forbid(unsafe_code)]
//! opgraph-types: the operator types that parameterize graph nodes.
//!
//! Every type has a stable `operatorType` tag, a dict form that round-trips
//! through [`TypeRegistry`], and the parameters of the node it produces
//! (see [`operator_for`]).

pub mod error;
pub mod icon;
pub mod kinds;
pub mod registry;
pub mod traits;

pub use error::{Result, TypeError};
pub use kinds::*;
pub use registry::TypeRegistry;
pub use traits::{operator_for, Modifications, OperatorType, OperatorTypeDict, TypeDescriptor};
