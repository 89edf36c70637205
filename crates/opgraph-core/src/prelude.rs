//! Convenient re-exports for downstream crates.

pub use crate::config::GraphConfig;
pub use crate::context::GraphContext;
pub use crate::dict::{OperatorDict, QueryDict, QuerySources};
pub use crate::error::{Error, Result};
pub use crate::hash::ContentHash;
pub use crate::id::{AtomicIdSequence, GlobalIdSequence, IdSequence, OperatorId};
pub use crate::operator::{Operator, OperatorBuilder};
pub use crate::params::{ParamValue, Parameters};
pub use crate::result_type::ResultType;
pub use crate::schema::{AttributeSchema, DataType, Interpolation, Unit};
pub use crate::workflow::{Workflow, WorkflowType};
