//! Registration body pairing a result category with a serialized operator tree.

use serde::{Deserialize, Serialize};

use crate::dict::QueryDict;
use crate::error::Result;
use crate::hash::{content_hash_of, ContentHash};
use crate::operator::Operator;
use crate::result_type::ResultType;

/// Coarse output category the backend registers a workflow under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkflowType {
    Vector,
    Raster,
    Plot,
}

impl From<ResultType> for WorkflowType {
    fn from(rt: ResultType) -> Self {
        match rt {
            ResultType::Raster => WorkflowType::Raster,
            ResultType::Points | ResultType::Lines | ResultType::Polygons => WorkflowType::Vector,
            ResultType::Plot => WorkflowType::Plot,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(rename = "type")]
    pub workflow_type: WorkflowType,
    pub operator: QueryDict,
}

impl Workflow {
    pub fn from_operator(operator: &Operator) -> Self {
        Self {
            workflow_type: operator.result_type().into(),
            operator: operator.to_dict(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Identifies the workflow by content; equal trees hash equally
    /// regardless of operator ids.
    pub fn content_hash(&self) -> Result<ContentHash> {
        content_hash_of(self)
    }
}
