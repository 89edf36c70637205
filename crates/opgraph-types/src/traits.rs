//! The operator type capability set and the glue every concrete type shares.
//!
//! Concrete types implement [`TypeDescriptor`] (their tag, display name and
//! backend parameters); the blanket impl turns every descriptor into an
//! [`OperatorType`] usable behind `dyn`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use opgraph_core::params::Parameters;
use opgraph_core::{Operator, OperatorBuilder, ResultType};

use crate::error::{Result, TypeError};
use crate::icon;

/// Field overrides for [`OperatorType::clone_with_modifications`], keyed like
/// the type's dict.
pub type Modifications = Map<String, Value>;

/// Serialized operator type: the `operatorType` discriminant plus the
/// variant's own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorTypeDict {
    #[serde(rename = "operatorType")]
    pub operator_type: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl OperatorTypeDict {
    pub fn new(operator_type: impl Into<String>) -> Self {
        Self {
            operator_type: operator_type.into(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// Capabilities shared by every operator type.
pub trait OperatorType: fmt::Display + fmt::Debug + Send + Sync {
    /// Discriminant stored in `operatorType`.
    fn type_tag(&self) -> &'static str;

    /// Operator name the backend knows this type by.
    fn mapping_name(&self) -> &'static str;

    fn to_dict(&self) -> OperatorTypeDict;

    /// Parameters of the operator node built from this type.
    fn mapping_params(&self) -> Parameters;

    fn icon_url(&self) -> String;

    /// Human-readable `(name, value)` list.
    fn parameters_as_strings(&self) -> Vec<(String, String)>;

    /// Raw value of one dict field.
    fn parameter_value(&self, name: &str) -> Option<Value>;

    /// A new instance with `modifications` merged into this type's dict.
    /// The receiver is never changed.
    fn clone_with_modifications(
        &self,
        modifications: &Modifications,
    ) -> Result<Box<dyn OperatorType>>;
}

/// Static description of a concrete operator type. Its serde shape (camelCase
/// fields) is the dict shape minus `operatorType`.
pub trait TypeDescriptor:
    Serialize + DeserializeOwned + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    const TYPE: &'static str;
    const NAME: &'static str;

    /// Backend operator name; usually the tag itself.
    const MAPPING_NAME: &'static str = Self::TYPE;

    fn backend_params(&self) -> Parameters;

    fn display_params(&self) -> Vec<(String, String)>;

    /// Left inverse of `OperatorType::to_dict`.
    fn from_dict(dict: &OperatorTypeDict) -> Result<Self>
    where
        Self: Sized,
    {
        if dict.operator_type != Self::TYPE {
            return Err(TypeError::TagMismatch {
                expected: Self::TYPE,
                found: dict.operator_type.clone(),
            });
        }
        serde_json::from_value(Value::Object(dict.fields.clone())).map_err(|e| {
            TypeError::InvalidDict {
                tag: Self::TYPE.to_string(),
                reason: e.to_string(),
            }
        })
    }
}

impl<T: TypeDescriptor> OperatorType for T {
    fn type_tag(&self) -> &'static str {
        T::TYPE
    }

    fn mapping_name(&self) -> &'static str {
        T::MAPPING_NAME
    }

    fn to_dict(&self) -> OperatorTypeDict {
        let fields = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        OperatorTypeDict {
            operator_type: T::TYPE.to_string(),
            fields,
        }
    }

    fn mapping_params(&self) -> Parameters {
        self.backend_params()
    }

    fn icon_url(&self) -> String {
        icon::icon_url(T::TYPE)
    }

    fn parameters_as_strings(&self) -> Vec<(String, String)> {
        self.display_params()
    }

    fn parameter_value(&self, name: &str) -> Option<Value> {
        self.to_dict().fields.get(name).cloned()
    }

    fn clone_with_modifications(
        &self,
        modifications: &Modifications,
    ) -> Result<Box<dyn OperatorType>> {
        if modifications.contains_key("operatorType") {
            return Err(TypeError::ImmutableField("operatorType".into()));
        }
        let mut dict = self.to_dict();
        for (k, v) in modifications {
            dict.fields.insert(k.clone(), v.clone());
        }
        Ok(Box::new(T::from_dict(&dict)?))
    }
}

/// Builder for an operator node of type `ty`: backend name, display name and
/// parameters come from the type.
pub fn operator_for(
    ty: &dyn OperatorType,
    result_type: ResultType,
    projection: impl Into<String>,
) -> OperatorBuilder {
    Operator::builder(ty.mapping_name(), result_type, projection)
        .name(ty.to_string())
        .params(ty.mapping_params())
}

/// Parameters hold only strings and numbers; flags are sent as 1/0.
pub(crate) fn flag(value: bool) -> i64 {
    i64::from(value)
}
