//! Tag-to-deserializer lookup for operator type dicts.

use std::collections::HashMap;

use crate::error::{Result, TypeError};
use crate::kinds::*;
use crate::traits::{OperatorType, OperatorTypeDict, TypeDescriptor};

type Decoder = fn(&OperatorTypeDict) -> Result<Box<dyn OperatorType>>;

fn decode<T: TypeDescriptor>(dict: &OperatorTypeDict) -> Result<Box<dyn OperatorType>> {
    Ok(Box::new(T::from_dict(dict)?))
}

/// Maps `operatorType` tags to the constructor for that type.
#[derive(Default)]
pub struct TypeRegistry {
    decoders: HashMap<&'static str, Decoder>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry knowing every built-in type.
    pub fn with_defaults() -> Self {
        let mut reg = Self::new();
        reg.register::<PangaeaSourceType>();
        reg.register::<ProjectionType>();
        reg.register::<GdalSourceType>();
        reg.register::<RasterSourceType>();
        reg.register::<NumericAttributeFilterType>();
        reg.register::<PointInPolygonFilterType>();
        reg.register::<WktSourceType>();
        reg
    }

    /// Register `T`; a later registration for the same tag wins.
    pub fn register<T: TypeDescriptor>(&mut self) -> &mut Self {
        self.decoders.insert(T::TYPE, decode::<T>);
        self
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.decoders.contains_key(tag)
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.decoders.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    pub fn from_dict(&self, dict: &OperatorTypeDict) -> Result<Box<dyn OperatorType>> {
        let decoder = self
            .decoders
            .get(dict.operator_type.as_str())
            .ok_or_else(|| TypeError::UnknownType(dict.operator_type.clone()))?;
        #[cfg(feature = "tracing")]
        tracing::trace!(tag = %dict.operator_type, "decoding operator type");
        decoder(dict)
    }

    pub fn from_json(&self, json: &str) -> Result<Box<dyn OperatorType>> {
        let dict: OperatorTypeDict = serde_json::from_str(json)?;
        self.from_dict(&dict)
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}
