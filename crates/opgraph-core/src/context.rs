//! A graph-construction context: an id sequence plus configuration.

use std::fmt;
use std::sync::Arc;

use crate::config::GraphConfig;
use crate::error::Result;
use crate::id::{AtomicIdSequence, GlobalIdSequence, IdSequence};
use crate::operator::{Operator, OperatorBuilder};

#[derive(Clone)]
pub struct GraphContext {
    ids: Arc<dyn IdSequence>,
    config: GraphConfig,
}

impl GraphContext {
    /// Context on the process-wide id sequence with default configuration.
    pub fn new() -> Self {
        Self {
            ids: Arc::new(GlobalIdSequence),
            config: GraphConfig::default(),
        }
    }

    /// Context drawing ids from `ids`.
    pub fn with_sequence(ids: Arc<dyn IdSequence>, config: GraphConfig) -> Self {
        Self { ids, config }
    }

    /// Context for `config`. A non-default `initial_operator_id` gets its own
    /// sequence starting there; otherwise the process-wide sequence is shared.
    pub fn from_config(config: GraphConfig) -> Result<Self> {
        config.validate()?;
        let ids: Arc<dyn IdSequence> = if config.initial_operator_id == 1 {
            Arc::new(GlobalIdSequence)
        } else {
            Arc::new(AtomicIdSequence::starting_at(config.initial_operator_id))
        };
        Ok(Self { ids, config })
    }

    /// Context with a fresh private sequence starting at 1.
    pub fn isolated() -> Self {
        Self::with_sequence(Arc::new(AtomicIdSequence::new()), GraphConfig::default())
    }

    pub fn ids(&self) -> &dyn IdSequence {
        self.ids.as_ref()
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn build(&self, builder: OperatorBuilder) -> Result<Operator> {
        builder.build(self.ids())
    }

    /// Reproject `op` to `projection`, honoring `collapse_identity_projection`.
    pub fn project(&self, op: &Operator, projection: &str) -> Result<Operator> {
        if self.config.collapse_identity_projection {
            op.ensure_projection(projection, self.ids())
        } else {
            op.projected(projection, self.ids())
        }
    }
}

impl Default for GraphContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GraphContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphContext")
            .field("next_id", &self.ids.peek())
            .field("config", &self.config)
            .finish()
    }
}
