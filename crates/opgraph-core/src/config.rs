//! Graph-construction configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// First id handed out by a context-owned sequence. The process-wide
    /// sequence is used when this is left at 1.
    pub initial_operator_id: u64,

    /// Projection assumed for operators that do not name one.
    pub default_projection: String,

    /// When set, `GraphContext::project` skips the wrapper for operators that
    /// already produce the target projection.
    pub collapse_identity_projection: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            initial_operator_id: 1,
            default_projection: "EPSG:4326".to_string(),
            collapse_identity_projection: false,
        }
    }
}

impl GraphConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `OPGRAPH_INITIAL_OPERATOR_ID`: first operator id (u64, >= 1)
    /// - `OPGRAPH_DEFAULT_PROJECTION`: e.g. `EPSG:3857`
    /// - `OPGRAPH_COLLAPSE_IDENTITY_PROJECTION`: `true`/`false`/`1`/`0`
    ///
    /// Unparsable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(s) = lookup("OPGRAPH_INITIAL_OPERATOR_ID") {
            if let Ok(v) = s.trim().parse::<u64>() {
                cfg.initial_operator_id = v;
            }
        }

        if let Some(s) = lookup("OPGRAPH_DEFAULT_PROJECTION") {
            if !s.trim().is_empty() {
                cfg.default_projection = s.trim().to_string();
            }
        }

        if let Some(s) = lookup("OPGRAPH_COLLAPSE_IDENTITY_PROJECTION") {
            match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => cfg.collapse_identity_projection = true,
                "0" | "false" | "no" => cfg.collapse_identity_projection = false,
                _ => {}
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<()> {
        if self.initial_operator_id == 0 {
            return Err(Error::Config("initial_operator_id must be >= 1".into()));
        }
        if self.default_projection.trim().is_empty() {
            return Err(Error::Config("default_projection must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides_defaults() {
        let cfg = GraphConfig::from_lookup(lookup(&[
            ("OPGRAPH_INITIAL_OPERATOR_ID", "100"),
            ("OPGRAPH_DEFAULT_PROJECTION", "EPSG:3857"),
            ("OPGRAPH_COLLAPSE_IDENTITY_PROJECTION", "yes"),
        ]));
        assert_eq!(cfg.initial_operator_id, 100);
        assert_eq!(cfg.default_projection, "EPSG:3857");
        assert!(cfg.collapse_identity_projection);
    }

    #[test]
    fn test_garbage_is_ignored() {
        let cfg = GraphConfig::from_lookup(lookup(&[
            ("OPGRAPH_INITIAL_OPERATOR_ID", "many"),
            ("OPGRAPH_COLLAPSE_IDENTITY_PROJECTION", "maybe"),
        ]));
        assert_eq!(cfg, GraphConfig::default());
    }

    #[test]
    fn test_zero_start_is_invalid() {
        let cfg = GraphConfig {
            initial_operator_id: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));
    }
}
