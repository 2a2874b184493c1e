use serde::{Deserialize, Serialize};

use crate::error::ObjectError;

/// Default cap on lineage depth for an `ObjectSpace`.
pub const MAX_LINEAGE_DEPTH: usize = 1024;

/// Settings for an [`ObjectSpace`](crate::space::ObjectSpace).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpaceConfig {
    /// Correlates every event emitted by the space.
    pub trace_id: String,
    /// Deepest lineage `extend` may produce; the root is depth 0.
    pub max_lineage_depth: usize,
    /// When false, operations run but no events are buffered.
    pub record_events: bool,
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            trace_id: "selfish".to_string(),
            max_lineage_depth: MAX_LINEAGE_DEPTH,
            record_events: true,
        }
    }
}

impl SpaceConfig {
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self
    }

    pub fn with_max_lineage_depth(mut self, max_lineage_depth: usize) -> Self {
        self.max_lineage_depth = max_lineage_depth;
        self
    }

    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(input: &str) -> Result<Self, ObjectError> {
        let config: Self =
            serde_json::from_str(input).map_err(|e| ObjectError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ObjectError> {
        if self.trace_id.trim().is_empty() {
            return Err(ObjectError::Config("trace_id must not be empty".to_string()));
        }
        if self.max_lineage_depth == 0 {
            return Err(ObjectError::Config(
                "max_lineage_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
