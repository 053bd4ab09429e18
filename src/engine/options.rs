use crate::error::VisionError;
use serde::{Deserialize, Serialize};

/// Tunables of a [`VisionSession`](super::VisionSession).
///
/// Missing fields fall back to their defaults when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Sides of the polygon approximating a vision-range disc.
    pub circle_segments: usize,
    /// Closeness tolerance for degenerate segments and boundary tests.
    pub epsilon: f64,
    /// Coordinates are rounded to `1 / digest_precision` before digesting.
    pub digest_precision: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            circle_segments: 64,
            epsilon: 1e-6,
            digest_precision: 1000.0,
        }
    }
}

impl EngineOptions {
    /// Parses options from JSON.
    pub fn from_json(json: &str) -> Result<Self, VisionError> {
        Ok(serde_json::from_str(json)?)
    }
}
