//! # Normalization Limits
//!
//! Text caps applied by the context normalizer and the dispatcher. The
//! defaults match the stored records of the offline client; deployments
//! may override them from the engine configuration file.

use serde::{Deserialize, Serialize};

/// Default cap for short single-line fields (occupation, hours, public).
pub const DEFAULT_SHORT_TEXT: usize = 120;
/// Default cap for free-text fields (notes, address).
pub const DEFAULT_LONG_TEXT: usize = 2000;
/// Default cap for each sizing warning.
pub const DEFAULT_WARNING_TEXT: usize = 400;

/// Character caps used during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineLimits {
    /// Cap for short text fields.
    pub short_text: usize,
    /// Cap for long free-text fields.
    pub long_text: usize,
    /// Cap for each warning string.
    pub warning: usize,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            short_text: DEFAULT_SHORT_TEXT,
            long_text: DEFAULT_LONG_TEXT,
            warning: DEFAULT_WARNING_TEXT,
        }
    }
}

impl EngineLimits {
    /// Return a copy where every cap is at least 1.
    ///
    /// A zero cap would reduce every non-empty field to a bare ellipsis.
    pub fn sanitized(self) -> Self {
        Self {
            short_text: at_least_one("short_text", self.short_text),
            long_text: at_least_one("long_text", self.long_text),
            warning: at_least_one("warning", self.warning),
        }
    }
}

fn at_least_one(field: &'static str, value: usize) -> usize {
    if value == 0 {
        tracing::warn!(field, "EngineLimits: zero cap, clamping to 1");
        1
    } else {
        value
    }
}
