//! JSON-level sizing rules.
//!
//! [`JsonRules`] adapts a closure that sees the normalized context as JSON
//! and returns arbitrary JSON. It is how manifest-defined packs and
//! embedders without Rust types plug sizing in, and it is where malformed
//! output gets caught: a non-object result becomes
//! [`PackError::MalformedOutput`](crate::error::PackError::MalformedOutput).

use std::fmt;

use serde_json::Value;

use vistoria_core::SizingContext;

use crate::error::PackResult;
use crate::pack::{SizingOutput, SizingRules};

type RulesFn = dyn Fn(&Value) -> PackResult<Value> + Send + Sync;

pub struct JsonRules {
    pack_id: String,
    rules: Box<RulesFn>,
}

impl JsonRules {
    /// Wrap a closure. `pack_id` labels errors.
    pub fn new<F>(pack_id: impl Into<String>, rules: F) -> Self
    where
        F: Fn(&Value) -> PackResult<Value> + Send + Sync + 'static,
    {
        Self {
            pack_id: pack_id.into(),
            rules: Box::new(rules),
        }
    }

    /// Rules that always return the same document.
    pub fn constant(pack_id: impl Into<String>, output: Value) -> Self {
        Self::new(pack_id, move |_| Ok(output.clone()))
    }
}

impl fmt::Debug for JsonRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonRules")
            .field("pack_id", &self.pack_id)
            .finish_non_exhaustive()
    }
}

impl SizingRules for JsonRules {
    fn compute(&self, ctx: &SizingContext) -> PackResult<SizingOutput> {
        let input = serde_json::to_value(ctx)?;
        let output = (self.rules)(&input)?;
        SizingOutput::from_value(&self.pack_id, output)
    }
}
