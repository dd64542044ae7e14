//! # Sizing Dispatcher
//!
//! Runs a pack's sizing rules against facility data and produces a
//! [`SizingResult`]. The dispatcher is total: whatever the pack does, the
//! caller gets a result.
//!
//! ## Dispatch steps
//!
//! 1. No pack, or a pack without sizing capability: empty results and a
//!    single [`WARN_NO_SIZING`] warning.
//! 2. Normalize the raw context.
//! 3. [`try_compute`]: an `Err` returned by the pack *or* a panic inside
//!    it becomes a [`PackFailure`]. The failure is logged and replaced by
//!    the single generic [`WARN_PACK_FAILURE`]; its details never reach
//!    the result.
//! 4. Normalize recommendations, clamp warnings, make ids unique within
//!    the run (`x`, `x_2`, `x_3`, ...).
//! 5. Attach pack snapshot, timestamp and normalized inputs.
//!
//! The pack is invoked at most once per dispatch. There are no retries
//! and no partial results.

use std::collections::HashSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use serde::{Deserialize, Serialize};

use vistoria_core::{
    normalize_recommendation, normalize_warning, EngineLimits, RawContext, Recommendation,
    SizingContext, Timestamp,
};
use vistoria_pack::{parser, Pack, PackError, PackResult, PackSnapshot, SizingOutput, SizingRules};

/// Warning recorded when there is nothing able to size.
pub const WARN_NO_SIZING: &str =
    "Pacote não possui cálculo de dimensionamento. Dimensionamento indisponível.";
/// Warning recorded when the pack failed.
pub const WARN_PACK_FAILURE: &str = "Falha ao calcular dimensionamento (erro interno do pacote).";

// ---------------------------------------------------------------------------
// SizingResult
// ---------------------------------------------------------------------------

/// Output of one dispatch. Superseded, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingResult {
    pub pack: PackSnapshot,
    #[serde(rename = "computedAt")]
    pub computed_at: Timestamp,
    /// The normalized context the pack saw.
    pub inputs: SizingContext,
    pub results: Vec<Recommendation>,
    pub warnings: Vec<String>,
}

impl SizingResult {
    /// False when the report should show its "no recommendations" placeholder.
    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }
}

// ---------------------------------------------------------------------------
// PackFailure and the Result boundary
// ---------------------------------------------------------------------------

/// Why a pack's sizing rules produced no output.
#[derive(Debug)]
pub enum PackFailure {
    /// The rules returned an error.
    Error(PackError),
    /// The rules panicked; the payload message when it was a string.
    Panicked(String),
}

impl fmt::Display for PackFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(e) => write!(f, "pack error: {e}"),
            Self::Panicked(msg) => write!(f, "pack panicked: {msg}"),
        }
    }
}

impl std::error::Error for PackFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Error(e) => Some(e),
            Self::Panicked(_) => None,
        }
    }
}

/// Invoke sizing rules once, containing both errors and panics.
pub fn try_compute(
    rules: &dyn SizingRules,
    ctx: &SizingContext,
) -> Result<SizingOutput, PackFailure> {
    match panic::catch_unwind(AssertUnwindSafe(|| rules.compute(ctx))) {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(PackFailure::Error(e)),
        Err(payload) => Err(PackFailure::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

// ---------------------------------------------------------------------------
// SizingEngine
// ---------------------------------------------------------------------------

/// The dispatcher, configured with normalization limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizingEngine {
    limits: EngineLimits,
}

impl SizingEngine {
    pub fn new(limits: EngineLimits) -> Self {
        Self {
            limits: limits.sanitized(),
        }
    }

    /// Build an engine from a YAML or JSON limits file.
    pub fn from_config(path: &Path) -> PackResult<Self> {
        let limits: EngineLimits = parser::load_typed(path)?;
        Ok(Self::new(limits))
    }

    pub fn limits(&self) -> &EngineLimits {
        &self.limits
    }

    /// Dispatch sizing for `raw` against `pack`.
    pub fn run(&self, raw: &RawContext, pack: Option<&dyn Pack>) -> SizingResult {
        let inputs = SizingContext::normalize_with(raw, &self.limits);
        let snapshot = pack.map_or_else(PackSnapshot::unknown, |p| p.info().snapshot());

        let Some(rules) = pack.and_then(|p| p.sizing()) else {
            tracing::warn!(pack_id = %snapshot.id, "pack has no sizing capability");
            return self.finish(snapshot, inputs, Vec::new(), vec![WARN_NO_SIZING.to_string()]);
        };

        match try_compute(rules, &inputs) {
            Ok(output) => {
                let mut results: Vec<Recommendation> =
                    output.results.iter().map(normalize_recommendation).collect();
                make_ids_unique(&mut results);
                let warnings = output
                    .warnings
                    .iter()
                    .map(|w| normalize_warning(w, self.limits.warning))
                    .collect();
                self.finish(snapshot, inputs, results, warnings)
            }
            Err(failure) => {
                tracing::warn!(
                    pack_id = %snapshot.id,
                    reason = %failure,
                    "sizing failed inside pack"
                );
                self.finish(
                    snapshot,
                    inputs,
                    Vec::new(),
                    vec![WARN_PACK_FAILURE.to_string()],
                )
            }
        }
    }

    fn finish(
        &self,
        pack: PackSnapshot,
        inputs: SizingContext,
        results: Vec<Recommendation>,
        warnings: Vec<String>,
    ) -> SizingResult {
        tracing::debug!(
            pack_id = %pack.id,
            results = results.len(),
            warnings = warnings.len(),
            "sizing dispatched"
        );
        SizingResult {
            pack,
            computed_at: Timestamp::now(),
            inputs,
            results,
            warnings,
        }
    }
}

/// Dispatch with default limits.
pub fn run_sizing(raw: &RawContext, pack: Option<&dyn Pack>) -> SizingResult {
    SizingEngine::default().run(raw, pack)
}

/// Suffix repeated ids with `_2`, `_3`, ... so every id in the run is
/// distinct. First occurrences keep their id.
pub fn make_ids_unique(results: &mut [Recommendation]) {
    let mut seen: HashSet<String> = HashSet::with_capacity(results.len());
    for rec in results.iter_mut() {
        if seen.insert(rec.id.clone()) {
            continue;
        }
        let mut n = 2usize;
        let unique = loop {
            let candidate = format!("{}_{n}", rec.id);
            if !seen.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        seen.insert(unique.clone());
        rec.id = unique;
    }
}
