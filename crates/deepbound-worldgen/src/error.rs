//! Error and diagnostic types.

use deepbound_content::ResourceId;
use thiserror::Error;

use crate::spline::SplineError;

/// Reasons a definition is rejected at catalog construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// A definition of the same kind already uses this code.
    #[error("duplicate {kind} code: {code}")]
    DuplicateCode { kind: &'static str, code: String },
    /// Selection weights must be finite and non-negative.
    #[error("{kind} '{code}' has invalid weight {weight}")]
    InvalidWeight {
        kind: &'static str,
        code: String,
        weight: f64,
    },
    /// More thresholds than amplitudes were supplied.
    #[error("'{code}' has {thresholds} thresholds for {amplitudes} amplitudes")]
    ThresholdsExceedAmplitudes {
        code: String,
        thresholds: usize,
        amplitudes: usize,
    },
    /// A noise parameter or thickness budget is negative or not finite.
    #[error("'{code}' has an invalid value for {field}")]
    InvalidValue { code: String, field: &'static str },
    /// A soil thickness range has `min > max`.
    #[error("soil layer '{code}' has thickness range {min}..={max}")]
    InvalidThickness { code: String, min: u32, max: u32 },
    /// The id space of this kind is exhausted.
    #[error("too many {kind} definitions (max 65536)")]
    TooManyEntries { kind: &'static str },
    #[error(transparent)]
    Spline(#[from] SplineError),
}

/// A problem recovered from while setting up or running generation.
///
/// None of these stop generation; they are recorded and logged so the
/// content author can see why the world looks wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationIssue {
    /// A definition collection generation relies on is empty.
    #[error("no {0} definitions configured")]
    MissingConfiguration(&'static str),
    /// A configured tile code is not in the tile catalog.
    #[error("unresolved tile reference {0}, using the fallback tile")]
    UnresolvedTileReference(ResourceId),
}
