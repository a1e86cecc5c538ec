//! # Tilt correction module
//!
//! Corrects a complete, already collected trajectory for the tilt of the
//! position sensor's mount. Each sample's offset is rotated into the
//! vehicle's local frame, and the first time two consecutive samples share
//! the same roll the headings and positions of all previous samples are
//! re-estimated.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod recalc;
mod record;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use record::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Malformed input detected before or during correction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidInputError {
    #[error("Sample {index}: field `{field}` is not finite (found {value})")]
    NonFinite {
        index: usize,
        field: SampleField,
        value: f64,
    },

    #[error("Sample {index}: field `{field}` is missing or is not a number")]
    Missing { index: usize, field: SampleField },

    #[error("Cannot provide headings for an empty sequence")]
    EmptySequence,

    #[error("Record {index} has no heading, a heading needs at least two samples")]
    MissingHeading { index: usize },
}

/// Possible errors that can occur during TiltCorr operation.
#[derive(Debug, thiserror::Error)]
pub enum TiltCorrError {
    #[error("Invalid tilt correction parameters: {0}")]
    InvalidParams(#[from] ParamsError),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}
