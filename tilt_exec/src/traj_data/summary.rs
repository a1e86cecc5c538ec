//! Summary of a corrected trajectory

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;
use util::maths::{mean, norm};

use crate::tilt_corr::{CorrectionRecord, InvalidInputError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Statistics over every record of a corrected trajectory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajSummary {
    pub num_samples: usize,

    /// Units: seconds
    pub duration_s: f64,

    /// Mean time between consecutive samples, `None` for a single sample.
    ///
    /// Units: seconds
    pub mean_period_s: Option<f64>,

    /// Units: seconds
    pub max_period_s: Option<f64>,

    /// Units: degrees
    pub mean_roll_deg: f64,

    /// Units: degrees
    pub mean_pitch_deg: f64,

    /// Mean distance between the raw and corrected positions.
    ///
    /// Units: millimeters
    pub mean_correction_mm: f64,

    /// Units: millimeters
    pub max_correction_mm: f64,

    /// Number of consecutive sample pairs sharing the same roll.
    pub num_same_roll_pairs: usize,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrajSummary {
    pub fn from_records(records: &[CorrectionRecord]) -> Result<Self, InvalidInputError> {
        let (first, last) = match (records.first(), records.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return Err(InvalidInputError::EmptySequence),
        };

        let periods: Vec<f64> = records
            .windows(2)
            .map(|w| w[1].sample().time_s - w[0].sample().time_s)
            .collect();

        let rolls: Vec<f64> = records.iter().map(|r| r.sample().roll_deg).collect();
        let pitches: Vec<f64> = records.iter().map(|r| r.sample().pitch_deg).collect();

        let corrections: Vec<f64> = records
            .iter()
            .map(|r| {
                norm(r.sample().position().as_slice(), r.adj_position().as_slice())
                    .unwrap_or(0.0)
            })
            .collect();

        let num_same_roll_pairs = rolls.windows(2).filter(|w| w[0] == w[1]).count();

        Ok(Self {
            num_samples: records.len(),
            duration_s: last.sample().time_s - first.sample().time_s,
            mean_period_s: mean(&periods),
            max_period_s: periods.iter().cloned().fold(None, max_opt),
            mean_roll_deg: mean(&rolls).unwrap_or(0.0),
            mean_pitch_deg: mean(&pitches).unwrap_or(0.0),
            mean_correction_mm: mean(&corrections).unwrap_or(0.0),
            max_correction_mm: corrections.iter().cloned().fold(0.0, f64::max),
            num_same_roll_pairs,
        })
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn max_opt(acc: Option<f64>, value: f64) -> Option<f64> {
    match acc {
        Some(a) => Some(a.max(value)),
        None => Some(value),
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
