//! Export of corrected records

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use util::archive::{ArchiveError, Archiver};

use crate::tilt_corr::{CorrectionRecord, InvalidInputError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Flat form of a `CorrectionRecord`, one row of a corrected trajectory file.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionRow {
    pub time_s: f64,
    pub x_mm: f64,
    pub y_mm: f64,
    pub roll_deg: f64,
    pub pitch_deg: f64,
    pub alpha_x_rad: Option<f64>,
    pub alpha_y_rad: Option<f64>,
    pub shift_x_mm: f64,
    pub shift_y_mm: f64,
    pub adj_x: f64,
    pub adj_y: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl From<&CorrectionRecord> for CorrectionRow {
    fn from(record: &CorrectionRecord) -> Self {
        let sample = record.sample();
        let heading = record.heading();
        let offset = record.offset();

        Self {
            time_s: sample.time_s,
            x_mm: sample.x_mm,
            y_mm: sample.y_mm,
            roll_deg: sample.roll_deg,
            pitch_deg: sample.pitch_deg,
            alpha_x_rad: heading.map(|h| h.alpha_x_rad),
            alpha_y_rad: heading.map(|h| h.alpha_y_rad),
            shift_x_mm: offset.shift_x_mm,
            shift_y_mm: offset.shift_y_mm,
            adj_x: record.adj_x(),
            adj_y: record.adj_y(),
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Write every record as a row of the archive, returning the number written.
pub fn write_records(
    archiver: &mut Archiver,
    records: &[CorrectionRecord],
) -> Result<usize, ArchiveError> {
    archiver.serialise_all(records.iter().map(CorrectionRow::from))
}

/// The angle of the LF x' axis at each record.
pub fn extract_headings(records: &[CorrectionRecord]) -> Result<Vec<f64>, InvalidInputError> {
    if records.is_empty() {
        return Err(InvalidInputError::EmptySequence);
    }

    records
        .iter()
        .enumerate()
        .map(|(index, r)| {
            r.heading()
                .map(|h| h.alpha_x_rad)
                .ok_or(InvalidInputError::MissingHeading { index })
        })
        .collect()
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
