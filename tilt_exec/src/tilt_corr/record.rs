//! Input samples and per sample correction records

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::InvalidInputError;
use crate::geom::{Heading, TiltOffset};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single position fix with the tilt of the sensor mount when it was taken.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Units: seconds
    pub time_s: f64,

    /// Position in the global frame.
    ///
    /// Units: millimeters
    pub x_mm: f64,

    /// Units: millimeters
    pub y_mm: f64,

    /// Tilt about the LF x' axis. Positive when the right side of the vehicle
    /// is lower than the left side.
    ///
    /// Units: degrees
    pub roll_deg: f64,

    /// Tilt about the LF y' axis. Positive when the front of the vehicle is
    /// lower than the rear.
    ///
    /// Units: degrees
    pub pitch_deg: f64,
}

/// The correction of one sample.
///
/// The sample and offset are fixed when the record is created, the heading
/// and corrected position may be rewritten by the backward re-estimation.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct CorrectionRecord {
    pub(crate) sample: Sample,
    pub(crate) heading: Option<Heading>,
    pub(crate) offset: TiltOffset,
    pub(crate) adj_mm: Vector2<f64>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The fields of a `Sample`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SampleField {
    Time,
    X,
    Y,
    Roll,
    Pitch,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Sample {
    pub fn new(time_s: f64, x_mm: f64, y_mm: f64, roll_deg: f64, pitch_deg: f64) -> Self {
        Self {
            time_s,
            x_mm,
            y_mm,
            roll_deg,
            pitch_deg,
        }
    }

    /// Position in the global frame.
    pub fn position(&self) -> Vector2<f64> {
        Vector2::new(self.x_mm, self.y_mm)
    }

    /// Check every field is a finite number.
    pub fn validate(&self, index: usize) -> Result<(), InvalidInputError> {
        let fields = [
            (SampleField::Time, self.time_s),
            (SampleField::X, self.x_mm),
            (SampleField::Y, self.y_mm),
            (SampleField::Roll, self.roll_deg),
            (SampleField::Pitch, self.pitch_deg),
        ];

        for (field, value) in fields.iter() {
            if !value.is_finite() {
                return Err(InvalidInputError::NonFinite {
                    index,
                    field: *field,
                    value: *value,
                });
            }
        }

        Ok(())
    }
}

impl CorrectionRecord {
    /// A record whose corrected position is the raw position.
    pub(crate) fn uncorrected(sample: Sample, offset: TiltOffset) -> Self {
        Self {
            sample,
            heading: None,
            offset,
            adj_mm: sample.position(),
        }
    }

    /// A record corrected with the given heading.
    pub(crate) fn corrected(sample: Sample, heading: Heading, offset: TiltOffset) -> Self {
        Self {
            sample,
            heading: Some(heading),
            offset,
            adj_mm: offset.apply(&sample.position(), &heading),
        }
    }

    /// Rewrite the heading and recompute the corrected position from it.
    pub(crate) fn set_heading(&mut self, heading: Heading) {
        self.heading = Some(heading);
        self.adj_mm = self.offset.apply(&self.sample.position(), &heading);
    }

    /// The raw sample this record corrects.
    pub fn sample(&self) -> &Sample {
        &self.sample
    }

    /// The local frame heading at this sample, `None` only until a second
    /// sample has been processed.
    pub fn heading(&self) -> Option<Heading> {
        self.heading
    }

    pub fn offset(&self) -> TiltOffset {
        self.offset
    }

    /// The tilt corrected position in the global frame.
    pub fn adj_position(&self) -> Vector2<f64> {
        self.adj_mm
    }

    pub fn adj_x(&self) -> f64 {
        self.adj_mm.x
    }

    pub fn adj_y(&self) -> f64 {
        self.adj_mm.y
    }
}

impl SampleField {
    /// The column name of the field in sample files.
    pub fn column(&self) -> &'static str {
        match self {
            SampleField::Time => "time_s",
            SampleField::X => "x_mm",
            SampleField::Y => "y_mm",
            SampleField::Roll => "roll_deg",
            SampleField::Pitch => "pitch_deg",
        }
    }
}

impl fmt::Display for SampleField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.column())
    }
}
