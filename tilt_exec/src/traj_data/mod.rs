//! # Trajectory data
//!
//! Loading of raw samples from CSV files, export of the corrected records
//! and summaries of a corrected trajectory.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod export;
mod load;
mod summary;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::path::PathBuf;

use crate::tilt_corr::InvalidInputError;

pub use export::*;
pub use load::*;
pub use summary::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while loading a sample file.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("Cannot open the sample file {0:?}: {1}")]
    FileOpenError(PathBuf, std::io::Error),

    #[error("Cannot parse the sample file: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid sample: {0}")]
    InvalidInput(#[from] InvalidInputError),
}
