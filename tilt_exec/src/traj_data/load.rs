//! Sample file loading

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::DataLoadError;
use crate::tilt_corr::{InvalidInputError, Sample, SampleField};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A row of a sample file, any cell of which may be missing or malformed.
#[derive(Debug, Deserialize)]
struct SampleRow {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    time_s: Option<f64>,

    #[serde(default, deserialize_with = "csv::invalid_option")]
    x_mm: Option<f64>,

    #[serde(default, deserialize_with = "csv::invalid_option")]
    y_mm: Option<f64>,

    #[serde(default, deserialize_with = "csv::invalid_option")]
    roll_deg: Option<f64>,

    #[serde(default, deserialize_with = "csv::invalid_option")]
    pitch_deg: Option<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SampleRow {
    fn into_sample(self, index: usize) -> Result<Sample, InvalidInputError> {
        let require = |value: Option<f64>, field: SampleField| {
            value.ok_or(InvalidInputError::Missing { index, field })
        };

        let sample = Sample {
            time_s: require(self.time_s, SampleField::Time)?,
            x_mm: require(self.x_mm, SampleField::X)?,
            y_mm: require(self.y_mm, SampleField::Y)?,
            roll_deg: require(self.roll_deg, SampleField::Roll)?,
            pitch_deg: require(self.pitch_deg, SampleField::Pitch)?,
        };

        sample.validate(index)?;

        Ok(sample)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Load the samples from a CSV file.
///
/// The file must have a header row naming the `time_s`, `x_mm`, `y_mm`,
/// `roll_deg` and `pitch_deg` columns. Other columns are ignored.
pub fn load_samples<P: AsRef<Path>>(path: P) -> Result<Vec<Sample>, DataLoadError> {
    let file = File::open(path.as_ref())
        .map_err(|e| DataLoadError::FileOpenError(path.as_ref().to_path_buf(), e))?;

    let samples = read_samples(file)?;

    debug!("Loaded {} samples from {:?}", samples.len(), path.as_ref());

    Ok(samples)
}

/// Read samples from any CSV source.
///
/// The index of a sample is its row number, not counting the header.
pub fn read_samples<R: Read>(reader: R) -> Result<Vec<Sample>, DataLoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut samples = Vec::new();

    for (index, row) in csv_reader.deserialize::<SampleRow>().enumerate() {
        samples.push(row?.into_sample(index)?);
    }

    Ok(samples)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_read_samples() {
        let data = "\
time_s,x_mm,y_mm,roll_deg,pitch_deg,timedelta
0.0,0.0,0.0,1.5,-0.5,
0.1, 120.5 ,3.0,1.5,0.0,0.1
";
        let samples = read_samples(data.as_bytes()).unwrap();

        assert_eq!(
            samples,
            vec![
                Sample::new(0.0, 0.0, 0.0, 1.5, -0.5),
                Sample::new(0.1, 120.5, 3.0, 1.5, 0.0),
            ]
        );
    }

    #[test]
    fn test_column_order_is_free() {
        let data = "pitch_deg,roll_deg,y_mm,x_mm,time_s\n1,2,3,4,5\n";
        let samples = read_samples(data.as_bytes()).unwrap();

        assert_eq!(samples, vec![Sample::new(5.0, 4.0, 3.0, 2.0, 1.0)]);
    }

    #[test]
    fn test_malformed_cells() {
        let data = "time_s,x_mm,y_mm,roll_deg,pitch_deg\n0,0,0,0,0\n1,10,abc,0,0\n";
        match read_samples(data.as_bytes()) {
            Err(DataLoadError::InvalidInput(InvalidInputError::Missing { index, field })) => {
                assert_eq!(index, 1);
                assert_eq!(field, SampleField::Y);
            }
            r => panic!("Expected a missing field error, got {:?}", r),
        }

        let data = "time_s,x_mm,y_mm,roll_deg,pitch_deg\n0,0,0,,0\n";
        assert!(matches!(
            read_samples(data.as_bytes()),
            Err(DataLoadError::InvalidInput(InvalidInputError::Missing {
                index: 0,
                field: SampleField::Roll
            }))
        ));

        // Short rows are missing their last fields
        let data = "time_s,x_mm,y_mm,roll_deg,pitch_deg\n0,0,0,0,0\n1,1,1,1\n";
        assert!(matches!(
            read_samples(data.as_bytes()),
            Err(DataLoadError::InvalidInput(InvalidInputError::Missing {
                index: 1,
                field: SampleField::Pitch
            }))
        ));
    }

    #[test]
    fn test_missing_column() {
        let data = "time_s,x_mm,y_mm,roll_deg\n0,0,0,0\n";
        assert!(matches!(
            read_samples(data.as_bytes()),
            Err(DataLoadError::InvalidInput(InvalidInputError::Missing {
                index: 0,
                field: SampleField::Pitch
            }))
        ));
    }

    #[test]
    fn test_non_finite_cells() {
        let data = "time_s,x_mm,y_mm,roll_deg,pitch_deg\n0,NaN,0,0,0\n";
        assert!(matches!(
            read_samples(data.as_bytes()),
            Err(DataLoadError::InvalidInput(InvalidInputError::NonFinite {
                index: 0,
                field: SampleField::X,
                ..
            }))
        ));
    }

    #[test]
    fn test_load_samples_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.csv");
        std::fs::write(&path, "time_s,x_mm,y_mm,roll_deg,pitch_deg\n0,1,2,3,4\n").unwrap();

        let samples = load_samples(&path).unwrap();
        assert_eq!(samples, vec![Sample::new(0.0, 1.0, 2.0, 3.0, 4.0)]);

        assert!(matches!(
            load_samples(dir.path().join("missing.csv")),
            Err(DataLoadError::FileOpenError(_, _))
        ));
        assert!(read_samples("".as_bytes()).unwrap().is_empty());
    }
}
