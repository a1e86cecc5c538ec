//! Implementations for the TiltCorr state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace, warn};
use nalgebra::Vector2;
use serde::Serialize;

// Internal
use super::{
    CorrectionRecord, InvalidInputError,
    Params, ParamsError, Sample, TiltCorrError};
use crate::geom::{apply_offset, backroll_offset, heading_between, tilt_offset, Heading};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Tilt correction module state
///
/// One instance corrects one trajectory. Independent trajectories can be
/// corrected on separate instances concurrently.
#[derive(Debug, Clone)]
pub struct TiltCorr {
    pub(crate) params: Params,

    /// One record per processed sample, in sample order.
    pub(crate) records: Vec<CorrectionRecord>,

    /// True until the first pair of consecutive samples with the same roll
    /// has been processed.
    awaiting_repeat: bool,
}

/// Report on the processing of a single sample.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct StepReport {
    /// Index of the processed sample.
    pub index: usize,

    /// The policy used to process the sample.
    pub kind: StepKind,

    /// Number of earlier records whose heading and position were rewritten.
    pub num_recalculated: usize,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// How a sample is processed, based on its index and the samples before it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum StepKind {
    /// First sample, offset only as there is no heading yet.
    Initial,

    /// Second sample, the heading between the two samples is also given to
    /// the first one.
    Backfill,

    /// First sample with the same roll as the previous one. The heading comes
    /// directly from the two raw positions, since neither is tilted relative
    /// to the other, and the previous records are re-estimated from it.
    FirstRepeat,

    /// Any other sample. The previous corrected position is rolled back to
    /// this sample's roll before the heading is computed.
    Unroll,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TiltCorr {
    /// Create a new tilt corrector with no processed samples.
    pub fn new(params: Params) -> Result<Self, ParamsError> {
        params.validate()?;

        Ok(Self {
            params,
            records: Vec::new(),
            awaiting_repeat: true,
        })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The records of all samples processed so far.
    pub fn records(&self) -> &[CorrectionRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<CorrectionRecord> {
        self.records
    }

    /// True if no pair of consecutive samples with the same roll has been
    /// processed yet.
    pub fn is_awaiting_repeat(&self) -> bool {
        self.awaiting_repeat
    }

    /// Forget every processed sample, ready for a new trajectory.
    pub fn reset(&mut self) {
        self.records.clear();
        self.awaiting_repeat = true;
    }

    /// Classify how the given sample would be processed if it were next.
    pub fn classify(&self, sample: &Sample) -> StepKind {
        match self.records.last() {
            None => StepKind::Initial,
            Some(_) if self.records.len() == 1 => StepKind::Backfill,
            // Rolls are compared exactly
            Some(prev) if self.awaiting_repeat && prev.sample.roll_deg == sample.roll_deg => {
                StepKind::FirstRepeat
            }
            Some(_) => StepKind::Unroll,
        }
    }

    /// Process the next sample of the trajectory.
    pub fn proc(&mut self, sample: &Sample) -> Result<StepReport, InvalidInputError> {
        let index = self.records.len();

        sample.validate(index)?;

        let kind = self.classify(sample);

        let num_recalculated = match kind {
            StepKind::Initial => self.calc_initial(sample),
            StepKind::Backfill => self.calc_backfill(sample),
            StepKind::FirstRepeat => self.calc_first_repeat(sample),
            StepKind::Unroll => self.calc_unroll(sample)?,
        };

        let report = StepReport {
            index,
            kind,
            num_recalculated,
        };

        trace!("TiltCorr step: {:?}", report);

        Ok(report)
    }

    /// Correct a whole trajectory, discarding any previously processed
    /// samples.
    ///
    /// Every sample is validated before any of them is processed.
    pub fn correct(&mut self, samples: &[Sample]) -> Result<&[CorrectionRecord], InvalidInputError> {
        for (index, sample) in samples.iter().enumerate() {
            sample.validate(index)?;
        }

        self.reset();
        self.records.reserve(samples.len());

        for sample in samples {
            self.proc(sample)?;
        }

        debug!(
            "Corrected {} samples (recalc: {}, same roll pair found: {})",
            samples.len(),
            self.params.recalc,
            !self.awaiting_repeat
        );

        Ok(&self.records)
    }

    /// The first sample can only be offset once a heading is known, so its
    /// corrected position starts as its raw position.
    fn calc_initial(&mut self, sample: &Sample) -> usize {
        let offset = tilt_offset(sample.roll_deg, sample.pitch_deg, self.params.height_mm);

        self.records.push(CorrectionRecord::uncorrected(*sample, offset));

        0
    }

    /// The second sample gives the first heading, which is shared with the
    /// first sample.
    fn calc_backfill(&mut self, sample: &Sample) -> usize {
        let index = self.records.len();
        let prev_position = self.records[index - 1].sample.position();

        let heading = checked_heading(index, &prev_position, &sample.position());
        let offset = tilt_offset(sample.roll_deg, sample.pitch_deg, self.params.height_mm);

        self.records.push(CorrectionRecord::corrected(*sample, heading, offset));

        self.records[index - 1].set_heading(heading);

        1
    }

    fn calc_first_repeat(&mut self, sample: &Sample) -> usize {
        let index = self.records.len();
        let prev_position = self.records[index - 1].sample.position();

        let heading = checked_heading(index, &prev_position, &sample.position());
        let offset = tilt_offset(sample.roll_deg, sample.pitch_deg, self.params.height_mm);

        self.records.push(CorrectionRecord::corrected(*sample, heading, offset));

        self.awaiting_repeat = false;

        if self.params.recalc {
            debug!(
                "Same roll ({} deg) at samples {} and {}, re-estimating previous samples",
                sample.roll_deg,
                index - 1,
                index
            );
            self.recalc_prev(index, heading)
        }
        else {
            0
        }
    }

    fn calc_unroll(&mut self, sample: &Sample) -> Result<usize, InvalidInputError> {
        let index = self.records.len();
        let prev = &self.records[index - 1];
        let prev_heading = prev
            .heading
            .ok_or(InvalidInputError::MissingHeading { index: index - 1 })?;

        // Where the previous sample would have been seen with this roll
        let virtual_prev = apply_offset(
            &prev.adj_mm,
            &prev_heading,
            0.0,
            backroll_offset(sample.roll_deg, self.params.height_mm),
        );

        let heading = checked_heading(index, &virtual_prev, &sample.position());
        let offset = tilt_offset(sample.roll_deg, sample.pitch_deg, self.params.height_mm);

        self.records.push(CorrectionRecord::corrected(*sample, heading, offset));

        Ok(0)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Correct a whole trajectory using a new corrector.
pub fn correct_trajectory(
    samples: &[Sample],
    params: Params,
) -> Result<Vec<CorrectionRecord>, TiltCorrError> {
    let mut tilt_corr = TiltCorr::new(params)?;
    tilt_corr.correct(samples)?;

    Ok(tilt_corr.into_records())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Heading between the two points, warning if they coincide.
fn checked_heading(index: usize, from: &Vector2<f64>, to: &Vector2<f64>) -> Heading {
    if from == to {
        warn!(
            "Degenerate heading at sample {}: points coincide at ({}, {})",
            index, to.x, to.y
        );
    }

    heading_between(from, to)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::geom::TiltOffset;
    use crate::tilt_corr::SampleField;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    fn tilted_samples() -> Vec<Sample> {
        vec![
            Sample::new(0.0, 0.0, 0.0, 5.0, 1.0),
            Sample::new(1.0, 100.0, 10.0, 10.0, -2.0),
            Sample::new(2.0, 200.0, 50.0, 10.0, 0.0),
            Sample::new(3.0, 280.0, 90.0, -4.0, 3.0),
        ]
    }

    #[test]
    fn test_flat_straight_line() {
        let samples = vec![
            Sample::new(0.0, 0.0, 0.0, 0.0, 0.0),
            Sample::new(1.0, 100.0, 0.0, 0.0, 0.0),
            Sample::new(2.0, 200.0, 0.0, 0.0, 0.0),
        ];

        let records = correct_trajectory(&samples, Params::default()).unwrap();
        assert_eq!(records.len(), samples.len());

        for (r, s) in records.iter().zip(samples.iter()) {
            assert_eq!(r.offset(), TiltOffset::default());

            let h = r.heading().unwrap();
            assert!(h.alpha_x_rad.abs() < EPS);
            assert!((h.alpha_y_rad - FRAC_PI_2).abs() < EPS);

            assert!((r.adj_x() - s.x_mm).abs() < EPS);
            assert!((r.adj_y() - s.y_mm).abs() < EPS);
        }
    }

    #[test]
    fn test_step_classification() {
        let samples = tilted_samples();
        let mut tilt_corr = TiltCorr::new(Params::default()).unwrap();

        let kinds: Vec<StepKind> = samples
            .iter()
            .map(|s| tilt_corr.proc(s).unwrap().kind)
            .collect();

        assert_eq!(
            kinds,
            vec![
                StepKind::Initial,
                StepKind::Backfill,
                StepKind::FirstRepeat,
                StepKind::Unroll
            ]
        );
    }

    #[test]
    fn test_only_first_repeat_recalculates() {
        let samples = vec![
            Sample::new(0.0, 0.0, 0.0, 1.0, 0.0),
            Sample::new(1.0, 10.0, 0.0, 2.0, 0.0),
            Sample::new(2.0, 20.0, 1.0, 2.0, 0.0),
            Sample::new(3.0, 30.0, 3.0, 3.0, 0.0),
            Sample::new(4.0, 40.0, 6.0, 3.0, 0.0),
        ];
        let mut tilt_corr = TiltCorr::new(Params::default()).unwrap();

        let reports: Vec<StepReport> = samples
            .iter()
            .map(|s| tilt_corr.proc(s).unwrap())
            .collect();

        assert_eq!(reports[2].kind, StepKind::FirstRepeat);
        assert_eq!(reports[2].num_recalculated, 2);
        assert_eq!(reports[4].kind, StepKind::Unroll);
        assert_eq!(reports[4].num_recalculated, 0);
    }

    #[test]
    fn test_initial_and_backfill() {
        let samples = tilted_samples();
        let mut tilt_corr = TiltCorr::new(Params::default()).unwrap();

        tilt_corr.proc(&samples[0]).unwrap();
        let first = tilt_corr.records()[0];
        assert_eq!(first.heading(), None);
        assert_eq!(first.adj_position(), samples[0].position());
        assert_eq!(first.offset(), tilt_offset(5.0, 1.0, 1500.0));

        let report = tilt_corr.proc(&samples[1]).unwrap();
        assert_eq!(report.num_recalculated, 1);

        let heading = heading_between(&samples[0].position(), &samples[1].position());
        let records = tilt_corr.records();
        assert_eq!(records[0].heading(), Some(heading));
        assert_eq!(records[1].heading(), Some(heading));
        assert_eq!(
            records[0].adj_position(),
            first.offset().apply(&samples[0].position(), &heading)
        );
        assert_eq!(
            records[1].adj_position(),
            tilt_offset(10.0, -2.0, 1500.0).apply(&samples[1].position(), &heading)
        );
    }

    #[test]
    fn test_unroll_step() {
        let samples = tilted_samples();
        let mut tilt_corr = TiltCorr::new(Params::default()).unwrap();
        tilt_corr.correct(&samples[..3]).unwrap();

        let prev = tilt_corr.records()[2];
        tilt_corr.proc(&samples[3]).unwrap();

        let prev_heading = prev.heading().unwrap();
        let virtual_prev = apply_offset(
            &prev.adj_position(),
            &prev_heading,
            0.0,
            backroll_offset(-4.0, 1500.0),
        );
        let heading = heading_between(&virtual_prev, &samples[3].position());

        let last = tilt_corr.records()[3];
        assert_eq!(last.heading(), Some(heading));
        assert_eq!(
            last.adj_position(),
            tilt_offset(-4.0, 3.0, 1500.0).apply(&samples[3].position(), &heading)
        );

        // The unroll step does not touch earlier records
        assert_eq!(tilt_corr.records()[2], prev);
    }

    #[test]
    fn test_recalc_disabled() {
        let samples = tilted_samples();

        let with = correct_trajectory(&samples, Params::default()).unwrap();
        let without = correct_trajectory(
            &samples,
            Params {
                recalc: false,
                ..Params::default()
            },
        )
        .unwrap();

        // Without recalc the first sample keeps the heading from the backfill
        let backfill = heading_between(&samples[0].position(), &samples[1].position());
        assert_eq!(without[0].heading(), Some(backfill));
        assert_ne!(with[0].heading(), without[0].heading());
        assert_ne!(with[0].adj_position(), without[0].adj_position());

        // The repeat itself uses the direct heading in both cases
        assert_eq!(with[2].heading(), without[2].heading());
    }

    #[test]
    fn test_repeat_only_after_flag() {
        let mut tilt_corr = TiltCorr::new(Params {
            recalc: false,
            ..Params::default()
        })
        .unwrap();

        let samples = vec![
            Sample::new(0.0, 0.0, 0.0, 1.0, 0.0),
            Sample::new(1.0, 10.0, 0.0, 1.0, 0.0),
            Sample::new(2.0, 20.0, 0.0, 1.0, 0.0),
            Sample::new(3.0, 30.0, 0.0, 1.0, 0.0),
        ];

        let kinds: Vec<StepKind> = samples
            .iter()
            .map(|s| tilt_corr.proc(s).unwrap().kind)
            .collect();

        // The samples at index 0 and 1 share roll, but index 1 is always a backfill
        assert_eq!(
            kinds,
            vec![
                StepKind::Initial,
                StepKind::Backfill,
                StepKind::FirstRepeat,
                StepKind::Unroll
            ]
        );
        assert!(!tilt_corr.is_awaiting_repeat());
    }

    #[test]
    fn test_every_record_has_heading() {
        let samples: Vec<Sample> = (0..50)
            .map(|i| {
                let t = i as f64 * 0.2;
                Sample::new(
                    t,
                    t * 300.0,
                    (t * 0.7).sin() * 500.0,
                    ((i / 3) % 5) as f64 * 2.0 - 4.0,
                    (t * 1.3).cos() * 3.0,
                )
            })
            .collect();

        let records = correct_trajectory(&samples, Params::default()).unwrap();
        assert_eq!(records.len(), samples.len());

        for (r, s) in records.iter().zip(samples.iter()) {
            assert!(r.heading().is_some());
            assert_eq!(r.sample(), s);
            assert!(r.adj_x().is_finite() && r.adj_y().is_finite());
        }
    }

    #[test]
    fn test_short_sequences() {
        assert!(correct_trajectory(&[], Params::default()).unwrap().is_empty());

        let records =
            correct_trajectory(&[Sample::new(0.0, 1.0, 2.0, 30.0, 0.0)], Params::default())
                .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].heading(), None);
        assert_eq!(records[0].adj_position(), Vector2::new(1.0, 2.0));
        assert!((records[0].offset().shift_y_mm - 750.0).abs() < 1e-6);
    }

    #[test]
    fn test_identical_points() {
        let samples = vec![
            Sample::new(0.0, 5.0, 5.0, 0.0, 0.0),
            Sample::new(1.0, 5.0, 5.0, 3.0, 0.0),
        ];

        let records = correct_trajectory(&samples, Params::default()).unwrap();
        let h = records[1].heading().unwrap();
        assert_eq!(h.alpha_x_rad, 0.0);
        assert_eq!(h.alpha_y_rad, FRAC_PI_2);
    }

    #[test]
    fn test_invalid_input() {
        let mut samples = tilted_samples();
        samples[2].pitch_deg = std::f64::NAN;

        let mut tilt_corr = TiltCorr::new(Params::default()).unwrap();
        match tilt_corr.correct(&samples) {
            Err(InvalidInputError::NonFinite { index, field, .. }) => {
                assert_eq!(index, 2);
                assert_eq!(field, SampleField::Pitch);
            }
            r => panic!("Expected a non-finite error, got {:?}", r),
        }

        // Nothing is processed when validation fails
        assert!(tilt_corr.records().is_empty());

        assert!(matches!(
            correct_trajectory(&samples, Params::default()),
            Err(TiltCorrError::InvalidInput(_))
        ));
        assert!(matches!(
            correct_trajectory(
                &[],
                Params {
                    height_mm: -3.0,
                    recalc: true
                }
            ),
            Err(TiltCorrError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_height_scales_offsets() {
        let samples = tilted_samples();
        let params = Params {
            height_mm: 750.0,
            recalc: true,
        };

        let half = correct_trajectory(&samples, params).unwrap();
        let full = correct_trajectory(&samples, Params::default()).unwrap();

        for (h, f) in half.iter().zip(full.iter()) {
            assert!((h.offset().shift_x_mm * 2.0 - f.offset().shift_x_mm).abs() < 1e-9);
            assert!((h.offset().shift_y_mm * 2.0 - f.offset().shift_y_mm).abs() < 1e-9);
        }
    }

    #[test]
    fn test_correct_resets_state() {
        let samples = tilted_samples();
        let mut tilt_corr = TiltCorr::new(Params::default()).unwrap();

        let first = tilt_corr.correct(&samples).unwrap().to_vec();
        let second = tilt_corr.correct(&samples).unwrap().to_vec();
        assert_eq!(first, second);

        tilt_corr.reset();
        assert!(tilt_corr.records().is_empty());
        assert!(tilt_corr.is_awaiting_repeat());
    }
}
