//! Backward re-estimation of previous samples

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use super::*;
use crate::geom::{apply_offset, backroll_offset, heading_between, Heading};

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TiltCorr {

    /// Re-estimate the headings and corrected positions of every record
    /// before `index`, walking backwards from `heading`, the heading
    /// established at `index`.
    ///
    /// Each record `j` takes the heading found for `j + 1`. Its corrected
    /// position is then rolled back to the roll of sample `j - 1`, and the
    /// heading from the raw sample `j - 1` to that point is carried on to
    /// `j - 1`. Record 0 takes the last heading carried.
    ///
    /// Only the records' samples, offsets and rolls are read, so running the
    /// pass again with the same arguments gives the same result.
    ///
    /// Returns the number of records rewritten.
    ///
    /// # Panics
    /// - If `index` is greater than the number of records.
    pub fn recalc_prev(&mut self, index: usize, heading: Heading) -> usize {
        assert!(
            index <= self.records.len(),
            "Cannot re-estimate before record {} of {}",
            index,
            self.records.len()
        );

        let height_mm = self.params.height_mm;
        let mut heading = heading;
        let mut num_recalculated = 0;

        for j in (1..index).rev() {
            let prev_sample = self.records[j - 1].sample;

            let record = &mut self.records[j];
            record.set_heading(heading);

            // Take the roll from the previous sample
            let virtual_curr = apply_offset(
                &record.adj_mm,
                &heading,
                0.0,
                backroll_offset(prev_sample.roll_deg, height_mm),
            );

            heading = heading_between(&prev_sample.position(), &virtual_curr);
            num_recalculated += 1;
        }

        // The first record has no previous sample, so it keeps the heading
        // carried from record 1
        if index > 0 {
            if let Some(first) = self.records.first_mut() {
                first.set_heading(heading);
                num_recalculated += 1;
            }
        }

        num_recalculated
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
