//! Overlap tolerance: the pure predicate deciding whether an asserted
//! interval matches a segment.
//!
//! All bounds are opt-in; a zero value disables its check. Percent bounds
//! divide on the relevant denominator in floating point.

use crate::VideoTime;

/// Tolerance bounds for overlap assertions.
///
/// For an assertion `[p, p+l)` against a segment `[sp, sp+sl)`:
/// - `overlap` is the shared span,
/// - `missed` is the part of the assertion outside the segment,
/// - `unmarked` is the part of the segment outside the assertion.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OverlapParameters {
    /// Absolute minimum overlap in frames. `0` disables.
    pub min_overlap_length: VideoTime,
    /// Absolute cap on the missed portion. `0` disables.
    pub max_missed_length: VideoTime,
    /// Absolute cap on the unmarked portion. `0` disables.
    pub max_unmarked_length: VideoTime,
    /// Lower bound on `overlap / assertion_length`. `0` disables.
    pub min_overlap_percent_to_assertion: f64,
    /// Lower bound on `overlap / segment_length`. `0` disables.
    pub min_overlap_percent_to_segment: f64,
    /// Upper bound on `missed / assertion_length`. `0` disables.
    pub max_missed_percent: f64,
    /// Upper bound on `unmarked / segment_length`. `0` disables.
    pub max_unmarked_percent: f64,
}

/// Measured geometry of one assertion/segment pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapMeasure {
    pub overlap: VideoTime,
    pub missed: VideoTime,
    pub unmarked: VideoTime,
}

impl OverlapParameters {
    /// Evaluate the predicate. `None` means no match: either the intervals
    /// are disjoint or an enabled bound is violated. `Some` carries the
    /// measured overlap geometry.
    pub fn evaluate(
        &self,
        position: VideoTime,
        length: VideoTime,
        segment_position: VideoTime,
        segment_length: VideoTime,
    ) -> Option<OverlapMeasure> {
        let end = position + length;
        let segment_end = segment_position + segment_length;

        if end <= segment_position || segment_end <= position {
            return None;
        }

        let overlap_start = position.max(segment_position);
        let overlap_end = end.min(segment_end);
        let overlap = overlap_end - overlap_start;
        let missed = (segment_position - position).max(0) + (end - segment_end).max(0);
        let unmarked = (position - segment_position).max(0) + (segment_end - end).max(0);

        if overlap < self.min_overlap_length {
            return None;
        }
        if self.min_overlap_percent_to_assertion > 0.0
            && (overlap as f64) / (length as f64) < self.min_overlap_percent_to_assertion
        {
            return None;
        }
        if self.min_overlap_percent_to_segment > 0.0
            && (overlap as f64) / (segment_length as f64) < self.min_overlap_percent_to_segment
        {
            return None;
        }

        if self.max_missed_length > 0 && missed > self.max_missed_length {
            return None;
        }
        if self.max_missed_percent > 0.0
            && (missed as f64) / (length as f64) > self.max_missed_percent
        {
            return None;
        }

        if self.max_unmarked_length > 0 && unmarked > self.max_unmarked_length {
            return None;
        }
        if self.max_unmarked_percent > 0.0
            && (unmarked as f64) / (segment_length as f64) > self.max_unmarked_percent
        {
            return None;
        }

        Some(OverlapMeasure {
            overlap,
            missed,
            unmarked,
        })
    }
}
