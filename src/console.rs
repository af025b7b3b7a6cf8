//! Console reporting subscriber: one formatted line per assertion.

use std::cell::Cell;

use crate::assertion::{AssertionKind, AssertionResult, SegmentAssertion};
use crate::data_file::DataFile;
use crate::sequence::Sequence;
use crate::track::HeaderId;
use crate::SegmentAssertionSubscriber;

/// Writes every inserted assertion to stdout, prefixed with the evaluated
/// track's name, and a banner whenever the cursor enters a new sequence.
/// Assertions that reference a segment carry its coordinates, resolved
/// through the borrowed data file for the sequence the cursor is in.
///
/// ```text
/// [MATCH   ] POS[People:00050:1] TYPE[Stamp] SEGMENT[50, 10] INFO[enter]
/// ```
pub struct ConsoleAssertionWriter<'a> {
    data: &'a DataFile,
    header: HeaderId,
    sequence: Cell<usize>,
}

impl<'a> ConsoleAssertionWriter<'a> {
    pub fn new(data: &'a DataFile, header: HeaderId) -> Self {
        Self {
            data,
            header,
            sequence: Cell::new(0),
        }
    }

    fn format_line(&self, assertion: &SegmentAssertion) -> String {
        let type_string = match assertion.kind() {
            AssertionKind::SingleStamp | AssertionKind::MultiStamp => "Stamp",
            AssertionKind::SingleOverlap | AssertionKind::MultiOverlap => "Segment",
            AssertionKind::UnmarkedSegment => "Unmarked",
        };
        let result_string = match assertion.result() {
            AssertionResult::Match => "[MATCH   ]",
            AssertionResult::Miss => "[MISS    ]",
            AssertionResult::Unmarked => "[UNMARKED]",
        };
        let track_name = self
            .data
            .header(self.header)
            .map(|h| h.name())
            .unwrap_or_default();

        let mut line = format!(
            "{} POS[{}:{:05}:{}] TYPE[{}]",
            result_string,
            track_name,
            assertion.position(),
            assertion.length(),
            type_string
        );
        if let Some(id) = assertion.segment()
            && let Some(segment) = self
                .data
                .segment_track(self.sequence.get(), self.header)
                .and_then(|t| t.segment_by_id(id))
        {
            line.push_str(&format!(
                " SEGMENT[{}, {}]",
                segment.position(),
                segment.length()
            ));
        }
        if assertion.has_info() {
            line.push_str(&format!(" INFO[{}]", assertion.info()));
        }
        if let Some(site) = assertion.call_site() {
            line.push_str(&format!(" FILE[{}:{}]", site.file, site.line));
        }
        line
    }
}

impl SegmentAssertionSubscriber for ConsoleAssertionWriter<'_> {
    fn on_sequence_set(&self, sequence: &Sequence) {
        println!(
            "\n------------------------------------------------------------\n{}\n------------------------------------------------------------\n",
            sequence.path()
        );
        if let Some(index) = self
            .data
            .sequences()
            .iter()
            .position(|s| std::ptr::eq(s, sequence))
        {
            self.sequence.set(index);
        }
    }

    fn on_assertion_insert(&self, assertion: &SegmentAssertion) {
        println!("{}", self.format_line(assertion));
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::{Segment, SegmentTrackTest, SequenceKind, SEGMENT_TRACK_TYPE};

    fn sample() -> (DataFile, HeaderId) {
        let mut dfile = DataFile::new();
        let header = dfile.append_track(SEGMENT_TRACK_TYPE, "People").unwrap();
        dfile
            .append_sequence(Sequence::new(
                "cam1.mp4",
                "StandardVideoDecoder",
                SequenceKind::Video,
                100,
            ))
            .unwrap();
        dfile
            .append_sequence(Sequence::new(
                "cam2.mp4",
                "StandardVideoDecoder",
                SequenceKind::Video,
                100,
            ))
            .unwrap();
        dfile
            .segment_track_mut(0, header)
            .unwrap()
            .insert_segment(Segment::with_length(50, 10))
            .unwrap();
        dfile
            .segment_track_mut(1, header)
            .unwrap()
            .insert_segment(Segment::with_length(30, 20))
            .unwrap();
        (dfile, header)
    }

    #[test]
    fn line_format() {
        let (dfile, header) = sample();
        let writer = ConsoleAssertionWriter::new(&dfile, header);
        let id = dfile
            .segment_track(0, header)
            .unwrap()
            .segment_at(0)
            .unwrap()
            .id();

        let matched = SegmentAssertion::new(
            50,
            1,
            AssertionResult::Match,
            AssertionKind::SingleStamp,
            "enter",
            "detector.rs",
            9,
            Some(id),
        );
        assert_eq!(
            writer.format_line(&matched),
            "[MATCH   ] POS[People:00050:1] TYPE[Stamp] SEGMENT[50, 10] INFO[enter] FILE[detector.rs:9]"
        );

        let missed = SegmentAssertion::new(
            60,
            1,
            AssertionResult::Miss,
            AssertionKind::SingleStamp,
            "",
            "",
            0,
            None,
        );
        assert_eq!(
            writer.format_line(&missed),
            "[MISS    ] POS[People:00060:1] TYPE[Stamp]"
        );

        let unmarked = SegmentAssertion::new(
            50,
            10,
            AssertionResult::Unmarked,
            AssertionKind::UnmarkedSegment,
            "",
            "",
            0,
            Some(id),
        );
        assert_eq!(
            writer.format_line(&unmarked),
            "[UNMARKED] POS[People:00050:10] TYPE[Unmarked] SEGMENT[50, 10]"
        );
    }

    #[test]
    fn segment_resolution_follows_the_sequence() {
        let (dfile, header) = sample();
        let writer = ConsoleAssertionWriter::new(&dfile, header);
        writer.on_sequence_set(&dfile.sequences()[1]);

        let id = dfile
            .segment_track(1, header)
            .unwrap()
            .segment_at(0)
            .unwrap()
            .id();
        let matched = SegmentAssertion::new(
            35,
            1,
            AssertionResult::Match,
            AssertionKind::MultiStamp,
            "",
            "",
            0,
            Some(id),
        );
        assert_eq!(
            writer.format_line(&matched),
            "[MATCH   ] POS[People:00035:1] TYPE[Stamp] SEGMENT[30, 20]"
        );
    }

    #[test]
    fn subscribes_to_a_running_evaluator() {
        let (dfile, header) = sample();
        let mut test = SegmentTrackTest::new(&dfile, header).unwrap();
        test.add_subscriber(Rc::new(ConsoleAssertionWriter::new(&dfile, header)));

        test.single_stamp(55, "", "", 0).unwrap();
        test.advance_cursor_sequence(1, "", 0).unwrap();
        test.single_stamp(35, "", "", 0).unwrap();
        assert_eq!(test.count_assertions(AssertionResult::Match), 2);
    }
}
