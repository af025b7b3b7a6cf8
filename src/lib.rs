//! TEGROUND - Ground-truth assertions over timed segment annotations.
//!
//! An annotation file describes media sequences, each carrying segment
//! tracks: intervals of interest on the timeline. Code under test drives a
//! cursor forward through those sequences and emits stamps (pointwise
//! events) or overlaps (interval events); the engine matches each emission
//! against the annotated segments under configurable tolerances, classifies
//! it as `Match`, `Miss` or `Unmarked`, and records it in an ordered log
//! that can be persisted, diffed or drawn.
//!
//! ```no_run
//! use teground::{DataFile, Segment, Sequence, SequenceKind, SegmentTrackTest};
//!
//! # fn main() -> teground::Result<()> {
//! let mut data = DataFile::new();
//! let people = data.append_track("Segment", "People")?;
//! data.append_sequence(Sequence::new(
//!     "cam1.mp4",
//!     "StandardVideoDecoder",
//!     SequenceKind::Video,
//!     1000,
//! ))?;
//! data.segment_track_mut(0, people)
//!     .unwrap()
//!     .insert_segment(Segment::with_length(120, 30))?;
//!
//! let mut test = SegmentTrackTest::new(&data, people)?;
//! teground::single_stamp!(test, 130)?;
//! teground::advance_cursor_position!(test, 500)?;
//! # Ok(())
//! # }
//! ```

pub mod assertion;
pub mod console;
pub mod data_file;
pub mod draw;
pub mod error;
pub mod format;
pub mod overlap;
pub mod segment;
pub mod segment_track;
pub mod sequence;
pub mod suite;
pub mod track;

/// Frame-resolution time along a sequence.
pub type VideoTime = i64;

pub use assertion::{
    AssertionKind, AssertionResult, CallSite, SegmentAssertion, SegmentAssertionSubscriber,
    SubscriberHandle, SubscriberId,
};
pub use console::ConsoleAssertionWriter;
pub use data_file::DataFile;
pub use draw::{Surface, DRAW_HEADER_WIDTH};
pub use error::{Error, Result};
pub use overlap::{OverlapMeasure, OverlapParameters};
pub use segment::{Segment, SegmentId};
pub use segment_track::SegmentTrack;
pub use sequence::{Sequence, SequenceKind};
pub use suite::{TestSuite, TrackTest, SEGMENT_TRACK_TEST_TYPE};
pub use track::{HeaderId, Track, TrackHeader, TrackTypeRegistry, SEGMENT_TRACK_TYPE};
pub use track_test::SegmentTrackTest;

/// Point assertion with the caller's file and line attached.
///
/// `single_stamp!(test, position)` or `single_stamp!(test, position, info)`.
#[macro_export]
macro_rules! single_stamp {
    ($test:expr, $position:expr) => {
        $test.single_stamp($position, "", file!(), line!())
    };
    ($test:expr, $position:expr, $info:expr) => {
        $test.single_stamp($position, $info, file!(), line!())
    };
}

/// Shared-claim point assertion with the caller's file and line attached.
#[macro_export]
macro_rules! multi_stamp {
    ($test:expr, $position:expr) => {
        $test.multi_stamp($position, "", file!(), line!())
    };
    ($test:expr, $position:expr, $info:expr) => {
        $test.multi_stamp($position, $info, file!(), line!())
    };
}

/// Interval assertion with the caller's file and line attached.
#[macro_export]
macro_rules! single_overlap {
    ($test:expr, $position:expr, $length:expr, $params:expr) => {
        $test.single_overlap($position, $length, $params, "", file!(), line!())
    };
    ($test:expr, $position:expr, $length:expr, $params:expr, $info:expr) => {
        $test.single_overlap($position, $length, $params, $info, file!(), line!())
    };
}

/// Shared-claim interval assertion with the caller's file and line attached.
#[macro_export]
macro_rules! multi_overlap {
    ($test:expr, $position:expr, $length:expr, $params:expr) => {
        $test.multi_overlap($position, $length, $params, "", file!(), line!())
    };
    ($test:expr, $position:expr, $length:expr, $params:expr, $info:expr) => {
        $test.multi_overlap($position, $length, $params, $info, file!(), line!())
    };
}

/// Cursor advance within the current sequence, tagged with the call site.
#[macro_export]
macro_rules! advance_cursor_position {
    ($test:expr, $position:expr) => {
        $test.advance_cursor_position($position, file!(), line!())
    };
}

/// Cursor advance to another sequence, tagged with the call site.
#[macro_export]
macro_rules! advance_cursor_sequence {
    ($test:expr, $target:expr) => {
        $test.advance_cursor_sequence($target, file!(), line!())
    };
}
