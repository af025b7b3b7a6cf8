//! TestSuite: the per-track evaluators over one data file, plus suite-level
//! persistence.
//!
//! Like the track kinds, test subtypes are a tagged variant with a
//! tag -> constructor table owned by each suite, so result files can be
//! rebuilt without process-wide state.

use std::path::Path;

use log::info;

use crate::data_file::DataFile;
use crate::error::{Error, Result};
use crate::format;
use crate::track::HeaderId;
use crate::track_test::SegmentTrackTest;

/// Subtype tag of the built-in segment evaluator.
pub const SEGMENT_TRACK_TEST_TYPE: &str = "SegmentTrackTest";

/// One evaluator of a test suite.
pub enum TrackTest<'a> {
    Segment(SegmentTrackTest<'a>),
}

impl<'a> TrackTest<'a> {
    pub fn type_tag(&self) -> &'static str {
        match self {
            TrackTest::Segment(_) => SEGMENT_TRACK_TEST_TYPE,
        }
    }

    pub fn header(&self) -> HeaderId {
        match self {
            TrackTest::Segment(t) => t.header(),
        }
    }

    pub fn is_end(&self) -> bool {
        match self {
            TrackTest::Segment(t) => t.is_end(),
        }
    }

    pub fn as_segment(&self) -> Option<&SegmentTrackTest<'a>> {
        match self {
            TrackTest::Segment(t) => Some(t),
        }
    }

    pub fn as_segment_mut(&mut self) -> Option<&mut SegmentTrackTest<'a>> {
        match self {
            TrackTest::Segment(t) => Some(t),
        }
    }

    pub(crate) fn read_doc(&mut self, doc: &format::TrackTestDoc) -> Result<()> {
        match self {
            TrackTest::Segment(t) => t.read_doc(doc),
        }
    }

    pub(crate) fn write_doc(&self) -> format::TrackTestDoc {
        match self {
            TrackTest::Segment(t) => t.write_doc(),
        }
    }
}

/// Constructor for one test subtype.
pub type TestCtor = for<'a> fn(&'a DataFile, HeaderId) -> Result<TrackTest<'a>>;

/// Tag -> constructor table owned by each `TestSuite`.
pub struct TestTypeRegistry {
    entries: Vec<(String, TestCtor)>,
}

impl TestTypeRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn register(&mut self, type_tag: impl Into<String>, ctor: TestCtor) {
        let type_tag = type_tag.into();
        if !self.has_subtype(&type_tag) {
            self.entries.push((type_tag, ctor));
        }
    }

    pub fn has_subtype(&self, type_tag: &str) -> bool {
        self.entries.iter().any(|(tag, _)| tag == type_tag)
    }

    pub fn make<'a>(
        &self,
        type_tag: &str,
        data: &'a DataFile,
        header: HeaderId,
    ) -> Option<Result<TrackTest<'a>>> {
        self.entries
            .iter()
            .find(|(tag, _)| tag == type_tag)
            .map(|(_, ctor)| ctor(data, header))
    }
}

fn make_segment_test<'a>(data: &'a DataFile, header: HeaderId) -> Result<TrackTest<'a>> {
    Ok(TrackTest::Segment(SegmentTrackTest::new(data, header)?))
}

impl Default for TestTypeRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(SEGMENT_TRACK_TEST_TYPE, make_segment_test);
        registry
    }
}

/// Named collection of evaluators over one borrowed data file. The data
/// file must outlive the suite and stays immutable while the suite exists.
pub struct TestSuite<'a> {
    data: &'a DataFile,
    name: String,
    tests: Vec<TrackTest<'a>>,
    registry: TestTypeRegistry,
}

impl<'a> TestSuite<'a> {
    pub fn new(data: &'a DataFile, name: impl Into<String>) -> Self {
        Self {
            data,
            name: name.into(),
            tests: Vec::new(),
            registry: TestTypeRegistry::default(),
        }
    }

    pub fn data(&self) -> &'a DataFile {
        self.data
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn registry_mut(&mut self) -> &mut TestTypeRegistry {
        &mut self.registry
    }

    pub fn tests(&self) -> &[TrackTest<'a>] {
        &self.tests
    }

    pub fn tests_mut(&mut self) -> &mut [TrackTest<'a>] {
        &mut self.tests
    }

    pub fn test_count(&self) -> usize {
        self.tests.len()
    }

    pub fn add_test(&mut self, test: TrackTest<'a>) {
        self.tests.push(test);
    }

    /// Build and append a segment evaluator for `header`; returns a mutable
    /// handle to it for driving.
    pub fn add_segment_test(&mut self, header: HeaderId) -> Result<&mut SegmentTrackTest<'a>> {
        let test = SegmentTrackTest::new(self.data, header)?;
        self.tests.push(TrackTest::Segment(test));
        Ok(self
            .tests
            .last_mut()
            .and_then(TrackTest::as_segment_mut)
            .expect("just pushed a segment test"))
    }

    pub fn clear_tests(&mut self) {
        self.tests.clear();
    }

    // Persistence
    // -----------

    /// Rebuild the suite's evaluators from a result document. Each entry is
    /// dispatched through the subtype registry by its `Type` tag.
    pub fn read_doc(&mut self, doc: &format::SuiteDoc) -> Result<()> {
        self.clear_tests();
        self.name = doc.name.clone();

        for test_doc in &doc.track_tests {
            if !self.registry.has_subtype(&test_doc.type_tag) {
                return Err(Error::parse(
                    "TeGroundTestSuite.TrackTests.Type",
                    format!("unknown test subtype '{}'", test_doc.type_tag),
                ));
            }
            if test_doc.header >= self.data.track_count() {
                return Err(Error::OutOfBounds {
                    context: "header index",
                    value: test_doc.header as i64,
                    limit: self.data.track_count() as i64,
                });
            }
            let header = self
                .data
                .header_at(test_doc.header)
                .map(|h| h.id())
                .ok_or(Error::OutOfBounds {
                    context: "header index",
                    value: test_doc.header as i64,
                    limit: self.data.track_count() as i64,
                })?;
            let mut test = self
                .registry
                .make(&test_doc.type_tag, self.data, header)
                .expect("subtype presence checked above")?;
            test.read_doc(test_doc)?;
            self.tests.push(test);
        }
        info!("loaded test suite '{}': {} tests", self.name, self.tests.len());
        Ok(())
    }

    /// Document form of the suite and every evaluator's log.
    pub fn write_doc(&self) -> format::SuiteDoc {
        format::SuiteDoc {
            name: self.name.clone(),
            track_tests: self.tests.iter().map(TrackTest::write_doc).collect(),
        }
    }

    /// Read a result file, replacing the current evaluators.
    pub fn read_from(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let doc = format::parse_suite(&text)?;
        self.read_doc(&doc)
    }

    /// Write the result file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = format::render_suite(&self.write_doc())?;
        std::fs::write(path.as_ref(), text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        AssertionKind, AssertionResult, Segment, Sequence, SequenceKind, SEGMENT_TRACK_TYPE,
    };

    fn sample_data() -> (DataFile, HeaderId) {
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
                SequenceKind::Image,
                80,
            ))
            .unwrap();
        let track = dfile.segment_track_mut(0, header).unwrap();
        track
            .insert_segment(Segment::with_data(20, 10, "person"))
            .unwrap();
        track.insert_segment(Segment::with_length(50, 10)).unwrap();
        (dfile, header)
    }

    #[test]
    fn suite_round_trip_preserves_assertions() {
        let (dfile, header) = sample_data();

        let mut suite = TestSuite::new(&dfile, "Nightly");
        {
            let test = suite.add_segment_test(header).unwrap();
            test.single_stamp(22, "entering", "detector.rs", 12).unwrap();
            test.single_stamp(40, "", "", 0).unwrap();
            test.advance_cursor_position(70, "", 0).unwrap();
        }
        let doc = suite.write_doc();

        let mut replay = TestSuite::new(&dfile, "");
        replay.read_doc(&doc).unwrap();
        assert_eq!(replay.name(), "Nightly");
        assert_eq!(replay.test_count(), 1);

        let test = replay.tests()[0].as_segment().unwrap();
        assert!(test.is_end());
        let log = test.assertions(0);
        assert_eq!(log.len(), 3);

        assert_eq!(log[0].position(), 22);
        assert_eq!(log[0].result(), AssertionResult::Match);
        assert_eq!(log[0].kind(), AssertionKind::SingleStamp);
        assert_eq!(log[0].info(), "entering");
        assert_eq!(log[0].call_site().unwrap().file, "detector.rs");
        assert_eq!(log[0].call_site().unwrap().line, 12);
        assert!(log[0].has_segment());

        assert_eq!(log[1].position(), 40);
        assert_eq!(log[1].result(), AssertionResult::Miss);
        assert!(!log[1].has_segment());

        assert_eq!(log[2].result(), AssertionResult::Unmarked);
        assert_eq!(log[2].kind(), AssertionKind::UnmarkedSegment);
        assert_eq!(log[2].position(), 50);
        assert_eq!(log[2].length(), 10);

        // Round-trip idempotence at the document level.
        let doc2 = replay.write_doc();
        let text1 = crate::format::render_suite(&doc).unwrap();
        let text2 = crate::format::render_suite(&doc2).unwrap();
        assert_eq!(text1, text2);
    }

    #[test]
    fn unknown_subtype_is_a_parse_error() {
        let (dfile, _) = sample_data();
        let mut suite = TestSuite::new(&dfile, "S");
        let doc = format::SuiteDoc {
            name: "S".to_string(),
            track_tests: vec![format::TrackTestDoc {
                header: 0,
                type_tag: "PolygonTrackTest".to_string(),
                sequences: Vec::new(),
            }],
        };
        let err = suite.read_doc(&doc).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn out_of_range_header_index_fails() {
        let (dfile, _) = sample_data();
        let mut suite = TestSuite::new(&dfile, "S");
        let doc = format::SuiteDoc {
            name: "S".to_string(),
            track_tests: vec![format::TrackTestDoc {
                header: 1,
                type_tag: SEGMENT_TRACK_TEST_TYPE.to_string(),
                sequences: Vec::new(),
            }],
        };
        let err = suite.read_doc(&doc).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds { .. }));
    }

    #[test]
    fn missing_segment_reference_fails() {
        let (dfile, _) = sample_data();
        let mut suite = TestSuite::new(&dfile, "S");
        let doc = format::SuiteDoc {
            name: "S".to_string(),
            track_tests: vec![format::TrackTestDoc {
                header: 0,
                type_tag: SEGMENT_TRACK_TEST_TYPE.to_string(),
                sequences: vec![
                    format::SequenceAssertionsDoc {
                        index: 0,
                        assertions: vec![format::AssertionDoc {
                            kind: "SingleStamp".to_string(),
                            result: "Match".to_string(),
                            position: 22,
                            length: 1,
                            info: None,
                            file: None,
                            file_line: None,
                            segment_position: Some(33),
                            segment_length: Some(7),
                        }],
                    },
                    format::SequenceAssertionsDoc {
                        index: 1,
                        assertions: Vec::new(),
                    },
                ],
            }],
        };
        let err = suite.read_doc(&doc).unwrap_err();
        assert!(matches!(
            err,
            Error::SegmentNotFound {
                position: 33,
                length: 7
            }
        ));
    }

    #[test]
    fn sequence_count_mismatch_fails() {
        let (dfile, _) = sample_data();
        let mut suite = TestSuite::new(&dfile, "S");
        let doc = format::SuiteDoc {
            name: "S".to_string(),
            track_tests: vec![format::TrackTestDoc {
                header: 0,
                type_tag: SEGMENT_TRACK_TEST_TYPE.to_string(),
                sequences: vec![format::SequenceAssertionsDoc {
                    index: 0,
                    assertions: Vec::new(),
                }],
            }],
        };
        let err = suite.read_doc(&doc).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn suite_file_round_trip() {
        let (dfile, header) = sample_data();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.yaml");

        let mut suite = TestSuite::new(&dfile, "Nightly");
        suite
            .add_segment_test(header)
            .unwrap()
            .single_stamp(22, "", "", 0)
            .unwrap();
        suite.write_to(&path).unwrap();

        let mut replay = TestSuite::new(&dfile, "");
        replay.read_from(&path).unwrap();
        assert_eq!(replay.name(), "Nightly");
        let test = replay.tests()[0].as_segment().unwrap();
        assert_eq!(test.count_assertions(AssertionResult::Match), 1);
    }

    #[test]
    fn data_file_round_trip() {
        let (dfile, _header) = sample_data();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.yaml");
        dfile.write_to(&path).unwrap();

        let mut reloaded = DataFile::new();
        reloaded.read_from(&path).unwrap();
        assert_eq!(reloaded.track_count(), 1);
        assert_eq!(reloaded.header_at(0).unwrap().name(), "People");
        assert_eq!(reloaded.sequence_count(), 2);
        assert_eq!(reloaded.sequence_at(0).unwrap().path(), "cam1.mp4");
        assert_eq!(reloaded.sequence_at(1).unwrap().kind(), SequenceKind::Image);

        let new_header = reloaded.header_at(0).unwrap().id();
        let track = reloaded.segment_track(0, new_header).unwrap();
        assert_eq!(track.total_segments(), 2);
        assert_eq!(track.segment_at(0).unwrap().data(), "person");
        assert_eq!(track.segment_at(1).unwrap().position(), 50);

        // Structural idempotence: write(read(write(x))) == write(x).
        let text1 = crate::format::render_data_file(&dfile.to_doc()).unwrap();
        let text2 = crate::format::render_data_file(&reloaded.to_doc()).unwrap();
        assert_eq!(text1, text2);
    }
}
