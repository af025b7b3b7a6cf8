//! Persisted document shapes and YAML parsing.
//!
//! The structs here mirror the on-disk layout key for key, so the file
//! format is pinned independently of the in-memory model: a data file is
//! rooted at `TeGround`, a result file at `TeGroundTestSuite`. Model types
//! convert to and from these documents in their own modules.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::segment::Segment;
use crate::track::Track;
use crate::VideoTime;

/// `TeGround` root document (§ data file format).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataFileDoc {
    #[serde(rename = "Tracks", default)]
    pub tracks: Vec<HeaderDoc>,
    #[serde(rename = "Sequences", default)]
    pub sequences: Vec<SequenceDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderDoc {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub type_tag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceDoc {
    #[serde(rename = "Path")]
    pub path: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Length")]
    pub length: VideoTime,
    #[serde(rename = "Decoder")]
    pub decoder: String,
    #[serde(rename = "Tracks", default)]
    pub tracks: Vec<TrackDoc>,
}

/// One track of one sequence: the index of its header in the top-level
/// `Tracks` list, plus kind-specific children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackDoc {
    #[serde(rename = "Header")]
    pub header: usize,
    #[serde(rename = "Children", default)]
    pub children: Vec<SegmentDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentDoc {
    #[serde(rename = "Pos")]
    pub position: VideoTime,
    #[serde(rename = "Length")]
    pub length: VideoTime,
    #[serde(rename = "Data", default)]
    pub data: String,
}

/// `TeGroundTestSuite` root document (§ result file format).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteDoc {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "TrackTests", default)]
    pub track_tests: Vec<TrackTestDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackTestDoc {
    #[serde(rename = "Header")]
    pub header: usize,
    #[serde(rename = "Type")]
    pub type_tag: String,
    #[serde(rename = "Sequences", default)]
    pub sequences: Vec<SequenceAssertionsDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceAssertionsDoc {
    #[serde(rename = "Index")]
    pub index: usize,
    #[serde(rename = "Assertions", default)]
    pub assertions: Vec<AssertionDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionDoc {
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Result")]
    pub result: String,
    #[serde(rename = "Position")]
    pub position: VideoTime,
    #[serde(rename = "Length")]
    pub length: VideoTime,
    #[serde(rename = "Info", default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(rename = "File", default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(rename = "FileLine", default, skip_serializing_if = "Option::is_none")]
    pub file_line: Option<u32>,
    #[serde(
        rename = "SegmentPosition",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub segment_position: Option<VideoTime>,
    #[serde(
        rename = "SegmentLength",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub segment_length: Option<VideoTime>,
}

// Roots
// -----

#[derive(Debug, Serialize, Deserialize)]
struct DataFileRoot {
    #[serde(rename = "TeGround")]
    teground: DataFileDoc,
}

#[derive(Debug, Serialize, Deserialize)]
struct SuiteRoot {
    #[serde(rename = "TeGroundTestSuite")]
    suite: SuiteDoc,
}

/// Parse the YAML text of a data file.
pub fn parse_data_file(text: &str) -> Result<DataFileDoc> {
    let root: DataFileRoot = serde_yaml::from_str(text)
        .map_err(|e| Error::parse("TeGround", e.to_string()))?;
    Ok(root.teground)
}

/// Render a data-file document as YAML text.
pub fn render_data_file(doc: &DataFileDoc) -> Result<String> {
    Ok(serde_yaml::to_string(&DataFileRoot {
        teground: doc.clone(),
    })?)
}

/// Parse the YAML text of a result file.
pub fn parse_suite(text: &str) -> Result<SuiteDoc> {
    let root: SuiteRoot = serde_yaml::from_str(text)
        .map_err(|e| Error::parse("TeGroundTestSuite", e.to_string()))?;
    Ok(root.suite)
}

/// Render a result-file document as YAML text.
pub fn render_suite(doc: &SuiteDoc) -> Result<String> {
    Ok(serde_yaml::to_string(&SuiteRoot { suite: doc.clone() })?)
}

/// Fill a freshly constructed track from its document node.
pub fn fill_track(track: &mut Track, doc: &TrackDoc) -> Result<()> {
    match track {
        Track::Segment(segment_track) => {
            segment_track.clear_segments();
            for child in &doc.children {
                segment_track.insert_segment(Segment::with_data(
                    child.position,
                    child.length,
                    child.data.clone(),
                ))?;
            }
        }
    }
    Ok(())
}

/// Document node of one track, tagged with its header index.
pub fn track_doc(track: &Track, header_index: usize) -> TrackDoc {
    match track {
        Track::Segment(segment_track) => TrackDoc {
            header: header_index,
            children: segment_track
                .iter()
                .map(|s| SegmentDoc {
                    position: s.position(),
                    length: s.length(),
                    data: s.data().to_string(),
                })
                .collect(),
        },
    }
}
