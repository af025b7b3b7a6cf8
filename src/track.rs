//! Track headers, track kinds, and the per-data-file type registry.
//!
//! A header is shared identity across all sequences: appending one to a
//! `DataFile` grows a matching track in every sequence, removing it deletes
//! them. Headers are distinguished by identity, not by name. Track kinds are
//! a tagged variant plus a tag -> constructor table scoped to the owning
//! `DataFile`, so parallel harnesses never share registry state.

use crate::segment_track::SegmentTrack;
use crate::VideoTime;

/// Type tag of the built-in segment track kind.
pub const SEGMENT_TRACK_TYPE: &str = "Segment";

/// Stable identity of a track header inside its data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeaderId(pub(crate) u64);

/// Named, typed track descriptor shared across sequences.
#[derive(Debug, Clone)]
pub struct TrackHeader {
    id: HeaderId,
    name: String,
    type_tag: String,
}

impl TrackHeader {
    pub(crate) fn new(id: HeaderId, type_tag: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            type_tag: type_tag.into(),
        }
    }

    pub fn id(&self) -> HeaderId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Registered type tag, e.g. `"Segment"`.
    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }
}

/// One annotation track of a sequence. Currently the only kind is the
/// segment track; further kinds slot in as variants plus a registry entry.
#[derive(Debug, Clone)]
pub enum Track {
    Segment(SegmentTrack),
}

impl Track {
    pub fn header(&self) -> HeaderId {
        match self {
            Track::Segment(t) => t.header(),
        }
    }

    pub fn length(&self) -> VideoTime {
        match self {
            Track::Segment(t) => t.length(),
        }
    }

    pub fn type_tag(&self) -> &'static str {
        match self {
            Track::Segment(_) => SEGMENT_TRACK_TYPE,
        }
    }

    pub fn as_segment(&self) -> Option<&SegmentTrack> {
        match self {
            Track::Segment(t) => Some(t),
        }
    }

    pub fn as_segment_mut(&mut self) -> Option<&mut SegmentTrack> {
        match self {
            Track::Segment(t) => Some(t),
        }
    }
}

/// Constructor for one track kind.
pub type TrackCtor = fn(HeaderId, VideoTime) -> Track;

/// Tag -> constructor table owned by each `DataFile`.
#[derive(Debug, Clone)]
pub struct TrackTypeRegistry {
    entries: Vec<(String, TrackCtor)>,
}

impl TrackTypeRegistry {
    /// Empty registry with no kinds registered; `default()` carries the
    /// built-in ones.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a kind. A tag already present is left untouched.
    pub fn register(&mut self, type_tag: impl Into<String>, ctor: TrackCtor) {
        let type_tag = type_tag.into();
        if !self.has_type(&type_tag) {
            self.entries.push((type_tag, ctor));
        }
    }

    pub fn has_type(&self, type_tag: &str) -> bool {
        self.entries.iter().any(|(tag, _)| tag == type_tag)
    }

    pub fn make(&self, type_tag: &str, header: HeaderId, length: VideoTime) -> Option<Track> {
        self.entries
            .iter()
            .find(|(tag, _)| tag == type_tag)
            .map(|(_, ctor)| ctor(header, length))
    }
}

impl Default for TrackTypeRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(SEGMENT_TRACK_TYPE, |header, length| {
            Track::Segment(SegmentTrack::new(header, length))
        });
        registry
    }
}
