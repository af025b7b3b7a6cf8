//! Sequence: one annotated media timeline.
//!
//! A sequence names its media by an opaque path plus decoder hint and owns
//! one track per header known to the enclosing data file. Track upkeep goes
//! through the data file so the one-track-per-header correspondence never
//! breaks; the methods here that grow or drop tracks are crate-private.

use crate::track::{HeaderId, Track};
use crate::VideoTime;

/// Media kind of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    Video,
    Image,
}

impl SequenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SequenceKind::Video => "Video",
            SequenceKind::Image => "Image",
        }
    }

    /// Parse the persisted spelling. Unknown strings fall back to `Video`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Image" => SequenceKind::Image,
            _ => SequenceKind::Video,
        }
    }
}

/// One media sequence with its annotation tracks.
#[derive(Debug, Clone)]
pub struct Sequence {
    path: String,
    decoder: String,
    kind: SequenceKind,
    length: VideoTime,
    tracks: Vec<Track>,
}

impl Sequence {
    pub fn new(
        path: impl Into<String>,
        decoder: impl Into<String>,
        kind: SequenceKind,
        length: VideoTime,
    ) -> Self {
        Self {
            path: path.into(),
            decoder: decoder.into(),
            kind,
            length,
            tracks: Vec::new(),
        }
    }

    /// Opaque locator of the underlying media.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn decoder(&self) -> &str {
        &self.decoder
    }

    pub fn set_decoder(&mut self, decoder: impl Into<String>) {
        self.decoder = decoder.into();
    }

    pub fn kind(&self) -> SequenceKind {
        self.kind
    }

    /// Timeline length in frames.
    pub fn length(&self) -> VideoTime {
        self.length
    }

    pub fn total_tracks(&self) -> usize {
        self.tracks.len()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Track instantiating `header`, if any.
    pub fn track(&self, header: HeaderId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.header() == header)
    }

    pub fn track_mut(&mut self, header: HeaderId) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.header() == header)
    }

    pub(crate) fn append_track(&mut self, track: Track) -> &mut Track {
        self.tracks.push(track);
        self.tracks.last_mut().expect("just pushed")
    }

    pub(crate) fn remove_track(&mut self, header: HeaderId) {
        self.tracks.retain(|t| t.header() != header);
    }

    pub(crate) fn clear_tracks(&mut self) {
        self.tracks.clear();
    }
}
