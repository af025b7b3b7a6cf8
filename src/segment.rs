//! Segment: one interval annotation `[position, position + length)`.

use serde::{Deserialize, Serialize};

use crate::VideoTime;

/// Stable identity of a segment inside its track.
///
/// Identity is by entity, not by coordinates: two segments with identical
/// `(position, length)` are distinct. Ids are allocated by the owning
/// [`SegmentTrack`](crate::SegmentTrack) on insertion and survive
/// canonical-order repair, so assertion back-references stay attached to the
/// same segment entity across reorderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentId(pub(crate) u64);

/// Interval annotation with an opaque payload.
#[derive(Debug, Clone)]
pub struct Segment {
    pub(crate) id: SegmentId,
    pub(crate) position: VideoTime,
    pub(crate) length: VideoTime,
    data: String,
}

impl Segment {
    /// Create a segment at `position` with the default length of 10 frames.
    pub fn new(position: VideoTime) -> Self {
        Self::with_length(position, 10)
    }

    pub fn with_length(position: VideoTime, length: VideoTime) -> Self {
        Self {
            id: SegmentId(0),
            position,
            length,
            data: String::new(),
        }
    }

    pub fn with_data(position: VideoTime, length: VideoTime, data: impl Into<String>) -> Self {
        Self {
            id: SegmentId(0),
            position,
            length,
            data: data.into(),
        }
    }

    /// Identity inside the owning track. Segments that were never inserted
    /// into a track all carry the reserved id 0.
    pub fn id(&self) -> SegmentId {
        self.id
    }

    pub fn position(&self) -> VideoTime {
        self.position
    }

    pub fn length(&self) -> VideoTime {
        self.length
    }

    /// First frame past the segment.
    pub fn end(&self) -> VideoTime {
        self.position + self.length
    }

    /// Opaque payload, may be empty.
    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn set_data(&mut self, data: impl Into<String>) {
        self.data = data.into();
    }

    /// Whether `position` falls inside `[position, position + length)`.
    pub fn contains(&self, position: VideoTime) -> bool {
        self.position <= position && position < self.end()
    }
}
