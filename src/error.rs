//! Error types shared across the crate.
//!
//! Every fallible operation surfaces one of these kinds synchronously at the
//! call site. Miss and Unmarked assertion *outcomes* are not errors; they are
//! regular results recorded in the assertion log.

use crate::VideoTime;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// One variant per failure class.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed persistence payload. `path` names the offending node
    /// (e.g. `TeGround.Sequences.Tracks`).
    #[error("parse error at '{path}': {message}")]
    Parse { path: String, message: String },

    /// Track type tag not present in the data file's type registry.
    #[error("unknown track type '{0}'")]
    UnknownTrackType(String),

    /// A component was handed a track of the wrong kind, e.g. a segment
    /// evaluator attached to a non-segment header.
    #[error("track type mismatch: got '{got}', expected '{want}'")]
    TypeMismatch { got: String, want: String },

    /// A position or index fell outside its valid range.
    #[error("{context} out of bounds: {value} (limit {limit})")]
    OutOfBounds {
        context: &'static str,
        value: i64,
        limit: i64,
    },

    /// The cursor only moves forward, across both positions and sequences.
    #[error("cannot move cursor backwards: {from} -> {to}")]
    CursorBackwards { from: i64, to: i64 },

    /// Mutation attempted after the cursor passed the last sequence.
    #[error("cursor is past the last sequence")]
    CursorAtEnd,

    /// A result file referenced a segment the data file does not contain.
    #[error("segment ({position}, {length}) not found in data file")]
    SegmentNotFound {
        position: VideoTime,
        length: VideoTime,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Shorthand used by the persistence layer.
    pub(crate) fn parse(path: &str, message: impl Into<String>) -> Self {
        Error::Parse {
            path: path.to_string(),
            message: message.into(),
        }
    }
}
