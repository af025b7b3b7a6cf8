//! DataFile: the full annotation set (sequences plus track headers).
//!
//! Every sequence holds exactly one track per registered header; all
//! mutations below re-establish that correspondence atomically. Header and
//! sequence order are preserved across persistence round-trips.

use std::path::Path;

use log::{debug, info};

use crate::error::{Error, Result};
use crate::format;
use crate::sequence::Sequence;
use crate::track::{HeaderId, TrackHeader, TrackTypeRegistry};

/// Annotation data for a set of media sequences.
///
/// Owns the track-type registry (instance-scoped; the built-in `"Segment"`
/// kind is pre-registered), the ordered header list, and the ordered
/// sequence list.
#[derive(Debug, Clone)]
pub struct DataFile {
    sequences: Vec<Sequence>,
    headers: Vec<TrackHeader>,
    registry: TrackTypeRegistry,
    next_header_id: u64,
}

impl DataFile {
    pub fn new() -> Self {
        Self {
            sequences: Vec::new(),
            headers: Vec::new(),
            registry: TrackTypeRegistry::default(),
            next_header_id: 0,
        }
    }

    /// The track-type registry. Additional kinds can be registered before
    /// headers of that type are appended.
    pub fn registry_mut(&mut self) -> &mut TrackTypeRegistry {
        &mut self.registry
    }

    pub fn registry(&self) -> &TrackTypeRegistry {
        &self.registry
    }

    // Track headers
    // -------------

    pub fn track_count(&self) -> usize {
        self.headers.len()
    }

    pub fn headers(&self) -> &[TrackHeader] {
        &self.headers
    }

    pub fn header_at(&self, index: usize) -> Option<&TrackHeader> {
        self.headers.get(index)
    }

    pub fn header(&self, id: HeaderId) -> Option<&TrackHeader> {
        self.headers.iter().find(|h| h.id() == id)
    }

    /// First header with the given name, if any. Names are not unique;
    /// identity is the id.
    pub fn header_by_name(&self, name: &str) -> Option<&TrackHeader> {
        self.headers.iter().find(|h| h.name() == name)
    }

    /// Position of `id` in the header list, or `track_count()` when absent.
    pub fn track_index(&self, id: HeaderId) -> usize {
        self.headers
            .iter()
            .position(|h| h.id() == id)
            .unwrap_or(self.headers.len())
    }

    /// Register a header of the given type; every existing sequence grows a
    /// matching empty track. Returns the new header's identity.
    pub fn append_track(&mut self, type_tag: &str, name: &str) -> Result<HeaderId> {
        if !self.registry.has_type(type_tag) {
            return Err(Error::UnknownTrackType(type_tag.to_string()));
        }
        let id = HeaderId(self.next_header_id);
        self.next_header_id += 1;
        self.headers.push(TrackHeader::new(id, type_tag, name));

        for seq in &mut self.sequences {
            let track = self
                .registry
                .make(type_tag, id, seq.length())
                .ok_or_else(|| Error::UnknownTrackType(type_tag.to_string()))?;
            seq.append_track(track);
        }
        debug!("appended track header '{name}' ({type_tag})");
        Ok(id)
    }

    /// Drop a header; every sequence loses its matching track.
    pub fn remove_track(&mut self, id: HeaderId) {
        for seq in &mut self.sequences {
            seq.remove_track(id);
        }
        self.headers.retain(|h| h.id() != id);
    }

    pub fn clear_tracks(&mut self) {
        for seq in &mut self.sequences {
            seq.clear_tracks();
        }
        self.headers.clear();
    }

    // Sequences
    // ---------

    pub fn sequence_count(&self) -> usize {
        self.sequences.len()
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn sequence_at(&self, index: usize) -> Option<&Sequence> {
        self.sequences.get(index)
    }

    pub fn sequence_at_mut(&mut self, index: usize) -> Option<&mut Sequence> {
        self.sequences.get_mut(index)
    }

    /// Take ownership of `seq`; any pre-existing tracks are cleared and one
    /// fresh track per registered header is attached. Order is append.
    pub fn append_sequence(&mut self, mut seq: Sequence) -> Result<usize> {
        seq.clear_tracks();
        for header in &self.headers {
            let track = self
                .registry
                .make(header.type_tag(), header.id(), seq.length())
                .ok_or_else(|| Error::UnknownTrackType(header.type_tag().to_string()))?;
            seq.append_track(track);
        }
        self.sequences.push(seq);
        Ok(self.sequences.len() - 1)
    }

    /// Remove and drop the sequence at `index`. No-op past the end.
    pub fn remove_sequence(&mut self, index: usize) {
        if index < self.sequences.len() {
            self.sequences.remove(index);
        }
    }

    /// Detach the sequence at `index` without destroying it.
    pub fn take_sequence(&mut self, index: usize) -> Option<Sequence> {
        if index < self.sequences.len() {
            Some(self.sequences.remove(index))
        } else {
            None
        }
    }

    /// Stable reorder: move the sequence at `from` so it lands at `to`.
    pub fn move_sequence(&mut self, from: usize, to: usize) {
        if from == to || from >= self.sequences.len() || to >= self.sequences.len() {
            return;
        }
        let seq = self.sequences.remove(from);
        self.sequences.insert(to, seq);
    }

    /// First sequence whose path matches (linear scan).
    pub fn sequence_from(&self, path: &str) -> Option<&Sequence> {
        self.sequences.iter().find(|s| s.path() == path)
    }

    /// Index of the first sequence whose path matches.
    pub fn sequence_index_from(&self, path: &str) -> Option<usize> {
        self.sequences.iter().position(|s| s.path() == path)
    }

    pub fn clear_sequences(&mut self) {
        self.sequences.clear();
    }

    // Persistence
    // -----------

    /// Read annotations from a YAML file, replacing the current contents.
    pub fn read_from(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let doc = format::parse_data_file(&text)?;
        *self = Self::from_doc(&doc)?;
        info!(
            "loaded data file: {} headers, {} sequences",
            self.track_count(),
            self.sequence_count()
        );
        Ok(())
    }

    /// Write annotations to a YAML file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = format::render_data_file(&self.to_doc())?;
        std::fs::write(path.as_ref(), text)?;
        Ok(())
    }

    /// Rebuild a data file from its persisted document form.
    pub fn from_doc(doc: &format::DataFileDoc) -> Result<Self> {
        let mut data = DataFile::new();

        for header_doc in &doc.tracks {
            if !data.registry.has_type(&header_doc.type_tag) {
                return Err(Error::UnknownTrackType(header_doc.type_tag.clone()));
            }
            data.append_track(&header_doc.type_tag, &header_doc.name)?;
        }

        for seq_doc in &doc.sequences {
            let mut seq = Sequence::new(
                &seq_doc.path,
                &seq_doc.decoder,
                crate::SequenceKind::from_name(&seq_doc.kind),
                seq_doc.length,
            );
            // Attach a track per referenced header, then fill it from the
            // document. append_sequence would attach one per header in
            // header order; the file's own references win here so a partial
            // file round-trips unchanged.
            for track_doc in &seq_doc.tracks {
                let header = data.header_at(track_doc.header).ok_or(Error::OutOfBounds {
                    context: "header index",
                    value: track_doc.header as i64,
                    limit: data.track_count() as i64,
                })?;
                let mut track = data
                    .registry
                    .make(header.type_tag(), header.id(), seq.length())
                    .ok_or_else(|| Error::UnknownTrackType(header.type_tag().to_string()))?;
                format::fill_track(&mut track, track_doc)?;
                seq.append_track(track);
            }
            data.sequences.push(seq);
        }

        Ok(data)
    }

    /// Document form of the current contents.
    pub fn to_doc(&self) -> format::DataFileDoc {
        format::DataFileDoc {
            tracks: self
                .headers
                .iter()
                .map(|h| format::HeaderDoc {
                    name: h.name().to_string(),
                    type_tag: h.type_tag().to_string(),
                })
                .collect(),
            sequences: self
                .sequences
                .iter()
                .map(|seq| format::SequenceDoc {
                    path: seq.path().to_string(),
                    kind: seq.kind().as_str().to_string(),
                    length: seq.length(),
                    decoder: seq.decoder().to_string(),
                    tracks: seq
                        .tracks()
                        .iter()
                        .map(|t| format::track_doc(t, self.track_index(t.header())))
                        .collect(),
                })
                .collect(),
        }
    }

    // Convenience for the common case: the segment track of one sequence.

    /// Segment track of `header` in the sequence at `seq_index`.
    pub fn segment_track(
        &self,
        seq_index: usize,
        header: HeaderId,
    ) -> Option<&crate::SegmentTrack> {
        self.sequence_at(seq_index)?.track(header)?.as_segment()
    }

    /// Mutable segment track of `header` in the sequence at `seq_index`.
    pub fn segment_track_mut(
        &mut self,
        seq_index: usize,
        header: HeaderId,
    ) -> Option<&mut crate::SegmentTrack> {
        self.sequence_at_mut(seq_index)?
            .track_mut(header)?
            .as_segment_mut()
    }
}

impl Default for DataFile {
    fn default() -> Self {
        Self::new()
    }
}
