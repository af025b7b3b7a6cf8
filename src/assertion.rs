//! Assertion records and the subscriber interface.
//!
//! A `SegmentAssertion` is the immutable outcome of one evaluation. The
//! assertion log owns them; the optional segment back-reference is a stable
//! id into the evaluated track, valid for the assertion's lifetime because
//! the data file outlives the test.

use std::rc::Rc;

use crate::segment::SegmentId;
use crate::sequence::Sequence;
use crate::VideoTime;

/// Outcome class of an assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertionResult {
    Match,
    Miss,
    Unmarked,
}

impl AssertionResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssertionResult::Match => "Match",
            AssertionResult::Miss => "Miss",
            AssertionResult::Unmarked => "Unmarked",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Match" => Some(AssertionResult::Match),
            "Miss" => Some(AssertionResult::Miss),
            "Unmarked" => Some(AssertionResult::Unmarked),
            _ => None,
        }
    }
}

/// What produced an assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertionKind {
    SingleStamp,
    MultiStamp,
    SingleOverlap,
    MultiOverlap,
    UnmarkedSegment,
}

impl AssertionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssertionKind::SingleStamp => "SingleStamp",
            AssertionKind::MultiStamp => "MultiStamp",
            AssertionKind::SingleOverlap => "SingleOverlap",
            AssertionKind::MultiOverlap => "MultiOverlap",
            AssertionKind::UnmarkedSegment => "Unmarked",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SingleStamp" => Some(AssertionKind::SingleStamp),
            "MultiStamp" => Some(AssertionKind::MultiStamp),
            "SingleOverlap" => Some(AssertionKind::SingleOverlap),
            "MultiOverlap" => Some(AssertionKind::MultiOverlap),
            "Unmarked" => Some(AssertionKind::UnmarkedSegment),
            _ => None,
        }
    }
}

/// Source location of the call that produced an assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub file: String,
    pub line: u32,
}

/// Immutable record of one classified evaluation.
#[derive(Debug, Clone)]
pub struct SegmentAssertion {
    position: VideoTime,
    length: VideoTime,
    result: AssertionResult,
    kind: AssertionKind,
    info: String,
    call_site: Option<CallSite>,
    segment: Option<SegmentId>,
}

impl SegmentAssertion {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        position: VideoTime,
        length: VideoTime,
        result: AssertionResult,
        kind: AssertionKind,
        info: &str,
        file: &str,
        line: u32,
        segment: Option<SegmentId>,
    ) -> Self {
        let call_site = if file.is_empty() {
            None
        } else {
            Some(CallSite {
                file: file.to_string(),
                line,
            })
        };
        Self {
            position,
            length,
            result,
            kind,
            info: info.to_string(),
            call_site,
            segment,
        }
    }

    pub fn position(&self) -> VideoTime {
        self.position
    }

    pub fn length(&self) -> VideoTime {
        self.length
    }

    pub fn result(&self) -> AssertionResult {
        self.result
    }

    pub fn kind(&self) -> AssertionKind {
        self.kind
    }

    pub fn has_info(&self) -> bool {
        !self.info.is_empty()
    }

    pub fn info(&self) -> &str {
        &self.info
    }

    pub fn call_site(&self) -> Option<&CallSite> {
        self.call_site.as_ref()
    }

    /// Back-reference to the matched or swept segment, if any.
    pub fn segment(&self) -> Option<SegmentId> {
        self.segment
    }

    pub fn has_segment(&self) -> bool {
        self.segment.is_some()
    }
}

/// Handle returned by `add_subscriber`, used to deregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberId(pub(crate) u64);

/// Sink for assertion notifications.
///
/// Called synchronously from within the evaluator, in registration order,
/// before the triggering operation returns. Implementations needing state
/// use interior mutability; panics propagate to the caller but the log is
/// already updated and stays consistent.
pub trait SegmentAssertionSubscriber {
    /// The cursor entered a new sequence.
    fn on_sequence_set(&self, _sequence: &Sequence) {}

    /// An assertion was inserted into the log. Delivered in call order,
    /// regardless of the assertion's final position in the log.
    fn on_assertion_insert(&self, assertion: &SegmentAssertion);
}

/// Shared-ownership handle to a subscriber. The lifetime admits subscribers
/// that borrow the evaluated data file, such as the console writer.
pub type SubscriberHandle<'a> = Rc<dyn SegmentAssertionSubscriber + 'a>;
