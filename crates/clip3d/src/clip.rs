//! Shared clip result type and the clipper capability trait.

use crate::geom3::Segment3;

/// Result of clipping one segment: the visible part, or nothing to draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClipOutcome {
    Accepted(Segment3),
    Rejected,
}

impl ClipOutcome {
    #[inline]
    pub fn is_accepted(&self) -> bool {
        matches!(self, ClipOutcome::Accepted(_))
    }
    #[inline]
    pub fn segment(&self) -> Option<Segment3> {
        match *self {
            ClipOutcome::Accepted(s) => Some(s),
            ClipOutcome::Rejected => None,
        }
    }
}

impl From<Option<Segment3>> for ClipOutcome {
    fn from(value: Option<Segment3>) -> Self {
        value.map_or(ClipOutcome::Rejected, ClipOutcome::Accepted)
    }
}

/// A clipper bound to a fixed volume.
///
/// Implementations are pure: the same segment always yields the same outcome,
/// and `&self` is never mutated, so one clipper can be shared across threads.
pub trait LineClipper {
    /// Short algorithm name for reports and logs.
    fn name(&self) -> &'static str;

    fn clip(&self, segment: &Segment3) -> ClipOutcome;
}
