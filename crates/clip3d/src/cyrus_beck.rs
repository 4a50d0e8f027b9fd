//! Cyrus-Beck parametric clipping against an ordered list of half-spaces.
//!
//! Model
//! - The segment is `p0 + t·D`, `D = p1 - p0`, starting with `[t0, t1] = [0, 1]`.
//! - For each plane `n·p >= d`: `denom = n·D`, `num = n·p0 - d`.
//!   `denom > 0` enters the half-space and raises `t0` to `-num/denom`;
//!   `denom < 0` leaves it and lowers `t1` to `-num/denom`;
//!   `denom == 0` is parallel: `num < 0` (strictly outside) rejects at once.
//! - Accept iff `t0 < t1`. A single-point interval (`t0 == t1`) is rejected.
//! - Both clipped endpoints are evaluated from the original `p0` and `D`.
//!
//! A degenerate segment only ever takes the parallel branch, so no division
//! happens and the point is accepted iff it lies in every half-space.
//!
//! Numerics
//! - Segments with a NaN or infinite coordinate are rejected.
//! - Endpoints large enough for `p1 - p0` to overflow are rescaled by an exact
//!   power of two first; `t` is scale-invariant.
//! - The interval lives in `t`, so a visible part shorter than about
//!   `1e-16 · |p1 - p0|` collapses to `t0 == t1` and is rejected. Cohen-Sutherland
//!   works in coordinates and keeps such parts.

use crate::clip::{ClipOutcome, LineClipper};
use crate::geom3::{Box3, ConvexVolume, Plane3, Segment3};

/// Visible parameter range `(t0, t1)` with `0 <= t0 < t1 <= 1`, or `None`.
///
/// `planes` is not validated; for a malformed set the result is well-defined
/// but not a meaningful clip.
pub fn parameter_interval(segment: &Segment3, planes: &[Plane3]) -> Option<(f64, f64)> {
    if !segment.is_finite() {
        tracing::trace!(?segment, "non-finite endpoint");
        return None;
    }
    let scale = segment.overflow_scale();
    let q0 = segment.p0 * scale;
    let dir = segment.p1 * scale - q0;
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (index, plane) in planes.iter().enumerate() {
        let denom = plane.n.dot(&dir);
        let num = plane.n.dot(&q0) - plane.d * scale;
        if denom > 0.0 {
            let t = -num / denom;
            if t > t0 {
                t0 = t;
            }
        } else if denom < 0.0 {
            let t = -num / denom;
            if t < t1 {
                t1 = t;
            }
        } else if num < 0.0 {
            tracing::trace!(index, num, "parallel to a plane and outside it");
            return None;
        }
    }
    (t0 < t1).then_some((t0, t1))
}

/// Clip `segment` against the intersection of `planes`, visited in order.
pub fn clip(segment: &Segment3, planes: &[Plane3]) -> ClipOutcome {
    match parameter_interval(segment, planes) {
        Some((t0, t1)) => {
            ClipOutcome::Accepted(Segment3::new(segment.point_at(t0), segment.point_at(t1)))
        }
        None => ClipOutcome::Rejected,
    }
}

/// Cyrus-Beck bound to one validated volume.
#[derive(Clone, Debug)]
pub struct CyrusBeck {
    volume: ConvexVolume,
}

impl CyrusBeck {
    pub fn new(volume: ConvexVolume) -> Self {
        Self { volume }
    }
    #[inline]
    pub fn volume(&self) -> &ConvexVolume {
        &self.volume
    }
}

impl From<Box3> for CyrusBeck {
    fn from(b: Box3) -> Self {
        Self::new(ConvexVolume::from(b))
    }
}

impl LineClipper for CyrusBeck {
    fn name(&self) -> &'static str {
        "cyrus-beck"
    }
    fn clip(&self, segment: &Segment3) -> ClipOutcome {
        clip(segment, self.volume.planes())
    }
}
