//! Cohen-Sutherland line clipping against an axis-aligned box.
//!
//! Model
//! - Each endpoint gets a 6-bit `Outcode`, one bit per violated face.
//! - `oc0 | oc1 == 0` accepts, `oc0 & oc1 != 0` rejects; otherwise the endpoint
//!   with a non-zero code (endpoint 0 first) is moved onto the first violated face
//!   in `CLIP_ORDER`, its code is recomputed, and the loop repeats.
//! - The clipped coordinate is written as the exact bound value, the two others
//!   are interpolated along the current segment.
//!
//! Guards
//! - Segments with a NaN or infinite coordinate are rejected up front.
//! - Face intersections are computed on coordinates rescaled by an exact power of
//!   two when they are large enough for `p1 - p0` to overflow, so wide finite
//!   segments clip like small ones.
//! - A zero denominator on the selected axis rejects. With a set bit the endpoint
//!   lies strictly outside and the other one does not, so this is unreachable for
//!   finite input after rescaling.
//! - More than `ClipCfg::max_steps` subdivisions rejects.

use std::ops::{BitAnd, BitOr, BitOrAssign};

use crate::clip::{ClipOutcome, LineClipper};
use crate::geom3::{overflow_scale, Axis, Box3, ClipCfg, Point3, Segment3};

/// Region code of a point relative to a box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Outcode(u8);

impl Outcode {
    pub const INSIDE: Outcode = Outcode(0);
    pub const LEFT: Outcode = Outcode(1);
    pub const RIGHT: Outcode = Outcode(2);
    pub const BOTTOM: Outcode = Outcode(4);
    pub const TOP: Outcode = Outcode(8);
    pub const NEAR: Outcode = Outcode(16);
    pub const FAR: Outcode = Outcode(32);

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }
    #[inline]
    pub const fn is_inside(self) -> bool {
        self.0 == 0
    }
    #[inline]
    pub const fn intersects(self, other: Outcode) -> bool {
        self.0 & other.0 != 0
    }
    #[inline]
    pub const fn has(self, face: Face) -> bool {
        self.intersects(face.code())
    }
}

impl BitOr for Outcode {
    type Output = Outcode;
    #[inline]
    fn bitor(self, rhs: Outcode) -> Outcode {
        Outcode(self.0 | rhs.0)
    }
}

impl BitOrAssign for Outcode {
    #[inline]
    fn bitor_assign(&mut self, rhs: Outcode) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Outcode {
    type Output = Outcode;
    #[inline]
    fn bitand(self, rhs: Outcode) -> Outcode {
        Outcode(self.0 & rhs.0)
    }
}

/// One of the six box faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    Left,
    Right,
    Bottom,
    Top,
    Near,
    Far,
}

impl Face {
    #[inline]
    pub const fn code(self) -> Outcode {
        match self {
            Face::Left => Outcode::LEFT,
            Face::Right => Outcode::RIGHT,
            Face::Bottom => Outcode::BOTTOM,
            Face::Top => Outcode::TOP,
            Face::Near => Outcode::NEAR,
            Face::Far => Outcode::FAR,
        }
    }
    #[inline]
    pub const fn axis(self) -> Axis {
        match self {
            Face::Left | Face::Right => Axis::X,
            Face::Bottom | Face::Top => Axis::Y,
            Face::Near | Face::Far => Axis::Z,
        }
    }
    /// Coordinate of this face along its axis.
    #[inline]
    pub fn bound(self, bounds: &Box3) -> f64 {
        match self {
            Face::Left | Face::Bottom | Face::Near => bounds.lo(self.axis()),
            Face::Right | Face::Top | Face::Far => bounds.hi(self.axis()),
        }
    }
}

/// Order in which violated faces are clipped; the first set bit wins.
pub const CLIP_ORDER: [Face; 6] = [
    Face::Top,
    Face::Bottom,
    Face::Right,
    Face::Left,
    Face::Far,
    Face::Near,
];

/// Classify `p` against `bounds`. Boundary points are inside.
pub fn outcode(p: &Point3, bounds: &Box3) -> Outcode {
    let (lo, hi) = (bounds.min(), bounds.max());
    let mut code = Outcode::INSIDE;
    if p.x < lo.x {
        code |= Outcode::LEFT;
    } else if p.x > hi.x {
        code |= Outcode::RIGHT;
    }
    if p.y < lo.y {
        code |= Outcode::BOTTOM;
    } else if p.y > hi.y {
        code |= Outcode::TOP;
    }
    if p.z < lo.z {
        code |= Outcode::NEAR;
    } else if p.z > hi.z {
        code |= Outcode::FAR;
    }
    code
}

/// Clip `segment` to `bounds` with default guards.
pub fn clip(segment: &Segment3, bounds: &Box3) -> ClipOutcome {
    clip_with_cfg(segment, bounds, &ClipCfg::default())
}

pub fn clip_with_cfg(segment: &Segment3, bounds: &Box3, cfg: &ClipCfg) -> ClipOutcome {
    if !segment.is_finite() {
        tracing::debug!(?segment, "cohen-sutherland non-finite endpoint");
        return ClipOutcome::Rejected;
    }
    let (mut p0, mut p1) = (segment.p0, segment.p1);
    let mut oc0 = outcode(&p0, bounds);
    let mut oc1 = outcode(&p1, bounds);
    let mut steps = 0usize;
    loop {
        if (oc0 | oc1).is_inside() {
            return ClipOutcome::Accepted(Segment3::new(p0, p1));
        }
        if oc0.intersects(oc1) {
            return ClipOutcome::Rejected;
        }
        if steps == cfg.max_steps {
            tracing::debug!(max_steps = cfg.max_steps, "cohen-sutherland step guard tripped");
            return ClipOutcome::Rejected;
        }
        steps += 1;

        let move_first = !oc0.is_inside();
        let out = if move_first { oc0 } else { oc1 };
        let Some(face) = first_violated(out) else {
            return ClipOutcome::Rejected;
        };
        let Some(p) = intersect_face(&p0, &p1, face, bounds) else {
            tracing::debug!(?face, "cohen-sutherland zero denominator");
            return ClipOutcome::Rejected;
        };
        if move_first {
            p0 = p;
            oc0 = outcode(&p0, bounds);
        } else {
            p1 = p;
            oc1 = outcode(&p1, bounds);
        }
    }
}

fn first_violated(code: Outcode) -> Option<Face> {
    CLIP_ORDER.iter().copied().find(|&f| code.has(f))
}

/// Point where the line `p0 → p1` crosses `face`; `None` if parallel to it.
fn intersect_face(p0: &Point3, p1: &Point3, face: Face, bounds: &Box3) -> Option<Point3> {
    let i = face.axis().index();
    let bound = face.bound(bounds);
    let s = overflow_scale(p0.amax().max(p1.amax()).max(bound.abs()));
    let (q0, q1) = (p0 * s, p1 * s);
    let denom = q1[i] - q0[i];
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    let t = (bound * s - q0[i]) / denom;
    let mut p = (q0 + (q1 - q0) * t) / s;
    p[i] = bound;
    Some(p)
}

/// Cohen-Sutherland bound to one box.
#[derive(Clone, Copy, Debug)]
pub struct CohenSutherland {
    pub bounds: Box3,
    pub cfg: ClipCfg,
}

impl CohenSutherland {
    pub fn new(bounds: Box3) -> Self {
        Self {
            bounds,
            cfg: ClipCfg::default(),
        }
    }
}

impl LineClipper for CohenSutherland {
    fn name(&self) -> &'static str {
        "cohen-sutherland"
    }
    fn clip(&self, segment: &Segment3) -> ClipOutcome {
        clip_with_cfg(segment, &self.bounds, &self.cfg)
    }
}
