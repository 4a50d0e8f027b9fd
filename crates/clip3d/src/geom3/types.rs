//! Core 3D types: points, segments, axis-aligned boxes and half-spaces.

use std::fmt;

use nalgebra::Vector3;

use super::util::overflow_scale;
use super::volume::VolumeError;

/// Point (or free vector) in R^3.
pub type Point3 = Vector3<f64>;

/// Coordinate axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index into a `Point3`.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Directed line segment `p0 → p1`, parametrized as `p0 + t·(p1 - p0)` for `t ∈ [0, 1]`.
///
/// A segment with `p0 == p1` is degenerate; every clipper accepts it as input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment3 {
    pub p0: Point3,
    pub p1: Point3,
}

impl Segment3 {
    #[inline]
    pub fn new(p0: Point3, p1: Point3) -> Self {
        Self { p0, p1 }
    }
    #[inline]
    pub fn direction(&self) -> Vector3<f64> {
        self.p1 - self.p0
    }
    /// Point at parameter `t`, always measured from the stored `p0`.
    ///
    /// Evaluated in rescaled coordinates when `p1 - p0` would overflow.
    #[inline]
    pub fn point_at(&self, t: f64) -> Point3 {
        let s = self.overflow_scale();
        let (q0, q1) = (self.p0 * s, self.p1 * s);
        (q0 + (q1 - q0) * t) / s
    }
    /// Both endpoints have finite coordinates.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.p0.iter().chain(self.p1.iter()).all(|c| c.is_finite())
    }
    /// Factor applied to both endpoints before differencing; `1.0` unless huge.
    #[inline]
    pub(crate) fn overflow_scale(&self) -> f64 {
        overflow_scale(self.p0.amax().max(self.p1.amax()))
    }
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.p0 == self.p1
    }
    #[inline]
    pub fn length(&self) -> f64 {
        self.direction().norm()
    }
    /// Endpoint-wise comparison with tolerance (orientation matters).
    pub fn approx_eq(&self, other: &Segment3, eps: f64) -> bool {
        (self.p0 - other.p0).amax() <= eps && (self.p1 - other.p1).amax() <= eps
    }
}

/// Closed half-space `n · p >= d`; points with `n · p < d` are outside.
///
/// Invariants:
/// - `n` is not normalized; all planes of one volume share this sign convention.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane3 {
    pub n: Vector3<f64>,
    pub d: f64,
}

impl Plane3 {
    #[inline]
    pub fn new(n: Vector3<f64>, d: f64) -> Self {
        Self { n, d }
    }
    /// `n · p - d`; non-negative inside, scaled by `|n|`.
    #[inline]
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        self.n.dot(p) - self.d
    }
    #[inline]
    pub fn contains(&self, p: &Point3) -> bool {
        self.signed_distance(p) >= 0.0
    }
    #[inline]
    pub fn contains_eps(&self, p: &Point3, eps: f64) -> bool {
        self.signed_distance(p) >= -eps
    }
}

/// Axis-aligned box `[min.x, max.x] × [min.y, max.y] × [min.z, max.z]`.
///
/// Invariants (checked by the constructors):
/// - all bounds finite;
/// - `min[i] <= max[i]` on every axis (flat boxes are allowed).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Box3 {
    min: Point3,
    max: Point3,
}

impl Box3 {
    pub fn new(min: Point3, max: Point3) -> Result<Self, VolumeError> {
        if !(min.iter().all(|c| c.is_finite()) && max.iter().all(|c| c.is_finite())) {
            return Err(VolumeError::NonFinite);
        }
        for axis in Axis::ALL {
            let i = axis.index();
            if min[i] > max[i] {
                return Err(VolumeError::InvertedBounds {
                    axis,
                    min: min[i],
                    max: max[i],
                });
            }
        }
        Ok(Self { min, max })
    }

    /// Construct from the six bounds in `xmin, xmax, ymin, ymax, zmin, zmax` order.
    pub fn from_bounds(
        xmin: f64,
        xmax: f64,
        ymin: f64,
        ymax: f64,
        zmin: f64,
        zmax: f64,
    ) -> Result<Self, VolumeError> {
        Self::new(
            Point3::new(xmin, ymin, zmin),
            Point3::new(xmax, ymax, zmax),
        )
    }

    #[inline]
    pub fn min(&self) -> Point3 {
        self.min
    }
    #[inline]
    pub fn max(&self) -> Point3 {
        self.max
    }
    #[inline]
    pub fn lo(&self, axis: Axis) -> f64 {
        self.min[axis.index()]
    }
    #[inline]
    pub fn hi(&self, axis: Axis) -> f64 {
        self.max[axis.index()]
    }

    /// Closed-box membership (boundary counts as inside).
    pub fn contains(&self, p: &Point3) -> bool {
        Axis::ALL.iter().all(|&a| {
            let c = p[a.index()];
            c >= self.lo(a) && c <= self.hi(a)
        })
    }

    pub fn contains_eps(&self, p: &Point3, eps: f64) -> bool {
        Axis::ALL.iter().all(|&a| {
            let c = p[a.index()];
            c >= self.lo(a) - eps && c <= self.hi(a) + eps
        })
    }

    /// The six bounding half-spaces, ordered left, right, bottom, top, near, far.
    pub fn to_planes(&self) -> [Plane3; 6] {
        [
            Plane3::new(Vector3::new(1.0, 0.0, 0.0), self.min.x),
            Plane3::new(Vector3::new(-1.0, 0.0, 0.0), -self.max.x),
            Plane3::new(Vector3::new(0.0, 1.0, 0.0), self.min.y),
            Plane3::new(Vector3::new(0.0, -1.0, 0.0), -self.max.y),
            Plane3::new(Vector3::new(0.0, 0.0, 1.0), self.min.z),
            Plane3::new(Vector3::new(0.0, 0.0, -1.0), -self.max.z),
        ]
    }
}
