//! Validated convex clip volumes (ordered half-space lists).
//!
//! Purpose
//! - Give Cyrus-Beck a volume type that is known to be a closed, bounded,
//!   non-empty convex region, so malformed input fails at construction time
//!   instead of silently producing a meaningless clip.
//!
//! Checks (in order)
//! - at least one plane, all coefficients finite, no zero normals;
//! - bounded: the normals span R^3 and the recession cone `{v : n_i·v >= 0}` is
//!   `{0}`. For a pointed cone every extreme ray is `±(n_i × n_j)` for some pair,
//!   so testing those candidates is exact up to `eps`;
//! - non-empty: some triple of planes meets in a feasible vertex.
//!
//! Plane order is preserved as given; Cyrus-Beck visits planes in this order.

use std::f64::consts::PI;
use std::fmt;

use nalgebra::{Matrix3, Vector3};

use super::cfg::{ClipCfg, FEAS_EPS, RANK_EPS};
use super::types::{Axis, Box3, Plane3, Point3};
use super::util::{dedup_points_in_place, pairs, triples};

/// Errors raised while constructing a clip volume.
#[derive(Debug, Clone, PartialEq)]
pub enum VolumeError {
    /// A bound or plane coefficient is NaN or infinite.
    NonFinite,
    /// Box bounds with `min > max` on one axis.
    InvertedBounds { axis: Axis, min: f64, max: f64 },
    /// Empty half-space list.
    NoPlanes,
    /// Plane `index` has a (numerically) zero normal.
    ZeroNormal { index: usize },
    /// The half-spaces leave a direction of unbounded extent.
    Unbounded,
    /// The half-spaces have no common point.
    Empty,
    /// Perspective frustum parameters out of range.
    InvalidFrustum { reason: String },
}

impl fmt::Display for VolumeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeError::NonFinite => write!(f, "volume has non-finite coefficients"),
            VolumeError::InvertedBounds { axis, min, max } => {
                write!(f, "box bounds inverted on {axis} axis: min {min} > max {max}")
            }
            VolumeError::NoPlanes => write!(f, "volume has no half-spaces"),
            VolumeError::ZeroNormal { index } => {
                write!(f, "half-space {index} has a zero normal")
            }
            VolumeError::Unbounded => write!(f, "half-spaces do not enclose a bounded region"),
            VolumeError::Empty => write!(f, "half-spaces have an empty intersection"),
            VolumeError::InvalidFrustum { reason } => write!(f, "invalid frustum: {reason}"),
        }
    }
}

impl std::error::Error for VolumeError {}

/// Bounded, non-empty intersection of half-spaces `n·p >= d`.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvexVolume {
    planes: Vec<Plane3>,
}

impl ConvexVolume {
    /// Validate with the default feasibility slack.
    pub fn new(planes: Vec<Plane3>) -> Result<Self, VolumeError> {
        Self::with_cfg(planes, &ClipCfg::default())
    }

    /// Validate with `cfg.eps_feas` as the feasibility slack.
    pub fn with_cfg(planes: Vec<Plane3>, cfg: &ClipCfg) -> Result<Self, VolumeError> {
        if let Err(err) = validate(&planes, cfg.eps_feas) {
            tracing::debug!(planes = planes.len(), %err, "rejecting clip volume");
            return Err(err);
        }
        Ok(Self { planes })
    }

    /// Perspective view frustum in view space (camera at the origin looking down -Z),
    /// the volume `gluPerspective(fov_y, aspect, near, far)` would cull to.
    ///
    /// `fov_y` is the full vertical field of view in radians. Planes are ordered
    /// left, right, top, bottom, near, far.
    pub fn perspective(fov_y: f64, aspect: f64, near: f64, far: f64) -> Result<Self, VolumeError> {
        let invalid = |reason: &str| VolumeError::InvalidFrustum {
            reason: reason.to_string(),
        };
        if !(fov_y > 0.0 && fov_y < PI) {
            return Err(invalid("fov_y must lie in (0, π)"));
        }
        if !(aspect > 0.0 && aspect.is_finite()) {
            return Err(invalid("aspect must be positive and finite"));
        }
        if !(near > 0.0 && near < far && far.is_finite()) {
            return Err(invalid("need 0 < near < far < ∞"));
        }
        let half_y = fov_y / 2.0;
        // tan(fov_x / 2) = aspect * tan(fov_y / 2)
        let half_x = (aspect * half_y.tan()).atan();
        let (sx, cx) = half_x.sin_cos();
        let (sy, cy) = half_y.sin_cos();
        Self::new(vec![
            Plane3::new(Vector3::new(cx, 0.0, -sx), 0.0),
            Plane3::new(Vector3::new(-cx, 0.0, -sx), 0.0),
            Plane3::new(Vector3::new(0.0, -cy, -sy), 0.0),
            Plane3::new(Vector3::new(0.0, cy, -sy), 0.0),
            Plane3::new(Vector3::new(0.0, 0.0, -1.0), near),
            Plane3::new(Vector3::new(0.0, 0.0, 1.0), -far),
        ])
    }

    #[inline]
    pub fn planes(&self) -> &[Plane3] {
        &self.planes
    }

    /// Membership with the default slack.
    pub fn contains(&self, p: &Point3) -> bool {
        self.planes.iter().all(|h| h.contains_eps(p, FEAS_EPS))
    }

    /// Vertices of the polytope (triple-plane intersections that satisfy every plane).
    ///
    /// Complexity: O(H^4). Volumes here have a handful of planes.
    pub fn vertices(&self) -> Vec<Point3> {
        vertices_from_planes(&self.planes, FEAS_EPS)
    }
}

impl From<Box3> for ConvexVolume {
    /// A validated box is always bounded and non-empty.
    fn from(b: Box3) -> Self {
        Self {
            planes: b.to_planes().to_vec(),
        }
    }
}

fn validate(planes: &[Plane3], eps: f64) -> Result<(), VolumeError> {
    if planes.is_empty() {
        return Err(VolumeError::NoPlanes);
    }
    for (index, h) in planes.iter().enumerate() {
        if !(h.d.is_finite() && h.n.iter().all(|c| c.is_finite())) {
            return Err(VolumeError::NonFinite);
        }
        if h.n.norm() <= RANK_EPS {
            return Err(VolumeError::ZeroNormal { index });
        }
    }
    let units: Vec<Vector3<f64>> = planes.iter().map(|h| h.n.normalize()).collect();
    if !is_bounded(&units, eps) {
        return Err(VolumeError::Unbounded);
    }
    if vertices_from_planes(planes, eps).is_empty() {
        return Err(VolumeError::Empty);
    }
    Ok(())
}

fn is_bounded(units: &[Vector3<f64>], eps: f64) -> bool {
    // Rank 3 iff the Gram matrix Σ n nᵀ is positive definite.
    let gram = units
        .iter()
        .fold(Matrix3::zeros(), |acc, n| acc + n * n.transpose());
    let smallest = gram.symmetric_eigenvalues().min();
    if smallest <= RANK_EPS {
        return false;
    }
    for (i, j) in pairs(units.len()) {
        let ray = units[i].cross(&units[j]);
        let norm = ray.norm();
        if norm <= RANK_EPS {
            continue;
        }
        let ray = ray / norm;
        for candidate in [ray, -ray] {
            if units.iter().all(|n| n.dot(&candidate) >= -eps) {
                return false;
            }
        }
    }
    true
}

fn vertices_from_planes(planes: &[Plane3], eps: f64) -> Vec<Point3> {
    let mut out = Vec::new();
    for (i, j, k) in triples(planes.len()) {
        let (a, b, c) = (planes[i], planes[j], planes[k]);
        let m = Matrix3::from_rows(&[a.n.transpose(), b.n.transpose(), c.n.transpose()]);
        if m.determinant().abs() <= RANK_EPS {
            continue;
        }
        if let Some(inv) = m.try_inverse() {
            let x = inv * Vector3::new(a.d, b.d, c.d);
            if planes.iter().all(|h| h.contains_eps(&x, eps)) {
                out.push(x);
            }
        }
    }
    dedup_points_in_place(&mut out, eps);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    fn unit_cube() -> Box3 {
        Box3::from_bounds(0.0, 1.0, 0.0, 1.0, 0.0, 1.0).unwrap()
    }

    #[test]
    fn box_planes_form_valid_volume_with_eight_vertices() {
        let planes = unit_cube().to_planes().to_vec();
        let vol = ConvexVolume::new(planes).expect("cube is valid");
        assert_eq!(vol.vertices().len(), 8);
        assert!(vol.contains(&vector![0.5, 0.5, 0.5]));
        assert!(vol.contains(&vector![1.0, 0.0, 1.0]));
        assert!(!vol.contains(&vector![1.1, 0.5, 0.5]));
    }

    #[test]
    fn from_box_keeps_plane_order() {
        let b = Box3::from_bounds(0.0, 5.0, 0.0, 4.0, 0.0, 3.0).unwrap();
        let vol = ConvexVolume::from(b);
        assert_eq!(vol.planes(), &b.to_planes()[..]);
        assert_eq!(vol.planes()[1].d, -5.0);
    }

    #[test]
    fn rejects_malformed_plane_lists() {
        assert_eq!(ConvexVolume::new(vec![]), Err(VolumeError::NoPlanes));

        let mut planes = unit_cube().to_planes().to_vec();
        planes[2].n = Vector3::zeros();
        assert_eq!(
            ConvexVolume::new(planes),
            Err(VolumeError::ZeroNormal { index: 2 })
        );

        let mut planes = unit_cube().to_planes().to_vec();
        planes[0].d = f64::NAN;
        assert_eq!(ConvexVolume::new(planes), Err(VolumeError::NonFinite));
    }

    #[test]
    fn open_slab_and_cone_are_unbounded() {
        // Drop the far plane: the box opens towards +z.
        let planes = unit_cube().to_planes()[..5].to_vec();
        assert_eq!(ConvexVolume::new(planes), Err(VolumeError::Unbounded));

        // All normals in the xy-plane: z is free.
        let planes = unit_cube().to_planes()[..4].to_vec();
        assert_eq!(ConvexVolume::new(planes), Err(VolumeError::Unbounded));

        // Orthant x, y, z >= 0 plus a tilted cap x + y <= 1 leaves +z open.
        let planes = vec![
            Plane3::new(vector![1.0, 0.0, 0.0], 0.0),
            Plane3::new(vector![0.0, 1.0, 0.0], 0.0),
            Plane3::new(vector![0.0, 0.0, 1.0], 0.0),
            Plane3::new(vector![-1.0, -1.0, 0.0], -1.0),
        ];
        assert_eq!(ConvexVolume::new(planes), Err(VolumeError::Unbounded));
    }

    #[test]
    fn tetrahedron_is_valid() {
        let planes = vec![
            Plane3::new(vector![1.0, 0.0, 0.0], 0.0),
            Plane3::new(vector![0.0, 1.0, 0.0], 0.0),
            Plane3::new(vector![0.0, 0.0, 1.0], 0.0),
            Plane3::new(vector![-1.0, -1.0, -1.0], -1.0),
        ];
        let vol = ConvexVolume::new(planes).expect("simplex");
        assert_eq!(vol.vertices().len(), 4);
    }

    #[test]
    fn contradictory_planes_are_empty() {
        // x >= 2 and x <= 1 inside an otherwise closed box.
        let mut planes = unit_cube().to_planes().to_vec();
        planes[0] = Plane3::new(vector![1.0, 0.0, 0.0], 2.0);
        assert_eq!(ConvexVolume::new(planes), Err(VolumeError::Empty));
    }

    #[test]
    fn perspective_frustum_contains_points_on_the_view_axis() {
        let vol = ConvexVolume::perspective(60f64.to_radians(), 1.0, 1.0, 50.0).unwrap();
        assert_eq!(vol.planes().len(), 6);
        assert_eq!(vol.vertices().len(), 8);
        assert!(vol.contains(&vector![0.0, 0.0, -5.0]));
        // Behind the near plane and beyond the far plane.
        assert!(!vol.contains(&vector![0.0, 0.0, -0.5]));
        assert!(!vol.contains(&vector![0.0, 0.0, -51.0]));
        // tan(30°) * 10 ≈ 5.77: inside at 5.5, outside at 6.0.
        assert!(vol.contains(&vector![0.0, 5.5, -10.0]));
        assert!(!vol.contains(&vector![0.0, 6.0, -10.0]));
        assert!(!vol.contains(&vector![-6.0, 0.0, -10.0]));
    }

    #[test]
    fn perspective_rejects_bad_parameters() {
        assert!(matches!(
            ConvexVolume::perspective(0.0, 1.0, 1.0, 10.0),
            Err(VolumeError::InvalidFrustum { .. })
        ));
        assert!(matches!(
            ConvexVolume::perspective(1.0, -1.0, 1.0, 10.0),
            Err(VolumeError::InvalidFrustum { .. })
        ));
        assert!(matches!(
            ConvexVolume::perspective(1.0, 1.0, 10.0, 1.0),
            Err(VolumeError::InvalidFrustum { .. })
        ));
    }

    #[test]
    fn inverted_box_is_rejected() {
        let err = Box3::from_bounds(0.0, 5.0, 4.0, 0.0, 0.0, 3.0).unwrap_err();
        assert_eq!(
            err,
            VolumeError::InvertedBounds {
                axis: Axis::Y,
                min: 4.0,
                max: 0.0
            }
        );
        assert_eq!(err.to_string(), "box bounds inverted on y axis: min 4 > max 0");
        assert_eq!(
            Box3::from_bounds(0.0, f64::INFINITY, 0.0, 1.0, 0.0, 1.0),
            Err(VolumeError::NonFinite)
        );
    }
}
