//! 3D geometry primitives for line clipping.
//!
//! Purpose
//! - Value types shared by both clippers: `Point3`, `Segment3`, the axis-aligned
//!   `Box3`, the half-space `Plane3` and the validated `ConvexVolume`.
//!
//! Conventions
//! - Half-spaces use `n·p >= d` for inside. `Box3::to_planes` follows the same
//!   convention, so a box and its six planes describe the same closed set.
//! - Constructors validate and return `VolumeError`; clip calls never fail.
//! - Equality tests use tolerances: feasibility `1e-9`, rank/determinant `1e-12`.

mod cfg;
mod types;
mod util;
mod volume;

pub use cfg::ClipCfg;
pub use types::{Axis, Box3, Plane3, Point3, Segment3};
pub use volume::{ConvexVolume, VolumeError};

pub(crate) use util::overflow_scale;
