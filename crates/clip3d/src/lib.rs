//! 3D line-segment clipping.
//!
//! Purpose
//! - Compute the visible part of a segment inside a clip volume with two classic
//!   algorithms: Cohen-Sutherland (region outcodes, axis-aligned box) and
//!   Cyrus-Beck (parametric, any convex set of half-spaces).
//! - Everything is a pure function of `(segment, volume)`; there is no global
//!   state, and every type is `Send + Sync`.
//!
//! Layout
//! - `geom3`: points, segments, boxes, half-spaces, validated convex volumes.
//! - `cohen_sutherland`, `cyrus_beck`: the clippers (free functions plus a
//!   `LineClipper` implementation bound to one volume).
//! - `clip`: the shared `ClipOutcome` and `LineClipper` trait.
//! - `sample`: seeded random segments for sweeps and benches.

pub mod clip;
pub mod cohen_sutherland;
pub mod cyrus_beck;
pub mod geom3;
pub mod sample;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use clip::{ClipOutcome, LineClipper};
pub use cohen_sutherland::CohenSutherland;
pub use cyrus_beck::CyrusBeck;
pub use geom3::{Axis, Box3, ClipCfg, ConvexVolume, Plane3, Point3, Segment3, VolumeError};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::clip::{ClipOutcome, LineClipper};
    pub use crate::cohen_sutherland::{outcode, CohenSutherland, Face, Outcode, CLIP_ORDER};
    pub use crate::cyrus_beck::{parameter_interval, CyrusBeck};
    pub use crate::geom3::{
        Axis, Box3, ClipCfg, ConvexVolume, Plane3, Point3, Segment3, VolumeError,
    };
    pub use crate::sample::{random_segments, SampleError};
}

#[cfg(test)]
mod tests;
