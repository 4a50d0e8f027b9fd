//! Scene files for `clip3 batch`: one volume plus a list of segments.
//!
//! ```json
//! {
//!   "volume": { "box": { "min": [0, 0, 0], "max": [5, 4, 3] } },
//!   "segments": [ { "from": [-1, 2, 1], "to": [6, 5, 4] } ]
//! }
//! ```
//!
//! `volume` may instead be `{ "planes": [{ "n": [1, 0, 0], "d": 0 }, ...] }` or
//! `{ "frustum": { "fov_y_deg": 60, "aspect": 1, "near": 1, "far": 50 } }`.
//! Boxes run both clippers; plane sets and frusta only run Cyrus-Beck.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clip3d::{
    Box3, ClipOutcome, CohenSutherland, ConvexVolume, CyrusBeck, LineClipper, Plane3, Point3,
    Segment3,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SceneFile {
    pub volume: VolumeSpec,
    pub segments: Vec<SegmentSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeSpec {
    Box { min: [f64; 3], max: [f64; 3] },
    Planes(Vec<PlaneSpec>),
    Frustum {
        fov_y_deg: f64,
        aspect: f64,
        near: f64,
        far: f64,
    },
}

#[derive(Debug, Deserialize)]
pub struct PlaneSpec {
    pub n: [f64; 3],
    pub d: f64,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct SegmentSpec {
    pub from: [f64; 3],
    pub to: [f64; 3],
}

impl From<SegmentSpec> for Segment3 {
    fn from(s: SegmentSpec) -> Self {
        Segment3::new(Point3::from(s.from), Point3::from(s.to))
    }
}

/// One clipper's verdict on one segment.
#[derive(Debug, Serialize, PartialEq)]
pub struct ClipRecord {
    pub algo: &'static str,
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<[f64; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<[f64; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ClipRecord {
    pub fn new(algo: &'static str, outcome: ClipOutcome) -> Self {
        match outcome {
            ClipOutcome::Accepted(c) => Self {
                algo,
                accepted: true,
                from: Some(c.p0.into()),
                to: Some(c.p1.into()),
                label: Some(format!("C1 {}  C2 {}", fmt_point(&c.p0), fmt_point(&c.p1))),
            },
            ClipOutcome::Rejected => Self {
                algo,
                accepted: false,
                from: None,
                to: None,
                label: None,
            },
        }
    }
}

/// Per-segment results, in input order.
#[derive(Debug, Serialize)]
pub struct SegmentReport {
    pub index: usize,
    pub from: [f64; 3],
    pub to: [f64; 3],
    pub results: Vec<ClipRecord>,
}

/// Coordinates the way the overlay labels print them: `(x.x, y.y, z.z)`.
pub fn fmt_point(p: &Point3) -> String {
    format!("({:.1}, {:.1}, {:.1})", p.x, p.y, p.z)
}

pub fn load(path: &Path) -> Result<SceneFile> {
    let bytes = fs::read(path).with_context(|| format!("reading scene {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing scene {}", path.display()))
}

impl VolumeSpec {
    /// Validate the volume and build the clippers that apply to it.
    pub fn clippers(&self) -> Result<Vec<Box<dyn LineClipper>>> {
        match self {
            VolumeSpec::Box { min, max } => {
                let bounds = Box3::new(Point3::from(*min), Point3::from(*max))
                    .context("invalid box volume")?;
                Ok(vec![
                    Box::new(CohenSutherland::new(bounds)) as Box<dyn LineClipper>,
                    Box::new(CyrusBeck::from(bounds)),
                ])
            }
            VolumeSpec::Planes(planes) => {
                let planes = planes
                    .iter()
                    .map(|p| Plane3::new(Point3::from(p.n), p.d))
                    .collect();
                let volume = ConvexVolume::new(planes).context("invalid plane volume")?;
                Ok(vec![Box::new(CyrusBeck::new(volume))])
            }
            VolumeSpec::Frustum {
                fov_y_deg,
                aspect,
                near,
                far,
            } => {
                let volume =
                    ConvexVolume::perspective(fov_y_deg.to_radians(), *aspect, *near, *far)
                        .context("invalid frustum volume")?;
                Ok(vec![Box::new(CyrusBeck::new(volume))])
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            VolumeSpec::Box { .. } => "box",
            VolumeSpec::Planes(_) => "planes",
            VolumeSpec::Frustum { .. } => "frustum",
        }
    }
}

/// Run every applicable clipper on every segment.
pub fn run(scene: &SceneFile) -> Result<Vec<SegmentReport>> {
    let clippers = scene.volume.clippers()?;
    Ok(scene
        .segments
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            let segment = Segment3::from(*spec);
            let results = clippers
                .iter()
                .map(|c| ClipRecord::new(c.name(), c.clip(&segment)))
                .collect();
            SegmentReport {
                index,
                from: spec.from,
                to: spec.to,
                results,
            }
        })
        .collect())
}
