//! Seeded random segments around a box.
//!
//! Endpoints are drawn uniformly from the box inflated by `margin` on every side,
//! so a sample mixes inside, crossing and fully outside segments. The same
//! `(bounds, margin, count, seed)` always yields the same segments.
//!
//! The inflated box must have a finite width on every axis; huge boxes or
//! margins whose extent overflows `f64` are refused rather than sampled.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geom3::{Axis, Box3, Point3, Segment3};

/// Errors raised by `random_segments`.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleError {
    /// `margin` is NaN or infinite.
    NonFiniteMargin,
    /// The inflated extent along `axis` is not a finite number.
    RangeOverflow { axis: Axis, lo: f64, hi: f64 },
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleError::NonFiniteMargin => write!(f, "sampling margin must be finite"),
            SampleError::RangeOverflow { axis, lo, hi } => write!(
                f,
                "sampling range on {axis} axis overflows: [{lo}, {hi}] has no finite width"
            ),
        }
    }
}

impl std::error::Error for SampleError {}

/// `count` segments with endpoints uniform in `bounds` grown by `margin`.
///
/// A negative margin is treated as zero.
pub fn random_segments(
    bounds: &Box3,
    margin: f64,
    count: usize,
    seed: u64,
) -> Result<Vec<Segment3>, SampleError> {
    if !margin.is_finite() {
        return Err(SampleError::NonFiniteMargin);
    }
    let margin = margin.max(0.0);
    let lo = bounds.min().add_scalar(-margin);
    let hi = bounds.max().add_scalar(margin);
    for axis in Axis::ALL {
        let i = axis.index();
        if !(hi[i] - lo[i]).is_finite() {
            return Err(SampleError::RangeOverflow {
                axis,
                lo: lo[i],
                hi: hi[i],
            });
        }
    }
    let mut rng = StdRng::seed_from_u64(seed);
    Ok((0..count)
        .map(|_| {
            let p0 = draw_point(&mut rng, &lo, &hi);
            let p1 = draw_point(&mut rng, &lo, &hi);
            Segment3::new(p0, p1)
        })
        .collect())
}

fn draw_point<R: Rng>(rng: &mut R, lo: &Point3, hi: &Point3) -> Point3 {
    Point3::from_fn(|i, _| {
        if lo[i] < hi[i] {
            rng.gen_range(lo[i]..hi[i])
        } else {
            lo[i]
        }
    })
}
