//! Clip the classic demo segment against the 5 × 4 × 3 box with both algorithms.
//!
//! Purpose
//! - Show the library on the scene the interactive demos drew: the segment
//!   (-1, 2, 1) → (6, 5, 4) crossing the box [0,5]×[0,4]×[0,3], plus the same
//!   segment seen through a 60° perspective frustum.

use clip3d::prelude::*;
use nalgebra::vector;

fn fmt_point(p: &Point3) -> String {
    format!("({:.1}, {:.1}, {:.1})", p.x, p.y, p.z)
}

fn main() {
    let bounds = Box3::from_bounds(0.0, 5.0, 0.0, 4.0, 0.0, 3.0).expect("demo box");
    let segment = Segment3::new(vector![-1.0, 2.0, 1.0], vector![6.0, 5.0, 4.0]);
    println!("P1 {}  P2 {}", fmt_point(&segment.p0), fmt_point(&segment.p1));

    let cs = CohenSutherland::new(bounds);
    let cb = CyrusBeck::from(bounds);
    let clippers: [&dyn LineClipper; 2] = [&cs, &cb];
    for clipper in clippers {
        match clipper.clip(&segment) {
            ClipOutcome::Accepted(c) => println!(
                "{:<17} C1 {}  C2 {}",
                clipper.name(),
                fmt_point(&c.p0),
                fmt_point(&c.p1)
            ),
            ClipOutcome::Rejected => println!("{:<17} rejected", clipper.name()),
        }
    }

    // Camera at (2.5, 2, 8) looking down -Z: move the scene into view space.
    let frustum =
        ConvexVolume::perspective(60f64.to_radians(), 1.0, 1.0, 50.0).expect("demo frustum");
    let eye = vector![2.5, 2.0, 8.0];
    let in_view = Segment3::new(segment.p0 - eye, segment.p1 - eye);
    match parameter_interval(&in_view, frustum.planes()) {
        Some((t0, t1)) => println!("frustum           visible t in [{t0:.3}, {t1:.3}]"),
        None => println!("frustum           rejected"),
    }
}
