//! Cross-algorithm properties: a box and its six planes must clip alike.

use crate::cohen_sutherland::{self, outcode};
use crate::cyrus_beck;
use crate::prelude::*;
use nalgebra::vector;
use proptest::prelude::*;

const EPS: f64 = 1e-9;

fn demo_box() -> Box3 {
    Box3::from_bounds(0.0, 5.0, 0.0, 4.0, 0.0, 3.0).unwrap()
}

fn seg(a: [f64; 3], b: [f64; 3]) -> Segment3 {
    Segment3::new(Point3::from(a), Point3::from(b))
}

/// Both accept with matching endpoints, or both reject.
fn assert_agree(s: &Segment3, bounds: &Box3, eps: f64) {
    let cs = cohen_sutherland::clip(s, bounds);
    let cb = cyrus_beck::clip(s, &bounds.to_planes());
    match (cs, cb) {
        (ClipOutcome::Accepted(a), ClipOutcome::Accepted(b)) => {
            assert!(a.approx_eq(&b, eps), "{s:?}: {a:?} vs {b:?}")
        }
        (ClipOutcome::Rejected, ClipOutcome::Rejected) => {}
        other => panic!("{s:?}: accept mismatch {other:?}"),
    }
}

#[test]
fn representative_segments_agree() {
    let b = demo_box();
    let cases = [
        // fully inside
        seg([1.0, 1.0, 1.0], [4.0, 3.0, 2.0]),
        // fully outside
        seg([10.0, 10.0, 10.0], [20.0, 20.0, 20.0]),
        seg([-1.0, 5.0, 1.0], [6.0, 5.0, 2.0]),
        // crossing one face each
        seg([-1.0, 2.0, 1.5], [2.0, 2.0, 1.5]),
        seg([3.0, 1.0, 1.0], [7.0, 2.0, 2.0]),
        seg([2.0, -1.0, 1.0], [2.0, 2.0, 1.0]),
        seg([1.0, 3.0, 1.0], [2.0, 6.0, 2.0]),
        seg([2.0, 2.0, -2.0], [3.0, 2.0, 1.0]),
        seg([2.0, 2.0, 1.0], [2.0, 3.0, 5.0]),
        // crossing two faces
        seg([-1.0, 2.0, 1.0], [6.0, 5.0, 4.0]),
        seg([-2.0, 2.0, 1.5], [7.0, 2.0, 1.5]),
        seg([2.5, -3.0, 1.0], [2.5, 9.0, 2.0]),
        // along an edge, through a corner, on a face
        seg([-1.0, 0.0, 0.0], [6.0, 0.0, 0.0]),
        seg([-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]),
        seg([5.0, 1.0, 1.0], [5.0, 3.0, 2.0]),
        // degenerate
        seg([2.0, 2.0, 2.0], [2.0, 2.0, 2.0]),
        seg([9.0, 2.0, 2.0], [9.0, 2.0, 2.0]),
    ];
    for s in &cases {
        assert_agree(s, &b, EPS);
    }
}

#[test]
fn demo_scene_endpoints_lie_on_the_boundary() {
    let b = demo_box();
    let s = seg([-1.0, 2.0, 1.0], [6.0, 5.0, 4.0]);
    for out in [
        cohen_sutherland::clip(&s, &b),
        cyrus_beck::clip(&s, &b.to_planes()),
    ] {
        let c = out.segment().expect("demo segment crosses the box");
        for p in [c.p0, c.p1] {
            assert!(b.contains_eps(&p, EPS));
            let on_face = b.to_planes().iter().any(|h| h.signed_distance(&p).abs() < EPS);
            assert!(on_face, "{p:?} is not on the boundary");
        }
    }
}

#[test]
fn single_point_touch_is_where_the_algorithms_part() {
    // Cohen-Sutherland keeps the touching point, Cyrus-Beck rejects t0 == t1.
    let s = seg([-1.0, 1.0, 1.0], [1.0, -1.0, 1.0]);
    let cs = cohen_sutherland::clip(&s, &demo_box());
    assert!(cs.segment().is_some_and(|c| c.length() < EPS));
    assert_eq!(
        cyrus_beck::clip(&s, &demo_box().to_planes()),
        ClipOutcome::Rejected
    );
}

#[test]
fn wide_finite_segments_clip_alike() {
    let b = Box3::from_bounds(-1e308, 1e308, 0.0, 4.0, 0.0, 3.0).unwrap();
    let s = seg([-1.5e308, 1.0, 0.5], [1.5e308, 3.0, 2.5]);
    let cs = cohen_sutherland::clip(&s, &b).segment().expect("cohen-sutherland accepts");
    let cb = cyrus_beck::clip(&s, &b.to_planes())
        .segment()
        .expect("cyrus-beck accepts");
    assert_eq!(cs.p0.x, -1e308);
    assert_eq!(cs.p1.x, 1e308);
    for (a, c) in [(cs.p0, cb.p0), (cs.p1, cb.p1)] {
        assert!((a.x - c.x).abs() <= 1e308 * 1e-12, "{a:?} vs {c:?}");
        assert!((a.y - c.y).abs() < 1e-9 && (a.z - c.z).abs() < 1e-9, "{a:?} vs {c:?}");
    }
}

#[test]
fn non_finite_segments_are_rejected_by_both() {
    let b = demo_box();
    for s in [
        seg([f64::NAN, 2.0, 1.0], [f64::NAN, 2.0, 1.0]),
        seg([1.0, 1.0, 1.0], [f64::INFINITY, 1.0, 1.0]),
    ] {
        assert_eq!(cohen_sutherland::clip(&s, &b), ClipOutcome::Rejected);
        assert_eq!(cyrus_beck::clip(&s, &b.to_planes()), ClipOutcome::Rejected);
    }
}

#[test]
fn seeded_sweep_agrees() {
    let b = demo_box();
    for s in random_segments(&b, 3.0, 2000, 42).unwrap() {
        assert_agree(&s, &b, 1e-7);
    }
}

#[test]
fn trait_objects_dispatch_both_algorithms() {
    let b = demo_box();
    let clippers: Vec<Box<dyn LineClipper>> = vec![
        Box::new(CohenSutherland::new(b)) as Box<dyn LineClipper>,
        Box::new(CyrusBeck::from(b)),
    ];
    let s = seg([-1.0, 2.0, 1.0], [6.0, 5.0, 4.0]);
    let names: Vec<_> = clippers.iter().map(|c| c.name()).collect();
    assert_eq!(names, ["cohen-sutherland", "cyrus-beck"]);
    let outs: Vec<_> = clippers.iter().map(|c| c.clip(&s)).collect();
    let (a, c) = (outs[0].segment().unwrap(), outs[1].segment().unwrap());
    assert!(a.approx_eq(&c, EPS));
}

#[test]
fn clippers_are_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CohenSutherland>();
    assert_send_sync::<CyrusBeck>();
    assert_send_sync::<ClipOutcome>();

    let cb = CyrusBeck::from(demo_box());
    let segments = random_segments(&demo_box(), 2.0, 64, 9).unwrap();
    let serial: Vec<_> = segments.iter().map(|s| cb.clip(s)).collect();
    let parallel: Vec<ClipOutcome> = std::thread::scope(|scope| {
        let handles: Vec<_> = segments
            .chunks(16)
            .map(|chunk| {
                let cb = &cb;
                scope.spawn(move || chunk.iter().map(|s| cb.clip(s)).collect::<Vec<_>>())
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().expect("worker panicked"))
            .collect()
    });
    assert_eq!(serial, parallel);
}

fn point() -> impl Strategy<Value = Point3> {
    (-3.0..8.0f64, -3.0..8.0f64, -3.0..8.0f64).prop_map(|(x, y, z)| vector![x, y, z])
}

proptest! {
    #[test]
    fn outcode_zero_iff_inside_closed_box(p in point()) {
        let b = demo_box();
        prop_assert_eq!(outcode(&p, &b).is_inside(), b.contains(&p));
    }

    #[test]
    fn clipped_endpoints_stay_in_the_volume(p0 in point(), p1 in point()) {
        let b = demo_box();
        let s = Segment3::new(p0, p1);
        if let Some(c) = cohen_sutherland::clip(&s, &b).segment() {
            prop_assert!(b.contains(&c.p0) && b.contains(&c.p1));
        }
        if let Some(c) = cyrus_beck::clip(&s, &b.to_planes()).segment() {
            prop_assert!(b.contains_eps(&c.p0, 1e-9) && b.contains_eps(&c.p1, 1e-9));
        }
    }

    #[test]
    fn algorithms_agree_up_to_grazing_contact(p0 in point(), p1 in point()) {
        let b = demo_box();
        let s = Segment3::new(p0, p1);
        let cs = cohen_sutherland::clip(&s, &b);
        let cb = cyrus_beck::clip(&s, &b.to_planes());
        match (cs.segment(), cb.segment()) {
            (Some(a), Some(c)) => prop_assert!(a.approx_eq(&c, 1e-6), "{:?} vs {:?}", a, c),
            (None, None) => {}
            // Only a vanishing overlap may be kept by one and dropped by the other.
            (Some(a), None) | (None, Some(a)) => prop_assert!(a.length() < 1e-6),
        }
    }

    #[test]
    fn cohen_sutherland_is_idempotent(p0 in point(), p1 in point()) {
        let b = demo_box();
        if let ClipOutcome::Accepted(c) = cohen_sutherland::clip(&Segment3::new(p0, p1), &b) {
            prop_assert_eq!(cohen_sutherland::clip(&c, &b), ClipOutcome::Accepted(c));
        }
    }

    #[test]
    fn same_side_segments_are_rejected(p0 in point(), p1 in point(), shift in 0.001..4.0f64) {
        let b = demo_box();
        // Push both endpoints past x = 5.
        let a = vector![5.0 + shift + p0.x.abs(), p0.y, p0.z];
        let c = vector![5.0 + shift + p1.x.abs(), p1.y, p1.z];
        let s = Segment3::new(a, c);
        prop_assert_eq!(cohen_sutherland::clip(&s, &b), ClipOutcome::Rejected);
        prop_assert_eq!(cyrus_beck::clip(&s, &b.to_planes()), ClipOutcome::Rejected);
    }

    #[test]
    fn frustum_clips_stay_inside(p0 in point(), p1 in point()) {
        let vol = ConvexVolume::perspective(1.0, 1.5, 0.5, 6.0).unwrap();
        // Shift the sample cloud in front of the camera.
        let s = Segment3::new(p0 - vector![2.5, 2.5, 8.0], p1 - vector![2.5, 2.5, 8.0]);
        if let Some(c) = cyrus_beck::clip(&s, vol.planes()).segment() {
            prop_assert!(vol.contains(&c.p0) && vol.contains(&c.p1));
        }
    }
}
