//! Small utilities: triple enumeration, geometric dedup and overflow rescaling.

use super::cfg::OVERFLOW_GUARD;
use super::types::Point3;

/// Exact power-of-two factor that keeps differences of values up to `max_abs` finite.
///
/// Returns `1.0` for ordinary magnitudes, so scaled arithmetic there is bit-identical
/// to unscaled arithmetic.
pub(crate) fn overflow_scale(max_abs: f64) -> f64 {
    if max_abs > OVERFLOW_GUARD {
        2f64.powi(-512)
    } else {
        1.0
    }
}

/// All index triples `i < j < k` below `n` (lexicographic).
pub(crate) fn triples(n: usize) -> impl Iterator<Item = (usize, usize, usize)> {
    (0..n).flat_map(move |i| {
        (i + 1..n).flat_map(move |j| (j + 1..n).map(move |k| (i, j, k)))
    })
}

/// All index pairs `i < j` below `n` (lexicographic).
pub(crate) fn pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
}

pub(crate) fn dedup_points_in_place(points: &mut Vec<Point3>, tol: f64) {
    if points.len() < 2 {
        return;
    }
    points.sort_by(|a, b| {
        a[0].partial_cmp(&b[0])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a[1].partial_cmp(&b[1]).unwrap_or(std::cmp::Ordering::Equal))
            .then_with(|| a[2].partial_cmp(&b[2]).unwrap_or(std::cmp::Ordering::Equal))
    });
    // Sorting is lexicographic, so near-equal points that differ in x by rounding
    // may not be adjacent; a quadratic pass keeps the first representative.
    let mut kept: Vec<Point3> = Vec::with_capacity(points.len());
    for &p in points.iter() {
        if !kept.iter().any(|q| (p - q).norm() < tol) {
            kept.push(p);
        }
    }
    *points = kept;
}
