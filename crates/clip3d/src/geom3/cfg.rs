//! Tolerance and guard defaults for 3D clipping.
//!
//! Policy
//! - Defaults are fixed constants; callers that need other values pass a
//!   `ClipCfg` explicitly. Nothing here is global mutable state.

/// Membership slack used by `Plane3::contains_eps`, volume validation and vertex dedup.
pub(crate) const FEAS_EPS: f64 = 1e-9;
/// Below this a normal, cross product or determinant counts as zero.
pub(crate) const RANK_EPS: f64 = 1e-12;
/// Cohen-Sutherland moves each endpoint at most once per axis, so six steps
/// suffice in exact arithmetic. The guard leaves room for rounding re-entries.
pub(crate) const MAX_CLIP_STEPS: usize = 12;
/// Coordinates beyond this magnitude are rescaled before they are differenced.
pub(crate) const OVERFLOW_GUARD: f64 = 1e300;

/// Clipping configuration (guards and tolerances).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipCfg {
    /// Upper bound on Cohen-Sutherland subdivision steps before rejecting.
    pub max_steps: usize,
    /// Slack for feasibility checks during volume validation.
    pub eps_feas: f64,
}

impl Default for ClipCfg {
    fn default() -> Self {
        Self {
            max_steps: MAX_CLIP_STEPS,
            eps_feas: FEAS_EPS,
        }
    }
}
