//! Warped-grid bilinear blending shared by landforms and provinces.
//!
//! Column `x` is displaced by low-frequency warp noise, together with a
//! synthetic `y` taken from a second warp channel, and located inside a
//! lattice of fixed spacing. Each of the four enclosing corners picks one
//! definition by hash; the picks are blended with bilinear weights.

use glam::DVec2;

use crate::noise_source::NoiseSource;
use crate::seed::{hash_unit, weighted_pick};

/// Lattice spacing and warp strength.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpec {
    pub spacing: f64,
    pub warp_frequency: f64,
    pub warp_magnitude: f64,
}

/// The four lattice corners around `x` and their bilinear weights.
///
/// Weights are non-negative and sum to 1.
pub fn grid_corners(
    warp_x: &NoiseSource,
    warp_y: &NoiseSource,
    spec: &GridSpec,
    x: i32,
) -> [((i64, i64), f64); 4] {
    let fx = x as f64 * spec.warp_frequency;
    let warped = DVec2::new(
        x as f64 + warp_x.raw(fx, 0.0) * spec.warp_magnitude,
        warp_y.raw(fx, 0.0) * spec.warp_magnitude,
    ) / spec.spacing.max(1.0);

    let cell = warped.floor();
    let t = warped - cell;
    let (cx, cy) = (cell.x as i64, cell.y as i64);

    [
        ((cx, cy), (1.0 - t.x) * (1.0 - t.y)),
        ((cx + 1, cy), t.x * (1.0 - t.y)),
        ((cx, cy + 1), (1.0 - t.x) * t.y),
        ((cx + 1, cy + 1), t.x * t.y),
    ]
}

/// Pick a candidate per corner, merge duplicates and drop tiny weights.
///
/// Returns entries sorted by id. Empty only when `candidates` has no
/// positive weight.
pub fn blend_corners<T: Copy + Ord>(
    corners: &[((i64, i64), f64); 4],
    candidates: &[(T, f64)],
    total_weight: f64,
    world_seed: u64,
    pick_salt: u64,
    epsilon: f64,
) -> Vec<(T, f64)> {
    let mut merged: Vec<(T, f64)> = Vec::with_capacity(4);
    for &((cx, cy), weight) in corners {
        let unit = hash_unit(world_seed, cx, cy, pick_salt);
        let Some(pick) = weighted_pick(candidates, total_weight, unit) else {
            continue;
        };
        match merged.iter_mut().find(|(id, _)| *id == pick) {
            Some((_, acc)) => *acc += weight,
            None => merged.push((pick, weight)),
        }
    }

    merged.retain(|&(_, weight)| weight >= epsilon);
    merged.sort_by(|a, b| a.0.cmp(&b.0));
    merged
}
