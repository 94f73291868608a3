//! Province blender: per-rock-group thickness budgets at a column.
//!
//! Uses the same warped lattice as landforms at a larger spacing, but
//! instead of a discrete pick it blends the budgets of the corner provinces
//! so properties change continuously across province borders.

use deepbound_config::TerrainConfig;

use crate::blend::{GridSpec, blend_corners, grid_corners};
use crate::catalog::{ProvinceId, RockGroupBudget, WorldGenCatalog};
use crate::noise_source::WorldNoise;
use crate::seed::{NoiseChannel, salt};

/// Blended province data for one column.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProvinceBlend {
    /// Contributing provinces and their weights, sorted by id.
    pub entries: Vec<(ProvinceId, f64)>,
    /// `Σ weight · budget`, in map units.
    pub budget: RockGroupBudget,
    /// Highest-weight province (lowest id on ties).
    pub dominant: Option<ProvinceId>,
}

/// Resolve the province blend at column `x`. Empty when no provinces exist.
pub fn blend_provinces(
    catalog: &WorldGenCatalog,
    noise: &WorldNoise,
    config: &TerrainConfig,
    x: i32,
) -> ProvinceBlend {
    let mut candidates: Vec<(ProvinceId, f64)> =
        catalog.provinces().map(|(id, def)| (id, def.weight)).collect();
    if candidates.is_empty() {
        return ProvinceBlend::default();
    }
    let mut total: f64 = candidates.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        // All weightless: every province equally likely.
        for candidate in &mut candidates {
            candidate.1 = 1.0;
        }
        total = candidates.len() as f64;
    }

    let spec = GridSpec {
        spacing: config.province_grid_spacing,
        warp_frequency: config.warp_frequency,
        warp_magnitude: config.warp_magnitude,
    };
    let corners = grid_corners(
        noise.channel(NoiseChannel::ProvinceWarpX),
        noise.channel(NoiseChannel::ProvinceWarpY),
        &spec,
        x,
    );
    let entries = blend_corners(
        &corners,
        &candidates,
        total,
        noise.world_seed(),
        salt::PROVINCE_PICK,
        config.blend_epsilon,
    );

    let mut budget = RockGroupBudget::default();
    let mut dominant: Option<(ProvinceId, f64)> = None;
    for &(id, weight) in &entries {
        budget.add_scaled(&catalog.province(id).thickness, weight);
        // Entries are sorted by id, so strict `>` keeps the lowest id on ties.
        if dominant.is_none_or(|(_, best)| weight > best) {
            dominant = Some((id, weight));
        }
    }

    ProvinceBlend {
        entries,
        budget,
        dominant: dominant.map(|(id, _)| id),
    }
}
