//! Landform blender: the weighted set of landforms active at a column.

use deepbound_config::TerrainConfig;

use crate::blend::{GridSpec, blend_corners, grid_corners};
use crate::catalog::{LandformId, WorldGenCatalog, gate_accepts};
use crate::climate::ColumnClimate;
use crate::noise_source::{MAX_OCTAVES, WorldNoise};
use crate::seed::{NoiseChannel, salt};

/// Landforms active at one column with their blend weights.
///
/// Weights sum to a value in `(0, 1]` whenever the catalog has a landform.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LandformBlend {
    entries: Vec<(LandformId, f64)>,
}

impl LandformBlend {
    pub fn from_entries(entries: Vec<(LandformId, f64)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(LandformId, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }

    /// Weight of `landform`, 0 when inactive.
    pub fn weight_of(&self, landform: LandformId) -> f64 {
        self.entries
            .iter()
            .find(|(id, _)| *id == landform)
            .map_or(0.0, |(_, w)| *w)
    }

    /// Blend the octave amplitude and threshold vectors by landform weight.
    ///
    /// Weights are renormalized so a partially dropped blend keeps its scale.
    pub fn blend_octaves(&self, catalog: &WorldGenCatalog) -> (Vec<f64>, Vec<f64>) {
        let total = self.total_weight();
        if total <= 0.0 {
            return (Vec::new(), Vec::new());
        }

        let len = self
            .entries
            .iter()
            .map(|(id, _)| catalog.landform(*id).terrain_octaves.len())
            .max()
            .unwrap_or(0)
            .min(MAX_OCTAVES);
        let mut amplitudes = vec![0.0; len];
        let mut thresholds = vec![0.0; len];

        for &(id, weight) in &self.entries {
            let landform = catalog.landform(id);
            let w = weight / total;
            for (acc, amp) in amplitudes.iter_mut().zip(&landform.terrain_octaves) {
                *acc += amp * w;
            }
            for (acc, th) in thresholds.iter_mut().zip(&landform.octave_thresholds) {
                *acc += th * w;
            }
        }
        (amplitudes, thresholds)
    }
}

/// Landforms whose climate gate accepts the climate, with their total weight.
pub fn landform_candidates(
    catalog: &WorldGenCatalog,
    climate: &ColumnClimate,
) -> (Vec<(LandformId, f64)>, f64) {
    let candidates: Vec<_> = catalog
        .landforms()
        .filter(|(_, def)| {
            gate_accepts(def.climate.as_ref(), climate.temperature, climate.rainfall)
        })
        .map(|(id, def)| (id, def.weight))
        .collect();
    let total = candidates.iter().map(|(_, w)| w).sum();
    (candidates, total)
}

/// Resolve the active landform set at column `x`.
///
/// With no qualifying candidate (or only weightless ones) the first
/// configured landform is used outright. Empty only for an empty catalog.
pub fn blend_landforms(
    catalog: &WorldGenCatalog,
    noise: &WorldNoise,
    config: &TerrainConfig,
    x: i32,
    climate: &ColumnClimate,
) -> LandformBlend {
    let Some((first, _)) = catalog.landforms().next() else {
        return LandformBlend::default();
    };

    let (candidates, total) = landform_candidates(catalog, climate);
    if total <= 0.0 {
        return LandformBlend {
            entries: vec![(first, 1.0)],
        };
    }

    let spec = GridSpec {
        spacing: config.landform_grid_spacing,
        warp_frequency: config.warp_frequency,
        warp_magnitude: config.warp_magnitude,
    };
    let corners = grid_corners(
        noise.channel(NoiseChannel::WarpX),
        noise.channel(NoiseChannel::WarpY),
        &spec,
        x,
    );
    let entries = blend_corners(
        &corners,
        &candidates,
        total,
        noise.world_seed(),
        salt::LANDFORM_PICK,
        config.blend_epsilon,
    );
    LandformBlend { entries }
}
