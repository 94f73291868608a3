//! Density field: classifies `(x, y)` as solid or open.
//!
//! Density is positive inside solid ground and non-positive in open space.
//! All column-invariant inputs (landform blend, blended octaves, upheaval
//! sample) live in [`ColumnTerrain`] so per-cell evaluation only touches the
//! landform splines and, near the surface, the terrain octaves.

use deepbound_config::TerrainConfig;

use crate::catalog::WorldGenCatalog;
use crate::climate::ColumnClimate;
use crate::landform::{LandformBlend, blend_landforms};
use crate::noise_source::{NoiseSource, WorldNoise};
use crate::seed::NoiseChannel;

/// Column-invariant terrain inputs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnTerrain {
    pub landforms: LandformBlend,
    /// Landform-weighted octave amplitudes.
    pub amplitudes: Vec<f64>,
    /// Landform-weighted octave thresholds.
    pub thresholds: Vec<f64>,
    /// `Σ |amplitudes|`.
    pub amplitude_sum: f64,
    /// Raw upheaval sample in ≈[-1, 1].
    pub upheaval: f64,
}

impl ColumnTerrain {
    /// Blend landforms at `x` and sample the column's upheaval.
    pub fn resolve(
        catalog: &WorldGenCatalog,
        noise: &WorldNoise,
        config: &TerrainConfig,
        x: i32,
        climate: &ColumnClimate,
    ) -> Self {
        let landforms = blend_landforms(catalog, noise, config, x, climate);
        let (amplitudes, thresholds) = landforms.blend_octaves(catalog);
        let amplitude_sum = amplitudes.iter().map(|a| a.abs()).sum();
        let upheaval = noise
            .channel(NoiseChannel::Upheaval)
            .raw(x as f64 * config.upheaval_frequency, 0.0);
        Self {
            landforms,
            amplitudes,
            thresholds,
            amplitude_sum,
            upheaval,
        }
    }
}

/// Evaluates density for columns of one world.
pub struct DensityField<'a> {
    catalog: &'a WorldGenCatalog,
    terrain_noise: &'a NoiseSource,
    config: &'a TerrainConfig,
    height: i32,
}

impl<'a> DensityField<'a> {
    pub fn new(
        catalog: &'a WorldGenCatalog,
        terrain_noise: &'a NoiseSource,
        config: &'a TerrainConfig,
        height: i32,
    ) -> Self {
        Self {
            catalog,
            terrain_noise,
            config,
            height: height.max(1),
        }
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Landform-weighted spline value at normalized height `y_n`.
    pub fn surface_offset(&self, terrain: &ColumnTerrain, y_n: f64) -> f64 {
        let total = terrain.landforms.total_weight();
        if total <= 0.0 {
            return 0.0;
        }
        terrain
            .landforms
            .entries()
            .iter()
            .map(|&(id, weight)| self.catalog.landform(id).y_keys.evaluate(y_n) * weight / total)
            .sum()
    }

    /// Canyon (negative) or plateau (positive) contribution.
    ///
    /// `depth` is `offset - y_n`: positive below the nominal surface.
    fn upheaval(&self, terrain: &ColumnTerrain, depth: f64) -> f64 {
        let threshold = self.config.upheaval_threshold;
        let magnitude = terrain.upheaval.abs();
        if magnitude <= threshold || threshold >= 1.0 {
            return 0.0;
        }
        let max_depth = self.config.upheaval_max_depth;
        if max_depth <= 0.0 || depth >= max_depth {
            return 0.0;
        }

        let strength = ((magnitude - threshold) / (1.0 - threshold)).powi(2);
        let fade = 1.0 - depth.max(0.0) / max_depth;
        let term = if terrain.upheaval < 0.0 {
            -strength * self.config.canyon_magnitude * fade
        } else if depth < 0.0 {
            let rise = 1.0 + depth / self.config.plateau_max_height.max(f64::EPSILON);
            (strength * self.config.plateau_magnitude * rise).max(0.0)
        } else {
            strength * self.config.plateau_magnitude * fade
        };
        term * terrain.amplitude_sum.min(1.0)
    }

    /// Density before the octave term.
    fn coarse(&self, terrain: &ColumnTerrain, y: i32) -> f64 {
        let y_n = y as f64 / self.height as f64;
        let offset = self.surface_offset(terrain, y_n);
        let depth = offset - y_n;
        depth * self.config.curve_multiplier + self.upheaval(terrain, depth)
    }

    /// Octave term in `[-1, 1]`; 0 without amplitudes.
    ///
    /// Negative thresholds can push the octave sum past the amplitude sum,
    /// so the normalized sum is clamped to keep the short-circuit exact.
    fn octave_term(&self, terrain: &ColumnTerrain, x: i32, y: i32) -> f64 {
        if terrain.amplitude_sum <= 0.0 {
            return 0.0;
        }
        let sum = self.terrain_noise.weighted_octaves(
            x as f64,
            y as f64,
            &terrain.amplitudes,
            &terrain.thresholds,
            &[],
        );
        2.0 * (sum / terrain.amplitude_sum).clamp(0.0, 1.0) - 1.0
    }

    /// Signed density at `(x, y)`.
    ///
    /// When the coarse value is already beyond ±1 the octave term cannot
    /// change the sign and is skipped.
    pub fn density(&self, terrain: &ColumnTerrain, x: i32, y: i32) -> f64 {
        let coarse = self.coarse(terrain, y);
        if coarse.abs() > 1.0 {
            return coarse;
        }
        coarse + self.octave_term(terrain, x, y)
    }

    #[inline]
    pub fn is_solid(&self, terrain: &ColumnTerrain, x: i32, y: i32) -> bool {
        self.density(terrain, x, y) > 0.0
    }

    /// Highest solid row of the column, or -1 when the column is open.
    ///
    /// The scan starts `surface_search_margin` rows above `hint` (the world
    /// top without one) and walks down; if the start is already solid it
    /// climbs instead.
    pub fn find_surface(&self, terrain: &ColumnTerrain, x: i32, hint: Option<i32>) -> i32 {
        let top = self.height - 1;
        let start = hint
            .map_or(top, |h| h.saturating_add(self.config.surface_search_margin))
            .clamp(0, top);

        if self.is_solid(terrain, x, start) {
            let mut y = start;
            while y < top && self.is_solid(terrain, x, y + 1) {
                y += 1;
            }
            return y;
        }

        (0..start)
            .rev()
            .find(|&y| self.is_solid(terrain, x, y))
            .unwrap_or(-1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{LandformDefinition, LandformId};
    use crate::spline::TerrainSpline;

    fn catalog_with(def: LandformDefinition) -> (WorldGenCatalog, LandformId) {
        let mut catalog = WorldGenCatalog::new();
        let id = catalog.register_landform(def).unwrap();
        (catalog, id)
    }

    fn terrain(id: LandformId, amplitudes: Vec<f64>, upheaval: f64) -> ColumnTerrain {
        ColumnTerrain {
            landforms: LandformBlend::from_entries(vec![(id, 1.0)]),
            amplitude_sum: amplitudes.iter().map(|a: &f64| a.abs()).sum(),
            thresholds: vec![0.0; amplitudes.len()],
            amplitudes,
            upheaval,
        }
    }

    #[test]
    fn test_flat_spline_surface_height() {
        let (catalog, id) = catalog_with(LandformDefinition::flat("plains", 1.0, 0.5));
        let noise = NoiseSource::new(0, 0.0005);
        let config = TerrainConfig::default();
        let field = DensityField::new(&catalog, &noise, &config, 1024);
        let column = terrain(id, vec![], 0.0);

        assert!(field.is_solid(&column, 0, 511));
        assert!(!field.is_solid(&column, 0, 512));
        assert_eq!(field.find_surface(&column, 0, None), 511);
        assert_eq!(field.find_surface(&column, 0, Some(300)), 511);
        assert_eq!(field.find_surface(&column, 0, Some(700)), 511);
    }

    #[test]
    fn test_short_circuit_keeps_sign() {
        let mut def = LandformDefinition::flat("hills", 1.0, 0.5);
        def.terrain_octaves = vec![1.0, 0.5, 0.25];
        let (catalog, id) = catalog_with(def);
        let noise = NoiseSource::new(9, 0.0005);
        let config = TerrainConfig::default();
        let field = DensityField::new(&catalog, &noise, &config, 1024);

        let plain = terrain(id, vec![1.0, 0.5, 0.25], 0.0);
        let mut lowered = plain.clone();
        lowered.thresholds = vec![-2.0, 0.1, -0.5];
        let mut raised = plain.clone();
        raised.thresholds = vec![0.3, 0.2, 0.1];

        for column in [&plain, &lowered, &raised] {
            for x in (-3000..3000).step_by(101) {
                for y in (0..1024).step_by(7) {
                    let term = field.octave_term(column, x, y);
                    assert!((-1.0..=1.0).contains(&term), "octave term {term}");
                    let full = field.coarse(column, y) + term;
                    assert_eq!(
                        field.density(column, x, y) > 0.0,
                        full > 0.0,
                        "short-circuit changed classification at ({x}, {y})"
                    );
                }
            }
        }
    }

    #[test]
    fn test_negative_thresholds_keep_surface_in_band() {
        let mut def = LandformDefinition::flat("hills", 1.0, 0.5);
        def.terrain_octaves = vec![1.0];
        def.octave_thresholds = vec![-2.0];
        let (catalog, id) = catalog_with(def);
        let noise = NoiseSource::new(9, 0.0005);
        let config = TerrainConfig::default();
        let field = DensityField::new(&catalog, &noise, &config, 1024);
        let mut column = terrain(id, vec![1.0], 0.0);
        column.thresholds = vec![-2.0];

        // A saturated octave term adds exactly +1, lifting the surface by
        // 1 / curve_multiplier of the world height at most.
        let surface = field.find_surface(&column, 0, None);
        let lift = (1024.0 / config.curve_multiplier).ceil() as i32;
        assert!((511..=511 + lift).contains(&surface), "surface {surface}");
        assert!(field.is_solid(&column, 0, surface));
        assert!(!field.is_solid(&column, 0, surface + 1));
    }

    #[test]
    fn test_octave_term_moves_surface_within_band() {
        let mut def = LandformDefinition::flat("hills", 1.0, 0.5);
        def.terrain_octaves = vec![1.0, 0.5];
        let (catalog, id) = catalog_with(def);
        let noise = NoiseSource::new(9, 0.0005);
        let config = TerrainConfig::default();
        let field = DensityField::new(&catalog, &noise, &config, 1024);
        let column = terrain(id, vec![1.0, 0.5], 0.0);

        // |noise term| <= 1 and the curve changes 16/1024 per row, so the
        // surface stays within 64 rows of 512.
        for x in (-5000..5000).step_by(97) {
            let surface = field.find_surface(&column, x, None);
            assert!((447..=576).contains(&surface), "surface {surface} at x={x}");
        }
    }

    #[test]
    fn test_canyon_lowers_and_plateau_raises_surface() {
        let mut def = LandformDefinition::flat("hills", 1.0, 0.5);
        def.terrain_octaves = vec![1.0];
        let (catalog, id) = catalog_with(def);
        let noise = NoiseSource::new(9, 0.0005);
        let config = TerrainConfig::default();
        let field = DensityField::new(&catalog, &noise, &config, 1024);

        // A threshold above the amplitude pins the octave term at -1.
        let column = |upheaval| ColumnTerrain {
            thresholds: vec![1.05],
            ..terrain(id, vec![1.0], upheaval)
        };

        let calm = field.find_surface(&column(0.0), 40, None);
        let canyon = field.find_surface(&column(-1.0), 40, None);
        let plateau = field.find_surface(&column(1.0), 40, None);
        assert_eq!(calm, 447);
        assert!(canyon < calm, "canyon {canyon} should sit below {calm}");
        assert!(plateau > calm, "plateau {plateau} should rise above {calm}");
    }

    #[test]
    fn test_upheaval_ignored_without_amplitudes() {
        let (catalog, id) = catalog_with(LandformDefinition::flat("plains", 1.0, 0.5));
        let noise = NoiseSource::new(9, 0.0005);
        let config = TerrainConfig::default();
        let field = DensityField::new(&catalog, &noise, &config, 1024);
        assert_eq!(field.find_surface(&terrain(id, vec![], -1.0), 0, None), 511);
        assert_eq!(field.find_surface(&terrain(id, vec![], 1.0), 0, None), 511);
    }

    #[test]
    fn test_spline_shapes_surface() {
        // Offset falls from 1 at the bottom to 0 at the top: surface where
        // 1 - y_n = y_n, i.e. half height.
        let spline = TerrainSpline::from_points(&[(0.0, 1.0), (1.0, 0.0)]).unwrap();
        let def = LandformDefinition {
            y_keys: spline,
            ..LandformDefinition::flat("slope", 1.0, 0.0)
        };
        let (catalog, id) = catalog_with(def);
        let noise = NoiseSource::new(0, 0.0005);
        let config = TerrainConfig::default();
        let field = DensityField::new(&catalog, &noise, &config, 1000);
        assert_eq!(field.find_surface(&terrain(id, vec![], 0.0), 0, None), 499);
    }

    #[test]
    fn test_open_column_reports_minus_one() {
        let (catalog, id) = catalog_with(LandformDefinition::flat("void", 1.0, -0.5));
        let noise = NoiseSource::new(0, 0.0005);
        let config = TerrainConfig::default();
        let field = DensityField::new(&catalog, &noise, &config, 256);
        assert_eq!(field.find_surface(&terrain(id, vec![], 0.0), 0, None), -1);
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let (catalog, _) = catalog_with(LandformDefinition::flat("plains", 1.0, 0.5));
        let noise = WorldNoise::new(1337, 0.0005);
        let config = TerrainConfig::default();
        let climate = ColumnClimate {
            temperature: 10.0,
            rainfall: 100.0,
        };
        let a = ColumnTerrain::resolve(&catalog, &noise, &config, 99, &climate);
        let b = ColumnTerrain::resolve(&catalog, &noise, &config, 99, &climate);
        assert_eq!(a, b);
        assert!(a.amplitudes.is_empty());
        assert!((a.landforms.total_weight() - 1.0).abs() < 1e-9);
    }
}
