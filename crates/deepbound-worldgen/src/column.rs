//! Per-column derived data and the pipeline that builds it.
//!
//! Everything here is invariant over a whole column: the landform blend and
//! its octaves, the upheaval sample, the surface height, the province budget,
//! the strata stack, the dithered climate and the soil bands. Chunk assembly
//! only adds the per-cell density, cave and wobble samples on top.

use deepbound_config::Config;

use crate::catalog::{ProvinceId, RockGroupBudget, WorldGenCatalog};
use crate::chunk::CHUNK_SIZE_I32;
use crate::climate::{ClimateSample, ColumnClimate};
use crate::density::{ColumnTerrain, DensityField};
use crate::noise_source::WorldNoise;
use crate::province::blend_provinces;
use crate::seed::NoiseChannel;
use crate::soil::{SoilBand, resolve_soil};
use crate::strata::{StrataStack, StrataStacker};
use crate::tiles::ResolvedTiles;

/// Cached data of one world column.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnInfo {
    pub x: i32,
    /// Highest solid row, or -1 for a fully open column.
    pub surface_y: i32,
    pub terrain: ColumnTerrain,
    pub strata: StrataStack,
    /// Dominant province, used for sub-layer rules.
    pub province: Option<ProvinceId>,
    /// Blended province budget in map units.
    pub budget: RockGroupBudget,
    /// Dithered climate at sea level.
    pub climate: ClimateSample,
    pub soil: Vec<SoilBand>,
}

/// Column whose surface seeds the surface search of column `x`.
///
/// The first column of every chunk searches from the world top, so a column
/// never depends on anything outside its own chunk.
pub fn surface_hint_column(x: i32) -> Option<i32> {
    if x.rem_euclid(CHUNK_SIZE_I32) == 0 {
        None
    } else {
        Some(x - 1)
    }
}

/// Borrowed view of everything a column build needs.
pub struct ColumnBuilder<'a> {
    catalog: &'a WorldGenCatalog,
    noise: &'a WorldNoise,
    config: &'a Config,
    tiles: &'a ResolvedTiles,
}

impl<'a> ColumnBuilder<'a> {
    pub fn new(
        catalog: &'a WorldGenCatalog,
        noise: &'a WorldNoise,
        config: &'a Config,
        tiles: &'a ResolvedTiles,
    ) -> Self {
        Self {
            catalog,
            noise,
            config,
            tiles,
        }
    }

    pub fn density(&self) -> DensityField<'a> {
        DensityField::new(
            self.catalog,
            self.noise.channel(NoiseChannel::Terrain),
            &self.config.terrain,
            self.config.world.height,
        )
    }

    /// Terrain inputs and surface of column `x` only.
    pub fn surface(&self, x: i32, hint: Option<i32>) -> (ColumnClimate, ColumnTerrain, i32) {
        let climate = ColumnClimate::sample(self.noise, &self.config.climate, x);
        let terrain =
            ColumnTerrain::resolve(self.catalog, self.noise, &self.config.terrain, x, &climate);
        let surface_y = self.density().find_surface(&terrain, x, hint);
        (climate, terrain, surface_y)
    }

    /// Build column `x`, starting the surface search near `hint`.
    pub fn build(&self, x: i32, hint: Option<i32>) -> ColumnInfo {
        let (climate, terrain, surface_y) = self.surface(x, hint);

        let provinces = blend_provinces(self.catalog, self.noise, &self.config.terrain, x);
        let strata = StrataStacker::new(
            self.catalog,
            self.noise.channel(NoiseChannel::Strata),
            &self.config.strata,
            &self.tiles.strata,
        )
        .stack(x, surface_y, &provinces.budget);

        let world_seed = self.noise.world_seed();
        let climate = climate.dithered(world_seed, x, &self.config.climate);
        let soil = resolve_soil(
            self.catalog,
            self.tiles,
            world_seed,
            x,
            surface_y,
            self.config.world.sea_level,
            &climate,
        );

        ColumnInfo {
            x,
            surface_y,
            terrain,
            strata,
            province: provinces.dominant,
            budget: provinces.budget,
            climate,
            soil,
        }
    }

    /// Build column `x` from scratch, replaying the surface searches of the
    /// columns before it in its chunk so the result matches the cached path.
    pub fn build_uncached(&self, x: i32) -> ColumnInfo {
        let first = x - x.rem_euclid(CHUNK_SIZE_I32);
        let mut hint = None;
        for prev in first..x {
            let (_, _, surface_y) = self.surface(prev, hint);
            hint = Some(surface_y);
        }
        self.build(x, hint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LandformDefinition;

    fn plains() -> WorldGenCatalog {
        let mut catalog = WorldGenCatalog::new();
        catalog
            .register_landform(LandformDefinition::flat("plains", 1.0, 0.5))
            .unwrap();
        catalog
    }

    #[test]
    fn test_surface_hint_resets_at_chunk_edge() {
        assert_eq!(surface_hint_column(0), None);
        assert_eq!(surface_hint_column(1), Some(0));
        assert_eq!(surface_hint_column(31), Some(30));
        assert_eq!(surface_hint_column(32), None);
        assert_eq!(surface_hint_column(-32), None);
        assert_eq!(surface_hint_column(-1), Some(-2));
    }

    #[test]
    fn test_uncached_build_matches_hinted_build() {
        let catalog = plains();
        let config = Config::default();
        let noise = WorldNoise::new(config.world.seed, config.terrain.base_frequency);
        let tiles = ResolvedTiles::default();
        let builder = ColumnBuilder::new(&catalog, &noise, &config, &tiles);

        let mut hint = None;
        for x in 64..96 {
            let hinted = builder.build(x, hint);
            assert_eq!(hinted, builder.build_uncached(x), "column {x}");
            hint = Some(hinted.surface_y);
        }
    }

    #[test]
    fn test_flat_plains_surface() {
        let catalog = plains();
        let config = Config::default();
        let noise = WorldNoise::new(config.world.seed, config.terrain.base_frequency);
        let tiles = ResolvedTiles::default();
        let column = ColumnBuilder::new(&catalog, &noise, &config, &tiles).build_uncached(10);
        assert_eq!(column.x, 10);
        assert!((447..=576).contains(&column.surface_y), "{}", column.surface_y);
        assert_eq!(column.province, None);
        assert!(column.strata.ranges.is_empty());
        assert!(column.soil.is_empty());
    }
}
