//! Chunk assembler: turns catalogs, noise and cached columns into chunks.
//!
//! A [`WorldGenerator`] is built once per world and shared between worker
//! threads. Its only mutable state is the column cache; everything else is
//! read-only after construction.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use deepbound_config::Config;
use deepbound_content::{TileId, TileLookup};

use crate::catalog::WorldGenCatalog;
use crate::cave::CaveCarver;
use crate::chunk::{CHUNK_SIZE, Chunk, ChunkCoord};
use crate::column::{ColumnBuilder, ColumnInfo, surface_hint_column};
use crate::column_cache::ColumnCache;
use crate::density::DensityField;
use crate::error::GenerationIssue;
use crate::noise_source::{NoiseSource, WorldNoise};
use crate::seed::NoiseChannel;
use crate::strata::wobble;
use crate::sublayer::sublayer_tile;
use crate::tiles::ResolvedTiles;

/// Deterministic generator for one world.
pub struct WorldGenerator {
    config: Config,
    catalog: Arc<WorldGenCatalog>,
    noise: WorldNoise,
    tiles: ResolvedTiles,
    cache: ColumnCache,
    issues: Vec<GenerationIssue>,
    warned_empty: AtomicBool,
}

impl WorldGenerator {
    /// Build a generator, resolving every tile the catalog references.
    ///
    /// Missing definitions and unknown tiles are logged and recorded in
    /// [`issues`](Self::issues); construction never fails.
    pub fn new(config: Config, catalog: Arc<WorldGenCatalog>, tiles: &dyn TileLookup) -> Self {
        let (resolved, mut issues) = ResolvedTiles::resolve(&catalog, tiles);

        for (count, kind) in [
            (catalog.landform_count(), "landform"),
            (catalog.stratum_count(), "rock stratum"),
            (catalog.province_count(), "geologic province"),
        ] {
            if count == 0 {
                let issue = GenerationIssue::MissingConfiguration(kind);
                tracing::warn!("{issue}");
                issues.push(issue);
            }
        }

        let noise = WorldNoise::new(config.world.seed, config.terrain.base_frequency);
        let cache = ColumnCache::new(config.cache.shards);

        tracing::info!(
            "World generator ready: seed {}, height {}, sea level {}, {} landforms, {} strata, {} provinces, {} soil layers",
            config.world.seed,
            config.world.height,
            config.world.sea_level,
            catalog.landform_count(),
            catalog.stratum_count(),
            catalog.province_count(),
            catalog.soil_layer_count(),
        );

        Self {
            config,
            catalog,
            noise,
            tiles: resolved,
            cache,
            issues,
            warned_empty: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &WorldGenCatalog {
        &self.catalog
    }

    pub fn seed(&self) -> u64 {
        self.config.world.seed
    }

    /// Problems found at construction, in discovery order.
    pub fn issues(&self) -> &[GenerationIssue] {
        &self.issues
    }

    /// Tile placed in open cells below sea level.
    pub fn water_tile(&self) -> TileId {
        self.tiles.water
    }

    fn builder(&self) -> ColumnBuilder<'_> {
        ColumnBuilder::new(&self.catalog, &self.noise, &self.config, &self.tiles)
    }

    /// Cached column `x`, built on first demand.
    pub fn column(&self, x: i32) -> Arc<ColumnInfo> {
        self.cache.get_or_build(x, || {
            // At most CHUNK_SIZE - 1 levels deep: hints never cross a chunk edge.
            let hint = surface_hint_column(x).map(|prev| self.column(prev).surface_y);
            self.builder().build(x, hint)
        })
    }

    /// Column `x` recomputed from scratch, bypassing the cache.
    pub fn column_uncached(&self, x: i32) -> ColumnInfo {
        self.builder().build_uncached(x)
    }

    /// Number of columns in the cache.
    pub fn cached_columns(&self) -> usize {
        self.cache.len()
    }

    /// Density at `(x, y)` through the cached column.
    pub fn density(&self, x: i32, y: i32) -> f64 {
        let column = self.column(x);
        self.builder().density().density(&column.terrain, x, y)
    }

    /// Density at `(x, y)` from a freshly built column.
    pub fn density_uncached(&self, x: i32, y: i32) -> f64 {
        let column = self.column_uncached(x);
        self.builder().density().density(&column.terrain, x, y)
    }

    /// Generate a fresh chunk at `coord`.
    pub fn generate_chunk(&self, coord: ChunkCoord) -> Chunk {
        let mut chunk = Chunk::new();
        self.populate(coord, &mut chunk);
        chunk
    }

    /// Fill every cell of `chunk` as the chunk at `coord`.
    pub fn populate(&self, coord: ChunkCoord, chunk: &mut Chunk) {
        chunk.clear();
        if self.catalog.landform_count() == 0 {
            if !self.warned_empty.swap(true, Ordering::Relaxed) {
                tracing::warn!("No landform definitions configured, chunks are left as air");
            }
            return;
        }

        let cells = self.painter();

        let (origin_x, origin_y) = coord.world_origin();
        let sea_level = self.config.world.sea_level;
        let lapse = self.config.climate.temperature_lapse;

        for lx in 0..CHUNK_SIZE {
            let x = origin_x + lx as i32;
            let column = self.column(x);

            for ly in 0..CHUNK_SIZE {
                let y = origin_y + ly as i32;
                chunk.set(lx, ly, cells.tile(&column, x, y));
                chunk.set_climate(lx, ly, column.climate.at_height(y, sea_level, lapse));
            }

            // Soil goes over rock only, never into air or water.
            for band in &column.soil {
                for ly in 0..CHUNK_SIZE {
                    let y = origin_y + ly as i32;
                    if !band.contains(y) {
                        continue;
                    }
                    let current = chunk.get(lx, ly);
                    if current != TileId::AIR && current != self.tiles.water {
                        chunk.set(lx, ly, band.tile);
                    }
                }
            }
        }
    }

    fn painter(&self) -> CellPainter<'_> {
        CellPainter {
            generator: self,
            density: self.builder().density(),
            carver: CaveCarver::new(
                self.noise.channel(NoiseChannel::Cave),
                &self.config.caves,
                self.config.world.sea_level,
            ),
            wobble_noise: self.noise.channel(NoiseChannel::Wobble),
            sublayer_noise: self.noise.channel(NoiseChannel::SubLayer),
        }
    }

    /// Tile of the single cell `(x, y)`, without soil.
    pub fn base_tile(&self, x: i32, y: i32) -> TileId {
        if self.catalog.landform_count() == 0 {
            return TileId::AIR;
        }
        self.painter().tile(&self.column(x), x, y)
    }
}

/// Per-call view used to classify cells.
struct CellPainter<'a> {
    generator: &'a WorldGenerator,
    density: DensityField<'a>,
    carver: CaveCarver<'a>,
    wobble_noise: &'a NoiseSource,
    sublayer_noise: &'a NoiseSource,
}

impl CellPainter<'_> {
    fn tile(&self, column: &ColumnInfo, x: i32, y: i32) -> TileId {
        let generator = self.generator;
        let solid = self.density.is_solid(&column.terrain, x, y)
            && !self.carver.is_cave(x, y, column.surface_y);

        if !solid {
            return if y < generator.config.world.sea_level {
                generator.tiles.water
            } else {
                TileId::AIR
            };
        }

        let strata = &column.strata;
        let stratum_rock = if strata.ranges.is_empty() {
            None
        } else {
            let offset = wobble(self.wobble_noise, &generator.config.strata, x, y);
            strata.range_tile(y, offset)
        };

        // Sub-layers paint over stratum ranges only, never over fallback rock.
        match stratum_rock {
            Some(rock) => self.sub_layer(column, x, y).unwrap_or(rock),
            None => strata.fallback_tile().unwrap_or(TileId::FALLBACK),
        }
    }

    fn sub_layer(&self, column: &ColumnInfo, x: i32, y: i32) -> Option<TileId> {
        let generator = self.generator;
        let province = column.province?;
        let rules = &generator.catalog.province(province).sub_layers;
        let tiles = generator.tiles.sub_layers.get(province.0 as usize)?;
        sublayer_tile(
            self.sublayer_noise,
            rules,
            tiles,
            x,
            y,
            column.surface_y.saturating_sub(y),
            generator.config.strata.sublayer_crust_depth,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LandformDefinition;
    use deepbound_content::TileCatalog;

    fn empty_generator() -> WorldGenerator {
        WorldGenerator::new(
            Config::default(),
            Arc::new(WorldGenCatalog::new()),
            &TileCatalog::new(),
        )
    }

    #[test]
    fn test_empty_catalog_reports_missing_configuration() {
        let generator = empty_generator();
        let issues = generator.issues();
        assert!(issues.contains(&GenerationIssue::MissingConfiguration("landform")));
        assert!(issues.contains(&GenerationIssue::MissingConfiguration("rock stratum")));
        assert!(issues.contains(&GenerationIssue::MissingConfiguration("geologic province")));
    }

    #[test]
    fn test_empty_catalog_generates_air() {
        let generator = empty_generator();
        for coord in [ChunkCoord::new(0, 0), ChunkCoord::new(-3, 10)] {
            let chunk = generator.generate_chunk(coord);
            assert!(chunk.is_uniform(TileId::AIR));
        }
        assert_eq!(generator.cached_columns(), 0);
    }

    #[test]
    fn test_populate_overwrites_previous_contents() {
        let mut catalog = WorldGenCatalog::new();
        catalog
            .register_landform(LandformDefinition::flat("plains", 1.0, 0.5))
            .unwrap();
        let generator = WorldGenerator::new(Config::default(), Arc::new(catalog), &TileCatalog::new());

        let coord = ChunkCoord::new(0, 20);
        let mut reused = Chunk::new();
        reused.set(4, 4, TileId(99));
        generator.populate(coord, &mut reused);
        assert_eq!(reused, generator.generate_chunk(coord));
    }

    #[test]
    fn test_column_cache_fills_on_demand() {
        let mut catalog = WorldGenCatalog::new();
        catalog
            .register_landform(LandformDefinition::flat("plains", 1.0, 0.5))
            .unwrap();
        let generator = WorldGenerator::new(Config::default(), Arc::new(catalog), &TileCatalog::new());
        assert_eq!(generator.cached_columns(), 0);

        // Column 5 needs columns 0..=4 for its surface hint.
        generator.column(5);
        assert_eq!(generator.cached_columns(), 6);

        generator.generate_chunk(ChunkCoord::new(0, 0));
        assert_eq!(generator.cached_columns(), CHUNK_SIZE);

        // Cached columns are handed out, not rebuilt.
        assert!(Arc::ptr_eq(&generator.column(5), &generator.column(5)));
        assert!(Arc::ptr_eq(&generator.column(-1), &generator.column(-1)));
        assert_eq!(generator.cached_columns(), 2 * CHUNK_SIZE);
    }
}
