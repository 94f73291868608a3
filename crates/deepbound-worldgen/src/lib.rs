//! Deterministic, infinite 2D side-view terrain generation: landform and
//! province blending, a density field, rock strata, caves, soil, and chunk
//! assembly over a sharded column cache.

mod blend;
mod cave;
mod chunk;
mod climate;
mod column;
mod column_cache;
mod density;
mod error;
mod generator;
mod landform;
mod noise_source;
mod province;
mod seed;
mod soil;
mod spline;
mod strata;
mod sublayer;
mod tiles;

pub mod async_generation;
pub mod catalog;


pub use async_generation::{AsyncChunkGenerator, GeneratedChunk, default_thread_count};
pub use catalog::{
    CatalogDefinitions, ClimateGate, GenDirection, GeologicProvinceDefinition, LandformDefinition,
    LandformId, ProvinceId, RockGroup, RockGroupBudget, RockStratumDefinition, SoilEntry,
    SoilLayerDefinition, SoilLayerId, StratumId, SubLayerPattern, SubLayerRule, Thickness,
    WorldGenCatalog,
};
pub use cave::CaveCarver;
pub use chunk::{CHUNK_AREA, CHUNK_SIZE, Chunk, ChunkCoord};
pub use climate::{ClimateSample, ColumnClimate};
pub use column::{ColumnBuilder, ColumnInfo, surface_hint_column};
pub use column_cache::ColumnCache;
pub use density::{ColumnTerrain, DensityField};
pub use error::{CatalogError, GenerationIssue};
pub use generator::WorldGenerator;
pub use landform::{LandformBlend, blend_landforms};
pub use noise_source::{FractalParams, MAX_OCTAVES, NoiseSource, WorldNoise};
pub use province::{ProvinceBlend, blend_provinces};
pub use seed::{NoiseChannel, derive_column_seed};
pub use soil::{SoilBand, resolve_soil, select_soil_layer};
pub use spline::{SplineError, TerrainSpline};
pub use strata::{StrataRange, StrataStack, StrataStacker};
pub use tiles::{ResolvedTiles, WATER_CODE};
