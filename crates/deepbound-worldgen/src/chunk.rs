//! Fixed-size 2D chunk of tiles with a parallel climate grid.

use std::hash::{DefaultHasher, Hash, Hasher};

use deepbound_content::TileId;
use serde::{Deserialize, Serialize};

use crate::climate::ClimateSample;

/// Side length of a chunk in tiles.
pub const CHUNK_SIZE: usize = 32;

/// Total number of cells in a chunk (32²).
pub const CHUNK_AREA: usize = CHUNK_SIZE * CHUNK_SIZE;

/// [`CHUNK_SIZE`] as a world-coordinate offset.
pub(crate) const CHUNK_SIZE_I32: i32 = CHUNK_SIZE as i32;

/// Position of a chunk in chunk units. `y` grows upward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chunk containing the world tile `(x, y)`.
    pub fn containing(x: i32, y: i32) -> Self {
        Self {
            x: x.div_euclid(CHUNK_SIZE_I32),
            y: y.div_euclid(CHUNK_SIZE_I32),
        }
    }

    /// World coordinates of the bottom-left tile.
    pub fn world_origin(self) -> (i32, i32) {
        (
            self.x.wrapping_mul(CHUNK_SIZE_I32),
            self.y.wrapping_mul(CHUNK_SIZE_I32),
        )
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Tile and climate grids of one chunk, row-major from the bottom row.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    tiles: Vec<TileId>,
    climate: Vec<ClimateSample>,
}

impl Chunk {
    /// A chunk of air with a zeroed climate grid.
    pub fn new() -> Self {
        Self {
            tiles: vec![TileId::AIR; CHUNK_AREA],
            climate: vec![ClimateSample::default(); CHUNK_AREA],
        }
    }

    /// Returns the tile at local `(x, y)`. Each coordinate must be in `0..32`.
    pub fn get(&self, x: usize, y: usize) -> TileId {
        self.tiles[Self::linear_index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, tile: TileId) {
        self.tiles[Self::linear_index(x, y)] = tile;
    }

    pub fn climate(&self, x: usize, y: usize) -> ClimateSample {
        self.climate[Self::linear_index(x, y)]
    }

    pub fn set_climate(&mut self, x: usize, y: usize, sample: ClimateSample) {
        self.climate[Self::linear_index(x, y)] = sample;
    }

    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    pub fn climate_grid(&self) -> &[ClimateSample] {
        &self.climate
    }

    /// Resets every cell to air with a zeroed climate.
    pub fn clear(&mut self) {
        self.tiles.fill(TileId::AIR);
        self.climate.fill(ClimateSample::default());
    }

    /// Returns `true` if every tile is `tile`.
    pub fn is_uniform(&self, tile: TileId) -> bool {
        self.tiles.iter().all(|&t| t == tile)
    }

    /// Number of cells holding `tile`.
    pub fn count(&self, tile: TileId) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// Hash of tiles and climate bits. Equal chunks hash equally.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.tiles.hash(&mut hasher);
        for sample in &self.climate {
            sample.temperature.to_bits().hash(&mut hasher);
            sample.rainfall.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }

    #[inline]
    fn linear_index(x: usize, y: usize) -> usize {
        debug_assert!(x < CHUNK_SIZE && y < CHUNK_SIZE, "({x}, {y}) out of chunk bounds");
        y * CHUNK_SIZE + x
    }
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new()
    }
}
