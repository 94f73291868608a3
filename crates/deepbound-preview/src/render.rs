//! ASCII rendering of generated chunks.

use deepbound_content::{TileCatalog, TileDef, TileId};
use deepbound_worldgen::{CHUNK_SIZE, Chunk, ChunkCoord};
use hashbrown::HashMap;

/// One glyph per tile.
pub struct Palette {
    glyphs: Vec<char>,
}

impl Palette {
    pub fn new(tiles: &TileCatalog) -> Self {
        Self {
            glyphs: tiles.iter().map(|(_, def)| glyph_for(def)).collect(),
        }
    }

    pub fn glyph(&self, tile: TileId) -> char {
        self.glyphs.get(tile.0 as usize).copied().unwrap_or('?')
    }
}

fn glyph_for(def: &TileDef) -> char {
    match def.id.path() {
        TileCatalog::AIR_CODE => ' ',
        TileCatalog::FALLBACK_CODE => '?',
        "water" => '~',
        "soil-grass" => '"',
        "soil-snow" => '_',
        "soil-sand" => ':',
        "soil-dirt" => '%',
        "soil-gravel" => ',',
        "soil-clay" => '=',
        "rock-bedrock" => '@',
        "rock-obsidian" => 'O',
        path if path.starts_with("ore-") => '*',
        path => path
            .rsplit('-')
            .next()
            .and_then(|word| word.chars().next())
            .map_or('#', |c| c.to_ascii_uppercase()),
    }
}

/// Generated chunks of a rectangular window, keyed by coordinate.
pub struct Window {
    pub chunks: HashMap<ChunkCoord, Chunk>,
    pub min: ChunkCoord,
    pub max: ChunkCoord,
}

impl Window {
    /// Render rows top to bottom, sampling every `step` tiles horizontally
    /// and every `2 * step` tiles vertically (terminal cells are tall).
    pub fn render(&self, palette: &Palette, step: u32) -> Vec<String> {
        let step = step.max(1) as i32;
        let size = CHUNK_SIZE as i32;
        let (x0, y0) = self.min.world_origin();
        let x1 = (self.max.x + 1) * size;
        let y1 = (self.max.y + 1) * size;

        let mut lines = Vec::new();
        let mut y = y1 - 1;
        while y >= y0 {
            let line = (x0..x1)
                .step_by(step as usize)
                .map(|x| {
                    let coord = ChunkCoord::containing(x, y);
                    let (ox, oy) = coord.world_origin();
                    self.chunks.get(&coord).map_or(' ', |chunk| {
                        palette.glyph(chunk.get((x - ox) as usize, (y - oy) as usize))
                    })
                })
                .collect();
            lines.push(line);
            y -= 2 * step;
        }
        lines
    }
}
