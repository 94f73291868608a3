//! Province sub-layers: blobs, bands, veins, intrusions and crusts of a
//! secondary tile painted over stratum rock.

use deepbound_content::TileId;

use crate::catalog::{SubLayerPattern, SubLayerRule};
use crate::noise_source::{FractalParams, NoiseSource};

/// Horizontal offset between rules so two rules never share a pattern.
const RULE_OFFSET: f64 = 7331.0;

/// Octaves of the blob pattern.
const BLOB_OCTAVES: u32 = 3;

/// Horizontal stretch of the band pattern.
const BAND_STRETCH: f64 = 0.1;

/// Whether `rule` (the `index`-th of its province) covers `(x, y)`.
///
/// `depth` is the distance below the column surface; crusts only appear
/// within `crust_depth` of it.
pub fn rule_matches(
    noise: &NoiseSource,
    rule: &SubLayerRule,
    index: usize,
    x: i32,
    y: i32,
    depth: i32,
    crust_depth: i32,
) -> bool {
    let fx = x as f64 + index as f64 * RULE_OFFSET;
    let fy = y as f64;
    let f = rule.frequency;

    match rule.pattern {
        SubLayerPattern::Blob => {
            noise.fractal(fx, fy, &FractalParams::new(f, BLOB_OCTAVES)) > rule.threshold
        }
        SubLayerPattern::Band => noise.raw(fx * f * BAND_STRETCH, fy * f) > rule.threshold,
        SubLayerPattern::Vein => 1.0 - noise.raw(fx * f, fy * f).abs() > rule.threshold,
        SubLayerPattern::Intrusion => noise.cellular(fx, fy, f) > rule.threshold,
        SubLayerPattern::Crust => {
            (0..crust_depth).contains(&depth) && noise.raw(fx * f, fy * f) > rule.threshold
        }
    }
}

/// First matching rule's tile, or `None`.
///
/// `tiles[i]` is the resolved tile of `rules[i]`.
pub fn sublayer_tile(
    noise: &NoiseSource,
    rules: &[SubLayerRule],
    tiles: &[TileId],
    x: i32,
    y: i32,
    depth: i32,
    crust_depth: i32,
) -> Option<TileId> {
    rules
        .iter()
        .zip(tiles)
        .enumerate()
        .find(|(index, (rule, _))| rule_matches(noise, rule, *index, x, y, depth, crust_depth))
        .map(|(_, (_, &tile))| tile)
}
