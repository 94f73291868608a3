//! Strata stacker: allocates rock-layer ranges against province budgets.
//!
//! Strata are visited in catalog order. Each gets a noise-driven thickness,
//! clamped to what is left of its rock group's budget, and is stacked either
//! upward from the world floor or downward from the local surface. The two
//! stacks never cross.

use deepbound_config::StrataConfig;
use deepbound_content::TileId;

use crate::catalog::{GenDirection, RockGroup, RockGroupBudget, StratumId, WorldGenCatalog};
use crate::noise_source::NoiseSource;

/// Y offset between strata in the thickness noise, so strata decorrelate.
const STRATUM_NOISE_ROW: f64 = 7919.0;

/// One allocated layer covering rows `[y_min, y_max)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrataRange {
    pub stratum: StratumId,
    pub tile: TileId,
    pub y_min: i32,
    pub y_max: i32,
}

impl StrataRange {
    #[inline]
    pub fn contains(&self, y: f64) -> bool {
        y >= self.y_min as f64 && y < self.y_max as f64
    }

    pub fn thickness(&self) -> i32 {
        self.y_max - self.y_min
    }
}

/// All strata of one column.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrataStack {
    /// Allocated ranges in catalog order.
    pub ranges: Vec<StrataRange>,
    /// Stratum used for solid rows no range covers.
    pub fallback: Option<(StratumId, TileId)>,
    /// Thickness allocated per rock group, in tiles.
    pub allocated: RockGroupBudget,
}

impl StrataStack {
    /// Tile of the first range containing `y + wobble`.
    pub fn range_tile(&self, y: i32, wobble: f64) -> Option<TileId> {
        let probe = y as f64 + wobble;
        self.ranges
            .iter()
            .find(|range| range.contains(probe))
            .map(|range| range.tile)
    }

    /// Tile of the fallback stratum, if any.
    pub fn fallback_tile(&self) -> Option<TileId> {
        self.fallback.map(|(_, tile)| tile)
    }

    /// Total tiles covered by ranges of `group`'s strata.
    pub fn stacked_thickness(&self, catalog: &WorldGenCatalog, group: RockGroup) -> i32 {
        self.ranges
            .iter()
            .filter(|range| catalog.stratum(range.stratum).group == group)
            .map(StrataRange::thickness)
            .sum()
    }
}

/// Stacks strata for one column.
pub struct StrataStacker<'a> {
    catalog: &'a WorldGenCatalog,
    noise: &'a NoiseSource,
    config: &'a StrataConfig,
    /// Tile per stratum, indexed by `StratumId`.
    tiles: &'a [TileId],
}

impl<'a> StrataStacker<'a> {
    pub fn new(
        catalog: &'a WorldGenCatalog,
        noise: &'a NoiseSource,
        config: &'a StrataConfig,
        tiles: &'a [TileId],
    ) -> Self {
        Self {
            catalog,
            noise,
            config,
            tiles,
        }
    }

    /// Noise thickness of `stratum` at `x`, in tiles. Never negative.
    pub fn raw_thickness(&self, stratum: StratumId, x: i32) -> f64 {
        let def = self.catalog.stratum(stratum);
        let raw = self.noise.weighted_octaves(
            x as f64,
            stratum.0 as f64 * STRATUM_NOISE_ROW,
            &def.amplitudes,
            &def.thresholds,
            &def.frequencies,
        );
        (raw * self.config.thickness_scale).max(0.0)
    }

    /// Allocate ranges for column `x` with the surface at `surface_y`.
    ///
    /// `budget` is the blended province budget in map units; it is rescaled
    /// by `thickness_scale`. Over-budget thickness is clamped silently and
    /// every allocation is rounded down to whole tiles.
    pub fn stack(&self, x: i32, surface_y: i32, budget: &RockGroupBudget) -> StrataStack {
        let mut remaining = budget.scaled(self.config.thickness_scale);
        let mut allocated = RockGroupBudget::default();
        let mut ranges = Vec::new();
        let mut fallback = None;
        let mut last_bottom_up = None;

        let mut floor_cursor = 0.0_f64;
        let mut surface_cursor = surface_y.saturating_add(1).max(0) as f64;

        for (id, def) in self.catalog.strata() {
            let tile = self
                .tiles
                .get(id.0 as usize)
                .copied()
                .unwrap_or(TileId::FALLBACK);
            if def.direction == GenDirection::BottomUp {
                last_bottom_up = Some((id, tile));
            }

            let room = (surface_cursor - floor_cursor).max(0.0);
            let amount = self
                .raw_thickness(id, x)
                .min(remaining[def.group].max(0.0))
                .min(room)
                .floor();
            if amount <= 0.0 || amount < self.config.min_visible_thickness {
                continue;
            }

            let (low, high) = match def.direction {
                GenDirection::BottomUp => {
                    let span = (floor_cursor, floor_cursor + amount);
                    floor_cursor += amount;
                    fallback = Some((id, tile));
                    span
                }
                GenDirection::TopDown => {
                    let span = (surface_cursor - amount, surface_cursor);
                    surface_cursor -= amount;
                    span
                }
            };
            remaining[def.group] -= amount;
            allocated[def.group] += amount;
            ranges.push(StrataRange {
                stratum: id,
                tile,
                y_min: low as i32,
                y_max: high as i32,
            });
        }

        StrataStack {
            ranges,
            fallback: fallback.or(last_bottom_up),
            allocated,
        }
    }
}

/// Boundary displacement at `(x, y)` in tiles.
pub fn wobble(noise: &NoiseSource, config: &StrataConfig, x: i32, y: i32) -> f64 {
    let f = config.wobble_frequency;
    noise.raw(x as f64 * f, y as f64 * f) * config.wobble_amplitude
}
