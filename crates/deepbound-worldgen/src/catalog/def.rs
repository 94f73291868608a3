//! Definition types: landforms, rock strata, geologic provinces and soil layers.
//!
//! These are the already-parsed inputs handed over by the content loader.
//! They are immutable once registered in a [`WorldGenCatalog`](super::WorldGenCatalog).

use std::ops::{Index, IndexMut};

use deepbound_content::ResourceId;
use serde::{Deserialize, Serialize};

use crate::spline::TerrainSpline;

// ---------------------------------------------------------------------------
// Climate gate
// ---------------------------------------------------------------------------

/// Inclusive temperature/rainfall window.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClimateGate {
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub min_rainfall: f64,
    pub max_rainfall: f64,
}

impl ClimateGate {
    pub fn new(temperature: (f64, f64), rainfall: (f64, f64)) -> Self {
        Self {
            min_temperature: temperature.0,
            max_temperature: temperature.1,
            min_rainfall: rainfall.0,
            max_rainfall: rainfall.1,
        }
    }

    /// Whether the climate lies inside the window (bounds included).
    pub fn accepts(&self, temperature: f64, rainfall: f64) -> bool {
        (self.min_temperature..=self.max_temperature).contains(&temperature)
            && (self.min_rainfall..=self.max_rainfall).contains(&rainfall)
    }
}

/// `true` when there is no gate or the gate accepts the climate.
pub(crate) fn gate_accepts(gate: Option<&ClimateGate>, temperature: f64, rainfall: f64) -> bool {
    gate.is_none_or(|gate| gate.accepts(temperature, rainfall))
}

// ---------------------------------------------------------------------------
// Landforms
// ---------------------------------------------------------------------------

/// A named terrain shape: surface curve plus noise character.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LandformDefinition {
    pub code: String,
    /// Selection weight, non-negative.
    pub weight: f64,
    #[serde(default)]
    pub climate: Option<ClimateGate>,
    /// Amplitude per terrain-noise octave.
    #[serde(default)]
    pub terrain_octaves: Vec<f64>,
    /// Threshold per terrain-noise octave; may be shorter than the amplitudes.
    #[serde(default)]
    pub octave_thresholds: Vec<f64>,
    /// Normalized height → surface offset.
    pub y_keys: TerrainSpline,
}

impl LandformDefinition {
    /// A noiseless landform whose surface sits at `height` (normalized).
    pub fn flat(code: impl Into<String>, weight: f64, height: f64) -> Self {
        Self {
            code: code.into(),
            weight,
            climate: None,
            terrain_octaves: Vec::new(),
            octave_thresholds: Vec::new(),
            y_keys: TerrainSpline::flat(height),
        }
    }
}

// ---------------------------------------------------------------------------
// Rock strata
// ---------------------------------------------------------------------------

/// Rock family a stratum draws its thickness budget from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RockGroup {
    Sedimentary,
    Metamorphic,
    Igneous,
    Volcanic,
}

impl RockGroup {
    pub const COUNT: usize = 4;

    pub const ALL: [RockGroup; Self::COUNT] = [
        RockGroup::Sedimentary,
        RockGroup::Metamorphic,
        RockGroup::Igneous,
        RockGroup::Volcanic,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One thickness value per [`RockGroup`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RockGroupBudget(pub [f64; RockGroup::COUNT]);

impl RockGroupBudget {
    /// Builder-style setter.
    pub fn with(mut self, group: RockGroup, thickness: f64) -> Self {
        self[group] = thickness;
        self
    }

    /// `self += other · weight`, group by group.
    pub fn add_scaled(&mut self, other: &RockGroupBudget, weight: f64) {
        for (acc, value) in self.0.iter_mut().zip(other.0) {
            *acc += value * weight;
        }
    }

    /// Every group multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self(self.0.map(|value| value * factor))
    }
}

impl Index<RockGroup> for RockGroupBudget {
    type Output = f64;

    fn index(&self, group: RockGroup) -> &f64 {
        &self.0[group.index()]
    }
}

impl IndexMut<RockGroup> for RockGroupBudget {
    fn index_mut(&mut self, group: RockGroup) -> &mut f64 {
        &mut self.0[group.index()]
    }
}

/// Where a stratum starts stacking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenDirection {
    /// Upward from the world floor.
    BottomUp,
    /// Downward from the local surface.
    TopDown,
}

/// A single rock layer rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RockStratumDefinition {
    /// Tile placed for this layer; doubles as the stratum's code.
    pub block: ResourceId,
    pub group: RockGroup,
    pub amplitudes: Vec<f64>,
    #[serde(default)]
    pub thresholds: Vec<f64>,
    #[serde(default)]
    pub frequencies: Vec<f64>,
    pub direction: GenDirection,
}

// ---------------------------------------------------------------------------
// Geologic provinces
// ---------------------------------------------------------------------------

/// Shape of a province sub-layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubLayerPattern {
    /// Rounded pockets from fractal noise.
    Blob,
    /// Horizontally stretched bands.
    Band,
    /// Thin ridged veins.
    Vein,
    /// Angular cellular intrusions.
    Intrusion,
    /// Patches right under the surface.
    Crust,
}

/// Replaces stratum rock with `tile` where the pattern noise exceeds `threshold`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubLayerRule {
    pub tile: ResourceId,
    pub pattern: SubLayerPattern,
    pub frequency: f64,
    pub threshold: f64,
}

/// A region of the world with its own maximum strata thickness per rock group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeologicProvinceDefinition {
    pub code: String,
    pub weight: f64,
    /// Maximum stacked thickness per rock group, in map units.
    pub thickness: RockGroupBudget,
    #[serde(default)]
    pub sub_layers: Vec<SubLayerRule>,
}

// ---------------------------------------------------------------------------
// Soil layers
// ---------------------------------------------------------------------------

/// Inclusive thickness range in tiles. `min == max` is a fixed thickness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thickness {
    pub min: u32,
    pub max: u32,
}

impl Thickness {
    pub fn fixed(tiles: u32) -> Self {
        Self {
            min: tiles,
            max: tiles,
        }
    }

    pub fn range(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }
}

/// One soil tile and how deep it goes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SoilEntry {
    pub tile: ResourceId,
    pub thickness: Thickness,
}

impl SoilEntry {
    pub fn new(tile: ResourceId, thickness: Thickness) -> Self {
        Self { tile, thickness }
    }
}

/// Climate-gated surface covering, applied top-down from the surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SoilLayerDefinition {
    pub code: String,
    #[serde(default)]
    pub climate: Option<ClimateGate>,
    /// Used when the surface is at or above sea level.
    #[serde(default)]
    pub surface: Vec<SoilEntry>,
    /// Used when the surface is below sea level.
    #[serde(default)]
    pub underwater: Vec<SoilEntry>,
}
