//! Slow-varying temperature and rainfall per column.

use deepbound_config::ClimateConfig;

use crate::noise_source::WorldNoise;
use crate::seed::{NoiseChannel, hash_unit, salt};

/// Climate stored per chunk cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClimateSample {
    /// Degrees Celsius.
    pub temperature: f32,
    /// 0 (arid) to `rainfall_max` (wet).
    pub rainfall: f32,
}

impl ClimateSample {
    /// The same climate `y - sea_level` tiles above sea level.
    pub fn at_height(self, y: i32, sea_level: i32, lapse: f64) -> Self {
        let above = y.saturating_sub(sea_level).max(0) as f64;
        Self {
            temperature: (self.temperature as f64 - lapse * above) as f32,
            rainfall: self.rainfall,
        }
    }
}

/// Undithered climate of a column; drives landform selection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnClimate {
    pub temperature: f64,
    pub rainfall: f64,
}

impl ColumnClimate {
    /// Sample the temperature and rainfall channels at column `x`.
    pub fn sample(noise: &WorldNoise, config: &ClimateConfig, x: i32) -> Self {
        let fx = x as f64 * config.frequency;
        let temperature =
            noise.channel(NoiseChannel::Temperature).raw(fx, 0.0) * config.temperature_range;
        let rainfall =
            (noise.channel(NoiseChannel::Rainfall).raw(fx, 0.0) + 1.0) * 0.5 * config.rainfall_max;
        Self {
            temperature,
            rainfall: rainfall.clamp(0.0, config.rainfall_max),
        }
    }

    /// Add a small per-column jitter so gate boundaries are not razor straight.
    pub fn dithered(self, world_seed: u64, x: i32, config: &ClimateConfig) -> ClimateSample {
        let column = i64::from(x);
        let jitter_t = hash_unit(world_seed, column, 0, salt::TEMPERATURE_DITHER) * 2.0 - 1.0;
        let jitter_r = hash_unit(world_seed, column, 0, salt::RAINFALL_DITHER) * 2.0 - 1.0;
        let rainfall = (self.rainfall + jitter_r * config.rainfall_dither)
            .clamp(0.0, config.rainfall_max);
        ClimateSample {
            temperature: (self.temperature + jitter_t * config.temperature_dither) as f32,
            rainfall: rainfall as f32,
        }
    }
}
