//! Noise-based cave carving.
//!
//! Ridged 2D noise, stretched vertically, opens worm-like tunnels in solid
//! ground. Depth bounds keep the surface crust intact, and a buffer under
//! submerged surfaces keeps the sea floor sealed.

use deepbound_config::CaveConfig;

use crate::noise_source::{FractalParams, NoiseSource};

/// Octaves of the cave noise.
const CAVE_OCTAVES: u32 = 3;

/// Decides which solid cells become cave space.
pub struct CaveCarver<'a> {
    noise: &'a NoiseSource,
    config: &'a CaveConfig,
    sea_level: i32,
}

impl<'a> CaveCarver<'a> {
    pub fn new(noise: &'a NoiseSource, config: &'a CaveConfig, sea_level: i32) -> Self {
        Self {
            noise,
            config,
            sea_level,
        }
    }

    /// Returns the cave configuration.
    pub fn config(&self) -> &CaveConfig {
        self.config
    }

    /// Whether the cell at `(x, y)` in a column with surface `surface_y`
    /// should be carved open.
    pub fn is_cave(&self, x: i32, y: i32, surface_y: i32) -> bool {
        if !self.config.enabled || y >= surface_y {
            return false;
        }

        let depth = surface_y.saturating_sub(y);
        if depth < self.config.min_depth || depth > self.config.max_depth {
            return false;
        }

        // Keep the floor of lakes and seas sealed.
        if surface_y < self.sea_level && depth < self.config.ocean_floor_buffer {
            return false;
        }

        let params = FractalParams::new(self.config.frequency, CAVE_OCTAVES);
        let ridged = 1.0 - self.noise.fractal(x as f64, 2.0 * y as f64, &params).abs();

        // Caves become rarer towards max_depth.
        let span = self.config.max_depth.saturating_sub(self.config.min_depth).max(1) as f64;
        let depth_factor = 1.0 - ((depth - self.config.min_depth) as f64 / span).powi(2);

        ridged * depth_factor * self.config.magnitude > self.config.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carver_config() -> CaveConfig {
        CaveConfig::default()
    }

    #[test]
    fn test_no_caves_above_surface() {
        let noise = NoiseSource::new(8009, 0.0005);
        let config = carver_config();
        let carver = CaveCarver::new(&noise, &config, 440);
        for x in 0..200 {
            for y in 500..520 {
                assert!(!carver.is_cave(x, y, 500));
            }
        }
    }

    #[test]
    fn test_extreme_rows_are_not_carved() {
        let noise = NoiseSource::new(8009, 0.0005);
        let config = carver_config();
        let carver = CaveCarver::new(&noise, &config, 440);
        for y in [i32::MIN, i32::MIN + 1, i32::MIN / 32 * 32] {
            assert!(!carver.is_cave(0, y, 500));
            assert!(!carver.is_cave(0, y, i32::MAX));
        }
    }

    #[test]
    fn test_min_depth_respected() {
        let noise = NoiseSource::new(8009, 0.0005);
        let config = carver_config();
        let carver = CaveCarver::new(&noise, &config, 440);
        for x in 0..500 {
            for depth in 0..config.min_depth {
                assert!(!carver.is_cave(x, 500 - depth, 500));
            }
        }
    }

    #[test]
    fn test_max_depth_respected() {
        let noise = NoiseSource::new(8009, 0.0005);
        let config = carver_config();
        let carver = CaveCarver::new(&noise, &config, 0);
        let surface = 900;
        for x in 0..500 {
            for y in 0..(surface - config.max_depth) {
                assert!(!carver.is_cave(x, y, surface));
            }
        }
    }

    #[test]
    fn test_ocean_floor_buffer() {
        let noise = NoiseSource::new(8009, 0.0005);
        let config = carver_config();
        let carver = CaveCarver::new(&noise, &config, 440);
        for x in 0..500 {
            for depth in 0..config.ocean_floor_buffer {
                assert!(!carver.is_cave(x, 400 - depth, 400));
            }
        }
    }

    #[test]
    fn test_caves_exist_underground() {
        let noise = NoiseSource::new(8009, 0.0005);
        let config = carver_config();
        let carver = CaveCarver::new(&noise, &config, 440);
        let carved = (0..400)
            .flat_map(|x| (300..480).map(move |y| (x, y)))
            .filter(|&(x, y)| carver.is_cave(x, y, 500))
            .count();
        assert!(carved > 0, "expected some cave cells");
        assert!(carved < 400 * 180 / 2, "caves should not dominate: {carved}");
    }

    #[test]
    fn test_disabled_carves_nothing() {
        let noise = NoiseSource::new(8009, 0.0005);
        let config = CaveConfig {
            enabled: false,
            threshold: -1.0,
            ..CaveConfig::default()
        };
        let carver = CaveCarver::new(&noise, &config, 440);
        assert!(!carver.is_cave(10, 100, 500));
    }
}
