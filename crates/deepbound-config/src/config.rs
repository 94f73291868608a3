//! Configuration structs with sensible defaults and RON persistence.
//!
//! Most numbers here are empirically tuned generation constants. They are kept
//! configurable because they do not necessarily carry over to other world
//! sizes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name used inside the config directory.
const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Seed and world dimensions.
    pub world: WorldConfig,
    /// Density field, blending and upheaval tuning.
    pub terrain: TerrainConfig,
    /// Rock strata allocation tuning.
    pub strata: StrataConfig,
    /// Cave carving tuning.
    pub caves: CaveConfig,
    /// Climate sampling tuning.
    pub climate: ClimateConfig,
    /// Column cache settings.
    pub cache: CacheConfig,
    /// Background generation worker pool.
    pub workers: WorkerConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Seed and vertical extent of the world.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Master seed; every noise channel is derived from it.
    pub seed: u64,
    /// World height in tiles. Normalized heights are `y / height`.
    pub height: i32,
    /// Open cells below this row are water.
    pub sea_level: i32,
}

/// Density field and blending constants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Frequency of the first terrain octave; each further octave doubles it.
    pub base_frequency: f64,
    /// Multiplier applied to `spline(y) - y` before adding the noise term.
    pub curve_multiplier: f64,
    /// Grid spacing (tiles) of the landform selection lattice.
    pub landform_grid_spacing: f64,
    /// Grid spacing (tiles) of the geologic province lattice.
    pub province_grid_spacing: f64,
    /// Frequency of the domain warp noise.
    pub warp_frequency: f64,
    /// Maximum domain warp offset in tiles.
    pub warp_magnitude: f64,
    /// Blend weights below this are dropped.
    pub blend_epsilon: f64,
    /// Rows above the previous column's surface where the surface scan starts.
    pub surface_search_margin: i32,
    /// Frequency of the upheaval noise.
    pub upheaval_frequency: f64,
    /// Upheaval magnitude below which the field has no effect.
    pub upheaval_threshold: f64,
    /// Normalized depth below the nominal surface past which upheaval is ignored.
    pub upheaval_max_depth: f64,
    /// Density removed at full canyon strength.
    pub canyon_magnitude: f64,
    /// Density added at full plateau strength.
    pub plateau_magnitude: f64,
    /// Normalized height above the nominal surface a plateau can reach.
    pub plateau_max_height: f64,
}

/// Rock strata allocation constants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StrataConfig {
    /// Converts province budgets and strata noise (map units) to tiles.
    pub thickness_scale: f64,
    /// Allocations thinner than this (tiles) are skipped.
    pub min_visible_thickness: f64,
    /// Frequency of the boundary wobble noise.
    pub wobble_frequency: f64,
    /// Maximum boundary displacement in tiles.
    pub wobble_amplitude: f64,
    /// Depth (tiles) below the surface where crust sub-layers may appear.
    pub sublayer_crust_depth: i32,
}

/// Cave carving constants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaveConfig {
    /// Disable to generate solid ground only.
    pub enabled: bool,
    /// Base frequency of the cave noise.
    pub frequency: f64,
    /// Scale applied to the ridged cave value before thresholding.
    pub magnitude: f64,
    /// Cells whose carve value exceeds this become open.
    pub threshold: f64,
    /// No caves closer than this to the surface.
    pub min_depth: i32,
    /// No caves deeper than this below the surface.
    pub max_depth: i32,
    /// Extra solid rows kept under submerged surfaces.
    pub ocean_floor_buffer: i32,
}

/// Climate sampling constants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClimateConfig {
    /// Frequency of the temperature and rainfall noise.
    pub frequency: f64,
    /// Temperatures span `[-range, range]` degrees.
    pub temperature_range: f64,
    /// Rainfall spans `[0, rainfall_max]`.
    pub rainfall_max: f64,
    /// Maximum temperature jitter applied per column.
    pub temperature_dither: f64,
    /// Maximum rainfall jitter applied per column.
    pub rainfall_dither: f64,
    /// Degrees lost per tile above sea level.
    pub temperature_lapse: f64,
}

/// Column cache settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    /// Number of independently locked shards.
    pub shards: usize,
}

/// Background generation worker pool settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkerConfig {
    /// Worker threads; 0 picks `cpus - 2` (at least 1).
    pub threads: usize,
    /// Maximum queued or running generation tasks.
    pub max_in_flight: usize,
    /// Capacity of the completed-chunk channel.
    pub result_capacity: usize,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 1337,
            height: 1024,
            sea_level: 440,
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            base_frequency: 0.0005,
            curve_multiplier: 16.0,
            landform_grid_spacing: 256.0,
            province_grid_spacing: 1024.0,
            warp_frequency: 0.002,
            warp_magnitude: 96.0,
            blend_epsilon: 0.001,
            surface_search_margin: 64,
            upheaval_frequency: 0.0004,
            upheaval_threshold: 0.4,
            upheaval_max_depth: 0.12,
            canyon_magnitude: 1.5,
            plateau_magnitude: 0.75,
            plateau_max_height: 0.06,
        }
    }
}

impl Default for StrataConfig {
    fn default() -> Self {
        Self {
            thickness_scale: 4.0,
            min_visible_thickness: 2.0,
            wobble_frequency: 0.08,
            wobble_amplitude: 1.5,
            sublayer_crust_depth: 6,
        }
    }
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            frequency: 0.012,
            magnitude: 1.0,
            threshold: 0.9,
            min_depth: 5,
            max_depth: 600,
            ocean_floor_buffer: 10,
        }
    }
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            frequency: 0.001,
            temperature_range: 50.0,
            rainfall_max: 255.0,
            temperature_dither: 1.5,
            rainfall_dither: 4.0,
            temperature_lapse: 0.02,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { shards: 16 }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            max_in_flight: 64,
            result_capacity: 128,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Platform config directory for Deepbound, if one can be determined.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("deepbound"))
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::Read)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::Parse)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::Write)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::Write)?;
        Ok(())
    }

    /// Reject settings the generator cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason| Err(ConfigError::Invalid { field, reason });
        if self.world.height <= 0 {
            return invalid("world.height", "must be positive");
        }
        if !(0..self.world.height).contains(&self.world.sea_level) {
            return invalid("world.sea_level", "must lie inside the world height");
        }
        if !(self.terrain.base_frequency > 0.0) {
            return invalid("terrain.base_frequency", "must be positive");
        }
        if !(self.terrain.landform_grid_spacing > 0.0 && self.terrain.province_grid_spacing > 0.0)
        {
            return invalid("terrain grid spacing", "must be positive");
        }
        if self.terrain.surface_search_margin < 0 {
            return invalid("terrain.surface_search_margin", "must not be negative");
        }
        if !(self.strata.thickness_scale > 0.0) {
            return invalid("strata.thickness_scale", "must be positive");
        }
        if self.caves.min_depth > self.caves.max_depth {
            return invalid("caves.min_depth", "must not exceed caves.max_depth");
        }
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::Read)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::Parse)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
