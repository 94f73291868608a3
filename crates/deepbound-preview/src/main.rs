//! Terminal preview of a Deepbound world.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI
//! flags. Run with `cargo run -p deepbound-preview -- --seed 42 --chunk-x -8`.

mod demo_catalog;
mod render;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use deepbound_config::{CliArgs, Config};
use deepbound_worldgen::{AsyncChunkGenerator, CHUNK_SIZE, ChunkCoord, WorldGenerator};
use hashbrown::HashMap;
use tracing::{error, info, warn};

use crate::render::{Palette, Window};

/// Rows shown below and above sea level.
const DEPTH_BELOW_SEA: i32 = 160;
const HEIGHT_ABOVE_SEA: i32 = 192;

/// How long to wait for the worker pool.
const GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

fn main() {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(Config::default_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);
    if let Err(e) = config.validate() {
        eprintln!("{e}");
        std::process::exit(2);
    }

    let log_dir = config_dir.join("logs");
    deepbound_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let catalog = match demo_catalog::load_catalog(&config_dir) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };
    let tiles = demo_catalog::tile_catalog_for(&catalog);

    let generator = Arc::new(WorldGenerator::new(config.clone(), Arc::new(catalog), &tiles));
    for issue in generator.issues() {
        warn!("{issue}");
    }

    let pool = match AsyncChunkGenerator::from_config(Arc::clone(&generator), &config.workers) {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to start chunk workers: {e}");
            std::process::exit(1);
        }
    };

    let sea_level = config.world.sea_level;
    let min = ChunkCoord::containing(args.chunk_x * CHUNK_SIZE as i32, sea_level - DEPTH_BELOW_SEA);
    let max = ChunkCoord::containing(
        (args.chunk_x + args.chunks_wide.max(1) as i32) * CHUNK_SIZE as i32 - 1,
        sea_level + HEIGHT_ABOVE_SEA,
    );
    let window = generate_window(&pool, min, max);

    let palette = Palette::new(&tiles);
    for line in window.render(&palette, args.step) {
        println!("{line}");
    }

    let (x0, _) = min.world_origin();
    let surfaces: Vec<i32> = (0..args.chunks_wide.max(1) as i32)
        .map(|i| generator.column(x0 + i * CHUNK_SIZE as i32).surface_y)
        .collect();
    info!(
        "Seed {}: surface at chunk edges {:?}, {} columns cached",
        config.world.seed,
        surfaces,
        generator.cached_columns()
    );
}

/// Generate every chunk in `min..=max` on the worker pool.
fn generate_window(pool: &AsyncChunkGenerator, min: ChunkCoord, max: ChunkCoord) -> Window {
    let mut queue: Vec<ChunkCoord> = (min.x..=max.x)
        .flat_map(|x| (min.y..=max.y).map(move |y| ChunkCoord::new(x, y)))
        .collect();
    let expected = queue.len();
    let mut chunks = HashMap::with_capacity(expected);
    let mut total_us = 0u64;

    let start = Instant::now();
    while chunks.len() < expected && start.elapsed() < GENERATION_TIMEOUT {
        // Refill the pool; rejected coordinates stay queued.
        queue.retain(|&coord| pool.submit(coord).is_err());

        for generated in pool.drain_results() {
            total_us += generated.generation_time_us;
            chunks.insert(generated.coord, generated.chunk);
        }
        std::thread::sleep(Duration::from_millis(2));
    }

    if chunks.len() < expected {
        warn!("Only {}/{} chunks generated in time", chunks.len(), expected);
    }
    info!(
        "Generated {} chunks in {:.1?} ({} µs average per chunk)",
        chunks.len(),
        start.elapsed(),
        total_us / chunks.len().max(1) as u64
    );

    Window { chunks, min, max }
}
