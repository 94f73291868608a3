//! Asynchronous chunk generation on a fixed thread pool.
//!
//! Workers share one [`WorldGenerator`] (and so one column cache), pull chunk
//! coordinates from a bounded channel and deliver finished chunks on a second
//! bounded channel. There is no cancellation: a caller that no longer wants
//! a chunk simply drops the result.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, bounded};
use dashmap::DashMap;
use deepbound_config::WorkerConfig;

use crate::chunk::{Chunk, ChunkCoord};
use crate::generator::WorldGenerator;

/// A fully generated chunk ready for the chunk store.
#[derive(Debug)]
pub struct GeneratedChunk {
    pub coord: ChunkCoord,
    pub chunk: Chunk,
    /// Generation time in microseconds (for profiling).
    pub generation_time_us: u64,
}

/// Manages asynchronous chunk generation across a thread pool.
pub struct AsyncChunkGenerator {
    generator: Arc<WorldGenerator>,
    task_sender: Sender<ChunkCoord>,
    result_receiver: Receiver<GeneratedChunk>,
    /// Submission time of every coordinate not yet drained.
    pending: Arc<DashMap<ChunkCoord, Instant>>,
    /// Current number of queued or executing tasks.
    in_flight: Arc<AtomicU64>,
    max_in_flight: u64,
}

impl AsyncChunkGenerator {
    /// Create a pool of `thread_count` workers (at least one).
    ///
    /// - `max_in_flight`: submissions beyond this many queued or executing
    ///   tasks are rejected.
    /// - `result_capacity`: bounded channel capacity for finished chunks.
    pub fn new(
        generator: Arc<WorldGenerator>,
        thread_count: usize,
        max_in_flight: usize,
        result_capacity: usize,
    ) -> io::Result<Self> {
        let max_in_flight = max_in_flight.max(1);
        let (task_sender, task_receiver) = bounded::<ChunkCoord>(max_in_flight);
        let (result_sender, result_receiver) = bounded::<GeneratedChunk>(result_capacity.max(1));
        let in_flight = Arc::new(AtomicU64::new(0));

        for _ in 0..thread_count.max(1) {
            let receiver = task_receiver.clone();
            let sender = result_sender.clone();
            let in_flight = Arc::clone(&in_flight);
            let generator = Arc::clone(&generator);

            std::thread::Builder::new()
                .name("chunk-gen-worker".into())
                .spawn(move || {
                    while let Ok(coord) = receiver.recv() {
                        let start = Instant::now();
                        let chunk = generator.generate_chunk(coord);
                        let elapsed = start.elapsed().as_micros() as u64;
                        tracing::debug!("Generated chunk {coord} in {elapsed} µs");

                        let delivered = sender
                            .send(GeneratedChunk {
                                coord,
                                chunk,
                                generation_time_us: elapsed,
                            })
                            .is_ok();
                        in_flight.fetch_sub(1, Ordering::Relaxed);
                        if !delivered {
                            break;
                        }
                    }
                })?;
        }

        tracing::info!(
            "Chunk generation pool started: {} workers, {} max in flight",
            thread_count.max(1),
            max_in_flight
        );

        Ok(Self {
            generator,
            task_sender,
            result_receiver,
            pending: Arc::new(DashMap::new()),
            in_flight,
            max_in_flight: max_in_flight as u64,
        })
    }

    /// Create a pool sized from `config`; zero threads means one per spare
    /// CPU core.
    pub fn from_config(generator: Arc<WorldGenerator>, config: &WorkerConfig) -> io::Result<Self> {
        let threads = if config.threads == 0 {
            default_thread_count()
        } else {
            config.threads
        };
        Self::new(generator, threads, config.max_in_flight, config.result_capacity)
    }

    /// Create a pool with a thread count based on CPU cores.
    pub fn with_defaults(generator: Arc<WorldGenerator>) -> io::Result<Self> {
        Self::from_config(generator, &WorkerConfig::default())
    }

    pub fn generator(&self) -> &Arc<WorldGenerator> {
        &self.generator
    }

    /// Submit a chunk for background generation.
    ///
    /// Returns `Err(coord)` when the pool is saturated; resubmit later.
    pub fn submit(&self, coord: ChunkCoord) -> Result<(), ChunkCoord> {
        if self.in_flight.fetch_add(1, Ordering::Relaxed) >= self.max_in_flight {
            self.in_flight.fetch_sub(1, Ordering::Relaxed);
            return Err(coord);
        }
        self.pending.insert(coord, Instant::now());

        self.task_sender.try_send(coord).map_err(|e| {
            self.in_flight.fetch_sub(1, Ordering::Relaxed);
            let coord = e.into_inner();
            self.pending.remove(&coord);
            coord
        })
    }

    /// Drain all finished chunks from the result channel.
    pub fn drain_results(&self) -> Vec<GeneratedChunk> {
        let mut results = Vec::new();
        while let Ok(generated) = self.result_receiver.try_recv() {
            if let Some((_, submitted)) = self.pending.remove(&generated.coord) {
                tracing::debug!(
                    "Chunk {} delivered {} µs after submission",
                    generated.coord,
                    submitted.elapsed().as_micros()
                );
            }
            results.push(generated);
        }
        results
    }

    /// Number of tasks currently in flight (queued or executing).
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Returns `true` if `coord` was submitted and not yet drained.
    pub fn is_pending(&self, coord: &ChunkCoord) -> bool {
        self.pending.contains_key(coord)
    }
}

/// `num_cpus - 2`, leaving headroom for the caller's own threads.
pub fn default_thread_count() -> usize {
    num_cpus::get().saturating_sub(2).max(1)
}
