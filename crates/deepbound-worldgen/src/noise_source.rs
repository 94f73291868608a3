//! Seeded coherent-noise primitives.
//!
//! A [`NoiseSource`] owns one simplex generator per octave, each seeded from
//! the channel seed plus a fixed stride. Every function is pure in
//! `(x, y, seed)`, so sources are shared across worker threads without any
//! synchronization.

use glam::DVec2;
use noise::{NoiseFn, Simplex};

use crate::seed::{NoiseChannel, hash_unit, salt};

/// Octaves beyond this are ignored by every multi-octave function.
pub const MAX_OCTAVES: usize = 16;

/// Seed distance between consecutive octaves of one channel.
pub const OCTAVE_SEED_STRIDE: u32 = 1000;

/// Parameters for [`NoiseSource::fractal`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FractalParams {
    /// Frequency of the first octave.
    pub frequency: f64,
    /// Number of octaves, clamped to `1..=MAX_OCTAVES`.
    pub octaves: u32,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between octaves.
    pub gain: f64,
}

impl FractalParams {
    /// Standard fBm parameters (lacunarity 2, gain 0.5).
    pub fn new(frequency: f64, octaves: u32) -> Self {
        Self {
            frequency,
            octaves,
            lacunarity: 2.0,
            gain: 0.5,
        }
    }
}

/// Noise generators for one purpose.
pub struct NoiseSource {
    seed: u32,
    base_frequency: f64,
    octaves: Vec<Simplex>,
}

impl NoiseSource {
    /// Create a source whose octave `k` is seeded with `seed + 1000·k`.
    ///
    /// `base_frequency` is the first-octave frequency used by
    /// [`weighted_octaves`](Self::weighted_octaves) when no explicit
    /// frequency is given.
    pub fn new(seed: u32, base_frequency: f64) -> Self {
        let octaves = (0..MAX_OCTAVES as u32)
            .map(|k| Simplex::new(seed.wrapping_add(OCTAVE_SEED_STRIDE.wrapping_mul(k))))
            .collect();
        Self {
            seed,
            base_frequency,
            octaves,
        }
    }

    /// Create the source for `channel` under `world_seed`.
    pub fn for_channel(channel: NoiseChannel, world_seed: u64, base_frequency: f64) -> Self {
        Self::new(channel.seed(world_seed), base_frequency)
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn base_frequency(&self) -> f64 {
        self.base_frequency
    }

    /// Raw simplex value in ≈[-1, 1]. Coordinates are used as given.
    #[inline]
    pub fn raw(&self, x: f64, y: f64) -> f64 {
        self.octaves[0].get([x, y])
    }

    /// Fractal Brownian motion normalized by the amplitude sum to ≈[-1, 1].
    pub fn fractal(&self, x: f64, y: f64, params: &FractalParams) -> f64 {
        let octaves = (params.octaves as usize).clamp(1, MAX_OCTAVES);
        let mut total = 0.0;
        let mut norm = 0.0;
        let mut frequency = params.frequency;
        let mut amplitude = 1.0;

        for simplex in &self.octaves[..octaves] {
            total += simplex.get([x * frequency, y * frequency]) * amplitude;
            norm += amplitude;
            frequency *= params.lacunarity;
            amplitude *= params.gain;
        }

        if norm > 0.0 { total / norm } else { 0.0 }
    }

    /// Cellular value in [-1, 1]: the value of the nearest jittered feature
    /// point in the 3×3 cell neighbourhood.
    pub fn cellular(&self, x: f64, y: f64, frequency: f64) -> f64 {
        let point = DVec2::new(x * frequency, y * frequency);
        let cell_x = point.x.floor() as i64;
        let cell_y = point.y.floor() as i64;
        let seed = u64::from(self.seed);

        let mut best_distance = f64::INFINITY;
        let mut best_value = 0.0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                let gx = cell_x + dx;
                let gy = cell_y + dy;
                let feature = DVec2::new(
                    gx as f64 + hash_unit(seed, gx, gy, salt::CELL_JITTER_X),
                    gy as f64 + hash_unit(seed, gx, gy, salt::CELL_JITTER_Y),
                );
                let distance = feature.distance_squared(point);
                if distance < best_distance {
                    best_distance = distance;
                    best_value = hash_unit(seed, gx, gy, salt::CELL_VALUE) * 2.0 - 1.0;
                }
            }
        }
        best_value
    }

    /// Weighted multi-octave sum `Σ max(0, v_k·amp_k − th_k)`.
    ///
    /// `v_k` is octave `k` remapped to [0, 1]. Missing thresholds are 0,
    /// missing frequencies are `base_frequency·2^k`.
    pub fn weighted_octaves(
        &self,
        x: f64,
        y: f64,
        amplitudes: &[f64],
        thresholds: &[f64],
        frequencies: &[f64],
    ) -> f64 {
        amplitudes
            .iter()
            .take(MAX_OCTAVES)
            .enumerate()
            .map(|(k, &amplitude)| {
                let threshold = thresholds.get(k).copied().unwrap_or(0.0);
                let frequency = frequencies
                    .get(k)
                    .copied()
                    .unwrap_or_else(|| self.base_frequency * 2.0_f64.powi(k as i32));
                let value = (self.octaves[k].get([x * frequency, y * frequency]) + 1.0) * 0.5;
                (value * amplitude - threshold).max(0.0)
            })
            .sum()
    }
}

/// One [`NoiseSource`] per [`NoiseChannel`], all derived from the world seed.
pub struct WorldNoise {
    world_seed: u64,
    sources: [NoiseSource; NoiseChannel::COUNT],
}

impl WorldNoise {
    pub fn new(world_seed: u64, base_frequency: f64) -> Self {
        Self {
            world_seed,
            sources: NoiseChannel::ALL
                .map(|channel| NoiseSource::for_channel(channel, world_seed, base_frequency)),
        }
    }

    pub fn world_seed(&self) -> u64 {
        self.world_seed
    }

    #[inline]
    pub fn channel(&self, channel: NoiseChannel) -> &NoiseSource {
        &self.sources[channel as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> NoiseSource {
        NoiseSource::new(1337, 0.0005)
    }

    #[test]
    fn test_raw_is_pure() {
        let a = source();
        let b = source();
        for i in 0..50 {
            let (x, y) = (i as f64 * 0.37, i as f64 * -1.13);
            assert_eq!(a.raw(x, y), b.raw(x, y));
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = NoiseSource::new(1, 0.01);
        let b = NoiseSource::new(2, 0.01);
        let differs = (0..50).any(|i| {
            let x = i as f64 * 0.73;
            a.raw(x, 0.5) != b.raw(x, 0.5)
        });
        assert!(differs, "Distinct seeds should produce distinct noise");
    }

    #[test]
    fn test_fractal_bounded() {
        let noise = source();
        let params = FractalParams::new(0.05, 5);
        for i in -100..100 {
            let v = noise.fractal(i as f64 * 3.1, i as f64 * 0.7, &params);
            assert!(v.abs() <= 1.05, "fractal out of range: {v}");
        }
    }

    #[test]
    fn test_cellular_bounded_and_piecewise_constant() {
        let noise = source();
        for i in -100..100 {
            let v = noise.cellular(i as f64 * 1.7, 3.0, 0.1);
            assert!((-1.0..=1.0).contains(&v), "cellular out of range: {v}");
        }
        // Two points at the exact same position must agree.
        assert_eq!(noise.cellular(12.5, -4.0, 0.1), noise.cellular(12.5, -4.0, 0.1));
    }

    #[test]
    fn test_weighted_octaves_non_negative() {
        let noise = source();
        let amps = [1.0, 0.5, 0.25, 0.125];
        for i in -200..200 {
            let v = noise.weighted_octaves(i as f64 * 13.0, 7.0, &amps, &[], &[]);
            assert!(v >= 0.0, "weighted_octaves must not be negative: {v}");
            assert!(v <= 1.875 * 1.05, "weighted_octaves above amplitude sum: {v}");
        }
    }

    #[test]
    fn test_weighted_octaves_threshold_suppresses() {
        let noise = source();
        // A threshold equal to the amplitude can never be exceeded.
        for i in 0..100 {
            let v = noise.weighted_octaves(i as f64 * 5.0, 0.0, &[0.7], &[0.7], &[0.01]);
            assert_eq!(v, 0.0);
        }
    }

    #[test]
    fn test_weighted_octaves_empty_is_zero() {
        assert_eq!(source().weighted_octaves(10.0, 10.0, &[], &[], &[]), 0.0);
    }

    #[test]
    fn test_weighted_octaves_ignores_extra_octaves() {
        let noise = source();
        let mut amps = vec![0.5; MAX_OCTAVES];
        let capped = noise.weighted_octaves(40.0, 2.0, &amps, &[], &[]);
        amps.extend([9.0; 4]);
        assert_eq!(noise.weighted_octaves(40.0, 2.0, &amps, &[], &[]), capped);
    }

    #[test]
    fn test_world_noise_channels_are_independent() {
        let world = WorldNoise::new(1337, 0.0005);
        assert_eq!(world.world_seed(), 1337);
        assert_eq!(
            world.channel(NoiseChannel::Temperature).seed(),
            NoiseChannel::Temperature.seed(1337)
        );
        assert_ne!(
            world.channel(NoiseChannel::Terrain).raw(0.3, 0.1),
            world.channel(NoiseChannel::Rainfall).raw(0.3, 0.1)
        );
    }
}
