//! Seeded multi-octave noise producing scalar fields in `[0, 1]`.
//!
//! Each octave is a product of sine and cosine waves whose phase offsets are
//! drawn from a seeded ChaCha stream. Octaves double in frequency and shrink
//! in weight; the weighted mean is then perturbed by a per-coordinate jitter
//! drawn from the same seed and clamped back into the unit interval.

use std::f64::consts::TAU;

use rand::Rng;

use crate::seed::{det_cos, det_sin, seed_rng, unit_hash};

/// Weight of each octave, lowest frequency first.
pub const OCTAVE_WEIGHTS: [f64; 5] = [0.5, 0.5, 0.25, 0.125, 0.0625];

/// Angular frequency of the first octave. Each later octave doubles it.
pub const BASE_FREQUENCY: f64 = 10.0;

/// Peak-to-peak span of the zero-mean jitter term.
pub const JITTER_AMPLITUDE: f64 = 0.5;

const PHASE_STREAM: u64 = 0x5048_4153_45;
const JITTER_STREAM: u64 = 0x4a49_5454_4552;

/// A noise field bound to one seed.
///
/// Construction draws the per-octave phases once, so sampling is a pure
/// function of `(x, y)` and the struct can be shared freely across threads.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseField {
    seed: i64,
    phases: [(f64, f64); OCTAVE_WEIGHTS.len()],
}

impl NoiseField {
    /// Create the field for `seed`.
    pub fn new(seed: i64) -> Self {
        let mut rng = seed_rng(seed, PHASE_STREAM);
        let mut phases = [(0.0, 0.0); OCTAVE_WEIGHTS.len()];
        for phase in &mut phases {
            *phase = (rng.random::<f64>() * TAU, rng.random::<f64>() * TAU);
        }
        Self { seed, phases }
    }

    /// The seed this field was built from.
    pub fn seed(&self) -> i64 {
        self.seed
    }

    /// Sample the field at `(x, y)`. Always returns a value in `[0, 1]`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let mut total = 0.0;
        let mut frequency = BASE_FREQUENCY;

        for (&weight, &(phase_x, phase_y)) in OCTAVE_WEIGHTS.iter().zip(&self.phases) {
            let wave = det_sin(x * frequency + phase_x) * det_cos(y * frequency + phase_y);
            total += (wave * 0.5 + 0.5) * weight;
            frequency *= 2.0;
        }

        let base = total / Self::weight_sum();
        let jitter = (unit_hash(x, y, self.seed, JITTER_STREAM) - 0.5) * JITTER_AMPLITUDE;

        (base + jitter).clamp(0.0, 1.0)
    }

    /// Sum of all octave weights, used to normalise the octave mean.
    pub fn weight_sum() -> f64 {
        OCTAVE_WEIGHTS.iter().sum()
    }
}

/// Sample noise at `(x, y)` for `seed`.
///
/// Equivalent to `NoiseField::new(seed).sample(x, y)`. Prefer holding a
/// [`NoiseField`] when sampling many points with the same seed.
pub fn noise(x: f64, y: f64, seed: i64) -> f64 {
    NoiseField::new(seed).sample(x, y)
}
