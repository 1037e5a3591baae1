use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::MaglevResult;
use crate::vehicle::pod::require;

// ---------------------------------------------------------------------------
// Gap-sensor noise
// ---------------------------------------------------------------------------

/// Source of additive sensor noise (mm). Injected into the sequencer so a
/// seeded source replays a mission exactly.
pub trait NoiseSource {
    fn sample(&mut self) -> f64;
}

/// Uniform noise on `[-amplitude, amplitude]`.
#[derive(Debug, Clone)]
pub struct UniformNoise<R: Rng> {
    rng: R,
    amplitude: f64,
}

impl<R: Rng> UniformNoise<R> {
    pub fn new(rng: R, amplitude: f64) -> MaglevResult<Self> {
        require(amplitude.is_finite() && amplitude >= 0.0, || {
            format!("noise amplitude must be >= 0, got {amplitude}")
        })?;
        Ok(Self { rng, amplitude })
    }
}

impl UniformNoise<StdRng> {
    pub fn seeded(amplitude: f64, seed: u64) -> MaglevResult<Self> {
        Self::new(StdRng::seed_from_u64(seed), amplitude)
    }

    /// Seeded from the OS entropy source; not reproducible.
    pub fn from_entropy(amplitude: f64) -> MaglevResult<Self> {
        Self::new(StdRng::from_os_rng(), amplitude)
    }
}

impl<R: Rng> NoiseSource for UniformNoise<R> {
    fn sample(&mut self) -> f64 {
        if self.amplitude == 0.0 {
            return 0.0;
        }
        self.rng.random_range(-self.amplitude..=self.amplitude)
    }
}

/// Perfect sensor.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNoise;

impl NoiseSource for NoNoise {
    fn sample(&mut self) -> f64 {
        0.0
    }
}

impl<F: FnMut() -> f64> NoiseSource for F {
    fn sample(&mut self) -> f64 {
        self()
    }
}
