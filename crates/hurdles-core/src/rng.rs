use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha12Rng;

/// Create a deterministic RNG from a seed.
pub fn create_rng(seed: u64) -> ChaCha12Rng {
    ChaCha12Rng::seed_from_u64(seed)
}

/// Uniform `[0, 1)` source consumed by every stochastic genetic operator:
/// seeding, crossover position, mutation bit index and parent pairing.
pub trait UniformSource {
    fn uniform(&mut self) -> f64;

    /// `floor(uniform * n)`, clamped into `0..n`. Returns 0 when `n == 0`.
    fn index_below(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        let scaled = (self.uniform() * n as f64).floor();
        (scaled.max(0.0) as usize).min(n - 1)
    }
}

impl<R: RngCore + ?Sized> UniformSource for R {
    fn uniform(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Replays a fixed list of uniform draws, cycling when exhausted.
///
/// Values are clamped into `[0, 1)` so scripted tests cannot produce
/// out-of-range indices.
#[derive(Clone, Debug)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values.into_iter().collect(),
            cursor: 0,
        }
    }

}

impl UniformSource for SequenceSource {
    fn uniform(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        if v.is_finite() {
            v.clamp(0.0, 1.0 - f64::EPSILON)
        } else {
            0.0
        }
    }
}
