//! Random draws shared by the ring and tab generators.
//!
//! Purpose
//! - Keep every stochastic primitive behind one small surface so callers can
//!   inject any `rand::Rng` and tests can replay runs from a seed.
//!
//! Model
//! - Uniform draws are `lo + (hi - lo) * U[0,1)`; reversed or empty ranges are
//!   allowed and never panic (unlike `gen_range`).
//! - Gaussian draws use `rand_distr::StandardNormal`.
//! - `ReplayToken { seed, stream }` keys one `StdRng` per run stage
//!   (generation, each repair pass).
//!
//! Code cross-refs: `ring::JaggedRing::generate`, `tab::Tab::make_jagged`

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Uniform sample in `[lo, hi)` (or `(hi, lo]` when reversed).
#[inline]
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    lo + (hi - lo) * rng.gen::<f64>()
}

/// Standard normal sample.
#[inline]
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.sample(StandardNormal)
}

/// Fair coin.
#[inline]
pub fn coin<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.gen::<f64>() < 0.5
}

/// `n` samples from a geometric progression between `start` and `end`.
///
/// Falls back to a linear progression when either bound is not strictly
/// positive. `n == 1` yields `[start]`.
pub fn geomspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let last = (n - 1) as f64;
            if start > 0.0 && end > 0.0 {
                let (l0, l1) = (start.ln(), end.ln());
                (0..n)
                    .map(|k| {
                        if k == n - 1 {
                            end
                        } else {
                            (l0 + (l1 - l0) * k as f64 / last).exp()
                        }
                    })
                    .collect()
            } else {
                (0..n)
                    .map(|k| start + (end - start) * k as f64 / last)
                    .collect()
            }
        }
    }
}

/// Seed plus stream index naming one reproducible run.
///
/// Generation draws from stream 0 and repair pass `k` from stream `k + 1`, so
/// repairing a saved document with the same seed replays the same edits
/// without regenerating it, and adding passes never perturbs earlier ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub stream: u64,
}

impl ReplayToken {
    pub fn new(seed: u64, stream: u64) -> Self {
        Self { seed, stream }
    }

    pub fn generation(seed: u64) -> Self {
        Self::new(seed, 0)
    }

    pub fn repair_pass(seed: u64, pass: usize) -> Self {
        Self::new(seed, pass as u64 + 1)
    }

    /// ChaCha-backed `StdRng` keyed by both words.
    pub fn to_std_rng(self) -> StdRng {
        let mut key = [0u8; 32];
        key[..8].copy_from_slice(&self.seed.to_le_bytes());
        key[8..16].copy_from_slice(&self.stream.to_le_bytes());
        StdRng::from_seed(key)
    }
}
