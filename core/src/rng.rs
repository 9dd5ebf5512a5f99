//! Deterministic random number generation.
//!
//! RULE: Nothing in the generator may call any platform RNG.
//! All randomness flows through a GenRng owned by the caller and
//! passed into `generate`. There is no process-wide seed.
//!
//! Independent sessions derive their own stream from
//! (master_seed XOR stream_index), so two dashboard sessions never
//! share mutable RNG state and each stays reproducible in isolation.

use crate::error::{GenError, GenResult};
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A named, deterministic random stream.
#[derive(Clone, Debug)]
pub struct GenRng {
    pub name: &'static str,
    seed: u64,
    inner: Pcg64Mcg,
}

impl GenRng {
    pub fn new(seed: u64) -> Self {
        Self {
            name: "unnamed",
            seed,
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// The seed this stream was created from. Drawing does not change it.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Derive a stream from a master seed and a stable stream index.
    pub fn derive(master_seed: u64, stream_index: u64) -> Self {
        let derived_seed = master_seed ^ (stream_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self::new(derived_seed)
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Roll a u64 in [lo, hi]. Callers guarantee lo <= hi.
    pub fn range_inclusive(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next_u64_below(hi - lo + 1)
    }

    /// Roll a float in [lo, hi).
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform pick from a non-empty slice.
    pub fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.next_u64_below(items.len() as u64) as usize]
    }

    /// Sample Beta(alpha, beta) for integer shapes.
    ///
    /// Uses the order-statistic identity: the alpha-th smallest of
    /// (alpha + beta - 1) iid uniforms is Beta(alpha, beta) distributed.
    pub fn beta(&mut self, alpha: u32, beta: u32) -> GenResult<f64> {
        if alpha == 0 || beta == 0 {
            return Err(GenError::InvalidArgument {
                name: "beta shape",
                reason: format!("shapes must be >= 1, got ({alpha}, {beta})"),
            });
        }
        let n = (alpha + beta - 1) as usize;
        let mut draws: Vec<f64> = (0..n).map(|_| self.next_f64()).collect();
        draws.sort_by(f64::total_cmp);
        Ok(draws[alpha as usize - 1])
    }

    /// Choose `k` distinct indices from `0..len` without replacement,
    /// in draw order (partial Fisher-Yates).
    pub fn sample_distinct(&mut self, len: usize, k: usize) -> GenResult<Vec<usize>> {
        if k > len {
            return Err(GenError::ConstraintViolation {
                requested: k,
                available: len,
            });
        }
        let mut pool: Vec<usize> = (0..len).collect();
        for i in 0..k {
            let j = i + self.next_u64_below((len - i) as u64) as usize;
            pool.swap(i, j);
        }
        pool.truncate(k);
        Ok(pool)
    }
}

/// Hands out independent streams for concurrent sessions.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    /// Stream for one dashboard session. The same index always
    /// yields the same stream.
    pub fn for_session(&self, session_index: u64) -> GenRng {
        GenRng::derive(self.master_seed, session_index).with_name("session")
    }
}
