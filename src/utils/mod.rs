use std::time::Duration;

use rand::{Rng, RngCore, SeedableRng};
use rand_distr::{Distribution, Normal};
use rand_pcg::Pcg64Mcg;
use took::Timer;

pub mod validator;

pub type Random = Pcg64Mcg;

/// Build the solver PRNG from a caller-supplied seed.
///
/// The generator is owned by the caller and threaded mutably through the
/// solver and every operator, so two runs with the same seed replay the
/// same trajectory.
pub fn create_seeded_rng(seed: i128) -> Random {
    let mut rng = Pcg64Mcg::from_seed(seed.to_le_bytes());
    // discard the first three draws
    rng.next_u64();
    rng.next_u64();
    rng.next_u64();
    rng
}

pub enum TimeLimit {
    Seconds(u64),
    None,
}

pub struct Countdown {
    start: Timer,
    time_limit: TimeLimit,
}

impl Countdown {
    pub fn new(start: Timer, limit: TimeLimit) -> Self {
        Self {
            start,
            time_limit: limit,
        }
    }

    pub fn time_remaining(&self) -> u64 {
        match self.time_limit {
            TimeLimit::Seconds(value) => {
                let elapsed = self.start.took().as_std().as_secs();
                value.saturating_sub(elapsed)
            }
            TimeLimit::None => u64::MAX,
        }
    }

    pub fn is_time_remaining(&self) -> bool {
        self.time_remaining() != 0
    }

    pub fn time_elapsed(&self) -> Duration {
        self.start.took().into_std()
    }
}

/// Dense 1-based ranks; equal values share a rank.
pub fn get_ranks(values: &[f64]) -> Vec<usize> {
    let order = sort_indices(values);
    let mut ranks = vec![0usize; values.len()];
    let mut rank = 0usize;
    let mut prev = f64::NAN;
    for idx in order {
        if values[idx] != prev {
            rank += 1;
            prev = values[idx];
        }
        ranks[idx] = rank;
    }
    ranks
}

/// Indices of `values` ordered by ascending value.
pub fn sort_indices(values: &[f64]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..values.len()).collect();
    indices.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    indices
}

/// Number of customers a destroy operator should remove, drawn from
/// `Normal(mean, mean / 2)` and clamped to `[0, nr_customers - 1]`.
pub fn removal_count(mean: f64, nr_customers: usize, rng: &mut Random) -> usize {
    let drawn = Normal::new(mean, mean / 2.0)
        .map(|normal| normal.sample(rng))
        .unwrap_or(mean)
        .round();
    let upper = nr_customers.saturating_sub(1) as f64;
    drawn.clamp(0.0, upper) as usize
}

/// Multiplicative sampling bias `U^exponent` with `U ~ Uniform[0, 1)`.
///
/// An exponent of zero (the default noise setting) disables the bias.
pub fn noise_factor(exponent: f64, rng: &mut Random) -> f64 {
    if exponent == 0.0 {
        1.0
    } else {
        rng.gen_range(0.0..1.0f64).powf(exponent)
    }
}
