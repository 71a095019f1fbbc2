use rand::Rng;

use crate::utils::Random;

/// Adaptive weighted selector over a fixed set of operators.
///
/// Scores accumulate between weight updates; `update_weights` folds the
/// mean score per use into the weights with smoothing factor
/// `wheel_parameter` and resets the accumulators.
pub struct RouletteWheel {
    weights: Vec<f64>,
    scores: Vec<f64>,
    nr_uses: Vec<u64>,
    wheel_parameter: f64,
    min_weight: f64,
    last_id: usize,
}

impl RouletteWheel {
    pub fn new(nr_operators: usize, wheel_parameter: f64, min_weight: f64) -> Self {
        Self {
            weights: vec![1.0 / nr_operators as f64; nr_operators],
            scores: vec![0.0; nr_operators],
            nr_uses: vec![0; nr_operators],
            wheel_parameter,
            min_weight,
            last_id: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn nr_uses(&self) -> &[u64] {
        &self.nr_uses
    }

    /// Weighted draw: walk the prefix sums until the uniform sample drops
    /// below the running total. The drawn id is remembered for
    /// [`update_stats`](RouletteWheel::update_stats).
    pub fn get_random_id(&mut self, rng: &mut Random) -> usize {
        let total: f64 = self.weights.iter().sum();
        let drawn = rng.gen_range(0.0..1.0f64) * total;

        let mut prefix = 0.0;
        for (id, weight) in self.weights.iter().enumerate() {
            prefix += weight;
            if drawn <= prefix {
                self.last_id = id;
                return id;
            }
        }
        // rounding can push the sample past the last prefix
        self.last_id = self.weights.len() - 1;
        self.last_id
    }

    /// Credit the most recently drawn operator.
    pub fn update_stats(&mut self, score: f64) {
        self.scores[self.last_id] += score;
        self.nr_uses[self.last_id] += 1;
    }

    /// Fold the accumulated mean scores into the weights and reset the
    /// accumulators. Unused operators fall to `min_weight` so they keep a
    /// chance of being drawn again.
    pub fn update_weights(&mut self) {
        for id in 0..self.weights.len() {
            self.weights[id] = if self.nr_uses[id] > 0 {
                let mean_score = self.scores[id] / self.nr_uses[id] as f64;
                let weight = self.wheel_parameter * mean_score
                    + (1.0 - self.wheel_parameter) * self.weights[id];
                weight.max(self.min_weight)
            } else {
                self.min_weight
            };
            self.scores[id] = 0.0;
            self.nr_uses[id] = 0;
        }
    }
}
