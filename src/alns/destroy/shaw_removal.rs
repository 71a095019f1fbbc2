use rand::Rng;

use crate::error::SolverError;
use crate::problem::CustomerId;
use crate::solution::Solution;
use crate::utils::{self, Random};

use super::{remove_listed_customers, DestroyContext};

/// Weighting of the relatedness terms. The presets behind the
/// `distance_similarity`, `window_similarity` and `demand_similarity`
/// operator names zero out all but one term.
#[derive(Debug, Clone, Copy)]
pub struct ShawWeights {
    pub distance: f64,
    pub window: f64,
    pub demand: f64,
    pub vehicle: f64,
}

/// Relatedness removal (Shaw 1998, Ropke & Pisinger 2006): grow the removal
/// set around a random seed by repeatedly pulling the candidate most
/// related to a random already-removed customer.
pub struct ShawRemoval {
    weights: ShawWeights,
    rnd_factor: f64,
}

impl ShawRemoval {
    pub fn new(weights: ShawWeights, rnd_factor: f64) -> Self {
        Self {
            weights,
            rnd_factor,
        }
    }

    pub fn name(&self) -> &'static str {
        let w = &self.weights;
        if w.window == 0.0 && w.demand == 0.0 && w.vehicle == 0.0 {
            "distance_similarity"
        } else if w.distance == 0.0 && w.demand == 0.0 {
            "window_similarity"
        } else if w.distance == 0.0 && w.window == 0.0 {
            "demand_similarity"
        } else {
            "shaw_destroy"
        }
    }

    pub fn destroy(
        &self,
        solution: &mut Solution,
        rng: &mut Random,
        ctx: &DestroyContext,
    ) -> Result<Vec<CustomerId>, SolverError> {
        let instance = solution.instance();
        let count = utils::removal_count(ctx.mean_removal, instance.nr_customers, rng);

        let seed = rng.gen_range(0..instance.nr_customers);
        let mut candidates: Vec<CustomerId> = (0..instance.nr_customers).collect();
        candidates.remove(seed);
        let mut removed = vec![seed];

        for _ in 1..count {
            let reference = removed[rng.gen_range(0..removed.len())];
            let reference_route = solution.route_of(reference);

            let mut best_pos = 0;
            let mut best_relatedness = f64::MAX;
            for (pos, &candidate) in candidates.iter().enumerate() {
                // the distance table spans all nodes, the attribute tables
                // span customers only
                let mut relatedness = self.weights.distance
                    * instance.norm_distance[reference + 1][candidate + 1]
                    + self.weights.window * instance.norm_start_window[reference][candidate]
                    + self.weights.window * instance.norm_end_window[reference][candidate]
                    + self.weights.demand * instance.norm_demand[reference][candidate];
                if reference_route == solution.route_of(candidate) {
                    relatedness += self.weights.vehicle;
                }
                relatedness *= utils::noise_factor(self.rnd_factor, rng);

                if relatedness < best_relatedness {
                    best_relatedness = relatedness;
                    best_pos = pos;
                }
            }
            removed.push(candidates.remove(best_pos));
        }

        remove_listed_customers(solution, &removed)?;
        solution.evaluate_solution(ctx.capa_error_weight, ctx.frame_error_weight);
        Ok(removed)
    }
}
