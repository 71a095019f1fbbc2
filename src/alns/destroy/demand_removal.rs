use crate::error::SolverError;
use crate::problem::{CustomerId, Instance};
use crate::solution::Solution;
use crate::utils::{self, Random};

use super::{remove_listed_customers, DestroyContext};

/// Remove the customers with the biggest demand: they constrain the load
/// profile of everything scheduled after them, so relocating them has the
/// biggest lever.
pub struct DemandRemoval {
    // static ranking, smallest demand first
    demand_ranks: Vec<usize>,
    rnd_factor: f64,
}

impl DemandRemoval {
    pub fn new(instance: &Instance, rnd_factor: f64) -> Self {
        Self {
            demand_ranks: utils::get_ranks(&instance.demand),
            rnd_factor,
        }
    }

    pub fn destroy(
        &self,
        solution: &mut Solution,
        rng: &mut Random,
        ctx: &DestroyContext,
    ) -> Result<Vec<CustomerId>, SolverError> {
        let nr_customers = solution.instance().nr_customers;
        let count = utils::removal_count(ctx.mean_removal, nr_customers, rng);

        let skewed_ranks: Vec<f64> = self
            .demand_ranks
            .iter()
            .map(|&rank| rank as f64 * utils::noise_factor(self.rnd_factor, rng))
            .collect();
        let order = utils::sort_indices(&skewed_ranks);
        let removed: Vec<CustomerId> = order[order.len() - count..].to_vec();

        remove_listed_customers(solution, &removed)?;
        solution.evaluate_solution(ctx.capa_error_weight, ctx.frame_error_weight);
        Ok(removed)
    }
}
