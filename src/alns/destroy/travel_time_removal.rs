use crate::error::SolverError;
use crate::problem::CustomerId;
use crate::solution::Solution;
use crate::utils::{self, Random};

use super::{remove_listed_customers, DestroyContext};

/// Remove the customers whose incoming plus outgoing legs cost the most
/// driving time in the current solution.
///
/// The contribution ranking is position-dependent, so it is computed on
/// demand rather than cached on the solution.
pub struct TravelTimeRemoval {
    rnd_factor: f64,
}

impl TravelTimeRemoval {
    pub fn new(rnd_factor: f64) -> Self {
        Self { rnd_factor }
    }

    pub fn destroy(
        &self,
        solution: &mut Solution,
        rng: &mut Random,
        ctx: &DestroyContext,
    ) -> Result<Vec<CustomerId>, SolverError> {
        let instance = solution.instance();
        let mut travel_times = vec![0.0f64; instance.nr_customers];

        for route in &solution.routes {
            let mut prev: Option<CustomerId> = None;
            for &customer in route {
                let from_node = prev.map_or(0, |p| p + 1);
                let leg = instance.time_cube[solution.load_levels[customer]][from_node]
                    [customer + 1];
                travel_times[customer] = leg;
                if let Some(prev_customer) = prev {
                    travel_times[prev_customer] += leg;
                }
                prev = Some(customer);
            }
            if let Some(last) = prev {
                travel_times[last] += instance.time_cube[0][last + 1][0];
            }
        }

        let ranks = utils::get_ranks(&travel_times);
        let count = utils::removal_count(ctx.mean_removal, instance.nr_customers, rng);

        let skewed_ranks: Vec<f64> = ranks
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
