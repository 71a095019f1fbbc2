use crate::error::SolverError;
use crate::problem::CustomerId;
use crate::solution::Solution;
use crate::utils::{self, Random};

use super::{remove_listed_customers, DestroyContext};

/// History-guided removal: customers sitting on arcs whose best-ever
/// observed driving time is poor accumulate a high potential and get
/// relocated first.
pub struct NodePairRemoval {
    rnd_factor: f64,
}

impl NodePairRemoval {
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
        let potential = ctx.node_pair_potential;
        let mut historic_performance = vec![0.0f64; instance.nr_customers];

        for route in &solution.routes {
            let mut prev: Option<CustomerId> = None;
            for &customer in route {
                let from_node = prev.map_or(0, |p| p + 1);
                historic_performance[customer] += potential[from_node][customer + 1];
                if let Some(prev_customer) = prev {
                    historic_performance[prev_customer] += potential[from_node][customer + 1];
                }
                prev = Some(customer);
            }
            if let Some(last) = prev {
                historic_performance[last] += potential[last + 1][0];
            }
        }

        let ranks = utils::get_ranks(&historic_performance);
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
