use rand::Rng;

use crate::problem::CustomerId;
use crate::solution::Solution;
use crate::utils::Random;

use super::DestroyContext;

/// Independent Bernoulli removal: each customer leaves with probability
/// around `mean_removal / nr_customers`. Pure diversification.
pub fn destroy(
    solution: &mut Solution,
    rng: &mut Random,
    ctx: &DestroyContext,
) -> Vec<CustomerId> {
    let nr_customers = solution.instance().nr_customers;
    let mut removed = Vec::new();

    let routes = std::mem::take(&mut solution.routes);
    solution.routes = routes
        .into_iter()
        .map(|route| {
            route
                .into_iter()
                .filter(|&customer| {
                    if rng.gen_range(0..=nr_customers) as f64 <= ctx.mean_removal {
                        removed.push(customer);
                        false
                    } else {
                        true
                    }
                })
                .collect()
        })
        .collect();

    solution.evaluate_solution(ctx.capa_error_weight, ctx.frame_error_weight);
    removed
}
