use crate::alns::trials;
use crate::problem::CustomerId;
use crate::solution::Solution;
use crate::utils::{self, Random};

use super::DestroyContext;

/// Greedy worst removal: repeatedly take out the visit whose removal
/// improves quality the most (under noise), re-scoring only the route that
/// changed.
pub struct WorstRemoval {
    rnd_factor: f64,
}

impl WorstRemoval {
    pub fn new(rnd_factor: f64) -> Self {
        Self { rnd_factor }
    }

    pub fn destroy(
        &self,
        solution: &mut Solution,
        rng: &mut Random,
        ctx: &DestroyContext,
    ) -> Vec<CustomerId> {
        let nr_customers = solution.instance().nr_customers;
        let count = utils::removal_count(ctx.mean_removal, nr_customers, rng);
        let mut removed = Vec::with_capacity(count);

        let mut best_per_route: Vec<Option<(f64, usize)>> = (0..solution.routes().len())
            .map(|route_id| self.best_removal_in_route(solution, route_id, ctx, rng))
            .collect();

        while removed.len() < count {
            let candidate = best_per_route
                .iter()
                .enumerate()
                .filter_map(|(route_id, entry)| entry.map(|(gain, pos)| (route_id, gain, pos)))
                .max_by(|a, b| a.1.total_cmp(&b.1));
            let Some((route_id, _, pos)) = candidate else {
                break;
            };

            let customer = solution.remove_customer(route_id, pos);
            trials::commit_evaluate(
                solution,
                route_id,
                pos.saturating_sub(1),
                ctx.capa_error_weight,
                ctx.frame_error_weight,
            );
            removed.push(customer);

            best_per_route[route_id] = self.best_removal_in_route(solution, route_id, ctx, rng);
        }

        removed
    }

    /// Noisy best removal gain within one route; `None` for an empty route.
    fn best_removal_in_route(
        &self,
        solution: &mut Solution,
        route_id: usize,
        ctx: &DestroyContext,
        rng: &mut Random,
    ) -> Option<(f64, usize)> {
        let mut best: Option<(f64, usize)> = None;
        for pos in 0..solution.routes()[route_id].len() {
            let quality_without = trials::evaluate_removal_position(
                solution,
                ctx.capa_error_weight,
                ctx.frame_error_weight,
                route_id,
                pos,
            );
            let gain = (solution.total_quality() - quality_without)
                * utils::noise_factor(self.rnd_factor, rng);
            if best.map_or(true, |(best_gain, _)| gain > best_gain) {
                best = Some((gain, pos));
            }
        }
        best
    }
}
