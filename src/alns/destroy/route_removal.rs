use rand::Rng;

use crate::problem::CustomerId;
use crate::solution::Solution;
use crate::utils::Random;

use super::DestroyContext;

/// Empty one uniformly chosen route; useful for shrinking the fleet in use
/// and for escaping per-route local optima.
pub fn destroy(
    solution: &mut Solution,
    rng: &mut Random,
    ctx: &DestroyContext,
) -> Vec<CustomerId> {
    let route_id = rng.gen_range(0..solution.routes.len());
    let removed = std::mem::take(&mut solution.routes[route_id]);
    solution.evaluate_solution(ctx.capa_error_weight, ctx.frame_error_weight);
    removed
}
