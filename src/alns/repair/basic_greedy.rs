use crate::alns::trials;
use crate::error::SolverError;
use crate::problem::CustomerId;
use crate::solution::Solution;

use super::{commit_insertion, RepairContext};

/// Insert the removed customers in list order, each at its cheapest
/// admissible position over all routes.
pub fn repair(
    solution: &mut Solution,
    removed: Vec<CustomerId>,
    ctx: &RepairContext,
) -> Result<(), SolverError> {
    for customer in removed {
        let insertion = trials::best_insertion(
            solution,
            ctx.capa_error_weight,
            ctx.frame_error_weight,
            customer,
            None,
        );
        commit_insertion(solution, customer, &insertion, ctx)?;
    }
    Ok(())
}
