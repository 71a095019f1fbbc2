use rand::Rng;

use crate::alns::trials;
use crate::error::SolverError;
use crate::problem::CustomerId;
use crate::solution::Solution;
use crate::utils::Random;

use super::{commit_insertion, RepairContext};

/// Greedy insertion with the removal list consumed in random order, so the
/// early (cheap) slots are not always claimed by the same customers.
pub fn repair(
    solution: &mut Solution,
    mut removed: Vec<CustomerId>,
    rng: &mut Random,
    ctx: &RepairContext,
) -> Result<(), SolverError> {
    while !removed.is_empty() {
        let customer = removed.swap_remove(rng.gen_range(0..removed.len()));
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
