use crate::alns::trials::{self, Insertion};
use crate::error::SolverError;
use crate::problem::CustomerId;
use crate::solution::Solution;

use super::{commit_insertion, RepairContext};

/// Globally greedy insertion: keep the best position of every waiting
/// customer in every route, always commit the cheapest pair, and refresh
/// only the column of the route that just changed.
///
/// Dominates the basic greedy in solution quality at the price of the
/// `customers x routes` cache scan.
pub fn repair(
    solution: &mut Solution,
    mut removed: Vec<CustomerId>,
    ctx: &RepairContext,
) -> Result<(), SolverError> {
    let nr_routes = solution.routes().len();

    let mut best_insertions: Vec<Vec<Insertion>> = removed
        .iter()
        .map(|&customer| {
            (0..nr_routes)
                .map(|route_id| {
                    trials::best_insertion(
                        solution,
                        ctx.capa_error_weight,
                        ctx.frame_error_weight,
                        customer,
                        Some(route_id),
                    )
                })
                .collect()
        })
        .collect();

    while !removed.is_empty() {
        let mut best = Insertion::none();
        let mut best_customer_pos = 0;
        for (customer_pos, row) in best_insertions.iter().enumerate() {
            for insertion in row {
                if insertion.cost < best.cost {
                    best = *insertion;
                    best_customer_pos = customer_pos;
                }
            }
        }

        let customer = removed.remove(best_customer_pos);
        best_insertions.remove(best_customer_pos);
        commit_insertion(solution, customer, &best, ctx)?;

        // the other routes kept their shape; only this column went stale
        for (customer_pos, row) in best_insertions.iter_mut().enumerate() {
            row[best.route_id] = trials::best_insertion(
                solution,
                ctx.capa_error_weight,
                ctx.frame_error_weight,
                removed[customer_pos],
                Some(best.route_id),
            );
        }
    }
    Ok(())
}
