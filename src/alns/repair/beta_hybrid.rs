use rand::Rng;

use crate::alns::trials;
use crate::error::{InfeasibilityExceeded, SolverError};
use crate::problem::CustomerId;
use crate::solution::Solution;
use crate::utils::Random;

use super::{random_greedy, RepairContext};

/// Block insertion for small removal lists: up to `beta` customers are
/// tried as one contiguous block at every position, which preserves chains
/// that the destroy phase tore out together. Larger lists, or a block with
/// no admissible slot, fall back to randomized greedy insertion.
pub struct BetaHybridInsertion {
    beta: usize,
}

impl BetaHybridInsertion {
    pub fn new(beta: usize) -> Self {
        Self { beta }
    }

    pub fn repair(
        &self,
        solution: &mut Solution,
        mut removed: Vec<CustomerId>,
        rng: &mut Random,
        ctx: &RepairContext,
    ) -> Result<(), SolverError> {
        if !removed.is_empty() && removed.len() <= self.beta {
            // either block orientation can be the natural one
            if rng.gen_range(0..=1) == 0 {
                removed.reverse();
            }

            let mut best: Option<(f64, usize, usize)> = None;
            for route_id in 0..solution.routes().len() {
                for pos in 0..=solution.routes()[route_id].len() {
                    match trials::evaluate_insertion_chain(
                        solution,
                        ctx.capa_error_weight,
                        ctx.frame_error_weight,
                        route_id,
                        &removed,
                        pos,
                    ) {
                        Ok(quality) => {
                            let cost = quality - solution.total_quality();
                            if best.map_or(true, |(best_cost, _, _)| cost < best_cost) {
                                best = Some((cost, route_id, pos));
                            }
                        }
                        Err(InfeasibilityExceeded) => break,
                    }
                }
            }

            if let Some((_, route_id, pos)) = best {
                for (offset, &customer) in removed.iter().enumerate() {
                    solution.insert_customer(route_id, pos + offset, customer);
                }
                trials::commit_evaluate(
                    solution,
                    route_id,
                    pos + removed.len() - 1,
                    ctx.capa_error_weight,
                    ctx.frame_error_weight,
                );
                return Ok(());
            }
        }

        random_greedy::repair(solution, removed, rng, ctx)
    }
}
