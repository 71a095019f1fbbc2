use crate::alns::trials::{self, Insertion};
use crate::error::SolverError;
use crate::problem::CustomerId;
use crate::solution::Solution;

use super::{commit_insertion, RepairContext};

/// Regret-k insertion: prefer the customer that loses the most if it cannot
/// take its best route, measured over its k cheapest per-route insertions.
/// Forced customers (few viable routes) get placed before the flexible
/// ones crowd them out.
pub struct KRegretInsertion {
    k: usize,
}

impl KRegretInsertion {
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    pub fn name(&self) -> &'static str {
        match self.k {
            2 => "2_regret",
            3 => "3_regret",
            _ => "5_regret",
        }
    }

    pub fn repair(
        &self,
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
            let mut best_regret = f64::MIN;
            let mut best_customer_pos = 0;
            let mut best = Insertion::none();
            for (customer_pos, row) in best_insertions.iter().enumerate() {
                let (regret, insertion) = self.regret_of(row);
                if regret > best_regret {
                    best_regret = regret;
                    best_customer_pos = customer_pos;
                    best = insertion;
                }
            }

            let customer = removed.remove(best_customer_pos);
            best_insertions.remove(best_customer_pos);
            commit_insertion(solution, customer, &best, ctx)?;

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

    /// Regret value of one customer's per-route best insertions, plus the
    /// overall best insertion to commit if this customer wins.
    ///
    /// Routes without an admissible position keep the `f64::MAX` sentinel,
    /// which drives the regret of nearly-forced customers sky-high.
    fn regret_of(&self, row: &[Insertion]) -> (f64, Insertion) {
        let mut sorted: Vec<&Insertion> = row.iter().collect();
        sorted.sort_by(|a, b| a.cost.total_cmp(&b.cost));

        let mut regret = 0.0;
        for k in 1..self.k.min(sorted.len()) {
            regret += sorted[k].cost - sorted[k - 1].cost;
        }
        (regret, *sorted[0])
    }
}
