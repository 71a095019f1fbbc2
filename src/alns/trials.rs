//! Trial edits: insert (or remove) a visit, read the resulting quality,
//! then put the route back exactly as it was.
//!
//! Re-evaluating only the touched route makes a trial far cheaper than
//! copying the solution, which is what keeps the greedy and regret repair
//! scans affordable.

use crate::error::InfeasibilityExceeded;
use crate::problem::{CustomerId, RouteId};
use crate::solution::Solution;

/// A candidate insertion: quality delta against the untouched solution,
/// and where to apply it. `cost == f64::MAX` marks "no admissible
/// position found".
#[derive(Debug, Clone, Copy)]
pub struct Insertion {
    pub cost: f64,
    pub route_id: RouteId,
    pub pos: usize,
}

impl Insertion {
    pub fn none() -> Self {
        Self {
            cost: f64::MAX,
            route_id: 0,
            pos: 0,
        }
    }

    pub fn is_none(&self) -> bool {
        self.cost == f64::MAX
    }
}

/// Total quality with `customer` inserted at `(route_id, pos)`; the route
/// is restored before returning.
///
/// On [`InfeasibilityExceeded`] the route is likewise restored and the
/// signal is passed on so the caller can skip the remaining positions of
/// this route.
pub fn evaluate_insertion_position(
    solution: &mut Solution,
    capa_error_weight: f64,
    frame_error_weight: f64,
    route_id: RouteId,
    customer: CustomerId,
    pos: usize,
) -> Result<f64, InfeasibilityExceeded> {
    solution.insert_customer(route_id, pos, customer);
    if let Err(signal) =
        solution.evaluate_change(route_id, pos, capa_error_weight, frame_error_weight)
    {
        solution.remove_customer(route_id, pos);
        revert_evaluate(solution, route_id, pos, capa_error_weight, frame_error_weight);
        return Err(signal);
    }

    let quality = solution.total_quality();

    solution.remove_customer(route_id, pos);
    revert_evaluate(solution, route_id, pos, capa_error_weight, frame_error_weight);
    Ok(quality)
}

/// Total quality with a whole block of customers inserted contiguously at
/// `(route_id, pos)`; the route is restored before returning.
pub fn evaluate_insertion_chain(
    solution: &mut Solution,
    capa_error_weight: f64,
    frame_error_weight: f64,
    route_id: RouteId,
    customers: &[CustomerId],
    pos: usize,
) -> Result<f64, InfeasibilityExceeded> {
    for (offset, &customer) in customers.iter().enumerate() {
        solution.insert_customer(route_id, pos + offset, customer);
    }
    let end_pos = pos + customers.len() - 1;

    if let Err(signal) =
        solution.evaluate_change(route_id, end_pos, capa_error_weight, frame_error_weight)
    {
        for _ in 0..customers.len() {
            solution.remove_customer(route_id, pos);
        }
        revert_evaluate(solution, route_id, pos, capa_error_weight, frame_error_weight);
        return Err(signal);
    }

    let quality = solution.total_quality();

    for _ in 0..customers.len() {
        solution.remove_customer(route_id, pos);
    }
    revert_evaluate(solution, route_id, pos, capa_error_weight, frame_error_weight);
    Ok(quality)
}

/// Total quality with the visit at `(route_id, pos)` removed; the route is
/// restored before returning.
pub fn evaluate_removal_position(
    solution: &mut Solution,
    capa_error_weight: f64,
    frame_error_weight: f64,
    route_id: RouteId,
    pos: usize,
) -> f64 {
    let customer = solution.remove_customer(route_id, pos);
    revert_evaluate(solution, route_id, pos, capa_error_weight, frame_error_weight);

    let quality = solution.total_quality();

    solution.insert_customer(route_id, pos, customer);
    commit_evaluate(solution, route_id, pos, capa_error_weight, frame_error_weight);
    quality
}

/// Best admissible insertion of `customer` over one route (`Some(route_id)`)
/// or all routes (`None`). Costs are quality deltas against the untouched
/// solution.
///
/// A gate signal aborts the position scan of the affected route: once a
/// position is saturated past the pseudo-capacity, so is every other
/// position of that route.
pub fn best_insertion(
    solution: &mut Solution,
    capa_error_weight: f64,
    frame_error_weight: f64,
    customer: CustomerId,
    route_filter: Option<RouteId>,
) -> Insertion {
    let route_ids: Vec<RouteId> = match route_filter {
        Some(route_id) => vec![route_id],
        None => (0..solution.routes().len()).collect(),
    };

    let mut best = Insertion::none();
    for route_id in route_ids {
        // the closing depot legs make the first and last position regular
        // candidates
        for pos in 0..=solution.routes()[route_id].len() {
            match evaluate_insertion_position(
                solution,
                capa_error_weight,
                frame_error_weight,
                route_id,
                customer,
                pos,
            ) {
                Ok(quality) => {
                    let cost = quality - solution.total_quality();
                    if cost < best.cost {
                        best = Insertion {
                            cost,
                            route_id,
                            pos,
                        };
                    }
                }
                Err(InfeasibilityExceeded) => break,
            }
        }
    }
    best
}

/// Re-evaluate after an edit that cannot trip the capacity gate (a removal,
/// or restoring a previously admissible state).
pub fn commit_evaluate(
    solution: &mut Solution,
    route_id: RouteId,
    changed_pos: usize,
    capa_error_weight: f64,
    frame_error_weight: f64,
) {
    if solution
        .evaluate_change(route_id, changed_pos, capa_error_weight, frame_error_weight)
        .is_err()
    {
        unreachable!("re-evaluating an admissible route state cannot raise the capacity gate");
    }
}

fn revert_evaluate(
    solution: &mut Solution,
    route_id: RouteId,
    pos: usize,
    capa_error_weight: f64,
    frame_error_weight: f64,
) {
    commit_evaluate(
        solution,
        route_id,
        pos.saturating_sub(1),
        capa_error_weight,
        frame_error_weight,
    );
}
