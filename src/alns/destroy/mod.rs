use crate::error::SolverError;
use crate::problem::{CustomerId, Instance};
use crate::solution::{evaluate, Solution};
use crate::utils::Random;

mod demand_removal;
mod node_pair_removal;
mod random_removal;
mod route_removal;
mod shaw_removal;
mod travel_time_removal;
mod worst_removal;

pub use shaw_removal::ShawWeights;

/// Driver-owned state every destroy operator may read.
pub struct DestroyContext<'m> {
    /// Average removal size; the driver adapts it to stagnation.
    pub mean_removal: f64,
    pub capa_error_weight: f64,
    pub frame_error_weight: f64,
    /// Best driving time ever observed per arc.
    pub node_pair_potential: &'m [Vec<f64>],
}

/// The destroy family as a closed set of parameter-carrying variants.
pub enum DestroyOperator {
    Random,
    Route,
    BiggestDemand(demand_removal::DemandRemoval),
    WorstTravelTime(travel_time_removal::TravelTimeRemoval),
    WorstRemoval(worst_removal::WorstRemoval),
    NodePair(node_pair_removal::NodePairRemoval),
    Shaw(shaw_removal::ShawRemoval),
}

impl DestroyOperator {
    /// Resolve a configured operator name; unknown names are a
    /// construction-time error.
    pub fn from_name(
        name: &str,
        instance: &Instance,
        rnd_factor: f64,
    ) -> Result<Self, SolverError> {
        Ok(match name {
            "random_destroy" => Self::Random,
            "route_destroy" => Self::Route,
            "demand_destroy" => {
                Self::BiggestDemand(demand_removal::DemandRemoval::new(instance, rnd_factor))
            }
            "time_destroy" => {
                Self::WorstTravelTime(travel_time_removal::TravelTimeRemoval::new(rnd_factor))
            }
            "worst_destroy" => Self::WorstRemoval(worst_removal::WorstRemoval::new(rnd_factor)),
            "node_pair_destroy" => Self::NodePair(node_pair_removal::NodePairRemoval::new(rnd_factor)),
            "shaw_destroy" => Self::Shaw(shaw_removal::ShawRemoval::new(
                ShawWeights {
                    distance: 9.0,
                    window: 3.0,
                    demand: 2.0,
                    vehicle: 5.0,
                },
                rnd_factor,
            )),
            "distance_similarity" => Self::Shaw(shaw_removal::ShawRemoval::new(
                ShawWeights {
                    distance: 1.0,
                    window: 0.0,
                    demand: 0.0,
                    vehicle: 0.0,
                },
                rnd_factor,
            )),
            "window_similarity" => Self::Shaw(shaw_removal::ShawRemoval::new(
                ShawWeights {
                    distance: 0.0,
                    window: 1.0,
                    demand: 0.0,
                    vehicle: 0.0,
                },
                rnd_factor,
            )),
            "demand_similarity" => Self::Shaw(shaw_removal::ShawRemoval::new(
                ShawWeights {
                    distance: 0.0,
                    window: 0.0,
                    demand: 1.0,
                    vehicle: 0.0,
                },
                rnd_factor,
            )),
            _ => {
                return Err(SolverError::Config(format!(
                    "unknown destroy operator '{name}'"
                )))
            }
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Random => "random_destroy",
            Self::Route => "route_destroy",
            Self::BiggestDemand(_) => "demand_destroy",
            Self::WorstTravelTime(_) => "time_destroy",
            Self::WorstRemoval(_) => "worst_destroy",
            Self::NodePair(_) => "node_pair_destroy",
            Self::Shaw(op) => op.name(),
        }
    }
}

/// Apply a destroy operator to the running solution and return the removed
/// customers, ready for a repair operator.
pub fn apply_destroy(
    op: &DestroyOperator,
    solution: &mut Solution,
    rng: &mut Random,
    ctx: &DestroyContext,
) -> Result<Vec<CustomerId>, SolverError> {
    match op {
        DestroyOperator::Random => Ok(random_removal::destroy(solution, rng, ctx)),
        DestroyOperator::Route => Ok(route_removal::destroy(solution, rng, ctx)),
        DestroyOperator::BiggestDemand(op) => op.destroy(solution, rng, ctx),
        DestroyOperator::WorstTravelTime(op) => op.destroy(solution, rng, ctx),
        DestroyOperator::WorstRemoval(op) => Ok(op.destroy(solution, rng, ctx)),
        DestroyOperator::NodePair(op) => op.destroy(solution, rng, ctx),
        DestroyOperator::Shaw(op) => op.destroy(solution, rng, ctx),
    }
}

/// Pull each listed customer out of its route via the reverse index. The
/// caller is responsible for the follow-up `evaluate_solution`.
fn remove_listed_customers(
    solution: &mut Solution,
    customers: &[CustomerId],
) -> Result<(), SolverError> {
    for &customer in customers {
        let route_id = solution.route_of(customer).ok_or_else(|| {
            SolverError::Logic(format!("customer {customer} scheduled for removal twice"))
        })?;
        let pos = evaluate::position_in_route(&solution.routes[route_id], customer)?;
        solution.remove_customer(route_id, pos);
    }
    Ok(())
}
