use crate::alns::trials::{self, Insertion};
use crate::error::SolverError;
use crate::problem::CustomerId;
use crate::solution::Solution;
use crate::utils::Random;

mod basic_greedy;
mod beta_hybrid;
mod deep_greedy;
mod k_regret;
mod random_greedy;

/// Driver-owned state every repair operator may read.
pub struct RepairContext {
    pub capa_error_weight: f64,
    pub frame_error_weight: f64,
}

/// The insertion family as a closed set of parameter-carrying variants.
pub enum RepairOperator {
    BasicGreedy,
    RandomGreedy,
    DeepGreedy,
    KRegret(k_regret::KRegretInsertion),
    BetaHybrid(beta_hybrid::BetaHybridInsertion),
}

impl RepairOperator {
    /// Resolve a configured operator name; unknown names are a
    /// construction-time error.
    pub fn from_name(name: &str) -> Result<Self, SolverError> {
        Ok(match name {
            "basic_greedy" => Self::BasicGreedy,
            "random_greedy" => Self::RandomGreedy,
            "deep_greedy" => Self::DeepGreedy,
            "2_regret" => Self::KRegret(k_regret::KRegretInsertion::new(2)),
            "3_regret" => Self::KRegret(k_regret::KRegretInsertion::new(3)),
            "5_regret" => Self::KRegret(k_regret::KRegretInsertion::new(5)),
            "beta_hybrid" => Self::BetaHybrid(beta_hybrid::BetaHybridInsertion::new(3)),
            _ => {
                return Err(SolverError::Config(format!(
                    "unknown repair operator '{name}'"
                )))
            }
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::BasicGreedy => "basic_greedy",
            Self::RandomGreedy => "random_greedy",
            Self::DeepGreedy => "deep_greedy",
            Self::KRegret(op) => op.name(),
            Self::BetaHybrid(_) => "beta_hybrid",
        }
    }
}

/// Reinsert every removed customer into the running solution.
pub fn apply_repair(
    op: &RepairOperator,
    solution: &mut Solution,
    removed: Vec<CustomerId>,
    rng: &mut Random,
    ctx: &RepairContext,
) -> Result<(), SolverError> {
    match op {
        RepairOperator::BasicGreedy => basic_greedy::repair(solution, removed, ctx),
        RepairOperator::RandomGreedy => random_greedy::repair(solution, removed, rng, ctx),
        RepairOperator::DeepGreedy => deep_greedy::repair(solution, removed, ctx),
        RepairOperator::KRegret(op) => op.repair(solution, removed, ctx),
        RepairOperator::BetaHybrid(op) => op.repair(solution, removed, rng, ctx),
    }
}

/// Apply a chosen insertion for real. A sentinel insertion means the
/// pseudo-capacity slack is exhausted in every route, which a correctly
/// sized instance cannot reach.
fn commit_insertion(
    solution: &mut Solution,
    customer: CustomerId,
    insertion: &Insertion,
    ctx: &RepairContext,
) -> Result<(), SolverError> {
    if insertion.is_none() {
        return Err(SolverError::Logic(format!(
            "no admissible insertion position left for customer {customer}"
        )));
    }
    solution.insert_customer(insertion.route_id, insertion.pos, customer);
    trials::commit_evaluate(
        solution,
        insertion.route_id,
        insertion.pos,
        ctx.capa_error_weight,
        ctx.frame_error_weight,
    );
    Ok(())
}
