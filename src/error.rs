use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fatal failures surfaced through the public API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// Invalid construction input: unknown operator name, missing bucket
    /// spec, non-positive counts, dimension mismatches.
    Config(String),
    /// Random initialization could not place every customer within
    /// `vehicle_capacity + add_pseudo_capacity`.
    InitInfeasible,
    /// An internal invariant was violated (e.g. a customer listed in
    /// `route_of_customer` is missing from its route). Indicates a bug;
    /// the solve is aborted.
    Logic(String),
}

impl Display for SolverError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "invalid configuration: {msg}"),
            Self::InitInfeasible => write!(
                f,
                "total vehicle capacity (including the pseudo-capacity slack) \
                 cannot hold all customers"
            ),
            Self::Logic(msg) => write!(f, "internal invariant violated: {msg}"),
        }
    }
}

impl Error for SolverError {}

/// Signal raised by `Solution::evaluate_change` when a trial edit pushes a
/// route's capacity error to `add_pseudo_capacity` or beyond.
///
/// This is a control-flow value for the operator inner loops, not a
/// user-visible error: the operator that issued the edit must revert the
/// route and re-evaluate before the signal may be dropped. It never reaches
/// the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfeasibilityExceeded;
