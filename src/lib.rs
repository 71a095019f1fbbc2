//! Adaptive large neighborhood search for vehicle routing with time windows
//! and load-dependent travel times (VRPLDTT).
//!
//! The problem extends the classical VRPTW by a travel-time cube indexed
//! over discretised vehicle load: a heavily loaded cargo bike climbs slower,
//! so every insertion decision changes the timing of the stops before and
//! after it. The search is a simulated-annealing ALNS: an adaptive roulette
//! wheel picks one destroy and one repair operator per iteration, both
//! mutate a running solution through an incremental route evaluator, and an
//! infeasibility-targeting penalty scheme keeps the search surfing the
//! boundary of the feasible region.
//!
//! ```no_run
//! use vrpldtt_alns::alns::{AlnsSolver, Parameters};
//! use vrpldtt_alns::problem::{BucketLayout, Instance};
//! use vrpldtt_alns::utils::create_seeded_rng;
//!
//! # fn main() -> Result<(), vrpldtt_alns::error::SolverError> {
//! let instance = Instance::vrpldtt(
//!     2,                            // vehicles
//!     2,                            // customers
//!     vec![60.0, 80.0],             // demand
//!     vec![5.0, 5.0],               // service times (min)
//!     vec![0.0, 0.0],               // window open
//!     vec![240.0, 240.0],           // window close
//!     vec![vec![0.0; 3]; 3],        // elevation (m)
//!     vec![
//!         vec![0.0, 2.0, 3.0],
//!         vec![2.0, 0.0, 1.5],
//!         vec![3.0, 1.5, 0.0],
//!     ],                            // distance (km)
//!     BucketLayout::Size(10.0),
//!     140.0,
//!     150.0,
//! )?;
//!
//! let params = Parameters::new()
//!     .with_destroy_operators(["random_destroy", "shaw_destroy"])
//!     .with_repair_operators(["basic_greedy", "2_regret"])
//!     .with_max_time(10);
//! let solver = AlnsSolver::new(&instance, params)?;
//! let mut rng = create_seeded_rng(42);
//! let report = solver.solve(&mut rng)?;
//! if let Some(best) = &report.best_solution {
//!     println!("driving time: {:.1} min", best.total_driving_time());
//! }
//! # Ok(())
//! # }
//! ```

pub mod alns;
pub mod error;
pub mod problem;
pub mod solution;
pub mod utils;

pub use alns::{AlnsSolver, Parameters, SolveReport};
pub use error::SolverError;
pub use problem::{BucketLayout, Instance};
pub use solution::Solution;
