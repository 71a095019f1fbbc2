use std::collections::HashMap;

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use took::Timer;

use crate::error::SolverError;
use crate::problem::Instance;
use crate::solution::{RoutesKey, Solution};
use crate::utils::{Countdown, Random, TimeLimit};

pub mod destroy;
pub mod initialization;
pub mod repair;
pub mod roulette_wheel;
pub mod trials;

use destroy::{DestroyContext, DestroyOperator};
use repair::{RepairContext, RepairOperator};
use roulette_wheel::RouletteWheel;

/// Search parameters with the defaults the solver was tuned at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameters {
    /// Destroy operator names; empty selects `random_destroy`.
    pub destroy_operators: Vec<String>,
    /// Repair operator names; empty selects `basic_greedy`.
    pub repair_operators: Vec<String>,
    /// Wall-clock budget in seconds.
    pub max_time: u64,
    /// Iterations without global improvement before giving up.
    pub max_iterations: u64,
    /// Start temperature as a fraction of the initial solution quality.
    pub init_temperature: f64,
    pub cooling_rate: f64,
    /// Weight updates happen every `operators * wheel_memory_length`
    /// iterations.
    pub wheel_memory_length: usize,
    /// Smoothing factor of the wheel weight update.
    pub wheel_parameter: f64,
    pub reward_best: f64,
    pub reward_accept_better: f64,
    pub reward_unique: f64,
    pub reward_divers: f64,
    pub penalty: f64,
    pub min_weight: f64,
    /// Exponent of the `U^x` sampling bias inside the biased destroy
    /// operators; zero disables the bias.
    pub random_noise: f64,
    /// Desired long-run share of infeasible iterations; the error weights
    /// are steered towards it.
    pub target_inf: f64,
    /// Log base of the stagnation shakeup; non-positive disables shakeup.
    pub shakeup_log: f64,
    /// Log base that sizes the mean removal count from the customer count.
    pub mean_removal_log: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            destroy_operators: Vec::new(),
            repair_operators: Vec::new(),
            max_time: 600,
            max_iterations: 10_000,
            init_temperature: 0.001,
            cooling_rate: 0.99975,
            wheel_memory_length: 20,
            wheel_parameter: 0.1,
            reward_best: 33.0,
            reward_accept_better: 13.0,
            reward_unique: 9.0,
            reward_divers: 9.0,
            penalty: 0.0,
            min_weight: 1.0,
            random_noise: 0.0,
            target_inf: 0.2,
            shakeup_log: 20.0,
            mean_removal_log: 2.0,
        }
    }
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_destroy_operators<S: Into<String>>(
        mut self,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        self.destroy_operators = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_repair_operators<S: Into<String>>(
        mut self,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        self.repair_operators = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_time(mut self, seconds: u64) -> Self {
        self.max_time = seconds;
        self
    }

    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = iterations;
        self
    }

    pub fn with_init_temperature(mut self, init_temperature: f64) -> Self {
        self.init_temperature = init_temperature;
        self
    }

    pub fn with_target_inf(mut self, target_inf: f64) -> Self {
        self.target_inf = target_inf;
        self
    }

    pub fn with_min_weight(mut self, min_weight: f64) -> Self {
        self.min_weight = min_weight;
        self
    }
}

/// Final state of one roulette wheel, for analysis of a run.
#[derive(Debug, Clone)]
pub struct WheelStats {
    pub operators: Vec<String>,
    pub weights: Vec<f64>,
    pub nr_uses: Vec<u64>,
}

/// Everything a finished `solve` call reports back.
pub struct SolveReport<'a> {
    /// Best feasible solution, or `None` when the search never reached
    /// feasibility.
    pub best_solution: Option<Solution<'a>>,
    pub iterations: u64,
    pub solve_time_ms: u64,
    pub destroy_wheel: WheelStats,
    pub repair_wheel: WheelStats,
    /// Every distinct routes value seen, with the elapsed milliseconds at
    /// which it first appeared.
    pub visited_solutions: HashMap<RoutesKey, u64>,
    pub capa_error_weight: f64,
    pub frame_error_weight: f64,
}

/// Adaptive large neighborhood search over one instance.
///
/// The solver holds the operator sets parsed from the configuration; all
/// search state lives inside [`solve`](AlnsSolver::solve) and dies with it.
pub struct AlnsSolver<'a> {
    instance: &'a Instance,
    params: Parameters,
    destroy_ops: Vec<DestroyOperator>,
    repair_ops: Vec<RepairOperator>,
}

impl<'a> AlnsSolver<'a> {
    pub fn new(instance: &'a Instance, params: Parameters) -> Result<Self, SolverError> {
        let mut destroy_names = params.destroy_operators.clone();
        if destroy_names.is_empty() {
            info!("no destroy operator configured, defaulting to random_destroy");
            destroy_names.push("random_destroy".into());
        }
        let mut repair_names = params.repair_operators.clone();
        if repair_names.is_empty() {
            info!("no repair operator configured, defaulting to basic_greedy");
            repair_names.push("basic_greedy".into());
        }

        let destroy_ops = destroy_names
            .iter()
            .map(|name| DestroyOperator::from_name(name, instance, params.random_noise))
            .collect::<Result<Vec<_>, _>>()?;
        let repair_ops = repair_names
            .iter()
            .map(|name| RepairOperator::from_name(name))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            instance,
            params,
            destroy_ops,
            repair_ops,
        })
    }

    /// Run the simulated-annealing ALNS loop until the time budget or the
    /// no-improvement cap is exhausted and report the best feasible
    /// solution found.
    pub fn solve(&self, rng: &mut Random) -> Result<SolveReport<'a>, SolverError> {
        let instance = self.instance;
        let params = &self.params;

        let timer = Timer::new();
        let countdown = Countdown::new(timer.clone(), TimeLimit::Seconds(params.max_time));

        let mut capa_error_weight = 1.0f64;
        let mut frame_error_weight = 1.0f64;

        let initial_routes = initialization::random_routes(instance, rng)?;
        let mut running = Solution::new(
            instance,
            initial_routes,
            capa_error_weight,
            frame_error_weight,
        );
        let mut current = running.clone();
        let mut best: Option<Solution<'a>> = None;
        let mut best_driving_time = f64::INFINITY;

        info!(
            "initialized: quality {:.3}, driving time {:.3}, feasible {}",
            running.total_quality(),
            running.total_driving_time(),
            running.is_feasible()
        );

        // implicitly scales with the instance size
        let mut temperature = params.init_temperature * running.total_quality();
        let mut mean_removal =
            (instance.nr_customers as f64).ln() / params.mean_removal_log.ln();

        let mut node_pair_potential = vec![vec![f64::MAX; instance.nr_nodes]; instance.nr_nodes];
        let mut node_pair_usage = vec![vec![0u64; instance.nr_nodes]; instance.nr_nodes];
        let mut visited_solutions: HashMap<RoutesKey, u64> = HashMap::new();

        let mut destroy_wheel = RouletteWheel::new(
            self.destroy_ops.len(),
            params.wheel_parameter,
            params.min_weight,
        );
        let mut repair_wheel = RouletteWheel::new(
            self.repair_ops.len(),
            params.wheel_parameter,
            params.min_weight,
        );
        let destroy_period = (self.destroy_ops.len() * params.wheel_memory_length).max(1) as u64;
        let repair_period = (self.repair_ops.len() * params.wheel_memory_length).max(1) as u64;

        let mut iteration: u64 = 0;
        let mut iterations_without_improvement: u64 = 0;
        let mut inf_count = 0usize;
        let mut inf_window = 0usize;

        while countdown.is_time_remaining()
            && iterations_without_improvement < params.max_iterations
        {
            let destroy_id = destroy_wheel.get_random_id(rng);
            let repair_id = repair_wheel.get_random_id(rng);

            let move_timer = Timer::new();
            let time_stamp = timer.took().as_std().as_millis() as u64;

            // destroy and repair form one atomic move on the running solution
            let removed = {
                let ctx = DestroyContext {
                    mean_removal,
                    capa_error_weight,
                    frame_error_weight,
                    node_pair_potential: &node_pair_potential,
                };
                destroy::apply_destroy(&self.destroy_ops[destroy_id], &mut running, rng, &ctx)?
            };
            {
                let ctx = RepairContext {
                    capa_error_weight,
                    frame_error_weight,
                };
                repair::apply_repair(&self.repair_ops[repair_id], &mut running, removed, rng, &ctx)?;
            }

            update_historic_matrices(&running, &mut node_pair_potential, &mut node_pair_usage);

            let mut benefit = 0.0;
            let key = running.routes_key();
            let is_new = !visited_solutions.contains_key(&key);
            if is_new {
                benefit += params.reward_unique;
            }

            if running.total_quality() < current.total_quality() {
                // strictly better moves are always accepted
                current.clone_from(&running);
                benefit += params.reward_accept_better;
            } else {
                let acceptance = (-(running.total_quality() - current.total_quality())
                    / temperature)
                    .exp();
                let diversity = running.get_diversity(&node_pair_usage, iteration);
                benefit += diversity * acceptance * params.reward_divers + params.penalty;

                if rng.gen_range(0.0..1.0f64) < acceptance {
                    current.clone_from(&running);
                }
            }

            if running.total_driving_time() < best_driving_time && running.is_feasible() {
                best_driving_time = running.total_driving_time();
                best = Some(running.clone());
                benefit += params.reward_best;
                iterations_without_improvement = 0;
                if params.shakeup_log > 0.0 {
                    mean_removal = ((instance.nr_customers as f64).ln()
                        / params.mean_removal_log.ln())
                    .ceil();
                }
                info!(
                    "iteration {iteration}: new best driving time {best_driving_time:.3}"
                );
            } else {
                iterations_without_improvement += 1;
                if params.shakeup_log > 0.0 {
                    // widen the neighborhood as stagnation grows
                    mean_removal = (((iterations_without_improvement + 1) as f64).ln()
                        / params.shakeup_log.ln()
                        * ((instance.nr_customers as f64).ln() / params.mean_removal_log.ln()))
                    .ceil();
                }
            }

            if is_new {
                visited_solutions.insert(key, time_stamp);
            }

            if !running.is_feasible() {
                inf_count += 1;
            }
            inf_window += 1;
            if inf_window == 100 {
                let inf_ratio = inf_count as f64 / 100.0;
                if inf_ratio + 0.05 < params.target_inf {
                    capa_error_weight *= 0.85;
                    frame_error_weight *= 0.85;
                } else if inf_ratio - 0.05 > params.target_inf {
                    capa_error_weight *= 1.2;
                    frame_error_weight *= 1.2;
                }
                // best is always feasible, its quality equals its driving time
                current.set_quality(capa_error_weight, frame_error_weight);
                running.set_quality(capa_error_weight, frame_error_weight);
                debug!(
                    "iteration {iteration}: infeasibility ratio {inf_ratio:.2}, \
                     penalty weights now {capa_error_weight:.4}/{frame_error_weight:.4}"
                );
                inf_count = 0;
                inf_window = 0;
            }

            let execution_ms = (move_timer.took().as_std().as_millis() as u64).max(1);
            let score = benefit / execution_ms as f64;
            destroy_wheel.update_stats(score);
            repair_wheel.update_stats(score);
            if (iteration + 1) % destroy_period == 0 {
                destroy_wheel.update_weights();
            }
            if (iteration + 1) % repair_period == 0 {
                repair_wheel.update_weights();
            }

            temperature *= params.cooling_rate;
            iteration += 1;
            running.clone_from(&current);
        }

        let solve_time_ms = countdown.time_elapsed().as_millis() as u64;
        info!(
            "finished after {iteration} iterations in {solve_time_ms} ms, best driving time {}",
            best.as_ref()
                .map(|b| format!("{:.3}", b.total_driving_time()))
                .unwrap_or_else(|| "-".into())
        );

        Ok(SolveReport {
            best_solution: best,
            iterations: iteration,
            solve_time_ms,
            destroy_wheel: WheelStats {
                operators: self.destroy_ops.iter().map(|op| op.name().into()).collect(),
                weights: destroy_wheel.weights().to_vec(),
                nr_uses: destroy_wheel.nr_uses().to_vec(),
            },
            repair_wheel: WheelStats {
                operators: self.repair_ops.iter().map(|op| op.name().into()).collect(),
                weights: repair_wheel.weights().to_vec(),
                nr_uses: repair_wheel.nr_uses().to_vec(),
            },
            visited_solutions,
            capa_error_weight,
            frame_error_weight,
        })
    }
}

/// Fold the running solution's arcs into the historic matrices: the best
/// driving time ever seen per arc, and how often each arc was ridden.
/// The depot closing leg counts like any other arc.
fn update_historic_matrices(
    running: &Solution,
    node_pair_potential: &mut [Vec<f64>],
    node_pair_usage: &mut [Vec<u64>],
) {
    let driving_time = running.total_driving_time();
    for route in running.routes() {
        if route.is_empty() {
            continue;
        }
        let mut prev_node = 0usize;
        for &customer in route {
            let node = customer + 1;
            if node_pair_potential[prev_node][node] > driving_time {
                node_pair_potential[prev_node][node] = driving_time;
            }
            node_pair_usage[prev_node][node] += 1;
            prev_node = node;
        }
        if node_pair_potential[prev_node][0] > driving_time {
            node_pair_potential[prev_node][0] = driving_time;
        }
        node_pair_usage[prev_node][0] += 1;
    }
}
