//! End-to-end solver scenarios: known-optimum micro instances, penalty
//! weight adaptation, visited-set bookkeeping, and determinism under a
//! fixed seed.

use anyhow::Result;

use vrpldtt_alns::alns::{AlnsSolver, Parameters, SolveReport};
use vrpldtt_alns::error::SolverError;
use vrpldtt_alns::problem::{BucketLayout, Instance};
use vrpldtt_alns::solution::RoutesKey;
use vrpldtt_alns::utils::create_seeded_rng;
use vrpldtt_alns::utils::validator::assert_valid_solution;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn flat_instance(
    nr_vehicles: usize,
    demand: Vec<f64>,
    end_window: Vec<f64>,
    capacity: f64,
) -> Instance {
    let nr_customers = demand.len();
    let nr_nodes = nr_customers + 1;
    let mut distance = vec![vec![1.0; nr_nodes]; nr_nodes];
    for (i, row) in distance.iter_mut().enumerate() {
        row[i] = 0.0;
    }
    Instance::vrpldtt(
        nr_vehicles,
        nr_customers,
        demand,
        vec![0.0; nr_customers],
        vec![0.0; nr_customers],
        end_window,
        vec![vec![0.0; nr_nodes]; nr_nodes],
        distance,
        BucketLayout::Size(10.0),
        140.0,
        capacity,
    )
    .unwrap()
}

#[test]
fn single_customer_rides_at_free_speed() -> Result<()> {
    init_logging();
    // 1 km out, 1 km back, flat, lightly loaded: 25 km/h both ways
    let instance = flat_instance(1, vec![10.0], vec![100.0], 150.0);
    let params = Parameters::new()
        .with_destroy_operators(["random_destroy"])
        .with_repair_operators(["basic_greedy"])
        .with_max_time(5)
        .with_max_iterations(50);
    let solver = AlnsSolver::new(&instance, params)?;
    let mut rng = create_seeded_rng(1);

    let report = solver.solve(&mut rng)?;
    let best = report.best_solution.expect("feasible micro instance");

    assert_eq!(vec![vec![0]], best.routes());
    assert!((best.total_driving_time() - 2.0 * (1.0 / 25.0) * 60.0).abs() <= 1e-6);
    assert_eq!(0.0, best.total_capa_error());
    assert_eq!(0.0, best.total_frame_error());
    assert!(best.is_feasible());

    // the only reachable routes value is logged exactly once
    assert!(report
        .visited_solutions
        .contains_key(&RoutesKey(vec![vec![0]])));
    assert!(report.visited_solutions.len() <= report.iterations as usize);
    Ok(())
}

#[test]
fn capacity_forces_a_route_split() -> Result<()> {
    let instance = flat_instance(2, vec![100.0, 100.0], vec![1000.0, 1000.0], 150.0);
    let params = Parameters::new()
        .with_destroy_operators(["random_destroy", "route_destroy", "shaw_destroy"])
        .with_repair_operators(["basic_greedy", "2_regret"])
        .with_max_time(10)
        .with_max_iterations(300);
    let solver = AlnsSolver::new(&instance, params)?;
    let mut rng = create_seeded_rng(2);

    let report = solver.solve(&mut rng)?;
    let best = report.best_solution.expect("a split assignment is feasible");

    assert_eq!(0.0, best.total_capa_error());
    assert!(best.routes().iter().all(|route| route.len() == 1));
    assert_valid_solution(&instance, &best, 1.0, 1.0);
    Ok(())
}

#[test]
fn unreachable_windows_drive_the_penalty_weights_up() -> Result<()> {
    // both windows close after one minute but the approach alone takes
    // 2.4 minutes; every assignment stays late forever
    let instance = flat_instance(1, vec![10.0, 10.0], vec![1.0, 1.0], 150.0);
    let params = Parameters::new()
        .with_destroy_operators(["random_destroy"])
        .with_repair_operators(["basic_greedy"])
        .with_max_time(10)
        .with_max_iterations(500)
        .with_target_inf(0.0);
    let solver = AlnsSolver::new(&instance, params)?;
    let mut rng = create_seeded_rng(3);

    let report = solver.solve(&mut rng)?;

    assert!(report.best_solution.is_none());
    assert!(report.iterations >= 100);
    // with a zero infeasibility target the weights only ever move up
    assert!(report.frame_error_weight > 1.0);
    assert!(report.capa_error_weight > 1.0);
    Ok(())
}

#[test]
fn vrptw_mode_finds_the_two_route_optimum() -> Result<()> {
    let plane = vec![
        vec![0.0, 1.0, 1.0],
        vec![1.0, 0.0, 1.0],
        vec![1.0, 1.0, 0.0],
    ];
    let instance = Instance::vrptw(
        2,
        2,
        vec![100.0, 100.0],
        vec![0.0, 0.0],
        vec![0.0, 0.0],
        vec![100.0, 100.0],
        vec![plane],
        150.0,
    )
    .unwrap();

    let params = Parameters::new()
        .with_destroy_operators(["random_destroy", "worst_destroy"])
        .with_repair_operators(["deep_greedy"])
        .with_max_time(10)
        .with_max_iterations(300);
    let solver = AlnsSolver::new(&instance, params)?;
    let mut rng = create_seeded_rng(4);

    let report = solver.solve(&mut rng)?;
    let best = report.best_solution.expect("the split is feasible");

    // one customer per route: two legs of 1 minute each, per route
    assert!((best.total_driving_time() - 4.0).abs() <= 1e-6);
    assert_eq!(0.0, best.total_capa_error());
    Ok(())
}

#[test]
fn fixed_seed_replays_the_whole_run() -> Result<()> {
    let instance = flat_instance(
        3,
        vec![40.0, 30.0, 50.0, 20.0, 60.0, 10.0],
        vec![500.0; 6],
        150.0,
    );
    let params = Parameters::new()
        .with_destroy_operators(["random_destroy", "shaw_destroy", "worst_destroy"])
        .with_repair_operators(["basic_greedy", "3_regret"])
        .with_max_time(600)
        .with_max_iterations(150);

    fn run<'a>(
        instance: &'a Instance,
        params: &Parameters,
        seed: i128,
    ) -> Result<SolveReport<'a>> {
        let solver = AlnsSolver::new(instance, params.clone())?;
        let mut rng = create_seeded_rng(seed);
        Ok(solver.solve(&mut rng)?)
    }

    let first = run(&instance, &params, 77)?;
    let second = run(&instance, &params, 77)?;

    let best_a = first.best_solution.expect("feasible");
    let best_b = second.best_solution.expect("feasible");
    assert_eq!(best_a.routes(), best_b.routes());
    assert_eq!(best_a.total_driving_time(), best_b.total_driving_time());
    assert_eq!(first.iterations, second.iterations);
    assert_eq!(
        first.visited_solutions.len(),
        second.visited_solutions.len()
    );
    assert_eq!(first.destroy_wheel.nr_uses, second.destroy_wheel.nr_uses);

    // another seed must still terminate with a feasible best
    let third = run(&instance, &params, 78)?;
    assert!(third.best_solution.expect("feasible").is_feasible());
    Ok(())
}

#[test]
fn full_operator_portfolio_stays_consistent() -> Result<()> {
    init_logging();
    let instance = flat_instance(
        3,
        vec![35.0, 25.0, 45.0, 15.0, 55.0, 20.0, 30.0, 40.0],
        vec![800.0; 8],
        150.0,
    );
    let params = Parameters::new()
        .with_destroy_operators([
            "random_destroy",
            "route_destroy",
            "demand_destroy",
            "time_destroy",
            "worst_destroy",
            "node_pair_destroy",
            "shaw_destroy",
            "distance_similarity",
            "window_similarity",
            "demand_similarity",
        ])
        .with_repair_operators([
            "basic_greedy",
            "random_greedy",
            "deep_greedy",
            "2_regret",
            "3_regret",
            "5_regret",
            "beta_hybrid",
        ])
        .with_max_time(20)
        .with_max_iterations(200);
    let solver = AlnsSolver::new(&instance, params)?;
    let mut rng = create_seeded_rng(5);

    let report = solver.solve(&mut rng)?;
    let best = report.best_solution.expect("feasible");
    assert_valid_solution(&instance, &best, 1.0, 1.0);

    assert_eq!(10, report.destroy_wheel.operators.len());
    assert_eq!(7, report.repair_wheel.operators.len());
    assert!(report.solve_time_ms > 0 || report.iterations > 0);
    Ok(())
}

#[test]
fn unknown_operator_name_fails_construction() {
    let instance = flat_instance(1, vec![10.0], vec![100.0], 150.0);
    let params = Parameters::new().with_destroy_operators(["nonsense_destroy"]);
    assert!(matches!(
        AlnsSolver::new(&instance, params),
        Err(SolverError::Config(_))
    ));
}

#[test]
fn oversubscribed_fleet_fails_initialization() {
    // pseudo slack is 100, so one vehicle holds strictly less than 250
    let instance = flat_instance(1, vec![100.0, 100.0, 100.0], vec![1000.0; 3], 150.0);
    let params = Parameters::new()
        .with_destroy_operators(["random_destroy"])
        .with_repair_operators(["basic_greedy"]);
    let solver = AlnsSolver::new(&instance, params).unwrap();
    let mut rng = create_seeded_rng(6);
    assert!(matches!(
        solver.solve(&mut rng),
        Err(SolverError::InitInfeasible)
    ));
}
