//! Tests for the solution container: incremental evaluation against the
//! from-scratch ground truth, the capacity gate, and the routes hash.

use vrpldtt_alns::problem::{BucketLayout, Instance};
use vrpldtt_alns::solution::{routes_hash, RoutesKey, Solution};
use vrpldtt_alns::utils::validator::assert_valid_solution;

/// Flat topology, unit distances, wide windows. Bucket size 10 keeps the
/// load levels meaningfully spread.
fn test_instance(nr_vehicles: usize, demand: Vec<f64>, capacity: f64) -> Instance {
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
        vec![2.0; nr_customers],
        vec![0.0; nr_customers],
        vec![1000.0; nr_customers],
        vec![vec![0.0; nr_nodes]; nr_nodes],
        distance,
        BucketLayout::Size(10.0),
        140.0,
        capacity,
    )
    .unwrap()
}

#[test]
fn evaluate_solution_is_idempotent() {
    let instance = test_instance(2, vec![30.0, 20.0, 10.0, 40.0], 150.0);
    let mut solution = Solution::new(&instance, vec![vec![0, 2], vec![3, 1]], 1.0, 1.0);

    let driving = solution.total_driving_time();
    let quality = solution.total_quality();
    let arrivals = solution.arrival_times().to_vec();

    solution.evaluate_solution(1.0, 1.0);

    assert_eq!(driving, solution.total_driving_time());
    assert_eq!(quality, solution.total_quality());
    assert_eq!(arrivals, solution.arrival_times());
}

#[test]
fn incremental_insertion_matches_from_scratch() {
    let instance = test_instance(2, vec![30.0, 20.0, 10.0, 40.0], 150.0);

    // customer 2 starts out unassigned
    let mut solution = Solution::new(&instance, vec![vec![0, 1], vec![3]], 1.0, 1.0);
    solution.insert_customer(0, 1, 2);
    solution.evaluate_change(0, 1, 1.0, 1.0).unwrap();

    assert_valid_solution(&instance, &solution, 1.0, 1.0);

    let reference = Solution::new(&instance, vec![vec![0, 2, 1], vec![3]], 1.0, 1.0);
    assert!((reference.total_quality() - solution.total_quality()).abs() <= 1e-6);
    assert!(
        (reference.total_driving_time() - solution.total_driving_time()).abs() <= 1e-6
    );
}

#[test]
fn incremental_removal_matches_from_scratch() {
    let instance = test_instance(2, vec![30.0, 20.0, 10.0, 40.0], 150.0);
    let mut solution = Solution::new(&instance, vec![vec![0, 2, 1], vec![3]], 1.0, 1.0);

    let removed = solution.remove_customer(0, 1);
    assert_eq!(2, removed);
    solution.evaluate_change(0, 0, 1.0, 1.0).unwrap();

    let reference = Solution::new(&instance, vec![vec![0, 1], vec![3]], 1.0, 1.0);
    assert!((reference.total_quality() - solution.total_quality()).abs() <= 1e-6);
    assert_eq!(None, solution.route_of(2));
}

#[test]
fn removal_at_the_route_head_patches_nothing_before_it() {
    let instance = test_instance(2, vec![30.0, 20.0, 10.0, 40.0], 150.0);
    let mut solution = Solution::new(&instance, vec![vec![0, 2, 1], vec![3]], 1.0, 1.0);

    solution.remove_customer(0, 0);
    solution.evaluate_change(0, 0, 1.0, 1.0).unwrap();

    let reference = Solution::new(&instance, vec![vec![2, 1], vec![3]], 1.0, 1.0);
    assert!((reference.total_quality() - solution.total_quality()).abs() <= 1e-6);
    assert!((reference.total_driving_time() - solution.total_driving_time()).abs() <= 1e-6);
}

#[test]
fn emptying_a_route_zeroes_its_figures() {
    let instance = test_instance(2, vec![30.0, 20.0], 150.0);
    let mut solution = Solution::new(&instance, vec![vec![0], vec![1]], 1.0, 1.0);

    solution.remove_customer(0, 0);
    solution.evaluate_change(0, 0, 1.0, 1.0).unwrap();

    let reference = Solution::new(&instance, vec![vec![], vec![1]], 1.0, 1.0);
    assert!((reference.total_driving_time() - solution.total_driving_time()).abs() <= 1e-6);
    assert_eq!(0.0, solution.start_times()[0]);
}

#[test]
fn capacity_gate_fires_and_totals_stay_consistent() {
    // pseudo-capacity equals the max demand of 10, so a route load of 20
    // against capacity 10 reaches the gate exactly
    let instance = test_instance(2, vec![10.0, 10.0], 10.0);
    let mut solution = Solution::new(&instance, vec![vec![0], vec![1]], 1.0, 1.0);
    let baseline_quality = solution.total_quality();
    let baseline_capa = solution.total_capa_error();

    solution.remove_customer(1, 0);
    solution.evaluate_change(1, 0, 1.0, 1.0).unwrap();

    solution.insert_customer(0, 1, 1);
    let result = solution.evaluate_change(0, 1, 1.0, 1.0);
    assert!(result.is_err());

    // roll back the trial edit the way an operator must
    solution.remove_customer(0, 1);
    solution.evaluate_change(0, 0, 1.0, 1.0).unwrap();
    solution.insert_customer(1, 0, 1);
    solution.evaluate_change(1, 0, 1.0, 1.0).unwrap();

    assert!((baseline_quality - solution.total_quality()).abs() <= 1e-6);
    assert!((baseline_capa - solution.total_capa_error()).abs() <= 1e-6);
    assert_valid_solution(&instance, &solution, 1.0, 1.0);
}

#[test]
fn over_capacity_below_the_gate_is_tracked_not_rejected() {
    // max demand 60 -> gate at capacity error 60; loading 100 + 60 against
    // capacity 150 leaves error 10, which must pass and be penalised
    let instance = test_instance(2, vec![100.0, 60.0], 150.0);
    let solution = Solution::new(&instance, vec![vec![0, 1], vec![]], 1.0, 1.0);

    assert!((solution.total_capa_error() - 10.0).abs() <= 1e-6);
    assert!(!solution.is_feasible());
    assert_valid_solution(&instance, &solution, 1.0, 1.0);
}

#[test]
fn quality_weights_scale_the_errors() {
    let instance = test_instance(2, vec![100.0, 60.0], 150.0);
    let mut solution = Solution::new(&instance, vec![vec![0, 1], vec![]], 1.0, 1.0);
    let driving = solution.total_driving_time();

    solution.set_quality(3.0, 1.0);
    assert!((solution.total_quality() - (driving + 3.0 * 10.0)).abs() <= 1e-6);
}

#[test]
fn route_splits_are_distinct_in_hash_and_equality() {
    let split_a = vec![vec![0, 1], vec![2]];
    let split_b = vec![vec![0], vec![1, 2]];
    assert_ne!(RoutesKey(split_a.clone()), RoutesKey(split_b.clone()));
    assert_ne!(routes_hash(&split_a), routes_hash(&split_b));
    assert_eq!(routes_hash(&split_a), routes_hash(&split_a.clone()));
}

#[test]
fn solutions_compare_by_routes_only() {
    let instance = test_instance(2, vec![30.0, 20.0], 150.0);
    let a = Solution::new(&instance, vec![vec![0], vec![1]], 1.0, 1.0);
    let b = Solution::new(&instance, vec![vec![0], vec![1]], 5.0, 5.0);
    let c = Solution::new(&instance, vec![vec![1], vec![0]], 1.0, 1.0);
    assert_eq!(a, b);
    assert_ne!(a, c);
}
