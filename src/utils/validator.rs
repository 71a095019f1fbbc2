//! From-scratch cross-check of a solution's caches, used by the test suite
//! to pin the incremental evaluation against the ground truth.

use fixedbitset::FixedBitSet;

use crate::problem::Instance;
use crate::solution::Solution;

const TOLERANCE: f64 = 1e-6;

/// Assert that every cache of `solution` matches a fresh evaluation of the
/// same routes and that each customer is served exactly once.
///
/// Panics with a description of the first mismatch.
pub fn assert_valid_solution(
    instance: &Instance,
    solution: &Solution,
    capa_error_weight: f64,
    frame_error_weight: f64,
) {
    let mut seen = FixedBitSet::with_capacity(instance.nr_customers);
    for (route_id, route) in solution.routes().iter().enumerate() {
        for &customer in route {
            assert!(
                !seen.contains(customer),
                "customer {customer} is served more than once"
            );
            seen.insert(customer);
            assert_eq!(
                Some(route_id),
                solution.route_of(customer),
                "reverse index of customer {customer} disagrees with the routes"
            );
        }
    }
    assert_eq!(
        instance.nr_customers,
        seen.count_ones(..),
        "not every customer is served"
    );

    let reference = Solution::new(
        instance,
        solution.routes().to_vec(),
        capa_error_weight,
        frame_error_weight,
    );

    assert_close(
        reference.total_driving_time(),
        solution.total_driving_time(),
        "total driving time",
    );
    assert_close(
        reference.total_capa_error(),
        solution.total_capa_error(),
        "total capacity error",
    );
    assert_close(
        reference.total_frame_error(),
        solution.total_frame_error(),
        "total frame error",
    );
    assert_close(
        reference.total_quality(),
        solution.total_quality(),
        "total quality",
    );
    assert_eq!(
        reference.is_feasible(),
        solution.is_feasible(),
        "feasibility flag diverges"
    );

    for customer in 0..instance.nr_customers {
        if solution.route_of(customer).is_none() {
            continue;
        }
        assert_close(
            reference.loads()[customer],
            solution.loads()[customer],
            &format!("load of customer {customer}"),
        );
        assert_close(
            reference.arrival_times()[customer],
            solution.arrival_times()[customer],
            &format!("arrival time of customer {customer}"),
        );
        assert_close(
            reference.departure_times()[customer],
            solution.departure_times()[customer],
            &format!("departure time of customer {customer}"),
        );
    }

    for route_id in 0..solution.routes().len() {
        assert_close(
            reference.start_times()[route_id],
            solution.start_times()[route_id],
            &format!("start time of route {route_id}"),
        );
    }
}

fn assert_close(expected: f64, actual: f64, what: &str) {
    assert!(
        (expected - actual).abs() <= TOLERANCE,
        "{what}: expected {expected}, got {actual}"
    );
}
