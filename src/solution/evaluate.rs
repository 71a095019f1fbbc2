//! Route-level evaluation primitives.
//!
//! Every routine works on one route and the caller's cache buffers; nothing
//! here allocates or touches more than the route it is handed. These are the
//! innermost functions of the search.

use crate::error::SolverError;
use crate::problem::CustomerId;

/// Bucket index of a cumulative load.
///
/// The 0.3 offset is a sub-bucket tolerance that makes the upper bound of
/// each interval land in that interval instead of the next one.
pub fn load_bucket(load: f64, bucket_size: f64) -> usize {
    ((load - 0.3) / bucket_size).max(0.0) as usize
}

/// Recompute cumulative loads and bucket levels for positions
/// `0..=end_pos`, walking right to left.
///
/// Loads accumulate from a position towards the end of the route, so an
/// edit at position `p` only invalidates positions at or before `p`; the
/// sweep seeds itself from the untouched value after `end_pos`. `end_pos`
/// past the route end is clamped to the last position.
pub fn update_load_levels(
    loads: &mut [f64],
    load_levels: &mut [usize],
    route: &[CustomerId],
    end_pos: usize,
    demand: &[f64],
    bucket_size: f64,
) {
    if route.is_empty() {
        return;
    }
    let end_pos = end_pos.min(route.len() - 1);

    let mut load = if end_pos + 1 < route.len() {
        loads[route[end_pos + 1]]
    } else {
        0.0
    };
    for &customer in route[..=end_pos].iter().rev() {
        load += demand[customer];
        loads[customer] = load;
        load_levels[customer] = load_bucket(load, bucket_size);
    }
}

/// Latest departure from the depot that still reaches the first customer at
/// its window opening; never negative.
pub fn starting_time(
    route: &[CustomerId],
    load_levels: &[usize],
    start_window: &[f64],
    time_cube: &[Vec<Vec<f64>>],
) -> f64 {
    match route.first() {
        Some(&first) => {
            let approach = time_cube[load_levels[first]][0][first + 1];
            (start_window[first] - approach).max(0.0)
        }
        None => 0.0,
    }
}

/// Forward sweep from the depot: fills arrival and departure times and
/// returns the route's driving time including the closing leg back to the
/// depot (ridden empty, bucket 0).
#[allow(clippy::too_many_arguments)]
pub fn update_visit_times(
    arrival_times: &mut [f64],
    departure_times: &mut [f64],
    start_time: f64,
    route: &[CustomerId],
    load_levels: &[usize],
    start_window: &[f64],
    time_cube: &[Vec<Vec<f64>>],
    service_times: &[f64],
) -> f64 {
    if route.is_empty() {
        return 0.0;
    }

    let mut driving_time = 0.0;
    let mut current_time = start_time;
    let mut prev_node = 0usize;

    for &customer in route {
        let node = customer + 1;
        let leg = time_cube[load_levels[customer]][prev_node][node];
        current_time += leg;
        driving_time += leg;

        // early arrival waits for the window to open
        current_time = current_time.max(start_window[customer]);
        arrival_times[customer] = current_time;

        current_time += service_times[customer];
        departure_times[customer] = current_time;

        prev_node = node;
    }

    driving_time + time_cube[0][prev_node][0]
}

/// Load overshoot of a route; the first position carries the peak load.
pub fn capa_error(route: &[CustomerId], vehicle_capacity: f64, loads: &[f64]) -> f64 {
    match route.first() {
        Some(&first) => (loads[first] - vehicle_capacity).max(0.0),
        None => 0.0,
    }
}

/// Aggregate lateness against the end of each customer's window. Early
/// arrival is free (the vehicle waits), so only late arrival counts.
pub fn frame_error(route: &[CustomerId], end_window: &[f64], arrival_times: &[f64]) -> f64 {
    route
        .iter()
        .map(|&customer| (arrival_times[customer] - end_window[customer]).max(0.0))
        .sum()
}

pub fn quality(
    driving_time: f64,
    capa_error: f64,
    frame_error: f64,
    capa_error_weight: f64,
    frame_error_weight: f64,
) -> f64 {
    driving_time + capa_error_weight * capa_error + frame_error_weight * frame_error
}

pub fn is_feasible(capa_error: f64, frame_error: f64) -> bool {
    capa_error <= 0.0 && frame_error <= 0.0
}

/// Position of a customer inside a route. A miss means the reverse index
/// lied, which is a bug, not a recoverable condition.
pub fn position_in_route(route: &[CustomerId], customer: CustomerId) -> Result<usize, SolverError> {
    route
        .iter()
        .position(|&c| c == customer)
        .ok_or_else(|| SolverError::Logic(format!("customer {customer} not found in its route")))
}
