//! Physics preprocessing for the load-dependent travel-time cube, plus the
//! normalised similarity matrices used by relatedness removal.
//!
//! Everything here runs once at instance construction; the search never
//! touches these routines again.

use itertools::Itertools;

// Cyclist power model.
const MAX_SPEED_KMH: f64 = 25.0;
const POWER_W: f64 = 350.0;
const KMH_TO_MS: f64 = 3.6;
const GRAVITY: f64 = 9.81;
const DRAG_COEFFICIENT: f64 = 1.18;
const RIDER_SURFACE: f64 = 0.83;
const AIR_DENSITY: f64 = 1.18;
const ROLLING_COEFFICIENT: f64 = 0.01;
const DRIVETRAIN_EFFICIENCY: f64 = 0.95;
const AIR_RESISTANCE_CONSTANT: f64 = (AIR_DENSITY * DRAG_COEFFICIENT * RIDER_SURFACE) / 2.0;
const VELOCITY_ACCURACY: f64 = 0.01;

/// Steady-state velocity (km/h) of a rider pushing a fixed power up `slope`
/// with total mass `mass`, capped at the free-rolling maximum.
///
/// The stepping starts at `accuracy / 1.99` so the final subtraction of the
/// same offset cannot round below the last admissible step.
pub fn velocity(mass: f64, slope: f64) -> f64 {
    if slope < 0.0 {
        return MAX_SPEED_KMH;
    }

    let rolling_resistance = ROLLING_COEFFICIENT * mass * GRAVITY * slope.atan().cos();
    let gravity_force = mass * GRAVITY * slope.atan().sin();

    let mut velocity = VELOCITY_ACCURACY / 1.99;
    loop {
        let drag = AIR_RESISTANCE_CONSTANT * (velocity / KMH_TO_MS).powi(2);
        let power =
            (drag + rolling_resistance + gravity_force) * velocity / KMH_TO_MS / DRIVETRAIN_EFFICIENCY;
        if power >= POWER_W {
            break;
        }
        velocity += VELOCITY_ACCURACY;
    }

    if velocity < MAX_SPEED_KMH {
        velocity - VELOCITY_ACCURACY / 1.99
    } else {
        MAX_SPEED_KMH
    }
}

/// Rise-over-run slope for every arc; distances in km, elevations in m.
pub fn slope_matrix(
    distance_matrix: &[Vec<f64>],
    elevation_matrix: &[Vec<f64>],
) -> Vec<Vec<f64>> {
    let nr_nodes = distance_matrix.len();
    let mut slopes = vec![vec![0.0; nr_nodes]; nr_nodes];
    for i in 0..nr_nodes {
        for j in 0..nr_nodes {
            let distance = distance_matrix[i][j];
            if distance > 0.0 {
                let elevation = elevation_matrix[i][j];
                let ground_distance = ((distance * 1000.0).powi(2) - elevation.powi(2)).sqrt();
                slopes[i][j] = elevation / ground_distance;
            }
        }
    }
    slopes
}

/// Travel time (minutes) per load bucket and arc.
///
/// Bucket `b` rides with the mass at the middle of its demand interval,
/// capped at `vehicle_capacity + add_pseudo_capacity`.
pub fn time_cube(
    distance_matrix: &[Vec<f64>],
    slope_matrix: &[Vec<f64>],
    vehicle_weight: f64,
    vehicle_capacity: f64,
    add_pseudo_capacity: f64,
    bucket_size: f64,
) -> Vec<Vec<Vec<f64>>> {
    let max_load = vehicle_capacity + add_pseudo_capacity;
    let nr_buckets = (max_load / bucket_size).ceil() as usize;
    let nr_nodes = distance_matrix.len();

    let mut cube = vec![vec![vec![0.0; nr_nodes]; nr_nodes]; nr_buckets];
    for (bucket, plane) in cube.iter_mut().enumerate() {
        let carried_mass = (bucket as f64 * bucket_size + bucket_size / 2.0).min(max_load);
        for i in 0..nr_nodes {
            // slopes are directional, so each arc gets its own velocity
            for j in 0..nr_nodes {
                let speed = velocity(vehicle_weight + carried_mass, slope_matrix[i][j]);
                plane[i][j] = distance_matrix[i][j] / speed * 60.0;
            }
        }
    }
    cube
}

/// Min-max normalised copy of a matrix; a degenerate value range maps to
/// all-zero instead of dividing by zero.
pub fn normalize_matrix_copy(matrix: &[Vec<f64>], min: f64, max: f64) -> Vec<Vec<f64>> {
    let norm_base = max - min;
    matrix
        .iter()
        .map(|row| {
            row.iter()
                .map(|&value| {
                    if norm_base > 0.0 {
                        (value - min) / norm_base
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect()
}

/// Normalised node-distance matrix used by relatedness removal.
pub fn norm_distance_matrix(distance_matrix: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let (min, max) = match distance_matrix.iter().flatten().copied().minmax() {
        itertools::MinMaxResult::NoElements => (0.0, 0.0),
        itertools::MinMaxResult::OneElement(v) => (v, v),
        itertools::MinMaxResult::MinMax(min, max) => (min, max),
    };
    normalize_matrix_copy(distance_matrix, min, max)
}

/// Normalised matrix of pairwise differences `|v_i - v_j|` over a customer
/// attribute vector (window bounds, demand).
pub fn pairwise_difference_matrix(values: &[f64]) -> Vec<Vec<f64>> {
    let n = values.len();
    let mut matrix = vec![vec![0.0; n]; n];
    let mut max = 0.0f64;
    for i in 0..n {
        for j in 0..n {
            let difference = (values[i] - values[j]).abs();
            matrix[i][j] = difference;
            max = max.max(difference);
        }
    }
    normalize_matrix_copy(&matrix, 0.0, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downhill_rides_at_the_speed_cap() {
        assert_eq!(MAX_SPEED_KMH, velocity(200.0, -0.05));
    }

    #[test]
    fn light_rider_on_the_flat_reaches_the_cap() {
        assert_eq!(MAX_SPEED_KMH, velocity(145.0, 0.0));
    }

    #[test]
    fn climbing_is_slower_than_the_flat() {
        let flat = velocity(180.0, 0.0);
        let climb = velocity(180.0, 0.06);
        assert!(climb < flat);
        assert!(climb > 0.0);
    }

    #[test]
    fn heavier_buckets_never_travel_faster() {
        let distance = vec![vec![0.0, 2.0], vec![2.0, 0.0]];
        let elevation = vec![vec![0.0, 40.0], vec![-40.0, 0.0]];
        let slopes = slope_matrix(&distance, &elevation);
        let cube = time_cube(&distance, &slopes, 140.0, 150.0, 20.0, 10.0);
        for bucket in 1..cube.len() {
            assert!(cube[bucket][0][1] >= cube[bucket - 1][0][1]);
        }
    }

    #[test]
    fn degenerate_attribute_vector_normalises_to_zero() {
        let matrix = pairwise_difference_matrix(&[5.0, 5.0, 5.0]);
        assert!(matrix.iter().flatten().all(|&v| v == 0.0));
    }
}
