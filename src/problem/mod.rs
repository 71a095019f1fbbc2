use log::warn;

use crate::error::SolverError;

pub mod preprocessing;

pub type CustomerId = usize;
pub type RouteId = usize;

pub const DEFAULT_VEHICLE_WEIGHT: f64 = 140.0;
pub const DEFAULT_VEHICLE_CAPACITY: f64 = 150.0;

/// How to discretise cumulative load into travel-time buckets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BucketLayout {
    /// Fixed width of one demand bucket.
    Size(f64),
    /// Number of buckets spanning the vehicle capacity.
    Count(usize),
}

/// Immutable problem data plus every table precomputed at construction.
///
/// Node ids shift customer ids by one: node 0 is the depot and customer `c`
/// is node `c + 1`. The travel-time cube is indexed
/// `[load_bucket][from_node][to_node]`.
#[derive(Debug)]
pub struct Instance {
    pub nr_vehicles: usize,
    pub nr_customers: usize,
    pub nr_nodes: usize,

    pub demand: Vec<f64>,
    pub service_times: Vec<f64>,
    pub start_window: Vec<f64>,
    pub end_window: Vec<f64>,

    pub vehicle_weight: f64,
    pub vehicle_capacity: f64,
    /// Slack above `vehicle_capacity` that random placement and trial
    /// insertions may use; `ceil(max demand)`.
    pub add_pseudo_capacity: f64,
    pub load_bucket_size: f64,
    pub nr_buckets: usize,

    pub time_cube: Vec<Vec<Vec<f64>>>,

    // similarity tables for relatedness removal
    pub norm_distance: Vec<Vec<f64>>,
    pub norm_start_window: Vec<Vec<f64>>,
    pub norm_end_window: Vec<Vec<f64>>,
    pub norm_demand: Vec<Vec<f64>>,
}

impl Instance {
    /// Build a VRPLDTT instance: the travel-time cube is derived from the
    /// distance/elevation topology and the cyclist power model.
    #[allow(clippy::too_many_arguments)]
    pub fn vrpldtt(
        nr_vehicles: usize,
        nr_customers: usize,
        demand: Vec<f64>,
        service_times: Vec<f64>,
        start_window: Vec<f64>,
        end_window: Vec<f64>,
        elevation_matrix: Vec<Vec<f64>>,
        distance_matrix: Vec<Vec<f64>>,
        buckets: BucketLayout,
        vehicle_weight: f64,
        vehicle_capacity: f64,
    ) -> Result<Self, SolverError> {
        check_counts(nr_vehicles, nr_customers)?;
        let nr_nodes = nr_customers + 1;
        check_customer_vectors(
            nr_customers,
            &demand,
            &service_times,
            &start_window,
            &end_window,
        )?;
        check_matrix("distance_matrix", &distance_matrix, nr_nodes)?;
        check_matrix("elevation_matrix", &elevation_matrix, nr_nodes)?;

        let load_bucket_size = match buckets {
            BucketLayout::Size(size) if size > 0.0 => size,
            BucketLayout::Count(count) if count > 0 => vehicle_capacity / count as f64,
            _ => {
                return Err(SolverError::Config(
                    "load bucket size or count must be positive".into(),
                ))
            }
        };

        let add_pseudo_capacity = max_demand(&demand).ceil();
        let slopes = preprocessing::slope_matrix(&distance_matrix, &elevation_matrix);
        let time_cube = preprocessing::time_cube(
            &distance_matrix,
            &slopes,
            vehicle_weight,
            vehicle_capacity,
            add_pseudo_capacity,
            load_bucket_size,
        );

        Self::assemble(
            nr_vehicles,
            nr_customers,
            demand,
            service_times,
            start_window,
            end_window,
            distance_matrix,
            time_cube,
            load_bucket_size,
            vehicle_weight,
            vehicle_capacity,
            add_pseudo_capacity,
        )
    }

    /// Build a classical VRPTW instance from a pre-supplied travel-time cube
    /// with a single bucket (travel times do not depend on load).
    pub fn vrptw(
        nr_vehicles: usize,
        nr_customers: usize,
        demand: Vec<f64>,
        service_times: Vec<f64>,
        start_window: Vec<f64>,
        end_window: Vec<f64>,
        time_cube: Vec<Vec<Vec<f64>>>,
        vehicle_capacity: f64,
    ) -> Result<Self, SolverError> {
        check_counts(nr_vehicles, nr_customers)?;
        let nr_nodes = nr_customers + 1;
        check_customer_vectors(
            nr_customers,
            &demand,
            &service_times,
            &start_window,
            &end_window,
        )?;
        if time_cube.len() != 1 {
            return Err(SolverError::Config(format!(
                "a load-independent time cube must hold exactly one bucket, got {}",
                time_cube.len()
            )));
        }
        check_matrix("time_cube", &time_cube[0], nr_nodes)?;

        // a single bucket wider than any reachable load keeps every lookup
        // in plane zero
        let load_bucket_size = vehicle_capacity * 2.0;
        let add_pseudo_capacity = max_demand(&demand).ceil();
        let distance_matrix = time_cube[0].clone();

        Self::assemble(
            nr_vehicles,
            nr_customers,
            demand,
            service_times,
            start_window,
            end_window,
            distance_matrix,
            time_cube,
            load_bucket_size,
            0.0,
            vehicle_capacity,
            add_pseudo_capacity,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        nr_vehicles: usize,
        nr_customers: usize,
        demand: Vec<f64>,
        service_times: Vec<f64>,
        start_window: Vec<f64>,
        end_window: Vec<f64>,
        distance_matrix: Vec<Vec<f64>>,
        time_cube: Vec<Vec<Vec<f64>>>,
        load_bucket_size: f64,
        vehicle_weight: f64,
        vehicle_capacity: f64,
        add_pseudo_capacity: f64,
    ) -> Result<Self, SolverError> {
        if add_pseudo_capacity > vehicle_capacity {
            warn!(
                "largest single demand ({add_pseudo_capacity}) exceeds the vehicle \
                 capacity ({vehicle_capacity}); no feasible assignment exists for it"
            );
        }

        Ok(Self {
            nr_vehicles,
            nr_customers,
            nr_nodes: nr_customers + 1,
            norm_distance: preprocessing::norm_distance_matrix(&distance_matrix),
            norm_start_window: preprocessing::pairwise_difference_matrix(&start_window),
            norm_end_window: preprocessing::pairwise_difference_matrix(&end_window),
            norm_demand: preprocessing::pairwise_difference_matrix(&demand),
            demand,
            service_times,
            start_window,
            end_window,
            vehicle_weight,
            vehicle_capacity,
            add_pseudo_capacity,
            load_bucket_size,
            nr_buckets: time_cube.len(),
            time_cube,
        })
    }
}

fn max_demand(demand: &[f64]) -> f64 {
    demand.iter().copied().fold(f64::MIN, f64::max)
}

fn check_counts(nr_vehicles: usize, nr_customers: usize) -> Result<(), SolverError> {
    if nr_vehicles == 0 || nr_customers == 0 {
        return Err(SolverError::Config(
            "vehicle and customer counts must be positive".into(),
        ));
    }
    Ok(())
}

fn check_customer_vectors(
    nr_customers: usize,
    demand: &[f64],
    service_times: &[f64],
    start_window: &[f64],
    end_window: &[f64],
) -> Result<(), SolverError> {
    for (name, vector) in [
        ("demand", demand),
        ("service_times", service_times),
        ("start_window", start_window),
        ("end_window", end_window),
    ] {
        if vector.len() != nr_customers {
            return Err(SolverError::Config(format!(
                "{name} holds {} entries, expected one per customer ({nr_customers})",
                vector.len()
            )));
        }
    }
    Ok(())
}

fn check_matrix(name: &str, matrix: &[Vec<f64>], nr_nodes: usize) -> Result<(), SolverError> {
    if matrix.len() != nr_nodes || matrix.iter().any(|row| row.len() != nr_nodes) {
        return Err(SolverError::Config(format!(
            "{name} must be {nr_nodes}x{nr_nodes} (depot plus customers)"
        )));
    }
    Ok(())
}
