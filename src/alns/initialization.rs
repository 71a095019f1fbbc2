use rand::Rng;

use crate::error::SolverError;
use crate::problem::{CustomerId, Instance};
use crate::utils::Random;

/// Random route fill: every customer is pushed onto a random route with
/// spare pseudo-capacity.
///
/// Routes are probed from a random offset and wrap around once, so the fill
/// is unbiased across vehicles. The pseudo-capacity slack is what makes a
/// random assignment possible at all; the search burns the slack off via
/// the infeasibility penalties.
pub fn random_routes(
    instance: &Instance,
    rng: &mut Random,
) -> Result<Vec<Vec<CustomerId>>, SolverError> {
    let max_capacity = instance.vehicle_capacity + instance.add_pseudo_capacity;
    let mut routes: Vec<Vec<CustomerId>> = vec![Vec::new(); instance.nr_vehicles];
    let mut route_loads = vec![0.0f64; instance.nr_vehicles];

    let mut pool: Vec<CustomerId> = (0..instance.nr_customers).collect();
    while !pool.is_empty() {
        let pool_pos = rng.gen_range(0..pool.len());
        let customer = pool[pool_pos];
        let offset = rng.gen_range(0..instance.nr_vehicles);

        let slot = (offset..instance.nr_vehicles)
            .chain(0..offset)
            .find(|&route_id| {
                route_loads[route_id] + instance.demand[customer] < max_capacity
            });

        match slot {
            Some(route_id) => {
                routes[route_id].push(customer);
                route_loads[route_id] += instance.demand[customer];
                pool.swap_remove(pool_pos);
            }
            None => return Err(SolverError::InitInfeasible),
        }
    }

    Ok(routes)
}
