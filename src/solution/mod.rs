use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::error::InfeasibilityExceeded;
use crate::problem::{CustomerId, Instance, RouteId};

pub mod evaluate;

/// Reverse-index marker for a customer that currently sits in no route.
pub const UNASSIGNED: usize = usize::MAX;

/// Mutable assignment of customers to vehicle routes plus every cache
/// derived from it.
///
/// All caches can be rebuilt from scratch with [`evaluate_solution`]
/// (used after destructive bulk edits) or patched route-locally with
/// [`evaluate_change`] (used by the insertion trial loops).
///
/// [`evaluate_solution`]: Solution::evaluate_solution
/// [`evaluate_change`]: Solution::evaluate_change
#[derive(Debug)]
pub struct Solution<'a> {
    pub(crate) instance: &'a Instance,

    pub(crate) routes: Vec<Vec<CustomerId>>,
    pub(crate) route_of_customer: Vec<usize>,

    // per-customer caches
    pub(crate) loads: Vec<f64>,
    pub(crate) load_levels: Vec<usize>,
    pub(crate) arrival_times: Vec<f64>,
    pub(crate) departure_times: Vec<f64>,

    // per-route caches
    pub(crate) start_times: Vec<f64>,
    pub(crate) route_driving_times: Vec<f64>,
    pub(crate) route_capa_errors: Vec<f64>,
    pub(crate) route_frame_errors: Vec<f64>,
    pub(crate) route_qualities: Vec<f64>,

    // aggregate KPIs
    pub(crate) total_driving_time: f64,
    pub(crate) total_capa_error: f64,
    pub(crate) total_frame_error: f64,
    pub(crate) total_quality: f64,
    pub(crate) is_feasible: bool,
}

impl<'a> Solution<'a> {
    /// Wrap a route assignment and evaluate every cache from scratch.
    pub fn new(
        instance: &'a Instance,
        routes: Vec<Vec<CustomerId>>,
        capa_error_weight: f64,
        frame_error_weight: f64,
    ) -> Self {
        let nr_customers = instance.nr_customers;
        let nr_routes = routes.len();
        let mut solution = Self {
            instance,
            routes,
            route_of_customer: vec![UNASSIGNED; nr_customers],
            loads: vec![0.0; nr_customers],
            load_levels: vec![0; nr_customers],
            arrival_times: vec![0.0; nr_customers],
            departure_times: vec![0.0; nr_customers],
            start_times: vec![0.0; nr_routes],
            route_driving_times: vec![0.0; nr_routes],
            route_capa_errors: vec![0.0; nr_routes],
            route_frame_errors: vec![0.0; nr_routes],
            route_qualities: vec![0.0; nr_routes],
            total_driving_time: 0.0,
            total_capa_error: 0.0,
            total_frame_error: 0.0,
            total_quality: 0.0,
            is_feasible: false,
        };
        solution.evaluate_solution(capa_error_weight, frame_error_weight);
        solution
    }

    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    pub fn routes(&self) -> &[Vec<CustomerId>] {
        &self.routes
    }

    /// Route currently serving `customer`, or `None` while it awaits
    /// reinsertion.
    pub fn route_of(&self, customer: CustomerId) -> Option<RouteId> {
        match self.route_of_customer[customer] {
            UNASSIGNED => None,
            route_id => Some(route_id),
        }
    }

    pub fn total_driving_time(&self) -> f64 {
        self.total_driving_time
    }

    pub fn total_capa_error(&self) -> f64 {
        self.total_capa_error
    }

    pub fn total_frame_error(&self) -> f64 {
        self.total_frame_error
    }

    pub fn total_quality(&self) -> f64 {
        self.total_quality
    }

    pub fn is_feasible(&self) -> bool {
        self.is_feasible
    }

    pub fn start_times(&self) -> &[f64] {
        &self.start_times
    }

    pub fn arrival_times(&self) -> &[f64] {
        &self.arrival_times
    }

    pub fn departure_times(&self) -> &[f64] {
        &self.departure_times
    }

    pub fn loads(&self) -> &[f64] {
        &self.loads
    }

    /// Splice `customer` into a route without evaluating; pair with
    /// [`evaluate_change`](Solution::evaluate_change).
    pub fn insert_customer(&mut self, route_id: RouteId, pos: usize, customer: CustomerId) {
        self.routes[route_id].insert(pos, customer);
        self.route_of_customer[customer] = route_id;
    }

    /// Remove the visit at `pos` without evaluating; the customer keeps no
    /// route assignment afterwards.
    pub fn remove_customer(&mut self, route_id: RouteId, pos: usize) -> CustomerId {
        let customer = self.routes[route_id].remove(pos);
        self.route_of_customer[customer] = UNASSIGNED;
        customer
    }

    /// Rebuild every cache from the route assignment.
    pub fn evaluate_solution(&mut self, capa_error_weight: f64, frame_error_weight: f64) {
        let instance = self.instance;

        self.route_of_customer.fill(UNASSIGNED);
        for (route_id, route) in self.routes.iter().enumerate() {
            for &customer in route {
                self.route_of_customer[customer] = route_id;
            }
        }

        for route in &self.routes {
            evaluate::update_load_levels(
                &mut self.loads,
                &mut self.load_levels,
                route,
                route.len().saturating_sub(1),
                &instance.demand,
                instance.load_bucket_size,
            );
        }

        self.total_driving_time = 0.0;
        self.total_capa_error = 0.0;
        self.total_frame_error = 0.0;
        self.total_quality = 0.0;

        for (route_id, route) in self.routes.iter().enumerate() {
            let start_time = evaluate::starting_time(
                route,
                &self.load_levels,
                &instance.start_window,
                &instance.time_cube,
            );
            let driving_time = evaluate::update_visit_times(
                &mut self.arrival_times,
                &mut self.departure_times,
                start_time,
                route,
                &self.load_levels,
                &instance.start_window,
                &instance.time_cube,
                &instance.service_times,
            );
            let capa_error = evaluate::capa_error(route, instance.vehicle_capacity, &self.loads);
            let frame_error = evaluate::frame_error(route, &instance.end_window, &self.arrival_times);
            let quality = evaluate::quality(
                driving_time,
                capa_error,
                frame_error,
                capa_error_weight,
                frame_error_weight,
            );

            self.start_times[route_id] = start_time;
            self.route_driving_times[route_id] = driving_time;
            self.route_capa_errors[route_id] = capa_error;
            self.route_frame_errors[route_id] = frame_error;
            self.route_qualities[route_id] = quality;

            self.total_driving_time += driving_time;
            self.total_capa_error += capa_error;
            self.total_frame_error += frame_error;
            self.total_quality += quality;
        }

        self.is_feasible = evaluate::is_feasible(self.total_capa_error, self.total_frame_error);
    }

    /// Re-evaluate one route after the caller has inserted or removed a
    /// visit at `changed_pos`, patching only what the edit invalidated.
    ///
    /// If the route's capacity error reaches `add_pseudo_capacity` the edit
    /// is inadmissible: the aggregate KPIs are left consistent with the
    /// per-route caches and [`InfeasibilityExceeded`] is returned. The
    /// load/level caches stay mutated until the caller reverts the edit and
    /// calls `evaluate_change` again.
    pub fn evaluate_change(
        &mut self,
        route_id: RouteId,
        changed_pos: usize,
        capa_error_weight: f64,
        frame_error_weight: f64,
    ) -> Result<(), InfeasibilityExceeded> {
        let instance = self.instance;

        // capacity first: the gate must fire before any travel-time work,
        // because an over-pseudo load has no row in the time cube
        self.total_capa_error -= self.route_capa_errors[route_id];
        evaluate::update_load_levels(
            &mut self.loads,
            &mut self.load_levels,
            &self.routes[route_id],
            changed_pos,
            &instance.demand,
            instance.load_bucket_size,
        );
        let capa_error =
            evaluate::capa_error(&self.routes[route_id], instance.vehicle_capacity, &self.loads);
        self.total_capa_error += capa_error;

        if capa_error >= instance.add_pseudo_capacity {
            // keep the totals in sync with the untouched per-route caches;
            // the caller reverts the route edit and re-evaluates
            self.total_capa_error += self.route_capa_errors[route_id] - capa_error;
            return Err(InfeasibilityExceeded);
        }

        self.total_driving_time -= self.route_driving_times[route_id];
        self.total_frame_error -= self.route_frame_errors[route_id];
        self.total_quality -= self.route_qualities[route_id];

        let start_time = evaluate::starting_time(
            &self.routes[route_id],
            &self.load_levels,
            &instance.start_window,
            &instance.time_cube,
        );
        let driving_time = evaluate::update_visit_times(
            &mut self.arrival_times,
            &mut self.departure_times,
            start_time,
            &self.routes[route_id],
            &self.load_levels,
            &instance.start_window,
            &instance.time_cube,
            &instance.service_times,
        );
        let frame_error =
            evaluate::frame_error(&self.routes[route_id], &instance.end_window, &self.arrival_times);
        let quality = evaluate::quality(
            driving_time,
            capa_error,
            frame_error,
            capa_error_weight,
            frame_error_weight,
        );

        self.total_driving_time += driving_time;
        self.total_frame_error += frame_error;
        self.total_quality += quality;

        self.start_times[route_id] = start_time;
        self.route_driving_times[route_id] = driving_time;
        self.route_capa_errors[route_id] = capa_error;
        self.route_frame_errors[route_id] = frame_error;
        self.route_qualities[route_id] = quality;

        self.is_feasible = evaluate::is_feasible(self.total_capa_error, self.total_frame_error);
        Ok(())
    }

    /// Recompute the quality figures only, after the infeasibility penalty
    /// weights changed. Driving times and error terms are untouched.
    pub fn set_quality(&mut self, capa_error_weight: f64, frame_error_weight: f64) {
        self.total_quality = 0.0;
        for route_id in 0..self.routes.len() {
            let quality = evaluate::quality(
                self.route_driving_times[route_id],
                self.route_capa_errors[route_id],
                self.route_frame_errors[route_id],
                capa_error_weight,
                frame_error_weight,
            );
            self.route_qualities[route_id] = quality;
            self.total_quality += quality;
        }
    }

    /// How historically under-used this solution's arcs are: the mean over
    /// all route edges (depot legs included) of
    /// `1 - usage[from][to] / (iteration + 1)`, normalised by the customer
    /// count plus the number of non-empty routes.
    pub fn get_diversity(&self, node_pair_usage: &[Vec<u64>], iteration: u64) -> f64 {
        let new_iteration = (iteration + 1) as f64;
        let mut norm = self.instance.nr_customers as f64;
        let mut diversity = 0.0;

        for route in &self.routes {
            if route.is_empty() {
                continue;
            }
            norm += 1.0;
            let mut prev_node = 0usize;
            for &customer in route {
                let node = customer + 1;
                diversity += 1.0 - node_pair_usage[prev_node][node] as f64 / new_iteration;
                prev_node = node;
            }
            diversity += 1.0 - node_pair_usage[prev_node][0] as f64 / new_iteration;
        }

        diversity / norm
    }

    /// Hashable ownership of the route assignment, for the visited-solutions
    /// map.
    pub fn routes_key(&self) -> RoutesKey {
        RoutesKey(self.routes.clone())
    }
}

impl Clone for Solution<'_> {
    fn clone(&self) -> Self {
        Self {
            instance: self.instance,
            routes: self.routes.clone(),
            route_of_customer: self.route_of_customer.clone(),
            loads: self.loads.clone(),
            load_levels: self.load_levels.clone(),
            arrival_times: self.arrival_times.clone(),
            departure_times: self.departure_times.clone(),
            start_times: self.start_times.clone(),
            route_driving_times: self.route_driving_times.clone(),
            route_capa_errors: self.route_capa_errors.clone(),
            route_frame_errors: self.route_frame_errors.clone(),
            route_qualities: self.route_qualities.clone(),
            total_driving_time: self.total_driving_time,
            total_capa_error: self.total_capa_error,
            total_frame_error: self.total_frame_error,
            total_quality: self.total_quality,
            is_feasible: self.is_feasible,
        }
    }

    // the driver copies `running <- current` every iteration; reusing the
    // buffers keeps the hot loop free of allocations
    fn clone_from(&mut self, source: &Self) {
        self.instance = source.instance;
        self.routes.clone_from(&source.routes);
        self.route_of_customer.clone_from(&source.route_of_customer);
        self.loads.clone_from(&source.loads);
        self.load_levels.clone_from(&source.load_levels);
        self.arrival_times.clone_from(&source.arrival_times);
        self.departure_times.clone_from(&source.departure_times);
        self.start_times.clone_from(&source.start_times);
        self.route_driving_times
            .clone_from(&source.route_driving_times);
        self.route_capa_errors.clone_from(&source.route_capa_errors);
        self.route_frame_errors
            .clone_from(&source.route_frame_errors);
        self.route_qualities.clone_from(&source.route_qualities);
        self.total_driving_time = source.total_driving_time;
        self.total_capa_error = source.total_capa_error;
        self.total_frame_error = source.total_frame_error;
        self.total_quality = source.total_quality;
        self.is_feasible = source.is_feasible;
    }
}

impl PartialEq for Solution<'_> {
    // identical routes imply identical derived state
    fn eq(&self, other: &Self) -> bool {
        self.routes == other.routes
    }
}

impl Eq for Solution<'_> {}

impl Hash for Solution<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(mix_routes(&self.routes));
    }
}

/// Route assignment as a map key for the visited-solutions log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutesKey(pub Vec<Vec<CustomerId>>);

impl Hash for RoutesKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(mix_routes(&self.0));
    }
}

/// Order-sensitive mix of the routes value. Each route's length enters the
/// seed so splits like `[[1, 2], [3]]` and `[[1], [2, 3]]` come out
/// different.
fn mix_routes(routes: &[Vec<CustomerId>]) -> u64 {
    // 0x9e3779b9 is the golden-ratio constant of the boost hash combiner
    let mut seed = routes.len() as u64;
    for route in routes {
        seed ^= (route.len() as u64)
            .wrapping_add(0x9e3779b9)
            .wrapping_add(seed << 6)
            .wrapping_add(seed >> 2);
        for &customer in route {
            seed ^= (customer as u64)
                .wrapping_add(0x9e3779b9)
                .wrapping_add(seed << 6)
                .wrapping_add(seed >> 2);
        }
    }
    seed
}

/// Convenience for tests and diagnostics: the mixed hash value itself.
pub fn routes_hash(routes: &[Vec<CustomerId>]) -> u64 {
    let mut hasher = DefaultHasher::new();
    RoutesKey(routes.to_vec()).hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_splits_hash_differently() {
        let a = vec![vec![1, 2], vec![3]];
        let b = vec![vec![1], vec![2, 3]];
        assert_ne!(RoutesKey(a.clone()), RoutesKey(b.clone()));
        assert_ne!(routes_hash(&a), routes_hash(&b));
    }

    #[test]
    fn identical_routes_hash_identically() {
        let a = vec![vec![0, 2], vec![1]];
        assert_eq!(routes_hash(&a), routes_hash(&a.clone()));
    }
}
