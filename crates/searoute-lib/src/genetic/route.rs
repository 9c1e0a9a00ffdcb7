use serde::Serialize;

use crate::grid::{Cell, Grid};
use crate::result::serialize_coords;
use crate::vessel::VesselConfig;
use crate::weather::CostField;

use super::config::{ObjectiveWeights, OptimizerConfig};

/// One candidate in the population: a waypoint sequence and its scores.
///
/// Routes are only produced by [`RouteEvaluator::evaluate`], so the metrics
/// and fitness always describe the current waypoints.
#[derive(Debug, Clone, Serialize)]
pub struct Route {
    #[serde(serialize_with = "serialize_coords")]
    waypoints: Vec<Cell>,
    fitness: f64,
    distance_km: f64,
    fuel_tons: f64,
    safety: f64,
    time_hours: f64,
    touches_land: bool,
}

impl Route {
    pub fn waypoints(&self) -> &[Cell] {
        &self.waypoints
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn fuel_tons(&self) -> f64 {
        self.fuel_tons
    }

    /// Mean inverse weather penalty; higher is calmer.
    pub fn safety(&self) -> f64 {
        self.safety
    }

    pub fn time_hours(&self) -> f64 {
        self.time_hours
    }

    /// Whether a waypoint, or a straight leg between two waypoints, crosses a
    /// non-traversable cell.
    pub fn touches_land(&self) -> bool {
        self.touches_land
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub(crate) fn into_waypoints(self) -> Vec<Cell> {
        self.waypoints
    }
}

/// Scores waypoint sequences against one grid, cost field and weighting.
pub struct RouteEvaluator<'a> {
    grid: &'a Grid,
    field: Option<&'a dyn CostField>,
    vessel: VesselConfig,
    weights: ObjectiveWeights,
    reference_distance_km: f64,
    reference_fuel_tons: f64,
    reference_time_hours: f64,
    invalid_penalty: f64,
}

impl<'a> RouteEvaluator<'a> {
    pub fn new(
        grid: &'a Grid,
        field: Option<&'a dyn CostField>,
        vessel: VesselConfig,
        weights: ObjectiveWeights,
        config: &OptimizerConfig,
    ) -> Self {
        Self {
            grid,
            field,
            vessel,
            weights,
            reference_distance_km: config.reference_distance_km,
            reference_fuel_tons: config.reference_fuel_tons,
            reference_time_hours: config.reference_time_hours,
            invalid_penalty: config.invalid_penalty,
        }
    }

    /// Measure `waypoints` leg by leg and score the result.
    pub fn evaluate(&self, waypoints: Vec<Cell>) -> Route {
        if waypoints.len() < 2 {
            return Route {
                waypoints,
                fitness: 0.0,
                distance_km: f64::INFINITY,
                fuel_tons: f64::INFINITY,
                safety: 0.0,
                time_hours: f64::INFINITY,
                touches_land: true,
            };
        }

        let mut distance_km = 0.0;
        let mut fuel_tons = 0.0;
        let mut safety = 1.0;

        for leg in waypoints.windows(2) {
            let (from, to) = (&leg[0], &leg[1]);
            let segment = self.grid.distance(from, to);
            distance_km += segment;

            match self.field {
                Some(field) => {
                    let penalty = field.weather_cost(to, from.heading_to(to));
                    fuel_tons += field.fuel_consumption(segment, penalty, &self.vessel);
                    safety *= 1.0 / penalty;
                }
                None => fuel_tons += self.vessel.default_fuel(segment),
            }
        }

        let mut route = Route {
            safety: safety / waypoints.len() as f64,
            touches_land: self.touches_land(&waypoints),
            time_hours: self.vessel.transit_hours(distance_km),
            waypoints,
            fitness: 0.0,
            distance_km,
            fuel_tons,
        };
        route.fitness = self.fitness(&route);
        route
    }

    /// Weighted sum of the normalized objectives, penalized for land contact.
    fn fitness(&self, route: &Route) -> f64 {
        let distance_score = 1.0 - (route.distance_km / self.reference_distance_km).min(1.0);
        let fuel_score = 1.0 - (route.fuel_tons / self.reference_fuel_tons).min(1.0);
        let safety_score = route.safety.clamp(0.0, 1.0);
        let time_score = 1.0 - (route.time_hours / self.reference_time_hours).min(1.0);

        let fitness = self.weights.distance * distance_score
            + self.weights.fuel * fuel_score
            + self.weights.safety * safety_score
            + self.weights.time * time_score;

        if route.touches_land {
            fitness * self.invalid_penalty
        } else {
            fitness
        }
    }

    fn touches_land(&self, waypoints: &[Cell]) -> bool {
        if !self.grid.is_valid_path(waypoints) {
            return true;
        }
        waypoints.windows(2).any(|leg| {
            self.grid
                .line(&leg[0], &leg[1])
                .iter()
                .any(|cell| !cell.traversable)
        })
    }
}
