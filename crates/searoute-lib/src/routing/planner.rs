//! Route planning strategies implementing the Strategy pattern.
//!
//! This module provides the `RoutePlanner` trait and one implementation per
//! point-to-point algorithm. The `Router` and `plan_route` orchestrators only
//! talk to the trait, so new algorithms slot in without touching them.

use crate::bidirectional::find_route_bidirectional;
use crate::error::Result;
use crate::grid::{Cell, Grid};
use crate::path::{
    find_route_a_star, find_route_dijkstra, find_route_fuel_optimized, find_route_weather_aware,
    SearchOptions, SearchOutcome,
};
use crate::vessel::VesselConfig;
use crate::weather::CostField;

use super::RouteAlgorithm;

/// Trait for route planning strategies.
///
/// Each implementation encapsulates a specific search algorithm and its
/// fallback behaviour when no cost field is available.
pub trait RoutePlanner: Send + Sync {
    /// The algorithm identifier for this planner.
    fn algorithm(&self) -> RouteAlgorithm;

    /// Execute the search.
    ///
    /// Single-objective planners always return `Some`, with an empty path when
    /// the goal is unreachable. Bidirectional search returns `None` when the
    /// frontiers never meet.
    fn find_path(
        &self,
        grid: &Grid,
        field: Option<&dyn CostField>,
        start: &Cell,
        goal: &Cell,
        options: &SearchOptions,
    ) -> Result<Option<SearchOutcome>>;

    /// Whether this planner needs a cost field to behave as advertised.
    fn requires_cost_field(&self) -> bool {
        false
    }

    /// The algorithm that actually runs given the available cost field.
    fn effective_algorithm(&self, field: Option<&dyn CostField>) -> RouteAlgorithm {
        if self.requires_cost_field() && field.is_none() {
            RouteAlgorithm::AStar
        } else {
            self.algorithm()
        }
    }
}

/// Uniform-cost search planner.
#[derive(Debug, Clone, Default)]
pub struct DijkstraPlanner;

impl RoutePlanner for DijkstraPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Dijkstra
    }

    fn find_path(
        &self,
        grid: &Grid,
        _field: Option<&dyn CostField>,
        start: &Cell,
        goal: &Cell,
        options: &SearchOptions,
    ) -> Result<Option<SearchOutcome>> {
        find_route_dijkstra(grid, start, goal, options).map(Some)
    }
}

/// A* planner using the Euclidean distance to the goal as heuristic.
#[derive(Debug, Clone, Default)]
pub struct AStarPlanner;

impl RoutePlanner for AStarPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::AStar
    }

    fn find_path(
        &self,
        grid: &Grid,
        _field: Option<&dyn CostField>,
        start: &Cell,
        goal: &Cell,
        options: &SearchOptions,
    ) -> Result<Option<SearchOutcome>> {
        find_route_a_star(grid, start, goal, options).map(Some)
    }
}

/// A* planner whose edge cost follows the cost field's directional penalty.
///
/// Falls back to plain A* when no cost field is present.
#[derive(Debug, Clone, Default)]
pub struct WeatherAwarePlanner;

impl RoutePlanner for WeatherAwarePlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::WeatherAware
    }

    fn find_path(
        &self,
        grid: &Grid,
        field: Option<&dyn CostField>,
        start: &Cell,
        goal: &Cell,
        options: &SearchOptions,
    ) -> Result<Option<SearchOutcome>> {
        let Some(field) = field else {
            tracing::warn!(
                "weather-aware routing requested without a cost field; falling back to A*"
            );
            return find_route_a_star(grid, start, goal, options).map(Some);
        };
        find_route_weather_aware(grid, field, start, goal, options).map(Some)
    }

    fn requires_cost_field(&self) -> bool {
        true
    }
}

/// A* planner minimising the vessel's fuel burn.
///
/// Falls back to plain A* when no cost field is present.
#[derive(Debug, Clone)]
pub struct FuelOptimizedPlanner {
    vessel: VesselConfig,
}

impl FuelOptimizedPlanner {
    pub fn new(vessel: &VesselConfig) -> Self {
        Self { vessel: *vessel }
    }
}

impl Default for FuelOptimizedPlanner {
    fn default() -> Self {
        Self::new(&VesselConfig::default())
    }
}

impl RoutePlanner for FuelOptimizedPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::FuelOptimized
    }

    fn find_path(
        &self,
        grid: &Grid,
        field: Option<&dyn CostField>,
        start: &Cell,
        goal: &Cell,
        options: &SearchOptions,
    ) -> Result<Option<SearchOutcome>> {
        let Some(field) = field else {
            tracing::warn!("fuel optimization requested without a cost field; falling back to A*");
            return find_route_a_star(grid, start, goal, options).map(Some);
        };
        find_route_fuel_optimized(grid, field, &self.vessel, start, goal, options).map(Some)
    }

    fn requires_cost_field(&self) -> bool {
        true
    }
}

/// Bidirectional A* planner.
#[derive(Debug, Clone, Default)]
pub struct BidirectionalPlanner;

impl RoutePlanner for BidirectionalPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Bidirectional
    }

    fn find_path(
        &self,
        grid: &Grid,
        _field: Option<&dyn CostField>,
        start: &Cell,
        goal: &Cell,
        options: &SearchOptions,
    ) -> Result<Option<SearchOutcome>> {
        find_route_bidirectional(grid, start, goal, options)
    }
}

/// Select the appropriate planner for an algorithm.
pub fn select_planner(algorithm: RouteAlgorithm, vessel: &VesselConfig) -> Box<dyn RoutePlanner> {
    match algorithm {
        RouteAlgorithm::Dijkstra => Box::new(DijkstraPlanner),
        RouteAlgorithm::AStar => Box::new(AStarPlanner),
        RouteAlgorithm::WeatherAware => Box::new(WeatherAwarePlanner),
        RouteAlgorithm::FuelOptimized => Box::new(FuelOptimizedPlanner::new(vessel)),
        RouteAlgorithm::Bidirectional => Box::new(BidirectionalPlanner),
    }
}
