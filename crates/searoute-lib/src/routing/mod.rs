//! Route planning on the navigation grid.
//!
//! This module provides:
//! - [`RouteAlgorithm`] - Supported point-to-point algorithms
//! - [`RouteRequest`] - High-level request addressed by coordinates
//! - [`plan_route`] - Request-level entry point that requires a route
//! - [`Router`] - Cell-level entry point used for searching and comparison
//!
//! # Strategy Pattern
//!
//! Each algorithm is encapsulated in its own [`RoutePlanner`] implementation,
//! selected through [`select_planner`]. Both orchestrators dispatch through the
//! trait, then hand the raw outcome to [`RouteResult::assemble`] so every
//! algorithm is measured the same way.
//!
//! # Example
//!
//! ```
//! use searoute_lib::{plan_route, Grid, RouteRequest};
//!
//! let grid = Grid::new(10, 10, 10.0)?;
//! let request = RouteRequest::a_star((0, 0), (3, 4));
//! let result = plan_route(&grid, None, &request)?;
//! assert_eq!(result.path.len(), 5);
//! # Ok::<(), searoute_lib::Error>(())
//! ```

mod planner;

pub use planner::{
    select_planner, AStarPlanner, BidirectionalPlanner, DijkstraPlanner, FuelOptimizedPlanner,
    RoutePlanner, WeatherAwarePlanner,
};

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::grid::{Cell, Grid};
use crate::path::SearchOptions;
use crate::result::RouteResult;
use crate::vessel::VesselConfig;
use crate::weather::CostField;

/// Supported point-to-point routing algorithms.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum RouteAlgorithm {
    /// Uniform-cost search.
    Dijkstra,
    /// Heuristic-guided search with a Euclidean estimate.
    #[default]
    AStar,
    /// A* with direction-dependent weather penalties.
    WeatherAware,
    /// A* minimising fuel burn.
    FuelOptimized,
    /// Two-sided A* that stops on the first meeting round.
    Bidirectional,
}

impl RouteAlgorithm {
    /// Every algorithm, in comparison order.
    pub const ALL: [RouteAlgorithm; 5] = [
        RouteAlgorithm::Dijkstra,
        RouteAlgorithm::AStar,
        RouteAlgorithm::WeatherAware,
        RouteAlgorithm::FuelOptimized,
        RouteAlgorithm::Bidirectional,
    ];

    /// Human-readable label for reports.
    pub fn label(self) -> &'static str {
        match self {
            RouteAlgorithm::Dijkstra => "Dijkstra",
            RouteAlgorithm::AStar => "A*",
            RouteAlgorithm::WeatherAware => "Weather-Aware A*",
            RouteAlgorithm::FuelOptimized => "Fuel-Optimized A*",
            RouteAlgorithm::Bidirectional => "Bidirectional A*",
        }
    }
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteAlgorithm::Dijkstra => "dijkstra",
            RouteAlgorithm::AStar => "a-star",
            RouteAlgorithm::WeatherAware => "weather-aware",
            RouteAlgorithm::FuelOptimized => "fuel-optimized",
            RouteAlgorithm::Bidirectional => "bidirectional",
        };
        f.write_str(value)
    }
}

impl FromStr for RouteAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "dijkstra" => Ok(RouteAlgorithm::Dijkstra),
            "a-star" | "astar" | "a*" => Ok(RouteAlgorithm::AStar),
            "weather-aware" | "weather" => Ok(RouteAlgorithm::WeatherAware),
            "fuel-optimized" | "fuel" => Ok(RouteAlgorithm::FuelOptimized),
            "bidirectional" => Ok(RouteAlgorithm::Bidirectional),
            other => Err(format!("unknown routing algorithm '{other}'")),
        }
    }
}

/// High-level route planning request addressed by grid coordinates.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub start: (i32, i32),
    pub goal: (i32, i32),
    pub algorithm: RouteAlgorithm,
    pub vessel: VesselConfig,
    pub options: SearchOptions,
}

impl RouteRequest {
    pub fn new(start: (i32, i32), goal: (i32, i32), algorithm: RouteAlgorithm) -> Self {
        Self {
            start,
            goal,
            algorithm,
            vessel: VesselConfig::default(),
            options: SearchOptions::default(),
        }
    }

    /// Convenience constructor for A* routes with default vessel settings.
    pub fn a_star(start: (i32, i32), goal: (i32, i32)) -> Self {
        Self::new(start, goal, RouteAlgorithm::AStar)
    }

    pub fn with_vessel(mut self, vessel: VesselConfig) -> Self {
        self.vessel = vessel;
        self
    }
}

/// Resolve a coordinate pair to a traversable cell.
fn resolve_endpoint(grid: &Grid, (x, y): (i32, i32)) -> Result<Cell> {
    let cell = grid.cell(x, y).ok_or(Error::CellOutOfBounds { x, y })?;
    if !cell.traversable {
        return Err(Error::NotTraversable { x, y });
    }
    Ok(cell)
}

/// Compute a route for `request`, failing when none exists.
///
/// Unlike [`Router::search`], an unreachable goal is reported as
/// [`Error::RouteNotFound`]; this is the entry point for callers that need a
/// route to proceed.
pub fn plan_route(
    grid: &Grid,
    field: Option<&dyn CostField>,
    request: &RouteRequest,
) -> Result<RouteResult> {
    request.vessel.validate()?;
    let start = resolve_endpoint(grid, request.start)?;
    let goal = resolve_endpoint(grid, request.goal)?;

    let router = Router::new(grid)
        .with_vessel(request.vessel)
        .with_options(request.options);
    let router = match field {
        Some(field) => router.with_cost_field(field),
        None => router,
    };

    match router.search(request.algorithm, &start, &goal)? {
        Some(result) if !result.is_empty() => Ok(result),
        _ => Err(Error::RouteNotFound {
            start: request.start,
            goal: request.goal,
        }),
    }
}

/// Cell-level routing facade over one grid and an optional cost field.
///
/// Empty results are not errors here: single-objective searches return an
/// empty path and bidirectional search returns `None`.
#[derive(Clone, Copy)]
pub struct Router<'a> {
    grid: &'a Grid,
    field: Option<&'a dyn CostField>,
    vessel: VesselConfig,
    options: SearchOptions,
}

impl<'a> Router<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            field: None,
            vessel: VesselConfig::default(),
            options: SearchOptions::default(),
        }
    }

    pub fn with_cost_field(mut self, field: &'a dyn CostField) -> Self {
        self.field = Some(field);
        self
    }

    pub fn with_vessel(mut self, vessel: VesselConfig) -> Self {
        self.vessel = vessel;
        self
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    pub fn has_cost_field(&self) -> bool {
        self.field.is_some()
    }

    /// Run `algorithm` between two cells.
    ///
    /// Returns `None` only for a bidirectional search whose frontiers never met.
    pub fn search(
        &self,
        algorithm: RouteAlgorithm,
        start: &Cell,
        goal: &Cell,
    ) -> Result<Option<RouteResult>> {
        self.check_endpoint(start)?;
        self.check_endpoint(goal)?;

        let planner = select_planner(algorithm, &self.vessel);
        let effective = planner.effective_algorithm(self.field);
        let Some(outcome) = planner.find_path(self.grid, self.field, start, goal, &self.options)?
        else {
            return Ok(None);
        };

        let result = RouteResult::assemble(self.grid, self.field, &self.vessel, outcome, effective);
        tracing::debug!(
            algorithm = %result.algorithm,
            nodes_explored = result.nodes_explored,
            hops = result.hop_count(),
            distance_km = result.distance_km,
            "search finished"
        );
        Ok(Some(result))
    }

    pub fn dijkstra(&self, start: &Cell, goal: &Cell) -> Result<RouteResult> {
        self.single_objective(RouteAlgorithm::Dijkstra, start, goal)
    }

    pub fn a_star(&self, start: &Cell, goal: &Cell) -> Result<RouteResult> {
        self.single_objective(RouteAlgorithm::AStar, start, goal)
    }

    /// Weather-aware A*; plain A* when no cost field is attached.
    pub fn weather_aware(&self, start: &Cell, goal: &Cell) -> Result<RouteResult> {
        self.single_objective(RouteAlgorithm::WeatherAware, start, goal)
    }

    /// Fuel-optimized A*; plain A* when no cost field is attached.
    pub fn fuel_optimized(&self, start: &Cell, goal: &Cell) -> Result<RouteResult> {
        self.single_objective(RouteAlgorithm::FuelOptimized, start, goal)
    }

    pub fn bidirectional(&self, start: &Cell, goal: &Cell) -> Result<Option<RouteResult>> {
        self.search(RouteAlgorithm::Bidirectional, start, goal)
    }

    /// Run every single-objective algorithm between two cells.
    ///
    /// The cost-field-aware variants are only included when a field is
    /// attached, so every entry reflects the algorithm it is keyed by.
    pub fn compare(
        &self,
        start: &Cell,
        goal: &Cell,
    ) -> Result<BTreeMap<RouteAlgorithm, RouteResult>> {
        let mut algorithms = vec![RouteAlgorithm::Dijkstra, RouteAlgorithm::AStar];
        if self.field.is_some() {
            algorithms.push(RouteAlgorithm::WeatherAware);
            algorithms.push(RouteAlgorithm::FuelOptimized);
        }

        let mut results = BTreeMap::new();
        for algorithm in algorithms {
            results.insert(algorithm, self.single_objective(algorithm, start, goal)?);
        }
        Ok(results)
    }

    fn single_objective(
        &self,
        algorithm: RouteAlgorithm,
        start: &Cell,
        goal: &Cell,
    ) -> Result<RouteResult> {
        // Only bidirectional search can come back without an outcome.
        Ok(self
            .search(algorithm, start, goal)?
            .unwrap_or_else(|| empty_result(algorithm)))
    }

    /// Reject cells that do not belong to the grid or are land.
    fn check_endpoint(&self, cell: &Cell) -> Result<()> {
        let (_, current) = self.grid.resolve(cell)?;
        if !current.traversable {
            return Err(Error::NotTraversable {
                x: cell.x,
                y: cell.y,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Router<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("grid", &format_args!("{}", self.grid))
            .field("has_cost_field", &self.field.is_some())
            .field("vessel", &self.vessel)
            .field("options", &self.options)
            .finish()
    }
}

fn empty_result(algorithm: RouteAlgorithm) -> RouteResult {
    RouteResult {
        path: Vec::new(),
        distance_km: 0.0,
        cost: 0.0,
        fuel_tons: 0.0,
        time_hours: 0.0,
        nodes_explored: 0,
        computation_time: std::time::Duration::ZERO,
        algorithm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_names_round_trip_through_display() {
        for algorithm in RouteAlgorithm::ALL {
            let parsed: RouteAlgorithm = algorithm.to_string().parse().unwrap();
            assert_eq!(parsed, algorithm);
        }
        assert_eq!("A*".parse::<RouteAlgorithm>(), Ok(RouteAlgorithm::AStar));
        assert_eq!(
            "fuel_optimized".parse::<RouteAlgorithm>(),
            Ok(RouteAlgorithm::FuelOptimized)
        );
        assert!("teleport".parse::<RouteAlgorithm>().is_err());
    }

    #[test]
    fn serde_names_match_display() {
        let json = serde_json::to_string(&RouteAlgorithm::WeatherAware).unwrap();
        assert_eq!(json, "\"weather-aware\"");
    }

    #[test]
    fn plan_route_rejects_land_endpoint() {
        let mut grid = Grid::new(5, 5, 10.0).unwrap();
        grid.set_land(4, 4, true);
        let request = RouteRequest::a_star((0, 0), (4, 4));
        assert!(matches!(
            plan_route(&grid, None, &request),
            Err(Error::NotTraversable { x: 4, y: 4 })
        ));
    }

    #[test]
    fn plan_route_rejects_out_of_range_endpoint() {
        let grid = Grid::new(5, 5, 10.0).unwrap();
        let request = RouteRequest::a_star((0, 0), (9, 0));
        assert!(matches!(
            plan_route(&grid, None, &request),
            Err(Error::CellOutOfBounds { x: 9, y: 0 })
        ));
    }

    #[test]
    fn plan_route_reports_unreachable_goal() {
        let mut grid = Grid::new(5, 5, 10.0).unwrap();
        grid.set_land_region(2, 0, 2, 4);
        let request = RouteRequest::a_star((0, 0), (4, 4));
        assert!(matches!(
            plan_route(&grid, None, &request),
            Err(Error::RouteNotFound { .. })
        ));
    }

    #[test]
    fn router_search_keeps_empty_result() {
        let mut grid = Grid::new(5, 5, 10.0).unwrap();
        grid.set_land_region(2, 0, 2, 4);
        let router = Router::new(&grid);
        let start = grid.cell(0, 0).unwrap();
        let goal = grid.cell(4, 4).unwrap();
        let result = router.dijkstra(&start, &goal).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.distance_km, 0.0);
        assert!(router.bidirectional(&start, &goal).unwrap().is_none());
    }

    #[test]
    fn compare_without_field_runs_distance_algorithms_only() {
        let grid = Grid::new(8, 8, 10.0).unwrap();
        let router = Router::new(&grid);
        let start = grid.cell(0, 0).unwrap();
        let goal = grid.cell(7, 5).unwrap();
        let results = router.compare(&start, &goal).unwrap();
        let keys: Vec<_> = results.keys().copied().collect();
        assert_eq!(keys, vec![RouteAlgorithm::Dijkstra, RouteAlgorithm::AStar]);
    }

    #[test]
    fn fallback_is_labelled_as_a_star() {
        let grid = Grid::new(8, 8, 10.0).unwrap();
        let router = Router::new(&grid);
        let start = grid.cell(0, 0).unwrap();
        let goal = grid.cell(7, 5).unwrap();
        let result = router.weather_aware(&start, &goal).unwrap();
        assert_eq!(result.algorithm, RouteAlgorithm::AStar);
    }
}
