//! Searoute library entry points.
//!
//! This crate models an ocean as a grid of cells and routes vessels across it:
//! single-objective searches (Dijkstra, A*, weather-aware and fuel-optimized
//! A*), bidirectional A*, and a genetic optimizer that trades distance, fuel,
//! safety and time against each other. Higher-level consumers (the CLI)
//! should only depend on the items exported here.
//!

pub mod bidirectional;
pub mod error;
pub mod genetic;
pub mod grid;
pub mod path;
pub mod result;
pub mod routing;
pub mod safety;
pub mod session;
pub mod vessel;
pub mod weather;

pub use bidirectional::find_route_bidirectional;
pub use error::{Error, Result};
pub use genetic::{GenerationStats, GeneticOptimizer, ObjectiveWeights, OptimizerConfig, Route};
pub use grid::{Cell, Grid, DEFAULT_CELL_SIZE_KM};
pub use path::{
    find_route_a_star, find_route_dijkstra, find_route_fuel_optimized, find_route_weather_aware,
    SearchOptions, SearchOutcome,
};
pub use result::{write_json, RouteResult};
pub use routing::{plan_route, RouteAlgorithm, RouteRequest, Router};
pub use safety::{DangerZone, SafetyAssessment, SafetyLayer, ZoneKind};
pub use session::RoutingSession;
pub use vessel::VesselConfig;
pub use weather::{CostField, WeatherField, WeatherPattern, WeatherSample};
