//! Owned routing context.
//!
//! A [`RoutingSession`] holds the grid and optional weather field for the
//! lifetime of a process. Setup (terrain, safety zones, weather) mutates it
//! through `&mut self`; once set up, any number of routers and optimizers can
//! borrow it read-only.

use crate::error::Result;
use crate::genetic::{GeneticOptimizer, OptimizerConfig};
use crate::grid::Grid;
use crate::routing::Router;
use crate::safety::SafetyLayer;
use crate::vessel::VesselConfig;
use crate::weather::{CostField, WeatherField, WeatherPattern};

#[derive(Debug, Clone)]
pub struct RoutingSession {
    grid: Grid,
    weather: Option<WeatherField>,
    safety: Option<SafetyLayer>,
    vessel: VesselConfig,
}

impl RoutingSession {
    /// Session without weather over an existing grid.
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            weather: None,
            safety: None,
            vessel: VesselConfig::default(),
        }
    }

    /// Sample ocean of the given size with a generated weather pattern.
    pub fn sample(
        width: usize,
        height: usize,
        cell_size_km: f64,
        pattern: WeatherPattern,
    ) -> Result<Self> {
        let mut grid = Grid::new(width, height, cell_size_km)?;
        grid.create_sample_ocean();
        let weather = WeatherField::generate(&grid, pattern);
        let mut session = Self::new(grid);
        session.set_weather(weather);
        tracing::info!(
            width,
            height,
            cell_size_km,
            %pattern,
            water_cells = session.grid.water_cells(),
            "initialized sample session"
        );
        Ok(session)
    }

    pub fn with_vessel(mut self, vessel: VesselConfig) -> Result<Self> {
        vessel.validate()?;
        self.vessel = vessel;
        Ok(self)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable grid access for terrain setup.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn weather(&self) -> Option<&WeatherField> {
        self.weather.as_ref()
    }

    pub fn weather_mut(&mut self) -> Option<&mut WeatherField> {
        self.weather.as_mut()
    }

    pub fn safety(&self) -> Option<&SafetyLayer> {
        self.safety.as_ref()
    }

    pub fn vessel(&self) -> &VesselConfig {
        &self.vessel
    }

    /// Attach a weather field and fold its penalties into the grid's
    /// additive weather term.
    pub fn set_weather(&mut self, weather: WeatherField) {
        weather.apply_to_grid(&mut self.grid);
        self.weather = Some(weather);
    }

    /// Re-apply the current weather field to the grid after it was edited,
    /// e.g. after adding a storm.
    pub fn refresh_weather(&mut self) {
        if let Some(weather) = &self.weather {
            weather.apply_to_grid(&mut self.grid);
        }
    }

    /// Apply a safety layer to the grid and keep it for route scoring.
    pub fn apply_safety(&mut self, layer: SafetyLayer) {
        layer.apply(&mut self.grid);
        self.safety = Some(layer);
    }

    fn cost_field(&self) -> Option<&dyn CostField> {
        self.weather.as_ref().map(|w| w as &dyn CostField)
    }

    /// Router over the session's grid and weather.
    pub fn router(&self) -> Router<'_> {
        let router = Router::new(&self.grid).with_vessel(self.vessel);
        match self.cost_field() {
            Some(field) => router.with_cost_field(field),
            None => router,
        }
    }

    /// Genetic optimizer over the session's grid and weather.
    pub fn optimizer(&self, config: OptimizerConfig) -> Result<GeneticOptimizer<'_>> {
        GeneticOptimizer::new(&self.grid, self.cost_field(), config)?.with_vessel(self.vessel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RouteAlgorithm;

    #[test]
    fn sample_session_has_weather_and_land() {
        let session = RoutingSession::sample(40, 40, 10.0, WeatherPattern::Moderate).unwrap();
        assert!(session.weather().is_some());
        assert!(session.grid().water_cells() < session.grid().len());
        assert!(session.router().has_cost_field());
    }

    #[test]
    fn session_without_weather_compares_two_algorithms() {
        let session = RoutingSession::new(Grid::new(10, 10, 10.0).unwrap());
        let grid = session.grid();
        let results = session
            .router()
            .compare(&grid.cell(0, 0).unwrap(), &grid.cell(9, 9).unwrap())
            .unwrap();
        assert!(results.contains_key(&RouteAlgorithm::Dijkstra));
        assert!(!results.contains_key(&RouteAlgorithm::WeatherAware));
    }

    #[test]
    fn safety_layer_is_applied_and_kept() {
        let mut session = RoutingSession::new(Grid::new(20, 20, 10.0).unwrap());
        let mut layer = SafetyLayer::new();
        layer.add_military_zone(10, 10, 1);
        session.apply_safety(layer);
        assert!(!session.grid().cell(10, 10).unwrap().traversable);
        assert_eq!(session.safety().map(|s| s.zones().len()), Some(1));
    }
}
