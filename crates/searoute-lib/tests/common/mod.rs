//! Shared grid fixtures for integration tests.

use searoute_lib::{Cell, Grid, RoutingSession, WeatherField, WeatherPattern};

/// Obstacle-free grid with 10 km cells.
pub fn open_grid(width: usize, height: usize) -> Grid {
    Grid::new(width, height, 10.0).expect("valid grid")
}

/// 20×20 grid with a vertical wall at x = 10 spanning y = 0..=15.
#[allow(dead_code)]
pub fn walled_grid() -> Grid {
    let mut grid = open_grid(20, 20);
    grid.set_land_region(10, 0, 10, 15);
    grid
}

/// 60×60 sample ocean with moderate weather folded into the grid.
#[allow(dead_code)]
pub fn sample_session() -> RoutingSession {
    RoutingSession::sample(60, 60, 10.0, WeatherPattern::Moderate).expect("valid session")
}

/// Moderate weather over `grid`, without touching the grid itself.
#[allow(dead_code)]
pub fn moderate_weather(grid: &Grid) -> WeatherField {
    WeatherField::generate(grid, WeatherPattern::Moderate)
}

/// Look up a cell that the fixture guarantees exists.
pub fn cell(grid: &Grid, x: i32, y: i32) -> Cell {
    grid.cell(x, y).expect("cell inside grid")
}

/// Assert that consecutive path cells are grid neighbours and all are water.
#[allow(dead_code)]
pub fn assert_navigable(grid: &Grid, path: &[Cell]) {
    assert!(grid.is_valid_path(path), "path crosses land: {path:?}");
    for pair in path.windows(2) {
        let dx = (pair[1].x - pair[0].x).abs();
        let dy = (pair[1].y - pair[0].y).abs();
        assert!(dx <= 1 && dy <= 1 && dx + dy > 0, "non-adjacent step {pair:?}");
    }
}
