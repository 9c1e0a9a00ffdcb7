mod common;

use common::{cell, open_grid};
use searoute_lib::{Cell, Grid, DEFAULT_CELL_SIZE_KM};

#[test]
fn neighbours_skip_land_and_edges() {
    let mut grid = open_grid(5, 5);
    grid.set_land(1, 0, true);

    let corner = cell(&grid, 0, 0);
    let neighbours = grid.neighbors(&corner, true);
    assert_eq!(neighbours, vec![cell(&grid, 0, 1), cell(&grid, 1, 1)]);
    assert_eq!(grid.neighbors(&corner, false), vec![cell(&grid, 0, 1)]);

    let centre = cell(&grid, 2, 2);
    assert_eq!(grid.neighbors(&centre, true).len(), 8);
    assert_eq!(grid.neighbors(&centre, false).len(), 4);
}

#[test]
fn distance_is_euclidean_in_kilometres() {
    let grid = Grid::new(10, 10, DEFAULT_CELL_SIZE_KM).expect("grid");
    assert!((grid.distance(&cell(&grid, 0, 0), &cell(&grid, 3, 4)) - 50.0).abs() < 1e-12);
    let diagonal = grid.distance(&cell(&grid, 0, 0), &cell(&grid, 1, 1));
    assert!((diagonal - 10.0 * 2f64.sqrt()).abs() < 1e-12);
}

#[test]
fn sample_ocean_scales_with_grid() {
    for size in [20usize, 60, 100] {
        let mut grid = open_grid(size, size);
        grid.create_sample_ocean();
        let last = size as i32 - 1;
        assert!(!cell(&grid, 0, 0).traversable, "west coast at {size}");
        assert!(!cell(&grid, last, last).traversable, "east coast at {size}");
        assert!(cell(&grid, last / 2, 3).traversable, "open water at {size}");
        assert!(grid.water_cells() > grid.len() / 2);
    }
}

#[test]
fn path_metrics_sum_legs() {
    let mut grid = open_grid(5, 5);
    grid.set_base_cost(1, 1, 3.0);
    let path: Vec<Cell> = vec![cell(&grid, 0, 0), cell(&grid, 1, 1), cell(&grid, 2, 1)];
    let diagonal = 10.0 * 2f64.sqrt();
    assert!((grid.path_length(&path) - (diagonal + 10.0)).abs() < 1e-9);
    assert!((grid.path_cost(&path) - (diagonal * 3.0 + 10.0)).abs() < 1e-9);
}

#[test]
fn validity_tracks_current_terrain() {
    let mut grid = open_grid(5, 5);
    let path = vec![cell(&grid, 0, 0), cell(&grid, 1, 0), cell(&grid, 2, 0)];
    assert!(grid.is_valid_path(&path));
    grid.set_land(1, 0, true);
    assert!(!grid.is_valid_path(&path));
    assert!(!grid.is_valid_path(&[Cell::new(9, 9)]));
}

#[test]
fn line_walk_crosses_every_column() {
    let grid = open_grid(20, 20);
    let line = grid.line(&cell(&grid, 2, 3), &cell(&grid, 15, 9));
    assert_eq!(line.len(), 14);
    for pair in line.windows(2) {
        assert_eq!(pair[1].x - pair[0].x, 1);
        assert!((pair[1].y - pair[0].y).abs() <= 1);
    }
}
