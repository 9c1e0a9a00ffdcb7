mod common;

use common::{assert_navigable, cell, moderate_weather, open_grid, sample_session, walled_grid};
use searoute_lib::{RouteAlgorithm, Router};

const TOLERANCE: f64 = 1e-6;

#[test]
fn start_equals_goal_yields_single_cell_for_every_algorithm() {
    let grid = open_grid(15, 15);
    let weather = moderate_weather(&grid);
    let router = Router::new(&grid).with_cost_field(&weather);
    let here = cell(&grid, 7, 7);

    for algorithm in RouteAlgorithm::ALL {
        let result = router
            .search(algorithm, &here, &here)
            .expect("search runs")
            .expect("result present");
        assert_eq!(result.path, vec![here], "{algorithm}");
        assert_eq!(result.distance_km, 0.0, "{algorithm}");
        assert_eq!(result.cost, 0.0, "{algorithm}");
        assert_eq!(result.fuel_tons, 0.0, "{algorithm}");
        assert_eq!(result.time_hours, 0.0, "{algorithm}");
    }
}

#[test]
fn dijkstra_and_a_star_agree_on_open_water() {
    let grid = open_grid(30, 30);
    let router = Router::new(&grid);
    let pairs = [((2, 3), (25, 17)), ((29, 0), (0, 29)), ((5, 20), (22, 20))];

    for ((sx, sy), (gx, gy)) in pairs {
        let start = cell(&grid, sx, sy);
        let goal = cell(&grid, gx, gy);
        let dijkstra = router.dijkstra(&start, &goal).expect("dijkstra");
        let a_star = router.a_star(&start, &goal).expect("a*");

        assert!((dijkstra.distance_km - a_star.distance_km).abs() < TOLERANCE);
        assert!(
            a_star.nodes_explored <= dijkstra.nodes_explored,
            "A* expanded {} nodes, Dijkstra {}",
            a_star.nodes_explored,
            dijkstra.nodes_explored
        );
    }
}

#[test]
fn three_four_offset_is_fifty_km_and_path_takes_octile_length() {
    let grid = open_grid(10, 10);
    let start = cell(&grid, 0, 0);
    let goal = cell(&grid, 3, 4);
    assert!((grid.distance(&start, &goal) - 50.0).abs() < 0.1);

    // On an 8-connected grid the shortest walk is three diagonals and one
    // straight step, slightly longer than the straight line.
    let result = Router::new(&grid).a_star(&start, &goal).expect("a*");
    let octile = 3.0 * 2f64.sqrt() * 10.0 + 10.0;
    assert!((result.distance_km - octile).abs() < 0.1);
    assert!(result.distance_km >= 50.0);
    assert_eq!(result.path.len(), 5);
    assert_eq!(result.path.first(), Some(&start));
    assert_eq!(result.path.last(), Some(&goal));
}

#[test]
fn wall_forces_detour() {
    let grid = walled_grid();
    let router = Router::new(&grid);
    let start = cell(&grid, 2, 5);
    let goal = cell(&grid, 17, 5);

    for algorithm in [
        RouteAlgorithm::Dijkstra,
        RouteAlgorithm::AStar,
        RouteAlgorithm::Bidirectional,
    ] {
        let result = router
            .search(algorithm, &start, &goal)
            .expect("search runs")
            .expect("route exists");
        assert_navigable(&grid, &result.path);
        assert!(result.path.iter().all(|c| !(c.x == 10 && c.y <= 15)));
        assert!(result.path.iter().any(|c| c.y >= 16), "{algorithm}");
        assert!(result.distance_km > grid.distance(&start, &goal));
    }
}

#[test]
fn no_route_is_an_empty_result_not_an_error() {
    let mut grid = open_grid(12, 12);
    grid.set_land_region(6, 0, 6, 11);
    let router = Router::new(&grid);
    let start = cell(&grid, 1, 1);
    let goal = cell(&grid, 10, 10);

    let result = router.a_star(&start, &goal).expect("search runs");
    assert!(result.path.is_empty());
    assert_eq!(result.distance_km, 0.0);
    assert_eq!(result.fuel_tons, 0.0);
    assert!(result.nodes_explored > 0);
}

#[test]
fn every_algorithm_avoids_land_on_sample_ocean() {
    let session = sample_session();
    let grid = session.grid();
    let router = session.router();
    let start = cell(grid, 6, 5);
    let goal = cell(grid, 53, 55);

    for algorithm in RouteAlgorithm::ALL {
        let Some(result) = router.search(algorithm, &start, &goal).expect("search runs") else {
            continue;
        };
        assert!(!result.path.is_empty(), "{algorithm} found no route");
        assert_navigable(grid, &result.path);
        assert_eq!(result.algorithm, algorithm);
    }
}

#[test]
fn repeated_searches_are_identical() {
    let session = sample_session();
    let grid = session.grid();
    let router = session.router();
    let start = cell(grid, 6, 5);
    let goal = cell(grid, 53, 55);

    for algorithm in RouteAlgorithm::ALL {
        let first = router.search(algorithm, &start, &goal).expect("first run");
        let second = router.search(algorithm, &start, &goal).expect("second run");
        match (first, second) {
            (Some(a), Some(b)) => {
                assert_eq!(a.path, b.path, "{algorithm}");
                assert_eq!(a.distance_km, b.distance_km);
                assert_eq!(a.cost, b.cost);
                assert_eq!(a.fuel_tons, b.fuel_tons);
                assert_eq!(a.nodes_explored, b.nodes_explored);
            }
            (None, None) => {}
            _ => panic!("{algorithm} produced different outcomes"),
        }
    }
}

#[test]
fn fuel_optimized_never_burns_more_than_a_star() {
    let session = sample_session();
    let grid = session.grid();
    let router = session.router();
    let pairs = [((6, 5), (53, 55)), ((10, 50), (50, 10)), ((20, 30), (45, 35))];

    for ((sx, sy), (gx, gy)) in pairs {
        let start = cell(grid, sx, sy);
        let goal = cell(grid, gx, gy);
        let fuel = router.fuel_optimized(&start, &goal).expect("fuel search");
        let a_star = router.a_star(&start, &goal).expect("a*");
        assert_eq!(fuel.algorithm, RouteAlgorithm::FuelOptimized);
        assert!(
            fuel.fuel_tons <= a_star.fuel_tons + TOLERANCE,
            "fuel-optimized {} t vs A* {} t",
            fuel.fuel_tons,
            a_star.fuel_tons
        );
    }
}

#[test]
fn compare_with_weather_includes_cost_field_variants() {
    let session = sample_session();
    let grid = session.grid();
    let results = session
        .router()
        .compare(&cell(grid, 6, 5), &cell(grid, 53, 55))
        .expect("compare");
    let keys: Vec<_> = results.keys().copied().collect();
    assert_eq!(
        keys,
        vec![
            RouteAlgorithm::Dijkstra,
            RouteAlgorithm::AStar,
            RouteAlgorithm::WeatherAware,
            RouteAlgorithm::FuelOptimized,
        ]
    );
    for (algorithm, result) in &results {
        assert_eq!(result.algorithm, *algorithm);
    }
}

#[test]
fn orthogonal_only_search_never_moves_diagonally() {
    let grid = open_grid(12, 12);
    let router = Router::new(&grid).with_options(searoute_lib::SearchOptions {
        allow_diagonal: false,
    });
    let result = router
        .a_star(&cell(&grid, 0, 0), &cell(&grid, 7, 9))
        .expect("a*");
    for pair in result.path.windows(2) {
        let dx = (pair[1].x - pair[0].x).abs();
        let dy = (pair[1].y - pair[0].y).abs();
        assert_eq!(dx + dy, 1);
    }
    assert!((result.distance_km - 160.0).abs() < TOLERANCE);
}
