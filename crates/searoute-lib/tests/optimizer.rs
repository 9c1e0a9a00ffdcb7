mod common;

use common::{cell, open_grid, sample_session};
use searoute_lib::{Error, GeneticOptimizer, ObjectiveWeights, OptimizerConfig};

fn quick_config() -> OptimizerConfig {
    OptimizerConfig {
        population_size: 30,
        generations: 12,
        ..OptimizerConfig::default()
    }
}

#[test]
fn optimized_route_connects_endpoints_on_sample_ocean() {
    let session = sample_session();
    let grid = session.grid();
    let start = cell(grid, 6, 5);
    let goal = cell(grid, 53, 55);

    let mut optimizer = session.optimizer(quick_config()).expect("valid config");
    let route = optimizer
        .optimize(&start, &goal, &ObjectiveWeights::default())
        .expect("optimization runs");

    assert_eq!(route.waypoints().first(), Some(&start));
    assert_eq!(route.waypoints().last(), Some(&goal));
    assert!(route.len() >= 2);
    assert!(route.distance_km().is_finite());
    assert!(route.fitness() > 0.0);
}

#[test]
fn returned_route_is_best_ever_evaluated() {
    let session = sample_session();
    let grid = session.grid();
    let mut optimizer = session.optimizer(quick_config()).expect("valid config");
    let route = optimizer
        .optimize(&cell(grid, 10, 50), &cell(grid, 50, 10), &ObjectiveWeights::default())
        .expect("optimization runs");

    let history = optimizer.history();
    assert_eq!(history.len(), quick_config().generations + 1);
    for stats in history {
        assert!(route.fitness() >= stats.population_best);
        assert!(route.fitness() >= stats.evaluated_best, "{stats:?}");
    }
    // Offspring are scored every generation, and the returned route is the
    // fittest of all of them.
    assert!(history.iter().skip(1).all(|s| s.evaluated_best.is_finite()));
    let peak = history
        .iter()
        .map(|s| s.evaluated_best)
        .fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(route.fitness(), peak);
    // The best-so-far never decreases.
    for pair in history.windows(2) {
        assert!(pair[1].best_so_far >= pair[0].best_so_far);
    }
}

#[test]
fn identical_seeds_reproduce_the_route() {
    let grid = open_grid(40, 40);
    let start = cell(&grid, 1, 1);
    let goal = cell(&grid, 38, 30);
    let weights = ObjectiveWeights::new(0.5, 0.2, 0.2, 0.1);

    let run = |seed: u64| {
        let mut optimizer =
            GeneticOptimizer::new(&grid, None, quick_config().with_seed(seed)).expect("config");
        optimizer.optimize(&start, &goal, &weights).expect("runs")
    };

    let first = run(7);
    let second = run(7);
    assert_eq!(first.waypoints(), second.waypoints());
    assert_eq!(first.fitness(), second.fitness());
}

#[test]
fn distance_heavy_weights_prefer_short_routes() {
    let grid = open_grid(50, 50);
    let start = cell(&grid, 0, 25);
    let goal = cell(&grid, 49, 25);
    let mut optimizer = GeneticOptimizer::new(&grid, None, quick_config()).expect("config");
    let route = optimizer
        .optimize(&start, &goal, &ObjectiveWeights::new(1.0, 0.0, 0.0, 0.0))
        .expect("runs");

    let straight = grid.distance(&start, &goal);
    assert!(route.distance_km() >= straight - 1e-9);
    assert!(route.distance_km() <= straight * 1.5);
}

#[test]
fn rejects_invalid_weights_and_config() {
    let grid = open_grid(10, 10);
    let mut optimizer = GeneticOptimizer::new(&grid, None, quick_config()).expect("config");
    let weights = ObjectiveWeights::new(0.4, 0.4, 0.4, -0.2);
    assert!(matches!(
        optimizer.optimize(&cell(&grid, 0, 0), &cell(&grid, 9, 9), &weights),
        Err(Error::InvalidWeights { .. })
    ));

    let config = OptimizerConfig {
        crossover_rate: 1.5,
        ..OptimizerConfig::default()
    };
    assert!(matches!(
        GeneticOptimizer::new(&grid, None, config),
        Err(Error::InvalidConfig { .. })
    ));
}

#[test]
fn zero_generations_returns_best_initial_route() {
    let grid = open_grid(20, 20);
    let config = OptimizerConfig {
        generations: 0,
        population_size: 10,
        ..OptimizerConfig::default()
    };
    let mut optimizer = GeneticOptimizer::new(&grid, None, config).expect("config");
    let route = optimizer
        .optimize(&cell(&grid, 0, 0), &cell(&grid, 19, 19), &ObjectiveWeights::default())
        .expect("runs");
    assert_eq!(optimizer.history().len(), 1);
    assert_eq!(route.fitness(), optimizer.history()[0].population_best);
}
