//! Multi-objective route optimization with a genetic algorithm.
//!
//! Candidates are whole routes (waypoint sequences) scored by a weighted sum
//! of normalized distance, fuel, safety and time. Each generation runs
//! tournament selection, single-point crossover, adaptive mutation and
//! elitist replacement for a fixed number of generations.
//!
//! Randomness comes from a [`ChaCha8Rng`] seeded by [`OptimizerConfig::seed`],
//! so two optimizers built with the same seed and inputs return the same route.

mod config;
mod route;

pub use config::{ObjectiveWeights, OptimizerConfig, WEIGHT_SUM_TOLERANCE};
pub use route::{Route, RouteEvaluator};

use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::grid::{Cell, Grid};
use crate::vessel::VesselConfig;
use crate::weather::CostField;

/// Fitness summary of one population snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationStats {
    /// 0 for the initial population, `n` after the `n`th replacement.
    pub generation: usize,
    pub population_best: f64,
    pub population_mean: f64,
    /// Fittest candidate evaluated during this generation, including
    /// crossover and mutation children that were not kept.
    pub evaluated_best: f64,
    /// Best fitness evaluated so far, including discarded offspring.
    pub best_so_far: f64,
}

impl GenerationStats {
    fn measure(generation: usize, population: &[Route], tracker: &mut BestTracker) -> Self {
        let population_best = population
            .iter()
            .map(Route::fitness)
            .fold(f64::NEG_INFINITY, f64::max);
        let population_mean = if population.is_empty() {
            0.0
        } else {
            population.iter().map(Route::fitness).sum::<f64>() / population.len() as f64
        };
        Self {
            generation,
            population_best,
            population_mean,
            evaluated_best: tracker.take_generation_peak(),
            best_so_far: tracker.best.as_ref().map_or(f64::NEG_INFINITY, Route::fitness),
        }
    }
}

/// Jittered draws tried per initial waypoint before it is omitted.
const INIT_PLACEMENT_ATTEMPTS: usize = 10;

#[derive(Debug, Clone, Copy)]
enum Mutation {
    Modify,
    Insert,
    Remove,
}

/// Population-based optimizer over one grid and optional cost field.
pub struct GeneticOptimizer<'a> {
    grid: &'a Grid,
    field: Option<&'a dyn CostField>,
    vessel: VesselConfig,
    config: OptimizerConfig,
    rng: ChaCha8Rng,
    history: Vec<GenerationStats>,
}

impl<'a> GeneticOptimizer<'a> {
    /// Build an optimizer, validating `config` once.
    pub fn new(
        grid: &'a Grid,
        field: Option<&'a dyn CostField>,
        config: OptimizerConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            grid,
            field,
            vessel: VesselConfig::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            history: Vec::new(),
        })
    }

    pub fn with_vessel(mut self, vessel: VesselConfig) -> Result<Self> {
        vessel.validate()?;
        self.vessel = vessel;
        Ok(self)
    }

    /// The optimizer's configuration.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Per-generation statistics of the most recent [`optimize`](Self::optimize) call.
    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    /// Evolve routes from `start` to `goal` and return the fittest route
    /// evaluated in any generation.
    pub fn optimize(
        &mut self,
        start: &Cell,
        goal: &Cell,
        weights: &ObjectiveWeights,
    ) -> Result<Route> {
        weights.validate()?;
        let start = self.resolve_endpoint(start)?;
        let goal = self.resolve_endpoint(goal)?;

        let grid = self.grid;
        let field = self.field;
        let evaluator = RouteEvaluator::new(grid, field, self.vessel, *weights, &self.config);

        let mut tracker = BestTracker::default();
        let mut population = self.initialize(&evaluator, &start, &goal);
        for route in &population {
            tracker.record(route);
        }
        self.history.clear();
        self.history
            .push(GenerationStats::measure(0, &population, &mut tracker));

        for generation in 0..self.config.generations {
            let parents = self.tournament_selection(&population);
            let offspring = self.crossover(&evaluator, parents, &mut tracker);
            let mutation_rate = self.config.mutation_rate(generation);
            let offspring = self.mutate(&evaluator, offspring, mutation_rate, &mut tracker);

            population.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
            let elite = self.config.elite_count();
            population.truncate(elite);
            population.extend(
                offspring
                    .into_iter()
                    .take(self.config.population_size - elite),
            );

            let stats = GenerationStats::measure(generation + 1, &population, &mut tracker);
            tracing::debug!(
                generation = stats.generation,
                mutation_rate,
                population_best = stats.population_best,
                best_so_far = stats.best_so_far,
                "generation complete"
            );
            self.history.push(stats);
        }

        let best = tracker.best.ok_or_else(|| Error::RouteNotFound {
            start: start.coords(),
            goal: goal.coords(),
        })?;
        tracing::info!(
            fitness = best.fitness(),
            waypoints = best.len(),
            distance_km = best.distance_km(),
            generations = self.config.generations,
            "optimization finished"
        );
        Ok(best)
    }

    fn resolve_endpoint(&self, cell: &Cell) -> Result<Cell> {
        let (_, current) = self.grid.resolve(cell)?;
        if !current.traversable {
            return Err(Error::NotTraversable {
                x: cell.x,
                y: cell.y,
            });
        }
        Ok(current)
    }

    /// Random routes scattered around the straight line from start to goal.
    fn initialize(
        &mut self,
        evaluator: &RouteEvaluator<'_>,
        start: &Cell,
        goal: &Cell,
    ) -> Vec<Route> {
        let grid = self.grid;
        let jitter = self.config.init_jitter;
        let mut population = Vec::with_capacity(self.config.population_size);

        for _ in 0..self.config.population_size {
            let count = self
                .rng
                .gen_range(self.config.min_initial_waypoints..=self.config.max_initial_waypoints);
            let mut waypoints = Vec::with_capacity(count + 2);
            waypoints.push(*start);

            for i in 0..count {
                let progress = (i + 1) as f64 / (count + 1) as f64;
                let x = start.x + (f64::from(goal.x - start.x) * progress) as i32;
                let y = start.y + (f64::from(goal.y - start.y) * progress) as i32;
                let rng = &mut self.rng;
                let placed = (0..INIT_PLACEMENT_ATTEMPTS).find_map(|_| {
                    let dx = rng.gen_range(-jitter..=jitter);
                    let dy = rng.gen_range(-jitter..=jitter);
                    water_cell_clamped(grid, x + dx, y + dy)
                });
                // No water found nearby: the waypoint is omitted.
                if let Some(cell) = placed {
                    waypoints.push(cell);
                }
            }

            waypoints.push(*goal);
            population.push(evaluator.evaluate(waypoints));
        }

        population
    }

    /// Fill a parent pool the size of the population, each parent the
    /// fittest of a random subset of distinct members.
    fn tournament_selection(&mut self, population: &[Route]) -> Vec<Route> {
        let size = self.config.tournament_size.min(population.len());
        let mut parents = Vec::with_capacity(self.config.population_size);

        for _ in 0..self.config.population_size {
            let mut winner: Option<&Route> = None;
            for idx in index::sample(&mut self.rng, population.len(), size).iter() {
                let candidate = &population[idx];
                if winner.map_or(true, |w| candidate.fitness() > w.fitness()) {
                    winner = Some(candidate);
                }
            }
            if let Some(winner) = winner {
                parents.push(winner.clone());
            }
        }

        parents
    }

    /// Single-point crossover on consecutive parent pairs. An unpaired last
    /// parent passes through unchanged.
    fn crossover(
        &mut self,
        evaluator: &RouteEvaluator<'_>,
        parents: Vec<Route>,
        tracker: &mut BestTracker,
    ) -> Vec<Route> {
        let mut offspring = Vec::with_capacity(parents.len());
        let mut parents = parents.into_iter();

        while let Some(first) = parents.next() {
            let Some(second) = parents.next() else {
                offspring.push(first);
                break;
            };

            let shortest = first.len().min(second.len());
            if self.rng.gen::<f64>() >= self.config.crossover_rate || shortest <= 2 {
                offspring.push(first);
                offspring.push(second);
                continue;
            }

            let point = self.rng.gen_range(1..shortest);
            let a = first.into_waypoints();
            let b = second.into_waypoints();
            let child_a: Vec<Cell> = a[..point].iter().chain(&b[point..]).copied().collect();
            let child_b: Vec<Cell> = b[..point].iter().chain(&a[point..]).copied().collect();

            for waypoints in [child_a, child_b] {
                let child = evaluator.evaluate(waypoints);
                tracker.record(&child);
                offspring.push(child);
            }
        }

        offspring
    }

    fn mutate(
        &mut self,
        evaluator: &RouteEvaluator<'_>,
        offspring: Vec<Route>,
        rate: f64,
        tracker: &mut BestTracker,
    ) -> Vec<Route> {
        let mut mutated = Vec::with_capacity(offspring.len());

        for route in offspring {
            if route.len() <= 2 || self.rng.gen::<f64>() >= rate {
                mutated.push(route);
                continue;
            }

            let mutation = match self.rng.gen_range(0..3) {
                0 => Mutation::Modify,
                1 => Mutation::Insert,
                _ => Mutation::Remove,
            };
            let mut waypoints = route.into_waypoints();
            self.apply_mutation(mutation, &mut waypoints);

            let child = evaluator.evaluate(waypoints);
            tracker.record(&child);
            mutated.push(child);
        }

        mutated
    }

    /// Apply one mutation in place. Endpoints are never touched.
    fn apply_mutation(&mut self, mutation: Mutation, waypoints: &mut Vec<Cell>) {
        let len = waypoints.len();
        match mutation {
            Mutation::Modify => {
                let jitter = self.config.modify_jitter;
                let idx = self.rng.gen_range(1..len - 1);
                let current = waypoints[idx];
                let x = current.x + self.rng.gen_range(-jitter..=jitter);
                let y = current.y + self.rng.gen_range(-jitter..=jitter);
                if let Some(cell) = water_cell_clamped(self.grid, x, y) {
                    waypoints[idx] = cell;
                }
            }
            Mutation::Insert if len < self.config.max_waypoints => {
                let jitter = self.config.insert_jitter;
                let idx = self.rng.gen_range(1..len);
                let (prev, next) = (waypoints[idx - 1], waypoints[idx]);
                let x = (prev.x + next.x).div_euclid(2) + self.rng.gen_range(-jitter..=jitter);
                let y = (prev.y + next.y).div_euclid(2) + self.rng.gen_range(-jitter..=jitter);
                if let Some(cell) = water_cell_clamped(self.grid, x, y) {
                    waypoints.insert(idx, cell);
                }
            }
            Mutation::Remove if len > 3 => {
                let idx = self.rng.gen_range(1..len - 1);
                waypoints.remove(idx);
            }
            Mutation::Insert | Mutation::Remove => {}
        }
    }
}

/// Clamp a coordinate to the grid and return the cell if it is water.
fn water_cell_clamped(grid: &Grid, x: i32, y: i32) -> Option<Cell> {
    let x = x.clamp(0, grid.width() as i32 - 1);
    let y = y.clamp(0, grid.height() as i32 - 1);
    grid.cell(x, y).filter(|cell| cell.traversable)
}

/// Best route across the whole run plus the peak fitness of the current
/// generation.
struct BestTracker {
    best: Option<Route>,
    generation_peak: f64,
}

impl Default for BestTracker {
    fn default() -> Self {
        Self {
            best: None,
            generation_peak: f64::NEG_INFINITY,
        }
    }
}

impl BestTracker {
    /// Note an evaluated candidate. `best` is only replaced by a strictly
    /// fitter one, so ties keep the first found.
    fn record(&mut self, candidate: &Route) {
        self.generation_peak = self.generation_peak.max(candidate.fitness());
        if self
            .best
            .as_ref()
            .map_or(true, |current| candidate.fitness() > current.fitness())
        {
            self.best = Some(candidate.clone());
        }
    }

    fn take_generation_peak(&mut self) -> f64 {
        std::mem::replace(&mut self.generation_peak, f64::NEG_INFINITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> OptimizerConfig {
        OptimizerConfig {
            population_size: 20,
            generations: 8,
            ..OptimizerConfig::default()
        }
    }

    #[test]
    fn route_runs_from_start_to_goal() {
        let grid = Grid::new(30, 30, 10.0).unwrap();
        let start = grid.cell(2, 2).unwrap();
        let goal = grid.cell(27, 25).unwrap();
        let mut optimizer = GeneticOptimizer::new(&grid, None, small_config()).unwrap();
        let route = optimizer
            .optimize(&start, &goal, &ObjectiveWeights::default())
            .unwrap();
        assert_eq!(route.waypoints().first(), Some(&start));
        assert_eq!(route.waypoints().last(), Some(&goal));
        assert!(route.fitness() > 0.0);

        let history = optimizer.history();
        assert_eq!(history.len(), 9);
        for stats in history {
            assert!(route.fitness() >= stats.population_best);
            assert!(route.fitness() >= stats.evaluated_best);
        }
        assert_eq!(history.last().map(|s| s.best_so_far), Some(route.fitness()));
    }

    #[test]
    fn same_seed_gives_same_route() {
        let grid = Grid::new(30, 30, 10.0).unwrap();
        let start = grid.cell(0, 0).unwrap();
        let goal = grid.cell(29, 29).unwrap();
        let weights = ObjectiveWeights::default();

        let first = GeneticOptimizer::new(&grid, None, small_config())
            .unwrap()
            .optimize(&start, &goal, &weights)
            .unwrap();
        let second = GeneticOptimizer::new(&grid, None, small_config())
            .unwrap()
            .optimize(&start, &goal, &weights)
            .unwrap();

        assert_eq!(first.waypoints(), second.waypoints());
        assert_eq!(first.fitness(), second.fitness());
    }

    #[test]
    fn invalid_weights_are_rejected() {
        let grid = Grid::new(10, 10, 10.0).unwrap();
        let start = grid.cell(0, 0).unwrap();
        let goal = grid.cell(9, 9).unwrap();
        let mut optimizer = GeneticOptimizer::new(&grid, None, small_config()).unwrap();
        let weights = ObjectiveWeights::new(0.9, 0.9, 0.0, 0.0);
        assert!(matches!(
            optimizer.optimize(&start, &goal, &weights),
            Err(Error::InvalidWeights { .. })
        ));
    }

    #[test]
    fn land_endpoint_is_rejected() {
        let mut grid = Grid::new(10, 10, 10.0).unwrap();
        grid.set_land(9, 9, true);
        let start = grid.cell(0, 0).unwrap();
        let goal = grid.cell(9, 9).unwrap();
        let mut optimizer = GeneticOptimizer::new(&grid, None, small_config()).unwrap();
        assert!(matches!(
            optimizer.optimize(&start, &goal, &ObjectiveWeights::default()),
            Err(Error::NotTraversable { x: 9, y: 9 })
        ));
    }

    #[test]
    fn mutation_keeps_endpoints() {
        let grid = Grid::new(20, 20, 10.0).unwrap();
        let mut optimizer = GeneticOptimizer::new(&grid, None, small_config()).unwrap();
        let original: Vec<Cell> = (0..6).map(|i| grid.cell(i * 3, i * 3).unwrap()).collect();

        for mutation in [Mutation::Modify, Mutation::Insert, Mutation::Remove] {
            for _ in 0..20 {
                let mut waypoints = original.clone();
                optimizer.apply_mutation(mutation, &mut waypoints);
                assert_eq!(waypoints.first(), original.first());
                assert_eq!(waypoints.last(), original.last());
            }
        }
    }
}
