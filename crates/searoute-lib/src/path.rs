use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::grid::{Cell, Grid};
use crate::vessel::VesselConfig;
use crate::weather::CostField;

/// Sentinel for "no predecessor" in the flat predecessor map.
pub(crate) const NO_PARENT: usize = usize::MAX;

/// Options shared by every point-to-point search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Expand the four diagonal neighbours as well as the orthogonal ones.
    pub allow_diagonal: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            allow_diagonal: true,
        }
    }
}

/// Raw output of a search, before metrics are assembled.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Start to goal inclusive, or empty when the goal is unreachable.
    pub path: Vec<Cell>,
    /// Nodes popped from the frontier and expanded.
    pub nodes_explored: usize,
    /// Wall-clock duration of the search.
    pub elapsed: Duration,
}

/// Uniform-cost search on `movement_cost`.
pub fn find_route_dijkstra(
    grid: &Grid,
    start: &Cell,
    goal: &Cell,
    options: &SearchOptions,
) -> Result<SearchOutcome> {
    best_first_search(
        grid,
        start,
        goal,
        options,
        |from, to| grid.movement_cost(from, to),
        |_| 0.0,
    )
}

/// Heuristic-guided search on `movement_cost` with a Euclidean estimate.
pub fn find_route_a_star(
    grid: &Grid,
    start: &Cell,
    goal: &Cell,
    options: &SearchOptions,
) -> Result<SearchOutcome> {
    let (_, goal_cell) = grid.resolve(goal)?;
    best_first_search(
        grid,
        start,
        goal,
        options,
        |from, to| grid.movement_cost(from, to),
        |cell| grid.distance(cell, &goal_cell),
    )
}

/// Heuristic-guided search where each step costs its distance scaled by the
/// cost field's penalty for the direction of travel.
pub fn find_route_weather_aware(
    grid: &Grid,
    field: &dyn CostField,
    start: &Cell,
    goal: &Cell,
    options: &SearchOptions,
) -> Result<SearchOutcome> {
    let (_, goal_cell) = grid.resolve(goal)?;
    best_first_search(
        grid,
        start,
        goal,
        options,
        |from, to| grid.distance(from, to) * field.weather_cost(to, from.heading_to(to)),
        |cell| grid.distance(cell, &goal_cell),
    )
}

/// Heuristic-guided search minimising fuel burn.
///
/// The estimate is the fuel needed to cover the remaining straight-line
/// distance under the field's most favourable penalty, so it never
/// overestimates.
pub fn find_route_fuel_optimized(
    grid: &Grid,
    field: &dyn CostField,
    vessel: &VesselConfig,
    start: &Cell,
    goal: &Cell,
    options: &SearchOptions,
) -> Result<SearchOutcome> {
    let (_, goal_cell) = grid.resolve(goal)?;
    let best_penalty = field.min_weather_cost();
    best_first_search(
        grid,
        start,
        goal,
        options,
        |from, to| {
            let distance = grid.distance(from, to);
            let penalty = field.weather_cost(to, from.heading_to(to));
            field.fuel_consumption(distance, penalty, vessel)
        },
        |cell| field.fuel_consumption(grid.distance(cell, &goal_cell), best_penalty, vessel),
    )
}

/// Shared skeleton: priority-ordered frontier, flat predecessor and running
/// score maps, goal-pop termination.
///
/// Entries with equal priority pop in insertion order, so identical inputs
/// always produce identical paths.
fn best_first_search<C, H>(
    grid: &Grid,
    start: &Cell,
    goal: &Cell,
    options: &SearchOptions,
    step_cost: C,
    heuristic: H,
) -> Result<SearchOutcome>
where
    C: Fn(&Cell, &Cell) -> f64,
    H: Fn(&Cell) -> f64,
{
    let started = Instant::now();
    let (start_idx, start_cell) = grid.resolve(start)?;
    let (goal_idx, _) = grid.resolve(goal)?;

    let mut score = vec![f64::INFINITY; grid.len()];
    let mut parents = vec![NO_PARENT; grid.len()];
    let mut frontier = Frontier::default();
    let mut nodes_explored = 0usize;
    let mut found = false;

    score[start_idx] = 0.0;
    frontier.push(start_idx, 0.0, heuristic(&start_cell));

    while let Some(entry) = frontier.pop() {
        // A cheaper route to this node was queued after this entry.
        if entry.score.0 > score[entry.node] {
            continue;
        }

        nodes_explored += 1;
        if entry.node == goal_idx {
            found = true;
            break;
        }

        let current = grid.at(entry.node);
        for neighbor in grid.neighbors(&current, options.allow_diagonal) {
            let Some(next) = grid.index_of(neighbor.x, neighbor.y) else {
                continue;
            };
            let tentative = score[entry.node] + step_cost(&current, &neighbor);
            if tentative < score[next] {
                score[next] = tentative;
                parents[next] = entry.node;
                frontier.push(next, tentative, heuristic(&neighbor));
            }
        }
    }

    let path = if found {
        reconstruct_path(grid, &parents, start_idx, goal_idx)
    } else {
        Vec::new()
    };

    Ok(SearchOutcome {
        path,
        nodes_explored,
        elapsed: started.elapsed(),
    })
}

/// Walk the predecessor chain from `goal` back to `start`.
pub(crate) fn reconstruct_path(
    grid: &Grid,
    parents: &[usize],
    start: usize,
    goal: usize,
) -> Vec<Cell> {
    let mut path = Vec::new();
    let mut current = goal;
    loop {
        path.push(grid.at(current));
        if current == start {
            break;
        }
        current = parents[current];
        if current == NO_PARENT {
            return Vec::new();
        }
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct FloatOrd(pub(crate) f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct FrontierEntry {
    pub(crate) node: usize,
    pub(crate) score: FloatOrd,
    priority: FloatOrd,
    sequence: u64,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by priority,
        // with the earliest insertion winning ties.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-priority queue with FIFO tie-breaking.
#[derive(Debug, Default)]
pub(crate) struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    next_sequence: u64,
}

impl Frontier {
    pub(crate) fn push(&mut self, node: usize, score: f64, heuristic: f64) {
        self.heap.push(FrontierEntry {
            node,
            score: FloatOrd(score),
            priority: FloatOrd(score + heuristic),
            sequence: self.next_sequence,
        });
        self.next_sequence += 1;
    }

    pub(crate) fn pop(&mut self) -> Option<FrontierEntry> {
        self.heap.pop()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
