//! Bidirectional heuristic-guided search.
//!
//! Two A*-style expansions run in lockstep, one from each endpoint, each with
//! its own frontier, predecessor map, running scores and closed set. A round
//! is one forward step followed by one backward step.
//!
//! The search stops after the first round in which the frontiers meet, keeping
//! the cheapest meeting node seen in that round. This is an approximation:
//! an exact bidirectional search keeps going until the frontiers' minimum
//! priorities exceed the best meeting cost. The single-round stop roughly
//! halves node expansion at the price of an occasional slightly longer path.

use std::time::Instant;

use crate::error::Result;
use crate::grid::{Cell, Grid};
use crate::path::{reconstruct_path, Frontier, SearchOptions, SearchOutcome, NO_PARENT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// State for one half of the search.
struct Side {
    direction: Direction,
    target: Cell,
    frontier: Frontier,
    score: Vec<f64>,
    parents: Vec<usize>,
    closed: Vec<bool>,
}

impl Side {
    fn new(grid: &Grid, direction: Direction, origin: usize, target: Cell) -> Self {
        let mut side = Self {
            direction,
            target,
            frontier: Frontier::default(),
            score: vec![f64::INFINITY; grid.len()],
            parents: vec![NO_PARENT; grid.len()],
            closed: vec![false; grid.len()],
        };
        side.score[origin] = 0.0;
        let estimate = grid.distance(&grid.at(origin), &target);
        side.frontier.push(origin, 0.0, estimate);
        side
    }

    /// Pop the next node not yet closed on this side.
    fn pop_open(&mut self) -> Option<usize> {
        while let Some(entry) = self.frontier.pop() {
            if !self.closed[entry.node] {
                return Some(entry.node);
            }
        }
        None
    }

    /// Close `node` and relax its neighbours.
    fn expand(&mut self, grid: &Grid, node: usize, options: &SearchOptions) {
        self.closed[node] = true;
        let current = grid.at(node);

        for neighbor in grid.neighbors(&current, options.allow_diagonal) {
            let Some(next) = grid.index_of(neighbor.x, neighbor.y) else {
                continue;
            };
            if self.closed[next] {
                continue;
            }

            // Backward scores accumulate the cost of travelling towards the
            // goal, so the edge is charged in the direction of travel.
            let step = match self.direction {
                Direction::Forward => grid.movement_cost(&current, &neighbor),
                Direction::Backward => grid.movement_cost(&neighbor, &current),
            };
            let tentative = self.score[node] + step;
            if tentative < self.score[next] {
                self.score[next] = tentative;
                self.parents[next] = node;
                let estimate = grid.distance(&neighbor, &self.target);
                self.frontier.push(next, tentative, estimate);
            }
        }
    }
}

/// Best meeting node recorded so far.
#[derive(Debug, Clone, Copy)]
struct Meeting {
    node: usize,
    total: f64,
}

/// Advance one side by a single node.
///
/// Returns `true` when a node was expanded (as opposed to meeting the other
/// side or finding the frontier exhausted).
fn advance(
    grid: &Grid,
    side: &mut Side,
    other: &Side,
    options: &SearchOptions,
    meeting: &mut Option<Meeting>,
) -> bool {
    let Some(node) = side.pop_open() else {
        return false;
    };

    if other.closed[node] {
        let total = side.score[node] + other.score[node];
        if meeting.map_or(true, |best| total < best.total) {
            *meeting = Some(Meeting { node, total });
        }
        return false;
    }

    side.expand(grid, node, options);
    true
}

/// Run bidirectional search between `start` and `goal`.
///
/// Returns `Ok(None)` when one frontier is exhausted before the two meet.
pub fn find_route_bidirectional(
    grid: &Grid,
    start: &Cell,
    goal: &Cell,
    options: &SearchOptions,
) -> Result<Option<SearchOutcome>> {
    let started = Instant::now();
    let (start_idx, start_cell) = grid.resolve(start)?;
    let (goal_idx, goal_cell) = grid.resolve(goal)?;

    let mut forward = Side::new(grid, Direction::Forward, start_idx, goal_cell);
    let mut backward = Side::new(grid, Direction::Backward, goal_idx, start_cell);
    let mut meeting: Option<Meeting> = None;
    let mut nodes_explored = 0usize;

    while !forward.frontier.is_empty() && !backward.frontier.is_empty() {
        if advance(grid, &mut forward, &backward, options, &mut meeting) {
            nodes_explored += 1;
        }
        if advance(grid, &mut backward, &forward, options, &mut meeting) {
            nodes_explored += 1;
        }
        if meeting.is_some() {
            break;
        }
    }

    let Some(meeting) = meeting else {
        tracing::debug!(nodes_explored, "bidirectional frontiers never met");
        return Ok(None);
    };

    let mut path = reconstruct_path(grid, &forward.parents, start_idx, meeting.node);
    let mut current = backward.parents[meeting.node];
    while current != NO_PARENT {
        path.push(grid.at(current));
        current = backward.parents[current];
    }

    Ok(Some(SearchOutcome {
        path,
        nodes_explored,
        elapsed: started.elapsed(),
    }))
}
