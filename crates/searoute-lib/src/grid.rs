//! Navigable ocean surface.
//!
//! The [`Grid`] owns a dense, row-major arena of [`Cell`]s sized
//! `width × height`. Searches address cells by their arena index so that
//! predecessor and score maps can be flat vectors instead of hash maps.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default physical edge length of a cell, in kilometres.
pub const DEFAULT_CELL_SIZE_KM: f64 = 10.0;

/// Neighbour offsets: the four orthogonal moves first, then the diagonals.
static ALL_MOVES: [(i32, i32); 8] = [
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// A single addressable unit of the navigation grid.
///
/// Equality and hashing only consider the coordinate pair; the cost fields
/// are a snapshot of the grid cell at the time the value was copied.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    /// `false` for land and other obstacles.
    pub traversable: bool,
    /// Base traversal cost, never negative.
    pub base_cost: f64,
    /// Additive weather term applied on top of `base_cost`.
    pub weather_cost: f64,
}

impl Cell {
    /// Open-water cell with the default base cost.
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            traversable: true,
            base_cost: 1.0,
            weather_cost: 0.0,
        }
    }

    /// Cost of entering this cell; infinite when it is not traversable.
    pub fn total_cost(&self) -> f64 {
        if !self.traversable {
            return f64::INFINITY;
        }
        self.base_cost + self.weather_cost
    }

    /// Coordinate pair of the cell.
    pub fn coords(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Heading in radians from `self` towards `other` (0 = +x axis).
    pub fn heading_to(&self, other: &Cell) -> f64 {
        f64::from(other.y - self.y).atan2(f64::from(other.x - self.x))
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.y.hash(state);
    }
}

/// Fixed-size rectangular navigation grid.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    cell_size_km: f64,
    cells: Vec<Cell>,
}

impl Grid {
    /// Allocate an all-water grid of `width × height` cells.
    pub fn new(width: usize, height: usize, cell_size_km: f64) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidGrid {
                message: format!("grid must have at least one cell, got {width}x{height}"),
            });
        }
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(Error::InvalidGrid {
                message: format!("grid dimensions {width}x{height} exceed coordinate range"),
            });
        }
        if !cell_size_km.is_finite() || cell_size_km <= 0.0 {
            return Err(Error::InvalidGrid {
                message: format!("cell size must be finite and positive, got {cell_size_km}"),
            });
        }

        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                cells.push(Cell::new(x, y));
            }
        }

        Ok(Self {
            width,
            height,
            cell_size_km,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Physical edge length of one cell in kilometres.
    pub fn cell_size_km(&self) -> f64 {
        self.cell_size_km
    }

    /// Number of cells in the arena.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Arena index for a coordinate pair, or `None` when out of range.
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (ux, uy) = (x as usize, y as usize);
        if ux >= self.width || uy >= self.height {
            return None;
        }
        Some(uy * self.width + ux)
    }

    /// Cell stored at an arena index.
    pub(crate) fn at(&self, index: usize) -> Cell {
        self.cells[index]
    }

    /// Bounds-checked lookup.
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.index_of(x, y).map(|idx| self.cells[idx])
    }

    /// Mutable bounds-checked lookup for terrain and weather shaping.
    pub fn cell_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        self.index_of(x, y).map(move |idx| &mut self.cells[idx])
    }

    /// Iterate over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Whether `cell` addresses a coordinate on this grid.
    pub fn contains(&self, cell: &Cell) -> bool {
        self.index_of(cell.x, cell.y).is_some()
    }

    /// Resolve a caller-supplied cell to the grid's own copy of it.
    ///
    /// This is the boundary check for search entry points: a cell that does
    /// not belong to the grid is a programmer error.
    pub fn resolve(&self, cell: &Cell) -> Result<(usize, Cell)> {
        self.index_of(cell.x, cell.y)
            .map(|idx| (idx, self.cells[idx]))
            .ok_or(Error::CellOutOfBounds {
                x: cell.x,
                y: cell.y,
            })
    }

    /// Mark a single cell as land (or restore it to water).
    pub fn set_land(&mut self, x: i32, y: i32, is_land: bool) {
        if let Some(cell) = self.cell_mut(x, y) {
            cell.traversable = !is_land;
        }
    }

    /// Mark an inclusive axis-aligned rectangle as land, clipped to the grid.
    pub fn set_land_region(&mut self, x_start: i32, y_start: i32, x_end: i32, y_end: i32) {
        let x_end = x_end.min(self.width as i32 - 1);
        let y_end = y_end.min(self.height as i32 - 1);
        for x in x_start.max(0)..=x_end {
            for y in y_start.max(0)..=y_end {
                self.set_land(x, y, true);
            }
        }
    }

    /// Stamp a circular island: every cell within `radius` of the centre.
    pub fn add_island(&mut self, center_x: i32, center_y: i32, radius: i32) {
        let radius_sq = i64::from(radius) * i64::from(radius);
        for x in (center_x - radius)..=(center_x + radius) {
            for y in (center_y - radius)..=(center_y + radius) {
                let dx = i64::from(x - center_x);
                let dy = i64::from(y - center_y);
                if dx * dx + dy * dy <= radius_sq {
                    self.set_land(x, y, true);
                }
            }
        }
    }

    /// Overwrite the additive weather term of a cell.
    pub fn set_weather_cost(&mut self, x: i32, y: i32, cost: f64) {
        if let Some(cell) = self.cell_mut(x, y) {
            cell.weather_cost = cost;
        }
    }

    /// Overwrite the base cost of a cell. Negative values are clamped to zero.
    pub fn set_base_cost(&mut self, x: i32, y: i32, cost: f64) {
        if let Some(cell) = self.cell_mut(x, y) {
            cell.base_cost = cost.max(0.0);
        }
    }

    /// Stamp a handful of islands and a coastline on both edges, scaled to the
    /// grid's dimensions.
    pub fn create_sample_ocean(&mut self) {
        let (width, height) = (self.width, self.height);
        let sx = |v: i32| (v as f64 * width as f64 / 100.0).round() as i32;
        let sy = |v: i32| (v as f64 * height as f64 / 100.0).round() as i32;
        let scale = width.min(height) as f64 / 100.0;
        let sr = |r: i32| ((r as f64 * scale).round() as i32).max(1);

        let islands = [(20, 20, 5), (60, 40, 8), (40, 70, 6), (80, 80, 7)];
        let islands: Vec<(i32, i32, i32)> = islands
            .iter()
            .map(|&(x, y, r)| (sx(x), sy(y), sr(r)))
            .collect();
        for (x, y, r) in islands {
            self.add_island(x, y, r);
        }

        let coast = sx(5);
        let last_x = width as i32 - 1;
        let last_y = height as i32 - 1;
        self.set_land_region(0, 0, coast, last_y);
        self.set_land_region(last_x - coast, 0, last_x, last_y);
    }

    /// Traversable cells adjacent to `cell`.
    ///
    /// Out-of-range and blocked neighbours are skipped silently. Orthogonal
    /// neighbours come first, followed by diagonals when `allow_diagonal`.
    pub fn neighbors(&self, cell: &Cell, allow_diagonal: bool) -> Vec<Cell> {
        let moves: &[(i32, i32)] = if allow_diagonal {
            &ALL_MOVES
        } else {
            &ALL_MOVES[..4]
        };

        moves
            .iter()
            .filter_map(|&(dx, dy)| self.cell(cell.x + dx, cell.y + dy))
            .filter(|neighbor| neighbor.traversable)
            .collect()
    }

    /// Euclidean distance between two cells in kilometres.
    pub fn distance(&self, a: &Cell, b: &Cell) -> f64 {
        let dx = f64::from(a.x - b.x);
        let dy = f64::from(a.y - b.y);
        dx.hypot(dy) * self.cell_size_km
    }

    /// Cost of stepping from `from` into `to`.
    ///
    /// The destination cell's cost is charged, so this is not symmetric.
    pub fn movement_cost(&self, from: &Cell, to: &Cell) -> f64 {
        if !to.traversable {
            return f64::INFINITY;
        }
        self.distance(from, to) * to.total_cost()
    }

    /// Total geometric length of a path in kilometres.
    pub fn path_length(&self, path: &[Cell]) -> f64 {
        if path.len() < 2 {
            return 0.0;
        }
        path.windows(2)
            .map(|pair| self.distance(&pair[0], &pair[1]))
            .sum()
    }

    /// Total movement cost of a path.
    pub fn path_cost(&self, path: &[Cell]) -> f64 {
        if path.len() < 2 {
            return 0.0;
        }
        path.windows(2)
            .map(|pair| self.movement_cost(&pair[0], &pair[1]))
            .sum()
    }

    /// `true` when every cell of `path` is on the grid and traversable now.
    pub fn is_valid_path(&self, path: &[Cell]) -> bool {
        path.iter().all(|cell| {
            self.cell(cell.x, cell.y)
                .map(|current| current.traversable)
                .unwrap_or(false)
        })
    }

    /// Cells visited by a straight Bresenham line from `from` to `to`,
    /// inclusive, clipped to the grid.
    pub fn line(&self, from: &Cell, to: &Cell) -> Vec<Cell> {
        let mut cells = Vec::new();
        let (mut x0, mut y0) = (from.x, from.y);
        let (x1, y1) = (to.x, to.y);

        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if let Some(cell) = self.cell(x0, y0) {
                cells.push(cell);
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }

        cells
    }

    /// Number of traversable cells.
    pub fn water_cells(&self) -> usize {
        self.cells.iter().filter(|cell| cell.traversable).count()
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Grid({}x{}, cell_size={}km)",
            self.width, self.height, self.cell_size_km
        )
    }
}
