//! Danger zones layered over the grid before routing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::{Cell, Grid};

/// Base-cost increase per unit of risk when a layer is applied to a grid.
pub const RISK_COST_FACTOR: f64 = 5.0;

/// Default danger level of a pirate zone.
pub const DEFAULT_PIRATE_DANGER: f64 = 0.8;

/// Danger level of a shallow-water zone.
pub const SHALLOW_WATER_DANGER: f64 = 0.6;

/// Highest per-cell risk a route may touch and still count as safe.
pub const DEFAULT_MAX_ROUTE_RISK: f64 = 0.5;

/// Zone exposure of one path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SafetyAssessment {
    /// `1 - mean risk`, see [`SafetyLayer::route_safety_score`].
    pub score: f64,
    pub peak_risk: f64,
    /// No cell exceeds [`DEFAULT_MAX_ROUTE_RISK`].
    pub safe: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    Pirate,
    /// Restricted area; its cells become non-traversable.
    Military,
    Shallow,
}

impl fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            ZoneKind::Pirate => "pirate",
            ZoneKind::Military => "military",
            ZoneKind::Shallow => "shallow",
        };
        f.write_str(value)
    }
}

/// Circular area whose risk decays linearly from `danger_level` at the centre
/// to zero at `radius`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DangerZone {
    pub center_x: i32,
    pub center_y: i32,
    pub radius: i32,
    /// Peak risk in `[0, 1]`.
    pub danger_level: f64,
    pub kind: ZoneKind,
}

impl DangerZone {
    fn distance_to(&self, cell: &Cell) -> f64 {
        f64::from(cell.x - self.center_x).hypot(f64::from(cell.y - self.center_y))
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.distance_to(cell) <= f64::from(self.radius)
    }

    /// Risk contributed at `cell`; zero outside the zone.
    pub fn risk(&self, cell: &Cell) -> f64 {
        let distance = self.distance_to(cell);
        if self.radius <= 0 || distance > f64::from(self.radius) {
            return 0.0;
        }
        self.danger_level * (1.0 - distance / f64::from(self.radius))
    }
}

/// Collection of danger zones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SafetyLayer {
    zones: Vec<DangerZone>,
}

impl SafetyLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zones(&self) -> &[DangerZone] {
        &self.zones
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn add_pirate_zone(
        &mut self,
        center_x: i32,
        center_y: i32,
        radius: i32,
        danger_level: f64,
    ) {
        self.push(center_x, center_y, radius, danger_level, ZoneKind::Pirate);
    }

    pub fn add_military_zone(&mut self, center_x: i32, center_y: i32, radius: i32) {
        self.push(center_x, center_y, radius, 1.0, ZoneKind::Military);
    }

    pub fn add_shallow_water_zone(&mut self, center_x: i32, center_y: i32, radius: i32) {
        self.push(center_x, center_y, radius, SHALLOW_WATER_DANGER, ZoneKind::Shallow);
    }

    fn push(
        &mut self,
        center_x: i32,
        center_y: i32,
        radius: i32,
        danger_level: f64,
        kind: ZoneKind,
    ) {
        self.zones.push(DangerZone {
            center_x,
            center_y,
            radius,
            danger_level: danger_level.clamp(0.0, 1.0),
            kind,
        });
    }

    /// Summed risk of every zone at `cell`, capped at 1.0.
    pub fn total_risk(&self, cell: &Cell) -> f64 {
        self.zones
            .iter()
            .map(|zone| zone.risk(cell))
            .sum::<f64>()
            .min(1.0)
    }

    /// Block military zones and raise the base cost of risky water.
    ///
    /// Military cells are blocked first, so their own risk never inflates the
    /// cost of a cell that is about to become land.
    pub fn apply(&self, grid: &mut Grid) {
        for zone in self.zones.iter().filter(|z| z.kind == ZoneKind::Military) {
            grid.add_island(zone.center_x, zone.center_y, zone.radius);
        }

        let mut inflated = 0usize;
        for y in 0..grid.height() as i32 {
            for x in 0..grid.width() as i32 {
                let Some(cell) = grid.cell(x, y) else {
                    continue;
                };
                if !cell.traversable {
                    continue;
                }
                let risk = self.total_risk(&cell);
                if risk > 0.0 {
                    grid.set_base_cost(x, y, cell.base_cost + risk * RISK_COST_FACTOR);
                    inflated += 1;
                }
            }
        }

        tracing::debug!(zones = self.zones.len(), inflated, "applied safety layer");
    }

    /// `true` when no cell on `path` exceeds `max_risk`.
    pub fn is_safe_route(&self, path: &[Cell], max_risk: f64) -> bool {
        path.iter().all(|cell| self.total_risk(cell) <= max_risk)
    }

    /// `1 - mean risk` along `path`; zero for an empty path.
    pub fn route_safety_score(&self, path: &[Cell]) -> f64 {
        if path.is_empty() {
            return 0.0;
        }
        let total: f64 = path.iter().map(|cell| self.total_risk(cell)).sum();
        1.0 - total / path.len() as f64
    }

    /// Score, peak risk and safe verdict for `path` in one pass.
    pub fn assess(&self, path: &[Cell]) -> SafetyAssessment {
        let peak_risk = path
            .iter()
            .map(|cell| self.total_risk(cell))
            .fold(0.0, f64::max);
        SafetyAssessment {
            score: self.route_safety_score(path),
            peak_risk,
            safe: self.is_safe_route(path, DEFAULT_MAX_ROUTE_RISK),
        }
    }

    /// Risk at every cell in row-major order.
    pub fn risk_map(&self, grid: &Grid) -> Vec<f64> {
        grid.cells().map(|cell| self.total_risk(cell)).collect()
    }

    /// Two pirate areas, one military exclusion and two shallow banks, laid out
    /// on a 100×100 reference frame and scaled to `grid`.
    pub fn realistic_scenario(grid: &Grid) -> Self {
        let sx = |v: i32| (f64::from(v) * grid.width() as f64 / 100.0).round() as i32;
        let sy = |v: i32| (f64::from(v) * grid.height() as f64 / 100.0).round() as i32;
        let scale = grid.width().min(grid.height()) as f64 / 100.0;
        let sr = |r: i32| ((f64::from(r) * scale).round() as i32).max(1);

        let mut layer = Self::new();
        layer.add_pirate_zone(sx(20), sy(30), sr(8), 0.9);
        layer.add_pirate_zone(sx(75), sy(60), sr(6), 0.7);
        layer.add_military_zone(sx(50), sy(15), sr(5));
        layer.add_shallow_water_zone(sx(35), sy(70), sr(10));
        layer.add_shallow_water_zone(sx(80), sy(25), sr(7));
        layer
    }
}
