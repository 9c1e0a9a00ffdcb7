//! Uniform metric assembly for every search strategy.
//!
//! Distance, cost, fuel and time are always recomputed from the returned
//! path here, never taken from a search's internal scores, so results from
//! different algorithms are directly comparable.

use std::io::Write;
use std::time::Duration;

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::error::Result;
use crate::grid::{Cell, Grid};
use crate::path::SearchOutcome;
use crate::routing::RouteAlgorithm;
use crate::vessel::VesselConfig;
use crate::weather::CostField;

/// Outcome of one point-to-point search invocation.
#[derive(Debug, Clone, Serialize)]
pub struct RouteResult {
    /// Start to goal inclusive; empty when no route exists.
    #[serde(serialize_with = "serialize_coords")]
    pub path: Vec<Cell>,
    pub distance_km: f64,
    /// Unit-less movement cost along the path.
    pub cost: f64,
    pub fuel_tons: f64,
    pub time_hours: f64,
    pub nodes_explored: usize,
    #[serde(rename = "computation_time_ms", serialize_with = "serialize_millis")]
    pub computation_time: Duration,
    pub algorithm: RouteAlgorithm,
}

impl RouteResult {
    /// Compute metrics for a finished search.
    pub fn assemble(
        grid: &Grid,
        field: Option<&dyn CostField>,
        vessel: &VesselConfig,
        outcome: SearchOutcome,
        algorithm: RouteAlgorithm,
    ) -> Self {
        let SearchOutcome {
            path,
            nodes_explored,
            elapsed,
        } = outcome;

        let distance_km = grid.path_length(&path);
        let cost = grid.path_cost(&path);
        let fuel_tons = path_fuel(grid, field, vessel, &path);
        let time_hours = vessel.transit_hours(distance_km);

        Self {
            path,
            distance_km,
            cost,
            fuel_tons,
            time_hours,
            nodes_explored,
            computation_time: elapsed,
            algorithm,
        }
    }

    /// `true` when the search found no route.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Number of moves in the route.
    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Fuel burned along `path`.
///
/// Each leg is charged at the cost field's penalty for entering its
/// destination cell; without a field the vessel's calm-water rate applies.
pub fn path_fuel(
    grid: &Grid,
    field: Option<&dyn CostField>,
    vessel: &VesselConfig,
    path: &[Cell],
) -> f64 {
    if path.len() < 2 {
        return 0.0;
    }
    match field {
        Some(field) => path
            .windows(2)
            .map(|pair| {
                let distance = grid.distance(&pair[0], &pair[1]);
                let penalty = field.weather_cost(&pair[1], pair[0].heading_to(&pair[1]));
                field.fuel_consumption(distance, penalty, vessel)
            })
            .sum(),
        None => vessel.default_fuel(grid.path_length(path)),
    }
}

/// Write `value` as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(mut writer: W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// Serialize cells as `[x, y]` pairs.
pub(crate) fn serialize_coords<S: Serializer>(
    cells: &[Cell],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(cells.len()))?;
    for cell in cells {
        seq.serialize_element(&[cell.x, cell.y])?;
    }
    seq.end()
}

fn serialize_millis<S: Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
}
