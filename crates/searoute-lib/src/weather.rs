//! Direction-dependent cost field.
//!
//! Searches consume weather through the [`CostField`] trait: a multiplicative
//! penalty per (cell, heading) and a fuel conversion. [`WeatherField`] is the
//! bundled implementation backed by per-cell wind, wave and current arrays.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::grid::{Cell, Grid};
use crate::vessel::VesselConfig;

/// Lowest penalty a cost field may report, keeping every edge strictly positive.
pub const WEATHER_COST_FLOOR: f64 = 0.1;

/// Read-only cost overlay queried by the weather- and fuel-aware searches.
pub trait CostField: Send + Sync {
    /// Multiplicative penalty for entering `cell` while heading `heading`
    /// radians (0 = +x axis). Implementations must return at least
    /// [`WEATHER_COST_FLOOR`].
    fn weather_cost(&self, cell: &Cell, heading: f64) -> f64;

    /// Fuel in tons `vessel` burns over `distance_km` under a given penalty.
    ///
    /// A penalty of 1.0 matches [`VesselConfig::default_fuel`].
    fn fuel_consumption(&self, distance_km: f64, weather_cost: f64, vessel: &VesselConfig) -> f64 {
        vessel.default_fuel(distance_km) * weather_cost
    }

    /// Lower bound of [`CostField::weather_cost`] over every cell and heading.
    ///
    /// The fuel-aware search uses it to keep its heuristic admissible.
    fn min_weather_cost(&self) -> f64 {
        WEATHER_COST_FLOOR
    }
}

/// Preset weather regimes for [`WeatherField::generate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeatherPattern {
    Calm,
    #[default]
    Moderate,
    Stormy,
}

impl WeatherPattern {
    /// `(base, variance)` pairs for wind speed, wave height and current speed.
    fn parameters(self) -> [(f64, f64); 3] {
        match self {
            WeatherPattern::Calm => [(5.0, 3.0), (0.5, 0.3), (0.5, 0.2)],
            WeatherPattern::Moderate => [(15.0, 8.0), (2.0, 1.0), (1.0, 0.5)],
            WeatherPattern::Stormy => [(30.0, 15.0), (5.0, 2.5), (2.0, 1.0)],
        }
    }
}

impl fmt::Display for WeatherPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            WeatherPattern::Calm => "calm",
            WeatherPattern::Moderate => "moderate",
            WeatherPattern::Stormy => "stormy",
        };
        f.write_str(value)
    }
}

impl FromStr for WeatherPattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "calm" => Ok(WeatherPattern::Calm),
            "moderate" => Ok(WeatherPattern::Moderate),
            "stormy" => Ok(WeatherPattern::Stormy),
            other => Err(format!(
                "unknown weather pattern '{other}', expected calm, moderate or stormy"
            )),
        }
    }
}

/// Conditions at a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    /// Wind speed in knots.
    pub wind_speed: f64,
    /// Direction the wind blows towards, radians.
    pub wind_direction: f64,
    /// Significant wave height in metres.
    pub wave_height: f64,
    /// Surface current speed in knots.
    pub current_speed: f64,
    /// Direction the current flows towards, radians.
    pub current_direction: f64,
}

/// Per-cell wind, wave and current intensities for one grid.
#[derive(Debug, Clone)]
pub struct WeatherField {
    width: usize,
    height: usize,
    wind_speed: Vec<f64>,
    wind_direction: Vec<f64>,
    wave_height: Vec<f64>,
    current_speed: Vec<f64>,
    current_direction: Vec<f64>,
}

impl WeatherField {
    /// Flat calm over the whole grid: every penalty is exactly 1.0.
    pub fn new(grid: &Grid) -> Self {
        let size = grid.width() * grid.height();
        Self {
            width: grid.width(),
            height: grid.height(),
            wind_speed: vec![0.0; size],
            wind_direction: vec![0.0; size],
            wave_height: vec![0.0; size],
            current_speed: vec![0.0; size],
            current_direction: vec![0.0; size],
        }
    }

    /// Build a field covering `grid` with the given pattern.
    pub fn generate(grid: &Grid, pattern: WeatherPattern) -> Self {
        let mut field = Self::new(grid);
        field.generate_pattern(pattern);
        field
    }

    /// Overwrite every cell with a smooth, deterministic pattern.
    pub fn generate_pattern(&mut self, pattern: WeatherPattern) {
        let [(wind_base, wind_var), (wave_base, wave_var), (current_base, current_var)] =
            pattern.parameters();

        for y in 0..self.height {
            for x in 0..self.width {
                let (fx, fy) = (x as f64, y as f64);
                let noise_x = (fx / 10.0).sin() * (fy / 15.0).cos();
                let noise_y = (fx / 12.0).cos() * (fy / 8.0).sin();

                let idx = y * self.width + x;
                self.wind_speed[idx] = (wind_base + wind_var * noise_x).max(0.0);
                self.wind_direction[idx] = (noise_y + 1.0) * PI;
                self.wave_height[idx] = (wave_base + wave_var * noise_x).max(0.0);
                self.current_speed[idx] = (current_base + current_var * noise_y).max(0.0);
                self.current_direction[idx] = (noise_x + 1.0) * PI;
            }
        }

        tracing::debug!(%pattern, "generated weather pattern");
    }

    /// Add a localized storm whose intensity decays linearly from the centre.
    pub fn add_storm(&mut self, center_x: i32, center_y: i32, radius: i32, intensity: f64) {
        if radius <= 0 {
            return;
        }
        for x in (center_x - radius)..=(center_x + radius) {
            for y in (center_y - radius)..=(center_y + radius) {
                let Some(idx) = self.index_of(x, y) else {
                    continue;
                };
                let distance = f64::from(x - center_x).hypot(f64::from(y - center_y));
                if distance <= f64::from(radius) {
                    let factor = intensity * (1.0 - distance / f64::from(radius));
                    self.wind_speed[idx] += 20.0 * factor;
                    self.wave_height[idx] += 3.0 * factor;
                }
            }
        }
    }

    /// Store each water cell's eastbound penalty as its additive weather term.
    pub fn apply_to_grid(&self, grid: &mut Grid) {
        for y in 0..grid.height() as i32 {
            for x in 0..grid.width() as i32 {
                let Some(cell) = grid.cell(x, y) else {
                    continue;
                };
                if cell.traversable {
                    let cost = self.weather_cost(&cell, 0.0);
                    grid.set_weather_cost(x, y, cost - 1.0);
                }
            }
        }
    }

    /// Conditions at a coordinate, if it lies on the field.
    pub fn weather_at(&self, x: i32, y: i32) -> Option<WeatherSample> {
        let idx = self.index_of(x, y)?;
        Some(WeatherSample {
            wind_speed: self.wind_speed[idx],
            wind_direction: self.wind_direction[idx],
            wave_height: self.wave_height[idx],
            current_speed: self.current_speed[idx],
            current_direction: self.current_direction[idx],
        })
    }

    /// Mean wind speed across the field, in knots.
    pub fn mean_wind_speed(&self) -> f64 {
        mean(&self.wind_speed)
    }

    /// Mean wave height across the field, in metres.
    pub fn mean_wave_height(&self) -> f64 {
        mean(&self.wave_height)
    }

    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }
}

impl CostField for WeatherField {
    fn weather_cost(&self, cell: &Cell, heading: f64) -> f64 {
        let Some(idx) = self.index_of(cell.x, cell.y) else {
            return 1.0;
        };

        let wave_cost = 1.0 + self.wave_height[idx] / 10.0;

        // cos of the relative angle: +1 tailwind, -1 headwind.
        let wind_factor = relative_angle(heading, self.wind_direction[idx]).cos();
        let wind_cost = 1.0 - wind_factor * self.wind_speed[idx] / 100.0;

        let current_factor = relative_angle(heading, self.current_direction[idx]).cos();
        let current_cost = 1.0 - current_factor * self.current_speed[idx] / 50.0;

        (wave_cost * wind_cost * current_cost).max(WEATHER_COST_FLOOR)
    }

    fn min_weather_cost(&self) -> f64 {
        let mut lowest = f64::INFINITY;
        for idx in 0..self.wind_speed.len() {
            let wave = 1.0 + self.wave_height[idx] / 10.0;
            let wind = 1.0 - self.wind_speed[idx] / 100.0;
            let current = 1.0 - self.current_speed[idx] / 50.0;
            let bound = if wind > 0.0 && current > 0.0 {
                wave * wind * current
            } else {
                WEATHER_COST_FLOOR
            };
            lowest = lowest.min(bound);
        }
        lowest.max(WEATHER_COST_FLOOR)
    }
}

impl fmt::Display for WeatherField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WeatherField(avg_wind={:.1}kts, avg_wave={:.1}m)",
            self.mean_wind_speed(),
            self.mean_wave_height()
        )
    }
}

/// Absolute angle between `heading` and `direction`, wrapped to `[0, π]`.
fn relative_angle(heading: f64, direction: f64) -> f64 {
    ((heading - direction + PI).rem_euclid(2.0 * PI) - PI).abs()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::new(50, 50, 10.0).expect("valid grid")
    }

    #[test]
    fn calm_field_is_neutral() {
        let grid = grid();
        let field = WeatherField::new(&grid);
        let cell = grid.cell(10, 10).unwrap();
        assert!((field.weather_cost(&cell, 1.3) - 1.0).abs() < 1e-12);
        assert!((field.min_weather_cost() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pattern_values_are_non_negative() {
        let grid = grid();
        for pattern in [
            WeatherPattern::Calm,
            WeatherPattern::Moderate,
            WeatherPattern::Stormy,
        ] {
            let field = WeatherField::generate(&grid, pattern);
            assert!(field.wind_speed.iter().all(|v| *v >= 0.0));
            assert!(field.wave_height.iter().all(|v| *v >= 0.0));
            assert!(field.current_speed.iter().all(|v| *v >= 0.0));
        }
    }

    #[test]
    fn penalty_is_floored() {
        let grid = grid();
        let field = WeatherField::generate(&grid, WeatherPattern::Stormy);
        for cell in grid.cells() {
            for step in 0..8 {
                let heading = f64::from(step) * PI / 4.0;
                let cost = field.weather_cost(cell, heading);
                assert!(cost >= WEATHER_COST_FLOOR);
                assert!(cost >= field.min_weather_cost() - 1e-12);
            }
        }
    }

    #[test]
    fn storm_raises_wind_at_centre() {
        let grid = grid();
        let mut field = WeatherField::generate(&grid, WeatherPattern::Calm);
        let before = field.weather_at(25, 25).unwrap().wind_speed;
        field.add_storm(25, 25, 10, 2.0);
        let after = field.weather_at(25, 25).unwrap();
        assert!((after.wind_speed - before - 40.0).abs() < 1e-9);
        assert!(field.weather_at(50, 50).is_none());
    }

    #[test]
    fn headwind_costs_more_than_tailwind() {
        let grid = grid();
        let mut field = WeatherField::new(&grid);
        let idx = field.index_of(5, 5).unwrap();
        field.wind_speed[idx] = 30.0;
        field.wind_direction[idx] = 0.0;
        let cell = grid.cell(5, 5).unwrap();
        let tailwind = field.weather_cost(&cell, 0.0);
        let headwind = field.weather_cost(&cell, PI);
        assert!((tailwind - 0.7).abs() < 1e-9);
        assert!((headwind - 1.3).abs() < 1e-9);
    }

    #[test]
    fn fuel_scales_with_penalty() {
        let grid = grid();
        let field = WeatherField::new(&grid);
        let vessel = VesselConfig::default();
        let base = field.fuel_consumption(100.0, 1.0, &vessel);
        assert!((base - vessel.default_fuel(100.0)).abs() < 1e-12);
        assert!((field.fuel_consumption(100.0, 2.0, &vessel) - 2.0 * base).abs() < 1e-12);
    }

    #[test]
    fn apply_to_grid_skips_land() {
        let mut grid = grid();
        grid.set_land(3, 3, true);
        let field = WeatherField::generate(&grid, WeatherPattern::Stormy);
        field.apply_to_grid(&mut grid);
        assert_eq!(grid.cell(3, 3).unwrap().weather_cost, 0.0);
        let water = grid.cell(4, 4).unwrap();
        let expected = field.weather_cost(&water, 0.0) - 1.0;
        assert!((water.weather_cost - expected).abs() < 1e-12);
    }

    #[test]
    fn parses_pattern_names() {
        assert_eq!("Stormy".parse::<WeatherPattern>(), Ok(WeatherPattern::Stormy));
        assert!("foggy".parse::<WeatherPattern>().is_err());
    }
}
