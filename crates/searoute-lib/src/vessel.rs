//! Vessel constants and configuration.
//!
//! The vessel is modelled at a constant cruising speed; fuel is a linear
//! function of distance travelled, scaled by the weather penalty.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Kilometres in one nautical mile.
pub const KM_PER_NAUTICAL_MILE: f64 = 1.852;

/// Typical cargo ship cruising speed.
pub const DEFAULT_SPEED_KNOTS: f64 = 20.0;

/// Fuel burned per nautical mile in calm water, in tons.
pub const BASE_FUEL_TONS_PER_NM: f64 = 0.15;

/// Vessel parameters shared by result assembly and the optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VesselConfig {
    /// Constant cruising speed in knots.
    pub speed_knots: f64,
    /// Calm-water fuel burn per nautical mile, in tons. Cost fields scale it
    /// by their penalty.
    pub base_fuel_rate: f64,
}

impl Default for VesselConfig {
    fn default() -> Self {
        Self {
            speed_knots: DEFAULT_SPEED_KNOTS,
            base_fuel_rate: BASE_FUEL_TONS_PER_NM,
        }
    }
}

impl VesselConfig {
    /// Validate the vessel configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.speed_knots.is_finite() || self.speed_knots <= 0.0 {
            return Err(Error::InvalidConfig {
                message: format!(
                    "speed_knots must be finite and positive, got {}",
                    self.speed_knots
                ),
            });
        }

        if !self.base_fuel_rate.is_finite() || self.base_fuel_rate < 0.0 {
            return Err(Error::InvalidConfig {
                message: format!(
                    "base_fuel_rate must be finite and non-negative, got {}",
                    self.base_fuel_rate
                ),
            });
        }

        Ok(())
    }

    /// Fuel estimate for `distance_km` of calm-water travel.
    pub fn default_fuel(&self, distance_km: f64) -> f64 {
        distance_km / KM_PER_NAUTICAL_MILE * self.base_fuel_rate
    }

    /// Hours needed to cover `distance_km` at cruising speed.
    pub fn transit_hours(&self, distance_km: f64) -> f64 {
        distance_km / KM_PER_NAUTICAL_MILE / self.speed_knots
    }
}
