use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tolerance on the weight sum.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-3;

/// Relative importance of the four route objectives.
///
/// Each weight lies in `[0, 1]` and the four sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveWeights {
    pub distance: f64,
    pub fuel: f64,
    pub safety: f64,
    pub time: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            distance: 0.25,
            fuel: 0.35,
            safety: 0.25,
            time: 0.15,
        }
    }
}

impl ObjectiveWeights {
    pub fn new(distance: f64, fuel: f64, safety: f64, time: f64) -> Self {
        Self {
            distance,
            fuel,
            safety,
            time,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            (self.distance, "distance"),
            (self.fuel, "fuel"),
            (self.safety, "safety"),
            (self.time, "time"),
        ];

        for (value, field) in fields {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidWeights {
                    message: format!("{field} weight must be between 0 and 1, got {value}"),
                });
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(Error::InvalidWeights {
                message: format!("weights must sum to 1, got {sum:.4}"),
            });
        }

        Ok(())
    }

    pub fn sum(&self) -> f64 {
        self.distance + self.fuel + self.safety + self.time
    }
}

/// Tuning knobs of the population optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Probability that a parent pair is recombined.
    pub crossover_rate: f64,
    /// Mutation probability in the first generation.
    pub initial_mutation_rate: f64,
    /// Mutation probability the schedule decays towards.
    pub min_mutation_rate: f64,
    pub tournament_size: usize,
    /// Share of each generation carried over unchanged.
    pub elite_fraction: f64,
    pub min_initial_waypoints: usize,
    pub max_initial_waypoints: usize,
    /// Insertion mutations are skipped once a route has this many waypoints.
    pub max_waypoints: usize,
    pub init_jitter: i32,
    pub modify_jitter: i32,
    pub insert_jitter: i32,
    pub reference_distance_km: f64,
    pub reference_fuel_tons: f64,
    pub reference_time_hours: f64,
    /// Fitness multiplier for routes touching a non-traversable cell.
    pub invalid_penalty: f64,
    pub seed: u64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 50,
            crossover_rate: 0.8,
            initial_mutation_rate: 0.1,
            min_mutation_rate: 0.01,
            tournament_size: 5,
            elite_fraction: 0.1,
            min_initial_waypoints: 5,
            max_initial_waypoints: 15,
            max_waypoints: 20,
            init_jitter: 5,
            modify_jitter: 3,
            insert_jitter: 2,
            reference_distance_km: 2000.0,
            reference_fuel_tons: 200.0,
            reference_time_hours: 100.0,
            invalid_penalty: 0.1,
            seed: 42,
        }
    }
}

impl OptimizerConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(invalid(format!(
                "population_size must be at least 2, got {}",
                self.population_size
            )));
        }
        if self.tournament_size == 0 {
            return Err(invalid("tournament_size must be positive".to_string()));
        }
        if self.min_initial_waypoints > self.max_initial_waypoints {
            return Err(invalid(format!(
                "min_initial_waypoints ({}) exceeds max_initial_waypoints ({})",
                self.min_initial_waypoints, self.max_initial_waypoints
            )));
        }

        let probabilities = [
            (self.crossover_rate, "crossover_rate"),
            (self.initial_mutation_rate, "initial_mutation_rate"),
            (self.min_mutation_rate, "min_mutation_rate"),
            (self.elite_fraction, "elite_fraction"),
            (self.invalid_penalty, "invalid_penalty"),
        ];
        for (value, field) in probabilities {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!(
                    "{field} must be between 0 and 1, got {value}"
                )));
            }
        }
        if self.initial_mutation_rate + self.min_mutation_rate > 1.0 {
            return Err(invalid(
                "initial_mutation_rate + min_mutation_rate must not exceed 1".to_string(),
            ));
        }

        let references = [
            (self.reference_distance_km, "reference_distance_km"),
            (self.reference_fuel_tons, "reference_fuel_tons"),
            (self.reference_time_hours, "reference_time_hours"),
        ];
        for (value, field) in references {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(format!(
                    "{field} must be a finite positive number"
                )));
            }
        }

        let jitters = [
            (self.init_jitter, "init_jitter"),
            (self.modify_jitter, "modify_jitter"),
            (self.insert_jitter, "insert_jitter"),
        ];
        for (value, field) in jitters {
            if value < 0 {
                return Err(invalid(format!("{field} must not be negative, got {value}")));
            }
        }

        Ok(())
    }

    /// Mutation probability for a generation: linear decay from
    /// `initial_mutation_rate` plus the `min_mutation_rate` floor.
    pub fn mutation_rate(&self, generation: usize) -> f64 {
        let progress = if self.generations == 0 {
            0.0
        } else {
            generation as f64 / self.generations as f64
        };
        self.initial_mutation_rate * (1.0 - progress) + self.min_mutation_rate
    }

    /// Number of routes carried over unchanged each generation.
    pub fn elite_count(&self) -> usize {
        ((self.elite_fraction * self.population_size as f64) as usize).min(self.population_size)
    }
}

fn invalid(message: String) -> Error {
    Error::InvalidConfig { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_are_valid() {
        let weights = ObjectiveWeights::default();
        assert!(weights.validate().is_ok());
        assert!((weights.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_out_of_range_weight() {
        let weights = ObjectiveWeights::new(1.2, -0.2, 0.0, 0.0);
        assert!(matches!(
            weights.validate(),
            Err(Error::InvalidWeights { .. })
        ));
    }

    #[test]
    fn rejects_weights_not_summing_to_one() {
        let weights = ObjectiveWeights::new(0.5, 0.5, 0.5, 0.0);
        assert!(matches!(
            weights.validate(),
            Err(Error::InvalidWeights { .. })
        ));
        assert!(ObjectiveWeights::new(0.25, 0.25, 0.25, 0.2505)
            .validate()
            .is_ok());
    }

    #[test]
    fn mutation_rate_decays_to_floor() {
        let config = OptimizerConfig::default();
        assert!((config.mutation_rate(0) - 0.11).abs() < 1e-12);
        assert!((config.mutation_rate(25) - 0.06).abs() < 1e-12);
        assert!(config.mutation_rate(49) > config.min_mutation_rate);
    }

    #[test]
    fn elite_count_is_ten_percent() {
        assert_eq!(OptimizerConfig::default().elite_count(), 10);
    }

    #[test]
    fn rejects_tiny_population() {
        let config = OptimizerConfig {
            population_size: 1,
            ..OptimizerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig { .. })
        ));
        assert!(OptimizerConfig::default().validate().is_ok());
    }
}
