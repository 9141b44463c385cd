//! Experiment configuration for reliability runs.
//!
//! All tunable parameters are validated here, at construction, so the
//! simulation and analytic layers can assume well-formed inputs.

use crate::ConfigError;

/// Fixed discrete time grid shared by every component and every trial.
///
/// The grid is pre-generated once per experiment: `[0, dt, 2*dt, ...)`
/// up to but excluding `final_time`. Step size never adapts mid-run.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    times: Vec<f64>,
    step: f64,
}

impl TimeGrid {
    /// Builds a grid of evenly spaced times starting at zero.
    ///
    /// # Errors
    /// - `ConfigError::InvalidTimeGrid` - Non-positive step or horizon, or
    ///   a horizon shorter than one step
    pub fn from_step(final_time: f64, step: f64) -> Result<Self, ConfigError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(ConfigError::InvalidTimeGrid {
                reason: format!("step must be positive and finite, got {step}"),
            });
        }
        if !final_time.is_finite() || final_time <= 0.0 {
            return Err(ConfigError::InvalidTimeGrid {
                reason: format!("final time must be positive and finite, got {final_time}"),
            });
        }

        let count = (final_time / step).ceil() as usize;
        if count == 0 {
            return Err(ConfigError::InvalidTimeGrid {
                reason: "grid contains no points".to_string(),
            });
        }

        let times: Vec<f64> = (0..count)
            .map(|i| i as f64 * step)
            .take_while(|t| *t < final_time)
            .collect();

        if times.is_empty() {
            return Err(ConfigError::InvalidTimeGrid {
                reason: "grid contains no points".to_string(),
            });
        }

        Ok(Self { times, step })
    }

    /// Returns the grid times in order.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Returns the number of grid points.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns true if the grid holds no points.
    ///
    /// Construction rejects empty grids, so this exists only to satisfy
    /// the usual `len`/`is_empty` pairing.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Returns the fixed step size.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Finds the first grid time strictly greater than `t`, with its index.
    pub fn first_after(&self, t: f64) -> Option<(usize, f64)> {
        self.times
            .iter()
            .enumerate()
            .find(|(_, time)| **time > t)
            .map(|(i, time)| (i, *time))
    }
}

/// Trial-dispatch parameters for one Monte Carlo experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunParams {
    /// Independent trials to dispatch across workers
    pub num_trials: usize,
    /// System instances per trial population
    pub population_size: usize,
    /// Master seed; each trial derives its own stream from it
    pub master_seed: u64,
}

impl RunParams {
    /// Creates validated run parameters.
    ///
    /// # Errors
    /// - `ConfigError::ZeroCount` - Zero trials or zero population
    pub fn new(
        num_trials: usize,
        population_size: usize,
        master_seed: u64,
    ) -> Result<Self, ConfigError> {
        if num_trials == 0 {
            return Err(ConfigError::ZeroCount { name: "num_trials" });
        }
        if population_size == 0 {
            return Err(ConfigError::ZeroCount {
                name: "population_size",
            });
        }
        Ok(Self {
            num_trials,
            population_size,
            master_seed,
        })
    }
}
