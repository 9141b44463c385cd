//! A single Monte Carlo trial: one population of identical systems
//! evolved across the full time grid.

use relia_core::TimeGrid;

use crate::rng::EventRng;
use crate::system::SystemInstance;

/// Everything one trial reports back to the reducer.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialOutcome {
    /// Working instances after each timestep, one entry per grid point
    pub working_counts: Vec<u64>,
    /// Grid times of every WORKING -> FAILED transition, in step order
    pub fail_times: Vec<f64>,
    /// Grid times of every FAILED -> WORKING transition, in step order
    pub repair_times: Vec<f64>,
}

/// Runs one trial: clones the template into an independent population and
/// advances every instance across the grid, recording the working count
/// per step and the exact grid times of system-level state transitions.
///
/// Instances are stepped in a fixed order and all draw from the single
/// trial-owned random stream, so the outcome is a pure function of
/// (template, rng stream, grid).
pub fn run_trial(
    template: &SystemInstance,
    population_size: usize,
    grid: &TimeGrid,
    rng: &mut EventRng,
) -> TrialOutcome {
    let mut population: Vec<SystemInstance> = (0..population_size)
        .map(|_| template.clone())
        .collect();

    let mut working_counts = vec![0u64; grid.len()];
    let mut fail_times = Vec::new();
    let mut repair_times = Vec::new();

    for (step, time) in grid.times().iter().enumerate() {
        for system in &mut population {
            let was_working = system.is_working();
            system.step(rng);
            let now_working = system.is_working();

            if now_working {
                working_counts[step] += 1;
            }

            if was_working && !now_working {
                fail_times.push(*time);
            } else if !was_working && now_working {
                repair_times.push(*time);
            }
        }
    }

    TrialOutcome {
        working_counts,
        fail_times,
        repair_times,
    }
}
