//! Trial orchestration and reduction into the final reliability estimate.

use std::panic;
use std::thread;

use relia_core::{RunParams, TimeGrid, TopologySpec};
use tracing::{debug, info};

use crate::rng::EventRng;
use crate::system::SystemInstance;
use crate::trial::{TrialOutcome, run_trial};
use crate::{Result, SimulationError};

/// MTTF and the reliability the averaged curve shows at that time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MttfEstimate {
    /// Mean time to failure
    pub mttf: f64,
    /// Curve value at the first grid time strictly after the MTTF
    pub reliability: f64,
}

/// Reduced output of one full Monte Carlo experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    /// Population-normalized, trial-averaged working fraction per grid
    /// point, each value in [0, 1]
    pub curve: Vec<f64>,
    /// MTTF estimate, or `None` when the positional failure-time pairing
    /// produced an empty list (no failures observed within the window)
    pub mttf: Option<MttfEstimate>,
    /// Total WORKING -> FAILED transitions observed across all trials
    pub failures_observed: usize,
    /// Total FAILED -> WORKING transitions observed across all trials
    pub repairs_observed: usize,
}

/// Dispatches independent trials across worker threads and reduces their
/// outcomes into one averaged curve and MTTF estimate.
pub struct Simulator {
    params: RunParams,
    grid: TimeGrid,
}

impl Simulator {
    /// Creates a simulator over a validated grid and run parameters.
    pub fn new(params: RunParams, grid: TimeGrid) -> Self {
        Self { params, grid }
    }

    /// Returns the time grid this simulator advances over.
    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    /// Runs the full experiment for one topology.
    ///
    /// Trials share no mutable state: each derives its own random stream
    /// from the master seed and its trial index, so the result is
    /// bit-identical across repeated runs regardless of how trials land
    /// on workers. The join below is the only synchronization point; a
    /// panicking worker aborts the whole aggregation, since reducing a
    /// partial set of trials would bias the curve.
    ///
    /// # Errors
    /// - `SimulationError::Config` - The topology description is invalid
    /// - `SimulationError::MttfBeyondGrid` - Failures were observed but
    ///   the MTTF landed at or past the final grid point
    pub fn simulate_all(&self, spec: &TopologySpec) -> Result<AggregateResult> {
        let template = SystemInstance::from_spec(spec)?;
        let num_trials = self.params.num_trials;

        info!(
            trials = num_trials,
            population = self.params.population_size,
            steps = self.grid.len(),
            seed = self.params.master_seed,
            "starting reliability run"
        );

        let outcomes = self.run_trials(&template, num_trials);
        let result = self.reduce(&outcomes)?;

        info!(
            failures = result.failures_observed,
            repairs = result.repairs_observed,
            mttf_defined = result.mttf.is_some(),
            "reliability run complete"
        );

        Ok(result)
    }

    /// Fans trials out across scoped worker threads and joins them all.
    ///
    /// Outcomes are re-ordered by trial index before reduction so the
    /// floating-point sums below are evaluated in the same order on any
    /// worker count.
    fn run_trials(&self, template: &SystemInstance, num_trials: usize) -> Vec<TrialOutcome> {
        let workers = num_trials.min(num_cpus::get().max(1));
        let params = self.params;
        let grid = &self.grid;

        let mut indexed: Vec<(usize, TrialOutcome)> = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|worker| {
                    scope.spawn(move || {
                        let mut local = Vec::new();
                        let mut trial = worker;
                        while trial < num_trials {
                            let mut rng =
                                EventRng::for_trial(params.master_seed, trial as u64);
                            let outcome =
                                run_trial(template, params.population_size, grid, &mut rng);
                            debug!(
                                trial,
                                failures = outcome.fail_times.len(),
                                repairs = outcome.repair_times.len(),
                                "trial complete"
                            );
                            local.push((trial, outcome));
                            trial += workers;
                        }
                        local
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| match handle.join() {
                    Ok(outcomes) => outcomes,
                    // No recovery path: partial results would produce a
                    // statistically biased curve.
                    Err(payload) => panic::resume_unwind(payload),
                })
                .collect()
        });

        indexed.sort_by_key(|(trial, _)| *trial);
        indexed.into_iter().map(|(_, outcome)| outcome).collect()
    }

    fn reduce(&self, outcomes: &[TrialOutcome]) -> Result<AggregateResult> {
        let steps = self.grid.len();
        let trials = outcomes.len() as f64;
        let population = self.params.population_size as f64;

        let mut curve = vec![0.0f64; steps];
        for outcome in outcomes {
            for (step, count) in outcome.working_counts.iter().enumerate() {
                curve[step] += *count as f64;
            }
        }
        for value in &mut curve {
            *value /= trials * population;
        }

        let failures_observed = outcomes.iter().map(|o| o.fail_times.len()).sum();
        let repairs_observed = outcomes.iter().map(|o| o.repair_times.len()).sum();

        // Positional pairing: average the k-th failure time across trials.
        // Pairing truncates to the shortest per-trial list, so trials with
        // fewer failures shorten the sequence. Known approximation, see
        // DESIGN.md.
        let paired_len = outcomes
            .iter()
            .map(|o| o.fail_times.len())
            .min()
            .unwrap_or(0);

        let mttf = if paired_len == 0 {
            None
        } else {
            let mean_failure_times = (0..paired_len).map(|k| {
                outcomes.iter().map(|o| o.fail_times[k]).sum::<f64>() / trials
            });
            let mttf = mean_failure_times.sum::<f64>() / paired_len as f64;

            let (index, _) = self
                .grid
                .first_after(mttf)
                .ok_or(SimulationError::MttfBeyondGrid { mttf })?;
            Some(MttfEstimate {
                mttf,
                reliability: curve[index],
            })
        };

        Ok(AggregateResult {
            curve,
            mttf,
            failures_observed,
            repairs_observed,
        })
    }
}

#[cfg(test)]
mod tests {
    use relia_core::Rates;

    use super::*;

    fn simulator(trials: usize, population: usize, seed: u64) -> Simulator {
        let grid = TimeGrid::from_step(100.0, 1.0).unwrap();
        Simulator::new(RunParams::new(trials, population, seed).unwrap(), grid)
    }

    fn simplex_spec(fail: f64) -> TopologySpec {
        TopologySpec::Simplex {
            rates: Rates::non_repairable(fail).unwrap(),
        }
    }

    #[test]
    fn test_seeded_runs_are_bit_identical() {
        let sim = simulator(8, 25, 0xC0FFEE);
        let spec = simplex_spec(0.05);

        let first = sim.simulate_all(&spec).unwrap();
        let second = sim.simulate_all(&spec).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_failures_reports_undefined_mttf() {
        let sim = simulator(4, 10, 7);
        let result = sim.simulate_all(&simplex_spec(0.0)).unwrap();

        assert!(result.mttf.is_none());
        assert_eq!(result.failures_observed, 0);
        assert!(result.curve.iter().all(|r| *r == 1.0));
    }

    #[test]
    fn test_curve_is_normalized_and_decreasing_without_repair() {
        let sim = simulator(10, 50, 41);
        let result = sim.simulate_all(&simplex_spec(0.05)).unwrap();

        for window in result.curve.windows(2) {
            assert!(window[1] <= window[0]);
        }
        assert!(result.curve.iter().all(|r| (0.0..=1.0).contains(r)));
    }

    #[test]
    fn test_certain_failure_pins_mttf_to_first_step() {
        let sim = simulator(3, 5, 13);
        let result = sim.simulate_all(&simplex_spec(1.0)).unwrap();

        let estimate = result.mttf.unwrap();
        // Every instance fails at grid time 0, so the positional mean is 0
        // and the reliability is read one step later.
        assert_eq!(estimate.mttf, 0.0);
        assert_eq!(estimate.reliability, 0.0);
        assert_eq!(result.failures_observed, 15);
    }

    #[test]
    fn test_invalid_topology_is_rejected() {
        let sim = simulator(2, 5, 1);
        let spec = TopologySpec::Series {
            components: 0,
            rates: Rates::non_repairable(0.1).unwrap(),
        };
        assert!(matches!(
            sim.simulate_all(&spec),
            Err(SimulationError::Config(_))
        ));
    }

    #[test]
    fn test_single_trial_matches_direct_run() {
        // The orchestration layer must add nothing to what run_trial
        // produces for the same seed and stream.
        let grid = TimeGrid::from_step(50.0, 1.0).unwrap();
        let params = RunParams::new(1, 20, 555).unwrap();
        let sim = Simulator::new(params, grid.clone());
        let spec = simplex_spec(0.1);

        let aggregate = sim.simulate_all(&spec).unwrap();

        let template = SystemInstance::from_spec(&spec).unwrap();
        let mut rng = EventRng::for_trial(555, 0);
        let direct = run_trial(&template, 20, &grid, &mut rng);

        let expected: Vec<f64> = direct
            .working_counts
            .iter()
            .map(|c| *c as f64 / 20.0)
            .collect();
        assert_eq!(aggregate.curve, expected);
        assert_eq!(aggregate.failures_observed, direct.fail_times.len());
    }
}
