//! Side-by-side comparison of analytic and Monte Carlo reliability
//! estimates for the classic redundancy configurations.
//!
//! Runs Simplex, Parallel-2, TMR (2-of-3) and 5MR (3-of-5) over the same
//! time grid with per-step probabilities chosen so the discrete hazard
//! approximates the unit-lambda exponential model, then prints the MTTF
//! each method reports.

use anyhow::Result;
use relia_core::{AuxRates, Rates, ReliabilityModel, RunParams, TimeGrid, TopologySpec};
use relia_sim::Simulator;

const FINAL_TIME: f64 = 10.0;
const STEP: f64 = 0.01;
const NUM_TRIALS: usize = 10;
const POPULATION_SIZE: usize = 100;
const MASTER_SEED: u64 = 42;

fn configurations() -> Result<Vec<(&'static str, TopologySpec)>> {
    // Per-step failure probability = lambda * dt with lambda = 1.
    let rates = Rates::non_repairable(STEP)?;
    let aux = AuxRates::perfect();

    Ok(vec![
        ("Simplex", TopologySpec::Simplex { rates }),
        (
            "Parallel 2",
            TopologySpec::Parallel {
                components: 2,
                rates,
            },
        ),
        (
            "TMR",
            TopologySpec::Nmr {
                components: 3,
                required: 2,
                spares: 0,
                rates,
                aux_rates: aux,
            },
        ),
        (
            "5MR",
            TopologySpec::Nmr {
                components: 5,
                required: 3,
                spares: 0,
                rates,
                aux_rates: aux,
            },
        ),
    ])
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let grid = TimeGrid::from_step(FINAL_TIME, STEP)?;
    let params = RunParams::new(NUM_TRIALS, POPULATION_SIZE, MASTER_SEED)?;
    let simulator = Simulator::new(params, grid);

    println!("{:<12} {:>14} {:>14}", "Topology", "Analytic MTTF", "Simulated MTTF");
    println!("{:-<42}", "");

    for (name, spec) in configurations()? {
        let (analytic_mttf, _) = ReliabilityModel::from_spec(&spec, 1.0)?.mttf();
        let result = simulator.simulate_all(&spec)?;

        match result.mttf {
            Some(estimate) => println!(
                "{:<12} {:>14.4} {:>14.4}",
                name, analytic_mttf, estimate.mttf
            ),
            None => println!("{:<12} {:>14.4} {:>14}", name, analytic_mttf, "undefined"),
        }
    }

    Ok(())
}
