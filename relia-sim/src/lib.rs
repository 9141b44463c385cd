//! Relia Sim - Monte Carlo engine for redundant hardware reliability.
//!
//! This crate estimates time-dependent reliability by brute force: it
//! materializes a validated topology description from `relia-core` into a
//! population of stateful system instances, advances every instance across
//! a fixed discrete time grid with independent per-step failure and repair
//! draws, and repeats that trial many times in parallel before reducing
//! everything into one averaged reliability curve and an MTTF estimate.
//!
//! # Determinism
//!
//! Every trial owns its own ChaCha8 random stream, derived from the
//! experiment's master seed and the trial index. Given the same seed,
//! template, and grid, a run is bit-identical no matter how trials are
//! scheduled across workers.
//!
//! # Example
//!
//! ```rust,no_run
//! use relia_core::{Rates, RunParams, TimeGrid, TopologySpec};
//! use relia_sim::Simulator;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let grid = TimeGrid::from_step(10.0, 0.01)?;
//! let params = RunParams::new(10, 100, 42)?;
//! let spec = TopologySpec::Parallel {
//!     components: 2,
//!     rates: Rates::non_repairable(0.01)?,
//! };
//!
//! let simulator = Simulator::new(params, grid);
//! let result = simulator.simulate_all(&spec)?;
//! match result.mttf {
//!     Some(estimate) => println!("MTTF {:.3}", estimate.mttf),
//!     None => println!("no failures observed"),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]

pub mod bank;
pub mod rng;
pub mod simulator;
pub mod system;
pub mod trial;

pub use bank::{AuxiliaryUnit, ComponentBank, ComponentState};
pub use rng::EventRng;
pub use simulator::{AggregateResult, MttfEstimate, Simulator};
pub use system::SystemInstance;
pub use trial::{TrialOutcome, run_trial};

use relia_core::ConfigError;

/// Errors that can occur while running a Monte Carlo experiment.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// Experiment or topology configuration rejected at construction
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// OS entropy source unavailable; the run cannot proceed unbiased
    #[error("Entropy source unavailable: {reason}")]
    EntropyUnavailable {
        /// Why the entropy read failed
        reason: String,
    },

    /// MTTF landed at or past the final grid time, so no grid point
    /// strictly after it exists to read the reliability from
    #[error("MTTF {mttf} is not inside the observation window")]
    MttfBeyondGrid {
        /// The estimated mean time to failure
        mttf: f64,
    },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SimulationError>;
