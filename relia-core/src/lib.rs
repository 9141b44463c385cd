//! Relia Core - Reliability experiment configuration and analytic models
//!
//! This crate provides the deterministic foundation for reliability
//! analysis of redundant hardware configurations: experiment configuration
//! (time grids, trial parameters), validated topology descriptions, and the
//! closed-form analytic reliability models used to cross-check simulation
//! results. The Monte Carlo engine itself lives in `relia-sim` and depends
//! on this crate, never the other way around.

pub mod analytic;
pub mod config;
pub mod topology;

// Re-export main types for convenient access
pub use analytic::ReliabilityModel;
pub use config::{RunParams, TimeGrid};
pub use topology::{AuxRates, Rates, TopologySpec};

/// Errors raised while constructing experiment configuration.
///
/// Every constructor in this crate validates eagerly and never clamps:
/// an out-of-range value is a caller bug and must surface immediately,
/// before any trial has consumed random samples.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Probability parameter outside the closed unit interval
    #[error("Probability out of range: {name} = {value}, expected [0, 1]")]
    ProbabilityOutOfRange {
        /// Name of the offending parameter
        name: &'static str,
        /// Value that was rejected
        value: f64,
    },

    /// Component or population count that must be at least one
    #[error("Count must be positive: {name} = 0")]
    ZeroCount {
        /// Name of the offending parameter
        name: &'static str,
    },

    /// M-out-of-N quorum larger than the component count
    #[error("Required count {required} exceeds component count {components}")]
    QuorumTooLarge {
        /// Components that must agree
        required: usize,
        /// Components available
        components: usize,
    },

    /// Time grid parameters that produce no usable grid
    #[error("Invalid time grid: {reason}")]
    InvalidTimeGrid {
        /// Why the grid was rejected
        reason: String,
    },

    /// Hazard rate for an analytic model that must be positive
    #[error("Rate must be positive and finite: {name} = {value}")]
    NonPositiveRate {
        /// Name of the offending parameter
        name: &'static str,
        /// Value that was rejected
        value: f64,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
