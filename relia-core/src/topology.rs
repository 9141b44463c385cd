//! Validated topology descriptions.
//!
//! A `TopologySpec` is the wiring rule of one redundant configuration:
//! how many components, what quorum must hold, and the per-step failure
//! and repair probabilities. It is a pure description - the Monte Carlo
//! engine materializes it into stateful instances, and the analytic
//! models read the same description to produce closed-form curves.

use crate::ConfigError;

/// Per-step failure and repair probabilities shared by all components
/// of one bank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rates {
    /// Probability a working component fails during one step
    pub fail: f64,
    /// Probability a failed component is repaired during one step
    pub repair: f64,
}

impl Rates {
    /// Creates validated rates.
    ///
    /// # Errors
    /// - `ConfigError::ProbabilityOutOfRange` - Either rate outside [0, 1]
    pub fn new(fail: f64, repair: f64) -> Result<Self, ConfigError> {
        check_probability("fail", fail)?;
        check_probability("repair", repair)?;
        Ok(Self { fail, repair })
    }

    /// Rates for a non-repairable bank, the common case.
    ///
    /// # Errors
    /// - `ConfigError::ProbabilityOutOfRange` - Failure rate outside [0, 1]
    pub fn non_repairable(fail: f64) -> Result<Self, ConfigError> {
        Self::new(fail, 0.0)
    }
}

/// Per-step failure probabilities of the shared NMR infrastructure.
///
/// The switch probability here is the per-component base rate; the
/// effective rate scales with the component count when the system is
/// materialized, modelling aggregate load on the switching fabric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuxRates {
    /// Voter failure probability per step
    pub voter: f64,
    /// Switch failure probability per step, per component
    pub switch: f64,
}

impl AuxRates {
    /// Creates validated auxiliary rates.
    ///
    /// # Errors
    /// - `ConfigError::ProbabilityOutOfRange` - Either rate outside [0, 1]
    pub fn new(voter: f64, switch: f64) -> Result<Self, ConfigError> {
        check_probability("voter", voter)?;
        check_probability("switch", switch)?;
        Ok(Self { voter, switch })
    }

    /// Perfectly reliable voter and switch.
    pub fn perfect() -> Self {
        Self {
            voter: 0.0,
            switch: 0.0,
        }
    }
}

/// The closed set of supported redundancy topologies.
///
/// Variants are a tagged union rather than an open trait because the set
/// is small and fixed; the simulation engine dispatches on the tag.
#[derive(Debug, Clone, PartialEq)]
pub enum TopologySpec {
    /// Single component, no redundancy
    Simplex {
        /// Component rates
        rates: Rates,
    },
    /// All components must work
    Series {
        /// Number of components
        components: usize,
        /// Component rates
        rates: Rates,
    },
    /// Any one working component suffices
    Parallel {
        /// Number of components
        components: usize,
        /// Component rates
        rates: Rates,
    },
    /// M-out-of-N with voter, switch, and optional cold-spare pool
    Nmr {
        /// Number of tracked components (N)
        components: usize,
        /// Working components required for a quorum (M)
        required: usize,
        /// Cold spares that absorb the first failures
        spares: u32,
        /// Component rates
        rates: Rates,
        /// Voter and switch failure probabilities
        aux_rates: AuxRates,
    },
}

impl TopologySpec {
    /// Validates the internal consistency of this description.
    ///
    /// Rate fields are public, so the probability bounds are re-checked
    /// here alongside the count relationships and the scaled switch rate,
    /// which can leave [0, 1] for large N.
    ///
    /// # Errors
    /// - `ConfigError::ZeroCount` - Zero components or zero quorum
    /// - `ConfigError::QuorumTooLarge` - Required count exceeds N
    /// - `ConfigError::ProbabilityOutOfRange` - Any probability, or the
    ///   scaled switch rate, outside [0, 1]
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rates = self.rates();
        check_probability("fail", rates.fail)?;
        check_probability("repair", rates.repair)?;

        match *self {
            TopologySpec::Simplex { .. } => Ok(()),
            TopologySpec::Series { components, .. }
            | TopologySpec::Parallel { components, .. } => {
                if components == 0 {
                    return Err(ConfigError::ZeroCount { name: "components" });
                }
                Ok(())
            }
            TopologySpec::Nmr {
                components,
                required,
                aux_rates,
                ..
            } => {
                if components == 0 {
                    return Err(ConfigError::ZeroCount { name: "components" });
                }
                if required == 0 {
                    return Err(ConfigError::ZeroCount { name: "required" });
                }
                if required > components {
                    return Err(ConfigError::QuorumTooLarge {
                        required,
                        components,
                    });
                }
                check_probability("voter", aux_rates.voter)?;
                check_probability("switch", aux_rates.switch)?;
                check_probability("switch (scaled)", aux_rates.switch * components as f64)
            }
        }
    }

    /// Number of tracked components in this topology.
    pub fn component_count(&self) -> usize {
        match *self {
            TopologySpec::Simplex { .. } => 1,
            TopologySpec::Series { components, .. }
            | TopologySpec::Parallel { components, .. }
            | TopologySpec::Nmr { components, .. } => components,
        }
    }

    /// Component rates of this topology.
    pub fn rates(&self) -> Rates {
        match *self {
            TopologySpec::Simplex { rates }
            | TopologySpec::Series { rates, .. }
            | TopologySpec::Parallel { rates, .. }
            | TopologySpec::Nmr { rates, .. } => rates,
        }
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::ProbabilityOutOfRange { name, value });
    }
    Ok(())
}
