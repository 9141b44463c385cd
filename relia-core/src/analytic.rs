//! Closed-form reliability models for exponential component lifetimes.
//!
//! These are the analytic counterparts of the Monte Carlo topologies:
//! given a constant hazard rate lambda, each model yields R(t) in closed
//! form and an MTTF by numerical integration of the reliability function.
//! The simulation engine never consumes these - they exist so callers can
//! put simulated and exact curves side by side.

use crate::ConfigError;
use crate::config::TimeGrid;
use crate::topology::TopologySpec;

/// Integration step, as a fraction of the mean component lifetime.
const MTTF_STEP_FRACTION: f64 = 1e-3;

/// Reliability below which the MTTF integral tail is truncated.
const MTTF_TAIL_CUTOFF: f64 = 1e-12;

/// One closed-form reliability model.
#[derive(Debug, Clone, PartialEq)]
pub struct ReliabilityModel {
    kind: ModelKind,
    lambda: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModelKind {
    Simplex,
    Series { n: usize },
    Parallel { n: usize },
    MOfN { n: usize, m: usize },
}

impl ReliabilityModel {
    /// Single exponential component: R(t) = e^(-lambda*t).
    ///
    /// # Errors
    /// - `ConfigError::NonPositiveRate` - Non-positive or non-finite lambda
    pub fn simplex(lambda: f64) -> Result<Self, ConfigError> {
        Self::with_kind(ModelKind::Simplex, lambda)
    }

    /// All of n components must survive: R(t) = r^n.
    ///
    /// # Errors
    /// - `ConfigError::NonPositiveRate` - Non-positive or non-finite lambda
    /// - `ConfigError::ZeroCount` - Zero components
    pub fn series(n: usize, lambda: f64) -> Result<Self, ConfigError> {
        if n == 0 {
            return Err(ConfigError::ZeroCount { name: "components" });
        }
        Self::with_kind(ModelKind::Series { n }, lambda)
    }

    /// Any of n components suffices: R(t) = 1 - (1 - r)^n.
    ///
    /// # Errors
    /// - `ConfigError::NonPositiveRate` - Non-positive or non-finite lambda
    /// - `ConfigError::ZeroCount` - Zero components
    pub fn parallel(n: usize, lambda: f64) -> Result<Self, ConfigError> {
        if n == 0 {
            return Err(ConfigError::ZeroCount { name: "components" });
        }
        Self::with_kind(ModelKind::Parallel { n }, lambda)
    }

    /// At least m of n components must survive (binomial sum).
    ///
    /// # Errors
    /// - `ConfigError::NonPositiveRate` - Non-positive or non-finite lambda
    /// - `ConfigError::ZeroCount` - Zero components or zero quorum
    /// - `ConfigError::QuorumTooLarge` - Quorum exceeds component count
    pub fn m_of_n(n: usize, m: usize, lambda: f64) -> Result<Self, ConfigError> {
        if n == 0 {
            return Err(ConfigError::ZeroCount { name: "components" });
        }
        if m == 0 {
            return Err(ConfigError::ZeroCount { name: "required" });
        }
        if m > n {
            return Err(ConfigError::QuorumTooLarge {
                required: m,
                components: n,
            });
        }
        Self::with_kind(ModelKind::MOfN { n, m }, lambda)
    }

    /// Maps a topology description onto its closed-form model.
    ///
    /// Voter, switch, and spare pool have no closed form here; the NMR
    /// mapping covers the bare M-of-N quorum only.
    ///
    /// # Errors
    /// - `ConfigError::NonPositiveRate` - Non-positive or non-finite lambda
    /// - Any error the underlying constructor raises
    pub fn from_spec(spec: &TopologySpec, lambda: f64) -> Result<Self, ConfigError> {
        spec.validate()?;
        match *spec {
            TopologySpec::Simplex { .. } => Self::simplex(lambda),
            TopologySpec::Series { components, .. } => Self::series(components, lambda),
            TopologySpec::Parallel { components, .. } => Self::parallel(components, lambda),
            TopologySpec::Nmr {
                components,
                required,
                ..
            } => Self::m_of_n(components, required, lambda),
        }
    }

    fn with_kind(kind: ModelKind, lambda: f64) -> Result<Self, ConfigError> {
        if !lambda.is_finite() || lambda <= 0.0 {
            return Err(ConfigError::NonPositiveRate {
                name: "lambda",
                value: lambda,
            });
        }
        Ok(Self { kind, lambda })
    }

    /// Evaluates R(t).
    pub fn reliability(&self, t: f64) -> f64 {
        let r = (-self.lambda * t).exp();
        match self.kind {
            ModelKind::Simplex => r,
            ModelKind::Series { n } => r.powi(n as i32),
            ModelKind::Parallel { n } => 1.0 - (1.0 - r).powi(n as i32),
            ModelKind::MOfN { n, m } => (m..=n)
                .map(|k| {
                    binomial(n, k) * r.powi(k as i32) * (1.0 - r).powi((n - k) as i32)
                })
                .sum(),
        }
    }

    /// Evaluates R(t) at every grid point.
    pub fn curve(&self, grid: &TimeGrid) -> Vec<f64> {
        grid.times().iter().map(|t| self.reliability(*t)).collect()
    }

    /// MTTF by trapezoidal integration of R(t), paired with R(MTTF).
    ///
    /// The integral runs until the reliability tail drops below a fixed
    /// cutoff, which converges for every model in the closed set since
    /// all of them decay exponentially.
    pub fn mttf(&self) -> (f64, f64) {
        let step = MTTF_STEP_FRACTION / self.lambda;
        let mut area = 0.0;
        let mut t = 0.0;
        let mut prev = self.reliability(0.0);

        loop {
            t += step;
            let next = self.reliability(t);
            area += 0.5 * (prev + next) * step;
            if next < MTTF_TAIL_CUTOFF {
                break;
            }
            prev = next;
        }

        (area, self.reliability(area))
    }
}

/// Binomial coefficient as f64, multiplicative form to avoid factorial
/// overflow for large n.
fn binomial(n: usize, k: usize) -> f64 {
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}
