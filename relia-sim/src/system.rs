//! Stateful system instances: one topology variant wrapped around a
//! component bank, reduced to a single working/failed verdict.

use relia_core::TopologySpec;

use crate::Result;
use crate::bank::{AuxiliaryUnit, ComponentBank};
use crate::rng::EventRng;

/// One live system in a trial population.
///
/// The variant set is closed, so dispatch is a plain match on the tag.
/// `Clone` is the deep copy the population model relies on: every clone
/// owns its own bank and auxiliary units, and nothing is shared across
/// instances or across trials.
#[derive(Debug, Clone, PartialEq)]
pub enum SystemInstance {
    /// Single component, working iff that component works
    Simplex {
        /// The one-component bank
        bank: ComponentBank,
    },
    /// Working iff every component works
    Series {
        /// The component bank
        bank: ComponentBank,
    },
    /// Working iff at least one component works
    Parallel {
        /// The component bank
        bank: ComponentBank,
    },
    /// Working iff a quorum of components works and both the voter and
    /// the switch still work
    Nmr {
        /// The component bank, including the cold-spare pool
        bank: ComponentBank,
        /// Working components required for a quorum
        required: usize,
        /// Shared voter
        voter: AuxiliaryUnit,
        /// Shared switch; its failure probability already carries the
        /// per-component load scaling
        switch: AuxiliaryUnit,
    },
}

impl SystemInstance {
    /// Materializes a validated topology description into a fresh,
    /// fully-working instance.
    ///
    /// # Errors
    /// - `SimulationError::Config` - The description fails validation
    pub fn from_spec(spec: &TopologySpec) -> Result<Self> {
        spec.validate()?;
        Ok(match *spec {
            TopologySpec::Simplex { rates } => SystemInstance::Simplex {
                bank: ComponentBank::new(1, rates, 0),
            },
            TopologySpec::Series { components, rates } => SystemInstance::Series {
                bank: ComponentBank::new(components, rates, 0),
            },
            TopologySpec::Parallel { components, rates } => SystemInstance::Parallel {
                bank: ComponentBank::new(components, rates, 0),
            },
            TopologySpec::Nmr {
                components,
                required,
                spares,
                rates,
                aux_rates,
            } => SystemInstance::Nmr {
                bank: ComponentBank::new(components, rates, spares),
                required,
                voter: AuxiliaryUnit::new(aux_rates.voter),
                // Aggregate load on the shared switching fabric scales
                // with the component count.
                switch: AuxiliaryUnit::new(aux_rates.switch * components as f64),
            },
        })
    }

    /// Advances the instance by one timestep.
    ///
    /// The bank always evolves; for NMR the voter and then the switch run
    /// their own failure trials afterwards, in that fixed order, so a
    /// seeded stream replays identically.
    pub fn step(&mut self, rng: &mut EventRng) {
        match self {
            SystemInstance::Simplex { bank }
            | SystemInstance::Series { bank }
            | SystemInstance::Parallel { bank } => bank.step(rng),
            SystemInstance::Nmr {
                bank,
                voter,
                switch,
                ..
            } => {
                bank.step(rng);
                voter.step(rng);
                switch.step(rng);
            }
        }
    }

    /// The system-level verdict for the current component states.
    pub fn is_working(&self) -> bool {
        match self {
            SystemInstance::Simplex { bank } => bank.working_count() == 1,
            SystemInstance::Series { bank } => bank.working_count() == bank.len(),
            SystemInstance::Parallel { bank } => bank.working_count() > 0,
            SystemInstance::Nmr {
                bank,
                required,
                voter,
                switch,
            } => {
                voter.is_working() && switch.is_working() && bank.working_count() >= *required
            }
        }
    }

    /// Number of working components, regardless of the system verdict.
    pub fn working_count(&self) -> usize {
        match self {
            SystemInstance::Simplex { bank }
            | SystemInstance::Series { bank }
            | SystemInstance::Parallel { bank }
            | SystemInstance::Nmr { bank, .. } => bank.working_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use relia_core::{AuxRates, Rates};

    use super::*;

    fn non_repairable(fail: f64) -> Rates {
        Rates::non_repairable(fail).unwrap()
    }

    fn nmr_spec(components: usize, required: usize, fail: f64) -> TopologySpec {
        TopologySpec::Nmr {
            components,
            required,
            spares: 0,
            rates: non_repairable(fail),
            aux_rates: AuxRates::perfect(),
        }
    }

    #[test]
    fn test_series_verdict_tracks_full_bank() {
        let spec = TopologySpec::Series {
            components: 4,
            rates: non_repairable(0.3),
        };
        let mut system = SystemInstance::from_spec(&spec).unwrap();
        let mut rng = EventRng::for_trial(11, 0);

        for _ in 0..100 {
            system.step(&mut rng);
            let all_working = system.working_count() == 4;
            assert_eq!(system.is_working(), all_working);
        }
    }

    #[test]
    fn test_parallel_survives_until_last_component() {
        let spec = TopologySpec::Parallel {
            components: 3,
            rates: non_repairable(0.5),
        };
        let mut system = SystemInstance::from_spec(&spec).unwrap();
        let mut rng = EventRng::for_trial(5, 0);

        for _ in 0..200 {
            system.step(&mut rng);
            assert_eq!(system.is_working(), system.working_count() > 0);
        }
    }

    #[test]
    fn test_full_quorum_nmr_matches_series_verdict() {
        // With required == components and perfect voter/switch the NMR
        // predicate degenerates to the Series predicate for any mix of
        // component states.
        let mut nmr = SystemInstance::from_spec(&nmr_spec(3, 3, 0.4)).unwrap();
        let mut rng = EventRng::for_trial(21, 0);

        for _ in 0..100 {
            nmr.step(&mut rng);
            assert_eq!(nmr.is_working(), nmr.working_count() == 3);
        }
    }

    #[test]
    fn test_voter_failure_fails_the_system() {
        let spec = TopologySpec::Nmr {
            components: 3,
            required: 2,
            spares: 0,
            rates: non_repairable(0.0),
            aux_rates: AuxRates::new(1.0, 0.0).unwrap(),
        };
        let mut system = SystemInstance::from_spec(&spec).unwrap();
        let mut rng = EventRng::for_trial(2, 0);

        assert!(system.is_working());
        system.step(&mut rng);
        // All components still work; only the voter is gone.
        assert_eq!(system.working_count(), 3);
        assert!(!system.is_working());
    }

    #[test]
    fn test_spares_delay_quorum_loss() {
        // 2-of-3 with one spare and certain failures: step one burns the
        // spare on component 0 and fails components 1 and 2, so the first
        // spare absorbed exactly one failure event before the quorum fell.
        let spec = TopologySpec::Nmr {
            components: 3,
            required: 2,
            spares: 1,
            rates: non_repairable(1.0),
            aux_rates: AuxRates::perfect(),
        };
        let mut system = SystemInstance::from_spec(&spec).unwrap();
        let mut rng = EventRng::for_trial(8, 0);

        system.step(&mut rng);
        assert_eq!(system.working_count(), 1);
        assert!(!system.is_working());
    }

    #[test]
    fn test_clone_is_a_deep_copy() {
        let spec = nmr_spec(5, 3, 0.5);
        let template = SystemInstance::from_spec(&spec).unwrap();
        let mut copy = template.clone();
        let mut rng = EventRng::for_trial(17, 0);

        for _ in 0..50 {
            copy.step(&mut rng);
        }

        // The template never moved.
        assert_eq!(template.working_count(), 5);
        assert!(template.is_working());
    }

    #[test]
    fn test_invalid_spec_is_rejected_at_materialization() {
        let spec = nmr_spec(3, 5, 0.1);
        assert!(SystemInstance::from_spec(&spec).is_err());
    }
}
