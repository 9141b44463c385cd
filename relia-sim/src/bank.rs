//! Component state machines: the bank of tracked components with its
//! cold-spare pool, and the non-repairable auxiliary units (voter, switch).

use relia_core::Rates;

use crate::rng::EventRng;

/// Binary state of one component. A component has no identity beyond
/// its index in the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentState {
    /// Component is operational
    Working,
    /// Component has failed
    Failed,
}

/// A fixed-size bank of components sharing one pair of per-step rates.
///
/// The count is fixed at construction. Each step every component runs an
/// independent Bernoulli trial: working components may fail, failed
/// components may be repaired. While the cold-spare pool is non-empty a
/// failure event consumes a spare instead of flipping the component, so
/// early failures are invisible to `working_count`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentBank {
    states: Vec<ComponentState>,
    rates: Rates,
    spares: u32,
}

impl ComponentBank {
    /// Creates a bank with every component working.
    pub fn new(count: usize, rates: Rates, spares: u32) -> Self {
        Self {
            states: vec![ComponentState::Working; count],
            rates,
            spares,
        }
    }

    /// Advances every component by one timestep.
    ///
    /// Components are evaluated in index order so a fixed random stream
    /// replays to an identical state sequence.
    pub fn step(&mut self, rng: &mut EventRng) {
        for state in &mut self.states {
            match *state {
                ComponentState::Working => {
                    if rng.event_happened(self.rates.fail) {
                        if self.spares > 0 {
                            self.spares -= 1;
                        } else {
                            *state = ComponentState::Failed;
                        }
                    }
                }
                ComponentState::Failed => {
                    if rng.event_happened(self.rates.repair) {
                        *state = ComponentState::Working;
                    }
                }
            }
        }
    }

    /// Number of components currently working.
    pub fn working_count(&self) -> usize {
        self.states
            .iter()
            .filter(|s| **s == ComponentState::Working)
            .count()
    }

    /// Total number of components in the bank.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if the bank holds no components.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Cold spares still available.
    pub fn spares_left(&self) -> u32 {
        self.spares
    }
}

/// Shared NMR infrastructure (voter or switch): an independent binary
/// state with its own failure probability and, deliberately, no repair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuxiliaryUnit {
    state: ComponentState,
    fail_probability: f64,
}

impl AuxiliaryUnit {
    /// Creates a working unit with the given per-step failure probability.
    pub fn new(fail_probability: f64) -> Self {
        Self {
            state: ComponentState::Working,
            fail_probability,
        }
    }

    /// Runs this unit's failure trial for one timestep. Once failed it
    /// stays failed for the rest of the grid.
    pub fn step(&mut self, rng: &mut EventRng) {
        if self.state == ComponentState::Working && rng.event_happened(self.fail_probability) {
            self.state = ComponentState::Failed;
        }
    }

    /// Returns true while the unit works.
    pub fn is_working(&self) -> bool {
        self.state == ComponentState::Working
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn rates(fail: f64, repair: f64) -> Rates {
        Rates::new(fail, repair).unwrap()
    }

    #[test]
    fn test_bank_starts_fully_working() {
        let bank = ComponentBank::new(7, rates(0.1, 0.0), 2);
        assert_eq!(bank.working_count(), 7);
        assert_eq!(bank.spares_left(), 2);
    }

    #[test]
    fn test_zero_rates_freeze_the_bank() {
        let mut bank = ComponentBank::new(4, rates(0.0, 0.0), 0);
        let mut rng = EventRng::for_trial(1, 0);
        for _ in 0..200 {
            bank.step(&mut rng);
            assert_eq!(bank.working_count(), 4);
        }
    }

    #[test]
    fn test_spares_absorb_first_failures() {
        // fail probability 1.0 makes every event deterministic: with two
        // spares and three components, the first step burns both spares
        // on components 0 and 1 and fails component 2 outright.
        let mut bank = ComponentBank::new(3, rates(1.0, 0.0), 2);
        let mut rng = EventRng::for_trial(1, 0);

        bank.step(&mut rng);
        assert_eq!(bank.working_count(), 2);
        assert_eq!(bank.spares_left(), 0);

        bank.step(&mut rng);
        assert_eq!(bank.working_count(), 0);
    }

    #[test]
    fn test_repair_brings_components_back() {
        let mut bank = ComponentBank::new(5, rates(1.0, 1.0), 0);
        let mut rng = EventRng::for_trial(1, 0);

        bank.step(&mut rng);
        assert_eq!(bank.working_count(), 0);

        bank.step(&mut rng);
        assert_eq!(bank.working_count(), 5);
    }

    #[test]
    fn test_auxiliary_unit_never_repairs() {
        let mut unit = AuxiliaryUnit::new(1.0);
        let mut rng = EventRng::for_trial(3, 0);

        assert!(unit.is_working());
        unit.step(&mut rng);
        assert!(!unit.is_working());

        // Stays failed no matter how long the grid runs.
        for _ in 0..100 {
            unit.step(&mut rng);
            assert!(!unit.is_working());
        }
    }

    proptest! {
        // Without repair the working count can only fall, whatever the
        // failure probability or random stream.
        #[test]
        fn prop_non_repairable_bank_degrades_monotonically(
            fail in 0.0f64..=1.0,
            seed in any::<u64>(),
        ) {
            let mut bank = ComponentBank::new(8, rates(fail, 0.0), 0);
            let mut rng = EventRng::for_trial(seed, 0);
            let mut previous = bank.working_count();
            for _ in 0..100 {
                bank.step(&mut rng);
                let current = bank.working_count();
                prop_assert!(current <= previous);
                previous = current;
            }
        }

        // The spare pool never grows.
        #[test]
        fn prop_spare_pool_is_non_increasing(
            fail in 0.0f64..=1.0,
            spares in 0u32..5,
            seed in any::<u64>(),
        ) {
            let mut bank = ComponentBank::new(4, rates(fail, 0.0), spares);
            let mut rng = EventRng::for_trial(seed, 0);
            let mut previous = bank.spares_left();
            for _ in 0..50 {
                bank.step(&mut rng);
                let current = bank.spares_left();
                prop_assert!(current <= previous);
                previous = current;
            }
        }
    }
}
