//! Bounded-domain event sampling over a seeded random stream.

use rand::{RngCore, SeedableRng, TryRngCore, rngs::OsRng};
use rand_chacha::ChaCha8Rng;

use crate::SimulationError;

/// Size of the sample domain. Samples are uniform in `[0, SAMPLE_DOMAIN)`.
pub const SAMPLE_DOMAIN: u32 = 1 << 16;

/// Random event source for one trial.
///
/// Wraps a ChaCha8 stream and reduces it to the 16-bit probability
/// comparisons the state machines consume. Each trial owns exactly one
/// `EventRng`; workers never share a stream, so there is no interleaved
/// read to race on and a seeded run replays bit-for-bit.
#[derive(Debug, Clone)]
pub struct EventRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl EventRng {
    /// Creates the event source for one trial of a seeded experiment.
    ///
    /// All trials share the master seed and diverge by the ChaCha stream
    /// counter, which keeps per-trial streams independent without any
    /// seed arithmetic that could collide.
    pub fn for_trial(master_seed: u64, trial_index: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(master_seed);
        rng.set_stream(trial_index);
        Self {
            rng,
            seed: master_seed,
        }
    }

    /// Creates an event source seeded from OS entropy.
    ///
    /// The drawn seed is retained so a surprising run can be replayed
    /// with [`EventRng::for_trial`].
    ///
    /// # Errors
    /// - `SimulationError::EntropyUnavailable` - The OS entropy source
    ///   could not be read; this is fatal, not retryable
    pub fn from_os_entropy() -> Result<Self, SimulationError> {
        let seed = OsRng
            .try_next_u64()
            .map_err(|e| SimulationError::EntropyUnavailable {
                reason: e.to_string(),
            })?;
        Ok(Self::for_trial(seed, 0))
    }

    /// Returns the master seed behind this stream.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draws one sample, uniform in `[0, SAMPLE_DOMAIN)`.
    pub fn sample(&mut self) -> u32 {
        // Top 16 bits of a uniform u32 are themselves uniform.
        self.rng.next_u32() >> 16
    }

    /// Returns true iff an event with the given probability fires.
    pub fn event_happened(&mut self, probability: f64) -> bool {
        (self.sample() as f64) / (SAMPLE_DOMAIN as f64) < probability
    }
}
