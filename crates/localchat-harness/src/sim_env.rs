//! Deterministic environment.
//!
//! Time only moves when the test says so and every id comes from a seeded
//! ChaCha stream, so a seed fully determines a run.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use localchat_client::{Environment, LocalStamp};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Debug)]
struct SimState {
    elapsed: Duration,
    stamp: LocalStamp,
    rng: ChaCha8Rng,
}

/// Simulated environment. Clones share one clock and one RNG.
#[derive(Debug, Clone)]
pub struct SimEnv {
    state: Arc<Mutex<SimState>>,
}

impl SimEnv {
    /// Environment at virtual time zero, 2024-01-01 12:00.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                elapsed: Duration::ZERO,
                stamp: LocalStamp {
                    time: "12:00".to_string(),
                    date: "2024-01-01".to_string(),
                    unix_millis: 1_704_110_400_000,
                },
                rng: ChaCha8Rng::seed_from_u64(seed),
            })),
        }
    }

    /// Move the monotonic clock forward.
    pub fn advance(&self, by: Duration) {
        self.lock().elapsed += by;
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Environment for SimEnv {
    type Instant = Duration;

    fn now(&self) -> Self::Instant {
        self.lock().elapsed
    }

    fn local_stamp(&self) -> LocalStamp {
        let state = self.lock();
        LocalStamp {
            unix_millis: state.stamp.unix_millis + state.elapsed.as_millis() as i64,
            ..state.stamp.clone()
        }
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        self.lock().rng.fill_bytes(buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_ids() {
        let a = SimEnv::with_seed(42);
        let b = SimEnv::with_seed(42);
        assert_eq!(a.message_id(), b.message_id());
        assert_eq!(a.reaction_id(), b.reaction_id());
    }

    #[test]
    fn clock_moves_only_when_advanced() {
        let env = SimEnv::with_seed(1);
        let start = env.now();
        assert_eq!(env.now(), start);

        env.clone().advance(Duration::from_secs(3));
        assert_eq!(env.now() - start, Duration::from_secs(3));
        assert_eq!(env.local_stamp().unix_millis, 1_704_110_403_000);
    }

    #[test]
    fn message_ids_use_the_wall_clock() {
        let env = SimEnv::with_seed(9);
        let id = env.message_id();
        assert!(id.starts_with("id-1704110400000-"));
        assert_eq!(id.len(), "id-1704110400000-".len() + 7);
    }
}
