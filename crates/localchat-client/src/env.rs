//! Environment abstraction for deterministic testing.
//!
//! Decouples the engine from system resources (clocks, randomness). The
//! monotonic clock drives typing expiry. The wall clock stamps outbound
//! messages. Randomness feeds message and reaction ids.

use std::{ops::Sub, time::Duration};

use rand::RngCore;

/// Local wall-clock reading in the formats the wire expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalStamp {
    /// `HH:MM`
    pub time: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// Milliseconds since the Unix epoch
    pub unix_millis: i64,
}

/// Abstract environment providing time and randomness.
///
/// Implementations MUST guarantee that `now()` never goes backwards.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Monotonic instant type.
    ///
    /// Production uses `std::time::Instant`. Simulation uses a virtual clock.
    type Instant: Copy + Ord + Send + Sync + Sub<Output = Duration> + 'static;

    /// Current monotonic time.
    fn now(&self) -> Self::Instant;

    /// Current local wall-clock time.
    fn local_stamp(&self) -> LocalStamp;

    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a random `u64`.
    fn random_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }

    /// Fresh message id: `id-<unix millis>-<7 base36 chars>`.
    fn message_id(&self) -> String {
        let millis = self.local_stamp().unix_millis;
        let suffix: String = (0..7)
            .map(|_| char::from_digit((self.random_u64() % 36) as u32, 36).unwrap_or('0'))
            .collect();
        format!("id-{millis}-{suffix}")
    }

    /// Fresh reaction id (UUID v4).
    fn reaction_id(&self) -> String {
        let mut bytes = [0u8; 16];
        self.random_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid().to_string()
    }
}

/// Production environment using the system clocks and thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    type Instant = std::time::Instant;

    fn now(&self) -> Self::Instant {
        std::time::Instant::now()
    }

    fn local_stamp(&self) -> LocalStamp {
        let now = chrono::Local::now();
        LocalStamp {
            time: now.format("%H:%M").to_string(),
            date: now.format("%Y-%m-%d").to_string(),
            unix_millis: now.timestamp_millis(),
        }
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        rand::thread_rng().fill_bytes(buffer);
    }
}
