use chrono::{DateTime, Utc};

use crate::time::clock::Clock;

/// A [`Clock`] backed by the operating system's wall clock.
///
/// Selecting the clock is the responsibility of the composition root
/// (`main.rs`); everything else treats [`Clock`] as a trusted source.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
