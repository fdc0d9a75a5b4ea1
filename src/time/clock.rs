use chrono::{DateTime, Utc};

/// A port that provides the **current instant** to session expiry logic.
///
/// # Purpose
/// Session lifetimes are measured from the last write. Routing every
/// "now" through this trait keeps expiry deterministic under test: a
/// manual clock can be advanced past the TTL without sleeping.
///
/// # Typical Implementations
/// - [`SystemClock`](crate::time::system_clock::SystemClock): wall-clock UTC
/// - a manual clock in tests
pub trait Clock: Send + Sync {
    /// Returns the current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}
