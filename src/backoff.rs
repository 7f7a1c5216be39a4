//! Retry delay between failed publish attempts.
//!
//! The delay grows as `delay^1.02` after every failure and converges to the
//! configured maximum.

/// Exponent applied to the current delay on every failure.
pub const GROWTH_EXPONENT: f64 = 1.02;

/// Backoff state of a single publish call.
///
/// Every call starts from a fresh value, so a success needs no explicit reset.
/// Delays are kept in milliseconds and stay within `[initial, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    max_ms: u64,
    current_ms: u64,
}

impl Backoff {
    /// Creates a backoff starting at `initial_ms`, capped at `max_ms`.
    pub fn new(initial_ms: u64, max_ms: u64) -> Self {
        Self {
            max_ms,
            current_ms: initial_ms.min(max_ms),
        }
    }

    /// The delay to wait before the next attempt.
    pub fn current_ms(&self) -> u64 {
        self.current_ms
    }

    /// Grows the delay after a failure and returns the new value.
    pub fn advance(&mut self) -> u64 {
        let grown = libm::pow(self.current_ms as f64, GROWTH_EXPONENT) as u64;
        self.current_ms = grown.clamp(self.current_ms, self.max_ms);
        self.current_ms
    }
}
