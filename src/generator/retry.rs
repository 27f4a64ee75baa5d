//! Delay between credential attempts.

use std::time::Duration;

use crate::error::FailureKind;

const RATE_LIMITED_BACKOFF_SECS: u64 = 2;
const DEFAULT_BACKOFF_SECS: u64 = 1;

/// Fixed delays slept before retrying with the next credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub rate_limited: Duration,
    pub other: Duration,
}

impl BackoffPolicy {
    /// No delay at all; for tests and local endpoints.
    pub fn none() -> Self {
        Self {
            rate_limited: Duration::ZERO,
            other: Duration::ZERO,
        }
    }

    pub fn delay_for(&self, kind: FailureKind) -> Duration {
        match kind {
            FailureKind::RateLimited => self.rate_limited,
            FailureKind::Transient | FailureKind::Malformed => self.other,
        }
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            rate_limited: Duration::from_secs(RATE_LIMITED_BACKOFF_SECS),
            other: Duration::from_secs(DEFAULT_BACKOFF_SECS),
        }
    }
}
