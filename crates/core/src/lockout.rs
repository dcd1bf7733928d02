//! Failed-login lockout policy.
//!
//! A pure decision object: given the persisted counters and the current
//! time it answers "may this account attempt a login" and "does this
//! failure trip the lock". The duration is flat (no exponential backoff);
//! keeping it on the policy struct makes it tunable without touching the
//! login flow.

use chrono::Duration;

use crate::types::Timestamp;

/// Default consecutive-failure threshold before locking.
const DEFAULT_MAX_FAILED_ATTEMPTS: i32 = 5;

/// Default lock duration in minutes.
const DEFAULT_LOCK_DURATION_MINS: i64 = 30;

/// Outcome of the pre-password lockout gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginGate {
    /// The account may proceed to password verification.
    Allow,
    /// The account is locked until the contained timestamp.
    Locked { until: Timestamp },
}

/// Tunable lockout policy.
#[derive(Debug, Clone)]
pub struct LockoutPolicy {
    /// Consecutive failures that trigger a lock.
    pub max_failed_attempts: i32,
    /// How long a tripped lock lasts, in minutes.
    pub lock_duration_mins: i64,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_failed_attempts: DEFAULT_MAX_FAILED_ATTEMPTS,
            lock_duration_mins: DEFAULT_LOCK_DURATION_MINS,
        }
    }
}

impl LockoutPolicy {
    /// Evaluate the lockout gate for a login attempt.
    ///
    /// A `locked_until` in the future denies the attempt regardless of
    /// password correctness; an elapsed or absent lock allows it.
    pub fn evaluate(&self, locked_until: Option<Timestamp>, now: Timestamp) -> LoginGate {
        match locked_until {
            Some(until) if until > now => LoginGate::Locked { until },
            _ => LoginGate::Allow,
        }
    }

    /// Compute the lock expiry after a failed attempt, if the new failure
    /// count reaches the threshold. `failed_attempts` is the count
    /// *including* the failure being recorded.
    pub fn lock_after_failure(&self, failed_attempts: i32, now: Timestamp) -> Option<Timestamp> {
        if failed_attempts >= self.max_failed_attempts {
            Some(now + Duration::minutes(self.lock_duration_mins))
        } else {
            None
        }
    }
}
