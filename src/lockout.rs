//! Progressive lockout for failed unlock attempts.
//!
//! A pure state machine over `LockoutState`: callers pass the current
//! state and clock in, and get a new state out.  Persistence belongs to
//! the store boundary, and the wall clock belongs to the orchestrator —
//! nothing here reads `Utc::now()` itself, which keeps every transition
//! a total, testable function.
//!
//! Escalation: crossing the attempt threshold locks the vault for
//! `LOCK_DURATIONS[min(lock_cycle, last)]` and bumps `lock_cycle`.  The
//! cycle is long-term memory — a successful unlock clears the counter
//! and the lock, but never the cycle.  Only a factory reset does.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Failed attempts tolerated before a lock window is entered.
pub const MAX_ATTEMPTS: u32 = 5;

/// Escalating lock durations, indexed by `lock_cycle` (capped at the
/// last entry): 5 min, 5 min, 20 min, 5 h.
const LOCK_DURATIONS_SECS: [i64; 4] = [5 * 60, 5 * 60, 20 * 60, 5 * 60 * 60];

/// Persisted lockout bookkeeping.
///
/// The initial state (`Default`) is `{0, None, 0}` — also what the store
/// reports when nothing has been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LockoutState {
    /// Failed attempts since the last success or lock expiry.
    #[serde(default)]
    pub failed_attempts: u32,

    /// End of the active lock window, if one is in effect.
    #[serde(default)]
    pub locked_until: Option<DateTime<Utc>>,

    /// How many times the attempt threshold has been crossed.
    #[serde(default)]
    pub lock_cycle: u32,
}

/// Snapshot answer to "is the vault locked right now?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockStatus {
    pub locked: bool,
    /// Seconds until the lock expires, ceiling-rounded.  Zero when open.
    pub remaining_seconds: u64,
}

/// Lock duration for the given cycle, capped at the table's last entry.
pub fn lock_duration(lock_cycle: u32) -> Duration {
    let index = (lock_cycle as usize).min(LOCK_DURATIONS_SECS.len() - 1);
    Duration::seconds(LOCK_DURATIONS_SECS[index])
}

/// Record a failed unlock attempt.
///
/// Reaching `MAX_ATTEMPTS` enters a lock window: `locked_until` is set,
/// `lock_cycle` increments, and the attempt counter resets so the next
/// window starts fresh after the lock expires.
pub fn record_failure(state: LockoutState, now: DateTime<Utc>) -> LockoutState {
    let attempts = state.failed_attempts + 1;

    if attempts >= MAX_ATTEMPTS {
        return LockoutState {
            failed_attempts: 0,
            locked_until: Some(now + lock_duration(state.lock_cycle)),
            lock_cycle: state.lock_cycle + 1,
        };
    }

    LockoutState {
        failed_attempts: attempts,
        ..state
    }
}

/// Record a successful unlock (or an accepted biometric result).
///
/// Clears the counter and any lock window; `lock_cycle` is deliberately
/// preserved as escalation memory.
pub fn record_success(state: LockoutState) -> LockoutState {
    LockoutState {
        failed_attempts: 0,
        locked_until: None,
        lock_cycle: state.lock_cycle,
    }
}

/// Report whether the state is locked at `now`.
///
/// An expired `locked_until` reports open; callers should follow up with
/// `normalize` so the stale window is cleared before the next decision.
pub fn check_status(state: &LockoutState, now: DateTime<Utc>) -> LockStatus {
    match state.locked_until {
        Some(until) if now < until => {
            let millis = (until - now).num_milliseconds().max(0);
            LockStatus {
                locked: true,
                remaining_seconds: ((millis + 999) / 1000) as u64,
            }
        }
        _ => LockStatus {
            locked: false,
            remaining_seconds: 0,
        },
    }
}

/// Clear an expired lock window, preserving `lock_cycle`.
///
/// A still-active lock (and an unlocked state) passes through unchanged.
/// Must run before any decision so a stale window is never treated as
/// active — and so its attempt counter never carries over.
pub fn normalize(state: LockoutState, now: DateTime<Utc>) -> LockoutState {
    match state.locked_until {
        Some(until) if now >= until => LockoutState {
            failed_attempts: 0,
            locked_until: None,
            lock_cycle: state.lock_cycle,
        },
        _ => state,
    }
}
