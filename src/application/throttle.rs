//! Per-session login attempt counter.
//!
//! The counter lives in the session, so a new session starts from zero.
//! It only slows down a single interactive user.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

pub const MAX_LOGIN_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoginThrottle {
    attempts: u32,
    locked_at: Option<DateTime<Utc>>,
}

impl LoginThrottle {
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn locked_at(&self) -> Option<DateTime<Utc>> {
        self.locked_at
    }

    /// Attempts left before the lockout starts.
    pub fn remaining(&self) -> u32 {
        MAX_LOGIN_ATTEMPTS.saturating_sub(self.attempts)
    }

    /// Admits an attempt, or returns how long the caller must wait.
    ///
    /// An expired lockout resets the counter.
    pub fn check(&mut self, now: DateTime<Utc>, lockout: Duration) -> Result<(), Duration> {
        if self.attempts < MAX_LOGIN_ATTEMPTS {
            return Ok(());
        }
        let locked_at = *self.locked_at.get_or_insert(now);
        let elapsed = now - locked_at;
        if elapsed >= lockout {
            self.reset();
            Ok(())
        } else {
            Err(lockout - elapsed)
        }
    }

    pub fn record_failure(&mut self, now: DateTime<Utc>) {
        self.attempts = self.attempts.saturating_add(1);
        if self.attempts >= MAX_LOGIN_ATTEMPTS && self.locked_at.is_none() {
            self.locked_at = Some(now);
        }
    }

    pub fn reset(&mut self) {
        self.attempts = 0;
        self.locked_at = None;
    }
}
