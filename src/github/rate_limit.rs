// src/github/rate_limit.rs
// =============================================================================
// The rate-limit guard.
//
// GitHub reports the remaining quota on every response:
//   x-ratelimit-remaining: 4999
//   x-ratelimit-reset:     1700000000   (epoch seconds)
//
// We trust those counters instead of estimating locally. After every call the
// client asks the guard whether the budget is spent; if it is, the run stops
// with a wait hint. There is no retry.
// =============================================================================

use reqwest::header::HeaderMap;

use super::error::GitHubError;

/// Quota snapshot taken from the most recent response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitState {
    pub remaining: i64,
    pub reset_at: i64,
}

impl RateLimitState {
    // Reads the quota headers, returning None if either is missing or malformed
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let remaining = headers
            .get("x-ratelimit-remaining")?
            .to_str()
            .ok()?
            .trim()
            .parse::<i64>()
            .ok()?;
        let reset_at = headers
            .get("x-ratelimit-reset")?
            .to_str()
            .ok()?
            .trim()
            .parse::<i64>()
            .ok()?;

        Some(Self {
            remaining,
            reset_at,
        })
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining <= 0
    }

    // Whole seconds until the window resets, never negative
    pub fn seconds_until_reset(&self, now: i64) -> u64 {
        u64::try_from(self.reset_at.saturating_sub(now)).unwrap_or(0)
    }

    // Fails with RateLimitExceeded once the budget is spent
    pub fn check(&self, now: i64, authenticated: bool) -> Result<(), GitHubError> {
        if self.is_exhausted() {
            return Err(GitHubError::RateLimitExceeded {
                wait_seconds: self.seconds_until_reset(now),
                authenticated,
            });
        }
        Ok(())
    }
}
