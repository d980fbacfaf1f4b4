use crate::error::{Result, ScanError};
use crate::identity::IdentityPool;
use rand::Rng;
use std::time::Duration;

/// Bounded retry with exponential backoff and uniform jitter.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_secs: f64,
    pub jitter: (f64, f64),
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay_secs: f64, jitter: (f64, f64)) -> Result<Self> {
        if max_attempts == 0 {
            return Err(ScanError::InvalidPolicy(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if !base_delay_secs.is_finite() || base_delay_secs < 0.0 {
            return Err(ScanError::InvalidPolicy(format!(
                "base delay must be a non-negative number of seconds, got {}",
                base_delay_secs
            )));
        }
        let (lo, hi) = jitter;
        if !lo.is_finite() || !hi.is_finite() || lo < 0.0 || lo > hi {
            return Err(ScanError::InvalidPolicy(format!(
                "jitter range must satisfy 0 <= lo <= hi, got ({}, {})",
                lo, hi
            )));
        }

        Ok(Self {
            max_attempts,
            base_delay_secs,
            jitter,
        })
    }

    /// Deterministic part of the delay before attempt `attempt + 1` (0-indexed).
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let factor = 2f64.powi(attempt.min(30) as i32);
        Duration::from_secs_f64(self.base_delay_secs * factor)
    }

    pub fn backoff_delay<R: Rng>(&self, attempt: u32, rng: &mut R) -> Duration {
        self.base_delay(attempt) + self.sample_jitter(rng)
    }

    pub fn sample_jitter<R: Rng>(&self, rng: &mut R) -> Duration {
        let (lo, hi) = self.jitter;
        if hi > lo {
            Duration::from_secs_f64(rng.gen_range(lo..hi))
        } else {
            Duration::from_secs_f64(lo)
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 1.0,
            jitter: (0.1, 0.5),
        }
    }
}

/// Whether TLS certificates of probed endpoints are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsVerification {
    Enforce,
    /// Self-issued and expired certificates are common among these endpoints.
    #[default]
    Bypass,
}

/// What to do with a success status whose body is not a recognizable collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeakBodyPolicy {
    #[default]
    Accept,
    Retry,
}

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub retry: RetryPolicy,
    pub request_timeout: Duration,
    pub tls: TlsVerification,
    pub weak_body: WeakBodyPolicy,
    pub identities: IdentityPool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            request_timeout: Duration::from_secs(10),
            tls: TlsVerification::default(),
            weak_body: WeakBodyPolicy::default(),
            identities: IdentityPool::default(),
        }
    }
}
