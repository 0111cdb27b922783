use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use std::time::Duration;

/// Controls when a workflow step that failed (e.g. the mail server rejected the assignment email)
/// runs again, and how many times it does so before the workflow is marked as `FAILED`.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Hash, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StepRetryStrategy {
    /// Every retry is delayed by the same `interval`.
    Constant {
        #[serde_as(as = "DurationMilliSeconds<u64>")]
        interval: Duration,
        max_attempts: u32,
    },
    /// N-th retry is delayed by `initial_interval * multiplier^n`, capped at `max_interval`.
    Exponential {
        #[serde_as(as = "DurationMilliSeconds<u64>")]
        initial_interval: Duration,
        multiplier: u32,
        #[serde_as(as = "DurationMilliSeconds<u64>")]
        max_interval: Duration,
        max_attempts: u32,
    },
    /// N-th retry is delayed by `initial_interval + increment * n`, capped at `max_interval`.
    Linear {
        #[serde_as(as = "DurationMilliSeconds<u64>")]
        initial_interval: Duration,
        #[serde_as(as = "DurationMilliSeconds<u64>")]
        increment: Duration,
        #[serde_as(as = "DurationMilliSeconds<u64>")]
        max_interval: Duration,
        max_attempts: u32,
    },
}

impl StepRetryStrategy {
    /// Returns how long to wait before re-running a step that has already been retried
    /// `retries_so_far` times, or `None` if the step is out of retries.
    pub fn next_retry_in(&self, retries_so_far: u32) -> Option<Duration> {
        if retries_so_far >= self.max_attempts() {
            return None;
        }

        Some(self.delay(retries_so_far + 1))
    }

    /// Number of times a failed step is re-run, the first run isn't counted.
    pub fn max_attempts(&self) -> u32 {
        let (Self::Constant { max_attempts, .. }
        | Self::Exponential { max_attempts, .. }
        | Self::Linear { max_attempts, .. }) = *self;
        max_attempts
    }

    fn delay(&self, retry: u32) -> Duration {
        let (delay, cap) = match *self {
            Self::Constant { interval, .. } => return interval,
            Self::Exponential {
                initial_interval,
                multiplier,
                max_interval,
                ..
            } => (
                multiplier
                    .checked_pow(retry)
                    .and_then(|factor| initial_interval.checked_mul(factor)),
                max_interval,
            ),
            Self::Linear {
                initial_interval,
                increment,
                max_interval,
                ..
            } => (
                increment
                    .checked_mul(retry)
                    .and_then(|growth| initial_interval.checked_add(growth)),
                max_interval,
            ),
        };

        // Overflow means the delay is way past the cap anyway.
        delay.map_or(cap, |delay| delay.min(cap))
    }
}
