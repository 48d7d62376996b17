use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RetryError {
    #[error("retry limit reached after {0} attempts")]
    Exhausted(u32),
}

/// Re-runs an operation at a fixed interval until it produces a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: Option<u32>,
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: None,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Gives up after `attempts` calls in total.
    pub fn limited(attempts: u32, delay: Duration) -> Self {
        RetryPolicy {
            max_attempts: Some(attempts.max(1)),
            delay,
        }
    }

    pub fn unlimited(delay: Duration) -> Self {
        RetryPolicy {
            max_attempts: None,
            delay,
        }
    }

    pub fn run<T, F>(&self, mut op: F) -> Result<T, RetryError>
    where
        F: FnMut() -> Option<T>,
    {
        let mut attempts = 0u32;
        loop {
            attempts = attempts.saturating_add(1);
            if let Some(value) = op() {
                return Ok(value);
            }

            if self.max_attempts.is_some_and(|max| attempts >= max) {
                return Err(RetryError::Exhausted(attempts));
            }
            debug!("attempt {} returned nothing, retrying in {:?}", attempts, self.delay);
            thread::sleep(self.delay);
        }
    }
}
