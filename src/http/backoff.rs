//! Retry delay strategies
//!
//! The executor never sleeps directly; it asks a `RetryDelay` to wait before
//! each retry. Tests inject a recording implementation that returns
//! immediately.

use crate::types::BackoffType;
use async_trait::async_trait;
use std::time::Duration;

/// Something that can wait before a retry
#[async_trait]
pub trait RetryDelay: Send + Sync {
    /// Wait before retry number `attempt` (1-based)
    async fn wait(&self, attempt: u32);
}

/// Backoff computed from a `BackoffType`, sleeping on the tokio timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffDelay {
    backoff_type: BackoffType,
    initial: Duration,
    max: Duration,
}

impl BackoffDelay {
    /// Create a backoff strategy
    pub fn new(backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        Self {
            backoff_type,
            initial,
            max,
        }
    }

    /// Same delay before every retry
    pub fn fixed(delay: Duration) -> Self {
        Self::new(BackoffType::Constant, delay, delay)
    }

    /// Delay before retry number `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let step = attempt.saturating_sub(1);
        let delay = match self.backoff_type {
            BackoffType::Constant => self.initial,
            BackoffType::Linear => self.initial.saturating_mul(step + 1),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(step);
                self.initial.saturating_mul(factor)
            }
        };

        std::cmp::min(delay, self.max.max(self.initial))
    }
}

#[async_trait]
impl RetryDelay for BackoffDelay {
    async fn wait(&self, attempt: u32) {
        let delay = self.delay_for(attempt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
