//! Connection retry pacing
//!
//! In Idle the controller attempts a broker connect on every tick. With
//! [`RetryPolicy::Backoff`] the attempts are spaced out exponentially until
//! one succeeds.

/// How connect attempts are paced while Idle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RetryPolicy {
    /// Attempt on every tick
    #[default]
    Continuous,
    /// Double the wait after every failure, from `initial_ms` up to `max_ms`
    Backoff { initial_ms: u32, max_ms: u32 },
}

/// Tracks the retry window for broker connects
#[derive(Debug, Clone)]
pub struct ConnectBackoff {
    policy: RetryPolicy,
    current_ms: u32,
    next_retry_at: u64,
}

impl ConnectBackoff {
    pub fn new(policy: RetryPolicy) -> Self {
        let policy = match policy {
            RetryPolicy::Backoff { initial_ms, max_ms } => {
                let initial_ms = initial_ms.max(1);
                RetryPolicy::Backoff {
                    initial_ms,
                    max_ms: max_ms.max(initial_ms),
                }
            }
            RetryPolicy::Continuous => RetryPolicy::Continuous,
        };
        Self {
            policy,
            current_ms: Self::initial_ms(&policy),
            next_retry_at: 0,
        }
    }

    fn initial_ms(policy: &RetryPolicy) -> u32 {
        match policy {
            RetryPolicy::Continuous => 0,
            RetryPolicy::Backoff { initial_ms, .. } => *initial_ms,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Record a failed attempt at `now_ms` and push the next window out
    pub fn mark_failure(&mut self, now_ms: u64) {
        if let RetryPolicy::Backoff { max_ms, .. } = self.policy {
            self.next_retry_at = now_ms.saturating_add(u64::from(self.current_ms));
            self.current_ms = self.current_ms.saturating_mul(2).min(max_ms);
        }
    }

    /// Reset after a successful connect
    pub fn mark_success(&mut self, now_ms: u64) {
        self.current_ms = Self::initial_ms(&self.policy);
        self.next_retry_at = now_ms;
    }

    pub fn should_retry(&self, now_ms: u64) -> bool {
        now_ms >= self.next_retry_at
    }

    /// Delay that the next failure will apply
    pub fn current_delay_ms(&self) -> u32 {
        self.current_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continuous_always_retries() {
        let mut backoff = ConnectBackoff::new(RetryPolicy::Continuous);
        for now in [0u64, 100, 200] {
            assert!(backoff.should_retry(now));
            backoff.mark_failure(now);
        }
        assert!(backoff.should_retry(200));
    }

    #[test]
    fn test_backoff_doubles_until_max() {
        let mut backoff = ConnectBackoff::new(RetryPolicy::Backoff {
            initial_ms: 1000,
            max_ms: 3000,
        });

        backoff.mark_failure(0);
        assert!(!backoff.should_retry(999));
        assert!(backoff.should_retry(1000));

        backoff.mark_failure(1000);
        assert!(!backoff.should_retry(2999));
        assert!(backoff.should_retry(3000));

        backoff.mark_failure(3000);
        assert_eq!(backoff.current_delay_ms(), 3000);
        assert!(backoff.should_retry(6000));
    }

    #[test]
    fn test_success_resets_window() {
        let mut backoff = ConnectBackoff::new(RetryPolicy::Backoff {
            initial_ms: 500,
            max_ms: 4000,
        });
        backoff.mark_failure(0);
        backoff.mark_failure(500);
        backoff.mark_success(1500);

        assert!(backoff.should_retry(1500));
        assert_eq!(backoff.current_delay_ms(), 500);
    }

    #[test]
    fn test_bounds_are_normalized() {
        let backoff = ConnectBackoff::new(RetryPolicy::Backoff {
            initial_ms: 0,
            max_ms: 0,
        });
        assert_eq!(
            backoff.policy(),
            RetryPolicy::Backoff {
                initial_ms: 1,
                max_ms: 1
            }
        );
    }
}
