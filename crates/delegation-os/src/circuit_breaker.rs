//! Circuit breaker (§4.10): used by the transport layer, not the core
//! engine, but part of this crate's exported surface since transports built
//! against it need a shared implementation.
//!
//! `CLOSED` → (`failure_threshold` consecutive failures) → `OPEN` →
//! (after `reset_timeout` elapses) → `HALF_OPEN` → (any success) `CLOSED`
//! or (any failure) `OPEN`. In `HALF_OPEN`, at most `half_open_max_attempts`
//! probes are permitted before the breaker reverts to `OPEN`.

use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Clone, Debug)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub reset_timeout: Duration,
    pub half_open_max_attempts: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_timeout: Duration::from_secs(30),
            half_open_max_attempts: 1,
        }
    }
}

pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    state: CircuitState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
    half_open_attempts: u32,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            state: CircuitState::Closed,
            consecutive_failures: 0,
            opened_at: None,
            half_open_attempts: 0,
        }
    }

    pub fn state(&self) -> CircuitState {
        self.state
    }

    /// Whether a call is currently permitted. `Open` transitions to
    /// `HalfOpen` here once `reset_timeout` has elapsed, consuming this
    /// check as the transition trigger rather than requiring a separate
    /// tick.
    pub fn allow_request(&mut self, now: Instant) -> bool {
        match self.state {
            CircuitState::Closed => true,
            CircuitState::Open => {
                let elapsed = self
                    .opened_at
                    .map(|opened_at| now.duration_since(opened_at))
                    .unwrap_or(Duration::ZERO);
                if elapsed >= self.config.reset_timeout {
                    self.state = CircuitState::HalfOpen;
                    self.half_open_attempts = 0;
                    self.allow_request(now)
                } else {
                    false
                }
            }
            CircuitState::HalfOpen => self.half_open_attempts < self.config.half_open_max_attempts,
        }
    }

    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
        self.half_open_attempts = 0;
        self.state = CircuitState::Closed;
        self.opened_at = None;
    }

    pub fn record_failure(&mut self, now: Instant) {
        match self.state {
            CircuitState::Closed => {
                self.consecutive_failures += 1;
                if self.consecutive_failures >= self.config.failure_threshold {
                    self.trip(now);
                }
            }
            CircuitState::HalfOpen => {
                self.half_open_attempts += 1;
                self.trip(now);
            }
            CircuitState::Open => {}
        }
    }

    fn trip(&mut self, now: Instant) {
        self.state = CircuitState::Open;
        self.opened_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_after_threshold_consecutive_failures() {
        let mut breaker = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 3,
            ..Default::default()
        });
        let now = Instant::now();
        for _ in 0..2 {
            breaker.record_failure(now);
        }
        assert_eq!(breaker.state(), CircuitState::Closed);
        breaker.record_failure(now);
        assert_eq!(breaker.state(), CircuitState::Open);
    }

    #[test]
    fn half_open_allows_bounded_probes_then_reopens_on_failure() {
        let mut breaker = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 1,
            reset_timeout: Duration::from_millis(0),
            half_open_max_attempts: 1,
        });
        let now = Instant::now();
        breaker.record_failure(now);
        assert_eq!(breaker.state(), CircuitState::Open);

        assert!(breaker.allow_request(now));
        assert_eq!(breaker.state(), CircuitState::HalfOpen);

        breaker.record_failure(now);
        assert_eq!(breaker.state(), CircuitState::Open);
    }

    #[test]
    fn success_in_half_open_closes_the_breaker() {
        let mut breaker = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 1,
            reset_timeout: Duration::from_millis(0),
            half_open_max_attempts: 1,
        });
        let now = Instant::now();
        breaker.record_failure(now);
        assert!(breaker.allow_request(now));
        breaker.record_success();
        assert_eq!(breaker.state(), CircuitState::Closed);
    }
}
