//! Circuit breaker for backend protection.
//!
//! # States
//! - Closed: calls pass through, outcomes recorded
//! - Open: calls rejected immediately without contacting the backend
//! - Half-Open: exactly one trial call permitted, all others rejected
//!
//! # State Transitions
//! ```text
//! Closed → Open: window holds >= min_calls and failure ratio >= threshold
//! Open → Half-Open: open_duration elapsed, next caller becomes the trial
//! Half-Open → Closed: trial succeeds (window reset)
//! Half-Open → Open: trial fails (window reset, fresh Open timestamp)
//! ```
//!
//! # Design Decisions
//! - Per-identifier breaker; routes sharing an identifier share state
//! - Window append and state transition happen under one lock, so
//!   concurrent outcomes can never race a transition
//! - Rejections are not outcomes: an Open rejection never touches the window
//! - Call admission is a RAII permit; a trial permit dropped without an
//!   outcome frees the trial slot instead of wedging Half-Open

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::config::BreakerConfig;

/// Breaker tuning, shared by every breaker a registry creates.
#[derive(Debug, Clone)]
pub struct BreakerPolicy {
    /// Bounded size of the outcome window.
    pub window_size: usize,
    /// Failure ratio within the window that trips the breaker.
    pub failure_rate_threshold: f64,
    /// Minimum outcomes in the window before the ratio is evaluated.
    pub min_calls: usize,
    /// How long the breaker stays open before permitting a trial.
    pub open_duration: Duration,
}

impl From<&BreakerConfig> for BreakerPolicy {
    fn from(config: &BreakerConfig) -> Self {
        Self {
            window_size: config.window_size,
            failure_rate_threshold: config.failure_rate_threshold,
            min_calls: config.min_calls,
            open_duration: Duration::from_secs(config.open_duration_secs),
        }
    }
}

impl Default for BreakerPolicy {
    fn default() -> Self {
        Self::from(&BreakerConfig::default())
    }
}

/// Observable breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CircuitState {
    #[default]
    Closed,
    Open,
    HalfOpen,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitState::Closed => write!(f, "closed"),
            CircuitState::Open => write!(f, "open"),
            CircuitState::HalfOpen => write!(f, "half-open"),
        }
    }
}

/// Outcome of a permitted call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// Rejection raised when the breaker refuses a call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("circuit breaker {id} is open")]
pub struct BreakerRejected {
    pub id: String,
}

#[derive(Debug)]
enum State {
    Closed,
    Open { since: Instant },
    HalfOpen { trial_in_flight: bool },
}

#[derive(Debug)]
struct Inner {
    state: State,
    window: VecDeque<Outcome>,
}

/// Per-identifier circuit breaker.
///
/// All mutation goes through [`CircuitBreaker::try_acquire`] and the permit
/// it returns; the window and state are never exposed for direct writes.
#[derive(Debug)]
pub struct CircuitBreaker {
    id: String,
    policy: BreakerPolicy,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    fn new(id: impl Into<String>, policy: BreakerPolicy) -> Self {
        Self {
            id: id.into(),
            policy,
            inner: Mutex::new(Inner {
                state: State::Closed,
                window: VecDeque::new(),
            }),
        }
    }

    /// Ask permission to place a call.
    ///
    /// Returns a permit the caller must resolve with [`CallPermit::record`]
    /// once the call completes. A rejection never touches the window.
    pub fn try_acquire(self: Arc<Self>) -> Result<CallPermit, BreakerRejected> {
        let mut inner = self.inner.lock().expect("breaker lock poisoned");
        match inner.state {
            State::Closed => Ok(CallPermit::new(Arc::clone(&self), false)),
            State::Open { since } => {
                if since.elapsed() >= self.policy.open_duration {
                    inner.state = State::HalfOpen {
                        trial_in_flight: true,
                    };
                    tracing::info!(breaker = %self.id, "transitioning to half-open, admitting trial call");
                    Ok(CallPermit::new(Arc::clone(&self), true))
                } else {
                    Err(BreakerRejected {
                        id: self.id.clone(),
                    })
                }
            }
            State::HalfOpen {
                ref mut trial_in_flight,
            } => {
                if *trial_in_flight {
                    Err(BreakerRejected {
                        id: self.id.clone(),
                    })
                } else {
                    *trial_in_flight = true;
                    Ok(CallPermit::new(Arc::clone(&self), true))
                }
            }
        }
    }

    /// Current state, for observation only.
    pub fn state(&self) -> CircuitState {
        let inner = self.inner.lock().expect("breaker lock poisoned");
        match inner.state {
            State::Closed => CircuitState::Closed,
            State::Open { .. } => CircuitState::Open,
            State::HalfOpen { .. } => CircuitState::HalfOpen,
        }
    }

    /// Outcomes currently held in the window.
    pub fn window_len(&self) -> usize {
        self.inner.lock().expect("breaker lock poisoned").window.len()
    }

    fn record_outcome(&self, trial: bool, outcome: Outcome) {
        let mut inner = self.inner.lock().expect("breaker lock poisoned");

        if trial {
            match outcome {
                Outcome::Success => {
                    inner.state = State::Closed;
                    inner.window.clear();
                    tracing::info!(breaker = %self.id, "trial call succeeded, breaker closed");
                }
                Outcome::Failure => {
                    inner.state = State::Open {
                        since: Instant::now(),
                    };
                    inner.window.clear();
                    tracing::warn!(breaker = %self.id, "trial call failed, breaker re-opened");
                }
            }
            return;
        }

        // Outcomes of ordinary permitted calls always append, evicting the
        // oldest entry once the window is full.
        if inner.window.len() == self.policy.window_size {
            inner.window.pop_front();
        }
        inner.window.push_back(outcome);

        // Only a Closed breaker can trip; outcomes landing after a
        // concurrent transition are recorded without re-evaluation.
        if let State::Closed = inner.state {
            let total = inner.window.len();
            if total >= self.policy.min_calls {
                let failures = inner
                    .window
                    .iter()
                    .filter(|o| matches!(o, Outcome::Failure))
                    .count();
                let ratio = failures as f64 / total as f64;
                if ratio >= self.policy.failure_rate_threshold {
                    inner.state = State::Open {
                        since: Instant::now(),
                    };
                    tracing::warn!(
                        breaker = %self.id,
                        failures,
                        window = total,
                        "failure ratio reached threshold, breaker opened"
                    );
                }
            }
        }
    }

    /// A trial permit was dropped without an outcome (cancelled call);
    /// free the slot so the next caller can run the trial.
    fn release_trial(&self) {
        let mut inner = self.inner.lock().expect("breaker lock poisoned");
        if let State::HalfOpen {
            ref mut trial_in_flight,
        } = inner.state
        {
            *trial_in_flight = false;
        }
    }
}

/// Permission to place one call, held for the call's lifetime.
#[derive(Debug)]
pub struct CallPermit {
    breaker: Arc<CircuitBreaker>,
    trial: bool,
    recorded: bool,
}

impl CallPermit {
    fn new(breaker: Arc<CircuitBreaker>, trial: bool) -> Self {
        Self {
            breaker,
            trial,
            recorded: false,
        }
    }

    /// Whether this permit is the single Half-Open trial.
    pub fn is_trial(&self) -> bool {
        self.trial
    }

    /// Resolve the call with its outcome, consuming the permit.
    pub fn record(mut self, outcome: Outcome) {
        self.recorded = true;
        self.breaker.record_outcome(self.trial, outcome);
    }
}

impl Drop for CallPermit {
    fn drop(&mut self) {
        if !self.recorded && self.trial {
            self.breaker.release_trial();
        }
    }
}

/// Process-wide breaker store: one breaker per identifier, created on first
/// use and kept for the process lifetime.
pub struct BreakerRegistry {
    policy: BreakerPolicy,
    breakers: DashMap<String, Arc<CircuitBreaker>>,
}

impl BreakerRegistry {
    pub fn new(policy: BreakerPolicy) -> Self {
        Self {
            policy,
            breakers: DashMap::new(),
        }
    }

    /// Get the breaker for an identifier, creating it on first use.
    pub fn get_or_create(&self, id: &str) -> Arc<CircuitBreaker> {
        self.breakers
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(CircuitBreaker::new(id, self.policy.clone())))
            .clone()
    }

    /// States of all known breakers.
    pub fn states(&self) -> Vec<(String, CircuitState)> {
        self.breakers
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().state()))
            .collect()
    }
}
