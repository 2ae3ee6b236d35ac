// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Startup connection loop.
//!
//! The HTTP listener is not bound until the search engine answers. Each failed
//! attempt waits a fixed delay and tries again, forever unless a maximum
//! number of attempts is configured.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// Delay used between connection attempts unless configured otherwise
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delay: Duration,
    /// `None` retries forever
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay: DEFAULT_RETRY_DELAY,
            max_attempts: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectState {
    /// Attempt number `attempt` (1-based) is in flight
    Connecting { attempt: u32 },
    Ready,
}

impl ConnectState {
    pub fn initial() -> Self {
        ConnectState::Connecting { attempt: 1 }
    }

    /// State after a failed attempt, or `None` when the policy gives up.
    pub fn on_failure(self, policy: &RetryPolicy) -> Option<Self> {
        match self {
            ConnectState::Connecting { attempt } => {
                if policy.max_attempts.is_some_and(|max| attempt >= max) {
                    None
                } else {
                    Some(ConnectState::Connecting {
                        attempt: attempt + 1,
                    })
                }
            }
            ConnectState::Ready => Some(ConnectState::Ready),
        }
    }

    pub fn on_success(self) -> Self {
        ConnectState::Ready
    }
}

impl std::fmt::Display for ConnectState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectState::Connecting { attempt } => write!(f, "connecting (attempt {})", attempt),
            ConnectState::Ready => write!(f, "ready"),
        }
    }
}

/// Run `connect` until it succeeds or the policy gives up.
///
/// On give-up the error from the last attempt is returned.
pub async fn connect_with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    mut connect: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut state = ConnectState::initial();

    loop {
        match connect().await {
            Ok(value) => {
                info!(from = %state, to = %state.on_success(), "Search engine connection ready");
                return Ok(value);
            }
            Err(e) => {
                let Some(next) = state.on_failure(policy) else {
                    error!(state = %state, error = %e, "Giving up connecting to search engine");
                    return Err(e);
                };
                warn!(
                    state = %state,
                    error = %e,
                    retry_in = ?policy.delay,
                    "Search engine not available yet"
                );
                sleep(policy.delay).await;
                state = next;
            }
        }
    }
}
