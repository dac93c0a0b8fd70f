//! Polls a generation job until it completes, fails, times out or is cancelled.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::api::client::{ApiClient, ApiError};
use crate::api::types::{GeneratedRoute, JobProgress, JobStatus, RouteStatusResponse};
use crate::clock::Sleeper;
use crate::config::Config;

/// Anything that can report a job's status (the API client, or a fake in tests).
pub trait StatusSource {
    fn status(&self, job_id: &str) -> Result<RouteStatusResponse, ApiError>;
}

impl StatusSource for ApiClient {
    fn status(&self, job_id: &str) -> Result<RouteStatusResponse, ApiError> {
        self.route_status(job_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: crate::config::DEFAULT_POLL_INTERVAL,
            max_attempts: crate::config::DEFAULT_POLL_MAX_ATTEMPTS,
        }
    }
}

impl From<&Config> for PollConfig {
    fn from(c: &Config) -> Self {
        Self {
            interval: c.poll_interval,
            max_attempts: c.poll_max_attempts,
        }
    }
}

/// Shared cancel flag; clone it into whatever owns the poller's lifetime.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollState {
    Idle,
    Polling { attempts: u32 },
    Completed(GeneratedRoute),
    Failed(String),
    TimedOut { attempts: u32 },
    Cancelled,
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollState::Idle | PollState::Polling { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("Route generation failed: {0}")]
    JobFailed(String),

    #[error(
        "Route generation timed out after {attempts} status checks. Try again with fewer stops."
    )]
    TimedOut { attempts: u32 },

    #[error("Route generation was cancelled")]
    Cancelled,

    #[error("Job reported completion without a route")]
    MissingRoute,

    #[error(transparent)]
    Api(#[from] ApiError),
}

pub struct JobPoller<'a, S: ?Sized, Z> {
    source: &'a S,
    sleeper: Z,
    config: PollConfig,
    cancel: CancelToken,
    job_id: String,
    state: PollState,
}

impl<'a, S: StatusSource + ?Sized, Z: Sleeper> JobPoller<'a, S, Z> {
    pub fn new(source: &'a S, sleeper: Z, config: PollConfig, job_id: impl Into<String>) -> Self {
        Self {
            source,
            sleeper,
            config,
            cancel: CancelToken::new(),
            job_id: job_id.into(),
            state: PollState::Idle,
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// One transition: issues exactly one status request unless already terminal or cancelled.
    pub fn step(&mut self, on_progress: &mut dyn FnMut(&JobProgress)) -> &PollState {
        let attempts = match &self.state {
            PollState::Idle => 0,
            PollState::Polling { attempts } => *attempts,
            _ => return &self.state,
        };

        if self.cancel.is_cancelled() {
            self.state = PollState::Cancelled;
            return &self.state;
        }

        let attempts = attempts + 1;
        self.state = match self.source.status(&self.job_id) {
            Ok(resp) => match resp.status {
                JobStatus::Completed => match resp.route {
                    Some(route) => PollState::Completed(route),
                    None => PollState::Failed(PollError::MissingRoute.to_string()),
                },
                JobStatus::Failed => PollState::Failed(
                    resp.error
                        .unwrap_or_else(|| "unknown error".to_string()),
                ),
                JobStatus::Processing => {
                    if let Some(p) = &resp.progress {
                        on_progress(p);
                    }
                    PollState::Polling { attempts }
                }
            },
            Err(e) => {
                tracing::warn!(job_id = %self.job_id, attempt = attempts, error = %e, "status check failed");
                PollState::Polling { attempts }
            }
        };

        if let PollState::Polling { attempts } = self.state {
            if attempts >= self.config.max_attempts {
                self.state = PollState::TimedOut { attempts };
            }
        }

        &self.state
    }

    /// Drives `step` until a terminal state, sleeping `interval` between requests.
    pub fn run(
        mut self,
        mut on_progress: impl FnMut(&JobProgress),
    ) -> Result<GeneratedRoute, PollError> {
        loop {
            self.step(&mut on_progress);
            if self.state.is_terminal() {
                break;
            }
            if self.cancel.is_cancelled() {
                self.state = PollState::Cancelled;
                break;
            }
            self.sleeper.sleep(self.config.interval);
        }

        match self.state {
            PollState::Completed(route) => Ok(route),
            PollState::Failed(msg) => Err(PollError::JobFailed(msg)),
            PollState::TimedOut { attempts } => Err(PollError::TimedOut { attempts }),
            PollState::Cancelled => Err(PollError::Cancelled),
            PollState::Idle | PollState::Polling { .. } => Err(PollError::Cancelled),
        }
    }
}
