pub mod budget;
pub mod client;
pub mod poller;
pub mod results;
pub mod types;

pub use client::{ApiClient, ApiError};
pub use poller::{CancelToken, JobPoller, PollConfig, PollError, PollState, StatusSource};
