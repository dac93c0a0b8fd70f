mod common;

use std::time::Duration;

use crate::common::{RecordingSleeper, ScriptedStatus, completed, processing};
use trip_spotlight::api::types::GeneratedRoute;
use trip_spotlight::api::{JobPoller, PollConfig, PollError};
use trip_spotlight::config::Config;

fn route() -> GeneratedRoute {
    GeneratedRoute {
        origin: "Paris".into(),
        destination: "Barcelona".into(),
        agent_results: vec![],
    }
}

#[test]
fn gives_up_after_the_default_cap() {
    let source = ScriptedStatus::always_processing();
    let sleeper = RecordingSleeper::default();
    let config = PollConfig::from(&Config::default());

    let err = JobPoller::new(&source, &sleeper, config, "job-1")
        .run(|_| {})
        .unwrap_err();

    assert!(matches!(err, PollError::TimedOut { attempts: 120 }));
    assert!(err.to_string().contains("Try again with fewer stops"));
    assert_eq!(source.calls.get(), 120);

    let sleeps = sleeper.sleeps.borrow();
    assert_eq!(sleeps.len(), 119);
    assert!(sleeps.iter().all(|d| *d == Duration::from_secs(2)));
}

#[test]
fn completes_on_the_first_finished_status() {
    let source = ScriptedStatus::new(vec![Ok(processing()), Ok(processing()), Ok(completed(route()))]);
    let sleeper = RecordingSleeper::default();

    let out = JobPoller::new(&source, &sleeper, PollConfig::default(), "job-2")
        .run(|_| {})
        .expect("job should complete");

    assert_eq!(out, route());
    assert_eq!(source.calls.get(), 3);
    assert_eq!(sleeper.sleeps.borrow().len(), 2);
}

#[test]
fn cancelled_before_start_sends_nothing() {
    let source = ScriptedStatus::always_processing();
    let sleeper = RecordingSleeper::default();

    let poller = JobPoller::new(&source, &sleeper, PollConfig::default(), "job-3");
    poller.cancel_token().cancel();

    assert!(matches!(poller.run(|_| {}), Err(PollError::Cancelled)));
    assert_eq!(source.calls.get(), 0);
}
