//! Unit tests for the wait poller

use std::collections::VecDeque;
use std::future::{Ready, ready};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use mockall::predicate::eq;
use pretty_assertions::assert_eq;

use stratus_runtime::RealClock;
use stratus_runtime::api_client::types::ObjectStore;

use super::*;
use crate::test_helpers::*;

type Step = Result<&'static str, &'static str>;

/// Lookup that replays `steps` in order and counts its calls
fn scripted(
    steps: &[Step],
) -> (
    impl FnMut() -> Ready<anyhow::Result<ObjectStore>> + use<>,
    Arc<AtomicUsize>,
) {
    let queue = Arc::new(Mutex::new(steps.iter().copied().collect::<VecDeque<_>>()));
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let lookup = move || {
        counter.fetch_add(1, Ordering::SeqCst);
        let step = queue.lock().unwrap().pop_front();
        ready(match step {
            Some(Ok(status)) => Ok(object_store("os-1", "backups", status)),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("lookup called after the script ended")),
        })
    };
    (lookup, calls)
}

fn is_ready(status: &str) -> bool {
    status == "ready"
}

fn is_failed(status: &str) -> bool {
    status == "failed"
}

fn request(options: WaitOptions) -> WaitRequest<'static> {
    WaitRequest {
        id: "os-1",
        message: "Creating object store backups",
        is_terminal: &is_ready,
        is_failed: Some(&is_failed),
        options,
    }
}

fn runtime_expecting(sleeps: usize) -> Arc<dyn AsyncRuntime> {
    let mut runtime = MockAsyncRuntimeMock::new();
    runtime
        .expect_sleep()
        .with(eq(Duration::from_secs(2)))
        .times(sleeps)
        .returning(|_| ());
    Arc::new(runtime)
}

fn deps(
    ui: &Arc<TestUserInterface>,
    clock: Arc<dyn Clock>,
    runtime: Arc<dyn AsyncRuntime>,
) -> WaitDependencies {
    WaitDependencies {
        ui: Arc::clone(ui) as Arc<dyn UserInterface>,
        clock,
        async_runtime: runtime,
    }
}

fn assert_spinner_closed_once(ui: &TestUserInterface) {
    let log = ui.spinner_log();
    assert_eq!(log.created, 1);
    assert_eq!(log.started, 1);
    assert_eq!(log.finished, 1);
}

#[tokio::test]
async fn test_waits_until_terminal_status() {
    let ui = Arc::new(TestUserInterface::new());
    let deps = deps(&ui, Arc::new(RealClock), runtime_expecting(2));
    let (lookup, calls) = scripted(&[Ok("pending"), Ok("pending"), Ok("ready")]);

    let waited = wait_for(&request(WaitOptions::default()), &deps, lookup)
        .await
        .unwrap();

    assert_eq!(waited.resource.status, "ready");
    assert_eq!(waited.resource.id, "os-1");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_spinner_closed_once(&ui);
}

#[tokio::test]
async fn test_terminal_on_first_lookup_never_sleeps() {
    let ui = Arc::new(TestUserInterface::new());
    let deps = deps(&ui, Arc::new(RealClock), runtime_expecting(0));
    let (lookup, calls) = scripted(&[Ok("ready")]);

    let waited = wait_for(&request(WaitOptions::default()), &deps, lookup)
        .await
        .unwrap();

    assert_eq!(waited.resource.status, "ready");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_spinner_closed_once(&ui);
}

#[tokio::test]
async fn test_lookup_error_aborts_immediately() {
    let ui = Arc::new(TestUserInterface::new());
    let deps = deps(&ui, Arc::new(RealClock), runtime_expecting(1));
    let (lookup, calls) = scripted(&[Ok("pending"), Err("connection reset"), Ok("ready")]);

    let err = wait_for(&request(WaitOptions::default()), &deps, lookup)
        .await
        .unwrap_err();

    match &err {
        WaitError::Lookup { id, source } => {
            assert_eq!(id, "os-1");
            assert_eq!(source.to_string(), "connection reset");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_spinner_closed_once(&ui);
}

#[tokio::test]
async fn test_failed_status_aborts() {
    let ui = Arc::new(TestUserInterface::new());
    let deps = deps(&ui, Arc::new(RealClock), runtime_expecting(1));
    let (lookup, calls) = scripted(&[Ok("creating"), Ok("failed"), Ok("ready")]);

    let err = wait_for(&request(WaitOptions::default()), &deps, lookup)
        .await
        .unwrap_err();

    assert!(matches!(
        &err,
        WaitError::Failed { id, status } if id == "os-1" && status == "failed"
    ));
    assert_eq!(err.to_string(), "os-1 entered status `failed`");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_spinner_closed_once(&ui);
}

#[tokio::test]
async fn test_failed_status_ignored_without_predicate() {
    let ui = Arc::new(TestUserInterface::new());
    let deps = deps(&ui, Arc::new(RealClock), runtime_expecting(1));
    let (lookup, calls) = scripted(&[Ok("failed"), Ok("ready")]);
    let request = WaitRequest {
        is_failed: None,
        ..request(WaitOptions::default())
    };

    let waited = wait_for(&request, &deps, lookup).await.unwrap();

    assert_eq!(waited.resource.status, "ready");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_times_out_after_non_terminal_observation() {
    let ui = Arc::new(TestUserInterface::new());
    // Every `now` advances one second: start=0, first lookup=1s, second=2s
    let clock = Arc::new(StepClock::new(Duration::from_secs(1)));
    let deps = deps(&ui, clock, runtime_expecting(1));
    let (lookup, calls) = scripted(&[Ok("creating"), Ok("creating"), Ok("ready")]);
    let options = WaitOptions {
        timeout: Some(Duration::from_secs(2)),
        ..WaitOptions::default()
    };

    let err = wait_for(&request(options), &deps, lookup).await.unwrap_err();

    match &err {
        WaitError::TimedOut { id, elapsed } => {
            assert_eq!(id, "os-1");
            assert_eq!(*elapsed, Duration::from_secs(2));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.to_string(), "timed out after 2s waiting for os-1");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_spinner_closed_once(&ui);
}

#[tokio::test]
async fn test_zero_timeout_still_accepts_terminal_status() {
    let ui = Arc::new(TestUserInterface::new());
    let clock = Arc::new(StepClock::new(Duration::from_secs(5)));
    let deps = deps(&ui, clock, runtime_expecting(0));
    let (lookup, _calls) = scripted(&[Ok("ready")]);
    let options = WaitOptions {
        timeout: Some(Duration::ZERO),
        ..WaitOptions::default()
    };

    let waited = wait_for(&request(options), &deps, lookup).await.unwrap();

    assert_eq!(waited.resource.status, "ready");
    assert_eq!(waited.elapsed, Duration::from_secs(5));
}

#[tokio::test]
async fn test_reports_elapsed_and_progress() {
    let ui = Arc::new(TestUserInterface::new());
    let clock = Arc::new(StepClock::new(Duration::from_secs(30)));
    let deps = deps(&ui, clock, runtime_expecting(1));
    let (lookup, _calls) = scripted(&[Ok("creating"), Ok("ready")]);

    let waited = wait_for(&request(WaitOptions::default()), &deps, lookup)
        .await
        .unwrap();

    assert_eq!(waited.elapsed, Duration::from_secs(60));
    assert_eq!(
        ui.spinner_log().messages,
        vec![
            "Creating object store backups",
            "Creating object store backups (creating, 30 sec)",
        ]
    );
}

#[tokio::test]
async fn test_dropped_wait_clears_spinner() {
    let ui = Arc::new(TestUserInterface::new());
    let deps = deps(&ui, Arc::new(RealClock), runtime_expecting(0));
    let lookup = || std::future::pending::<anyhow::Result<ObjectStore>>();
    let request = request(WaitOptions::default());

    // The wait is polled once, parks on the lookup, then gets dropped
    tokio::select! {
        biased;
        result = wait_for(&request, &deps, lookup) => panic!("wait finished: {result:?}"),
        () = std::future::ready(()) => {}
    }

    assert_spinner_closed_once(&ui);
}

#[test]
fn test_wait_options() {
    let options = WaitOptions::default();
    assert_eq!(options.interval, Duration::from_secs(2));
    assert_eq!(options.timeout, None);
    assert_eq!(
        WaitOptions::with_timeout_secs(Some(90)).timeout,
        Some(Duration::from_secs(90))
    );
}
