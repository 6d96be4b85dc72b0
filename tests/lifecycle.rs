// tests/lifecycle.rs

use std::error::Error;
use std::time::Duration;

use actionloop::errors::ActuatorError;
use actionloop::exec::{Executor, LaunchOptions};
use actionloop_test_utils::builders::{ScriptExecutorBuilder, TempLogs, SILENT};
use actionloop_test_utils::{eventually, init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

/// Generous window so that "exited during startup" is detected reliably.
const WIDE_WINDOW: Duration = Duration::from_secs(2);

#[tokio::test]
async fn start_fails_when_command_exits_immediately() -> TestResult {
    init_tracing();
    let logs = TempLogs::new();
    let mut exec = ScriptExecutorBuilder::new("exit 3")
        .start_timeout(WIDE_WINDOW)
        .build(&logs);

    let err = with_timeout(exec.start()).await.unwrap_err();
    assert!(matches!(err, ActuatorError::CommandExited), "got {err:?}");
    assert_eq!(err.to_string(), "command exited");

    // The watcher fired; no interaction was needed to notice.
    assert!(exec.exited());
    assert_eq!(exec.exit_outcome().and_then(|o| o.code), Some(3));

    exec.stop();
    Ok(())
}

#[tokio::test]
async fn start_succeeds_for_a_process_outliving_the_window() -> TestResult {
    init_tracing();
    let logs = TempLogs::new();
    let mut exec = ScriptExecutorBuilder::new("exec sleep 5").build(&logs);

    assert!(!exec.exited(), "not exited before start");
    with_timeout(exec.start()).await?;
    assert!(!exec.exited());
    assert!(exec.pid().is_some());

    exec.stop();
    Ok(())
}

#[tokio::test]
async fn spawn_failure_reports_command_exited_without_watcher() -> TestResult {
    init_tracing();
    let logs = TempLogs::new();
    let mut exec = Executor::new(
        logs.sinks(),
        "/nonexistent/definitely-not-an-action",
        Vec::<String>::new(),
        &LaunchOptions::default(),
    )?;

    let err = with_timeout(exec.start()).await.unwrap_err();
    assert!(matches!(err, ActuatorError::CommandExited), "got {err:?}");
    assert!(exec.pid().is_none());
    assert!(!exec.exited());

    // The handle is gone for good.
    let again = exec.start().await.unwrap_err();
    assert!(matches!(again, ActuatorError::AlreadyStarted), "got {again:?}");

    exec.stop();
    Ok(())
}

#[tokio::test]
async fn natural_exit_is_detected_without_interaction() -> TestResult {
    init_tracing();
    let logs = TempLogs::new();
    let mut exec = ScriptExecutorBuilder::new("exec sleep 0.2").build(&logs);

    with_timeout(exec.start()).await?;
    assert!(!exec.exited());

    assert!(eventually(|| exec.exited()).await, "exit never observed");
    let outcome = exec.exit_outcome().expect("outcome after exit");
    assert!(outcome.success(), "unexpected outcome {outcome}");

    exec.stop();
    Ok(())
}

#[tokio::test]
async fn stop_twice_is_harmless_and_kills_the_process() -> TestResult {
    init_tracing();
    let logs = TempLogs::new();
    let mut exec = ScriptExecutorBuilder::new(SILENT).build(&logs);

    with_timeout(exec.start()).await?;
    exec.stop();
    exec.stop();

    assert!(eventually(|| exec.exited()).await, "process still running");
    let outcome = exec.exit_outcome().expect("outcome after kill");
    assert_eq!(outcome.signal, Some(9), "unexpected outcome {outcome}");
    Ok(())
}

#[tokio::test]
async fn stop_before_start_is_a_noop_and_disables_start() -> TestResult {
    init_tracing();
    let logs = TempLogs::new();
    let mut exec = ScriptExecutorBuilder::new(SILENT).build(&logs);

    exec.stop();
    assert!(!exec.exited());

    let err = exec.start().await.unwrap_err();
    assert!(matches!(err, ActuatorError::AlreadyStarted), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn second_start_is_rejected() -> TestResult {
    init_tracing();
    let logs = TempLogs::new();
    let mut exec = ScriptExecutorBuilder::new(SILENT).build(&logs);

    with_timeout(exec.start()).await?;
    let err = exec.start().await.unwrap_err();
    assert!(matches!(err, ActuatorError::AlreadyStarted), "got {err:?}");

    exec.stop();
    Ok(())
}

#[tokio::test]
async fn dropping_the_executor_kills_the_process() -> TestResult {
    init_tracing();
    let logs = TempLogs::new();
    let mut exec = ScriptExecutorBuilder::new(SILENT).build(&logs);

    with_timeout(exec.start()).await?;
    let pid = exec.pid().expect("pid") as i32;
    drop(exec);

    // Once reaped, probing the pid fails with ESRCH.
    let gone = eventually(|| {
        nix::sys::signal::kill(nix::unistd::Pid::from_raw(pid), None).is_err()
    })
    .await;
    assert!(gone, "process {pid} survived its executor");
    Ok(())
}

/// Process state letter from `/proc/<pid>/stat`, or `None` once it is gone.
fn proc_state(pid: u32) -> Option<char> {
    let stat = std::fs::read_to_string(format!("/proc/{pid}/stat")).ok()?;
    stat.rsplit_once(')')?.1.trim_start().chars().next()
}

#[tokio::test]
async fn stop_kills_before_returning_without_runtime_help() -> TestResult {
    init_tracing();
    let logs = TempLogs::new();
    let mut exec = ScriptExecutorBuilder::new(SILENT).build(&logs);

    with_timeout(exec.start()).await?;
    let pid = exec.pid().expect("pid");
    assert!(matches!(proc_state(pid), Some(s) if s != 'Z'));

    exec.stop();
    // Block this (single) runtime thread, so the exit watcher never runs.
    std::thread::sleep(Duration::from_millis(300));

    let state = proc_state(pid);
    assert!(
        matches!(state, None | Some('Z')),
        "action still alive after stop(): state {state:?}"
    );

    assert!(eventually(|| exec.exited()).await);
    assert_eq!(exec.exit_outcome().and_then(|o| o.signal), Some(9));
    Ok(())
}
