// tests/interact.rs

use std::error::Error;
use std::io::ErrorKind;
use std::time::Duration;

use actionloop::errors::ActuatorError;
use actionloop::exec::{API_HOST_ENV, OUTPUT_GUARD};
use actionloop_test_utils::builders::{
    ScriptExecutorBuilder, TempLogs, CHATTY_PASSTHROUGH, ONE_SHOT, PASSTHROUGH, SILENT,
};
use actionloop_test_utils::{eventually, init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn ping_comes_back_without_newline() -> TestResult {
    init_tracing();
    let logs = TempLogs::new();
    let mut exec = ScriptExecutorBuilder::new(PASSTHROUGH).build(&logs);
    with_timeout(exec.start()).await?;

    let response = with_timeout(exec.interact(b"ping")).await?;
    assert_eq!(response, b"ping");

    exec.stop();
    Ok(())
}

#[tokio::test]
async fn sequential_interactions_stay_paired() -> TestResult {
    init_tracing();
    let logs = TempLogs::new();
    let mut exec = ScriptExecutorBuilder::new(PASSTHROUGH).build(&logs);
    with_timeout(exec.start()).await?;

    for payload in [r#"{"value":{"name":"Mike"}}"#, "", "  spaced  ", "second"] {
        let response = with_timeout(exec.interact(payload.as_bytes())).await?;
        assert_eq!(String::from_utf8(response)?, payload);
    }

    exec.stop();
    Ok(())
}

#[tokio::test]
async fn responses_are_not_mixed_with_stdout_logs() -> TestResult {
    init_tracing();
    let logs = TempLogs::new();
    let mut exec = ScriptExecutorBuilder::new(CHATTY_PASSTHROUGH).build(&logs);
    with_timeout(exec.start()).await?;

    let response = with_timeout(exec.interact(b"hello")).await?;
    assert_eq!(response, b"hello");

    exec.stop();
    Ok(())
}

#[tokio::test]
async fn guard_follows_each_activation_in_both_logs() -> TestResult {
    init_tracing();
    let logs = TempLogs::new();
    let mut exec = ScriptExecutorBuilder::new(CHATTY_PASSTHROUGH).build(&logs);
    with_timeout(exec.start()).await?;

    with_timeout(exec.interact(b"a")).await?;
    with_timeout(exec.interact(b"b")).await?;
    exec.stop();

    assert_eq!(
        logs.stdout(),
        format!("out: a\n{OUTPUT_GUARD}out: b\n{OUTPUT_GUARD}")
    );
    assert_eq!(
        logs.stderr(),
        format!("err: a\n{OUTPUT_GUARD}err: b\n{OUTPUT_GUARD}")
    );
    Ok(())
}

#[tokio::test]
async fn interact_before_start_is_rejected_without_guard() -> TestResult {
    init_tracing();
    let logs = TempLogs::new();
    let mut exec = ScriptExecutorBuilder::new(PASSTHROUGH).build(&logs);

    let err = exec.interact(b"ping").await.unwrap_err();
    assert!(matches!(err, ActuatorError::NotStarted), "got {err:?}");
    assert_eq!(logs.stdout(), "");

    exec.stop();
    let err = exec.interact(b"ping").await.unwrap_err();
    assert!(matches!(err, ActuatorError::NotStarted), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn dead_action_fails_the_interaction_but_still_writes_guard() -> TestResult {
    init_tracing();
    let logs = TempLogs::new();
    let mut exec = ScriptExecutorBuilder::new(ONE_SHOT).build(&logs);
    with_timeout(exec.start()).await?;

    assert_eq!(with_timeout(exec.interact(b"only")).await?, b"only");
    assert!(eventually(|| exec.exited()).await, "one-shot action kept running");

    let err = with_timeout(exec.interact(b"again")).await.unwrap_err();
    let io = err.as_io().expect("an I/O error");
    assert!(
        matches!(io.kind(), ErrorKind::UnexpectedEof | ErrorKind::BrokenPipe),
        "unexpected error kind: {io:?}"
    );

    assert_eq!(logs.stdout(), OUTPUT_GUARD.repeat(2));
    assert_eq!(logs.stderr(), OUTPUT_GUARD.repeat(2));

    exec.stop();
    Ok(())
}

#[tokio::test]
async fn stop_after_caller_timeout_lets_the_action_die() -> TestResult {
    init_tracing();
    let logs = TempLogs::new();
    let mut exec = ScriptExecutorBuilder::new(SILENT).build(&logs);
    with_timeout(exec.start()).await?;

    let pending = tokio::time::timeout(Duration::from_millis(100), exec.interact(b"hello")).await;
    assert!(pending.is_err(), "silent action answered");

    exec.stop();
    assert!(eventually(|| exec.exited()).await);
    Ok(())
}

#[tokio::test]
async fn environment_is_minimal_with_optional_debug_path() -> TestResult {
    init_tracing();
    let logs = TempLogs::new();
    let debug_log = logs.dir().join("action-debug.log");
    let script = r#"IFS= read -r line
printf '%s|%s|%s\n' "${__OW_API_HOST-unset}" "${OW_DEBUG-unset}" "${HOME-unset}" >&3
while IFS= read -r line; do :; done"#;

    let mut exec = ScriptExecutorBuilder::new(script)
        .debug_log(&debug_log)
        .build(&logs);
    with_timeout(exec.start()).await?;

    let response = String::from_utf8(with_timeout(exec.interact(b"env")).await?)?;
    let api_host = std::env::var(API_HOST_ENV).unwrap_or_default();
    assert_eq!(
        response,
        format!("{api_host}|{}|unset", debug_log.display())
    );

    exec.stop();
    Ok(())
}

#[tokio::test]
async fn debug_variable_is_absent_by_default() -> TestResult {
    init_tracing();
    let logs = TempLogs::new();
    let script = r#"IFS= read -r line; printf '%s\n' "${OW_DEBUG-unset}" >&3; exec sleep 5"#;

    let mut exec = ScriptExecutorBuilder::new(script).build(&logs);
    with_timeout(exec.start()).await?;

    assert_eq!(with_timeout(exec.interact(b"env")).await?, b"unset");

    exec.stop();
    Ok(())
}
