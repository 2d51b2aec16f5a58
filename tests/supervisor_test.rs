// End-to-end supervisor behavior: trigger handling, restart races,
// kill classification, and error reporting.

use rewatch::config::WatchConfig;
use rewatch::logger::{LogSink, MemorySink};
use rewatch::process::Supervisor;
use rewatch::trigger::{self, TriggerSender};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

fn shell_config(script: &str) -> WatchConfig {
    WatchConfig::new("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

fn start_supervisor(
    config: WatchConfig,
) -> (Arc<MemorySink>, TriggerSender, JoinHandle<rewatch::error::Result<()>>) {
    let sink = Arc::new(MemorySink::new());
    let log: Arc<dyn LogSink> = sink.clone();
    let supervisor = Supervisor::new(config, log);
    let (tx, rx) = trigger::channel();
    let task = tokio::spawn(supervisor.run(rx));
    (sink, tx, task)
}

/// Extract the PIDs from "Running: ... (PID: <pid>)" lines, in order
fn running_pids(sink: &MemorySink) -> Vec<u32> {
    sink.successes()
        .iter()
        .filter_map(|line| {
            let rest = line.strip_prefix("Running: ")?;
            let pid = rest.rsplit_once("(PID: ")?.1.strip_suffix(')')?;
            pid.parse().ok()
        })
        .collect()
}

#[cfg(unix)]
fn pid_alive(pid: u32) -> bool {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;
    kill(Pid::from_raw(pid as i32), None).is_ok()
}

#[tokio::test]
async fn test_error_message_contains_exit_error_and_stderr() {
    let (sink, tx, task) = start_supervisor(shell_config("echo boom >&2; exit 1"));

    tx.trigger();
    sleep(Duration::from_millis(500)).await;

    drop(tx);
    task.await.unwrap().unwrap();

    let errors = sink.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("exit status"), "got: {}", errors[0]);
    assert!(errors[0].contains("boom"), "got: {}", errors[0]);
}

#[tokio::test]
async fn test_restart_race_keeps_one_child_alive() {
    let (sink, tx, task) = start_supervisor(shell_config("sleep 30"));

    // Second trigger arrives long before the first child would exit
    tx.trigger();
    sleep(Duration::from_millis(300)).await;
    tx.trigger();
    sleep(Duration::from_millis(300)).await;

    let pids = running_pids(&sink);
    assert_eq!(pids.len(), 2);

    // First generation killed, second still current
    assert!(!pid_alive(pids[0]), "old child should be gone");
    assert!(pid_alive(pids[1]), "new child should be running");

    drop(tx);
    task.await.unwrap().unwrap();

    // Shutdown kills the second generation as well
    sleep(Duration::from_millis(300)).await;
    assert!(!pid_alive(pids[1]));
}

#[tokio::test]
async fn test_supervisor_kill_never_logged_as_error() {
    let (sink, tx, task) = start_supervisor(shell_config("sleep 30"));

    tx.trigger();
    sleep(Duration::from_millis(300)).await;
    tx.trigger();
    sleep(Duration::from_millis(300)).await;

    drop(tx);
    task.await.unwrap().unwrap();
    sleep(Duration::from_millis(300)).await;

    // Two kills happened (restart + shutdown); both are successes
    assert!(sink.errors().is_empty(), "errors: {:?}", sink.errors());
    let kills: Vec<String> = sink
        .successes()
        .iter()
        .filter(|m| m.contains("signal"))
        .cloned()
        .collect();
    assert!(!kills.is_empty());
}

#[tokio::test]
async fn test_exactly_one_stopping_line_per_kill() {
    let (sink, tx, task) = start_supervisor(shell_config("sleep 30"));

    tx.trigger();
    sleep(Duration::from_millis(300)).await;
    tx.trigger();
    sleep(Duration::from_millis(300)).await;

    drop(tx);
    task.await.unwrap().unwrap();

    let stopping = sink
        .successes()
        .iter()
        .filter(|m| m.starts_with("Stopping: PID "))
        .count();
    // One for the restart, one for the shutdown
    assert_eq!(stopping, 2);
}

#[tokio::test]
async fn test_trigger_burst_coalesces_but_restarts_at_least_once() {
    let (sink, tx, task) = start_supervisor(shell_config("exit 0"));

    for _ in 0..10 {
        tx.trigger();
    }
    sleep(Duration::from_millis(500)).await;

    drop(tx);
    task.await.unwrap().unwrap();

    let launches = running_pids(&sink).len();
    assert!(launches >= 1, "at least one restart per burst");
    assert!(launches <= 10);
    assert!(sink.errors().is_empty());
}

#[tokio::test]
async fn test_missing_command_performs_no_launches() {
    let (sink, tx, task) = start_supervisor(WatchConfig::new("", vec![]));

    tx.trigger();
    task.await.unwrap().unwrap();
    tx.trigger();
    tx.trigger();
    sleep(Duration::from_millis(100)).await;

    assert_eq!(sink.warnings().len(), 1);
    assert!(running_pids(&sink).is_empty());
}
