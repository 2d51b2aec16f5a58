use crate::config::WatchConfig;
use crate::error::{Result, RewatchError};
use crate::logger::LogSink;
use crate::process::handle::ProcessHandle;
use std::fmt::Display;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tracing::debug;

/// Launch the post-change command and hand it to a detached monitor task.
///
/// The child inherits the host's stdin and stdout; stderr is piped so the
/// monitor can stream it live to the host's stderr while also capturing
/// it for failure messages.
///
/// On spawn failure the error is logged through the sink and returned;
/// the supervisor loop stays alive and waits for the next trigger. On
/// success the `Running: ...` line is logged and the returned handle is
/// the loop's kill target for the next restart.
pub async fn launch(config: &WatchConfig, sink: Arc<dyn LogSink>) -> Result<ProcessHandle> {
    let command_line = config.command_line();

    let mut command = Command::new(&config.post_change_command);
    command
        .args(&config.post_change_args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::piped());

    let child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            // Nothing ran, so the captured stderr part is empty
            sink.error(&compose_error(&e, &[]));
            return Err(RewatchError::SpawnError(e.to_string()));
        }
    };

    let pid = child.id().ok_or_else(|| {
        RewatchError::SpawnError(format!("Failed to get PID for '{}'", command_line))
    })?;

    let handle = ProcessHandle::new(pid);
    sink.success(&format!("Running: {} (PID: {})", command_line, pid));

    let monitor_handle = handle.clone();
    tokio::spawn(async move {
        if let Err(e) = run_and_monitor(child, monitor_handle, sink).await {
            debug!(error = %e, pid, "supervised command failed");
        }
    });

    Ok(handle)
}

/// Stream the child's stderr, wait for it to exit, and classify the outcome.
///
/// Classification:
/// - supervisor-requested kill (or a SIGKILL exit, as a compatibility
///   fallback) is an expected outcome and logged as success
/// - clean exit is silent
/// - anything else logs `<error>\n<captured stderr>` and returns the error
pub async fn run_and_monitor(
    mut child: Child,
    handle: ProcessHandle,
    sink: Arc<dyn LogSink>,
) -> Result<()> {
    let mut captured = Vec::new();

    // Duplicate stderr to the host and the capture buffer until EOF.
    // The pipe closes when the child exits, so this also paces the wait.
    if let Some(mut pipe) = child.stderr.take() {
        let mut host = tokio::io::stderr();
        let mut buf = [0u8; 4096];
        loop {
            match pipe.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    captured.extend_from_slice(&buf[..n]);
                    let _ = host.write_all(&buf[..n]).await;
                    let _ = host.flush().await;
                }
            }
        }
    }

    let status = child.wait().await;
    handle.mark_exited();

    match status {
        Ok(status) if handle.kill_was_requested() || killed_by_signal(&status) => {
            // Supervisor-induced termination is part of a normal restart
            sink.success(&status.to_string());
            Ok(())
        }
        Ok(status) if status.success() => Ok(()),
        Ok(status) => {
            let message = compose_error(&status, &captured);
            sink.error(&message);
            Err(RewatchError::CommandFailed(message))
        }
        Err(e) => {
            let message = compose_error(&e, &captured);
            sink.error(&message);
            Err(RewatchError::CommandFailed(message))
        }
    }
}

/// Failure message shape: the exit or spawn error, then the captured stderr
fn compose_error(error: &dyn Display, captured: &[u8]) -> String {
    format!("{}\n{}", error, String::from_utf8_lossy(captured))
}

#[cfg(unix)]
fn killed_by_signal(status: &ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    status.signal() == Some(nix::sys::signal::Signal::SIGKILL as i32)
}

#[cfg(not(unix))]
fn killed_by_signal(_status: &ExitStatus) -> bool {
    false
}
