use crate::config::WatchConfig;
use crate::error::{Result, RewatchError};
use crate::logger::LogSink;
use crate::process::handle::ProcessHandle;
use crate::process::runner;
use crate::trigger::TriggerReceiver;
use std::sync::Arc;
use tracing::{debug, info};

/// Supervisor loop: the single consumer of restart triggers and the sole
/// owner of the current process generation.
///
/// Each trigger kills the previous child (if still alive) and launches a
/// fresh one. The loop never waits for a child to exit; exits are
/// observed by detached monitor tasks, so a slow-dying child never
/// delays the next restart.
pub struct Supervisor {
    config: WatchConfig,
    sink: Arc<dyn LogSink>,
    current: Option<ProcessHandle>,
}

impl Supervisor {
    pub fn new(config: WatchConfig, sink: Arc<dyn LogSink>) -> Self {
        Self {
            config,
            sink,
            current: None,
        }
    }

    /// Consume triggers until the channel closes.
    ///
    /// A missing `post_change_command` is fatal to the loop only: it is
    /// reported once as a warning and the loop stops, leaving the host
    /// process running. On shutdown (channel closed) the current child,
    /// if any, is killed.
    pub async fn run(mut self, mut triggers: TriggerReceiver) -> Result<()> {
        info!("supervisor loop started");

        while triggers.recv().await.is_some() {
            if self.config.post_change_command.is_empty() {
                let warning =
                    RewatchError::MissingCommand(self.config.config_file_name.clone());
                self.sink.warn(&warning.to_string());
                return Ok(());
            }

            // Kill-then-launch is strictly ordered within one iteration
            self.stop_current();

            match runner::launch(&self.config, Arc::clone(&self.sink)).await {
                Ok(handle) => {
                    debug!(pid = handle.pid(), "launched new generation");
                    self.current = Some(handle);
                }
                Err(e) => {
                    // Already reported through the sink; wait for the next trigger
                    debug!(error = %e, "launch failed");
                }
            }
        }

        info!("trigger channel closed, shutting down");
        self.stop_current();
        Ok(())
    }

    /// Kill the previous generation if it is still alive.
    ///
    /// Emits exactly one `Stopping: PID <pid>` line per kill actually
    /// issued; a child that already exited on its own is dropped silently.
    fn stop_current(&mut self) {
        if let Some(handle) = self.current.take() {
            if handle.is_alive() {
                self.sink.success(&format!("Stopping: PID {}", handle.pid()));
                handle.kill();
            }
        }
    }
}
