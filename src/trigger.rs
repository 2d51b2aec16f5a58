// Restart trigger channel between the file watcher and the supervisor loop

use tokio::sync::mpsc;

/// Sending half of the restart trigger channel.
///
/// The channel is bounded at one pending trigger: a trigger posted while
/// one is already queued is dropped, since only "a restart is owed"
/// matters, not how many changes arrived while the supervisor was busy.
#[derive(Debug, Clone)]
pub struct TriggerSender {
    tx: mpsc::Sender<()>,
}

/// Receiving half of the restart trigger channel, owned by the supervisor loop.
#[derive(Debug)]
pub struct TriggerReceiver {
    rx: mpsc::Receiver<()>,
}

/// Create a new trigger channel pair
pub fn channel() -> (TriggerSender, TriggerReceiver) {
    let (tx, rx) = mpsc::channel(1);
    (TriggerSender { tx }, TriggerReceiver { rx })
}

impl TriggerSender {
    /// Request a restart of the supervised command.
    ///
    /// Never blocks. If a restart is already pending the trigger coalesces
    /// into it; if the receiver is gone the trigger is silently dropped.
    pub fn trigger(&self) {
        let _ = self.tx.try_send(());
    }
}

impl TriggerReceiver {
    /// Wait for the next restart trigger.
    ///
    /// Returns `None` when all senders are dropped, which the supervisor
    /// treats as shutdown: stop the loop, never restart again.
    pub async fn recv(&mut self) -> Option<()> {
        self.rx.recv().await
    }

    /// Non-blocking check for a pending trigger
    pub fn try_recv(&mut self) -> bool {
        self.rx.try_recv().is_ok()
    }
}
