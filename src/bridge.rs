// THEORY:
// The `bridge` module is the inbound edge of the engine: the host delivers
// one image-locator string per logical trigger event, and the pipeline's
// listener drains them from the other end of the channel.
//
// The original host integration listened on two event targets at once
// (document-level and window-level) as a sandbox-compatibility shim, which
// meant a single logical event could arrive twice and start two overlapping
// runs. This bridge collapses delivery to one logical channel; a host that
// still fans out duplicates simply sends twice, and the pipeline's run gate
// decides what happens to the second trigger.

use tokio::sync::mpsc;

/// Receiving half of the trigger bridge, consumed by the pipeline listener.
pub type TriggerReceiver = mpsc::Receiver<String>;

/// Sending half of the trigger bridge, held by the host.
#[derive(Clone)]
pub struct TriggerSender {
    tx: mpsc::Sender<String>,
}

impl TriggerSender {
    /// Delivers one trigger. Fails only when the listener side has shut
    /// down and the channel is closed.
    pub async fn send(
        &self,
        locator: impl Into<String>,
    ) -> Result<(), mpsc::error::SendError<String>> {
        self.tx.send(locator.into()).await
    }
}

/// Creates the trigger bridge with the given channel capacity.
pub fn trigger_channel(capacity: usize) -> (TriggerSender, TriggerReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (TriggerSender { tx }, rx)
}
