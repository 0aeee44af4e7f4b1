use tokio::sync::broadcast;

/// A named signal for a UI region outside the core. The core fires these and
/// does not know or care who listens.
#[derive(Debug, Clone)]
pub struct UiEvent {
    pub name: String,
    pub detail: serde_json::Value,
}

/// Fire-and-forget event channel from tool handlers to the surrounding UI.
#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<UiEvent>,
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    /// Emit a named event. Having no listeners is not an error.
    pub fn emit(&self, name: impl Into<String>, detail: serde_json::Value) {
        let _ = self.tx.send(UiEvent {
            name: name.into(),
            detail,
        });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.tx.subscribe()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
