use std::sync::Arc;

use reelkit_wizard::WizardStore;

use crate::gateway::{self, ProjectGateway, SaveOutcome};
use crate::notify::Notifier;

/// Everything a tool handler needs: the live state store, the persistence
/// gateway, the UI notify channel, and the session key the lazy project
/// identity hangs off. One per wizard session; cheap to clone.
#[derive(Clone)]
pub struct SessionHandle {
    store: WizardStore,
    gateway: Arc<dyn ProjectGateway>,
    notifier: Notifier,
    session_key: String,
}

impl SessionHandle {
    pub fn new(
        session_key: impl Into<String>,
        store: WizardStore,
        gateway: Arc<dyn ProjectGateway>,
        notifier: Notifier,
    ) -> Self {
        Self {
            store,
            gateway,
            notifier,
            session_key: session_key.into(),
        }
    }

    pub fn store(&self) -> &WizardStore {
        &self.store
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn session_key(&self) -> &str {
        &self.session_key
    }

    /// Ensure a project identity and run one save against the gateway.
    ///
    /// The local mutation has already been applied by the time this runs;
    /// a failure here is reported as a degraded outcome and logged, never
    /// rolled back or escalated into a user-facing abort.
    pub fn persist(
        &self,
        what: &str,
        save: impl FnOnce(&dyn ProjectGateway, &str) -> gateway::Result<()>,
    ) -> SaveOutcome {
        let attempt = self
            .gateway
            .ensure_project(&self.session_key)
            .and_then(|id| {
                save(self.gateway.as_ref(), &id)?;
                Ok(id)
            });

        match attempt {
            Ok(project_id) => SaveOutcome::Saved { project_id },
            Err(e) => {
                tracing::warn!(what, error = %e, "persistence failed; keeping local copy");
                SaveOutcome::Degraded {
                    reason: e.to_string(),
                }
            }
        }
    }
}
