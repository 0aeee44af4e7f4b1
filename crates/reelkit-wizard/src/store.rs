use std::sync::{Arc, Mutex};

use crate::state::WizardState;

/// A cloneable handle to one session's wizard state.
///
/// Constructed per session and passed into the tool registry and the
/// orchestrator — never a module-level global, so concurrent sessions and
/// tests don't cross-contaminate. Readers always go through [`current`] or
/// [`read`] so they see the live aggregate, not a copy captured earlier.
///
/// [`current`]: WizardStore::current
/// [`read`]: WizardStore::read
#[derive(Clone, Default)]
pub struct WizardStore {
    inner: Arc<Mutex<WizardState>>,
}

impl WizardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the live aggregate as of this call.
    pub fn current(&self) -> WizardState {
        self.inner.lock().unwrap().clone()
    }

    /// Read a projection of the live aggregate without cloning all of it.
    pub fn read<R>(&self, f: impl FnOnce(&WizardState) -> R) -> R {
        f(&self.inner.lock().unwrap())
    }

    /// Apply a synchronous mutation to the aggregate.
    pub fn update<R>(&self, f: impl FnOnce(&mut WizardState) -> R) -> R {
        f(&mut self.inner.lock().unwrap())
    }

    /// Discard all state and return to the first step.
    pub fn reset(&self) {
        self.inner.lock().unwrap().reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::BriefPatch;

    #[test]
    fn handles_share_one_aggregate() {
        let store = WizardStore::new();
        let other = store.clone();

        other.update(|s| {
            s.apply_brief(BriefPatch {
                name: Some("Launch Video".into()),
                ..Default::default()
            })
        });

        assert_eq!(store.current().brief.name.as_deref(), Some("Launch Video"));
    }

    #[test]
    fn separate_stores_are_isolated() {
        let a = WizardStore::new();
        let b = WizardStore::new();
        a.update(|s| s.advance_step());
        assert_ne!(a.current().current_step, b.current().current_step);
    }
}
