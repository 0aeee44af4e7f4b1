use serde::Serialize;

use reelkit_wizard::{WizardState, WizardStep, WizardStore};

/// The read-only projection of wizard state handed to the model each round.
///
/// Always rebuilt fresh from the live store — never cached — so a round that
/// follows tool execution sees the effects of that batch.
#[derive(Debug, Clone, Serialize)]
pub struct BubbleContext {
    /// Route the user is looking at, derived from the current step.
    pub route: String,
    pub current_step: WizardStep,
    pub completed_steps: Vec<WizardStep>,
    pub state: WizardState,
}

impl BubbleContext {
    pub fn capture(store: &WizardStore) -> Self {
        let state = store.current();
        Self {
            route: format!("/wizard/{}", state.current_step.name()),
            current_step: state.current_step,
            completed_steps: state.completed_steps.iter().copied().collect(),
            state,
        }
    }

    /// Serialize for inclusion in the request's system text.
    pub fn render(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
