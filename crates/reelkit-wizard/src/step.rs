use serde::{Deserialize, Serialize};

/// The fixed, linearly-ordered steps of the production wizard.
///
/// `WizardState::current_step` is always one of these by construction;
/// there is no "unknown step" state to defend against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Platform,
    Brief,
    Script,
    MoodBoard,
    Storyboard,
    Review,
}

impl WizardStep {
    /// All steps in wizard order.
    pub const ALL: [WizardStep; 6] = [
        WizardStep::Platform,
        WizardStep::Brief,
        WizardStep::Script,
        WizardStep::MoodBoard,
        WizardStep::Storyboard,
        WizardStep::Review,
    ];

    /// Zero-based position in the wizard flow.
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    /// The step after this one, or `None` at the end of the flow.
    pub fn next(self) -> Option<WizardStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// The step before this one, or `None` at the start of the flow.
    pub fn previous(self) -> Option<WizardStep> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    /// The snake_case name used in tool arguments and context snapshots.
    pub fn name(self) -> &'static str {
        match self {
            WizardStep::Platform => "platform",
            WizardStep::Brief => "brief",
            WizardStep::Script => "script",
            WizardStep::MoodBoard => "mood_board",
            WizardStep::Storyboard => "storyboard",
            WizardStep::Review => "review",
        }
    }

    /// Parse a step name as used in tool arguments.
    pub fn parse(name: &str) -> Option<WizardStep> {
        Self::ALL.iter().copied().find(|s| s.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_form_a_linear_order() {
        let mut step = WizardStep::Platform;
        let mut seen = vec![step];
        while let Some(next) = step.next() {
            assert_eq!(next.index(), step.index() + 1);
            seen.push(next);
            step = next;
        }
        assert_eq!(seen, WizardStep::ALL);
        assert_eq!(step, WizardStep::Review);
        assert_eq!(step.next(), None);
        assert_eq!(WizardStep::Platform.previous(), None);
    }

    #[test]
    fn names_round_trip() {
        for step in WizardStep::ALL {
            assert_eq!(WizardStep::parse(step.name()), Some(step));
        }
        assert_eq!(WizardStep::parse("checkout"), None);
    }
}
