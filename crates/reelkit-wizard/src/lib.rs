pub mod state;
pub mod step;
pub mod store;

pub use state::{
    AudioPatch, AudioPlan, Brief, BriefPatch, Character, Composition, CompositionPatch, MoodBoard,
    MoodBoardPatch, PlatformChoice, PlatformKind, Scene, SceneDraft, ScriptOutline, ScriptSection,
    Shot, ShotDraft, ShotPlan, Storyboard, TextOverlay, WizardError, WizardState,
};
pub use step::WizardStep;
pub use store::WizardStore;
