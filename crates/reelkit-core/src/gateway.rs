use reelkit_wizard::{
    AudioPlan, Brief, Character, Composition, MoodBoard, PlatformChoice, ScriptSection, Storyboard,
};

/// Opaque identifier of a persisted project. Created lazily on the first
/// persistence-requiring mutation and reused for the rest of the session.
pub type ProjectId = String;

/// An error from the persistence layer. Opaque on purpose: the core only
/// needs something loggable — the concrete store keeps its own error types.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct GatewayError(String);

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// The narrow persistence boundary the core writes through.
///
/// `ensure_project` is idempotent: at most one project is created per
/// session key, and interleaved callers all observe the same id. Every
/// `save_*` must be read-before-write keyed by project id (plus a natural
/// key where one exists), so repeating an identical call produces one
/// persisted row, not two.
pub trait ProjectGateway: Send + Sync {
    fn ensure_project(&self, session_key: &str) -> Result<ProjectId>;

    fn save_platform(&self, project_id: &str, platform: &PlatformChoice) -> Result<()>;
    fn save_brief(&self, project_id: &str, brief: &Brief) -> Result<()>;
    fn save_mood_board(&self, project_id: &str, board: &MoodBoard) -> Result<()>;
    fn save_storyboard(&self, project_id: &str, storyboard: &Storyboard) -> Result<()>;
    fn save_audio_plan(&self, project_id: &str, audio: &AudioPlan) -> Result<()>;
    fn save_composition(&self, project_id: &str, composition: &Composition) -> Result<()>;
    fn save_script_section(&self, project_id: &str, section: &ScriptSection) -> Result<()>;
    fn save_character(&self, project_id: &str, character: &Character) -> Result<()>;
}

/// How a persistence attempt ended. Tool handlers apply the local mutation
/// first, so a gateway failure degrades to "kept locally" instead of
/// rolling anything back.
#[derive(Debug, Clone)]
pub enum SaveOutcome {
    Saved { project_id: ProjectId },
    Degraded { reason: String },
}

impl SaveOutcome {
    /// Suffix for tool result strings; empty on a clean save, otherwise
    /// carries the failure reason so the assistant can relay it.
    pub fn suffix(&self) -> String {
        match self {
            SaveOutcome::Saved { .. } => String::new(),
            SaveOutcome::Degraded { reason } => {
                format!(" (kept locally; remote save failed: {reason})")
            }
        }
    }
}
