mod audio;
mod brief;
mod composition;
mod generation;
mod mood_board;
mod navigation;
mod platform;
mod script;
mod storyboard;

pub use audio::UpdateAudioPlanTool;
pub use brief::UpdateBriefTool;
pub use composition::{AddTextOverlayTool, UpdateCompositionTool};
pub use generation::TriggerGenerationTool;
pub use mood_board::{AddMoodKeywordsTool, UpdateMoodBoardTool};
pub use navigation::{GoToStepTool, MarkStepCompleteTool, NextStepTool, PreviousStepTool};
pub use platform::SelectPlatformTool;
pub use script::{AddCharacterTool, SetScriptSectionTool};
pub use storyboard::{
    AddSceneTool, AddShotToSceneTool, AddShotTool, SetStoryboardTool, UpdateShotTool,
};

use reelkit_llm::{Describe, Schema};
use serde::Deserialize;

use crate::registry::ToolRegistry;
use crate::session::SessionHandle;

/// Install the full closed catalogue for one session. Tools are grouped by
/// the aggregate they touch, but dispatch is a single flat table by name.
pub(crate) fn install(registry: &mut ToolRegistry, session: &SessionHandle) {
    registry.register(SelectPlatformTool::new(session));
    registry.register(UpdateBriefTool::new(session));
    registry.register(UpdateMoodBoardTool::new(session));
    registry.register(AddMoodKeywordsTool::new(session));
    registry.register(AddCharacterTool::new(session));
    registry.register(SetScriptSectionTool::new(session));
    registry.register(SetStoryboardTool::new(session));
    registry.register(AddSceneTool::new(session));
    registry.register(AddShotToSceneTool::new(session));
    registry.register(AddShotTool::new(session));
    registry.register(UpdateShotTool::new(session));
    registry.register(UpdateAudioPlanTool::new(session));
    registry.register(UpdateCompositionTool::new(session));
    registry.register(AddTextOverlayTool::new(session));
    registry.register(TriggerGenerationTool::new(session));
    registry.register(GoToStepTool::new(session));
    registry.register(NextStepTool::new(session));
    registry.register(PreviousStepTool::new(session));
    registry.register(MarkStepCompleteTool::new(session));
}

/// Input type for tools that take no arguments.
#[derive(Clone, Deserialize)]
pub struct NoInput {}

impl Describe for NoInput {
    fn describe() -> Schema {
        Schema::Object {
            description: None,
            properties: vec![],
            required: vec![],
        }
    }
}
