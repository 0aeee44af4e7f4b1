use reelkit_llm::{Describe, Property, Schema};
use serde::Deserialize;

use crate::session::SessionHandle;
use crate::tool::{Tool, ToolError};

const ASSET_KINDS: &[&str] = &["image", "video", "voiceover", "music"];

#[derive(Clone, Deserialize)]
pub struct TriggerGenerationInput {
    pub asset: String,
    pub prompt: String,
    pub shot_number: Option<u32>,
}

impl Describe for TriggerGenerationInput {
    fn describe() -> Schema {
        Schema::Object {
            description: None,
            properties: vec![
                Property::new(
                    "asset",
                    Schema::string_enum("Kind of asset to generate", ASSET_KINDS),
                ),
                Property::new("prompt", Schema::string("Generation prompt")),
                Property::new(
                    "shot_number",
                    Schema::integer("Shot-list number the asset is for, if any"),
                ),
            ],
            required: vec!["asset".into(), "prompt".into()],
        }
    }
}

/// Hand a generation request to whatever UI region owns the vendor calls.
/// The core stops at the notify boundary — no vendor API is called here.
#[derive(Clone)]
pub struct TriggerGenerationTool {
    session: SessionHandle,
}

impl TriggerGenerationTool {
    pub(crate) fn new(session: &SessionHandle) -> Self {
        Self {
            session: session.clone(),
        }
    }
}

impl Tool for TriggerGenerationTool {
    type Input = TriggerGenerationInput;

    fn name(&self) -> &str {
        "trigger_generation"
    }

    fn description(&self) -> &str {
        "Queue generation of an image, video, voiceover, or music asset with the given prompt. The generation panel picks the request up and runs it."
    }

    async fn call(&self, input: TriggerGenerationInput) -> Result<String, ToolError> {
        if !ASSET_KINDS.contains(&input.asset.as_str()) {
            return Err(ToolError::Failed(format!(
                "unknown asset kind '{}'; expected one of {}",
                input.asset,
                ASSET_KINDS.join(", ")
            )));
        }

        self.session.notifier().emit(
            "generation.requested",
            serde_json::json!({
                "asset": input.asset,
                "prompt": input.prompt,
                "shot_number": input.shot_number,
            }),
        );

        Ok(format!(
            "Queued {} generation; the generation panel will pick it up.",
            input.asset
        ))
    }
}
