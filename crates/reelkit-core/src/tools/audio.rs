use reelkit_llm::{Describe, Property, Schema};
use reelkit_wizard::AudioPatch;
use serde::Deserialize;

use crate::session::SessionHandle;
use crate::tool::{Tool, ToolError};

#[derive(Clone, Deserialize)]
pub struct UpdateAudioPlanInput {
    pub voiceover: Option<String>,
    pub music_style: Option<String>,
    pub sound_effects: Option<Vec<String>>,
}

impl Describe for UpdateAudioPlanInput {
    fn describe() -> Schema {
        Schema::Object {
            description: None,
            properties: vec![
                Property::new("voiceover", Schema::string("Voiceover script text")),
                Property::new(
                    "music_style",
                    Schema::string("Music style, e.g. 'upbeat electronic'"),
                ),
                Property::new(
                    "sound_effects",
                    Schema::array(
                        "Sound effects to use, replacing the current list",
                        Schema::string("One sound effect"),
                    ),
                ),
            ],
            required: vec![],
        }
    }
}

/// Merge fields into the audio plan.
#[derive(Clone)]
pub struct UpdateAudioPlanTool {
    session: SessionHandle,
}

impl UpdateAudioPlanTool {
    pub(crate) fn new(session: &SessionHandle) -> Self {
        Self {
            session: session.clone(),
        }
    }
}

impl Tool for UpdateAudioPlanTool {
    type Input = UpdateAudioPlanInput;

    fn name(&self) -> &str {
        "update_audio_plan"
    }

    fn description(&self) -> &str {
        "Update the audio plan: voiceover script, music style, and/or the sound-effect list. Fields not provided are left unchanged."
    }

    async fn call(&self, input: UpdateAudioPlanInput) -> Result<String, ToolError> {
        let audio = self.session.store().update(|s| {
            s.update_audio(AudioPatch {
                voiceover: input.voiceover.clone(),
                music_style: input.music_style.clone(),
                sound_effects: input.sound_effects.clone(),
            });
            s.audio.clone()
        });

        let outcome = self
            .session
            .persist("audio plan", |g, id| g.save_audio_plan(id, &audio));

        Ok(format!(
            "Audio plan updated ({} sound effect(s) on file).{}",
            audio.sound_effects.len(),
            outcome.suffix()
        ))
    }
}
