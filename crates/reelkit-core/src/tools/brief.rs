use std::collections::BTreeMap;

use reelkit_llm::{Describe, Property, Schema};
use reelkit_wizard::BriefPatch;
use serde::Deserialize;

use crate::session::SessionHandle;
use crate::tool::{Tool, ToolError};

#[derive(Clone, Deserialize)]
pub struct UpdateBriefInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub audience: Option<String>,
    pub tone: Option<String>,
    pub duration_secs: Option<u32>,
    pub aspect_ratio: Option<String>,
    #[serde(default)]
    pub video_content: BTreeMap<String, String>,
}

impl Describe for UpdateBriefInput {
    fn describe() -> Schema {
        Schema::Object {
            description: None,
            properties: vec![
                Property::new("name", Schema::string("Project name")),
                Property::new(
                    "description",
                    Schema::string("What the video is about"),
                ),
                Property::new("audience", Schema::string("Who the video is for")),
                Property::new("tone", Schema::string("Tone of voice, e.g. 'playful'")),
                Property::new(
                    "duration_secs",
                    Schema::integer("Target duration in seconds"),
                ),
                Property::new(
                    "aspect_ratio",
                    Schema::string("Aspect ratio, e.g. '16:9' or '9:16'"),
                ),
                Property::new(
                    "video_content",
                    Schema::Raw(serde_json::json!({
                        "type": "object",
                        "description": "Free-form content fields (hook, call_to_action, ...)",
                        "additionalProperties": { "type": "string" },
                    })),
                ),
            ],
            required: vec![],
        }
    }
}

/// Merge fields into the project brief. Only provided fields change.
#[derive(Clone)]
pub struct UpdateBriefTool {
    session: SessionHandle,
}

impl UpdateBriefTool {
    pub(crate) fn new(session: &SessionHandle) -> Self {
        Self {
            session: session.clone(),
        }
    }
}

impl Tool for UpdateBriefTool {
    type Input = UpdateBriefInput;

    fn name(&self) -> &str {
        "update_brief"
    }

    fn description(&self) -> &str {
        "Update one or more fields of the project brief (name, description, audience, tone, duration, aspect ratio, free-form video content). Fields not provided are left unchanged."
    }

    async fn call(&self, input: UpdateBriefInput) -> Result<String, ToolError> {
        let mut touched: Vec<&str> = Vec::new();
        if input.name.is_some() {
            touched.push("name");
        }
        if input.description.is_some() {
            touched.push("description");
        }
        if input.audience.is_some() {
            touched.push("audience");
        }
        if input.tone.is_some() {
            touched.push("tone");
        }
        if input.duration_secs.is_some() {
            touched.push("duration");
        }
        if input.aspect_ratio.is_some() {
            touched.push("aspect ratio");
        }
        if !input.video_content.is_empty() {
            touched.push("video content");
        }
        if touched.is_empty() {
            return Ok("Brief unchanged; no fields were provided.".into());
        }

        let brief = self.session.store().update(|s| {
            s.apply_brief(BriefPatch {
                name: input.name.clone(),
                description: input.description.clone(),
                audience: input.audience.clone(),
                tone: input.tone.clone(),
                duration_secs: input.duration_secs,
                aspect_ratio: input.aspect_ratio.clone(),
                video_content: input.video_content.clone(),
            });
            s.brief.clone()
        });

        let outcome = self.session.persist("brief", |g, id| g.save_brief(id, &brief));

        Ok(format!(
            "Brief updated ({}).{}",
            touched.join(", "),
            outcome.suffix()
        ))
    }
}
