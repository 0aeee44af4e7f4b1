use reelkit_llm::{Describe, Property, Schema};
use reelkit_wizard::{PlatformChoice, PlatformKind, WizardStep};
use serde::Deserialize;

use crate::session::SessionHandle;
use crate::tool::{Tool, ToolError};

#[derive(Clone, Deserialize)]
pub struct SelectPlatformInput {
    /// "new" or "existing".
    #[serde(rename = "type")]
    pub kind: String,
    pub reference_id: Option<String>,
    pub reference_name: Option<String>,
}

impl Describe for SelectPlatformInput {
    fn describe() -> Schema {
        Schema::Object {
            description: None,
            properties: vec![
                Property::new(
                    "type",
                    Schema::string_enum(
                        "Whether to create a new platform or use an existing one",
                        &["new", "existing"],
                    ),
                ),
                Property::new(
                    "reference_id",
                    Schema::string("Identifier of the existing platform, when type is 'existing'"),
                ),
                Property::new(
                    "reference_name",
                    Schema::string("Display name of the existing platform"),
                ),
            ],
            required: vec!["type".into()],
        }
    }
}

/// Set the project's platform and move the wizard past the platform step.
#[derive(Clone)]
pub struct SelectPlatformTool {
    session: SessionHandle,
}

impl SelectPlatformTool {
    pub(crate) fn new(session: &SessionHandle) -> Self {
        Self {
            session: session.clone(),
        }
    }
}

impl Tool for SelectPlatformTool {
    type Input = SelectPlatformInput;

    fn name(&self) -> &str {
        "select_platform"
    }

    fn description(&self) -> &str {
        "Choose whether this project targets a new platform or an existing one. Completes the platform step and advances the wizard."
    }

    async fn call(&self, input: SelectPlatformInput) -> Result<String, ToolError> {
        let Some(kind) = PlatformKind::parse(&input.kind) else {
            return Err(ToolError::Failed(format!(
                "unknown platform type '{}'; expected 'new' or 'existing'",
                input.kind
            )));
        };

        let (platform, step) = self.session.store().update(|s| {
            s.set_platform(PlatformChoice {
                kind: Some(kind),
                reference_id: input.reference_id.clone(),
                reference_name: input.reference_name.clone(),
            });
            s.mark_step_complete(WizardStep::Platform);
            if s.current_step == WizardStep::Platform {
                s.advance_step();
            }
            (s.platform.clone(), s.current_step)
        });

        let outcome = self
            .session
            .persist("platform", |g, id| g.save_platform(id, &platform));

        Ok(format!(
            "Platform set to '{}'. The wizard is now on the {} step.{}",
            kind.name(),
            step.name(),
            outcome.suffix()
        ))
    }
}
