use reelkit_llm::{Describe, Property, Schema};
use reelkit_wizard::{CompositionPatch, TextOverlay};
use serde::Deserialize;

use crate::session::SessionHandle;
use crate::tool::{Tool, ToolError};

#[derive(Clone, Deserialize)]
pub struct UpdateCompositionInput {
    pub title_card: Option<String>,
    pub outro_card: Option<String>,
    pub transition: Option<String>,
    pub transition_duration_ms: Option<u32>,
}

impl Describe for UpdateCompositionInput {
    fn describe() -> Schema {
        Schema::Object {
            description: None,
            properties: vec![
                Property::new("title_card", Schema::string("Opening title card text")),
                Property::new("outro_card", Schema::string("Closing card text")),
                Property::new(
                    "transition",
                    Schema::string("Default transition, e.g. 'cut', 'fade', 'wipe'"),
                ),
                Property::new(
                    "transition_duration_ms",
                    Schema::integer("Default transition duration in milliseconds"),
                ),
            ],
            required: vec![],
        }
    }
}

/// Merge fields into the composition settings.
#[derive(Clone)]
pub struct UpdateCompositionTool {
    session: SessionHandle,
}

impl UpdateCompositionTool {
    pub(crate) fn new(session: &SessionHandle) -> Self {
        Self {
            session: session.clone(),
        }
    }
}

impl Tool for UpdateCompositionTool {
    type Input = UpdateCompositionInput;

    fn name(&self) -> &str {
        "update_composition"
    }

    fn description(&self) -> &str {
        "Update composition settings: title card, outro card, default transition and its duration. Fields not provided are left unchanged."
    }

    async fn call(&self, input: UpdateCompositionInput) -> Result<String, ToolError> {
        let composition = self.session.store().update(|s| {
            s.update_composition(CompositionPatch {
                title_card: input.title_card.clone(),
                outro_card: input.outro_card.clone(),
                transition: input.transition.clone(),
                transition_duration_ms: input.transition_duration_ms,
            });
            s.composition.clone()
        });

        let outcome = self
            .session
            .persist("composition", |g, id| g.save_composition(id, &composition));

        Ok(format!("Composition updated.{}", outcome.suffix()))
    }
}

#[derive(Clone, Deserialize)]
pub struct AddTextOverlayInput {
    pub text: String,
    pub at_secs: Option<f64>,
}

impl Describe for AddTextOverlayInput {
    fn describe() -> Schema {
        Schema::Object {
            description: None,
            properties: vec![
                Property::new("text", Schema::string("Overlay text")),
                Property::new(
                    "at_secs",
                    Schema::number("When the overlay appears, in seconds from the start"),
                ),
            ],
            required: vec!["text".into()],
        }
    }
}

/// Append a text overlay; overlays keep their insertion order.
#[derive(Clone)]
pub struct AddTextOverlayTool {
    session: SessionHandle,
}

impl AddTextOverlayTool {
    pub(crate) fn new(session: &SessionHandle) -> Self {
        Self {
            session: session.clone(),
        }
    }
}

impl Tool for AddTextOverlayTool {
    type Input = AddTextOverlayInput;

    fn name(&self) -> &str {
        "add_text_overlay"
    }

    fn description(&self) -> &str {
        "Append a text overlay to the composition's ordered overlay list."
    }

    async fn call(&self, input: AddTextOverlayInput) -> Result<String, ToolError> {
        let composition = self.session.store().update(|s| {
            s.add_text_overlay(TextOverlay {
                text: input.text.clone(),
                at_secs: input.at_secs,
            });
            s.composition.clone()
        });

        let outcome = self
            .session
            .persist("composition", |g, id| g.save_composition(id, &composition));

        Ok(format!(
            "Overlay added ({} total).{}",
            composition.overlays.len(),
            outcome.suffix()
        ))
    }
}
