use reelkit_llm::{Describe, Property, Schema};
use reelkit_wizard::{Character, ScriptSection};
use serde::Deserialize;

use crate::session::SessionHandle;
use crate::tool::{Tool, ToolError};

#[derive(Clone, Deserialize)]
pub struct AddCharacterInput {
    pub name: String,
    pub description: Option<String>,
}

impl Describe for AddCharacterInput {
    fn describe() -> Schema {
        Schema::Object {
            description: None,
            properties: vec![
                Property::new("name", Schema::string("Character name")),
                Property::new(
                    "description",
                    Schema::string("Who the character is and how they speak"),
                ),
            ],
            required: vec!["name".into()],
        }
    }
}

/// Add (or update) a script character by name. Later tools in the same batch
/// can reference the character once this result is visible.
#[derive(Clone)]
pub struct AddCharacterTool {
    session: SessionHandle,
}

impl AddCharacterTool {
    pub(crate) fn new(session: &SessionHandle) -> Self {
        Self {
            session: session.clone(),
        }
    }
}

impl Tool for AddCharacterTool {
    type Input = AddCharacterInput;

    fn name(&self) -> &str {
        "add_character"
    }

    fn description(&self) -> &str {
        "Add a character to the script, or update its description if a character with the same name already exists."
    }

    async fn call(&self, input: AddCharacterInput) -> Result<String, ToolError> {
        self.session
            .store()
            .update(|s| s.add_character(&input.name, input.description.clone()));

        let character = Character {
            name: input.name.clone(),
            description: input.description.clone(),
        };
        let outcome = self
            .session
            .persist("character", |g, id| g.save_character(id, &character));

        Ok(format!(
            "Character '{}' is in the script.{}",
            input.name,
            outcome.suffix()
        ))
    }
}

#[derive(Clone, Deserialize)]
pub struct SetScriptSectionInput {
    pub heading: String,
    pub body: String,
}

impl Describe for SetScriptSectionInput {
    fn describe() -> Schema {
        Schema::Object {
            description: None,
            properties: vec![
                Property::new(
                    "heading",
                    Schema::string("Section heading, e.g. 'Opening' or 'Call to action'"),
                ),
                Property::new("body", Schema::string("Full text of the section")),
            ],
            required: vec!["heading".into(), "body".into()],
        }
    }
}

/// Write one script section, replacing it if the heading already exists.
#[derive(Clone)]
pub struct SetScriptSectionTool {
    session: SessionHandle,
}

impl SetScriptSectionTool {
    pub(crate) fn new(session: &SessionHandle) -> Self {
        Self {
            session: session.clone(),
        }
    }
}

impl Tool for SetScriptSectionTool {
    type Input = SetScriptSectionInput;

    fn name(&self) -> &str {
        "set_script_section"
    }

    fn description(&self) -> &str {
        "Write a script section under the given heading. Replaces the section body if the heading already exists, otherwise appends a new section."
    }

    async fn call(&self, input: SetScriptSectionInput) -> Result<String, ToolError> {
        self.session
            .store()
            .update(|s| s.set_script_section(&input.heading, &input.body));

        let section = ScriptSection {
            heading: input.heading.clone(),
            body: input.body.clone(),
        };
        let outcome = self
            .session
            .persist("script section", |g, id| g.save_script_section(id, &section));

        Ok(format!(
            "Script section '{}' saved.{}",
            input.heading,
            outcome.suffix()
        ))
    }
}
