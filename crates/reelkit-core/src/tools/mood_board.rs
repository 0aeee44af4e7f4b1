use reelkit_llm::{Describe, Property, Schema};
use reelkit_wizard::MoodBoardPatch;
use serde::Deserialize;

use crate::session::SessionHandle;
use crate::tool::{Tool, ToolError};

#[derive(Clone, Deserialize)]
pub struct UpdateMoodBoardInput {
    pub images: Option<Vec<String>>,
    pub colors: Option<Vec<String>>,
    pub keywords: Option<Vec<String>>,
    pub foundation: Option<String>,
}

impl Describe for UpdateMoodBoardInput {
    fn describe() -> Schema {
        Schema::Object {
            description: None,
            properties: vec![
                Property::new(
                    "images",
                    Schema::array("Image URLs for the mood board", Schema::string("Image URL")),
                ),
                Property::new(
                    "colors",
                    Schema::array("Palette colors as hex strings", Schema::string("Hex color")),
                ),
                Property::new(
                    "keywords",
                    Schema::array("Mood keywords", Schema::string("One keyword")),
                ),
                Property::new(
                    "foundation",
                    Schema::string("Reference to a foundation mood board to build on"),
                ),
            ],
            required: vec![],
        }
    }
}

/// Replace whole mood-board lists; omitted lists are left untouched.
#[derive(Clone)]
pub struct UpdateMoodBoardTool {
    session: SessionHandle,
}

impl UpdateMoodBoardTool {
    pub(crate) fn new(session: &SessionHandle) -> Self {
        Self {
            session: session.clone(),
        }
    }
}

impl Tool for UpdateMoodBoardTool {
    type Input = UpdateMoodBoardInput;

    fn name(&self) -> &str {
        "update_mood_board"
    }

    fn description(&self) -> &str {
        "Set the mood board's images, colors, keywords, or foundation reference. A provided list replaces the existing one; omitted lists are left unchanged."
    }

    async fn call(&self, input: UpdateMoodBoardInput) -> Result<String, ToolError> {
        let board = self.session.store().update(|s| {
            s.merge_mood_board(MoodBoardPatch {
                images: input.images.clone(),
                colors: input.colors.clone(),
                keywords: input.keywords.clone(),
                foundation: input.foundation.clone(),
            });
            s.mood_board.clone()
        });

        let outcome = self
            .session
            .persist("mood board", |g, id| g.save_mood_board(id, &board));

        Ok(format!(
            "Mood board updated: {} images, {} colors, {} keywords.{}",
            board.images.len(),
            board.colors.len(),
            board.keywords.len(),
            outcome.suffix()
        ))
    }
}

#[derive(Clone, Deserialize)]
pub struct AddMoodKeywordsInput {
    pub keywords: Vec<String>,
}

impl Describe for AddMoodKeywordsInput {
    fn describe() -> Schema {
        Schema::Object {
            description: None,
            properties: vec![Property::new(
                "keywords",
                Schema::array("Keywords to add", Schema::string("One keyword")),
            )],
            required: vec!["keywords".into()],
        }
    }
}

/// Append keywords to the mood board, skipping duplicates.
#[derive(Clone)]
pub struct AddMoodKeywordsTool {
    session: SessionHandle,
}

impl AddMoodKeywordsTool {
    pub(crate) fn new(session: &SessionHandle) -> Self {
        Self {
            session: session.clone(),
        }
    }
}

impl Tool for AddMoodKeywordsTool {
    type Input = AddMoodKeywordsInput;

    fn name(&self) -> &str {
        "add_mood_keywords"
    }

    fn description(&self) -> &str {
        "Add keywords to the mood board without touching its images or colors. Duplicates are skipped."
    }

    async fn call(&self, input: AddMoodKeywordsInput) -> Result<String, ToolError> {
        let (added, board) = self.session.store().update(|s| {
            let added = s.add_mood_keywords(input.keywords.clone());
            (added, s.mood_board.clone())
        });

        let outcome = self
            .session
            .persist("mood board", |g, id| g.save_mood_board(id, &board));

        Ok(format!(
            "Added {added} keyword(s); the mood board now has {}.{}",
            board.keywords.len(),
            outcome.suffix()
        ))
    }
}
