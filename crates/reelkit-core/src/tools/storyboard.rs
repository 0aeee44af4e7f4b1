use reelkit_llm::{Describe, Property, Schema};
use reelkit_wizard::{SceneDraft, ShotDraft, ShotPlan};
use serde::Deserialize;

use crate::session::SessionHandle;
use crate::tool::{Tool, ToolError};

// ---------------------------------------------------------------------------
// Shared input shapes
// ---------------------------------------------------------------------------

#[derive(Clone, Deserialize)]
pub struct ShotInput {
    pub title: Option<String>,
    pub description: String,
}

impl Describe for ShotInput {
    fn describe() -> Schema {
        Schema::Object {
            description: Some("One shot in a scene".into()),
            properties: vec![
                Property::new("title", Schema::string("Short shot title")),
                Property::new("description", Schema::string("What the shot shows")),
            ],
            required: vec!["description".into()],
        }
    }
}

impl From<ShotInput> for ShotDraft {
    fn from(input: ShotInput) -> Self {
        ShotDraft {
            title: input.title,
            description: input.description,
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct SceneInput {
    pub name: String,
    #[serde(default)]
    pub shots: Vec<ShotInput>,
}

impl Describe for SceneInput {
    fn describe() -> Schema {
        Schema::Object {
            description: Some("One storyboard scene".into()),
            properties: vec![
                Property::new("name", Schema::string("Scene name, e.g. 'Intro'")),
                Property::new(
                    "shots",
                    Schema::array("Shots in this scene, in order", ShotInput::describe()),
                ),
            ],
            required: vec!["name".into()],
        }
    }
}

impl From<SceneInput> for SceneDraft {
    fn from(input: SceneInput) -> Self {
        SceneDraft {
            name: input.name,
            shots: input.shots.into_iter().map(Into::into).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// set_storyboard
// ---------------------------------------------------------------------------

#[derive(Clone, Deserialize)]
pub struct SetStoryboardInput {
    pub scenes: Vec<SceneInput>,
}

impl Describe for SetStoryboardInput {
    fn describe() -> Schema {
        Schema::Object {
            description: None,
            properties: vec![Property::new(
                "scenes",
                Schema::array("The full ordered scene list", SceneInput::describe()),
            )],
            required: vec!["scenes".into()],
        }
    }
}

/// Replace the entire storyboard with a new ordered scene list.
#[derive(Clone)]
pub struct SetStoryboardTool {
    session: SessionHandle,
}

impl SetStoryboardTool {
    pub(crate) fn new(session: &SessionHandle) -> Self {
        Self {
            session: session.clone(),
        }
    }
}

impl Tool for SetStoryboardTool {
    type Input = SetStoryboardInput;

    fn name(&self) -> &str {
        "set_storyboard"
    }

    fn description(&self) -> &str {
        "Replace the whole storyboard with the given ordered list of scenes and their shots. Use add_scene or add_shot_to_scene for incremental changes."
    }

    async fn call(&self, input: SetStoryboardInput) -> Result<String, ToolError> {
        let storyboard = self.session.store().update(|s| {
            s.set_storyboard(input.scenes.iter().cloned().map(Into::into).collect());
            s.storyboard.clone()
        });

        let shots: usize = storyboard.scenes.iter().map(|s| s.shots.len()).sum();
        let outcome = self
            .session
            .persist("storyboard", |g, id| g.save_storyboard(id, &storyboard));

        Ok(format!(
            "Storyboard set: {} scene(s), {} shot(s).{}",
            storyboard.scenes.len(),
            shots,
            outcome.suffix()
        ))
    }
}

// ---------------------------------------------------------------------------
// add_scene / add_shot_to_scene
// ---------------------------------------------------------------------------

#[derive(Clone, Deserialize)]
pub struct AddSceneInput {
    pub name: String,
    #[serde(default)]
    pub shots: Vec<ShotInput>,
}

impl Describe for AddSceneInput {
    fn describe() -> Schema {
        SceneInput::describe()
    }
}

/// Append one scene to the storyboard.
#[derive(Clone)]
pub struct AddSceneTool {
    session: SessionHandle,
}

impl AddSceneTool {
    pub(crate) fn new(session: &SessionHandle) -> Self {
        Self {
            session: session.clone(),
        }
    }
}

impl Tool for AddSceneTool {
    type Input = AddSceneInput;

    fn name(&self) -> &str {
        "add_scene"
    }

    fn description(&self) -> &str {
        "Append a scene (optionally with initial shots) to the end of the storyboard."
    }

    async fn call(&self, input: AddSceneInput) -> Result<String, ToolError> {
        let shot_count = input.shots.len();
        let storyboard = self.session.store().update(|s| {
            s.add_scene(SceneDraft {
                name: input.name.clone(),
                shots: input.shots.iter().cloned().map(Into::into).collect(),
            });
            s.storyboard.clone()
        });

        let outcome = self
            .session
            .persist("storyboard", |g, id| g.save_storyboard(id, &storyboard));

        Ok(format!(
            "Added scene '{}' with {shot_count} shot(s); the storyboard now has {} scene(s).{}",
            input.name,
            storyboard.scenes.len(),
            outcome.suffix()
        ))
    }
}

#[derive(Clone, Deserialize)]
pub struct AddShotToSceneInput {
    pub scene_name: String,
    pub title: Option<String>,
    pub description: String,
}

impl Describe for AddShotToSceneInput {
    fn describe() -> Schema {
        Schema::Object {
            description: None,
            properties: vec![
                Property::new("scene_name", Schema::string("Name of the target scene")),
                Property::new("title", Schema::string("Short shot title")),
                Property::new("description", Schema::string("What the shot shows")),
            ],
            required: vec!["scene_name".into(), "description".into()],
        }
    }
}

/// Append one shot to an existing scene, found by name.
#[derive(Clone)]
pub struct AddShotToSceneTool {
    session: SessionHandle,
}

impl AddShotToSceneTool {
    pub(crate) fn new(session: &SessionHandle) -> Self {
        Self {
            session: session.clone(),
        }
    }
}

impl Tool for AddShotToSceneTool {
    type Input = AddShotToSceneInput;

    fn name(&self) -> &str {
        "add_shot_to_scene"
    }

    fn description(&self) -> &str {
        "Append a shot to the end of the named scene. Fails with a descriptive message when no scene has that name."
    }

    async fn call(&self, input: AddShotToSceneInput) -> Result<String, ToolError> {
        let storyboard = self.session.store().update(|s| {
            s.add_shot_to_scene(
                &input.scene_name,
                ShotDraft {
                    title: input.title.clone(),
                    description: input.description.clone(),
                },
            )?;
            Ok::<_, ToolError>(s.storyboard.clone())
        })?;

        let shots = storyboard
            .scenes
            .iter()
            .find(|s| s.name == input.scene_name)
            .map(|s| s.shots.len())
            .unwrap_or(0);
        let outcome = self
            .session
            .persist("storyboard", |g, id| g.save_storyboard(id, &storyboard));

        Ok(format!(
            "Added shot to scene '{}' (now {shots} shot(s)).{}",
            input.scene_name,
            outcome.suffix()
        ))
    }
}

// ---------------------------------------------------------------------------
// Flat shot list
// ---------------------------------------------------------------------------

#[derive(Clone, Deserialize)]
pub struct AddShotInput {
    pub scene_index: Option<u32>,
    pub number: Option<u32>,
    pub description: String,
    pub duration_secs: Option<f64>,
    pub shot_type: Option<String>,
    pub notes: Option<String>,
}

impl Describe for AddShotInput {
    fn describe() -> Schema {
        Schema::Object {
            description: None,
            properties: vec![
                Property::new(
                    "scene_index",
                    Schema::integer("Zero-based index of the scene this shot belongs to"),
                ),
                Property::new(
                    "number",
                    Schema::integer("Shot number; assigned sequentially when omitted"),
                ),
                Property::new("description", Schema::string("What the shot shows")),
                Property::new("duration_secs", Schema::number("Shot length in seconds")),
                Property::new(
                    "shot_type",
                    Schema::string("Framing, e.g. 'wide', 'close_up', 'over_shoulder'"),
                ),
                Property::new("notes", Schema::string("Production notes")),
            ],
            required: vec!["description".into()],
        }
    }
}

/// Append an entry to the flat production shot list.
#[derive(Clone)]
pub struct AddShotTool {
    session: SessionHandle,
}

impl AddShotTool {
    pub(crate) fn new(session: &SessionHandle) -> Self {
        Self {
            session: session.clone(),
        }
    }
}

impl Tool for AddShotTool {
    type Input = AddShotInput;

    fn name(&self) -> &str {
        "add_shot"
    }

    fn description(&self) -> &str {
        "Add an entry to the flat production shot list (scene index, number, description, duration, type, notes). Use add_shot_to_scene for storyboard scenes."
    }

    async fn call(&self, input: AddShotInput) -> Result<String, ToolError> {
        let number = self.session.store().update(|s| {
            s.add_shot_plan(ShotPlan {
                scene_index: input.scene_index.unwrap_or(0),
                number: input.number.unwrap_or(0),
                description: input.description.clone(),
                duration_secs: input.duration_secs,
                kind: input.shot_type.clone(),
                notes: input.notes.clone(),
            })
        });

        Ok(format!("Added shot {number} to the shot list."))
    }
}

#[derive(Clone, Deserialize)]
pub struct UpdateShotInput {
    pub number: u32,
    pub description: Option<String>,
    pub duration_secs: Option<f64>,
    pub shot_type: Option<String>,
    pub notes: Option<String>,
}

impl Describe for UpdateShotInput {
    fn describe() -> Schema {
        Schema::Object {
            description: None,
            properties: vec![
                Property::new("number", Schema::integer("Number of the shot to update")),
                Property::new("description", Schema::string("New description")),
                Property::new("duration_secs", Schema::number("New length in seconds")),
                Property::new("shot_type", Schema::string("New framing")),
                Property::new("notes", Schema::string("New production notes")),
            ],
            required: vec!["number".into()],
        }
    }
}

/// Merge fields into an existing shot-list entry.
#[derive(Clone)]
pub struct UpdateShotTool {
    session: SessionHandle,
}

impl UpdateShotTool {
    pub(crate) fn new(session: &SessionHandle) -> Self {
        Self {
            session: session.clone(),
        }
    }
}

impl Tool for UpdateShotTool {
    type Input = UpdateShotInput;

    fn name(&self) -> &str {
        "update_shot"
    }

    fn description(&self) -> &str {
        "Update fields of a shot-list entry by its number. Fields not provided are left unchanged."
    }

    async fn call(&self, input: UpdateShotInput) -> Result<String, ToolError> {
        self.session.store().update(|s| {
            s.update_shot_plan(input.number, |plan| {
                if let Some(description) = input.description.clone() {
                    plan.description = description;
                }
                if input.duration_secs.is_some() {
                    plan.duration_secs = input.duration_secs;
                }
                if input.shot_type.is_some() {
                    plan.kind = input.shot_type.clone();
                }
                if input.notes.is_some() {
                    plan.notes = input.notes.clone();
                }
            })
        })?;

        Ok(format!("Shot {} updated.", input.number))
    }
}
