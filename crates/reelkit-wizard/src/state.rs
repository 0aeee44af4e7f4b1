use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::step::WizardStep;

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("no scene matches '{0}'")]
    SceneNotFound(String),

    #[error("no shot with number {0}")]
    ShotNotFound(u32),
}

pub type Result<T> = std::result::Result<T, WizardError>;

// ---------------------------------------------------------------------------
// Sub-records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformKind {
    New,
    Existing,
}

impl PlatformKind {
    pub fn parse(value: &str) -> Option<PlatformKind> {
        match value {
            "new" => Some(PlatformKind::New),
            "existing" => Some(PlatformKind::Existing),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PlatformKind::New => "new",
            PlatformKind::Existing => "existing",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformChoice {
    pub kind: Option<PlatformKind>,
    pub reference_id: Option<String>,
    pub reference_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Brief {
    pub name: Option<String>,
    pub description: Option<String>,
    pub audience: Option<String>,
    pub tone: Option<String>,
    pub duration_secs: Option<u32>,
    pub aspect_ratio: Option<String>,
    /// Free-form "video content" fields (hook, call to action, ...).
    pub video_content: BTreeMap<String, String>,
}

/// A partial update to the brief. `None` fields are left untouched;
/// `video_content` entries are merged key by key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BriefPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub audience: Option<String>,
    pub tone: Option<String>,
    pub duration_secs: Option<u32>,
    pub aspect_ratio: Option<String>,
    pub video_content: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoodBoard {
    pub images: Vec<String>,
    pub colors: Vec<String>,
    pub keywords: Vec<String>,
    /// Optional reference to a foundation mood board to build on.
    pub foundation: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoodBoardPatch {
    pub images: Option<Vec<String>>,
    pub colors: Option<Vec<String>>,
    pub keywords: Option<Vec<String>>,
    pub foundation: Option<String>,
}

/// A shot inside a storyboard scene. The id is assigned once when the shot
/// is created and is never reassigned by any mutator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shot {
    pub id: u32,
    pub title: Option<String>,
    pub description: String,
}

/// Input shape for creating a shot (before an id is assigned).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShotDraft {
    pub title: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub id: u32,
    pub name: String,
    pub shots: Vec<Shot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDraft {
    pub name: String,
    pub shots: Vec<ShotDraft>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Storyboard {
    pub scenes: Vec<Scene>,
    next_scene_id: u32,
    next_shot_id: u32,
}

impl Storyboard {
    fn new_scene(&mut self, draft: SceneDraft) -> u32 {
        self.next_scene_id += 1;
        let id = self.next_scene_id;
        let shots = draft.shots.into_iter().map(|s| self.new_shot(s)).collect();
        self.scenes.push(Scene {
            id,
            name: draft.name,
            shots,
        });
        id
    }

    fn new_shot(&mut self, draft: ShotDraft) -> Shot {
        self.next_shot_id += 1;
        Shot {
            id: self.next_shot_id,
            title: draft.title,
            description: draft.description,
        }
    }
}

/// An entry in the flat shot list used for per-shot production planning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShotPlan {
    pub scene_index: u32,
    pub number: u32,
    pub description: String,
    pub duration_secs: Option<f64>,
    pub kind: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudioPlan {
    pub voiceover: Option<String>,
    pub music_style: Option<String>,
    pub sound_effects: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudioPatch {
    pub voiceover: Option<String>,
    pub music_style: Option<String>,
    pub sound_effects: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextOverlay {
    pub text: String,
    pub at_secs: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Composition {
    pub title_card: Option<String>,
    pub outro_card: Option<String>,
    pub transition: Option<String>,
    pub transition_duration_ms: Option<u32>,
    pub overlays: Vec<TextOverlay>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompositionPatch {
    pub title_card: Option<String>,
    pub outro_card: Option<String>,
    pub transition: Option<String>,
    pub transition_duration_ms: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptSection {
    pub heading: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptOutline {
    pub sections: Vec<ScriptSection>,
    pub characters: Vec<Character>,
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

/// The single mutable aggregate for one wizard session.
///
/// All mutators are synchronous, validate their input shape via their typed
/// arguments, and merge rather than replace where the mutation is partial.
/// None of them can leave `current_step` outside the step enumeration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardState {
    pub current_step: WizardStep,
    pub completed_steps: BTreeSet<WizardStep>,
    pub platform: PlatformChoice,
    pub brief: Brief,
    pub mood_board: MoodBoard,
    pub storyboard: Storyboard,
    pub script: ScriptOutline,
    pub shots: Vec<ShotPlan>,
    pub audio: AudioPlan,
    pub composition: Composition,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            current_step: WizardStep::Platform,
            completed_steps: BTreeSet::new(),
            platform: PlatformChoice::default(),
            brief: Brief::default(),
            mood_board: MoodBoard::default(),
            storyboard: Storyboard::default(),
            script: ScriptOutline::default(),
            shots: Vec::new(),
            audio: AudioPlan::default(),
            composition: Composition::default(),
        }
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard everything and return to the first step.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // -- platform --

    pub fn set_platform(&mut self, choice: PlatformChoice) {
        self.platform = choice;
    }

    // -- brief --

    pub fn apply_brief(&mut self, patch: BriefPatch) {
        let brief = &mut self.brief;
        merge(&mut brief.name, patch.name);
        merge(&mut brief.description, patch.description);
        merge(&mut brief.audience, patch.audience);
        merge(&mut brief.tone, patch.tone);
        merge(&mut brief.duration_secs, patch.duration_secs);
        merge(&mut brief.aspect_ratio, patch.aspect_ratio);
        brief.video_content.extend(patch.video_content);
    }

    // -- mood board --

    pub fn merge_mood_board(&mut self, patch: MoodBoardPatch) {
        let board = &mut self.mood_board;
        if let Some(images) = patch.images {
            board.images = images;
        }
        if let Some(colors) = patch.colors {
            board.colors = colors;
        }
        if let Some(keywords) = patch.keywords {
            board.keywords = keywords;
        }
        merge(&mut board.foundation, patch.foundation);
    }

    pub fn add_mood_keywords(&mut self, keywords: impl IntoIterator<Item = String>) -> usize {
        let mut added = 0;
        for keyword in keywords {
            if !self.mood_board.keywords.contains(&keyword) {
                self.mood_board.keywords.push(keyword);
                added += 1;
            }
        }
        added
    }

    // -- script --

    /// Insert or replace a script section by heading. Section order is the
    /// order of first insertion.
    pub fn set_script_section(&mut self, heading: impl Into<String>, body: impl Into<String>) {
        let heading = heading.into();
        let body = body.into();
        match self
            .script
            .sections
            .iter_mut()
            .find(|s| s.heading == heading)
        {
            Some(section) => section.body = body,
            None => self.script.sections.push(ScriptSection { heading, body }),
        }
    }

    /// Insert or update a character by name.
    pub fn add_character(&mut self, name: impl Into<String>, description: Option<String>) {
        let name = name.into();
        match self.script.characters.iter_mut().find(|c| c.name == name) {
            Some(character) => {
                if description.is_some() {
                    character.description = description;
                }
            }
            None => self.script.characters.push(Character { name, description }),
        }
    }

    // -- storyboard --

    /// Replace the whole storyboard. Fresh ids are assigned to every scene
    /// and shot; existing ids are never reused for new content.
    pub fn set_storyboard(&mut self, scenes: Vec<SceneDraft>) {
        self.storyboard.scenes.clear();
        for draft in scenes {
            self.storyboard.new_scene(draft);
        }
    }

    /// Append one scene; returns its assigned id.
    pub fn add_scene(&mut self, draft: SceneDraft) -> u32 {
        self.storyboard.new_scene(draft)
    }

    /// Append a shot to the scene with the given name.
    pub fn add_shot_to_scene(&mut self, scene_name: &str, draft: ShotDraft) -> Result<u32> {
        let Some(position) = self
            .storyboard
            .scenes
            .iter()
            .position(|s| s.name == scene_name)
        else {
            return Err(WizardError::SceneNotFound(scene_name.to_string()));
        };
        let shot = self.storyboard.new_shot(draft);
        let id = shot.id;
        self.storyboard.scenes[position].shots.push(shot);
        Ok(id)
    }

    // -- flat shot plans --

    /// Append to the flat shot list; shot numbers are assigned sequentially
    /// when not given.
    pub fn add_shot_plan(&mut self, mut plan: ShotPlan) -> u32 {
        if plan.number == 0 {
            plan.number = self.shots.iter().map(|s| s.number).max().unwrap_or(0) + 1;
        }
        let number = plan.number;
        self.shots.push(plan);
        number
    }

    pub fn update_shot_plan(
        &mut self,
        number: u32,
        f: impl FnOnce(&mut ShotPlan),
    ) -> Result<()> {
        match self.shots.iter_mut().find(|s| s.number == number) {
            Some(plan) => {
                f(plan);
                Ok(())
            }
            None => Err(WizardError::ShotNotFound(number)),
        }
    }

    // -- audio / composition --

    pub fn update_audio(&mut self, patch: AudioPatch) {
        merge(&mut self.audio.voiceover, patch.voiceover);
        merge(&mut self.audio.music_style, patch.music_style);
        if let Some(effects) = patch.sound_effects {
            self.audio.sound_effects = effects;
        }
    }

    pub fn update_composition(&mut self, patch: CompositionPatch) {
        let comp = &mut self.composition;
        merge(&mut comp.title_card, patch.title_card);
        merge(&mut comp.outro_card, patch.outro_card);
        merge(&mut comp.transition, patch.transition);
        merge(&mut comp.transition_duration_ms, patch.transition_duration_ms);
    }

    pub fn add_text_overlay(&mut self, overlay: TextOverlay) {
        self.composition.overlays.push(overlay);
    }

    // -- navigation --

    pub fn mark_step_complete(&mut self, step: WizardStep) {
        self.completed_steps.insert(step);
    }

    pub fn go_to_step(&mut self, step: WizardStep) {
        self.current_step = step;
    }

    /// Move to the next step; saturates at the last step.
    pub fn advance_step(&mut self) -> WizardStep {
        if let Some(next) = self.current_step.next() {
            self.current_step = next;
        }
        self.current_step
    }

    /// Move to the previous step; saturates at the first step.
    pub fn retreat_step(&mut self) -> WizardStep {
        if let Some(previous) = self.current_step.previous() {
            self.current_step = previous;
        }
        self.current_step
    }
}

/// Merge an optional patch field into a target: `Some` overwrites, `None`
/// leaves the existing value alone.
fn merge<T>(target: &mut Option<T>, patch: Option<T>) {
    if patch.is_some() {
        *target = patch;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brief_patch_merges_instead_of_replacing() {
        let mut state = WizardState::new();
        state.apply_brief(BriefPatch {
            name: Some("Launch Video".into()),
            audience: Some("developers".into()),
            ..Default::default()
        });
        state.apply_brief(BriefPatch {
            tone: Some("energetic".into()),
            ..Default::default()
        });

        assert_eq!(state.brief.name.as_deref(), Some("Launch Video"));
        assert_eq!(state.brief.audience.as_deref(), Some("developers"));
        assert_eq!(state.brief.tone.as_deref(), Some("energetic"));
    }

    #[test]
    fn video_content_merges_key_by_key() {
        let mut state = WizardState::new();
        state.apply_brief(BriefPatch {
            video_content: BTreeMap::from([("hook".to_string(), "cold open".to_string())]),
            ..Default::default()
        });
        state.apply_brief(BriefPatch {
            video_content: BTreeMap::from([("cta".to_string(), "subscribe".to_string())]),
            ..Default::default()
        });

        assert_eq!(state.brief.video_content.len(), 2);
        assert_eq!(state.brief.video_content["hook"], "cold open");
    }

    #[test]
    fn scene_then_shot_appends_in_call_order() {
        let mut state = WizardState::new();
        state.add_scene(SceneDraft {
            name: "Intro".into(),
            shots: vec![ShotDraft {
                title: None,
                description: "Opening shot".into(),
            }],
        });
        state
            .add_shot_to_scene(
                "Intro",
                ShotDraft {
                    title: None,
                    description: "Close-up".into(),
                },
            )
            .unwrap();

        assert_eq!(state.storyboard.scenes.len(), 1);
        let scene = &state.storyboard.scenes[0];
        assert_eq!(scene.name, "Intro");
        assert_eq!(scene.shots.len(), 2);
        assert_eq!(scene.shots[0].description, "Opening shot");
        assert_eq!(scene.shots[1].description, "Close-up");
    }

    #[test]
    fn shot_ids_survive_later_mutations() {
        let mut state = WizardState::new();
        state.add_scene(SceneDraft {
            name: "Intro".into(),
            shots: vec![ShotDraft {
                title: None,
                description: "a".into(),
            }],
        });
        let first_id = state.storyboard.scenes[0].shots[0].id;

        state
            .add_shot_to_scene(
                "Intro",
                ShotDraft {
                    title: None,
                    description: "b".into(),
                },
            )
            .unwrap();
        state.add_scene(SceneDraft {
            name: "Outro".into(),
            shots: vec![],
        });

        assert_eq!(state.storyboard.scenes[0].shots[0].id, first_id);
        assert_ne!(state.storyboard.scenes[0].shots[1].id, first_id);
    }

    #[test]
    fn shot_to_missing_scene_is_an_error() {
        let mut state = WizardState::new();
        let err = state
            .add_shot_to_scene(
                "Nowhere",
                ShotDraft {
                    title: None,
                    description: "x".into(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, WizardError::SceneNotFound(_)));
    }

    #[test]
    fn navigation_saturates_at_both_ends() {
        let mut state = WizardState::new();
        assert_eq!(state.retreat_step(), WizardStep::Platform);

        for _ in 0..WizardStep::ALL.len() + 3 {
            state.advance_step();
        }
        assert_eq!(state.current_step, WizardStep::Review);
    }

    #[test]
    fn shot_plan_numbers_assigned_sequentially() {
        let mut state = WizardState::new();
        let n1 = state.add_shot_plan(ShotPlan {
            scene_index: 0,
            number: 0,
            description: "wide".into(),
            duration_secs: None,
            kind: None,
            notes: None,
        });
        let n2 = state.add_shot_plan(ShotPlan {
            scene_index: 0,
            number: 0,
            description: "close".into(),
            duration_secs: Some(2.5),
            kind: Some("close_up".into()),
            notes: None,
        });
        assert_eq!((n1, n2), (1, 2));

        state
            .update_shot_plan(2, |p| p.notes = Some("slow zoom".into()))
            .unwrap();
        assert_eq!(state.shots[1].notes.as_deref(), Some("slow zoom"));
        assert!(state.update_shot_plan(9, |_| {}).is_err());
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let mut state = WizardState::new();
        state.apply_brief(BriefPatch {
            name: Some("x".into()),
            ..Default::default()
        });
        state.mark_step_complete(WizardStep::Platform);
        state.advance_step();

        state.reset();
        assert_eq!(state.current_step, WizardStep::Platform);
        assert!(state.completed_steps.is_empty());
        assert!(state.brief.name.is_none());
    }
}
