//! Shared fixtures for registry and orchestrator tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reelkit_llm::{
    CompletionRequest, ConversationBackend, Error, StopReason, ToolCallPart, TurnResponse, Usage,
};
use reelkit_wizard::{
    AudioPlan, Brief, Character, Composition, MoodBoard, PlatformChoice, ScriptSection, Storyboard,
    WizardStore,
};

use crate::gateway::{GatewayError, ProjectGateway, ProjectId};
use crate::notify::Notifier;
use crate::session::SessionHandle;

// ---------------------------------------------------------------------------
// MemoryGateway
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryRows {
    projects: HashMap<String, ProjectId>,
    briefs: HashMap<ProjectId, Brief>,
    platforms: HashMap<ProjectId, PlatformChoice>,
    mood_boards: HashMap<ProjectId, MoodBoard>,
    storyboards: HashMap<ProjectId, Storyboard>,
    audio_plans: HashMap<ProjectId, AudioPlan>,
    compositions: HashMap<ProjectId, Composition>,
    script_sections: HashMap<(ProjectId, String), String>,
    characters: HashMap<(ProjectId, String), Option<String>>,
}

/// In-memory [`ProjectGateway`] with the same idempotency contract as the
/// sqlite implementation. Can be switched into a failing mode to exercise
/// degraded saves.
#[derive(Default)]
pub(crate) struct MemoryGateway {
    rows: Mutex<MemoryRows>,
    next_id: AtomicU32,
    fail_saves: Mutex<bool>,
}

impl MemoryGateway {
    pub fn set_fail_saves(&self, fail: bool) {
        *self.fail_saves.lock().unwrap() = fail;
    }

    pub fn project_count(&self) -> usize {
        self.rows.lock().unwrap().projects.len()
    }

    pub fn brief(&self, project_id: &str) -> Option<Brief> {
        self.rows.lock().unwrap().briefs.get(project_id).cloned()
    }

    pub fn brief_row_count(&self) -> usize {
        self.rows.lock().unwrap().briefs.len()
    }

    fn check_failure(&self) -> Result<(), GatewayError> {
        if *self.fail_saves.lock().unwrap() {
            Err(GatewayError::new("remote store unavailable"))
        } else {
            Ok(())
        }
    }
}

impl ProjectGateway for MemoryGateway {
    fn ensure_project(&self, session_key: &str) -> Result<ProjectId, GatewayError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(id) = rows.projects.get(session_key) {
            return Ok(id.clone());
        }
        let id = format!("proj_{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        rows.projects.insert(session_key.to_string(), id.clone());
        Ok(id)
    }

    fn save_platform(&self, project_id: &str, platform: &PlatformChoice) -> Result<(), GatewayError> {
        self.check_failure()?;
        let mut rows = self.rows.lock().unwrap();
        rows.platforms.insert(project_id.into(), platform.clone());
        Ok(())
    }

    fn save_brief(&self, project_id: &str, brief: &Brief) -> Result<(), GatewayError> {
        self.check_failure()?;
        let mut rows = self.rows.lock().unwrap();
        rows.briefs.insert(project_id.into(), brief.clone());
        Ok(())
    }

    fn save_mood_board(&self, project_id: &str, board: &MoodBoard) -> Result<(), GatewayError> {
        self.check_failure()?;
        let mut rows = self.rows.lock().unwrap();
        rows.mood_boards.insert(project_id.into(), board.clone());
        Ok(())
    }

    fn save_storyboard(&self, project_id: &str, storyboard: &Storyboard) -> Result<(), GatewayError> {
        self.check_failure()?;
        let mut rows = self.rows.lock().unwrap();
        rows.storyboards.insert(project_id.into(), storyboard.clone());
        Ok(())
    }

    fn save_audio_plan(&self, project_id: &str, audio: &AudioPlan) -> Result<(), GatewayError> {
        self.check_failure()?;
        let mut rows = self.rows.lock().unwrap();
        rows.audio_plans.insert(project_id.into(), audio.clone());
        Ok(())
    }

    fn save_composition(&self, project_id: &str, composition: &Composition) -> Result<(), GatewayError> {
        self.check_failure()?;
        let mut rows = self.rows.lock().unwrap();
        rows.compositions.insert(project_id.into(), composition.clone());
        Ok(())
    }

    fn save_script_section(&self, project_id: &str, section: &ScriptSection) -> Result<(), GatewayError> {
        self.check_failure()?;
        let mut rows = self.rows.lock().unwrap();
        rows.script_sections
            .insert((project_id.into(), section.heading.clone()), section.body.clone());
        Ok(())
    }

    fn save_character(&self, project_id: &str, character: &Character) -> Result<(), GatewayError> {
        self.check_failure()?;
        let mut rows = self.rows.lock().unwrap();
        rows.characters
            .insert((project_id.into(), character.name.clone()), character.description.clone());
        Ok(())
    }
}

/// A session wired to a fresh store and memory gateway.
pub(crate) fn memory_session() -> (SessionHandle, Arc<MemoryGateway>) {
    let gateway = Arc::new(MemoryGateway::default());
    let session = SessionHandle::new(
        "sess_test",
        WizardStore::new(),
        gateway.clone(),
        Notifier::new(),
    );
    (session, gateway)
}

// ---------------------------------------------------------------------------
// Conversation backends
// ---------------------------------------------------------------------------

pub(crate) fn tool_use(calls: Vec<ToolCallPart>) -> TurnResponse {
    TurnResponse {
        text: String::new(),
        tool_calls: calls,
        stop_reason: StopReason::ToolUse,
        usage: Usage {
            input_tokens: 10,
            output_tokens: 5,
        },
    }
}

pub(crate) fn end_turn(text: &str) -> TurnResponse {
    TurnResponse {
        text: text.to_string(),
        tool_calls: vec![],
        stop_reason: StopReason::EndTurn,
        usage: Usage {
            input_tokens: 10,
            output_tokens: 5,
        },
    }
}

pub(crate) fn call(id: &str, name: &str, arguments: serde_json::Value) -> ToolCallPart {
    ToolCallPart {
        id: id.to_string(),
        name: name.to_string(),
        arguments,
    }
}

/// Plays back a fixed sequence of responses, then keeps answering a plain
/// end-of-turn message.
pub(crate) struct ScriptedBackend {
    responses: Mutex<VecDeque<TurnResponse>>,
}

impl ScriptedBackend {
    pub fn new(responses: Vec<TurnResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl ConversationBackend for ScriptedBackend {
    fn model_id(&self) -> &str {
        "scripted"
    }

    fn provider(&self) -> &str {
        "test"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<TurnResponse, Error> {
        let next = self.responses.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| end_turn("done")))
    }
}

/// Answers `tool_use` forever — the unbounded-loop regression case.
pub(crate) struct AlwaysToolUseBackend {
    counter: AtomicU32,
}

impl AlwaysToolUseBackend {
    pub fn new() -> Self {
        Self {
            counter: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl ConversationBackend for AlwaysToolUseBackend {
    fn model_id(&self) -> &str {
        "always-tool-use"
    }

    fn provider(&self) -> &str {
        "test"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<TurnResponse, Error> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(tool_use(vec![call(
            &format!("toolu_{n}"),
            "next_step",
            serde_json::json!({}),
        )]))
    }
}

/// Fails every call at the transport level.
pub(crate) struct FailingBackend;

#[async_trait]
impl ConversationBackend for FailingBackend {
    fn model_id(&self) -> &str {
        "failing"
    }

    fn provider(&self) -> &str {
        "test"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<TurnResponse, Error> {
        Err(Error::Other("connection refused".into()))
    }
}

/// Blocks until released, then ends the turn. Used to hold the busy flag
/// up while a test pokes at the assistant from outside.
pub(crate) struct BlockingBackend {
    pub gate: Arc<tokio::sync::Notify>,
}

#[async_trait]
impl ConversationBackend for BlockingBackend {
    fn model_id(&self) -> &str {
        "blocking"
    }

    fn provider(&self) -> &str {
        "test"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<TurnResponse, Error> {
        self.gate.notified().await;
        Ok(end_turn("released"))
    }
}
