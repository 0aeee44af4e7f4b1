use std::sync::{Arc, Mutex};

use reelkit_llm::{
    AssistantPart, CompletionRequest, ConversationModel, Message, Usage, request,
};
use tokio::sync::mpsc;

use crate::context::BubbleContext;
use crate::event::AssistantEvent;
use crate::prompt;
use crate::registry::ToolRegistry;
use crate::session::SessionHandle;

/// Hard ceiling on tool rounds per turn. An engine that keeps answering
/// `tool_use` would otherwise loop forever; past the ceiling we force a
/// terminal fallback message instead.
pub const MAX_TOOL_ROUNDS: usize = 10;

const GREETING: &str =
    "Hi! I'm your production assistant. Tell me about the video you want to make and I'll set the project up as we go.";
const FALLBACK_CONNECTING: &str =
    "I'm having trouble connecting right now. Please try again in a moment.";
const FALLBACK_EXHAUSTED: &str =
    "I wasn't able to finish that after several attempts. Please try again.";

struct AssistantState {
    messages: Vec<Message>,
    busy: bool,
}

/// The tool-call loop orchestrator for one wizard session.
///
/// Holds the conversation model, the message history, and the session's tool
/// registry. UI-agnostic — communicates via [`AssistantEvent`]s.
pub struct Assistant {
    model: Arc<ConversationModel>,
    system_prompt: String,
    session: SessionHandle,
    registry: Arc<ToolRegistry>,
    state: Arc<Mutex<AssistantState>>,
}

impl Assistant {
    /// Create an assistant for one session, with the full tool catalogue
    /// installed and the greeting seeded into history.
    pub fn new(model: ConversationModel, session: SessionHandle) -> Self {
        let registry = ToolRegistry::for_session(&session);
        Self {
            model: Arc::new(model),
            system_prompt: prompt::system_prompt(),
            registry: Arc::new(registry),
            session,
            state: Arc::new(Mutex::new(AssistantState {
                messages: vec![Message::assistant(GREETING)],
                busy: false,
            })),
        }
    }

    /// The conversation history (completed messages only).
    pub fn messages(&self) -> Vec<Message> {
        self.state.lock().unwrap().messages.clone()
    }

    /// Whether a turn is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.state.lock().unwrap().busy
    }

    /// Clear the conversation wholesale, re-seed the greeting, and reset
    /// the wizard state.
    pub fn reset(&self) {
        let mut s = self.state.lock().unwrap();
        s.messages.clear();
        s.messages.push(Message::assistant(GREETING));
        drop(s);
        self.session.store().reset();
    }

    /// Submit a user message and get back a stream of events for the turn.
    ///
    /// While a turn is in flight, further sends are refused with an
    /// immediate error event — the UI is expected to disable its send
    /// affordance while busy, this is the backstop.
    pub fn send(&self, text: impl Into<String>) -> TurnStream {
        let content = text.into();
        let (tx, rx) = mpsc::channel(64);

        {
            let mut s = self.state.lock().unwrap();
            if s.busy {
                let _ = tx.try_send(AssistantEvent::Error {
                    error: "a turn is already in progress".into(),
                });
                return TurnStream { rx };
            }
            s.busy = true;
        }

        let model = Arc::clone(&self.model);
        let registry = Arc::clone(&self.registry);
        let state = Arc::clone(&self.state);
        let session = self.session.clone();
        let system_prompt = self.system_prompt.clone();

        tokio::spawn(async move {
            turn_loop(model, registry, state, session, system_prompt, content, tx).await;
        });

        TurnStream { rx }
    }
}

/// A stream of [`AssistantEvent`]s from a single turn.
pub struct TurnStream {
    rx: mpsc::Receiver<AssistantEvent>,
}

impl TurnStream {
    /// Get the next event, or `None` when the turn is complete.
    pub async fn next(&mut self) -> Option<AssistantEvent> {
        self.rx.recv().await
    }
}

// ---------------------------------------------------------------------------
// Turn loop (runs in spawned task)
// ---------------------------------------------------------------------------

/// Clears the busy flag on every exit path, including panics and early
/// returns — a guaranteed-release obligation, not conditional on success.
struct BusyGuard(Arc<Mutex<AssistantState>>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.lock().unwrap().busy = false;
    }
}

async fn turn_loop(
    model: Arc<ConversationModel>,
    registry: Arc<ToolRegistry>,
    state: Arc<Mutex<AssistantState>>,
    session: SessionHandle,
    system_prompt: String,
    content: String,
    tx: mpsc::Sender<AssistantEvent>,
) {
    let _busy = BusyGuard(Arc::clone(&state));

    // 1. Record the user message (append-only from here on).
    {
        let mut s = state.lock().unwrap();
        s.messages.push(Message::user(&content));
    }
    if tx
        .send(AssistantEvent::UserMessage { content })
        .await
        .is_err()
    {
        return; // receiver dropped
    }

    let mut usage = Usage::default();
    let mut final_text: Option<String> = None;

    // 2. Tool-call rounds, bounded by MAX_TOOL_ROUNDS.
    for round in 0..MAX_TOOL_ROUNDS {
        let request = build_request(&system_prompt, &session, &state, &registry);

        let response = match model.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, round, "conversation engine call failed");
                append_assistant(&state, FALLBACK_CONNECTING);
                let _ = tx
                    .send(AssistantEvent::AssistantMessage {
                        content: FALLBACK_CONNECTING.into(),
                    })
                    .await;
                let _ = tx
                    .send(AssistantEvent::Error {
                        error: e.to_string(),
                    })
                    .await;
                let _ = tx.send(AssistantEvent::TurnComplete { usage }).await;
                return;
            }
        };

        usage.absorb(&response.usage);

        if !response.wants_tools() {
            final_text = Some(response.text);
            break;
        }

        // Record the assistant message exactly as returned: any text first,
        // then the tool calls in order.
        {
            let mut parts = Vec::new();
            if !response.text.is_empty() {
                parts.push(AssistantPart::Text(response.text.clone()));
            }
            parts.extend(
                response
                    .tool_calls
                    .iter()
                    .cloned()
                    .map(AssistantPart::ToolCall),
            );
            let mut s = state.lock().unwrap();
            s.messages.push(Message::Assistant { parts });
        }

        // Execute sequentially, in the order returned; later calls may
        // depend on state mutated by earlier ones.
        let mut results = Vec::with_capacity(response.tool_calls.len());
        for call in &response.tool_calls {
            if tx
                .send(AssistantEvent::ToolCallStart {
                    id: call.id.clone(),
                    name: call.name.clone(),
                })
                .await
                .is_err()
            {
                return;
            }

            let result = registry.execute(call).await;

            if tx
                .send(AssistantEvent::ToolCallDone {
                    id: result.tool_call_id.clone(),
                    content: result.content.clone(),
                })
                .await
                .is_err()
            {
                return;
            }
            results.push(result);
        }

        {
            let mut s = state.lock().unwrap();
            s.messages.push(Message::tool_results(results));
        }
        // Loop back: the next request carries the results and a context
        // snapshot rebuilt after these mutations.
    }

    // 3. Final utterance (or a terminal fallback when the cap ran out).
    match final_text {
        Some(text) if !text.trim().is_empty() => {
            append_assistant(&state, &text);
            let _ = tx
                .send(AssistantEvent::AssistantMessage { content: text })
                .await;
        }
        Some(_) => {
            // Tool-only turn with an empty final message: nothing to append.
        }
        None => {
            tracing::warn!(cap = MAX_TOOL_ROUNDS, "tool-round cap exhausted");
            append_assistant(&state, FALLBACK_EXHAUSTED);
            let _ = tx
                .send(AssistantEvent::AssistantMessage {
                    content: FALLBACK_EXHAUSTED.into(),
                })
                .await;
        }
    }

    let _ = tx.send(AssistantEvent::TurnComplete { usage }).await;
}

fn build_request(
    system_prompt: &str,
    session: &SessionHandle,
    state: &Arc<Mutex<AssistantState>>,
    registry: &ToolRegistry,
) -> CompletionRequest {
    // Context is captured fresh for every request, never cached, so it
    // reflects mutations from tool calls earlier in this same turn.
    let context = BubbleContext::capture(session.store());

    let mut req = request();
    req.system(format!(
        "{system_prompt}\n\nProject state:\n{}",
        context.render()
    ));
    {
        let s = state.lock().unwrap();
        req.messages(s.messages.clone());
    }
    req.tools(registry.definitions());
    req.max_tokens(2048);
    req.build()
}

fn append_assistant(state: &Arc<Mutex<AssistantState>>, text: &str) {
    let mut s = state.lock().unwrap();
    s.messages.push(Message::assistant(text));
}

#[cfg(test)]
mod tests {
    use reelkit_wizard::{PlatformKind, WizardStep};
    use serde_json::json;

    use super::*;
    use crate::testutil::{
        AlwaysToolUseBackend, BlockingBackend, FailingBackend, ScriptedBackend, call, end_turn,
        memory_session, tool_use,
    };

    async fn drain(stream: &mut TurnStream) -> Vec<AssistantEvent> {
        let mut events = Vec::new();
        while let Some(event) = stream.next().await {
            events.push(event);
        }
        events
    }

    fn last_assistant_text(events: &[AssistantEvent]) -> Option<String> {
        events.iter().rev().find_map(|e| match e {
            AssistantEvent::AssistantMessage { content } => Some(content.clone()),
            _ => None,
        })
    }

    #[tokio::test]
    async fn platform_scenario_runs_tool_then_final_text() {
        let (session, _) = memory_session();
        let assistant = Assistant::new(
            ConversationModel::new(ScriptedBackend::new(vec![
                tool_use(vec![call("toolu_1", "select_platform", json!({ "type": "new" }))]),
                end_turn("Platform's ready — let's write the brief."),
            ])),
            session.clone(),
        );

        let mut stream = assistant.send("Create a new platform");
        let events = drain(&mut stream).await;

        let state = session.store().current();
        assert_eq!(state.platform.kind, Some(PlatformKind::New));
        assert_eq!(state.current_step, WizardStep::Brief);

        assert!(events.iter().any(|e| matches!(
            e,
            AssistantEvent::ToolCallDone { id, .. } if id == "toolu_1"
        )));
        assert_eq!(
            last_assistant_text(&events).as_deref(),
            Some("Platform's ready — let's write the brief.")
        );

        // The final text is the last message in history.
        let messages = assistant.messages();
        assert_eq!(
            messages.last().and_then(|m| m.text()).as_deref(),
            Some("Platform's ready — let's write the brief.")
        );
        assert!(!assistant.is_busy());
    }

    #[tokio::test]
    async fn always_tool_use_backend_terminates_at_the_cap() {
        let (session, _) = memory_session();
        let assistant = Assistant::new(
            ConversationModel::new(AlwaysToolUseBackend::new()),
            session,
        );

        let mut stream = assistant.send("loop forever please");
        let events = drain(&mut stream).await;

        let rounds = events
            .iter()
            .filter(|e| matches!(e, AssistantEvent::ToolCallStart { .. }))
            .count();
        assert_eq!(rounds, MAX_TOOL_ROUNDS);
        assert_eq!(
            last_assistant_text(&events).as_deref(),
            Some(FALLBACK_EXHAUSTED)
        );
        assert!(events
            .iter()
            .any(|e| matches!(e, AssistantEvent::TurnComplete { .. })));
        assert!(!assistant.is_busy());
    }

    #[tokio::test]
    async fn engine_failure_appends_fallback_and_releases_busy() {
        let (session, _) = memory_session();
        let assistant = Assistant::new(ConversationModel::new(FailingBackend), session);

        let mut stream = assistant.send("hello");
        let events = drain(&mut stream).await;

        assert_eq!(
            last_assistant_text(&events).as_deref(),
            Some(FALLBACK_CONNECTING)
        );
        assert!(events
            .iter()
            .any(|e| matches!(e, AssistantEvent::Error { .. })));
        assert!(!assistant.is_busy());

        let messages = assistant.messages();
        assert_eq!(
            messages.last().and_then(|m| m.text()).as_deref(),
            Some(FALLBACK_CONNECTING)
        );
    }

    #[tokio::test]
    async fn second_send_while_busy_is_refused() {
        let (session, _) = memory_session();
        let gate = Arc::new(tokio::sync::Notify::new());
        let assistant = Assistant::new(
            ConversationModel::new(BlockingBackend { gate: gate.clone() }),
            session,
        );

        let mut first = assistant.send("start");
        assert!(assistant.is_busy());

        let mut second = assistant.send("again");
        let refusal = second.next().await;
        assert!(matches!(refusal, Some(AssistantEvent::Error { .. })));

        gate.notify_one();
        let events = drain(&mut first).await;
        assert_eq!(last_assistant_text(&events).as_deref(), Some("released"));
        assert!(!assistant.is_busy());
    }

    #[tokio::test]
    async fn reset_clears_history_and_state_then_reseeds_greeting() {
        let (session, _) = memory_session();
        let assistant = Assistant::new(
            ConversationModel::new(ScriptedBackend::new(vec![
                tool_use(vec![call("toolu_1", "update_brief", json!({ "name": "x" }))]),
                end_turn("noted"),
            ])),
            session.clone(),
        );

        let mut stream = assistant.send("call the brief x");
        drain(&mut stream).await;
        assert!(assistant.messages().len() > 1);

        assistant.reset();
        let messages = assistant.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text().as_deref(), Some(GREETING));
        assert!(session.store().current().brief.name.is_none());
        assert_eq!(session.store().current().current_step, WizardStep::Platform);
    }
}
