use std::collections::BTreeMap;

use reelkit_llm::{ToolCallPart, ToolDefinition, ToolResultPart};

use crate::session::SessionHandle;
use crate::tool::{ErasedTool, Tool};
use crate::tools;

/// The closed catalogue of tools for one session: a single flat table keyed
/// by name. Dispatch never throws past this boundary — unknown names and
/// failing handlers both come back as descriptive result strings so the
/// rest of a batch keeps executing.
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn ErasedTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Build the full wizard catalogue wired to one session.
    pub fn for_session(session: &SessionHandle) -> Self {
        let mut registry = Self::new();
        tools::install(&mut registry, session);
        registry
    }

    pub fn register(&mut self, tool: impl Tool) {
        let erased: Box<dyn ErasedTool> = Box::new(tool);
        let name = erased.definition().name;
        debug_assert!(
            !self.tools.contains_key(&name),
            "duplicate tool name '{name}'"
        );
        self.tools.insert(name, erased);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Schema catalogue sent to the model with every request.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Execute a single call, converting every failure mode into a result
    /// string correlated to the call's id.
    pub async fn execute(&self, call: &ToolCallPart) -> ToolResultPart {
        let content = match self.tools.get(&call.name) {
            None => format!(
                "Unrecognized tool '{}'. No changes were made.",
                call.name
            ),
            Some(tool) => match tool.call_erased(&call.arguments).await {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(tool = %call.name, error = %e, "tool execution failed");
                    format!("Tool '{}' failed: {e}", call.name)
                }
            },
        };

        ToolResultPart {
            tool_call_id: call.id.clone(),
            content,
        }
    }

    /// Execute a batch strictly sequentially, in the order given — later
    /// calls may depend on state mutated by earlier ones. Always returns
    /// exactly one result per call, in the same order.
    pub async fn execute_batch(&self, calls: &[ToolCallPart]) -> Vec<ToolResultPart> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            results.push(self.execute(call).await);
        }
        results
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use reelkit_llm::{Describe, Schema};
    use reelkit_wizard::{PlatformKind, WizardStep};
    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::gateway::ProjectGateway;
    use crate::testutil::{call, memory_session};
    use crate::tool::{Tool, ToolError};

    #[derive(Clone, Deserialize)]
    struct ExplodeInput {}

    impl Describe for ExplodeInput {
        fn describe() -> Schema {
            Schema::Object {
                description: None,
                properties: vec![],
                required: vec![],
            }
        }
    }

    #[derive(Clone)]
    struct ExplodingTool;

    impl Tool for ExplodingTool {
        type Input = ExplodeInput;

        fn name(&self) -> &str {
            "exploding_tool"
        }

        fn description(&self) -> &str {
            "Always fails."
        }

        async fn call(&self, _input: ExplodeInput) -> Result<String, ToolError> {
            Err(ToolError::Failed("boom".into()))
        }
    }

    #[tokio::test]
    async fn batch_yields_one_correlated_result_per_call() {
        let (session, _) = memory_session();
        let mut registry = ToolRegistry::for_session(&session);
        registry.register(ExplodingTool);

        let calls = vec![
            call("c1", "update_brief", json!({ "name": "Launch Video" })),
            call("c2", "exploding_tool", json!({})),
            call("c3", "foo_bar", json!({ "x": 1 })),
            call("c4", "add_scene", json!({ "name": "Intro" })),
        ];

        let results = registry.execute_batch(&calls).await;

        assert_eq!(results.len(), calls.len());
        for (call, result) in calls.iter().zip(&results) {
            assert_eq!(call.id, result.tool_call_id);
        }
        assert!(results[0].content.starts_with("Brief updated"));
        assert!(results[1].content.contains("boom"));
        assert!(results[2].content.contains("Unrecognized tool 'foo_bar'"));
        assert!(results[3].content.contains("Added scene 'Intro'"));

        // Effects of the valid calls landed despite the failures in between.
        let state = session.store().current();
        assert_eq!(state.brief.name.as_deref(), Some("Launch Video"));
        assert_eq!(state.storyboard.scenes.len(), 1);
    }

    #[tokio::test]
    async fn malformed_arguments_become_a_result_string() {
        let (session, _) = memory_session();
        let registry = ToolRegistry::for_session(&session);

        let results = registry
            .execute_batch(&[call("c1", "add_shot_to_scene", json!({ "bogus": true }))])
            .await;

        assert_eq!(results.len(), 1);
        assert!(results[0].content.contains("invalid arguments"));
    }

    #[tokio::test]
    async fn select_platform_sets_state_and_advances() {
        let (session, _) = memory_session();
        let registry = ToolRegistry::for_session(&session);

        let results = registry
            .execute_batch(&[call("c1", "select_platform", json!({ "type": "new" }))])
            .await;
        assert!(results[0].content.contains("Platform set to 'new'"));

        let state = session.store().current();
        assert_eq!(state.platform.kind, Some(PlatformKind::New));
        assert_eq!(state.current_step, WizardStep::Brief);
        assert!(state.completed_steps.contains(&WizardStep::Platform));
    }

    #[tokio::test]
    async fn scene_then_shot_in_one_batch_lands_in_call_order() {
        let (session, _) = memory_session();
        let registry = ToolRegistry::for_session(&session);

        let results = registry
            .execute_batch(&[
                call(
                    "c1",
                    "add_scene",
                    json!({ "name": "Intro", "shots": [{ "description": "Opening shot" }] }),
                ),
                call(
                    "c2",
                    "add_shot_to_scene",
                    json!({ "scene_name": "Intro", "description": "Close-up" }),
                ),
            ])
            .await;
        assert_eq!(results.len(), 2);

        let state = session.store().current();
        assert_eq!(state.storyboard.scenes.len(), 1);
        let scene = &state.storyboard.scenes[0];
        assert_eq!(scene.name, "Intro");
        assert_eq!(scene.shots.len(), 2);
        assert_eq!(scene.shots[0].description, "Opening shot");
        assert_eq!(scene.shots[1].description, "Close-up");
    }

    #[tokio::test]
    async fn update_brief_round_trips_and_repeats_do_not_duplicate() {
        let (session, gateway) = memory_session();
        let registry = ToolRegistry::for_session(&session);
        let payload = json!({ "name": "Launch Video" });

        registry
            .execute_batch(&[call("c1", "update_brief", payload.clone())])
            .await;
        registry
            .execute_batch(&[call("c2", "update_brief", payload)])
            .await;

        assert_eq!(
            session.store().current().brief.name.as_deref(),
            Some("Launch Video")
        );
        assert_eq!(gateway.project_count(), 1);
        assert_eq!(gateway.brief_row_count(), 1);
        let project_id = gateway.ensure_project("sess_test").unwrap();
        assert_eq!(
            gateway.brief(&project_id).unwrap().name.as_deref(),
            Some("Launch Video")
        );
    }

    #[tokio::test]
    async fn failed_save_degrades_without_rolling_back() {
        let (session, gateway) = memory_session();
        let registry = ToolRegistry::for_session(&session);
        gateway.set_fail_saves(true);

        let results = registry
            .execute_batch(&[call("c1", "update_brief", json!({ "name": "Launch Video" }))])
            .await;

        assert!(results[0].content.contains("kept locally"));
        // The failure reason is relayed, not swallowed.
        assert!(results[0].content.contains("remote store unavailable"));
        assert_eq!(
            session.store().current().brief.name.as_deref(),
            Some("Launch Video")
        );
    }

    #[tokio::test]
    async fn trigger_generation_emits_a_notify_event() {
        let (session, _) = memory_session();
        let registry = ToolRegistry::for_session(&session);
        let mut rx = session.notifier().subscribe();

        registry
            .execute_batch(&[call(
                "c1",
                "trigger_generation",
                json!({ "asset": "image", "prompt": "neon skyline" }),
            )])
            .await;

        let event = rx.recv().await.unwrap();
        assert_eq!(event.name, "generation.requested");
        assert_eq!(event.detail["prompt"], "neon skyline");
    }

    #[test]
    fn catalogue_is_closed_and_describes_itself() {
        let (session, _) = memory_session();
        let registry = ToolRegistry::for_session(&session);

        for name in [
            "select_platform",
            "update_brief",
            "update_mood_board",
            "add_mood_keywords",
            "add_character",
            "set_script_section",
            "set_storyboard",
            "add_scene",
            "add_shot_to_scene",
            "add_shot",
            "update_shot",
            "update_audio_plan",
            "update_composition",
            "add_text_overlay",
            "trigger_generation",
            "go_to_step",
            "next_step",
            "previous_step",
            "mark_step_complete",
        ] {
            assert!(registry.contains(name), "missing tool {name}");
        }

        for def in registry.definitions() {
            let schema = def.parameters.to_json_schema();
            assert_eq!(schema["type"], "object", "tool {} schema", def.name);
            assert!(!def.description.is_empty());
        }
    }
}
