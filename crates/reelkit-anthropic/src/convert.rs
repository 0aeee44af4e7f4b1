//! Mapping between the backend-agnostic request/response types and the
//! Anthropic wire shapes.

use reelkit_llm::{
    AssistantPart, CompletionRequest, Message, StopReason, ToolCallPart, ToolChoice, TurnResponse,
    Usage,
};

use crate::types::{
    ApiMessage, ApiRequest, ApiResponse, ApiTool, ApiToolChoice, ContentBlock,
};

const DEFAULT_MAX_TOKENS: u32 = 1024;

pub(crate) fn to_api_request(model_id: &str, request: &CompletionRequest) -> ApiRequest {
    let messages = request.messages.iter().map(to_api_message).collect();

    let tools = request
        .tools
        .iter()
        .map(|t| ApiTool {
            name: t.name.clone(),
            description: t.description.clone(),
            input_schema: t.parameters.to_json_schema(),
        })
        .collect();

    ApiRequest {
        model: model_id.to_string(),
        max_tokens: request.options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        system: request.system.clone(),
        messages,
        tools,
        tool_choice: to_tool_choice(&request.options.tool_choice),
        temperature: request.options.temperature,
    }
}

fn to_api_message(message: &Message) -> ApiMessage {
    match message {
        Message::User { text } => ApiMessage {
            role: "user",
            content: vec![ContentBlock::Text { text: text.clone() }],
        },
        Message::Assistant { parts } => ApiMessage {
            role: "assistant",
            content: parts
                .iter()
                .map(|part| match part {
                    AssistantPart::Text(text) => ContentBlock::Text { text: text.clone() },
                    AssistantPart::ToolCall(call) => ContentBlock::ToolUse {
                        id: call.id.clone(),
                        name: call.name.clone(),
                        input: call.arguments.clone(),
                    },
                })
                .collect(),
        },
        // Tool results travel back as user-role content blocks.
        Message::Tool { parts } => ApiMessage {
            role: "user",
            content: parts
                .iter()
                .map(|part| ContentBlock::ToolResult {
                    tool_use_id: part.tool_call_id.clone(),
                    content: part.content.clone(),
                })
                .collect(),
        },
    }
}

fn to_tool_choice(choice: &ToolChoice) -> Option<ApiToolChoice> {
    match choice {
        ToolChoice::Auto => None,
        ToolChoice::None => Some(ApiToolChoice::None),
        ToolChoice::Required => Some(ApiToolChoice::Any),
        ToolChoice::Tool(name) => Some(ApiToolChoice::Tool { name: name.clone() }),
    }
}

pub(crate) fn from_api_response(response: ApiResponse) -> TurnResponse {
    let mut text = String::new();
    let mut tool_calls = Vec::new();

    for block in response.content {
        match block {
            ContentBlock::Text { text: t } => text.push_str(&t),
            ContentBlock::ToolUse { id, name, input } => tool_calls.push(ToolCallPart {
                id,
                name,
                arguments: input,
            }),
            ContentBlock::ToolResult { .. } => {}
        }
    }

    TurnResponse {
        text,
        tool_calls,
        stop_reason: parse_stop_reason(response.stop_reason.as_deref()),
        usage: Usage {
            input_tokens: response.usage.input_tokens,
            output_tokens: response.usage.output_tokens,
        },
    }
}

fn parse_stop_reason(raw: Option<&str>) -> StopReason {
    match raw {
        Some("end_turn") | Some("stop_sequence") => StopReason::EndTurn,
        Some("tool_use") => StopReason::ToolUse,
        Some("max_tokens") => StopReason::MaxTokens,
        Some(other) => StopReason::Other(other.to_string()),
        None => StopReason::EndTurn,
    }
}

#[cfg(test)]
mod tests {
    use reelkit_llm::request;
    use serde_json::json;

    use super::*;

    #[test]
    fn tool_results_become_user_role_blocks() {
        let mut builder = request();
        builder
            .system("assistant")
            .user("set the brief")
            .message(Message::Assistant {
                parts: vec![
                    AssistantPart::Text("Updating.".into()),
                    AssistantPart::ToolCall(ToolCallPart {
                        id: "toolu_1".into(),
                        name: "update_brief".into(),
                        arguments: json!({ "name": "Launch Video" }),
                    }),
                ],
            })
            .message(Message::tool_results(vec![reelkit_llm::ToolResultPart {
                tool_call_id: "toolu_1".into(),
                content: "Brief updated".into(),
            }]));

        let api = to_api_request("claude-sonnet-4-5", &builder.build());
        let body = serde_json::to_value(&api).unwrap();

        assert_eq!(body["system"], "assistant");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][1]["role"], "assistant");
        assert_eq!(body["messages"][1]["content"][1]["type"], "tool_use");
        assert_eq!(body["messages"][2]["role"], "user");
        assert_eq!(body["messages"][2]["content"][0]["type"], "tool_result");
        assert_eq!(body["messages"][2]["content"][0]["tool_use_id"], "toolu_1");
    }

    #[test]
    fn response_collects_text_and_tool_calls() {
        let raw = json!({
            "content": [
                { "type": "text", "text": "Let me set that up." },
                { "type": "tool_use", "id": "toolu_9", "name": "add_scene",
                  "input": { "name": "Intro" } },
            ],
            "stop_reason": "tool_use",
            "usage": { "input_tokens": 42, "output_tokens": 17 },
        });

        let api: ApiResponse = serde_json::from_value(raw).unwrap();
        let turn = from_api_response(api);

        assert_eq!(turn.text, "Let me set that up.");
        assert_eq!(turn.tool_calls.len(), 1);
        assert_eq!(turn.tool_calls[0].name, "add_scene");
        assert!(turn.wants_tools());
        assert_eq!(turn.usage.output_tokens, 17);
    }

    #[test]
    fn stop_reasons_map_onto_the_shared_enum() {
        assert_eq!(parse_stop_reason(Some("end_turn")), StopReason::EndTurn);
        assert_eq!(parse_stop_reason(Some("tool_use")), StopReason::ToolUse);
        assert_eq!(parse_stop_reason(Some("max_tokens")), StopReason::MaxTokens);
        assert_eq!(
            parse_stop_reason(Some("refusal")),
            StopReason::Other("refusal".into())
        );
        assert_eq!(parse_stop_reason(None), StopReason::EndTurn);
    }
}
