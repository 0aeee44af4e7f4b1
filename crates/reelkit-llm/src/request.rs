use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level request
// ---------------------------------------------------------------------------

/// The frozen, built request — produced by a builder, consumed by `complete()`.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDefinition>,
    pub options: CompletionOptions,
}

/// Knobs that control completion behavior.
#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub tool_choice: ToolChoice,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Backend-agnostic request builder.
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    system: Option<String>,
    messages: Vec<Message>,
    tools: Vec<ToolDefinition>,
    options: CompletionOptions,
}

/// Convenience entry point: `reelkit_llm::request()`.
pub fn request() -> RequestBuilder {
    RequestBuilder::default()
}

impl RequestBuilder {
    // -- system / messages --

    pub fn system(&mut self, text: impl Into<String>) -> &mut Self {
        self.system = Some(text.into());
        self
    }

    pub fn user(&mut self, text: impl Into<String>) -> &mut Self {
        self.messages.push(Message::user(text));
        self
    }

    pub fn assistant(&mut self, text: impl Into<String>) -> &mut Self {
        self.messages.push(Message::assistant(text));
        self
    }

    pub fn message(&mut self, message: Message) -> &mut Self {
        self.messages.push(message);
        self
    }

    pub fn messages(&mut self, messages: impl IntoIterator<Item = Message>) -> &mut Self {
        self.messages.extend(messages);
        self
    }

    // -- tools --

    pub fn tool(&mut self, tool: ToolDefinition) -> &mut Self {
        self.tools.push(tool);
        self
    }

    pub fn tools(&mut self, tools: impl IntoIterator<Item = ToolDefinition>) -> &mut Self {
        self.tools.extend(tools);
        self
    }

    // -- options --

    pub fn temperature(&mut self, t: f32) -> &mut Self {
        self.options.temperature = Some(t);
        self
    }

    pub fn max_tokens(&mut self, n: u32) -> &mut Self {
        self.options.max_tokens = Some(n);
        self
    }

    pub fn tool_choice(&mut self, choice: ToolChoice) -> &mut Self {
        self.options.tool_choice = choice;
        self
    }

    // -- build --

    pub fn build(self) -> CompletionRequest {
        self.into()
    }
}

impl From<RequestBuilder> for CompletionRequest {
    fn from(b: RequestBuilder) -> Self {
        CompletionRequest {
            system: b.system,
            messages: b.messages,
            tools: b.tools,
            options: b.options,
        }
    }
}

// ---------------------------------------------------------------------------
// Message parts
// ---------------------------------------------------------------------------

/// A tool invocation proposed by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallPart {
    /// Correlation id used to match this call to its result.
    pub id: String,
    pub name: String,
    /// Named arguments as a JSON object.
    pub arguments: serde_json::Value,
}

/// The outcome of one tool invocation, fed back to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResultPart {
    pub tool_call_id: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AssistantPart {
    Text(String),
    ToolCall(ToolCallPart),
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// One entry in the conversation history. Append-only: once recorded, a
/// message is never mutated, only cleared wholesale on reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Message {
    User { text: String },
    Assistant { parts: Vec<AssistantPart> },
    Tool { parts: Vec<ToolResultPart> },
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Message::User { text: text.into() }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Message::Assistant {
            parts: vec![AssistantPart::Text(text.into())],
        }
    }

    pub fn tool_results(parts: Vec<ToolResultPart>) -> Self {
        Message::Tool { parts }
    }

    /// The concatenated text content, if any.
    pub fn text(&self) -> Option<String> {
        match self {
            Message::User { text } => Some(text.clone()),
            Message::Assistant { parts } => {
                let text: String = parts
                    .iter()
                    .filter_map(|p| match p {
                        AssistantPart::Text(t) => Some(t.as_str()),
                        _ => None,
                    })
                    .collect();
                (!text.is_empty()).then_some(text)
            }
            Message::Tool { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tools
// ---------------------------------------------------------------------------

/// A tool descriptor sent to the model. Describes the name, purpose, and
/// argument schema — but carries no execution logic.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Schema,
}

/// Controls how the model selects tools.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ToolChoice {
    #[default]
    Auto,
    None,
    Required,
    /// Force calling a specific tool by name.
    Tool(String),
}

// ---------------------------------------------------------------------------
// Schema descriptor — Rust-native, converts to JSON Schema downstream
// ---------------------------------------------------------------------------

/// A Rust-native description of a value's shape, convertible to JSON Schema.
#[derive(Debug, Clone)]
pub enum Schema {
    String {
        description: Option<String>,
        enumeration: Option<Vec<String>>,
    },
    Number {
        description: Option<String>,
    },
    Integer {
        description: Option<String>,
    },
    Boolean {
        description: Option<String>,
    },
    Array {
        description: Option<String>,
        items: Box<Schema>,
    },
    Object {
        description: Option<String>,
        properties: Vec<Property>,
        required: Vec<String>,
    },
    /// Escape hatch: a literal JSON Schema value for shapes we don't model.
    Raw(serde_json::Value),
}

#[derive(Debug, Clone)]
pub struct Property {
    pub name: String,
    pub schema: Schema,
}

impl Property {
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

impl Schema {
    /// A string property with a description — the most common case.
    pub fn string(description: impl Into<String>) -> Self {
        Schema::String {
            description: Some(description.into()),
            enumeration: None,
        }
    }

    /// A string property restricted to a fixed set of values.
    pub fn string_enum(description: impl Into<String>, values: &[&str]) -> Self {
        Schema::String {
            description: Some(description.into()),
            enumeration: Some(values.iter().map(|v| v.to_string()).collect()),
        }
    }

    pub fn integer(description: impl Into<String>) -> Self {
        Schema::Integer {
            description: Some(description.into()),
        }
    }

    pub fn number(description: impl Into<String>) -> Self {
        Schema::Number {
            description: Some(description.into()),
        }
    }

    pub fn array(description: impl Into<String>, items: Schema) -> Self {
        Schema::Array {
            description: Some(description.into()),
            items: Box::new(items),
        }
    }

    /// Convert to a JSON Schema `serde_json::Value`.
    pub fn to_json_schema(&self) -> serde_json::Value {
        match self {
            Schema::String {
                description,
                enumeration,
            } => {
                let mut obj = serde_json::json!({ "type": "string" });
                set_description(&mut obj, description);
                if let Some(values) = enumeration {
                    obj["enum"] = serde_json::json!(values);
                }
                obj
            }
            Schema::Number { description } => {
                let mut obj = serde_json::json!({ "type": "number" });
                set_description(&mut obj, description);
                obj
            }
            Schema::Integer { description } => {
                let mut obj = serde_json::json!({ "type": "integer" });
                set_description(&mut obj, description);
                obj
            }
            Schema::Boolean { description } => {
                let mut obj = serde_json::json!({ "type": "boolean" });
                set_description(&mut obj, description);
                obj
            }
            Schema::Array { description, items } => {
                let mut obj = serde_json::json!({
                    "type": "array",
                    "items": items.to_json_schema(),
                });
                set_description(&mut obj, description);
                obj
            }
            Schema::Object {
                description,
                properties,
                required,
            } => {
                let props: serde_json::Map<String, serde_json::Value> = properties
                    .iter()
                    .map(|p| (p.name.clone(), p.schema.to_json_schema()))
                    .collect();
                let mut obj = serde_json::json!({
                    "type": "object",
                    "properties": props,
                    "additionalProperties": false,
                });
                if !required.is_empty() {
                    obj["required"] = serde_json::json!(required);
                }
                set_description(&mut obj, description);
                obj
            }
            Schema::Raw(v) => v.clone(),
        }
    }
}

fn set_description(obj: &mut serde_json::Value, description: &Option<String>) {
    if let Some(d) = description {
        obj["description"] = serde_json::json!(d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_schema_emits_json_schema() {
        let schema = Schema::Object {
            description: None,
            properties: vec![
                Property::new("name", Schema::string("Project name")),
                Property::new(
                    "keywords",
                    Schema::array("Mood keywords", Schema::string("One keyword")),
                ),
            ],
            required: vec!["name".into()],
        };

        let json = schema.to_json_schema();
        assert_eq!(json["type"], "object");
        assert_eq!(json["required"][0], "name");
        assert_eq!(json["properties"]["name"]["type"], "string");
        assert_eq!(json["properties"]["keywords"]["items"]["type"], "string");
        assert_eq!(json["additionalProperties"], false);
    }

    #[test]
    fn enum_schema_carries_values() {
        let schema = Schema::string_enum("Platform type", &["new", "existing"]);
        let json = schema.to_json_schema();
        assert_eq!(json["enum"], serde_json::json!(["new", "existing"]));
    }

    #[test]
    fn builder_assembles_request() {
        let mut req = request();
        req.system("You are a production assistant")
            .user("Create a new platform")
            .max_tokens(1024);
        let built = req.build();

        assert_eq!(built.system.as_deref(), Some("You are a production assistant"));
        assert_eq!(built.messages.len(), 1);
        assert_eq!(built.options.max_tokens, Some(1024));
    }
}
