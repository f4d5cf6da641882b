//! OpenAI chat-completions backend.
//!
//! Translates the content-block conversation into chat messages: assistant
//! tool-use blocks become `tool_calls`, tool-result blocks become `tool`
//! messages, and `finish_reason` maps onto [`StopReason`].

use super::{
    ContentBlock, GenerationRequest, GenerationResponse, GenerationService, Message, Role,
    StopReason, ToolDefinition,
};
use crate::config::GenerationSettings;
use crate::error::{KursError, Result};
use crate::openai::create_client_with;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs, ChatCompletionTool,
    ChatCompletionToolChoiceOption, ChatCompletionToolType, CreateChatCompletionRequestArgs,
    FinishReason, FunctionCall, FunctionObject,
};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

/// Generation backend using OpenAI function calling.
pub struct OpenAIGenerator {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAIGenerator {
    /// Create a generator from settings. The API key comes from `OPENAI_API_KEY`.
    pub fn from_settings(settings: &GenerationSettings) -> Result<Self> {
        let client = create_client_with(
            settings.api_base.as_deref(),
            Duration::from_secs(settings.timeout_secs),
        )?;

        Ok(Self {
            client,
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        })
    }
}

#[async_trait]
impl GenerationService for OpenAIGenerator {
    #[instrument(skip(self, request), fields(model = %self.model, messages = request.messages.len()))]
    async fn create(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        let messages = to_chat_messages(&request.system, &request.messages)?;

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model)
            .messages(messages)
            .max_completion_tokens(self.max_tokens)
            .temperature(self.temperature);

        if let Some(tools) = &request.tools {
            args.tools(tools.iter().map(to_chat_tool).collect::<Vec<_>>());
            if request.tool_choice.is_some() {
                args.tool_choice(ChatCompletionToolChoiceOption::Auto);
            }
        }

        let chat_request = args
            .build()
            .map_err(|e| KursError::Generation(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e| KursError::OpenAI(format!("Chat API error: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| KursError::Generation("No response from model".to_string()))?;

        let mut content = Vec::new();
        if let Some(text) = choice.message.content.filter(|t| !t.is_empty()) {
            content.push(ContentBlock::Text { text });
        }
        for call in choice.message.tool_calls.unwrap_or_default() {
            content.push(ContentBlock::ToolUse {
                id: call.id,
                name: call.function.name,
                input: parse_arguments(&call.function.arguments),
            });
        }

        let stop_reason = match choice.finish_reason {
            Some(FinishReason::ToolCalls) | Some(FinishReason::FunctionCall) => StopReason::ToolUse,
            Some(FinishReason::Length) => StopReason::MaxTokens,
            Some(FinishReason::Stop) | None => StopReason::EndTurn,
            Some(FinishReason::ContentFilter) => StopReason::Other,
        };

        debug!("OpenAI response: stop_reason={:?}, {} blocks", stop_reason, content.len());

        Ok(GenerationResponse {
            stop_reason,
            content,
        })
    }
}

/// Tool arguments arrive as a JSON string; keep malformed input as a raw string
/// so the tool reports the problem back to the model.
fn parse_arguments(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn to_chat_tool(definition: &ToolDefinition) -> ChatCompletionTool {
    ChatCompletionTool {
        r#type: ChatCompletionToolType::Function,
        function: FunctionObject {
            name: definition.name.clone(),
            description: Some(definition.description.clone()),
            parameters: Some(definition.input_schema.clone()),
            strict: None,
        },
    }
}

fn to_chat_messages(system: &str, messages: &[Message]) -> Result<Vec<ChatCompletionRequestMessage>> {
    let build_err = |e: async_openai::error::OpenAIError| KursError::Generation(e.to_string());

    let mut out: Vec<ChatCompletionRequestMessage> = vec![
        ChatCompletionRequestSystemMessageArgs::default()
            .content(system.to_string())
            .build()
            .map_err(build_err)?
            .into(),
    ];

    for message in messages {
        let text = message
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        match message.role {
            Role::Assistant => {
                let tool_calls: Vec<ChatCompletionMessageToolCall> = message
                    .content
                    .iter()
                    .filter_map(|block| match block {
                        ContentBlock::ToolUse { id, name, input } => {
                            Some(ChatCompletionMessageToolCall {
                                id: id.clone(),
                                r#type: ChatCompletionToolType::Function,
                                function: FunctionCall {
                                    name: name.clone(),
                                    arguments: input.to_string(),
                                },
                            })
                        }
                        _ => None,
                    })
                    .collect();

                let mut args = ChatCompletionRequestAssistantMessageArgs::default();
                if !text.is_empty() {
                    args.content(text);
                }
                if !tool_calls.is_empty() {
                    args.tool_calls(tool_calls);
                }
                out.push(args.build().map_err(build_err)?.into());
            }
            Role::User => {
                // Tool messages must directly follow the assistant's tool calls.
                for block in &message.content {
                    if let ContentBlock::ToolResult {
                        tool_use_id,
                        content,
                        ..
                    } = block
                    {
                        out.push(
                            ChatCompletionRequestToolMessageArgs::default()
                                .tool_call_id(tool_use_id.as_str())
                                .content(content.clone())
                                .build()
                                .map_err(build_err)?
                                .into(),
                        );
                    }
                }
                if !text.is_empty() {
                    out.push(
                        ChatCompletionRequestUserMessageArgs::default()
                            .content(text)
                            .build()
                            .map_err(build_err)?
                            .into(),
                    );
                }
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_arguments() {
        assert_eq!(parse_arguments(r#"{"query": "MCP"}"#), json!({"query": "MCP"}));
        assert_eq!(parse_arguments("not json"), Value::String("not json".to_string()));
    }

    #[test]
    fn test_tool_round_maps_to_chat_messages() {
        let messages = vec![
            Message::user_text("What is MCP?"),
            Message::assistant(vec![ContentBlock::ToolUse {
                id: "call_1".to_string(),
                name: "search_course_content".to_string(),
                input: json!({"query": "MCP"}),
            }]),
            Message::user_blocks(vec![ContentBlock::tool_result("call_1", "MCP results")]),
        ];

        let chat = to_chat_messages("system prompt", &messages).unwrap();
        assert_eq!(chat.len(), 4);
        assert!(matches!(chat[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(chat[1], ChatCompletionRequestMessage::User(_)));
        match &chat[2] {
            ChatCompletionRequestMessage::Assistant(msg) => {
                let calls = msg.tool_calls.as_ref().unwrap();
                assert_eq!(calls[0].id, "call_1");
                assert_eq!(calls[0].function.name, "search_course_content");
            }
            other => panic!("Expected assistant message, got {:?}", other),
        }
        match &chat[3] {
            ChatCompletionRequestMessage::Tool(msg) => assert_eq!(msg.tool_call_id, "call_1"),
            other => panic!("Expected tool message, got {:?}", other),
        }
    }

    #[test]
    fn test_tool_definition_maps_to_function() {
        let tool = to_chat_tool(&ToolDefinition {
            name: "get_course_outline".to_string(),
            description: "Outline".to_string(),
            input_schema: json!({"type": "object", "properties": {}}),
        });
        assert_eq!(tool.function.name, "get_course_outline");
        assert_eq!(tool.function.description.as_deref(), Some("Outline"));
    }
}
