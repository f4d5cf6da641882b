//! Bounded tool-calling loop.
//!
//! The orchestrator lets the model answer directly or request tools for up to
//! `max_rounds` rounds, then forces one final call without the tool catalog.

use super::registry::ToolExecutor;
use crate::error::{KursError, Result};
use crate::generation::{
    ContentBlock, GenerationRequest, GenerationResponse, GenerationService, Message, StopReason,
    ToolChoice, ToolDefinition,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Default number of tool rounds before the forced final call.
pub const MAX_TOOL_ROUNDS: usize = 2;

/// Prefix of the tool-result content reported for a failed tool call.
pub const TOOL_ERROR_PREFIX: &str = "Tool execution error";

/// Where the loop is.
enum Phase<'a> {
    /// Waiting on the model for round `round` (1-based).
    AwaitingModel { round: usize },
    /// The model asked for tools in `round`.
    ExecutingTools {
        round: usize,
        response: GenerationResponse,
        executor: &'a dyn ToolExecutor,
    },
    /// Round budget spent; one more call without tools.
    ForcedFinalCall,
    Terminal(String),
}

/// Drives a generation service through a bounded tool-calling exchange.
pub struct Orchestrator {
    service: Arc<dyn GenerationService>,
    system_prompt: String,
    max_rounds: usize,
}

impl Orchestrator {
    /// Create an orchestrator with the given policy prompt.
    pub fn new(service: Arc<dyn GenerationService>, system_prompt: impl Into<String>) -> Self {
        Self {
            service,
            system_prompt: system_prompt.into(),
            max_rounds: MAX_TOOL_ROUNDS,
        }
    }

    /// Set the number of tool rounds before the forced final call.
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// System instruction: the policy prompt plus prior conversation, verbatim.
    pub fn system_instruction(&self, history: Option<&str>) -> String {
        match history.filter(|h| !h.is_empty()) {
            Some(history) => format!(
                "{}\n\nPrevious conversation:\n{}",
                self.system_prompt, history
            ),
            None => self.system_prompt.clone(),
        }
    }

    /// Answer `query`, letting the model call tools through `executor`.
    ///
    /// Without an executor the first response is final. Generation service
    /// failures propagate; tool failures are reported back to the model.
    #[instrument(skip_all, fields(query_len = query.len()))]
    pub async fn generate(
        &self,
        query: &str,
        history: Option<&str>,
        tools: Option<&[ToolDefinition]>,
        executor: Option<&dyn ToolExecutor>,
    ) -> Result<String> {
        let system = self.system_instruction(history);
        let tools = tools.filter(|t| !t.is_empty());
        let mut messages = vec![Message::user_text(query)];

        let mut phase = if self.max_rounds == 0 {
            Phase::ForcedFinalCall
        } else {
            Phase::AwaitingModel { round: 1 }
        };

        loop {
            phase = match phase {
                Phase::AwaitingModel { round } => {
                    debug!("Round {}: calling generation service", round);
                    let response = self.call(&system, &messages, tools).await?;

                    match executor {
                        Some(executor) if wants_tools(&response) => Phase::ExecutingTools {
                            round,
                            response,
                            executor,
                        },
                        _ => Phase::Terminal(final_text(&response)?),
                    }
                }
                Phase::ExecutingTools {
                    round,
                    response,
                    executor,
                } => {
                    let results = run_tools(executor, &response).await;
                    messages.push(Message::assistant(response.content));
                    messages.push(Message::user_blocks(results));

                    if round < self.max_rounds {
                        Phase::AwaitingModel { round: round + 1 }
                    } else {
                        Phase::ForcedFinalCall
                    }
                }
                Phase::ForcedFinalCall => {
                    info!("Tool round budget spent, requesting final answer");
                    let response = self.call(&system, &messages, None).await?;
                    Phase::Terminal(final_text(&response)?)
                }
                Phase::Terminal(text) => return Ok(text),
            };
        }
    }

    async fn call(
        &self,
        system: &str,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<GenerationResponse> {
        let request = GenerationRequest {
            system: system.to_string(),
            messages: messages.to_vec(),
            tools: tools.map(<[ToolDefinition]>::to_vec),
            tool_choice: tools.map(|_| ToolChoice::Auto),
        };
        self.service.create(&request).await
    }
}

fn wants_tools(response: &GenerationResponse) -> bool {
    response.stop_reason == StopReason::ToolUse && response.tool_uses().next().is_some()
}

fn final_text(response: &GenerationResponse) -> Result<String> {
    response.first_text().map(str::to_string).ok_or_else(|| {
        KursError::Generation(format!(
            "Response contained no text (stop reason {:?})",
            response.stop_reason
        ))
    })
}

/// Execute tool-use blocks in order, stopping after the first failure.
async fn run_tools(executor: &dyn ToolExecutor, response: &GenerationResponse) -> Vec<ContentBlock> {
    let mut results = Vec::new();

    for (id, name, input) in response.tool_uses() {
        info!("Model calling tool: {} with input: {}", name, input);
        match executor.execute(name, input).await {
            Ok(text) => results.push(ContentBlock::tool_result(id, text)),
            Err(e) => {
                warn!("Tool '{}' failed: {}", name, e);
                results.push(ContentBlock::tool_error(
                    id,
                    format!("{}: {}", TOOL_ERROR_PREFIX, e),
                ));
                break;
            }
        }
    }

    results
}
