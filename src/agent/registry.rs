//! Named tool registry.
//!
//! Keeps registered tools in registration order together with the sources
//! each tool produced on its most recent successful, non-empty call.

use super::tools::{Source, Tool};
use crate::error::{KursError, Result};
use crate::generation::ToolDefinition;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// Dispatches a named tool call to a concrete tool.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Run `name` with `input` and return the text for the model.
    async fn execute(&self, name: &str, input: &Value) -> Result<String>;
}

struct RegisteredTool {
    name: String,
    tool: Box<dyn Tool>,
    sources: Mutex<Vec<Source>>,
}

impl RegisteredTool {
    fn sources(&self) -> std::sync::MutexGuard<'_, Vec<Source>> {
        self.sources.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Registry of the tools offered to the model.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its definition name.
    ///
    /// A tool with the same name is replaced in place and its sources are cleared.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> Result<()> {
        let name = tool.definition().name;
        if name.is_empty() {
            return Err(KursError::Config(
                "Tool definition must have a non-empty name".to_string(),
            ));
        }

        let entry = RegisteredTool {
            name: name.clone(),
            tool: Box::new(tool),
            sources: Mutex::new(Vec::new()),
        };

        match self.tools.iter_mut().find(|t| t.name == name) {
            Some(existing) => {
                warn!("Replacing already registered tool '{}'", name);
                *existing = entry;
            }
            None => {
                debug!("Registered tool '{}'", name);
                self.tools.push(entry);
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Definitions of every registered tool, in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.tool.definition()).collect()
    }

    /// Sources of the first tool (in registration order) holding any.
    pub fn collect_sources(&self) -> Vec<Source> {
        self.tools
            .iter()
            .map(|t| t.sources().clone())
            .find(|sources| !sources.is_empty())
            .unwrap_or_default()
    }

    /// Clear every tool's sources.
    pub fn reset_sources(&self) {
        for tool in &self.tools {
            tool.sources().clear();
        }
    }

    /// Collect then reset sources in one step.
    pub fn drain_sources(&self) -> Vec<Source> {
        let sources = self.collect_sources();
        self.reset_sources();
        sources
    }
}

#[async_trait]
impl ToolExecutor for ToolRegistry {
    async fn execute(&self, name: &str, input: &Value) -> Result<String> {
        let Some(entry) = self.tools.iter().find(|t| t.name == name) else {
            warn!("Model requested unknown tool '{}'", name);
            return Ok(format!("Tool '{}' not found", name));
        };

        debug!("Executing tool '{}' with input {}", name, input);
        let output = entry.tool.execute(input).await?;
        if let Some(sources) = output.sources {
            *entry.sources() = sources;
        }
        Ok(output.text)
    }
}
