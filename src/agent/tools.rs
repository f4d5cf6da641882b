//! Tool abstraction for the course assistant.
//!
//! A tool advertises a [`ToolDefinition`] to the model and turns the model's
//! JSON arguments into text. Tools that surface citations return them with
//! the text; the registry keeps the latest set per tool.

use crate::error::{KursError, Result};
use crate::generation::ToolDefinition;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// A citation shown to the user next to an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Display name, e.g. `"Course - Lesson 2"`.
    pub name: String,
    pub url: Option<String>,
}

impl Source {
    pub fn new(name: impl Into<String>, url: Option<String>) -> Self {
        Self {
            name: name.into(),
            url,
        }
    }
}

/// What a tool produced for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    /// Text handed back to the model.
    pub text: String,
    /// `Some` replaces the tool's accumulated sources; `None` leaves them as they were.
    pub sources: Option<Vec<Source>>,
}

impl ToolOutput {
    /// Output without citation changes.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sources: None,
        }
    }

    /// Output that replaces the tool's sources.
    pub fn with_sources(text: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            text: text.into(),
            sources: Some(sources),
        }
    }
}

/// A model-callable operation.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Definition sent to the model; `name` must be non-empty.
    fn definition(&self) -> ToolDefinition;

    /// Run the tool with the model-supplied arguments.
    async fn execute(&self, input: &Value) -> Result<ToolOutput>;
}

/// Drop sources whose name was already seen, keeping first occurrences in order.
pub fn dedup_sources(sources: impl IntoIterator<Item = Source>) -> Vec<Source> {
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .filter(|source| seen.insert(source.name.clone()))
        .collect()
}

/// Deserialize tool arguments, naming the tool in the error.
pub(crate) fn parse_args<T: DeserializeOwned>(tool: &str, input: &Value) -> Result<T> {
    serde_json::from_value(input.clone())
        .map_err(|e| KursError::InvalidInput(format!("Invalid arguments for {}: {}", tool, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let sources = vec![
            Source::new("A", Some("u1".to_string())),
            Source::new("A", Some("u2".to_string())),
            Source::new("B", Some("u3".to_string())),
        ];
        assert_eq!(
            dedup_sources(sources),
            vec![
                Source::new("A", Some("u1".to_string())),
                Source::new("B", Some("u3".to_string())),
            ]
        );
    }

    #[test]
    fn test_parse_args_error_names_tool() {
        #[derive(Deserialize)]
        struct Args {
            #[allow(dead_code)]
            query: String,
        }

        let err = parse_args::<Args>("search_course_content", &json!({"limit": 3}))
            .err()
            .unwrap();
        assert!(err.to_string().contains("search_course_content"));
        assert!(err.to_string().contains("query"));
    }

    #[test]
    fn test_source_serializes_null_url() {
        let value = serde_json::to_value(Source::new("Intro", None)).unwrap();
        assert_eq!(value, json!({"name": "Intro", "url": null}));
    }
}
