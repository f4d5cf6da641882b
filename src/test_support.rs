//! In-process fakes shared by unit tests.

use crate::agent::ToolExecutor;
use crate::embedding::Embedder;
use crate::error::{KursError, Result};
use crate::generation::{ContentBlock, GenerationRequest, GenerationResponse, GenerationService, StopReason};
use crate::vector_store::{ChunkRecord, CourseCatalog, CourseRecord, LessonRecord};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

const VOCABULARY: &[&str] = &["python", "mcp", "agent", "tool", "basics", "data"];

/// Embeds text as keyword counts over a tiny fixed vocabulary.
pub struct KeywordEmbedder;

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let lower = text.to_lowercase();
        Ok(VOCABULARY
            .iter()
            .map(|word| lower.matches(word).count() as f32)
            .collect())
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    fn dimensions(&self) -> usize {
        VOCABULARY.len()
    }
}

/// Two small courses with lesson links and chunks.
pub fn sample_catalog() -> CourseCatalog {
    CourseCatalog {
        courses: vec![
            CourseRecord {
                title: "Python Fundamentals".to_string(),
                course_link: Some("https://example.com/python".to_string()),
                instructor: Some("Ada".to_string()),
                lessons: vec![
                    LessonRecord {
                        lesson_number: 1,
                        title: Some("Getting Started".to_string()),
                        lesson_link: Some("https://example.com/python/1".to_string()),
                    },
                    LessonRecord {
                        lesson_number: 2,
                        title: Some("Data Types".to_string()),
                        lesson_link: None,
                    },
                ],
                chunks: vec![
                    ChunkRecord {
                        lesson_number: Some(1),
                        content: "Python basics: variables and printing.".to_string(),
                    },
                    ChunkRecord {
                        lesson_number: Some(2),
                        content: "Python data types include lists and dicts.".to_string(),
                    },
                ],
            },
            CourseRecord {
                title: "MCP: Build Rich-Context AI Apps".to_string(),
                course_link: Some("https://example.com/mcp".to_string()),
                instructor: None,
                lessons: vec![
                    LessonRecord {
                        lesson_number: 1,
                        title: Some("Why MCP".to_string()),
                        lesson_link: Some("https://example.com/mcp/1".to_string()),
                    },
                    LessonRecord {
                        lesson_number: 2,
                        title: Some("MCP Servers".to_string()),
                        lesson_link: Some("https://example.com/mcp/2".to_string()),
                    },
                ],
                chunks: vec![
                    ChunkRecord {
                        lesson_number: Some(1),
                        content: "MCP standardizes how an agent reaches tools.".to_string(),
                    },
                    ChunkRecord {
                        lesson_number: Some(2),
                        content: "An MCP server exposes tools to an agent.".to_string(),
                    },
                ],
            },
        ],
    }
}

/// Generation service that replays canned responses and records requests.
#[derive(Default)]
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<GenerationResponse>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new(responses: Vec<GenerationResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationService for ScriptedGenerator {
    async fn create(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| KursError::Generation("script exhausted".to_string()))
    }
}

/// A response asking for the given `(id, name, input)` tool calls.
pub fn tool_use_response(calls: &[(&str, &str, Value)]) -> GenerationResponse {
    GenerationResponse {
        stop_reason: StopReason::ToolUse,
        content: calls
            .iter()
            .map(|(id, name, input)| ContentBlock::ToolUse {
                id: id.to_string(),
                name: name.to_string(),
                input: input.clone(),
            })
            .collect(),
    }
}

/// Tool executor replaying canned outcomes and recording calls.
#[derive(Default)]
pub struct ScriptedExecutor {
    outcomes: Mutex<VecDeque<std::result::Result<String, String>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedExecutor {
    pub fn new(outcomes: Vec<std::result::Result<&str, &str>>) -> Self {
        Self {
            outcomes: Mutex::new(
                outcomes
                    .into_iter()
                    .map(|o| o.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolExecutor for ScriptedExecutor {
    async fn execute(&self, name: &str, input: &Value) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((name.to_string(), input.clone()));
        match self.outcomes.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(KursError::Tool(message)),
            None => Err(KursError::Tool("no scripted outcome".to_string())),
        }
    }
}
