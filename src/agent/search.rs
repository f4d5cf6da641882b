//! Course content search tool.

use super::tools::{dedup_sources, parse_args, Source, Tool, ToolOutput};
use crate::error::Result;
use crate::generation::ToolDefinition;
use crate::vector_store::{CourseStore, SearchResults};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Tool name advertised to the model.
pub const SEARCH_TOOL_NAME: &str = "search_course_content";

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
    #[serde(default)]
    course_name: Option<String>,
    #[serde(default)]
    lesson_number: Option<u32>,
}

/// Searches lesson content with optional course and lesson filters.
pub struct CourseSearchTool {
    store: Arc<dyn CourseStore>,
}

impl CourseSearchTool {
    pub fn new(store: Arc<dyn CourseStore>) -> Self {
        Self { store }
    }

    /// Run a search and render it for the model.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<u32>,
    ) -> Result<ToolOutput> {
        let results = self.store.search(query, course_name, lesson_number).await?;

        if let Some(error) = &results.error {
            return Ok(ToolOutput::text(error.clone()));
        }

        if results.is_empty() {
            let mut message = "No relevant content found".to_string();
            if let Some(course) = course_name.filter(|c| !c.is_empty()) {
                message.push_str(&format!(" in course '{}'", course));
            }
            if let Some(lesson) = lesson_number.filter(|&l| l != 0) {
                message.push_str(&format!(" in lesson {}", lesson));
            }
            message.push('.');
            return Ok(ToolOutput::text(message));
        }

        self.format_results(&results).await
    }

    async fn format_results(&self, results: &SearchResults) -> Result<ToolOutput> {
        let mut entries = Vec::with_capacity(results.len());
        let mut sources = Vec::with_capacity(results.len());

        for (document, meta) in results.documents.iter().zip(&results.metadata) {
            let label = match meta.lesson_number {
                Some(lesson) => format!("{} - Lesson {}", meta.course_title, lesson),
                None => meta.course_title.clone(),
            };

            // Empty links count as missing.
            let mut url = match meta.lesson_number {
                Some(lesson) => self.store.get_lesson_link(&meta.course_title, lesson).await?,
                None => None,
            }
            .filter(|u| !u.is_empty());
            if url.is_none() {
                url = self
                    .store
                    .get_course_link(&meta.course_title)
                    .await?
                    .filter(|u| !u.is_empty());
            }

            entries.push(format!("[{}]\n{}", label, document));
            sources.push(Source::new(label, url));
        }

        let sources = dedup_sources(sources);
        debug!("Search produced {} entries, {} sources", entries.len(), sources.len());

        Ok(ToolOutput::with_sources(entries.join("\n\n"), sources))
    }
}

#[async_trait]
impl Tool for CourseSearchTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: SEARCH_TOOL_NAME.to_string(),
            description: "Search course materials with smart course name matching and lesson filtering"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "What to search for in the course content"
                    },
                    "course_name": {
                        "type": "string",
                        "description": "Course title (partial matches work, e.g. 'MCP', 'Introduction')"
                    },
                    "lesson_number": {
                        "type": "integer",
                        "description": "Specific lesson number to search within (e.g. 1, 2, 3)"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn execute(&self, input: &Value) -> Result<ToolOutput> {
        let args: SearchArgs = parse_args(SEARCH_TOOL_NAME, input)?;
        self.search(&args.query, args.course_name.as_deref(), args.lesson_number)
            .await
    }
}
