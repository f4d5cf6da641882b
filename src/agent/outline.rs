//! Course outline tool.

use super::tools::{parse_args, Tool, ToolOutput};
use crate::error::Result;
use crate::generation::ToolDefinition;
use crate::vector_store::{CourseOutline, CourseStore};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Tool name advertised to the model.
pub const OUTLINE_TOOL_NAME: &str = "get_course_outline";

#[derive(Debug, Deserialize)]
struct OutlineArgs {
    course_name: String,
}

/// Returns a course's title, link and lesson list without semantic search.
pub struct CourseOutlineTool {
    store: Arc<dyn CourseStore>,
}

impl CourseOutlineTool {
    pub fn new(store: Arc<dyn CourseStore>) -> Self {
        Self { store }
    }

    /// Look up and render the outline for a (partial) course name.
    pub async fn outline(&self, course_name: &str) -> Result<ToolOutput> {
        let text = match self.store.get_course_outline(course_name).await? {
            Some(outline) => render_outline(&outline),
            None => format!("No course found matching '{}'.", course_name),
        };
        Ok(ToolOutput::text(text))
    }
}

fn render_outline(outline: &CourseOutline) -> String {
    let mut lines = vec![format!("Course: {}", outline.title)];
    if let Some(link) = outline.course_link.as_deref().filter(|l| !l.is_empty()) {
        lines.push(format!("Link: {}", link));
    }
    lines.push(String::new());

    if outline.lessons.is_empty() {
        lines.push("No lessons found for this course.".to_string());
    } else {
        lines.push(format!("Lessons ({}):", outline.lessons.len()));
        for lesson in &outline.lessons {
            let number = lesson
                .lesson_number
                .map(|n| n.to_string())
                .unwrap_or_else(|| "?".to_string());
            let title = lesson.lesson_title.as_deref().unwrap_or("Untitled");
            lines.push(format!("  Lesson {}: {}", number, title));
        }
    }

    lines.join("\n")
}

#[async_trait]
impl Tool for CourseOutlineTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: OUTLINE_TOOL_NAME.to_string(),
            description: "Get the full outline of a course including its title, course link, \
                and a numbered list of all lessons. Use this for questions about what a course \
                covers, its structure, or lesson listing."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "course_name": {
                        "type": "string",
                        "description": "Course title or partial match (e.g. 'MCP', 'Introduction')"
                    }
                },
                "required": ["course_name"]
            }),
        }
    }

    async fn execute(&self, input: &Value) -> Result<ToolOutput> {
        let args: OutlineArgs = parse_args(OUTLINE_TOOL_NAME, input)?;
        self.outline(&args.course_name).await
    }
}
