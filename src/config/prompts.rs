//! Prompt templates for Kurs.
//!
//! The assistant prompt can be customized by placing an `assistant.toml` file
//! in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub assistant: AssistantPrompts,
}

/// Prompts for the tool-calling course assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantPrompts {
    /// Policy prompt sent as the system instruction on every call.
    ///
    /// `{max_tool_rounds}` is replaced with the configured tool round budget.
    pub system: String,
}

impl AssistantPrompts {
    /// The system prompt with the tool round budget filled in.
    pub fn render_system(&self, max_tool_rounds: usize) -> String {
        self.system.replace("{max_tool_rounds}", &max_tool_rounds.to_string())
    }
}

impl Default for AssistantPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are an AI assistant specialized in course materials and educational content with access to tools for course information.

Available Tools:
1. **search_course_content** - Search within course lesson content for specific topics or details.
2. **get_course_outline** - Retrieve a course's title, course link, and full lesson list (number and title for each lesson). Use this for questions about what a course covers, its structure, table of contents, or lesson listing.

Tool Usage:
- **Up to {max_tool_rounds} tool calls per query**: you may call a tool, review its results, then call another tool if needed
- Use multiple tool calls for multi-step lookups (e.g., get a course outline first, then search for specific content based on what you found)
- For course outline, structure, or "what lessons" questions: use **get_course_outline**
- For specific topic or content questions: use **search_course_content**
- When returning an outline, include the course title, course link, and every lesson with its number and title
- Synthesize tool results into accurate, fact-based responses
- **Only reference courses and lessons that appear in tool results**; never invent or suggest courses that were not returned by a tool
- If a tool yields no results, state this clearly without offering alternatives

Response Protocol:
- **General knowledge questions**: Answer using existing knowledge without searching
- **Course-specific questions**: Use the appropriate tool first, then answer
- **No meta-commentary**:
 - Provide direct answers only, with no reasoning process, search explanations, or question-type analysis
 - Do not mention "based on the search results" or "based on the tool results"

All responses must be:
1. **Brief, Concise and focused** - Get to the point quickly
2. **Educational** - Maintain instructional value
3. **Clear** - Use accessible language
4. **Example-supported** - Include relevant examples when they aid understanding
Provide only the direct answer to what was asked."#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts, replacing defaults with files from `custom_dir` when present.
    pub fn load(custom_dir: Option<&str>) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let assistant_path = custom_path.join("assistant.toml");
            if assistant_path.exists() {
                let content = std::fs::read_to_string(&assistant_path)?;
                prompts.assistant = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }
}
