//! Tool-calling layer for the course assistant.
//!
//! Tools adapt the course store into model-callable operations, the registry
//! dispatches calls by name and tracks citation sources, and the orchestrator
//! runs the bounded exchange with the generation service.

mod outline;
mod registry;
mod runner;
mod search;
mod tools;

pub use outline::{CourseOutlineTool, OUTLINE_TOOL_NAME};
pub use registry::{ToolExecutor, ToolRegistry};
pub use runner::{Orchestrator, MAX_TOOL_ROUNDS, TOOL_ERROR_PREFIX};
pub use search::{CourseSearchTool, SEARCH_TOOL_NAME};
pub use tools::{dedup_sources, Source, Tool, ToolOutput};
