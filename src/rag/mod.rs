//! Question answering over the course catalog with sources.
//!
//! Wires the course store, tools, orchestrator and conversation sessions
//! into a single [`CourseAssistant`].

mod assistant;
mod session;

pub use assistant::{load_course_store, CourseAssistant, QueryResponse};
pub use session::SessionStore;
