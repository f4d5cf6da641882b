//! Course assistant: question answering with tool calling and citations.

use super::session::SessionStore;
use crate::agent::{CourseOutlineTool, CourseSearchTool, Orchestrator, Source, ToolRegistry};
use crate::config::{Prompts, SessionSettings, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{KursError, Result};
use crate::generation::{create_generator, GenerationService};
use crate::vector_store::{CourseCatalog, CourseStore, CourseSummary, MemoryCourseStore};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument};

/// Load the configured catalog into an in-memory course store.
pub async fn load_course_store(settings: &Settings) -> Result<Arc<dyn CourseStore>> {
    let catalog = CourseCatalog::load(&settings.catalog_path())?;
    let embedder: Arc<dyn Embedder> = Arc::new(OpenAIEmbedder::from_settings(&settings.embedding)?);
    let store =
        MemoryCourseStore::from_catalog(catalog, embedder, settings.catalog.max_results).await?;
    Ok(Arc::new(store))
}

/// Answers questions about the course catalog.
pub struct CourseAssistant {
    store: Arc<dyn CourseStore>,
    registry: ToolRegistry,
    orchestrator: Orchestrator,
    sessions: SessionStore,
    // Serializes generate -> drain so sources never cross queries.
    query_lock: Mutex<()>,
}

impl CourseAssistant {
    /// Create an assistant with the search and outline tools registered.
    pub fn new(
        store: Arc<dyn CourseStore>,
        service: Arc<dyn GenerationService>,
        system_prompt: impl Into<String>,
    ) -> Result<Self> {
        let mut registry = ToolRegistry::new();
        registry.register(CourseSearchTool::new(store.clone()))?;
        registry.register(CourseOutlineTool::new(store.clone()))?;

        Ok(Self {
            store,
            registry,
            orchestrator: Orchestrator::new(service, system_prompt),
            sessions: SessionStore::new(SessionSettings::default().max_history),
            query_lock: Mutex::new(()),
        })
    }

    /// Build an assistant from settings: catalog, embedder, backend and prompts.
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let store = load_course_store(settings).await?;
        let service = create_generator(&settings.generation)?;
        let prompts = Prompts::load(settings.prompts.custom_dir.as_deref())?;

        let max_rounds = settings.generation.max_tool_rounds;
        Ok(
            Self::new(store, service, prompts.assistant.render_system(max_rounds))?
                .with_max_rounds(max_rounds)
                .with_max_history(settings.session.max_history),
        )
    }

    /// Set the tool round budget.
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.orchestrator = self.orchestrator.with_max_rounds(max_rounds);
        self
    }

    /// Set how many exchanges each session remembers.
    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.sessions = SessionStore::new(max_history);
        self
    }

    /// Start a conversation session.
    pub fn new_session(&self) -> String {
        self.sessions.create_session()
    }

    /// Forget a session's history.
    pub fn clear_session(&self, session_id: &str) {
        self.sessions.clear(session_id);
    }

    /// Courses in the catalog.
    pub async fn list_courses(&self) -> Result<Vec<CourseSummary>> {
        self.store.list_courses().await
    }

    /// Answer a question, optionally within a session.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn query(&self, question: &str, session_id: Option<&str>) -> Result<QueryResponse> {
        let question = question.trim();
        if question.is_empty() {
            return Err(KursError::InvalidInput(
                "Question must not be empty".to_string(),
            ));
        }

        let history = session_id.and_then(|id| self.sessions.history(id));
        let definitions = self.registry.definitions();

        let (answer, sources) = {
            let _guard = self.query_lock.lock().await;
            let result = self
                .orchestrator
                .generate(
                    question,
                    history.as_deref(),
                    Some(definitions.as_slice()),
                    Some(&self.registry),
                )
                .await;
            let sources = self.registry.drain_sources();
            (result?, sources)
        };

        if let Some(id) = session_id {
            self.sessions.add_exchange(id, question, &answer);
        }

        info!("Answered with {} sources", sources.len());
        Ok(QueryResponse { answer, sources })
    }
}

/// An answer with the sources the tools surfaced for it.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<Source>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::GenerationResponse;
    use crate::test_support::{sample_catalog, tool_use_response, KeywordEmbedder, ScriptedGenerator};
    use serde_json::json;

    async fn assistant(service: &Arc<ScriptedGenerator>) -> CourseAssistant {
        let store =
            MemoryCourseStore::from_catalog(sample_catalog(), Arc::new(KeywordEmbedder), 5)
                .await
                .unwrap();
        CourseAssistant::new(Arc::new(store), service.clone(), "policy").unwrap()
    }

    #[tokio::test]
    async fn test_query_returns_answer_and_sources() {
        let service = Arc::new(ScriptedGenerator::new(vec![
            tool_use_response(&[("tu_1", "search_course_content", json!({"query": "python basics"}))]),
            GenerationResponse::text("Python is a programming language."),
            GenerationResponse::text("Hello."),
        ]));
        let assistant = assistant(&service).await;

        let response = assistant.query("What is Python?", None).await.unwrap();
        assert_eq!(response.answer, "Python is a programming language.");
        assert_eq!(
            response.sources[0],
            Source::new(
                "Python Fundamentals - Lesson 1",
                Some("https://example.com/python/1".to_string())
            )
        );
        assert!(response.sources.contains(&Source::new(
            "Python Fundamentals - Lesson 2",
            Some("https://example.com/python".to_string())
        )));

        let tools = service.requests()[0].tools.clone().unwrap();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["search_course_content", "get_course_outline"]);

        let response = assistant.query("Hi", None).await.unwrap();
        assert!(response.sources.is_empty());
    }

    #[tokio::test]
    async fn test_sources_reset_after_failed_query() {
        let service = Arc::new(ScriptedGenerator::new(vec![
            tool_use_response(&[("tu_1", "search_course_content", json!({"query": "mcp"}))]),
        ]));
        let assistant = assistant(&service).await;

        assert!(assistant.query("What is MCP?", None).await.is_err());
        assert!(assistant.registry.collect_sources().is_empty());
    }

    #[tokio::test]
    async fn test_session_history_reaches_system_instruction() {
        let service = Arc::new(ScriptedGenerator::new(vec![
            GenerationResponse::text("A protocol."),
            GenerationResponse::text("It covers servers."),
        ]));
        let assistant = assistant(&service).await;
        let session = assistant.new_session();

        assistant.query("What is MCP?", Some(&session)).await.unwrap();
        assistant.query("And lesson 2?", Some(&session)).await.unwrap();

        let requests = service.requests();
        assert_eq!(requests[0].system, "policy");
        assert!(requests[1]
            .system
            .ends_with("User: What is MCP?\nAssistant: A protocol."));
    }

    #[tokio::test]
    async fn test_empty_question_rejected() {
        let service = Arc::new(ScriptedGenerator::default());
        let assistant = assistant(&service).await;

        let err = assistant.query("   ", None).await.unwrap_err();
        assert!(matches!(err, KursError::InvalidInput(_)));
        assert_eq!(service.call_count(), 0);
    }

    #[tokio::test]
    async fn test_list_courses() {
        let service = Arc::new(ScriptedGenerator::default());
        let assistant = assistant(&service).await;

        let courses = assistant.list_courses().await.unwrap();
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].lesson_count, 2);
    }
}
