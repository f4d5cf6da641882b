//! Kurs - Course Material Assistant
//!
//! A CLI tool that answers questions about a course catalog by letting a
//! language model decide when to search lesson content or look up a course
//! outline, and cites the lessons it used.
//!
//! # Overview
//!
//! Kurs allows you to:
//! - Ask questions and get answers grounded in course material, with sources
//! - Chat with follow-up questions that remember the conversation
//! - Search lesson content and view course outlines directly
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `generation` - Generation backends with tool calling (Anthropic, OpenAI)
//! - `embedding` - Embedding generation
//! - `vector_store` - Course catalog and course store abstraction
//! - `agent` - Tools, tool registry and the bounded tool-calling orchestrator
//! - `rag` - Course assistant tying the pieces together
//!
//! # Example
//!
//! ```rust,no_run
//! use kurs::config::Settings;
//! use kurs::rag::CourseAssistant;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let assistant = CourseAssistant::from_settings(&settings).await?;
//!
//!     let response = assistant.query("What does lesson 2 of the MCP course cover?", None).await?;
//!     println!("{}", response.answer);
//!     for source in &response.sources {
//!         println!("  {}", source.name);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod openai;
pub mod rag;
pub mod vector_store;

#[cfg(test)]
mod test_support;

pub use error::{KursError, Result};
