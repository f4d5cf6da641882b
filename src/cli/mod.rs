//! CLI module for Kurs.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::config::GenerationProvider;
use clap::{Parser, Subcommand};

/// Kurs - Course Material Assistant
///
/// Ask questions about a course catalog and get answers grounded in lesson
/// content, with links to the lessons they came from.
#[derive(Parser, Debug)]
#[command(name = "kurs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a question about the course material
    Ask {
        /// The question to ask
        question: String,

        /// Model to use for response generation
        #[arg(short, long)]
        model: Option<String>,

        /// Generation backend (anthropic, openai)
        #[arg(short, long)]
        provider: Option<GenerationProvider>,

        /// Print the answer and sources as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start an interactive chat session
    Chat {
        /// Model to use
        #[arg(short, long)]
        model: Option<String>,

        /// Generation backend (anthropic, openai)
        #[arg(short, long)]
        provider: Option<GenerationProvider>,
    },

    /// Search lesson content directly, without the model
    Search {
        /// Search query
        query: String,

        /// Restrict to a course (partial titles work)
        #[arg(long)]
        course: Option<String>,

        /// Restrict to a lesson number
        #[arg(short, long)]
        lesson: Option<u32>,
    },

    /// Show a course's outline
    Outline {
        /// Course title or part of it
        course: String,
    },

    /// List courses in the catalog
    Courses,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
