//! Ask command implementation.

use super::apply_generation_overrides;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{GenerationProvider, Settings};
use crate::rag::CourseAssistant;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    model: Option<String>,
    provider: Option<GenerationProvider>,
    json: bool,
    mut settings: Settings,
) -> Result<()> {
    apply_generation_overrides(&mut settings, model, provider);

    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Ask(settings.generation.provider), &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let spinner = Output::spinner("Loading course catalog...");
    let assistant = match CourseAssistant::from_settings(&settings).await {
        Ok(assistant) => assistant,
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to load assistant: {}", e));
            return Err(e.into());
        }
    };

    spinner.set_message("Thinking...");
    let result = assistant.query(question, None).await;
    spinner.finish_and_clear();

    match result {
        Ok(response) if json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Ok(response) => {
            println!("\n{}\n", response.answer);

            if !response.sources.is_empty() {
                Output::header("Sources");
                for source in &response.sources {
                    Output::source(source);
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
