//! Interactive chat command.

use super::apply_generation_overrides;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{GenerationProvider, Settings};
use crate::rag::CourseAssistant;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
pub async fn run_chat(
    model: Option<String>,
    provider: Option<GenerationProvider>,
    mut settings: Settings,
) -> Result<()> {
    apply_generation_overrides(&mut settings, model, provider);

    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Ask(settings.generation.provider), &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let spinner = Output::spinner("Loading course catalog...");
    let assistant = CourseAssistant::from_settings(&settings).await;
    spinner.finish_and_clear();
    let assistant = assistant?;
    let session = assistant.new_session();

    println!("\n{}", style("Kurs Chat").bold().cyan());
    println!(
        "{}\n",
        style("Ask about your courses, or 'exit' to quit. Use 'clear' to reset the conversation.")
            .dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("clear") {
            assistant.clear_session(&session);
            Output::info("Conversation history cleared.");
            continue;
        }

        let spinner = Output::spinner("Thinking...");
        let result = assistant.query(input, Some(&session)).await;
        spinner.finish_and_clear();

        match result {
            Ok(response) => {
                println!("\n{} {}\n", style("Kurs:").cyan().bold(), response.answer);
                for source in &response.sources {
                    Output::source(source);
                }
                if !response.sources.is_empty() {
                    println!();
                }
            }
            Err(e) => {
                Output::error(&format!("Error: {}", e));
            }
        }
    }

    Ok(())
}
