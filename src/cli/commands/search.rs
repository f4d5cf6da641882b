//! Search command implementation.

use crate::agent::CourseSearchTool;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::rag::load_course_store;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(
    query: &str,
    course: Option<&str>,
    lesson: Option<u32>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Browse, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let spinner = Output::spinner("Searching...");
    let output = match load_course_store(&settings).await {
        Ok(store) => CourseSearchTool::new(store).search(query, course, lesson).await,
        Err(e) => Err(e),
    };
    spinner.finish_and_clear();

    match output {
        Ok(output) => {
            println!("\n{}\n", output.text);
            if let Some(sources) = output.sources.filter(|s| !s.is_empty()) {
                Output::header("Sources");
                for source in &sources {
                    Output::source(source);
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
