//! Outline command implementation.

use crate::agent::CourseOutlineTool;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::rag::load_course_store;
use anyhow::Result;

/// Run the outline command.
pub async fn run_outline(course: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Browse, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let store = load_course_store(&settings).await?;
    let output = CourseOutlineTool::new(store).outline(course).await?;
    println!("{}", output.text);

    Ok(())
}
