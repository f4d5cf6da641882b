//! Courses command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::rag::load_course_store;
use anyhow::Result;

/// Run the courses command.
pub async fn run_courses(settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Browse, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let store = load_course_store(&settings).await?;
    let courses = store.list_courses().await?;

    if courses.is_empty() {
        Output::warning("The course catalog is empty.");
        return Ok(());
    }

    Output::header(&format!("Courses ({})", courses.len()));
    for course in &courses {
        Output::course(course);
    }

    Ok(())
}
