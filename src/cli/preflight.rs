//! Pre-flight checks before expensive operations.
//!
//! Validates that API keys and the course catalog are available before
//! embedding a whole catalog or calling a model.

use crate::config::{GenerationProvider, Settings};
use crate::error::{KursError, Result};
use std::path::Path;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Answering questions needs the catalog, embeddings and the generation backend.
    Ask(GenerationProvider),
    /// Search and outline need the catalog and embeddings.
    Browse,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    check_catalog(&settings.catalog_path())?;
    check_api_key("OPENAI_API_KEY")?;
    if let Operation::Ask(provider) = operation {
        check_api_key(provider.api_key_env())?;
    }
    Ok(())
}

/// Check that an API key environment variable is set and non-empty.
fn check_api_key(var: &str) -> Result<()> {
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => Ok(()),
        Ok(_) => Err(KursError::Config(format!(
            "{} is empty. Set it with: export {}='...'",
            var, var
        ))),
        Err(_) => Err(KursError::Config(format!(
            "{} not set. Set it with: export {}='...'",
            var, var
        ))),
    }
}

/// Check that the course catalog file exists.
fn check_catalog(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(KursError::Config(format!(
            "Course catalog not found at {}. Set catalog.path in the config file.",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_key_names_variable() {
        let err = check_api_key("KURS_TEST_KEY_THAT_IS_NEVER_SET").unwrap_err();
        assert!(err.to_string().contains("KURS_TEST_KEY_THAT_IS_NEVER_SET not set"));
    }

    #[test]
    fn test_catalog_check() {
        let file = NamedTempFile::new().unwrap();
        tokio_test::assert_ok!(check_catalog(file.path()));
        tokio_test::assert_err!(check_catalog(Path::new("/nonexistent/catalog.json")));
    }

    #[test]
    fn test_check_fails_without_catalog() {
        let mut settings = Settings::default();
        settings.catalog.path = "/nonexistent/catalog.json".to_string();
        let err = check(Operation::Browse, &settings).unwrap_err();
        assert!(err.to_string().contains("Course catalog not found"));
    }
}
