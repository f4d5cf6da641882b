//! Course catalog file format.
//!
//! A catalog is a JSON document listing courses with their lessons and
//! already-chunked lesson text:
//!
//! ```json
//! {
//!   "courses": [{
//!     "title": "Building Towards Computer Use",
//!     "course_link": "https://example.com/course",
//!     "instructor": "Colt Steele",
//!     "lessons": [{"lesson_number": 0, "title": "Introduction", "lesson_link": "https://example.com/l0"}],
//!     "chunks": [{"lesson_number": 0, "content": "Welcome to the course..."}]
//!   }]
//! }
//! ```

use crate::error::{KursError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root of a catalog file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseCatalog {
    #[serde(default)]
    pub courses: Vec<CourseRecord>,
}

/// A course with lessons and chunk text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseRecord {
    pub title: String,
    #[serde(default)]
    pub course_link: Option<String>,
    #[serde(default)]
    pub instructor: Option<String>,
    #[serde(default)]
    pub lessons: Vec<LessonRecord>,
    #[serde(default)]
    pub chunks: Vec<ChunkRecord>,
}

/// A lesson entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonRecord {
    pub lesson_number: u32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub lesson_link: Option<String>,
}

/// A chunk of lesson text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    #[serde(default)]
    pub lesson_number: Option<u32>,
    pub content: String,
}

impl CourseCatalog {
    /// Load and validate a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(KursError::Config(format!(
                "Course catalog not found at {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        let catalog: CourseCatalog = serde_json::from_str(&content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Course titles must be non-empty and unique.
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for course in &self.courses {
            if course.title.trim().is_empty() {
                return Err(KursError::InvalidInput(
                    "Course catalog contains a course without a title".to_string(),
                ));
            }
            if !seen.insert(course.title.as_str()) {
                return Err(KursError::InvalidInput(format!(
                    "Duplicate course title in catalog: {}",
                    course.title
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "courses": [{
            "title": "MCP: Build Rich-Context AI Apps",
            "course_link": "https://example.com/mcp",
            "lessons": [
                {"lesson_number": 1, "title": "Why MCP", "lesson_link": "https://example.com/mcp/1"},
                {"lesson_number": 2}
            ],
            "chunks": [{"lesson_number": 1, "content": "MCP standardizes tool access."}]
        }]
    }"#;

    #[test]
    fn test_load_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let catalog = CourseCatalog::load(&path).unwrap();
        assert_eq!(catalog.courses.len(), 1);
        let course = &catalog.courses[0];
        assert_eq!(course.lessons.len(), 2);
        assert!(course.lessons[1].title.is_none());
        assert!(course.instructor.is_none());
        assert_eq!(course.chunks[0].lesson_number, Some(1));
    }

    #[test]
    fn test_missing_catalog_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CourseCatalog::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, KursError::Config(_)));
    }

    #[test]
    fn test_duplicate_titles_rejected() {
        let catalog: CourseCatalog = serde_json::from_str(
            r#"{"courses": [{"title": "A"}, {"title": "A"}]}"#,
        )
        .unwrap();
        assert!(catalog.validate().is_err());
    }
}
