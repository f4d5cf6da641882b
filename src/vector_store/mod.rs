//! Course retrieval abstraction for Kurs.
//!
//! The tools only ever talk to a [`CourseStore`]; how chunks are stored and
//! ranked is up to the implementation.

mod catalog;
mod memory;

pub use catalog::{ChunkRecord, CourseCatalog, CourseRecord, LessonRecord};
pub use memory::MemoryCourseStore;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Metadata attached to a retrieved chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Title of the course the chunk belongs to.
    pub course_title: String,
    /// Lesson the chunk belongs to, when known.
    pub lesson_number: Option<u32>,
    /// Position of the chunk within the course.
    pub chunk_index: usize,
}

/// Ranked search hits, or an error message from the backend.
///
/// `documents`, `metadata` and `distances` always have the same length; when
/// `error` is set all three are empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub documents: Vec<String>,
    pub metadata: Vec<ChunkMetadata>,
    pub distances: Vec<f32>,
    pub error: Option<String>,
}

impl SearchResults {
    /// Build results from `(document, metadata, distance)` hits.
    pub fn from_hits(hits: impl IntoIterator<Item = (String, ChunkMetadata, f32)>) -> Self {
        let mut results = SearchResults::default();
        for (document, metadata, distance) in hits {
            results.documents.push(document);
            results.metadata.push(metadata);
            results.distances.push(distance);
        }
        results
    }

    /// Empty results carrying an error message.
    pub fn empty(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// Whether there are no hits.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Number of hits.
    pub fn len(&self) -> usize {
        self.documents.len()
    }
}

/// A single lesson line in a course outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonEntry {
    pub lesson_number: Option<u32>,
    pub lesson_title: Option<String>,
}

/// Structural metadata of a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseOutline {
    pub title: String,
    pub course_link: Option<String>,
    pub lessons: Vec<LessonEntry>,
}

/// Summary information about a course in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSummary {
    pub title: String,
    pub instructor: Option<String>,
    pub lesson_count: usize,
    pub chunk_count: usize,
}

/// Query surface of the course retrieval backend.
#[async_trait]
pub trait CourseStore: Send + Sync {
    /// Semantic search over chunk content with optional course and lesson filters.
    ///
    /// Backend problems that the model should see (unknown course, bad filter)
    /// are reported through [`SearchResults::error`]; an `Err` means the
    /// backend itself failed.
    async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<u32>,
    ) -> Result<SearchResults>;

    /// Outline of the course best matching `course_name`, if any.
    async fn get_course_outline(&self, course_name: &str) -> Result<Option<CourseOutline>>;

    /// Link to a specific lesson.
    async fn get_lesson_link(&self, course_title: &str, lesson_number: u32) -> Result<Option<String>>;

    /// Link to the course landing page.
    async fn get_course_link(&self, course_title: &str) -> Result<Option<String>>;

    /// All courses in the store.
    async fn list_courses(&self) -> Result<Vec<CourseSummary>>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
