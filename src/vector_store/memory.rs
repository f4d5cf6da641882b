//! In-memory course store.
//!
//! Holds every chunk embedding in memory and ranks by cosine similarity.
//! Suitable for catalogs of a few thousand chunks and for tests.

use super::{
    cosine_similarity, ChunkMetadata, CourseCatalog, CourseOutline, CourseRecord, CourseStore,
    CourseSummary, LessonEntry, SearchResults,
};
use crate::embedding::Embedder;
use crate::error::{KursError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

struct StoredChunk {
    content: String,
    metadata: ChunkMetadata,
    embedding: Vec<f32>,
}

/// In-memory course store.
pub struct MemoryCourseStore {
    embedder: Arc<dyn Embedder>,
    courses: Vec<CourseRecord>,
    chunks: Vec<StoredChunk>,
    max_results: usize,
}

impl MemoryCourseStore {
    /// Create an empty store returning at most `max_results` hits per search.
    pub fn new(embedder: Arc<dyn Embedder>, max_results: usize) -> Self {
        Self {
            embedder,
            courses: Vec::new(),
            chunks: Vec::new(),
            max_results,
        }
    }

    /// Build a store from every course in a catalog.
    pub async fn from_catalog(
        catalog: CourseCatalog,
        embedder: Arc<dyn Embedder>,
        max_results: usize,
    ) -> Result<Self> {
        let mut store = Self::new(embedder, max_results);
        for course in catalog.courses {
            store.add_course(course).await?;
        }
        info!(
            "Loaded {} courses ({} chunks) into memory",
            store.courses.len(),
            store.chunks.len()
        );
        Ok(store)
    }

    /// Embed and add a course, replacing any course with the same title.
    ///
    /// Returns the number of chunks indexed.
    pub async fn add_course(&mut self, mut course: CourseRecord) -> Result<usize> {
        let chunks = std::mem::take(&mut course.chunks);
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(KursError::Embedding(format!(
                "Expected {} embeddings for course '{}', got {}",
                chunks.len(),
                course.title,
                embeddings.len()
            )));
        }

        self.courses.retain(|c| c.title != course.title);
        self.chunks.retain(|c| c.metadata.course_title != course.title);

        let count = chunks.len();
        for (index, (chunk, embedding)) in chunks.into_iter().zip(embeddings).enumerate() {
            self.chunks.push(StoredChunk {
                content: chunk.content,
                metadata: ChunkMetadata {
                    course_title: course.title.clone(),
                    lesson_number: chunk.lesson_number,
                    chunk_index: index,
                },
                embedding,
            });
        }

        debug!("Indexed {} chunks for course '{}'", count, course.title);
        self.courses.push(course);
        Ok(count)
    }

    /// Resolve a (partial) course name: exact case-insensitive match first,
    /// then the first title containing the name.
    fn resolve_course(&self, name: &str) -> Option<&CourseRecord> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        self.courses
            .iter()
            .find(|c| c.title.to_lowercase() == needle)
            .or_else(|| {
                self.courses
                    .iter()
                    .find(|c| c.title.to_lowercase().contains(&needle))
            })
    }

    fn course_by_title(&self, title: &str) -> Option<&CourseRecord> {
        self.courses.iter().find(|c| c.title == title)
    }
}

#[async_trait]
impl CourseStore for MemoryCourseStore {
    #[instrument(skip(self))]
    async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<u32>,
    ) -> Result<SearchResults> {
        if self.max_results == 0 {
            return Ok(SearchResults::empty(
                "Search error: max_results must be greater than 0",
            ));
        }

        let course_title = match course_name {
            Some(name) => match self.resolve_course(name) {
                Some(course) => Some(course.title.as_str()),
                None => {
                    return Ok(SearchResults::empty(format!(
                        "No course found matching '{}'",
                        name
                    )))
                }
            },
            None => None,
        };

        let query_embedding = match self.embedder.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!("Query embedding failed: {}", e);
                return Ok(SearchResults::empty(format!("Search error: {}", e)));
            }
        };

        let mut scored: Vec<(&StoredChunk, f32)> = self
            .chunks
            .iter()
            .filter(|c| course_title.map_or(true, |t| c.metadata.course_title == t))
            .filter(|c| lesson_number.is_none() || c.metadata.lesson_number == lesson_number)
            .map(|c| (c, cosine_similarity(&query_embedding, &c.embedding)))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(self.max_results);

        debug!("Search matched {} chunks", scored.len());

        Ok(SearchResults::from_hits(scored.into_iter().map(|(c, score)| {
            (c.content.clone(), c.metadata.clone(), 1.0 - score)
        })))
    }

    async fn get_course_outline(&self, course_name: &str) -> Result<Option<CourseOutline>> {
        Ok(self.resolve_course(course_name).map(|course| CourseOutline {
            title: course.title.clone(),
            course_link: course.course_link.clone(),
            lessons: course
                .lessons
                .iter()
                .map(|l| LessonEntry {
                    lesson_number: Some(l.lesson_number),
                    lesson_title: l.title.clone(),
                })
                .collect(),
        }))
    }

    async fn get_lesson_link(&self, course_title: &str, lesson_number: u32) -> Result<Option<String>> {
        Ok(self.course_by_title(course_title).and_then(|course| {
            course
                .lessons
                .iter()
                .find(|l| l.lesson_number == lesson_number)
                .and_then(|l| l.lesson_link.clone())
        }))
    }

    async fn get_course_link(&self, course_title: &str) -> Result<Option<String>> {
        Ok(self
            .course_by_title(course_title)
            .and_then(|course| course.course_link.clone()))
    }

    async fn list_courses(&self) -> Result<Vec<CourseSummary>> {
        Ok(self
            .courses
            .iter()
            .map(|course| CourseSummary {
                title: course.title.clone(),
                instructor: course.instructor.clone(),
                lesson_count: course.lessons.len(),
                chunk_count: self
                    .chunks
                    .iter()
                    .filter(|c| c.metadata.course_title == course.title)
                    .count(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_catalog, KeywordEmbedder};

    async fn sample_store(max_results: usize) -> MemoryCourseStore {
        MemoryCourseStore::from_catalog(sample_catalog(), Arc::new(KeywordEmbedder), max_results)
            .await
            .unwrap()
    }

    /// Embedder that drops the last input of every batch.
    struct ShortEmbedder;

    #[async_trait]
    impl Embedder for ShortEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            KeywordEmbedder.embed(text).await
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let mut out = KeywordEmbedder.embed_batch(texts).await?;
            out.pop();
            Ok(out)
        }

        fn dimensions(&self) -> usize {
            KeywordEmbedder.dimensions()
        }
    }

    #[tokio::test]
    async fn test_embedding_count_mismatch_is_error() {
        let result =
            MemoryCourseStore::from_catalog(sample_catalog(), Arc::new(ShortEmbedder), 5).await;
        assert!(matches!(result, Err(KursError::Embedding(_))));
    }

    #[tokio::test]
    async fn test_search_ranks_by_similarity() {
        let store = sample_store(5).await;
        let results = store.search("python basics", None, None).await.unwrap();

        assert!(results.error.is_none());
        assert!(!results.is_empty());
        assert!(results.documents[0].contains("Python"));
        assert_eq!(results.metadata[0].course_title, "Python Fundamentals");
        assert!(results.distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_search_filters_by_partial_course_and_lesson() {
        let store = sample_store(5).await;
        let results = store.search("agent", Some("mcp"), Some(2)).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results.metadata[0].course_title, "MCP: Build Rich-Context AI Apps");
        assert_eq!(results.metadata[0].lesson_number, Some(2));
    }

    #[tokio::test]
    async fn test_unknown_course_reports_error() {
        let store = sample_store(5).await;
        let results = store.search("anything", Some("Rust"), None).await.unwrap();

        assert!(results.is_empty());
        assert_eq!(results.error.as_deref(), Some("No course found matching 'Rust'"));
    }

    #[tokio::test]
    async fn test_zero_max_results_reports_error() {
        let store = sample_store(0).await;
        let results = store.search("python", None, None).await.unwrap();
        assert!(results.error.unwrap().starts_with("Search error"));
    }

    #[tokio::test]
    async fn test_outline_and_links() {
        let store = sample_store(5).await;

        let outline = store.get_course_outline("python").await.unwrap().unwrap();
        assert_eq!(outline.title, "Python Fundamentals");
        assert_eq!(outline.lessons.len(), 2);

        assert!(store.get_course_outline("Haskell").await.unwrap().is_none());

        let link = store
            .get_lesson_link("MCP: Build Rich-Context AI Apps", 2)
            .await
            .unwrap();
        assert_eq!(link.as_deref(), Some("https://example.com/mcp/2"));
        assert!(store.get_lesson_link("Python Fundamentals", 9).await.unwrap().is_none());
        assert_eq!(
            store.get_course_link("Python Fundamentals").await.unwrap().as_deref(),
            Some("https://example.com/python")
        );
    }

    #[tokio::test]
    async fn test_add_course_replaces_same_title() {
        let mut store = sample_store(5).await;
        let mut replacement = sample_catalog().courses.remove(0);
        replacement.chunks.truncate(1);
        store.add_course(replacement).await.unwrap();

        let courses = store.list_courses().await.unwrap();
        assert_eq!(courses.len(), 2);
        let python = courses.iter().find(|c| c.title == "Python Fundamentals").unwrap();
        assert_eq!(python.chunk_count, 1);
    }
}
