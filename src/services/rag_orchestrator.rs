//! RAG (Retrieval-Augmented Generation) orchestrator
//!
//! Owns the single active index and coordinates chunking, embedding,
//! retrieval and streamed generation around it.
//!
//! The orchestrator is an explicit handle: construct one per application and
//! share it behind an `Arc`. Every method takes `&self`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use futures::TryStreamExt;
use tracing::{debug, info, warn};

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{Document, IndexSummary, RagConfig, RetrievalResult};
use crate::domain::ports::{EmbeddingProvider, FragmentStream, GenerationProvider};
use crate::services::chunker::Chunker;
use crate::services::prompt::build_rag_turns;
use crate::services::vector_index::VectorIndex;

/// Coordinates indexing of a single document and grounded answering
///
/// State moves between *empty*, *indexing* and *indexed*. The installed index
/// is replaced wholesale by a successful build and never partially visible.
/// Only one build may run at a time; a second concurrent build is rejected
/// with [`RagError::BuildInProgress`].
pub struct RagOrchestrator {
    chunker: Chunker,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn GenerationProvider>,
    config: RagConfig,
    current: RwLock<Option<Arc<VectorIndex>>>,
    building: AtomicBool,
}

impl RagOrchestrator {
    /// Create a new orchestrator
    ///
    /// # Arguments
    /// * `config` - Chunking, retrieval and sampling parameters
    /// * `embedder` - Provider used for both chunk and query embeddings
    /// * `generator` - Provider that streams the answer
    ///
    /// # Returns
    /// * `Err(RagError::Configuration)` - If the chunking parameters are invalid
    pub fn new(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn GenerationProvider>,
    ) -> RagResult<Self> {
        let chunker = Chunker::with_config(config.chunking())?;

        Ok(Self {
            chunker,
            embedder,
            generator,
            config,
            current: RwLock::new(None),
            building: AtomicBool::new(false),
        })
    }

    /// Active configuration
    pub const fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Index raw text under `source_name`, replacing any previous index
    ///
    /// # Returns
    /// * `Ok(IndexSummary)` - Summary of the newly installed index
    /// * `Err(RagError::Ingestion)` - If the text is blank
    /// * `Err(RagError::BuildInProgress)` - If another build is running
    /// * `Err(RagError::Embedding)` - If embedding the chunks fails
    pub async fn index_document(
        &self,
        raw_text: &str,
        source_name: &str,
    ) -> RagResult<IndexSummary> {
        self.index(Document::new(source_name, raw_text)).await
    }

    /// Index a document made of several extracted parts (e.g. PDF pages)
    pub async fn index_parts(
        &self,
        parts: Vec<String>,
        source_name: &str,
    ) -> RagResult<IndexSummary> {
        self.index(Document::from_parts(source_name, parts)).await
    }

    /// Index a loaded document, replacing any previous index
    ///
    /// On failure the previously installed index, if any, stays in place.
    pub async fn index(&self, document: Document) -> RagResult<IndexSummary> {
        if document.is_blank() {
            return Err(RagError::Ingestion(format!(
                "document '{}' contains no text",
                document.source_name
            )));
        }

        let _guard = BuildGuard::acquire(&self.building).inspect_err(|_| {
            warn!(
                source = %document.source_name,
                "Rejected index build: another build is in progress"
            );
        })?;

        let chunks = self.chunker.split(&document.contents);
        info!(
            "Chunked '{}' ({} chars) into {} chunks",
            document.source_name,
            document.char_len(),
            chunks.len()
        );

        let index = VectorIndex::build(document.source_name, chunks, self.embedder.as_ref()).await?;
        let index = Arc::new(index);
        let summary = summarize(&index, false);

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(index);

        info!(
            document_id = ?summary.document_id,
            chunks = summary.chunks_count,
            "Installed new index"
        );

        Ok(summary)
    }

    /// Retrieve the `top_k` chunks most similar to `query`
    pub async fn retrieve(&self, query: &str) -> RagResult<RetrievalResult> {
        let index = self.snapshot().ok_or(RagError::NotIndexed)?;
        self.retrieve_from(&index, query).await
    }

    /// Stream an answer to `query` grounded in the installed index
    ///
    /// The index is captured before the first suspension point, so a
    /// concurrent [`clear`](Self::clear) or re-index does not affect this call.
    ///
    /// # Arguments
    /// * `query` - The user's question
    /// * `system_preamble` - Caller instructions; empty selects the default preamble
    ///
    /// # Returns
    /// * `Ok(FragmentStream)` - Fragments exactly as the provider produced them
    /// * `Err(RagError::NotIndexed)` - If nothing is indexed
    pub async fn answer(&self, query: &str, system_preamble: &str) -> RagResult<FragmentStream> {
        let (_, stream) = self.answer_with_sources(query, system_preamble).await?;
        Ok(stream)
    }

    /// Like [`answer`](Self::answer), also returning the chunks the prompt was
    /// built from. The query is embedded once.
    pub async fn answer_with_sources(
        &self,
        query: &str,
        system_preamble: &str,
    ) -> RagResult<(RetrievalResult, FragmentStream)> {
        let index = self.snapshot().ok_or(RagError::NotIndexed)?;

        let retrieved = self.retrieve_from(&index, query).await?;
        let turns = build_rag_turns(query, system_preamble, &retrieved.context());

        debug!(
            index_id = %index.id(),
            hits = retrieved.len(),
            provider = self.generator.name(),
            "Starting grounded generation"
        );

        let stream = self.generator.stream(&turns, self.config.temperature).await?;
        Ok((retrieved, stream))
    }

    /// Like [`answer`](Self::answer), but collects the whole response
    pub async fn answer_text(&self, query: &str, system_preamble: &str) -> RagResult<String> {
        let stream = self.answer(query, system_preamble).await?;

        stream
            .try_fold(String::new(), |mut answer, fragment| async move {
                answer.push_str(&fragment);
                Ok(answer)
            })
            .await
    }

    /// Describe the current state. Never fails.
    pub fn status(&self) -> IndexSummary {
        let building = self.building.load(Ordering::Acquire);

        self.snapshot().map_or(
            IndexSummary {
                building,
                ..IndexSummary::empty()
            },
            |index| summarize(&index, building),
        )
    }

    /// Discard the installed index. Idempotent.
    pub fn clear(&self) {
        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(index) = previous {
            info!(index_id = %index.id(), "Cleared index");
        }
    }

    fn snapshot(&self) -> Option<Arc<VectorIndex>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn retrieve_from(&self, index: &VectorIndex, query: &str) -> RagResult<RetrievalResult> {
        let query_vector = self.embedder.embed_one(query).await?;

        if !index.is_empty() && query_vector.len() != index.dimension() {
            return Err(RagError::Embedding(format!(
                "query vector has dimension {}, index has {}",
                query_vector.len(),
                index.dimension()
            )));
        }

        let retrieved = index.search(&query_vector, self.config.top_k);
        debug!(
            "Retrieved {} of {} chunks for query",
            retrieved.len(),
            index.len()
        );

        Ok(retrieved)
    }
}

fn summarize(index: &VectorIndex, building: bool) -> IndexSummary {
    IndexSummary {
        is_indexed: true,
        document_id: Some(index.id()),
        source_name: Some(index.source_name().to_string()),
        chunks_count: index.len(),
        created_at: Some(index.created_at()),
        building,
    }
}

/// Holds the build flag for the duration of a build and releases it on drop,
/// including when the build future is cancelled.
struct BuildGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BuildGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> RagResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| RagError::BuildInProgress)?;

        Ok(Self { flag })
    }
}

impl Drop for BuildGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
