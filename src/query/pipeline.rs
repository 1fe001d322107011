//! End-to-end answer pipeline: extract a district, pick a route, run
//! the hybrid search, assemble grounding and synthesize the answer.

use crate::core::errors::ApiError;
use crate::genai::GeminiClient;
use crate::query::log::QueryLogger;
use crate::query::{context, location, router, synthesizer};
use crate::store::{QueryLogEntry, SearchOptions, SupabaseStore};

pub struct QueryPipeline {
    genai: GeminiClient,
    store: SupabaseStore,
    options: SearchOptions,
    logger: QueryLogger,
}

impl QueryPipeline {
    pub fn new(
        genai: GeminiClient,
        store: SupabaseStore,
        options: SearchOptions,
        logger: QueryLogger,
    ) -> Self {
        Self {
            genai,
            store,
            options,
            logger,
        }
    }

    /// Answers one question. Blank input short-circuits to the canned
    /// refusal; any model or store failure on the answer path surfaces
    /// as an internal error.
    pub async fn answer(&self, raw_question: &str) -> Result<String, ApiError> {
        let question = raw_question.trim();
        if question.is_empty() {
            tracing::info!("blank question, serving the canned refusal");
            return Ok(synthesizer::REFUSAL.to_string());
        }

        let extracted = location::extract(&self.genai, question)
            .await
            .map_err(ApiError::internal)?;
        let route = router::classify(&self.genai, question)
            .await
            .map_err(ApiError::internal)?;

        let embedding = self
            .genai
            .embed_query(question)
            .await
            .map_err(ApiError::internal)?;
        let results = self
            .store
            .hybrid_search(route, question, &embedding, &self.options)
            .await
            .map_err(ApiError::internal)?;
        tracing::info!(
            route = route.as_str(),
            matches = results.len(),
            "retrieval complete"
        );

        let side_fact = context::side_fact(&self.store, question, extracted.as_deref()).await;
        let grounding = context::grounding_text(side_fact.as_deref(), &results);
        let answer = synthesizer::synthesize(&self.genai, question, &grounding)
            .await
            .map_err(ApiError::internal)?;

        self.logger.record(QueryLogEntry {
            query: question.to_string(),
            route: route.as_str().to_string(),
            result_count: results.len(),
            created_at: chrono::Utc::now().to_rfc3339(),
        });

        Ok(answer)
    }
}
