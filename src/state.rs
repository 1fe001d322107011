use std::sync::Arc;

use crate::core::config::AppConfig;
use crate::genai::GeminiClient;
use crate::query::{QueryLogger, QueryPipeline};
use crate::store::{SearchOptions, SupabaseStore};

/// Shared application state. When startup configuration is incomplete
/// the pipeline slot holds the reason instead, and the server stays up
/// in a degraded mode that reports it on every query.
pub struct AppState {
    pub pipeline: Result<QueryPipeline, String>,
}

impl AppState {
    pub fn initialize() -> Arc<Self> {
        let pipeline = match AppConfig::from_env() {
            Ok(config) => Ok(Self::build_pipeline(config)),
            Err(err) => {
                tracing::error!("starting degraded, configuration is incomplete: {}", err);
                Err(err.to_string())
            }
        };
        Arc::new(AppState { pipeline })
    }

    fn build_pipeline(config: AppConfig) -> QueryPipeline {
        let genai = GeminiClient::new(config.google_api_key)
            .with_embedding_model(config.embedding_model)
            .with_generation_model(config.generation_model);
        let store = SupabaseStore::new(
            config.supabase_url,
            config.supabase_anon_key,
            config.supabase_service_key,
        );
        let options = SearchOptions {
            match_count: config.match_count,
            match_threshold: config.match_threshold,
        };
        let logger = QueryLogger::spawn(store.clone());
        QueryPipeline::new(genai, store, options, logger)
    }

    /// Builds a state around an already constructed pipeline.
    pub fn with_pipeline(pipeline: QueryPipeline) -> Arc<Self> {
        Arc::new(AppState {
            pipeline: Ok(pipeline),
        })
    }

    /// Builds a state that reports the given reason on every query.
    pub fn degraded(reason: impl Into<String>) -> Arc<Self> {
        Arc::new(AppState {
            pipeline: Err(reason.into()),
        })
    }
}
