use std::io::Read;

use crate::genai::GeminiClient;
use crate::ingestion::chunker::{self, SourceRecord};
use crate::ingestion::records::{FacilityRecord, NewsRecord};
use crate::store::{Domain, StoredDocument, SupabaseStore};

/// Totals for one ingestion pass. `records` counts rows that reached
/// chunking; `skipped_records` counts rows that produced nothing
/// (unreadable or empty); the two are disjoint.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub records: usize,
    pub skipped_records: usize,
    pub chunks_written: usize,
    pub embed_failures: usize,
    pub write_failures: usize,
}

/// Sequential best-effort CSV-to-store pass: one bad row, failed
/// embedding or rejected write never aborts the rest of the dataset.
pub struct IngestionPipeline {
    genai: GeminiClient,
    store: SupabaseStore,
}

impl IngestionPipeline {
    pub fn new(genai: GeminiClient, store: SupabaseStore) -> Self {
        Self { genai, store }
    }

    /// Ingests a public-facility CSV export: four facet chunks per row,
    /// upserted under `{id}-{chunk_type}`.
    pub async fn ingest_facilities(&self, input: impl Read) -> IngestReport {
        let mut report = IngestReport::default();
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);

        for row in reader.deserialize::<FacilityRecord>() {
            let record = match row {
                Ok(record) => record,
                Err(err) => {
                    tracing::warn!("skipping unreadable facility row: {}", err);
                    report.skipped_records += 1;
                    continue;
                }
            };

            let record_id = record.id.clone();
            tracing::debug!("chunking facility {}", record_id);
            report.records += 1;

            for chunk in chunker::chunk(&SourceRecord::Facility(record)) {
                let source_id = format!("{}-{}", record_id, chunk.chunk_type.as_str());
                self.write_chunk(Domain::Facility, source_id, chunk.content, &mut report)
                    .await;
            }
        }

        report
    }

    /// Ingests a city-news CSV export: one chunk per row, upserted under
    /// the row id; rows with neither title nor summary are skipped.
    pub async fn ingest_news(&self, input: impl Read) -> IngestReport {
        let mut report = IngestReport::default();
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);

        for row in reader.deserialize::<NewsRecord>() {
            let record = match row {
                Ok(record) => record,
                Err(err) => {
                    tracing::warn!("skipping unreadable news row: {}", err);
                    report.skipped_records += 1;
                    continue;
                }
            };

            let record_id = record.id.clone();
            let chunks = chunker::chunk(&SourceRecord::News(record));
            if chunks.is_empty() {
                tracing::info!("skipping news row {}: no title or summary", record_id);
                report.skipped_records += 1;
                continue;
            }

            report.records += 1;
            for chunk in chunks {
                self.write_chunk(Domain::News, record_id.clone(), chunk.content, &mut report)
                    .await;
            }
        }

        report
    }

    async fn write_chunk(
        &self,
        domain: Domain,
        source_id: String,
        content: String,
        report: &mut IngestReport,
    ) {
        if content.trim().is_empty() {
            tracing::debug!("skipping empty chunk {}", source_id);
            return;
        }

        let embedding = match self.genai.embed_document(&content).await {
            Ok(embedding) => embedding,
            Err(err) => {
                tracing::warn!("embedding failed for {}: {}", source_id, err);
                report.embed_failures += 1;
                return;
            }
        };

        let doc = StoredDocument {
            source_table: domain.source_table().to_string(),
            source_id,
            content,
            embedding,
        };
        match self.store.upsert_document(&doc).await {
            Ok(()) => report.chunks_written += 1,
            Err(err) => {
                tracing::warn!("upsert failed for {}: {}", doc.source_id, err);
                report.write_failures += 1;
            }
        }
    }
}
