//! Offline ingestion: CSV exports are normalized into fixed-template
//! chunks, embedded, and upserted into the vector store.

pub mod chunker;
pub mod pipeline;
pub mod records;

pub use chunker::{Chunk, ChunkType, SourceRecord};
pub use pipeline::{IngestReport, IngestionPipeline};
pub use records::{FacilityRecord, NewsRecord};
