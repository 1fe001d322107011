//! Backend for the Gunsan city-information chatbot.
//!
//! Two halves share the same Google AI and Supabase clients:
//!
//! - the `ingest` binary chunks public-facility and city-news CSV exports,
//!   embeds each chunk and upserts it into the document store;
//! - the default binary serves `POST /api/query`, answering questions over
//!   the ingested documents with retrieval-augmented generation.

pub mod core;
pub mod genai;
pub mod ingestion;
pub mod logging;
pub mod query;
pub mod server;
pub mod state;
pub mod store;
