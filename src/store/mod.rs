//! Supabase/PostgREST document store client.

pub mod supabase;

pub use supabase::{
    Domain, QueryLogEntry, SearchOptions, SearchResult, StoreError, StoredDocument, SupabaseStore,
};

#[cfg(test)]
mod tests;
